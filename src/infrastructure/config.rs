use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Base of the sharing host the export URL is built against.
    pub sheets_host: String,
    /// Explicit fetch timeout so a hung export cannot block a pass forever.
    pub fetch_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub filter: FilterSettings,
    pub palette: PaletteSettings,
    pub overview: OverviewSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FilterSettings {
    pub default_min_exposure: f64,
    pub min_exposure_floor: f64,
    pub min_exposure_ceiling: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaletteSettings {
    /// Combo-chart series colors, cycled per metric.
    pub series: Vec<String>,
    /// Single-metric panel colors, alternated per panel position.
    pub single: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OverviewSettings {
    pub exposure_color: String,
    pub visits_color: String,
    pub clicks_color: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            filter: FilterSettings {
                default_min_exposure: 400.0,
                min_exposure_floor: 0.0,
                min_exposure_ceiling: 5000.0,
            },
            palette: PaletteSettings {
                series: vec![
                    "#00f2fe".to_string(),
                    "#fbc2eb".to_string(),
                    "#4facfe".to_string(),
                    "#ff9f43".to_string(),
                    "#a18cd1".to_string(),
                ],
                single: vec!["#00f2fe".to_string(), "#fbc2eb".to_string()],
            },
            overview: OverviewSettings {
                exposure_color: "#4facfe".to_string(),
                visits_color: "#a18cd1".to_string(),
                clicks_color: "#ff9f43".to_string(),
            },
        }
    }
}

pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/server"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
