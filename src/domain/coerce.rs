// Type coercion - typed parse functions applied uniformly per column
use crate::domain::errors::IngestError;
use crate::domain::record::{ContentRecord, Dataset, ExtraColumn, Metric};
use crate::domain::schema::CANONICAL_FIELDS;
use crate::domain::table::RawTable;

/// Count parser: keeps only digits and `.` (drops thousands separators and
/// stray markers), then parses as f64. Unparsable input coerces to 0.
pub fn parse_count(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse().unwrap_or(0.0)
}

/// Rate parser: `"12.3%"` becomes 0.123; a plain number is taken as an
/// already-fractional value. Unparsable input coerces to 0 rather than
/// aborting the pass, matching the count policy.
pub fn parse_rate(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.contains('%') {
        let cleaned: String = trimmed
            .chars()
            .filter(|c| *c != '%' && *c != ',')
            .collect();
        cleaned.trim().parse::<f64>().map(|v| v / 100.0).unwrap_or(0.0)
    } else {
        trimmed.replace(',', "").parse().unwrap_or(0.0)
    }
}

fn is_plain_number(cell: &str) -> bool {
    cell.trim().parse::<f64>().is_ok()
}

/// Builds the typed dataset from a normalized table. Count and rate columns go
/// through their parsers; unmatched extra columns are kept as filter
/// candidates only when every non-empty cell is a plain number.
pub fn build_dataset(table: &RawTable) -> Result<Dataset, IngestError> {
    let missing: Vec<String> = CANONICAL_FIELDS
        .iter()
        .filter(|(canonical, _)| table.column_index(canonical).is_none())
        .map(|(canonical, keyword)| format!("{canonical} (keyword: {keyword})"))
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::SchemaIncomplete {
            missing,
            detected: table.columns.clone(),
        });
    }

    // All seven indices exist after the check above.
    let index = |name: &str| table.column_index(name).unwrap_or_default();
    let (date_i, title_i) = (index("date"), index("title"));
    let (exposure_i, visits_i, article_i) = (
        index("card_exposure"),
        index("page_visits"),
        index("article_click_rate"),
    );
    let (clicks_i, conversion_i) = (index("action_clicks"), index("feature_conversion_rate"));

    let records = table
        .rows
        .iter()
        .map(|row| ContentRecord {
            date: row[date_i].trim().to_string(),
            title: row[title_i].trim().to_string(),
            card_exposure: parse_count(&row[exposure_i]),
            page_visits: parse_count(&row[visits_i]),
            article_click_rate: parse_rate(&row[article_i]),
            action_clicks: parse_count(&row[clicks_i]),
            feature_conversion_rate: parse_rate(&row[conversion_i]),
        })
        .collect();

    let extras = table
        .columns
        .iter()
        .enumerate()
        .filter(|(i, name)| {
            Metric::from_canonical_name(name.as_str()).is_none()
                && *name != "date"
                && *name != "title"
                && table
                    .rows
                    .iter()
                    .all(|row| row[*i].trim().is_empty() || is_plain_number(&row[*i]))
        })
        .map(|(i, name)| ExtraColumn {
            name: name.clone(),
            values: table
                .rows
                .iter()
                .map(|row| row[i].trim().parse().unwrap_or(0.0))
                .collect(),
        })
        .collect();

    Ok(Dataset { records, extras })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count_strips_separators_and_noise() {
        assert_eq!(parse_count("1,200"), 1200.0);
        assert_eq!(parse_count(" 12,345 "), 12345.0);
        assert_eq!(parse_count("≈987 uv"), 987.0);
        assert_eq!(parse_count("12.5"), 12.5);
    }

    #[test]
    fn test_parse_count_unparsable_is_zero() {
        assert_eq!(parse_count(""), 0.0);
        assert_eq!(parse_count("n/a"), 0.0);
    }

    #[test]
    fn test_parse_rate_percent_divides_by_hundred() {
        assert_eq!(parse_rate("10%"), 0.1);
        assert!((parse_rate("12.3%") - 0.123).abs() < 1e-12);
        assert_eq!(parse_rate(" 5 % "), 0.05);
    }

    #[test]
    fn test_parse_rate_plain_fraction_unchanged() {
        assert_eq!(parse_rate("0.123"), 0.123);
        assert_eq!(parse_rate("0"), 0.0);
    }

    #[test]
    fn test_parse_rate_unparsable_is_zero() {
        assert_eq!(parse_rate("n/a"), 0.0);
        assert_eq!(parse_rate("%"), 0.0);
    }

    fn normalized_table(extra: Option<(&str, Vec<&str>)>) -> RawTable {
        let mut columns: Vec<String> = [
            "date",
            "title",
            "card_exposure",
            "page_visits",
            "article_click_rate",
            "action_clicks",
            "feature_conversion_rate",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();
        let mut rows = vec![
            vec!["2024-01-01", "A", "1,200", "100", "10%", "50", "5%"],
            vec!["2024-01-02", "B", "300", "20", "2%", "5", "1%"],
        ]
        .into_iter()
        .map(|r| r.into_iter().map(String::from).collect::<Vec<_>>())
        .collect::<Vec<_>>();

        if let Some((name, values)) = extra {
            columns.push(name.to_string());
            for (row, value) in rows.iter_mut().zip(values) {
                row.push(value.to_string());
            }
        }
        RawTable::new(columns, rows)
    }

    #[test]
    fn test_build_dataset_coerces_all_numeric_fields() {
        let dataset = build_dataset(&normalized_table(None)).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records[0].card_exposure, 1200.0);
        assert_eq!(dataset.records[0].article_click_rate, 0.1);
        assert_eq!(dataset.records[1].feature_conversion_rate, 0.01);
        assert_eq!(dataset.records[1].title, "B");
    }

    #[test]
    fn test_numeric_extra_column_becomes_filter_candidate() {
        let dataset = build_dataset(&normalized_table(Some(("shares", vec!["7", ""])))).unwrap();

        assert_eq!(dataset.extras.len(), 1);
        assert_eq!(dataset.extras[0].name, "shares");
        assert_eq!(dataset.extras[0].values, vec![7.0, 0.0]);
    }

    #[test]
    fn test_non_numeric_extra_column_excluded() {
        let dataset = build_dataset(&normalized_table(Some(("channel", vec!["app", "web"])))).unwrap();

        assert!(dataset.extras.is_empty());
        assert!(!dataset.filter_candidates().contains(&"channel".to_string()));
    }
}
