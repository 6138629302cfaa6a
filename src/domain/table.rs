// Raw tabular data as produced by the source resolver

/// A header row plus data rows, as read from a workbook or CSV export.
/// Column names and order are whatever the source supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Builds a table, trimming header whitespace and padding short rows
    /// so every row has one cell per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let columns: Vec<String> = columns.into_iter().map(|c| c.trim().to_string()).collect();
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.truncate(width);
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
