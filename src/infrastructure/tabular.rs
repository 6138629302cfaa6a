// Workbook and CSV readers producing raw tables
use crate::domain::errors::IngestError;
use crate::domain::table::RawTable;
use calamine::{Data, Reader};
use std::io::Cursor;

/// Reads the first worksheet of an uploaded xlsx/xls workbook. The first row
/// is the header; rows that are entirely empty are dropped.
pub fn read_workbook(bytes: &[u8]) -> Result<RawTable, IngestError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
        .map_err(|e| IngestError::Unreadable(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::Unreadable("the workbook has no worksheets".to_string()))?
        .map_err(|e| IngestError::Unreadable(e.to_string()))?;

    let mut rows_iter = range.rows();
    let columns = rows_iter
        .next()
        .ok_or_else(|| IngestError::Unreadable("the first worksheet is empty".to_string()))?
        .iter()
        .map(cell_to_string)
        .collect();

    let rows: Vec<Vec<String>> = rows_iter
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
        .filter(|row: &Vec<String>| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect();

    Ok(RawTable::new(columns, rows))
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Parses the fetched CSV export. Ragged rows are tolerated; the table
/// constructor pads them to the header width.
pub fn read_csv(bytes: &[u8]) -> Result<RawTable, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let columns = reader
        .headers()
        .map_err(|e| IngestError::Unreadable(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| IngestError::Unreadable(e.to_string()))?;
        let row: Vec<String> = record.iter().map(|c| c.to_string()).collect();
        if row.iter().any(|cell| !cell.trim().is_empty()) {
            rows.push(row);
        }
    }

    Ok(RawTable::new(columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_happy_path() {
        let csv = "dt,title,exposure\n2024-01-01,A,\"1,200\"\n2024-01-02,B,300\n";
        let table = read_csv(csv.as_bytes()).unwrap();

        assert_eq!(table.columns, vec!["dt", "title", "exposure"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][2], "1,200");
    }

    #[test]
    fn test_read_csv_pads_ragged_rows_and_drops_blank_lines() {
        let csv = "dt,title,exposure\n2024-01-01,A\n,,\n";
        let table = read_csv(csv.as_bytes()).unwrap();

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0], vec!["2024-01-01", "A", ""]);
    }

    #[test]
    fn test_read_workbook_rejects_garbage() {
        let err = read_workbook(b"definitely not a workbook").unwrap_err();
        assert!(matches!(err, IngestError::Unreadable(_)));
    }
}
