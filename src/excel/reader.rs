use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::types::*;

/// Read the first worksheet of a workbook into a grid
pub fn read_first_sheet(path: &Path) -> Result<SheetGrid, ExcelError> {
    let display = path.display().to_string();

    if !path.exists() {
        return Err(ExcelError::file_not_found(&display));
    }

    let mut workbook: Sheets<_> = open_workbook_auto(path).map_err(|e| {
        ExcelError::invalid_format(format!("Failed to open workbook {}: {}", display, e))
    })?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ExcelError::sheet_not_found(&format!("<first sheet of {}>", display)))?;

    let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
        ExcelError::read_error(format!("Failed to read sheet '{}': {}", sheet_name, e))
    })?;

    let origin = range.start().unwrap_or((0, 0));
    let rows = range_to_rows(&range);

    tracing::debug!(
        path = %path.display(),
        sheet = %sheet_name,
        rows = rows.len(),
        "loaded worksheet"
    );

    Ok(SheetGrid {
        sheet_name,
        origin,
        rows,
    })
}

fn range_to_rows(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let (row_count, col_count) = range.get_size();
    let mut rows = Vec::with_capacity(row_count);

    for row_idx in 0..row_count {
        let mut row_data = Vec::with_capacity(col_count);
        for col_idx in 0..col_count {
            row_data.push(convert_cell_value(range.get((row_idx, col_idx))));
        }
        rows.push(row_data);
    }

    rows
}

/// Convert calamine Data to our CellValue
fn convert_cell_value(cell: Option<&Data>) -> CellValue {
    match cell {
        None => CellValue::Empty,
        Some(data) => match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::String(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Boolean(*b),
            Data::DateTime(dt) => CellValue::DateTime(format_excel_datetime(dt.as_f64())),
            Data::DateTimeIso(s) => CellValue::DateTime(s.clone()),
            Data::DurationIso(s) => CellValue::String(s.clone()),
            Data::Error(e) => CellValue::Error(format!("{:?}", e)),
        },
    }
}

/// Format Excel datetime (days since 1899-12-30) to ISO 8601
///
/// Serials outside chrono's range are returned as plain numbers.
fn format_excel_datetime(value: f64) -> String {
    let Some(epoch) =
        chrono::NaiveDate::from_ymd_opt(1899, 12, 30).and_then(|d| d.and_hms_opt(0, 0, 0))
    else {
        return value.to_string();
    };

    // Rounding to whole seconds may carry into the next day.
    let total_seconds = (value * 86400.0).round();
    if !total_seconds.is_finite() || total_seconds.abs() >= i64::MAX as f64 {
        return value.to_string();
    }

    chrono::TimeDelta::try_seconds(total_seconds as i64)
        .and_then(|offset| epoch.checked_add_signed(offset))
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
        .unwrap_or_else(|| value.to_string())
}

/// Scan the first `scan_rows` rows for a cell containing `marker`.
///
/// Cells are visited row by row, left to right; the first hit wins.
pub fn locate_header(grid: &SheetGrid, marker: &str, scan_rows: usize) -> Option<HeaderLocation> {
    grid.rows
        .iter()
        .take(scan_rows)
        .enumerate()
        .find_map(|(row, cells)| {
            cells.iter().enumerate().find_map(|(col, cell)| {
                let value = cell_to_string(cell);
                value.contains(marker).then(|| HeaderLocation { row, col, value })
            })
        })
}

/// Header row for the grid, falling back to the first row.
pub fn header_row_index(grid: &SheetGrid, marker: &str, scan_rows: usize) -> usize {
    locate_header(grid, marker, scan_rows)
        .map(|loc| loc.row)
        .unwrap_or(0)
}

/// Build a table using `header_row` as column names
pub fn read_table(grid: &SheetGrid, header_row: usize) -> SheetTable {
    let Some(header_cells) = grid.rows.get(header_row) else {
        return SheetTable::default();
    };

    let headers = build_headers(header_cells);

    let rows = grid
        .rows
        .iter()
        .skip(header_row + 1)
        .filter(|row| !row.iter().all(CellValue::is_blank))
        .cloned()
        .collect();

    SheetTable { headers, rows }
}

/// Trim header names, label blanks and disambiguate repeats.
///
/// Repeats take `.1`, `.2`, ... skipping any name already in use.
fn build_headers(cells: &[CellValue]) -> Vec<String> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    let mut used: HashSet<String> = HashSet::new();
    let mut headers = Vec::with_capacity(cells.len());

    for (idx, cell) in cells.iter().enumerate() {
        let trimmed = cell_to_string(cell).trim().to_string();
        let base = if trimmed.is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            trimmed
        };

        let name = if used.contains(&base) {
            let count = counts.entry(base.clone()).or_insert(0);
            loop {
                *count += 1;
                let candidate = format!("{}.{}", base, count);
                if !used.contains(&candidate) {
                    break candidate;
                }
            }
        } else {
            base
        };

        used.insert(name.clone());
        headers.push(name);
    }

    headers
}

/// Get list of sheets in a workbook
pub fn get_sheets(path: &Path) -> Result<Vec<SheetInfo>, ExcelError> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(ExcelError::file_not_found(&display));
    }

    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| ExcelError::read_error(format!("Failed to open workbook: {}", e)))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::new();

    for (index, name) in sheet_names.iter().enumerate() {
        let (rows, cols) = match workbook.worksheet_range(name) {
            Ok(range) => range.get_size(),
            Err(e) => {
                tracing::warn!(sheet = %name, error = %e, "could not size sheet");
                (0, 0)
            }
        };
        sheets.push(SheetInfo {
            name: name.clone(),
            index: index as u32,
            row_count: rows as u32,
            col_count: cols as u32,
        });
    }

    Ok(sheets)
}

/// Compute SHA-256 checksum of a file
pub fn compute_checksum(path: &Path) -> Result<String, ExcelError> {
    let mut file = File::open(path)
        .map_err(|e| ExcelError::read_error(format!("Failed to open file for checksum: {}", e)))?;

    let mut hasher = Sha256::new();
    let mut buffer = [0; 8192];

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|e| ExcelError::read_error(format!("Failed to read file for checksum: {}", e)))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    fn grid(rows: Vec<Vec<CellValue>>) -> SheetGrid {
        SheetGrid {
            sheet_name: "Sheet1".to_string(),
            origin: (0, 0),
            rows,
        }
    }

    #[test]
    fn test_locate_header_finds_marker_below_title() {
        let g = grid(vec![
            vec![s("VESSEL: MSC ZOE"), CellValue::Empty],
            vec![CellValue::Empty, CellValue::Empty],
            vec![s("NO"), s(" BKG NO ")],
            vec![CellValue::Number(1.0), s("BK1")],
        ]);

        let loc = locate_header(&g, "BKG NO", 10).unwrap();
        assert_eq!(loc.row, 2);
        assert_eq!(loc.col, 1);
        assert_eq!(loc.value, " BKG NO ");
        assert_eq!(header_row_index(&g, "BKG NO", 10), 2);
    }

    #[test]
    fn test_locate_header_respects_scan_limit() {
        let mut rows: Vec<Vec<CellValue>> = (0..5).map(|_| vec![s("title")]).collect();
        rows.push(vec![s("BKG NO")]);
        let g = grid(rows);

        assert!(locate_header(&g, "BKG NO", 5).is_none());
        assert_eq!(header_row_index(&g, "BKG NO", 5), 0);
        assert_eq!(header_row_index(&g, "BKG NO", 6), 5);
    }

    #[test]
    fn test_read_table_trims_and_labels_headers() {
        let g = grid(vec![
            vec![s(" BKG NO"), CellValue::Empty, s("REMARK"), s("REMARK ")],
            vec![s("BK1"), s("x"), s("r1"), s("r2")],
            vec![CellValue::Empty, CellValue::Empty, CellValue::Empty, CellValue::Empty],
            vec![s("BK2"), CellValue::Empty, CellValue::Empty, CellValue::Empty],
        ]);

        let table = read_table(&g, 0);
        assert_eq!(table.headers, vec!["BKG NO", "Unnamed: 1", "REMARK", "REMARK.1"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.cell(1, 0), &s("BK2"));
    }

    #[test]
    fn test_read_table_keeps_whitespace_rows() {
        let g = grid(vec![
            vec![s("BKG NO"), s("CNTR NO")],
            vec![s("  "), s("  ")],
            vec![CellValue::Empty, CellValue::Empty],
        ]);

        let table = read_table(&g, 0);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.cell(0, 0), &s("  "));
    }

    #[test]
    fn test_repeated_headers_skip_existing_suffixes() {
        let headers = build_headers(&[s("A"), s("A"), s("A.1"), s("A")]);
        assert_eq!(headers, vec!["A", "A.1", "A.1.1", "A.2"]);
    }

    #[test]
    fn test_read_table_header_beyond_grid() {
        let g = grid(vec![vec![s("a")]]);
        let table = read_table(&g, 4);
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_format_excel_datetime() {
        assert_eq!(format_excel_datetime(45292.5), "2024-01-01T12:00:00");
    }

    #[test]
    fn test_format_excel_datetime_rounds_into_next_day() {
        assert_eq!(format_excel_datetime(45292.999999), "2024-01-02T00:00:00");
    }

    #[test]
    fn test_format_excel_datetime_out_of_range_serial() {
        assert_eq!(format_excel_datetime(1.0e9), "1000000000");
        assert_eq!(format_excel_datetime(f64::MAX), f64::MAX.to_string());
    }
}
