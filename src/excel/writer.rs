use std::path::Path;
use umya_spreadsheet::{new_file, structs::PatternValues, writer, Style, Worksheet};

use super::reader::compute_checksum;
use super::types::{cell_to_string, CellValue, ExcelError};

/// A sheet to export: header row, data rows and an optional fill per row.
///
/// `row_fills[i]` is an ARGB color (`FFRRGGBB`) painted on the first cell of
/// data row `i`.
#[derive(Debug, Clone, Default)]
pub struct ReportSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    pub row_fills: Vec<Option<String>>,
    pub widths: ColumnWidthRule,
}

/// Label/value pairs written to a trailing sheet.
#[derive(Debug, Clone, Default)]
pub struct SummarySheet {
    pub name: String,
    pub rows: Vec<(String, CellValue)>,
}

/// Column widths are the longest cell text plus padding; the first
/// `wide_columns` columns get `wide_padding` instead of `padding`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnWidthRule {
    pub wide_columns: usize,
    pub wide_padding: f64,
    pub padding: f64,
}

impl Default for ColumnWidthRule {
    fn default() -> Self {
        ColumnWidthRule {
            wide_columns: 2,
            wide_padding: 10.0,
            padding: 2.0,
        }
    }
}

/// Width for every column of `headers` + `rows`, measured in characters.
pub fn compute_column_widths(
    headers: &[String],
    rows: &[Vec<CellValue>],
    rule: ColumnWidthRule,
) -> Vec<f64> {
    let col_count = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(headers.len()))
        .max()
        .unwrap_or(0);

    (0..col_count)
        .map(|col| {
            let header_len = headers.get(col).map(|h| h.chars().count()).unwrap_or(0);
            let max_len = rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell_to_string(cell).chars().count())
                .fold(header_len, usize::max);

            let padding = if col < rule.wide_columns {
                rule.wide_padding
            } else {
                rule.padding
            };
            max_len as f64 + padding
        })
        .collect()
}

/// Export a report sheet (and optional summary) to a new xlsx file.
///
/// Returns the SHA-256 checksum of the written file.
pub fn export_report(
    output_path: &Path,
    data: &ReportSheet,
    summary: Option<&SummarySheet>,
) -> Result<String, ExcelError> {
    let mut book = new_file();

    let sheet = book
        .get_sheet_mut(&0)
        .ok_or_else(|| ExcelError::write_error("New workbook has no worksheet"))?;
    sheet.set_name(data.name.as_str());

    write_data_sheet(sheet, data);

    if let Some(summary) = summary {
        let summary_sheet = book.new_sheet(summary.name.as_str()).map_err(|e| {
            ExcelError::write_error(format!("Failed to add sheet '{}': {}", summary.name, e))
        })?;
        write_summary_sheet(summary_sheet, summary);
    }

    writer::xlsx::write(&book, output_path)
        .map_err(|e| ExcelError::write_error(format!("Failed to write file: {}", e)))?;

    tracing::debug!(
        path = %output_path.display(),
        rows = data.rows.len(),
        "workbook written"
    );

    compute_checksum(output_path)
}

fn write_data_sheet(sheet: &mut Worksheet, data: &ReportSheet) {
    for (col_idx, header) in data.headers.iter().enumerate() {
        let col_num = (col_idx + 1) as u32;
        sheet.get_cell_mut((col_num, 1)).set_value(header.as_str());
        sheet
            .get_style_mut((col_num, 1))
            .get_font_mut()
            .set_bold(true);
    }

    for (row_idx, row) in data.rows.iter().enumerate() {
        // Excel uses 1-based indexing and row 1 is the header
        let row_num = (row_idx + 2) as u32;

        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = (col_idx + 1) as u32;
            set_cell(sheet, col_num, row_num, cell);
        }

        if let Some(Some(argb)) = data.row_fills.get(row_idx) {
            sheet.get_cell_mut((1, row_num)).set_style(solid_fill(argb));
        }
    }

    let widths = compute_column_widths(&data.headers, &data.rows, data.widths);
    for (col_idx, width) in widths.into_iter().enumerate() {
        let letter = column_index_to_letter(col_idx as u32);
        sheet.get_column_dimension_mut(&letter).set_width(width);
    }
}

fn write_summary_sheet(sheet: &mut Worksheet, summary: &SummarySheet) {
    for (row_idx, (label, value)) in summary.rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        sheet.get_cell_mut((1, row_num)).set_value(label.as_str());
        set_cell(sheet, 2, row_num, value);
    }

    let label_width = summary
        .rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    sheet
        .get_column_dimension_mut("A")
        .set_width(label_width as f64 + 2.0);
}

fn set_cell(sheet: &mut Worksheet, col_num: u32, row_num: u32, value: &CellValue) {
    let cell = sheet.get_cell_mut((col_num, row_num));

    match value {
        CellValue::Empty => {}
        CellValue::Number(n) => {
            cell.set_value_number(*n);
        }
        CellValue::Boolean(b) => {
            cell.set_value_bool(*b);
        }
        other => {
            cell.set_value_string(cell_to_string(other));
        }
    }
}

fn solid_fill(argb: &str) -> Style {
    let mut style = Style::default();
    let pattern = style.get_fill_mut().get_pattern_fill_mut();
    pattern.set_pattern_type(PatternValues::Solid);
    pattern.get_foreground_color_mut().set_argb(argb);
    pattern.get_background_color_mut().set_argb(argb);
    style
}

/// Convert column index (0-based) to Excel column letter (A, B, ..., Z, AA, AB, ...)
pub fn column_index_to_letter(index: u32) -> String {
    let mut result = String::new();
    let mut n = index + 1;

    while n > 0 {
        n -= 1;
        let c = (b'A' + (n % 26) as u8) as char;
        result.insert(0, c);
        n /= 26;
    }

    result
}

/// Create a backup of the file before it is replaced
pub fn create_backup(path: &Path) -> Result<String, ExcelError> {
    if !path.exists() {
        return Err(ExcelError::file_not_found(&path.display().to_string()));
    }

    let backup_name = format!(
        "{}.backup.{}",
        path.display(),
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );

    std::fs::copy(path, &backup_name)
        .map_err(|e| ExcelError::write_error(format!("Failed to create backup: {}", e)))?;

    Ok(backup_name)
}
