use serde::{Deserialize, Serialize};

/// Information about a sheet in an Excel file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetInfo {
    pub name: String,
    pub index: u32,
    pub row_count: u32,
    pub col_count: u32,
}

/// Represents a cell value with type information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    Empty,
    String(String),
    Number(f64),
    Boolean(bool),
    DateTime(String), // ISO 8601 format
    Error(String),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl CellValue {
    /// True only for empty cells; whitespace strings are values.
    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

/// Text form of a cell, used for matching, grouping and width measurement.
pub fn cell_to_string(cell: &CellValue) -> String {
    match cell {
        CellValue::Number(n) => format!("{}", n),
        CellValue::String(s) => s.clone(),
        CellValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        CellValue::DateTime(dt) => dt.clone(),
        CellValue::Empty => String::new(),
        CellValue::Error(e) => format!("#ERROR: {}", e),
    }
}

/// First worksheet of a workbook as a dense grid.
///
/// `origin` is the absolute 0-based (row, col) of the grid's top-left cell,
/// since readers trim leading empty rows and columns.
#[derive(Debug, Clone, Default)]
pub struct SheetGrid {
    pub sheet_name: String,
    pub origin: (u32, u32),
    pub rows: Vec<Vec<CellValue>>,
}

/// Where the header marker was found, in grid coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderLocation {
    pub row: usize,
    pub col: usize,
    pub value: String,
}

/// Rows of a sheet keyed by the located header row.
#[derive(Debug, Clone, Default)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetTable {
    /// Index of the column whose trimmed header equals `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at (`row`, `col`), or `Empty` when the row is short.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(EMPTY)
    }
}

/// Excel-specific errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcelError {
    pub message: String,
    pub error_type: ExcelErrorType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExcelErrorType {
    FileNotFound,
    InvalidFormat,
    SheetNotFound,
    ReadError,
    WriteError,
    MissingColumn,
}

impl std::fmt::Display for ExcelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExcelError {}

impl ExcelError {
    pub fn new(message: impl Into<String>, error_type: ExcelErrorType) -> Self {
        ExcelError {
            message: message.into(),
            error_type,
        }
    }

    pub fn file_not_found(path: &str) -> Self {
        ExcelError::new(format!("File not found: {}", path), ExcelErrorType::FileNotFound)
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        ExcelError::new(message, ExcelErrorType::InvalidFormat)
    }

    pub fn sheet_not_found(sheet: &str) -> Self {
        ExcelError::new(format!("Sheet not found: {}", sheet), ExcelErrorType::SheetNotFound)
    }

    pub fn read_error(message: impl Into<String>) -> Self {
        ExcelError::new(message, ExcelErrorType::ReadError)
    }

    pub fn write_error(message: impl Into<String>) -> Self {
        ExcelError::new(message, ExcelErrorType::WriteError)
    }

    pub fn missing_column(column: &str, path: &str) -> Self {
        ExcelError::new(
            format!("Column '{}' not found in {}", column, path),
            ExcelErrorType::MissingColumn,
        )
    }
}
