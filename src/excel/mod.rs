//! Excel module for reading booking exports and writing the merged report.
//!
//! This module provides:
//! - Reading the first worksheet of a workbook into a grid
//! - Locating the header row by a marker cell
//! - Writing report sheets with row fills, column widths and a summary sheet

pub mod types;
pub mod reader;
pub mod writer;

// Re-export commonly used types and functions
pub use types::*;
pub use reader::{
    compute_checksum, get_sheets, header_row_index, locate_header, read_first_sheet, read_table,
};
pub use writer::{
    column_index_to_letter, compute_column_widths, create_backup, export_report, ColumnWidthRule,
    ReportSheet, SummarySheet,
};
