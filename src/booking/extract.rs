use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;

use super::types::BookingRow;
use crate::config::MergerConfig;
use crate::excel::{cell_to_string, CellValue, ExcelError, SheetTable};

/// Remark columns located by fuzzy header match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemarkColumns {
    pub normal: Option<usize>,
    pub cs: Option<usize>,
}

impl RemarkColumns {
    pub fn is_empty(&self) -> bool {
        self.normal.is_none() && self.cs.is_none()
    }
}

fn contains_ignore_case(key: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&regex::escape(key))
        .case_insensitive(true)
        .build()
}

/// Find remark columns by case-insensitive substring match.
///
/// A header containing the CS key is the CS remark; otherwise a header
/// containing the plain key is the normal remark. Later columns win.
pub fn find_remark_columns(headers: &[String], config: &MergerConfig) -> RemarkColumns {
    let (Ok(cs_key), Ok(key)) = (
        contains_ignore_case(&config.remark_cs_key),
        contains_ignore_case(&config.remark_key),
    ) else {
        // Only a key past the regex size limit fails to compile.
        tracing::warn!("remark keys could not be compiled, no remark columns matched");
        return RemarkColumns::default();
    };

    let mut columns = RemarkColumns::default();
    for (idx, header) in headers.iter().enumerate() {
        if cs_key.is_match(header) {
            columns.cs = Some(idx);
        } else if key.is_match(header) {
            columns.normal = Some(idx);
        }
    }
    columns
}

/// Indices of the required booking columns in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingColumns {
    pub booking: usize,
    pub container: usize,
    pub port: usize,
}

impl BookingColumns {
    /// Resolve the booking, container and port columns by exact name.
    pub fn resolve(
        table: &SheetTable,
        config: &MergerConfig,
        source: &str,
    ) -> Result<Self, ExcelError> {
        let find = |name: &str| {
            table
                .column(name)
                .ok_or_else(|| ExcelError::missing_column(name, source))
        };

        Ok(BookingColumns {
            booking: find(&config.booking_column)?,
            container: find(&config.container_column)?,
            port: find(&config.port_column)?,
        })
    }
}

/// Pull the booking fields out of every table row.
pub fn extract_rows(
    table: &SheetTable,
    columns: BookingColumns,
    remarks: RemarkColumns,
) -> Vec<BookingRow> {
    let optional = |row: usize, col: Option<usize>| -> CellValue {
        col.map(|c| table.cell(row, c).clone())
            .unwrap_or(CellValue::Empty)
    };

    (0..table.rows.len())
        .map(|row| BookingRow {
            booking: table.cell(row, columns.booking).clone(),
            containers: table.cell(row, columns.container).clone(),
            remark: optional(row, remarks.normal),
            remark_cs: optional(row, remarks.cs),
            port: table.cell(row, columns.port).clone(),
        })
        .collect()
}

/// Distinct booking keys of a table, empty cells included as `""`.
pub fn distinct_booking_keys(table: &SheetTable, booking_col: usize) -> BTreeSet<String> {
    (0..table.rows.len())
        .map(|row| cell_to_string(table.cell(row, booking_col)))
        .collect()
}
