//! The merge run: load every input, color bookings across all of them,
//! reshape rows to one container per row, and write the report.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::booking::{
    self, distinct_booking_keys, extract_rows, find_remark_columns, BookingColumns,
    BookingPalette, BookingRecord, ColorAssigner, MergeSummary,
};
use crate::config::MergerConfig;
use crate::error::MergeError;
use crate::excel::{self, ExcelError, HeaderLocation, SheetInfo, SheetTable};

/// Result of a completed merge run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeOutcome {
    pub output: PathBuf,
    pub checksum: String,
    pub summary: MergeSummary,
    pub records_written: usize,
    pub backup: Option<String>,
}

/// Single-file header and row-count report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inspection {
    pub path: PathBuf,
    pub sheet_name: String,
    pub sheets: Vec<SheetInfo>,
    /// 1-based sheet position of the marker cell, if found.
    pub header_row: Option<u32>,
    pub header_col: Option<u32>,
    pub header_value: Option<String>,
    pub headers: Vec<String>,
    /// False when no REMARK column exists; a merge skips such files.
    pub has_remarks: bool,
    pub source_rows: usize,
    pub processed_rows: usize,
}

/// A loaded input file.
struct LoadedTable {
    path: PathBuf,
    table: SheetTable,
}

impl LoadedTable {
    fn source(&self) -> String {
        self.path.display().to_string()
    }
}

pub struct MergeRun {
    config: MergerConfig,
}

impl MergeRun {
    pub fn new(config: MergerConfig) -> Self {
        MergeRun { config }
    }

    /// Merge `inputs` into the configured output workbook.
    ///
    /// Every file is read before anything is written; any failure aborts
    /// the run without touching the output.
    pub fn run(&self, inputs: &[PathBuf]) -> Result<MergeOutcome, MergeError> {
        if inputs.is_empty() {
            return Err(MergeError::NoInputs);
        }
        self.config.validate()?;

        let tables = inputs
            .iter()
            .map(|path| self.load_table(path))
            .collect::<Result<Vec<_>, _>>()?;

        let palette = self.build_palette(&tables)?;
        tracing::info!(bookings = palette.len(), "assigned booking colors");
        for (key, color) in palette.iter() {
            tracing::debug!(booking = %key, color = %color.to_hex(), "booking color");
        }

        let mut records: Vec<BookingRecord> = Vec::new();
        let mut summary = MergeSummary {
            files_processed: inputs.len(),
            ..MergeSummary::default()
        };

        for loaded in &tables {
            let source = loaded.source();
            let columns = BookingColumns::resolve(&loaded.table, &self.config, &source)?;
            let remarks = find_remark_columns(&loaded.table.headers, &self.config);

            if remarks.is_empty() {
                tracing::warn!(path = %source, "no REMARK columns found, skipping file");
                summary.skipped_files.push(source);
                continue;
            }

            let rows = extract_rows(&loaded.table, columns, remarks);
            let file_records = booking::reshape(&rows, self.config.container_length);
            let file_bookings = distinct_booking_keys(&loaded.table, columns.booking).len();

            tracing::info!(
                path = %source,
                rows = rows.len(),
                containers = file_records.len(),
                bookings = file_bookings,
                "processed file"
            );

            summary.total_containers += file_records.len();
            summary.total_bookings += file_bookings;
            records.extend(file_records);
        }

        let output = self.config.output_path.clone();
        let backup = self.backup_output(&output)?;

        let summary_sheet = self
            .config
            .write_summary
            .then_some((self.config.summary_sheet.as_str(), &summary));

        let checksum = booking::write_merged_workbook(
            &output,
            &self.config.data_sheet,
            &records,
            &palette,
            summary_sheet,
        )?;

        tracing::info!(
            output = %output.display(),
            records = records.len(),
            "merged workbook written"
        );

        Ok(MergeOutcome {
            output,
            checksum,
            records_written: records.len(),
            summary,
            backup,
        })
    }

    fn load_table(&self, path: &Path) -> Result<LoadedTable, ExcelError> {
        let grid = excel::read_first_sheet(path)?;
        let header_row = excel::header_row_index(
            &grid,
            &self.config.header_marker,
            self.config.header_scan_rows,
        );
        tracing::debug!(path = %path.display(), header_row, "located header row");

        Ok(LoadedTable {
            path: path.to_path_buf(),
            table: excel::read_table(&grid, header_row),
        })
    }

    /// Colors come from the bookings of every file, including files that are
    /// later skipped.
    fn build_palette(&self, tables: &[LoadedTable]) -> Result<BookingPalette, ExcelError> {
        let mut keys = BTreeSet::new();
        for loaded in tables {
            let booking_col = loaded
                .table
                .column(&self.config.booking_column)
                .ok_or_else(|| {
                    ExcelError::missing_column(&self.config.booking_column, &loaded.source())
                })?;
            keys.extend(distinct_booking_keys(&loaded.table, booking_col));
        }

        let mut assigner = ColorAssigner::new(
            self.config.pastel_min,
            self.config.pastel_max,
            self.config.color_seed,
        );
        Ok(assigner.assign(&keys))
    }

    fn backup_output(&self, output: &Path) -> Result<Option<String>, ExcelError> {
        if !self.config.backup_existing || !output.exists() {
            return Ok(None);
        }
        let backup = excel::create_backup(output)?;
        tracing::info!(backup = %backup, "backed up existing output");
        Ok(Some(backup))
    }
}

/// Locate the header of a single file and count what a merge would emit.
pub fn inspect(path: &Path, config: &MergerConfig) -> Result<Inspection, MergeError> {
    let sheets = excel::get_sheets(path)?;
    let grid = excel::read_first_sheet(path)?;
    let location = excel::locate_header(&grid, &config.header_marker, config.header_scan_rows);
    let header_row = location.as_ref().map(|loc| loc.row).unwrap_or(0);
    let table = excel::read_table(&grid, header_row);

    let source = path.display().to_string();
    let columns = BookingColumns::resolve(&table, config, &source)?;
    let remarks = find_remark_columns(&table.headers, config);
    let has_remarks = !remarks.is_empty();
    let processed_rows = if has_remarks {
        let rows = extract_rows(&table, columns, remarks);
        booking::reshape(&rows, config.container_length).len()
    } else {
        0
    };

    let (row, col, value) = match location {
        Some(HeaderLocation { row, col, value }) => (
            Some(grid.origin.0 + row as u32 + 1),
            Some(grid.origin.1 + col as u32 + 1),
            Some(value),
        ),
        None => (None, None, None),
    };

    Ok(Inspection {
        path: path.to_path_buf(),
        sheet_name: grid.sheet_name,
        sheets,
        header_row: row,
        header_col: col,
        header_value: value,
        headers: table.headers,
        has_remarks,
        source_rows: table.rows.len(),
        processed_rows,
    })
}
