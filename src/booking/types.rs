use serde::{Deserialize, Serialize};

use crate::excel::{cell_to_string, CellValue};

/// Output column headers, in order.
pub const REPORT_HEADERS: [&str; 5] = ["BKG NO", "CNTR NO", "REMARK", "REMARK(CS)", "PORT"];

/// One source row of a booking export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRow {
    pub booking: CellValue,
    pub containers: CellValue,
    pub remark: CellValue,
    pub remark_cs: CellValue,
    pub port: CellValue,
}

impl BookingRow {
    /// Grouping key for the booking number.
    pub fn booking_key(&self) -> String {
        cell_to_string(&self.booking)
    }
}

/// One container of a booking, the unit of the merged report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub booking: CellValue,
    pub container: String,
    pub remark: CellValue,
    pub remark_cs: CellValue,
    pub port: CellValue,
}

impl BookingRecord {
    pub fn booking_key(&self) -> String {
        cell_to_string(&self.booking)
    }

    /// Cells in `REPORT_HEADERS` order.
    pub fn to_cells(&self) -> Vec<CellValue> {
        vec![
            self.booking.clone(),
            CellValue::String(self.container.clone()),
            self.remark.clone(),
            self.remark_cs.clone(),
            self.port.clone(),
        ]
    }
}

/// Aggregate counts for a merge run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSummary {
    /// Sum over processed files of each file's distinct booking numbers.
    pub total_bookings: usize,
    /// Container rows written.
    pub total_containers: usize,
    /// Every input file, skipped ones included.
    pub files_processed: usize,
    /// Files left out for lacking remark columns.
    pub skipped_files: Vec<String>,
}
