//! Booking export handling: locating booking fields, splitting container
//! lists into one record per container, and coloring rows by booking.

pub mod types;
pub mod extract;
pub mod reshape;
pub mod color;
pub mod report;

pub use types::*;
pub use extract::{
    distinct_booking_keys, extract_rows, find_remark_columns, BookingColumns, RemarkColumns,
};
pub use reshape::{is_container_token, reshape, split_containers};
pub use color::{BookingPalette, ColorAssigner, PastelColor};
pub use report::{build_report_sheet, build_summary_sheet, write_merged_workbook};
