//! Merge shipping booking exports into a single container sheet.
//!
//! Each input workbook is scanned for its `BKG NO` header row, rows are split
//! into one record per container number, and the merged records are written
//! to a new workbook with each booking's rows sharing a pastel fill.

pub mod booking;
pub mod config;
pub mod error;
pub mod excel;
pub mod inputs;
pub mod pipeline;

pub use config::MergerConfig;
pub use error::{ConfigError, MergeError};
pub use inputs::{collect_inputs, InputSet};
pub use pipeline::{inspect, Inspection, MergeOutcome, MergeRun};
