use super::types::{BookingRecord, BookingRow};
use crate::excel::{cell_to_string, CellValue};

/// Split a container cell on whitespace.
pub fn split_containers(cell: &CellValue) -> Vec<String> {
    cell_to_string(cell)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Container numbers are exactly `len` characters long.
pub fn is_container_token(token: &str, len: usize) -> bool {
    token.chars().count() == len
}

/// Emit one record per valid container token, keeping row then token order.
pub fn reshape(rows: &[BookingRow], container_len: usize) -> Vec<BookingRecord> {
    rows.iter()
        .flat_map(|row| {
            split_containers(&row.containers)
                .into_iter()
                .filter(|token| is_container_token(token, container_len))
                .map(move |container| BookingRecord {
                    booking: row.booking.clone(),
                    container,
                    remark: row.remark.clone(),
                    remark_cs: row.remark_cs.clone(),
                    port: row.port.clone(),
                })
        })
        .collect()
}
