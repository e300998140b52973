use chrono::{DateTime, Local};
use std::path::Path;

use super::color::BookingPalette;
use super::types::{BookingRecord, MergeSummary, REPORT_HEADERS};
use crate::excel::{self, CellValue, ColumnWidthRule, ExcelError, ReportSheet, SummarySheet};

/// Data sheet for the merged records, first column filled by booking color.
pub fn build_report_sheet(
    name: &str,
    records: &[BookingRecord],
    palette: &BookingPalette,
) -> ReportSheet {
    let rows = records.iter().map(BookingRecord::to_cells).collect();
    let row_fills = records
        .iter()
        .map(|record| palette.color_for(&record.booking_key()).map(|c| c.to_argb()))
        .collect();

    ReportSheet {
        name: name.to_string(),
        headers: REPORT_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows,
        row_fills,
        widths: ColumnWidthRule::default(),
    }
}

/// Summary sheet with the run's aggregate counts.
pub fn build_summary_sheet(
    name: &str,
    summary: &MergeSummary,
    generated_at: DateTime<Local>,
) -> SummarySheet {
    let count = |n: usize| CellValue::Number(n as f64);

    SummarySheet {
        name: name.to_string(),
        rows: vec![
            ("Total BKG NO".to_string(), count(summary.total_bookings)),
            ("Total CNTR NO".to_string(), count(summary.total_containers)),
            ("Files processed".to_string(), count(summary.files_processed)),
            ("Files skipped".to_string(), count(summary.skipped_files.len())),
            (
                "Generated at".to_string(),
                CellValue::String(generated_at.format("%Y-%m-%d %H:%M:%S").to_string()),
            ),
        ],
    }
}

/// Write the merged workbook, returning the checksum of the written file.
pub fn write_merged_workbook(
    output: &Path,
    data_sheet: &str,
    records: &[BookingRecord],
    palette: &BookingPalette,
    summary: Option<(&str, &MergeSummary)>,
) -> Result<String, ExcelError> {
    let sheet = build_report_sheet(data_sheet, records, palette);
    let summary_sheet =
        summary.map(|(name, summary)| build_summary_sheet(name, summary, Local::now()));

    excel::export_report(output, &sheet, summary_sheet.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::color::ColorAssigner;
    use std::collections::BTreeSet;

    fn record(booking: &str, container: &str) -> BookingRecord {
        BookingRecord {
            booking: CellValue::String(booking.to_string()),
            container: container.to_string(),
            remark: CellValue::Empty,
            remark_cs: CellValue::Empty,
            port: CellValue::String("KRPUS".to_string()),
        }
    }

    #[test]
    fn test_rows_sharing_booking_share_fill() {
        let records = vec![
            record("BK1", "MSCU1234567"),
            record("BK2", "TGHU7654321"),
            record("BK1", "FCIU0000001"),
        ];
        let keys: BTreeSet<String> = records.iter().map(|r| r.booking_key()).collect();
        let palette = ColorAssigner::new(180, 255, Some(3)).assign(&keys);

        let sheet = build_report_sheet("Data", &records, &palette);
        assert_eq!(sheet.headers, REPORT_HEADERS.to_vec());
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.rows[0][1], CellValue::String("MSCU1234567".to_string()));
        assert!(sheet.row_fills[0].is_some());
        assert_eq!(sheet.row_fills[0], sheet.row_fills[2]);
    }

    #[test]
    fn test_summary_sheet_rows() {
        let summary = MergeSummary {
            total_bookings: 4,
            total_containers: 9,
            files_processed: 2,
            skipped_files: vec!["b.xlsx".to_string()],
        };
        let sheet = build_summary_sheet("Summary", &summary, Local::now());

        assert_eq!(sheet.name, "Summary");
        assert_eq!(sheet.rows[0].1, CellValue::Number(4.0));
        assert_eq!(sheet.rows[1].1, CellValue::Number(9.0));
        assert_eq!(sheet.rows[2].1, CellValue::Number(2.0));
        assert_eq!(sheet.rows[3].1, CellValue::Number(1.0));
    }
}
