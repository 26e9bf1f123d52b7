//! Deterministic artifact filename generation.

use chrono::NaiveDateTime;

use super::render::ReportFormat;

/// Build the artifact filename: `<Label>_<yyyyMMdd[_HHmmss]>.<ext>`.
///
/// Pure: the timestamp comes from the caller, so the clock stays out of
/// this module. There is no collision detection; timestamp granularity is
/// the only guard against overwriting concurrent downloads.
pub fn file_name(label: &str, timestamp: NaiveDateTime, with_time: bool, format: ReportFormat) -> String {
    let stamp = if with_time {
        timestamp.format("%Y%m%d_%H%M%S")
    } else {
        timestamp.format("%Y%m%d")
    };

    format!("{label}_{stamp}.{ext}", ext = format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 7)
            .unwrap()
            .and_hms_opt(14, 30, 5)
            .unwrap()
    }

    #[test]
    fn test_date_only_filename() {
        let name = file_name("LaporanAbsensiKelas", timestamp(), false, ReportFormat::Pdf);
        assert_eq!(name, "LaporanAbsensiKelas_20250507.pdf");
    }

    #[test]
    fn test_timestamped_filename() {
        let name = file_name("LaporanAbsensiRombel", timestamp(), true, ReportFormat::Xlsx);
        assert_eq!(name, "LaporanAbsensiRombel_20250507_143005.xlsx");
    }

    #[test]
    fn test_same_inputs_same_name() {
        let a = file_name("LaporanAbsensiSiswa", timestamp(), true, ReportFormat::Html);
        let b = file_name("LaporanAbsensiSiswa", timestamp(), true, ReportFormat::Html);
        assert_eq!(a, b);
    }
}
