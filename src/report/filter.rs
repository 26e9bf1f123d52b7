//! Report filter and record predicates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{AttendanceRecord, AttendanceStatus};

/// Inclusive date range.
///
/// `start <= end` is not enforced anywhere; an inverted range simply
/// matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// ISO bounds for lexicographic comparison against record dates.
    pub fn iso_bounds(&self) -> (String, String) {
        (
            self.start.format("%Y-%m-%d").to_string(),
            self.end.format("%Y-%m-%d").to_string(),
        )
    }

    /// Period line used in report headers.
    pub fn describe(&self) -> String {
        format!(
            "{} s.d. {}",
            self.start.format("%d-%m-%Y"),
            self.end.format("%d-%m-%Y")
        )
    }
}

/// Record filter for one report request.
///
/// Empty lists mean "no restriction" (match-all), not "match-none".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub date_range: DateRange,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub students: Vec<String>,
    #[serde(default)]
    pub statuses: Vec<AttendanceStatus>,
}

impl ReportFilter {
    /// Filter restricted only by a date range.
    pub fn for_range(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            date_range: DateRange::new(start, end),
            classes: Vec::new(),
            students: Vec::new(),
            statuses: Vec::new(),
        }
    }

    /// Apply the filter to a record set, preserving input order.
    pub fn apply<'a>(&self, records: &'a [AttendanceRecord]) -> Vec<&'a AttendanceRecord> {
        let (start, end) = self.date_range.iso_bounds();
        records
            .iter()
            .filter(|record| self.matches_with_bounds(record, &start, &end))
            .collect()
    }

    /// True when a record passes every predicate.
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        let (start, end) = self.date_range.iso_bounds();
        self.matches_with_bounds(record, &start, &end)
    }

    fn matches_with_bounds(&self, record: &AttendanceRecord, start: &str, end: &str) -> bool {
        let date = record.date.as_str();
        if date < start || date > end {
            return false;
        }
        if !self.classes.is_empty() && !self.classes.contains(&record.class) {
            return false;
        }
        if !self.students.is_empty() && !self.students.contains(&record.student_id) {
            return false;
        }
        if !self.statuses.is_empty() {
            // A record whose token does not normalize matches only an
            // empty status filter.
            match record.normalized_status() {
                Some(status) => {
                    if !self.statuses.contains(&status) {
                        return false;
                    }
                }
                None => return false,
            }
        }
        true
    }

    /// Short description of the non-date restrictions, for report headers.
    pub fn describe_restrictions(&self) -> Option<String> {
        let mut parts = Vec::new();
        if !self.classes.is_empty() {
            parts.push(format!("Kelas: {}", self.classes.join(", ")));
        }
        if !self.students.is_empty() {
            parts.push(format!("{} siswa terpilih", self.students.len()));
        }
        if !self.statuses.is_empty() {
            let labels: Vec<&str> = self.statuses.iter().map(|s| s.label()).collect();
            parts.push(format!("Status: {}", labels.join(", ")));
        }
        if parts.is_empty() { None } else { Some(parts.join(" | ")) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(id: &str, student: &str, class: &str, day: &str, status: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: id.to_string(),
            student_id: student.to_string(),
            student_name: "Siswa".to_string(),
            class: class.to_string(),
            date: day.to_string(),
            time: "07:00".to_string(),
            status: status.to_string(),
            note: None,
        }
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let filter = ReportFilter::for_range(date("2025-05-01"), date("2025-05-31"));

        assert!(filter.matches(&record("r1", "s1", "X-A", "2025-05-01", "hadir")));
        assert!(filter.matches(&record("r2", "s1", "X-A", "2025-05-31", "hadir")));
        assert!(!filter.matches(&record("r3", "s1", "X-A", "2025-04-30", "hadir")));
        assert!(!filter.matches(&record("r4", "s1", "X-A", "2025-06-01", "hadir")));
    }

    #[test]
    fn test_class_filter_excludes_other_classes() {
        let mut filter = ReportFilter::for_range(date("2025-05-01"), date("2025-05-31"));
        filter.classes = vec!["X".to_string()];

        let records = vec![
            record("r1", "s1", "X", "2025-05-02", "hadir"),
            record("r2", "s2", "Y", "2025-05-02", "hadir"),
        ];

        let kept = filter.apply(&records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].class, "X");
    }

    #[test]
    fn test_empty_sets_match_all() {
        let filter = ReportFilter::for_range(date("2025-05-01"), date("2025-05-31"));

        let records = vec![
            record("r1", "s1", "X", "2025-05-02", "hadir"),
            record("r2", "s2", "Y", "2025-05-03", "sakit"),
            record("r3", "s3", "Z", "2025-05-04", "terlambat"),
        ];

        assert_eq!(filter.apply(&records).len(), 3);
    }

    #[test]
    fn test_status_filter_uses_normalized_status() {
        let mut filter = ReportFilter::for_range(date("2025-05-01"), date("2025-05-31"));
        filter.statuses = vec![AttendanceStatus::Present];

        // Both vocabularies match the canonical status.
        assert!(filter.matches(&record("r1", "s1", "X", "2025-05-02", "hadir")));
        assert!(filter.matches(&record("r2", "s1", "X", "2025-05-02", "present")));
        assert!(!filter.matches(&record("r3", "s1", "X", "2025-05-02", "sakit")));
    }

    #[test]
    fn test_unknown_status_excluded_by_status_filter() {
        let mut filter = ReportFilter::for_range(date("2025-05-01"), date("2025-05-31"));
        filter.statuses = vec![AttendanceStatus::Present, AttendanceStatus::Absent];

        assert!(!filter.matches(&record("r1", "s1", "X", "2025-05-02", "terlambat")));
    }

    #[test]
    fn test_student_filter() {
        let mut filter = ReportFilter::for_range(date("2025-05-01"), date("2025-05-31"));
        filter.students = vec!["s2".to_string()];

        assert!(!filter.matches(&record("r1", "s1", "X", "2025-05-02", "hadir")));
        assert!(filter.matches(&record("r2", "s2", "X", "2025-05-02", "hadir")));
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let filter = ReportFilter::for_range(date("2025-05-31"), date("2025-05-01"));

        assert!(!filter.matches(&record("r1", "s1", "X", "2025-05-15", "hadir")));
    }

    #[test]
    fn test_describe_restrictions() {
        let mut filter = ReportFilter::for_range(date("2025-05-01"), date("2025-05-31"));
        assert_eq!(filter.describe_restrictions(), None);

        filter.classes = vec!["X-A".to_string(), "X-B".to_string()];
        filter.statuses = vec![AttendanceStatus::Sick];
        let description = filter.describe_restrictions().unwrap();
        assert!(description.contains("Kelas: X-A, X-B"));
        assert!(description.contains("Status: Sakit"));
    }
}
