//! Attendance aggregation: per-student counters, totals, percentages.
//!
//! Everything here is a pure function of (records, filter, roster) with no
//! I/O and no hidden state. Summaries are recomputed from scratch on every
//! request; correctness over the recomputation is the guarantee, not
//! caching.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{AttendanceRecord, AttendanceStatus, Student};

use super::filter::ReportFilter;

/// Per-student status counters for one report request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentAttendanceSummary {
    pub student_id: String,
    pub name: String,
    pub nisn: String,
    pub class: String,
    pub hadir: u32,
    pub sakit: u32,
    pub izin: u32,
    pub alpha: u32,
}

impl StudentAttendanceSummary {
    fn for_student(student: &Student) -> Self {
        Self {
            student_id: student.id.clone(),
            name: student.name.clone(),
            nisn: student.nisn.clone(),
            class: student.class.clone(),
            hadir: 0,
            sakit: 0,
            izin: 0,
            alpha: 0,
        }
    }

    /// Sum of the four status counters.
    pub fn total(&self) -> u32 {
        self.hadir + self.sakit + self.izin + self.alpha
    }

    /// Counter for one canonical status.
    pub fn count(&self, status: AttendanceStatus) -> u32 {
        match status {
            AttendanceStatus::Present => self.hadir,
            AttendanceStatus::Sick => self.sakit,
            AttendanceStatus::Permitted => self.izin,
            AttendanceStatus::Absent => self.alpha,
        }
    }

    fn tally(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.hadir += 1,
            AttendanceStatus::Sick => self.sakit += 1,
            AttendanceStatus::Permitted => self.izin += 1,
            AttendanceStatus::Absent => self.alpha += 1,
        }
    }
}

/// Status counters summed across students.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTotals {
    pub hadir: u32,
    pub sakit: u32,
    pub izin: u32,
    pub alpha: u32,
}

impl StatusTotals {
    pub fn total(&self) -> u32 {
        self.hadir + self.sakit + self.izin + self.alpha
    }

    pub fn count(&self, status: AttendanceStatus) -> u32 {
        match status {
            AttendanceStatus::Present => self.hadir,
            AttendanceStatus::Sick => self.sakit,
            AttendanceStatus::Permitted => self.izin,
            AttendanceStatus::Absent => self.alpha,
        }
    }

    pub fn tally(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.hadir += 1,
            AttendanceStatus::Sick => self.sakit += 1,
            AttendanceStatus::Permitted => self.izin += 1,
            AttendanceStatus::Absent => self.alpha += 1,
        }
    }

    /// Whole percentages of each status.
    ///
    /// An empty total is treated as 1 so the result is all zeros rather
    /// than NaN.
    pub fn percentages(&self) -> StatusPercentages {
        let total = f64::from(self.total().max(1));
        let pct = |count: u32| ((f64::from(count) / total) * 100.0).round() as u8;

        StatusPercentages {
            hadir: pct(self.hadir),
            sakit: pct(self.sakit),
            izin: pct(self.izin),
            alpha: pct(self.alpha),
        }
    }
}

/// Whole percentages per status, 0-100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPercentages {
    pub hadir: u8,
    pub sakit: u8,
    pub izin: u8,
    pub alpha: u8,
}

impl StatusPercentages {
    pub fn get(&self, status: AttendanceStatus) -> u8 {
        match status {
            AttendanceStatus::Present => self.hadir,
            AttendanceStatus::Sick => self.sakit,
            AttendanceStatus::Permitted => self.izin,
            AttendanceStatus::Absent => self.alpha,
        }
    }
}

/// Status counters for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    /// `yyyy-MM` month key.
    pub month: String,
    pub totals: StatusTotals,
}

/// Per-student summaries in roster order.
///
/// One zeroed bucket per roster student; each filter-surviving record
/// increments its student's counter for its normalized status. Records
/// with an unknown status token survive an empty status filter but
/// increment no counter. Records whose `student_id` has no roster entry
/// are excluded from the output; the dropped count is logged so the
/// exclusion stays visible to operators.
pub fn summarize_students(
    records: &[AttendanceRecord],
    filter: &ReportFilter,
    roster: &[Student],
) -> Vec<StudentAttendanceSummary> {
    let index: HashMap<&str, usize> = roster
        .iter()
        .enumerate()
        .map(|(slot, student)| (student.id.as_str(), slot))
        .collect();

    let mut summaries: Vec<StudentAttendanceSummary> =
        roster.iter().map(StudentAttendanceSummary::for_student).collect();

    let mut dropped = 0usize;
    for record in filter.apply(records) {
        let Some(&slot) = index.get(record.student_id.as_str()) else {
            dropped += 1;
            continue;
        };
        if let Some(status) = record.normalized_status() {
            summaries[slot].tally(status);
        }
    }

    if dropped > 0 {
        warn!("{dropped} attendance records reference students outside the roster; excluded from summaries");
    }

    summaries
}

/// Sum counters across summaries.
pub fn status_totals(summaries: &[StudentAttendanceSummary]) -> StatusTotals {
    let mut totals = StatusTotals::default();
    for summary in summaries {
        totals.hadir += summary.hadir;
        totals.sakit += summary.sakit;
        totals.izin += summary.izin;
        totals.alpha += summary.alpha;
    }
    totals
}

/// Status totals of the filter-surviving records themselves.
///
/// Used by detail reports, where no roster is in play.
pub fn record_totals(records: &[AttendanceRecord], filter: &ReportFilter) -> StatusTotals {
    let mut totals = StatusTotals::default();
    for record in filter.apply(records) {
        if let Some(status) = record.normalized_status() {
            totals.tally(status);
        }
    }
    totals
}

/// Status totals per `yyyy-MM` month, ascending month order.
pub fn monthly_totals(records: &[AttendanceRecord], filter: &ReportFilter) -> Vec<MonthlyTotals> {
    let mut by_month: BTreeMap<String, StatusTotals> = BTreeMap::new();
    for record in filter.apply(records) {
        let slot = by_month.entry(record.month_key().to_string()).or_default();
        if let Some(status) = record.normalized_status() {
            slot.tally(status);
        }
    }

    by_month
        .into_iter()
        .map(|(month, totals)| MonthlyTotals { month, totals })
        .collect()
}

/// First `n` summaries after a stable descending sort on one status counter.
///
/// Ties keep their original relative order; there is deliberately no
/// secondary sort key.
pub fn top_by_status(
    summaries: &[StudentAttendanceSummary],
    status: AttendanceStatus,
    n: usize,
) -> Vec<StudentAttendanceSummary> {
    let mut ranked = summaries.to_vec();
    ranked.sort_by(|a, b| b.count(status).cmp(&a.count(status)));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn may_filter() -> ReportFilter {
        ReportFilter::for_range(date("2025-05-01"), date("2025-05-31"))
    }

    fn student(id: &str, name: &str, class: &str) -> Student {
        Student {
            id: id.to_string(),
            name: name.to_string(),
            nisn: format!("00{id}"),
            class: class.to_string(),
        }
    }

    fn record(id: &str, student: &str, day: &str, status: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: id.to_string(),
            student_id: student.to_string(),
            student_name: "Siswa".to_string(),
            class: "X-A".to_string(),
            date: day.to_string(),
            time: "07:00".to_string(),
            status: status.to_string(),
            note: None,
        }
    }

    #[test]
    fn test_mixed_vocabulary_counts() {
        let roster = vec![student("s1", "Budi", "X-A")];
        let records = vec![
            record("r1", "s1", "2025-05-01", "hadir"),
            record("r2", "s1", "2025-05-02", "present"),
            record("r3", "s1", "2025-05-03", "sakit"),
        ];

        let summaries = summarize_students(&records, &may_filter(), &roster);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].hadir, 2);
        assert_eq!(summaries[0].sakit, 1);
        assert_eq!(summaries[0].izin, 0);
        assert_eq!(summaries[0].alpha, 0);
        assert_eq!(summaries[0].total(), 3);
    }

    #[test]
    fn test_empty_records_yield_zero_summary() {
        let roster = vec![student("s1", "Budi", "X-A")];

        let summaries = summarize_students(&[], &may_filter(), &roster);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].total(), 0);

        let percentages = status_totals(&summaries).percentages();
        assert_eq!(percentages, StatusPercentages::default());
    }

    #[test]
    fn test_counters_partition_filtered_records() {
        let roster = vec![student("s1", "Budi", "X-A"), student("s2", "Citra", "X-A")];
        let records = vec![
            record("r1", "s1", "2025-05-01", "hadir"),
            record("r2", "s1", "2025-05-02", "izin"),
            record("r3", "s2", "2025-05-02", "alpha"),
            record("r4", "s2", "2025-05-03", "absent"),
            record("r5", "s2", "2025-06-01", "hadir"), // outside range
        ];

        let filter = may_filter();
        let summaries = summarize_students(&records, &filter, &roster);
        let matched = filter.apply(&records).len();

        let counted: u32 = summaries.iter().map(|s| s.total()).sum();
        assert_eq!(counted as usize, matched);
    }

    #[test]
    fn test_unknown_status_lands_in_no_bucket() {
        let roster = vec![student("s1", "Budi", "X-A")];
        let records = vec![
            record("r1", "s1", "2025-05-01", "terlambat"),
            record("r2", "s1", "2025-05-02", "hadir"),
        ];

        let summaries = summarize_students(&records, &may_filter(), &roster);
        assert_eq!(summaries[0].hadir, 1);
        assert_eq!(summaries[0].total(), 1);
    }

    #[test]
    fn test_rosterless_records_are_dropped() {
        let roster = vec![student("s1", "Budi", "X-A")];
        let records = vec![
            record("r1", "s1", "2025-05-01", "hadir"),
            record("r2", "ghost", "2025-05-01", "hadir"),
        ];

        let summaries = summarize_students(&records, &may_filter(), &roster);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].total(), 1);
    }

    #[test]
    fn test_summaries_follow_roster_order() {
        let roster = vec![
            student("s3", "Citra", "X-A"),
            student("s1", "Budi", "X-A"),
            student("s2", "Agus", "X-A"),
        ];

        let summaries = summarize_students(&[], &may_filter(), &roster);
        let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Citra", "Budi", "Agus"]);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let roster = vec![student("s1", "Budi", "X-A")];
        let records = vec![
            record("r1", "s1", "2025-05-01", "hadir"),
            record("r2", "s1", "2025-05-02", "sakit"),
        ];
        let filter = may_filter();

        let first = summarize_students(&records, &filter, &roster);
        let second = summarize_students(&records, &filter, &roster);
        assert_eq!(first, second);
    }

    #[test]
    fn test_percentages_sum_and_bounds() {
        let totals = StatusTotals { hadir: 5, sakit: 1, izin: 1, alpha: 0 };
        let percentages = totals.percentages();

        for status in AttendanceStatus::ALL {
            assert!(percentages.get(status) <= 100);
        }

        let sum: u32 = AttendanceStatus::ALL
            .iter()
            .map(|&s| u32::from(percentages.get(s)))
            .sum();
        assert!((99..=101).contains(&sum));
    }

    #[test]
    fn test_zero_total_percentages_are_zero() {
        let percentages = StatusTotals::default().percentages();
        assert_eq!(percentages, StatusPercentages::default());
    }

    #[test]
    fn test_monthly_totals_ascending() {
        let filter = ReportFilter::for_range(date("2025-04-01"), date("2025-06-30"));
        let records = vec![
            record("r1", "s1", "2025-06-02", "hadir"),
            record("r2", "s1", "2025-04-10", "sakit"),
            record("r3", "s1", "2025-04-11", "hadir"),
            record("r4", "s1", "2025-05-20", "izin"),
        ];

        let months = monthly_totals(&records, &filter);
        let keys: Vec<&str> = months.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(keys, ["2025-04", "2025-05", "2025-06"]);
        assert_eq!(months[0].totals.hadir, 1);
        assert_eq!(months[0].totals.sakit, 1);
        assert_eq!(months[1].totals.izin, 1);
    }

    #[test]
    fn test_top_by_status_stable_ties() {
        let roster = vec![
            student("s1", "Budi", "X-A"),
            student("s2", "Citra", "X-A"),
            student("s3", "Agus", "X-A"),
            student("s4", "Dewi", "X-A"),
        ];
        let records = vec![
            record("r1", "s2", "2025-05-01", "alpha"),
            record("r2", "s2", "2025-05-02", "alpha"),
            record("r3", "s1", "2025-05-01", "alpha"),
            record("r4", "s3", "2025-05-01", "alpha"),
            record("r5", "s4", "2025-05-01", "alpha"),
        ];

        let summaries = summarize_students(&records, &may_filter(), &roster);
        let top = top_by_status(&summaries, AttendanceStatus::Absent, 3);

        assert_eq!(top.len(), 3);
        assert_eq!(top[0].name, "Citra");
        // s1, s3, s4 tie at one alpha each; stable sort keeps roster order.
        assert_eq!(top[1].name, "Budi");
        assert_eq!(top[2].name, "Agus");
    }

    #[test]
    fn test_record_totals_for_detail_reports() {
        let records = vec![
            record("r1", "s1", "2025-05-01", "hadir"),
            record("r2", "s1", "2025-05-02", "terlambat"),
            record("r3", "s1", "2025-05-03", "izin"),
        ];

        let totals = record_totals(&records, &may_filter());
        assert_eq!(totals.hadir, 1);
        assert_eq!(totals.izin, 1);
        assert_eq!(totals.total(), 2);
    }
}
