//! Attendance record model.

use serde::{Deserialize, Serialize};

use super::status::AttendanceStatus;

/// A single attendance entry as written by the capture flow.
///
/// `student_name` and `class` are snapshot copies taken at write time and
/// may drift from the current roster; drift is accepted, not corrected.
/// `date` stays an ISO `yyyy-MM-dd` string: zero-padded, so lexicographic
/// comparison doubles as the range predicate. `time` is a local clock time
/// for display only, with no timezone semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub class: String,
    pub date: String,
    pub time: String,
    pub status: String,
    pub note: Option<String>,
}

impl AttendanceRecord {
    /// Canonical status, if the raw token maps onto one.
    pub fn normalized_status(&self) -> Option<AttendanceStatus> {
        AttendanceStatus::from_raw(&self.status)
    }

    /// Month key (`yyyy-MM`) of the record date.
    pub fn month_key(&self) -> &str {
        self.date.get(..7).unwrap_or(&self.date)
    }
}
