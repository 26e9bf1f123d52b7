//! Attendance document store boundary.
//!
//! The store owns nothing here: this subsystem consumes query results and
//! never defines or migrates the remote schema.

mod http;
mod memory;

pub use http::HttpAttendanceStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AttendanceRecord, Student};

/// Query parameters pushed down to the remote store.
///
/// `school_id` and the date bounds are mandatory; the optional fields
/// narrow the result server-side when present. Filtering is re-applied
/// locally either way, so a store that ignores the optional parameters
/// still produces correct reports.
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    pub school_id: String,
    /// Inclusive ISO `yyyy-MM-dd` lower bound.
    pub start_date: String,
    /// Inclusive ISO `yyyy-MM-dd` upper bound.
    pub end_date: String,
    pub class: Option<String>,
    pub student_id: Option<String>,
}

impl RecordQuery {
    /// True when a record satisfies the pushdown predicates.
    pub fn admits(&self, record: &AttendanceRecord) -> bool {
        if record.date < self.start_date || record.date > self.end_date {
            return false;
        }
        if let Some(class) = &self.class
            && &record.class != class
        {
            return false;
        }
        if let Some(student_id) = &self.student_id
            && &record.student_id != student_id
        {
            return false;
        }
        true
    }
}

/// Read-only boundary over the attendance document store.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Fetch attendance records matching the query.
    async fn fetch_records(&self, query: &RecordQuery) -> Result<Vec<AttendanceRecord>>;

    /// Fetch the student roster for a school, optionally scoped to one class.
    async fn fetch_roster(&self, school_id: &str, class: Option<&str>) -> Result<Vec<Student>>;
}
