//! In-memory store used by tests and embedders.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AttendanceRecord, Student};

use super::{AttendanceStore, RecordQuery};

/// Vec-backed store with the same pushdown semantics as the HTTP client.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<AttendanceRecord>,
    roster: Vec<Student>,
}

impl MemoryStore {
    pub fn new(records: Vec<AttendanceRecord>, roster: Vec<Student>) -> Self {
        Self { records, roster }
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn fetch_records(&self, query: &RecordQuery) -> Result<Vec<AttendanceRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|record| query.admits(record))
            .cloned()
            .collect())
    }

    async fn fetch_roster(&self, _school_id: &str, class: Option<&str>) -> Result<Vec<Student>> {
        Ok(self
            .roster
            .iter()
            .filter(|student| class.is_none_or(|c| student.class == c))
            .cloned()
            .collect())
    }
}
