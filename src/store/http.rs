//! HTTP client for the hosted attendance document store.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{AttendanceRecord, Student};

use super::{AttendanceStore, RecordQuery};

/// JSON API client for the attendance collection.
///
/// Authenticates with a bearer token and pushes the date range plus any
/// single-valued class/student/status filter down as query parameters.
pub struct HttpAttendanceStore {
    client: Client,
    base_url: String,
    api_token: String,
}

impl HttpAttendanceStore {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The store URL (e.g., "https://absensi.example.id")
    /// * `api_token` - Bearer token; empty string disables the auth header
    pub fn new(base_url: &str, api_token: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
        })
    }

    fn request(&self, url: &str, params: &[(&str, String)]) -> reqwest::RequestBuilder {
        let mut builder = self.client.get(url).query(params);
        if !self.api_token.is_empty() {
            builder = builder.bearer_auth(&self.api_token);
        }
        builder
    }
}

#[async_trait]
impl AttendanceStore for HttpAttendanceStore {
    async fn fetch_records(&self, query: &RecordQuery) -> Result<Vec<AttendanceRecord>> {
        let url = format!(
            "{base}/v1/schools/{school}/attendance",
            base = self.base_url,
            school = query.school_id
        );

        let mut params: Vec<(&str, String)> = vec![
            ("start", query.start_date.clone()),
            ("end", query.end_date.clone()),
        ];
        if let Some(class) = &query.class {
            params.push(("class", class.clone()));
        }
        if let Some(student_id) = &query.student_id {
            params.push(("studentId", student_id.clone()));
        }

        let response = self.request(&url, &params).send().await?;
        if !response.status().is_success() {
            return Err(AppError::Api {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let wire: Vec<WireRecord> = response.json().await?;
        Ok(wire.into_iter().map(WireRecord::into_record).collect())
    }

    async fn fetch_roster(&self, school_id: &str, class: Option<&str>) -> Result<Vec<Student>> {
        let url = format!(
            "{base}/v1/schools/{school}/students",
            base = self.base_url,
            school = school_id
        );

        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(class) = class {
            params.push(("class", class.to_string()));
        }

        let response = self.request(&url, &params).send().await?;
        if !response.status().is_success() {
            return Err(AppError::Api {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }
}

/// Wire format of one attendance entry.
///
/// The store is not schema-enforced: the free-text note arrives under
/// `note`, `notes`, or `catatan` depending on which capture flow wrote the
/// record. Collapsed into one field here, at the ingestion boundary.
#[derive(Debug, Deserialize)]
struct WireRecord {
    id: String,
    #[serde(rename = "studentId")]
    student_id: String,
    #[serde(rename = "studentName", default)]
    student_name: String,
    #[serde(default)]
    class: String,
    date: String,
    #[serde(default)]
    time: String,
    status: String,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    catatan: Option<String>,
}

impl WireRecord {
    /// First non-blank note alias wins, priority `note` > `notes` > `catatan`.
    fn into_record(self) -> AttendanceRecord {
        let note = [self.note, self.notes, self.catatan]
            .into_iter()
            .flatten()
            .find(|n| !n.trim().is_empty());

        AttendanceRecord {
            id: self.id,
            student_id: self.student_id,
            student_name: self.student_name,
            class: self.class,
            date: self.date,
            time: self.time,
            status: self.status,
            note,
        }
    }
}
