//! Report generation pipeline: filter, aggregate, document, render.

pub mod aggregate;
pub mod document;
pub mod filename;
pub mod filter;
pub mod render;


use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::models::SchoolInfo;
use crate::store::{AttendanceStore, RecordQuery};

use document::{build_document, RenderOptions};
use filter::ReportFilter;
use render::{RendererSet, ReportFormat};

/// Report variants, each with its own column layout and artifact label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    /// Per-student summary rows for one or more classes.
    ByClass,
    /// Detail rows for a single student.
    ByStudent,
    /// Roster (rombel) summary with totals, chart, and top-3 blocks.
    Group,
    /// Arbitrary filter combination.
    Custom,
    /// Per-month totals over the date range.
    Monthly,
}

impl ReportKind {
    /// Human-readable, space-free artifact label.
    pub fn label(self) -> &'static str {
        match self {
            Self::ByClass => "LaporanAbsensiKelas",
            Self::ByStudent => "LaporanAbsensiSiswa",
            Self::Group => "LaporanAbsensiRombel",
            Self::Custom => "LaporanAbsensiKustom",
            Self::Monthly => "LaporanAbsensiBulanan",
        }
    }

    /// Rendered report title.
    pub fn title(self) -> &'static str {
        match self {
            Self::ByClass => "Laporan Absensi per Kelas",
            Self::ByStudent => "Laporan Absensi Siswa",
            Self::Group => "Laporan Absensi Rombongan Belajar",
            Self::Custom => "Laporan Absensi Kustom",
            Self::Monthly => "Rekapitulasi Absensi Bulanan",
        }
    }

    /// True when the report carries the aggregate chart block.
    pub fn has_chart(self) -> bool {
        matches!(self, Self::ByClass | Self::Group)
    }

    /// True when the report carries top-3 sub-tables.
    pub fn has_top_three(self) -> bool {
        matches!(self, Self::ByClass | Self::Group)
    }

    /// True when building the report needs the student roster.
    fn needs_roster(self) -> bool {
        matches!(self, Self::ByClass | Self::Group | Self::Custom)
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ByClass => "class",
            Self::ByStudent => "student",
            Self::Group => "group",
            Self::Custom => "custom",
            Self::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "class" => Ok(Self::ByClass),
            "student" => Ok(Self::ByStudent),
            "group" | "rombel" => Ok(Self::Group),
            "custom" => Ok(Self::Custom),
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!(
                "unknown report kind '{s}' (expected class, student, group, custom, or monthly)"
            )),
        }
    }
}

/// One report generation request.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub kind: ReportKind,
    pub filter: ReportFilter,
    pub format: ReportFormat,
    pub options: RenderOptions,
}

impl ReportRequest {
    /// Store query with the single-valued filters pushed down.
    ///
    /// Status narrowing stays local: the store matches raw tokens while
    /// the filter is canonical, so a pushdown would drop records written
    /// with the other vocabulary.
    fn to_query(&self, school_id: &str) -> RecordQuery {
        let (start_date, end_date) = self.filter.date_range.iso_bounds();

        RecordQuery {
            school_id: school_id.to_string(),
            start_date,
            end_date,
            class: match self.filter.classes.as_slice() {
                [class] => Some(class.clone()),
                _ => None,
            },
            student_id: match self.filter.students.as_slice() {
                [student] => Some(student.clone()),
                _ => None,
            },
        }
    }
}

/// A finished report artifact.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub file_name: String,
    pub format: ReportFormat,
    pub bytes: Vec<u8>,
    pub row_count: usize,
}

impl GeneratedReport {
    /// Get summary message.
    pub fn summary(&self) -> String {
        format!(
            "Generated {name}: {rows} rows, {size} bytes",
            name = self.file_name,
            rows = self.row_count,
            size = self.bytes.len()
        )
    }
}

/// Report generation service.
///
/// One request runs to completion: query, aggregate, build, render, name.
/// There is no retry and no partial artifact on failure; an empty result
/// is not a failure and produces a valid zero-row report.
pub struct ReportService {
    store: Arc<dyn AttendanceStore>,
    school_id: String,
    school: SchoolInfo,
    renderers: RendererSet,
    timestamp_in_filename: bool,
}

impl ReportService {
    /// Create a new report service.
    pub fn new(
        store: Arc<dyn AttendanceStore>,
        school_id: String,
        school: SchoolInfo,
        timestamp_in_filename: bool,
    ) -> Result<Self> {
        Ok(Self {
            store,
            school_id,
            school,
            renderers: RendererSet::new()?,
            timestamp_in_filename,
        })
    }

    /// Generate one report artifact.
    pub async fn generate(&self, request: &ReportRequest) -> Result<GeneratedReport> {
        info!(
            "Generating {kind} report ({format}) for {period}",
            kind = request.kind,
            format = request.format,
            period = request.filter.date_range.describe()
        );

        let query = request.to_query(&self.school_id);
        let records = self.store.fetch_records(&query).await?;

        let roster = if request.kind.needs_roster() {
            let class = match request.filter.classes.as_slice() {
                [class] => Some(class.as_str()),
                _ => None,
            };
            self.store.fetch_roster(&self.school_id, class).await?
        } else {
            Vec::new()
        };

        let now = Local::now();
        let doc = build_document(
            request.kind,
            &records,
            &roster,
            &request.filter,
            &self.school,
            now.date_naive(),
            request.options,
        );

        let bytes = self.renderers.render(&doc, request.format)?;
        let file_name = filename::file_name(
            request.kind.label(),
            now.naive_local(),
            self.timestamp_in_filename,
            request.format,
        );

        let report = GeneratedReport {
            file_name,
            format: request.format,
            bytes,
            row_count: doc.rows.len(),
        };
        info!("{}", report.summary());

        Ok(report)
    }
}
