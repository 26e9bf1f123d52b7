//! Shared report content model.
//!
//! One logical document feeds every renderer backend. Row ordering and all
//! numeric values are decided here, once; the backends only lay them out.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{status, AttendanceRecord, AttendanceStatus, SchoolInfo, Student};

use super::aggregate::{
    self, StatusPercentages, StatusTotals, StudentAttendanceSummary,
};
use super::filter::ReportFilter;
use super::ReportKind;

/// Cell value in a report table.
///
/// Numbers stay typed until a backend writes them, so every backend emits
/// the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum Cell {
    Text(String),
    Count(u32),
    Percent(u8),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Backend-neutral display form.
    pub fn display(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Count(value) => value.to_string(),
            Self::Percent(value) => format!("{value}%"),
        }
    }
}

/// Column header plus fixed layout widths for the paged backends.
///
/// PDF widths are millimetres and, per report kind, sum below the
/// printable page width; spreadsheet widths are character units.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSpec {
    pub title: String,
    pub width_mm: f32,
    pub width_chars: f64,
}

impl ColumnSpec {
    fn new(title: &str, width_mm: f32, width_chars: f64) -> Self {
        Self {
            title: title.to_string(),
            width_mm,
            width_chars,
        }
    }
}

/// Page orientation for the document backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            _ => Err(format!("unknown orientation '{s}' (expected portrait or landscape)")),
        }
    }
}

/// Page size for the document backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// Portrait dimensions in millimetres.
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            Self::A4 => (210.0, 297.0),
            Self::Letter => (215.9, 279.4),
        }
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a4" | "A4" => Ok(Self::A4),
            "letter" | "Letter" => Ok(Self::Letter),
            _ => Err(format!("unknown page size '{s}' (expected a4 or letter)")),
        }
    }
}

/// Render-time options carried on the document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RenderOptions {
    pub orientation: Orientation,
    pub page_size: PageSize,
    pub show_charts: bool,
    /// When false, group reports keep totals and top-3 blocks but skip the
    /// per-student rows.
    pub show_details: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            page_size: PageSize::default(),
            show_charts: true,
            show_details: true,
        }
    }
}

impl RenderOptions {
    /// Oriented page dimensions in millimetres.
    pub fn page_dimensions_mm(&self) -> (f32, f32) {
        let (w, h) = self.page_size.dimensions_mm();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Aggregate block shown on chart-bearing reports.
#[derive(Debug, Clone, Serialize)]
pub struct ChartBlock {
    pub title: String,
    pub totals: StatusTotals,
    pub percentages: StatusPercentages,
}

/// One entry of a top-3 sub-table.
#[derive(Debug, Clone, Serialize)]
pub struct TopEntry {
    pub name: String,
    pub class: String,
    pub count: u32,
}

/// Top-3 students for one canonical status.
#[derive(Debug, Clone, Serialize)]
pub struct TopThree {
    pub status_label: String,
    pub entries: Vec<TopEntry>,
}

/// Two-signatory block with place/date stamp.
#[derive(Debug, Clone, Serialize)]
pub struct SignatureBlock {
    pub place: String,
    pub date: String,
    pub principal_name: String,
    pub principal_nip: String,
    pub admin_label: String,
}

/// The complete logical report; every backend renders exactly this.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    pub kind: ReportKind,
    pub school: SchoolInfo,
    pub title: String,
    /// Period line, e.g. "01-05-2025 s.d. 31-05-2025".
    pub period: String,
    /// Non-date filter restrictions, when any.
    pub filter_note: Option<String>,
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Vec<Cell>>,
    pub totals: StatusTotals,
    pub percentages: StatusPercentages,
    pub totals_row: Vec<Cell>,
    pub percent_row: Option<Vec<Cell>>,
    pub chart: Option<ChartBlock>,
    pub top_three: Vec<TopThree>,
    pub signature: SignatureBlock,
    pub options: RenderOptions,
}

/// Build the logical document for one report request.
pub fn build_document(
    kind: ReportKind,
    records: &[AttendanceRecord],
    roster: &[Student],
    filter: &ReportFilter,
    school: &SchoolInfo,
    generated_on: NaiveDate,
    options: RenderOptions,
) -> ReportDocument {
    let signature = SignatureBlock {
        place: school.place.clone(),
        date: generated_on.format("%d-%m-%Y").to_string(),
        principal_name: school.principal_name.clone(),
        principal_nip: school.principal_nip.clone(),
        admin_label: "Administrator Sistem".to_string(),
    };

    let mut doc = ReportDocument {
        kind,
        school: school.clone(),
        title: kind.title().to_string(),
        period: filter.date_range.describe(),
        filter_note: filter.describe_restrictions(),
        columns: columns_for(kind),
        rows: Vec::new(),
        totals: StatusTotals::default(),
        percentages: StatusPercentages::default(),
        totals_row: Vec::new(),
        percent_row: None,
        chart: None,
        top_three: Vec::new(),
        signature,
        options,
    };

    match kind {
        ReportKind::ByClass | ReportKind::Group | ReportKind::Custom => {
            let summaries = aggregate::summarize_students(records, filter, roster);
            build_summary_body(&mut doc, &summaries, filter);
        }
        ReportKind::ByStudent => build_detail_body(&mut doc, records, filter),
        ReportKind::Monthly => build_monthly_body(&mut doc, records, filter),
    }

    doc
}

fn build_summary_body(
    doc: &mut ReportDocument,
    summaries: &[StudentAttendanceSummary],
    filter: &ReportFilter,
) {
    let include_rows = doc.options.show_details || doc.kind != ReportKind::Group;
    if include_rows {
        doc.rows = summaries
            .iter()
            .enumerate()
            .map(|(idx, summary)| {
                vec![
                    Cell::Count(idx as u32 + 1),
                    Cell::text(&summary.nisn),
                    Cell::text(&summary.name),
                    Cell::text(&summary.class),
                    Cell::Count(summary.hadir),
                    Cell::Count(summary.sakit),
                    Cell::Count(summary.izin),
                    Cell::Count(summary.alpha),
                    Cell::Count(summary.total()),
                ]
            })
            .collect();
    }

    doc.totals = aggregate::status_totals(summaries);
    doc.percentages = doc.totals.percentages();

    doc.totals_row = vec![
        Cell::text(""),
        Cell::text(""),
        Cell::text("Total"),
        Cell::text(""),
        Cell::Count(doc.totals.hadir),
        Cell::Count(doc.totals.sakit),
        Cell::Count(doc.totals.izin),
        Cell::Count(doc.totals.alpha),
        Cell::Count(doc.totals.total()),
    ];
    doc.percent_row = Some(vec![
        Cell::text(""),
        Cell::text(""),
        Cell::text("Persentase"),
        Cell::text(""),
        Cell::Percent(doc.percentages.hadir),
        Cell::Percent(doc.percentages.sakit),
        Cell::Percent(doc.percentages.izin),
        Cell::Percent(doc.percentages.alpha),
        Cell::text(""),
    ]);

    if doc.options.show_charts && doc.kind.has_chart() {
        doc.chart = Some(ChartBlock {
            title: "Rekapitulasi Status Kehadiran".to_string(),
            totals: doc.totals,
            percentages: doc.percentages,
        });
    }

    if doc.kind.has_top_three() {
        let statuses: &[AttendanceStatus] = if filter.statuses.is_empty() {
            &AttendanceStatus::ALL
        } else {
            &filter.statuses
        };
        doc.top_three = statuses
            .iter()
            .map(|&status| TopThree {
                status_label: status.label().to_string(),
                entries: aggregate::top_by_status(summaries, status, 3)
                    .into_iter()
                    .map(|summary| TopEntry {
                        count: summary.count(status),
                        name: summary.name,
                        class: summary.class,
                    })
                    .collect(),
            })
            .collect();
    }
}

fn build_detail_body(doc: &mut ReportDocument, records: &[AttendanceRecord], filter: &ReportFilter) {
    let mut kept = filter.apply(records);
    kept.sort_by(|a, b| (&a.date, &a.time, &a.id).cmp(&(&b.date, &b.time, &b.id)));

    doc.rows = kept
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            vec![
                Cell::Count(idx as u32 + 1),
                Cell::text(&record.date),
                Cell::text(&record.time),
                // Unknown status tokens render verbatim.
                Cell::text(status::display_label(&record.status)),
                Cell::text(record.note.as_deref().unwrap_or("")),
            ]
        })
        .collect();

    doc.totals = aggregate::record_totals(records, filter);
    doc.percentages = doc.totals.percentages();
    doc.totals_row = vec![
        Cell::text(""),
        Cell::text("Total"),
        Cell::text(""),
        Cell::Count(kept.len() as u32),
        Cell::text(""),
    ];
}

fn build_monthly_body(doc: &mut ReportDocument, records: &[AttendanceRecord], filter: &ReportFilter) {
    let months = aggregate::monthly_totals(records, filter);

    doc.rows = months
        .iter()
        .enumerate()
        .map(|(idx, month)| {
            vec![
                Cell::Count(idx as u32 + 1),
                Cell::text(&month.month),
                Cell::Count(month.totals.hadir),
                Cell::Count(month.totals.sakit),
                Cell::Count(month.totals.izin),
                Cell::Count(month.totals.alpha),
                Cell::Count(month.totals.total()),
            ]
        })
        .collect();

    let mut totals = StatusTotals::default();
    for month in &months {
        totals.hadir += month.totals.hadir;
        totals.sakit += month.totals.sakit;
        totals.izin += month.totals.izin;
        totals.alpha += month.totals.alpha;
    }
    doc.totals = totals;
    doc.percentages = totals.percentages();

    doc.totals_row = vec![
        Cell::text(""),
        Cell::text("Total"),
        Cell::Count(totals.hadir),
        Cell::Count(totals.sakit),
        Cell::Count(totals.izin),
        Cell::Count(totals.alpha),
        Cell::Count(totals.total()),
    ];
    doc.percent_row = Some(vec![
        Cell::text(""),
        Cell::text("Persentase"),
        Cell::Percent(doc.percentages.hadir),
        Cell::Percent(doc.percentages.sakit),
        Cell::Percent(doc.percentages.izin),
        Cell::Percent(doc.percentages.alpha),
        Cell::text(""),
    ]);
}

fn columns_for(kind: ReportKind) -> Vec<ColumnSpec> {
    match kind {
        ReportKind::ByClass | ReportKind::Group | ReportKind::Custom => vec![
            ColumnSpec::new("No", 10.0, 5.0),
            ColumnSpec::new("NISN", 26.0, 14.0),
            ColumnSpec::new("Nama Siswa", 44.0, 30.0),
            ColumnSpec::new("Kelas", 16.0, 10.0),
            ColumnSpec::new("Hadir", 14.0, 8.0),
            ColumnSpec::new("Sakit", 14.0, 8.0),
            ColumnSpec::new("Izin", 14.0, 8.0),
            ColumnSpec::new("Alpha", 14.0, 8.0),
            ColumnSpec::new("Total", 16.0, 9.0),
        ],
        ReportKind::ByStudent => vec![
            ColumnSpec::new("No", 10.0, 5.0),
            ColumnSpec::new("Tanggal", 26.0, 12.0),
            ColumnSpec::new("Waktu", 20.0, 9.0),
            ColumnSpec::new("Status", 26.0, 12.0),
            ColumnSpec::new("Keterangan", 86.0, 40.0),
        ],
        ReportKind::Monthly => vec![
            ColumnSpec::new("No", 10.0, 5.0),
            ColumnSpec::new("Bulan", 34.0, 14.0),
            ColumnSpec::new("Hadir", 20.0, 8.0),
            ColumnSpec::new("Sakit", 20.0, 8.0),
            ColumnSpec::new("Izin", 20.0, 8.0),
            ColumnSpec::new("Alpha", 20.0, 8.0),
            ColumnSpec::new("Total", 22.0, 9.0),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn school() -> SchoolInfo {
        SchoolInfo {
            name: "SMA Negeri 1".to_string(),
            address: "Jl. Merdeka 1".to_string(),
            npsn: "20100001".to_string(),
            principal_name: "Dra. Sri Handayani".to_string(),
            principal_nip: "196501011990032001".to_string(),
            place: "Bandung".to_string(),
        }
    }

    fn roster() -> Vec<Student> {
        vec![
            Student {
                id: "s1".to_string(),
                name: "Budi Santoso".to_string(),
                nisn: "0051".to_string(),
                class: "X-A".to_string(),
            },
            Student {
                id: "s2".to_string(),
                name: "Citra Lestari".to_string(),
                nisn: "0052".to_string(),
                class: "X-A".to_string(),
            },
        ]
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

    fn may_filter() -> ReportFilter {
        ReportFilter::for_range(date("2025-05-01"), date("2025-05-31"))
    }

    #[test]
    fn test_class_document_rows_and_totals() {
        let records = vec![
            record("r1", "s1", "2025-05-01", "hadir"),
            record("r2", "s1", "2025-05-02", "sakit"),
            record("r3", "s2", "2025-05-01", "hadir"),
        ];

        let doc = build_document(
            ReportKind::ByClass,
            &records,
            &roster(),
            &may_filter(),
            &school(),
            date("2025-06-01"),
            RenderOptions::default(),
        );

        assert_eq!(doc.rows.len(), 2);
        assert_eq!(doc.columns.len(), 9);
        assert_eq!(doc.rows[0][2], Cell::text("Budi Santoso"));
        assert_eq!(doc.rows[0][4], Cell::Count(1)); // hadir
        assert_eq!(doc.totals.hadir, 2);
        assert_eq!(doc.totals_row[8], Cell::Count(3));
        assert!(doc.percent_row.is_some());
        assert_eq!(doc.top_three.len(), 4);
    }

    #[test]
    fn test_empty_result_builds_well_formed_document() {
        let doc = build_document(
            ReportKind::ByClass,
            &[],
            &[],
            &may_filter(),
            &school(),
            date("2025-06-01"),
            RenderOptions::default(),
        );

        assert!(doc.rows.is_empty());
        assert_eq!(doc.totals.total(), 0);
        assert_eq!(doc.percentages, StatusPercentages::default());
        assert_eq!(doc.totals_row[8], Cell::Count(0));
    }

    #[test]
    fn test_detail_document_unknown_status_verbatim() {
        let records = vec![
            record("r1", "s1", "2025-05-02", "terlambat"),
            record("r2", "s1", "2025-05-01", "hadir"),
        ];
        let mut filter = may_filter();
        filter.students = vec!["s1".to_string()];

        let doc = build_document(
            ReportKind::ByStudent,
            &records,
            &[],
            &filter,
            &school(),
            date("2025-06-01"),
            RenderOptions::default(),
        );

        // Rows sorted by date; unknown token passes through verbatim.
        assert_eq!(doc.rows.len(), 2);
        assert_eq!(doc.rows[0][3], Cell::text("Hadir"));
        assert_eq!(doc.rows[1][3], Cell::text("terlambat"));
        // Unknown token lands in no counter.
        assert_eq!(doc.totals.total(), 1);
        assert_eq!(doc.totals_row[3], Cell::Count(2));
    }

    #[test]
    fn test_monthly_document() {
        let filter = ReportFilter::for_range(date("2025-04-01"), date("2025-05-31"));
        let records = vec![
            record("r1", "s1", "2025-04-10", "hadir"),
            record("r2", "s1", "2025-05-10", "izin"),
        ];

        let doc = build_document(
            ReportKind::Monthly,
            &records,
            &[],
            &filter,
            &school(),
            date("2025-06-01"),
            RenderOptions::default(),
        );

        assert_eq!(doc.rows.len(), 2);
        assert_eq!(doc.rows[0][1], Cell::text("2025-04"));
        assert_eq!(doc.totals_row[6], Cell::Count(2));
    }

    #[test]
    fn test_group_without_details_keeps_totals() {
        let records = vec![record("r1", "s1", "2025-05-01", "hadir")];
        let options = RenderOptions {
            show_details: false,
            ..Default::default()
        };

        let doc = build_document(
            ReportKind::Group,
            &records,
            &roster(),
            &may_filter(),
            &school(),
            date("2025-06-01"),
            options,
        );

        assert!(doc.rows.is_empty());
        assert_eq!(doc.totals.hadir, 1);
        assert!(!doc.top_three.is_empty());
    }

    #[test]
    fn test_chart_only_on_chart_kinds() {
        let records = vec![record("r1", "s1", "2025-05-01", "hadir")];

        let group = build_document(
            ReportKind::Group,
            &records,
            &roster(),
            &may_filter(),
            &school(),
            date("2025-06-01"),
            RenderOptions::default(),
        );
        assert!(group.chart.is_some());

        let monthly = build_document(
            ReportKind::Monthly,
            &records,
            &[],
            &may_filter(),
            &school(),
            date("2025-06-01"),
            RenderOptions::default(),
        );
        assert!(monthly.chart.is_none());
    }

    #[test]
    fn test_pdf_column_widths_fit_portrait_page() {
        for kind in [
            ReportKind::ByClass,
            ReportKind::ByStudent,
            ReportKind::Group,
            ReportKind::Custom,
            ReportKind::Monthly,
        ] {
            let total: f32 = columns_for(kind).iter().map(|c| c.width_mm).sum();
            // Narrowest supported page is A4 portrait with 14mm margins.
            assert!(total < 182.0, "{kind:?} columns overflow the printable width");
        }
    }
}
