//! Presensi - School attendance statistics and report generation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::Parser;
use presensi as app;

use app::config::{AppConfig, ConfigLoadResult};
use app::models::AttendanceStatus;
use app::report::document::{Orientation, PageSize, RenderOptions};
use app::report::filter::{DateRange, ReportFilter};
use app::report::render::ReportFormat;
use app::report::{ReportKind, ReportRequest, ReportService};
use app::store::HttpAttendanceStore;

/// Generate school attendance reports from the attendance store.
#[derive(Parser)]
#[command(name = "presensi", version)]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Report kind: class, student, group, custom, monthly
    #[arg(long, default_value = "class")]
    kind: ReportKind,

    /// Start date (accepts YYYY-MM-DD, YYYY/M/D, YYYY.M.D)
    #[arg(long)]
    start: String,

    /// End date (inclusive)
    #[arg(long)]
    end: String,

    /// Restrict to a class (repeatable)
    #[arg(long = "class")]
    classes: Vec<String>,

    /// Restrict to a student id (repeatable)
    #[arg(long = "student")]
    students: Vec<String>,

    /// Restrict to a status: hadir, sakit, izin, alpha (repeatable)
    #[arg(long = "status")]
    statuses: Vec<AttendanceStatus>,

    /// Output format: html, pdf, xlsx
    #[arg(long, default_value = "xlsx")]
    format: ReportFormat,

    /// Page orientation override: portrait, landscape
    #[arg(long)]
    orientation: Option<Orientation>,

    /// Page size override: a4, letter
    #[arg(long)]
    page_size: Option<PageSize>,

    /// Skip the aggregate chart block
    #[arg(long)]
    no_charts: bool,

    /// Skip per-student rows on group reports
    #[arg(long)]
    no_details: bool,

    /// Output directory (defaults to the configured one)
    #[arg(long)]
    out: Option<PathBuf>,
}

/// Parse date from multiple formats: "2000-1-1", "2000/1/1", "2000 1 1", "2000.1.1"
fn parse_flexible_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();

    // Split by common separators: - / space .
    let parts: Vec<&str> = input
        .split(['-', '/', ' ', '.'])
        .filter(|s| !s.is_empty())
        .collect();

    if parts.len() != 3 {
        return None;
    }

    let year: i32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let day: u32 = parts[2].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    tracing::info!("Presensi report generator starting...");

    // Determine config path based on mode
    let config_path = if cli.dev {
        tracing::info!("Dev mode: loading config from current directory");
        PathBuf::from("config.toml")
    } else {
        AppConfig::default_path()
    };
    tracing::info!("Config path: {:?}", config_path);

    let config = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => config,
        ConfigLoadResult::Missing => {
            bail!("Config not found at {config_path:?}; create one or run with --dev")
        }
        ConfigLoadResult::Invalid(e) => bail!("Config invalid: {e}"),
    };

    let start = parse_flexible_date(&cli.start)
        .with_context(|| format!("Invalid start date: {}", cli.start))?;
    let end = parse_flexible_date(&cli.end).with_context(|| format!("Invalid end date: {}", cli.end))?;

    let filter = ReportFilter {
        date_range: DateRange::new(start, end),
        classes: cli.classes,
        students: cli.students,
        statuses: cli.statuses,
    };

    let options = RenderOptions {
        orientation: cli.orientation.unwrap_or(config.report.orientation),
        page_size: cli.page_size.unwrap_or(config.report.page_size),
        show_charts: config.report.show_charts && !cli.no_charts,
        show_details: !cli.no_details,
    };

    let request = ReportRequest {
        kind: cli.kind,
        filter,
        format: cli.format,
        options,
    };

    let store = HttpAttendanceStore::new(
        &config.store.base_url,
        &config.store.api_token,
        config.store.timeout_secs,
    )?;
    let service = ReportService::new(
        Arc::new(store),
        config.store.school_id.clone(),
        config.school.school_info(),
        config.report.timestamp_in_filename,
    )?;

    let report = service.generate(&request).await?;

    let out_dir = cli.out.unwrap_or(config.report.output_dir);
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory {out_dir:?}"))?;
    let path = out_dir.join(&report.file_name);
    std::fs::write(&path, &report.bytes).with_context(|| format!("Failed to write {path:?}"))?;

    println!("{}", path.display());
    Ok(())
}
