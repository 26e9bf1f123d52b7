//! HTML table backend built on Tera.

use serde::Serialize;
use tera::{Context, Tera};

use crate::error::Result;
use crate::report::document::{Cell, ReportDocument};

use super::{ReportFormat, ReportRenderer};

/// Renders the document as a self-contained HTML page.
///
/// The table reflects the exact row set and order of the export backends;
/// all matching rows render without pagination.
pub struct HtmlRenderer {
    template_engine: Tera,
}

impl HtmlRenderer {
    pub fn new() -> Result<Self> {
        let mut template_engine = Tera::default();
        template_engine.add_raw_template("report.html", DEFAULT_HTML_TEMPLATE)?;

        Ok(Self { template_engine })
    }
}

#[derive(Serialize)]
struct ChartBar {
    label: String,
    count: u32,
    percent: u8,
}

impl ReportRenderer for HtmlRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Html
    }

    fn render(&self, doc: &ReportDocument) -> Result<Vec<u8>> {
        let mut context = Context::new();
        context.insert("report", doc);
        context.insert("rows", &display_rows(&doc.rows));
        context.insert("totals_row", &display_cells(&doc.totals_row));
        context.insert(
            "percent_row",
            &doc.percent_row.as_ref().map(|row| display_cells(row)),
        );

        let chart_bars = doc.chart.as_ref().map(|chart| {
            vec![
                ChartBar {
                    label: "Hadir".to_string(),
                    count: chart.totals.hadir,
                    percent: chart.percentages.hadir,
                },
                ChartBar {
                    label: "Sakit".to_string(),
                    count: chart.totals.sakit,
                    percent: chart.percentages.sakit,
                },
                ChartBar {
                    label: "Izin".to_string(),
                    count: chart.totals.izin,
                    percent: chart.percentages.izin,
                },
                ChartBar {
                    label: "Alpha".to_string(),
                    count: chart.totals.alpha,
                    percent: chart.percentages.alpha,
                },
            ]
        });
        context.insert("chart_bars", &chart_bars);

        let html = self.template_engine.render("report.html", &context)?;
        Ok(html.into_bytes())
    }
}

fn display_cells(cells: &[Cell]) -> Vec<String> {
    cells.iter().map(Cell::display).collect()
}

fn display_rows(rows: &[Vec<Cell>]) -> Vec<Vec<String>> {
    rows.iter().map(|row| display_cells(row)).collect()
}

const DEFAULT_HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="id">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ report.title }}</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.5;
            color: #333;
            max-width: 1100px;
            margin: 0 auto;
            padding: 24px;
            background-color: #f5f5f5;
        }
        .report-header {
            background-color: white;
            padding: 24px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
            margin-bottom: 24px;
        }
        h1 { margin: 0 0 4px 0; color: #2c3e50; font-size: 22px; }
        .school-meta { color: #666; font-size: 14px; }
        .section {
            background-color: white;
            padding: 20px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        h2 { color: #34495e; font-size: 17px; border-bottom: 2px solid #ecf0f1; padding-bottom: 8px; }
        table { width: 100%; border-collapse: collapse; }
        th, td { text-align: left; padding: 8px 10px; border-bottom: 1px solid #ecf0f1; }
        th { background-color: #4472c4; color: white; font-weight: 600; }
        tr.totals td { font-weight: bold; border-top: 2px solid #4472c4; }
        .bar-row { display: flex; align-items: center; margin: 6px 0; }
        .bar-label { width: 70px; }
        .bar-track { flex: 1; background: #ecf0f1; border-radius: 4px; }
        .bar-fill { background: #4472c4; color: white; font-size: 12px; padding: 2px 6px; border-radius: 4px; min-width: 2%; }
        .bar-value { width: 110px; text-align: right; color: #666; font-size: 13px; }
        .signature { display: flex; justify-content: space-between; margin-top: 30px; }
        .signatory { text-align: center; }
        .signatory .name { margin-top: 56px; font-weight: bold; text-decoration: underline; }
        .empty { color: #888; font-style: italic; }
    </style>
</head>
<body>
    <div class="report-header">
        <h1>{{ report.school.name }}</h1>
        <div class="school-meta">
            <div>{{ report.school.address }}</div>
            <div>NPSN: {{ report.school.npsn }}</div>
        </div>
    </div>

    <div class="section">
        <h2>{{ report.title }}</h2>
        <p>Periode: {{ report.period }}</p>
        {% if report.filter_note %}<p>{{ report.filter_note }}</p>{% endif %}
        <table>
            <thead>
                <tr>
                    {% for column in report.columns %}
                    <th>{{ column.title }}</th>
                    {% endfor %}
                </tr>
            </thead>
            <tbody>
                {% for row in rows %}
                <tr>
                    {% for cell in row %}
                    <td>{{ cell }}</td>
                    {% endfor %}
                </tr>
                {% endfor %}
                {% if rows | length == 0 %}
                <tr><td class="empty" colspan="{{ report.columns | length }}">Tidak ada data pada periode ini.</td></tr>
                {% endif %}
                <tr class="totals">
                    {% for cell in totals_row %}
                    <td>{{ cell }}</td>
                    {% endfor %}
                </tr>
                {% if percent_row %}
                <tr class="totals">
                    {% for cell in percent_row %}
                    <td>{{ cell }}</td>
                    {% endfor %}
                </tr>
                {% endif %}
            </tbody>
        </table>
    </div>

    {% if chart_bars %}
    <div class="section">
        <h2>{{ report.chart.title }}</h2>
        {% for bar in chart_bars %}
        <div class="bar-row">
            <span class="bar-label">{{ bar.label }}</span>
            <div class="bar-track">
                <div class="bar-fill" style="width: {{ bar.percent }}%">{{ bar.percent }}%</div>
            </div>
            <span class="bar-value">{{ bar.count }} catatan</span>
        </div>
        {% endfor %}
    </div>
    {% endif %}

    {% for block in report.top_three %}
    <div class="section">
        <h2>3 Besar {{ block.status_label }}</h2>
        <table>
            <thead>
                <tr><th>No</th><th>Nama</th><th>Kelas</th><th>Jumlah</th></tr>
            </thead>
            <tbody>
                {% for entry in block.entries %}
                <tr>
                    <td>{{ loop.index }}</td>
                    <td>{{ entry.name }}</td>
                    <td>{{ entry.class }}</td>
                    <td>{{ entry.count }}</td>
                </tr>
                {% endfor %}
            </tbody>
        </table>
    </div>
    {% endfor %}

    <div class="section">
        <div class="signature">
            <div class="signatory">
                <div>&nbsp;</div>
                <div>{{ report.signature.admin_label }}</div>
                <div class="name">(............................)</div>
            </div>
            <div class="signatory">
                <div>{{ report.signature.place }}, {{ report.signature.date }}</div>
                <div>Kepala Sekolah</div>
                <div class="name">{{ report.signature.principal_name }}</div>
                <div>NIP. {{ report.signature.principal_nip }}</div>
            </div>
        </div>
    </div>
</body>
</html>
"#;
