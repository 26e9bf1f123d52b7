//! Paginated PDF backend built on printpdf.

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};

use crate::error::Result;
use crate::report::document::{Cell, ReportDocument};

use super::{ReportFormat, ReportRenderer};

const MARGIN_MM: f32 = 14.0;
const ROW_HEIGHT_MM: f32 = 6.0;
const BODY_FONT_SIZE: f32 = 9.0;
/// Rough Helvetica advance at 9pt, used to clip cell text to its column.
const CHAR_WIDTH_MM: f32 = 1.8;

/// Renders the document as a paginated PDF.
///
/// Column widths are fixed per report kind and sum below the printable
/// width. When the running vertical offset passes the bottom margin, a new
/// page starts and the column-header band is re-emitted before the row
/// stream continues.
pub struct PdfRenderer;

impl PdfRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for PdfRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Pdf
    }

    fn render(&self, doc: &ReportDocument) -> Result<Vec<u8>> {
        let (width, height) = doc.options.page_dimensions_mm();
        let (pdf, page_idx, layer_idx) = PdfDocument::new(&doc.title, Mm(width), Mm(height), "Layer 1");

        let font = pdf.add_builtin_font(BuiltinFont::Helvetica)?;
        let font_bold = pdf.add_builtin_font(BuiltinFont::HelveticaBold)?;

        let mut page = Page {
            pdf: &pdf,
            layer: pdf.get_page(page_idx).get_layer(layer_idx),
            font,
            font_bold,
            width,
            height,
            y: height - MARGIN_MM,
        };

        emit_school_header(&mut page, doc);
        emit_column_headers(&mut page, doc);

        for cells in &doc.rows {
            if page.needs_break(ROW_HEIGHT_MM) {
                page.break_page();
                emit_column_headers(&mut page, doc);
            }
            emit_row(&mut page, doc, cells, false);
        }

        if page.needs_break(ROW_HEIGHT_MM * 2.5) {
            page.break_page();
            emit_column_headers(&mut page, doc);
        }
        page.rule(MARGIN_MM, page.width - MARGIN_MM);
        emit_row(&mut page, doc, &doc.totals_row, true);
        if let Some(percent_row) = &doc.percent_row {
            emit_row(&mut page, doc, percent_row, true);
        }

        if doc.chart.is_some() {
            // Acknowledged limitation of the document backend.
            page.advance(ROW_HEIGHT_MM);
            page.text("Grafik tidak tersedia pada dokumen PDF", BODY_FONT_SIZE, MARGIN_MM, false);
            page.advance(ROW_HEIGHT_MM);
        }

        emit_top_three(&mut page, doc);
        emit_signature(&mut page, doc);

        let bytes = pdf.save_to_bytes()?;
        Ok(bytes)
    }
}

struct Page<'a> {
    pdf: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    width: f32,
    height: f32,
    y: f32,
}

impl Page<'_> {
    fn needs_break(&self, needed: f32) -> bool {
        self.y - needed < MARGIN_MM
    }

    fn break_page(&mut self) {
        let (page_idx, layer_idx) = self.pdf.add_page(Mm(self.width), Mm(self.height), "Layer 1");
        self.layer = self.pdf.get_page(page_idx).get_layer(layer_idx);
        self.y = self.height - MARGIN_MM;
    }

    fn advance(&mut self, amount: f32) {
        self.y -= amount;
    }

    /// Write one line at the current offset without advancing.
    fn text(&self, value: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.font_bold } else { &self.font };
        self.layer.use_text(value, size, Mm(x), Mm(self.y), font);
    }

    /// Write one line and advance the offset.
    fn line(&mut self, value: &str, size: f32, x: f32, bold: bool) {
        self.text(value, size, x, bold);
        self.advance(ROW_HEIGHT_MM);
    }

    /// Horizontal rule just below the current text baseline.
    fn rule(&self, x1: f32, x2: f32) {
        let y = self.y - 1.5;
        let line = Line {
            points: vec![
                (Point::new(Mm(x1), Mm(y)), false),
                (Point::new(Mm(x2), Mm(y)), false),
            ],
            is_closed: false,
        };
        self.layer.set_outline_thickness(0.4);
        self.layer.add_line(line);
    }
}

fn emit_school_header(page: &mut Page<'_>, doc: &ReportDocument) {
    page.line(&doc.school.name, 12.0, MARGIN_MM, true);
    page.line(&doc.school.address, BODY_FONT_SIZE, MARGIN_MM, false);
    page.line(&format!("NPSN: {}", doc.school.npsn), BODY_FONT_SIZE, MARGIN_MM, false);
    page.rule(MARGIN_MM, page.width - MARGIN_MM);
    page.advance(2.0);
    page.line(&doc.title, 11.0, MARGIN_MM, true);
    page.line(&format!("Periode: {}", doc.period), BODY_FONT_SIZE, MARGIN_MM, false);
    if let Some(note) = &doc.filter_note {
        page.line(note, BODY_FONT_SIZE, MARGIN_MM, false);
    }
    page.advance(2.0);
}

fn emit_column_headers(page: &mut Page<'_>, doc: &ReportDocument) {
    let mut x = MARGIN_MM;
    for column in &doc.columns {
        page.text(&fit(&column.title, column.width_mm), BODY_FONT_SIZE, x, true);
        x += column.width_mm;
    }
    page.rule(MARGIN_MM, page.width - MARGIN_MM);
    page.advance(ROW_HEIGHT_MM);
}

fn emit_row(page: &mut Page<'_>, doc: &ReportDocument, cells: &[Cell], bold: bool) {
    let mut x = MARGIN_MM;
    for (cell, column) in cells.iter().zip(&doc.columns) {
        page.text(&fit(&cell.display(), column.width_mm), BODY_FONT_SIZE, x, bold);
        x += column.width_mm;
    }
    page.advance(ROW_HEIGHT_MM);
}

fn emit_top_three(page: &mut Page<'_>, doc: &ReportDocument) {
    for block in &doc.top_three {
        if page.needs_break(ROW_HEIGHT_MM * 5.0) {
            page.break_page();
        }
        page.advance(ROW_HEIGHT_MM * 0.5);
        page.line(&format!("3 Besar {}", block.status_label), 10.0, MARGIN_MM, true);
        for (idx, entry) in block.entries.iter().enumerate() {
            page.line(
                &format!("{no}. {name} ({class}) - {count}", no = idx + 1, name = entry.name, class = entry.class, count = entry.count),
                BODY_FONT_SIZE,
                MARGIN_MM + 4.0,
                false,
            );
        }
    }
}

fn emit_signature(page: &mut Page<'_>, doc: &ReportDocument) {
    // The two signatory blocks take six rows; never split them over a break.
    if page.needs_break(ROW_HEIGHT_MM * 7.0) {
        page.break_page();
    }
    page.advance(ROW_HEIGHT_MM);

    let right_x = page.width - MARGIN_MM - 70.0;
    page.text(&format!("{}, {}", doc.signature.place, doc.signature.date), BODY_FONT_SIZE, right_x, false);
    page.advance(ROW_HEIGHT_MM);
    page.text(&doc.signature.admin_label, BODY_FONT_SIZE, MARGIN_MM, false);
    page.text("Kepala Sekolah", BODY_FONT_SIZE, right_x, false);
    page.advance(ROW_HEIGHT_MM * 4.0);
    page.text("(............................)", BODY_FONT_SIZE, MARGIN_MM, false);
    page.text(&doc.signature.principal_name, BODY_FONT_SIZE, right_x, true);
    page.advance(ROW_HEIGHT_MM);
    page.text(&format!("NIP. {}", doc.signature.principal_nip), BODY_FONT_SIZE, right_x, false);
}

/// Clip a value to its column width.
fn fit(value: &str, width_mm: f32) -> String {
    let max_chars = (width_mm / CHAR_WIDTH_MM).max(1.0) as usize;
    if value.chars().count() <= max_chars {
        return value.to_string();
    }

    let mut clipped: String = value.chars().take(max_chars.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}
