//! Spreadsheet backend built on rust_xlsxwriter.

use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet, XlsxError};

use crate::error::Result;
use crate::report::document::{Cell, ReportDocument};

use super::{ReportFormat, ReportRenderer};

/// Renders the document as a single-sheet workbook.
///
/// Sheet layout: school identity preamble, title and period rows, the
/// literal column-header row, one data row per record, a totals row (plus
/// percentage row where applicable), top-3 sub-tables for class/group
/// reports, then the signature block as plain rows.
pub struct ExcelRenderer;

impl ExcelRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for ExcelRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Xlsx
    }

    fn render(&self, doc: &ReportDocument) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        worksheet.set_name("Laporan Absensi")?;

        // Header format
        let header_format = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(0x4472C4))
            .set_font_color(Color::White)
            .set_border(FormatBorder::Thin);

        let title_format = Format::new().set_bold().set_font_size(14);
        let bold_format = Format::new().set_bold();
        let percent_format = Format::new().set_num_format("0\"%\"");
        let bold_percent_format = Format::new().set_bold().set_num_format("0\"%\"");

        let last_col = (doc.columns.len().max(1) - 1) as u16;

        // School identity preamble
        worksheet.merge_range(0, 0, 0, last_col, &doc.school.name, &title_format)?;
        worksheet.merge_range(1, 0, 1, last_col, &doc.school.address, &Format::new())?;
        worksheet.merge_range(2, 0, 2, last_col, &format!("NPSN: {}", doc.school.npsn), &Format::new())?;
        worksheet.merge_range(4, 0, 4, last_col, &doc.title, &bold_format)?;
        worksheet.merge_range(5, 0, 5, last_col, &format!("Periode: {}", doc.period), &Format::new())?;

        let mut row: u32 = 6;
        if let Some(note) = &doc.filter_note {
            worksheet.merge_range(row, 0, row, last_col, note, &Format::new())?;
            row += 1;
        }
        row += 1;

        // Column headers
        let header_row = row;
        for (col, column) in doc.columns.iter().enumerate() {
            worksheet.write_string_with_format(header_row, col as u16, &column.title, &header_format)?;
            worksheet.set_column_width(col as u16, column.width_chars)?;
        }
        row += 1;

        // Data rows
        for cells in &doc.rows {
            write_cells(worksheet, row, cells, None, &percent_format)?;
            row += 1;
        }

        // Totals row
        write_cells(worksheet, row, &doc.totals_row, Some(&bold_format), &bold_percent_format)?;
        row += 1;

        if let Some(percent_row) = &doc.percent_row {
            write_cells(worksheet, row, percent_row, Some(&bold_format), &bold_percent_format)?;
            row += 1;
        }

        // Top-3 sub-tables
        for block in &doc.top_three {
            row += 1;
            worksheet.write_string_with_format(row, 0, &format!("3 Besar {}", block.status_label), &bold_format)?;
            row += 1;
            for (idx, entry) in block.entries.iter().enumerate() {
                worksheet.write_number(row, 0, (idx + 1) as f64)?;
                worksheet.write_string(row, 1, &entry.name)?;
                worksheet.write_string(row, 2, &entry.class)?;
                worksheet.write_number(row, 3, f64::from(entry.count))?;
                row += 1;
            }
        }

        // Signature block
        row += 2;
        worksheet.write_string(row, 0, &format!("{}, {}", doc.signature.place, doc.signature.date))?;
        row += 1;
        worksheet.write_string(row, 0, &doc.signature.admin_label)?;
        worksheet.write_string(row, last_col.saturating_sub(2), "Kepala Sekolah")?;
        row += 4;
        worksheet.write_string(row, 0, "(............................)")?;
        worksheet.write_string_with_format(row, last_col.saturating_sub(2), &doc.signature.principal_name, &bold_format)?;
        row += 1;
        worksheet.write_string(
            row,
            last_col.saturating_sub(2),
            &format!("NIP. {}", doc.signature.principal_nip),
        )?;

        // Autofilter over the data region
        if !doc.rows.is_empty() {
            let last_data_row = header_row + doc.rows.len() as u32;
            worksheet.autofilter(header_row, 0, last_data_row, last_col)?;
        }

        // Freeze everything above the first data row
        worksheet.set_freeze_panes(header_row + 1, 0)?;

        let buffer = workbook.save_to_buffer()?;
        Ok(buffer)
    }
}

fn write_cells(
    worksheet: &mut Worksheet,
    row: u32,
    cells: &[Cell],
    text_format: Option<&Format>,
    percent_format: &Format,
) -> std::result::Result<(), XlsxError> {
    for (col, cell) in cells.iter().enumerate() {
        let col = col as u16;
        match cell {
            Cell::Text(value) => match text_format {
                Some(format) => {
                    worksheet.write_string_with_format(row, col, value, format)?;
                }
                None => {
                    worksheet.write_string(row, col, value)?;
                }
            },
            Cell::Count(value) => match text_format {
                Some(format) => {
                    worksheet.write_number_with_format(row, col, f64::from(*value), format)?;
                }
                None => {
                    worksheet.write_number(row, col, f64::from(*value))?;
                }
            },
            Cell::Percent(value) => {
                worksheet.write_number_with_format(row, col, f64::from(*value), percent_format)?;
            }
        }
    }
    Ok(())
}
