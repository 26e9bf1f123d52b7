//! Report renderer backends sharing one content model.
//!
//! Each backend is pure: document in, artifact bytes out. The contract
//! across backends is that counts, totals, and percentages are numerically
//! identical for the same document, and that an empty document still
//! renders a valid, zero-row artifact.

mod excel;
mod html;
mod pdf;

pub use excel::ExcelRenderer;
pub use html::HtmlRenderer;
pub use pdf::PdfRenderer;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

use super::document::ReportDocument;

/// Output format of a rendered report artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Html,
    Pdf,
    Xlsx,
}

impl ReportFormat {
    /// Artifact file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "html" => Ok(Self::Html),
            "pdf" => Ok(Self::Pdf),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            _ => Err(format!("unknown format '{s}' (expected html, pdf, or xlsx)")),
        }
    }
}

/// A renderer backend.
pub trait ReportRenderer: Send + Sync {
    fn format(&self) -> ReportFormat;
    fn render(&self, doc: &ReportDocument) -> Result<Vec<u8>>;
}

/// Registry dispatching to the backend for a requested format.
pub struct RendererSet {
    renderers: Vec<Box<dyn ReportRenderer>>,
}

impl RendererSet {
    pub fn new() -> Result<Self> {
        Ok(Self {
            renderers: vec![
                Box::new(HtmlRenderer::new()?),
                Box::new(PdfRenderer::new()),
                Box::new(ExcelRenderer::new()),
            ],
        })
    }

    pub fn render(&self, doc: &ReportDocument, format: ReportFormat) -> Result<Vec<u8>> {
        for renderer in &self.renderers {
            if renderer.format() == format {
                return renderer.render(doc);
            }
        }

        Err(AppError::not_found(format!("No renderer for format: {format}")))
    }
}
