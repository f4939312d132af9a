mod csv_renderer;
pub mod layout;
mod pdf;
pub mod views;

pub use csv_renderer::CsvReportRenderer;
pub use layout::TableLayout;
pub use pdf::PdfReportRenderer;
pub use views::{report_file_name, ReportDocument, ReportRow, REPORT_COLUMNS};

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Turns a report document into the bytes of one downloadable file.
pub trait ReportRenderer: Send + Sync {
    fn extension(&self) -> &'static str;
    fn content_type(&self) -> &'static str;
    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, ReportError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Pdf,
    Csv,
}

impl ReportFormat {
    pub fn renderer(self) -> Box<dyn ReportRenderer> {
        match self {
            Self::Pdf => Box::new(PdfReportRenderer::default()),
            Self::Csv => Box::new(CsvReportRenderer),
        }
    }
}

/// Render `document` and write it under `output_dir`, returning the file path.
pub fn export_report(
    renderer: &dyn ReportRenderer,
    document: &ReportDocument,
    output_dir: &Path,
) -> Result<PathBuf, ReportError> {
    let bytes = renderer.render(document)?;
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(report_file_name(
        &document.applicant_name,
        renderer.extension(),
    ));
    std::fs::write(&path, &bytes)?;

    info!(
        path = %path.display(),
        rows = document.rows.len(),
        bytes = bytes.len(),
        "exported prediction report"
    );
    Ok(path)
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("no submitted prediction to export")]
    NoResults,
    #[error("pdf rendering failed: {0}")]
    Pdf(String),
    #[error("csv rendering failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
