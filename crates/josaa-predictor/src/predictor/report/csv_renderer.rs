use super::views::ReportDocument;
use super::{ReportError, ReportRenderer};

/// Spreadsheet-friendly export with the same columns as the PDF table.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReportRenderer;

impl ReportRenderer for CsvReportRenderer {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn content_type(&self) -> &'static str {
        "text/csv"
    }

    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, ReportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(document.header())?;
        for row in &document.rows {
            writer.write_record(&row.cells)?;
        }
        writer
            .into_inner()
            .map_err(|err| ReportError::Io(err.into_error()))
    }
}
