use super::layout::{fit_cell, TableLayout};
use super::views::{ReportDocument, ReportRow};
use super::{ReportError, ReportRenderer};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

/// Paginated A4 table rendered with the builtin Helvetica faces.
#[derive(Debug, Clone, Default)]
pub struct PdfReportRenderer {
    layout: TableLayout,
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl PdfReportRenderer {
    pub fn new(layout: TableLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    fn draw_header(&self, layer: &PdfLayerReference, fonts: &Fonts, header: &[&str; 11], y: f32) {
        for (column, label) in header.iter().enumerate() {
            layer.use_text(
                fit_cell(label, self.layout.max_chars(column)),
                self.layout.font_size,
                Mm(self.layout.column_x(column)),
                Mm(y),
                &fonts.bold,
            );
        }
    }

    fn draw_rows(&self, layer: &PdfLayerReference, fonts: &Fonts, rows: &[ReportRow], top: f32) {
        for (index, row) in rows.iter().enumerate() {
            let y = top - self.layout.row_height * (index as f32 + 1.0);
            for (column, cell) in row.cells.iter().enumerate() {
                layer.use_text(
                    fit_cell(cell, self.layout.max_chars(column)),
                    self.layout.font_size,
                    Mm(self.layout.column_x(column)),
                    Mm(y),
                    &fonts.regular,
                );
            }
        }
    }
}

impl ReportRenderer for PdfReportRenderer {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, ReportError> {
        let layout = &self.layout;
        let title = fit_cell(&document.title(), usize::MAX);
        let (pdf, first_page, first_layer) = PdfDocument::new(
            title.as_str(),
            Mm(layout.page_width),
            Mm(layout.page_height),
            "table",
        );

        let fonts = Fonts {
            regular: pdf
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|err| ReportError::Pdf(err.to_string()))?,
            bold: pdf
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|err| ReportError::Pdf(err.to_string()))?,
        };

        let pages = layout.paginate(&document.rows);
        let page_count = pages.len();

        for (index, rows) in pages.into_iter().enumerate() {
            let first = index == 0;
            let layer = if first {
                pdf.get_page(first_page).get_layer(first_layer)
            } else {
                let (page, layer) =
                    pdf.add_page(Mm(layout.page_width), Mm(layout.page_height), "table");
                pdf.get_page(page).get_layer(layer)
            };

            if first {
                layer.use_text(
                    title.as_str(),
                    layout.title_size,
                    Mm(layout.margin),
                    Mm(layout.title_y()),
                    &fonts.bold,
                );
                layer.use_text(
                    fit_cell(&document.metadata_line(), usize::MAX),
                    layout.metadata_size,
                    Mm(layout.margin),
                    Mm(layout.metadata_y()),
                    &fonts.regular,
                );
            }

            let header_y = layout.header_y(first);
            self.draw_header(&layer, &fonts, document.header(), header_y);
            self.draw_rows(&layer, &fonts, rows, header_y);

            layer.use_text(
                document.footer_line(index + 1, page_count),
                layout.font_size,
                Mm(layout.margin),
                Mm(layout.footer_y()),
                &fonts.regular,
            );
        }

        pdf.save_to_bytes()
            .map_err(|err| ReportError::Pdf(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::domain::Round;
    use chrono::NaiveDate;

    fn document(rows: usize) -> ReportDocument {
        ReportDocument {
            applicant_name: "Meera Iyer".to_string(),
            rank: 15000,
            category: "OBC-NCL".to_string(),
            home_state: "Kerala".to_string(),
            round: Round::new(2).expect("valid round"),
            generated_on: NaiveDate::from_ymd_opt(2025, 7, 1).expect("valid date"),
            rows: (0..rows)
                .map(|index| ReportRow {
                    cells: std::array::from_fn(|column| format!("r{index}c{column}")),
                })
                .collect(),
        }
    }

    #[test]
    fn renders_pdf_bytes() {
        let renderer = PdfReportRenderer::default();
        let bytes = renderer.render(&document(3)).expect("pdf renders");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn renders_multi_page_and_empty_tables() {
        let renderer = PdfReportRenderer::default();
        let many = renderer.layout().rows_per_page(true) + 5;
        let long = renderer.render(&document(many)).expect("long pdf renders");
        let short = renderer.render(&document(0)).expect("empty pdf renders");
        assert!(long.starts_with(b"%PDF"));
        assert!(short.starts_with(b"%PDF"));
        assert!(long.len() > short.len());
    }
}
