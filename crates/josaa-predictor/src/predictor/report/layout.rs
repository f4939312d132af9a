use super::views::ReportRow;

const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica glyph advance relative to the font size.
const AVERAGE_GLYPH_EM: f32 = 0.5;

/// Page geometry for the tabular report, in millimetres unless noted.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub title_size: f32,
    pub metadata_size: f32,
    /// Table font size in points.
    pub font_size: f32,
    pub row_height: f32,
    pub column_widths: [f32; 11],
}

impl Default for TableLayout {
    /// A4 landscape sized to fit all eleven columns.
    fn default() -> Self {
        Self {
            page_width: 297.0,
            page_height: 210.0,
            margin: 10.0,
            title_size: 12.0,
            metadata_size: 10.0,
            font_size: 7.0,
            row_height: 4.5,
            column_widths: [
                55.0, 60.0, 20.0, 20.0, 18.0, 18.0, 22.0, 10.0, 18.0, 22.0, 14.0,
            ],
        }
    }
}

impl TableLayout {
    pub fn title_y(&self) -> f32 {
        self.page_height - self.margin
    }

    pub fn metadata_y(&self) -> f32 {
        self.title_y() - 8.0
    }

    /// Baseline of the header row; the first page leaves room for title and metadata.
    pub fn header_y(&self, first_page: bool) -> f32 {
        if first_page {
            self.metadata_y() - 8.0
        } else {
            self.title_y()
        }
    }

    pub fn footer_y(&self) -> f32 {
        self.margin / 2.0
    }

    fn bottom_limit(&self) -> f32 {
        self.margin + self.row_height
    }

    pub fn rows_per_page(&self, first_page: bool) -> usize {
        let available = self.header_y(first_page) - self.row_height - self.bottom_limit();
        ((available / self.row_height).floor().max(1.0)) as usize
    }

    pub fn column_x(&self, column: usize) -> f32 {
        self.margin + self.column_widths[..column].iter().sum::<f32>()
    }

    pub fn max_chars(&self, column: usize) -> usize {
        let glyph = self.font_size * PT_TO_MM * AVERAGE_GLYPH_EM;
        (((self.column_widths[column] - 1.0) / glyph).floor().max(1.0)) as usize
    }

    /// Split rows into pages. An empty table still yields one page.
    pub fn paginate<'a>(&self, rows: &'a [ReportRow]) -> Vec<&'a [ReportRow]> {
        let first = self.rows_per_page(true).min(rows.len());
        let (head, mut rest) = rows.split_at(first);
        let mut pages = vec![head];

        let per_page = self.rows_per_page(false);
        while !rest.is_empty() {
            let take = per_page.min(rest.len());
            let (page, remaining) = rest.split_at(take);
            pages.push(page);
            rest = remaining;
        }

        pages
    }
}

/// Make `text` printable with a builtin PDF font and short enough for its column.
pub fn fit_cell(text: &str, max_chars: usize) -> String {
    let printable: Vec<char> = text
        .chars()
        .map(|ch| if ch.is_ascii() && !ch.is_ascii_control() { ch } else { '?' })
        .collect();

    if printable.len() <= max_chars {
        return printable.into_iter().collect();
    }

    if max_chars <= 3 {
        return printable.into_iter().take(max_chars).collect();
    }

    let mut fitted: String = printable.into_iter().take(max_chars - 3).collect();
    fitted.push_str("...");
    fitted
}
