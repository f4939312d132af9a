use crate::predictor::domain::{AllotmentRecord, Round, SearchCriteria};
use chrono::NaiveDate;
use serde::Serialize;

pub const REPORT_COLUMNS: [&str; 11] = [
    "Institute Name",
    "Program",
    "Total Fees",
    "Yearly Fees",
    "Avg Package",
    "Highest Package",
    "State",
    "Quota",
    "Seat Type",
    "Gender",
    "Closing Rank",
];

const RUPEE: char = '₹';
const RUPEE_ASCII: &str = "Rs.";

/// One printable table row, columns in `REPORT_COLUMNS` order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub cells: [String; 11],
}

impl ReportRow {
    pub fn from_record(record: &AllotmentRecord) -> Self {
        Self {
            cells: [
                record.institute.clone(),
                record.program.clone(),
                money(record.fees.total_fees.as_deref()),
                money(record.fees.yearly_fees.as_deref()),
                money(record.fees.average_package.as_deref()),
                money(record.fees.highest_package.as_deref()),
                or_dash(Some(record.institute_state.as_str())),
                or_dash(Some(record.quota.code())),
                or_dash(Some(record.seat_type.as_str())),
                or_dash(Some(record.gender.as_str())),
                record.closing_rank.display().to_string(),
            ],
        }
    }
}

fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => "-".to_string(),
    }
}

fn money(value: Option<&str>) -> String {
    or_dash(value).replace(RUPEE, RUPEE_ASCII)
}

/// Everything a renderer needs: who asked, with what, and the displayed rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDocument {
    pub applicant_name: String,
    pub rank: u32,
    pub category: String,
    pub home_state: String,
    pub round: Round,
    pub generated_on: NaiveDate,
    pub rows: Vec<ReportRow>,
}

impl ReportDocument {
    pub fn new<'a>(
        criteria: &SearchCriteria,
        displayed: impl IntoIterator<Item = &'a AllotmentRecord>,
        generated_on: NaiveDate,
    ) -> Self {
        Self {
            applicant_name: criteria.applicant_name.clone(),
            rank: criteria.rank,
            category: criteria.category.clone(),
            home_state: criteria.home_state.clone(),
            round: criteria.round,
            generated_on,
            rows: displayed.into_iter().map(ReportRow::from_record).collect(),
        }
    }

    pub fn title(&self) -> String {
        format!("JoSAA Predicted Colleges for {}", self.applicant_name)
    }

    pub fn metadata_line(&self) -> String {
        format!(
            "Rank: {} | Category: {} | State: {} | Round: {}",
            self.rank, self.category, self.home_state, self.round
        )
    }

    pub fn footer_line(&self, page: usize, page_count: usize) -> String {
        format!(
            "Page {page} of {page_count} | Generated {}",
            self.generated_on.format("%Y-%m-%d")
        )
    }

    pub fn header(&self) -> &'static [&'static str; 11] {
        &REPORT_COLUMNS
    }
}

/// `JoSAA_{name}_Predictions.{extension}`, each whitespace run in the name
/// collapsed to a single underscore.
pub fn report_file_name(applicant_name: &str, extension: &str) -> String {
    let mut slug = String::with_capacity(applicant_name.len());
    let mut in_whitespace = false;
    for ch in applicant_name.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('_');
            }
            in_whitespace = true;
        } else {
            slug.push(ch);
            in_whitespace = false;
        }
    }
    format!("JoSAA_{slug}_Predictions.{extension}")
}
