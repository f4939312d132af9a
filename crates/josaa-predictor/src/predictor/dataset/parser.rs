use crate::predictor::domain::{AllotmentRecord, ClosingRank, FeeDetails, Quota};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::io::Read;

pub(crate) struct ParsedRows {
    pub(crate) records: Vec<AllotmentRecord>,
    pub(crate) rejected: Vec<RejectedRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RejectedRow {
    pub(crate) index: usize,
    pub(crate) missing_field: &'static str,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<ParsedRows, serde_json::Error> {
    let rows: Vec<AllotmentRow> = serde_json::from_reader(reader)?;
    let mut records = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();

    for (index, row) in rows.into_iter().enumerate() {
        match row.into_record() {
            Ok(record) => records.push(record),
            Err(missing_field) => rejected.push(RejectedRow {
                index,
                missing_field,
            }),
        }
    }

    Ok(ParsedRows { records, rejected })
}

#[derive(Debug, Deserialize)]
struct AllotmentRow {
    #[serde(rename = "Institute Name", default, deserialize_with = "loose_text")]
    institute: Option<String>,
    #[serde(
        rename = "Academic Program Name",
        default,
        deserialize_with = "loose_text"
    )]
    program: Option<String>,
    #[serde(rename = "Seat Type", default, deserialize_with = "loose_text")]
    seat_type: Option<String>,
    #[serde(rename = "Gender", default, deserialize_with = "loose_text")]
    gender: Option<String>,
    #[serde(rename = "Institute State", default, deserialize_with = "loose_text")]
    institute_state: Option<String>,
    #[serde(rename = "Quota", default, deserialize_with = "loose_text")]
    quota: Option<String>,
    #[serde(rename = "Closing Rank", default, deserialize_with = "loose_text")]
    closing_rank: Option<String>,
    #[serde(
        rename = "Total B.Tech Fees (4 Years)",
        default,
        deserialize_with = "loose_text"
    )]
    total_fees: Option<String>,
    #[serde(rename = "Avg. Yearly Fees", default, deserialize_with = "loose_text")]
    yearly_fees: Option<String>,
    #[serde(rename = "Average Package", default, deserialize_with = "loose_text")]
    average_package: Option<String>,
    #[serde(rename = "Highest Package", default, deserialize_with = "loose_text")]
    highest_package: Option<String>,
}

impl AllotmentRow {
    fn into_record(self) -> Result<AllotmentRecord, &'static str> {
        Ok(AllotmentRecord {
            institute: required(self.institute, "Institute Name")?,
            program: required(self.program, "Academic Program Name")?,
            seat_type: required(self.seat_type, "Seat Type")?,
            gender: required(self.gender, "Gender")?,
            institute_state: required(self.institute_state, "Institute State")?,
            quota: Quota::from_code(&required(self.quota, "Quota")?),
            closing_rank: ClosingRank::parse(self.closing_rank),
            fees: FeeDetails {
                total_fees: non_blank(self.total_fees),
                yearly_fees: non_blank(self.yearly_fees),
                average_package: non_blank(self.average_package),
                highest_package: non_blank(self.highest_package),
            },
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, &'static str> {
    non_blank(value).ok_or(field)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Accept strings and numbers alike; anything else reads as absent.
fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn numeric_fields_are_read_as_text() {
        let json = r#"[{
            "Institute Name": "IIT Bombay",
            "Academic Program Name": "Computer Science and Engineering (4 Years, Bachelor of Technology)",
            "Seat Type": "OPEN",
            "Gender": "Gender-Neutral",
            "Institute State": "Maharashtra",
            "Quota": "AI",
            "Closing Rank": 66,
            "Opening Rank": 1,
            "Average Package": "₹ 21.8 LPA"
        }]"#;

        let parsed = parse_rows(Cursor::new(json)).expect("valid json");
        assert!(parsed.rejected.is_empty());
        let record = &parsed.records[0];
        assert_eq!(record.closing_rank.raw.as_deref(), Some("66"));
        assert_eq!(record.closing_rank.value, Some(66));
        assert_eq!(record.quota, Quota::AllIndia);
        assert_eq!(record.fees.average_package.as_deref(), Some("₹ 21.8 LPA"));
        assert_eq!(record.fees.total_fees, None);
    }

    #[test]
    fn rows_missing_required_fields_are_rejected_with_position() {
        let json = r#"[
            {"Institute Name": "NIT Trichy", "Academic Program Name": "Civil", "Seat Type": "OPEN",
             "Gender": "Female-only (including Supernumerary)", "Institute State": "Tamil Nadu",
             "Quota": "OS", "Closing Rank": "abc"},
            {"Institute Name": "NIT Warangal", "Academic Program Name": "ECE", "Seat Type": "OPEN",
             "Gender": "Gender-Neutral", "Quota": "HS", "Closing Rank": "4000"},
            {"Institute Name": "", "Academic Program Name": "ECE", "Seat Type": "OPEN",
             "Gender": "Gender-Neutral", "Institute State": "Telangana", "Quota": "HS"}
        ]"#;

        let parsed = parse_rows(Cursor::new(json)).expect("valid json");
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].closing_rank.value, None);
        assert_eq!(
            parsed.rejected,
            vec![
                RejectedRow {
                    index: 1,
                    missing_field: "Institute State"
                },
                RejectedRow {
                    index: 2,
                    missing_field: "Institute Name"
                },
            ]
        );
    }

    #[test]
    fn non_array_documents_fail() {
        assert!(parse_rows(Cursor::new(r#"{"rows": []}"#)).is_err());
        assert!(parse_rows(Cursor::new("not json")).is_err());
    }
}
