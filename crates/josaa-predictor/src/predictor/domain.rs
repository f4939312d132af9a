use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One JoSAA counselling round. Each round ships its own dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Round(u8);

impl Round {
    pub const FIRST: u8 = 1;
    pub const LAST: u8 = 5;

    pub fn new(number: u8) -> Result<Self, CriteriaError> {
        if (Self::FIRST..=Self::LAST).contains(&number) {
            Ok(Self(number))
        } else {
            Err(CriteriaError::UnknownRound(number.to_string()))
        }
    }

    pub fn all() -> impl Iterator<Item = Round> {
        (Self::FIRST..=Self::LAST).map(Round)
    }

    pub const fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Round {
    type Err = CriteriaError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let number = raw
            .trim()
            .parse::<u8>()
            .map_err(|_| CriteriaError::UnknownRound(raw.trim().to_string()))?;
        Self::new(number)
    }
}

impl TryFrom<u8> for Round {
    type Error = CriteriaError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Round> for u8 {
    fn from(value: Round) -> Self {
        value.0
    }
}

/// Seat eligibility channel as published in the allotment data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Quota {
    HomeState,
    OtherState,
    AllIndia,
    /// Codes such as `GO`, `JK` or `LA`. Kept for display; never eligible.
    Other(String),
}

impl Quota {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "HS" => Self::HomeState,
            "OS" => Self::OtherState,
            "AI" => Self::AllIndia,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::HomeState => "HS",
            Self::OtherState => "OS",
            Self::AllIndia => "AI",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for Quota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<Quota> for String {
    fn from(value: Quota) -> Self {
        value.code().to_string()
    }
}

/// Closing rank as published, plus its integer reading when one exists.
///
/// The integer is taken from the leading digits of the text, so values such
/// as `"1234P"` (preparatory-course ranks) read as `1234`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosingRank {
    pub raw: Option<String>,
    pub value: Option<i64>,
}

impl ClosingRank {
    pub fn parse(raw: Option<String>) -> Self {
        let value = raw.as_deref().and_then(parse_leading_int);
        Self { raw, value }
    }

    pub fn display(&self) -> &str {
        match self.raw.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => "-",
        }
    }
}

pub(crate) fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .bytes()
        .position(|byte| !byte.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Free-form fee and placement strings, tagged with the rupee glyph upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeeDetails {
    pub total_fees: Option<String>,
    pub yearly_fees: Option<String>,
    pub average_package: Option<String>,
    pub highest_package: Option<String>,
}

/// Historical seat allotment row for one institute/program/seat combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllotmentRecord {
    pub institute: String,
    pub program: String,
    pub seat_type: String,
    pub gender: String,
    pub institute_state: String,
    pub quota: Quota,
    pub closing_rank: ClosingRank,
    pub fees: FeeDetails,
}

/// What the applicant submits for one prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub applicant_name: String,
    pub rank: u32,
    pub category: String,
    pub gender: String,
    pub home_state: String,
    pub round: Round,
}

impl SearchCriteria {
    pub fn new(
        applicant_name: impl Into<String>,
        rank: u32,
        category: impl Into<String>,
        gender: impl Into<String>,
        home_state: impl Into<String>,
        round: Round,
    ) -> Result<Self, CriteriaError> {
        let applicant_name = applicant_name.into();
        if applicant_name.trim().is_empty() {
            return Err(CriteriaError::MissingName);
        }
        if rank == 0 {
            return Err(CriteriaError::InvalidRank);
        }

        Ok(Self {
            applicant_name,
            rank,
            category: category.into(),
            gender: gender.into(),
            home_state: home_state.into(),
            round,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CriteriaError {
    #[error("applicant name is required")]
    MissingName,
    #[error("rank must be a positive integer")]
    InvalidRank,
    #[error("round '{0}' is not one of 1-5")]
    UnknownRound(String),
    #[error("round {requested} is not loaded")]
    RoundNotLoaded { requested: Round },
    #[error("category '{0}' is not offered in the loaded round")]
    UnknownCategory(String),
    #[error("gender '{0}' is not offered in the loaded round")]
    UnknownGender(String),
    #[error("home state '{0}' is not present in the loaded round")]
    UnknownHomeState(String),
}
