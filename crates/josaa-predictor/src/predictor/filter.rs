use super::domain::{AllotmentRecord, Quota, SearchCriteria};
use serde::Serialize;
use tracing::debug;

/// Quota channel through which a record is open to the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaChannel {
    HomeState,
    OtherState,
    AllIndia,
}

/// Per-condition breakdown of whether a record suits the criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    pub rank: bool,
    pub category: bool,
    pub gender: bool,
    pub quota: Option<QuotaChannel>,
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        self.rank && self.category && self.gender && self.quota.is_some()
    }
}

pub fn evaluate(record: &AllotmentRecord, criteria: &SearchCriteria) -> Eligibility {
    let rank = record
        .closing_rank
        .value
        .is_some_and(|closing| i64::from(criteria.rank) <= closing);

    Eligibility {
        rank,
        category: record.seat_type == criteria.category,
        gender: record.gender == criteria.gender,
        quota: quota_channel(record, &criteria.home_state),
    }
}

/// State names compare case-insensitively.
pub fn quota_channel(record: &AllotmentRecord, home_state: &str) -> Option<QuotaChannel> {
    let in_home_state = record.institute_state.to_lowercase() == home_state.to_lowercase();

    match record.quota {
        Quota::HomeState if in_home_state => Some(QuotaChannel::HomeState),
        Quota::OtherState if !in_home_state => Some(QuotaChannel::OtherState),
        Quota::AllIndia => Some(QuotaChannel::AllIndia),
        _ => None,
    }
}

/// Keep every record the applicant could have secured, in dataset order.
pub fn filter(dataset: &[AllotmentRecord], criteria: &SearchCriteria) -> Vec<AllotmentRecord> {
    let matched: Vec<AllotmentRecord> = dataset
        .iter()
        .filter(|record| evaluate(record, criteria).is_eligible())
        .cloned()
        .collect();

    debug!(
        round = %criteria.round,
        scanned = dataset.len(),
        matched = matched.len(),
        "filtered allotment records"
    );

    matched
}
