mod parser;

use super::domain::{AllotmentRecord, Round};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fmt::Debug;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Records of one round as accepted at the provider boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub records: Vec<AllotmentRecord>,
    /// Rows dropped for missing a required field.
    pub skipped: usize,
}

impl Dataset {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let parsed = parser::parse_rows(reader).map_err(DatasetError::Malformed)?;

        for rejected in &parsed.rejected {
            warn!(
                row = rejected.index,
                field = rejected.missing_field,
                "skipping allotment row without required field"
            );
        }

        Ok(Self {
            records: parsed.records,
            skipped: parsed.rejected.len(),
        })
    }

    pub fn options(&self) -> RoundOptions {
        RoundOptions::from_records(&self.records)
    }
}

/// Selectable values offered by the loaded round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoundOptions {
    /// Seat types in first-seen order.
    pub categories: Vec<String>,
    /// Genders in first-seen order.
    pub genders: Vec<String>,
    /// Institute states, sorted.
    pub states: Vec<String>,
}

impl RoundOptions {
    pub fn from_records(records: &[AllotmentRecord]) -> Self {
        let states = records
            .iter()
            .map(|record| record.institute_state.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        Self {
            categories: distinct_in_order(records.iter().map(|r| r.seat_type.as_str())),
            genders: distinct_in_order(records.iter().map(|r| r.gender.as_str())),
            states,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.genders.is_empty() && self.states.is_empty()
    }
}

fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}

/// Source of per-round allotment data. Implementations block; callers that
/// must stay responsive run them on a blocking thread.
pub trait DatasetProvider: Debug + Send + Sync {
    fn load(&self, round: Round) -> Result<Dataset, DatasetError>;
}

/// Reads `JoSAA_Round{n}_Data.json` files from a directory.
#[derive(Debug, Clone)]
pub struct FsDatasetProvider {
    data_dir: PathBuf,
}

impl FsDatasetProvider {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn file_name(round: Round) -> String {
        format!("JoSAA_Round{}_Data.json", round.number())
    }

    pub fn path_for(&self, round: Round) -> PathBuf {
        self.data_dir.join(Self::file_name(round))
    }
}

impl DatasetProvider for FsDatasetProvider {
    fn load(&self, round: Round) -> Result<Dataset, DatasetError> {
        let path = self.path_for(round);
        let file = std::fs::File::open(&path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => DatasetError::NotFound { round, path: path.clone() },
            _ => DatasetError::Io(err),
        })?;

        let dataset = Dataset::from_reader(std::io::BufReader::new(file))?;
        info!(
            %round,
            path = %path.display(),
            records = dataset.records.len(),
            skipped = dataset.skipped,
            "loaded allotment dataset"
        );
        Ok(dataset)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("no allotment data for round {round} at {}", .path.display())]
    NotFound { round: Round, path: PathBuf },
    #[error("failed to read allotment data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid allotment data: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("dataset loader stopped before finishing: {0}")]
    Interrupted(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::domain::{ClosingRank, FeeDetails, Quota};

    fn record(seat_type: &str, gender: &str, state: &str) -> AllotmentRecord {
        AllotmentRecord {
            institute: "NIT".to_string(),
            program: "CSE".to_string(),
            seat_type: seat_type.to_string(),
            gender: gender.to_string(),
            institute_state: state.to_string(),
            quota: Quota::AllIndia,
            closing_rank: ClosingRank::parse(Some("10".to_string())),
            fees: FeeDetails::default(),
        }
    }

    #[test]
    fn options_keep_first_seen_order_and_sort_states() {
        let records = vec![
            record("OBC-NCL", "Gender-Neutral", "Odisha"),
            record("OPEN", "Female-only (including Supernumerary)", "Assam"),
            record("OBC-NCL", "Gender-Neutral", "Odisha"),
            record("EWS", "Gender-Neutral", "Bihar"),
        ];

        let options = RoundOptions::from_records(&records);
        assert_eq!(options.categories, vec!["OBC-NCL", "OPEN", "EWS"]);
        assert_eq!(
            options.genders,
            vec!["Gender-Neutral", "Female-only (including Supernumerary)"]
        );
        assert_eq!(options.states, vec!["Assam", "Bihar", "Odisha"]);
    }

    #[test]
    fn file_name_follows_round_pattern() {
        let round = Round::new(4).expect("valid round");
        assert_eq!(FsDatasetProvider::file_name(round), "JoSAA_Round4_Data.json");
        let provider = FsDatasetProvider::new("/srv/josaa");
        assert_eq!(
            provider.path_for(round),
            PathBuf::from("/srv/josaa/JoSAA_Round4_Data.json")
        );
    }

    #[test]
    fn missing_file_reports_not_found() {
        let provider = FsDatasetProvider::new("./does-not-exist");
        let round = Round::new(1).expect("valid round");
        match provider.load(round) {
            Err(DatasetError::NotFound { round: missing, .. }) => assert_eq!(missing, round),
            other => panic!("expected not found, got {other:?}"),
        }
    }
}
