use super::dataset::{Dataset, DatasetError, DatasetProvider, RoundOptions};
use super::domain::{AllotmentRecord, CriteriaError, Round, SearchCriteria};
use super::filter::filter;
use super::report::ReportDocument;
use super::results::{ResultSet, SortDirection};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};

/// Identifies one round selection. Only the newest ticket may apply its load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub round: Round,
    generation: u64,
}

#[derive(Debug)]
pub enum LoadOutcome {
    Applied { round: Round, records: usize, skipped: usize },
    /// A newer round selection superseded this load; its result was dropped.
    Stale { round: Round },
    Failed { round: Round, error: DatasetError },
}

/// Application state for one predictor session.
///
/// Every mutation goes through a named transition so the invariants between
/// the round, its dataset, the option lists and the results hold.
#[derive(Debug, Default)]
pub struct PredictorController {
    generation: u64,
    round: Option<Round>,
    loaded_round: Option<Round>,
    dataset: Vec<AllotmentRecord>,
    options: RoundOptions,
    criteria: Option<SearchCriteria>,
    results: Option<ResultSet>,
}

impl PredictorController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round(&self) -> Option<Round> {
        self.round
    }

    pub fn loaded_round(&self) -> Option<Round> {
        self.loaded_round
    }

    pub fn dataset(&self) -> &[AllotmentRecord] {
        &self.dataset
    }

    pub fn options(&self) -> &RoundOptions {
        &self.options
    }

    pub fn criteria(&self) -> Option<&SearchCriteria> {
        self.criteria.as_ref()
    }

    pub fn results(&self) -> Option<&ResultSet> {
        self.results.as_ref()
    }

    /// Switch rounds. Clears the dataset, options and results; returns the
    /// ticket the caller must present with the loaded data.
    pub fn select_round(&mut self, round: Option<Round>) -> Option<LoadTicket> {
        self.generation += 1;
        self.round = round;
        self.clear_dataset();
        self.criteria = None;
        self.results = None;

        round.map(|round| LoadTicket {
            round,
            generation: self.generation,
        })
    }

    pub fn apply_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Dataset, DatasetError>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            warn!(round = %ticket.round, "discarding stale dataset load");
            return LoadOutcome::Stale {
                round: ticket.round,
            };
        }

        match result {
            Ok(dataset) => {
                let records = dataset.records.len();
                let skipped = dataset.skipped;
                self.options = dataset.options();
                self.dataset = dataset.records;
                self.loaded_round = Some(ticket.round);
                info!(round = %ticket.round, records, skipped, "round dataset ready");
                LoadOutcome::Applied {
                    round: ticket.round,
                    records,
                    skipped,
                }
            }
            Err(error) => {
                self.clear_dataset();
                warn!(round = %ticket.round, %error, "error loading data for selected round");
                LoadOutcome::Failed {
                    round: ticket.round,
                    error,
                }
            }
        }
    }

    /// Select `round`, load it on a blocking thread and apply the result.
    pub async fn load_round(
        &mut self,
        provider: Arc<dyn DatasetProvider>,
        round: Round,
    ) -> LoadOutcome {
        match self.select_round(Some(round)) {
            Some(ticket) => {
                let (ticket, result) = fetch_dataset(provider, ticket).await;
                self.apply_load(ticket, result)
            }
            None => LoadOutcome::Stale { round },
        }
    }

    pub fn submit(&mut self, criteria: SearchCriteria) -> Result<&ResultSet, CriteriaError> {
        if self.loaded_round != Some(criteria.round) {
            return Err(CriteriaError::RoundNotLoaded {
                requested: criteria.round,
            });
        }
        if !self.options.categories.contains(&criteria.category) {
            return Err(CriteriaError::UnknownCategory(criteria.category));
        }
        if !self.options.genders.contains(&criteria.gender) {
            return Err(CriteriaError::UnknownGender(criteria.gender));
        }
        if !self.options.states.contains(&criteria.home_state) {
            return Err(CriteriaError::UnknownHomeState(criteria.home_state));
        }

        let matched = filter(&self.dataset, &criteria);
        info!(
            round = %criteria.round,
            rank = criteria.rank,
            matched = matched.len(),
            "prediction submitted"
        );
        self.criteria = Some(criteria);
        Ok(self.results.insert(ResultSet::new(matched)))
    }

    /// Clear the round selection, criteria and results.
    pub fn reset(&mut self) {
        self.select_round(None);
    }

    pub fn toggle_sort(&mut self) -> Option<SortDirection> {
        self.results.as_mut().map(ResultSet::toggle_sort)
    }

    pub fn sort(&mut self, direction: SortDirection) -> bool {
        match self.results.as_mut() {
            Some(results) => {
                results.sort(direction);
                true
            }
            None => false,
        }
    }

    pub fn set_program_filter(&mut self, program: Option<String>) -> bool {
        match self.results.as_mut() {
            Some(results) => {
                results.set_program_filter(program);
                true
            }
            None => false,
        }
    }

    /// Report over the rows currently on display, if a search has been submitted.
    pub fn report_document(&self, generated_on: NaiveDate) -> Option<ReportDocument> {
        let criteria = self.criteria.as_ref()?;
        let results = self.results.as_ref()?;
        Some(ReportDocument::new(
            criteria,
            results.displayed(),
            generated_on,
        ))
    }

    fn clear_dataset(&mut self) {
        self.loaded_round = None;
        self.dataset.clear();
        self.options = RoundOptions::default();
    }
}

/// Run the provider on the blocking pool, handing the ticket back with the result.
pub async fn fetch_dataset(
    provider: Arc<dyn DatasetProvider>,
    ticket: LoadTicket,
) -> (LoadTicket, Result<Dataset, DatasetError>) {
    let round = ticket.round;
    let result = tokio::task::spawn_blocking(move || provider.load(round))
        .await
        .unwrap_or_else(|err| Err(DatasetError::Interrupted(err.to_string())));
    (ticket, result)
}
