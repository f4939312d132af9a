use josaa_predictor::error::AppError;
use josaa_predictor::predictor::{
    AllotmentRecord, DatasetError, DatasetProvider, LoadOutcome, PredictorController, Round,
    SearchCriteria, SortDirection,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) provider: Arc<dyn DatasetProvider>,
}

/// Applicant input shared by the JSON API and the `predict` command.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PredictionRequest {
    pub(crate) name: String,
    pub(crate) rank: u32,
    pub(crate) round: u8,
    pub(crate) category: String,
    pub(crate) gender: String,
    pub(crate) home_state: String,
    #[serde(default)]
    pub(crate) program: Option<String>,
    #[serde(default)]
    pub(crate) sort: Option<SortDirection>,
}

/// Load the requested round and submit the applicant's criteria against it.
///
/// The returned controller holds the filtered results with the requested
/// sort and program view already applied.
pub(crate) async fn run_prediction(
    provider: Arc<dyn DatasetProvider>,
    request: PredictionRequest,
) -> Result<PredictorController, AppError> {
    let (mut controller, _) = load_round(provider, request.round).await?;
    let round = controller.loaded_round().ok_or_else(|| {
        DatasetError::Interrupted(format!("round {} was not applied", request.round))
    })?;

    let criteria = SearchCriteria::new(
        request.name,
        request.rank,
        request.category,
        request.gender,
        request.home_state,
        round,
    )?;
    controller.submit(criteria)?;

    if let Some(direction) = request.sort {
        controller.sort(direction);
    }
    controller.set_program_filter(request.program);
    Ok(controller)
}

/// Fresh controller with `round` loaded, plus the number of rows the loader skipped.
pub(crate) async fn load_round(
    provider: Arc<dyn DatasetProvider>,
    round: u8,
) -> Result<(PredictorController, usize), AppError> {
    let round = Round::new(round)?;
    let mut controller = PredictorController::new();
    match controller.load_round(provider, round).await {
        LoadOutcome::Applied { skipped, .. } => Ok((controller, skipped)),
        LoadOutcome::Failed { error, .. } => Err(error.into()),
        LoadOutcome::Stale { round } => Err(DatasetError::Interrupted(format!(
            "round {round} load was superseded"
        ))
        .into()),
    }
}

pub(crate) fn parse_round(raw: &str) -> Result<u8, String> {
    raw.parse::<Round>()
        .map(Round::number)
        .map_err(|err| err.to_string())
}

const TABLE_COLUMNS: [(&str, usize); 6] = [
    ("Institute", 44),
    ("Program", 44),
    ("Seat", 10),
    ("Gender", 16),
    ("Quota", 5),
    ("Closing", 8),
];

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(3)).collect();
    clipped.push_str("...");
    clipped
}

/// Fixed-width text table of the displayed rows.
pub(crate) fn render_table(rows: &[&AllotmentRecord], direction: SortDirection) -> String {
    let mut out = String::new();
    let header: Vec<String> = TABLE_COLUMNS
        .iter()
        .map(|&(label, width)| {
            if label == "Closing" {
                format!("{:<width$}", format!("{label} {}", direction.arrow()))
            } else {
                format!("{label:<width$}")
            }
        })
        .collect();
    out.push_str(header.join(" ").trim_end());
    out.push('\n');

    for row in rows {
        let cells = [
            row.institute.as_str(),
            row.program.as_str(),
            row.seat_type.as_str(),
            row.gender.as_str(),
            row.quota.code(),
            row.closing_rank.display(),
        ];
        let line: Vec<String> = cells
            .iter()
            .zip(TABLE_COLUMNS.iter())
            .map(|(cell, &(_, width))| format!("{:<width$}", clip(cell, width)))
            .collect();
        out.push_str(line.join(" ").trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use josaa_predictor::predictor::{ClosingRank, FeeDetails, Quota};

    fn record(institute: &str, closing: &str) -> AllotmentRecord {
        AllotmentRecord {
            institute: institute.to_string(),
            program: "Computer Science and Engineering".to_string(),
            seat_type: "OPEN".to_string(),
            gender: "Gender-Neutral".to_string(),
            institute_state: "Karnataka".to_string(),
            quota: Quota::AllIndia,
            closing_rank: ClosingRank::parse(Some(closing.to_string())),
            fees: FeeDetails::default(),
        }
    }

    #[test]
    fn parse_round_accepts_only_known_rounds() {
        assert_eq!(parse_round("3"), Ok(3));
        assert_eq!(
            parse_round("9").expect_err("round 9 rejected"),
            "round '9' is not one of 1-5"
        );
        assert!(parse_round("two").is_err());
    }

    #[test]
    fn table_lists_rows_with_sort_marker() {
        let long_name = "National Institute of Technology Karnataka, Surathkal (Mangalore)";
        let rows = [record(long_name, "3120"), record("NIT Goa", "")];
        let refs: Vec<&AllotmentRecord> = rows.iter().collect();

        let table = render_table(&refs, SortDirection::Descending);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Institute"));
        assert!(lines[0].ends_with("Closing ↓"));
        assert!(lines[1].contains("Technology Karnatak..."));
        assert!(!lines[1].contains("Surathkal"));
        assert!(lines[1].ends_with("3120"));
        assert!(lines[2].ends_with("-"));
    }
}
