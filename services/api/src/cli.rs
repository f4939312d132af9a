use crate::infra::{self, parse_round, render_table, PredictionRequest};
use crate::server;
use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use josaa_predictor::config::AppConfig;
use josaa_predictor::error::AppError;
use josaa_predictor::predictor::{
    export_report, DatasetProvider, FsDatasetProvider, ReportError, ReportFormat, SortDirection,
};
use josaa_predictor::telemetry;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "JoSAA College Predictor",
    about = "Predict eligible JoSAA seats from historical closing ranks",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// List the categories, genders and states offered by a round
    Options(OptionsArgs),
    /// Predict eligible seats for one applicant
    Predict(PredictArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Directory holding the JoSAA_Round{n}_Data.json files
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct OptionsArgs {
    /// Counselling round (1-5)
    #[arg(long, value_parser = parse_round)]
    round: u8,
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortArg {
    Asc,
    Desc,
}

impl From<SortArg> for SortDirection {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Asc => SortDirection::Ascending,
            SortArg::Desc => SortDirection::Descending,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExportArg {
    Pdf,
    Csv,
}

impl From<ExportArg> for ReportFormat {
    fn from(value: ExportArg) -> Self {
        match value {
            ExportArg::Pdf => ReportFormat::Pdf,
            ExportArg::Csv => ReportFormat::Csv,
        }
    }
}

#[derive(Args, Debug)]
struct PredictArgs {
    /// Applicant name, used in the report title and file name
    #[arg(long)]
    name: String,
    /// JEE rank
    #[arg(long)]
    rank: u32,
    /// Counselling round (1-5)
    #[arg(long, value_parser = parse_round)]
    round: u8,
    /// Seat type, e.g. OPEN or OBC-NCL
    #[arg(long)]
    category: String,
    #[arg(long)]
    gender: String,
    #[arg(long)]
    home_state: String,
    /// Only show rows for this academic program
    #[arg(long)]
    program: Option<String>,
    /// Sort by closing rank
    #[arg(long, value_enum)]
    sort: Option<SortArg>,
    /// Write the displayed rows as a report
    #[arg(long, value_enum)]
    export: Option<ExportArg>,
    /// Override the configured report directory
    #[arg(long)]
    report_dir: Option<PathBuf>,
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Options(args) => run_options(args).await,
        Command::Predict(args) => run_predict(args).await,
    }
}

fn provider(config: &AppConfig, data_dir: Option<PathBuf>) -> Arc<dyn DatasetProvider> {
    let data_dir = data_dir.unwrap_or_else(|| config.dataset.data_dir.clone());
    Arc::new(FsDatasetProvider::new(data_dir))
}

async fn run_options(args: OptionsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let (controller, skipped) =
        infra::load_round(provider(&config, args.data_dir), args.round).await?;
    let options = controller.options();

    println!("Round {} options", args.round);
    println!("Categories: {}", options.categories.join(", "));
    println!("Genders: {}", options.genders.join(", "));
    println!("Home states: {}", options.states.join(", "));
    if skipped > 0 {
        println!("Skipped {skipped} incomplete rows");
    }
    Ok(())
}

async fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let provider = provider(&config, args.data_dir);
    let request = PredictionRequest {
        name: args.name,
        rank: args.rank,
        round: args.round,
        category: args.category,
        gender: args.gender,
        home_state: args.home_state,
        program: args.program,
        sort: args.sort.map(SortDirection::from),
    };
    let controller = infra::run_prediction(provider, request).await?;
    let results = controller.results().ok_or(ReportError::NoResults)?;
    let displayed = results.displayed();

    if args.json {
        let payload = json!({
            "direction": results.direction(),
            "program": results.program_filter(),
            "total_matches": results.len(),
            "rows": displayed,
        });
        let rendered = serde_json::to_string_pretty(&payload).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        println!(
            "{} matching seats ({} shown)",
            results.len(),
            displayed.len()
        );
        print!("{}", render_table(&displayed, results.direction()));
    }

    if let Some(format) = args.export {
        let today = Local::now().date_naive();
        let document = controller
            .report_document(today)
            .ok_or(ReportError::NoResults)?;
        let output_dir = args
            .report_dir
            .unwrap_or_else(|| config.report.output_dir.clone());
        let renderer = ReportFormat::from(format).renderer();
        let path = export_report(renderer.as_ref(), &document, &output_dir)?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}
