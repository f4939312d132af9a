//! Seat prediction over historical JoSAA allotment data: load a round,
//! filter it against the applicant's criteria, arrange the results and
//! export them as a report.

pub mod controller;
pub mod dataset;
pub mod domain;
pub mod filter;
pub mod report;
pub mod results;

pub use controller::{fetch_dataset, LoadOutcome, LoadTicket, PredictorController};
pub use dataset::{Dataset, DatasetError, DatasetProvider, FsDatasetProvider, RoundOptions};
pub use domain::{
    AllotmentRecord, ClosingRank, CriteriaError, FeeDetails, Quota, Round, SearchCriteria,
};
pub use filter::{evaluate, filter, quota_channel, Eligibility, QuotaChannel};
pub use report::{
    export_report, report_file_name, CsvReportRenderer, PdfReportRenderer, ReportDocument,
    ReportError, ReportFormat, ReportRenderer,
};
pub use results::{by_program, program_options, sort_by_closing_rank, ResultSet, SortDirection};
