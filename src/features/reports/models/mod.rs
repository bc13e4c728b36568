mod report;
mod report_job;
mod resource_selector;

pub use report::{
    download_url, NewReport, Report, ReportFrequency, ReportMetadata, ReportOutcome, ReportStatus,
    ReportType,
};
pub use report_job::{GenerationParams, ReportJob};
pub use resource_selector::ResourceSelector;
