mod generator;
mod queue;
mod report_dispatcher;

pub use generator::{GenerationError, ReportGenerator, SubprocessGenerator};
pub use queue::ReportQueue;
pub use report_dispatcher::{ReportDispatcher, ReportJobObserver};
