mod discovery_service;
mod scanner;

pub use discovery_service::{DiscoveryResult, DiscoveryService};
pub use scanner::{normalize, ResourceScanner, ScanOutcome};
