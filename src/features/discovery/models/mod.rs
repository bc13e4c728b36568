mod credentials;
mod discovered_resource;

pub use credentials::{AwsCredentials, AzureCredentials, ProviderCredentials};
pub use discovered_resource::{DiscoveredResource, ScanFailure, ScanKind, ScannedResource};
