//! Credential validation and multi-region resource discovery.
//!
//! A validate call proves the credentials by listing the provider's regions,
//! scans every region for compute and database resources, then records them
//! under the `(accountName, provider)` cloud account.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/aws/validate` | Validate AWS keys, scan EC2 + RDS |
//! | POST | `/api/azure/validate` | Validate an Azure service principal, scan VMs + SQL databases |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod providers;
pub mod routes;
pub mod services;

pub use providers::{ProviderConnector, SdkProviderConnector};
pub use services::DiscoveryService;
