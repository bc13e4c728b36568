pub mod cloud_accounts;
pub mod discovery;
pub mod reports;
pub mod resources;
