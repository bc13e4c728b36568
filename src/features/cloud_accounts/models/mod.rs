mod cloud_account;

pub use cloud_account::{CloudAccount, CloudProvider, NewCloudAccount};
