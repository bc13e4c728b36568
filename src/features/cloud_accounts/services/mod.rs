mod cloud_account_service;

pub use cloud_account_service::CloudAccountService;
