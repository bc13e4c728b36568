pub mod cloud_account_handler;

pub use cloud_account_handler::{
    __path_create_cloud_account, __path_list_cloud_accounts, create_cloud_account,
    list_cloud_accounts,
};
