pub mod report_handler;

pub use report_handler::{
    __path_create_report, __path_download_report, __path_get_report_status,
    __path_list_account_reports, create_report, download_report, get_report_status,
    list_account_reports,
};
