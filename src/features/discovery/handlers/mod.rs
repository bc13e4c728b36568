pub mod validate_handler;

pub use validate_handler::{
    __path_validate_aws, __path_validate_azure, validate_aws, validate_azure,
};
