pub mod cloud_account_dto;

pub use cloud_account_dto::{CloudAccountResponseDto, CreateCloudAccountDto};
