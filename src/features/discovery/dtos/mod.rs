mod validate_dto;

pub use validate_dto::{
    parse_credentials, AwsValidateDto, AzureValidateDto, ScanFailureDto, ValidateResponseDto,
};
