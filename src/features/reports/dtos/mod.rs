pub mod report_dto;

pub use report_dto::{
    CreateReportDto, CreateReportMetadataDto, ReportMetadataDto, ReportResponseDto,
    ReportStatusResponseDto,
};
