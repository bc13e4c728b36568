mod resource_dto;

pub use resource_dto::{ResourceQueryParams, ResourceResponseDto};
