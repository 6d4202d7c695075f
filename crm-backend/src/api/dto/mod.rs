pub mod analytics_dto;
pub mod analytics_query_dto;
pub mod target_dto;
