pub mod analytics_repository;
pub mod target_repository;
