pub mod analytics_handler;
pub mod target_handler;
