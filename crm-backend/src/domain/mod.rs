pub mod analytics_filters;
pub mod deal_model;
pub mod deal_stage;
pub mod lead_model;
pub mod lead_status;
pub mod period;
pub mod raw_metrics;
pub mod target_model;
pub mod target_type;
