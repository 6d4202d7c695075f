pub mod analytics_service;
pub mod deal_metrics;
pub mod funnel;
pub mod insight;
pub mod lead_metrics;
pub mod metrics;
pub mod target_service;
