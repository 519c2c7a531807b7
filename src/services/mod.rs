pub mod chart_service;
pub mod history_service;
