// Reporting and aggregation module

pub mod csv;
pub mod handlers;
pub mod models;
pub mod service;

pub use models::{DailySummaryEntry, ExpatMonthlyDeduction};
pub use service::ReportService;
