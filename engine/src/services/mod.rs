// Request/response services over the loaded dataset.
pub mod dashboard_service;

pub use dashboard_service::{DashboardService, RecommendRequest};
