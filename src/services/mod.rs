pub mod dashboard_api;

pub use dashboard_api::{DashboardApi, FetchRequest};
