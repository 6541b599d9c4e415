pub mod dashboard_service;
pub mod traits;

pub use crate::error::ServiceError;
pub use dashboard_service::{CardCount, DashboardService, StatisticCard};
pub use traits::InventoryApi;
