use crate::api::models::{Computer, ComputerPage, FilterOptions, InventorySummary, Section};
use crate::core::query::ListingQuery;
use crate::error::ApiError;
use async_trait::async_trait;

/// Remote inventory operations the table controller depends on
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// `GET /all_compyuters/` with the given query
    async fn list_computers(&self, query: &ListingQuery) -> Result<ComputerPage, ApiError>;

    /// `GET /filter-options/`
    async fn filter_options(&self) -> Result<FilterOptions, ApiError>;

    /// `GET /all_texnology/?departament=<id>`
    async fn sections_by_department(&self, department_id: u32) -> Result<Vec<Section>, ApiError>;

    /// `POST /filter-data/` with a statistic card title as key
    async fn statistic_rows(&self, key: &str) -> Result<Vec<Computer>, ApiError>;

    /// `GET /info-comp/`
    async fn summary(&self) -> Result<InventorySummary, ApiError>;

    async fn delete_computer(&self, slug: &str) -> Result<(), ApiError>;
}
