use crate::api::models::{
    Computer, ComputerPage, FilterOptions, InventorySummary, Section, SectionsResponse,
    StatisticRequest,
};
use crate::core::query::ListingQuery;
use crate::core::services::traits::InventoryApi;
use crate::error::ApiError;
use crate::utils::error_helpers::{convert_json_error, convert_request_error};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("compinv/", env!("CARGO_PKG_VERSION"));

pub const LISTING_ENDPOINT: &str = "/all_compyuters/";
pub const FILTER_OPTIONS_ENDPOINT: &str = "/filter-options/";
pub const SECTIONS_ENDPOINT: &str = "/all_texnology/";
pub const STATISTIC_ENDPOINT: &str = "/filter-data/";
pub const SUMMARY_ENDPOINT: &str = "/info-comp/";
const COMPUTER_ENDPOINT: &str = "/compyuter/";

#[derive(Debug, Clone)]
pub struct InventoryClient {
    client: Client,
    pub base_url: String,
    pub token: Option<String>,
    timeout_secs: u64,
}

impl InventoryClient {
    // Create baseClient with default settings
    pub fn new(base_url: String) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: String, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Http {
                status: 0,
                endpoint: "client_init".to_string(),
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(InventoryClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            timeout_secs,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.authorize(self.client.request(method, url))
    }

    fn authorize(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        request
    }

    async fn send(&self, request: RequestBuilder, endpoint: &str) -> Result<Response, ApiError> {
        log::debug!("-> {}", endpoint);
        request
            .send()
            .await
            .map_err(|e| convert_request_error(e, endpoint, self.timeout_secs))
    }

    async fn get_json<T>(&self, request: RequestBuilder, endpoint: &str) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.send(request, endpoint).await?;
        self.handle_response(response, endpoint).await
    }

    pub async fn handle_response<T>(&self, response: Response, endpoint: &str) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();
        log::debug!("<- {} {}", endpoint, status);

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| convert_json_error(e, status.as_u16(), endpoint))
        } else {
            Err(self.error_from_response(response, endpoint).await)
        }
    }

    async fn error_from_response(&self, response: Response, endpoint: &str) -> ApiError {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        match status.as_u16() {
            401 | 403 => ApiError::Unauthorized {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
                server_message: error_text,
            },
            408 | 504 => ApiError::Timeout {
                timeout_secs: self.timeout_secs,
                endpoint: endpoint.to_string(),
            },
            _ => ApiError::Http {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
                message: error_text,
            },
        }
    }

    /// Listing page for the given query
    pub async fn list_computers(&self, query: &ListingQuery) -> Result<ComputerPage, ApiError> {
        let request = self
            .build_request(Method::GET, LISTING_ENDPOINT)
            .query(query.pairs());
        self.get_json(request, LISTING_ENDPOINT).await
    }

    pub async fn get_filter_options(&self) -> Result<FilterOptions, ApiError> {
        let request = self.build_request(Method::GET, FILTER_OPTIONS_ENDPOINT);
        self.get_json(request, FILTER_OPTIONS_ENDPOINT).await
    }

    /// Sections belonging to one department
    pub async fn get_sections(&self, department_id: u32) -> Result<Vec<Section>, ApiError> {
        let request = self
            .build_request(Method::GET, SECTIONS_ENDPOINT)
            .query(&[("departament", department_id)]);
        let response: SectionsResponse = self.get_json(request, SECTIONS_ENDPOINT).await?;
        Ok(response.section)
    }

    /// Rows behind a statistic card
    pub async fn get_statistic_rows(&self, key: &str) -> Result<Vec<Computer>, ApiError> {
        let body = StatisticRequest {
            key: key.to_string(),
        };
        let request = self.build_request(Method::POST, STATISTIC_ENDPOINT).json(&body);
        self.get_json(request, STATISTIC_ENDPOINT).await
    }

    pub async fn get_summary(&self) -> Result<InventorySummary, ApiError> {
        let request = self.build_request(Method::GET, SUMMARY_ENDPOINT);
        self.get_json(request, SUMMARY_ENDPOINT).await
    }

    /// Record URL with the slug percent-encoded as a single path segment
    pub fn computer_url(&self, slug: &str) -> Result<Url, ApiError> {
        let invalid = |message: String| ApiError::Http {
            status: 0,
            endpoint: COMPUTER_ENDPOINT.to_string(),
            message,
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(["compyuter", slug, ""]);
        Ok(url)
    }

    pub async fn delete_computer(&self, slug: &str) -> Result<(), ApiError> {
        let url = self.computer_url(slug)?;
        let endpoint = url.path().to_string();
        let request = self.authorize(self.client.request(Method::DELETE, url));
        let response = self.send(request, &endpoint).await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.error_from_response(response, &endpoint).await)
        }
    }
}

#[async_trait]
impl InventoryApi for InventoryClient {
    async fn list_computers(&self, query: &ListingQuery) -> Result<ComputerPage, ApiError> {
        InventoryClient::list_computers(self, query).await
    }

    async fn filter_options(&self) -> Result<FilterOptions, ApiError> {
        self.get_filter_options().await
    }

    async fn sections_by_department(&self, department_id: u32) -> Result<Vec<Section>, ApiError> {
        self.get_sections(department_id).await
    }

    async fn statistic_rows(&self, key: &str) -> Result<Vec<Computer>, ApiError> {
        self.get_statistic_rows(key).await
    }

    async fn summary(&self) -> Result<InventorySummary, ApiError> {
        self.get_summary().await
    }

    async fn delete_computer(&self, slug: &str) -> Result<(), ApiError> {
        InventoryClient::delete_computer(self, slug).await
    }
}
