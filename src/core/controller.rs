//! Filtered, paginated table controller.
//!
//! The controller owns every piece of session state of the computer table:
//! filters, the search box, pagination, the active data source, the option
//! catalog and the section cascade. State mutations are synchronous and
//! return the fetches they trigger as [`PendingFetch`] values; callers either
//! run them to completion with [`TableController::settle`] or drive them
//! concurrently through [`TableController::dispatch`] and feed the results
//! back into [`TableController::complete`]. Listing and statistic fetches
//! carry sequence numbers from two separate counters. Only the most recently
//! issued listing may fill the live table, and only the most recent statistic
//! card choice may switch the data source. A local re-slice of a preselected
//! set issues no request and invalidates nothing.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use tokio::time::Instant;

use crate::api::models::{Computer, ComputerPage, Department, FilterOptions, Section};
use crate::core::cascade::{ColumnPopups, SectionCascade};
use crate::core::debounce::{DEFAULT_SEARCH_DEBOUNCE, Debouncer};
use crate::core::filters::{FilterColumn, FilterState};
use crate::core::query::ListingQuery;
use crate::core::services::InventoryApi;
use crate::core::sort::{sort_by_department, sort_departments};
use crate::core::source::{DEFAULT_PAGE_SIZE, DataSource, Pagination, slice_page};
use crate::error::{ApiError, ExportError, ServiceError};
use crate::export::csv::export_to_file;
use crate::export::{LIVE_EXPORT_NAME, Notification, PRESELECTED_EXPORT_NAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub page_size: usize,
    pub search_debounce: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

/// A fetch requested by a state change that has not been sent yet
#[derive(Debug, Clone, PartialEq)]
pub enum PendingFetch {
    Listing { seq: u64, query: ListingQuery },
    Statistic { seq: u64, key: String },
    Sections { department_id: u32 },
}

/// Result of a dispatched [`PendingFetch`]
#[derive(Debug)]
pub enum FetchOutcome {
    Listing {
        seq: u64,
        result: Result<ComputerPage, ApiError>,
    },
    Statistic {
        seq: u64,
        key: String,
        result: Result<Vec<Computer>, ApiError>,
    },
    Sections {
        department_id: u32,
        result: Result<Vec<Section>, ApiError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    View,
    Edit,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowActionOutcome {
    /// Dashboard route to open
    Navigate(String),
    Deleted(String),
}

pub fn view_route(slug: &str) -> String {
    format!("/view-computer/{}", slug)
}

pub fn edit_route(slug: &str) -> String {
    format!("/edit-computer/{}", slug)
}

pub struct TableController<A: InventoryApi> {
    api: Arc<A>,
    settings: ControllerSettings,
    filters: FilterState,
    search_input: String,
    search: String,
    debouncer: Debouncer<String>,
    pagination: Pagination,
    source: DataSource,
    options: FilterOptions,
    cascade: SectionCascade,
    popups: ColumnPopups,
    rows: Vec<Computer>,
    listing_pending: bool,
    statistic_pending: bool,
    listing_seq: u64,
    statistic_seq: u64,
}

impl<A: InventoryApi + 'static> TableController<A> {
    pub fn new(api: Arc<A>, settings: ControllerSettings) -> Self {
        Self {
            api,
            settings,
            filters: FilterState::default(),
            search_input: String::new(),
            search: String::new(),
            debouncer: Debouncer::new(settings.search_debounce),
            pagination: Pagination::with_page_size(settings.page_size),
            source: DataSource::Live,
            options: FilterOptions::default(),
            cascade: SectionCascade::default(),
            popups: ColumnPopups::default(),
            rows: Vec::new(),
            listing_pending: false,
            statistic_pending: false,
            listing_seq: 0,
            statistic_seq: 0,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Search text as typed, before debouncing
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// Search text currently applied to the listing
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn popups(&self) -> &ColumnPopups {
        &self.popups
    }

    /// Rows of the visible page
    pub fn rows(&self) -> &[Computer] {
        &self.rows
    }

    pub fn is_loading(&self) -> bool {
        self.listing_pending || self.statistic_pending
    }

    pub fn is_section_enabled(&self) -> bool {
        self.cascade.is_enabled()
    }

    pub fn section_options(&self) -> &[Section] {
        self.cascade.options()
    }

    /// Department options in numeric-prefix order
    pub fn department_options(&self) -> Vec<Department> {
        sort_departments(&self.options.departments)
    }

    /// Load the filter option catalog. Failure leaves the catalog empty.
    pub async fn load_options(&mut self) {
        match self.api.filter_options().await {
            Ok(options) => self.options = options,
            Err(e) => {
                log::error!("failed to load filter options: {}", e);
                self.options = FilterOptions::default();
            }
        }
    }

    fn next_listing_seq(&mut self) -> u64 {
        self.listing_seq += 1;
        self.listing_seq
    }

    fn next_statistic_seq(&mut self) -> u64 {
        self.statistic_seq += 1;
        self.statistic_seq
    }

    /// Start the fetch/slice cycle for the current state.
    ///
    /// A preselected source is sliced in place and needs no fetch.
    pub fn begin_refresh(&mut self) -> Vec<PendingFetch> {
        match &self.source {
            DataSource::Live => {
                let seq = self.next_listing_seq();
                self.listing_pending = true;
                let query = ListingQuery::build(&self.filters, &self.search, &self.pagination);
                vec![PendingFetch::Listing { seq, query }]
            }
            DataSource::Preselected { .. } => {
                self.apply_local_slice();
                Vec::new()
            }
        }
    }

    fn apply_local_slice(&mut self) {
        self.listing_pending = false;
        if let DataSource::Preselected { rows, .. } = &self.source {
            self.pagination.total = rows.len();
            self.rows = slice_page(rows, &self.pagination);
        }
    }

    /// Send a pending fetch. The returned future owns everything it needs.
    pub fn dispatch(&self, pending: PendingFetch) -> BoxFuture<'static, FetchOutcome> {
        let api = Arc::clone(&self.api);
        async move {
            match pending {
                PendingFetch::Listing { seq, query } => FetchOutcome::Listing {
                    seq,
                    result: api.list_computers(&query).await,
                },
                PendingFetch::Statistic { seq, key } => {
                    let result = api.statistic_rows(&key).await;
                    FetchOutcome::Statistic { seq, key, result }
                }
                PendingFetch::Sections { department_id } => FetchOutcome::Sections {
                    department_id,
                    result: api.sections_by_department(department_id).await,
                },
            }
        }
        .boxed()
    }

    /// Apply a fetch result. Returns `false` when the result was stale and
    /// has been dropped.
    pub fn complete(&mut self, outcome: FetchOutcome) -> bool {
        match outcome {
            FetchOutcome::Listing { seq, result } => {
                if seq != self.listing_seq || !self.source.is_live() {
                    log::debug!(
                        "dropping stale listing response #{} (latest #{})",
                        seq,
                        self.listing_seq
                    );
                    return false;
                }
                self.listing_pending = false;
                match result {
                    Ok(page) => {
                        let mut rows = page.results;
                        sort_by_department(&mut rows);
                        self.pagination.total = if rows.is_empty() {
                            0
                        } else {
                            page.count as usize
                        };
                        self.rows = rows;
                    }
                    Err(e) => {
                        log::error!("failed to fetch computers from {}: {}", e.endpoint(), e);
                        self.rows.clear();
                        self.pagination.total = 0;
                    }
                }
                true
            }
            FetchOutcome::Statistic { seq, key, result } => {
                if seq != self.statistic_seq {
                    log::debug!("dropping stale statistic response #{} ({})", seq, key);
                    return false;
                }
                self.statistic_pending = false;
                match result {
                    Ok(rows) => {
                        self.switch_source(DataSource::preselected(key, rows));
                        self.apply_local_slice();
                    }
                    Err(e) => {
                        log::error!("failed to load statistic '{}': {}", key, e);
                    }
                }
                true
            }
            FetchOutcome::Sections {
                department_id,
                result,
            } => {
                let sections = result.unwrap_or_else(|e| {
                    log::error!("failed to load sections of department {}: {}", department_id, e);
                    Vec::new()
                });
                self.cascade.load(department_id, sections)
            }
        }
    }

    /// Run pending fetches concurrently and apply their results
    pub async fn settle(&mut self, pending: Vec<PendingFetch>) {
        if pending.is_empty() {
            return;
        }
        let outcomes = join_all(pending.into_iter().map(|p| self.dispatch(p))).await;
        for outcome in outcomes {
            self.complete(outcome);
        }
    }

    pub async fn refresh(&mut self) {
        let pending = self.begin_refresh();
        self.settle(pending).await;
    }

    fn switch_source(&mut self, source: DataSource) {
        if self.source.statistic_key() != source.statistic_key() {
            self.pagination.offset = 0;
        }
        self.source = source;
    }

    fn filter_changed(&mut self, column: FilterColumn) -> Vec<PendingFetch> {
        self.popups.close(column);
        self.pagination.offset = 0;
        self.begin_refresh()
    }

    /// Select a department by name and request its sections
    pub fn select_department(&mut self, name: &str) -> Vec<PendingFetch> {
        let department_id = self.options.department_id(name);
        if department_id.is_none() {
            log::warn!("department '{}' is not in the option catalog", name);
        }

        self.filters.select_department(name);
        self.cascade.select(department_id);
        self.popups.close(FilterColumn::Section);

        let mut pending = self.filter_changed(FilterColumn::Department);
        if let Some(department_id) = department_id {
            pending.push(PendingFetch::Sections { department_id });
        }
        pending
    }

    /// Select a section by its option label. Ignored while no department
    /// id is resolved.
    pub fn select_section(&mut self, label: &str) -> Vec<PendingFetch> {
        if !self.cascade.is_enabled() {
            log::warn!("section filter needs a known department, ignoring '{}'", label);
            return Vec::new();
        }
        let value = self
            .cascade
            .resolve(label)
            .map(|s| s.raw_name.clone())
            .unwrap_or_else(|| label.to_string());
        self.filters.set_text(FilterColumn::Section, value);
        self.filter_changed(FilterColumn::Section)
    }

    /// Set a plain text filter (type, ip, user, history user)
    pub fn set_filter(&mut self, column: FilterColumn, value: &str) -> Vec<PendingFetch> {
        match column {
            FilterColumn::Department => self.select_department(value),
            FilterColumn::Section => self.select_section(value),
            FilterColumn::HistoryDate => match crate::core::filters::parse_filter_date(value) {
                Ok(date) => self.select_history_date(date),
                Err(e) => {
                    log::warn!("{}", e);
                    Vec::new()
                }
            },
            _ => {
                self.filters.set_text(column, value);
                self.filter_changed(column)
            }
        }
    }

    pub fn select_history_date(&mut self, date: NaiveDateTime) -> Vec<PendingFetch> {
        self.filters.set_history_date(date);
        self.filter_changed(FilterColumn::HistoryDate)
    }

    pub fn clear_filter(&mut self, column: FilterColumn) -> Vec<PendingFetch> {
        self.filters.clear(column);
        if column == FilterColumn::Department {
            self.cascade.clear();
            self.popups.close(FilterColumn::Section);
        }
        self.filter_changed(column)
    }

    /// Record typed search text; it applies once the debounce delay passes
    pub fn set_search(&mut self, text: &str) {
        self.search_input = text.to_string();
        self.debouncer.push(text.to_string());
    }

    /// When typed search text settles, if any is pending
    pub fn search_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Apply typed search text whose quiet period has passed
    pub fn apply_settled_search(&mut self) -> Vec<PendingFetch> {
        match self.debouncer.take_settled() {
            Some(text) => self.apply_search(text),
            None => Vec::new(),
        }
    }

    /// Apply typed search text without waiting
    pub fn flush_search(&mut self) -> Vec<PendingFetch> {
        match self.debouncer.flush() {
            Some(text) => self.apply_search(text),
            None => Vec::new(),
        }
    }

    fn apply_search(&mut self, text: String) -> Vec<PendingFetch> {
        if text == self.search {
            return Vec::new();
        }
        self.search = text;
        self.pagination.offset = 0;
        self.begin_refresh()
    }

    /// Jump to a 1-based page
    pub fn set_page(&mut self, page_number: usize) -> Vec<PendingFetch> {
        self.pagination.go_to_page(page_number.saturating_sub(1));
        self.begin_refresh()
    }

    pub fn next_page(&mut self) -> Vec<PendingFetch> {
        if self.pagination.next() {
            self.begin_refresh()
        } else {
            Vec::new()
        }
    }

    pub fn prev_page(&mut self) -> Vec<PendingFetch> {
        if self.pagination.prev() {
            self.begin_refresh()
        } else {
            Vec::new()
        }
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Vec<PendingFetch> {
        self.pagination.page_size = page_size.max(1);
        self.pagination.offset = 0;
        self.begin_refresh()
    }

    /// Show a finite row set handed over by a statistic card
    pub fn apply_statistic(&mut self, key: &str, rows: Vec<Computer>) {
        self.next_statistic_seq();
        self.statistic_pending = false;
        self.switch_source(DataSource::preselected(key, rows));
        self.apply_local_slice();
    }

    /// Fetch the rows of a statistic card and switch to them
    pub fn select_statistic(&mut self, key: &str) -> Vec<PendingFetch> {
        let seq = self.next_statistic_seq();
        self.statistic_pending = true;
        vec![PendingFetch::Statistic {
            seq,
            key: key.to_string(),
        }]
    }

    /// Back to server-paginated listing
    pub fn clear_statistic(&mut self) -> Vec<PendingFetch> {
        self.next_statistic_seq();
        self.statistic_pending = false;
        self.switch_source(DataSource::Live);
        self.begin_refresh()
    }

    /// Restore default filters, search and pagination. The data source is
    /// left as it is.
    pub fn reset(&mut self) -> Vec<PendingFetch> {
        self.filters.reset();
        self.cascade.clear();
        self.popups.close_all();
        self.search_input.clear();
        self.search.clear();
        self.debouncer.flush();
        self.pagination = Pagination::with_page_size(self.settings.page_size);
        self.begin_refresh()
    }

    /// Open or close a column popup. The section popup stays closed until a
    /// department id is resolved.
    pub fn toggle_popup(&mut self, column: FilterColumn) -> bool {
        if column == FilterColumn::Section && !self.cascade.is_enabled() {
            return false;
        }
        self.popups.toggle(column)
    }

    pub async fn row_action(
        &mut self,
        action: RowAction,
        slug: &str,
    ) -> Result<RowActionOutcome, ServiceError> {
        match action {
            RowAction::View => Ok(RowActionOutcome::Navigate(view_route(slug))),
            RowAction::Edit => Ok(RowActionOutcome::Navigate(edit_route(slug))),
            RowAction::Delete => {
                self.api.delete_computer(slug).await.map_err(|e| match e {
                    ApiError::Http { status: 404, .. } => ServiceError::NotFound {
                        resource_type: "Computer".to_string(),
                        key: slug.to_string(),
                    },
                    _ => ServiceError::Api(e),
                })?;

                let pending = match self.source.statistic_key().map(str::to_string) {
                    Some(key) => self.select_statistic(&key),
                    None => self.begin_refresh(),
                };
                self.settle(pending).await;
                Ok(RowActionOutcome::Deleted(slug.to_string()))
            }
        }
    }

    /// Rows an export covers: the visible page when live, the whole set
    /// when preselected
    pub fn export_rows(&self) -> &[Computer] {
        match &self.source {
            DataSource::Live => &self.rows,
            DataSource::Preselected { rows, .. } => rows,
        }
    }

    pub fn default_export_name(&self) -> &'static str {
        if self.source.is_live() {
            LIVE_EXPORT_NAME
        } else {
            PRESELECTED_EXPORT_NAME
        }
    }

    pub fn export_to(
        &self,
        dir: &Path,
        base: Option<&str>,
        date: NaiveDate,
    ) -> Result<(usize, PathBuf), ExportError> {
        let rows = self.export_rows();
        let base = base.unwrap_or_else(|| self.default_export_name());
        let path = export_to_file(rows, dir, base, date)?;
        Ok((rows.len(), path))
    }

    /// Export the visible set into `dir`, dated today (UTC)
    pub fn export(&self, dir: &Path, base: Option<&str>) -> Notification {
        Notification::from_export(&self.export_to(dir, base, Utc::now().date_naive()))
    }
}
