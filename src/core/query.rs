//! Query parameters for `GET /all_compyuters/`.

use crate::core::filters::FilterState;
use crate::core::source::Pagination;

/// Ordered `(key, value)` pairs of one listing request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingQuery {
    pairs: Vec<(&'static str, String)>,
}

impl ListingQuery {
    /// Build the canonical parameter list.
    ///
    /// Order: department, section, type, ip, user, history_date,
    /// history_user, search, page, page_size. Empty values are skipped and
    /// everything else is forwarded verbatim.
    pub fn build(filters: &FilterState, search: &str, pagination: &Pagination) -> Self {
        let mut pairs: Vec<(&'static str, String)> = Vec::with_capacity(10);

        let text_filters = [
            ("department", filters.department.active_value()),
            ("section", filters.section.active_value()),
            ("type", filters.hardware_type.active_value()),
            ("ip", filters.ip_address.active_value()),
            ("user", filters.user.active_value()),
        ];
        for (key, value) in text_filters {
            if let Some(value) = value {
                pairs.push((key, value.to_string()));
            }
        }

        if let Some(date) = filters.history_date.value {
            pairs.push(("history_date", date.date().format("%Y-%m-%d").to_string()));
        }

        if let Some(history_user) = filters.history_user.active_value() {
            pairs.push(("history_user", history_user.to_string()));
        }

        if !search.is_empty() {
            pairs.push(("search", search.to_string()));
        }

        pairs.push(("page", pagination.page_number().to_string()));
        pairs.push(("page_size", pagination.page_size.to_string()));

        Self { pairs }
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.pairs.iter().map(|(k, _)| *k).collect()
    }

    /// Form-urlencoded string in canonical order
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .finish()
    }
}
