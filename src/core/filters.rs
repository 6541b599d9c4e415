//! Per-column filter state of the computer table.
//!
//! Every filterable column has its own field; there are no stringly-typed
//! keys. Department and section are linked: a department change always
//! invalidates the section filter.

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;
use std::str::FromStr;

use crate::error::CliError;

/// How a filter value is compared server-side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    #[default]
    Contains,
    DateIs,
}

/// A single column filter: optional value plus its comparison mode
#[derive(Debug, Clone, PartialEq)]
pub struct FilterField<T> {
    pub value: Option<T>,
    pub match_mode: MatchMode,
}

impl<T> FilterField<T> {
    pub fn new(match_mode: MatchMode) -> Self {
        Self {
            value: None,
            match_mode,
        }
    }

    pub fn set(&mut self, value: T) {
        self.value = Some(value);
    }

    pub fn clear(&mut self) {
        self.value = None;
    }
}

impl FilterField<String> {
    pub fn contains() -> Self {
        Self::new(MatchMode::Contains)
    }

    /// Value if present and non-empty
    pub fn active_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }
}

impl FilterField<NaiveDateTime> {
    pub fn date_is() -> Self {
        Self::new(MatchMode::DateIs)
    }
}

/// Filterable columns of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterColumn {
    Department,
    Section,
    HardwareType,
    IpAddress,
    User,
    HistoryDate,
    HistoryUser,
}

impl FilterColumn {
    pub const ALL: [FilterColumn; 7] = [
        FilterColumn::Department,
        FilterColumn::Section,
        FilterColumn::HardwareType,
        FilterColumn::IpAddress,
        FilterColumn::User,
        FilterColumn::HistoryDate,
        FilterColumn::HistoryUser,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterColumn::Department => "department",
            FilterColumn::Section => "section",
            FilterColumn::HardwareType => "type",
            FilterColumn::IpAddress => "ip",
            FilterColumn::User => "user",
            FilterColumn::HistoryDate => "date",
            FilterColumn::HistoryUser => "huser",
        }
    }
}

impl fmt::Display for FilterColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FilterColumn {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "department" | "dept" => Ok(FilterColumn::Department),
            "section" => Ok(FilterColumn::Section),
            "type" => Ok(FilterColumn::HardwareType),
            "ip" => Ok(FilterColumn::IpAddress),
            "user" => Ok(FilterColumn::User),
            "date" | "history-date" => Ok(FilterColumn::HistoryDate),
            "huser" | "history-user" => Ok(FilterColumn::HistoryUser),
            other => Err(CliError::InvalidArguments(format!(
                "Unknown filter column '{}'. Use one of: department, section, type, ip, user, date, huser",
                other
            ))),
        }
    }
}

/// Complete filter state of one table session
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub department: FilterField<String>,
    pub section: FilterField<String>,
    pub hardware_type: FilterField<String>,
    pub ip_address: FilterField<String>,
    pub user: FilterField<String>,
    pub history_date: FilterField<NaiveDateTime>,
    pub history_user: FilterField<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            department: FilterField::contains(),
            section: FilterField::contains(),
            hardware_type: FilterField::contains(),
            ip_address: FilterField::contains(),
            user: FilterField::contains(),
            history_date: FilterField::date_is(),
            history_user: FilterField::contains(),
        }
    }
}

impl FilterState {
    /// Set the department filter; the section filter is always dropped.
    pub fn select_department(&mut self, name: impl Into<String>) {
        self.department.set(name.into());
        self.section.clear();
    }

    pub fn set_text(&mut self, column: FilterColumn, value: impl Into<String>) {
        let value = value.into();
        match column {
            FilterColumn::Department => self.select_department(value),
            FilterColumn::Section => self.section.set(value),
            FilterColumn::HardwareType => self.hardware_type.set(value),
            FilterColumn::IpAddress => self.ip_address.set(value),
            FilterColumn::User => self.user.set(value),
            FilterColumn::HistoryUser => self.history_user.set(value),
            FilterColumn::HistoryDate => {
                log::warn!("history date filter takes a date value, ignoring '{}'", value)
            }
        }
    }

    pub fn set_history_date(&mut self, value: NaiveDateTime) {
        self.history_date.set(value);
    }

    /// Clear one column. Clearing the department also clears the section.
    pub fn clear(&mut self, column: FilterColumn) {
        match column {
            FilterColumn::Department => {
                self.department.clear();
                self.section.clear();
            }
            FilterColumn::Section => self.section.clear(),
            FilterColumn::HardwareType => self.hardware_type.clear(),
            FilterColumn::IpAddress => self.ip_address.clear(),
            FilterColumn::User => self.user.clear(),
            FilterColumn::HistoryDate => self.history_date.clear(),
            FilterColumn::HistoryUser => self.history_user.clear(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self, column: FilterColumn) -> bool {
        self.display_value(column).is_some()
    }

    pub fn is_empty(&self) -> bool {
        FilterColumn::ALL.iter().all(|c| !self.is_active(*c))
    }

    /// Human-readable value of an active filter
    pub fn display_value(&self, column: FilterColumn) -> Option<String> {
        match column {
            FilterColumn::Department => self.department.active_value().map(str::to_string),
            FilterColumn::Section => self.section.active_value().map(str::to_string),
            FilterColumn::HardwareType => self.hardware_type.active_value().map(str::to_string),
            FilterColumn::IpAddress => self.ip_address.active_value().map(str::to_string),
            FilterColumn::User => self.user.active_value().map(str::to_string),
            FilterColumn::HistoryDate => self
                .history_date
                .value
                .map(|d| d.date().format("%d.%m.%Y").to_string()),
            FilterColumn::HistoryUser => self.history_user.active_value().map(str::to_string),
        }
    }

    pub fn active(&self) -> Vec<(FilterColumn, String)> {
        FilterColumn::ALL
            .iter()
            .filter_map(|c| self.display_value(*c).map(|v| (*c, v)))
            .collect()
    }
}

/// Parse a history-date filter value.
///
/// Accepts `YYYY-MM-DD`, `DD.MM.YYYY`, `DD.MM.YY`, RFC 3339 timestamps and
/// `YYYY-MM-DD HH:MM:SS`. Date-only inputs become midnight.
pub fn parse_filter_date(input: &str) -> Result<NaiveDateTime, CliError> {
    let input = input.trim();

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(input) {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }

    // %Y accepts two digits too, so the short year form has to be tried first
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, "%d.%m.%y"))
        .or_else(|_| NaiveDate::parse_from_str(input, "%d.%m.%Y"))
        .map_err(|_| {
            CliError::InvalidArguments(format!(
                "Invalid date '{}': expected YYYY-MM-DD or DD.MM.YYYY",
                input
            ))
        })?;

    date.and_hms_opt(0, 0, 0)
        .ok_or_else(|| CliError::InvalidArguments(format!("Invalid date '{}'", input)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_empty() {
        let state = FilterState::default();
        assert!(state.is_empty());
        assert_eq!(state.history_date.match_mode, MatchMode::DateIs);
        assert_eq!(state.department.match_mode, MatchMode::Contains);
    }

    #[test]
    fn test_selecting_department_clears_section() {
        let mut state = FilterState::default();
        state.select_department("2-цех");
        state.set_text(FilterColumn::Section, "ОТК");
        assert!(state.is_active(FilterColumn::Section));

        state.select_department("10-цех");
        assert_eq!(state.department.active_value(), Some("10-цех"));
        assert!(!state.is_active(FilterColumn::Section));
    }

    #[test]
    fn test_set_text_department_goes_through_cascade() {
        let mut state = FilterState::default();
        state.set_text(FilterColumn::Section, "ОТК");
        state.set_text(FilterColumn::Department, "2-цех");
        assert!(state.section.value.is_none());
    }

    #[test]
    fn test_clearing_department_clears_section() {
        let mut state = FilterState::default();
        state.select_department("2-цех");
        state.set_text(FilterColumn::Section, "ОТК");
        state.clear(FilterColumn::Department);
        assert!(state.is_empty());
    }

    #[test]
    fn test_clear_single_column_keeps_others() {
        let mut state = FilterState::default();
        state.set_text(FilterColumn::User, "Иванов");
        state.set_text(FilterColumn::IpAddress, "10.0.0.1");
        state.clear(FilterColumn::User);
        assert!(!state.is_active(FilterColumn::User));
        assert!(state.is_active(FilterColumn::IpAddress));
    }

    #[test]
    fn test_empty_string_is_not_active() {
        let mut state = FilterState::default();
        state.set_text(FilterColumn::User, "");
        assert!(!state.is_active(FilterColumn::User));
        assert!(state.is_empty());
    }

    #[test]
    fn test_reset() {
        let mut state = FilterState::default();
        state.set_text(FilterColumn::HardwareType, "Ноутбук");
        state.set_history_date(parse_filter_date("2024-03-05").unwrap());
        state.reset();
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn test_active_lists_in_column_order() {
        let mut state = FilterState::default();
        state.set_text(FilterColumn::HistoryUser, "admin");
        state.select_department("2-цех");
        let active = state.active();
        assert_eq!(active[0], (FilterColumn::Department, "2-цех".to_string()));
        assert_eq!(active[1], (FilterColumn::HistoryUser, "admin".to_string()));
    }

    #[test]
    fn test_filter_column_from_str() {
        assert_eq!("dept".parse::<FilterColumn>().unwrap(), FilterColumn::Department);
        assert_eq!("IP".parse::<FilterColumn>().unwrap(), FilterColumn::IpAddress);
        assert_eq!(
            "history-user".parse::<FilterColumn>().unwrap(),
            FilterColumn::HistoryUser
        );
        assert!("mac".parse::<FilterColumn>().is_err());
    }

    #[test]
    fn test_parse_filter_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_filter_date("2024-03-05").unwrap().date(), expected);
        assert_eq!(parse_filter_date("05.03.2024").unwrap().date(), expected);
        assert_eq!(parse_filter_date("05.03.24").unwrap().date(), expected);
        assert_eq!(
            parse_filter_date("2024-03-05T23:30:00+05:00").unwrap().date(),
            expected
        );
        assert_eq!(
            parse_filter_date("2024-03-05 18:00:00").unwrap().date(),
            expected
        );
        assert!(parse_filter_date("yesterday").is_err());
    }
}
