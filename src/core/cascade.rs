//! Department → section cascade and per-column popup visibility.

use crate::api::models::Section;
use crate::core::filters::FilterColumn;

/// Section options scoped to the selected department
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionCascade {
    department_id: Option<u32>,
    options: Vec<Section>,
}

impl SectionCascade {
    pub fn department_id(&self) -> Option<u32> {
        self.department_id
    }

    /// The section filter is usable only once a department id is known
    pub fn is_enabled(&self) -> bool {
        self.department_id.is_some()
    }

    pub fn options(&self) -> &[Section] {
        &self.options
    }

    /// Start a new department scope. Old options never outlive their scope.
    pub fn select(&mut self, department_id: Option<u32>) {
        self.department_id = department_id;
        self.options.clear();
    }

    /// Store options fetched for `department_id`, ignoring answers for a
    /// scope that is no longer selected.
    pub fn load(&mut self, department_id: u32, options: Vec<Section>) -> bool {
        if self.department_id != Some(department_id) {
            log::debug!(
                "dropping sections of department {} (current: {:?})",
                department_id,
                self.department_id
            );
            return false;
        }
        self.options = options;
        true
    }

    pub fn clear(&mut self) {
        self.department_id = None;
        self.options.clear();
    }

    /// Section filter value for an option label (the option's raw name)
    pub fn resolve(&self, label: &str) -> Option<&Section> {
        self.options
            .iter()
            .find(|s| s.raw_name == label)
            .or_else(|| self.options.iter().find(|s| s.name == label))
    }
}

/// Which column filter popup is currently open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnPopups {
    open: Option<FilterColumn>,
}

impl ColumnPopups {
    pub fn is_open(&self, column: FilterColumn) -> bool {
        self.open == Some(column)
    }

    pub fn open_column(&self) -> Option<FilterColumn> {
        self.open
    }

    /// Toggle a popup, closing any other one. Returns the new state.
    pub fn toggle(&mut self, column: FilterColumn) -> bool {
        if self.is_open(column) {
            self.open = None;
            false
        } else {
            self.open = Some(column);
            true
        }
    }

    pub fn close(&mut self, column: FilterColumn) {
        if self.is_open(column) {
            self.open = None;
        }
    }

    pub fn close_all(&mut self) {
        self.open = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(id: u32, name: &str, raw_name: &str) -> Section {
        Section {
            id,
            name: name.to_string(),
            raw_name: raw_name.to_string(),
        }
    }

    #[test]
    fn test_disabled_until_department_selected() {
        let mut cascade = SectionCascade::default();
        assert!(!cascade.is_enabled());
        cascade.select(Some(4));
        assert!(cascade.is_enabled());
        cascade.select(None);
        assert!(!cascade.is_enabled());
    }

    #[test]
    fn test_load_for_current_scope_only() {
        let mut cascade = SectionCascade::default();
        cascade.select(Some(1));
        cascade.select(Some(2));
        assert!(!cascade.load(1, vec![section(1, "ОТК", "ОТК (1)")]));
        assert!(cascade.options().is_empty());
        assert!(cascade.load(2, vec![section(2, "ОТК", "ОТК (2)")]));
        assert_eq!(cascade.options().len(), 1);
    }

    #[test]
    fn test_select_drops_previous_options() {
        let mut cascade = SectionCascade::default();
        cascade.select(Some(1));
        cascade.load(1, vec![section(1, "ОТК", "ОТК (1)")]);
        cascade.select(Some(2));
        assert!(cascade.options().is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cascade = SectionCascade::default();
        cascade.select(Some(1));
        cascade.load(1, vec![section(1, "ОТК", "ОТК (1)")]);
        cascade.clear();
        assert!(cascade.department_id().is_none());
        assert!(cascade.options().is_empty());
    }

    #[test]
    fn test_resolve_prefers_raw_name() {
        let mut cascade = SectionCascade::default();
        cascade.select(Some(1));
        cascade.load(
            1,
            vec![section(1, "ОТК", "ОТК (1-цех)"), section(2, "Склад", "Склад (1-цех)")],
        );
        assert_eq!(cascade.resolve("ОТК (1-цех)").map(|s| s.id), Some(1));
        assert_eq!(cascade.resolve("Склад").map(|s| s.id), Some(2));
        assert!(cascade.resolve("Бухгалтерия").is_none());
    }

    #[test]
    fn test_only_one_popup_open() {
        let mut popups = ColumnPopups::default();
        assert!(popups.toggle(FilterColumn::Department));
        assert!(popups.toggle(FilterColumn::HardwareType));
        assert!(!popups.is_open(FilterColumn::Department));
        assert_eq!(popups.open_column(), Some(FilterColumn::HardwareType));
        assert!(!popups.toggle(FilterColumn::HardwareType));
        assert!(popups.open_column().is_none());
    }

    #[test]
    fn test_close_other_column_keeps_open_popup() {
        let mut popups = ColumnPopups::default();
        popups.toggle(FilterColumn::IpAddress);
        popups.close(FilterColumn::User);
        assert_eq!(popups.open_column(), Some(FilterColumn::IpAddress));
        popups.close(FilterColumn::IpAddress);
        assert!(popups.open_column().is_none());
    }
}
