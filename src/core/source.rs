//! Where table rows come from: the server (live) or a set handed over by a
//! statistic card (preselected), plus the shared pagination window.

use crate::api::models::Computer;
use crate::core::sort::sort_by_department;

pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Offset-based pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Index of the first visible row
    pub offset: usize,
    pub page_size: usize,
    /// Total records in the active source
    pub total: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            offset: 0,
            page_size,
            total: 0,
        }
    }

    fn effective_size(&self) -> usize {
        self.page_size.max(1)
    }

    /// Zero-based page index
    pub fn page_index(&self) -> usize {
        self.offset / self.effective_size()
    }

    /// One-based page number as sent to the server
    pub fn page_number(&self) -> usize {
        self.page_index() + 1
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.effective_size())
    }

    pub fn has_next(&self) -> bool {
        self.page_number() < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page_index() > 0
    }

    /// Move to a zero-based page
    pub fn go_to_page(&mut self, page_index: usize) {
        self.offset = page_index * self.effective_size();
    }

    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.go_to_page(self.page_index() + 1);
        true
    }

    pub fn prev(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.go_to_page(self.page_index() - 1);
        true
    }

    /// Row range `[start, end)` of the current page clamped to `len`
    pub fn window(&self, len: usize) -> (usize, usize) {
        let size = self.effective_size();
        let start = (self.page_index() * size).min(len);
        let end = (start + size).min(len);
        (start, end)
    }
}

/// Active data source of the table
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DataSource {
    /// Server-paginated listing
    #[default]
    Live,
    /// Finite set selected through a statistic card, sorted once on entry
    Preselected { key: String, rows: Vec<Computer> },
}

impl DataSource {
    pub fn preselected(key: impl Into<String>, mut rows: Vec<Computer>) -> Self {
        sort_by_department(&mut rows);
        DataSource::Preselected {
            key: key.into(),
            rows,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, DataSource::Live)
    }

    pub fn statistic_key(&self) -> Option<&str> {
        match self {
            DataSource::Live => None,
            DataSource::Preselected { key, .. } => Some(key),
        }
    }
}

/// Rows of the current page of a preselected set
pub fn slice_page(rows: &[Computer], pagination: &Pagination) -> Vec<Computer> {
    let (start, end) = pagination.window(rows.len());
    rows[start..end].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::NamedRef;

    fn rows(n: usize) -> Vec<Computer> {
        (0..n)
            .map(|i| Computer {
                slug: format!("pc-{}", i),
                department: Some(NamedRef {
                    id: None,
                    name: format!("{}-цех", i),
                }),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_page_number_from_offset() {
        let mut p = Pagination::with_page_size(50);
        assert_eq!(p.page_number(), 1);
        p.offset = 49;
        assert_eq!(p.page_number(), 1);
        p.offset = 50;
        assert_eq!(p.page_number(), 2);
        p.offset = 175;
        assert_eq!(p.page_number(), 4);
    }

    #[test]
    fn test_zero_page_size_does_not_divide_by_zero() {
        let p = Pagination {
            offset: 3,
            page_size: 0,
            total: 5,
        };
        assert_eq!(p.page_number(), 4);
        assert_eq!(p.total_pages(), 5);
    }

    #[test]
    fn test_next_prev_bounds() {
        let mut p = Pagination {
            offset: 0,
            page_size: 10,
            total: 25,
        };
        assert_eq!(p.total_pages(), 3);
        assert!(!p.prev());
        assert!(p.next());
        assert!(p.next());
        assert_eq!(p.offset, 20);
        assert!(!p.next());
        assert!(p.prev());
        assert_eq!(p.offset, 10);
    }

    #[test]
    fn test_slice_page_windows() {
        let data = rows(12);
        let mut p = Pagination {
            offset: 0,
            page_size: 5,
            total: 12,
        };
        assert_eq!(slice_page(&data, &p).len(), 5);

        p.go_to_page(2);
        let last = slice_page(&data, &p);
        assert_eq!(last.len(), 2);
        assert_eq!(last[0].slug, "pc-10");

        p.go_to_page(7);
        assert!(slice_page(&data, &p).is_empty());
    }

    #[test]
    fn test_preselected_is_sorted_on_entry() {
        let mut data = rows(3);
        data.reverse();
        let source = DataSource::preselected("Интернет", data);
        match source {
            DataSource::Preselected { key, rows } => {
                assert_eq!(key, "Интернет");
                assert_eq!(rows[0].slug, "pc-0");
                assert_eq!(rows[2].slug, "pc-2");
            }
            DataSource::Live => panic!("expected preselected source"),
        }
    }

    #[test]
    fn test_statistic_key() {
        assert!(DataSource::Live.statistic_key().is_none());
        assert!(DataSource::Live.is_live());
        let source = DataSource::preselected("МФУ", Vec::new());
        assert_eq!(source.statistic_key(), Some("МФУ"));
        assert!(!source.is_live());
    }
}
