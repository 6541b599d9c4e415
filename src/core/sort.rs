//! Department ordering: numeric prefix first, then case-insensitive name.
//!
//! Department names look like `"2-цех"` or `"10-цех"`; plain lexical order
//! would put `"10-цех"` first. Names without a leading number sort after all
//! numbered ones.

use std::cmp::Ordering;

use crate::api::models::{Computer, Department};

/// Leading ASCII digits of a name, `None` when there are none
pub fn extract_prefix(name: &str) -> Option<u64> {
    let digits: String = name.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    // An absurdly long prefix still counts as numbered, just very large
    Some(digits.parse::<u64>().unwrap_or(u64::MAX))
}

/// Compare two department names
pub fn compare_department_names(a: &str, b: &str) -> Ordering {
    let by_prefix = match (extract_prefix(a), extract_prefix(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    by_prefix.then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
}

/// Department list in display order
pub fn sort_departments(departments: &[Department]) -> Vec<Department> {
    let mut sorted = departments.to_vec();
    sorted.sort_by(|a, b| compare_department_names(&a.name, &b.name));
    sorted
}

/// Rows ordered by department; rows without a department go last
pub fn sort_by_department(rows: &mut [Computer]) {
    rows.sort_by(|a, b| match (a.department_name(), b.department_name()) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => compare_department_names(x, y),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::NamedRef;

    fn computer(slug: &str, department: Option<&str>) -> Computer {
        Computer {
            slug: slug.to_string(),
            department: department.map(|name| NamedRef {
                id: None,
                name: name.to_string(),
            }),
            ..Default::default()
        }
    }

    fn department(id: u32, name: &str) -> Department {
        Department {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_extract_prefix() {
        assert_eq!(extract_prefix("2-цех"), Some(2));
        assert_eq!(extract_prefix("10-цех"), Some(10));
        assert_eq!(extract_prefix("007"), Some(7));
        assert_eq!(extract_prefix("Склад"), None);
        assert_eq!(extract_prefix(""), None);
    }

    #[test]
    fn test_numeric_prefix_beats_lexical_order() {
        assert_eq!(compare_department_names("2-цех", "10-цех"), Ordering::Less);
        assert_eq!(compare_department_names("10-цех", "2-цех"), Ordering::Greater);
    }

    #[test]
    fn test_unnumbered_names_sort_last() {
        assert_eq!(compare_department_names("Склад", "99-цех"), Ordering::Greater);
        assert_eq!(compare_department_names("1-цех", "Администрация"), Ordering::Less);
    }

    #[test]
    fn test_tiebreak_is_case_insensitive() {
        assert_eq!(compare_department_names("5-цех А", "5-ЦЕХ б"), Ordering::Less);
        assert_eq!(compare_department_names("бухгалтерия", "Склад"), Ordering::Less);
    }

    #[test]
    fn test_sort_departments() {
        let sorted = sort_departments(&[
            department(1, "Склад"),
            department(2, "10-цех"),
            department(3, "2-цех"),
            department(4, "Бухгалтерия"),
        ]);
        let names: Vec<&str> = sorted.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["2-цех", "10-цех", "Бухгалтерия", "Склад"]);
    }

    #[test]
    fn test_rows_without_department_sort_last() {
        let mut rows = vec![
            computer("a", None),
            computer("b", Some("10-цех")),
            computer("c", Some("")),
            computer("d", Some("2-цех")),
            computer("e", Some("Склад")),
        ];
        sort_by_department(&mut rows);
        let slugs: Vec<&str> = rows.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["d", "b", "e", "a", "c"]);
    }
}
