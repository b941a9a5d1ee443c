// Pagination helpers shared by list endpoints
// List responses carry a `settings` block so clients can render pagers
// without a second count request

use serde::{Deserialize, Serialize};

/// Query-string pagination parameters (`?page=2`)
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub search: Option<String>,
}

impl PageQuery {
    /// Pages are 1-based; anything below 1 clamps to 1
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn offset(&self, rows_per_page: i64) -> i64 {
        (self.page() - 1) * rows_per_page
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Pager metadata returned alongside list data
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageSettings {
    pub count: i64,
    pub page: i64,
    pub rows_per_page: i64,
    pub next_page: Option<i64>,
    pub prev_page: Option<i64>,
}

impl PageSettings {
    pub fn new(count: i64, page: i64, rows_per_page: i64) -> Self {
        let page = page.max(1);
        let next_page = if page * rows_per_page < count {
            Some(page + 1)
        } else {
            None
        };
        let prev_page = if page > 1 { Some(page - 1) } else { None };

        Self {
            count,
            page,
            rows_per_page,
            next_page,
            prev_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_of_many() {
        let s = PageSettings::new(20, 1, 6);
        assert_eq!(s.next_page, Some(2));
        assert_eq!(s.prev_page, None);
    }

    #[test]
    fn test_middle_page() {
        let s = PageSettings::new(20, 2, 6);
        assert_eq!(s.next_page, Some(3));
        assert_eq!(s.prev_page, Some(1));
    }

    #[test]
    fn test_last_page_exact_boundary() {
        // 18 rows at 6/page: page 3 is the last
        let s = PageSettings::new(18, 3, 6);
        assert_eq!(s.next_page, None);
        assert_eq!(s.prev_page, Some(2));
    }

    #[test]
    fn test_empty_result() {
        let s = PageSettings::new(0, 1, 6);
        assert_eq!(s.next_page, None);
        assert_eq!(s.prev_page, None);
    }

    #[test]
    fn test_page_clamps_to_one() {
        let q = PageQuery {
            page: Some(-3),
            search: None,
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.offset(10), 0);
    }

    #[test]
    fn test_blank_search_is_none() {
        let q = PageQuery {
            page: None,
            search: Some("   ".to_string()),
        };
        assert_eq!(q.search_term(), None);
    }
}
