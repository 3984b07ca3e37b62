use serde::{Deserialize, Serialize};

use crate::utils::total_pages;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn offset(&self, per_page: i64) -> i64 {
        (self.page() - 1).saturating_mul(per_page)
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: i64, per_page: i64, total: i64) -> Self {
        Self {
            items,
            page,
            per_page,
            total,
            total_pages: total_pages(total, per_page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_and_clamps() {
        assert_eq!(PageQuery::default().page(), 1);
        assert_eq!(PageQuery { page: Some(-3) }.page(), 1);
        assert_eq!(PageQuery { page: Some(3) }.offset(9), 18);
    }

    #[test]
    fn huge_page_numbers_saturate() {
        let offset = PageQuery { page: Some(i64::MAX) }.offset(9);
        assert_eq!(offset, i64::MAX);
    }

    #[test]
    fn page_counts_pages() {
        let page = Page::new(vec![1, 2], 2, 9, 11);
        assert_eq!(page.total_pages, 2);
    }
}
