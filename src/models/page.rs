use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One page of a larger result set.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
    pub pages: u32,
    pub has_prev: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u32, per_page: u32, total: i64) -> Self {
        let per_page = per_page.max(1);
        let total_rows = total.max(0) as u64;
        let pages = total_rows.div_ceil(per_page as u64) as u32;

        Self {
            items,
            page,
            per_page,
            total,
            pages,
            has_prev: page > 1,
            has_next: page < pages,
        }
    }
}

/// Row offset of the first item on `page` (1-based).
pub fn offset(page: u32, per_page: u32) -> i64 {
    i64::from(page.max(1) - 1) * i64::from(per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_partial_last_page() {
        let page: Page<u8> = Page::new(vec![], 2, 10, 21);
        assert_eq!(page.pages, 3);
        assert!(page.has_prev);
        assert!(page.has_next);
    }

    #[test]
    fn empty_result_has_no_pages() {
        let page: Page<u8> = Page::new(vec![], 1, 10, 0);
        assert_eq!(page.pages, 0);
        assert!(!page.has_prev);
        assert!(!page.has_next);
    }

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(offset(1, 10), 0);
        assert_eq!(offset(3, 10), 20);
    }
}
