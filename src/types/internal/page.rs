/// Largest offset the database layer can bind
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Offset/limit window for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u64,
    pub limit: u64,
}

impl Page {
    /// Build a page, clamping `limit` into `1..=max_limit` and `offset` to [`MAX_OFFSET`]
    pub fn new(offset: Option<u64>, limit: Option<u64>, max_limit: u64) -> Self {
        let limit = limit.unwrap_or(max_limit).clamp(1, max_limit.max(1)).min(MAX_OFFSET);
        Self {
            offset: offset.unwrap_or(0).min(MAX_OFFSET),
            limit,
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { offset: 0, limit: 100 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults_to_max_limit() {
        let page = Page::new(None, None, 50);
        assert_eq!(page, Page { offset: 0, limit: 50 });
    }

    #[test]
    fn test_page_clamps_limit() {
        assert_eq!(Page::new(Some(10), Some(500), 50).limit, 50);
        assert_eq!(Page::new(Some(10), Some(0), 50).limit, 1);
    }

    #[test]
    fn test_page_clamps_offset_to_bindable_range() {
        let page = Page::new(Some(u64::MAX), None, 100);
        assert_eq!(page.offset, i64::MAX as u64);
        assert_eq!(Page::new(Some(7), None, 100).offset, 7);
    }

    #[test]
    fn test_page_limit_stays_bindable_with_huge_max() {
        assert_eq!(Page::new(None, None, u64::MAX).limit, i64::MAX as u64);
    }
}
