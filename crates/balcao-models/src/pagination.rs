//! Pagination query parameters and response envelope.

use serde::{Deserialize, Serialize};

const DEFAULT_PER_PAGE: u32 = 20;
const MAX_PER_PAGE: u32 = 100;

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

/// `?page=&per_page=` query parameters, 1-based.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageQuery {
    /// Clamp to sane bounds. Zero values fall back to defaults.
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

/// Paginated response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: u64, query: PageQuery) -> Self {
        Self {
            data,
            total,
            page: query.page,
            per_page: query.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_clamps_bounds() {
        let q = PageQuery { page: 0, per_page: 0 }.normalized();
        assert_eq!(q.page, 1);
        assert_eq!(q.per_page, 1);

        let q = PageQuery { page: 3, per_page: 500 }.normalized();
        assert_eq!(q.per_page, MAX_PER_PAGE);
    }

    #[test]
    fn offset_is_zero_based() {
        let q = PageQuery { page: 1, per_page: 20 };
        assert_eq!(q.offset(), 0);

        let q = PageQuery { page: 3, per_page: 25 };
        assert_eq!(q.offset(), 50);
        assert_eq!(q.limit(), 25);
    }

    #[test]
    fn defaults_apply_when_params_missing() {
        let q: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.page, 1);
        assert_eq!(q.per_page, DEFAULT_PER_PAGE);
    }
}
