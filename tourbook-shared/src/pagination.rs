use serde::Deserialize;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Raw `page`/`limit` query parameters. Kept as strings so that garbage such
/// as `?page=abc` falls back to the defaults instead of rejecting the request.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// 1-based page window. Values below 1 (including 0) and unparsable values
/// fall back to page 1 / limit 10, so `page=0` and `page=1` address the same
/// window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
        }
    }

    pub fn from_query(query: &PageQuery) -> Self {
        let page = parse_positive(query.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive(query.limit.as_deref()).unwrap_or(DEFAULT_LIMIT);
        Self::new(page, limit)
    }

    /// Saturates at `i64::MAX`, the widest skip the store driver accepts.
    pub fn skip(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.limit)
            .min(i64::MAX as u64)
    }

    /// Applies the window to an already materialised list.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let skip = usize::try_from(self.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        items.into_iter().skip(skip).take(limit).collect()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

/// Leading-integer parse: "3", " 3 ", "3abc" all give 3.
pub fn parse_positive(raw: Option<&str>) -> Option<u64> {
    let digits: String = raw?
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<u64>().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> PageQuery {
        PageQuery {
            page: page.map(String::from),
            limit: limit.map(String::from),
        }
    }

    #[test]
    fn test_skip_is_page_minus_one_times_limit() {
        let p = Pagination::from_query(&query(Some("3"), Some("5")));
        assert_eq!(p.skip(), 10);
        assert_eq!(p.limit, 5);
    }

    #[test]
    fn test_defaults() {
        let p = Pagination::from_query(&query(None, None));
        assert_eq!(p, Pagination { page: 1, limit: 10 });
        assert_eq!(p.skip(), 0);
    }

    #[test]
    fn test_page_zero_is_first_window() {
        let p = Pagination::from_query(&query(Some("0"), Some("10")));
        let items: Vec<u32> = (0..25).collect();
        assert_eq!(p.apply(items), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_garbage_falls_back() {
        let p = Pagination::from_query(&query(Some("abc"), Some("-4")));
        assert_eq!(p, Pagination::default());
    }

    #[test]
    fn test_huge_page_saturates() {
        let p = Pagination::from_query(&query(Some("18446744073709551615"), Some("10")));
        assert_eq!(p.page, u64::MAX);
        assert_eq!(p.skip(), i64::MAX as u64);
        assert!(p.apply(vec![1, 2, 3]).is_empty());

        let p = Pagination::from_query(&query(Some("99999999999999999999999"), Some("10")));
        assert_eq!(p, Pagination::default());
    }

    #[test]
    fn test_window_past_end_is_empty() {
        let p = Pagination::new(4, 10);
        assert!(p.apply(vec![1, 2, 3]).is_empty());
    }
}
