//! Shared page/limit contract for list operations.
//!
//! # Invariants
//! - `page >= 1` and `1 <= limit <= MAX_LIMIT` for every `PageRequest`.
//! - `total_pages >= 1`, even for an empty collection.

use serde::Serialize;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 5;
/// Upper bound applied to caller-supplied limits.
pub const MAX_LIMIT: u32 = 100;

/// Normalized pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Builds a request; missing or zero values fall back to defaults and
    /// `limit` is clamped to [`MAX_LIMIT`].
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        let page = page.filter(|value| *value >= 1).unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .filter(|value| *value >= 1)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);
        Self { page, limit }
    }

    /// Builds a request from raw query-string values.
    ///
    /// Leading digits are honored (`"3abc"` and `"+3"` read as 3); anything
    /// non-numeric, negative or zero falls back to the default.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::new(
            page.and_then(parse_leading_number),
            limit.and_then(parse_leading_number),
        )
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Wraps one page of rows with the collection total.
    pub fn into_page<T>(self, items: Vec<T>, total: u64) -> Page<T> {
        Page {
            items,
            total,
            page: self.page,
            total_pages: total_pages(total, self.limit),
        }
    }
}

/// One page of a listed collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u64,
}

/// `ceil(total / limit)`, never less than one.
pub fn total_pages(total: u64, limit: u32) -> u64 {
    let limit = u64::from(limit.max(1));
    total.div_ceil(limit).max(1)
}

fn parse_leading_number(raw: &str) -> Option<u32> {
    let unsigned = raw.trim_start();
    let unsigned = unsigned.strip_prefix('+').unwrap_or(unsigned);
    let digits: String = unsigned
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        return None;
    }
    // Out-of-range values saturate; the limit clamp handles the rest.
    Some(digits.parse::<u32>().unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::{total_pages, PageRequest, DEFAULT_LIMIT, MAX_LIMIT};

    #[test]
    fn total_pages_rounds_up_with_floor_of_one() {
        assert_eq!(total_pages(12, 5), 3);
        assert_eq!(total_pages(10, 5), 2);
        assert_eq!(total_pages(0, 5), 1);
        assert_eq!(total_pages(1, 100), 1);
    }

    #[test]
    fn query_values_fall_back_to_defaults() {
        let request = PageRequest::from_query(None, Some("abc"));
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), DEFAULT_LIMIT);

        let request = PageRequest::from_query(Some("-2"), Some("0"));
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn query_values_accept_leading_digits() {
        let request = PageRequest::from_query(Some(" 3abc"), Some("7"));
        assert_eq!(request.page(), 3);
        assert_eq!(request.limit(), 7);
        assert_eq!(request.offset(), 14);

        let request = PageRequest::from_query(Some("+3"), Some(" +2x"));
        assert_eq!(request.page(), 3);
        assert_eq!(request.limit(), 2);

        let request = PageRequest::from_query(Some("++3"), Some("+-2"));
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn limit_is_clamped() {
        let request = PageRequest::from_query(Some("1"), Some("99999999999999"));
        assert_eq!(request.limit(), MAX_LIMIT);
    }

    #[test]
    fn into_page_computes_totals() {
        let page = PageRequest::new(Some(4), Some(5)).into_page(Vec::<u8>::new(), 12);
        assert_eq!(page.page, 4);
        assert_eq!(page.total, 12);
        assert_eq!(page.total_pages, 3);
        assert!(page.items.is_empty());
    }
}
