//! Pagination query parameters.
//!
//! The boundary enforces the defaults and lower bounds before anything
//! reaches the core: page defaults to 1, limit to 10, both at least 1.

use memento_core::PageRequest;
use serde::Deserialize;

/// Apply defaults and bounds to raw `page`/`limit` values.
pub fn page_request(page: Option<usize>, limit: Option<usize>) -> PageRequest {
    PageRequest::new(page.unwrap_or(1), limit.unwrap_or(10))
}

/// `?page&limit` query parameters, as sent by the client.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl PageQuery {
    /// Apply defaults and bounds.
    pub fn into_request(self) -> PageRequest {
        page_request(self.page, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = PageQuery::default().into_request();
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 10);
    }

    #[test]
    fn test_zero_values_are_clamped() {
        let req = PageQuery {
            page: Some(0),
            limit: Some(0),
        }
        .into_request();
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 1);
    }
}
