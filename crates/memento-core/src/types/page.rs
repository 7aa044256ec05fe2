//! Pagination types shared by the listing operations.

use serde::{Deserialize, Serialize};

use crate::types::Memory;

/// A 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number, minimum 1.
    pub page: usize,
    /// Page size, minimum 1.
    pub limit: usize,
}

impl PageRequest {
    /// Create a page request. Both values are clamped to a minimum of 1.
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Offset of the first entry on this page.
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// Search result page with pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    /// The matching memories on this page, newest first.
    pub memories: Vec<Memory>,
    /// The requested page number.
    pub page: usize,
    /// Total number of pages in the match set.
    pub total_pages: usize,
    /// Total number of matching memories.
    pub total_memories: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_clamps_to_one() {
        let req = PageRequest::new(0, 0);
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 1);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(3, 2).offset(), 4);
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
    }
}
