//! List query and pagination types

use serde::{Deserialize, Serialize};

/// Pagination parameters for list endpoints
///
/// `page` starts at 1. When `page_size` is absent the entire matching set
/// is returned as a single page — admin callers rely on this fallback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Page of records
    pub data: Vec<T>,
    /// Total matching records
    pub total: u64,
    /// Current page (1-based)
    pub page: u32,
    /// Page size used
    pub limit: u32,
    /// Total page count
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = if limit > 0 {
            ((total as f64) / (limit as f64)).ceil() as u32
        } else {
            1
        };

        Self {
            data,
            total,
            page,
            limit,
            total_pages,
        }
    }

    /// Single-page response for unpaginated queries
    pub fn single_page(data: Vec<T>) -> Self {
        let total = data.len() as u64;
        Self {
            data,
            total,
            page: 1,
            limit: total as u32,
            total_pages: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults() {
        let q = PageQuery::default();
        assert_eq!(q.page(), 1);
        assert!(q.page_size.is_none());

        let q = PageQuery {
            page: Some(0),
            page_size: Some(10),
        };
        // Page is clamped to at least 1
        assert_eq!(q.page(), 1);
    }

    #[test]
    fn test_paginated_response() {
        let resp = PaginatedResponse::new(vec!["a", "b", "c"], 25, 1, 10);
        assert_eq!(resp.total, 25);
        assert_eq!(resp.total_pages, 3);
        assert_eq!(resp.page, 1);
    }

    #[test]
    fn test_single_page() {
        let resp = PaginatedResponse::single_page(vec![1, 2, 3, 4]);
        assert_eq!(resp.total, 4);
        assert_eq!(resp.page, 1);
        assert_eq!(resp.total_pages, 1);
    }
}
