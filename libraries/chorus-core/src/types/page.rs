//! Paginated response envelope
use serde::{Deserialize, Serialize};

/// One page of a listing, with enough bookkeeping for clients to page through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    pub data: Vec<T>,

    /// Total number of matching items across all pages
    pub total: i64,

    /// 1-based page number
    pub page: i64,

    /// Page size the listing was computed with
    pub per_page: i64,
}

impl<T> Page<T> {
    /// Assemble a page from its parts
    pub fn new(data: Vec<T>, total: i64, page: i64, per_page: i64) -> Self {
        Self {
            data,
            total,
            page,
            per_page,
        }
    }
}
