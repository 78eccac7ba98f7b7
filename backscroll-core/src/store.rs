use crate::error::{NavError, Result};
use std::collections::HashMap;

/// Last known vertical scroll offset of every post-detail page seen this session.
///
/// Lives as long as the script context; nothing is ever evicted.
#[derive(Debug, Default, Clone)]
pub struct PageIdentityStore {
    offsets: HashMap<String, f64>,
}

impl PageIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts the offset for `page_id`. Negative or NaN offsets are stored as 0.
    pub fn record(&mut self, page_id: impl Into<String>, offset: f64) {
        let offset = if offset.is_nan() { 0.0 } else { offset.max(0.0) };
        self.offsets.insert(page_id.into(), offset);
    }

    pub fn lookup(&self, page_id: &str) -> Option<f64> {
        self.offsets.get(page_id).copied()
    }

    pub fn get(&self, page_id: &str) -> Result<f64> {
        self.lookup(page_id)
            .ok_or_else(|| NavError::PageIdentityNotFound(page_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
