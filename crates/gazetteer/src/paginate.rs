//! Pagination envelopes.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MAX_PAGE_LIMIT: usize = 100;

/// A validated page/limit pair. `page >= 1`, `limit` in `[1, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 20 }
    }
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> Result<Self, ValidationError> {
        let request = Self { page, limit };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(self) -> Result<(), ValidationError> {
        if self.page < 1 {
            return Err(ValidationError::PageOutOfRange { page: self.page });
        }
        if self.limit < 1 || self.limit > MAX_PAGE_LIMIT {
            return Err(ValidationError::LimitOutOfRange {
                limit: self.limit,
                max: MAX_PAGE_LIMIT,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn offset(self) -> usize {
        (self.page - 1) * self.limit
    }
}

/// A page of results plus the totals needed to render pagers.
///
/// A page past the end is a normal, successful envelope with empty `data`
/// and unchanged `total`/`total_pages`, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

impl<T> Paginated<T> {
    #[must_use]
    pub fn build(data: Vec<T>, total: usize, request: PageRequest) -> Self {
        Self {
            data,
            total,
            page: request.page,
            limit: request.limit,
            total_pages: total.div_ceil(request.limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_is_the_ceiling() {
        let request = PageRequest::new(1, 20).unwrap();
        assert_eq!(Paginated::<u8>::build(vec![], 0, request).total_pages, 0);
        assert_eq!(Paginated::<u8>::build(vec![], 20, request).total_pages, 1);
        assert_eq!(Paginated::<u8>::build(vec![], 21, request).total_pages, 2);
        assert_eq!(Paginated::<u8>::build(vec![], 199, request).total_pages, 10);
    }

    #[test]
    fn page_beyond_the_end_keeps_totals() {
        let request = PageRequest::new(9, 10).unwrap();
        let envelope = Paginated::<u8>::build(vec![], 25, request);
        assert!(envelope.data.is_empty());
        assert_eq!(envelope.total, 25);
        assert_eq!(envelope.total_pages, 3);
        assert_eq!(envelope.page, 9);
    }

    #[test]
    fn out_of_range_pairs_are_rejected() {
        assert!(matches!(
            PageRequest::new(0, 20),
            Err(ValidationError::PageOutOfRange { page: 0 })
        ));
        assert!(matches!(
            PageRequest::new(1, 0),
            Err(ValidationError::LimitOutOfRange { limit: 0, .. })
        ));
        assert!(matches!(
            PageRequest::new(1, 101),
            Err(ValidationError::LimitOutOfRange { limit: 101, .. })
        ));
        assert!(PageRequest::new(1, 100).is_ok());
    }

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(PageRequest::new(1, 20).unwrap().offset(), 0);
        assert_eq!(PageRequest::new(3, 20).unwrap().offset(), 40);
    }
}
