//! Pagination planning for large result sets.
//!
//! The API returns at most `limit` rows per request. Callers wanting more
//! issue one request per page, advancing `startPosition` by the page size.

use super::error::ApiError;

/// Default rows per page request.
pub const DEFAULT_PAGE_SIZE: u64 = 100_000;

/// One bounded slice of a paginated result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Zero-based page index, used in destination file names.
    pub index: usize,
    /// One-based row offset sent as `startPosition`.
    pub start_position: u64,
    /// Row count sent as `limit`.
    pub limit: u64,
}

/// Plans the page slices covering `total_rows` rows.
///
/// Produces `ceil(total_rows / page_size)` pages; page `i` starts at row
/// `i * page_size + 1`. Zero rows plan to zero pages.
///
/// # Errors
///
/// Returns [`ApiError::InvalidPageSize`] when `page_size` is zero.
pub fn plan_pages(total_rows: u64, page_size: u64) -> Result<Vec<Page>, ApiError> {
    if page_size == 0 {
        return Err(ApiError::InvalidPageSize);
    }

    let page_count = total_rows.div_ceil(page_size);
    let pages = (0..page_count)
        .map(|i| Page {
            index: usize::try_from(i).unwrap_or(usize::MAX),
            start_position: i * page_size + 1,
            limit: page_size,
        })
        .collect();
    Ok(pages)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_pages_partial_last_page() {
        let pages = plan_pages(250_000, 100_000).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].start_position, 1);
        assert_eq!(pages[1].start_position, 100_001);
        assert_eq!(pages[2].start_position, 200_001);
        assert!(pages.iter().all(|p| p.limit == 100_000));
        assert_eq!(pages[2].index, 2);
    }

    #[test]
    fn test_plan_pages_exact_multiple() {
        let pages = plan_pages(200_000, 100_000).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].start_position, 100_001);
    }

    #[test]
    fn test_plan_pages_smaller_than_page() {
        let pages = plan_pages(42, 100_000).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].start_position, 1);
        assert_eq!(pages[0].limit, 100_000);
    }

    #[test]
    fn test_plan_pages_zero_rows() {
        let pages = plan_pages(0, 100_000).unwrap();
        assert!(pages.is_empty());
    }

    #[test]
    fn test_plan_pages_zero_page_size_rejected() {
        let result = plan_pages(100, 0);
        assert!(matches!(result, Err(ApiError::InvalidPageSize)));
    }

    #[test]
    fn test_default_page_size_constant() {
        assert_eq!(DEFAULT_PAGE_SIZE, 100_000);
    }
}
