//! Pagination envelope primitives for the portal search endpoints.
//!
//! The remote terminology API returns page-numbered result envelopes. This
//! crate defines the metadata shape and the consistency rules the portal
//! enforces before trusting server-supplied pagination: page numbers are
//! one-based, the flags must agree with the page position, and the reported
//! totals must be able to account for the number of results actually
//! returned alongside the metadata.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server-supplied pagination metadata accompanying a page of results.
///
/// Invariants (checked by [`Pagination::validate_for`]):
/// - `page` is in `1..=total_pages` when any results exist.
/// - `has_previous` is true exactly when `page > 1`.
/// - `has_next` is true exactly when `page < total_pages`.
/// - `total_results` is at least the number of results on this page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// One-based index of the returned page.
    pub page: u32,
    /// Total number of pages available for the query.
    pub total_pages: u32,
    /// Total number of results across all pages.
    pub total_results: u64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_previous: bool,
}

/// Ways server-supplied pagination metadata can contradict itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// The page index is zero or past the reported page count.
    #[error("page {page} is outside 1..={total_pages}")]
    PageOutOfRange {
        /// Reported page index.
        page: u32,
        /// Reported page count.
        total_pages: u32,
    },
    /// `has_next` / `has_previous` disagree with the page position.
    #[error("navigation flags disagree with page {page} of {total_pages}")]
    InconsistentFlags {
        /// Reported page index.
        page: u32,
        /// Reported page count.
        total_pages: u32,
    },
    /// The reported totals cannot account for the returned results.
    #[error("{returned} results returned but only {total_results} reported in total")]
    TotalTooSmall {
        /// Number of results in the accompanying page.
        returned: u64,
        /// Reported overall result count.
        total_results: u64,
    },
}

impl Pagination {
    /// Metadata for a query that matched nothing.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            page: 1,
            total_pages: 0,
            total_results: 0,
            has_next: false,
            has_previous: false,
        }
    }

    /// Metadata for a result set that fits on a single page.
    #[must_use]
    pub const fn single_page(total_results: u64) -> Self {
        Self {
            page: 1,
            total_pages: 1,
            total_results,
            has_next: false,
            has_previous: false,
        }
    }

    /// Check this metadata against the page of results it arrived with.
    ///
    /// `returned` is the number of result rows in the same response body.
    ///
    /// # Errors
    ///
    /// Returns the first [`PaginationError`] detected. Callers that cannot
    /// reject the response may log the inconsistency and fall back to
    /// [`Pagination::single_page`].
    pub fn validate_for(&self, returned: usize) -> Result<(), PaginationError> {
        let returned = returned as u64;
        if self.total_results < returned {
            return Err(PaginationError::TotalTooSmall {
                returned,
                total_results: self.total_results,
            });
        }
        if returned == 0 && self.total_results == 0 {
            // An empty envelope is allowed to report zero pages.
            return Ok(());
        }
        if self.page == 0 || self.page > self.total_pages {
            return Err(PaginationError::PageOutOfRange {
                page: self.page,
                total_pages: self.total_pages,
            });
        }
        let expect_previous = self.page > 1;
        let expect_next = self.page < self.total_pages;
        if self.has_previous != expect_previous || self.has_next != expect_next {
            return Err(PaginationError::InconsistentFlags {
                page: self.page,
                total_pages: self.total_pages,
            });
        }
        Ok(())
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn page(page: u32, total_pages: u32, total_results: u64) -> Pagination {
        Pagination {
            page,
            total_pages,
            total_results,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }

    #[rstest]
    #[case::first_of_many(page(1, 4, 40), 10)]
    #[case::middle(page(2, 4, 40), 10)]
    #[case::last(page(4, 4, 31), 1)]
    #[case::single(Pagination::single_page(3), 3)]
    #[case::empty(Pagination::empty(), 0)]
    fn accepts_consistent_metadata(#[case] pagination: Pagination, #[case] returned: usize) {
        assert_eq!(pagination.validate_for(returned), Ok(()));
    }

    #[rstest]
    #[case::zero_page(page(0, 4, 40))]
    #[case::past_end(page(5, 4, 40))]
    fn rejects_out_of_range_pages(#[case] pagination: Pagination) {
        assert!(matches!(
            pagination.validate_for(1),
            Err(PaginationError::PageOutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_flags_that_disagree_with_position() {
        let pagination = Pagination {
            page: 1,
            total_pages: 3,
            total_results: 30,
            has_next: false,
            has_previous: true,
        };
        assert!(matches!(
            pagination.validate_for(10),
            Err(PaginationError::InconsistentFlags { .. })
        ));
    }

    #[test]
    fn rejects_totals_smaller_than_the_returned_page() {
        let pagination = page(1, 1, 2);
        assert!(matches!(
            pagination.validate_for(5),
            Err(PaginationError::TotalTooSmall {
                returned: 5,
                total_results: 2
            })
        ));
    }

    #[test]
    fn serialises_with_snake_case_field_names() {
        let json = serde_json::to_value(Pagination::single_page(7)).expect("serialise");
        assert_eq!(json["total_results"], 7);
        assert_eq!(json["has_next"], false);
    }
}
