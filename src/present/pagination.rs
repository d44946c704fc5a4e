//! Page windows over a row set.

use serde::Serialize;

use crate::db::{Row, RowSet};
use crate::error::{Result, SqlBatchError};

/// A bounded window over a [`RowSet`].
///
/// Holds only indices; the rows stay in the row set. With zero rows the view
/// has no pages, `page_index` is 1 and the range is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageView {
    /// 1-based page number, clamped into `[1, total_pages]`.
    pub page_index: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub total_pages: usize,
    /// First row of the page, zero-based and inclusive.
    pub start: usize,
    /// One past the last row of the page.
    pub end: usize,
}

impl PageView {
    /// Computes the window for `page_index` over `total_rows` rows.
    ///
    /// Fails with [`SqlBatchError::InvalidArgument`] when `page_size` is zero.
    pub fn compute(total_rows: usize, page_size: usize, page_index: i64) -> Result<Self> {
        if page_size == 0 {
            return Err(SqlBatchError::invalid_argument(
                "Page size must be greater than zero",
            ));
        }

        if total_rows == 0 {
            return Ok(Self {
                page_index: 1,
                page_size,
                total_rows,
                total_pages: 0,
                start: 0,
                end: 0,
            });
        }

        let total_pages = total_rows.div_ceil(page_size);
        let last_page = i64::try_from(total_pages).unwrap_or(i64::MAX);
        let page_index = page_index.clamp(1, last_page) as usize;

        let start = (page_index - 1) * page_size;
        let end = (start + page_size).min(total_rows);

        Ok(Self {
            page_index,
            page_size,
            total_rows,
            total_pages,
            start,
            end,
        })
    }

    /// Returns the rows of this page.
    ///
    /// Yields an empty slice if `rows` is shorter than the view expects.
    pub fn slice<'r>(&self, rows: &'r RowSet) -> &'r [Row] {
        rows.rows.get(self.start..self.end).unwrap_or(&[])
    }

    /// Number of rows on this page.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_index < self.total_pages
    }

    /// 1-based number of the first row shown, 0 when there are no rows.
    pub fn first_row_number(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.start + 1
        }
    }

    /// 1-based number of the last row shown, 0 when there are no rows.
    pub fn last_row_number(&self) -> usize {
        self.end
    }
}

/// Computes the page window for `page_index` over `rows`.
///
/// `page_index` is clamped into the valid range. A zero `page_size` is
/// rejected rather than adjusted.
pub fn paginate(rows: &RowSet, page_size: usize, page_index: i64) -> Result<PageView> {
    PageView::compute(rows.len(), page_size, page_index)
}
