//! Result presentation: pagination, text rendering and export.
//!
//! Everything here consumes finished [`BatchResult`](crate::query::BatchResult)
//! and [`RowSet`](crate::db::RowSet) values. Settings are passed in through
//! [`PresenterConfig`].

mod export;
mod pagination;
mod render;

use serde::{Deserialize, Serialize};

pub use export::{batch_to_json, row_set_to_json, to_csv, write_csv};
pub use pagination::{paginate, PageView};
pub use render::{render_batch, render_page, render_statement, render_summary};

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Page sizes offered to users.
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [50, 100, 250, 500, 1000];

/// Default maximum width of a rendered table column.
pub const DEFAULT_MAX_COLUMN_WIDTH: usize = 40;

/// Presentation settings, loaded from the `[presenter]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenterConfig {
    /// Rows per page when rendering a row set.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Cell text wider than this is truncated with `...`.
    #[serde(default = "default_max_column_width")]
    pub max_column_width: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_max_column_width() -> usize {
    DEFAULT_MAX_COLUMN_WIDTH
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
        }
    }
}
