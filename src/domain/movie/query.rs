//! Movie table search parameters and results

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::entity::{EidrCode, MovieStatus};
use crate::domain::category::CategoryId;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 5;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Column the movie table is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovieOrderBy {
    Name,
    #[default]
    Rating,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Filters, ordering and paging for the movie table
#[derive(Debug, Clone, PartialEq)]
pub struct MovieQuery {
    /// Movies linked to any of these categories; empty means no restriction
    pub category_ids: Vec<CategoryId>,
    /// Case-insensitive substring of the EIDR code
    pub eidr_code: Option<String>,
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    pub only_active: bool,
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
    pub order_by: MovieOrderBy,
    pub direction: SortDirection,
}

impl Default for MovieQuery {
    fn default() -> Self {
        Self {
            category_ids: Vec::new(),
            eidr_code: None,
            name: None,
            only_active: false,
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            order_by: MovieOrderBy::default(),
            direction: SortDirection::default(),
        }
    }
}

impl MovieQuery {
    /// Number of rows skipped before the requested page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }

    /// Whether a status matches the activity filter
    pub fn accepts_status(&self, status: MovieStatus) -> bool {
        !self.only_active || status.is_active()
    }
}

/// Number of pages needed to show `total_items` rows
pub fn total_pages(total_items: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }

    total_items.div_ceil(u64::from(page_size))
}

/// Flattened movie row for the table view
#[derive(Debug, Clone, PartialEq)]
pub struct MovieTableRow {
    pub eidr_code: EidrCode,
    pub name: String,
    pub rating: f64,
    pub year: i32,
    pub status: MovieStatus,
    /// Category names joined with ", " in id order
    pub categories: String,
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MoviePage {
    pub rows: Vec<MovieTableRow>,
    pub total_items: u64,
}

/// Join category names the way the table view shows them
pub fn join_category_names<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names.into_iter().collect::<Vec<_>>().join(", ")
}
