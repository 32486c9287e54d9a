//! Adaptive page sizing
//!
//! Each dataset carries a table of row-count thresholds and the page count
//! suggested for result sets up to that size. The planner picks the smallest
//! qualifying page count and splits the total into even chunks.

use serde::Serialize;

/// Ordered `(threshold, page_count)` pairs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageBands(Vec<(i64, i64)>);

impl PageBands {
    pub fn new(bands: impl IntoIterator<Item = (i64, i64)>) -> Self {
        Self(bands.into_iter().collect())
    }

    /// Bands shared by every shipped dataset
    pub fn standard() -> Self {
        Self::new([(10_000, 1), (50_000, 2), (150_000, 4), (500_000, 5)])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(i64, i64)> {
        self.0.iter()
    }

    /// Page count for `total` rows before remainder adjustment
    fn page_count(&self, total: i64) -> i64 {
        if self.0.is_empty() {
            return default_page_count(total);
        }

        let mut largest_threshold = 0;
        let mut largest_page_count = 0;
        let mut chosen: Option<i64> = None;
        for &(threshold, page_count) in &self.0 {
            largest_threshold = largest_threshold.max(threshold);
            largest_page_count = largest_page_count.max(page_count);
            if total <= threshold && chosen.is_none_or(|c| page_count < c) {
                chosen = Some(page_count);
            }
        }
        chosen.unwrap_or_else(|| (total / largest_threshold.max(1) + 1) * largest_page_count)
    }
}

fn default_page_count(total: i64) -> i64 {
    match total {
        t if t <= 10_000 => 1,
        t if t <= 50_000 => 2,
        t if t <= 100_000 => 5,
        t if t <= 250_000 => 10,
        _ => 25,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PagePlan {
    pub chunk: i64,
    pub page_count: i64,
}

impl PagePlan {
    /// Row offset of a 1-based page
    pub fn offset(&self, page: i64) -> i64 {
        self.chunk.saturating_mul(page.max(1) - 1)
    }
}

/// Split `total` rows into pages
///
/// A remainder under a quarter of the chunk is spread across the pages;
/// anything larger gets a final, shorter page of its own.
pub fn plan_pages(total: i64, bands: &PageBands) -> PagePlan {
    if total <= 0 {
        return PagePlan {
            chunk: 0,
            page_count: 0,
        };
    }

    let mut page_count = bands.page_count(total).max(1);
    let mut chunk = (total / page_count).max(1);
    let remainder = total % chunk;
    if remainder > 0 && remainder < chunk / 4 {
        chunk += remainder / page_count;
    } else if remainder > 0 {
        page_count += 1;
    }
    PagePlan { chunk, page_count }
}
