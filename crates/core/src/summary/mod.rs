//! Dashboard summary: period totals, period-over-period change, category
//! breakdown and the gap-filled daily series.

mod aggregation;
mod colors;
mod summary_model;
mod summary_service;


pub use aggregation::{category_breakdown, daily_series, percentage_change, period_totals};
pub use colors::CategoryColorAssigner;
pub use summary_model::{CategorySummary, DailyBucket, PeriodTotals, Summary, SummaryQuery};
pub use summary_service::{SummaryService, SummaryServiceTrait};
