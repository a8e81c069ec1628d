//! Stats module - metrics and grouped views over the normalized table

mod calculator;
mod grouping;

pub use calculator::{MetricsCalculator, SummaryMetrics};
pub use grouping::{
    DashboardData, FrequencyEntry, FrequencyView, GroupingEngine, SchemaError, TrendPoint,
    WeeklyTrend,
};
