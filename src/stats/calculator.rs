//! Summary Metrics Module
//! Single-pass counters and percentages over the normalized table.

use polars::prelude::*;
use serde::Serialize;
use std::collections::HashSet;

use crate::data::{schema, NormalizedTable};

use super::grouping::GroupingEngine;

/// The metric card row of the dashboard, as plain data.
///
/// `None` is an explicit "no data" / "unavailable" state: percentage
/// metrics are undefined on an empty table, and the distinct-company count
/// needs the company column to exist.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryMetrics {
    pub total: usize,
    pub distinct_companies: Option<usize>,
    pub pct_cv_seen: Option<f64>,
    pub pct_interview: Option<f64>,
    pub most_common_status: Option<String>,
}

/// Computes the summary metrics from a normalized table.
pub struct MetricsCalculator;

impl MetricsCalculator {
    pub fn compute(table: &NormalizedTable) -> SummaryMetrics {
        let df = &table.df;

        SummaryMetrics {
            total: df.height(),
            distinct_companies: Self::distinct_count(df, schema::COMPANY_COL),
            pct_cv_seen: Self::flag_percentage(df, schema::CV_SEEN_COL),
            pct_interview: Self::flag_percentage(df, schema::INTERVIEW_COL),
            most_common_status: Self::most_common(df, schema::STATUS_COL),
        }
    }

    /// Count of distinct non-null values; `None` when the column is absent.
    fn distinct_count(df: &DataFrame, column: &str) -> Option<usize> {
        let col = df.column(column).ok()?;

        let mut seen: HashSet<String> = HashSet::new();
        for i in 0..df.height() {
            if let Ok(value) = col.get(i) {
                if !value.is_null() {
                    seen.insert(value.to_string().trim_matches('"').to_string());
                }
            }
        }
        Some(seen.len())
    }

    /// Mean of a 0/1 flag column × 100, or `None` on an empty table.
    fn flag_percentage(df: &DataFrame, column: &str) -> Option<f64> {
        if df.height() == 0 {
            return None;
        }

        let col = df.column(column).ok()?;
        let as_f64 = col.cast(&DataType::Float64).ok()?;
        let ca = as_f64.f64().ok()?;

        let sum: f64 = ca.into_iter().flatten().sum();
        Some(sum / df.height() as f64 * 100.0)
    }

    /// Most frequent value in a column. Ties go to the value encountered
    /// first in row order, which is stable for a given input.
    fn most_common(df: &DataFrame, column: &str) -> Option<String> {
        let view = GroupingEngine::frequency(df, column).ok()?;

        let mut best: Option<(&str, u32)> = None;
        for entry in &view.entries {
            if best.map_or(true, |(_, count)| entry.count > count) {
                best = Some((&entry.label, entry.count));
            }
        }
        best.map(|(label, _)| label.to_string())
    }
}
