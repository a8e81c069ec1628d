//! Grouping & Binning Module
//! Value-frequency distributions and weekly time buckets for the charts.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use crate::data::{schema, DateColumn, NormalizedTable};

use super::calculator::{MetricsCalculator, SummaryMetrics};

/// A column required by one view is absent from the input. The affected
/// view shows a message; the rest of the dashboard still renders.
#[derive(Error, Debug, Clone)]
#[error("Required column '{0}' is not present in the data")]
pub struct SchemaError(pub String);

#[derive(Debug, Clone, Serialize)]
pub struct FrequencyEntry {
    pub label: String,
    pub count: u32,
}

/// Exact value counts for one categorical column.
///
/// Entries appear in first-encounter order; any presentation ordering is
/// the plotter's concern. Every distinct value appears exactly once.
#[derive(Debug, Clone, Serialize)]
pub struct FrequencyView {
    pub column: String,
    pub entries: Vec<FrequencyEntry>,
}

impl FrequencyView {
    /// Sum of all group counts.
    pub fn total(&self) -> u32 {
        self.entries.iter().map(|e| e.count).sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub week_start: NaiveDate,
    pub count: u32,
}

/// Weekly application counts, or the reason the view cannot be drawn.
#[derive(Debug, Clone)]
pub enum WeeklyTrend {
    Points(Vec<TrendPoint>),
    /// No configured or discovered date column.
    NoDateColumn,
    /// A date column exists but not a single cell parsed as a date.
    NoParsableDates,
}

/// Groups the normalized table into the chartable views.
pub struct GroupingEngine;

impl GroupingEngine {
    /// Count rows per distinct value of one column. Null cells are skipped;
    /// the normalized categorical columns have none left.
    pub fn frequency(df: &DataFrame, column: &str) -> Result<FrequencyView, SchemaError> {
        let col = df
            .column(column)
            .map_err(|_| SchemaError(column.to_string()))?;

        let mut entries: Vec<FrequencyEntry> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for i in 0..df.height() {
            let Ok(value) = col.get(i) else { continue };
            if value.is_null() {
                continue;
            }
            let label = value.to_string().trim_matches('"').to_string();
            match index.get(&label) {
                Some(&slot) => entries[slot].count += 1,
                None => {
                    index.insert(label.clone(), entries.len());
                    entries.push(FrequencyEntry { label, count: 1 });
                }
            }
        }

        Ok(FrequencyView {
            column: column.to_string(),
            entries,
        })
    }

    /// Bucket rows into calendar weeks keyed by the ISO week's Monday.
    /// Rows without a parsed date fall into no bucket.
    pub fn weekly_trend(date: Option<&DateColumn>) -> WeeklyTrend {
        let Some(date) = date else {
            return WeeklyTrend::NoDateColumn;
        };

        let mut buckets: BTreeMap<NaiveDate, u32> = BTreeMap::new();
        for value in date.values.iter().flatten() {
            *buckets.entry(Self::week_start(*value)).or_insert(0) += 1;
        }

        if buckets.is_empty() {
            return WeeklyTrend::NoParsableDates;
        }

        WeeklyTrend::Points(
            buckets
                .into_iter()
                .map(|(week_start, count)| TrendPoint { week_start, count })
                .collect(),
        )
    }

    fn week_start(date: NaiveDate) -> NaiveDate {
        let offset = date.weekday().num_days_from_monday() as i64;
        date - chrono::Duration::days(offset)
    }
}

/// Everything the rendering layer consumes: the scalar metrics plus the
/// four derived views, as plain data with no chart types attached.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub metrics: SummaryMetrics,
    pub company_type: Result<FrequencyView, SchemaError>,
    pub position: Result<FrequencyView, SchemaError>,
    pub status: Result<FrequencyView, SchemaError>,
    pub weekly: WeeklyTrend,
}

impl DashboardData {
    /// Run every aggregation over the normalized table. The frequency
    /// views are independent of each other, so they fan out across threads.
    pub fn compute(table: &NormalizedTable) -> Self {
        let df = &table.df;
        let (company_type, (position, status)) = rayon::join(
            || GroupingEngine::frequency(df, schema::COMPANY_TYPE_COL),
            || {
                rayon::join(
                    || GroupingEngine::frequency(df, schema::POSITION_COL),
                    || GroupingEngine::frequency(df, schema::STATUS_COL),
                )
            },
        );

        Self {
            metrics: MetricsCalculator::compute(table),
            company_type,
            position,
            status,
            weekly: GroupingEngine::weekly_trend(table.date.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Normalizer, TableSchema};
    use polars::df;

    fn counts(view: &FrequencyView) -> Vec<(&str, u32)> {
        view.entries
            .iter()
            .map(|e| (e.label.as_str(), e.count))
            .collect()
    }

    #[test]
    fn counts_filled_company_types_exhaustively() {
        let df = df!(
            "Tipo de empresa" => &[Some("A"), Some("B"), Some("A"), None],
        )
        .unwrap();
        let table = Normalizer::normalize(&df, &TableSchema::default()).unwrap();

        let view = GroupingEngine::frequency(&table.df, "Tipo de empresa").unwrap();
        assert_eq!(
            counts(&view),
            vec![("A", 2), ("B", 1), ("No especificada", 1)]
        );
        assert_eq!(view.total() as usize, table.df.height());
    }

    #[test]
    fn unfilled_columns_skip_null_cells() {
        let df = df!("Puesto" => &[Some("Dev"), None, Some("Dev")]).unwrap();
        let view = GroupingEngine::frequency(&df, "Puesto").unwrap();
        assert_eq!(counts(&view), vec![("Dev", 2)]);
    }

    #[test]
    fn absent_column_degrades_that_view_only() {
        let df = df!(
            "Estatus" => &["En proceso", "Rechazado"],
            "Tipo de empresa" => &["Startup", "Startup"],
        )
        .unwrap();
        let table = Normalizer::normalize(&df, &TableSchema::default()).unwrap();

        let data = DashboardData::compute(&table);
        let err = data.position.unwrap_err();
        assert_eq!(err.0, "Puesto");
        assert!(data.status.is_ok());
        assert!(data.company_type.is_ok());
        assert_eq!(data.metrics.total, 2);
    }

    #[test]
    fn buckets_rows_by_iso_week_monday() {
        // 2024-01-03 is a Wednesday; its week starts Monday 2024-01-01.
        let date = DateColumn {
            name: "Fecha".to_string(),
            values: vec![
                NaiveDate::from_ymd_opt(2024, 1, 3),
                NaiveDate::from_ymd_opt(2024, 1, 7),
                NaiveDate::from_ymd_opt(2024, 1, 8),
                None,
            ],
        };

        let WeeklyTrend::Points(points) = GroupingEngine::weekly_trend(Some(&date)) else {
            panic!("expected a weekly series");
        };

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].week_start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(points[0].count, 2);
        assert_eq!(points[1].week_start, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(points[1].count, 1);
    }

    #[test]
    fn missing_date_column_signals_no_temporal_data() {
        assert!(matches!(
            GroupingEngine::weekly_trend(None),
            WeeklyTrend::NoDateColumn
        ));
    }

    #[test]
    fn all_unparseable_dates_signal_no_valid_dates() {
        let date = DateColumn {
            name: "Fecha".to_string(),
            values: vec![None, None],
        };
        assert!(matches!(
            GroupingEngine::weekly_trend(Some(&date)),
            WeeklyTrend::NoParsableDates
        ));
    }

    #[test]
    fn temporal_gap_leaves_other_views_intact() {
        let df = df!("Estatus" => &["En proceso", "En proceso"]).unwrap();
        let table = Normalizer::normalize(&df, &TableSchema::default()).unwrap();

        let data = DashboardData::compute(&table);
        assert!(matches!(data.weekly, WeeklyTrend::NoDateColumn));
        assert_eq!(counts(data.status.as_ref().unwrap()), vec![("En proceso", 2)]);
    }
}
