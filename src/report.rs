//! JSON Report Module
//! Writes the computed dashboard views to a JSON file.

use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;

use crate::stats::{DashboardData, WeeklyTrend};

/// Serializes dashboard data for consumption outside the viewer.
pub struct ReportWriter;

impl ReportWriter {
    pub fn write_json(path: &Path, data: &DashboardData) -> Result<()> {
        let report = Self::to_json(data);

        let file = std::fs::File::create(path)
            .with_context(|| format!("creating report file {}", path.display()))?;
        serde_json::to_writer_pretty(file, &report).context("serializing report")?;
        Ok(())
    }

    /// Views whose column was absent are omitted; the temporal view keeps
    /// an explicit marker instead of an empty series.
    fn to_json(data: &DashboardData) -> serde_json::Value {
        let mut report = json!({ "metrics": &data.metrics });

        let views = [
            ("company_type", &data.company_type),
            ("position", &data.position),
            ("status", &data.status),
        ];
        for (key, view) in views {
            if let Ok(view) = view {
                report[key] = json!(&view.entries);
            }
        }

        report["weekly"] = match &data.weekly {
            WeeklyTrend::Points(points) => json!(points),
            WeeklyTrend::NoDateColumn | WeeklyTrend::NoParsableDates => {
                json!("no temporal data")
            }
        };

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Normalizer, TableSchema};
    use polars::df;

    #[test]
    fn omits_absent_views_and_marks_missing_temporal_data() {
        let frame = df!(
            "Estatus" => &["En proceso", "En proceso", "Oferta"],
            "Tipo de empresa" => &["Startup", "Corporativo", "Startup"],
        )
        .unwrap();
        let table = Normalizer::normalize(&frame, &TableSchema::default()).unwrap();
        let data = DashboardData::compute(&table);

        let report = ReportWriter::to_json(&data);

        assert_eq!(report["metrics"]["total"], 3);
        assert!(report.get("position").is_none());
        assert_eq!(report["weekly"], "no temporal data");
        assert_eq!(report["status"][0]["label"], "En proceso");
        assert_eq!(report["status"][0]["count"], 2);
    }

    #[test]
    fn serializes_weekly_points_with_week_start_dates() {
        let frame = df!(
            "Estatus" => &["En proceso"],
            "Fecha" => &["2024-01-03"],
        )
        .unwrap();
        let table = Normalizer::normalize(&frame, &TableSchema::default()).unwrap();
        let data = DashboardData::compute(&table);

        let report = ReportWriter::to_json(&data);
        assert_eq!(report["weekly"][0]["week_start"], "2024-01-01");
        assert_eq!(report["weekly"][0]["count"], 1);
    }
}
