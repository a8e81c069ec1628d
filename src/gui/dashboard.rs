//! Dashboard Widget
//! Central panel with the metric card row and the chart cards.

use egui::{Color32, RichText, ScrollArea};

use crate::charts::ChartPlotter;
use crate::stats::{DashboardData, FrequencyView, SchemaError, SummaryMetrics, WeeklyTrend};

const CARD_SPACING: f32 = 12.0;

/// Scrollable dashboard area. A view whose column is missing renders an
/// informational message in its card; the others are unaffected.
pub struct DashboardView {
    data: Option<DashboardData>,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self { data: None }
    }
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.data = None;
    }

    pub fn set_data(&mut self, data: DashboardData) {
        self.data = Some(data);
    }

    pub fn data(&self) -> Option<&DashboardData> {
        self.data.as_ref()
    }

    /// Draw the dashboard
    pub fn show(&self, ui: &mut egui::Ui) {
        let Some(data) = &self.data else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(RichText::new("Summary").size(18.0).strong());
                ui.add_space(8.0);
                Self::draw_metric_row(ui, &data.metrics);

                ui.add_space(CARD_SPACING);
                Self::frequency_card(
                    ui,
                    "Applications by company type",
                    &data.company_type,
                    |ui, view| ChartPlotter::draw_bar_chart(ui, "company_type", view),
                );

                ui.add_space(CARD_SPACING);
                Self::frequency_card(
                    ui,
                    "Applications by position",
                    &data.position,
                    |ui, view| ChartPlotter::draw_hbar_chart(ui, "position", view),
                );

                ui.add_space(CARD_SPACING);
                Self::frequency_card(ui, "Applications by status", &data.status, |ui, view| {
                    ChartPlotter::draw_donut_chart(ui, view)
                });

                ui.add_space(CARD_SPACING);
                Self::card(ui, "Weekly application trend", |ui| match &data.weekly {
                    WeeklyTrend::Points(points) => ChartPlotter::draw_trend_chart(ui, points),
                    WeeklyTrend::NoDateColumn => {
                        Self::info_label(ui, "No date column found in the data.")
                    }
                    WeeklyTrend::NoParsableDates => {
                        Self::info_label(ui, "No valid dates to plot.")
                    }
                });

                ui.add_space(CARD_SPACING);
            });
    }

    fn draw_metric_row(ui: &mut egui::Ui, metrics: &SummaryMetrics) {
        let companies = metrics
            .distinct_companies
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unavailable".to_string());
        let pct = |value: Option<f64>| {
            value
                .map(|v| format!("{v:.1}%"))
                .unwrap_or_else(|| "no data".to_string())
        };
        let status = metrics
            .most_common_status
            .clone()
            .unwrap_or_else(|| "no data".to_string());

        ui.horizontal_wrapped(|ui| {
            Self::metric_card(ui, "Total applications", metrics.total.to_string());
            Self::metric_card(ui, "Unique companies", companies);
            Self::metric_card(ui, "CVs seen", pct(metrics.pct_cv_seen));
            Self::metric_card(ui, "Interviews", pct(metrics.pct_interview));
            Self::metric_card(ui, "Top status", status);
        });
    }

    fn metric_card(ui: &mut egui::Ui, label: &str, value: String) {
        egui::Frame::none()
            .rounding(8.0)
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_min_width(140.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new(label).size(11.0).color(Color32::GRAY));
                    ui.label(RichText::new(value).size(20.0).strong());
                });
            });
        ui.add_space(8.0);
    }

    fn frequency_card(
        ui: &mut egui::Ui,
        title: &str,
        result: &Result<FrequencyView, SchemaError>,
        draw: impl FnOnce(&mut egui::Ui, &FrequencyView),
    ) {
        Self::card(ui, title, |ui| match result {
            Ok(view) if !view.entries.is_empty() => draw(ui, view),
            Ok(_) => Self::info_label(ui, "No rows to chart."),
            Err(err) => Self::info_label(ui, &err.to_string()),
        });
    }

    fn card(ui: &mut egui::Ui, title: &str, body: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_gray(70)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width() - 8.0);
                ui.label(RichText::new(title).size(15.0).strong());
                ui.add_space(6.0);
                body(ui);
            });
    }

    fn info_label(ui: &mut egui::Ui, text: &str) {
        ui.label(
            RichText::new(text)
                .size(13.0)
                .color(Color32::from_rgb(255, 193, 7)),
        );
    }
}
