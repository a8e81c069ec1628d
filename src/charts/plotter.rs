//! Chart Plotter Module
//! Draws the dashboard charts from the computed views using egui_plot.

use chrono::{Datelike, NaiveDate};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};

use crate::stats::{FrequencyView, TrendPoint};

/// Sequential ramp endpoints for count-scaled bar fills.
pub const RAMP_LOW: Color32 = Color32::from_rgb(213, 240, 219);
pub const RAMP_HIGH: Color32 = Color32::from_rgb(16, 85, 58);

/// Line/marker color for the weekly trend.
pub const TREND_COLOR: Color32 = Color32::from_rgb(38, 140, 96);

/// Discrete green shades for donut slices, light to dark.
pub const PALETTE: [Color32; 8] = [
    Color32::from_rgb(199, 233, 200),
    Color32::from_rgb(161, 217, 170),
    Color32::from_rgb(120, 198, 141),
    Color32::from_rgb(84, 176, 116),
    Color32::from_rgb(54, 150, 95),
    Color32::from_rgb(33, 122, 77),
    Color32::from_rgb(19, 92, 59),
    Color32::from_rgb(10, 63, 41),
];

const BAR_CHART_HEIGHT: f32 = 280.0;

/// Draws dashboard visualizations from plain view data.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Interpolate the sequential ramp at `t` in [0, 1].
    pub fn sequential_color(t: f64) -> Color32 {
        let t = t.clamp(0.0, 1.0) as f32;
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color32::from_rgb(
            lerp(RAMP_LOW.r(), RAMP_HIGH.r()),
            lerp(RAMP_LOW.g(), RAMP_HIGH.g()),
            lerp(RAMP_LOW.b(), RAMP_HIGH.b()),
        )
    }

    /// Vertical bar chart, highest count first, fill scaled to count.
    pub fn draw_bar_chart(ui: &mut egui::Ui, id: &str, view: &FrequencyView) {
        let mut entries = view.entries.clone();
        entries.sort_by(|a, b| b.count.cmp(&a.count));

        let max = entries.iter().map(|e| e.count).max().unwrap_or(1).max(1) as f64;
        let bars: Vec<Bar> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                Bar::new(i as f64, entry.count as f64)
                    .width(0.6)
                    .name(&entry.label)
                    .fill(Self::sequential_color(entry.count as f64 / max))
            })
            .collect();

        let labels: Vec<String> = entries.iter().map(|e| e.label.clone()).collect();

        Plot::new(format!("bar_{id}"))
            .height(BAR_CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .y_axis_label("Applications")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if idx < labels.len() {
                    labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
    }

    /// Horizontal bar chart, ascending by count so the longest bar is on top.
    pub fn draw_hbar_chart(ui: &mut egui::Ui, id: &str, view: &FrequencyView) {
        let mut entries = view.entries.clone();
        entries.sort_by(|a, b| a.count.cmp(&b.count));

        let max = entries.iter().map(|e| e.count).max().unwrap_or(1).max(1) as f64;
        let bars: Vec<Bar> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                Bar::new(i as f64, entry.count as f64)
                    .width(0.6)
                    .name(&entry.label)
                    .fill(Self::sequential_color(entry.count as f64 / max))
            })
            .collect();

        let labels: Vec<String> = entries.iter().map(|e| e.label.clone()).collect();

        Plot::new(format!("hbar_{id}"))
            .height(BAR_CHART_HEIGHT + 60.0)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label("Applications")
            .y_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if idx < labels.len() {
                    labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal());
            });
    }

    /// Donut chart with a legend, largest slice first.
    pub fn draw_donut_chart(ui: &mut egui::Ui, view: &FrequencyView) {
        let total: f64 = view.entries.iter().map(|e| e.count as f64).sum();
        if total <= 0.0 {
            ui.label(RichText::new("No data").color(Color32::GRAY));
            return;
        }

        let mut entries = view.entries.clone();
        entries.sort_by(|a, b| b.count.cmp(&a.count));

        ui.horizontal(|ui| {
            let (rect, _) =
                ui.allocate_exact_size(egui::vec2(240.0, 240.0), egui::Sense::hover());
            let painter = ui.painter_at(rect);
            let center = rect.center();
            let radius = rect.width().min(rect.height()) * 0.5 - 4.0;

            let mut angle = -std::f32::consts::FRAC_PI_2;
            for (i, entry) in entries.iter().enumerate() {
                let sweep = (entry.count as f64 / total * std::f64::consts::TAU) as f32;
                Self::fill_wedge(
                    &painter,
                    center,
                    radius,
                    angle,
                    sweep,
                    PALETTE[i % PALETTE.len()],
                );
                angle += sweep;
            }

            // The hole that turns the pie into a donut.
            painter.circle_filled(
                center,
                radius * 0.45,
                ui.visuals().widgets.noninteractive.bg_fill,
            );

            ui.add_space(12.0);
            ui.vertical(|ui| {
                for (i, entry) in entries.iter().enumerate() {
                    ui.horizontal(|ui| {
                        let (swatch, _) = ui
                            .allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                        ui.painter()
                            .rect_filled(swatch, 2.0, PALETTE[i % PALETTE.len()]);
                        let pct = entry.count as f64 / total * 100.0;
                        ui.label(
                            RichText::new(format!(
                                "{}: {} ({:.1}%)",
                                entry.label, entry.count, pct
                            ))
                            .size(12.0),
                        );
                    });
                }
            });
        });
    }

    /// Weekly application counts as a line with markers.
    pub fn draw_trend_chart(ui: &mut egui::Ui, points: &[TrendPoint]) {
        let plot_points: Vec<[f64; 2]> = points
            .iter()
            .map(|p| [p.week_start.num_days_from_ce() as f64, p.count as f64])
            .collect();

        Plot::new("weekly_trend")
            .height(BAR_CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Week")
            .y_axis_label("Applications")
            .x_axis_formatter(|mark, _range| {
                NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                    .map(|date| date.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from(plot_points.clone()))
                        .color(TREND_COLOR)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(plot_points))
                        .radius(4.0)
                        .color(TREND_COLOR),
                );
            });
    }

    /// Paint one slice as quarter-turn segments; the tessellator expects
    /// convex polygons and a slice can span more than half the circle.
    fn fill_wedge(
        painter: &egui::Painter,
        center: egui::Pos2,
        radius: f32,
        start: f32,
        sweep: f32,
        color: Color32,
    ) {
        let mut remaining = sweep;
        let mut angle = start;
        while remaining > 0.0 {
            let step = remaining.min(std::f32::consts::FRAC_PI_2);
            let arc_steps = ((step / 0.08).ceil() as usize).max(2);

            let mut points = vec![center];
            for s in 0..=arc_steps {
                let a = angle + step * s as f32 / arc_steps as f32;
                points.push(center + egui::vec2(a.cos(), a.sin()) * radius);
            }
            painter.add(egui::epaint::PathShape::convex_polygon(
                points,
                color,
                egui::Stroke::NONE,
            ));

            angle += step;
            remaining -= step;
        }
    }
}
