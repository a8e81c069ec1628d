//! Control Panel Widget
//! Left side panel with data source, date column and export controls.

use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// User settings for a pipeline run.
#[derive(Default, Clone)]
pub struct UserSettings {
    pub csv_path: Option<PathBuf>,
    /// Explicit date column; `None` lets the schema discover one by name.
    pub date_column: Option<String>,
}

/// Left side control panel with file selection and pipeline controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub columns: Vec<String>,
    pub progress: f32,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            columns: Vec::new(),
            progress: 0.0,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update available columns after a load.
    pub fn update_columns(&mut self, columns: Vec<String>) {
        self.columns = columns;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 JobDash")
                    .size(22.0)
                    .color(Color32::from_rgb(84, 176, 116)),
            );
            ui.label(
                RichText::new("Application Tracker")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.settings.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Date Column Section =====
        ui.label(RichText::new("🗓 Date Column").size(14.0).strong());
        ui.add_space(5.0);

        let selected_text = self
            .settings
            .date_column
            .clone()
            .unwrap_or_else(|| "Auto-detect".to_string());

        ComboBox::from_id_salt("date_col")
            .width(200.0)
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                if ui
                    .selectable_label(self.settings.date_column.is_none(), "Auto-detect")
                    .clicked()
                    && self.settings.date_column.is_some()
                {
                    self.settings.date_column = None;
                    action = ControlPanelAction::DateColumnChanged;
                }
                for col in &self.columns {
                    let selected = self.settings.date_column.as_deref() == Some(col);
                    if ui.selectable_label(selected, col).clicked() && !selected {
                        self.settings.date_column = Some(col.clone());
                        action = ControlPanelAction::DateColumnChanged;
                    }
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.settings.csv_path.is_some(), |ui| {
                let button = egui::Button::new(RichText::new("⟳ Refresh").size(15.0))
                    .min_size(egui::vec2(180.0, 32.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Refresh;
                }
            });

            ui.add_space(8.0);

            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("💾 Export JSON").size(14.0))
                    .min_size(egui::vec2(150.0, 28.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportJson;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Complete") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    DateColumnChanged,
    Refresh,
    ExportJson,
}
