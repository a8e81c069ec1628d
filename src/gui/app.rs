//! JobDash Main Application
//! Main window wiring the pipeline to the control panel and dashboard.

use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use crate::data::{DataLoader, Normalizer, TableSchema};
use crate::gui::{ControlPanel, ControlPanelAction, DashboardView};
use crate::report::ReportWriter;
use crate::stats::DashboardData;

/// Pipeline result from background thread
enum PipelineResult {
    Progress(f32, String),
    Complete {
        loader: DataLoader,
        data: Box<DashboardData>,
    },
    Error(String),
}

/// Main application window.
pub struct JobDashApp {
    loader: DataLoader,
    control_panel: ControlPanel,
    dashboard: DashboardView,

    // Async pipeline run
    pipeline_rx: Option<Receiver<PipelineResult>>,
    is_running: bool,
}

impl JobDashApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, input_path: PathBuf) -> Self {
        let mut app = Self {
            loader: DataLoader::new(),
            control_panel: ControlPanel::new(),
            dashboard: DashboardView::new(),
            pipeline_rx: None,
            is_running: false,
        };

        // The configured input loads at startup; a missing file surfaces
        // as a fatal error in the status line before anything is computed.
        app.control_panel.settings.csv_path = Some(input_path.clone());
        app.start_load(input_path);
        app
    }

    fn schema(&self) -> TableSchema {
        TableSchema {
            date_column: self.control_panel.settings.date_column.clone(),
            ..TableSchema::default()
        }
    }

    /// Read the file and run the full pipeline in a background thread.
    fn start_load(&mut self, path: PathBuf) {
        if self.is_running {
            return;
        }

        self.dashboard.clear();
        self.control_panel.export_enabled = false;
        self.control_panel.settings.csv_path = Some(path.clone());
        self.control_panel.set_progress(0.0, "Loading file...");
        self.is_running = true;

        let (tx, rx) = channel();
        self.pipeline_rx = Some(rx);
        let schema = self.schema();

        thread::spawn(move || {
            let _ = tx.send(PipelineResult::Progress(
                10.0,
                "Reading CSV file...".to_string(),
            ));
            let mut loader = DataLoader::new();
            if let Err(e) = loader.load_csv(&path) {
                let _ = tx.send(PipelineResult::Error(e.to_string()));
                return;
            }
            Self::run_pipeline(tx, loader, schema);
        });
    }

    /// Re-run normalization and aggregation over the already loaded table.
    /// Every downstream step is a pure function of the table, so a re-run
    /// is always safe.
    fn start_recompute(&mut self) {
        if self.is_running {
            return;
        }
        let Some(df) = self.loader.get_dataframe().cloned() else {
            return;
        };
        let Some(path) = self.loader.get_file_path().cloned() else {
            return;
        };

        self.control_panel.set_progress(5.0, "Recomputing views...");
        self.is_running = true;

        let (tx, rx) = channel();
        self.pipeline_rx = Some(rx);
        let schema = self.schema();

        let mut loader = DataLoader::new();
        loader.set_dataframe(df, path);
        thread::spawn(move || Self::run_pipeline(tx, loader, schema));
    }

    /// Normalize and aggregate (called from a background thread).
    fn run_pipeline(tx: Sender<PipelineResult>, loader: DataLoader, schema: TableSchema) {
        let Some(raw) = loader.get_dataframe() else {
            let _ = tx.send(PipelineResult::Error("No data loaded".to_string()));
            return;
        };

        let _ = tx.send(PipelineResult::Progress(
            40.0,
            "Normalizing table...".to_string(),
        ));
        let table = match Normalizer::normalize(raw, &schema) {
            Ok(table) => table,
            Err(e) => {
                let _ = tx.send(PipelineResult::Error(e.to_string()));
                return;
            }
        };

        let _ = tx.send(PipelineResult::Progress(
            70.0,
            "Aggregating views...".to_string(),
        ));
        let data = DashboardData::compute(&table);

        let _ = tx.send(PipelineResult::Complete {
            loader,
            data: Box::new(data),
        });
    }

    /// Check for pipeline results
    fn check_pipeline_results(&mut self) {
        let rx = self.pipeline_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    PipelineResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    PipelineResult::Complete { loader, data } => {
                        self.loader = loader;
                        let columns = self.loader.get_columns();
                        self.control_panel.set_progress(
                            100.0,
                            &format!(
                                "Complete! {} rows, {} columns",
                                self.loader.get_row_count(),
                                columns.len()
                            ),
                        );
                        self.control_panel.update_columns(columns);
                        self.dashboard.set_data(*data);
                        self.control_panel.export_enabled = true;
                        self.is_running = false;
                        should_keep_receiver = false;
                    }
                    PipelineResult::Error(error) => {
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", error));
                        self.is_running = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.pipeline_rx = Some(rx);
            }
        }
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if self.is_running {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_load(path);
        }
    }

    /// Handle JSON report export
    fn handle_export_json(&mut self) {
        let Some(data) = self.dashboard.data() else {
            self.control_panel.set_progress(0.0, "No data to export");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("jobdash_report.json")
            .save_file()
        else {
            return; // User cancelled
        };

        match ReportWriter::write_json(&path, data) {
            Ok(()) => {
                self.control_panel
                    .set_progress(100.0, &format!("Report written to {}", path.display()));
            }
            Err(e) => {
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for JobDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_pipeline_results();

        // Request repaint while the pipeline runs
        if self.is_running {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::DateColumnChanged => self.start_recompute(),
                        ControlPanelAction::Refresh => {
                            if let Some(path) = self.control_panel.settings.csv_path.clone() {
                                self.start_load(path);
                            }
                        }
                        ControlPanelAction::ExportJson => self.handle_export_json(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.dashboard.show(ui);
        });
    }
}
