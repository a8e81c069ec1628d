//! JobDash - Job Application Tracking & Dashboard Viewer
//!
//! Reads a CSV export of job-application records, normalizes it and shows
//! summary metrics and charts in an interactive window.

mod charts;
mod data;
mod gui;
mod report;
mod stats;

use eframe::egui;
use gui::JobDashApp;
use std::path::PathBuf;

/// Input read when no path is given on the command line.
const DEFAULT_INPUT: &str = "data/postulaciones.csv";

fn main() -> eframe::Result<()> {
    let input_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("JobDash"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "JobDash",
        options,
        Box::new(move |cc| Ok(Box::new(JobDashApp::new(cc, input_path)))),
    )
}
