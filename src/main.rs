mod app;
mod color;
mod state;
mod ui;

use std::path::{Path, PathBuf};

use app::SqueezeBenchApp;
use eframe::egui;
use squeeze_bench::ViewerSettings;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = ViewerSettings::load_or_default(Path::new(".")).unwrap_or_else(|e| {
        log::error!("Ignoring settings: {e:#}");
        ViewerSettings::default()
    });

    // Optional folder to open right away.
    let initial_folder = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Squeeze Bench – Force/Gap Viewer",
        options,
        Box::new(move |_cc| {
            let mut app = SqueezeBenchApp::new(settings);
            if let Some(folder) = &initial_folder {
                app.state.open_folder(folder);
            }
            Ok(Box::new(app))
        }),
    )
}
