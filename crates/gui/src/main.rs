mod app;
mod viewport;

pub use ledcube_gui_lib::state;

use std::path::PathBuf;

use app::LedCubeApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledcube=info,ledcube_gui_lib=info,ledcube_core=info".into()),
        )
        .init();

    // Parse --face <path> argument
    let initial_face = parse_face_arg();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("LED Cube")
            .with_inner_size([760.0, 480.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "ledcube",
        native_options,
        Box::new(move |cc| Ok(Box::new(LedCubeApp::new(cc, initial_face)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

fn parse_face_arg() -> Option<PathBuf> {
    let args: Vec<String> = std::env::args().collect();
    let pos = args.iter().position(|a| a == "--face")?;
    match args.get(pos + 1) {
        Some(path) => Some(PathBuf::from(path)),
        None => {
            tracing::error!("--face expects a file path");
            None
        }
    }
}
