//! pianoroll-gui: interactive piano roll note editor

mod app;
mod config;
mod panels;

use app::PianoRollApp;
use eframe::NativeOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("pianoroll=debug".parse().unwrap())
            .add_directive("wgpu=warn".parse().unwrap())
            .add_directive("eframe=warn".parse().unwrap()))
        .init();

    tracing::info!("Starting piano roll");

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Piano Roll",
        options,
        Box::new(|cc| Ok(Box::new(PianoRollApp::new(cc)))),
    )
}
