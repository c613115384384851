mod backend_bridge;
mod config;
mod controller;
mod ui;

use crossbeam_channel::bounded;
use eframe::egui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::app::{PersistedUiSettings, SETTINGS_STORAGE_KEY};
use ui::TrainTrackApp;

fn main() -> eframe::Result<()> {
    let settings = config::load_settings();
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.clone())
        .init();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(settings.database_url.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("TrainTrack")
            .with_inner_size([480.0, 820.0])
            .with_min_inner_size([380.0, 620.0]),
        ..Default::default()
    };
    eframe::run_native(
        "TrainTrack",
        options,
        Box::new(|cc| {
            let persisted = cc.storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedUiSettings>(&text).ok())
            });
            Ok(Box::new(TrainTrackApp::new(cmd_tx, ui_rx, persisted)))
        }),
    )
}
