use anyhow::{anyhow, Result};
use clap::Parser;
use eframe::egui;
use genre_explorer::app::GenreExplorerApp;
use genre_explorer::cli::Args;
use genre_explorer::config::{AppConfig, ConfigManager, APP_NAME};
use genre_explorer::state::AppState;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.write_default_config {
        let path = ConfigManager::new(APP_NAME)?.write_default_config()?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply(&mut config);
    log::info!(
        "Starting with {} (cache {})",
        config.data_path.display(),
        if config.cache_dataset { "on" } else { "off" }
    );

    let title = config.title.clone();
    let state = AppState::new(config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(GenreExplorerApp::new(state)))),
    )
    .map_err(|e| anyhow!("running UI: {e}"))
}
