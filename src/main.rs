mod config;
mod error;
mod launcher;
mod library;
mod ui;

use anyhow::{Context, Result};
use env_logger::Target;
use log::{error, info, LevelFilter};
use std::fs::{self, File};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use config::Config;
use launcher::SteamLauncher;
use library::{build_items, scan_installed, SteamClient};
use ui::{App, Theme};

const LOG_FILE_NAME: &str = "steam-tui.log";

fn main() -> Result<()> {
    init_logging();

    info!("Starting Steam library browser");

    if let Err(e) = run() {
        error!("{:#}", e);
        return Err(e);
    }

    Ok(())
}

fn run() -> Result<()> {
    let config = Config::load().context("Error reading config")?;

    // One blocking fetch at startup; nothing else runs on the runtime
    let rt = Runtime::new().context("Failed to create runtime")?;
    let games = rt
        .block_on(SteamClient::new().fetch_owned_games(&config.api_key, &config.steam_id))
        .context("Failed to fetch owned games")?;
    drop(rt);

    let installed = scan_installed(&config.library_path);
    let items = build_items(&games, &installed);
    info!(
        "{} games in library, {} installed",
        items.len(),
        items.iter().filter(|item| item.installed()).count()
    );

    let mut app = App::new(items, Theme::from_config(&config), SteamLauncher);
    app.run()
}

/// Log to a file, since the terminal is taken over by the UI
fn init_logging() {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Info).parse_default_env();

    match open_log_file() {
        Some(file) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        None => {
            builder.target(Target::Stderr);
        }
    }

    builder.init();
}

fn open_log_file() -> Option<File> {
    let dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("steam-library-tui");
    fs::create_dir_all(&dir).ok()?;
    File::create(dir.join(LOG_FILE_NAME)).ok()
}
