use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;

use snapshelf::app::App;
use snapshelf::config::Config;
use snapshelf::db::Database;
use snapshelf::device::Devices;
use snapshelf::logging;
use snapshelf::trash::TrashManager;

fn parse_args() -> Option<PathBuf> {
    let args: Vec<String> = std::env::args().collect();
    let mut config_path = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("snapshelf {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    config_path
}

fn print_help() {
    println!(
        r#"snapshelf - TUI photo gallery

USAGE:
    snapshelf [OPTIONS]

OPTIONS:
    --config, -c PATH   Path to config file
    --version, -V       Show version
    --help, -h          Show this help message

ENVIRONMENT:
    SNAPSHELF_CONFIG    Path to config file (overrides default location)
    SNAPSHELF_LOG       Log level (trace, debug, info, warn, error)

Config file location: $XDG_CONFIG_HOME/snapshelf/config.toml"#
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = parse_args();

    // Uses journald on Linux, a rolling file otherwise
    let _ = logging::init(Some(Config::config_dir().join("logs")));

    let config = match config_path {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };

    let mut db = Database::open(&config.db_path)?;
    db.initialize()?;

    // Expired entries go even when new deletes bypass the trash
    if let Err(e) = TrashManager::new(config.trash.clone()).purge_expired(&db) {
        tracing::warn!("Failed to purge expired deleted photos: {:#}", e);
    }

    let devices = Devices::from_config(&config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, db, devices);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
