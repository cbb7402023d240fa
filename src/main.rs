use std::path::Path;

use clap::Parser;
use color_eyre::Result;
use todo_sample::cli::{Cli, Commands, ListOptions};
use todo_sample::utils::expand_path;
use todo_sample::{Config, Profile, TaskStore};
use tracing_appender::non_blocking::WorkerGuard;

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    let cli = Cli::parse();

    // Logs go to a file, the terminal belongs to the TUI
    let log_file = cli.log_file.as_deref().map(|p| expand_path(&p.to_string_lossy()));
    let _log_guard = init_logging(&cli.log_level, log_file.as_deref());

    // Determine profile: --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let mut config = match cli.config {
        Some(ref path) => Config::load_from_path(&expand_path(&path.to_string_lossy()))?,
        None => Config::load_with_profile(profile)?,
    };
    if let Some(ref theme) = cli.theme {
        config.set_theme(theme)?;
    }

    let store = TaskStore::seeded();
    tracing::info!(tasks = store.len(), ?profile, "todo starting");

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let app = todo_sample::tui::App::new(config, store);
            todo_sample::tui::run_event_loop(app)?;
        }
        Commands::List { sort, priority, category, hide_completed, json } => {
            let options = ListOptions { sort, priority, category, hide_completed, json };
            let mut stdout = std::io::stdout().lock();
            todo_sample::cli::handle_list(&options, &store, &config.view, &config.features, &mut stdout)?;
        }
    }

    tracing::info!("todo exiting");
    Ok(())
}

/// Initialize file-based logging. The returned guard flushes buffered
/// entries when dropped.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("todo-sample.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}
