use nweat::cli::{AppConfig, Args};
use nweat::config::ConfigFile;
use nweat::domain::{StdFileSystem, TriageEngine};
use nweat::error::{NweatError, Result};
use nweat::logging::init_logger;
use nweat::thumbnail::{ImageThumbnailProvider, SyncThumbnailManager};
use nweat::tui::{render, App};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, process::ExitCode, sync::Arc, time::Duration};
use tracing::{error, warn};

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let config: AppConfig = args.into();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = match init_logger(config.log_file.as_deref(), config.verbosity) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    };

    // Returning instead of exiting lets the guard flush the log first
    match run_app_with_config(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "nweat stopped with an error");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Builds the engine and opens the given or the remembered directory
fn open_engine(config: &AppConfig) -> Result<TriageEngine> {
    let mut engine = TriageEngine::new(StdFileSystem, config.triage.clone());

    if config.remember_root {
        match ConfigFile::open_default() {
            Ok(store) => engine = engine.with_root_store(Box::new(store)),
            Err(e) => warn!(error = %e, "user config unavailable, directory will not be remembered"),
        }
    }

    let loaded = match &config.directory {
        Some(directory) => engine.load_root(directory).map(|()| Some(directory.clone())),
        None => engine.load_remembered_root(),
    };

    match loaded {
        Ok(Some(_)) => Ok(engine),
        Ok(None) => Err(NweatError::ConfigError(
            "no directory given and no previous directory to reopen".to_string(),
        )),
        Err(e) => {
            error!(error = %e, "failed to open directory");
            Err(e)
        }
    }
}

/// Runs the TUI application with configuration
pub fn run_app_with_config(config: &AppConfig) -> Result<()> {
    let engine = open_engine(config)?;
    let mut thumbnails = SyncThumbnailManager::new(Arc::new(ImageThumbnailProvider::default()))?;
    let mut app = App::new(engine);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &mut thumbnails);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let stats = app.engine.statistics();
    if stats.processed() > 0 {
        println!("Sorted {} of {} items", stats.processed(), stats.total);
        println!("   Archived: {}", stats.archived);
        println!("   Kept:     {}", stats.skipped);
        println!("   Moved:    {}", stats.moved);
    }

    result.map_err(NweatError::from)
}

/// Main application loop
fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    thumbnails: &mut SyncThumbnailManager,
) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| render(frame, app, thumbnails))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nweat::domain::TriageConfig;
    use std::fs;
    use tempfile::TempDir;

    fn config(directory: Option<std::path::PathBuf>) -> AppConfig {
        AppConfig {
            directory,
            triage: TriageConfig::default(),
            remember_root: false,
            log_file: None,
            verbosity: 0,
        }
    }

    #[test]
    fn test_open_engine_without_directory_returns_error() {
        let result = open_engine(&config(None));
        assert!(matches!(result, Err(NweatError::ConfigError(_))));
    }

    #[test]
    fn test_open_engine_unreadable_directory_returns_error() {
        let result = open_engine(&config(Some("/nonexistent/path/12345".into())));
        assert!(matches!(
            result,
            Err(NweatError::DirectoryUnreadable { .. })
        ));
    }

    #[test]
    fn test_open_engine_loads_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.jpg"), b"a").unwrap();

        let engine = open_engine(&config(Some(temp_dir.path().to_path_buf()))).unwrap();

        assert_eq!(engine.items().len(), 1);
    }
}
