// ABOUTME: Main application entry point.
// ABOUTME: Runs layout command scripts, prints events and outlines, and saves/restores sessions.

mod command;
mod render;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use command::Command;
use tg_core::{Config, Direction, SessionData};
use tg_layout::{LayoutError, LayoutEvent, LayoutManager};

#[derive(Debug, Parser)]
#[command(name = "tabgrid", version, about = "Drive a tabbed pane layout from a command script")]
struct Cli {
    /// Script to run; commands are read from stdin when omitted
    script: Option<PathBuf>,

    /// Config file to use instead of the platform default
    #[arg(long)]
    config: Option<PathBuf>,

    /// Session file, overriding the configured location
    #[arg(long)]
    session: Option<PathBuf>,

    /// Start from the saved session
    #[arg(long)]
    restore: bool,

    /// Save the final layout to the session file
    #[arg(long)]
    save: bool,

    /// Write the effective config file and exit
    #[arg(long)]
    write_config: bool,
}

/// What a command produced
enum Reply {
    Events(Vec<LayoutEvent>),
    Outline,
}

fn execute(
    manager: &mut LayoutManager,
    command: Command,
    default_split: Direction,
) -> Result<Reply, LayoutError> {
    let events = match command {
        Command::Open { target, document } => manager.open_tab(target, document)?.events,
        Command::CloseTab { pane, tab } => manager.close_tab(pane, tab)?.events,
        Command::Select { pane, tab } => manager.select_tab(pane, tab)?.events,
        Command::Split { pane, direction } => {
            manager
                .split_pane(pane, direction.unwrap_or(default_split))?
                .events
        }
        Command::Close { pane } => manager.close_pane(pane)?.events,
        Command::Focus { pane } => manager.focus_pane(pane)?.events,
        Command::Move { from, tab, to } => manager.move_tab(from, tab, to)?.events,
        Command::FocusDirection(direction) => manager.focus_direction(direction).events,
        Command::Dirty { pane, tab, dirty } => manager.set_tab_dirty(pane, tab, dirty)?.events,
        Command::Title { pane, tab, title } => manager.set_tab_title(pane, tab, title)?.events,
        Command::Flatten => manager.flatten_all().events,
        Command::Show => return Ok(Reply::Outline),
    };
    Ok(Reply::Events(events))
}

/// Run every line of `input`, returning how many lines failed
fn run_script(
    manager: &mut LayoutManager,
    config: &Config,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<usize> {
    let mut failures = 0;
    for (index, line) in input.lines().enumerate() {
        let line = line.context("Failed to read script")?;
        let reply = Command::parse(&line).and_then(|command| match command {
            Some(command) => Ok(Some(execute(
                manager,
                command,
                config.layout.default_split,
            )?)),
            None => Ok(None),
        });

        match reply {
            Ok(Some(Reply::Events(events))) => {
                for event in &events {
                    writeln!(out, "{}", render::event(event))?;
                }
            }
            Ok(Some(Reply::Outline)) => write!(out, "{}", render::outline(manager))?,
            Ok(None) => {}
            Err(e) => {
                eprintln!("line {}: {:#}", index + 1, e);
                failures += 1;
            }
        }
    }
    Ok(failures)
}

/// Load the saved layout, starting empty when there is none yet
fn restore_session(config: &Config, path: Option<&Path>) -> Result<LayoutManager> {
    let Some(path) = path.filter(|path| path.exists()) else {
        tracing::info!("No saved session, starting with an empty layout");
        return Ok(LayoutManager::from_config(config));
    };
    let session = SessionData::load(path)
        .with_context(|| format!("Failed to load session from {}", path.display()))?;
    let manager = LayoutManager::restore(&session.layout, config.layout.clone())
        .with_context(|| format!("Session in {} is inconsistent", path.display()))?;
    tracing::info!("Restored session from {}", path.display());
    Ok(manager)
}

/// Persist the layout; an empty layout leaves no session behind
fn save_session(manager: &LayoutManager, path: &Path) -> Result<()> {
    if manager.tree().is_empty() {
        SessionData::clear(path)
            .with_context(|| format!("Failed to remove session {}", path.display()))?;
        tracing::info!("Layout is empty, removed session {}", path.display());
        return Ok(());
    }
    SessionData::new(manager.snapshot())
        .save(path)
        .with_context(|| format!("Failed to save session to {}", path.display()))?;
    tracing::info!("Saved session to {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load_or_default(),
    };
    if cli.write_config {
        let path = cli
            .config
            .clone()
            .or_else(Config::default_path)
            .context("No config directory available on this platform")?;
        config
            .save(&path)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("{}", path.display());
        return Ok(());
    }
    let session_path = cli
        .session
        .clone()
        .or_else(|| config.session.path.clone())
        .or_else(SessionData::default_path);

    let mut manager = if cli.restore || config.session.restore_on_start {
        restore_session(&config, session_path.as_deref())?
    } else {
        LayoutManager::from_config(&config)
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let failures = match &cli.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            run_script(&mut manager, &config, BufReader::new(file), &mut out)?
        }
        None => run_script(&mut manager, &config, io::stdin().lock(), &mut out)?,
    };
    if failures > 0 {
        tracing::warn!("{} script lines failed", failures);
    }

    if cli.save {
        let path = session_path.context("No session path available on this platform")?;
        save_session(&manager, &path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tg_core::PaneId;

    fn run(manager: &mut LayoutManager, script: &str) -> (String, usize) {
        let mut out = Vec::new();
        let failures =
            run_script(manager, &Config::default(), script.as_bytes(), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), failures)
    }

    #[test]
    fn test_script_prints_events_and_outline() {
        let mut manager = LayoutManager::default();
        let (out, failures) = run(
            &mut manager,
            "# two panes side by side\n\
             open active src/main.rs\n\
             split P0\n\
             show\n",
        );

        assert_eq!(failures, 0);
        assert!(out.contains("pane-added P0"));
        assert!(out.contains("tab-opened P0 T1"));
        assert!(out.contains("pane-added P2"));
        assert!(out.contains("active P0 -> P2"));
        assert!(out.ends_with("C3 row\n  P0: >T1 main.rs\n  P2*: (no tabs)\n"));
    }

    #[test]
    fn test_failed_lines_do_not_stop_the_script() {
        let mut manager = LayoutManager::default();
        let (out, failures) = run(
            &mut manager,
            "open active a.rs\n\
             close P42\n\
             bogus\n\
             open active b.rs\n",
        );

        assert_eq!(failures, 2);
        assert!(out.contains("tab-opened P0 T2"));
        let pane = manager.tree().pane(PaneId(0)).unwrap();
        assert_eq!(pane.len(), 2);
    }

    #[test]
    fn test_session_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.bin");

        let mut manager = LayoutManager::default();
        run(
            &mut manager,
            "open active a.rs\nsplit P0 down\nopen P2 b.rs\nfocus P0\n",
        );
        save_session(&manager, &path).unwrap();

        let restored = restore_session(&Config::default(), Some(path.as_path())).unwrap();
        assert_eq!(restored.snapshot(), manager.snapshot());
        assert_eq!(restored.active_pane(), Some(PaneId(0)));
    }

    #[test]
    fn test_saving_empty_layout_removes_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.bin");

        let mut manager = LayoutManager::default();
        run(&mut manager, "open active a.rs\n");
        save_session(&manager, &path).unwrap();
        assert!(path.exists());

        run(&mut manager, "close P0\n");
        save_session(&manager, &path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_session_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let manager =
            restore_session(&Config::default(), Some(dir.path().join("none.bin").as_path())).unwrap();
        assert!(manager.tree().is_empty());
        assert_eq!(manager.active_pane(), None);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["tabgrid", "layout.txt", "--restore", "--session", "s.bin"]);
        assert_eq!(cli.script, Some(PathBuf::from("layout.txt")));
        assert!(cli.restore);
        assert!(!cli.save);
        assert!(!cli.write_config);
        assert_eq!(cli.session, Some(PathBuf::from("s.bin")));
    }
}
