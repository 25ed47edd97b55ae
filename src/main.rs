mod app;
mod commands;
mod config;
mod event;
mod jira;
mod query;
mod rollup;
mod roster;
mod ui;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use jira::filter::IssueFilter;

#[derive(Parser, Debug)]
#[command(name = "tablero")]
#[command(about = "A terminal Kanban dashboard for Jira-style trackers")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/tablero/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Project key to filter by
  #[arg(short, long)]
  project: Option<String>,

  /// Assignee display name to filter by
  #[arg(short, long)]
  assignee: Option<String>,

  /// Team id to filter by (see the built-in roster)
  #[arg(short, long)]
  team: Option<String>,
}

/// Route tracing output to a log file; a TUI owns the terminal, so nothing
/// may write to stdout.
fn init_tracing() -> Result<WorkerGuard> {
  let log_dir = dirs::data_dir()
    .map(|dir| dir.join("tablero"))
    .unwrap_or_else(|| PathBuf::from("."));
  std::fs::create_dir_all(&log_dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", log_dir.display(), e))?;

  let appender = tracing_appender::rolling::never(log_dir, "tablero.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let _guard = init_tracing()?;

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;

  if let Some(team) = &args.team {
    if roster::team_by_id(team).is_none() {
      let known: Vec<&str> = roster::TEAMS.iter().map(|t| t.id).collect();
      return Err(eyre!("Unknown team id '{}'. Known teams: {}", team, known.join(", ")));
    }
  }

  let filter = IssueFilter {
    project: args.project.or_else(|| config.default_project.clone()),
    assignee: args.assignee,
    team_id: args.team,
    status: None,
  };

  info!("starting tablero");

  // Initialize and run the app
  let mut app = app::App::new(config, filter)?;
  app.run().await?;

  Ok(())
}
