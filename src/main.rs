use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use netforge_engine::Engine;
use netforge_playbook::{PlaybookDef, resolve};
use netforge_store::{RunLog, SqliteLog};

/// Netforge - a job execution engine for network automation
#[derive(Parser)]
#[command(name = "netforge")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.netforge)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Run a job from a playbook
  Run {
    /// Path to the playbook file (JSON)
    playbook: PathBuf,

    /// The job to run
    #[arg(long)]
    job: String,
  },

  /// Show the recorded runs of a job
  History {
    /// The job to inspect
    #[arg(long)]
    job: String,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let cli = Cli::parse();

  let data_dir = cli.data_dir.unwrap_or_else(|| {
    dirs::home_dir()
      .expect("could not determine home directory")
      .join(".netforge")
  });

  match cli.command {
    Some(Commands::Run { playbook, job }) => {
      run_job(playbook, job, data_dir)?;
    }
    Some(Commands::History { job }) => {
      show_history(job, data_dir)?;
    }
    None => {
      println!("netforge - use --help to see available commands");
    }
  }

  Ok(())
}

fn run_job(playbook: PathBuf, job: String, data_dir: PathBuf) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run_job_async(playbook, job, data_dir).await })
}

async fn run_job_async(playbook_file: PathBuf, job: String, data_dir: PathBuf) -> Result<()> {
  // Read playbook definition
  let playbook_content = tokio::fs::read_to_string(&playbook_file)
    .await
    .with_context(|| format!("failed to read playbook file: {}", playbook_file.display()))?;

  let playbook_def = PlaybookDef::from_json(&playbook_content)
    .with_context(|| format!("failed to parse playbook file: {}", playbook_file.display()))?;

  // Resolve inventory and jobs
  let (inventory, registry) = resolve(playbook_def).context("failed to resolve playbook")?;

  eprintln!("Loaded playbook with {} jobs", registry.len());

  // Read payload from stdin
  let payload = read_payload_from_stdin()?;

  // Open the run-log store
  let store = open_store(&data_dir).await?;

  // Run the job
  let engine = Engine::new(Arc::new(registry), Arc::new(inventory), store);
  let report = engine
    .run(&job, payload)
    .await
    .with_context(|| format!("run of job '{job}' failed"))?;

  // Print the report as JSON
  println!("{}", serde_json::to_string_pretty(&report)?);

  if !report.success() {
    std::process::exit(1);
  }

  Ok(())
}

fn show_history(job: String, data_dir: PathBuf) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { show_history_async(job, data_dir).await })
}

async fn show_history_async(job: String, data_dir: PathBuf) -> Result<()> {
  let store = open_store(&data_dir).await?;

  let records = store.history(&job).await.context("failed to read run log")?;
  if records.is_empty() {
    eprintln!("no recorded runs for job '{job}'");
    return Ok(());
  }

  for record in records {
    println!(
      "{}\t{}",
      record.started_at.to_rfc3339(),
      serde_json::to_string(&record.report.0)?
    );
  }

  Ok(())
}

async fn open_store(data_dir: &Path) -> Result<Arc<dyn RunLog>> {
  tokio::fs::create_dir_all(data_dir)
    .await
    .with_context(|| format!("failed to create data directory: {}", data_dir.display()))?;

  let options = SqliteConnectOptions::new()
    .filename(data_dir.join("netforge.db"))
    .create_if_missing(true);
  let pool = SqlitePool::connect_with(options)
    .await
    .context("failed to open run-log database")?;

  let store = SqliteLog::new(pool);
  store
    .migrate()
    .await
    .context("failed to run database migrations")?;

  Ok(Arc::new(store))
}

fn read_payload_from_stdin() -> Result<serde_json::Value> {
  use std::io::IsTerminal;

  if io::stdin().is_terminal() {
    // No stdin pipe, start from an empty payload
    Ok(serde_json::Value::Null)
  } else {
    let mut input = String::new();
    io::stdin()
      .read_to_string(&mut input)
      .context("failed to read payload from stdin")?;
    if input.trim().is_empty() {
      Ok(serde_json::Value::Null)
    } else {
      serde_json::from_str(&input).context("payload on stdin is not valid JSON")
    }
  }
}
