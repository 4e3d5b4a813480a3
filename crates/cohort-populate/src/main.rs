//! cohort-populate binary.
//!
//! Reads `cohort.toml` (or the path given with `--config`), opens the SQLite
//! store, inserts a seed file and prints the results of any searches it lists.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use cohort_populate::{PopulateConfig, populate, run_searches, seed::SeedFile};
use cohort_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Seed a Cohort participant store")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "cohort.toml")]
  config: PathBuf,

  /// Store path; overrides the configuration.
  #[arg(long)]
  store: Option<PathBuf>,

  /// JSON seed file.
  seed: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr so stdout carries only the search output.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("COHORT"))
    .build()
    .context("failed to read config file")?;

  let mut cfg: PopulateConfig = settings
    .try_deserialize()
    .context("failed to deserialise PopulateConfig")?;
  if let Some(store) = cli.store {
    cfg.store_path = store;
  }

  let raw = std::fs::read_to_string(&cli.seed)
    .with_context(|| format!("failed to read seed file {:?}", cli.seed))?;
  let seed: SeedFile = serde_json::from_str(&raw)
    .with_context(|| format!("failed to parse seed file {:?}", cli.seed))?;

  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;

  let environments = populate(&store, &seed).await.context("seeding failed")?;
  if seed.searches.is_empty() {
    return Ok(());
  }

  let reports = run_searches(&store, &environments, &seed.searches)
    .await
    .context("search failed")?;
  let out = if cfg.pretty {
    serde_json::to_string_pretty(&reports)?
  } else {
    serde_json::to_string(&reports)?
  };
  println!("{out}");

  Ok(())
}
