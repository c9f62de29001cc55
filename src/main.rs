//! # Remote Catalog CLI (`rcat`)
//!
//! The `rcat` binary is the primary interface for Remote Catalog. It provides
//! commands for catalog initialization, remote inspection, and fetching
//! remote listings into the local SQLite catalog.
//!
//! ## Usage
//!
//! ```bash
//! rcat --config ./rcat.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rcat init` | Create the SQLite catalog and run schema migrations |
//! | `rcat remotes` | List the remotes defined in the rclone config |
//! | `rcat fetch` | Index remote listings into the catalog |
//!
//! ## Examples
//!
//! ```bash
//! # Initialize the catalog
//! rcat init
//!
//! # Index every configured remote from the root
//! rcat fetch
//!
//! # Index selected remotes and directories
//! rcat fetch --remote gdrive --remote s3-backup --dir photos --dir docs
//!
//! # Machine-readable progress on stderr
//! rcat fetch --progress json
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use remote_catalog::config;
use remote_catalog::db;
use remote_catalog::ingest;
use remote_catalog::migrate;
use remote_catalog::progress::ProgressMode;
use remote_catalog::rclone::RcloneCli;
use remote_catalog::registry;

/// Remote Catalog CLI — a local catalog of rclone remote files.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. A missing config file falls back to built-in defaults, so `rcat`
/// works out of the box against `~/.config/rclone/rclone.conf`.
#[derive(Parser)]
#[command(
    name = "rcat",
    about = "Remote Catalog — streams rclone remote listings into a local SQLite index",
    version,
    long_about = "Remote Catalog drives the rclone CLI to enumerate configured remotes, \
    streams the recursive listings through a parsing pipeline, and lands the results in a \
    SQLite catalog that can be queried offline."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./rcat.toml`. Catalog and rclone settings are read from
    /// this file; a missing file means defaults throughout.
    #[arg(long, global = true, default_value = "./rcat.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the catalog schema.
    ///
    /// Creates the SQLite catalog file and the files table. This command is
    /// idempotent — running it multiple times is safe.
    Init,

    /// List the remotes defined in the rclone config.
    ///
    /// Shows each remote's name and backend type, in config order. Useful
    /// for verifying which remotes a fetch would cover.
    Remotes,

    /// Index remote listings into the catalog.
    ///
    /// Resolves the selected remotes and directories into scan targets,
    /// lists each one recursively via rclone, and upserts every file into
    /// the catalog. Re-fetching is idempotent: existing paths are updated
    /// in place.
    Fetch {
        /// Remote to index (repeatable). Defaults to every remote in the
        /// rclone config, or to `[rclone].remotes` from the config file.
        #[arg(long = "remote")]
        remotes: Vec<String>,

        /// Directory to index within each remote (repeatable). Defaults to
        /// the remote root, or to `[rclone].dirs` from the config file.
        #[arg(long = "dir")]
        dirs: Vec<String>,

        /// Progress output on stderr: `auto`, `off`, `human`, or `json`.
        #[arg(long, default_value = "auto")]
        progress: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let pool = db::connect(&cfg).await?;
            migrate::run_migrations(&pool).await?;
            pool.close().await;
            println!("Catalog initialized at {}", cfg.catalog.path.display());
        }
        Commands::Remotes => {
            let registry = registry::load_remotes(&cfg.rclone_config_path())?;
            println!("{:<24} TYPE", "REMOTE");
            for name in registry.names() {
                let backend = registry
                    .settings(name)
                    .and_then(|settings| settings.get("type"))
                    .map(String::as_str)
                    .unwrap_or("-");
                println!("{:<24} {}", name, backend);
            }
        }
        Commands::Fetch {
            remotes,
            dirs,
            progress,
        } => {
            let mut cfg = cfg;
            if !remotes.is_empty() {
                cfg.rclone.remotes = remotes;
            }
            if !dirs.is_empty() {
                cfg.rclone.dirs = dirs;
            }

            let reporter = ProgressMode::parse(&progress)?.reporter();
            let source = RcloneCli::new(cfg.rclone.binary.clone(), cfg.rclone_config_path());

            let summary = ingest::run_fetch(&cfg, &source, reporter.as_ref()).await?;

            println!("fetch");
            println!("  catalog: {}", summary.db_path.display());
            println!("  indexed: {} records", summary.total_indexed);
            println!("  remotes: {}", summary.remotes.join(", "));
            println!("ok");
        }
    }

    Ok(())
}
