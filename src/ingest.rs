//! Ingestion pipeline orchestration.
//!
//! Coordinates the full fetch flow: registry → target resolution → listing →
//! parsing → batched catalog writes, with progress reported along the way.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::config::Config;
use crate::count;
use crate::db;
use crate::migrate;
use crate::models::{CatalogRecord, FetchSummary, ScanTarget};
use crate::progress::{ProgressReporter, ProgressState};
use crate::rclone::{RemoteSource, LSF_SEPARATOR};
use crate::registry;
use crate::store;
use crate::targets::resolve_targets;

/// Records buffered between catalog writes.
pub const BATCH_SIZE: usize = 500;

/// Run a full fetch: list every resolved target and upsert its files.
///
/// The advisory pre-count only sizes the progress total; a target that fails
/// to count still gets listed. A target that fails to *list* aborts the run,
/// with everything already committed for earlier targets left in place.
pub async fn run_fetch(
    config: &Config,
    source: &dyn RemoteSource,
    reporter: &dyn ProgressReporter,
) -> Result<FetchSummary> {
    let conf_path = config.rclone_config_path();
    let registry = registry::load_remotes(&conf_path)?;
    source.ensure_available()?;

    let targets = resolve_targets(&registry, &config.rclone.remotes, &config.rclone.dirs)?;

    let pool = db::connect(config).await?;
    migrate::run_migrations(&pool).await?;

    let total = count::count_all_items(source, &targets);
    let mut progress = ProgressState::new(total);
    reporter.report(&progress);

    // The pool is closed whether ingestion succeeded or not.
    let result = ingest_targets(&pool, source, &targets, &mut progress, reporter).await;
    pool.close().await;
    let total_indexed = result?;

    progress.complete();
    reporter.report(&progress);

    let db_path = config
        .catalog
        .path
        .canonicalize()
        .with_context(|| format!("Failed to resolve catalog path: {}", config.catalog.path.display()))?;

    let mut remotes: Vec<String> = Vec::new();
    for target in &targets {
        if !remotes.contains(&target.remote) {
            remotes.push(target.remote.clone());
        }
    }

    Ok(FetchSummary {
        db_path,
        total_indexed,
        remotes,
    })
}

async fn ingest_targets(
    pool: &SqlitePool,
    source: &dyn RemoteSource,
    targets: &[ScanTarget],
    progress: &mut ProgressState,
    reporter: &dyn ProgressReporter,
) -> Result<u64> {
    let mut total_indexed = 0u64;

    for target in targets {
        eprintln!("Listing {}", target.scoped_id());

        let mut listing = source.list(target)?;
        let mut batch: Vec<CatalogRecord> = Vec::with_capacity(BATCH_SIZE);

        while let Some(line) = listing.next_line() {
            let line = line
                .with_context(|| format!("Failed reading listing of {}", target.scoped_id()))?;

            let Some(record) = parse_record(target, &line) else {
                continue;
            };

            batch.push(record);
            if batch.len() >= BATCH_SIZE {
                store::upsert_batch(pool, &batch).await?;
                total_indexed += batch.len() as u64;
                batch.clear();
            }

            progress.record();
            reporter.report(progress);
        }

        // A failed listing drops its unflushed tail; committed batches stay.
        listing.finish()?;

        if !batch.is_empty() {
            store::upsert_batch(pool, &batch).await?;
            total_indexed += batch.len() as u64;
        }
    }

    Ok(total_indexed)
}

/// Parse one `lsf` line into a record, or `None` when the line carries no
/// usable path. Sizes that fail to parse are stored as zero rather than
/// dropping the file.
fn parse_record(target: &ScanTarget, line: &str) -> Option<CatalogRecord> {
    let fields: Vec<&str> = line.split(LSF_SEPARATOR).collect();

    let relative = *fields.first()?;
    if relative.is_empty() {
        return None;
    }

    let file_type = fields.get(1).copied().unwrap_or("").to_string();
    let size = fields
        .get(2)
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .unwrap_or(0);
    let modified_date = fields.get(3).map(|raw| raw.to_string());

    Some(CatalogRecord {
        full_path: target.full_path(relative),
        drive: target.remote.clone(),
        size,
        file_type,
        modified_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> ScanTarget {
        ScanTarget::new("gdrive", "photos")
    }

    #[test]
    fn parses_full_line() {
        let record = parse_record(&target(), "2024/img.jpg\timage/jpeg\t1024\t2024-01-02 10:00:00").unwrap();
        assert_eq!(record.full_path, "gdrive:photos/2024/img.jpg");
        assert_eq!(record.drive, "gdrive");
        assert_eq!(record.size, 1024);
        assert_eq!(record.file_type, "image/jpeg");
        assert_eq!(
            record.modified_date.as_deref(),
            Some("2024-01-02 10:00:00")
        );
    }

    #[test]
    fn missing_fields_get_defaults() {
        let record = parse_record(&target(), "doc.txt").unwrap();
        assert_eq!(record.full_path, "gdrive:photos/doc.txt");
        assert_eq!(record.size, 0);
        assert_eq!(record.file_type, "");
        assert!(record.modified_date.is_none());
    }

    #[test]
    fn unparseable_size_becomes_zero() {
        let record = parse_record(&target(), "doc.txt\ttext/plain\t-5\tnow").unwrap();
        assert_eq!(record.size, 0);
        let record = parse_record(&target(), "doc.txt\ttext/plain\tbig\tnow").unwrap();
        assert_eq!(record.size, 0);
    }

    #[test]
    fn empty_path_is_skipped() {
        assert!(parse_record(&target(), "").is_none());
        assert!(parse_record(&target(), "\ttext/plain\t10\tnow").is_none());
    }
}
