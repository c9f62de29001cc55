//! Catalog writes: batched upserts keyed on `full_path`.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::models::CatalogRecord;

/// Write one batch of records inside a single transaction.
///
/// Re-ingesting a path replaces the existing row; ids of replaced rows are
/// preserved. An empty batch is a no-op.
pub async fn upsert_batch(pool: &SqlitePool, records: &[CatalogRecord]) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }

    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    for record in records {
        sqlx::query(
            r#"
            INSERT INTO files (full_path, drive, size, file_type, modified_date)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(full_path) DO UPDATE SET
                drive = excluded.drive,
                size = excluded.size,
                file_type = excluded.file_type,
                modified_date = excluded.modified_date
            "#,
        )
        .bind(&record.full_path)
        .bind(&record.drive)
        .bind(record.size as i64)
        .bind(&record.file_type)
        .bind(&record.modified_date)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to upsert record: {}", record.full_path))?;
    }

    tx.commit().await.context("Failed to commit batch")?;
    Ok(())
}
