use anyhow::Result;
use sqlx::SqlitePool;

/// Bring the catalog schema up to date. Safe to run on every start.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    // Create files table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS files (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            full_path TEXT NOT NULL,
            drive TEXT NOT NULL,
            size INTEGER NOT NULL,
            modified_date TEXT,
            file_type TEXT,
            UNIQUE(full_path)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_files_drive ON files(drive)")
        .execute(pool)
        .await?;

    Ok(())
}
