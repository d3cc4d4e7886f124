//! `kbscope import` — Load rows from a JSONL or JSON file into SQLite.

use kbscope_config::AppConfig;
use kbscope_core::knowledge::coerce_rows;
use kbscope_knowledge::{FileSource, SqliteSource};
use std::path::PathBuf;
use tracing::info;

pub async fn run(file: PathBuf, db: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let db_path = match db {
        Some(path) => path,
        None => {
            let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
            if config.knowledge.source != "sqlite" {
                return Err(format!(
                    "knowledge.source is \"{}\"; pass --db to choose a database",
                    config.knowledge.source
                )
                .into());
            }
            config
                .knowledge
                .resolved_path()
                .ok_or("No SQLite path configured")?
        }
    };

    let content = tokio::fs::read_to_string(&file)
        .await
        .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;
    let raw = FileSource::parse(&content)?;
    let parsed = raw.len();
    let rows = coerce_rows(&file.display().to_string(), raw);

    let store = SqliteSource::new(&db_path.to_string_lossy()).await?;
    let inserted = store.import(&rows).await?;
    let total = store.count().await?;

    info!(file = %file.display(), parsed, inserted, total, "Import finished");

    println!("📥 Imported {inserted} rows into {}", db_path.display());
    if inserted < parsed {
        println!("   ⚠️  {} rows skipped (missing project, type or content)", parsed - inserted);
    }
    println!("   Database now holds {total} rows");

    Ok(())
}
