//! SQLite knowledge source.
//!
//! Uses a single SQLite database file with one table, `knowledge`, whose
//! integer primary key is the insertion identifier. `fetch_all` returns rows
//! ordered by that id so load order is stable across restarts.
//!
//! The engine only ever reads, through [`SqliteSource::open`], which never
//! creates a file. [`SqliteSource::new`] creates the database and is what the
//! CLI's `import` command and the tests use before `insert`/`import`.

use async_trait::async_trait;
use kbscope_core::error::KnowledgeError;
use kbscope_core::knowledge::{coerce_rows, KnowledgeRow, KnowledgeSource, RawKnowledgeRow};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// A SQLite-backed knowledge source.
pub struct SqliteSource {
    pool: SqlitePool,
}

impl SqliteSource {
    /// Open (or create) a knowledge database.
    ///
    /// Pass `"sqlite::memory:"` for an in-process ephemeral database (useful
    /// for tests). Parent directories of a file path are created.
    pub async fn new(path: &str) -> Result<Self, KnowledgeError> {
        Self::connect(path, true).await
    }

    /// Open an existing knowledge database without creating anything on disk.
    ///
    /// A missing file is reported as [`KnowledgeError::Unavailable`].
    pub async fn open(path: &str) -> Result<Self, KnowledgeError> {
        Self::connect(path, false).await
    }

    async fn connect(path: &str, create: bool) -> Result<Self, KnowledgeError> {
        if create && !path.starts_with("sqlite:") {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        KnowledgeError::Storage(format!("Failed to create database directory: {e}"))
                    })?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| KnowledgeError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(create)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await
            .map_err(|e| KnowledgeError::Unavailable(format!("Failed to open SQLite: {e}")))?;

        let source = Self { pool };
        source.run_migrations().await?;
        info!("SQLite knowledge source initialized at {path}");
        Ok(source)
    }

    async fn run_migrations(&self) -> Result<(), KnowledgeError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS knowledge (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                project          TEXT NOT NULL,
                content_type     TEXT NOT NULL,
                title            TEXT,
                content          TEXT NOT NULL,
                tags             TEXT,
                pillar           TEXT,
                medium           TEXT,
                audience         TEXT,
                role             TEXT,
                tools_or_methods TEXT,
                one_liner        TEXT,
                is_highlight     INTEGER,
                depth            TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| KnowledgeError::Storage(format!("knowledge table: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    /// Parse a raw row from a SQLite result row.
    ///
    /// Validation happens afterwards in `coerce_rows`, so a row with a blank
    /// `content` is skipped rather than failing the whole read.
    fn row_to_raw(row: &sqlx::sqlite::SqliteRow) -> Result<RawKnowledgeRow, KnowledgeError> {
        let text = |column: &str| -> Result<Option<String>, KnowledgeError> {
            row.try_get(column)
                .map_err(|e| KnowledgeError::Storage(format!("{column} column: {e}")))
        };

        let id: i64 = row
            .try_get("id")
            .map_err(|e| KnowledgeError::Storage(format!("id column: {e}")))?;
        let is_highlight: Option<i64> = row
            .try_get("is_highlight")
            .map_err(|e| KnowledgeError::Storage(format!("is_highlight column: {e}")))?;

        Ok(RawKnowledgeRow {
            id: Some(id),
            project: text("project")?,
            content_type: text("content_type")?,
            title: text("title")?,
            content: text("content")?,
            tags: text("tags")?,
            pillar: text("pillar")?,
            medium: text("medium")?,
            audience: text("audience")?,
            role: text("role")?,
            tools_or_methods: text("tools_or_methods")?,
            one_liner: text("one_liner")?,
            is_highlight: is_highlight.map(|v| v != 0),
            depth: text("depth")?,
        })
    }

    /// Insert one row and return its assigned id. Any `id` on the row is ignored.
    pub async fn insert(&self, row: &KnowledgeRow) -> Result<i64, KnowledgeError> {
        let result = sqlx::query(
            r#"
            INSERT INTO knowledge (project, content_type, title, content, tags, pillar, medium,
                                   audience, role, tools_or_methods, one_liner, is_highlight, depth)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&row.project)
        .bind(&row.content_type)
        .bind(&row.title)
        .bind(&row.content)
        .bind(&row.tags)
        .bind(&row.pillar)
        .bind(&row.medium)
        .bind(&row.audience)
        .bind(&row.role)
        .bind(&row.tools_or_methods)
        .bind(&row.one_liner)
        .bind(row.is_highlight.map(i64::from))
        .bind(&row.depth)
        .execute(&self.pool)
        .await
        .map_err(|e| KnowledgeError::Storage(format!("INSERT failed: {e}")))?;

        let id = result.last_insert_rowid();
        debug!(id, project = %row.project, "Stored knowledge row");
        Ok(id)
    }

    /// Insert many rows in order. Returns how many were written.
    pub async fn import(&self, rows: &[KnowledgeRow]) -> Result<usize, KnowledgeError> {
        for row in rows {
            self.insert(row).await?;
        }
        info!(count = rows.len(), "Imported knowledge rows");
        Ok(rows.len())
    }

    pub async fn count(&self) -> Result<usize, KnowledgeError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM knowledge")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| KnowledgeError::Storage(format!("COUNT failed: {e}")))?;
        Ok(count as usize)
    }
}

#[async_trait]
impl KnowledgeSource for SqliteSource {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn fetch_all(&self) -> Result<Vec<KnowledgeRow>, KnowledgeError> {
        let rows = sqlx::query("SELECT * FROM knowledge ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| KnowledgeError::Unavailable(format!("SELECT failed: {e}")))?;

        let raw = rows
            .iter()
            .map(Self::row_to_raw)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(coerce_rows("sqlite", raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_source() -> SqliteSource {
        SqliteSource::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn insert_and_fetch_in_id_order() {
        let db = test_source().await;
        let first = db
            .insert(&KnowledgeRow::new("jascore_1_0", "summary", "Scoring engine").with_title("JasCore"))
            .await
            .unwrap();
        let second = db
            .insert(&KnowledgeRow::new("loom", "method", "Weaving").with_highlight(true))
            .await
            .unwrap();
        assert!(second > first);

        let rows = db.fetch_all().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, Some(first));
        assert_eq!(rows[0].title.as_deref(), Some("JasCore"));
        assert_eq!(rows[1].project, "loom");
        assert_eq!(rows[1].is_highlight, Some(true));
        assert!(rows[1].title.is_none());
    }

    #[tokio::test]
    async fn import_preserves_order() {
        let db = test_source().await;
        let rows: Vec<KnowledgeRow> = (0..5)
            .map(|i| KnowledgeRow::new(format!("p{i}"), "outcome", format!("body {i}")))
            .collect();

        assert_eq!(db.import(&rows).await.unwrap(), 5);
        assert_eq!(db.count().await.unwrap(), 5);

        let fetched = db.fetch_all().await.unwrap();
        let projects: Vec<&str> = fetched.iter().map(|r| r.project.as_str()).collect();
        assert_eq!(projects, vec!["p0", "p1", "p2", "p3", "p4"]);
    }

    #[tokio::test]
    async fn blank_content_rows_are_skipped_on_read() {
        let db = test_source().await;
        db.insert(&KnowledgeRow::new("a", "summary", "   ")).await.unwrap();
        db.insert(&KnowledgeRow::new("b", "summary", "kept")).await.unwrap();

        let rows = db.fetch_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].project, "b");
    }

    #[tokio::test]
    async fn open_never_creates_a_database() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("kb");
        let path = parent.join("knowledge.sqlite");
        let path_str = path.to_string_lossy().into_owned();

        let err = SqliteSource::open(&path_str).await.err().unwrap();
        assert!(matches!(err, KnowledgeError::Unavailable(_)));
        assert!(!parent.exists());

        let created = SqliteSource::new(&path_str).await.unwrap();
        created.insert(&KnowledgeRow::new("loom", "method", "Weaving")).await.unwrap();
        drop(created);

        let reopened = SqliteSource::open(&path_str).await.unwrap();
        assert_eq!(reopened.fetch_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_database_is_empty_corpus() {
        let db = test_source().await;
        assert!(db.fetch_all().await.unwrap().is_empty());
        assert_eq!(db.count().await.unwrap(), 0);
    }
}
