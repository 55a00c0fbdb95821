//! SQLite checkpointer
//!
//! Mirrors each checkpoint into a SQLite database. All three tables are
//! cleared and refilled inside one transaction, so a reader sees either the
//! previous checkpoint or the new one.

use super::schema::initialize_schema;
use super::traits::{Checkpointer, OutputError, OutputResult};
use crate::crawler::ScrapedPage;
use crate::state::{RunStatistics, RunStatus};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Checkpointer writing to a SQLite database
pub struct SqliteCheckpointer {
    conn: Mutex<Connection>,
}

impl SqliteCheckpointer {
    /// Opens (or creates) the checkpoint database
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteCheckpointer)` - Successfully opened/created database
    /// * `Err(OutputError)` - Failed to open database
    pub fn open(path: &Path) -> OutputResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;
        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> OutputResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn count_pages(&self) -> OutputResult<u64> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Titles of the stored pages, in title order
    pub fn page_titles(&self) -> OutputResult<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT title FROM pages ORDER BY title")?;
        let titles = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(titles)
    }

    /// Loads the statistics record of the last checkpoint
    pub fn load_stats(&self) -> OutputResult<Option<RunStatistics>> {
        let conn = self.conn();
        let row = conn
            .query_row(
                "SELECT started_at, finished_at, duration_seconds, status, config_hash,
                        batches, pages_accepted, pages_restored, pages_rejected, pages_failed,
                        pages_not_found, relevant_pages, total_words
                 FROM run_stats WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, Option<f64>>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        [
                            row.get::<_, i64>(5)?,
                            row.get::<_, i64>(6)?,
                            row.get::<_, i64>(7)?,
                            row.get::<_, i64>(8)?,
                            row.get::<_, i64>(9)?,
                            row.get::<_, i64>(10)?,
                            row.get::<_, i64>(11)?,
                            row.get::<_, i64>(12)?,
                        ],
                    ))
                },
            )
            .optional()?;

        let Some((started_at, finished_at, duration_seconds, status, config_hash, counts)) = row
        else {
            return Ok(None);
        };

        let status = RunStatus::from_db_string(&status)
            .ok_or_else(|| OutputError::Format(format!("unknown run status '{}'", status)))?;
        let finished_at = finished_at.as_deref().map(parse_timestamp).transpose()?;
        let [batches, accepted, restored, rejected, failed, not_found, relevant, words] =
            counts.map(|c| c as u64);

        Ok(Some(RunStatistics {
            started_at: parse_timestamp(&started_at)?,
            finished_at,
            duration_seconds,
            status,
            config_hash,
            batches,
            pages_accepted: accepted,
            pages_restored: restored,
            pages_rejected: rejected,
            pages_failed: failed,
            pages_not_found: not_found,
            relevant_pages: relevant,
            total_words: words,
        }))
    }
}

fn parse_timestamp(s: &str) -> OutputResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| OutputError::Format(format!("bad timestamp '{}': {}", s, e)))
}

impl Checkpointer for SqliteCheckpointer {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn checkpoint(&self, pages: &[Arc<ScrapedPage>], stats: &RunStatistics) -> OutputResult<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM sections", [])?;
        tx.execute("DELETE FROM pages", [])?;
        tx.execute("DELETE FROM run_stats", [])?;

        {
            let mut insert_page = tx.prepare(
                "INSERT INTO pages (title, url, summary, full_text, word_count, page_id,
                                    last_modified, scraped_at, relevance_score, categories, links)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            let mut insert_section = tx.prepare(
                "INSERT INTO sections (page_title, position, title, content, level, word_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;

            for page in pages {
                let categories = serde_json::to_string(page.categories())?;
                let links = serde_json::to_string(page.links())?;

                insert_page.execute(params![
                    page.title().as_str(),
                    page.url(),
                    page.summary(),
                    page.full_text(),
                    page.word_count() as i64,
                    page.page_id() as i64,
                    page.last_modified(),
                    page.scraped_at().to_rfc3339(),
                    page.relevance_score(),
                    categories,
                    links,
                ])?;

                for (position, section) in page.sections().iter().enumerate() {
                    insert_section.execute(params![
                        page.title().as_str(),
                        position as i64,
                        section.title,
                        section.content,
                        section.level as i64,
                        section.word_count as i64,
                    ])?;
                }
            }
        }

        tx.execute(
            "INSERT INTO run_stats (id, started_at, finished_at, duration_seconds, status,
                                    config_hash, batches, pages_accepted, pages_restored,
                                    pages_rejected, pages_failed, pages_not_found,
                                    relevant_pages, total_words)
             VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                stats.started_at.to_rfc3339(),
                stats.finished_at.map(|t| t.to_rfc3339()),
                stats.duration_seconds,
                stats.status.to_db_string(),
                stats.config_hash,
                stats.batches as i64,
                stats.pages_accepted as i64,
                stats.pages_restored as i64,
                stats.pages_rejected as i64,
                stats.pages_failed as i64,
                stats.pages_not_found as i64,
                stats.relevant_pages as i64,
                stats.total_words as i64,
            ],
        )?;

        tx.commit()?;
        Ok(())
    }
}
