//! SQLite schema for the checkpoint database
//!
//! The database mirrors the latest checkpoint only: every checkpoint replaces
//! the contents of all three tables.

/// SQL schema for the checkpoint database
pub const SCHEMA_SQL: &str = r#"
-- One row per accepted page
CREATE TABLE IF NOT EXISTS pages (
    title TEXT PRIMARY KEY,
    url TEXT NOT NULL,
    summary TEXT NOT NULL,
    full_text TEXT NOT NULL,
    word_count INTEGER NOT NULL,
    page_id INTEGER NOT NULL,
    last_modified TEXT NOT NULL,
    scraped_at TEXT NOT NULL,
    relevance_score REAL NOT NULL,
    categories TEXT NOT NULL,
    links TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_pages_score ON pages(relevance_score);

-- Heading sections of each page, in document order
CREATE TABLE IF NOT EXISTS sections (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    page_title TEXT NOT NULL REFERENCES pages(title),
    position INTEGER NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    level INTEGER NOT NULL,
    word_count INTEGER NOT NULL,
    UNIQUE(page_title, position)
);

CREATE INDEX IF NOT EXISTS idx_sections_page ON sections(page_title);

-- Statistics of the run that wrote the checkpoint
CREATE TABLE IF NOT EXISTS run_stats (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    started_at TEXT NOT NULL,
    finished_at TEXT,
    duration_seconds REAL,
    status TEXT NOT NULL,
    config_hash TEXT NOT NULL,
    batches INTEGER NOT NULL,
    pages_accepted INTEGER NOT NULL,
    pages_restored INTEGER NOT NULL,
    pages_rejected INTEGER NOT NULL,
    pages_failed INTEGER NOT NULL,
    pages_not_found INTEGER NOT NULL,
    relevant_pages INTEGER NOT NULL,
    total_words INTEGER NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
