//! File checkpointer
//!
//! Writes three artifacts into the output directory:
//! - `{basename}.json` (or `.json.gz`): the checkpoint document, holding the
//!   run statistics and the full page records together
//! - `{basename}.csv`: one summary row per accepted page
//! - `{basename}_stats.json`: a copy of the run statistics
//!
//! Each file is written to a temporary file in the same directory and renamed
//! over the previous version, so readers never see a partial write. Only the
//! document is read back: pages and statistics come from one rename, so a
//! crash between renames can never pair pages of one batch with statistics
//! of another. The CSV and the statistics copy are derived views written
//! after it.

use super::traits::{Checkpointer, OutputResult};
use crate::config::OutputConfig;
use crate::crawler::ScrapedPage;
use crate::state::RunStatistics;
use flate2::read::GzDecoder;
use flate2::{Compression, GzBuilder};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Score above which the CSV flags a page as highly relevant
pub const HIGH_RELEVANCE_SCORE: f64 = 2.0;

const CSV_HEADER: [&str; 14] = [
    "title",
    "url",
    "summary",
    "full_text_length",
    "word_count",
    "categories_count",
    "sections_count",
    "links_count",
    "page_id",
    "relevance_score",
    "last_modified",
    "scraped_at",
    "categories",
    "is_high_relevance",
];

/// Checkpoint document as written
#[derive(Serialize)]
struct CheckpointRef<'a> {
    statistics: &'a RunStatistics,
    pages: Vec<&'a ScrapedPage>,
}

/// Checkpoint document as read back
#[derive(Deserialize)]
struct CheckpointDocument {
    statistics: RunStatistics,
    pages: Vec<ScrapedPage>,
}

/// Checkpointer writing CSV, JSON and statistics files
pub struct FileCheckpointer {
    directory: PathBuf,
    basename: String,
    compress: bool,
}

impl FileCheckpointer {
    /// Creates the checkpointer, creating the output directory if needed
    pub fn new(config: &OutputConfig) -> OutputResult<Self> {
        fs::create_dir_all(&config.directory)?;
        Ok(Self {
            directory: config.directory.clone(),
            basename: config.basename.clone(),
            compress: config.compress,
        })
    }

    pub fn csv_path(&self) -> PathBuf {
        self.directory.join(format!("{}.csv", self.basename))
    }

    /// Path of the full-detail file in the configured format
    pub fn json_path(&self) -> PathBuf {
        self.json_path_for(self.compress)
    }

    fn json_path_for(&self, compressed: bool) -> PathBuf {
        let extension = if compressed { "json.gz" } else { "json" };
        self.directory.join(format!("{}.{}", self.basename, extension))
    }

    pub fn stats_path(&self) -> PathBuf {
        self.directory.join(format!("{}_stats.json", self.basename))
    }

    /// Reads the checkpoint document
    ///
    /// Looks for the configured format first, then the other one.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(document))` - A checkpoint was found
    /// * `Ok(None)` - No checkpoint exists yet
    /// * `Err(OutputError)` - A checkpoint exists but cannot be read
    fn load_document(&self) -> OutputResult<Option<CheckpointDocument>> {
        for compressed in [self.compress, !self.compress] {
            let path = self.json_path_for(compressed);
            if !path.exists() {
                continue;
            }

            let reader = BufReader::new(File::open(&path)?);
            let document = if compressed {
                read_json(GzDecoder::new(reader))?
            } else {
                read_json(reader)?
            };
            tracing::debug!(
                "Loaded {} pages from {}",
                document.pages.len(),
                path.display()
            );
            return Ok(Some(document));
        }

        Ok(None)
    }

    /// Loads the pages of the last checkpoint
    pub fn load_pages(&self) -> OutputResult<Option<Vec<ScrapedPage>>> {
        Ok(self.load_document()?.map(|document| document.pages))
    }

    /// Loads the statistics record of the last checkpoint
    ///
    /// The statistics stored alongside the pages win; the separate
    /// statistics file is only read when no checkpoint document exists.
    pub fn load_stats(&self) -> OutputResult<Option<RunStatistics>> {
        if let Some(document) = self.load_document()? {
            return Ok(Some(document.statistics));
        }

        let path = self.stats_path();
        if !path.exists() {
            return Ok(None);
        }
        let reader = BufReader::new(File::open(&path)?);
        Ok(Some(serde_json::from_reader(reader)?))
    }

    fn write_csv(&self, pages: &[Arc<ScrapedPage>]) -> OutputResult<()> {
        write_atomic(&self.directory, &self.csv_path(), |out| {
            write_csv_row(out, CSV_HEADER.iter().map(|h| h.to_string()))?;
            for page in pages {
                write_csv_row(out, csv_fields(page))?;
            }
            Ok(())
        })
    }

    fn write_json(&self, pages: &[Arc<ScrapedPage>], stats: &RunStatistics) -> OutputResult<()> {
        let document = CheckpointRef {
            statistics: stats,
            pages: pages.iter().map(|p| p.as_ref()).collect(),
        };

        write_atomic(&self.directory, &self.json_path(), |out| {
            if self.compress {
                // Zero mtime keeps identical checkpoints byte-identical
                let mut encoder = GzBuilder::new().mtime(0).write(out, Compression::default());
                serde_json::to_writer_pretty(&mut encoder, &document)?;
                encoder.finish()?;
            } else {
                serde_json::to_writer_pretty(out, &document)?;
            }
            Ok(())
        })
    }

    fn write_stats(&self, stats: &RunStatistics) -> OutputResult<()> {
        write_atomic(&self.directory, &self.stats_path(), |out| {
            serde_json::to_writer_pretty(out, stats)?;
            Ok(())
        })
    }
}

impl Checkpointer for FileCheckpointer {
    fn name(&self) -> &str {
        "files"
    }

    fn checkpoint(&self, pages: &[Arc<ScrapedPage>], stats: &RunStatistics) -> OutputResult<()> {
        // The document goes first; the other files are derived from it
        self.write_json(pages, stats)?;
        self.write_csv(pages)?;
        self.write_stats(stats)?;

        tracing::debug!(
            "Wrote {} pages to {}",
            pages.len(),
            self.directory.display()
        );
        Ok(())
    }
}

fn read_json<R: Read>(reader: R) -> OutputResult<CheckpointDocument> {
    Ok(serde_json::from_reader(reader)?)
}

/// Writes through a temporary file in `dir`, then renames it over `path`
fn write_atomic<F>(dir: &Path, path: &Path, write: F) -> OutputResult<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> OutputResult<()>,
{
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut out = BufWriter::new(tmp.as_file_mut());
        write(&mut out)?;
        out.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

fn csv_fields(page: &ScrapedPage) -> Vec<String> {
    vec![
        page.title().to_string(),
        page.url().to_string(),
        page.summary().to_string(),
        page.full_text().chars().count().to_string(),
        page.word_count().to_string(),
        page.categories().len().to_string(),
        page.sections().len().to_string(),
        page.links().len().to_string(),
        page.page_id().to_string(),
        page.relevance_score().to_string(),
        page.last_modified().to_string(),
        page.scraped_at().to_rfc3339(),
        page.categories().join(" | "),
        (page.relevance_score() > HIGH_RELEVANCE_SCORE).to_string(),
    ]
}

fn write_csv_row<W, I>(out: &mut W, fields: I) -> OutputResult<()>
where
    W: Write,
    I: IntoIterator<Item = String>,
{
    let row: Vec<String> = fields.into_iter().map(|f| csv_escape(&f)).collect();
    writeln!(out, "{}", row.join(","))?;
    Ok(())
}

/// Quotes a field if it contains a delimiter, quote or line break
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
