use crate::title::Title;
use serde::{Deserialize, Serialize};

/// One heading-delimited section of a page's plain text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSection {
    pub title: String,
    pub content: String,
    /// 0 for top-level (`== Heading ==`), 1 for `=== Heading ===`, ...
    pub level: u32,
    pub word_count: usize,
}

/// A page as returned by the remote source
///
/// `links` holds raw link titles in the order the source lists them; the
/// crawler canonicalizes and caps them when it builds the stored record.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub title: Title,
    pub url: String,
    pub text: String,
    pub summary: String,
    pub categories: Vec<String>,
    pub links: Vec<String>,
    pub sections: Vec<PageSection>,
    pub page_id: u64,
    pub revision_id: u64,
}

impl FetchedPage {
    /// Builds a page from a plain-text extract, deriving summary and sections
    pub fn from_extract(
        title: Title,
        url: String,
        text: String,
        categories: Vec<String>,
        links: Vec<String>,
        page_id: u64,
        revision_id: u64,
    ) -> Self {
        let (summary, sections) = split_sections(&text);
        Self {
            title,
            url,
            text,
            summary,
            categories,
            links,
            sections,
            page_id,
            revision_id,
        }
    }

    pub fn word_count(&self) -> usize {
        count_words(&self.text)
    }
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Parses a `== Heading ==` line, returning the heading text and its level
fn parse_heading(line: &str) -> Option<(String, u32)> {
    let line = line.trim();
    let leading = line.chars().take_while(|&c| c == '=').count();
    let trailing = line.chars().rev().take_while(|&c| c == '=').count();

    if leading < 2 || leading != trailing || line.len() <= leading * 2 {
        return None;
    }

    let heading = line[leading..line.len() - trailing].trim();
    if heading.is_empty() {
        return None;
    }

    Some((heading.to_string(), (leading - 2) as u32))
}

/// Splits a plain-text extract into its lead summary and heading sections
///
/// Section content is the text between a heading and the next heading of any
/// level, so a parent section does not repeat its subsections' text.
pub fn split_sections(text: &str) -> (String, Vec<PageSection>) {
    let mut summary_lines: Vec<&str> = Vec::new();
    let mut sections: Vec<PageSection> = Vec::new();
    let mut current: Option<(String, u32, Vec<&str>)> = None;

    for line in text.lines() {
        if let Some((heading, level)) = parse_heading(line) {
            if let Some(done) = current.take() {
                sections.push(finish_section(done));
            }
            current = Some((heading, level, Vec::new()));
            continue;
        }

        match current.as_mut() {
            Some((_, _, lines)) => lines.push(line),
            None => summary_lines.push(line),
        }
    }

    if let Some(done) = current.take() {
        sections.push(finish_section(done));
    }

    (summary_lines.join("\n").trim().to_string(), sections)
}

fn finish_section((title, level, lines): (String, u32, Vec<&str>)) -> PageSection {
    let content = lines.join("\n").trim().to_string();
    let word_count = count_words(&content);
    PageSection {
        title,
        content,
        level,
        word_count,
    }
}
