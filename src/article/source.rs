//! Loading article sections from a JSON document.
//!
//! Two shapes are accepted:
//!
//! ```json
//! [ { "id": "1", "title": "...", "created_at": "2024-01-01T00:00:00Z" } ]
//! ```
//!
//! which becomes a single section titled with the caller's default title, or
//!
//! ```json
//! { "sections": [ { "title": "Popular", "articles": [ ... ] } ] }
//! ```
//!
//! Text fields are stripped of terminal control sequences on load, since the
//! document comes from outside and is rendered straight into the terminal.

use super::Article;
use crate::util::strip_control_chars;
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Maximum accepted document size (16 MB).
const MAX_DOCUMENT_SIZE: u64 = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read articles file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid articles JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Articles file too large: {size} bytes (max {max} bytes)")]
    TooLarge { size: u64, max: u64 },
}

/// A titled, ordered list of articles.
///
/// Articles are behind an `Arc` so the list presenter and the overlay can
/// share them without copying.
#[derive(Debug, Clone)]
pub struct Section {
    pub title: String,
    pub articles: Arc<Vec<Article>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Sectioned { sections: Vec<RawSection> },
    Flat(Vec<Article>),
}

#[derive(Deserialize)]
struct RawSection {
    title: String,
    #[serde(default)]
    articles: Vec<Article>,
}

/// Read and parse the articles document at `path`.
pub fn load_sections(path: &Path, default_title: &str) -> Result<Vec<Section>, SourceError> {
    let meta = std::fs::metadata(path)?;
    if meta.len() > MAX_DOCUMENT_SIZE {
        return Err(SourceError::TooLarge {
            size: meta.len(),
            max: MAX_DOCUMENT_SIZE,
        });
    }

    let content = std::fs::read_to_string(path)?;
    let sections = parse_sections(&content, default_title)?;
    tracing::info!(
        path = %path.display(),
        sections = sections.len(),
        articles = sections.iter().map(|s| s.articles.len()).sum::<usize>(),
        "Loaded articles"
    );
    Ok(sections)
}

/// Parse an articles document already in memory.
pub fn parse_sections(json: &str, default_title: &str) -> Result<Vec<Section>, SourceError> {
    let raw = match serde_json::from_str::<Document>(json)? {
        Document::Flat(articles) => vec![RawSection {
            title: default_title.to_string(),
            articles,
        }],
        Document::Sectioned { sections } => sections,
    };

    let sections = raw
        .into_iter()
        .map(|s| {
            if s.articles.is_empty() {
                tracing::warn!(section = %s.title, "Section has no articles");
            }
            warn_duplicate_ids(&s.title, &s.articles);
            Section {
                title: strip_control_chars(&s.title).into_owned(),
                articles: Arc::new(s.articles.into_iter().map(sanitize).collect()),
            }
        })
        .collect();

    Ok(sections)
}

/// Duplicate ids are kept (ordering is the source's business) but logged.
fn warn_duplicate_ids(section: &str, articles: &[Article]) {
    let mut seen = HashSet::with_capacity(articles.len());
    for article in articles {
        if !seen.insert(article.id.as_str()) {
            tracing::warn!(section, id = %article.id, "Duplicate article id in section");
        }
    }
}

fn sanitize(mut article: Article) -> Article {
    fn clean(s: &mut String) {
        let cleaned = match strip_control_chars(s) {
            Cow::Owned(cleaned) => Some(cleaned),
            Cow::Borrowed(_) => None,
        };
        if let Some(cleaned) = cleaned {
            *s = cleaned;
        }
    }

    clean(&mut article.title);
    clean(&mut article.body);
    article
        .topic
        .iter_mut()
        .chain(article.media_url.iter_mut())
        .chain(article.media_type.iter_mut())
        .chain(article.sources.iter_mut())
        .for_each(clean);
    if let Some(author) = article.author.as_mut() {
        clean(&mut author.first_name);
        clean(&mut author.last_name);
        author
            .username
            .iter_mut()
            .chain(author.avatar_url.iter_mut())
            .for_each(clean);
    }
    article
}
