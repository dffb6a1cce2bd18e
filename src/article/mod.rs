//! Article and author data model.
//!
//! Articles are immutable inputs supplied by an external source (see
//! [`source`]). Everything the detail overlay shows that is not interaction
//! state is derived here from the article itself:
//!
//! - [`Article::header_text`] - topic if present, else title
//! - [`Article::media`] - which media block (if any) to render
//! - [`Article::author_block`] - named author, anonymous placeholder, or nothing

pub mod source;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::sync::Arc;

pub use source::{load_sections, parse_sections, Section, SourceError};

/// `media_type` value that selects the embedded video player.
pub const VIDEO_MEDIA_TYPE: &str = "youtube";

/// Base URL of the embedded player; the media reference is appended as a video id.
pub const VIDEO_EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// Avatar reference shown when an author has none.
pub const PLACEHOLDER_AVATAR: &str = "/placeholder.svg";

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque article identifier.
///
/// Uses `Arc<str>` so the id can be handed to spawned callback tasks without
/// copying the string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(Arc<str>);

impl ArticleId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArticleId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ============================================================================
// Data Structures
// ============================================================================

/// A single content entry.
///
/// Optional collections and counters accept both a missing key and an explicit
/// `null`, degrading to empty/zero.
#[derive(Debug, Clone, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub allow_comments: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_anonymous: bool,
    #[serde(default)]
    pub author: Option<Author>,
    pub created_at: DateTime<Utc>,
}

/// Author profile attached to an article.
#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_premium: bool,
    #[serde(default)]
    pub reputation: Option<i64>,
    #[serde(default)]
    pub articles_count: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Media block selected by an article's `media_type` and `media_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaBlock {
    /// Embedded player; `video_id` is the raw media reference.
    Video { video_id: String, embed_url: String },
    /// Static image at `url`.
    Image { url: String },
}

impl MediaBlock {
    /// URL to hand to an external viewer.
    pub fn target_url(&self) -> &str {
        match self {
            Self::Video { embed_url, .. } => embed_url,
            Self::Image { url } => url,
        }
    }
}

/// What the author section of the overlay shows.
#[derive(Debug, Clone, Copy)]
pub enum AuthorBlock<'a> {
    /// Author identity is rendered.
    Named(&'a Author),
    /// Article is anonymous: a hidden-identity placeholder replaces the author.
    Anonymous,
    /// No author section at all.
    Absent,
}

// ============================================================================
// Derived Values
// ============================================================================

impl Article {
    /// Header line: topic when present and non-empty, otherwise the title.
    pub fn header_text(&self) -> &str {
        match self.topic.as_deref() {
            Some(topic) if !topic.is_empty() => topic,
            _ => &self.title,
        }
    }

    /// Media block to render, or `None` when there is no media reference.
    pub fn media(&self) -> Option<MediaBlock> {
        let reference = self.media_url.as_deref().filter(|r| !r.is_empty())?;

        if self.media_type.as_deref() == Some(VIDEO_MEDIA_TYPE) {
            Some(MediaBlock::Video {
                video_id: reference.to_string(),
                embed_url: format!("{}{}", VIDEO_EMBED_BASE, reference),
            })
        } else {
            Some(MediaBlock::Image {
                url: reference.to_string(),
            })
        }
    }

    /// Anonymity wins over an attached author.
    pub fn author_block(&self) -> AuthorBlock<'_> {
        if self.is_anonymous {
            return AuthorBlock::Anonymous;
        }
        match &self.author {
            Some(author) => AuthorBlock::Named(author),
            None => AuthorBlock::Absent,
        }
    }

    pub fn has_sources(&self) -> bool {
        !self.sources.is_empty()
    }
}

impl Author {
    /// "First Last", tolerating either part being empty.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Handle line (`@username`), omitted when there is no non-empty username.
    pub fn handle(&self) -> Option<String> {
        self.username
            .as_deref()
            .filter(|u| !u.is_empty())
            .map(|u| format!("@{}", u))
    }

    pub fn avatar(&self) -> &str {
        self.avatar_url
            .as_deref()
            .filter(|a| !a.is_empty())
            .unwrap_or(PLACEHOLDER_AVATAR)
    }

    pub fn reputation(&self) -> i64 {
        self.reputation.unwrap_or(0)
    }

    pub fn articles_count(&self) -> u64 {
        self.articles_count.unwrap_or(0)
    }
}

/// Deserialize `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Test Fixtures
// ============================================================================
