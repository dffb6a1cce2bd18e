//! List presenter: a titled, ordered run of article cards.
//!
//! Each entry gets an entrance delay of `index × stagger` measured from the
//! moment the list was mounted. Until its delay has elapsed an entry is
//! "pending" and the renderer draws it dimmed; after that it switches to the
//! normal style. The delays are presentation only: every entry exists, can be
//! selected and can be activated from the first frame.

use crate::article::{Article, Section};
use crate::callbacks::ActivateHandler;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Default entrance stagger between consecutive entries.
pub const DEFAULT_STAGGER: Duration = Duration::from_millis(100);

/// Smallest accepted stagger; keeps delays strictly increasing.
const MIN_STAGGER: Duration = Duration::from_millis(1);

/// One rendered entry of a [`Carousel`].
#[derive(Debug, Clone, Copy)]
pub struct CarouselEntry<'a> {
    pub index: usize,
    pub article: &'a Article,
    pub delay: Duration,
    pub entered: bool,
}

pub struct Carousel {
    title: String,
    articles: Arc<Vec<Article>>,
    on_activate: Option<ActivateHandler>,
    stagger: Duration,
    mounted_at: Instant,
    selected: usize,
}

impl Carousel {
    /// Mount a list now.
    pub fn new(title: impl Into<String>, articles: Arc<Vec<Article>>, stagger: Duration) -> Self {
        Self {
            title: title.into(),
            articles,
            on_activate: None,
            stagger: stagger.max(MIN_STAGGER),
            mounted_at: Instant::now(),
            selected: 0,
        }
    }

    pub fn from_section(section: Section, stagger: Duration) -> Self {
        Self::new(section.title, section.articles, stagger)
    }

    pub fn with_activate(mut self, handler: ActivateHandler) -> Self {
        self.on_activate = Some(handler);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    // ------------------------------------------------------------------------
    // Entrance staging
    // ------------------------------------------------------------------------

    pub fn entrance_delay(&self, index: usize) -> Duration {
        let factor = u32::try_from(index).unwrap_or(u32::MAX);
        self.stagger.saturating_mul(factor)
    }

    pub fn has_entered(&self, index: usize, now: Instant) -> bool {
        now.saturating_duration_since(self.mounted_at) >= self.entrance_delay(index)
    }

    /// Whether every entry has finished its entrance.
    pub fn fully_entered(&self, now: Instant) -> bool {
        self.articles.is_empty() || self.has_entered(self.articles.len() - 1, now)
    }

    /// One entry per article, in input order.
    pub fn entries(&self, now: Instant) -> Vec<CarouselEntry<'_>> {
        self.articles
            .iter()
            .enumerate()
            .map(|(index, article)| CarouselEntry {
                index,
                article,
                delay: self.entrance_delay(index),
                entered: self.has_entered(index, now),
            })
            .collect()
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.articles.get(self.selected)
    }

    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.articles.len().saturating_sub(1));
    }

    pub fn nav_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn nav_down(&mut self) {
        if !self.articles.is_empty() {
            let max_index = self.articles.len() - 1;
            self.selected = self.selected.saturating_add(1).min(max_index);
        }
    }

    // ------------------------------------------------------------------------
    // Activation
    // ------------------------------------------------------------------------

    /// Invoke the activation handler with the selected article.
    ///
    /// Returns false when there is no handler or the list is empty.
    pub fn activate(&self) -> bool {
        self.activate_index(self.selected)
    }

    pub fn activate_index(&self, index: usize) -> bool {
        match (&self.on_activate, self.articles.get(index)) {
            (Some(handler), Some(article)) => {
                tracing::debug!(section = %self.title, index, article_id = %article.id, "Entry activated");
                handler(article);
                true
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for Carousel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Carousel")
            .field("title", &self.title)
            .field("len", &self.articles.len())
            .field("selected", &self.selected)
            .field("stagger", &self.stagger)
            .field("on_activate", &self.on_activate.is_some())
            .finish()
    }
}
