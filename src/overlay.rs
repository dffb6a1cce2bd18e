//! Detail overlay session state.
//!
//! One [`OverlaySession`] lives from the moment an article is opened until
//! the overlay is closed. It owns the optimistic interaction flags and the
//! comment draft; nothing here is persisted, and closing the overlay drops
//! the whole session. Reopening creates a new session with a new id, which is
//! how late comment settlements from an earlier session are recognized and
//! ignored.
//!
//! ```
//! use lenta::overlay::OverlaySession;
//! # use lenta::article::parse_sections;
//! # let json = r#"[{"id":"1","title":"T","likes_count":4,"allow_comments":true,
//! #                "created_at":"2024-01-01T00:00:00Z"}]"#;
//! # let article = parse_sections(json, "t").unwrap()[0].articles[0].clone();
//! let mut session = OverlaySession::open(1, article);
//! assert_eq!(session.displayed_likes(), 4);
//! session.toggle_like();
//! assert_eq!(session.displayed_likes(), 5);
//! ```

use crate::article::{Article, ArticleId};
use crate::util::MAX_COMMENT_LENGTH;

/// A comment accepted for submission, to be handed to the comment handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingComment {
    pub session_id: u64,
    pub article_id: ArticleId,
    /// Draft text as typed, surrounding whitespace included.
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct OverlaySession {
    id: u64,
    article: Article,
    liked: bool,
    favorited: bool,
    submitting: bool,
    draft: String,
    /// Keystrokes go to the draft instead of the keybinding table.
    input_focused: bool,
    source_cursor: usize,
    scroll: usize,
}

impl OverlaySession {
    /// Start a session with all interaction state reset.
    pub fn open(id: u64, article: Article) -> Self {
        Self {
            id,
            article,
            liked: false,
            favorited: false,
            submitting: false,
            draft: String::new(),
            input_focused: false,
            source_cursor: 0,
            scroll: 0,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn article(&self) -> &Article {
        &self.article
    }

    pub fn liked(&self) -> bool {
        self.liked
    }

    pub fn favorited(&self) -> bool {
        self.favorited
    }

    pub fn submitting(&self) -> bool {
        self.submitting
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn input_focused(&self) -> bool {
        self.input_focused
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    // ------------------------------------------------------------------------
    // Toggles
    // ------------------------------------------------------------------------

    /// Flip `liked`. Returns the new value.
    pub fn toggle_like(&mut self) -> bool {
        self.liked = !self.liked;
        self.liked
    }

    /// Flip `favorited`. Returns the new value.
    pub fn toggle_favorite(&mut self) -> bool {
        self.favorited = !self.favorited;
        self.favorited
    }

    /// Like count including this session's optimistic like.
    pub fn displayed_likes(&self) -> u64 {
        self.article.likes_count + u64::from(self.liked)
    }

    // ------------------------------------------------------------------------
    // Comment draft
    // ------------------------------------------------------------------------

    pub fn comments_enabled(&self) -> bool {
        self.article.allow_comments
    }

    /// Whether [`begin_submit`](Self::begin_submit) would accept the draft.
    pub fn can_submit(&self) -> bool {
        self.comments_enabled() && !self.submitting && !self.draft.trim().is_empty()
    }

    /// Move keyboard focus into the comment input. No-op when comments are off.
    pub fn focus_input(&mut self) -> bool {
        self.input_focused = self.comments_enabled();
        self.input_focused
    }

    pub fn blur_input(&mut self) {
        self.input_focused = false;
    }

    /// Append a character to the draft.
    ///
    /// The draft stays editable while a submission is in flight. Control
    /// characters are dropped and the draft is capped at
    /// [`MAX_COMMENT_LENGTH`] characters.
    pub fn push_char(&mut self, c: char) -> bool {
        if !self.comments_enabled() || c.is_control() {
            return false;
        }
        if self.draft.chars().count() >= MAX_COMMENT_LENGTH {
            return false;
        }
        self.draft.push(c);
        true
    }

    pub fn pop_char(&mut self) -> bool {
        self.draft.pop().is_some()
    }

    /// Enter the submitting state and hand out the comment to send.
    ///
    /// Returns `None` (and changes nothing) when comments are disallowed,
    /// the draft is blank, or a submission is already in flight.
    pub fn begin_submit(&mut self) -> Option<PendingComment> {
        if !self.can_submit() {
            return None;
        }
        self.submitting = true;
        Some(PendingComment {
            session_id: self.id,
            article_id: self.article.id.clone(),
            text: self.draft.clone(),
        })
    }

    /// Leave the submitting state and clear the draft, whatever the outcome.
    pub fn settle_submit(&mut self) {
        self.submitting = false;
        self.draft.clear();
    }

    // ------------------------------------------------------------------------
    // Sources
    // ------------------------------------------------------------------------

    pub fn source_cursor(&self) -> usize {
        self.source_cursor
    }

    pub fn selected_source(&self) -> Option<&str> {
        self.article
            .sources
            .get(self.source_cursor)
            .map(String::as_str)
    }

    pub fn next_source(&mut self) {
        let count = self.article.sources.len();
        if count > 0 {
            self.source_cursor = (self.source_cursor + 1) % count;
        }
    }

    pub fn prev_source(&mut self) {
        let count = self.article.sources.len();
        if count > 0 {
            self.source_cursor = (self.source_cursor + count - 1) % count;
        }
    }

    // ------------------------------------------------------------------------
    // Scrolling
    // ------------------------------------------------------------------------

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    /// Keep the scroll offset within the rendered content.
    pub fn clamp_scroll(&mut self, content_lines: usize, visible_lines: usize) {
        let max_scroll = content_lines.saturating_sub(visible_lines);
        self.scroll = self.scroll.min(max_scroll).min(u16::MAX as usize);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::fixtures::article;
    use pretty_assertions::assert_eq;

    fn session() -> OverlaySession {
        OverlaySession::open(1, article("a-1", "Title"))
    }

    #[test]
    fn open_starts_from_clean_state() {
        let s = session();
        assert!(!s.liked());
        assert!(!s.favorited());
        assert!(!s.submitting());
        assert_eq!(s.draft(), "");
        assert!(!s.input_focused());
        assert_eq!(s.scroll(), 0);
    }

    #[test]
    fn like_adds_one_and_unlike_restores() {
        let mut s = session();
        assert_eq!(s.displayed_likes(), 10);
        assert!(s.toggle_like());
        assert_eq!(s.displayed_likes(), 11);
        assert!(!s.toggle_like());
        assert_eq!(s.displayed_likes(), 10);
    }

    #[test]
    fn favorite_toggles_independently() {
        let mut s = session();
        assert!(s.toggle_favorite());
        assert!(!s.liked());
        assert!(!s.toggle_favorite());
    }

    #[test]
    fn blank_draft_does_not_submit() {
        let mut s = session();
        assert_eq!(s.begin_submit(), None);

        for c in "   \t".chars() {
            s.push_char(c);
        }
        assert!(!s.can_submit());
        assert_eq!(s.begin_submit(), None);
        assert!(!s.submitting());
    }

    #[test]
    fn submit_hands_out_untrimmed_text() {
        let mut s = session();
        for c in "  Привет  ".chars() {
            s.push_char(c);
        }

        let pending = s.begin_submit().unwrap();
        assert_eq!(pending.session_id, 1);
        assert_eq!(pending.article_id.as_str(), "a-1");
        assert_eq!(pending.text, "  Привет  ");

        // Draft survives until settlement
        assert!(s.submitting());
        assert_eq!(s.draft(), "  Привет  ");
    }

    #[test]
    fn second_submit_while_in_flight_refused() {
        let mut s = session();
        s.push_char('x');
        assert!(s.begin_submit().is_some());
        assert_eq!(s.begin_submit(), None);
    }

    #[test]
    fn settle_clears_draft_and_submitting() {
        let mut s = session();
        s.push_char('x');
        s.begin_submit();
        s.settle_submit();
        assert!(!s.submitting());
        assert_eq!(s.draft(), "");
        assert!(!s.can_submit());
    }

    #[test]
    fn comments_disallowed_blocks_input_and_submit() {
        let mut a = article("a-2", "Closed");
        a.allow_comments = false;
        let mut s = OverlaySession::open(2, a);

        assert!(!s.focus_input());
        assert!(!s.push_char('x'));
        assert_eq!(s.draft(), "");
        assert_eq!(s.begin_submit(), None);
    }

    #[test]
    fn draft_is_capped() {
        let mut s = session();
        for _ in 0..MAX_COMMENT_LENGTH {
            assert!(s.push_char('я'));
        }
        assert!(!s.push_char('я'));
        assert_eq!(s.draft().chars().count(), MAX_COMMENT_LENGTH);
    }

    #[test]
    fn control_characters_are_not_typed() {
        let mut s = session();
        assert!(!s.push_char('\u{1b}'));
        assert!(!s.push_char('\n'));
        assert_eq!(s.draft(), "");
    }

    #[test]
    fn pop_char_removes_whole_characters() {
        let mut s = session();
        s.push_char('д');
        s.push_char('а');
        assert!(s.pop_char());
        assert_eq!(s.draft(), "д");
        assert!(s.pop_char());
        assert!(!s.pop_char());
    }

    #[test]
    fn source_cursor_wraps() {
        let mut a = article("a-3", "Sourced");
        a.sources = vec!["https://a.example".into(), "https://b.example".into()];
        let mut s = OverlaySession::open(3, a);

        assert_eq!(s.selected_source(), Some("https://a.example"));
        s.next_source();
        assert_eq!(s.selected_source(), Some("https://b.example"));
        s.next_source();
        assert_eq!(s.source_cursor(), 0);
        s.prev_source();
        assert_eq!(s.selected_source(), Some("https://b.example"));
    }

    #[test]
    fn source_cursor_without_sources() {
        let mut s = session();
        s.next_source();
        s.prev_source();
        assert_eq!(s.selected_source(), None);
        assert_eq!(s.source_cursor(), 0);
    }

    #[test]
    fn scroll_is_clamped_to_content() {
        let mut s = session();
        s.scroll_down(100);
        s.clamp_scroll(30, 10);
        assert_eq!(s.scroll(), 20);
        s.scroll_up(50);
        assert_eq!(s.scroll(), 0);
    }
}
