use crate::article::{Article, ArticleId, Section};
use crate::callbacks::{self, ActivateHandler, ArticleCallbacks, CallbackError, NotifyKind};
use crate::carousel::Carousel;
use crate::config::Config;
use crate::keybindings::{Context, KeybindingRegistry};
use crate::overlay::OverlaySession;
use crate::theme::{StyleMap, ThemeVariant};
use crate::util::DateLocale;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Seconds a status message stays visible.
const STATUS_TTL_SECS: u64 = 3;

/// Events from callbacks and background tasks
pub enum AppEvent {
    /// A list entry was activated; open it in the detail overlay.
    ArticleActivated(Article),
    /// A like/favorite notification failed. The optimistic toggle is kept.
    NotifyFailed {
        kind: NotifyKind,
        article_id: ArticleId,
        error: CallbackError,
    },
    /// A comment submission finished, successfully or not.
    ///
    /// `session_id` identifies the overlay session that submitted it; a
    /// settlement for a session that is no longer open is dropped.
    CommentSettled {
        session_id: u64,
        article_id: ArticleId,
        result: Result<(), CallbackError>,
    },
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: Name of the task that panicked (e.g., "like", "favorite")
    /// - `error`: The panic message extracted from the panic payload
    TaskPanicked { task: &'static str, error: String },
}

impl std::fmt::Debug for AppEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ArticleActivated(article) => {
                write!(f, "ArticleActivated({})", article.id)
            }
            Self::NotifyFailed {
                kind, article_id, ..
            } => write!(f, "NotifyFailed({}, {})", kind.name(), article_id),
            Self::CommentSettled {
                session_id, result, ..
            } => write!(f, "CommentSettled({}, ok={})", session_id, result.is_ok()),
            Self::TaskPanicked { task, .. } => write!(f, "TaskPanicked({})", task),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

/// Screen regions recorded by the last render, for mouse hit-testing.
#[derive(Debug, Default, Clone)]
pub struct LayoutCache {
    pub overlay_area: Option<Rect>,
    /// Area the overlay was inset into. Only set when a margin is visible.
    pub backdrop_area: Option<Rect>,
    pub rows: Vec<RowHit>,
    pub detail_visible_lines: usize,
    pub detail_content_lines: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowHit {
    pub area: Rect,
    pub section: usize,
    pub index: usize,
}

impl LayoutCache {
    pub fn row_at(&self, column: u16, row: u16) -> Option<RowHit> {
        let position = Position::new(column, row);
        self.rows
            .iter()
            .find(|hit| hit.area.contains(position))
            .copied()
    }

    /// Whether a click lands on the visible margin around the overlay.
    pub fn on_backdrop(&self, column: u16, row: u16) -> bool {
        let position = Position::new(column, row);
        match (self.backdrop_area, self.overlay_area) {
            (Some(backdrop), Some(overlay)) => {
                backdrop.contains(position) && !overlay.contains(position)
            }
            _ => false,
        }
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    /// One list presenter per section, top to bottom.
    pub sections: Vec<Carousel>,
    pub focused_section: usize,

    /// Open detail overlay, if any.
    pub overlay: Option<OverlaySession>,
    next_session_id: u64,

    pub callbacks: ArticleCallbacks,
    pub date_locale: DateLocale,

    /// Active theme variant (Dark or Light).
    pub theme_variant: ThemeVariant,
    /// Resolved style map for the active theme.
    pub theme: StyleMap,
    pub keybindings: KeybindingRegistry,

    pub status_message: Option<(Cow<'static, str>, Instant, StatusLevel)>,

    /// Set by input/event handlers; the loop only draws when true.
    pub needs_redraw: bool,
    /// Whether the previous tick saw an entrance still running.
    pub entrance_running: bool,
    pub spinner_frame: usize,

    pub show_help: bool,
    pub help_scroll_offset: usize,

    pub layout: LayoutCache,
}

impl App {
    /// Build the application from loaded sections.
    ///
    /// Every list gets an activation handler that forwards the activated
    /// article over `event_tx`; the event loop opens it in the overlay.
    pub fn new(
        sections: Vec<Section>,
        config: &Config,
        callbacks: ArticleCallbacks,
        event_tx: &mpsc::Sender<AppEvent>,
    ) -> Self {
        let stagger = config.stagger();
        let sections = sections
            .into_iter()
            .map(|section| {
                Carousel::from_section(section, stagger).with_activate(activation_handler(event_tx))
            })
            .collect();

        let mut keybindings = KeybindingRegistry::new();
        for warning in keybindings.apply_overrides(&config.keybindings) {
            tracing::warn!("{}", warning);
        }

        let theme_variant = config.theme_variant();

        Self {
            sections,
            focused_section: 0,
            overlay: None,
            next_session_id: 0,
            callbacks,
            date_locale: config.date_locale(),
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            keybindings,
            status_message: None,
            needs_redraw: true,
            entrance_running: true,
            spinner_frame: 0,
            show_help: false,
            help_scroll_offset: 0,
            layout: LayoutCache::default(),
        }
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    /// Switch to a different theme variant at runtime.
    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant (Dark → Light → Dark).
    ///
    /// Returns the name of the new theme for status display.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    /// Which keybinding table applies right now.
    pub fn input_context(&self) -> Context {
        match &self.overlay {
            Some(session) if session.input_focused() => Context::CommentInput,
            Some(_) => Context::Detail,
            None => Context::List,
        }
    }

    // ------------------------------------------------------------------------
    // Lists
    // ------------------------------------------------------------------------

    pub fn focused_carousel(&self) -> Option<&Carousel> {
        self.sections.get(self.focused_section)
    }

    pub fn focused_carousel_mut(&mut self) -> Option<&mut Carousel> {
        self.sections.get_mut(self.focused_section)
    }

    pub fn nav_up(&mut self) {
        if let Some(carousel) = self.focused_carousel_mut() {
            carousel.nav_up();
        }
    }

    pub fn nav_down(&mut self) {
        if let Some(carousel) = self.focused_carousel_mut() {
            carousel.nav_down();
        }
    }

    pub fn next_section(&mut self) {
        if !self.sections.is_empty() {
            self.focused_section = (self.focused_section + 1) % self.sections.len();
        }
    }

    pub fn prev_section(&mut self) {
        let count = self.sections.len();
        if count > 0 {
            self.focused_section = (self.focused_section + count - 1) % count;
        }
    }

    /// Activate the selected entry of the focused list.
    pub fn activate_selected(&self) -> bool {
        self.focused_carousel().is_some_and(Carousel::activate)
    }

    /// Focus and activate a specific entry (mouse click).
    pub fn activate_at(&mut self, section: usize, index: usize) -> bool {
        let Some(carousel) = self.sections.get_mut(section) else {
            return false;
        };
        carousel.select(index);
        self.focused_section = section;
        self.sections[section].activate_index(index)
    }

    /// Whether any list is still playing its entrance.
    pub fn entrance_in_progress(&self, now: Instant) -> bool {
        self.sections.iter().any(|c| !c.fully_entered(now))
    }

    // ------------------------------------------------------------------------
    // Detail overlay
    // ------------------------------------------------------------------------

    /// Open `article` in a fresh overlay session, replacing any open one.
    pub fn open_detail(&mut self, article: Article) {
        self.close_detail();
        self.next_session_id += 1;
        tracing::debug!(session_id = self.next_session_id, article_id = %article.id, "Opening detail");
        self.overlay = Some(OverlaySession::open(self.next_session_id, article));
        self.needs_redraw = true;
    }

    /// Close the overlay and drop its session state.
    ///
    /// A comment still in flight is not cancelled; its settlement arrives
    /// for a session that no longer exists and is ignored.
    pub fn close_detail(&mut self) {
        if let Some(session) = self.overlay.take() {
            if session.submitting() {
                tracing::debug!(
                    session_id = session.id(),
                    "Closing detail with a comment in flight"
                );
            }
            self.layout.overlay_area = None;
            self.layout.backdrop_area = None;
            self.needs_redraw = true;
        }
    }

    pub fn toggle_like(&mut self, tx: &mpsc::Sender<AppEvent>) {
        self.toggle(NotifyKind::Like, tx);
    }

    pub fn toggle_favorite(&mut self, tx: &mpsc::Sender<AppEvent>) {
        self.toggle(NotifyKind::Favorite, tx);
    }

    /// Flip the local flag, then notify the handler without waiting for it.
    fn toggle(&mut self, kind: NotifyKind, tx: &mpsc::Sender<AppEvent>) {
        let Some(session) = self.overlay.as_mut() else {
            return;
        };
        let now_on = match kind {
            NotifyKind::Like => session.toggle_like(),
            NotifyKind::Favorite => session.toggle_favorite(),
        };
        let article_id = session.article().id.clone();
        tracing::debug!(kind = kind.name(), article_id = %article_id, on = now_on, "Toggled");
        self.needs_redraw = true;

        if let Some(handler) = self.callbacks.notify_handler(kind) {
            callbacks::spawn_notify(handler.clone(), kind, article_id, tx.clone());
        }
    }

    /// Submit the comment draft.
    ///
    /// Returns false when there is nothing to submit. Without a comment
    /// handler the submission settles immediately.
    pub fn submit_comment(&mut self, tx: &mpsc::Sender<AppEvent>) -> bool {
        let Some(pending) = self.overlay.as_mut().and_then(OverlaySession::begin_submit) else {
            return false;
        };
        self.needs_redraw = true;

        match self.callbacks.on_comment.clone() {
            Some(handler) => {
                callbacks::spawn_comment(
                    handler,
                    pending.session_id,
                    pending.article_id,
                    pending.text,
                    tx.clone(),
                );
            }
            None => {
                tracing::debug!(article_id = %pending.article_id, "No comment handler, settling locally");
                self.settle_comment(pending.session_id, Ok(()));
            }
        }
        true
    }

    /// Apply a comment settlement to the session that submitted it.
    pub fn settle_comment(&mut self, session_id: u64, result: Result<(), CallbackError>) {
        let Some(session) = self.overlay.as_mut().filter(|s| s.id() == session_id) else {
            tracing::debug!(session_id, "Ignoring settlement for a closed session");
            return;
        };
        session.settle_submit();
        self.needs_redraw = true;

        match result {
            Ok(()) => self.set_status("Comment sent"),
            Err(e) => self.set_error(format!("Comment not sent: {}", e)),
        }
    }

    // ------------------------------------------------------------------------
    // Status bar
    // ------------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now(), StatusLevel::Info));
    }

    pub fn set_error(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now(), StatusLevel::Error));
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time, _)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

fn activation_handler(event_tx: &mpsc::Sender<AppEvent>) -> ActivateHandler {
    let tx = event_tx.clone();
    Arc::new(move |article: &Article| {
        if let Err(e) = tx.try_send(AppEvent::ArticleActivated(article.clone())) {
            tracing::warn!(error = %e, article_id = %article.id, "Dropped activation");
        }
    })
}
