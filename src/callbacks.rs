//! Outbound action contracts.
//!
//! The list and the detail overlay never talk to a system of record
//! themselves. Committed user actions leave through the handlers collected
//! in [`ArticleCallbacks`]; every handler is optional and a missing one makes
//! the corresponding action a local no-op.
//!
//! Like and favorite notifications are fire-and-forget: they are spawned and
//! never joined, and a failure comes back as [`AppEvent::NotifyFailed`].
//! Comment submission is also spawned, but its settlement is delivered as
//! [`AppEvent::CommentSettled`] so the overlay can leave the submitting state.

use crate::app::AppEvent;
use crate::article::{Article, ArticleId};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// Future returned by notification and comment handlers.
pub type NotifyFuture = BoxFuture<'static, Result<(), CallbackError>>;

/// Invoked synchronously when a list entry is activated.
pub type ActivateHandler = Arc<dyn Fn(&Article) + Send + Sync>;

/// Like / favorite notification, keyed by article id.
pub type NotifyHandler = Arc<dyn Fn(ArticleId) -> NotifyFuture + Send + Sync>;

/// Comment submission: article id and the draft text exactly as typed.
pub type CommentHandler = Arc<dyn Fn(ArticleId, String) -> NotifyFuture + Send + Sync>;

#[derive(Debug, Error)]
pub enum CallbackError {
    /// The system of record answered but refused the action.
    #[error("Rejected by server: HTTP {status}")]
    Rejected { status: u16 },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Handler panicked: {0}")]
    Panicked(String),
}

/// Which toggle a notification belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Like,
    Favorite,
}

impl NotifyKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Favorite => "favorite",
        }
    }
}

/// The optional outbound handlers of the detail overlay.
#[derive(Clone, Default)]
pub struct ArticleCallbacks {
    pub on_like: Option<NotifyHandler>,
    pub on_favorite: Option<NotifyHandler>,
    pub on_comment: Option<CommentHandler>,
}

impl ArticleCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_like<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(ArticleId) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CallbackError>> + Send + 'static,
    {
        self.on_like = Some(Arc::new(move |id| f(id).boxed()));
        self
    }

    pub fn with_favorite<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(ArticleId) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CallbackError>> + Send + 'static,
    {
        self.on_favorite = Some(Arc::new(move |id| f(id).boxed()));
        self
    }

    pub fn with_comment<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(ArticleId, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CallbackError>> + Send + 'static,
    {
        self.on_comment = Some(Arc::new(move |id, text| f(id, text).boxed()));
        self
    }

    /// Handlers that only record the action in the log and succeed.
    ///
    /// Used when no engagement API is configured.
    pub fn logging() -> Self {
        Self::new()
            .with_like(|id| async move {
                tracing::info!(article_id = %id, "Like toggled");
                Ok(())
            })
            .with_favorite(|id| async move {
                tracing::info!(article_id = %id, "Favorite toggled");
                Ok(())
            })
            .with_comment(|id, text| async move {
                tracing::info!(
                    article_id = %id,
                    chars = text.chars().count(),
                    "Comment submitted"
                );
                Ok(())
            })
    }

    pub(crate) fn notify_handler(&self, kind: NotifyKind) -> Option<&NotifyHandler> {
        match kind {
            NotifyKind::Like => self.on_like.as_ref(),
            NotifyKind::Favorite => self.on_favorite.as_ref(),
        }
    }
}

impl fmt::Debug for ArticleCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArticleCallbacks")
            .field("on_like", &self.on_like.is_some())
            .field("on_favorite", &self.on_favorite.is_some())
            .field("on_comment", &self.on_comment.is_some())
            .finish()
    }
}

/// Wraps a future to catch panics and convert them to errors.
///
/// A panicking handler would otherwise vanish inside the tokio runtime; here
/// the panic payload becomes `Err(message)` so the caller can report it.
pub(crate) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(future).catch_unwind().await.map_err(|panic| {
        if let Some(s) = panic.downcast_ref::<&'static str>() {
            s.to_string()
        } else if let Some(s) = panic.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic payload".to_string()
        }
    })
}

/// Spawn a like/favorite notification. Never joined.
///
/// Success is silent. A handler error is logged and sent back as
/// `NotifyFailed`; a panic as `TaskPanicked`.
pub(crate) fn spawn_notify(
    handler: NotifyHandler,
    kind: NotifyKind,
    article_id: ArticleId,
    tx: mpsc::Sender<AppEvent>,
) {
    tokio::spawn(async move {
        let id = article_id.clone();
        let event = match catch_task_panic(async move { handler(id).await }).await {
            Ok(Ok(())) => {
                tracing::debug!(kind = kind.name(), article_id = %article_id, "Notification delivered");
                return;
            }
            Ok(Err(error)) => {
                tracing::warn!(kind = kind.name(), article_id = %article_id, error = %error, "Notification failed");
                AppEvent::NotifyFailed {
                    kind,
                    article_id,
                    error,
                }
            }
            Err(panic_msg) => {
                tracing::error!(task = kind.name(), error = %panic_msg, "Notification handler panicked");
                AppEvent::TaskPanicked {
                    task: kind.name(),
                    error: panic_msg,
                }
            }
        };

        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Channel send failed (receiver dropped)");
        }
    });
}

/// Spawn a comment submission and report its settlement.
///
/// `CommentSettled` is sent whatever the outcome, including a panicking
/// handler, so the session it belongs to always leaves the submitting state.
pub(crate) fn spawn_comment(
    handler: CommentHandler,
    session_id: u64,
    article_id: ArticleId,
    text: String,
    tx: mpsc::Sender<AppEvent>,
) {
    tokio::spawn(async move {
        let id = article_id.clone();
        let result = match catch_task_panic(async move { handler(id, text).await }).await {
            Ok(result) => result,
            Err(panic_msg) => {
                tracing::error!(task = "comment", error = %panic_msg, "Comment handler panicked");
                Err(CallbackError::Panicked(panic_msg))
            }
        };

        match &result {
            Ok(()) => tracing::info!(session_id, article_id = %article_id, "Comment accepted"),
            Err(e) => tracing::warn!(session_id, article_id = %article_id, error = %e, "Comment failed"),
        }

        let event = AppEvent::CommentSettled {
            session_id,
            article_id,
            result,
        };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Channel send failed (receiver dropped)");
        }
    });
}
