//! Callback event processing.
//!
//! Applies events sent by activation handlers and spawned notification or
//! comment tasks to the application state.

use crate::app::{App, AppEvent};

/// Handle an event from a callback or background task.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::ArticleActivated(article) => {
            app.open_detail(article);
        }
        AppEvent::NotifyFailed {
            kind,
            article_id,
            error,
        } => {
            // The optimistic toggle stays as it is
            tracing::debug!(kind = kind.name(), article_id = %article_id, "Reporting failed notification");
            app.set_error(format!("Could not send {}: {}", kind.name(), error));
        }
        AppEvent::CommentSettled {
            session_id,
            article_id,
            result,
        } => {
            tracing::debug!(session_id, article_id = %article_id, ok = result.is_ok(), "Comment settled");
            app.settle_comment(session_id, result);
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            app.set_error(format!("Internal error in {} task", task));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::StatusLevel;
    use crate::article::fixtures::article;
    use crate::article::ArticleId;
    use crate::callbacks::{ArticleCallbacks, CallbackError, NotifyKind};
    use crate::config::Config;
    use tokio::sync::mpsc;

    fn app() -> App {
        let (tx, _rx) = mpsc::channel(8);
        App::new(Vec::new(), &Config::default(), ArticleCallbacks::new(), &tx)
    }

    #[test]
    fn activation_opens_detail() {
        let mut app = app();
        handle_app_event(&mut app, AppEvent::ArticleActivated(article("7", "Seven")));
        let session = app.overlay.as_ref().unwrap();
        assert_eq!(session.article().id.as_str(), "7");
        assert!(!session.liked());
    }

    #[test]
    fn failed_like_keeps_optimistic_state() {
        let mut app = app();
        app.open_detail(article("1", "T"));
        app.overlay.as_mut().unwrap().toggle_like();

        handle_app_event(
            &mut app,
            AppEvent::NotifyFailed {
                kind: NotifyKind::Like,
                article_id: ArticleId::new("1"),
                error: CallbackError::Rejected { status: 401 },
            },
        );

        assert!(app.overlay.as_ref().unwrap().liked());
        let (msg, _, level) = app.status_message.as_ref().unwrap();
        assert_eq!(*level, StatusLevel::Error);
        assert!(msg.contains("like"));
        assert!(msg.contains("401"));
    }

    #[test]
    fn settlement_routes_to_session() {
        let mut app = app();
        app.open_detail(article("1", "T"));
        let session = app.overlay.as_mut().unwrap();
        session.push_char('x');
        let pending = session.begin_submit().unwrap();

        handle_app_event(
            &mut app,
            AppEvent::CommentSettled {
                session_id: pending.session_id,
                article_id: pending.article_id,
                result: Ok(()),
            },
        );
        assert!(!app.overlay.as_ref().unwrap().submitting());
    }

    #[test]
    fn task_panic_is_reported() {
        let mut app = app();
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "favorite",
                error: "boom".to_string(),
            },
        );
        let (msg, _, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Internal error in favorite task");
    }
}
