//! Input handling for the TUI.
//!
//! Keys are dispatched in priority order: help overlay, comment input,
//! detail overlay, article lists. Mouse clicks activate list rows or, on the
//! backdrop around an inset overlay, close it.

use crate::app::{App, AppEvent};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tokio::sync::mpsc;

use super::helpers::open_external;
use super::Action;

/// Lines moved by page up / page down when the viewport size is unknown.
const DEFAULT_PAGE: usize = 20;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    // Help overlay captures all keys when visible
    if app.show_help {
        return handle_help_input(app, code);
    }

    match app.input_context() {
        KbContext::CommentInput => handle_comment_input(app, code, modifiers, event_tx),
        KbContext::Detail => handle_detail_input(app, code, modifiers, event_tx),
        _ => handle_list_input(app, code, modifiers),
    }
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Actions shared by every non-text context.
fn handle_common(app: &mut App, action: KbAction) -> Option<Action> {
    match action {
        KbAction::Quit => Some(Action::Quit),
        KbAction::CycleTheme => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
            Some(Action::Continue)
        }
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
            Some(Action::Continue)
        }
        _ => None,
    }
}

/// Handle input on the article lists.
fn handle_list_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::List)
    else {
        return Action::Continue;
    };

    if let Some(result) = handle_common(app, action) {
        return result;
    }

    match action {
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::NextSection => app.next_section(),
        KbAction::PrevSection => app.prev_section(),
        KbAction::Activate => {
            app.activate_selected();
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input while the detail overlay is open and the input is not focused.
fn handle_detail_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Detail)
    else {
        return Action::Continue;
    };

    if let Some(result) = handle_common(app, action) {
        return result;
    }

    let page = match app.layout.detail_visible_lines {
        0 => DEFAULT_PAGE,
        n => n,
    };

    match action {
        KbAction::CloseDetail => app.close_detail(),
        KbAction::ToggleLike => app.toggle_like(event_tx),
        KbAction::ToggleFavorite => app.toggle_favorite(event_tx),
        KbAction::FocusComment => {
            if let Some(session) = app.overlay.as_mut() {
                if !session.focus_input() {
                    app.set_status("Comments are disabled for this article");
                }
            }
        }
        KbAction::NextSource => {
            if let Some(session) = app.overlay.as_mut() {
                session.next_source();
            }
        }
        KbAction::PrevSource => {
            if let Some(session) = app.overlay.as_mut() {
                session.prev_source();
            }
        }
        KbAction::OpenSource => {
            let url = app
                .overlay
                .as_ref()
                .and_then(|s| s.selected_source())
                .map(str::to_string);
            match url {
                Some(url) => open_external(app, &url),
                None => app.set_status("No sources"),
            }
        }
        KbAction::OpenMedia => {
            let url = app
                .overlay
                .as_ref()
                .and_then(|s| s.article().media())
                .map(|m| m.target_url().to_string());
            match url {
                Some(url) => open_external(app, &url),
                None => app.set_status("No media"),
            }
        }
        KbAction::ScrollDown => scroll_detail(app, 1, true),
        KbAction::ScrollUp => scroll_detail(app, 1, false),
        KbAction::PageDown => scroll_detail(app, page, true),
        KbAction::PageUp => scroll_detail(app, page, false),
        _ => {}
    }
    Action::Continue
}

/// Handle input while the comment input is focused: keys are text unless bound.
fn handle_comment_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match app
        .keybindings
        .action_for_key(code, modifiers, KbContext::CommentInput)
    {
        Some(KbAction::SubmitComment) => {
            // Ignored while a submission is in flight or the draft is blank
            app.submit_comment(event_tx);
        }
        Some(KbAction::LeaveInput) => {
            if let Some(session) = app.overlay.as_mut() {
                session.blur_input();
            }
        }
        Some(_) => {}
        None => edit_draft(app, code, modifiers),
    }
    Action::Continue
}

fn edit_draft(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    let Some(session) = app.overlay.as_mut() else {
        return;
    };
    match code {
        KeyCode::Backspace => {
            session.pop_char();
        }
        KeyCode::Char(c)
            if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            if !session.push_char(c) && !c.is_control() {
                app.set_status(format!(
                    "Comment at max length ({} chars)",
                    crate::util::MAX_COMMENT_LENGTH
                ));
            }
        }
        _ => {}
    }
}

fn scroll_detail(app: &mut App, lines: usize, down: bool) {
    let content = app.layout.detail_content_lines;
    let visible = app.layout.detail_visible_lines;
    if let Some(session) = app.overlay.as_mut() {
        if down {
            session.scroll_down(lines);
            session.clamp_scroll(content, visible);
        } else {
            session.scroll_up(lines);
        }
    }
}

/// Handle a mouse event.
pub(super) fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.show_help {
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.overlay.is_some() {
                if app.layout.on_backdrop(mouse.column, mouse.row) {
                    tracing::debug!(column = mouse.column, row = mouse.row, "Backdrop click");
                    app.close_detail();
                }
            } else if let Some(hit) = app.layout.row_at(mouse.column, mouse.row) {
                app.activate_at(hit.section, hit.index);
                app.needs_redraw = true;
            }
        }
        MouseEventKind::ScrollDown => {
            if app.overlay.is_some() {
                scroll_detail(app, 3, true);
            } else {
                app.nav_down();
            }
            app.needs_redraw = true;
        }
        MouseEventKind::ScrollUp => {
            if app.overlay.is_some() {
                scroll_detail(app, 3, false);
            } else {
                app.nav_up();
            }
            app.needs_redraw = true;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::RowHit;
    use crate::article::fixtures::article;
    use crate::article::Section;
    use crate::callbacks::ArticleCallbacks;
    use crate::config::Config;
    use crate::ui::events::handle_app_event;
    use ratatui::layout::Rect;
    use std::sync::Arc;

    fn setup(callbacks: ArticleCallbacks) -> (App, mpsc::Sender<AppEvent>, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel(32);
        let mut closed = article("2", "Closed");
        closed.allow_comments = false;
        let sections = vec![Section {
            title: "Popular".to_string(),
            articles: Arc::new(vec![article("1", "Open"), closed]),
        }];
        let app = App::new(sections, &Config::default(), callbacks, &tx);
        (app, tx, rx)
    }

    fn press(app: &mut App, tx: &mpsc::Sender<AppEvent>, code: KeyCode) -> Action {
        handle_input(app, code, KeyModifiers::NONE, tx)
    }

    fn drain(app: &mut App, rx: &mut mpsc::Receiver<AppEvent>) {
        while let Ok(event) = rx.try_recv() {
            handle_app_event(app, event);
        }
    }

    fn type_text(app: &mut App, tx: &mpsc::Sender<AppEvent>, text: &str) {
        for c in text.chars() {
            press(app, tx, KeyCode::Char(c));
        }
    }

    fn click(app: &mut App, column: u16, row: u16) {
        let mouse = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(app, mouse);
    }

    #[tokio::test]
    async fn enter_opens_selected_article() {
        let (mut app, tx, mut rx) = setup(ArticleCallbacks::new());
        press(&mut app, &tx, KeyCode::Char('j'));
        press(&mut app, &tx, KeyCode::Enter);
        drain(&mut app, &mut rx);

        assert_eq!(app.overlay.as_ref().unwrap().article().id.as_str(), "2");
        assert_eq!(app.input_context(), KbContext::Detail);
    }

    #[tokio::test]
    async fn quit_from_list_and_detail() {
        let (mut app, tx, _rx) = setup(ArticleCallbacks::new());
        assert_eq!(press(&mut app, &tx, KeyCode::Char('q')), Action::Quit);
        app.open_detail(article("1", "Open"));
        assert_eq!(press(&mut app, &tx, KeyCode::Char('q')), Action::Quit);
    }

    #[tokio::test]
    async fn typed_q_is_text_in_comment_input() {
        let (mut app, tx, _rx) = setup(ArticleCallbacks::new());
        app.open_detail(article("1", "Open"));
        press(&mut app, &tx, KeyCode::Char('c'));
        assert_eq!(app.input_context(), KbContext::CommentInput);

        assert_eq!(press(&mut app, &tx, KeyCode::Char('q')), Action::Continue);
        type_text(&mut app, &tx, "uick");
        assert_eq!(app.overlay.as_ref().unwrap().draft(), "quick");

        press(&mut app, &tx, KeyCode::Backspace);
        assert_eq!(app.overlay.as_ref().unwrap().draft(), "quic");

        press(&mut app, &tx, KeyCode::Esc);
        assert_eq!(app.input_context(), KbContext::Detail);
        assert!(app.overlay.is_some());
    }

    #[tokio::test]
    async fn ctrl_keys_are_not_typed() {
        let (mut app, tx, _rx) = setup(ArticleCallbacks::new());
        app.open_detail(article("1", "Open"));
        press(&mut app, &tx, KeyCode::Char('c'));
        handle_input(&mut app, KeyCode::Char('w'), KeyModifiers::CONTROL, &tx);
        assert_eq!(app.overlay.as_ref().unwrap().draft(), "");
    }

    #[tokio::test]
    async fn enter_submits_comment_and_settles() {
        let (mut app, tx, mut rx) = setup(ArticleCallbacks::logging());
        app.open_detail(article("1", "Open"));
        press(&mut app, &tx, KeyCode::Char('c'));
        type_text(&mut app, &tx, "Nice");
        press(&mut app, &tx, KeyCode::Enter);

        let session = app.overlay.as_ref().unwrap();
        assert!(session.submitting());
        assert_eq!(session.draft(), "Nice");

        // Draft stays editable; a second Enter is ignored while in flight
        type_text(&mut app, &tx, "!");
        press(&mut app, &tx, KeyCode::Enter);

        let event = rx.recv().await.unwrap();
        handle_app_event(&mut app, event);
        let session = app.overlay.as_ref().unwrap();
        assert!(!session.submitting());
        assert_eq!(session.draft(), "");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn comment_key_refused_when_comments_disallowed() {
        let (mut app, tx, mut rx) = setup(ArticleCallbacks::new());
        press(&mut app, &tx, KeyCode::Char('j'));
        press(&mut app, &tx, KeyCode::Enter);
        drain(&mut app, &mut rx);

        press(&mut app, &tx, KeyCode::Char('c'));
        assert_eq!(app.input_context(), KbContext::Detail);
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn like_and_favorite_keys_toggle() {
        let (mut app, tx, _rx) = setup(ArticleCallbacks::new());
        app.open_detail(article("1", "Open"));
        press(&mut app, &tx, KeyCode::Char('l'));
        press(&mut app, &tx, KeyCode::Char('f'));
        let session = app.overlay.as_ref().unwrap();
        assert_eq!(session.displayed_likes(), 11);
        assert!(session.favorited());
    }

    #[tokio::test]
    async fn esc_closes_and_reopen_resets() {
        let (mut app, tx, mut rx) = setup(ArticleCallbacks::new());
        app.open_detail(article("1", "Open"));
        press(&mut app, &tx, KeyCode::Char('l'));
        press(&mut app, &tx, KeyCode::Esc);
        assert!(app.overlay.is_none());

        press(&mut app, &tx, KeyCode::Enter);
        drain(&mut app, &mut rx);
        assert!(!app.overlay.as_ref().unwrap().liked());
    }

    #[tokio::test]
    async fn help_captures_keys() {
        let (mut app, tx, _rx) = setup(ArticleCallbacks::new());
        press(&mut app, &tx, KeyCode::Char('?'));
        assert!(app.show_help);
        assert_eq!(press(&mut app, &tx, KeyCode::Char('j')), Action::Continue);
        assert_eq!(app.help_scroll_offset, 1);
        assert_eq!(press(&mut app, &tx, KeyCode::Char('q')), Action::Continue);
        assert!(!app.show_help);
    }

    #[tokio::test]
    async fn open_media_without_media_reports_status() {
        let (mut app, tx, _rx) = setup(ArticleCallbacks::new());
        app.open_detail(article("1", "Open"));
        press(&mut app, &tx, KeyCode::Char('m'));
        let (msg, _, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "No media");
    }

    #[tokio::test]
    async fn unsafe_source_is_not_opened() {
        let (mut app, tx, _rx) = setup(ArticleCallbacks::new());
        let mut a = article("1", "Open");
        a.sources = vec!["javascript:alert(1)".to_string()];
        app.open_detail(a);
        press(&mut app, &tx, KeyCode::Char('o'));
        let (_, _, level) = app.status_message.as_ref().unwrap();
        assert_eq!(*level, crate::app::StatusLevel::Error);
    }

    #[tokio::test]
    async fn click_on_row_activates_it() {
        let (mut app, tx, mut rx) = setup(ArticleCallbacks::new());
        app.layout.rows = vec![
            RowHit {
                area: Rect::new(1, 1, 50, 1),
                section: 0,
                index: 0,
            },
            RowHit {
                area: Rect::new(1, 2, 50, 1),
                section: 0,
                index: 1,
            },
        ];
        click(&mut app, 10, 2);
        drain(&mut app, &mut rx);
        assert_eq!(app.overlay.as_ref().unwrap().article().id.as_str(), "2");
        assert_eq!(app.sections[0].selected(), 1);
    }

    #[tokio::test]
    async fn backdrop_click_closes_overlay() {
        let (mut app, tx, _rx) = setup(ArticleCallbacks::new());
        app.open_detail(article("1", "Open"));
        app.layout.overlay_area = Some(Rect::new(4, 1, 112, 28));
        app.layout.backdrop_area = Some(Rect::new(0, 0, 120, 30));

        click(&mut app, 50, 10);
        assert!(app.overlay.is_some());

        // Status bar row sits below the backdrop
        click(&mut app, 1, 30);
        assert!(app.overlay.is_some());

        click(&mut app, 1, 10);
        assert!(app.overlay.is_none());
    }

    #[tokio::test]
    async fn clicks_keep_overlay_without_visible_margin() {
        let (mut app, _tx, _rx) = setup(ArticleCallbacks::new());
        app.open_detail(article("1", "Open"));

        // Full-area overlay on a narrow terminal
        app.layout.overlay_area = Some(Rect::new(0, 0, 80, 23));
        click(&mut app, 0, 23);
        assert!(app.overlay.is_some());

        // Too-small terminal: nothing recorded
        app.layout.overlay_area = None;
        click(&mut app, 5, 5);
        assert!(app.overlay.is_some());
    }
}
