use crate::app::{App, StatusLevel};
use crate::keybindings::Context;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

use super::helpers::spinner_char;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let (text, style) = status_text(app);
    f.render_widget(Paragraph::new(text).style(style), area);
}

fn status_text(app: &App) -> (Cow<'_, str>, ratatui::style::Style) {
    if let Some((msg, _, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => app.style("status_bar"),
            StatusLevel::Error => app.style("status_error"),
        };
        return (Cow::Borrowed(msg.as_ref()), style);
    }

    let style = app.style("status_bar");
    if app.overlay.as_ref().is_some_and(|s| s.submitting()) {
        let text = format!("{} Sending comment...", spinner_char(app.spinner_frame));
        return (Cow::Owned(text), style);
    }

    let hints = match app.input_context() {
        Context::CommentInput => "Type a comment | ENTER send | ESC leave input",
        Context::Detail => {
            "[l]ike [f]avorite [c]omment [ ]]sources [o]pen [m]edia [j/k]scroll [Esc]close [?]help"
        }
        _ => "[j/k]select [Tab]section [Enter]open [T]heme [?]help [q]uit",
    };
    (Cow::Borrowed(hints), style)
}
