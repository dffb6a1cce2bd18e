//! Render functions for the TUI.
//!
//! Lists are always drawn; the detail overlay and the help overlay are
//! layered on top when active.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Layout},
    widgets::Paragraph,
    Frame,
};

use super::{carousel, detail, help, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // EDGE-001: Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        // Nothing on screen is clickable
        app.layout.rows.clear();
        app.layout.overlay_area = None;
        app.layout.backdrop_area = None;
        return;
    }

    let [main, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    carousel::render(f, app, main);
    detail::render(f, app, main);
    status::render(f, app, status_area);

    if app.show_help {
        help::render(f, app);
    }
}
