//! Helper functions for UI operations.
//!
//! Small pieces shared across the UI layer: opening links in the system
//! browser and the spinner glyphs.

use crate::app::App;
use crate::util::validate_url_for_open;

/// Spinner glyphs, one per frame of `loop_runner::SPINNER_FRAMES`.
const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub(super) fn spinner_char(frame: usize) -> char {
    SPINNER[frame % SPINNER.len()]
}

/// Open `url` in the system browser.
///
/// SEC: the URL is validated (http/https only) before it reaches `open::that`,
/// so a crafted source entry cannot launch an arbitrary handler. Failures are
/// reported in the status bar.
pub(super) fn open_external(app: &mut App, url: &str) {
    match validate_url_for_open(url) {
        Ok(valid) => {
            tracing::info!(url = %valid, "Opening in browser");
            if let Err(e) = open::that(valid.as_str()) {
                tracing::warn!(error = %e, url = %valid, "Failed to open browser");
                app.set_error(format!("Failed to open browser: {}", e));
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, url, "Refusing to open URL");
            app.set_error(e.to_string());
        }
    }
}
