//! lenta: a terminal article browser.
//!
//! Articles are shown as stacked lists ([`carousel`]) and open into a
//! full-screen detail overlay ([`overlay`]) where they can be liked,
//! favorited and commented on. Those actions are delivered to the embedder
//! through [`callbacks::ArticleCallbacks`]; [`remote::HttpCallbacks`] is the
//! bundled adapter for an HTTP engagement API.

pub mod app;
pub mod article;
pub mod callbacks;
pub mod carousel;
pub mod config;
pub mod keybindings;
pub mod overlay;
pub mod remote;
pub mod theme;
pub mod ui;
pub mod util;
