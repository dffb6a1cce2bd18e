//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes,
//! and `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette: semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Article lists --
    pub section_title: Style,
    pub section_title_focused: Style,
    pub card_title: Style,
    pub card_selected: Style,
    pub card_pending: Style,
    pub card_topic: Style,
    pub card_meta: Style,

    // -- Detail overlay --
    pub overlay_border: Style,
    pub overlay_header: Style,
    pub overlay_title: Style,
    pub overlay_body: Style,
    pub overlay_meta: Style,
    pub author_name: Style,
    pub author_premium: Style,
    pub author_anonymous: Style,
    pub media_link: Style,
    pub source_link: Style,
    pub source_selected: Style,

    // -- Action bar --
    pub action_idle: Style,
    pub action_liked: Style,
    pub action_favorited: Style,
    pub comment_input: Style,
    pub comment_input_focused: Style,
    pub comment_placeholder: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub status_error: Style,
    pub backdrop: Style,
    pub help_heading: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            section_title: Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
            section_title_focused: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            card_title: Style::default().add_modifier(Modifier::BOLD),
            card_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            card_pending: Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
            card_topic: Style::default().fg(Color::Cyan),
            card_meta: Style::default().fg(Color::DarkGray),

            overlay_border: Style::default().fg(Color::Cyan),
            overlay_header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            overlay_title: Style::default().add_modifier(Modifier::BOLD),
            overlay_body: Style::default(),
            overlay_meta: Style::default().fg(Color::DarkGray),
            author_name: Style::default().add_modifier(Modifier::BOLD),
            author_premium: Style::default().fg(Color::Yellow),
            author_anonymous: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            media_link: Style::default().fg(Color::Blue),
            source_link: Style::default().fg(Color::Blue),
            source_selected: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::REVERSED),

            action_idle: Style::default().fg(Color::Gray),
            action_liked: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            action_favorited: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            comment_input: Style::default().fg(Color::Gray),
            comment_input_focused: Style::default().fg(Color::White).bg(Color::Black),
            comment_placeholder: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            status_error: Style::default().bg(Color::Red).fg(Color::White),
            backdrop: Style::default().bg(Color::Black),
            help_heading: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        }
    }

    /// Light palette for light terminal backgrounds.
    fn light() -> Self {
        Self {
            section_title: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
            section_title_focused: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            card_title: Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
            card_selected: Style::default().bg(Color::Blue).fg(Color::White),
            card_pending: Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
            card_topic: Style::default().fg(Color::Blue),
            card_meta: Style::default().fg(Color::DarkGray),

            overlay_border: Style::default().fg(Color::Blue),
            overlay_header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            overlay_title: Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
            overlay_body: Style::default().fg(Color::Black),
            overlay_meta: Style::default().fg(Color::DarkGray),
            author_name: Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
            author_premium: Style::default().fg(Color::Magenta),
            author_anonymous: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            media_link: Style::default().fg(Color::Blue),
            source_link: Style::default().fg(Color::Blue),
            source_selected: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::REVERSED),

            action_idle: Style::default().fg(Color::DarkGray),
            action_liked: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            action_favorited: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            comment_input: Style::default().fg(Color::DarkGray),
            comment_input_focused: Style::default().fg(Color::Black).bg(Color::White),
            comment_placeholder: Style::default().fg(Color::Gray),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            status_error: Style::default().bg(Color::Red).fg(Color::White),
            backdrop: Style::default().bg(Color::Gray),
            help_heading: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        }
    }
}

// ============================================================================
// Style Map: string-keyed lookup
// ============================================================================

/// String-keyed style lookup.
///
/// Built from a `ColorPalette`, this allows resolving role names (e.g.
/// `"overlay_header"`) to their concrete `Style` at render time.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

const ROLE_COUNT: usize = 28;

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; ROLE_COUNT] = [
    "section_title",
    "section_title_focused",
    "card_title",
    "card_selected",
    "card_pending",
    "card_topic",
    "card_meta",
    "overlay_border",
    "overlay_header",
    "overlay_title",
    "overlay_body",
    "overlay_meta",
    "author_name",
    "author_premium",
    "author_anonymous",
    "media_link",
    "source_link",
    "source_selected",
    "action_idle",
    "action_liked",
    "action_favorited",
    "comment_input",
    "comment_input_focused",
    "comment_placeholder",
    "status_bar",
    "status_error",
    "backdrop",
    "help_heading",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; ROLE_COUNT] = [
            p.section_title,
            p.section_title_focused,
            p.card_title,
            p.card_selected,
            p.card_pending,
            p.card_topic,
            p.card_meta,
            p.overlay_border,
            p.overlay_header,
            p.overlay_title,
            p.overlay_body,
            p.overlay_meta,
            p.author_name,
            p.author_premium,
            p.author_anonymous,
            p.media_link,
            p.source_link,
            p.source_selected,
            p.action_idle,
            p.action_liked,
            p.action_favorited,
            p.comment_input,
            p.comment_input_focused,
            p.comment_placeholder,
            p.status_bar,
            p.status_error,
            p.backdrop,
            p.help_heading,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

impl Default for StyleMap {
    fn default() -> Self {
        Self::from_palette(&ThemeVariant::default().palette())
    }
}

// ============================================================================
// Tests
// ============================================================================
