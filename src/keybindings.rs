//! Keybinding registry: maps actions to key events with config overrides.
//!
//! Bindings are data, not match arms: the input layer resolves a key to an
//! [`Action`] for the current [`Context`], and the help overlay lists the
//! same table, so user overrides from config.toml show up in both places.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    NextSection,
    PrevSection,
    Activate,
    CloseDetail,
    ToggleLike,
    ToggleFavorite,
    FocusComment,
    SubmitComment,
    LeaveInput,
    NextSource,
    PrevSource,
    OpenSource,
    OpenMedia,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    CycleTheme,
    ShowHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Next article",
            Self::NavUp => "Previous article",
            Self::NextSection => "Next section",
            Self::PrevSection => "Previous section",
            Self::Activate => "Open article",
            Self::CloseDetail => "Close article",
            Self::ToggleLike => "Like / unlike",
            Self::ToggleFavorite => "Favorite / unfavorite",
            Self::FocusComment => "Write a comment",
            Self::SubmitComment => "Send comment",
            Self::LeaveInput => "Leave comment input",
            Self::NextSource => "Next source link",
            Self::PrevSource => "Previous source link",
            Self::OpenSource => "Open source in browser",
            Self::OpenMedia => "Open media in browser",
            Self::ScrollDown => "Scroll down one line",
            Self::ScrollUp => "Scroll up one line",
            Self::PageDown => "Page down",
            Self::PageUp => "Page up",
            Self::CycleTheme => "Cycle theme",
            Self::ShowHelp => "Show help",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context. Determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    /// Article lists, no overlay open.
    List,
    /// Detail overlay open, comment input not focused.
    Detail,
    /// Comment input focused: printable keys are text, not commands.
    CommentInput,
}

impl Context {
    /// Whether unbound keys in this context fall through to `Global`.
    fn inherits_global(self) -> bool {
        !matches!(self, Self::Global | Self::CommentInput)
    }
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ch(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "]"
/// - Named keys: "Enter", "Esc", "Tab", "BackTab", "Up", "Down", "Backspace"
/// - Modifier combos: "Ctrl+d", "Ctrl+u"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        return Some(KeySpec::ctrl(c));
    }

    // Named keys (case-insensitive)
    match s.to_lowercase().as_str() {
        "enter" | "return" => return Some(KeySpec::plain(KeyCode::Enter)),
        "esc" | "escape" => return Some(KeySpec::plain(KeyCode::Esc)),
        "tab" => return Some(KeySpec::plain(KeyCode::Tab)),
        "backtab" | "shift+tab" => return Some(KeySpec::new(KeyCode::BackTab, KeyModifiers::SHIFT)),
        "up" => return Some(KeySpec::plain(KeyCode::Up)),
        "down" => return Some(KeySpec::plain(KeyCode::Down)),
        "left" => return Some(KeySpec::plain(KeyCode::Left)),
        "right" => return Some(KeySpec::plain(KeyCode::Right)),
        "backspace" => return Some(KeySpec::plain(KeyCode::Backspace)),
        "space" => return Some(KeySpec::ch(' ')),
        _ => {}
    }

    if let Some(n) = s.strip_prefix(['F', 'f']) {
        if let Ok(n) = n.parse::<u8>() {
            if (1..=12).contains(&n) {
                return Some(KeySpec::plain(KeyCode::F(n)));
            }
        }
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::ch(c)),
        _ => None,
    }
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts: `j` moves
/// the list selection in [`Context::List`] and scrolls in [`Context::Detail`].
pub struct KeybindingRegistry {
    /// Primary lookup: (Context, KeySpec) -> Action
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use Action::*;
        use Context::*;

        // === Global ===
        self.bind(Global, KeySpec::ch('q'), Quit);
        self.bind(Global, KeySpec::ch('T'), CycleTheme);
        self.bind(Global, KeySpec::ch('?'), ShowHelp);

        // === Article lists ===
        self.bind(List, KeySpec::ch('j'), NavDown);
        self.bind(List, KeySpec::plain(KeyCode::Down), NavDown);
        self.bind(List, KeySpec::ch('k'), NavUp);
        self.bind(List, KeySpec::plain(KeyCode::Up), NavUp);
        self.bind(List, KeySpec::plain(KeyCode::Tab), NextSection);
        self.bind(
            List,
            KeySpec::new(KeyCode::BackTab, KeyModifiers::SHIFT),
            PrevSection,
        );
        self.bind(List, KeySpec::plain(KeyCode::Enter), Activate);

        // === Detail overlay ===
        self.bind(Detail, KeySpec::plain(KeyCode::Esc), CloseDetail);
        self.bind(Detail, KeySpec::ch('b'), CloseDetail);
        self.bind(Detail, KeySpec::ch('l'), ToggleLike);
        self.bind(Detail, KeySpec::ch('f'), ToggleFavorite);
        self.bind(Detail, KeySpec::ch('c'), FocusComment);
        self.bind(Detail, KeySpec::ch(']'), NextSource);
        self.bind(Detail, KeySpec::ch('['), PrevSource);
        self.bind(Detail, KeySpec::ch('o'), OpenSource);
        self.bind(Detail, KeySpec::ch('m'), OpenMedia);
        self.bind(Detail, KeySpec::ch('j'), ScrollDown);
        self.bind(Detail, KeySpec::plain(KeyCode::Down), ScrollDown);
        self.bind(Detail, KeySpec::ch('k'), ScrollUp);
        self.bind(Detail, KeySpec::plain(KeyCode::Up), ScrollUp);
        self.bind(Detail, KeySpec::ctrl('d'), PageDown);
        self.bind(Detail, KeySpec::ctrl('u'), PageUp);

        // === Comment input ===
        self.bind(CommentInput, KeySpec::plain(KeyCode::Enter), SubmitComment);
        self.bind(CommentInput, KeySpec::plain(KeyCode::Esc), LeaveInput);
    }

    /// Apply user overrides from config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "toggle_like").
    /// Values are key strings (e.g., "q", "Ctrl+d", "F5").
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            // Rebind in every context the action was bound in
            let mut contexts: Vec<Context> = Vec::new();
            for (ctx, _, a) in &self.bindings {
                if *a == action && !contexts.contains(ctx) {
                    contexts.push(*ctx);
                }
            }

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a given key in a given context.
    ///
    /// Tries the specific context first, then falls back to Global, except
    /// in comment input where unbound keys are text.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        // Shift is already part of a typed character ('T', '?')
        let mut modifiers = modifiers;
        if matches!(code, KeyCode::Char(_)) {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        if context.inherits_global() {
            return self.lookup.get(&(Context::Global, key)).copied();
        }

        None
    }

    /// All bindings for the help screen.
    ///
    /// Returns (context, key_display_string, action, description) tuples.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name string (from config) into an Action enum.
fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().as_str() {
        "quit" => Some(Action::Quit),
        "nav_down" | "down" => Some(Action::NavDown),
        "nav_up" | "up" => Some(Action::NavUp),
        "next_section" => Some(Action::NextSection),
        "prev_section" => Some(Action::PrevSection),
        "activate" | "open_article" | "select" => Some(Action::Activate),
        "close_detail" | "close" | "back" => Some(Action::CloseDetail),
        "toggle_like" | "like" => Some(Action::ToggleLike),
        "toggle_favorite" | "favorite" => Some(Action::ToggleFavorite),
        "focus_comment" | "comment" => Some(Action::FocusComment),
        "submit_comment" | "submit" => Some(Action::SubmitComment),
        "leave_input" => Some(Action::LeaveInput),
        "next_source" => Some(Action::NextSource),
        "prev_source" => Some(Action::PrevSource),
        "open_source" | "open" => Some(Action::OpenSource),
        "open_media" | "media" => Some(Action::OpenMedia),
        "scroll_down" => Some(Action::ScrollDown),
        "scroll_up" => Some(Action::ScrollUp),
        "page_down" => Some(Action::PageDown),
        "page_up" => Some(Action::PageUp),
        "cycle_theme" | "theme" => Some(Action::CycleTheme),
        "show_help" | "help" => Some(Action::ShowHelp),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(reg: &KeybindingRegistry, key: KeySpec, ctx: Context) -> Option<Action> {
        reg.action_for_key(key.code, key.modifiers, ctx)
    }

    #[test]
    fn test_list_context() {
        let reg = KeybindingRegistry::new();
        assert_eq!(lookup(&reg, KeySpec::ch('j'), Context::List), Some(Action::NavDown));
        assert_eq!(
            lookup(&reg, KeySpec::plain(KeyCode::Enter), Context::List),
            Some(Action::Activate)
        );
        assert_eq!(
            lookup(&reg, KeySpec::plain(KeyCode::Tab), Context::List),
            Some(Action::NextSection)
        );
    }

    #[test]
    fn test_detail_context_overrides_list_keys() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            lookup(&reg, KeySpec::ch('j'), Context::Detail),
            Some(Action::ScrollDown)
        );
        assert_eq!(
            lookup(&reg, KeySpec::plain(KeyCode::Esc), Context::Detail),
            Some(Action::CloseDetail)
        );
        assert_eq!(lookup(&reg, KeySpec::ctrl('d'), Context::Detail), Some(Action::PageDown));
    }

    #[test]
    fn test_global_fallback() {
        let reg = KeybindingRegistry::new();
        assert_eq!(lookup(&reg, KeySpec::ch('q'), Context::List), Some(Action::Quit));
        assert_eq!(lookup(&reg, KeySpec::ch('?'), Context::Detail), Some(Action::ShowHelp));
    }

    #[test]
    fn test_comment_input_does_not_inherit_global() {
        let reg = KeybindingRegistry::new();
        // 'q' is text while typing a comment
        assert_eq!(lookup(&reg, KeySpec::ch('q'), Context::CommentInput), None);
        assert_eq!(lookup(&reg, KeySpec::ch('l'), Context::CommentInput), None);
        assert_eq!(
            lookup(&reg, KeySpec::plain(KeyCode::Enter), Context::CommentInput),
            Some(Action::SubmitComment)
        );
        assert_eq!(
            lookup(&reg, KeySpec::plain(KeyCode::Esc), Context::CommentInput),
            Some(Action::LeaveInput)
        );
    }

    #[test]
    fn test_detail_keys_not_active_in_list() {
        let reg = KeybindingRegistry::new();
        assert_eq!(lookup(&reg, KeySpec::ch('l'), Context::List), None);
        assert_eq!(lookup(&reg, KeySpec::ch('o'), Context::List), None);
    }

    #[test]
    fn test_shifted_characters_match_plain_binding() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('T'), KeyModifiers::SHIFT, Context::List),
            Some(Action::CycleTheme)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('?'), KeyModifiers::SHIFT, Context::Detail),
            Some(Action::ShowHelp)
        );
    }

    #[test]
    fn test_unknown_key_returns_none() {
        let reg = KeybindingRegistry::new();
        assert_eq!(lookup(&reg, KeySpec::plain(KeyCode::F(12)), Context::Global), None);
    }

    #[test]
    fn test_apply_overrides_valid() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("quit".to_string(), "Ctrl+q".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert!(warnings.is_empty());

        assert_eq!(lookup(&reg, KeySpec::ch('q'), Context::Global), None);
        assert_eq!(lookup(&reg, KeySpec::ctrl('q'), Context::Global), Some(Action::Quit));
    }

    #[test]
    fn test_override_preserves_contexts() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("like".to_string(), "space".to_string());

        assert!(reg.apply_overrides(&overrides).is_empty());
        assert_eq!(lookup(&reg, KeySpec::ch(' '), Context::Detail), Some(Action::ToggleLike));
        assert_eq!(lookup(&reg, KeySpec::ch('l'), Context::Detail), None);
        // Scroll bindings on j/k are untouched
        assert_eq!(lookup(&reg, KeySpec::ch('j'), Context::Detail), Some(Action::ScrollDown));
    }

    #[test]
    fn test_override_of_multi_key_action_binds_once_per_context() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("close".to_string(), "x".to_string());
        reg.apply_overrides(&overrides);

        let close_bindings = reg
            .all_bindings()
            .into_iter()
            .filter(|(_, _, a, _)| *a == Action::CloseDetail)
            .count();
        assert_eq!(close_bindings, 1);
    }

    #[test]
    fn test_apply_overrides_warnings() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("nonexistent_action".to_string(), "q".to_string());
        overrides.insert("quit".to_string(), "Ctrl+Alt+Shift+Q".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.contains("Unknown action")));
        assert!(warnings.iter().any(|w| w.contains("Cannot parse key")));
    }

    #[test]
    fn test_parse_key_string() {
        assert_eq!(parse_key_string("Enter"), Some(KeySpec::plain(KeyCode::Enter)));
        assert_eq!(parse_key_string("esc"), Some(KeySpec::plain(KeyCode::Esc)));
        assert_eq!(parse_key_string("space"), Some(KeySpec::ch(' ')));
        assert_eq!(parse_key_string("F5"), Some(KeySpec::plain(KeyCode::F(5))));
        assert_eq!(parse_key_string("F13"), None);
        assert_eq!(parse_key_string("Ctrl+d"), Some(KeySpec::ctrl('d')));
        assert_eq!(parse_key_string("]"), Some(KeySpec::ch(']')));
        assert_eq!(parse_key_string("ж"), Some(KeySpec::ch('ж')));
        assert_eq!(parse_key_string("jj"), None);
    }

    #[test]
    fn test_format_key_display() {
        assert_eq!(format_key(&KeySpec::ch('q')), "q");
        assert_eq!(format_key(&KeySpec::ctrl('d')), "Ctrl+d");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::Enter)), "Enter");
        assert_eq!(format_key(&KeySpec::ch(' ')), "Space");
    }

    #[test]
    fn test_every_action_has_a_default_binding() {
        let reg = KeybindingRegistry::new();
        let bound: Vec<Action> = reg.all_bindings().into_iter().map(|(_, _, a, _)| a).collect();
        for action in [
            Action::Quit,
            Action::Activate,
            Action::CloseDetail,
            Action::ToggleLike,
            Action::ToggleFavorite,
            Action::FocusComment,
            Action::SubmitComment,
            Action::OpenSource,
            Action::OpenMedia,
        ] {
            assert!(bound.contains(&action), "{:?} has no binding", action);
        }
    }
}
