use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};
use liftoff_core::config::KeymapConfig;
use tracing::warn;

use crate::input::Action;

/// Parsed key binding (key code + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn simple(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }
}

/// Navigation keys that stay available whatever the config binds
const FALLBACKS: [(KeyCode, Action); 7] = [
    (KeyCode::Down, Action::ScrollDown),
    (KeyCode::Up, Action::ScrollUp),
    (KeyCode::PageDown, Action::PageDown),
    (KeyCode::PageUp, Action::PageUp),
    (KeyCode::Home, Action::JumpToTop),
    (KeyCode::End, Action::JumpToBottom),
    (KeyCode::Esc, Action::Quit),
];

/// Runtime keymap for key-to-action lookup
pub struct Keymap {
    bindings: HashMap<KeyBinding, Action>,
    /// Action bound to the "gg" sequence, if any
    pending_g_action: Option<Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeymapConfig::default())
    }
}

impl Keymap {
    /// Create a keymap from configuration. The first action claiming a key keeps it.
    pub fn from_config(config: &KeymapConfig) -> Self {
        let configured = [
            (&config.quit, Action::Quit),
            (&config.scroll_down, Action::ScrollDown),
            (&config.scroll_up, Action::ScrollUp),
            (&config.page_down, Action::PageDown),
            (&config.page_up, Action::PageUp),
            (&config.jump_to_top, Action::JumpToTop),
            (&config.jump_to_bottom, Action::JumpToBottom),
            (&config.next_section, Action::NextSection),
            (&config.prev_section, Action::PrevSection),
            (&config.toggle_debug, Action::ToggleDebug),
        ];

        let mut keymap = Self {
            bindings: HashMap::new(),
            pending_g_action: None,
        };
        for (notation, action) in configured {
            keymap.bind(notation, action);
        }

        keymap
            .bindings
            .insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        for (code, action) in FALLBACKS {
            keymap
                .bindings
                .entry(KeyBinding::simple(code))
                .or_insert(action);
        }
        keymap
    }

    fn bind(&mut self, notation: &str, action: Action) {
        if notation == "gg" {
            self.pending_g_action.get_or_insert(action);
            return;
        }
        let Some(binding) = parse_key_binding(notation) else {
            warn!(key = notation, ?action, "Invalid key binding, ignoring");
            return;
        };
        match self.bindings.get(&binding) {
            Some(existing) => warn!(
                key = notation,
                ?existing,
                ?action,
                "Key conflict, keeping the earlier binding"
            ),
            None => {
                self.bindings.insert(binding, action);
            }
        }
    }

    pub fn get(&self, binding: &KeyBinding) -> Option<&Action> {
        self.bindings.get(binding)
    }

    /// Action for a completed "gg"
    pub fn get_pending_g_action(&self) -> Option<&Action> {
        self.pending_g_action.as_ref()
    }

    /// Whether a bare 'g' starts a two-key sequence
    pub fn is_g_prefix(&self, binding: &KeyBinding) -> bool {
        self.pending_g_action.is_some() && *binding == KeyBinding::simple(KeyCode::Char('g'))
    }
}

/// Parse vim-style key notation: "j", "G" (Shift+g), "<C-f>", "<S-Tab>", "<Space>", "<PageDown>"
pub fn parse_key_binding(notation: &str) -> Option<KeyBinding> {
    let notation = notation.trim();

    if let Some(inner) = notation
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .filter(|inner| !inner.is_empty())
    {
        return match inner.split_once('-') {
            Some(("C", key)) => parse_key_name(key).map(KeyBinding::ctrl),
            Some(("S", key)) => parse_key_name(key).map(KeyBinding::shift),
            _ => parse_key_name(inner).map(KeyBinding::simple),
        };
    }

    match single_char(notation)? {
        c if c.is_ascii_uppercase() => Some(KeyBinding::shift(KeyCode::Char(c))),
        c => Some(KeyBinding::simple(KeyCode::Char(c))),
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Key name without modifiers, as written inside `<...>`
fn parse_key_name(name: &str) -> Option<KeyCode> {
    let code = match name.to_ascii_lowercase().as_str() {
        "cr" | "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "space" | "spc" => KeyCode::Char(' '),
        "bs" | "backspace" => KeyCode::Backspace,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdn" => KeyCode::PageDown,
        _ => KeyCode::Char(single_char(name)?),
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_keys() {
        assert_eq!(
            parse_key_binding("j"),
            Some(KeyBinding::simple(KeyCode::Char('j')))
        );
        assert_eq!(
            parse_key_binding("G"),
            Some(KeyBinding::shift(KeyCode::Char('G')))
        );
        assert_eq!(parse_key_binding("jj"), None);
        assert_eq!(parse_key_binding(""), None);
    }

    #[test]
    fn test_parse_special_keys() {
        assert_eq!(
            parse_key_binding("<C-f>"),
            Some(KeyBinding::ctrl(KeyCode::Char('f')))
        );
        assert_eq!(
            parse_key_binding("<PageDown>"),
            Some(KeyBinding::simple(KeyCode::PageDown))
        );
        assert_eq!(
            parse_key_binding("<S-Tab>"),
            Some(KeyBinding::shift(KeyCode::Tab))
        );
        assert_eq!(parse_key_binding("<Nope>"), None);
    }

    #[test]
    fn test_keymap_from_config() {
        let keymap = Keymap::from_config(&KeymapConfig::default());
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Char('q'))),
            Some(&Action::Quit)
        );
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Char('n'))),
            Some(&Action::NextSection)
        );
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Char('d'))),
            Some(&Action::ToggleDebug)
        );
        assert_eq!(keymap.get_pending_g_action(), Some(&Action::JumpToTop));
    }

    #[test]
    fn test_conflicting_binding_keeps_first() {
        let config = KeymapConfig {
            scroll_up: "j".to_string(),
            ..Default::default()
        };
        let keymap = Keymap::from_config(&config);
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Char('j'))),
            Some(&Action::ScrollDown)
        );
        // Arrow fallback still scrolls up
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Up)),
            Some(&Action::ScrollUp)
        );
    }
}
