//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and
//! map keys to actions.
//!
//! Supports loading custom bindings from a config file, falling back to
//! sensible defaults, resolving key presses (with modifiers) to semantic
//! actions, and exporting the current keymap back to a file for
//! customization.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Semantic keyboard actions that can be bound to key combinations.
///
/// Multiple key combinations can map to the same action (e.g. both 'j' and
/// Down move down).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Start/enter search mode.
    StartSearch,
    /// Open the "add user" form.
    NewUser,
    /// Open the edit form for the selected user.
    EditSelection,
    /// Ask to delete the selected user.
    DeleteSelection,
    /// Re-fetch the collection from the remote directory.
    Refresh,
    /// Open the edit form for the selected user (Enter).
    EnterAction,
    /// Move up in the table.
    MoveUp,
    /// Move down in the table.
    MoveDown,
    /// Jump one page back.
    PageBack,
    /// Jump one page forward.
    PageForward,
    /// Ignore this key.
    Ignore,
}

/// Maps `(modifiers, code)` pairs to [`KeyAction`]s, with file
/// load/override/save support.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: std::collections::HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Create a keymap with default keybindings: arrows plus vim keys for
    /// navigation, q/quit, /-search, n-new, e-edit, r-refresh, Delete.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = std::collections::HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Char('n')), KeyAction::NewUser);
        bindings.insert((M::NONE, Char('e')), KeyAction::EditSelection);
        bindings.insert((M::NONE, Char('r')), KeyAction::Refresh);
        bindings.insert((M::NONE, KeyCode::Delete), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Char('d')), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Enter), KeyAction::EnterAction);
        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, Left), KeyAction::PageBack);
        bindings.insert((M::NONE, Right), KeyAction::PageForward);
        bindings.insert((M::NONE, Char('h')), KeyAction::PageBack);
        bindings.insert((M::NONE, Char('l')), KeyAction::PageForward);
        bindings.insert((M::NONE, PageUp), KeyAction::PageBack);
        bindings.insert((M::NONE, PageDown), KeyAction::PageForward);
        Self { bindings }
    }

    /// Load a keymap from a file, or create defaults if the file doesn't
    /// exist (writing them out for future customization).
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        let _ = km.write_file(path);
        km
    }

    /// Load a keymap from `<Action> = <KeySpec>` lines, starting from
    /// defaults and overriding with user-specified bindings.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let lhs = parts.next().map(|s| s.trim()).unwrap_or("");
            let rhs = parts.next().map(|s| s.trim()).unwrap_or("");
            if lhs.is_empty() || rhs.is_empty() {
                continue;
            }
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        Some(map)
    }

    /// Write the current keymap to a configuration file.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# userdash keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+q, Enter, Esc, Up, Down, Left, Right, PageUp, PageDown, Delete, /, n\n");
        buf.push_str("# Actions: Quit, StartSearch, NewUser, EditSelection, DeleteSelection, Refresh, EnterAction, MoveUp, MoveDown, PageBack, PageForward, Ignore\n\n");

        // Emit a stable, readable subset of current bindings
        let dump = [
            ("q", KeyAction::Quit),
            ("Esc", KeyAction::Ignore),
            ("/", KeyAction::StartSearch),
            ("n", KeyAction::NewUser),
            ("e", KeyAction::EditSelection),
            ("r", KeyAction::Refresh),
            ("Delete", KeyAction::DeleteSelection),
            ("d", KeyAction::DeleteSelection),
            ("Enter", KeyAction::EnterAction),
            ("Up", KeyAction::MoveUp),
            ("Down", KeyAction::MoveDown),
            ("k", KeyAction::MoveUp),
            ("j", KeyAction::MoveDown),
            ("Left", KeyAction::PageBack),
            ("Right", KeyAction::PageForward),
            ("h", KeyAction::PageBack),
            ("l", KeyAction::PageForward),
            ("PageUp", KeyAction::PageBack),
            ("PageDown", KeyAction::PageForward),
        ];
        for (k, a) in dump {
            let _ = writeln!(&mut buf, "{} = {}", format_action(a), k);
        }

        std::fs::write(path, buf)
    }

    /// Resolve a key event (modifiers + code) to its bound action.
    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let mut rest = s;
    let mut mods = KeyModifiers::NONE;
    if let Some(after) = s.strip_prefix("Ctrl+") {
        mods |= KeyModifiers::CONTROL;
        rest = after;
    }
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "/" => Char('/'),
        "Esc" | "Escape" => Esc,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let chars: Vec<char> = rest.chars().collect();
            if chars.len() == 1 {
                KeyCode::Char(chars[0])
            } else {
                return None;
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    match s.trim() {
        "Quit" => Some(KeyAction::Quit),
        "StartSearch" => Some(KeyAction::StartSearch),
        "NewUser" => Some(KeyAction::NewUser),
        "EditSelection" => Some(KeyAction::EditSelection),
        "DeleteSelection" => Some(KeyAction::DeleteSelection),
        "Refresh" => Some(KeyAction::Refresh),
        "EnterAction" => Some(KeyAction::EnterAction),
        "MoveUp" => Some(KeyAction::MoveUp),
        "MoveDown" => Some(KeyAction::MoveDown),
        "PageBack" => Some(KeyAction::PageBack),
        "PageForward" => Some(KeyAction::PageForward),
        "Ignore" => Some(KeyAction::Ignore),
        _ => None,
    }
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::StartSearch => "StartSearch",
        KeyAction::NewUser => "NewUser",
        KeyAction::EditSelection => "EditSelection",
        KeyAction::DeleteSelection => "DeleteSelection",
        KeyAction::Refresh => "Refresh",
        KeyAction::EnterAction => "EnterAction",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::PageBack => "PageBack",
        KeyAction::PageForward => "PageForward",
        KeyAction::Ignore => "Ignore",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    #[test]
    fn defaults_resolve_core_actions() {
        let km = Keymap::new_defaults();
        assert_eq!(km.resolve(&press(KeyCode::Char('q'))), Some(KeyAction::Quit));
        assert_eq!(km.resolve(&press(KeyCode::Char('/'))), Some(KeyAction::StartSearch));
        assert_eq!(km.resolve(&press(KeyCode::Char('n'))), Some(KeyAction::NewUser));
        assert_eq!(km.resolve(&press(KeyCode::Delete)), Some(KeyAction::DeleteSelection));
        assert_eq!(km.resolve(&press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn parse_key_handles_ctrl_prefix_and_named_keys() {
        assert_eq!(
            parse_key("Ctrl+q"),
            Some((KeyModifiers::CONTROL, KeyCode::Char('q')))
        );
        assert_eq!(parse_key("Enter"), Some((KeyModifiers::NONE, KeyCode::Enter)));
        assert_eq!(parse_key("not a key"), None);
    }

    #[test]
    fn action_names_round_trip() {
        for action in [
            KeyAction::Quit,
            KeyAction::StartSearch,
            KeyAction::NewUser,
            KeyAction::EditSelection,
            KeyAction::DeleteSelection,
            KeyAction::Refresh,
            KeyAction::EnterAction,
            KeyAction::MoveUp,
            KeyAction::MoveDown,
            KeyAction::PageBack,
            KeyAction::PageForward,
            KeyAction::Ignore,
        ] {
            assert_eq!(parse_action(format_action(action)), Some(action));
        }
    }
}
