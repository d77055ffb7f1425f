//! Application state types and entry glue.
//!
//! Defines the enums and structs that model the TUI state, the modal form
//! drafts, and the theme configuration, and re-exports the event loop as
//! `run`.

pub mod keymap;
pub mod update;

use ratatui::style::Color;
use std::time::Instant;

use crate::api::{Address, Company, NewUser, User, UserId};
use crate::store::UserStore;

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
}

/// Entries of the navigation sidebar. Only the dashboard view is wired up;
/// the other entries mirror the page shell this tool replaces.
pub const SIDEBAR_ITEMS: [&str; 3] = ["Dashboard", "Analytics", "Settings"];

/// Fields of the add/edit form, in tab order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Email,
    Street,
    City,
    Company,
}

impl DraftField {
    pub fn next(self) -> Self {
        match self {
            DraftField::Name => DraftField::Email,
            DraftField::Email => DraftField::Street,
            DraftField::Street => DraftField::City,
            DraftField::City => DraftField::Company,
            DraftField::Company => DraftField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            DraftField::Name => DraftField::Company,
            DraftField::Email => DraftField::Name,
            DraftField::Street => DraftField::Email,
            DraftField::City => DraftField::Street,
            DraftField::Company => DraftField::City,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DraftField::Name => "Name",
            DraftField::Email => "Email",
            DraftField::Street => "Street",
            DraftField::City => "City",
            DraftField::Company => "Company",
        }
    }
}

/// Editable form state behind the add and edit modals.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub street: String,
    pub city: String,
    pub company: String,
}

impl UserDraft {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            street: user.address.street.clone(),
            city: user.address.city.clone(),
            company: user.company.name.clone(),
        }
    }

    pub fn to_candidate(&self) -> NewUser {
        NewUser {
            name: self.name.clone(),
            email: self.email.clone(),
            address: Address {
                street: self.street.clone(),
                city: self.city.clone(),
            },
            company: Company {
                name: self.company.clone(),
            },
        }
    }

    pub fn to_user(&self, id: UserId) -> User {
        User {
            id,
            name: self.name.clone(),
            email: self.email.clone(),
            address: Address {
                street: self.street.clone(),
                city: self.city.clone(),
            },
            company: Company {
                name: self.company.clone(),
            },
        }
    }

    pub fn field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Name => &mut self.name,
            DraftField::Email => &mut self.email,
            DraftField::Street => &mut self.street,
            DraftField::City => &mut self.city,
            DraftField::Company => &mut self.company,
        }
    }

    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::Name => &self.name,
            DraftField::Email => &self.email,
            DraftField::Street => &self.street,
            DraftField::City => &self.city,
            DraftField::Company => &self.company,
        }
    }

    /// Form-level validation only: the store never inspects these fields.
    pub fn is_submittable(&self) -> bool {
        !self.name.trim().is_empty() && looks_like_email(&self.email)
    }
}

/// Basic email shape: something@something, no spaces. Matches what an
/// `<input type="email">` control would accept, nothing stricter.
pub fn looks_like_email(s: &str) -> bool {
    if s.contains(char::is_whitespace) {
        return false;
    }
    match s.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    }
}

/// Modal dialog states.
#[derive(Clone, Debug)]
pub enum ModalState {
    AddUser {
        draft: UserDraft,
        field: DraftField,
    },
    EditUser {
        id: UserId,
        draft: UserDraft,
        field: DraftField,
    },
    DeleteConfirm {
        id: UserId,
        name: String,
        selected: usize,
    },
    Info {
        message: String,
    },
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub error_fg: Color,
}

impl Theme {
    /// Dark default theme.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            error_fg: Color::Red,
        }
    }

    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),
            title: Color::Rgb(0xcb, 0xa6, 0xf7),
            border: Color::Rgb(0x58, 0x5b, 0x70),
            header_bg: Color::Rgb(0x31, 0x32, 0x44),
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf),
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a),
            error_fg: Color::Rgb(0xf3, 0x8b, 0xa8),
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys
    /// fall back to `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            if let Some(color) = Self::parse_color(val) {
                match key {
                    "text" => theme.text = color,
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight_fg" => theme.highlight_fg = color,
                    "highlight_bg" => theme.highlight_bg = color,
                    "error_fg" => theme.error_fg = color,
                    _ => {}
                }
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or the special name
    /// "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Some(Color::Rgb(r, g, b));
            }
        }
        None
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# userdash theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                other => format!("{:?}", other),
            }
        }

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };

        kv("text", self.text);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);
        kv("error_fg", self.error_fg);

        std::fs::write(path, buf)
    }

    /// Ensure a config file exists; if missing, write one with the default
    /// theme and return it. If present, load from it; on parse errors,
    /// return `mocha`.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        let _ = t.write_file(path);
        t
    }
}

pub struct AppState {
    pub started_at: Instant,
    pub store: UserStore,
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub theme: Theme,
    pub keymap: keymap::Keymap,
    pub modal: Option<ModalState>,
}

impl AppState {
    /// Fresh state with an empty, idle store. The initial fetch is
    /// dispatched by the event loop once the terminal is up.
    pub fn new(theme: Theme, keymap: keymap::Keymap) -> Self {
        Self {
            started_at: Instant::now(),
            store: UserStore::new(),
            selected_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            theme,
            keymap,
            modal: None,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Theme::dark(), keymap::Keymap::default())
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_accepts_plain_addresses() {
        assert!(looks_like_email("ana@x.com"));
        assert!(looks_like_email("a@b"));
    }

    #[test]
    fn email_shape_rejects_degenerate_input() {
        assert!(!looks_like_email(""));
        assert!(!looks_like_email("nodomain@"));
        assert!(!looks_like_email("@nolocal"));
        assert!(!looks_like_email("spaces in@x.com"));
        assert!(!looks_like_email("plain"));
    }

    #[test]
    fn draft_round_trips_through_user() {
        let draft = UserDraft {
            name: "Ana".into(),
            email: "ana@x.com".into(),
            street: "Main St".into(),
            city: "Springfield".into(),
            company: "Acme".into(),
        };
        let user = draft.to_user(42);
        assert_eq!(user.id, 42);
        assert_eq!(UserDraft::from_user(&user), draft);
    }

    #[test]
    fn draft_requires_name_and_email_shape() {
        let mut draft = UserDraft {
            name: "Cy".into(),
            email: "cy@z.com".into(),
            ..UserDraft::default()
        };
        assert!(draft.is_submittable());
        draft.name = "   ".into();
        assert!(!draft.is_submittable());
        draft.name = "Cy".into();
        draft.email = "not-an-email".into();
        assert!(!draft.is_submittable());
    }

    #[test]
    fn field_cycle_visits_every_field_and_wraps() {
        let mut field = DraftField::Name;
        for _ in 0..5 {
            field = field.next();
        }
        assert_eq!(field, DraftField::Name);
        assert_eq!(DraftField::Name.prev(), DraftField::Company);
    }
}
