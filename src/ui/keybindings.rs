//! Centralized keyboard shortcuts registry.
//!
//! Single source of truth for the dashboard keys. Consumed by `HelpDialog`
//! and by the footer hints on each dashboard.

use crossterm::event::KeyCode;

/// A keyboard shortcut definition
#[derive(Debug, Clone)]
pub struct Shortcut {
    /// Primary key for this shortcut
    pub key: KeyCode,
    /// Alternative key (e.g., vi-style variant, or the end of a digit range)
    pub alt_key: Option<KeyCode>,
    /// Human-readable description of what this shortcut does
    pub description: &'static str,
    /// Category for grouping in help
    pub category: ShortcutCategory,
    /// Context where this shortcut is active
    pub context: ShortcutContext,
}

/// Categories for organizing shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutCategory {
    General,
    Navigation,
    Actions,
}

/// Contexts where shortcuts are active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutContext {
    /// Active on every dashboard
    Global,
    SignIn,
    Donor,
    Ngo,
    Volunteer,
}

impl ShortcutCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            ShortcutCategory::General => "General",
            ShortcutCategory::Navigation => "Navigation",
            ShortcutCategory::Actions => "Actions",
        }
    }

    /// All categories in display order
    pub fn all() -> &'static [ShortcutCategory] {
        &[
            ShortcutCategory::General,
            ShortcutCategory::Navigation,
            ShortcutCategory::Actions,
        ]
    }
}

impl ShortcutContext {
    pub fn display_name(&self) -> &'static str {
        match self {
            ShortcutContext::Global => "Everywhere",
            ShortcutContext::SignIn => "Sign In",
            ShortcutContext::Donor => "Donor Dashboard",
            ShortcutContext::Ngo => "NGO Dashboard",
            ShortcutContext::Volunteer => "Volunteer Dashboard",
        }
    }
}

impl Shortcut {
    /// Format key for display (e.g., "q", "k/↑", "1-4")
    pub fn key_display(&self) -> String {
        let primary = format_keycode(&self.key);
        match (&self.key, &self.alt_key) {
            (KeyCode::Char(a), Some(KeyCode::Char(b))) if a.is_ascii_digit() && b.is_ascii_digit() => {
                format!("{a}-{b}")
            }
            (_, Some(alt)) => format!("{}/{}", primary, format_keycode(alt)),
            (_, None) => primary,
        }
    }

    /// Format key for help dialog (left-padded to 8 chars)
    pub fn key_display_padded(&self) -> String {
        format!("{:<8}", self.key_display())
    }

    pub fn matches(&self, code: KeyCode) -> bool {
        self.key == code || self.alt_key == Some(code)
    }
}

/// Format a `KeyCode` for display
fn format_keycode(key: &KeyCode) -> String {
    match key {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        _ => format!("{key:?}"),
    }
}

/// Static registry of all keyboard shortcuts
pub static SHORTCUTS: &[Shortcut] = &[
    // === Global ===
    Shortcut {
        key: KeyCode::Char('q'),
        alt_key: None,
        description: "Quit",
        category: ShortcutCategory::General,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Char('?'),
        alt_key: None,
        description: "Toggle help",
        category: ShortcutCategory::General,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Esc,
        alt_key: None,
        description: "Sign out (back to sign in)",
        category: ShortcutCategory::General,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Char('1'),
        alt_key: Some(KeyCode::Char('4')),
        description: "Jump to step",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Left,
        alt_key: Some(KeyCode::Char('h')),
        description: "Previous step",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Right,
        alt_key: Some(KeyCode::Char('l')),
        description: "Next step (no checks)",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Up,
        alt_key: Some(KeyCode::Char('k')),
        description: "Move selection up",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Down,
        alt_key: Some(KeyCode::Char('j')),
        description: "Move selection down",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Enter,
        alt_key: None,
        description: "Primary action (continue when ready)",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Char(' '),
        alt_key: None,
        description: "Select / toggle item",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Global,
    },
    // === Sign In ===
    Shortcut {
        key: KeyCode::Char('m'),
        alt_key: None,
        description: "Switch sign in / create account",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::SignIn,
    },
    // === Donor ===
    Shortcut {
        key: KeyCode::Char('s'),
        alt_key: None,
        description: "Scan food freshness",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Donor,
    },
    Shortcut {
        key: KeyCode::Char('v'),
        alt_key: None,
        description: "Toggle veg / non-veg",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Donor,
    },
    Shortcut {
        key: KeyCode::Char('c'),
        alt_key: None,
        description: "Cycle category",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Donor,
    },
    Shortcut {
        key: KeyCode::Char('u'),
        alt_key: None,
        description: "Cycle unit",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Donor,
    },
    Shortcut {
        key: KeyCode::Char('t'),
        alt_key: None,
        description: "Cycle storage",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Donor,
    },
    Shortcut {
        key: KeyCode::Char('+'),
        alt_key: Some(KeyCode::Char('-')),
        description: "Adjust quantity by 10",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Donor,
    },
    // === NGO ===
    Shortcut {
        key: KeyCode::Char('f'),
        alt_key: None,
        description: "Cycle surplus filter",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Ngo,
    },
    // === Volunteer ===
    Shortcut {
        key: KeyCode::Char('s'),
        alt_key: None,
        description: "Scan pickup QR code",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Volunteer,
    },
    Shortcut {
        key: KeyCode::Char('p'),
        alt_key: None,
        description: "Upload delivery photo",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Volunteer,
    },
];

/// Get all shortcuts for a given context
pub fn shortcuts_for_context(context: ShortcutContext) -> impl Iterator<Item = &'static Shortcut> {
    SHORTCUTS.iter().filter(move |s| s.context == context)
}

/// Grouped shortcuts by category
pub type GroupedByCategory = Vec<(ShortcutCategory, Vec<&'static Shortcut>)>;

/// Get shortcuts grouped by category for a given context
pub fn shortcuts_by_category_for_context(context: ShortcutContext) -> GroupedByCategory {
    let mut result = Vec::new();
    for category in ShortcutCategory::all() {
        let shortcuts: Vec<&Shortcut> = SHORTCUTS
            .iter()
            .filter(|s| s.context == context && s.category == *category)
            .collect();
        if !shortcuts.is_empty() {
            result.push((*category, shortcuts));
        }
    }
    result
}
