//! Named color themes.
//!
//! Resolved once at startup from a name; unknown names fall back to
//! the default palette. Themes carry no behavior.

use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    /// Highlight for the focused widget and the run trigger.
    pub accent: Color,
    pub border: Color,
    pub title: Color,
    /// User-authored chat blocks.
    pub user: Color,
    /// Workflow response chat blocks.
    pub response: Color,
    pub error: Color,
    pub muted: Color,
}

pub const DEFAULT: Theme = Theme {
    name: "default",
    accent: Color::Blue,
    border: Color::Gray,
    title: Color::White,
    user: Color::Cyan,
    response: Color::Green,
    error: Color::Red,
    muted: Color::DarkGray,
};

const THEMES: &[Theme] = &[
    DEFAULT,
    Theme {
        name: "cerulean",
        accent: Color::LightBlue,
        ..DEFAULT
    },
    Theme {
        name: "cosmo",
        accent: Color::Magenta,
        user: Color::LightMagenta,
        ..DEFAULT
    },
    Theme {
        name: "cyborg",
        accent: Color::LightCyan,
        border: Color::DarkGray,
        title: Color::LightCyan,
        user: Color::White,
        response: Color::LightGreen,
        ..DEFAULT
    },
    Theme {
        name: "darkly",
        accent: Color::LightGreen,
        border: Color::DarkGray,
        response: Color::LightGreen,
        ..DEFAULT
    },
    Theme {
        name: "flatly",
        accent: Color::Green,
        user: Color::LightBlue,
        ..DEFAULT
    },
    Theme {
        name: "journal",
        accent: Color::LightRed,
        user: Color::Yellow,
        ..DEFAULT
    },
];

/// Resolve a theme by name. Unknown names yield the default.
pub fn resolve(name: &str) -> Theme {
    THEMES
        .iter()
        .find(|theme| theme.name.eq_ignore_ascii_case(name))
        .copied()
        .unwrap_or(DEFAULT)
}

/// Names accepted by [`resolve`], for CLI help text.
pub fn names() -> Vec<&'static str> {
    THEMES.iter().map(|theme| theme.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_name_resolves_to_itself() {
        for name in names() {
            assert_eq!(resolve(name).name, name);
        }
    }

    #[test]
    fn test_unknown_name_falls_back_to_default() {
        assert_eq!(resolve("no-such-theme"), DEFAULT);
        assert_eq!(resolve(""), DEFAULT);
    }

    #[test]
    fn test_resolution_is_case_insensitive() {
        assert_eq!(resolve("Darkly").name, "darkly");
    }
}
