//! Terminal styling and color utilities.
//!
//! ANSI escape definitions plus color detection, so renderers can ask for a
//! palette and never check the environment themselves.

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";
    /// Bold bright white for headings and coordinates.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for secondary text and grid holes.
    pub const GRAY: &str = "\x1b[90m";
    /// Cyan for route steps.
    pub const CYAN: &str = "\x1b[36m";
    /// Green for low danger and high-value highlights.
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow for moderate values.
    pub const YELLOW: &str = "\x1b[33m";
    /// Red for high danger and failures.
    pub const RED: &str = "\x1b[31m";
}

/// Resolved color codes, either ANSI sequences or empty strings when color
/// is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub cyan: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub red: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            cyan: colors::CYAN,
            green: colors::GREEN,
            yellow: colors::YELLOW,
            red: colors::RED,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            white_bold: "",
            gray: "",
            cyan: "",
            green: "",
            yellow: "",
            red: "",
        }
    }

    /// Palette for the current terminal, unless `--no-color` was given.
    #[must_use]
    pub fn detect(no_color_flag: bool) -> Self {
        if !no_color_flag && supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    /// Color for a value on a unit scale where higher is worse.
    #[must_use]
    pub fn severity(&self, unit_value: f64) -> &'static str {
        if unit_value >= 0.66 {
            self.red
        } else if unit_value >= 0.33 {
            self.yellow
        } else {
            self.green
        }
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// Respects `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}
