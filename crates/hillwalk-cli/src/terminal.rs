//! Terminal styling helpers.
//!
//! Color is opt-out: `NO_COLOR` or `TERM=dumb` switch the palette to empty
//! strings so text output stays greppable.

/// ANSI escape codes used by the text renderer.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";
    /// Bright bold white for way names.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for node coordinates and decorations.
    pub const GRAY: &str = "\x1b[90m";
    /// Green for costs.
    pub const GREEN: &str = "\x1b[32m";
    /// Orange (256-color) for climbs.
    pub const ORANGE: &str = "\x1b[38;5;208m";
    /// Red for failures.
    pub const RED: &str = "\x1b[31m";
}

/// Resolved color codes, either ANSI sequences or empty strings.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub green: &'static str,
    pub orange: &'static str,
    pub red: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            green: colors::GREEN,
            orange: colors::ORANGE,
            red: colors::RED,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            white_bold: "",
            gray: "",
            green: "",
            orange: "",
            red: "",
        }
    }

    /// `colored()` when the terminal accepts ANSI codes, otherwise `plain()`.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check whether ANSI color codes should be emitted.
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

/// Format a walking time given in minutes, e.g. `42 min` or `1 h 05 min`.
///
/// ```
/// # use hillwalk_cli::terminal::format_minutes;
/// assert_eq!(format_minutes(2.4), "2 min");
/// assert_eq!(format_minutes(65.0), "1 h 05 min");
/// ```
#[must_use]
pub fn format_minutes(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as u64;
    if total < 60 {
        format!("{total} min")
    } else {
        format!("{} h {:02} min", total / 60, total % 60)
    }
}
