use std::env;

use crate::ansi::ColorCapability;

/// Detect the terminal's color capability from the environment.
///
/// Honors `NO_COLOR`, then `COLORTERM` for truecolor, then `TERM` for the
/// 256-color and dumb cases. Absent everything, assumes the 8 base colors.
#[must_use]
pub fn detect_capability() -> ColorCapability {
    capability_from(
        env::var_os("NO_COLOR").is_some(),
        env::var("COLORTERM").ok().as_deref(),
        env::var("TERM").ok().as_deref(),
    )
}

fn capability_from(
    no_color: bool,
    colorterm: Option<&str>,
    term: Option<&str>,
) -> ColorCapability {
    if no_color {
        return ColorCapability::None;
    }
    if matches!(colorterm, Some("truecolor" | "24bit")) {
        return ColorCapability::TrueColor;
    }
    match term {
        None | Some("" | "dumb") => ColorCapability::None,
        Some(t) if t.contains("256color") => ColorCapability::Ansi256,
        Some(_) => ColorCapability::Ansi16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_color_wins_over_everything() {
        let cap = capability_from(true, Some("truecolor"), Some("xterm-256color"));
        assert_eq!(cap, ColorCapability::None);
    }

    #[test]
    fn colorterm_signals_truecolor() {
        let cap = capability_from(false, Some("truecolor"), Some("xterm"));
        assert_eq!(cap, ColorCapability::TrueColor);
    }

    #[test]
    fn term_256color_detected() {
        let cap = capability_from(false, None, Some("xterm-256color"));
        assert_eq!(cap, ColorCapability::Ansi256);
    }

    #[test]
    fn dumb_or_missing_term_means_plain() {
        assert_eq!(capability_from(false, None, Some("dumb")), ColorCapability::None);
        assert_eq!(capability_from(false, None, None), ColorCapability::None);
    }

    #[test]
    fn plain_term_gets_base_colors() {
        assert_eq!(capability_from(false, None, Some("vt100")), ColorCapability::Ansi16);
    }
}
