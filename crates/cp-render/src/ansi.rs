use std::fmt::Write;

use cp_core::frame::{CellColor, CellGrid};

/// Color depth the terminal can display.
///
/// Detected outside the encoder (see [`crate::term`]) and passed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorCapability {
    /// No styling at all; glyphs only.
    None,
    /// 8 base colors via SGR 30–37 / 40–47.
    Ansi16,
    /// 256-color palette (6×6×6 cube + grey ramp).
    Ansi256,
    /// 24-bit RGB.
    TrueColor,
}

/// The 8 base terminal colors, in SGR order 30–37.
const BASE16: [(u8, u8, u8); 8] = [
    (0, 0, 0),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (0, 0, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

/// Serialize a grid into an ANSI byte stream.
///
/// Row-major, top to bottom. A style sequence is emitted only when the
/// (fg, bg) pair differs from the previous cell's; rows that used styling
/// end with a reset before the newline. `ColorCapability::None` produces
/// bare glyphs with no escape sequences, safe for text files.
///
/// # Example
/// ```
/// use cp_core::frame::CellGrid;
/// use cp_render::ansi::{encode, ColorCapability};
///
/// let grid = CellGrid::new(3, 1);
/// let bytes = encode(&grid, ColorCapability::None);
/// assert_eq!(bytes, b"   \n");
/// ```
#[must_use]
pub fn encode(grid: &CellGrid, capability: ColorCapability) -> Vec<u8> {
    let mut out = String::with_capacity(grid.cells.len() * 4);
    let default_style = (CellColor::Default, CellColor::Default);

    for row in 0..grid.height {
        let mut active = default_style;
        let mut styled_row = false;
        for col in 0..grid.width {
            let cell = grid.get(col, row);
            let style = if capability == ColorCapability::None || cell.skip {
                default_style
            } else {
                (cell.fg, cell.bg)
            };

            if style != active {
                // Reset-then-set keeps transitions to default correct.
                out.push_str("\u{1b}[0m");
                push_color(&mut out, style.0, capability, false);
                push_color(&mut out, style.1, capability, true);
                active = style;
                styled_row = true;
            }

            out.push(if cell.skip { ' ' } else { cell.ch });
        }
        if styled_row {
            out.push_str("\u{1b}[0m");
        }
        out.push('\n');
    }

    log::debug!(
        "encoded {}×{} grid for {capability:?}: {} bytes",
        grid.width,
        grid.height,
        out.len()
    );
    out.into_bytes()
}

/// Append the SGR sequence for one color slot. `Default` emits nothing —
/// the preceding reset already restored the terminal default.
fn push_color(out: &mut String, color: CellColor, capability: ColorCapability, background: bool) {
    let (r, g, b) = match color {
        CellColor::Default => return,
        CellColor::Grey(l) => (l, l, l),
        CellColor::Rgb(r, g, b) => (r, g, b),
    };

    match capability {
        ColorCapability::None => {}
        ColorCapability::TrueColor => {
            let channel = if background { 48 } else { 38 };
            let _ = write!(out, "\u{1b}[{channel};2;{r};{g};{b}m");
        }
        ColorCapability::Ansi256 => {
            let channel = if background { 48 } else { 38 };
            let idx = match color {
                // Grey levels go through the dedicated 24-step ramp for
                // finer steps than the color cube offers.
                CellColor::Grey(l) => 232 + (u16::from(l) * 24 / 256) as u8,
                _ => cube_index(r, g, b),
            };
            let _ = write!(out, "\u{1b}[{channel};5;{idx}m");
        }
        ColorCapability::Ansi16 => {
            let base = if background { 40 } else { 30 };
            let _ = write!(out, "\u{1b}[{}m", base + nearest_base16(r, g, b));
        }
    }
}

/// 6×6×6 cube index of the 256-color palette.
fn cube_index(r: u8, g: u8, b: u8) -> u8 {
    let level = |c: u8| -> u8 { (u16::from(c) * 5 / 255) as u8 };
    16 + 36 * level(r) + 6 * level(g) + level(b)
}

/// Nearest of the 8 base colors by squared RGB distance.
fn nearest_base16(r: u8, g: u8, b: u8) -> u8 {
    let mut best = 0u8;
    let mut best_dist = i32::MAX;
    for (i, &(cr, cg, cb)) in BASE16.iter().enumerate() {
        let dr = i32::from(r) - i32::from(cr);
        let dg = i32::from(g) - i32::from(cg);
        let db = i32::from(b) - i32::from(cb);
        let dist = dr * dr + dg * dg + db * db;
        if dist < best_dist {
            best_dist = dist;
            best = i as u8;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use cp_core::frame::Cell;

    fn styled_cell(ch: char, fg: CellColor) -> Cell {
        Cell {
            ch,
            fg,
            bg: CellColor::Default,
            skip: false,
        }
    }

    fn text(bytes: &[u8]) -> String {
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn no_capability_means_no_escapes() {
        let mut grid = CellGrid::new(2, 1);
        grid.set(0, 0, styled_cell('a', CellColor::Rgb(255, 0, 0)));
        grid.set(1, 0, styled_cell('b', CellColor::Rgb(0, 255, 0)));
        let s = text(&encode(&grid, ColorCapability::None));
        assert_eq!(s, "ab\n");
    }

    #[test]
    fn identical_styles_share_one_sequence() {
        let mut grid = CellGrid::new(3, 1);
        for x in 0..3 {
            grid.set(x, 0, styled_cell('#', CellColor::Rgb(10, 20, 30)));
        }
        let s = text(&encode(&grid, ColorCapability::TrueColor));
        assert_eq!(s.matches("38;2;10;20;30").count(), 1);
        assert!(s.ends_with("\u{1b}[0m\n"));
    }

    #[test]
    fn style_change_emits_new_sequence() {
        let mut grid = CellGrid::new(2, 1);
        grid.set(0, 0, styled_cell('#', CellColor::Rgb(255, 0, 0)));
        grid.set(1, 0, styled_cell('#', CellColor::Rgb(0, 0, 255)));
        let s = text(&encode(&grid, ColorCapability::TrueColor));
        assert_eq!(s.matches("38;2;").count(), 2);
    }

    #[test]
    fn each_styled_row_resets() {
        let mut grid = CellGrid::new(1, 2);
        grid.set(0, 0, styled_cell('x', CellColor::Rgb(1, 2, 3)));
        grid.set(0, 1, styled_cell('y', CellColor::Rgb(1, 2, 3)));
        let s = text(&encode(&grid, ColorCapability::TrueColor));
        assert_eq!(s.matches("\u{1b}[0m\n").count(), 2);
    }

    #[test]
    fn skipped_cells_are_plain_spaces() {
        let mut grid = CellGrid::new(2, 1);
        grid.set(0, 0, styled_cell('#', CellColor::Rgb(200, 0, 0)));
        grid.set(1, 0, Cell::blank());
        let s = text(&encode(&grid, ColorCapability::TrueColor));
        // The skip cell forces a reset before its space.
        assert!(s.contains("\u{1b}[0m "));
    }

    #[test]
    fn grey_uses_full_rgb_channel_on_truecolor() {
        let mut grid = CellGrid::new(1, 1);
        grid.set(0, 0, styled_cell('g', CellColor::Grey(90)));
        let s = text(&encode(&grid, ColorCapability::TrueColor));
        assert!(s.contains("38;2;90;90;90"));
    }

    #[test]
    fn grey_uses_ramp_on_256() {
        let mut grid = CellGrid::new(1, 1);
        grid.set(0, 0, styled_cell('g', CellColor::Grey(255)));
        let s = text(&encode(&grid, ColorCapability::Ansi256));
        assert!(s.contains("38;5;255"));
    }

    #[test]
    fn sixteen_color_picks_nearest_primary() {
        let mut grid = CellGrid::new(1, 1);
        grid.set(0, 0, styled_cell('r', CellColor::Rgb(250, 10, 10)));
        let s = text(&encode(&grid, ColorCapability::Ansi16));
        assert!(s.contains("\u{1b}[31m"));
    }

    #[test]
    fn background_uses_bg_channels() {
        let mut grid = CellGrid::new(1, 1);
        grid.set(
            0,
            0,
            Cell {
                ch: 'x',
                fg: CellColor::Default,
                bg: CellColor::Rgb(5, 6, 7),
                skip: false,
            },
        );
        let s = text(&encode(&grid, ColorCapability::TrueColor));
        assert!(s.contains("48;2;5;6;7"));
    }
}
