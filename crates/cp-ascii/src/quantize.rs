use cp_core::config::ColorMode;
use cp_core::frame::CellColor;

/// Quantize an aggregated cell color into its output representation.
///
/// Greyscale cells stay as grey levels here; the encoder routes them
/// through the full RGB channel on truecolor terminals so grey ramps
/// richer than 16 steps are not wasted. Monochrome carries no color.
///
/// # Example
/// ```
/// use cp_core::config::ColorMode;
/// use cp_core::frame::CellColor;
/// use cp_ascii::quantize::cell_color;
///
/// assert_eq!(cell_color((200, 50, 50), 94, ColorMode::Color), CellColor::Rgb(200, 50, 50));
/// assert_eq!(cell_color((200, 50, 50), 94, ColorMode::Greyscale), CellColor::Grey(94));
/// assert_eq!(cell_color((200, 50, 50), 94, ColorMode::Monochrome), CellColor::Default);
/// ```
#[must_use]
pub fn cell_color(rgb: (u8, u8, u8), luma: u8, mode: ColorMode) -> CellColor {
    match mode {
        ColorMode::Color => CellColor::Rgb(rgb.0, rgb.1, rgb.2),
        ColorMode::Greyscale => CellColor::Grey(luma),
        ColorMode::Monochrome => CellColor::Default,
    }
}

/// Whether a cell falls below the skip threshold and renders as blank.
#[inline]
#[must_use]
pub fn skipped(luma: u8, threshold: Option<u8>) -> bool {
    threshold.is_some_and(|t| luma < t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_strictly_below() {
        assert!(skipped(9, Some(10)));
        assert!(!skipped(10, Some(10)));
        assert!(!skipped(0, None));
    }

    #[test]
    fn greyscale_keeps_luma_not_channels() {
        let c = cell_color((255, 0, 0), 76, ColorMode::Greyscale);
        assert_eq!(c, CellColor::Grey(76));
    }
}
