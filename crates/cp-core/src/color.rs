/// Perceptual luminance, BT.601 weights: 0.299 R + 0.587 G + 0.114 B.
///
/// Integer arithmetic, exact at both extremes.
///
/// # Example
/// ```
/// use cp_core::color::luma601;
/// assert_eq!(luma601(0, 0, 0), 0);
/// assert_eq!(luma601(255, 255, 255), 255);
/// ```
#[inline(always)]
#[must_use]
pub fn luma601(r: u8, g: u8, b: u8) -> u8 {
    ((u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000) as u8
}

/// Rescale a color so its luminance lands on `target`, preserving chroma.
///
/// A pure grey of level `target` is returned when the input is black, since
/// black carries no chroma to preserve.
///
/// # Example
/// ```
/// use cp_core::color::rescale_to_luma;
/// let (r, g, b) = rescale_to_luma(0, 0, 0, 128);
/// assert_eq!((r, g, b), (128, 128, 128));
/// ```
#[must_use]
pub fn rescale_to_luma(r: u8, g: u8, b: u8, target: u8) -> (u8, u8, u8) {
    let current = luma601(r, g, b);
    if current == 0 {
        return (target, target, target);
    }
    let factor = f32::from(target) / f32::from(current);
    let scale = |c: u8| -> u8 { (f32::from(c) * factor).clamp(0.0, 255.0) as u8 };
    (scale(r), scale(g), scale(b))
}
