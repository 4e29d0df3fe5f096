use crate::error::RenderError;

/// Output width used when neither dimension is supplied.
pub const DEFAULT_WIDTH: u32 = 80;

/// Correction for terminal glyphs being roughly twice as tall as wide.
/// Applied to the height axis when deriving one dimension from the other.
pub const CHAR_ASPECT: f64 = 0.5;

/// Skip threshold assumed by monochrome mode when none is given.
pub const DEFAULT_MONO_THRESHOLD: u8 = 128;

/// Crop region in source pixel coordinates.
///
/// # Example
/// ```
/// use cp_core::config::CropRect;
/// let rect = CropRect { x: 0, y: 0, w: 10, h: 10 };
/// assert!(rect.validate(20, 20).is_ok());
/// assert!(rect.validate(5, 20).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width, must be > 0.
    pub w: u32,
    /// Height, must be > 0.
    pub h: u32,
}

impl CropRect {
    /// The full-image crop for a source of the given size.
    #[must_use]
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            w: width,
            h: height,
        }
    }

    /// Check the rectangle against the source bounds.
    ///
    /// # Errors
    /// `RenderError::InvalidCropRect` when a dimension is zero or the
    /// rectangle extends past the source. Out-of-bounds requests are
    /// rejected, never clamped.
    pub fn validate(&self, src_width: u32, src_height: u32) -> Result<(), RenderError> {
        let oob = self.w == 0
            || self.h == 0
            || self.x.checked_add(self.w).is_none_or(|r| r > src_width)
            || self.y.checked_add(self.h).is_none_or(|b| b > src_height);
        if oob {
            return Err(RenderError::InvalidCropRect {
                x: self.x,
                y: self.y,
                w: self.w,
                h: self.h,
                src_width,
                src_height,
            });
        }
        Ok(())
    }
}

/// How cell colors are represented in the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    /// Truecolor RGB, degraded by the encoder if the terminal is poorer.
    Color,
    /// Grey levels. Still encoded through the RGB channel on truecolor
    /// terminals for the finest grey ramp available.
    Greyscale,
    /// No color at all: draw-or-skip against the luminance threshold.
    /// Output is safe to redirect into a text file.
    Monochrome,
}

/// How each cell's glyph is chosen.
///
/// Each variant carries only the data it needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawMode {
    /// Fixed solid block; all variation carried by color.
    Block,
    /// A single user-supplied literal character for every drawn cell.
    Char(char),
    /// Nearest-neighbor glyph matching against the repertoire signatures.
    Art,
    /// Frequency-split rendering: background carries the smooth field,
    /// foreground carries a directional stroke glyph.
    Line,
}

/// Immutable per-invocation render configuration.
///
/// # Example
/// ```
/// use cp_core::config::RenderConfig;
/// let config = RenderConfig::default();
/// let (w, h) = config.resolve_dimensions(100, 100).unwrap();
/// assert_eq!((w, h), (80, 40));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Output width in cells. Derived from the height when absent.
    pub out_width: Option<u32>,
    /// Output height in cells. Derived from the width when absent.
    pub out_height: Option<u32>,
    /// Color representation.
    pub color_mode: ColorMode,
    /// Glyph selection strategy.
    pub draw_mode: DrawMode,
    /// Luminance below which a cell renders as blank space.
    pub threshold: Option<u8>,
    /// Crop region; full image when absent.
    pub crop: Option<CropRect>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            out_width: None,
            out_height: None,
            color_mode: ColorMode::Color,
            draw_mode: DrawMode::Block,
            threshold: None,
            crop: None,
        }
    }
}

impl RenderConfig {
    /// Resolve the output dimensions against the crop's pixel dimensions.
    ///
    /// A missing dimension is derived from the supplied one so the crop's
    /// aspect ratio is preserved, with [`CHAR_ASPECT`] compensating on the
    /// height axis for tall terminal glyphs. With neither supplied, width
    /// defaults to [`DEFAULT_WIDTH`]. Large values are accepted as-is.
    ///
    /// # Errors
    /// `RenderError::InvalidDimensions` when either axis resolves to zero.
    pub fn resolve_dimensions(&self, crop_w: u32, crop_h: u32) -> Result<(u32, u32), RenderError> {
        let derive_h = |w: u32| -> u32 {
            (f64::from(w) * f64::from(crop_h) / f64::from(crop_w) * CHAR_ASPECT).round() as u32
        };
        let derive_w = |h: u32| -> u32 {
            (f64::from(h) * f64::from(crop_w) / f64::from(crop_h) / CHAR_ASPECT).round() as u32
        };
        let (w, h) = match (self.out_width, self.out_height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, derive_h(w)),
            (None, Some(h)) => (derive_w(h), h),
            (None, None) => (DEFAULT_WIDTH, derive_h(DEFAULT_WIDTH)),
        };
        if w == 0 || h == 0 {
            return Err(RenderError::InvalidDimensions {
                width: w,
                height: h,
            });
        }
        Ok((w, h))
    }

    /// Threshold actually applied during rendering.
    ///
    /// Monochrome always thresholds, falling back to
    /// [`DEFAULT_MONO_THRESHOLD`]; other modes only when one was configured.
    #[must_use]
    pub fn effective_threshold(&self) -> Option<u8> {
        match (self.color_mode, self.threshold) {
            (ColorMode::Monochrome, None) => Some(DEFAULT_MONO_THRESHOLD),
            (_, t) => t,
        }
    }
}
