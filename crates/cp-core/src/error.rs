use thiserror::Error;

/// Errors surfaced by the rendering core.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Crop rectangle outside the source bounds or with a zero dimension.
    ///
    /// Never clamped: silently rendering a different region than the one
    /// requested would misrepresent the output.
    #[error("invalid crop rectangle {x},{y} {w}×{h} for {src_width}×{src_height} image")]
    InvalidCropRect {
        /// Left edge, source pixels.
        x: u32,
        /// Top edge, source pixels.
        y: u32,
        /// Width, source pixels.
        w: u32,
        /// Height, source pixels.
        h: u32,
        /// Source image width.
        src_width: u32,
        /// Source image height.
        src_height: u32,
    },

    /// Output width or height resolved to zero after aspect derivation.
    #[error("invalid output dimensions {width}×{height}")]
    InvalidDimensions {
        /// Resolved output width.
        width: u32,
        /// Resolved output height.
        height: u32,
    },

    /// Art/Line mode requested with an empty glyph repertoire.
    ///
    /// Programming error in the glyph table, not a user-recoverable state.
    #[error("glyph repertoire is empty")]
    EmptyRepertoire,
}
