use cp_core::color::luma601;
use cp_core::config::CropRect;
use cp_core::frame::PixelBuffer;

/// Side length of the fine per-cell sub-sample used for glyph matching.
/// Matches the 5×5 glyph signatures in [`crate::glyphs`].
pub const FINE: u32 = 5;

/// Fine-grained luminance field: `FINE`×`FINE` texels per output cell.
pub struct FineField {
    /// Width in texels (`grid width × FINE`).
    pub width: u32,
    /// Height in texels (`grid height × FINE`).
    pub height: u32,
    /// Luminance values, row-major.
    pub luma: Vec<f32>,
}

/// Aggregated colors for every output cell, plus the optional fine field.
pub struct SampleGrid {
    /// Width in cells.
    pub width: u32,
    /// Height in cells.
    pub height: u32,
    /// Mean RGB per cell, row-major.
    pub mean_rgb: Vec<(u8, u8, u8)>,
    /// Luminance of the mean color per cell, row-major.
    pub mean_luma: Vec<u8>,
    /// Fine sub-sample, present for Art/Line renders.
    pub fine: Option<FineField>,
}

/// Source-pixel span covered by output index `i` of `n` along one axis.
///
/// Linear map over the crop extent. When the output resolution exceeds the
/// crop's pixel resolution the span degenerates and collapses to the single
/// nearest source pixel, which replicates pixels instead of averaging.
#[inline]
fn span(origin: u32, extent: u32, i: u32, n: u32) -> (u32, u32) {
    let lo = origin + (i as u64 * u64::from(extent) / u64::from(n)) as u32;
    let hi = origin + ((i as u64 + 1) * u64::from(extent) / u64::from(n)) as u32;
    if hi <= lo {
        let last = origin + extent - 1;
        let lo = lo.min(last);
        (lo, lo + 1)
    } else {
        (lo, hi)
    }
}

/// Box-filtered mean color over a source rectangle.
fn mean_rect(frame: &PixelBuffer, x0: u32, x1: u32, y0: u32, y1: u32) -> (u8, u8, u8) {
    let mut sr = 0u64;
    let mut sg = 0u64;
    let mut sb = 0u64;
    for y in y0..y1 {
        for x in x0..x1 {
            let (r, g, b) = frame.pixel(x, y);
            sr += u64::from(r);
            sg += u64::from(g);
            sb += u64::from(b);
        }
    }
    let count = u64::from(x1 - x0) * u64::from(y1 - y0);
    let half = count / 2;
    (
        ((sr + half) / count) as u8,
        ((sg + half) / count) as u8,
        ((sb + half) / count) as u8,
    )
}

/// Map the cropped source onto an `out_w × out_h` grid of aggregated colors.
///
/// Every cell is the box-filtered mean of the source pixels its span covers;
/// multi-pixel spans are never point-sampled. With `want_fine` set, a
/// `FINE`×`FINE` luminance sub-sample per cell is retained for glyph
/// matching and frequency splitting.
///
/// The crop must already be validated against the frame bounds.
///
/// # Example
/// ```
/// use cp_core::config::CropRect;
/// use cp_core::frame::PixelBuffer;
/// use cp_ascii::sampler::sample;
///
/// let frame = PixelBuffer::new(16, 16);
/// let crop = CropRect::full(16, 16);
/// let grid = sample(&frame, &crop, 4, 2, false);
/// assert_eq!(grid.mean_rgb.len(), 8);
/// ```
#[must_use]
pub fn sample(
    frame: &PixelBuffer,
    crop: &CropRect,
    out_w: u32,
    out_h: u32,
    want_fine: bool,
) -> SampleGrid {
    debug_assert!(crop.validate(frame.width, frame.height).is_ok());

    let mut mean_rgb = Vec::with_capacity((out_w * out_h) as usize);
    let mut mean_luma = Vec::with_capacity((out_w * out_h) as usize);
    for row in 0..out_h {
        let (y0, y1) = span(crop.y, crop.h, row, out_h);
        for col in 0..out_w {
            let (x0, x1) = span(crop.x, crop.w, col, out_w);
            let (r, g, b) = mean_rect(frame, x0, x1, y0, y1);
            mean_rgb.push((r, g, b));
            mean_luma.push(luma601(r, g, b));
        }
    }

    let fine = want_fine.then(|| {
        let fw = out_w * FINE;
        let fh = out_h * FINE;
        let mut luma = Vec::with_capacity((fw * fh) as usize);
        for row in 0..fh {
            let (y0, y1) = span(crop.y, crop.h, row, fh);
            for col in 0..fw {
                let (x0, x1) = span(crop.x, crop.w, col, fw);
                let (r, g, b) = mean_rect(frame, x0, x1, y0, y1);
                luma.push(f32::from(luma601(r, g, b)));
            }
        }
        FineField {
            width: fw,
            height: fh,
            luma,
        }
    });

    SampleGrid {
        width: out_w,
        height: out_h,
        mean_rgb,
        mean_luma,
        fine,
    }
}

impl FineField {
    /// Copy the `FINE`×`FINE` patch belonging to cell (col, row) out of the
    /// field `src` (which must have this field's dimensions).
    #[must_use]
    pub fn patch_of(&self, src: &[f32], col: u32, row: u32) -> [f32; 25] {
        debug_assert_eq!(src.len(), (self.width * self.height) as usize);
        let mut patch = [0.0f32; 25];
        for dy in 0..FINE {
            for dx in 0..FINE {
                let x = col * FINE + dx;
                let y = row * FINE + dy;
                patch[(dy * FINE + dx) as usize] = src[(y * self.width + x) as usize];
            }
        }
        patch
    }
}
