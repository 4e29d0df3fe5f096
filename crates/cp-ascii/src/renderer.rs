use cp_core::color::rescale_to_luma;
use cp_core::config::{ColorMode, CropRect, DrawMode, RenderConfig};
use cp_core::error::RenderError;
use cp_core::frame::{Cell, CellColor, CellGrid, PixelBuffer};
use rayon::prelude::*;

use crate::glyphs::{self, GlyphSet, BLOCK_GLYPH};
use crate::quantize;
use crate::sampler::{sample, SampleGrid};
use crate::spectral;

/// Boost applied to the high-band magnitude when deriving the Line-mode
/// foreground intensity. Raw residuals are faint; without the boost the
/// stroke color washes out against the background fill.
const HIGH_BOOST: f32 = 2.0;

/// Peak residual below which a Line-mode cell is considered detail-free
/// and keeps a blank foreground instead of hunting for a stroke.
const DETAIL_MIN: f32 = 16.0;

/// Pipeline entry point: pixel buffer + configuration → cell grid.
///
/// Pure function of its inputs; rendering twice with the same arguments
/// yields bit-identical grids. Cells are mutually independent, so rows are
/// composed in parallel.
///
/// # Errors
/// - `InvalidCropRect` when the configured crop leaves the source bounds.
/// - `InvalidDimensions` when an output axis resolves to zero.
/// - `EmptyRepertoire` when Art/Line matching has no glyphs to search.
///
/// # Example
/// ```
/// use cp_core::config::RenderConfig;
/// use cp_core::frame::PixelBuffer;
///
/// let frame = PixelBuffer::new(16, 8);
/// let config = RenderConfig {
///     out_width: Some(8),
///     out_height: Some(2),
///     ..RenderConfig::default()
/// };
/// let grid = cp_ascii::render(&frame, &config).unwrap();
/// assert_eq!(grid.cells.len(), 16);
/// ```
pub fn render(frame: &PixelBuffer, config: &RenderConfig) -> Result<CellGrid, RenderError> {
    let crop = config
        .crop
        .unwrap_or_else(|| CropRect::full(frame.width, frame.height));
    crop.validate(frame.width, frame.height)?;
    let (w, h) = config.resolve_dimensions(crop.w, crop.h)?;
    log::debug!("rendering {w}×{h} cells from {}×{} crop", crop.w, crop.h);

    let needs_fine = matches!(config.draw_mode, DrawMode::Art | DrawMode::Line);
    let samples = sample(frame, &crop, w, h, needs_fine);

    let glyph_set = if needs_fine {
        let set = GlyphSet::shared();
        if set.is_empty() {
            return Err(RenderError::EmptyRepertoire);
        }
        Some(set)
    } else {
        None
    };

    // Line mode splits the whole fine field once; cells then read their
    // own patches out of both bands.
    let bands = match (config.draw_mode, samples.fine.as_ref()) {
        (DrawMode::Line, Some(fine)) => Some(spectral::split(
            &fine.luma,
            fine.width as usize,
            fine.height as usize,
        )),
        _ => None,
    };

    let threshold = config.effective_threshold();

    let mut grid = CellGrid::new(w, h);
    grid.cells
        .par_chunks_mut(w as usize)
        .enumerate()
        .for_each(|(row, cells)| {
            for (col, cell) in cells.iter_mut().enumerate() {
                *cell = compose_cell(
                    &samples,
                    glyph_set,
                    bands.as_ref(),
                    config,
                    threshold,
                    col as u32,
                    row as u32,
                );
            }
        });

    Ok(grid)
}

/// Build one output cell according to the drawing mode.
///
/// The skip threshold is the only cross-cutting rule: below it a cell is
/// blank regardless of mode.
fn compose_cell(
    samples: &SampleGrid,
    glyph_set: Option<&GlyphSet>,
    bands: Option<&(Vec<f32>, Vec<f32>)>,
    config: &RenderConfig,
    threshold: Option<u8>,
    col: u32,
    row: u32,
) -> Cell {
    let idx = (row * samples.width + col) as usize;
    let luma = samples.mean_luma[idx];
    if quantize::skipped(luma, threshold) {
        return Cell::blank();
    }

    let rgb = samples.mean_rgb[idx];
    let fg = quantize::cell_color(rgb, luma, config.color_mode);

    match config.draw_mode {
        DrawMode::Block => Cell {
            ch: BLOCK_GLYPH,
            fg,
            bg: CellColor::Default,
            skip: false,
        },
        DrawMode::Char(c) => Cell {
            ch: c,
            fg,
            bg: CellColor::Default,
            skip: false,
        },
        DrawMode::Art => {
            let ch = match (glyph_set, samples.fine.as_ref()) {
                (Some(set), Some(fine)) => set.select(&fine.patch_of(&fine.luma, col, row)).0,
                _ => BLOCK_GLYPH,
            };
            Cell {
                ch,
                fg,
                bg: CellColor::Default,
                skip: false,
            }
        }
        DrawMode::Line => compose_line_cell(samples, glyph_set, bands, config.color_mode, rgb, col, row),
    }
}

/// Line mode: background carries the smooth band, foreground carries a
/// stroke glyph matched against the detail band.
fn compose_line_cell(
    samples: &SampleGrid,
    glyph_set: Option<&GlyphSet>,
    bands: Option<&(Vec<f32>, Vec<f32>)>,
    color_mode: ColorMode,
    rgb: (u8, u8, u8),
    col: u32,
    row: u32,
) -> Cell {
    let (Some(set), Some(fine), Some((low, high))) = (glyph_set, samples.fine.as_ref(), bands)
    else {
        // Unreachable for a Line render; degrade to a solid block.
        return Cell {
            ch: BLOCK_GLYPH,
            fg: quantize::cell_color(rgb, cp_core::color::luma601(rgb.0, rgb.1, rgb.2), color_mode),
            bg: CellColor::Default,
            skip: false,
        };
    };

    let patch_high = fine.patch_of(high, col, row);
    let patch_abs: [f32; 25] = core::array::from_fn(|i| patch_high[i].abs().min(255.0));
    let (gx, gy) = glyphs::patch_gradient(&patch_high);

    // Signatures are binary; stretch the residual to full range so the
    // match keys on shape, not on how faint the detail is.
    let peak = patch_abs.iter().fold(0.0f32, |acc, &v| acc.max(v));
    let ch = if peak < DETAIL_MIN {
        ' '
    } else {
        let stretch = 255.0 / peak;
        let shaped: [f32; 25] = core::array::from_fn(|i| patch_abs[i] * stretch);
        set.select_line(&shaped, gx, gy).0
    };

    let patch_low = fine.patch_of(low, col, row);
    let low_mean = (patch_low.iter().sum::<f32>() / 25.0).round().clamp(0.0, 255.0) as u8;
    let high_mean = patch_abs.iter().sum::<f32>() / 25.0;
    let stroke_luma = (high_mean * HIGH_BOOST).round().clamp(0.0, 255.0) as u8;

    Cell {
        ch,
        fg: recolor(rgb, stroke_luma, color_mode),
        bg: recolor(rgb, low_mean, color_mode),
        skip: false,
    }
}

/// Re-express the cell color at a band-derived luminance.
fn recolor(rgb: (u8, u8, u8), target_luma: u8, mode: ColorMode) -> CellColor {
    match mode {
        ColorMode::Color => {
            let (r, g, b) = rescale_to_luma(rgb.0, rgb.1, rgb.2, target_luma);
            CellColor::Rgb(r, g, b)
        }
        ColorMode::Greyscale => CellColor::Grey(target_luma),
        ColorMode::Monochrome => CellColor::Default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, r: u8, g: u8, b: u8) -> PixelBuffer {
        let mut pb = PixelBuffer::new(w, h);
        for y in 0..h {
            for x in 0..w {
                pb.set_pixel(x, y, r, g, b);
            }
        }
        pb
    }

    fn checkerboard(n: u32) -> PixelBuffer {
        let mut pb = PixelBuffer::new(n, n);
        for y in 0..n {
            for x in 0..n {
                let v = if (x + y) % 2 == 0 { 0 } else { 255 };
                pb.set_pixel(x, y, v, v, v);
            }
        }
        pb
    }

    #[test]
    fn grid_has_width_times_height_cells() {
        let frame = solid(30, 20, 50, 50, 50);
        let config = RenderConfig {
            out_width: Some(11),
            out_height: Some(7),
            ..RenderConfig::default()
        };
        let grid = render(&frame, &config).unwrap();
        assert_eq!((grid.width, grid.height), (11, 7));
        assert_eq!(grid.cells.len(), 77);
    }

    #[test]
    fn pure_red_block_render() {
        // 2×2 red source, width 2: height derives to 1 via char aspect.
        let frame = solid(2, 2, 255, 0, 0);
        let config = RenderConfig {
            out_width: Some(2),
            ..RenderConfig::default()
        };
        let grid = render(&frame, &config).unwrap();
        assert_eq!((grid.width, grid.height), (2, 1));
        for cell in &grid.cells {
            assert_eq!(cell.ch, BLOCK_GLYPH);
            assert_eq!(cell.fg, CellColor::Rgb(255, 0, 0));
            assert_eq!(cell.bg, CellColor::Default);
            assert!(!cell.skip);
        }
    }

    #[test]
    fn black_monochrome_skips_every_cell() {
        let frame = solid(1, 1, 0, 0, 0);
        let config = RenderConfig {
            out_width: Some(6),
            out_height: Some(3),
            color_mode: ColorMode::Monochrome,
            threshold: Some(10),
            ..RenderConfig::default()
        };
        let grid = render(&frame, &config).unwrap();
        for cell in &grid.cells {
            assert!(cell.skip);
            assert_eq!(cell.ch, ' ');
            assert_eq!(cell.fg, CellColor::Default);
            assert_eq!(cell.bg, CellColor::Default);
        }
    }

    #[test]
    fn threshold_splits_draw_and_skip() {
        let mut frame = PixelBuffer::new(2, 1);
        frame.set_pixel(0, 0, 0, 0, 0);
        frame.set_pixel(1, 0, 255, 255, 255);
        let config = RenderConfig {
            out_width: Some(2),
            out_height: Some(1),
            color_mode: ColorMode::Monochrome,
            threshold: Some(128),
            ..RenderConfig::default()
        };
        let grid = render(&frame, &config).unwrap();
        assert!(grid.get(0, 0).skip);
        assert!(!grid.get(1, 0).skip);
        assert_eq!(grid.get(1, 0).ch, BLOCK_GLYPH);
        // Monochrome draw carries no color.
        assert_eq!(grid.get(1, 0).fg, CellColor::Default);
    }

    #[test]
    fn checkerboard_art_is_not_uniform() {
        let frame = checkerboard(4);
        let config = RenderConfig {
            out_width: Some(4),
            out_height: Some(4),
            color_mode: ColorMode::Greyscale,
            draw_mode: DrawMode::Art,
            ..RenderConfig::default()
        };
        let grid = render(&frame, &config).unwrap();
        // Each cell maps to exactly one source pixel; adjacent cells see
        // opposite extremes and must pick different glyphs.
        assert_ne!(grid.get(0, 0).ch, grid.get(1, 0).ch);
        assert_ne!(grid.get(1, 0).ch, grid.get(1, 1).ch);
    }

    #[test]
    fn char_mode_uses_the_literal() {
        let frame = solid(4, 4, 10, 200, 30);
        let config = RenderConfig {
            out_width: Some(2),
            out_height: Some(2),
            draw_mode: DrawMode::Char('x'),
            ..RenderConfig::default()
        };
        let grid = render(&frame, &config).unwrap();
        for cell in &grid.cells {
            assert_eq!(cell.ch, 'x');
            assert_eq!(cell.fg, CellColor::Rgb(10, 200, 30));
        }
    }

    #[test]
    fn render_is_idempotent() {
        let frame = checkerboard(8);
        let config = RenderConfig {
            out_width: Some(6),
            out_height: Some(4),
            draw_mode: DrawMode::Art,
            ..RenderConfig::default()
        };
        let a = render(&frame, &config).unwrap();
        let b = render(&frame, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_crop_is_rejected_not_clamped() {
        let frame = solid(10, 10, 1, 2, 3);
        let config = RenderConfig {
            out_width: Some(4),
            out_height: Some(4),
            crop: Some(CropRect { x: 5, y: 0, w: 6, h: 10 }),
            ..RenderConfig::default()
        };
        assert!(matches!(
            render(&frame, &config),
            Err(RenderError::InvalidCropRect { .. })
        ));
    }

    #[test]
    fn crop_selects_the_requested_region() {
        let mut frame = solid(4, 4, 0, 0, 0);
        frame.set_pixel(3, 0, 255, 255, 255);
        let config = RenderConfig {
            out_width: Some(1),
            out_height: Some(1),
            crop: Some(CropRect { x: 3, y: 0, w: 1, h: 1 }),
            ..RenderConfig::default()
        };
        let grid = render(&frame, &config).unwrap();
        assert_eq!(grid.get(0, 0).fg, CellColor::Rgb(255, 255, 255));
    }

    #[test]
    fn flat_image_line_render_has_no_strokes() {
        // No detail anywhere: the high band is empty, every cell keeps a
        // blank foreground glyph and a background at the image's level.
        let frame = solid(20, 10, 100, 100, 100);
        let config = RenderConfig {
            out_width: Some(4),
            out_height: Some(2),
            draw_mode: DrawMode::Line,
            ..RenderConfig::default()
        };
        let grid = render(&frame, &config).unwrap();
        for cell in &grid.cells {
            assert_eq!(cell.ch, ' ');
            assert_eq!(cell.bg, CellColor::Rgb(100, 100, 100));
        }
    }

    #[test]
    fn line_render_marks_edges() {
        // Left half black, right half white: cells astride the boundary
        // should carry a non-blank stroke glyph.
        let mut frame = PixelBuffer::new(40, 10);
        for y in 0..10 {
            for x in 20..40 {
                frame.set_pixel(x, y, 255, 255, 255);
            }
        }
        let config = RenderConfig {
            out_width: Some(7),
            out_height: Some(2),
            draw_mode: DrawMode::Line,
            ..RenderConfig::default()
        };
        let grid = render(&frame, &config).unwrap();
        let strokes: usize = grid.cells.iter().filter(|c| c.ch != ' ').count();
        assert!(strokes > 0, "expected at least one stroke cell");
    }
}
