use crate::color::luma601;

/// Decoded source image. RGBA row-major, 4 bytes per pixel, alpha ignored.
///
/// Owned by the caller; the pipeline only borrows it read-only.
///
/// # Example
/// ```
/// use cp_core::frame::PixelBuffer;
/// let pb = PixelBuffer::new(10, 10);
/// assert_eq!(pb.data.len(), 400);
/// ```
pub struct PixelBuffer {
    /// Pixels RGBA, row-major, 4 bytes per pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelBuffer {
    /// Create a zeroed buffer with the given dimensions.
    ///
    /// # Example
    /// ```
    /// use cp_core::frame::PixelBuffer;
    /// let pb = PixelBuffer::new(4, 2);
    /// assert_eq!((pb.width, pb.height), (4, 2));
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; (width * height * 4) as usize],
            width,
            height,
        }
    }

    /// Build a buffer from raw RGBA bytes (as produced by `image::RgbaImage::into_raw`).
    #[must_use]
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(data.len(), (width * height * 4) as usize);
        Self {
            data,
            width,
            height,
        }
    }

    /// Pixel at (x, y) → (r, g, b). Alpha is dropped.
    ///
    /// # Example
    /// ```
    /// use cp_core::frame::PixelBuffer;
    /// let pb = PixelBuffer::new(2, 2);
    /// assert_eq!(pb.pixel(1, 1), (0, 0, 0));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = ((y * self.width + x) * 4) as usize;
        if idx + 2 >= self.data.len() {
            return (0, 0, 0);
        }
        (self.data[idx], self.data[idx + 1], self.data[idx + 2])
    }

    /// Perceptual luminance of the pixel at (x, y), BT.601 weights.
    #[inline(always)]
    #[must_use]
    pub fn luminance(&self, x: u32, y: u32) -> u8 {
        let (r, g, b) = self.pixel(x, y);
        luma601(r, g, b)
    }

    /// Set a pixel. Mainly useful for building test fixtures.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) {
        let idx = ((y * self.width + x) * 4) as usize;
        if idx + 3 < self.data.len() {
            self.data[idx] = r;
            self.data[idx + 1] = g;
            self.data[idx + 2] = b;
            self.data[idx + 3] = 255;
        }
    }
}

/// Color slot of a cell.
///
/// `Default` means "leave the terminal's current default color", which is
/// what monochrome output and skipped cells use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellColor {
    /// Terminal default (no styling for this slot).
    Default,
    /// Grey level 0–255. Encoded through the richest grey ramp available.
    Grey(u8),
    /// Truecolor RGB, degraded by the encoder to the terminal's capability.
    Rgb(u8, u8, u8),
}

/// One character position of output.
///
/// # Example
/// ```
/// use cp_core::frame::Cell;
/// let cell = Cell::default();
/// assert_eq!(cell.ch, ' ');
/// assert!(!cell.skip);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Glyph to display.
    pub ch: char,
    /// Foreground color.
    pub fg: CellColor,
    /// Background color.
    pub bg: CellColor,
    /// Render as empty space, ignoring glyph and colors.
    pub skip: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: CellColor::Default,
            bg: CellColor::Default,
            skip: false,
        }
    }
}

impl Cell {
    /// A skipped cell: space, default colors, `skip` set.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            skip: true,
            ..Self::default()
        }
    }
}

/// Output grid, row-major. Produced once by the renderer, consumed once by
/// the encoder.
///
/// # Example
/// ```
/// use cp_core::frame::{Cell, CellGrid};
/// let mut grid = CellGrid::new(80, 24);
/// grid.set(0, 0, Cell { ch: '@', ..Cell::default() });
/// assert_eq!(grid.get(0, 0).ch, '@');
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellGrid {
    /// Flat array of cells, row-major.
    pub cells: Vec<Cell>,
    /// Width in characters.
    pub width: u32,
    /// Height in characters.
    pub height: u32,
}

impl CellGrid {
    /// Create a grid filled with default cells.
    ///
    /// # Example
    /// ```
    /// use cp_core::frame::CellGrid;
    /// let grid = CellGrid::new(4, 2);
    /// assert_eq!(grid.cells.len(), 8);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: vec![Cell::default(); width as usize * height as usize],
            width,
            height,
        }
    }

    /// Set the cell at (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: u32, y: u32, cell: Cell) {
        self.cells[(y * self.width + x) as usize] = cell;
    }

    /// Cell reference at (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> &Cell {
        &self.cells[(y * self.width + x) as usize]
    }
}
