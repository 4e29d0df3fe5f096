use std::sync::LazyLock;

/// SSD multiplier applied to the directional glyph matching the local
/// gradient orientation in Line mode. Below 1.0 favors that glyph.
pub const LINE_BIAS: f32 = 0.6;

/// Minimum gradient magnitude before Line mode biases toward a stroke.
pub const LINE_GRADIENT_MIN: f32 = 64.0;

/// Glyph drawn for every non-skipped cell in Block mode.
pub const BLOCK_GLYPH: char = '█';

/// Repertoire in declaration order with 5×5 bitmaps (row-major, first
/// written bit = top-left). Declaration order breaks matching ties.
const REPERTOIRE: &[(char, u32)] = &[
    (' ', 0b00000_00000_00000_00000_00000),
    ('.', 0b00000_00000_00000_00100_00000),
    (':', 0b00000_00100_00000_00100_00000),
    ('-', 0b00000_00000_11111_00000_00000),
    ('=', 0b00000_11111_00000_11111_00000),
    ('+', 0b00100_00100_11111_00100_00100),
    ('|', 0b00100_00100_00100_00100_00100),
    ('/', 0b00001_00010_00100_01000_10000),
    ('\\', 0b10000_01000_00100_00010_00001),
    ('o', 0b00000_01110_01010_01110_00000),
    ('#', 0b01010_11111_01010_11111_01010),
    ('@', 0b01110_10001_10111_10001_01110),
];

/// Process-wide signature table, built lazily on the first Art/Line render.
static SHARED: LazyLock<GlyphSet> = LazyLock::new(GlyphSet::new);

/// Precomputed intensity signatures for the glyph repertoire.
///
/// Built once per process and treated as read-only; every lookup walks the
/// same declaration order, so matching is fully deterministic.
///
/// # Example
/// ```
/// use cp_ascii::glyphs::GlyphSet;
/// let glyphs = GlyphSet::new();
/// let (ch, score) = glyphs.select(&[0.0; 25]);
/// assert_eq!(ch, ' ');
/// assert_eq!(score, 0.0);
/// ```
pub struct GlyphSet {
    entries: Vec<(char, [f32; 25])>,
}

impl GlyphSet {
    /// Build the signature table from the static repertoire.
    #[must_use]
    pub fn new() -> Self {
        let entries = REPERTOIRE
            .iter()
            .map(|&(ch, bm)| {
                let mut sig = [0.0f32; 25];
                for (i, slot) in sig.iter_mut().enumerate() {
                    if bm & (1 << (24 - i)) != 0 {
                        *slot = 255.0;
                    }
                }
                (ch, sig)
            })
            .collect();
        Self { entries }
    }

    /// Shared instance of the signature table. The repertoire is constant,
    /// so every render reads the same entries.
    #[must_use]
    pub fn shared() -> &'static Self {
        &SHARED
    }

    /// True when the repertoire holds no glyphs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nearest glyph for a 5×5 intensity patch, by sum of squared
    /// differences. Ties keep the first-declared glyph. Returns the glyph
    /// and its score; an empty repertoire yields a space with an infinite
    /// score.
    ///
    /// # Example
    /// ```
    /// use cp_ascii::glyphs::GlyphSet;
    /// let glyphs = GlyphSet::new();
    /// let (ch, _) = glyphs.select(&[255.0; 25]);
    /// assert_eq!(ch, '#');
    /// ```
    #[must_use]
    pub fn select(&self, patch: &[f32; 25]) -> (char, f32) {
        self.select_biased(patch, None)
    }

    /// Like [`select`](Self::select), but biased toward the directional
    /// stroke perpendicular to the gradient `(gx, gy)` when the gradient is
    /// strong enough to indicate a line through the cell.
    #[must_use]
    pub fn select_line(&self, patch: &[f32; 25], gx: f32, gy: f32) -> (char, f32) {
        let mag = (gx * gx + gy * gy).sqrt();
        let preferred = (mag >= LINE_GRADIENT_MIN).then(|| stroke_for_gradient(gx, gy));
        self.select_biased(patch, preferred)
    }

    fn select_biased(&self, patch: &[f32; 25], preferred: Option<char>) -> (char, f32) {
        let mut best = (' ', f32::INFINITY);
        for &(ch, sig) in &self.entries {
            let mut ssd = 0.0f32;
            for (p, s) in patch.iter().zip(&sig) {
                let d = p - s;
                ssd += d * d;
            }
            if preferred == Some(ch) {
                ssd *= LINE_BIAS;
            }
            if ssd < best.1 {
                best = (ch, ssd);
            }
        }
        best
    }
}

impl Default for GlyphSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Stroke glyph perpendicular to a gradient direction.
///
/// The gradient points across an edge; the visible line runs at right
/// angles to it. Screen coordinates, y growing downward.
#[must_use]
pub fn stroke_for_gradient(gx: f32, gy: f32) -> char {
    let angle = gy.atan2(gx).to_degrees();
    let angle = if angle < 0.0 { angle + 180.0 } else { angle };

    if !(22.5..157.5).contains(&angle) {
        '|'
    } else if angle < 67.5 {
        '/'
    } else if angle < 112.5 {
        '-'
    } else {
        '\\'
    }
}

/// Accumulated Sobel gradient over the interior of a 5×5 patch,
/// averaged per position.
#[must_use]
pub fn patch_gradient(patch: &[f32; 25]) -> (f32, f32) {
    let mut gx = 0.0f32;
    let mut gy = 0.0f32;
    for y in 1..4i32 {
        for x in 1..4i32 {
            let at = |dx: i32, dy: i32| patch[((y + dy) * 5 + x + dx) as usize];
            gx += -at(-1, -1) + at(1, -1) - 2.0 * at(-1, 0) + 2.0 * at(1, 0) - at(-1, 1)
                + at(1, 1);
            gy += -at(-1, -1) - 2.0 * at(0, -1) - at(1, -1)
                + at(-1, 1)
                + 2.0 * at(0, 1)
                + at(1, 1);
        }
    }
    (gx / 9.0, gy / 9.0)
}
