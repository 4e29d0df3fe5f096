use std::sync::Arc;

use realfft::num_complex::Complex;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};

/// Fraction of the spectrum kept by the low-pass reconstruction.
/// Tunable constant, deliberately not a user flag.
pub const CUTOFF_FRACTION: f32 = 0.25;

/// One-dimensional ideal low-pass over mirror-extended input.
///
/// Lines of length `n` are reflected to length `2n` before the transform,
/// so boundaries see their own reflection instead of an artificial edge.
struct LowPass {
    n: usize,
    fwd: Arc<dyn RealToComplex<f32>>,
    inv: Arc<dyn ComplexToReal<f32>>,
    input: Vec<f32>,
    spectrum: Vec<Complex<f32>>,
    scratch_fwd: Vec<Complex<f32>>,
    scratch_inv: Vec<Complex<f32>>,
    /// Number of low bins preserved; everything above is zeroed.
    keep: usize,
}

impl LowPass {
    fn new(planner: &mut RealFftPlanner<f32>, n: usize) -> Self {
        let m = 2 * n;
        let fwd = planner.plan_fft_forward(m);
        let inv = planner.plan_fft_inverse(m);
        let input = fwd.make_input_vec();
        let spectrum = fwd.make_output_vec();
        let scratch_fwd = fwd.make_scratch_vec();
        let scratch_inv = inv.make_scratch_vec();
        let keep = ((spectrum.len() as f32 * CUTOFF_FRACTION).ceil() as usize).max(1);
        Self {
            n,
            fwd,
            inv,
            input,
            spectrum,
            scratch_fwd,
            scratch_inv,
            keep,
        }
    }

    /// Replace `line` with its low-frequency reconstruction.
    ///
    /// `line.len()` must equal the `n` this instance was planned for.
    /// Left unchanged if the transform fails.
    fn apply(&mut self, line: &mut [f32]) {
        debug_assert_eq!(line.len(), self.n);
        let m = 2 * self.n;

        for (i, &v) in line.iter().enumerate() {
            self.input[i] = v;
            self.input[m - 1 - i] = v;
        }

        if self
            .fwd
            .process_with_scratch(&mut self.input, &mut self.spectrum, &mut self.scratch_fwd)
            .is_err()
        {
            log::warn!("forward FFT failed for line of {} samples", self.n);
            return;
        }

        for bin in self.spectrum.iter_mut().skip(self.keep) {
            *bin = Complex::new(0.0, 0.0);
        }
        // The inverse transform requires purely real first and last bins.
        self.spectrum[0].im = 0.0;
        if let Some(last) = self.spectrum.last_mut() {
            last.im = 0.0;
        }

        if self
            .inv
            .process_with_scratch(&mut self.spectrum, &mut self.input, &mut self.scratch_inv)
            .is_err()
        {
            log::warn!("inverse FFT failed for line of {} samples", self.n);
            return;
        }

        let scale = 1.0 / m as f32;
        for (i, slot) in line.iter_mut().enumerate() {
            *slot = self.input[i] * scale;
        }
    }
}

/// Split a luminance field into low-frequency and high-frequency bands.
///
/// The low band is a separable ideal low-pass (rows, then columns) of the
/// field; the high band is the exact residual, so `low + high` reconstructs
/// the input. Axes shorter than two samples pass through unfiltered.
///
/// # Example
/// ```
/// use cp_ascii::spectral::split;
/// let field = vec![100.0f32; 64];
/// let (low, high) = split(&field, 8, 8);
/// assert!(high.iter().all(|h| h.abs() < 0.01));
/// assert!((low[0] - 100.0).abs() < 0.01);
/// ```
#[must_use]
pub fn split(field: &[f32], width: usize, height: usize) -> (Vec<f32>, Vec<f32>) {
    debug_assert_eq!(field.len(), width * height);

    let mut low = field.to_vec();
    let mut planner = RealFftPlanner::<f32>::new();

    if width >= 2 {
        let mut lp = LowPass::new(&mut planner, width);
        for row in low.chunks_mut(width) {
            lp.apply(row);
        }
    }

    if height >= 2 {
        let mut lp = LowPass::new(&mut planner, height);
        let mut column = vec![0.0f32; height];
        for x in 0..width {
            for y in 0..height {
                column[y] = low[y * width + x];
            }
            lp.apply(&mut column);
            for y in 0..height {
                low[y * width + x] = column[y];
            }
        }
    }

    let high = field.iter().zip(&low).map(|(o, l)| o - l).collect();
    (low, high)
}
