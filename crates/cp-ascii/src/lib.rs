/// Rendering core for catpix.
///
/// Converts a pixel buffer into a grid of styled cells: box-filter
/// downsampling, color quantization, frequency splitting, and
/// nearest-neighbor glyph matching.

pub mod glyphs;
pub mod quantize;
pub mod renderer;
pub mod sampler;
pub mod spectral;

pub use renderer::render;
