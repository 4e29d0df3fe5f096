use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use cp_core::frame::PixelBuffer;

/// Decode an image file into a pixel buffer.
///
/// Format sniffing and decompression are entirely the `image` crate's
/// business; decode failures propagate opaque.
///
/// # Errors
/// Returns an error if the file cannot be read or decoded.
///
/// # Example
/// ```no_run
/// use cp_source::image::load_path;
/// use std::path::Path;
/// let frame = load_path(Path::new("photo.png")).unwrap();
/// ```
pub fn load_path(path: &Path) -> Result<PixelBuffer> {
    let img = image::open(path).with_context(|| format!("cannot load {}", path.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::debug!("loaded {}: {width}×{height}", path.display());
    Ok(PixelBuffer::from_rgba(rgba.into_raw(), width, height))
}

/// Decode an image from standard input.
///
/// Reads stdin to the end first; image formats cannot generally be decoded
/// from a non-seekable stream.
///
/// # Errors
/// Returns an error if stdin cannot be read or the bytes do not decode.
pub fn load_stdin() -> Result<PixelBuffer> {
    let mut buffer = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buffer)
        .context("cannot read image data from stdin")?;
    let img = image::load_from_memory(&buffer).context("cannot decode image from stdin")?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::debug!("loaded stdin image: {width}×{height}");
    Ok(PixelBuffer::from_rgba(rgba.into_raw(), width, height))
}
