/// Terminal output for catpix: ANSI encoding of cell grids and color
/// capability detection.

pub mod ansi;
pub mod term;

pub use ansi::{encode, ColorCapability};
pub use term::detect_capability;
