/// Shared types and configuration for catpix.
///
/// This crate contains the pixel buffer, the output grid, the render
/// configuration, and the error types used across the catpix workspace.

pub mod color;
pub mod config;
pub mod error;
pub mod frame;

pub use config::{ColorMode, CropRect, DrawMode, RenderConfig};
pub use error::RenderError;
pub use frame::{Cell, CellColor, CellGrid, PixelBuffer};
