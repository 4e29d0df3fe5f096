/// Image acquisition for catpix: decode a file or stdin into a pixel buffer.

pub mod image;

pub use image::{load_path, load_stdin};
