use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use cp_core::config::{ColorMode, CropRect, DrawMode, RenderConfig};
use cp_render::ansi::ColorCapability;

/// catpix — render an image as styled text in the terminal.
///
/// `-h` is the output height, as in the original tool; help is `--help`.
#[derive(Parser, Debug)]
#[command(name = "catpix", version, about, disable_help_flag = true)]
pub struct Cli {
    /// Print help.
    #[arg(long, action = clap::ArgAction::HelpLong)]
    help: Option<bool>,

    /// Output width in characters.
    #[arg(short = 'w', long)]
    pub width: Option<u32>,

    /// Output height in characters.
    #[arg(short = 'h', long)]
    pub height: Option<u32>,

    /// Crop region in source pixels: x y w h.
    #[arg(short = 'r', long, num_args = 4, value_names = ["X", "Y", "W", "H"])]
    pub rect: Option<Vec<u32>>,

    /// Force truecolor output instead of the detected capability.
    #[arg(short = 'c', long)]
    pub color: bool,

    /// Greyscale output.
    #[arg(short = 'g', long)]
    pub grey: bool,

    /// Monochrome draw-or-skip output, safe to pipe into a text file.
    #[arg(short = 'm', long, conflicts_with = "grey")]
    pub mono: bool,

    /// Luminance threshold below which a cell renders as blank space.
    #[arg(short = 't', long)]
    pub threshold: Option<u8>,

    /// Drawing mode.
    #[arg(short = 'd', long, value_enum, default_value_t = DrawArg::Block)]
    pub draw: DrawArg,

    /// Literal character used by `-d char`.
    #[arg(long = "char", default_value_t = '#')]
    pub fill: char,

    /// Log level: error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Image file. Reads the image from stdin when omitted.
    pub file: Option<PathBuf>,
}

/// CLI face of the drawing modes; `char` picks up `--char`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DrawArg {
    /// Solid blocks, variation carried by color.
    Block,
    /// One literal character everywhere.
    Char,
    /// Nearest-neighbor glyph matching.
    Art,
    /// Frequency-split line rendering.
    Line,
}

impl Cli {
    /// Assemble the render configuration from the parsed flags.
    ///
    /// # Errors
    /// Returns an error on a malformed crop rectangle argument.
    pub fn render_config(&self) -> Result<RenderConfig> {
        let crop = match self.rect.as_deref() {
            None => None,
            Some(&[x, y, w, h]) => Some(CropRect { x, y, w, h }),
            Some(other) => anyhow::bail!("-r expects 4 values, got {}", other.len()),
        };

        let color_mode = if self.mono {
            ColorMode::Monochrome
        } else if self.grey {
            ColorMode::Greyscale
        } else {
            ColorMode::Color
        };

        let draw_mode = match self.draw {
            DrawArg::Block => DrawMode::Block,
            DrawArg::Char => DrawMode::Char(self.fill),
            DrawArg::Art => DrawMode::Art,
            DrawArg::Line => DrawMode::Line,
        };

        Ok(RenderConfig {
            out_width: self.width,
            out_height: self.height,
            color_mode,
            draw_mode,
            threshold: self.threshold,
            crop,
        })
    }

    /// Color capability the encoder should target.
    #[must_use]
    pub fn capability(&self) -> ColorCapability {
        if self.mono {
            ColorCapability::None
        } else if self.color {
            ColorCapability::TrueColor
        } else {
            cp_render::detect_capability()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dimensions_and_mode() {
        let cli = Cli::try_parse_from(["catpix", "-w", "40", "-d", "art", "img.png"]).unwrap();
        let config = cli.render_config().unwrap();
        assert_eq!(config.out_width, Some(40));
        assert_eq!(config.out_height, None);
        assert_eq!(config.draw_mode, DrawMode::Art);
        assert_eq!(cli.file.unwrap().to_str(), Some("img.png"));
    }

    #[test]
    fn height_short_flag_is_height_not_help() {
        let cli = Cli::try_parse_from(["catpix", "-h", "12"]).unwrap();
        assert_eq!(cli.height, Some(12));
    }

    #[test]
    fn rect_becomes_crop() {
        let cli = Cli::try_parse_from(["catpix", "-r", "1", "2", "30", "40"]).unwrap();
        let config = cli.render_config().unwrap();
        assert_eq!(config.crop, Some(CropRect { x: 1, y: 2, w: 30, h: 40 }));
    }

    #[test]
    fn char_mode_carries_the_literal() {
        let cli = Cli::try_parse_from(["catpix", "-d", "char", "--char", "x"]).unwrap();
        let config = cli.render_config().unwrap();
        assert_eq!(config.draw_mode, DrawMode::Char('x'));
    }

    #[test]
    fn mono_and_grey_conflict() {
        assert!(Cli::try_parse_from(["catpix", "-m", "-g"]).is_err());
    }

    #[test]
    fn mono_targets_plain_output() {
        let cli = Cli::try_parse_from(["catpix", "-m"]).unwrap();
        assert_eq!(cli.capability(), ColorCapability::None);
        assert_eq!(cli.render_config().unwrap().color_mode, ColorMode::Monochrome);
    }
}
