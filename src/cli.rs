//! Command-line arguments for the cropper binary.

use std::path::PathBuf;

use clap::Parser;

/// Rotation-aware image cropper.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Image to open at start-up
    pub file: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the rotated image to this path and exit without opening a window
    #[arg(short, long, requires = "file")]
    pub output: Option<PathBuf>,

    /// Initial rotation in degrees (clockwise)
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub rotate: f64,

    /// Verbosity: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbosity: u8,
}
