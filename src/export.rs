//! Headless export: rotate a whole image and write it without a window.

use std::path::Path;

use anyhow::Context;
use crop_engine::{Size, raster};
use log::info;

use crate::app::{FULL_CROP, projected_state};

/// Writes `input` rotated clockwise by `rotation_deg` degrees to `output`,
/// keeping the whole rotated image.
pub fn export(input: &Path, output: &Path, rotation_deg: f64) -> anyhow::Result<()> {
    let img = image::open(input).with_context(|| format!("cannot open {}", input.display()))?;
    let natural = Size::new(img.width() as f64, img.height() as f64);
    let state = projected_state(natural, rotation_deg.to_radians(), &FULL_CROP);
    let out = raster::extract(&img, &state)
        .with_context(|| format!("cannot extract from {}", input.display()))?;
    raster::save(&out, output).with_context(|| format!("cannot write {}", output.display()))?;
    info!("Exported {} at {rotation_deg} degrees", input.display());
    Ok(())
}
