//! Turning a [`ProjectedState`] into pixels.
//!
//! The source image is drawn rotated onto a transparent surface the size of
//! its rotated bounding box, which is then drawn into a second surface the
//! size of the crop. Both steps work in natural image pixels.

use std::f64::consts::FRAC_PI_2;
use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage, imageops};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use log::{debug, info};

use crate::error::{RasterError, RasterResult};
use crate::projector::ProjectedState;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Draws `source` rotated by the state's rotation about the centre of a
/// surface sized to the rotated image's bounding box.
///
/// Quarter turns are exact pixel permutations; any other angle is
/// resampled bilinearly and leaves the uncovered corners transparent.
pub fn render_rotated(source: &DynamicImage, state: &ProjectedState) -> RasterResult<RgbaImage> {
    let (width, height) = state.surface_size();
    if width == 0 || height == 0 || !state.image_rotation.is_finite() {
        return Err(RasterError::DegenerateGeometry(format!(
            "surface {:?} at rotation {}",
            state.actual_image_dimension, state.image_rotation
        )));
    }

    let src = source.to_rgba8();
    if let Some(turned) = quarter_turn(&src, state.image_rotation, (width, height)) {
        return Ok(turned);
    }

    debug!(
        "rotating {}x{} by {:.4} rad onto {}x{}",
        src.width(),
        src.height(),
        state.image_rotation,
        width,
        height
    );

    // Pixel (i, j) covers [i, i + 1); rotate about the centres of both
    // images in that continuous space.
    let (sw, sh) = (src.width() as f32, src.height() as f32);
    let (dw, dh) = (width as f32, height as f32);
    let projection = Projection::translate(dw / 2.0 - 0.5, dh / 2.0 - 0.5)
        * Projection::rotate(state.image_rotation as f32)
        * Projection::translate(0.5 - sw / 2.0, 0.5 - sh / 2.0);

    let mut surface = RgbaImage::from_pixel(width, height, TRANSPARENT);
    warp_into(
        &src,
        &projection,
        Interpolation::Bilinear,
        TRANSPARENT,
        &mut surface,
    );
    Ok(surface)
}

/// Rotations by a whole number of quarter turns whose surface matches the
/// turned source exactly.
fn quarter_turn(src: &RgbaImage, rotation: f64, surface: (u32, u32)) -> Option<RgbaImage> {
    let turns = rotation / FRAC_PI_2;
    if (turns - turns.round()).abs() > 1e-9 {
        return None;
    }
    let (w, h) = src.dimensions();
    let turned = match (turns.round() as i64).rem_euclid(4) {
        0 if surface == (w, h) => src.clone(),
        1 if surface == (h, w) => imageops::rotate90(src),
        2 if surface == (w, h) => imageops::rotate180(src),
        3 if surface == (h, w) => imageops::rotate270(src),
        _ => return None,
    };
    Some(turned)
}

/// Cuts the projected crop out of the rotated image.
///
/// The output always has the crop's own size in natural pixels; any part of
/// the crop lying outside the rotated image stays transparent.
pub fn extract(source: &DynamicImage, state: &ProjectedState) -> RasterResult<DynamicImage> {
    if !state.ratio_to_actual.is_finite() || state.actual_cropper_size.is_degenerate() {
        return Err(RasterError::DegenerateGeometry(format!(
            "crop {:?} at ratio {}",
            state.actual_cropper_size, state.ratio_to_actual
        )));
    }
    let region = state.actual_crop_region().ok_or(RasterError::EmptyRegion)?;
    let (out_w, out_h) = state.output_size();
    let surface = render_rotated(source, state)?;

    debug!("extracting {out_w}x{out_h}, visible {region:?}");
    let mut out = RgbaImage::from_pixel(out_w, out_h, TRANSPARENT);
    let offset_x = state.actual_cropper_position.x.round() as i64;
    let offset_y = state.actual_cropper_position.y.round() as i64;
    imageops::replace(&mut out, &surface, -offset_x, -offset_y);
    Ok(DynamicImage::ImageRgba8(out))
}

/// Encodes `image` in memory.
pub fn encode(image: &DynamicImage, format: ImageFormat) -> RasterResult<Vec<u8>> {
    let mut bytes = Vec::new();
    flatten_for(image, format).write_to(&mut Cursor::new(&mut bytes), format)?;
    Ok(bytes)
}

/// Writes `image` to `path`, picking the format from the extension.
pub fn save(image: &DynamicImage, path: &Path) -> RasterResult<()> {
    let format = ImageFormat::from_path(path)?;
    flatten_for(image, format).save_with_format(path, format)?;
    info!(
        "Saved {}x{} image to {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}

// JPEG has no alpha channel.
fn flatten_for(image: &DynamicImage, format: ImageFormat) -> DynamicImage {
    match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
        _ => image.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Size, get_bounds};
    use crate::projector::get_state;
    use crate::vector::Vector;

    fn gradient(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(w, h, |x, y| {
            Rgba([(x * 10) as u8, (y * 10) as u8, 128, 255])
        }))
    }

    #[test]
    fn test_unrotated_matches_crop_imm() {
        let img = gradient(20, 10);
        let rendered = get_bounds(0.0, 0.0, 20.0, 10.0, 0.0);
        let pos = Vector::new(3.0, 2.0);
        let state = get_state(20.0, 10.0, 0.0, rendered, Size::new(6.0, 4.0), pos);

        let out = extract(&img, &state).unwrap();
        let expected = img.crop_imm(3, 2, 6, 4);
        assert_eq!(out.to_rgba8(), expected.to_rgba8());
    }

    #[test]
    fn test_scaled_projection() {
        let img = gradient(20, 10);
        // Rendered at half size.
        let rendered = get_bounds(100.0, 50.0, 10.0, 5.0, 0.0);
        let pos = Vector::new(102.5, 51.0);
        let state = get_state(20.0, 10.0, 0.0, rendered, Size::new(5.0, 2.5), pos);
        let out = extract(&img, &state).unwrap();
        assert_eq!((out.width(), out.height()), (10, 5));
        assert_eq!(out.to_rgba8().get_pixel(0, 0), img.to_rgba8().get_pixel(5, 2));
    }

    #[test]
    fn test_quarter_turn_surface() {
        let img = gradient(4, 2);
        let rendered = get_bounds(0.0, 0.0, 4.0, 2.0, FRAC_PI_2);
        let state = get_state(
            4.0,
            2.0,
            FRAC_PI_2,
            rendered,
            rendered.size(),
            rendered.top_left(),
        );
        let surface = render_rotated(&img, &state).unwrap();
        assert_eq!(surface.dimensions(), (2, 4));

        // Clockwise quarter turn: the source's bottom-left lands top-left.
        let src = img.to_rgba8();
        assert_eq!(surface.get_pixel(0, 0), src.get_pixel(0, 1));
        assert_eq!(surface.get_pixel(1, 0), src.get_pixel(0, 0));
        assert_eq!(surface.get_pixel(0, 3), src.get_pixel(3, 1));

        let out = extract(&img, &state).unwrap();
        assert_eq!(out.to_rgba8(), surface);
    }

    #[test]
    fn test_rotated_corners_are_transparent() {
        let img = gradient(40, 40);
        let angle = 30f64.to_radians();
        let rendered = get_bounds(0.0, 0.0, 40.0, 40.0, angle);
        let state = get_state(40.0, 40.0, angle, rendered, rendered.size(), rendered.top_left());
        let surface = render_rotated(&img, &state).unwrap();
        assert_eq!(surface.get_pixel(0, 0).0[3], 0);
        let (w, h) = surface.dimensions();
        assert!(surface.get_pixel(w / 2, h / 2).0[3] >= 254);
    }

    #[test]
    fn test_small_rotation_keeps_centre_pixels() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(30, 30, Rgba([40, 90, 200, 255])));
        let angle = 0.05;
        let rendered = get_bounds(0.0, 0.0, 30.0, 30.0, angle);
        let state = get_state(30.0, 30.0, angle, rendered, rendered.size(), rendered.top_left());
        let surface = render_rotated(&img, &state).unwrap();
        assert_eq!(surface.dimensions(), state.surface_size());
        let (w, h) = surface.dimensions();
        let centre = surface.get_pixel(w / 2, h / 2).0;
        for (got, want) in centre.into_iter().zip([40u8, 90, 200, 255]) {
            assert!(got.abs_diff(want) <= 1, "{centre:?}");
        }
    }

    #[test]
    fn test_overhanging_crop_is_padded() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 100, Rgba([9, 9, 9, 255])));
        let rendered = get_bounds(0.0, 0.0, 100.0, 100.0, 0.0);
        let pos = Vector::new(80.0, -10.0);
        let state = get_state(100.0, 100.0, 0.0, rendered, Size::new(50.0, 50.0), pos);

        let out = extract(&img, &state).unwrap().to_rgba8();
        assert_eq!(out.dimensions(), (50, 50));
        // Image pixels occupy x < 20, y >= 10.
        assert_eq!(*out.get_pixel(0, 10), Rgba([9, 9, 9, 255]));
        assert_eq!(*out.get_pixel(19, 49), Rgba([9, 9, 9, 255]));
        assert_eq!(out.get_pixel(0, 9).0[3], 0);
        assert_eq!(out.get_pixel(20, 10).0[3], 0);
        assert_eq!(out.get_pixel(49, 49).0[3], 0);
    }

    #[test]
    fn test_degenerate_state_is_rejected() {
        let img = gradient(4, 4);
        let rendered = get_bounds(0.0, 0.0, 0.0, 0.0, 0.0);
        let state = get_state(4.0, 4.0, 0.0, rendered, Size::new(2.0, 2.0), Vector::ZERO);
        assert!(matches!(
            extract(&img, &state),
            Err(RasterError::DegenerateGeometry(_))
        ));

        let rendered = get_bounds(0.0, 0.0, 4.0, 4.0, 0.0);
        let far = Vector::new(10.0, 10.0);
        let outside = get_state(4.0, 4.0, 0.0, rendered, Size::new(2.0, 2.0), far);
        assert!(matches!(extract(&img, &outside), Err(RasterError::EmptyRegion)));
    }

    #[test]
    fn test_encode_png_and_jpeg() {
        let img = gradient(8, 8);
        let png = encode(&img, ImageFormat::Png).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.to_rgba8(), img.to_rgba8());

        let jpg = encode(&img, ImageFormat::Jpeg).unwrap();
        assert_eq!(image::guess_format(&jpg).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_save_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        save(&gradient(3, 3), &path).unwrap();
        let back = image::open(&path).unwrap();
        assert_eq!((back.width(), back.height()), (3, 3));
    }
}
