//! Projection of the on-screen crop rectangle into natural image pixels.

use crate::geometry::{Bounds, Size, get_bounds};
use crate::vector::Vector;

/// Where the image currently sits on screen.
///
/// `position` is the top-left of the *unrotated* image; `rotation` is applied
/// about its centre.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderedImageState {
    pub position: Vector,
    pub size: Size,
    pub rotation: f64,
}

impl RenderedImageState {
    /// Bounding box of the rotated image on screen.
    pub fn bounds(&self) -> Bounds {
        get_bounds(
            self.position.x,
            self.position.y,
            self.size.width,
            self.size.height,
            self.rotation,
        )
    }
}

/// Crop window, in the same coordinate space as the rendered image.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CropRectangle {
    pub position: Vector,
    pub size: Size,
}

impl CropRectangle {
    pub const fn new(position: Vector, size: Size) -> Self {
        Self { position, size }
    }

    pub fn from_bounds(b: &Bounds) -> Self {
        Self::new(b.top_left(), b.size())
    }

    pub fn right(&self) -> f64 {
        self.position.x + self.size.width
    }

    pub fn bottom(&self) -> f64 {
        self.position.y + self.size.height
    }

    pub fn center(&self) -> Vector {
        self.position + self.size.to_vector() * 0.5
    }

    pub fn bounds(&self) -> Bounds {
        get_bounds(
            self.position.x,
            self.position.y,
            self.size.width,
            self.size.height,
            0.0,
        )
    }

    pub fn contains(&self, p: Vector) -> bool {
        self.bounds().contains(p)
    }
}

/// Integer pixel rectangle inside the actual (natural resolution) image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Snapshot pairing the rendered geometry with its natural-pixel counterpart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedState {
    pub rendered_image_bounds: Bounds,
    pub rendered_cropper_size: Size,
    pub rendered_cropper_position: Vector,
    pub image_rotation: f64,
    /// Box the natural image occupies when rotated in place at the origin.
    pub actual_image_bounds: Bounds,
    pub actual_image_dimension: Size,
    pub ratio_to_actual: f64,
    pub actual_cropper_size: Size,
    /// Offset of the crop inside the rotated natural image's bounding box.
    pub actual_cropper_position: Vector,
}

impl ProjectedState {
    /// Rotated natural image size, rounded to whole pixels.
    pub fn surface_size(&self) -> (u32, u32) {
        (
            to_pixels(self.actual_image_dimension.width),
            to_pixels(self.actual_image_dimension.height),
        )
    }

    /// Size of the extracted image: the actual crop size rounded to whole
    /// pixels, whether or not the crop lies inside the rotated image.
    pub fn output_size(&self) -> (u32, u32) {
        (
            to_pixels(self.actual_cropper_size.width),
            to_pixels(self.actual_cropper_size.height),
        )
    }

    /// The part of the actual crop rectangle covered by the rotated image
    /// surface, snapped to whole pixels. `None` when they do not overlap.
    pub fn actual_crop_region(&self) -> Option<PixelRegion> {
        let (surface_w, surface_h) = self.surface_size();
        let pos = self.actual_cropper_position;
        let size = self.actual_cropper_size;
        if !pos.is_finite() || size.is_degenerate() {
            return None;
        }

        let x0 = pos.x.round().clamp(0.0, surface_w as f64);
        let y0 = pos.y.round().clamp(0.0, surface_h as f64);
        let x1 = (pos.x + size.width).round().clamp(0.0, surface_w as f64);
        let y1 = (pos.y + size.height).round().clamp(0.0, surface_h as f64);

        let region = PixelRegion {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        };
        (region.width > 0 && region.height > 0).then_some(region)
    }
}

fn to_pixels(v: f64) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.round() as u32
    } else {
        0
    }
}

/// Maps a crop rectangle in rendered coordinates onto the natural image.
///
/// The scale between rendered and natural space is taken from the widths
/// alone and applied to both axes, so the rendered image must keep the
/// natural aspect ratio. A zero-width rendered image yields non-finite
/// output.
pub fn get_state(
    natural_width: f64,
    natural_height: f64,
    rendered_rotation: f64,
    rendered_image_bounds: Bounds,
    rendered_cropper_size: Size,
    rendered_cropper_position: Vector,
) -> ProjectedState {
    let actual_image_bounds =
        get_bounds(0.0, 0.0, natural_width, natural_height, rendered_rotation);
    let actual_image_dimension = actual_image_bounds.size();

    let ratio_to_actual = actual_image_dimension.width / rendered_image_bounds.width();

    let actual_cropper_size = rendered_cropper_size.mult(ratio_to_actual);
    let dist_cropper_to_image = rendered_cropper_position - rendered_image_bounds.top_left();
    let actual_cropper_position = dist_cropper_to_image * ratio_to_actual;

    ProjectedState {
        rendered_image_bounds,
        rendered_cropper_size,
        rendered_cropper_position,
        image_rotation: rendered_rotation,
        actual_image_bounds,
        actual_image_dimension,
        ratio_to_actual,
        actual_cropper_size,
        actual_cropper_position,
    }
}

/// [`get_state`] for a rendered image and crop rectangle.
pub fn project(natural: Size, image: &RenderedImageState, crop: &CropRectangle) -> ProjectedState {
    get_state(
        natural.width,
        natural.height,
        image.rotation,
        image.bounds(),
        crop.size,
        crop.position,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_half_scale_scenario() {
        let rendered = get_bounds(0.0, 0.0, 500.0, 250.0, 0.0);
        let state = get_state(
            1000.0,
            500.0,
            0.0,
            rendered,
            Size::new(100.0, 50.0),
            Vector::new(50.0, 25.0),
        );
        assert_eq!(state.ratio_to_actual, 2.0);
        assert_eq!(state.actual_cropper_size, Size::new(200.0, 100.0));
        assert_eq!(state.actual_cropper_position, Vector::new(100.0, 50.0));
        assert_eq!(state.actual_image_dimension, Size::new(1000.0, 500.0));
    }

    #[test]
    fn test_identity_projection() {
        let image = RenderedImageState {
            position: Vector::new(40.0, 30.0),
            size: Size::new(640.0, 480.0),
            rotation: 0.0,
        };
        let crop = CropRectangle::new(Vector::new(100.0, 90.0), Size::new(120.0, 80.0));
        let state = project(Size::new(640.0, 480.0), &image, &crop);
        assert_eq!(state.actual_cropper_size, crop.size);
        assert_eq!(state.actual_cropper_position, crop.position - image.position);
    }

    #[test]
    fn test_linear_in_crop_size() {
        let rendered = get_bounds(10.0, 10.0, 300.0, 200.0, 0.4);
        let pos = Vector::new(50.0, 60.0);
        let base = get_state(900.0, 600.0, 0.4, rendered, Size::new(40.0, 30.0), pos);
        let scaled = get_state(900.0, 600.0, 0.4, rendered, Size::new(120.0, 90.0), pos);
        assert_abs_diff_eq!(
            scaled.actual_cropper_size.width,
            base.actual_cropper_size.width * 3.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            scaled.actual_cropper_size.height,
            base.actual_cropper_size.height * 3.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_rotated_projection_uses_rotated_extent() {
        let image = RenderedImageState {
            position: Vector::new(0.0, 0.0),
            size: Size::new(200.0, 100.0),
            rotation: FRAC_PI_2,
        };
        let bounds = image.bounds();
        let crop = CropRectangle::from_bounds(&bounds);
        let state = project(Size::new(400.0, 200.0), &image, &crop);
        assert_abs_diff_eq!(state.ratio_to_actual, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(state.actual_image_dimension.width, 200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(state.actual_image_dimension.height, 400.0, epsilon = 1e-9);
        assert_abs_diff_eq!(state.actual_cropper_position.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(state.actual_cropper_position.y, 0.0, epsilon = 1e-9);
        assert_eq!(
            state.actual_crop_region(),
            Some(PixelRegion { x: 0, y: 0, width: 200, height: 400 })
        );
    }

    #[test]
    fn test_overhanging_crop_keeps_output_size() {
        let rendered = get_bounds(0.0, 0.0, 100.0, 100.0, 0.0);
        let pos = Vector::new(80.0, -10.0);
        let state = get_state(100.0, 100.0, 0.0, rendered, Size::new(50.0, 50.0), pos);
        assert_eq!(state.output_size(), (50, 50));
        assert_eq!(
            state.actual_crop_region(),
            Some(PixelRegion { x: 80, y: 0, width: 20, height: 40 })
        );
    }

    #[test]
    fn test_degenerate_input_propagates() {
        let rendered = get_bounds(0.0, 0.0, 0.0, 0.0, 0.0);
        let state = get_state(100.0, 100.0, 0.0, rendered, Size::new(10.0, 10.0), Vector::ZERO);
        assert!(!state.ratio_to_actual.is_finite());
        assert_eq!(state.actual_crop_region(), None);
    }
}
