//! Aspect ratio presets and fitting a crop rectangle to one.

use crate::geometry::Size;
use crate::projector::CropRectangle;
use crate::vector::Vector;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AspectRatioMode {
    #[default]
    Free,
    Original,
    Square,
    // Landscape
    R3_2,
    R4_3,
    R16_9,
    R16_10,
    // Portrait
    R2_3,
    R3_4,
    R9_16,
    R10_16,
    Custom,
}

impl AspectRatioMode {
    pub const LANDSCAPE: [Self; 4] = [Self::R3_2, Self::R4_3, Self::R16_9, Self::R16_10];
    pub const PORTRAIT: [Self; 4] = [Self::R2_3, Self::R3_4, Self::R9_16, Self::R10_16];

    /// Same preset in the other orientation.
    pub fn counterpart(self) -> Self {
        match self {
            Self::R3_2 => Self::R2_3,
            Self::R4_3 => Self::R3_4,
            Self::R16_9 => Self::R9_16,
            Self::R16_10 => Self::R10_16,
            Self::R2_3 => Self::R3_2,
            Self::R3_4 => Self::R4_3,
            Self::R9_16 => Self::R16_9,
            Self::R10_16 => Self::R16_10,
            other => other,
        }
    }

    /// Width over height for this mode, `None` for free-form cropping.
    ///
    /// `image` is the natural image size used by [`AspectRatioMode::Original`];
    /// `custom` is the `w:h` pair used by [`AspectRatioMode::Custom`].
    pub fn ratio(self, image: Size, custom: (u32, u32)) -> Option<f64> {
        match self {
            Self::Free => None,
            Self::Original => Some(image.aspect_ratio()),
            Self::Square => Some(1.0),
            Self::R3_2 => Some(3.0 / 2.0),
            Self::R4_3 => Some(4.0 / 3.0),
            Self::R16_9 => Some(16.0 / 9.0),
            Self::R16_10 => Some(16.0 / 10.0),
            Self::R2_3 => Some(2.0 / 3.0),
            Self::R3_4 => Some(3.0 / 4.0),
            Self::R9_16 => Some(9.0 / 16.0),
            Self::R10_16 => Some(10.0 / 16.0),
            Self::Custom => Some(custom.0.max(1) as f64 / custom.1.max(1) as f64),
        }
    }
}

impl std::fmt::Display for AspectRatioMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AspectRatioMode::Free => "Free",
            AspectRatioMode::Original => "Original",
            AspectRatioMode::Square => "1:1",
            AspectRatioMode::R3_2 => "3:2",
            AspectRatioMode::R4_3 => "4:3",
            AspectRatioMode::R16_9 => "16:9",
            AspectRatioMode::R16_10 => "16:10",
            AspectRatioMode::R2_3 => "2:3",
            AspectRatioMode::R3_4 => "3:4",
            AspectRatioMode::R9_16 => "9:16",
            AspectRatioMode::R10_16 => "10:16",
            AspectRatioMode::Custom => "Custom",
        };
        write!(f, "{}", s)
    }
}

/// Reshapes `crop` to `ratio` around its centre, keeping its major dimension,
/// then shrinks and shifts it until it lies inside `area`.
pub fn fit_to_ratio(crop: &CropRectangle, area: &CropRectangle, ratio: f64) -> CropRectangle {
    let center = crop.center();
    let max_dim = crop.size.width.max(crop.size.height);

    let (mut w, mut h) = if ratio >= 1.0 {
        (max_dim, max_dim / ratio)
    } else {
        (max_dim * ratio, max_dim)
    };

    // Fit to bounds if necessary
    if w > area.size.width {
        w = area.size.width;
        h = w / ratio;
    }
    if h > area.size.height {
        h = area.size.height;
        w = h * ratio;
    }

    let x = (center.x - w * 0.5).clamp(area.position.x, (area.right() - w).max(area.position.x));
    let y = (center.y - h * 0.5).clamp(area.position.y, (area.bottom() - h).max(area.position.y));
    CropRectangle::new(Vector::new(x, y), Size::new(w, h))
}

/// Largest rectangle of `ratio` centred in `area`; the whole area for `None`.
pub fn initial_crop(area: &CropRectangle, ratio: Option<f64>) -> CropRectangle {
    match ratio {
        Some(r) => {
            let full = if r >= 1.0 {
                area.size.width
            } else {
                area.size.height
            };
            let seed = CropRectangle::new(
                area.center() - Vector::new(full, full) * 0.5,
                Size::new(full, full),
            );
            fit_to_ratio(&seed, area, r)
        }
        None => *area,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn area() -> CropRectangle {
        CropRectangle::new(Vector::new(0.0, 0.0), Size::new(400.0, 300.0))
    }

    #[test]
    fn test_counterpart_is_involution() {
        for m in AspectRatioMode::LANDSCAPE {
            assert!(AspectRatioMode::PORTRAIT.contains(&m.counterpart()));
            assert_eq!(m.counterpart().counterpart(), m);
        }
        assert_eq!(AspectRatioMode::Square.counterpart(), AspectRatioMode::Square);
    }

    #[test]
    fn test_ratios() {
        let img = Size::new(1000.0, 500.0);
        assert_eq!(AspectRatioMode::Free.ratio(img, (4, 3)), None);
        assert_eq!(AspectRatioMode::Original.ratio(img, (4, 3)), Some(2.0));
        assert_eq!(AspectRatioMode::R16_9.ratio(img, (4, 3)), Some(16.0 / 9.0));
        assert_eq!(AspectRatioMode::Custom.ratio(img, (5, 0)), Some(5.0));
        assert_eq!(AspectRatioMode::R9_16.to_string(), "9:16");
    }

    #[test]
    fn test_fit_keeps_center_when_room() {
        let crop = CropRectangle::new(Vector::new(100.0, 100.0), Size::new(100.0, 50.0));
        let out = fit_to_ratio(&crop, &area(), 1.0);
        assert_eq!(out.size, Size::new(100.0, 100.0));
        assert_eq!(out.center(), crop.center());
    }

    #[test]
    fn test_fit_shrinks_and_shifts_inside() {
        let crop = CropRectangle::new(Vector::new(0.0, 0.0), Size::new(400.0, 300.0));
        let out = fit_to_ratio(&crop, &area(), 16.0 / 9.0);
        assert_abs_diff_eq!(out.size.aspect_ratio(), 16.0 / 9.0, epsilon = 1e-12);
        assert!(out.position.x >= 0.0 && out.position.y >= 0.0);
        assert!(out.right() <= 400.0 + 1e-9 && out.bottom() <= 300.0 + 1e-9);

        let tall = fit_to_ratio(&crop, &area(), 9.0 / 16.0);
        assert_abs_diff_eq!(tall.size.height, 300.0, epsilon = 1e-9);
        assert_abs_diff_eq!(tall.size.aspect_ratio(), 9.0 / 16.0, epsilon = 1e-12);
    }

    #[test]
    fn test_initial_crop() {
        assert_eq!(initial_crop(&area(), None), area());
        let sq = initial_crop(&area(), Some(1.0));
        assert_eq!(sq.size, Size::new(300.0, 300.0));
        assert_eq!(sq.position, Vector::new(50.0, 0.0));
    }
}
