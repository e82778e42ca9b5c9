//! Crop rectangle interaction: handle hit testing, resizing and panning.
//!
//! Every function takes the crop rectangle as it was when the drag began plus
//! the drag-start and current pointer positions, and returns the rectangle for
//! the current pointer position.

use crate::geometry::Size;
use crate::projector::CropRectangle;
use crate::vector::Vector;

/// Smallest width or height a handle drag can produce, in rendered units.
pub const MIN_CROP_SIZE: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    Left,
    Top,
    Right,
    Bottom,
}

impl ResizeHandle {
    pub const ALL: [Self; 8] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomRight,
        Self::BottomLeft,
        Self::Left,
        Self::Top,
        Self::Right,
        Self::Bottom,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Self::TopLeft | Self::TopRight | Self::BottomRight | Self::BottomLeft
        )
    }

    fn moves_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::BottomLeft | Self::Left)
    }

    fn moves_right(self) -> bool {
        matches!(self, Self::TopRight | Self::BottomRight | Self::Right)
    }

    fn moves_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight | Self::Top)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, Self::BottomLeft | Self::BottomRight | Self::Bottom)
    }

    /// Where this handle sits on `crop`.
    pub fn point_on(self, crop: &CropRectangle) -> Vector {
        let c = crop.center();
        let (l, t, r, b) = (crop.position.x, crop.position.y, crop.right(), crop.bottom());
        match self {
            Self::TopLeft => Vector::new(l, t),
            Self::TopRight => Vector::new(r, t),
            Self::BottomRight => Vector::new(r, b),
            Self::BottomLeft => Vector::new(l, b),
            Self::Left => Vector::new(l, c.y),
            Self::Top => Vector::new(c.x, t),
            Self::Right => Vector::new(r, c.y),
            Self::Bottom => Vector::new(c.x, b),
        }
    }
}

/// What a pointer drag is manipulating.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragTarget {
    Handle(ResizeHandle),
    /// The crop body; the drag pans the rectangle.
    Body,
    /// The rotation bar below the image.
    Rotation,
}

/// Finds what sits under `pos`: corners win over edges, edges over the body.
pub fn hit_test(pos: Vector, crop: &CropRectangle, tolerance: f64) -> Option<DragTarget> {
    let (l, t, r, b) = (crop.position.x, crop.position.y, crop.right(), crop.bottom());

    let corner = [
        ResizeHandle::TopLeft,
        ResizeHandle::TopRight,
        ResizeHandle::BottomLeft,
        ResizeHandle::BottomRight,
    ]
    .into_iter()
    .find(|h| pos.distance_to(h.point_on(crop)) < tolerance);
    if let Some(h) = corner {
        return Some(DragTarget::Handle(h));
    }

    let within_y = pos.y > t && pos.y < b;
    let within_x = pos.x > l && pos.x < r;
    if (pos.x - l).abs() < tolerance && within_y {
        return Some(DragTarget::Handle(ResizeHandle::Left));
    }
    if (pos.x - r).abs() < tolerance && within_y {
        return Some(DragTarget::Handle(ResizeHandle::Right));
    }
    if (pos.y - t).abs() < tolerance && within_x {
        return Some(DragTarget::Handle(ResizeHandle::Top));
    }
    if (pos.y - b).abs() < tolerance && within_x {
        return Some(DragTarget::Handle(ResizeHandle::Bottom));
    }

    if crop.contains(pos) {
        return Some(DragTarget::Body);
    }

    None
}

/// Resolves handle drags with a configurable minimum crop size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resizer {
    pub min_size: f64,
}

impl Default for Resizer {
    fn default() -> Self {
        Self {
            min_size: MIN_CROP_SIZE,
        }
    }
}

impl Resizer {
    pub fn new(min_size: f64) -> Self {
        Self {
            min_size: min_size.max(0.0),
        }
    }

    /// New crop rectangle after dragging `handle` from `drag_start` to
    /// `mouse`, kept inside the image area.
    ///
    /// Corner handles keep the aspect ratio `crop` had when the drag began;
    /// edge handles change one dimension freely. The position is clamped to
    /// the image's top-left first, then the size is cut to what remains of
    /// the image from there.
    pub fn resize(
        &self,
        handle: ResizeHandle,
        image_size: Size,
        image_position: Vector,
        crop: CropRectangle,
        drag_start: Vector,
        mouse: Vector,
    ) -> CropRectangle {
        let delta = mouse - drag_start;
        let ratio = crop.size.aspect_ratio();
        let anchor_right = crop.right();
        let anchor_bottom = crop.bottom();

        let mut w = crop.size.width;
        let mut h = crop.size.height;

        if handle.moves_left() {
            w -= delta.x;
        } else if handle.moves_right() {
            w += delta.x;
        }
        if handle.is_corner() {
            h = w / ratio;
        } else if handle == ResizeHandle::Top {
            h -= delta.y;
        } else if handle == ResizeHandle::Bottom {
            h += delta.y;
        }

        // Floor before positioning so a handle dragged across the opposite
        // edge leaves a thin rectangle instead of an inverted one.
        if handle.is_corner() {
            let min_w = self.min_size.max(self.min_size * ratio);
            if w < min_w {
                w = min_w;
                h = w / ratio;
            }
        } else if handle.moves_left() || handle.moves_right() {
            w = w.max(self.min_size);
        } else {
            h = h.max(self.min_size);
        }

        let x = if handle.moves_left() {
            anchor_right - w
        } else {
            crop.position.x
        };
        let y = if handle.moves_top() {
            anchor_bottom - h
        } else {
            crop.position.y
        };

        // Position first, then size: a rectangle pushed past the left or top
        // edge slides back inside and is cut at the far edge if it still
        // overhangs. Corners re-derive the cross dimension only when cut.
        let image_right = image_position.x + image_size.width;
        let image_bottom = image_position.y + image_size.height;
        let x = x.max(image_position.x);
        let y = y.max(image_position.y);

        if x + w > image_right {
            w = image_right - x;
            if handle.is_corner() {
                h = w / ratio;
            }
        }
        if y + h > image_bottom {
            h = image_bottom - y;
            if handle.is_corner() {
                w = h * ratio;
            }
        }

        log::trace!("resize {handle:?}: delta={delta:?} -> ({x}, {y}) {w}x{h}");
        CropRectangle::new(Vector::new(x, y), Size::new(w, h))
    }
}

/// [`Resizer::resize`] with the default minimum crop size.
pub fn resize(
    handle: ResizeHandle,
    image_size: Size,
    image_position: Vector,
    crop: CropRectangle,
    drag_start: Vector,
    mouse: Vector,
) -> CropRectangle {
    Resizer::default().resize(handle, image_size, image_position, crop, drag_start, mouse)
}

/// Pans `crop` by the drag delta, stopping at the image edges.
pub fn move_crop(
    image_size: Size,
    image_position: Vector,
    crop: CropRectangle,
    drag_start: Vector,
    mouse: Vector,
) -> CropRectangle {
    let target = crop.position + (mouse - drag_start);
    let max_x = (image_position.x + image_size.width - crop.size.width).max(image_position.x);
    let max_y = (image_position.y + image_size.height - crop.size.height).max(image_position.y);
    CropRectangle::new(
        Vector::new(
            target.x.clamp(image_position.x, max_x),
            target.y.clamp(image_position.y, max_y),
        ),
        crop.size,
    )
}
