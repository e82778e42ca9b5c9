//! # crop_engine
//!
//! Geometry for an interactive, rotation-aware image cropper.
//!
//! The engine converts between *rendered* coordinates (the image as drawn on
//! screen, scaled and rotated) and *actual* coordinates (natural image
//! pixels). All geometry is pure: functions take value snapshots and return
//! new ones, and nothing is cached between calls.
//!
//! - [`vector`] - immutable 2D vector
//! - [`geometry`] - sizes, bounds and [`get_bounds`]
//! - [`projector`] - [`get_state`], rendered crop to natural pixels
//! - [`resize`] - handle drags, hit testing and panning
//! - [`aspect`] - aspect ratio presets
//! - [`rotation`] - rotation bar layout
//! - [`raster`] - rotating, cropping and encoding pixels
//!
//! ```rust
//! use crop_engine::{Size, Vector, get_bounds, get_state};
//!
//! // A 1000x500 image drawn at half size.
//! let rendered = get_bounds(0.0, 0.0, 500.0, 250.0, 0.0);
//! let crop_size = Size::new(100.0, 50.0);
//! let state = get_state(1000.0, 500.0, 0.0, rendered, crop_size, Vector::new(50.0, 25.0));
//! assert_eq!(state.actual_cropper_size, Size::new(200.0, 100.0));
//! assert_eq!(state.actual_cropper_position, Vector::new(100.0, 50.0));
//! ```

pub mod aspect;
pub mod config;
mod error;
pub mod geometry;
pub mod projector;
pub mod raster;
pub mod resize;
pub mod rotation;
pub mod vector;

pub use aspect::{AspectRatioMode, fit_to_ratio};
pub use config::CropperConfig;
pub use error::{ConfigError, RasterError, RasterResult};
pub use geometry::{Bounds, Size, get_bounds};
pub use projector::{CropRectangle, PixelRegion, ProjectedState, RenderedImageState, get_state};
pub use resize::{DragTarget, ResizeHandle, Resizer, hit_test, move_crop, resize};
pub use vector::Vector;
