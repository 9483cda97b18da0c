//! Coordinate and geometry types shared across the engine and the magnifier.
//!
//! Two pixel spaces appear in this workspace:
//! - logical pixels (DPI-independent), used by input and configuration
//! - device pixels (logical × pixel ratio), used by render targets
//!
//! Pointer positions from the input layer are top-left origin; the magnifier
//! works in bottom-left origin UI space and converts at its boundary.

mod color;
mod size;
mod vec2;
mod viewport;

pub use color::ColorRgba;
pub use size::Size;
pub use vec2::Vec2;
pub use viewport::Viewport;
