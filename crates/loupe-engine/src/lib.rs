//! Loupe engine crate.
//!
//! This crate owns the platform + GPU runtime pieces the magnifier and the
//! studio are built on: window loop, device/surface, input, frame timing.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
