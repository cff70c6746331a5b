//! Slippy-map math and a half-block raster renderer for terminal maps.

pub mod core;
pub mod prelude;
#[cfg(feature = "ratatui")]
pub mod render;
pub mod source;
