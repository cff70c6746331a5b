//! Weather Map - current weather for a city, pinned on a tile map
//!
//! The binary wires these modules into a tui-dispatch store; the library
//! exposes them for the integration tests.

pub mod action;
pub mod api;
pub mod components;
pub mod config;
pub mod effect;
pub mod icon;
pub mod logging;
pub mod map_view;
pub mod reducer;
pub mod state;
