//! Actions: user intents, async results and timer events

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{LookupReport, TileImage, TileKey};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Search category =====
    /// Search field text changed
    SearchQueryChange(String),

    /// Enter or the Search button: look up the current query
    SearchSubmit,

    // ===== Weather results =====
    /// Result: lookup `seq` found the city
    WeatherDidLoad { seq: u64, report: LookupReport },

    /// Result: lookup `seq` failed for any reason
    WeatherDidError { seq: u64, reason: String },

    // ===== Alert category =====
    /// Dismiss the "City not found!" notification
    AlertClose,

    // ===== Map =====
    MapZoomIn,
    MapZoomOut,

    /// Request missing tiles around the view (retries failed ones)
    MapRefreshTiles,

    MapTileDidLoad { key: TileKey, tile: TileImage },

    MapTileDidError { key: TileKey, reason: String },

    /// Force a re-render (for cursor movement, etc.)
    Render,

    // ===== Uncategorized (global) =====
    /// Periodic tick for animations
    Tick,

    /// Exit the application
    Quit,
}
