//! Effects - side effects declared by the reducer, and the async work behind them

use std::sync::Arc;

use crate::action::Action;
use crate::api::{TileClient, WeatherProvider};
use crate::state::TileKey;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch current weather for `city`; the answer carries `seq` back
    LookupWeather { seq: u64, city: String },
    /// Download one map tile
    LoadTile { key: TileKey },
}

/// Runs one lookup and turns the outcome into the completion action.
pub async fn lookup_weather(provider: Arc<dyn WeatherProvider>, seq: u64, city: String) -> Action {
    tracing::info!(seq, city = %city, "weather lookup started");
    match provider.lookup(&city).await {
        Ok(report) => {
            tracing::info!(
                seq,
                city = %report.record.city_name,
                lat = report.center.lat(),
                lon = report.center.lon(),
                "weather lookup succeeded"
            );
            Action::WeatherDidLoad { seq, report }
        }
        Err(err) => {
            tracing::warn!(seq, city = %city, error = %err, "weather lookup failed");
            Action::WeatherDidError {
                seq,
                reason: err.to_string(),
            }
        }
    }
}

pub async fn load_tile(client: TileClient, key: TileKey) -> Action {
    match client.fetch(key).await {
        Ok(tile) => Action::MapTileDidLoad { key, tile },
        Err(err) => {
            tracing::debug!(tile = %key.coord(), error = %err, "tile fetch failed");
            Action::MapTileDidError {
                key,
                reason: err.to_string(),
            }
        }
    }
}

