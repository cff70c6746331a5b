//! Application state - single source of truth

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_map::core::{GeoPoint, TileCoord};
use tui_map::render::{TileRead, TileStatus};

use crate::map_view::MapViewport;

/// Fixed text of the blocking notification shown for any failed lookup.
pub const LOOKUP_FAILED_ALERT: &str = "City not found!";

/// Map center before the first successful lookup (New Delhi).
pub const DEFAULT_CENTER: MapCenter = MapCenter {
    lat: 28.6139,
    lon: 77.2090,
};

/// Tiles are downsampled to this edge length; one pixel per half cell.
pub const TILE_PIXELS: u32 = 64;
pub const TILE_RADIUS_X: u32 = 2;
pub const TILE_RADIUS_Y: u32 = 1;

/// Animation timing for the banner gradient seam.
pub const LOADING_ANIM_TICK_MS: u64 = 15;
pub const LOADING_ANIM_CYCLE_TICKS: u32 = 60;

/// Current conditions for the most recently found city.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherRecord {
    pub city_name: String,
    /// Short label such as "Rain" or "Clouds".
    pub condition_main: String,
    pub condition_description: String,
    pub temperature_celsius: f64,
}

impl WeatherRecord {
    pub fn temperature_label(&self) -> String {
        format!("{}°C", format_temperature(self.temperature_celsius))
    }
}

/// Shortest round-trip form: `15.2`, `15`, `-3.5`.
pub fn format_temperature(celsius: f64) -> String {
    if celsius == 0.0 {
        return "0".into();
    }
    format!("{}", celsius)
}

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("coordinates ({lat}, {lon}) are outside the valid range")]
pub struct CoordinateError {
    pub lat: f64,
    pub lon: f64,
}

/// A valid latitude/longitude pair. Only `new` builds one from untrusted input,
/// deserialization included.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "RawCenter")]
pub struct MapCenter {
    lat: f64,
    lon: f64,
}

/// Unchecked wire form of [`MapCenter`].
#[derive(Deserialize, JsonSchema)]
struct RawCenter {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCenter> for MapCenter {
    type Error = CoordinateError;

    fn try_from(raw: RawCenter) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lon)
    }
}

impl MapCenter {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if GeoPoint::new(lat, lon).is_valid() {
            Ok(Self { lat, lon })
        } else {
            Err(CoordinateError { lat, lon })
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn to_geo(self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

impl Default for MapCenter {
    fn default() -> Self {
        DEFAULT_CENTER
    }
}

/// A successful lookup: the record and its coordinates travel together.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LookupReport {
    pub record: WeatherRecord,
    pub center: MapCenter,
}

/// Numbers lookups so that only the newest response is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LookupSequencer {
    pub issued: u64,
    pub settled: u64,
}

impl LookupSequencer {
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    pub fn is_pending(&self) -> bool {
        self.settled < self.issued
    }

    /// Marks `seq` as answered. Returns false for stale or repeated answers.
    pub fn settle(&mut self, seq: u64) -> bool {
        if seq != self.issued || seq <= self.settled {
            return false;
        }
        self.settled = seq;
        true
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct TileKey {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileKey {
    pub fn coord(self) -> TileCoord {
        TileCoord {
            z: self.z,
            x: self.x,
            y: self.y,
        }
    }
}

impl From<TileCoord> for TileKey {
    fn from(coord: TileCoord) -> Self {
        Self {
            z: coord.z,
            x: coord.x,
            y: coord.y,
        }
    }
}

/// A decoded, downsampled tile as packed RGB rows.
#[derive(Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TileImage {
    pub size: u32,
    pub rgb: Vec<u8>,
}

impl TileImage {
    pub fn new(size: u32, rgb: Vec<u8>) -> Self {
        Self { size, rgb }
    }

    pub fn solid(size: u32, color: (u8, u8, u8)) -> Self {
        let rgb = (0..size * size)
            .flat_map(|_| [color.0, color.1, color.2])
            .collect();
        Self { size, rgb }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.size || y >= self.size {
            return None;
        }
        let idx = ((y * self.size + x) * 3) as usize;
        let px = self.rgb.get(idx..idx + 3)?;
        Some((px[0], px[1], px[2]))
    }
}

impl std::fmt::Debug for TileImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileImage")
            .field("size", &self.size)
            .field("bytes", &self.rgb.len())
            .finish()
    }
}

/// In-memory tiles around the visible map. Never persisted.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct TileStore {
    tiles: BTreeMap<TileKey, DataResource<TileImage>>,
}

impl TileStore {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, key: &TileKey) -> Option<&DataResource<TileImage>> {
        self.tiles.get(key)
    }

    /// Marks the wanted tiles as loading and returns the ones that need a fetch.
    pub fn request(
        &mut self,
        wanted: impl IntoIterator<Item = TileKey>,
        retry_failed: bool,
    ) -> Vec<TileKey> {
        let mut fetch = Vec::new();
        for key in wanted {
            let needs_fetch = match self.tiles.get(&key) {
                None | Some(DataResource::Empty) => true,
                Some(DataResource::Failed(_)) => retry_failed,
                Some(DataResource::Loading) | Some(DataResource::Loaded(_)) => false,
            };
            if needs_fetch {
                self.tiles.insert(key, DataResource::Loading);
                fetch.push(key);
            }
        }
        fetch
    }

    /// Stores a fetch result. Tiles pruned while in flight are dropped.
    pub fn resolve(&mut self, key: TileKey, result: DataResource<TileImage>) -> bool {
        match self.tiles.get_mut(&key) {
            Some(slot) => {
                *slot = result;
                true
            }
            None => false,
        }
    }

    pub fn retain(&mut self, keep: &BTreeSet<TileKey>) {
        self.tiles.retain(|key, _| keep.contains(key));
    }
}

impl TileRead for TileStore {
    fn tile_size(&self) -> u32 {
        TILE_PIXELS
    }

    fn status(&self, tile: TileCoord) -> TileStatus {
        match self.tiles.get(&TileKey::from(tile)) {
            Some(DataResource::Loaded(_)) => TileStatus::Ready,
            Some(DataResource::Loading) => TileStatus::Loading,
            Some(DataResource::Failed(_)) => TileStatus::Failed,
            Some(DataResource::Empty) | None => TileStatus::Missing,
        }
    }

    fn pixel(&self, tile: TileCoord, px: u32, py: u32) -> Option<(u8, u8, u8)> {
        let image = self.tiles.get(&TileKey::from(tile))?.data()?;
        if image.size == TILE_PIXELS {
            return image.pixel(px, py);
        }
        let scale = |v: u32| v * image.size / TILE_PIXELS;
        image.pixel(scale(px), scale(py))
    }
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    /// Text in the search field; kept after a search.
    #[debug(section = "Search", label = "Query")]
    pub search_query: String,

    #[debug(section = "Weather", label = "Record", debug_fmt)]
    pub weather: Option<WeatherRecord>,

    /// Marker position, always a valid coordinate pair.
    #[debug(section = "Map", label = "Center", debug_fmt)]
    pub map_center: MapCenter,

    #[debug(section = "Map", label = "View", debug_fmt)]
    pub map_view: MapViewport,

    #[debug(section = "Lookup", label = "Sequence", debug_fmt)]
    pub lookup: LookupSequencer,

    /// Underlying reason of the last failed lookup.
    #[debug(section = "Lookup", label = "Last error", debug_fmt)]
    pub lookup_error: Option<String>,

    #[debug(section = "Lookup", label = "Alert", debug_fmt)]
    pub alert: Option<String>,

    #[debug(skip)]
    #[serde(skip)]
    pub tiles: TileStore,

    // --- Animation internals ---
    #[debug(skip)]
    pub tick_count: u32,

    /// Remaining ticks to finish the current banner cycle after a lookup
    #[debug(skip)]
    pub loading_anim_ticks_remaining: u32,
}

impl AppState {
    pub fn is_searching(&self) -> bool {
        self.lookup.is_pending()
    }

    pub fn loading_anim_active(&self) -> bool {
        self.is_searching() || self.loading_anim_ticks_remaining > 0
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            weather: None,
            map_center: DEFAULT_CENTER,
            map_view: MapViewport::new(DEFAULT_CENTER),
            lookup: LookupSequencer::default(),
            lookup_error: None,
            alert: None,
            tiles: TileStore::default(),
            tick_count: 0,
            loading_anim_ticks_remaining: 0,
        }
    }
}
