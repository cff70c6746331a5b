//! OpenWeatherMap and map tile clients

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tui_map::source::TileSource;

use crate::state::{
    CoordinateError, LookupReport, MapCenter, TileImage, TileKey, WeatherRecord, TILE_PIXELS,
};

pub const OPENWEATHER_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Tile servers require an identifying User-Agent.
pub const USER_AGENT: &str = concat!("weathermap/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Weather API
// ============================================================================

#[derive(thiserror::Error, Debug)]
pub enum LookupError {
    #[error("missing OpenWeatherMap API key")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Request(String),
    #[error("weather service answered HTTP {0}")]
    Status(u16),
    #[error("response parse error: {0}")]
    Parse(String),
    #[error(transparent)]
    InvalidCoordinates(#[from] CoordinateError),
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn lookup(&self, city: &str) -> Result<LookupReport, LookupError>;
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    coord: OwCoord,
    weather: Vec<OwWeather>,
    main: OwMain,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

/// Current-weather endpoint of OpenWeatherMap, metric units.
#[derive(Clone, Debug)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: OPENWEATHER_ENDPOINT.to_string(),
            api_key,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn request_url(&self, city: &str, api_key: &str) -> String {
        format!(
            "{}?q={}&appid={}&units=metric",
            self.endpoint,
            urlencoding::encode(city),
            urlencoding::encode(api_key)
        )
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn lookup(&self, city: &str) -> Result<LookupReport, LookupError> {
        let api_key = self.api_key.as_deref().ok_or(LookupError::MissingApiKey)?;
        let url = self.request_url(city, api_key);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))?;
        parse_current_weather(&body)
    }
}

/// Extracts the fields the app shows from a current-weather JSON body.
pub fn parse_current_weather(body: &str) -> Result<LookupReport, LookupError> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).map_err(|e| LookupError::Parse(e.to_string()))?;

    let condition = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::Parse("response has no weather entries".into()))?;
    let center = MapCenter::new(parsed.coord.lat, parsed.coord.lon)?;

    Ok(LookupReport {
        record: WeatherRecord {
            city_name: parsed.name,
            condition_main: condition.main,
            condition_description: condition.description,
            temperature_celsius: parsed.main.temp,
        },
        center,
    })
}

// ============================================================================
// Tile API
// ============================================================================

#[derive(thiserror::Error, Debug)]
pub enum TileError {
    #[error("tile request failed: {0}")]
    Request(String),
    #[error("tile server answered HTTP {0}")]
    Status(u16),
    #[error("tile decode failed: {0}")]
    Decode(String),
}

/// Downloads raster tiles and shrinks them to `TILE_PIXELS`.
#[derive(Clone, Debug)]
pub struct TileClient {
    client: reqwest::Client,
    source: Arc<TileSource>,
}

impl TileClient {
    pub fn new(source: TileSource) -> Result<Self, TileError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TileError::Request(e.to_string()))?;
        Ok(Self {
            client,
            source: Arc::new(source),
        })
    }

    pub async fn fetch(&self, key: TileKey) -> Result<TileImage, TileError> {
        let url = self.source.url_for(key.coord());
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TileError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TileError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TileError::Request(e.to_string()))?;
        decode_tile(&bytes)
    }
}

pub fn decode_tile(bytes: &[u8]) -> Result<TileImage, TileError> {
    let image = image::load_from_memory(bytes).map_err(|e| TileError::Decode(e.to_string()))?;
    let rgb = image
        .resize_exact(
            TILE_PIXELS,
            TILE_PIXELS,
            image::imageops::FilterType::Triangle,
        )
        .to_rgb8();
    Ok(TileImage::new(TILE_PIXELS, rgb.into_raw()))
}
