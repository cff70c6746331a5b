//! Command-line configuration

use std::path::PathBuf;

use clap::Parser;
use tui_dispatch_debug::DebugCliArgs;
use tui_map::source::{TemplateError, TileSource, OSM_ATTRIBUTION, OSM_TEMPLATE};

use crate::api::OPENWEATHER_ENDPOINT;

/// Weather Map - look up a city's weather and see it on a map
#[derive(Parser, Debug)]
#[command(name = "weathermap")]
#[command(about = "Look up current weather for a city and show it on a map")]
pub struct Args {
    /// OpenWeatherMap API key
    #[arg(long, env = "WEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Current-weather endpoint (override for testing or proxies)
    #[arg(long, default_value = OPENWEATHER_ENDPOINT)]
    pub weather_endpoint: String,

    /// Raster tile URL template with {z}/{x}/{y} and optional {s}
    #[arg(long, default_value = OSM_TEMPLATE)]
    pub tile_url: String,

    /// Subdomains substituted for {s}
    #[arg(long, value_delimiter = ',', default_value = "a,b,c")]
    pub tile_subdomains: Vec<String>,

    /// Write logs to this file (the terminal is owned by the UI)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub debug: DebugCliArgs,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid --tile-url: {0}")]
    TileTemplate(#[from] TemplateError),
}

/// Settings resolved from [`Args`], ready for the clients.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub weather_endpoint: String,
    pub tile_source: TileSource,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let api_key = args
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string);

        let tile_source = TileSource::builder(args.tile_url.clone())
            .subdomains(args.tile_subdomains.iter().map(|s| s.trim().to_string()))
            .attribution(OSM_ATTRIBUTION)
            .build()?;

        Ok(Self {
            api_key,
            weather_endpoint: args.weather_endpoint.clone(),
            tile_source,
            log_file: args.log_file.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_map::core::TileCoord;

    #[test]
    fn defaults_use_openstreetmap() {
        let args = Args::try_parse_from(["weathermap", "--api-key", "secret"]).expect("args");
        let config = AppConfig::from_args(&args).expect("config");

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.weather_endpoint, OPENWEATHER_ENDPOINT);
        assert_eq!(config.tile_source.attribution(), OSM_ATTRIBUTION);
        assert_eq!(
            config.tile_source.url_for(TileCoord { z: 1, x: 0, y: 1 }),
            "https://b.tile.openstreetmap.org/1/0/1.png"
        );
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let args = Args::try_parse_from(["weathermap", "--api-key", "   "]).expect("args");
        let config = AppConfig::from_args(&args).expect("config");
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn custom_tile_template() {
        let args = Args::try_parse_from([
            "weathermap",
            "--tile-url",
            "http://{s}.tiles.local/{z}/{x}/{y}.png",
            "--tile-subdomains",
            "t1,t2",
        ])
        .expect("args");
        let config = AppConfig::from_args(&args).expect("config");
        assert_eq!(
            config.tile_source.url_for(TileCoord { z: 2, x: 1, y: 0 }),
            "http://t2.tiles.local/2/1/0.png"
        );
    }

    #[test]
    fn invalid_tile_template_is_rejected() {
        let args =
            Args::try_parse_from(["weathermap", "--tile-url", "http://tiles/{z}/{x}.png"]).expect("args");
        assert!(matches!(
            AppConfig::from_args(&args),
            Err(ConfigError::TileTemplate(TemplateError::MissingPlaceholder("{y}")))
        ));
    }
}
