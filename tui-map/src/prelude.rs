pub use crate::core::{
    project, tile_at, tiles_around, tiles_per_axis, unproject, world_size, wrap_longitude,
    wrap_tile_x, CoreError, GeoPoint, TileCoord, WorldPoint, MAX_LATITUDE, MAX_ZOOM,
};
pub use crate::source::{
    TemplateError, TileSource, TileSourceBuilder, OSM_ATTRIBUTION, OSM_SUBDOMAINS, OSM_TEMPLATE,
};

#[cfg(feature = "ratatui")]
pub use crate::render::{
    adjust_color, cell_seed, tile_seed, Camera, MapRenderResult, MapRenderer, MapRendererBuilder,
    PlaceholderTheme, PlaceholderThemeBuilder, RenderConfig, TextureVariant, TilePaint,
    TilePalette, TileRead, TileStatus,
};
