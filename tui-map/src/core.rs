use std::f64::consts::PI;
use std::fmt;

/// Highest zoom level the renderer and tile requests accept.
pub const MAX_ZOOM: u8 = 19;

/// Web-mercator cuts the poles off at this latitude.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Position in map pixels at a given zoom, origin at the north-west corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

impl WorldPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: WorldPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn lerp(self, other: WorldPoint, t: f64) -> WorldPoint {
        WorldPoint {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u8, x: u32, y: u32) -> Result<Self, CoreError> {
        if z > MAX_ZOOM {
            return Err(CoreError::ZoomOutOfRange(z));
        }
        let n = tiles_per_axis(z);
        if x >= n || y >= n {
            return Err(CoreError::TileOutOfRange { z, x, y });
        }
        Ok(Self { z, x, y })
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoreError {
    ZoomOutOfRange(u8),
    TileOutOfRange { z: u8, x: u32, y: u32 },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::ZoomOutOfRange(z) => {
                write!(f, "zoom {} is outside 0..={}", z, MAX_ZOOM)
            }
            CoreError::TileOutOfRange { z, x, y } => {
                write!(f, "tile {}/{}/{} does not exist at zoom {}", z, x, y, z)
            }
        }
    }
}

impl std::error::Error for CoreError {}

pub fn tiles_per_axis(zoom: u8) -> u32 {
    1u32 << zoom.min(MAX_ZOOM)
}

/// Edge length of the whole world in map pixels.
pub fn world_size(zoom: u8, tile_size: u32) -> f64 {
    tiles_per_axis(zoom) as f64 * tile_size as f64
}

pub fn project(point: GeoPoint, zoom: u8, tile_size: u32) -> WorldPoint {
    let size = world_size(zoom, tile_size);
    let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (point.lon + 180.0) / 360.0;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0;
    WorldPoint::new(x * size, y * size)
}

pub fn unproject(world: WorldPoint, zoom: u8, tile_size: u32) -> GeoPoint {
    let size = world_size(zoom, tile_size);
    let lon = world.x / size * 360.0 - 180.0;
    let n = PI * (1.0 - 2.0 * world.y / size);
    GeoPoint::new(n.sinh().atan().to_degrees(), wrap_longitude(lon))
}

pub fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        return lon;
    }
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

pub fn wrap_tile_x(tx: i64, zoom: u8) -> u32 {
    let n = tiles_per_axis(zoom) as i64;
    tx.rem_euclid(n) as u32
}

/// Tile containing a world position. Columns wrap around the antimeridian,
/// rows above or below the projection return `None`.
pub fn tile_at(world: WorldPoint, zoom: u8, tile_size: u32) -> Option<TileCoord> {
    let size = tile_size.max(1) as f64;
    let ty = (world.y / size).floor() as i64;
    if ty < 0 || ty >= tiles_per_axis(zoom) as i64 {
        return None;
    }
    let tx = wrap_tile_x((world.x / size).floor() as i64, zoom);
    Some(TileCoord {
        z: zoom.min(MAX_ZOOM),
        x: tx,
        y: ty as u32,
    })
}

/// Every tile within `radius_x` columns and `radius_y` rows of the tile
/// holding `center`, deduplicated and sorted.
pub fn tiles_around(
    center: GeoPoint,
    zoom: u8,
    tile_size: u32,
    radius_x: u32,
    radius_y: u32,
) -> Vec<TileCoord> {
    let zoom = zoom.min(MAX_ZOOM);
    let world = project(center, zoom, tile_size);
    let size = tile_size.max(1) as f64;
    let cx = (world.x / size).floor() as i64;
    let cy = (world.y / size).floor() as i64;
    let n = tiles_per_axis(zoom) as i64;

    let mut tiles = Vec::new();
    for dy in -(radius_y as i64)..=radius_y as i64 {
        let ty = cy + dy;
        if ty < 0 || ty >= n {
            continue;
        }
        for dx in -(radius_x as i64)..=radius_x as i64 {
            tiles.push(TileCoord {
                z: zoom,
                x: wrap_tile_x(cx + dx, zoom),
                y: ty as u32,
            });
        }
    }
    tiles.sort();
    tiles.dedup();
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON: GeoPoint = GeoPoint::new(51.5074, -0.1278);

    #[test]
    fn project_origin_is_world_center() {
        let p = project(GeoPoint::new(0.0, 0.0), 0, 256);
        assert!((p.x - 128.0).abs() < 1e-9);
        assert!((p.y - 128.0).abs() < 1e-9);
    }

    #[test]
    fn london_lands_on_known_tile() {
        let world = project(LONDON, 12, 1);
        let tile = tile_at(world, 12, 1).expect("tile");
        assert_eq!(tile, TileCoord { z: 12, x: 2046, y: 1362 });
    }

    #[test]
    fn unproject_inverts_project() {
        let world = project(LONDON, 12, 64);
        let back = unproject(world, 12, 64);
        assert!((back.lat - LONDON.lat).abs() < 1e-9);
        assert!((back.lon - LONDON.lon).abs() < 1e-9);
    }

    #[test]
    fn tile_columns_wrap_and_rows_clip() {
        assert_eq!(wrap_tile_x(-1, 2), 3);
        assert_eq!(wrap_tile_x(4, 2), 0);
        assert_eq!(tile_at(WorldPoint::new(10.0, -1.0), 2, 64), None);
        assert_eq!(tile_at(WorldPoint::new(10.0, 256.0), 2, 64), None);
    }

    #[test]
    fn tiles_around_dedups_at_low_zoom() {
        let tiles = tiles_around(GeoPoint::new(0.0, 0.0), 0, 64, 2, 1);
        assert_eq!(tiles, vec![TileCoord { z: 0, x: 0, y: 0 }]);
    }

    #[test]
    fn tiles_around_covers_neighborhood() {
        let tiles = tiles_around(LONDON, 12, 64, 2, 1);
        assert_eq!(tiles.len(), 15);
        assert!(tiles.contains(&TileCoord { z: 12, x: 2044, y: 1361 }));
        assert!(tiles.contains(&TileCoord { z: 12, x: 2048, y: 1363 }));
    }

    #[test]
    fn tile_coord_rejects_out_of_range() {
        assert!(TileCoord::new(1, 2, 0).is_err());
        assert!(TileCoord::new(MAX_ZOOM + 1, 0, 0).is_err());
        assert_eq!(TileCoord::new(3, 7, 7).expect("valid").to_string(), "3/7/7");
    }

    #[test]
    fn geo_point_validity() {
        assert!(LONDON.is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, f64::NAN).is_valid());
    }
}
