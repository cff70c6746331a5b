use std::collections::HashMap;
use std::sync::Arc;

use ratatui::{layout::Rect, style::Color, Frame};

use crate::core::{project, tile_at, world_size, GeoPoint, TileCoord, WorldPoint};

/// Upper half block: foreground paints the top pixel, background the bottom.
const HALF_BLOCK: char = '▀';

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileStatus {
    Ready,
    Loading,
    Failed,
    Missing,
}

/// Read access to decoded raster tiles.
pub trait TileRead {
    /// Edge length of a tile in pixels.
    fn tile_size(&self) -> u32;
    fn status(&self, tile: TileCoord) -> TileStatus;
    fn pixel(&self, tile: TileCoord, px: u32, py: u32) -> Option<(u8, u8, u8)>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureVariant {
    pub ch: char,
    pub fg: Color,
    pub density: u8,
}

impl TextureVariant {
    pub const fn new(ch: char, fg: Color, density: u8) -> Self {
        Self { ch, fg, density }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TilePalette {
    pub main: Color,
    pub alt: Color,
    pub variants: [TextureVariant; 3],
}

impl TilePalette {
    pub const fn new(main: Color, alt: Color, variants: [TextureVariant; 3]) -> Self {
        Self {
            main,
            alt,
            variants,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TilePaint {
    pub background_main: Color,
    pub background_alt: Color,
    pub texture: TextureVariant,
}

type VariantSelector =
    Arc<dyn Fn(TileStatus, TileCoord, u32, &TilePalette) -> TextureVariant + Send + Sync>;

/// Texture drawn where tile pixels are not available yet.
#[derive(Clone)]
pub struct PlaceholderTheme {
    palettes: HashMap<TileStatus, TilePalette>,
    fallback: TilePalette,
    variant_selector: VariantSelector,
}

impl PlaceholderTheme {
    pub fn builder() -> PlaceholderThemeBuilder {
        PlaceholderThemeBuilder::default()
    }

    pub fn paint(&self, status: TileStatus, tile: TileCoord) -> TilePaint {
        let palette = self.palettes.get(&status).copied().unwrap_or(self.fallback);
        let seed = tile_seed(tile.x, tile.y);
        let texture = (self.variant_selector)(status, tile, seed, &palette);
        TilePaint {
            background_main: palette.main,
            background_alt: palette.alt,
            texture,
        }
    }
}

#[derive(Clone)]
pub struct PlaceholderThemeBuilder {
    palettes: HashMap<TileStatus, TilePalette>,
    fallback: TilePalette,
    variant_selector: Option<VariantSelector>,
}

impl Default for PlaceholderThemeBuilder {
    fn default() -> Self {
        let base = Color::Rgb(38, 44, 58);
        let fallback = TilePalette::new(
            base,
            adjust_color(base, 4),
            [
                TextureVariant::new('·', adjust_color(base, 30), 6),
                TextureVariant::new('.', adjust_color(base, 22), 7),
                TextureVariant::new(' ', base, 8),
            ],
        );

        let failed = Color::Rgb(58, 36, 40);
        let mut palettes = HashMap::new();
        palettes.insert(
            TileStatus::Failed,
            TilePalette::new(
                failed,
                adjust_color(failed, 4),
                [
                    TextureVariant::new('x', adjust_color(failed, 40), 9),
                    TextureVariant::new('·', adjust_color(failed, 24), 7),
                    TextureVariant::new(' ', failed, 8),
                ],
            ),
        );

        Self {
            palettes,
            fallback,
            variant_selector: None,
        }
    }
}

impl PlaceholderThemeBuilder {
    pub fn status(mut self, status: TileStatus, palette: TilePalette) -> Self {
        self.palettes.insert(status, palette);
        self
    }

    pub fn fallback(mut self, palette: TilePalette) -> Self {
        self.fallback = palette;
        self
    }

    pub fn variant_selector<F>(mut self, selector: F) -> Self
    where
        F: Fn(TileStatus, TileCoord, u32, &TilePalette) -> TextureVariant + Send + Sync + 'static,
    {
        self.variant_selector = Some(Arc::new(selector));
        self
    }

    pub fn build(self) -> PlaceholderTheme {
        let selector: VariantSelector = self.variant_selector.unwrap_or_else(|| {
            Arc::new(|_status, _tile, seed, palette| {
                let idx = (seed % palette.variants.len() as u32) as usize;
                palette.variants[idx]
            })
        });

        PlaceholderTheme {
            palettes: self.palettes,
            fallback: self.fallback,
            variant_selector: selector,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RenderConfig {
    /// Color outside the mercator square (beyond ~85° latitude).
    pub void_color: Color,
    /// Added to every tile pixel channel; negative values dim the map.
    pub brightness: i16,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            void_color: Color::Rgb(16, 20, 28),
            brightness: -10,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub center: GeoPoint,
    pub zoom: u8,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MapRenderResult {
    pub origin_x: u16,
    pub origin_y: u16,
    pub cols: u16,
    pub rows: u16,
    pub zoom: u8,
    pub tile_size: u32,
    /// World position of the top-left pixel.
    pub top_left_x: f64,
    pub top_left_y: f64,
}

impl MapRenderResult {
    /// Terminal cell showing `point`, if it is inside the rendered area.
    pub fn project(&self, point: GeoPoint) -> Option<(u16, u16)> {
        if self.cols == 0 || self.rows == 0 || self.tile_size == 0 {
            return None;
        }
        let world = project(point, self.zoom, self.tile_size);
        let size = world_size(self.zoom, self.tile_size);

        let mut dx = world.x - self.top_left_x;
        if dx < 0.0 {
            dx += size;
        } else if dx >= size {
            dx -= size;
        }
        let dy = world.y - self.top_left_y;
        if dx < 0.0 || dy < 0.0 {
            return None;
        }

        let col = dx.floor() as u32;
        let row = (dy / 2.0).floor() as u32;
        if col >= self.cols as u32 || row >= self.rows as u32 {
            return None;
        }
        Some((self.origin_x + col as u16, self.origin_y + row as u16))
    }
}

#[derive(Clone)]
pub struct MapRendererBuilder {
    config: RenderConfig,
    theme: PlaceholderTheme,
}

impl Default for MapRendererBuilder {
    fn default() -> Self {
        Self {
            config: RenderConfig::default(),
            theme: PlaceholderTheme::builder().build(),
        }
    }
}

impl MapRendererBuilder {
    pub fn config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn void_color(mut self, color: Color) -> Self {
        self.config.void_color = color;
        self
    }

    pub fn brightness(mut self, value: i16) -> Self {
        self.config.brightness = value;
        self
    }

    pub fn theme(mut self, theme: PlaceholderTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn build(self) -> MapRenderer {
        MapRenderer {
            config: self.config,
            theme: self.theme,
        }
    }
}

enum Sample {
    Pixel(Color),
    Placeholder { status: TileStatus, tile: TileCoord, px: u32, py: u32 },
    Void,
}

/// Draws raster tiles with half-block cells: one map pixel per half cell,
/// so a terminal cell covers one pixel horizontally and two vertically.
#[derive(Clone)]
pub struct MapRenderer {
    config: RenderConfig,
    theme: PlaceholderTheme,
}

impl MapRenderer {
    pub fn builder() -> MapRendererBuilder {
        MapRendererBuilder::default()
    }

    pub fn render<T: TileRead>(
        &self,
        frame: &mut Frame,
        area: Rect,
        tiles: &T,
        camera: Camera,
    ) -> MapRenderResult {
        let tile_size = tiles.tile_size();
        let mut result = MapRenderResult {
            origin_x: area.x,
            origin_y: area.y,
            cols: area.width,
            rows: area.height,
            zoom: camera.zoom,
            tile_size,
            ..Default::default()
        };

        if area.width == 0 || area.height == 0 || tile_size == 0 {
            return result;
        }

        let center = project(camera.center, camera.zoom, tile_size);
        let top_left = WorldPoint::new(
            (center.x - area.width as f64 / 2.0).floor(),
            (center.y - area.height as f64).floor(),
        );
        result.top_left_x = top_left.x;
        result.top_left_y = top_left.y;

        let buf = frame.buffer_mut();
        for row in 0..area.height {
            for col in 0..area.width {
                let wx = top_left.x + col as f64;
                let wy = top_left.y + row as f64 * 2.0;
                let top = self.sample(tiles, camera.zoom, WorldPoint::new(wx, wy));
                let bottom = self.sample(tiles, camera.zoom, WorldPoint::new(wx, wy + 1.0));

                let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) else {
                    continue;
                };

                match (top, bottom) {
                    (Sample::Pixel(fg), Sample::Pixel(bg)) => {
                        cell.set_fg(fg).set_bg(bg).set_char(HALF_BLOCK);
                    }
                    (Sample::Void, Sample::Void) => {
                        let void = self.config.void_color;
                        cell.set_fg(void).set_bg(void).set_char(' ');
                    }
                    (Sample::Placeholder { status, tile, px, py }, _)
                    | (_, Sample::Placeholder { status, tile, px, py }) => {
                        let paint = self.theme.paint(status, tile);
                        let bg = if tile_seed(tile.x, tile.y) % 2 == 0 {
                            paint.background_main
                        } else {
                            paint.background_alt
                        };
                        let density = paint.texture.density.max(1) as u32;
                        let sprinkle = cell_seed(tile.x, tile.y, px, py / 2);
                        if sprinkle % density == 0 {
                            cell.set_bg(bg)
                                .set_fg(paint.texture.fg)
                                .set_char(paint.texture.ch);
                        } else {
                            cell.set_bg(bg).set_fg(bg).set_char(' ');
                        }
                    }
                    (Sample::Pixel(fg), Sample::Void) => {
                        cell.set_fg(fg)
                            .set_bg(self.config.void_color)
                            .set_char(HALF_BLOCK);
                    }
                    (Sample::Void, Sample::Pixel(bg)) => {
                        cell.set_fg(self.config.void_color)
                            .set_bg(bg)
                            .set_char(HALF_BLOCK);
                    }
                }
            }
        }

        result
    }

    fn sample<T: TileRead>(&self, tiles: &T, zoom: u8, world: WorldPoint) -> Sample {
        let tile_size = tiles.tile_size();
        let Some(tile) = tile_at(world, zoom, tile_size) else {
            return Sample::Void;
        };
        let size = tile_size as f64;
        let px = (world.x - (world.x / size).floor() * size) as u32;
        let py = (world.y - (world.y / size).floor() * size) as u32;
        let px = px.min(tile_size - 1);
        let py = py.min(tile_size - 1);

        match tiles.status(tile) {
            TileStatus::Ready => match tiles.pixel(tile, px, py) {
                Some((r, g, b)) => {
                    Sample::Pixel(adjust_color(Color::Rgb(r, g, b), self.config.brightness))
                }
                None => Sample::Placeholder {
                    status: TileStatus::Missing,
                    tile,
                    px,
                    py,
                },
            },
            status => Sample::Placeholder {
                status,
                tile,
                px,
                py,
            },
        }
    }
}

pub fn adjust_color(color: Color, delta: i16) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let clamp = |v: i16| v.clamp(0, 255) as u8;
            Color::Rgb(
                clamp(r as i16 + delta),
                clamp(g as i16 + delta),
                clamp(b as i16 + delta),
            )
        }
        other => other,
    }
}

pub fn tile_seed(x: u32, y: u32) -> u32 {
    let mut n = x;
    n = n
        .wrapping_mul(374_761_393)
        .wrapping_add(y.wrapping_mul(668_265_263));
    n ^= n >> 13;
    n = n.wrapping_mul(1_274_126_177);
    n ^= n >> 16;
    n
}

pub fn cell_seed(x: u32, y: u32, dx: u32, dy: u32) -> u32 {
    let mut n = tile_seed(x, y);
    n ^= dx.wrapping_mul(2_246_822_519);
    n ^= dy.wrapping_mul(3_266_489_917);
    n ^= n >> 15;
    n = n.wrapping_mul(668_265_263);
    n ^= n >> 13;
    n
}
