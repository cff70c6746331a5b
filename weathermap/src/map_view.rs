//! Map view controller: turns marker moves into camera commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_map::core::{project, unproject};
use tui_map::render::Camera;

use crate::state::{MapCenter, TILE_PIXELS};

/// Zoom applied whenever the map follows a new city.
pub const RECENTER_ZOOM: u8 = 12;
pub const INITIAL_ZOOM: u8 = 10;
pub const MIN_ZOOM: u8 = 2;
pub const MAX_ZOOM: u8 = 18;

pub const PAN_ANIMATION_TICKS: u32 = 16;
/// Farther moves (in map pixels at the current zoom) jump instead of panning.
pub const PAN_ANIMATION_MAX_PX: f64 = 256.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum MapViewCommand {
    SetView {
        center: MapCenter,
        zoom: u8,
        animate: bool,
    },
}

/// Recenter command for a freshly assigned marker position.
///
/// Every assignment counts, including one that repeats the current value:
/// searching the same city again brings a zoomed or panned map back.
pub fn observe(assigned: MapCenter) -> MapViewCommand {
    MapViewCommand::SetView {
        center: assigned,
        zoom: RECENTER_ZOOM,
        animate: true,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PanAnimation {
    pub from: MapCenter,
    pub to: MapCenter,
    pub elapsed: u32,
}

/// Camera of the map panel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MapViewport {
    pub center: MapCenter,
    pub zoom: u8,
    pub pan: Option<PanAnimation>,
}

impl Default for MapViewport {
    fn default() -> Self {
        Self::new(MapCenter::default())
    }
}

impl MapViewport {
    pub fn new(center: MapCenter) -> Self {
        Self {
            center,
            zoom: INITIAL_ZOOM,
            pan: None,
        }
    }

    /// Where the camera ends up once any pan finishes.
    pub fn target(&self) -> MapCenter {
        self.pan.map(|pan| pan.to).unwrap_or(self.center)
    }

    pub fn camera(&self) -> Camera {
        Camera {
            center: self.center.to_geo(),
            zoom: self.zoom,
        }
    }

    pub fn apply(&mut self, command: MapViewCommand) {
        let MapViewCommand::SetView {
            center,
            zoom,
            animate,
        } = command;
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if zoom == self.zoom && center == self.target() {
            return;
        }

        if animate && zoom == self.zoom {
            let from = project(self.center.to_geo(), zoom, TILE_PIXELS);
            let to = project(center.to_geo(), zoom, TILE_PIXELS);
            let distance = from.distance(to);
            if distance > 0.0 && distance <= PAN_ANIMATION_MAX_PX {
                self.pan = Some(PanAnimation {
                    from: self.center,
                    to: center,
                    elapsed: 0,
                });
                return;
            }
        }

        self.center = center;
        self.zoom = zoom;
        self.pan = None;
    }

    /// Steps a running pan by one tick. Returns whether the camera moved.
    pub fn advance(&mut self) -> bool {
        let Some(mut pan) = self.pan else {
            return false;
        };
        pan.elapsed += 1;
        if pan.elapsed >= PAN_ANIMATION_TICKS {
            self.center = pan.to;
            self.pan = None;
            return true;
        }

        let t = pan.elapsed as f64 / PAN_ANIMATION_TICKS as f64;
        let eased = 1.0 - (1.0 - t).powi(3);
        let from = project(pan.from.to_geo(), self.zoom, TILE_PIXELS);
        let to = project(pan.to.to_geo(), self.zoom, TILE_PIXELS);
        let point = unproject(from.lerp(to, eased), self.zoom, TILE_PIXELS);
        if let Ok(center) = MapCenter::new(point.lat, point.lon) {
            self.center = center;
        }
        self.pan = Some(pan);
        true
    }

    /// Changes zoom by `delta` around the pan target. Returns false at the limits.
    pub fn zoom_by(&mut self, delta: i8) -> bool {
        let zoom = (self.zoom as i16 + delta as i16).clamp(MIN_ZOOM as i16, MAX_ZOOM as i16) as u8;
        if zoom == self.zoom {
            return false;
        }
        self.apply(MapViewCommand::SetView {
            center: self.target(),
            zoom,
            animate: false,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn center(lat: f64, lon: f64) -> MapCenter {
        MapCenter::new(lat, lon).expect("valid")
    }

    #[test]
    fn observe_recenters_at_fixed_zoom() {
        let london = center(51.5074, -0.1278);
        assert_eq!(
            observe(london),
            MapViewCommand::SetView {
                center: london,
                zoom: RECENTER_ZOOM,
                animate: true,
            }
        );
    }

    #[test]
    fn repeated_center_restores_zoom() {
        let london = center(51.5074, -0.1278);
        let mut view = MapViewport::new(MapCenter::default());
        view.apply(observe(london));
        assert!(view.zoom_by(-4));

        view.apply(observe(london));
        assert_eq!(view.zoom, RECENTER_ZOOM);
        assert_eq!(view.center, london);
    }

    #[test]
    fn command_for_current_view_is_a_noop() {
        let start = center(51.5074, -0.1278);
        let near = center(51.52, -0.10);
        let mut view = MapViewport {
            center: start,
            zoom: RECENTER_ZOOM,
            pan: None,
        };
        view.apply(observe(near));
        assert!(view.advance());
        let mid_pan = view;

        // Same target again keeps the running pan instead of jumping
        view.apply(observe(near));
        assert_eq!(view, mid_pan);
    }

    #[test]
    fn far_jump_resets_instantly() {
        let mut view = MapViewport::new(MapCenter::default());
        let london = center(51.5074, -0.1278);
        view.apply(observe(london));

        assert_eq!(view.center, london);
        assert_eq!(view.zoom, RECENTER_ZOOM);
        assert_eq!(view.pan, None);
        assert!(!view.advance());
    }

    #[test]
    fn nearby_move_pans_to_target() {
        let start = center(51.5074, -0.1278);
        let near = center(51.52, -0.10);
        let mut view = MapViewport {
            center: start,
            zoom: RECENTER_ZOOM,
            pan: None,
        };
        view.apply(observe(near));

        assert!(view.pan.is_some());
        assert_eq!(view.center, start);
        assert_eq!(view.target(), near);

        assert!(view.advance());
        assert_ne!(view.center, start);
        for _ in 1..PAN_ANIMATION_TICKS {
            assert!(view.advance());
        }
        assert_eq!(view.center, near);
        assert_eq!(view.pan, None);
        assert!(!view.advance());
    }

    #[test]
    fn zoom_is_clamped() {
        let mut view = MapViewport::new(MapCenter::default());
        view.zoom = MAX_ZOOM;
        assert!(!view.zoom_by(1));
        assert!(view.zoom_by(-1));
        assert_eq!(view.zoom, MAX_ZOOM - 1);

        view.zoom = MIN_ZOOM;
        assert!(!view.zoom_by(-1));
    }
}
