//! Tool mode state machine that turns map clicks into observer points.

use crate::catalog::{resolve_surface, SurfaceSelection};
use crate::config::LosConfig;
use crate::error::{LosError, Result};
use crate::geometry::Point3;
use crate::graphics::{GraphicHandle, GraphicsService};
use crate::layers::MapView;
use crate::ledger::PointGraphicLedger;
use crate::points::{ObserverPoints, PointId};
use crate::units::{offset_in_surface_units, DistanceUnit};

/// Interpretation applied to the next map click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolMode {
    #[default]
    Unknown,
    Observer,
    Target,
}

/// Receiver of "map contents changed" notifications from the host.
pub trait MapContentsListener {
    fn map_contents_changed(&mut self, map: &dyn MapView);
}

/// What a map click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    Ignored,
    Observer(PointId),
    Target,
}

/// Routes map clicks according to the active [`ToolMode`] and keeps the
/// observer points, their markers and the surface selection consistent.
#[derive(Debug)]
pub struct ToolModeController<G: GraphicsService> {
    graphics: G,
    config: LosConfig,
    mode: ToolMode,
    points: ObserverPoints,
    ledger: PointGraphicLedger,
    target: Option<(Point3, GraphicHandle)>,
    surfaces: SurfaceSelection,
    observer_offset: f64,
    target_offset: f64,
    offset_unit: DistanceUnit,
}

fn required(value: Option<f64>, what: &str) -> Result<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(LosError::InvalidInput(format!("{} must be finite, got {}", what, v))),
        None => Err(LosError::InvalidInput(format!("{} requires a value", what))),
    }
}

impl<G: GraphicsService> ToolModeController<G> {
    /// Creates a controller in [`ToolMode::Unknown`] with the offsets of `config`.
    pub fn new(config: LosConfig, graphics: G) -> Self {
        Self {
            graphics,
            mode: ToolMode::Unknown,
            points: ObserverPoints::new(),
            ledger: PointGraphicLedger::new(),
            target: None,
            surfaces: SurfaceSelection::new(),
            observer_offset: config.observer_offset,
            target_offset: config.target_offset,
            offset_unit: config.offset_unit,
            config,
        }
    }

    /// Switches mode from an external token. Blank or unrecognised tokens
    /// deactivate capture.
    pub fn activate(&mut self, token: &str) -> ToolMode {
        let token = token.trim();
        self.mode = if token.is_empty() {
            ToolMode::Unknown
        } else if token == self.config.observer_token {
            ToolMode::Observer
        } else if token == self.config.target_token {
            ToolMode::Target
        } else {
            ToolMode::Unknown
        };
        log::debug!("tool mode set to {:?} from '{}'", self.mode, token);
        self.mode
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Handles a click at `point`. Nothing happens unless the owning view
    /// is active. In observer mode the point is prepended to the observer
    /// list and gets a marker; in target mode it replaces the target point.
    pub fn handle_point(&mut self, point: Point3, owner_view_active: bool) -> Capture {
        if !owner_view_active {
            return Capture::Ignored;
        }
        match self.mode {
            ToolMode::Observer => {
                let captured = self.points.push_front(point);
                let handle = self
                    .graphics
                    .draw_marker(&point, &self.config.observer_marker, true);
                if !self.ledger.register(handle.clone(), captured.id) {
                    log::warn!(
                        "marker {} already tracked, observer {:?} left without a marker",
                        handle,
                        captured.id
                    );
                }
                log::debug!("captured observer {:?} at ({}, {})", captured.id, point.x, point.y);
                Capture::Observer(captured.id)
            }
            ToolMode::Target => {
                self.clear_target();
                let handle = self
                    .graphics
                    .draw_marker(&point, &self.config.target_marker, true);
                self.target = Some((point, handle));
                log::debug!("captured target at ({}, {})", point.x, point.y);
                Capture::Target
            }
            ToolMode::Unknown => Capture::Ignored,
        }
    }

    /// Deletes the given observer points and their markers.
    pub fn delete_points(&mut self, ids: &[PointId]) {
        let removed = self
            .ledger
            .remove_all(ids, &mut self.points, &mut self.graphics);
        log::debug!("deleted {} points, {} markers", ids.len(), removed.len());
    }

    /// Clears captured points, their markers and the target, then refreshes
    /// the surface selection from `map` when one is available. A full reset
    /// also clears every temporary graphic. The tool mode is left as is.
    pub fn reset(&mut self, full_reset: bool, map: Option<&dyn MapView>) {
        self.points.clear();
        self.ledger.clear(&mut self.graphics);
        self.clear_target();
        if full_reset {
            self.graphics.clear_all_temporary();
        }
        if let Some(map) = map {
            self.surfaces.refresh(map);
        }
        log::info!(
            "observer tool reset (full: {}), selected surface '{}'",
            full_reset,
            self.surfaces.selected()
        );
    }

    fn clear_target(&mut self) {
        if let Some((_, handle)) = self.target.take() {
            self.graphics.remove_markers(&[handle]);
        }
    }

    pub fn observer_points(&self) -> &ObserverPoints {
        &self.points
    }

    pub fn ledger(&self) -> &PointGraphicLedger {
        &self.ledger
    }

    pub fn target_point(&self) -> Option<Point3> {
        self.target.as_ref().map(|(p, _)| *p)
    }

    pub fn surface_names(&self) -> &[String] {
        self.surfaces.names()
    }

    pub fn selected_surface(&self) -> &str {
        self.surfaces.selected()
    }

    pub fn select_surface(&mut self, name: &str) -> Result<()> {
        self.surfaces.select(name)
    }

    pub fn observer_offset(&self) -> f64 {
        self.observer_offset
    }

    /// Sets the observer offset. Clearing it is an error and leaves the
    /// previous value in place.
    pub fn set_observer_offset(&mut self, value: Option<f64>) -> Result<()> {
        self.observer_offset = required(value, "observer offset").map_err(|e| {
            log::warn!("{}", e);
            e
        })?;
        Ok(())
    }

    pub fn target_offset(&self) -> f64 {
        self.target_offset
    }

    /// Sets the target offset. Clearing it is an error and leaves the
    /// previous value in place.
    pub fn set_target_offset(&mut self, value: Option<f64>) -> Result<()> {
        self.target_offset = required(value, "target offset").map_err(|e| {
            log::warn!("{}", e);
            e
        })?;
        Ok(())
    }

    pub fn offset_unit(&self) -> DistanceUnit {
        self.offset_unit
    }

    pub fn set_offset_unit(&mut self, unit: DistanceUnit) {
        self.offset_unit = unit;
    }

    /// Observer offset in the elevation units of the selected surface.
    pub fn observer_offset_in_surface_units(&self, map: &dyn MapView) -> Result<f64> {
        self.offset_for_selected_surface(map, self.observer_offset)
    }

    /// Target offset in the elevation units of the selected surface.
    pub fn target_offset_in_surface_units(&self, map: &dyn MapView) -> Result<f64> {
        self.offset_for_selected_surface(map, self.target_offset)
    }

    fn offset_for_selected_surface(&self, map: &dyn MapView, offset: f64) -> Result<f64> {
        let name = self.surfaces.selected();
        let surface = resolve_surface(map, name)
            .ok_or_else(|| LosError::UnknownSurface(name.to_string()))?;
        offset_in_surface_units(map, offset, surface.z_factor(), self.offset_unit)
    }

    pub fn graphics(&self) -> &G {
        &self.graphics
    }

    pub fn graphics_mut(&mut self) -> &mut G {
        &mut self.graphics
    }

    pub fn config(&self) -> &LosConfig {
        &self.config
    }
}

impl<G: GraphicsService> MapContentsListener for ToolModeController<G> {
    fn map_contents_changed(&mut self, map: &dyn MapView) {
        self.surfaces.refresh(map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::{MarkerRecorder, MarkerStyle};

    /// Graphics service that hands out the same handle for every marker.
    #[derive(Debug, Default)]
    struct FixedHandleGraphics {
        drawn: usize,
    }

    impl GraphicsService for FixedHandleGraphics {
        fn draw_marker(&mut self, _: &Point3, _: &MarkerStyle, _: bool) -> GraphicHandle {
            self.drawn += 1;
            GraphicHandle::new("fixed")
        }

        fn remove_markers(&mut self, _: &[GraphicHandle]) {}

        fn clear_all_temporary(&mut self) {}
    }

    fn controller() -> ToolModeController<MarkerRecorder> {
        ToolModeController::new(LosConfig::default(), MarkerRecorder::new())
    }

    #[test]
    fn token_mapping() {
        let mut c = controller();
        assert_eq!(c.activate("Observer"), ToolMode::Observer);
        assert_eq!(c.activate("Target"), ToolMode::Target);
        assert_eq!(c.activate("   "), ToolMode::Unknown);
        assert_eq!(c.activate("Observer"), ToolMode::Observer);
        assert_eq!(c.activate("observer-ish"), ToolMode::Unknown);
    }

    #[test]
    fn custom_tokens_from_config() {
        let cfg = LosConfig {
            observer_token: "obs".to_string(),
            ..LosConfig::default()
        };
        let mut c = ToolModeController::new(cfg, MarkerRecorder::new());
        assert_eq!(c.activate("obs"), ToolMode::Observer);
        assert_eq!(c.activate("Observer"), ToolMode::Unknown);
    }

    #[test]
    fn unknown_mode_ignores_clicks() {
        let mut c = controller();
        assert_eq!(c.handle_point(Point3::planar(1.0, 1.0), true), Capture::Ignored);
        assert!(c.observer_points().is_empty());
        assert!(c.graphics().is_empty());
    }

    #[test]
    fn observer_capture_draws_green_marker() {
        let mut c = controller();
        c.activate("Observer");
        let Capture::Observer(id) = c.handle_point(Point3::planar(3.0, 4.0), true) else {
            panic!("expected an observer capture");
        };
        let handle = c.ledger().handle_for(id).cloned().unwrap();
        let marker = c.graphics().marker(&handle).unwrap();
        assert_eq!(marker.style.color, [0, 255, 0]);
        assert!(marker.temporary);
    }

    #[test]
    fn reused_handle_keeps_first_registration() {
        let mut c = ToolModeController::new(LosConfig::default(), FixedHandleGraphics::default());
        c.activate("Observer");
        let first = c.handle_point(Point3::planar(1.0, 1.0), true);
        let second = c.handle_point(Point3::planar(2.0, 2.0), true);
        assert_eq!(c.graphics().drawn, 2);
        assert_eq!(c.observer_points().len(), 2);
        assert_eq!(c.ledger().len(), 1);
        let (Capture::Observer(a), Capture::Observer(b)) = (first, second) else {
            panic!("expected observer captures");
        };
        assert_eq!(c.ledger().point_for(&GraphicHandle::new("fixed")), Some(a));
        assert!(c.ledger().handle_for(b).is_none());
    }

    #[test]
    fn target_capture_replaces_previous_target() {
        let mut c = controller();
        c.activate("Target");
        assert_eq!(c.handle_point(Point3::planar(1.0, 1.0), true), Capture::Target);
        assert_eq!(c.handle_point(Point3::planar(2.0, 2.0), true), Capture::Target);
        assert_eq!(c.target_point(), Some(Point3::planar(2.0, 2.0)));
        assert_eq!(c.graphics().len(), 1);
        assert!(c.observer_points().is_empty());
        assert!(c.ledger().is_empty());
    }

    #[test]
    fn clearing_offsets_is_rejected() {
        let mut c = controller();
        assert!(matches!(c.set_observer_offset(None), Err(LosError::InvalidInput(_))));
        assert!(matches!(c.set_target_offset(None), Err(LosError::InvalidInput(_))));
        assert!(c.set_target_offset(Some(f64::INFINITY)).is_err());
        assert_eq!(c.observer_offset(), 2.0);
        assert_eq!(c.target_offset(), 0.0);
        c.set_observer_offset(Some(1.7)).unwrap();
        assert_eq!(c.observer_offset(), 1.7);
    }

    #[test]
    fn reset_keeps_mode_and_clears_target() {
        let mut c = controller();
        c.activate("Target");
        c.handle_point(Point3::planar(1.0, 1.0), true);
        c.reset(false, None);
        assert_eq!(c.mode(), ToolMode::Target);
        assert!(c.target_point().is_none());
        assert!(c.graphics().is_empty());
    }
}
