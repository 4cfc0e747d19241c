//! Core library for capturing line-of-sight observer points.
//!
//! The crate tracks which map clicks become observer points, which on-map
//! marker belongs to which point, which elevation surfaces a map offers and
//! how a vertical offset translates into a surface's elevation units. Map
//! documents and the marker drawing service are supplied by the host through
//! the [`layers::MapView`] and [`graphics::GraphicsService`] traits.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod crs;
pub mod dtm;
pub mod error;
pub mod geometry;
pub mod graphics;
pub mod layers;
pub mod ledger;
pub mod points;
pub mod raster;
pub mod units;

pub use catalog::{list_eligible_surfaces, refresh_selection, resolve_surface, SurfaceSelection};
pub use config::LosConfig;
pub use controller::{Capture, MapContentsListener, ToolMode, ToolModeController};
pub use error::{LosError, Result};
pub use graphics::{GraphicHandle, GraphicsService, MarkerRecorder, MarkerStyle};
pub use ledger::PointGraphicLedger;
pub use points::{ObserverPoint, ObserverPoints, PointId};
pub use units::{offset_in_surface_units, DistanceUnit};
