//! Marker drawing service consumed by the controller.

use std::collections::BTreeMap;
use std::fmt;

use crate::geometry::Point3;

/// Identifier of a marker issued by a [`GraphicsService`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct GraphicHandle(pub String);

impl GraphicHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GraphicHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Symbol used when rendering a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerSymbol {
    #[default]
    Circle,
    Square,
    Cross,
}

/// Visual style of a point marker.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MarkerStyle {
    pub symbol: MarkerSymbol,
    pub color: [u8; 3],
    pub size: f32,
}

impl MarkerStyle {
    pub fn new(symbol: MarkerSymbol, color: [u8; 3], size: f32) -> Self {
        Self {
            symbol,
            color,
            size,
        }
    }

    /// Green circle used for observer points.
    pub fn observer() -> Self {
        Self::new(MarkerSymbol::Circle, [0, 255, 0], 3.0)
    }

    /// Red square used for the target point.
    pub fn target() -> Self {
        Self::new(MarkerSymbol::Square, [255, 0, 0], 3.0)
    }
}

/// Service that draws and removes markers on the map.
pub trait GraphicsService {
    /// Draws a marker at `point` and returns its handle. Temporary markers are
    /// removed by [`GraphicsService::clear_all_temporary`].
    fn draw_marker(
        &mut self,
        point: &Point3,
        style: &MarkerStyle,
        temporary: bool,
    ) -> GraphicHandle;

    /// Removes the listed markers. Unknown handles are ignored.
    fn remove_markers(&mut self, handles: &[GraphicHandle]);

    fn clear_all_temporary(&mut self);
}

/// A marker held by [`MarkerRecorder`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedMarker {
    pub point: Point3,
    pub style: MarkerStyle,
    pub temporary: bool,
}

/// In-memory [`GraphicsService`] that keeps every drawn marker and issues
/// random UUID handles.
#[derive(Debug, Default)]
pub struct MarkerRecorder {
    markers: BTreeMap<GraphicHandle, RecordedMarker>,
    removal_batches: Vec<Vec<GraphicHandle>>,
}

impl MarkerRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn marker(&self, handle: &GraphicHandle) -> Option<&RecordedMarker> {
        self.markers.get(handle)
    }

    /// Every batch passed to `remove_markers`, oldest first.
    pub fn removal_batches(&self) -> &[Vec<GraphicHandle>] {
        &self.removal_batches
    }
}

impl GraphicsService for MarkerRecorder {
    fn draw_marker(
        &mut self,
        point: &Point3,
        style: &MarkerStyle,
        temporary: bool,
    ) -> GraphicHandle {
        let handle = GraphicHandle(uuid::Uuid::new_v4().to_string());
        self.markers.insert(
            handle.clone(),
            RecordedMarker {
                point: *point,
                style: *style,
                temporary,
            },
        );
        handle
    }

    fn remove_markers(&mut self, handles: &[GraphicHandle]) {
        for h in handles {
            self.markers.remove(h);
        }
        self.removal_batches.push(handles.to_vec());
    }

    fn clear_all_temporary(&mut self) {
        self.markers.retain(|_, m| !m.temporary);
    }
}
