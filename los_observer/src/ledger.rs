//! Correlation between captured points and their on-map markers.

use std::collections::HashMap;

use crate::graphics::{GraphicHandle, GraphicsService};
use crate::points::{ObserverPoints, PointId};

/// Maps marker handles to the points they display. One marker per point.
#[derive(Debug, Default)]
pub struct PointGraphicLedger {
    entries: HashMap<GraphicHandle, PointId>,
}

impl PointGraphicLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `handle` displays `point`. The first registration of a
    /// handle wins; returns `false` when `handle` was already present.
    pub fn register(&mut self, handle: GraphicHandle, point: PointId) -> bool {
        if self.entries.contains_key(&handle) {
            log::debug!("marker {} already registered, keeping first entry", handle);
            return false;
        }
        self.entries.insert(handle, point);
        true
    }

    pub fn handle_for(&self, point: PointId) -> Option<&GraphicHandle> {
        self.entries
            .iter()
            .find(|(_, p)| **p == point)
            .map(|(h, _)| h)
    }

    pub fn point_for(&self, handle: &GraphicHandle) -> Option<PointId> {
        self.entries.get(handle).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = &GraphicHandle> {
        self.entries.keys()
    }

    /// Removes `ids` from `points` together with their ledger entries and
    /// asks `graphics` to delete the matching markers in one batch.
    ///
    /// Points without a ledger entry are still removed from `points`; they
    /// contribute nothing to the removal batch. Returns the removed handles
    /// in the order of `ids`.
    pub fn remove_all(
        &mut self,
        ids: &[PointId],
        points: &mut ObserverPoints,
        graphics: &mut dyn GraphicsService,
    ) -> Vec<GraphicHandle> {
        let mut handles = Vec::with_capacity(ids.len());
        for &id in ids {
            points.remove(id);
            match self.handle_for(id).cloned() {
                Some(h) => {
                    self.entries.remove(&h);
                    handles.push(h);
                }
                None => log::debug!("point {:?} has no marker", id),
            }
        }
        if !handles.is_empty() {
            graphics.remove_markers(&handles);
        }
        handles
    }

    /// Drops every entry and removes all tracked markers.
    pub fn clear(&mut self, graphics: &mut dyn GraphicsService) {
        if self.entries.is_empty() {
            return;
        }
        let handles: Vec<GraphicHandle> = self.entries.drain().map(|(h, _)| h).collect();
        graphics.remove_markers(&handles);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3;
    use crate::graphics::{MarkerRecorder, MarkerStyle};

    fn capture(
        ledger: &mut PointGraphicLedger,
        points: &mut ObserverPoints,
        gfx: &mut MarkerRecorder,
        x: f64,
    ) -> PointId {
        let p = points.push_front(Point3::planar(x, 0.0));
        let h = gfx.draw_marker(&p.location, &MarkerStyle::observer(), true);
        ledger.register(h, p.id);
        p.id
    }

    #[test]
    fn first_registration_wins() {
        let mut ledger = PointGraphicLedger::new();
        let h = GraphicHandle::new("g1");
        assert!(ledger.register(h.clone(), PointId(1)));
        assert!(!ledger.register(h.clone(), PointId(2)));
        assert_eq!(ledger.point_for(&h), Some(PointId(1)));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn remove_all_removes_points_entries_and_markers() {
        let mut ledger = PointGraphicLedger::new();
        let mut points = ObserverPoints::new();
        let mut gfx = MarkerRecorder::new();
        let a = capture(&mut ledger, &mut points, &mut gfx, 1.0);
        let b = capture(&mut ledger, &mut points, &mut gfx, 1.0);
        let c = capture(&mut ledger, &mut points, &mut gfx, 2.0);
        let hb = ledger.handle_for(b).cloned().unwrap();

        let removed = ledger.remove_all(&[a, c], &mut points, &mut gfx);

        assert_eq!(removed.len(), 2);
        assert_eq!(points.ids(), vec![b]);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.handle_for(b), Some(&hb));
        assert_eq!(gfx.len(), 1);
        assert_eq!(gfx.removal_batches().len(), 1);
    }

    #[test]
    fn unmatched_points_are_filtered_from_batch() {
        let mut ledger = PointGraphicLedger::new();
        let mut points = ObserverPoints::new();
        let mut gfx = MarkerRecorder::new();
        let orphan = points.push_front(Point3::planar(5.0, 5.0)).id;
        let removed = ledger.remove_all(&[orphan], &mut points, &mut gfx);
        assert!(removed.is_empty());
        assert!(points.is_empty());
        assert!(gfx.removal_batches().is_empty());
    }

    #[test]
    fn repeated_ids_remove_the_marker_once() {
        let mut ledger = PointGraphicLedger::new();
        let mut points = ObserverPoints::new();
        let mut gfx = MarkerRecorder::new();
        let a = capture(&mut ledger, &mut points, &mut gfx, 1.0);
        let removed = ledger.remove_all(&[a, a], &mut points, &mut gfx);
        assert_eq!(removed.len(), 1);
        assert_eq!(gfx.removal_batches().len(), 1);
        assert_eq!(gfx.removal_batches()[0].len(), 1);
        assert!(ledger.is_empty());
        assert!(points.is_empty());
    }

    #[test]
    fn clear_removes_all_markers() {
        let mut ledger = PointGraphicLedger::new();
        let mut points = ObserverPoints::new();
        let mut gfx = MarkerRecorder::new();
        capture(&mut ledger, &mut points, &mut gfx, 1.0);
        capture(&mut ledger, &mut points, &mut gfx, 2.0);
        ledger.clear(&mut gfx);
        assert!(ledger.is_empty());
        assert!(gfx.is_empty());
    }
}
