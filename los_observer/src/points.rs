//! Captured observer points and their ordered collection.

use std::collections::VecDeque;

use crate::geometry::Point3;

/// Stable identity of a captured point. Two captures at the same location
/// have different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub u64);

/// A captured observer location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverPoint {
    pub id: PointId,
    pub location: Point3,
}

/// Observer points, most recently captured first.
#[derive(Debug, Default)]
pub struct ObserverPoints {
    points: VecDeque<ObserverPoint>,
    next_id: u64,
}

impl ObserverPoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `location` at the front and returns the new point.
    pub fn push_front(&mut self, location: Point3) -> ObserverPoint {
        let point = ObserverPoint {
            id: PointId(self.next_id),
            location,
        };
        self.next_id += 1;
        self.points.push_front(point);
        point
    }

    /// Removes the point with `id`, returning it if it was present.
    pub fn remove(&mut self, id: PointId) -> Option<ObserverPoint> {
        let pos = self.points.iter().position(|p| p.id == id)?;
        self.points.remove(pos)
    }

    pub fn get(&self, id: PointId) -> Option<&ObserverPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.get(id).is_some()
    }

    /// Point at `index`, where index 0 is the newest.
    pub fn at(&self, index: usize) -> Option<&ObserverPoint> {
        self.points.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObserverPoint> {
        self.points.iter()
    }

    pub fn ids(&self) -> Vec<PointId> {
        self.points.iter().map(|p| p.id).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Removes every point. Ids are never reused.
    pub fn clear(&mut self) {
        self.points.clear();
    }
}
