//! Elevation surfaces: the [`Surface`] capability and triangulated models.

use std::fmt;

use crate::geometry::{Point, Point3};

/// Elevation model a layer exposes once it has been resolved as a surface.
pub trait Surface: fmt::Debug {
    /// Vertical scale factor applied to elevations of this surface.
    fn z_factor(&self) -> f64;

    /// Elevation at `(x, y)` in surface units, if the location is covered.
    fn elevation_at(&self, x: f64, y: f64) -> Option<f64>;
}

fn barycentric(p: Point, a: Point3, b: Point3, c: Point3) -> Option<(f64, f64, f64)> {
    let det = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
    if det.abs() < f64::EPSILON {
        return None;
    }
    let u = ((b.y - c.y) * (p.x - c.x) + (c.x - b.x) * (p.y - c.y)) / det;
    let v = ((c.y - a.y) * (p.x - c.x) + (a.x - c.x) * (p.y - c.y)) / det;
    let w = 1.0 - u - v;
    Some((u, v, w))
}

/// Triangulated Irregular Network constructed from 3D points.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Tin {
    /// Vertices of the TIN.
    pub vertices: Vec<Point3>,
    /// Indices into `vertices` forming triangles.
    #[serde(default)]
    pub triangles: Vec<[usize; 3]>,
}

impl Tin {
    /// Builds a TIN from the provided vertices using Delaunay triangulation on the XY plane.
    pub fn from_points(points: Vec<Point3>) -> Self {
        let coords: Vec<delaunator::Point> = points
            .iter()
            .map(|p| delaunator::Point { x: p.x, y: p.y })
            .collect();
        let triangulation = delaunator::triangulate(&coords);
        let triangles = triangulation
            .triangles
            .chunks(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Self {
            vertices: points,
            triangles,
        }
    }

    /// Triangulates the vertices if no triangles were supplied.
    pub fn ensure_triangulated(&mut self) {
        if self.triangles.is_empty() && self.vertices.len() >= 3 {
            *self = Tin::from_points(std::mem::take(&mut self.vertices));
        }
    }

    /// Linearly interpolated elevation at (x, y) if the point lies within the TIN.
    pub fn elevation_at(&self, x: f64, y: f64) -> Option<f64> {
        let p = Point::new(x, y);
        for tri in &self.triangles {
            let a = *self.vertices.get(tri[0])?;
            let b = *self.vertices.get(tri[1])?;
            let c = *self.vertices.get(tri[2])?;
            if let Some((u, v, w)) = barycentric(p, a, b, c) {
                if u >= -1e-9 && v >= -1e-9 && w >= -1e-9 {
                    return Some(u * a.z + v * b.z + w * c.z);
                }
            }
        }
        None
    }
}

/// Surface view over a borrowed [`Tin`].
#[derive(Debug, Clone, Copy)]
pub struct TinSurface<'a> {
    pub tin: &'a Tin,
    pub z_factor: f64,
}

impl Surface for TinSurface<'_> {
    fn z_factor(&self) -> f64 {
        self.z_factor
    }

    fn elevation_at(&self, x: f64, y: f64) -> Option<f64> {
        self.tin.elevation_at(x, y).map(|z| z * self.z_factor)
    }
}
