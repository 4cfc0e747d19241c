//! Basic geometry primitives shared by surfaces and captured points.

pub mod point;
pub mod point3;

pub use point::Point;
pub use point3::Point3;
