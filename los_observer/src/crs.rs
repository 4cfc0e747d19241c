//! Spatial reference descriptions attached to a map.

use crate::units::DistanceUnit;

/// Coordinate reference frame of a map.
///
/// Only the information needed to interpret vertical offsets is retained:
/// the EPSG code of the system and, for projected systems, the EPSG code of
/// its linear unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpatialReference {
    Projected { epsg: u32, unit_code: u32 },
    Geographic { epsg: u32 },
}

impl SpatialReference {
    /// Creates a projected reference from its EPSG code and linear unit code.
    pub fn projected(epsg: u32, unit_code: u32) -> Self {
        Self::Projected { epsg, unit_code }
    }

    /// Creates a geographic reference from its EPSG code.
    pub fn geographic(epsg: u32) -> Self {
        Self::Geographic { epsg }
    }

    /// Common global CRS definition: WGS84 (EPSG:4326).
    pub fn wgs84() -> Self {
        Self::geographic(4326)
    }

    /// Common global CRS definition: Web Mercator (EPSG:3857).
    pub fn web_mercator() -> Self {
        Self::projected(3857, 9001)
    }

    /// Returns the EPSG code for this reference.
    pub fn epsg(&self) -> u32 {
        match self {
            Self::Projected { epsg, .. } | Self::Geographic { epsg } => *epsg,
        }
    }

    pub fn is_projected(&self) -> bool {
        matches!(self, Self::Projected { .. })
    }

    /// Linear unit offsets are expressed in. Geographic systems and projected
    /// systems with an unrecognised unit code fall back to meters.
    pub fn linear_unit(&self) -> DistanceUnit {
        match self {
            Self::Projected { unit_code, .. } => DistanceUnit::from_factory_code(*unit_code)
                .unwrap_or_else(|| {
                    log::warn!("unknown linear unit code {}, assuming meters", unit_code);
                    DistanceUnit::Meters
                }),
            Self::Geographic { .. } => DistanceUnit::Meters,
        }
    }
}
