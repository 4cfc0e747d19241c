//! Linear distance units and conversion of vertical offsets into the
//! elevation units of a surface.

use std::fmt;
use std::str::FromStr;

use crate::error::{LosError, Result};
use crate::layers::MapView;

/// Linear units accepted for observer and target offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    #[default]
    Meters,
    Kilometers,
    Feet,
    UsSurveyFeet,
    Yards,
    Miles,
    NauticalMiles,
}

impl DistanceUnit {
    /// All supported units in display order.
    pub const ALL: [DistanceUnit; 7] = [
        DistanceUnit::Meters,
        DistanceUnit::Kilometers,
        DistanceUnit::Feet,
        DistanceUnit::UsSurveyFeet,
        DistanceUnit::Yards,
        DistanceUnit::Miles,
        DistanceUnit::NauticalMiles,
    ];

    /// Length of one unit in meters.
    pub fn meters_per_unit(self) -> f64 {
        match self {
            DistanceUnit::Meters => 1.0,
            DistanceUnit::Kilometers => 1000.0,
            DistanceUnit::Feet => 0.3048,
            DistanceUnit::UsSurveyFeet => 1200.0 / 3937.0,
            DistanceUnit::Yards => 0.9144,
            DistanceUnit::Miles => 1609.344,
            DistanceUnit::NauticalMiles => 1852.0,
        }
    }

    /// Maps an EPSG linear unit code to a unit. Unknown codes yield `None`.
    pub fn from_factory_code(code: u32) -> Option<Self> {
        match code {
            9001 => Some(DistanceUnit::Meters),
            9036 => Some(DistanceUnit::Kilometers),
            9002 => Some(DistanceUnit::Feet),
            9003 => Some(DistanceUnit::UsSurveyFeet),
            9096 => Some(DistanceUnit::Yards),
            9093 => Some(DistanceUnit::Miles),
            9030 => Some(DistanceUnit::NauticalMiles),
            _ => None,
        }
    }

    /// EPSG linear unit code of this unit.
    pub fn factory_code(self) -> u32 {
        match self {
            DistanceUnit::Meters => 9001,
            DistanceUnit::Kilometers => 9036,
            DistanceUnit::Feet => 9002,
            DistanceUnit::UsSurveyFeet => 9003,
            DistanceUnit::Yards => 9096,
            DistanceUnit::Miles => 9093,
            DistanceUnit::NauticalMiles => 9030,
        }
    }

    fn label(self) -> &'static str {
        match self {
            DistanceUnit::Meters => "meters",
            DistanceUnit::Kilometers => "kilometers",
            DistanceUnit::Feet => "feet",
            DistanceUnit::UsSurveyFeet => "us_survey_feet",
            DistanceUnit::Yards => "yards",
            DistanceUnit::Miles => "miles",
            DistanceUnit::NauticalMiles => "nautical_miles",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DistanceUnit {
    type Err = LosError;

    fn from_str(s: &str) -> Result<Self> {
        let unit = match s.trim().to_ascii_lowercase().as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => DistanceUnit::Meters,
            "km" | "kilometer" | "kilometers" => DistanceUnit::Kilometers,
            "ft" | "foot" | "feet" => DistanceUnit::Feet,
            "us_ft" | "us_survey_feet" | "us_survey_foot" => DistanceUnit::UsSurveyFeet,
            "yd" | "yard" | "yards" => DistanceUnit::Yards,
            "mi" | "mile" | "miles" => DistanceUnit::Miles,
            "nmi" | "nautical_mile" | "nautical_miles" => DistanceUnit::NauticalMiles,
            other => {
                return Err(LosError::InvalidInput(format!(
                    "unknown distance unit '{}'",
                    other
                )))
            }
        };
        Ok(unit)
    }
}

/// Converts `value` expressed in `from` into `to`.
pub fn convert_distance(value: f64, from: DistanceUnit, to: DistanceUnit) -> f64 {
    if from == to {
        return value;
    }
    value * from.meters_per_unit() / to.meters_per_unit()
}

/// Returns `offset` expressed in the elevation units of a surface with the
/// given Z factor.
///
/// Without a spatial reference on the map no unit conversion is possible and
/// `offset` is returned unchanged. Otherwise the offset is converted from
/// `from` into the map's linear unit (meters unless the reference is a
/// projected system) and divided by `z_factor`.
pub fn offset_in_surface_units(
    map: &dyn MapView,
    offset: f64,
    z_factor: f64,
    from: DistanceUnit,
) -> Result<f64> {
    let Some(sr) = map.spatial_reference() else {
        return Ok(offset);
    };
    if !z_factor.is_finite() || z_factor <= 0.0 {
        return Err(LosError::InvalidZFactor(z_factor));
    }
    let to = sr.linear_unit();
    Ok(convert_distance(offset, from, to) / z_factor)
}
