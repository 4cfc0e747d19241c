//! Regular elevation grids and their surface wrapper.

use crate::dtm::Surface;
use crate::error::{LosError, Result};
use crate::geometry::Point;

/// Row-major elevation grid anchored at its upper-left corner.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RasterGrid {
    /// Map coordinates of the upper-left corner of the first cell.
    pub origin: Point,
    pub cell_size: f64,
    pub width: usize,
    pub height: usize,
    /// `width * height` cell values, first row at the top.
    pub cells: Vec<f64>,
    /// Value marking cells without data.
    #[serde(default)]
    pub nodata: Option<f64>,
}

impl RasterGrid {
    pub fn new(
        origin: Point,
        cell_size: f64,
        width: usize,
        height: usize,
        cells: Vec<f64>,
    ) -> Self {
        Self {
            origin,
            cell_size,
            width,
            height,
            cells,
            nodata: None,
        }
    }

    fn is_data(&self, v: f64) -> bool {
        v.is_finite() && self.nodata != Some(v)
    }

    /// Checks that the grid can back an elevation surface and returns the
    /// reason when it cannot.
    fn validate(&self) -> std::result::Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err("raster has no cells".to_string());
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(format!("cell size {} is not positive", self.cell_size));
        }
        let expected = self
            .width
            .checked_mul(self.height)
            .ok_or_else(|| "raster dimensions overflow".to_string())?;
        if self.cells.len() != expected {
            return Err(format!(
                "expected {} cell values, found {}",
                expected,
                self.cells.len()
            ));
        }
        if !self.cells.iter().any(|v| self.is_data(*v)) {
            return Err("raster contains only nodata cells".to_string());
        }
        Ok(())
    }

    /// Value of the cell containing `(x, y)`.
    pub fn value_at(&self, x: f64, y: f64) -> Option<f64> {
        let col = ((x - self.origin.x) / self.cell_size).floor();
        let row = ((self.origin.y - y) / self.cell_size).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.width || row >= self.height {
            return None;
        }
        let v = *self.cells.get(row.checked_mul(self.width)?.checked_add(col)?)?;
        self.is_data(v).then_some(v)
    }
}

/// Surface view over a validated [`RasterGrid`].
#[derive(Debug, Clone, Copy)]
pub struct RasterSurface<'a> {
    grid: &'a RasterGrid,
    z_factor: f64,
}

impl<'a> RasterSurface<'a> {
    /// Wraps `grid` as a surface. Fails for grids that hold no usable
    /// elevation data.
    pub fn wrap(name: &str, grid: &'a RasterGrid, z_factor: f64) -> Result<Self> {
        grid.validate().map_err(|reason| LosError::RasterWrap {
            name: name.to_string(),
            reason,
        })?;
        Ok(Self { grid, z_factor })
    }

    pub fn grid(&self) -> &RasterGrid {
        self.grid
    }
}

impl Surface for RasterSurface<'_> {
    fn z_factor(&self) -> f64 {
        self.z_factor
    }

    fn elevation_at(&self, x: f64, y: f64) -> Option<f64> {
        self.grid.value_at(x, y).map(|z| z * self.z_factor)
    }
}
