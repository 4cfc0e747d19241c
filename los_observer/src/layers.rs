//! Map layers and the read-only map view supplied by the host application.

use crate::crs::SpatialReference;
use crate::dtm::{Surface, Tin, TinSurface};
use crate::error::{LosError, Result};
use crate::raster::{RasterGrid, RasterSurface};

fn default_z_factor() -> f64 {
    1.0
}

/// A layer of a map document.
pub trait Layer {
    fn name(&self) -> &str;

    /// Resolves the layer as an elevation surface.
    ///
    /// `Ok(None)` means the layer kind never carries elevations. An error
    /// means the layer should have been a surface but could not be read.
    fn surface(&self) -> Result<Option<Box<dyn Surface + '_>>>;
}

/// Triangulated surface layer. Always usable as a surface.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TinLayer {
    pub name: String,
    pub tin: Tin,
    #[serde(default = "default_z_factor")]
    pub z_factor: f64,
}

impl TinLayer {
    pub fn new(name: &str, tin: Tin) -> Self {
        Self {
            name: name.to_string(),
            tin,
            z_factor: 1.0,
        }
    }
}

impl Layer for TinLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn surface(&self) -> Result<Option<Box<dyn Surface + '_>>> {
        Ok(Some(Box::new(TinSurface {
            tin: &self.tin,
            z_factor: self.z_factor,
        })))
    }
}

/// Raster layer. Usable as a surface when its grid wraps successfully.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RasterLayer {
    pub name: String,
    pub raster: RasterGrid,
    #[serde(default = "default_z_factor")]
    pub z_factor: f64,
}

impl RasterLayer {
    pub fn new(name: &str, raster: RasterGrid) -> Self {
        Self {
            name: name.to_string(),
            raster,
            z_factor: 1.0,
        }
    }
}

impl Layer for RasterLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn surface(&self) -> Result<Option<Box<dyn Surface + '_>>> {
        let surface = RasterSurface::wrap(&self.name, &self.raster, self.z_factor)?;
        Ok(Some(Box::new(surface)))
    }
}

/// Vector feature layer. Never a surface.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FeatureLayer {
    pub name: String,
}

impl FeatureLayer {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Layer for FeatureLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn surface(&self) -> Result<Option<Box<dyn Surface + '_>>> {
        Ok(None)
    }
}

/// Any layer a [`MapDocument`] can hold.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapLayer {
    Tin(TinLayer),
    Raster(RasterLayer),
    Feature(FeatureLayer),
}

impl MapLayer {
    fn as_layer(&self) -> &dyn Layer {
        match self {
            MapLayer::Tin(l) => l as &dyn Layer,
            MapLayer::Raster(l) => l as &dyn Layer,
            MapLayer::Feature(l) => l as &dyn Layer,
        }
    }
}

impl Layer for MapLayer {
    fn name(&self) -> &str {
        self.as_layer().name()
    }

    fn surface(&self) -> Result<Option<Box<dyn Surface + '_>>> {
        self.as_layer().surface()
    }
}

/// Read-only access to the focused map of the host application.
pub trait MapView {
    fn layer_count(&self) -> usize;

    /// Layer at `index` in display order.
    fn layer(&self, index: usize) -> Result<&dyn Layer>;

    fn spatial_reference(&self) -> Option<&SpatialReference>;
}

/// In-memory map made of an ordered layer list and an optional reference.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct MapDocument {
    #[serde(default)]
    pub spatial_reference: Option<SpatialReference>,
    #[serde(default)]
    pub layers: Vec<MapLayer>,
}

impl MapDocument {
    /// Creates an empty map.
    pub fn new(spatial_reference: Option<SpatialReference>) -> Self {
        Self {
            spatial_reference,
            layers: Vec::new(),
        }
    }

    /// Appends a layer at the bottom of the display order.
    pub fn add_layer(&mut self, layer: MapLayer) {
        self.layers.push(layer);
    }

    /// Builder-style variant of [`MapDocument::add_layer`].
    pub fn with_layer(mut self, layer: MapLayer) -> Self {
        self.add_layer(layer);
        self
    }

    /// Loads a map description from a JSON file. TIN layers without
    /// triangles are triangulated from their vertices.
    pub fn load(path: &str) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let mut map: MapDocument = serde_json::from_str(&data)?;
        for layer in &mut map.layers {
            if let MapLayer::Tin(tin) = layer {
                tin.tin.ensure_triangulated();
            }
        }
        Ok(map)
    }

    /// Saves this map description to a JSON file.
    pub fn save(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl MapView for MapDocument {
    fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn layer(&self, index: usize) -> Result<&dyn Layer> {
        self.layers
            .get(index)
            .map(|l| l as &dyn Layer)
            .ok_or_else(|| LosError::LayerAccess {
                index,
                reason: format!("map has {} layers", self.layers.len()),
            })
    }

    fn spatial_reference(&self) -> Option<&SpatialReference> {
        self.spatial_reference.as_ref()
    }
}
