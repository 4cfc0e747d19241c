use los_observer::{
    catalog::{list_eligible_surfaces, refresh_selection, resolve_surface},
    crs::SpatialReference,
    dtm::Tin,
    error::{LosError, Result},
    geometry::{Point, Point3},
    layers::{FeatureLayer, Layer, MapDocument, MapLayer, MapView, RasterLayer, TinLayer},
    raster::RasterGrid,
    DistanceUnit, LosConfig, MapContentsListener, MarkerRecorder, ToolModeController,
};

fn tin(z: f64) -> Tin {
    Tin::from_points(vec![
        Point3::new(0.0, 0.0, z),
        Point3::new(10.0, 0.0, z),
        Point3::new(0.0, 10.0, z),
    ])
}

fn tin_layer(name: &str, z_factor: f64) -> MapLayer {
    let mut layer = TinLayer::new(name, tin(1.0));
    layer.z_factor = z_factor;
    MapLayer::Tin(layer)
}

fn raster_layer(name: &str, cells: Vec<f64>) -> MapLayer {
    MapLayer::Raster(RasterLayer::new(
        name,
        RasterGrid::new(Point::new(0.0, 10.0), 5.0, 2, 2, cells),
    ))
}

/// Map whose second layer cannot be read.
struct FlakyMap {
    inner: MapDocument,
}

impl MapView for FlakyMap {
    fn layer_count(&self) -> usize {
        self.inner.layer_count()
    }

    fn layer(&self, index: usize) -> Result<&dyn Layer> {
        if index == 1 {
            return Err(LosError::LayerAccess {
                index,
                reason: "locked".to_string(),
            });
        }
        self.inner.layer(index)
    }

    fn spatial_reference(&self) -> Option<&SpatialReference> {
        self.inner.spatial_reference()
    }
}

#[test]
fn tin_and_vector_layer_yield_only_tin() {
    let map = MapDocument::new(None)
        .with_layer(tin_layer("T1", 1.0))
        .with_layer(MapLayer::Feature(FeatureLayer::new("V1")));
    assert_eq!(list_eligible_surfaces(&map), vec!["T1".to_string()]);
}

#[test]
fn broken_rasters_and_unreadable_layers_are_skipped() {
    let inner = MapDocument::new(None)
        .with_layer(raster_layer("bad", vec![1.0]))
        .with_layer(tin_layer("hidden", 1.0))
        .with_layer(raster_layer("dem", vec![1.0, 2.0, 3.0, 4.0]))
        .with_layer(tin_layer("T1", 1.0));
    let map = FlakyMap { inner };
    assert_eq!(
        list_eligible_surfaces(&map),
        vec!["dem".to_string(), "T1".to_string()]
    );
}

#[test]
fn oversized_raster_is_skipped_without_aborting_the_scan() {
    let huge = MapLayer::Raster(RasterLayer::new(
        "huge",
        RasterGrid::new(Point::new(0.0, 0.0), 1.0, 1 << 33, 1 << 33, vec![1.0]),
    ));
    let map = MapDocument::new(None)
        .with_layer(huge)
        .with_layer(MapLayer::Feature(FeatureLayer::new("V1")))
        .with_layer(tin_layer("T1", 1.0));
    assert_eq!(list_eligible_surfaces(&map), vec!["T1".to_string()]);
    assert!(resolve_surface(&map, "huge").is_none());
}

#[test]
fn duplicate_names_are_listed_and_first_wins() {
    let map = MapDocument::new(None)
        .with_layer(MapLayer::Feature(FeatureLayer::new("S")))
        .with_layer(tin_layer("S", 2.0))
        .with_layer(tin_layer("S", 4.0));
    assert_eq!(list_eligible_surfaces(&map), vec!["S".to_string(), "S".to_string()]);
    let surface = resolve_surface(&map, "S").unwrap();
    assert_eq!(surface.z_factor(), 2.0);
    assert!(resolve_surface(&map, "missing").is_none());
}

#[test]
fn resolve_skips_unwrappable_raster_with_same_name() {
    let map = MapDocument::new(None)
        .with_layer(raster_layer("dem", Vec::new()))
        .with_layer(raster_layer("dem", vec![8.0, 8.0, 8.0, 8.0]));
    let surface = resolve_surface(&map, "dem").unwrap();
    assert_eq!(surface.elevation_at(1.0, 1.0), Some(8.0));
}

#[test]
fn selection_refresh_rules() {
    let map = MapDocument::new(None)
        .with_layer(tin_layer("LayerA", 1.0))
        .with_layer(tin_layer("LayerB", 1.0))
        .with_layer(tin_layer("LayerC", 1.0));
    assert_eq!(refresh_selection("LayerB", &map).selected(), "LayerB");
    assert_eq!(refresh_selection("LayerX", &map).selected(), "LayerA");
    assert_eq!(refresh_selection("LayerB", &MapDocument::new(None)).selected(), "");
}

#[test]
fn offsets_use_selected_surface_z_factor() {
    let map = MapDocument::new(Some(SpatialReference::projected(32633, 9001)))
        .with_layer(tin_layer("T1", 2.0));
    let mut c = ToolModeController::new(LosConfig::default(), MarkerRecorder::new());
    c.map_contents_changed(&map);
    c.set_observer_offset(Some(10.0)).unwrap();
    assert!((c.observer_offset_in_surface_units(&map).unwrap() - 5.0).abs() < 1e-9);
    assert_eq!(c.target_offset_in_surface_units(&map).unwrap(), 0.0);

    c.set_offset_unit(DistanceUnit::Kilometers);
    c.set_observer_offset(Some(0.01)).unwrap();
    assert!((c.observer_offset_in_surface_units(&map).unwrap() - 5.0).abs() < 1e-9);
}

#[test]
fn offsets_without_selection_fail() {
    let map = MapDocument::new(None);
    let c = ToolModeController::new(LosConfig::default(), MarkerRecorder::new());
    assert!(matches!(
        c.observer_offset_in_surface_units(&map),
        Err(LosError::UnknownSurface(_))
    ));
}
