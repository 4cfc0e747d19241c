//! Discovery of surface layers on a map and the current surface selection.

use crate::dtm::Surface;
use crate::error::{LosError, Result};
use crate::layers::MapView;

/// Names of every layer of `map` that can serve as an elevation surface,
/// in display order. Duplicate names are kept.
///
/// Layers that cannot be read or wrapped are logged and skipped.
pub fn list_eligible_surfaces(map: &dyn MapView) -> Vec<String> {
    let mut names = Vec::new();
    for index in 0..map.layer_count() {
        let layer = match map.layer(index) {
            Ok(layer) => layer,
            Err(e) => {
                log::warn!("skipping layer {}: {}", index, e);
                continue;
            }
        };
        match layer.surface() {
            Ok(Some(_)) => names.push(layer.name().to_string()),
            Ok(None) => {}
            Err(e) => log::warn!("skipping layer '{}': {}", layer.name(), e),
        }
    }
    names
}

/// First surface-capable layer named `name`, resolved as a surface.
pub fn resolve_surface<'a>(map: &'a dyn MapView, name: &str) -> Option<Box<dyn Surface + 'a>> {
    (0..map.layer_count())
        .filter_map(move |index| map.layer(index).ok())
        .filter(|layer| layer.name() == name)
        .find_map(|layer| match layer.surface() {
            Ok(surface) => surface,
            Err(e) => {
                log::warn!("layer '{}' matched but is unusable: {}", name, e);
                None
            }
        })
}

/// Eligible surface names plus the one currently selected.
///
/// The selected name is always a member of `names`, or empty when there
/// are no names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceSelection {
    names: Vec<String>,
    selected: String,
}

impl SurfaceSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Currently selected name, `""` when nothing is available.
    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Selects `name` if it is one of the eligible names.
    pub fn select(&mut self, name: &str) -> Result<()> {
        if !self.names.iter().any(|n| n == name) {
            return Err(LosError::UnknownSurface(name.to_string()));
        }
        self.selected = name.to_string();
        Ok(())
    }

    /// Rebuilds the name list from `map`, keeping the current selection
    /// when it is still eligible.
    pub fn refresh(&mut self, map: &dyn MapView) {
        *self = refresh_selection(&self.selected, map);
    }

    fn from_names(previous: &str, names: Vec<String>) -> Self {
        let selected = if names.iter().any(|n| n == previous) {
            previous.to_string()
        } else {
            names.first().cloned().unwrap_or_default()
        };
        Self { names, selected }
    }
}

/// Recomputes the eligible names of `map` and picks a selection: `previous`
/// if still present, otherwise the first name, otherwise `""`.
pub fn refresh_selection(previous: &str, map: &dyn MapView) -> SurfaceSelection {
    let selection = SurfaceSelection::from_names(previous, list_eligible_surfaces(map));
    if selection.selected != previous {
        log::debug!(
            "surface selection changed from '{}' to '{}'",
            previous,
            selection.selected
        );
    }
    selection
}
