//! YAML layout manifests.
//!
//! A manifest names a set of containers and a root. Cells refer to nested
//! containers by name and to managed objects by slot name; the caller binds
//! slot names to registered objects when building.
//!
//! ```yaml
//! root: main
//! containers:
//!   main:
//!     axis: vertical
//!     gap: 4
//!     cells:
//!       - object: header
//!         align: [expand, min]
//!       - container: body
//!         proportions: [0, 1]
//!   body:
//!     grid:
//!       columns: 3
//!       column_gap: 2
//!       row_proportions: { 1: 1.0 }
//!     cells:
//!       - spacer: [10, 10]
//!       - object: chart
//!         proportions: [1, 1]
//!         border: 4
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sizer_core::{Alignment, Axis, Borders, Size};
use sizer_layout::{CellOptions, ContainerId, GridTemplate, LayoutTree, ObjectId, Payload};
use tracing::debug;

use crate::error::ManifestError;

/// Layout manifest loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Name of the root container
    pub root: String,
    /// Containers by name
    pub containers: BTreeMap<String, ContainerConfig>,
}

/// One container: linear when `axis` is set, grid when `grid` is set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerConfig {
    /// Growth axis tag (`horizontal` or `vertical`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<String>,
    /// Grid dimensions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridConfig>,
    /// Gap between cells of a linear container
    #[serde(default)]
    pub gap: i32,
    /// Minimum floor `[width, height]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_size: Option<[i32; 2]>,
    /// Cells in order
    #[serde(default)]
    pub cells: Vec<CellConfig>,
}

/// Grid dimensions, gaps and row/column overrides.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    /// Fixed row count
    #[serde(default)]
    pub rows: usize,
    /// Fixed column count
    #[serde(default)]
    pub columns: usize,
    /// Gap between columns
    #[serde(default)]
    pub column_gap: i32,
    /// Gap between rows
    #[serde(default)]
    pub row_gap: i32,
    /// Explicit row proportions by row index
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub row_proportions: BTreeMap<usize, f32>,
    /// Explicit column proportions by column index
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub column_proportions: BTreeMap<usize, f32>,
}

/// One cell. Exactly one of `spacer`, `object` and `container` must be set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellConfig {
    /// Empty space `[width, height]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacer: Option<[i32; 2]>,
    /// Object slot name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    /// Nested container name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    /// Growth weights `[horizontal, vertical]`
    #[serde(default)]
    pub proportions: [f32; 2],
    /// Alignment tags `[horizontal, vertical]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<[String; 2]>,
    /// Same inset on every side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<i32>,
    /// Per-side insets; wins over `border`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borders: Option<Borders>,
    /// Keep the payload alive when the cell is destroyed
    #[serde(default)]
    pub preserve: bool,
}

impl Manifest {
    /// Parse a manifest from YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn from_yaml(yaml: &str) -> Result<Self, ManifestError> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Serialize manifest to YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ManifestError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Read and parse a manifest file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Build the manifest into `tree` and return the root container.
    ///
    /// `objects` binds slot names to objects already registered in `tree`.
    /// Containers not reachable from the root are not built.
    pub fn build(
        &self,
        tree: &mut LayoutTree,
        objects: &HashMap<String, ObjectId>,
    ) -> Result<ContainerId, ManifestError> {
        let mut builder = Builder {
            manifest: self,
            tree,
            objects,
            in_progress: HashSet::new(),
        };
        let root = builder.container(&self.root)?;
        debug!(root = %self.root, containers = self.containers.len(), "manifest built");
        Ok(root)
    }
}

struct Builder<'a> {
    manifest: &'a Manifest,
    tree: &'a mut LayoutTree,
    objects: &'a HashMap<String, ObjectId>,
    in_progress: HashSet<&'a str>,
}

impl<'a> Builder<'a> {
    fn container(&mut self, name: &'a str) -> Result<ContainerId, ManifestError> {
        let manifest = self.manifest;
        let config = manifest
            .containers
            .get(name)
            .ok_or_else(|| ManifestError::UnknownContainer(name.to_string()))?;
        if !self.in_progress.insert(name) {
            return Err(ManifestError::invalid(
                format!("containers.{name}"),
                "container contains itself",
            ));
        }

        let id = match (&config.axis, &config.grid) {
            (Some(axis), None) => self.linear(name, axis, config)?,
            (None, Some(grid)) => self.grid(name, grid, config)?,
            _ => {
                return Err(ManifestError::invalid(
                    format!("containers.{name}"),
                    "exactly one of axis or grid is required",
                ))
            }
        };

        if let Some([width, height]) = config.default_size {
            self.tree.set_default_size(id, Size::new(width, height))?;
        }
        self.in_progress.remove(name);
        Ok(id)
    }

    fn linear(
        &mut self,
        name: &'a str,
        axis: &str,
        config: &'a ContainerConfig,
    ) -> Result<ContainerId, ManifestError> {
        let axis: Axis = axis
            .parse()
            .map_err(|e| ManifestError::invalid(format!("containers.{name}.axis"), e))?;
        let id = self.tree.new_container(axis);
        self.tree.set_gap(id, config.gap)?;

        for (index, cell) in config.cells.iter().enumerate() {
            let payload = self.payload(name, index, cell)?;
            let options = cell_options(name, index, cell)?;
            let cell_id = self.tree.add(id, payload, options)?;
            if cell.preserve {
                self.tree.set_preserve_payload(id, cell_id, true)?;
            }
        }
        Ok(id)
    }

    fn grid(
        &mut self,
        name: &'a str,
        grid: &GridConfig,
        config: &'a ContainerConfig,
    ) -> Result<ContainerId, ManifestError> {
        let template = GridTemplate {
            rows: grid.rows,
            columns: grid.columns,
            column_gap: grid.column_gap,
            row_gap: grid.row_gap,
        };
        template
            .validate()
            .map_err(|e| ManifestError::invalid(format!("containers.{name}.grid"), e))?;
        let id = self.tree.new_grid(template)?;

        for (index, cell) in config.cells.iter().enumerate() {
            let payload = self.payload(name, index, cell)?;
            let options = cell_options(name, index, cell)?;
            let at = self.tree.grid_add(id, payload, options)?;
            if cell.preserve {
                self.tree.grid_set_preserve_payload(id, at, true)?;
            }
        }
        for (&row, &p) in &grid.row_proportions {
            self.tree.set_row_proportion(id, row, p)?;
        }
        for (&column, &p) in &grid.column_proportions {
            self.tree.set_column_proportion(id, column, p)?;
        }
        Ok(id)
    }

    fn payload(
        &mut self,
        container: &str,
        index: usize,
        cell: &'a CellConfig,
    ) -> Result<Payload, ManifestError> {
        match (&cell.spacer, &cell.object, &cell.container) {
            (Some([width, height]), None, None) => Ok(Payload::Spacer(Size::new(*width, *height))),
            (None, Some(slot), None) => self
                .objects
                .get(slot)
                .map(|&id| Payload::Object(id))
                .ok_or_else(|| ManifestError::UnknownObject(slot.clone())),
            (None, None, Some(child)) => Ok(Payload::Container(self.container(child)?)),
            _ => Err(ManifestError::MissingPayload {
                container: container.to_string(),
                index,
            }),
        }
    }
}

fn cell_options(container: &str, index: usize, cell: &CellConfig) -> Result<CellOptions, ManifestError> {
    let field = |name: &str| format!("containers.{container}.cells[{index}].{name}");

    let [horizontal, vertical] = cell.proportions;
    let mut options = CellOptions::new().proportions(horizontal, vertical);

    if let Some([h, v]) = &cell.align {
        let h: Alignment = h.parse().map_err(|e| ManifestError::invalid(field("align"), e))?;
        let v: Alignment = v.parse().map_err(|e| ManifestError::invalid(field("align"), e))?;
        options = options.alignments(h, v);
    }

    match (cell.borders, cell.border) {
        (Some(borders), _) => options = options.borders(borders),
        (None, Some(inset)) => options = options.border(inset),
        (None, None) => {}
    }
    Ok(options)
}
