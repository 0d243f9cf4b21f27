//! Dashboard layout loaded from YAML, resized a few times.
//!
//! Run with: `RUST_LOG=debug cargo run --example dashboard`

use std::collections::HashMap;

use sizer::prelude::*;
use sizer_test::TestObject;
use tracing_subscriber::EnvFilter;

const MANIFEST: &str = r"
root: page
containers:
  page:
    axis: vertical
    gap: 8
    cells:
      - object: toolbar
      - container: main
        proportions: [0, 1]
      - object: status
  main:
    axis: horizontal
    gap: 8
    cells:
      - object: sidebar
        align: [min, expand]
      - container: tiles
        proportions: [1, 0]
  tiles:
    grid:
      columns: 3
      column_gap: 4
      row_gap: 4
      column_proportions: { 0: 1.0, 1: 1.0, 2: 1.0 }
      row_proportions: { 0: 1.0, 1: 1.0 }
    cells:
      - object: cpu
      - object: memory
      - object: disk
      - object: network
      - object: alerts
";

fn main() -> Result<(), ManifestError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tree = LayoutTree::new();
    let mut objects = HashMap::new();
    for (name, w, h) in [
        ("toolbar", 200, 24),
        ("status", 200, 16),
        ("sidebar", 120, 200),
        ("cpu", 80, 60),
        ("memory", 80, 60),
        ("disk", 80, 60),
        ("network", 80, 60),
        ("alerts", 120, 60),
    ] {
        objects.insert(name.to_string(), tree.register(TestObject::new(w, h)));
    }

    let root = Manifest::from_yaml(MANIFEST)?.build(&mut tree, &objects)?;
    let mut engine = LayoutEngine::with_tree(tree, root)?;
    println!("minimum: {:?}", engine.min_size()?);

    for area in [Size::new(1024, 768), Size::new(1024, 768), Size::new(300, 200)] {
        match engine.resize(area)? {
            Some(size) => println!("laid out at {}x{}", size.width, size.height),
            None => println!("{}x{} unchanged, skipped", area.width, area.height),
        }
    }

    let snapshot = engine.snapshot()?;
    let mut names: Vec<_> = objects.iter().collect();
    names.sort_by_key(|(_, id)| **id);
    for (name, id) in names {
        if let Some(rect) = snapshot.object(*id) {
            println!(
                "{name:>8}: ({}, {}) {}x{}",
                rect.x, rect.y, rect.width, rect.height
            );
        }
    }
    Ok(())
}
