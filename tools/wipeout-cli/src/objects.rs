//! PRM object listing

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;
use wipeout_formats::Object;

/// Print the objects in a PRM file, as JSON or one summary line each
pub fn list_objects(input: &Path, json: bool) -> Result<()> {
    let data = std::fs::read(input)
        .with_context(|| format!("Failed to read objects: {}", input.display()))?;
    let objects = wipeout_formats::read_objects(&data)
        .with_context(|| format!("Failed to decode objects: {}", input.display()))?;

    if json {
        let text = serde_json::to_string_pretty(&objects).context("Failed to serialize objects")?;
        println!("{}", text);
    } else {
        for (index, object) in objects.iter().enumerate() {
            println!("{:3} {}", index, summary(object));
        }
    }
    Ok(())
}

/// Name, counts and polygon kinds of one object
fn summary(object: &Object) -> String {
    let mut kinds: BTreeMap<String, usize> = BTreeMap::new();
    for polygon in &object.polygons {
        *kinds.entry(format!("{:?}", polygon.kind)).or_default() += 1;
    }
    let kinds: Vec<String> = kinds
        .iter()
        .map(|(kind, count)| format!("{}={}", kind, count))
        .collect();

    format!(
        "{:<15} vertices={} polygons={} [{}]",
        object.header.name,
        object.vertices.len(),
        object.polygons.len(),
        kinds.join(" ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use wipeout_formats::object::{Face, MeshVertex};
    use wipeout_formats::{ObjectHeader, Polygon, PolygonType, Shape};

    fn flat(kind: PolygonType) -> Polygon {
        Polygon {
            kind,
            subtype: 0,
            shape: Shape::Face(Face {
                indices: vec![0, 0, 0],
                texture: None,
                colors: vec![0],
            }),
        }
    }

    #[test]
    fn test_summary_counts_polygon_kinds() {
        let object = Object {
            header: ObjectHeader {
                name: "ship".to_string(),
                vertex_count: 1,
                polygon_count: 3,
                index1: 0,
                origin: Default::default(),
                position: Default::default(),
            },
            vertices: vec![MeshVertex(Default::default())],
            polygons: vec![
                flat(PolygonType::FlatTrisFaceColor),
                flat(PolygonType::FlatQuadFaceColor),
                flat(PolygonType::FlatTrisFaceColor),
            ],
            byte_length: 0,
        };
        assert_eq!(
            summary(&object),
            "ship            vertices=1 polygons=3 [FlatQuadFaceColor=1 FlatTrisFaceColor=2]"
        );
    }
}
