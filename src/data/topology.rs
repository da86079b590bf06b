//! TopoJSON decoding (the layout of the world-atlas `countries-110m.json`).
//!
//! Arcs may be quantized: positions are then delta-encoded integers that are
//! accumulated and mapped through `transform`. A negative arc index `i` refers
//! to arc `!i` traversed backwards.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use super::boundaries::{CountryShape, Ring};

#[derive(Debug, Deserialize)]
pub struct Topology {
    #[serde(default)]
    transform: Option<Transform>,
    arcs: Vec<Vec<Vec<f64>>>,
    objects: HashMap<String, TopoObject>,
}

#[derive(Debug, Deserialize)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum TopoObject {
    GeometryCollection {
        geometries: Vec<TopoObject>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<serde_json::Map<String, Value>>,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<serde_json::Map<String, Value>>,
    },
    #[serde(other)]
    Other,
}

impl Topology {
    pub fn parse(bytes: &mut [u8]) -> Result<Self, simd_json::Error> {
        simd_json::serde::from_slice(bytes)
    }

    /// Country shapes from the named object (usually `countries`), or from the
    /// first object when that name is absent.
    pub fn countries(&self, object: &str) -> Vec<CountryShape> {
        let Some(root) = self.objects.get(object).or_else(|| self.objects.values().next()) else {
            return Vec::new();
        };
        let arcs = self.decode_arcs();
        let mut shapes = Vec::new();
        collect_shapes(root, &arcs, &mut shapes);
        shapes
    }

    /// Absolute (lon, lat) positions for every arc
    fn decode_arcs(&self) -> Vec<Ring> {
        self.arcs
            .iter()
            .map(|arc| match &self.transform {
                Some(t) => {
                    let (mut x, mut y) = (0.0, 0.0);
                    arc.iter()
                        .filter(|p| p.len() >= 2)
                        .map(|p| {
                            x += p[0];
                            y += p[1];
                            (x * t.scale[0] + t.translate[0], y * t.scale[1] + t.translate[1])
                        })
                        .collect()
                }
                None => arc.iter().filter(|p| p.len() >= 2).map(|p| (p[0], p[1])).collect(),
            })
            .collect()
    }
}

fn collect_shapes(object: &TopoObject, arcs: &[Ring], out: &mut Vec<CountryShape>) {
    match object {
        TopoObject::GeometryCollection { geometries } => {
            for g in geometries {
                collect_shapes(g, arcs, out);
            }
        }
        TopoObject::Polygon { arcs: rings, id, properties } => {
            let polygon = rings.iter().map(|r| stitch_ring(r, arcs)).collect();
            out.push(CountryShape::new(
                feature_name(properties.as_ref()),
                id.as_ref().and_then(id_string),
                vec![polygon],
            ));
        }
        TopoObject::MultiPolygon { arcs: polygons, id, properties } => {
            let polygons = polygons
                .iter()
                .map(|rings| rings.iter().map(|r| stitch_ring(r, arcs)).collect())
                .collect();
            out.push(CountryShape::new(
                feature_name(properties.as_ref()),
                id.as_ref().and_then(id_string),
                polygons,
            ));
        }
        TopoObject::Other => {}
    }
}

/// Join a ring's arcs; consecutive arcs share their boundary point.
fn stitch_ring(indices: &[i64], arcs: &[Ring]) -> Ring {
    let mut points: Ring = Vec::new();
    for &index in indices {
        let (arc_idx, reversed) = if index < 0 { (!index, true) } else { (index, false) };
        let Some(arc) = usize::try_from(arc_idx).ok().and_then(|i| arcs.get(i)) else {
            continue;
        };
        points.pop();
        if reversed {
            points.extend(arc.iter().rev());
        } else {
            points.extend(arc.iter());
        }
    }
    points
}

fn feature_name(properties: Option<&serde_json::Map<String, Value>>) -> String {
    properties
        .and_then(|p| p.get("name").or_else(|| p.get("NAME")).or_else(|| p.get("ADMIN")))
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown")
        .to_string()
}

fn id_string(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Two unit squares sharing the edge x=1; quantized with scale 1, translate (10, 20)
    const TOPO: &str = r#"{
        "type": "Topology",
        "transform": {"scale": [1, 1], "translate": [10, 20]},
        "objects": {"countries": {"type": "GeometryCollection", "geometries": [
            {"type": "Polygon", "id": "001", "properties": {"name": "Left"}, "arcs": [[0, 1]]},
            {"type": "MultiPolygon", "id": 2, "properties": {"name": "Right"}, "arcs": [[[2, -1]]]},
            {"type": "Point", "coordinates": [0, 0]}
        ]}},
        "arcs": [
            [[1, 0], [0, 1]],
            [[1, 1], [-1, 0], [0, -1], [1, 0]],
            [[1, 0], [1, 0], [0, 1], [-1, 0]]
        ]
    }"#;

    #[test]
    fn test_decode_quantized_rings() {
        let mut bytes = TOPO.as_bytes().to_vec();
        let topo = Topology::parse(&mut bytes).unwrap();
        let shapes = topo.countries("countries");
        assert_eq!(shapes.len(), 2);

        let left = &shapes[0];
        assert_eq!(left.name, "Left");
        assert_eq!(left.id.as_deref(), Some("001"));
        assert_eq!(
            left.polygons[0][0],
            vec![(11.0, 20.0), (11.0, 21.0), (10.0, 21.0), (10.0, 20.0), (11.0, 20.0)]
        );

        let right = &shapes[1];
        assert_eq!(right.id.as_deref(), Some("2"));
        // Arc 0 reversed closes the ring back at its start
        assert_eq!(right.polygons[0][0].first(), right.polygons[0][0].last());
        assert!(right.contains(11.5, 20.5));
        assert!(!right.contains(10.5, 20.5));
    }
}
