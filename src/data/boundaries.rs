use geojson::{GeoJson, Geometry, Value};
use serde::Deserialize;
use thiserror::Error;

use super::topology::Topology;

/// A closed ring of (lon, lat) positions
pub type Ring = Vec<(f64, f64)>;

#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid TopoJSON: {0}")]
    Topology(#[from] simd_json::Error),
    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),
}

/// A country's outline: polygons of rings, first ring exterior, rest holes
#[derive(Clone, Debug)]
pub struct CountryShape {
    pub name: String,
    pub id: Option<String>,
    pub polygons: Vec<Vec<Ring>>,
    /// (min_lon, min_lat, max_lon, max_lat)
    pub bbox: (f64, f64, f64, f64),
}

impl CountryShape {
    pub fn new(name: String, id: Option<String>, polygons: Vec<Vec<Ring>>) -> Self {
        let mut bbox = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for &(lon, lat) in polygons.iter().flatten().flatten() {
            bbox.0 = bbox.0.min(lon);
            bbox.1 = bbox.1.min(lat);
            bbox.2 = bbox.2.max(lon);
            bbox.3 = bbox.3.max(lat);
        }
        Self { name, id, polygons, bbox }
    }

    /// Even-odd point-in-polygon test over every ring
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let (min_lon, min_lat, max_lon, max_lat) = self.bbox;
        if lon < min_lon || lon > max_lon || lat < min_lat || lat > max_lat {
            return false;
        }
        self.polygons.iter().any(|rings| {
            rings
                .iter()
                .filter(|ring| ring_crosses(ring, lon, lat))
                .count()
                % 2
                == 1
        })
    }
}

/// Ray cast towards +lon; true when the ray crosses the ring an odd number of times
fn ring_crosses(ring: &Ring, x: f64, y: f64) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[derive(Deserialize)]
struct Kind {
    #[serde(rename = "type")]
    kind: String,
}

/// Parse country boundaries from TopoJSON (`countries` object) or a GeoJSON
/// feature collection.
pub fn parse_boundaries(mut bytes: Vec<u8>) -> Result<Vec<CountryShape>, BoundaryError> {
    let kind: Kind = serde_json::from_slice(&bytes)?;
    if kind.kind == "Topology" {
        let topology = Topology::parse(&mut bytes)?;
        return Ok(topology.countries("countries"));
    }

    let geojson: GeoJson = String::from_utf8_lossy(&bytes).parse()?;
    let mut shapes = Vec::new();
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in fc.features {
                let name = feature
                    .properties
                    .as_ref()
                    .and_then(|p| p.get("name").or_else(|| p.get("NAME")).or_else(|| p.get("ADMIN")))
                    .and_then(|v| v.as_str())
                    .unwrap_or("Unknown")
                    .to_string();
                let id = feature.id.as_ref().map(|id| match id {
                    geojson::feature::Id::String(s) => s.clone(),
                    geojson::feature::Id::Number(n) => n.to_string(),
                });
                if let Some(ref geometry) = feature.geometry {
                    let polygons = geometry_polygons(geometry);
                    if !polygons.is_empty() {
                        shapes.push(CountryShape::new(name, id, polygons));
                    }
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                shapes.push(CountryShape::new("Unknown".to_string(), None, geometry_polygons(geometry)));
            }
        }
        GeoJson::Geometry(geometry) => {
            shapes.push(CountryShape::new("Unknown".to_string(), None, geometry_polygons(&geometry)));
        }
    }
    Ok(shapes)
}

fn geometry_polygons(geometry: &Geometry) -> Vec<Vec<Ring>> {
    let ring = |coords: &Vec<Vec<f64>>| -> Ring { coords.iter().map(|c| (c[0], c[1])).collect() };
    match &geometry.value {
        Value::Polygon(rings) => vec![rings.iter().map(ring).collect()],
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .map(|rings| rings.iter().map(ring).collect())
            .collect(),
        Value::GeometryCollection(geometries) => {
            geometries.iter().flat_map(geometry_polygons).collect()
        }
        _ => Vec::new(),
    }
}
