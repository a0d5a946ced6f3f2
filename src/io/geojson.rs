use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon, Rect};
use log::warn;
use serde_json::{json, Map, Value};

use crate::boundary::{AdmLevel, BoundaryFeature};
use crate::hierarchy::Outcome;

/// Read one level's FeatureCollection from disk.
///
/// An unreadable or unparsable file is fatal. A feature missing its required
/// properties or geometry member is structurally invalid: skipped, counted,
/// and reported through the second return value; the rest of the file still
/// loads. A feature whose geometry parses to zero usable parts is kept; it
/// resolves through the unmatched fallback instead of disappearing.
pub fn read_features(path: &Path, level: AdmLevel) -> Result<(Vec<BoundaryFeature>, usize)> {
    let bytes = fs::read(path)
        .with_context(|| format!("read {}", path.display()))?;
    let value: Value = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse GeoJSON from {}", path.display()))?;

    let raw = value["features"]
        .as_array()
        .with_context(|| format!("{} is not a FeatureCollection", path.display()))?;

    let mut features = Vec::with_capacity(raw.len());
    let mut skipped = 0;
    for (pos, feature) in raw.iter().enumerate() {
        match parse_feature(feature, level) {
            Some(feature) => features.push(feature),
            None => {
                warn!(
                    "skipping structurally invalid {} feature #{pos} in {}",
                    level.to_str(),
                    path.display()
                );
                skipped += 1;
            }
        }
    }
    Ok((features, skipped))
}

fn parse_feature(feature: &Value, level: AdmLevel) -> Option<BoundaryFeature> {
    let props = feature["properties"].as_object()?;
    let id = props.get("shapeID")?.as_str()?;
    let name = props.get("shapeName").and_then(Value::as_str);

    let geometry = feature["geometry"].as_object()?;
    let coords = geometry.get("coordinates")?.as_array()?;
    let polygons = match geometry.get("type")?.as_str()? {
        "Polygon" => parse_polygon_coords(coords).into_iter().collect(),
        "MultiPolygon" => coords
            .iter()
            .filter_map(|rings| rings.as_array().and_then(|r| parse_polygon_coords(r)))
            .collect(),
        _ => return None,
    };

    Some(BoundaryFeature::new(level, id, name, MultiPolygon(polygons)))
}

/// Parse one GeoJSON polygon: first ring exterior, remaining rings holes.
/// Rings that stay shorter than four coordinates after closing are dropped;
/// a dropped exterior drops the whole part.
fn parse_polygon_coords(rings: &[Value]) -> Option<Polygon<f64>> {
    let mut rings = rings.iter().filter_map(|ring| {
        ring.as_array().and_then(|coords| parse_ring_coords(coords))
    });
    let exterior = rings.next()?;
    Some(Polygon::new(exterior, rings.collect()))
}

/// Parse a ring (exterior or interior) from GeoJSON coordinates.
fn parse_ring_coords(coords: &[Value]) -> Option<LineString<f64>> {
    let mut points = Vec::with_capacity(coords.len());
    for pair in coords {
        let pair = pair.as_array()?;
        let x = pair.first()?.as_f64()?;
        let y = pair.get(1)?.as_f64()?;
        points.push(Coord { x, y });
    }

    // Ensure ring is closed (first point == last point)
    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }
    if points.len() < 4 {
        return None;
    }
    Some(LineString(points))
}

/// Convert a MultiPolygon to a GeoJSON geometry value.
pub fn multipolygon_to_geojson(mp: &MultiPolygon<f64>) -> Value {
    let polygons: Vec<Value> = mp.0.iter().map(|polygon| {
        let mut rings: Vec<Value> = Vec::with_capacity(1 + polygon.interiors().len());
        rings.push(ring_to_json(polygon.exterior()));
        rings.extend(polygon.interiors().iter().map(ring_to_json));
        Value::Array(rings)
    }).collect();

    json!({
        "type": "MultiPolygon",
        "coordinates": polygons,
    })
}

fn ring_to_json(ring: &LineString<f64>) -> Value {
    Value::Array(ring.coords().map(|c| json!([c.x, c.y])).collect())
}

/// Serialize one resolved child. All four resolution keys are always
/// present, null when unset, so consumers can tell "checked and found
/// nothing" from "never checked".
pub fn resolved_record(
    feature: &BoundaryFeature,
    outcome: &Outcome,
    bbox: Option<&Rect<f64>>,
) -> Value {
    let mut properties = Map::new();
    properties.insert("shapeID".into(), json!(feature.id.as_ref()));
    properties.insert("shapeName".into(), json!(feature.name_str()));
    properties.insert("parent_id".into(), json!(outcome.parent_id()));
    properties.insert("parent_name".into(), json!(outcome.parent_name()));
    properties.insert("state_name".into(), json!(outcome.state_name()));
    properties.insert("parent_state".into(), json!(outcome.parent_state()));

    let mut record = Map::new();
    record.insert("type".into(), json!("Feature"));
    record.insert("id".into(), json!(feature.id.as_ref()));
    if let Some(rect) = bbox {
        record.insert(
            "bbox".into(),
            json!([rect.min().x, rect.min().y, rect.max().x, rect.max().y]),
        );
    }
    record.insert("geometry".into(), multipolygon_to_geojson(&feature.geometry));
    record.insert("properties".into(), Value::Object(properties));
    Value::Object(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_is_closed_on_parse() {
        let coords: Value = json!([[0., 0.], [4., 0.], [4., 4.], [0., 4.]]);
        let ring = parse_ring_coords(coords.as_array().unwrap()).unwrap();
        assert_eq!(ring.0.len(), 5);
        assert_eq!(ring.0[0], ring.0[4]);
    }

    #[test]
    fn short_ring_rejected() {
        let coords: Value = json!([[0., 0.], [1., 1.]]);
        assert!(parse_ring_coords(coords.as_array().unwrap()).is_none());
    }

    #[test]
    fn polygon_and_multipolygon_both_parse() {
        let poly = json!({
            "properties": {"shapeID": "X-1", "shapeName": "X"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0., 0.], [4., 0.], [4., 4.], [0., 4.], [0., 0.]]],
            },
        });
        let multi = json!({
            "properties": {"shapeID": "Y-1", "shapeName": "Y"},
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [
                    [[[0., 0.], [1., 0.], [1., 1.], [0., 1.], [0., 0.]]],
                    [[[2., 2.], [3., 2.], [3., 3.], [2., 3.], [2., 2.]]],
                ],
            },
        });

        let p = parse_feature(&poly, AdmLevel::Adm1).unwrap();
        assert_eq!(p.parts().len(), 1);
        let m = parse_feature(&multi, AdmLevel::Adm1).unwrap();
        assert_eq!(m.parts().len(), 2);
    }

    #[test]
    fn missing_shape_id_is_structural() {
        let feature = json!({
            "properties": {"shapeName": "X"},
            "geometry": {"type": "Polygon", "coordinates": []},
        });
        assert!(parse_feature(&feature, AdmLevel::Adm2).is_none());
    }

    #[test]
    fn degenerate_geometry_keeps_feature_with_no_parts() {
        let feature = json!({
            "properties": {"shapeID": "X-1"},
            "geometry": {"type": "Polygon", "coordinates": [[[0., 0.], [1., 1.]]]},
        });
        let parsed = parse_feature(&feature, AdmLevel::Adm3).unwrap();
        assert!(parsed.parts().is_empty());
        assert!(parsed.bbox().is_none());
    }

    #[test]
    fn resolved_record_always_carries_all_resolution_keys() {
        let feature = BoundaryFeature::new(
            AdmLevel::Adm3,
            "X-1",
            Some("X"),
            MultiPolygon(vec![]),
        );
        let record = resolved_record(&feature, &Outcome::Unmatched, None);
        let props = record["properties"].as_object().unwrap();
        for key in ["parent_id", "parent_name", "state_name", "parent_state"] {
            assert!(props.contains_key(key), "missing {key}");
            assert!(props[key].is_null());
        }
        assert!(record.get("bbox").is_none());
    }
}
