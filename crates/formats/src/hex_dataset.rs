use std::collections::BTreeMap;

use serde_json::Value;

use scene::HexCell;

#[derive(Debug)]
pub enum HexDatasetError {
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for HexDatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HexDatasetError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            HexDatasetError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for HexDatasetError {}

/// Parses the hex-cell FeatureCollection into scene cells.
///
/// Each feature must be a Polygon with an integer `index` property. All other
/// numeric properties become the cell's variable values; `null` and
/// non-numeric properties are dropped so a missing value stays missing.
pub fn cells_from_geojson_str(payload: &str) -> Result<Vec<HexCell>, HexDatasetError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| HexDatasetError::InvalidFeature {
            index: 0,
            reason: format!("JSON parse error: {e}"),
        })?;
    cells_from_geojson_value(&value)
}

pub fn cells_from_geojson_value(value: &Value) -> Result<Vec<HexCell>, HexDatasetError> {
    let obj = value
        .as_object()
        .ok_or(HexDatasetError::NotAFeatureCollection)?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or(HexDatasetError::NotAFeatureCollection)?;
    if ty != "FeatureCollection" {
        return Err(HexDatasetError::NotAFeatureCollection);
    }

    let features = obj
        .get("features")
        .and_then(|v| v.as_array())
        .ok_or(HexDatasetError::NotAFeatureCollection)?;

    let mut cells = Vec::with_capacity(features.len());
    for (index, feat) in features.iter().enumerate() {
        cells.push(parse_feature(feat).map_err(|reason| HexDatasetError::InvalidFeature {
            index,
            reason,
        })?);
    }
    Ok(cells)
}

fn parse_feature(feat: &Value) -> Result<HexCell, String> {
    let obj = feat.as_object().ok_or("feature must be an object")?;

    let properties = obj
        .get("properties")
        .and_then(|v| v.as_object())
        .ok_or("feature missing properties")?;

    let cell_index = properties
        .get("index")
        .and_then(Value::as_i64)
        .ok_or("properties missing integer index")?;

    let mut values = BTreeMap::new();
    for (key, val) in properties {
        if key == "index" {
            continue;
        }
        if let Some(n) = val.as_f64()
            && n.is_finite()
        {
            values.insert(key.clone(), n);
        }
    }

    let geometry = obj.get("geometry").ok_or("feature missing geometry")?;
    let ring = parse_polygon_ring(geometry)?;

    Ok(HexCell {
        index: cell_index,
        ring,
        values,
    })
}

fn parse_polygon_ring(geometry: &Value) -> Result<Vec<[f64; 2]>, String> {
    let obj = geometry.as_object().ok_or("geometry must be an object")?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type")?;
    if ty != "Polygon" {
        return Err(format!("unsupported geometry type: {ty}"));
    }

    let rings = obj
        .get("coordinates")
        .and_then(|v| v.as_array())
        .ok_or("Polygon coordinates must be an array of rings")?;
    let outer = rings
        .first()
        .and_then(|v| v.as_array())
        .ok_or("Polygon has no outer ring")?;

    let mut ring = Vec::with_capacity(outer.len());
    for pos in outer {
        let arr = pos.as_array().ok_or("ring position must be an array")?;
        if arr.len() < 2 {
            return Err("ring position must have [lon, lat]".to_string());
        }
        let lon = arr[0].as_f64().ok_or("lon must be a number")?;
        let lat = arr[1].as_f64().ok_or("lat must be a number")?;
        ring.push([lon, lat]);
    }

    drop_closing_duplicate(&mut ring);
    if ring.len() < 3 {
        return Err("ring must have at least 3 distinct positions".to_string());
    }
    Ok(ring)
}

fn drop_closing_duplicate(ring: &mut Vec<[f64; 2]>) {
    if ring.len() >= 2 && ring.first() == ring.last() {
        ring.pop();
    }
}
