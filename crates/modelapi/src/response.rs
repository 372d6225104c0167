use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// Successful model run payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RunResponse {
    #[serde(rename = "landCost")]
    pub land_cost: f64,
    #[serde(rename = "landEmission")]
    pub land_emission: f64,
    /// GeoJSON FeatureCollection carrying the per-cell model outputs.
    pub json_output: Value,
}

impl RunResponse {
    pub fn from_json_str(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    /// Per-cell value updates keyed by cell index.
    ///
    /// Only the feature properties matter here; geometry stays with the
    /// dataset loaded at startup. Features without an integer `index` and
    /// non-numeric properties are skipped.
    pub fn cell_updates(&self) -> Vec<(i64, BTreeMap<String, f64>)> {
        let Some(features) = self
            .json_output
            .get("features")
            .and_then(Value::as_array)
        else {
            return Vec::new();
        };

        let mut updates = Vec::with_capacity(features.len());
        for feat in features {
            let Some(props) = feat.get("properties").and_then(Value::as_object) else {
                continue;
            };
            let Some(index) = props.get("index").and_then(Value::as_i64) else {
                continue;
            };
            let mut values = BTreeMap::new();
            for (key, val) in props {
                if key == "index" {
                    continue;
                }
                if let Some(n) = val.as_f64()
                    && n.is_finite()
                {
                    values.insert(key.clone(), n);
                }
            }
            updates.push((index, values));
        }
        updates
    }

    /// Land-side summary shown in the result panel, two decimals.
    pub fn summary_lines(&self) -> [String; 2] {
        [
            format!("Land Emission: {:.2} tCO2/tCa(OH)2", self.land_emission),
            format!("Land Cost: {:.2} $/tCa(OH)2", self.land_cost),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::RunResponse;

    const SAMPLE: &str = r#"{
        "landCost": 123.456,
        "landEmission": 0.789,
        "metadata": {"runtime_s": 4.2},
        "json_output": {
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature",
                 "properties": {"index": 2, "eff": 0.5, "name": "atl", "dic": null}},
                {"type": "Feature",
                 "properties": {"eff": 0.9}},
                {"type": "Feature",
                 "properties": {"index": 7, "eff": 0.8}}
            ]
        }
    }"#;

    #[test]
    fn parses_and_ignores_unknown_metadata() {
        let resp = RunResponse::from_json_str(SAMPLE).expect("parse");
        assert_eq!(resp.land_cost, 123.456);
        assert_eq!(resp.land_emission, 0.789);
    }

    #[test]
    fn cell_updates_keep_numeric_properties_only() {
        let resp = RunResponse::from_json_str(SAMPLE).expect("parse");
        let updates = resp.cell_updates();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].0, 2);
        assert_eq!(updates[0].1.get("eff"), Some(&0.5));
        assert!(!updates[0].1.contains_key("name"));
        assert!(!updates[0].1.contains_key("dic"));
        assert_eq!(updates[1].0, 7);
    }

    #[test]
    fn summary_lines_use_two_decimals() {
        let resp = RunResponse::from_json_str(SAMPLE).expect("parse");
        let [emission, cost] = resp.summary_lines();
        assert_eq!(emission, "Land Emission: 0.79 tCO2/tCa(OH)2");
        assert_eq!(cost, "Land Cost: 123.46 $/tCa(OH)2");
    }
}
