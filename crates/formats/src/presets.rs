use std::collections::BTreeMap;

use serde::Deserialize;

/// Select value that clears the price inputs instead of applying a preset.
pub const CUSTOM_COUNTRY: &str = "CUSTOM";

/// Per-country default prices for the model input form.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CountryPreset {
    #[serde(rename = "gasPrice")]
    pub gas_price: f64,
    #[serde(rename = "fuelPrice")]
    pub fuel_price: f64,
    #[serde(rename = "elecPrice")]
    pub elec_price: f64,
    #[serde(rename = "elecCIntensity")]
    pub elec_c_intensity: f64,
}

/// Country presets file, keyed by country code.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryPresets(BTreeMap<String, CountryPreset>);

impl CountryPresets {
    pub fn from_json_str(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    /// None for unknown codes and for the CUSTOM sentinel.
    pub fn get(&self, country: &str) -> Option<&CountryPreset> {
        if country == CUSTOM_COUNTRY {
            return None;
        }
        self.0.get(country)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{CUSTOM_COUNTRY, CountryPresets};

    const SAMPLE: &str = r#"{
        "FR": {"gasPrice": 30.0, "fuelPrice": 1.8, "elecPrice": 0.2, "elecCIntensity": 55.0},
        "US": {"gasPrice": 12.0, "fuelPrice": 1.1, "elecPrice": 0.15, "elecCIntensity": 380.0}
    }"#;

    #[test]
    fn loads_presets_by_country() {
        let presets = CountryPresets::from_json_str(SAMPLE).expect("parse");
        let fr = presets.get("FR").expect("FR preset");
        assert_eq!(fr.gas_price, 30.0);
        assert_eq!(fr.elec_c_intensity, 55.0);
        assert!(presets.get("DE").is_none());
    }

    #[test]
    fn custom_sentinel_has_no_preset() {
        let presets = CountryPresets::from_json_str(SAMPLE).expect("parse");
        assert!(presets.get(CUSTOM_COUNTRY).is_none());
    }
}
