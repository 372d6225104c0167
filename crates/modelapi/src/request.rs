use serde::Serialize;

/// HFO price applied when the input is left blank.
pub const DEFAULT_HFO_PRICE: f64 = 620.0;

/// Raw form inputs exactly as the user typed them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunForm {
    pub gas_price: String,
    pub fuel_price: String,
    pub elec_price: String,
    pub elec_c_intensity: String,
    pub ccs_cost: String,
    pub ccs_eff: String,
    pub hfo_price: String,
    pub precip_surface: String,
    pub country: String,
}

/// Validated request body for the model endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRequest {
    #[serde(rename = "gasPrice")]
    pub gas_price: f64,
    #[serde(rename = "fuelPrice")]
    pub fuel_price: f64,
    #[serde(rename = "elecPrice")]
    pub elec_price: f64,
    #[serde(rename = "elecCIntensity")]
    pub elec_c_intensity: f64,
    #[serde(rename = "CCS_cost")]
    pub ccs_cost: f64,
    /// Fraction in [0, 1]; the form field is a percentage.
    #[serde(rename = "CCS_eff")]
    pub ccs_eff: f64,
    #[serde(rename = "hfoPrice")]
    pub hfo_price: f64,
    pub precip_surface: String,
    pub country: String,
}

impl RunForm {
    /// Validates every field, collecting all missing or non-numeric inputs.
    ///
    /// HFO price may be blank (it falls back to [`DEFAULT_HFO_PRICE`]) but a
    /// filled non-numeric value is rejected. CCS efficiency is entered as a
    /// percentage and sent as a fraction.
    pub fn validate(&self) -> Result<RunRequest, Vec<&'static str>> {
        let mut missing = Vec::new();

        let gas_price = parse_number(&self.gas_price);
        let fuel_price = parse_number(&self.fuel_price);
        let elec_price = parse_number(&self.elec_price);
        let elec_c_intensity = parse_number(&self.elec_c_intensity);
        let ccs_cost = parse_number(&self.ccs_cost);
        let ccs_eff = parse_number(&self.ccs_eff).map(|v| v / 100.0);

        if gas_price.is_none() {
            missing.push("Gas Price");
        }
        if fuel_price.is_none() {
            missing.push("Fuel Price");
        }
        if elec_price.is_none() {
            missing.push("Electricity Price");
        }
        if elec_c_intensity.is_none() {
            missing.push("Electricity Carbon Intensity");
        }
        if ccs_cost.is_none() {
            missing.push("CCS Cost");
        }
        if ccs_eff.is_none() {
            missing.push("CCS Efficiency");
        }

        let hfo_raw = self.hfo_price.trim();
        let hfo_price = if hfo_raw.is_empty() {
            Some(DEFAULT_HFO_PRICE)
        } else {
            parse_number(hfo_raw)
        };
        if hfo_price.is_none() {
            missing.push("HFO Price");
        }

        if self.precip_surface.is_empty() {
            missing.push("Reactive Precipitation Area");
        }
        if self.country.is_empty() {
            missing.push("Country");
        }

        if !missing.is_empty() {
            return Err(missing);
        }

        Ok(RunRequest {
            gas_price: gas_price.unwrap_or_default(),
            fuel_price: fuel_price.unwrap_or_default(),
            elec_price: elec_price.unwrap_or_default(),
            elec_c_intensity: elec_c_intensity.unwrap_or_default(),
            ccs_cost: ccs_cost.unwrap_or_default(),
            ccs_eff: ccs_eff.unwrap_or_default(),
            hfo_price: hfo_price.unwrap_or_default(),
            precip_surface: self.precip_surface.clone(),
            country: self.country.clone(),
        })
    }
}

/// Message shown when validation fails.
pub fn missing_fields_message(missing: &[&str]) -> String {
    format!("Please add {}", missing.join(", "))
}

fn parse_number(raw: &str) -> Option<f64> {
    let v: f64 = raw.trim().parse().ok()?;
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_HFO_PRICE, RunForm, missing_fields_message};

    fn filled_form() -> RunForm {
        RunForm {
            gas_price: "30".to_string(),
            fuel_price: "1.8".to_string(),
            elec_price: "0.2".to_string(),
            elec_c_intensity: "55".to_string(),
            ccs_cost: "80".to_string(),
            ccs_eff: "90".to_string(),
            hfo_price: "".to_string(),
            precip_surface: "A1".to_string(),
            country: "FR".to_string(),
        }
    }

    #[test]
    fn valid_form_builds_request() {
        let req = filled_form().validate().expect("valid");
        assert_eq!(req.gas_price, 30.0);
        assert_eq!(req.ccs_eff, 0.9);
        assert_eq!(req.hfo_price, DEFAULT_HFO_PRICE);
        assert_eq!(req.country, "FR");
    }

    #[test]
    fn blank_hfo_defaults_but_garbage_is_rejected() {
        let mut form = filled_form();
        form.hfo_price = "abc".to_string();
        let missing = form.validate().unwrap_err();
        assert_eq!(missing, vec!["HFO Price"]);
    }

    #[test]
    fn collects_every_missing_field_in_form_order() {
        let form = RunForm::default();
        let missing = form.validate().unwrap_err();
        assert_eq!(
            missing,
            vec![
                "Gas Price",
                "Fuel Price",
                "Electricity Price",
                "Electricity Carbon Intensity",
                "CCS Cost",
                "CCS Efficiency",
                "Reactive Precipitation Area",
                "Country",
            ]
        );
        assert_eq!(
            missing_fields_message(&missing[..2]),
            "Please add Gas Price, Fuel Price"
        );
    }

    #[test]
    fn serializes_with_backend_field_names() {
        let req = filled_form().validate().expect("valid");
        let json = serde_json::to_value(&req).expect("serialize");
        assert_eq!(json["gasPrice"], 30.0);
        assert_eq!(json["CCS_cost"], 80.0);
        assert_eq!(json["CCS_eff"], 0.9);
        assert_eq!(json["hfoPrice"], DEFAULT_HFO_PRICE);
        assert_eq!(json["precip_surface"], "A1");
    }
}
