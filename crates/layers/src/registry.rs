//! Display metadata for known model variables.
//!
//! Unknown keys fall back to the raw key with no unit, so new model outputs
//! show up in the UI without a code change.

pub fn unit_for(key: &str) -> &'static str {
    match key {
        "eff" => "(%)",
        "salt" => "(psu)",
        "temp" => "(°C)",
        "alk" => "(umol/kg)",
        "dic" => "(umol/kg)",
        "net_removal" => "(tCO2/tCa(OH)2)",
        "net_cost" => "($/tCO2)",
        "Days_at_Sea" => "(days)",
        "ocean_emis" => "(tCO2/tCa(OH)2)",
        "ocean_cost" => "($/tCa(OH)2)",
        "chem_eff" => "(molCO2/molAlk)",
        "tot_eff_A001" | "tot_eff_A01" | "tot_eff_A1" | "tot_eff_A10" => "(tCO2/tCa(OH)2)",
        "pr_eff_A001" | "pr_eff_A01" | "pr_eff_A1" | "pr_eff_A10" => "(%)",
        _ => "",
    }
}

pub fn label_for(key: &str) -> Option<&'static str> {
    Some(match key {
        "eff" => "Efficiency",
        "salt" => "Salinity",
        "temp" => "Temperature",
        "alk" => "Alkalinity",
        "dic" => "DIC",
        "net_removal" => "Net Removal",
        "net_cost" => "CDR Cost",
        "ocean_emis" => "Ocean Emissions",
        "ocean_cost" => "Ocean Cost",
        "chem_eff" => "Chemical Efficiency",
        "tot_eff_A001" | "tot_eff_A01" | "tot_eff_A1" | "tot_eff_A10" => "CO₂ Removal",
        "pr_eff_A001" | "pr_eff_A01" | "pr_eff_A1" | "pr_eff_A10" => "Secondary Precipitation",
        _ => return None,
    })
}

/// Button text for the layer selector.
pub fn display_label(key: &str) -> &str {
    label_for(key).unwrap_or(key)
}
