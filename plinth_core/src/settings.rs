//! # Design Settings
//!
//! Heuristic constants used by the footing engine, gathered in one
//! serializable record so a deployment can tune them without code changes.
//! Every field has a default; a settings file only needs the keys it changes.
//!
//! ## Example
//!
//! ```rust
//! use plinth_core::settings::DesignSettings;
//!
//! let settings: DesignSettings =
//!     serde_json::from_str(r#"{ "crack_width_limit_mm": 0.2 }"#).unwrap();
//! assert_eq!(settings.crack_width_limit_mm, 0.2);
//! assert_eq!(settings.shear_reinf_fy_mpa, 415.0);
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Tunable engineering constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSettings {
    /// Stirrup yield strength assumed when recommending punching reinforcement (MPa)
    pub shear_reinf_fy_mpa: f64,

    /// Concrete modulus used by the slab deflection heuristic (MPa)
    pub concrete_modulus_mpa: f64,

    /// Service steel stress as a fraction of fy for crack-width checks
    pub service_stress_ratio: f64,

    /// Minimum steel ratio applied to the final pad area
    pub min_steel_ratio: f64,

    /// Absolute floor on required steel area (mm²)
    pub min_steel_area_mm2: f64,

    /// Allowable crack width (mm)
    pub crack_width_limit_mm: f64,

    /// Calibration constant of the crack-width heuristic
    pub crack_width_coefficient: f64,

    /// Deflection limit expressed as span / ratio
    pub deflection_span_ratio: f64,

    /// Coefficient on sqrt(fc) for punching shear stress capacity
    pub punching_capacity_coefficient: f64,

    /// Reinforcing steel density for takeoff (kg/m³)
    pub steel_density_kg_m3: f64,

    /// Bar layers counted in the pad grid (top + bottom)
    pub reinforcement_layers: u32,

    /// Upper bound on reinforcement top-up passes
    pub max_topup_passes: u32,
}

impl Default for DesignSettings {
    fn default() -> Self {
        DesignSettings {
            shear_reinf_fy_mpa: 415.0,
            concrete_modulus_mpa: 25_000.0,
            service_stress_ratio: 0.5,
            min_steel_ratio: 0.003,
            min_steel_area_mm2: 100.0,
            crack_width_limit_mm: 0.3,
            crack_width_coefficient: 0.00018,
            deflection_span_ratio: 250.0,
            punching_capacity_coefficient: 0.33,
            steel_density_kg_m3: 7850.0,
            reinforcement_layers: 2,
            max_topup_passes: 8,
        }
    }
}

impl DesignSettings {
    /// Validate that every constant is usable.
    pub fn validate(&self) -> CalcResult<()> {
        let positives = [
            ("shear_reinf_fy_mpa", self.shear_reinf_fy_mpa),
            ("concrete_modulus_mpa", self.concrete_modulus_mpa),
            ("service_stress_ratio", self.service_stress_ratio),
            ("min_steel_ratio", self.min_steel_ratio),
            ("crack_width_limit_mm", self.crack_width_limit_mm),
            ("crack_width_coefficient", self.crack_width_coefficient),
            ("deflection_span_ratio", self.deflection_span_ratio),
            ("punching_capacity_coefficient", self.punching_capacity_coefficient),
            ("steel_density_kg_m3", self.steel_density_kg_m3),
        ];
        for (field, value) in positives {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::invalid_input(field, value.to_string(), "Setting must be positive"));
            }
        }
        if !self.min_steel_area_mm2.is_finite() || self.min_steel_area_mm2 < 0.0 {
            return Err(CalcError::invalid_input(
                "min_steel_area_mm2",
                self.min_steel_area_mm2.to_string(),
                "Setting cannot be negative",
            ));
        }
        if self.reinforcement_layers == 0 {
            return Err(CalcError::invalid_input("reinforcement_layers", "0", "At least one layer is required"));
        }
        Ok(())
    }
}

/// Load settings from a JSON file and validate them.
pub fn load_settings(path: &Path) -> CalcResult<DesignSettings> {
    let mut file = File::open(path).map_err(|e| {
        CalcError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CalcError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    let settings: DesignSettings =
        serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    #[test]
    fn test_defaults_are_valid() {
        let settings = DesignSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.reinforcement_layers, 2);
        assert_eq!(settings.concrete_modulus_mpa, 25_000.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: DesignSettings = serde_json::from_str(r#"{ "min_steel_ratio": 0.0018 }"#).unwrap();
        assert_eq!(settings.min_steel_ratio, 0.0018);
        assert_eq!(settings.steel_density_kg_m3, 7850.0);
    }

    #[test]
    fn test_rejects_zero_layers() {
        let settings = DesignSettings {
            reinforcement_layers: 0,
            ..DesignSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_settings_file() {
        let path = temp_dir().join(format!("plinth_settings_{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "crack_width_limit_mm": 0.2, "max_topup_passes": 3 }"#).unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.crack_width_limit_mm, 0.2);
        assert_eq!(settings.max_topup_passes, 3);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_settings_missing_file() {
        let err = load_settings(Path::new("/nonexistent/plinth.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }
}
