//! # Serviceability Checks
//!
//! Quick indicators for crack width and slab strip deflection. Both are
//! heuristics meant to flag obviously poor layouts, not code-level checks.
//!
//! ## Crack width
//!
//! w = k · c_w · (s − 2·cover) · f_s, with c_w = 0.00018 and a 0.3 mm limit.
//! Spacing, cover, stress and bar diameter are clamped to sane minimums
//! (10 mm, 5 mm, 0 MPa, 6 mm).
//!
//! ## Deflection
//!
//! Simply supported strip under uniform load with the gross inertia taken
//! per unit width (h³/12) and concrete modulus 25 000 MPa. Long-term
//! deflection = short-term × creep, limit L/250. The inertia is not scaled
//! by the strip width.
//!
//! ## Example
//!
//! ```rust
//! use plinth_core::calculations::serviceability::{crack_width_check, CrackWidthInput};
//! use plinth_core::settings::DesignSettings;
//!
//! let input = CrackWidthInput::new(150.0, 50.0, 100.0);
//! let result = crack_width_check(&input, &DesignSettings::default()).unwrap();
//!
//! // 0.00018 × (150 − 100) × 100 = 0.9 mm
//! assert!((result.estimated_mm - 0.9).abs() < 1e-9);
//! assert!(!result.passes);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::concrete::{strip_gross_inertia, uniform_load_max_deflection};
use crate::errors::{ensure_finite, ensure_positive, CalcResult};
use crate::settings::DesignSettings;
use crate::units::{round_to, Meters, Millimeters};

/// Bar diameter assumed by the crack-width heuristic when none is given (mm)
pub const DEFAULT_CRACK_BAR_DIA_MM: f64 = 12.0;

/// Steel modulus echoed by the deflection check (MPa)
pub const DEFAULT_STEEL_MODULUS_MPA: f64 = 200_000.0;

/// Long-term creep multiplier
pub const DEFAULT_CREEP_FACTOR: f64 = 2.0;

fn default_bar_dia() -> f64 {
    DEFAULT_CRACK_BAR_DIA_MM
}

fn default_k() -> f64 {
    1.0
}

fn default_es() -> f64 {
    DEFAULT_STEEL_MODULUS_MPA
}

fn default_creep() -> f64 {
    DEFAULT_CREEP_FACTOR
}

/// Which serviceability criterion a result describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceabilityCheck {
    CrackWidth,
    Deflection,
}

/// Input for the crack-width indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrackWidthInput {
    /// Bar spacing (mm)
    #[serde(alias = "bar_spacing_mm")]
    pub spacing_mm: f64,

    /// Clear cover (mm)
    pub cover_mm: f64,

    /// Service steel stress (MPa)
    #[serde(alias = "stress_steel_MPa")]
    pub steel_stress_mpa: f64,

    /// Bar diameter (mm)
    #[serde(default = "default_bar_dia")]
    pub bar_dia_mm: f64,

    /// Calibration multiplier
    #[serde(default = "default_k", alias = "k_factor")]
    pub k: f64,
}

impl CrackWidthInput {
    /// 12 mm bars, k = 1.0
    pub fn new(spacing_mm: f64, cover_mm: f64, steel_stress_mpa: f64) -> Self {
        CrackWidthInput {
            spacing_mm,
            cover_mm,
            steel_stress_mpa,
            bar_dia_mm: DEFAULT_CRACK_BAR_DIA_MM,
            k: 1.0,
        }
    }

    pub fn with_bar_dia(mut self, bar_dia_mm: f64) -> Self {
        self.bar_dia_mm = bar_dia_mm;
        self
    }

    pub fn with_k(mut self, k: f64) -> Self {
        self.k = k;
        self
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        ensure_finite("spacing_mm", self.spacing_mm)?;
        ensure_finite("cover_mm", self.cover_mm)?;
        ensure_finite("steel_stress_mpa", self.steel_stress_mpa)?;
        ensure_finite("bar_dia_mm", self.bar_dia_mm)?;
        ensure_finite("k", self.k)?;
        Ok(())
    }
}

/// Input for the slab strip deflection check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeflectionInput {
    /// Simply supported span (m)
    pub span_m: f64,

    /// Gross slab thickness (mm)
    pub thickness_mm: f64,

    /// Line load on a 1 m strip (kN/m)
    #[serde(alias = "w_kN_per_m")]
    pub load_kn_per_m: f64,

    /// Steel modulus (MPa); recorded only
    #[serde(default = "default_es", alias = "Es_MPa")]
    pub es_mpa: f64,

    /// Long-term multiplier on short-term deflection
    #[serde(default = "default_creep", alias = "creep_coeff")]
    pub creep: f64,
}

impl DeflectionInput {
    pub fn new(span_m: f64, thickness_mm: f64, load_kn_per_m: f64) -> Self {
        DeflectionInput {
            span_m,
            thickness_mm,
            load_kn_per_m,
            es_mpa: DEFAULT_STEEL_MODULUS_MPA,
            creep: DEFAULT_CREEP_FACTOR,
        }
    }

    pub fn with_creep(mut self, creep: f64) -> Self {
        self.creep = creep;
        self
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        ensure_positive("span_m", self.span_m, "Span must be positive")?;
        ensure_positive("thickness_mm", self.thickness_mm, "Thickness must be positive")?;
        ensure_finite("load_kn_per_m", self.load_kn_per_m)?;
        ensure_finite("es_mpa", self.es_mpa)?;
        ensure_finite("creep", self.creep)?;
        Ok(())
    }
}

/// Result of a crack-width or deflection check.
///
/// ## JSON Example
///
/// ```json
/// {
///   "check": "deflection",
///   "estimated_mm": 4000.0,
///   "allowable_mm": 16.0,
///   "passes": false,
///   "short_term_mm": 2000.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceabilityResult {
    /// Criterion evaluated
    pub check: ServiceabilityCheck,

    /// Estimated crack width or long-term deflection (mm)
    pub estimated_mm: f64,

    /// Allowable value (mm)
    pub allowable_mm: f64,

    /// estimated_mm ≤ allowable_mm
    pub passes: bool,

    /// Short-term deflection (deflection checks only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_term_mm: Option<f64>,
}

/// Estimate crack width from bar spacing, cover and steel stress.
pub fn crack_width_check(input: &CrackWidthInput, settings: &DesignSettings) -> CalcResult<ServiceabilityResult> {
    input.validate()?;

    let spacing = input.spacing_mm.max(10.0);
    let cover = input.cover_mm.max(5.0);
    let stress = input.steel_stress_mpa.max(0.0);
    // Clamped for parity with the other inputs; the heuristic does not use it.
    let _bar_dia = input.bar_dia_mm.max(6.0);

    let estimated_mm = input.k * settings.crack_width_coefficient * (spacing - 2.0 * cover) * stress;
    let allowable_mm = settings.crack_width_limit_mm;
    let passes = estimated_mm <= allowable_mm;

    tracing::debug!(spacing, cover, stress, estimated_mm, passes, "crack width estimated");

    Ok(ServiceabilityResult {
        check: ServiceabilityCheck::CrackWidth,
        estimated_mm: round_to(estimated_mm, 4),
        allowable_mm,
        passes,
        short_term_mm: None,
    })
}

/// Elastic deflection of a simply supported 1 m slab strip with creep.
pub fn slab_deflection_check(input: &DeflectionInput, settings: &DesignSettings) -> CalcResult<ServiceabilityResult> {
    input.validate()?;

    let span_mm = Millimeters::from(Meters(input.span_m)).value();
    // kN/m is numerically N/mm.
    let w_n_per_mm = input.load_kn_per_m;
    let inertia = strip_gross_inertia(input.thickness_mm);

    let short_term_mm = uniform_load_max_deflection(w_n_per_mm, span_mm, settings.concrete_modulus_mpa, inertia);
    let long_term_mm = short_term_mm * input.creep;
    let allowable_mm = span_mm / settings.deflection_span_ratio;
    let passes = long_term_mm <= allowable_mm;

    tracing::debug!(short_term_mm, long_term_mm, allowable_mm, passes, "slab deflection estimated");

    Ok(ServiceabilityResult {
        check: ServiceabilityCheck::Deflection,
        estimated_mm: round_to(long_term_mm, 3),
        allowable_mm: round_to(allowable_mm, 3),
        passes,
        short_term_mm: Some(round_to(short_term_mm, 3)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> DesignSettings {
        DesignSettings::default()
    }

    #[test]
    fn test_crack_width_formula() {
        // 0.00018 × (150 − 50) × 207.5 = 3.735 mm
        let result = crack_width_check(&CrackWidthInput::new(150.0, 25.0, 207.5), &settings()).unwrap();
        assert!((result.estimated_mm - 3.735).abs() < 1e-9);
        assert_eq!(result.allowable_mm, 0.3);
        assert!(!result.passes);
        assert_eq!(result.check, ServiceabilityCheck::CrackWidth);
    }

    #[test]
    fn test_crack_width_clamps() {
        // spacing → 10, cover → 5, stress → 0
        let result = crack_width_check(&CrackWidthInput::new(0.0, 0.0, -50.0), &settings()).unwrap();
        assert_eq!(result.estimated_mm, 0.0);
        assert!(result.passes);
    }

    #[test]
    fn test_crack_width_monotonic_in_stress() {
        let mut last = f64::NEG_INFINITY;
        for stress in [10.0, 50.0, 100.0, 200.0, 400.0] {
            let result = crack_width_check(&CrackWidthInput::new(200.0, 40.0, stress), &settings()).unwrap();
            assert!(result.estimated_mm > last, "stress {} gave {}", stress, result.estimated_mm);
            last = result.estimated_mm;
        }
    }

    #[test]
    fn test_crack_width_k_factor() {
        let base = crack_width_check(&CrackWidthInput::new(150.0, 25.0, 100.0), &settings()).unwrap();
        let doubled = crack_width_check(&CrackWidthInput::new(150.0, 25.0, 100.0).with_k(2.0), &settings()).unwrap();
        assert!((doubled.estimated_mm - 2.0 * base.estimated_mm).abs() < 1e-9);
    }

    #[test]
    fn test_crack_width_rejects_nan() {
        assert!(crack_width_check(&CrackWidthInput::new(f64::NAN, 25.0, 100.0), &settings()).is_err());
    }

    #[test]
    fn test_deflection_values() {
        // L = 4000 mm, h = 200 mm, w = 10 N/mm
        // I = 200³/12 = 666 666.7 mm⁴ per mm of width
        // δ_st = 5 × 10 × 4000⁴ / (384 × 25000 × 666 666.7) = 2000 mm
        let result = slab_deflection_check(&DeflectionInput::new(4.0, 200.0, 10.0), &settings()).unwrap();
        assert!((result.short_term_mm.unwrap() - 2000.0).abs() < 1e-3);
        assert!((result.estimated_mm - 4000.0).abs() < 1e-3);
        assert_eq!(result.allowable_mm, 16.0);
        assert!(!result.passes);
    }

    #[test]
    fn test_deflection_passes_stiff_lightly_loaded_strip() {
        // L = 1000 mm, h = 500 mm, w = 1 N/mm
        // I = 500³/12 = 1.0417e7 mm⁴
        // δ_st = 5 × 1 × 1000⁴ / (384 × 25000 × 1.0417e7) = 0.05 mm
        let result = slab_deflection_check(&DeflectionInput::new(1.0, 500.0, 1.0), &settings()).unwrap();
        assert!((result.short_term_mm.unwrap() - 0.05).abs() < 1e-9);
        assert!((result.estimated_mm - 0.1).abs() < 1e-9);
        assert_eq!(result.allowable_mm, 4.0);
        assert!(result.passes);
    }

    #[test]
    fn test_deflection_fails_thin_slab() {
        let result = slab_deflection_check(&DeflectionInput::new(6.0, 100.0, 10.0), &settings()).unwrap();
        assert!(!result.passes);
        assert_eq!(result.passes, result.estimated_mm <= result.allowable_mm);
    }

    #[test]
    fn test_deflection_creep_scales_long_term() {
        let result =
            slab_deflection_check(&DeflectionInput::new(4.0, 200.0, 10.0).with_creep(3.0), &settings()).unwrap();
        assert!((result.estimated_mm - 6000.0).abs() < 1e-3);
    }

    #[test]
    fn test_deflection_rejects_zero_thickness() {
        let err = slab_deflection_check(&DeflectionInput::new(4.0, 0.0, 10.0), &settings()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_json_aliases() {
        let json = r#"{ "bar_spacing_mm": 150.0, "cover_mm": 25.0, "stress_steel_MPa": 200.0 }"#;
        let input: CrackWidthInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.spacing_mm, 150.0);
        assert_eq!(input.bar_dia_mm, 12.0);
    }
}
