//! # Punching Shear Check
//!
//! Two-way shear around a rectangular column bearing on a pad.
//!
//! ## Assumptions
//!
//! - Effective depth taken as 0.8 × overall pad depth (min 10 mm)
//! - Critical perimeter b0 = 2(b + d) + 4·d_eff, reduced for edge (0.75)
//!   and corner (0.5) columns
//! - Full axial load is the punching demand, amplified for eccentricity
//!   (capped at +50%) and by a user `alpha` factor
//! - Concrete capacity v_c = 0.33·√f'c
//! - Stirrup recommendation assumes two-legged links at a fixed yield
//!   strength from [`DesignSettings::shear_reinf_fy_mpa`]
//!
//! ## Example
//!
//! ```rust
//! use plinth_core::calculations::punching::{check_punching, PunchingInput};
//! use plinth_core::settings::DesignSettings;
//!
//! let input = PunchingInput::new(800.0, 400.0, 400.0, 500.0, 25.0);
//! let result = check_punching(&input, &DesignSettings::default()).unwrap();
//!
//! assert_eq!(result.d_eff_mm, 400.0);
//! assert_eq!(result.b0_mm, 3200.0);
//! assert!(result.punching_safe);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::concrete::{
    bar_area_mm2, concrete_shear_stress_mpa, eccentricity_factor, effective_depth_mm, governing_eccentricity,
    punching_perimeter_mm,
};
use crate::errors::{ensure_finite, ensure_positive, CalcResult};
use crate::settings::DesignSettings;
use crate::units::{round_to, KiloNewtons, Newtons};

/// Default strength reduction factor for shear
pub const DEFAULT_PHI: f64 = 0.75;

/// Stirrup sizes tried for shear reinforcement, in order of preference (mm)
const STIRRUP_CANDIDATES_MM: [f64; 2] = [10.0, 8.0];

/// Closest practical stirrup spacing (mm)
const MIN_STIRRUP_SPACING_MM: f64 = 75.0;

/// Absolute cap on stirrup spacing (mm)
const MAX_STIRRUP_SPACING_MM: f64 = 300.0;

/// Column position on the pad; trims the effective critical perimeter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnLocation {
    #[default]
    Interior,
    Edge,
    Corner,
}

impl ColumnLocation {
    /// Multiplier applied to the raw perimeter
    pub fn perimeter_factor(&self) -> f64 {
        match self {
            ColumnLocation::Interior => 1.0,
            ColumnLocation::Edge => 0.75,
            ColumnLocation::Corner => 0.5,
        }
    }
}

fn default_phi() -> f64 {
    DEFAULT_PHI
}

fn default_alpha() -> f64 {
    1.0
}

/// Input parameters for a punching shear check.
///
/// ## JSON Example
///
/// ```json
/// {
///   "pu_kn": 2000.0,
///   "col_b_mm": 400.0,
///   "col_d_mm": 400.0,
///   "pad_depth_mm": 500.0,
///   "fc_mpa": 25.0,
///   "location": "edge",
///   "eccentricity_x_m": 0.05
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PunchingInput {
    /// Factored axial load (kN)
    #[serde(alias = "Pu_kN")]
    pub pu_kn: f64,

    /// Column width (mm)
    pub col_b_mm: f64,

    /// Column depth (mm)
    pub col_d_mm: f64,

    /// Overall pad depth (mm)
    pub pad_depth_mm: f64,

    /// Concrete compressive strength f'c (MPa)
    #[serde(alias = "fc_MPa")]
    pub fc_mpa: f64,

    /// Strength reduction factor φ
    #[serde(default = "default_phi")]
    pub phi: f64,

    /// Column position on the pad
    #[serde(default, alias = "column_location")]
    pub location: ColumnLocation,

    /// Load eccentricity along x (m)
    #[serde(default)]
    pub eccentricity_x_m: f64,

    /// Load eccentricity along y (m)
    #[serde(default)]
    pub eccentricity_y_m: f64,

    /// Extra demand multiplier for conservative checks
    #[serde(default = "default_alpha", alias = "alpha_factor")]
    pub alpha: f64,
}

impl PunchingInput {
    /// Interior column, no eccentricity, φ = 0.75, α = 1.0
    pub fn new(pu_kn: f64, col_b_mm: f64, col_d_mm: f64, pad_depth_mm: f64, fc_mpa: f64) -> Self {
        PunchingInput {
            pu_kn,
            col_b_mm,
            col_d_mm,
            pad_depth_mm,
            fc_mpa,
            phi: DEFAULT_PHI,
            location: ColumnLocation::Interior,
            eccentricity_x_m: 0.0,
            eccentricity_y_m: 0.0,
            alpha: 1.0,
        }
    }

    pub fn with_phi(mut self, phi: f64) -> Self {
        self.phi = phi;
        self
    }

    pub fn with_location(mut self, location: ColumnLocation) -> Self {
        self.location = location;
        self
    }

    pub fn with_eccentricity(mut self, eccentricity_x_m: f64, eccentricity_y_m: f64) -> Self {
        self.eccentricity_x_m = eccentricity_x_m;
        self.eccentricity_y_m = eccentricity_y_m;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Validate input parameters.
    ///
    /// Geometry and f'c are clamped later rather than rejected; only values
    /// that cannot produce a meaningful number are errors here.
    pub fn validate(&self) -> CalcResult<()> {
        ensure_finite("pu_kn", self.pu_kn)?;
        ensure_finite("col_b_mm", self.col_b_mm)?;
        ensure_finite("col_d_mm", self.col_d_mm)?;
        ensure_finite("pad_depth_mm", self.pad_depth_mm)?;
        ensure_finite("fc_mpa", self.fc_mpa)?;
        ensure_finite("eccentricity_x_m", self.eccentricity_x_m)?;
        ensure_finite("eccentricity_y_m", self.eccentricity_y_m)?;
        ensure_positive("phi", self.phi, "Strength reduction factor must be positive")?;
        ensure_positive("alpha", self.alpha, "Demand multiplier must be positive")?;
        Ok(())
    }
}

/// Recommended two-legged stirrups when concrete alone is inadequate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShearReinforcement {
    /// Required Av/s (mm²/mm)
    pub av_over_s_mm2_per_mm: f64,

    /// Stirrup bar diameter (mm)
    pub stirrup_dia_mm: f64,

    /// Stirrup spacing (mm)
    pub spacing_mm: f64,
}

/// Results from a punching shear check.
///
/// ## JSON Example
///
/// ```json
/// {
///   "d_eff_mm": 400.0,
///   "b0_mm": 3200.0,
///   "b0_eff_mm": 3200.0,
///   "vu_adj_n": 2000000.0,
///   "v_c_mpa": 1.65,
///   "phi_vc_n": 1584000.0,
///   "utilization_percent": 126.26,
///   "punching_safe": false,
///   "shear_reinforcement": { "av_over_s_mm2_per_mm": 2.880487467, "stirrup_dia_mm": 10.0, "spacing_mm": 300.0 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PunchingResult {
    /// Effective depth (mm)
    pub d_eff_mm: f64,

    /// Raw critical perimeter (mm)
    pub b0_mm: f64,

    /// Location-adjusted critical perimeter (mm)
    pub b0_eff_mm: f64,

    /// Location multiplier applied to b0
    pub perimeter_factor: f64,

    /// Column position used
    pub location: ColumnLocation,

    /// Unamplified demand (N)
    pub vu_n: f64,

    /// Eccentricity amplification applied to the demand
    pub ecc_amplification: f64,

    /// Demand after eccentricity and alpha (N)
    pub vu_adj_n: f64,

    /// Demand shear stress (MPa)
    pub v_u_mpa: f64,

    /// Concrete shear stress capacity (MPa)
    pub v_c_mpa: f64,

    /// Concrete shear capacity (N)
    pub vc_n: f64,

    /// Reduced capacity φVc (N)
    pub phi_vc_n: f64,

    /// Demand / capacity × 100
    pub utilization_percent: f64,

    /// φVc ≥ Vu,adj, compared on the 2 dp values above
    pub punching_safe: bool,

    /// Populated only when the check fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shear_reinforcement: Option<ShearReinforcement>,
}

impl PunchingResult {
    /// Check if the section passes without shear reinforcement
    pub fn passes(&self) -> bool {
        self.punching_safe
    }
}

/// Run the punching shear check.
///
/// # Returns
///
/// * `Ok(PunchingResult)` - Check results
/// * `Err(CalcError::InvalidInput)` - Non-finite inputs or non-positive φ/α
pub fn check_punching(input: &PunchingInput, settings: &DesignSettings) -> CalcResult<PunchingResult> {
    input.validate()?;

    let b = input.col_b_mm.max(1.0);
    let d = input.col_d_mm.max(1.0);
    let pad_depth = input.pad_depth_mm.max(1.0);
    let fc = input.fc_mpa.max(1.0);

    let d_eff_mm = effective_depth_mm(pad_depth);
    let b0_mm = punching_perimeter_mm(b, d, d_eff_mm);
    let perimeter_factor = input.location.perimeter_factor();
    let b0_eff_mm = b0_mm * perimeter_factor;

    // Eccentricity is measured against the column's equivalent square side.
    let ecc = governing_eccentricity(input.eccentricity_x_m, input.eccentricity_y_m);
    let reference_m = ((b * d).sqrt() / 1000.0).max(0.01);
    let ecc_amplification = eccentricity_factor(ecc, reference_m);

    let vu_n = Newtons::from(KiloNewtons(input.pu_kn)).value();
    let vu_adj_n = vu_n * ecc_amplification * input.alpha;

    let shear_area_mm2 = b0_eff_mm * d_eff_mm;
    let v_u_mpa = vu_adj_n / shear_area_mm2;
    let v_c_mpa = concrete_shear_stress_mpa(fc, settings.punching_capacity_coefficient);
    let vc_n = v_c_mpa * shear_area_mm2;
    let phi_vc_n = input.phi * vc_n;

    // Compared at reported precision so the record agrees with its own flag.
    let vu_adj_n = round_to(vu_adj_n, 2);
    let phi_vc_n = round_to(phi_vc_n, 2);
    let punching_safe = phi_vc_n >= vu_adj_n;
    let utilization_percent = if phi_vc_n > 0.0 {
        vu_adj_n / phi_vc_n * 100.0
    } else {
        999.9
    };

    let shear_reinforcement = if punching_safe {
        None
    } else {
        Some(recommend_stirrups(vu_adj_n - phi_vc_n, d_eff_mm, settings))
    };

    tracing::debug!(
        d_eff_mm,
        b0_eff_mm,
        vu_adj_n,
        phi_vc_n,
        punching_safe,
        "punching check evaluated"
    );

    Ok(PunchingResult {
        d_eff_mm: round_to(d_eff_mm, 2),
        b0_mm: round_to(b0_mm, 2),
        b0_eff_mm: round_to(b0_eff_mm, 2),
        perimeter_factor,
        location: input.location,
        vu_n,
        ecc_amplification: round_to(ecc_amplification, 4),
        vu_adj_n,
        v_u_mpa: round_to(v_u_mpa, 6),
        v_c_mpa: round_to(v_c_mpa, 6),
        vc_n: round_to(vc_n, 2),
        phi_vc_n,
        utilization_percent: round_to(utilization_percent, 2),
        punching_safe,
        shear_reinforcement,
    })
}

/// Pick a two-legged stirrup size and spacing covering the shear deficit.
///
/// Av/s = deficit / (0.87·fy·d_eff). Tries 10 mm then 8 mm links and keeps the
/// first whose spacing is at least 75 mm; falls back to 10 mm at the spacing cap.
fn recommend_stirrups(deficit_n: f64, d_eff_mm: f64, settings: &DesignSettings) -> ShearReinforcement {
    let av_over_s = deficit_n / (0.87 * settings.shear_reinf_fy_mpa * d_eff_mm);
    let spacing_cap = (0.75 * d_eff_mm).min(MAX_STIRRUP_SPACING_MM);

    for stirrup_dia_mm in STIRRUP_CANDIDATES_MM {
        let two_leg_area = 2.0 * bar_area_mm2(stirrup_dia_mm);
        let spacing_mm = if av_over_s <= 0.0 {
            spacing_cap
        } else {
            (two_leg_area / av_over_s).min(spacing_cap)
        };
        if spacing_mm >= MIN_STIRRUP_SPACING_MM {
            return ShearReinforcement {
                av_over_s_mm2_per_mm: round_to(av_over_s, 9),
                stirrup_dia_mm,
                spacing_mm: round_to(spacing_mm, 1),
            };
        }
    }

    ShearReinforcement {
        av_over_s_mm2_per_mm: round_to(av_over_s, 9),
        stirrup_dia_mm: STIRRUP_CANDIDATES_MM[0],
        spacing_mm: spacing_cap.floor(),
    }
}
