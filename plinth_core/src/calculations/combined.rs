//! # Combined Footing
//!
//! Orchestrates a single-column or two-column pad on top of the isolated
//! footing engine, then re-runs punching and crack width against the
//! aggregate load and attaches a material takeoff.
//!
//! ## Modes
//!
//! - **single**: a positive `pu_kn` is present; the request is an isolated pad
//! - **two_column**: `p1_kn` and `p2_kn` are summed and sized as one square
//!   pad of side √(P/q), with column 1 used for punching geometry
//!
//! An optional strap beam ([`StrapDetails`]) is carried through to the
//! takeoff and drawings. Its length falls back to the column spacing.
//!
//! ## Example
//!
//! ```rust
//! use plinth_core::calculations::combined::{design_combined, CombinedFootingInput, FootingMode};
//! use plinth_core::settings::DesignSettings;
//!
//! let input = CombinedFootingInput::two_column(600.0, 900.0);
//! let result = design_combined(&input, &DesignSettings::default(), None).unwrap();
//!
//! assert_eq!(result.mode, FootingMode::TwoColumn);
//! assert_eq!(result.total_load_kn, 1500.0);
//! assert_eq!(result.pad_side_m, 3.162);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::footing::{
    size_footing, DrawingParams, FootingInput, FootingResult, DEFAULT_COLUMN_MM, DEFAULT_COVER_MM,
};
use crate::calculations::punching::{check_punching, ColumnLocation, PunchingInput, PunchingResult, DEFAULT_PHI};
use crate::calculations::serviceability::{
    crack_width_check, CrackWidthInput, ServiceabilityResult, DEFAULT_CRACK_BAR_DIA_MM,
};
use crate::calculations::takeoff::{estimate_takeoff, TakeoffSummary};
use crate::calculations::SubCheck;
use crate::errors::{ensure_finite, CalcError, CalcResult};
use crate::reports::{write_design_reports, ReportPaths, ReportSink};
use crate::settings::DesignSettings;
use crate::units::round_to;

/// Soil pressure assumed when none is given (kN/m²)
pub const DEFAULT_SOIL_ALLOW_KN_PER_M2: f64 = 150.0;

/// Pad depth assumed when none is given (mm)
pub const DEFAULT_PAD_DEPTH_MM: f64 = 500.0;

/// Concrete strength assumed when none is given (MPa)
pub const DEFAULT_FC_MPA: f64 = 25.0;

/// Steel yield strength assumed when none is given (MPa)
pub const DEFAULT_FY_MPA: f64 = 415.0;

/// Which sizing path a combined request took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FootingMode {
    Single,
    TwoColumn,
}

/// Strap beam tying two column pads together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrapDetails {
    #[serde(default)]
    pub width_mm: Option<f64>,

    #[serde(default)]
    pub thickness_mm: Option<f64>,

    #[serde(default)]
    pub length_m: Option<f64>,
}

impl StrapDetails {
    pub fn new(width_mm: f64, thickness_mm: f64, length_m: f64) -> Self {
        StrapDetails {
            width_mm: Some(width_mm),
            thickness_mm: Some(thickness_mm),
            length_m: Some(length_m),
        }
    }

    /// Fill a missing length from the column spacing.
    pub fn with_length_fallback(mut self, spacing_m: Option<f64>) -> Self {
        if self.length_m.is_none() {
            self.length_m = spacing_m.filter(|s| *s > 0.0);
        }
        self
    }

    /// Concrete volume (m³) when width, thickness and length are all known.
    pub fn concrete_volume_m3(&self) -> Option<f64> {
        match (self.width_mm, self.thickness_mm, self.length_m) {
            (Some(w), Some(t), Some(l)) => Some(w / 1000.0 * t / 1000.0 * l),
            _ => None,
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [
            ("strap.width_mm", self.width_mm),
            ("strap.thickness_mm", self.thickness_mm),
            ("strap.length_m", self.length_m),
        ] {
            if let Some(v) = value {
                ensure_finite(field, v)?;
                if v < 0.0 {
                    return Err(CalcError::invalid_input(field, v.to_string(), "Strap dimension cannot be negative"));
                }
            }
        }
        Ok(())
    }
}

/// Input for a single or two-column combined pad.
///
/// Every material and detailing field is optional and falls back to the
/// module defaults (soil 150 kN/m², depth 500 mm, f'c 25 MPa, fy 415 MPa).
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "CF-1",
///   "p1_kn": 600.0,
///   "p2_kn": 900.0,
///   "col1_b_mm": 400.0,
///   "col1_d_mm": 400.0,
///   "col2_b_mm": 450.0,
///   "col2_d_mm": 450.0,
///   "spacing_m": 3.0,
///   "soil_allow_kn_per_m2": 150.0,
///   "strap": { "width_mm": 300.0, "thickness_mm": 600.0 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedFootingInput {
    #[serde(default)]
    pub label: String,

    /// Legacy single-pad load (kN); selects single mode when positive
    #[serde(default, alias = "Pu_kN")]
    pub pu_kn: Option<f64>,

    /// Column 1 load (kN)
    #[serde(default, alias = "P1_kN")]
    pub p1_kn: Option<f64>,

    /// Column 2 load (kN)
    #[serde(default, alias = "P2_kN")]
    pub p2_kn: Option<f64>,

    #[serde(default)]
    pub col1_b_mm: Option<f64>,
    #[serde(default)]
    pub col1_d_mm: Option<f64>,
    #[serde(default)]
    pub col2_b_mm: Option<f64>,
    #[serde(default)]
    pub col2_d_mm: Option<f64>,

    /// Single-mode column size
    #[serde(default)]
    pub col_b_mm: Option<f64>,
    #[serde(default)]
    pub col_d_mm: Option<f64>,

    /// Centre-to-centre column spacing (m)
    #[serde(default)]
    pub spacing_m: Option<f64>,

    #[serde(default, alias = "soil_allow_kN_per_m2")]
    pub soil_allow_kn_per_m2: Option<f64>,

    #[serde(default)]
    pub pad_depth_mm: Option<f64>,

    #[serde(default, alias = "fc_MPa")]
    pub fc_mpa: Option<f64>,

    #[serde(default, alias = "fy_MPa")]
    pub fy_mpa: Option<f64>,

    #[serde(default)]
    pub eccentricity_x_m: f64,

    #[serde(default)]
    pub eccentricity_y_m: f64,

    /// Designer-fixed side for single mode (m)
    #[serde(default)]
    pub assumed_side_m: Option<f64>,

    #[serde(default)]
    pub cover_mm: Option<f64>,

    #[serde(default)]
    pub bar_dia_mm: Option<f64>,

    #[serde(default)]
    pub target_spacing_mm: Option<f64>,

    /// Shear strength reduction factor for the punching re-check
    #[serde(default)]
    pub phi: Option<f64>,

    #[serde(default)]
    pub column_location: ColumnLocation,

    #[serde(default)]
    pub strap: Option<StrapDetails>,
}

impl CombinedFootingInput {
    /// Legacy single-pad request.
    pub fn single(pu_kn: f64) -> Self {
        CombinedFootingInput {
            pu_kn: Some(pu_kn),
            ..Default::default()
        }
    }

    /// Two-column request with default materials.
    pub fn two_column(p1_kn: f64, p2_kn: f64) -> Self {
        CombinedFootingInput {
            p1_kn: Some(p1_kn),
            p2_kn: Some(p2_kn),
            ..Default::default()
        }
    }

    pub fn with_strap(mut self, strap: StrapDetails) -> Self {
        self.strap = Some(strap);
        self
    }

    pub fn with_spacing(mut self, spacing_m: f64) -> Self {
        self.spacing_m = Some(spacing_m);
        self
    }

    /// Single mode iff a positive legacy load is present
    pub fn mode(&self) -> FootingMode {
        match self.pu_kn {
            Some(pu) if pu > 0.0 => FootingMode::Single,
            _ => FootingMode::TwoColumn,
        }
    }

    pub fn soil_allow(&self) -> f64 {
        self.soil_allow_kn_per_m2.unwrap_or(DEFAULT_SOIL_ALLOW_KN_PER_M2)
    }

    pub fn pad_depth(&self) -> f64 {
        self.pad_depth_mm.unwrap_or(DEFAULT_PAD_DEPTH_MM)
    }

    pub fn fc(&self) -> f64 {
        self.fc_mpa.unwrap_or(DEFAULT_FC_MPA)
    }

    pub fn fy(&self) -> f64 {
        self.fy_mpa.unwrap_or(DEFAULT_FY_MPA)
    }

    /// Geometry of the column that governs punching.
    ///
    /// Column 1 first, then the single-mode size, then 300 mm.
    pub fn punching_column_mm(&self) -> (f64, f64) {
        let b = self.col1_b_mm.or(self.col_b_mm).unwrap_or(DEFAULT_COLUMN_MM);
        let d = self.col1_d_mm.or(self.col_d_mm).unwrap_or(DEFAULT_COLUMN_MM);
        (b, d)
    }

    /// Strap with its length resolved from the spacing.
    pub fn resolved_strap(&self) -> Option<StrapDetails> {
        self.strap.clone().map(|s| s.with_length_fallback(self.spacing_m))
    }

    /// Validate the inputs that are consumed before the footing engine runs.
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [("pu_kn", self.pu_kn), ("p1_kn", self.p1_kn), ("p2_kn", self.p2_kn)] {
            if let Some(v) = value {
                ensure_finite(field, v)?;
            }
        }
        if let Some(spacing) = self.spacing_m {
            ensure_finite("spacing_m", spacing)?;
        }
        if let Some(phi) = self.phi {
            ensure_finite("phi", phi)?;
        }

        let soil = ensure_finite("soil_allow_kn_per_m2", self.soil_allow())?;
        if soil <= 0.0 {
            return Err(CalcError::invalid_input(
                "soil_allow_kn_per_m2",
                soil.to_string(),
                "soil_allow_kN_per_m2 must be > 0",
            ));
        }

        if let Some(strap) = &self.strap {
            strap.validate()?;
        }
        Ok(())
    }

    /// Build the isolated-pad request the engine sizes.
    fn engine_input(&self, load_kn: f64, col_b_mm: Option<f64>, col_d_mm: Option<f64>, side_m: Option<f64>) -> FootingInput {
        FootingInput {
            label: self.label.clone(),
            pu_kn: load_kn,
            col_b_mm: Some(col_b_mm.unwrap_or(DEFAULT_COLUMN_MM)),
            col_d_mm: Some(col_d_mm.unwrap_or(DEFAULT_COLUMN_MM)),
            soil_allow_kn_per_m2: self.soil_allow(),
            pad_depth_mm: self.pad_depth(),
            fc_mpa: self.fc(),
            fy_mpa: self.fy(),
            eccentricity_x_m: self.eccentricity_x_m,
            eccentricity_y_m: self.eccentricity_y_m,
            assumed_side_m: side_m,
            cover_mm: self.cover_mm,
            bar_dia_mm: self.bar_dia_mm,
            target_spacing_mm: self.target_spacing_mm,
        }
    }
}

/// Results of a combined footing design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedFootingResult {
    pub mode: FootingMode,

    /// Aggregate factored load (kN)
    pub total_load_kn: f64,

    pub soil_allow_kn_per_m2: f64,

    /// Area demanded by soil pressure (m²)
    pub required_area_m2: f64,

    /// Area after side selection and eccentricity (m²)
    pub used_area_m2: f64,

    pub pad_side_m: f64,

    pub drawing_params: DrawingParams,

    pub engine_results: FootingResult,

    /// Punching re-run against the aggregate load
    pub punching: SubCheck<PunchingResult>,

    pub serviceability: SubCheck<ServiceabilityResult>,

    pub takeoff: SubCheck<TakeoffSummary>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strap: Option<StrapDetails>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_paths: Option<ReportPaths>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_error: Option<String>,
}

impl CombinedFootingResult {
    /// Punching and crack width both evaluated and passing.
    pub fn passes(&self) -> bool {
        let punching_ok = self.punching.result().map(|p| p.punching_safe).unwrap_or(false);
        let crack_ok = self.serviceability.result().map(|s| s.passes).unwrap_or(false);
        punching_ok && crack_ok
    }
}

/// Size a combined pad and run its checks and takeoff.
///
/// Engine input errors propagate; sub-check failures are embedded in their
/// slot. When `reports` is given a `combined` report pair is written.
pub fn design_combined(
    input: &CombinedFootingInput,
    settings: &DesignSettings,
    reports: Option<&dyn ReportSink>,
) -> CalcResult<CombinedFootingResult> {
    input.validate()?;

    let mode = input.mode();
    let (total_load_kn, engine_input) = match mode {
        FootingMode::Single => {
            let pu = input.pu_kn.unwrap_or_default();
            let side = input.assumed_side_m.filter(|s| *s > 0.0);
            (pu, input.engine_input(pu, input.col_b_mm, input.col_d_mm, side))
        }
        FootingMode::TwoColumn => {
            let p1 = input.p1_kn.ok_or_else(|| CalcError::missing_field("p1_kn"))?;
            let p2 = input.p2_kn.ok_or_else(|| CalcError::missing_field("p2_kn"))?;
            let total = p1 + p2;
            let side = (total / input.soil_allow()).sqrt();
            (total, input.engine_input(total, input.col1_b_mm, input.col1_d_mm, Some(side)))
        }
    };

    tracing::debug!(?mode, total_load_kn, "combined footing");

    let engine = size_footing(&engine_input, settings)?;

    let (col_b_mm, col_d_mm) = input.punching_column_mm();
    let punching_input = PunchingInput::new(total_load_kn, col_b_mm, col_d_mm, input.pad_depth(), input.fc())
        .with_phi(input.phi.unwrap_or(DEFAULT_PHI))
        .with_location(input.column_location)
        .with_eccentricity(input.eccentricity_x_m, input.eccentricity_y_m);
    let punching = SubCheck::capture("punching", check_punching(&punching_input, settings));

    let cover = engine.drawing_params.cover_mm;
    let crack_input = CrackWidthInput::new(
        engine.spacing_mm,
        if cover > 0.0 { cover } else { DEFAULT_COVER_MM },
        input.fy() * settings.service_stress_ratio,
    )
    .with_bar_dia(input.bar_dia_mm.unwrap_or(DEFAULT_CRACK_BAR_DIA_MM));
    let serviceability = SubCheck::capture("serviceability", crack_width_check(&crack_input, settings));

    let strap = input.resolved_strap();
    let strap_volume = strap.as_ref().and_then(StrapDetails::concrete_volume_m3);
    let takeoff = SubCheck::capture(
        "takeoff",
        estimate_takeoff(&engine.drawing_params, settings).map(|t| t.with_strap_volume(strap_volume)),
    );

    let mut result = CombinedFootingResult {
        mode,
        total_load_kn: round_to(total_load_kn, 3),
        soil_allow_kn_per_m2: input.soil_allow(),
        required_area_m2: engine.a_req_m2,
        used_area_m2: engine.a_final_m2,
        pad_side_m: engine.side_m,
        drawing_params: engine.drawing_params.clone(),
        engine_results: engine,
        punching,
        serviceability,
        takeoff,
        strap,
        report_paths: None,
        report_error: None,
    };

    if let Some(sink) = reports {
        match write_design_reports(sink, "combined", input, &result) {
            Ok(paths) => result.report_paths = Some(paths),
            Err(e) => {
                tracing::warn!(error = %e, "combined footing reports not written");
                result.report_error = Some(e.to_string());
            }
        }
    }

    Ok(result)
}
