//! # Isolated Pad Footing
//!
//! Sizes a square pad from the factored column load and the allowable soil
//! pressure, lays out a two-layer bar grid and reconciles it against a
//! minimum-steel requirement. Punching and crack-width checks are run on the
//! result and embedded as [`SubCheck`] slots.
//!
//! ## Assumptions
//!
//! - Square pad; a designer-assumed side overrides the computed one
//! - Eccentricity enlarges the area by 1 + min(0.5, e/side)
//! - Required steel = max(100 mm², 0.3% of the final plan area)
//! - Grid bars counted over two layers (top + bottom)
//! - Service steel stress for the crack indicator = 0.5·fy
//!
//! ## Example
//!
//! ```rust
//! use plinth_core::calculations::footing::{size_footing, FootingInput};
//! use plinth_core::settings::DesignSettings;
//!
//! let input = FootingInput::new(2000.0, 150.0, 500.0, 25.0, 415.0);
//! let result = size_footing(&input, &DesignSettings::default()).unwrap();
//!
//! assert!((result.a_req_m2 - 13.333333).abs() < 1e-6);
//! assert_eq!(result.side_m, 3.651);
//! assert!(result.provided_as_mm2 >= result.as_req_mm2);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::punching::{check_punching, PunchingInput, PunchingResult};
use crate::calculations::serviceability::{crack_width_check, CrackWidthInput, ServiceabilityResult};
use crate::calculations::SubCheck;
use crate::equations::concrete::{bar_area_mm2, eccentricity_factor, governing_eccentricity};
use crate::errors::{ensure_finite, ensure_positive, CalcError, CalcResult};
use crate::reports::{write_design_reports, ReportPaths, ReportSink};
use crate::settings::DesignSettings;
use crate::units::{round_to, KiloNewtons, Meters, Millimeters, Newtons, SqM, SqMm};

/// Column plan dimension assumed when none is given (mm)
pub const DEFAULT_COLUMN_MM: f64 = 300.0;

/// Clear cover assumed when none is given (mm)
pub const DEFAULT_COVER_MM: f64 = 25.0;

/// Grid bar diameter assumed when none is given (mm)
pub const DEFAULT_BAR_DIA_MM: f64 = 10.0;

/// Grid spacing assumed when none (or a non-positive one) is given (mm)
pub const DEFAULT_SPACING_MM: f64 = 150.0;

/// Fewest bars allowed in one grid row
const MIN_BARS_PER_ROW: u32 = 2;

/// Input parameters for an isolated square pad.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "F-1",
///   "pu_kn": 2000.0,
///   "col_b_mm": 400.0,
///   "col_d_mm": 400.0,
///   "soil_allow_kn_per_m2": 150.0,
///   "pad_depth_mm": 500.0,
///   "fc_mpa": 25.0,
///   "fy_mpa": 415.0,
///   "eccentricity_x_m": 0.0,
///   "eccentricity_y_m": 0.0,
///   "cover_mm": 50.0,
///   "bar_dia_mm": 12.0,
///   "target_spacing_mm": 150.0
/// }
/// ```
///
/// The legacy keys `Pu_kN`, `soil_allow_kN_per_m2`, `fc_MPa` and `fy_MPa`
/// are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootingInput {
    /// User label for this footing (e.g., "F-1", "Grid B/3")
    #[serde(default)]
    pub label: String,

    /// Factored column load (kN)
    #[serde(alias = "Pu_kN")]
    pub pu_kn: f64,

    /// Column width (mm); 300 when absent
    #[serde(default)]
    pub col_b_mm: Option<f64>,

    /// Column depth (mm); 300 when absent
    #[serde(default)]
    pub col_d_mm: Option<f64>,

    /// Allowable soil bearing pressure (kN/m²)
    #[serde(alias = "soil_allow_kN_per_m2")]
    pub soil_allow_kn_per_m2: f64,

    /// Overall pad depth (mm)
    pub pad_depth_mm: f64,

    /// Concrete compressive strength (MPa)
    #[serde(alias = "fc_MPa")]
    pub fc_mpa: f64,

    /// Reinforcement yield strength (MPa)
    #[serde(alias = "fy_MPa")]
    pub fy_mpa: f64,

    /// Load eccentricity along x (m)
    #[serde(default)]
    pub eccentricity_x_m: f64,

    /// Load eccentricity along y (m)
    #[serde(default)]
    pub eccentricity_y_m: f64,

    /// Designer-fixed pad side (m); used instead of √A_req when positive
    #[serde(default)]
    pub assumed_side_m: Option<f64>,

    #[serde(default)]
    pub cover_mm: Option<f64>,

    #[serde(default)]
    pub bar_dia_mm: Option<f64>,

    /// Desired grid bar spacing (mm)
    #[serde(default)]
    pub target_spacing_mm: Option<f64>,
}

impl FootingInput {
    /// Create an input with default column size, detailing and no eccentricity.
    pub fn new(pu_kn: f64, soil_allow_kn_per_m2: f64, pad_depth_mm: f64, fc_mpa: f64, fy_mpa: f64) -> Self {
        FootingInput {
            label: String::new(),
            pu_kn,
            col_b_mm: None,
            col_d_mm: None,
            soil_allow_kn_per_m2,
            pad_depth_mm,
            fc_mpa,
            fy_mpa,
            eccentricity_x_m: 0.0,
            eccentricity_y_m: 0.0,
            assumed_side_m: None,
            cover_mm: None,
            bar_dia_mm: None,
            target_spacing_mm: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_column(mut self, col_b_mm: f64, col_d_mm: f64) -> Self {
        self.col_b_mm = Some(col_b_mm);
        self.col_d_mm = Some(col_d_mm);
        self
    }

    pub fn with_eccentricity(mut self, eccentricity_x_m: f64, eccentricity_y_m: f64) -> Self {
        self.eccentricity_x_m = eccentricity_x_m;
        self.eccentricity_y_m = eccentricity_y_m;
        self
    }

    pub fn with_assumed_side(mut self, side_m: f64) -> Self {
        self.assumed_side_m = Some(side_m);
        self
    }

    pub fn with_detailing(mut self, cover_mm: f64, bar_dia_mm: f64, target_spacing_mm: f64) -> Self {
        self.cover_mm = Some(cover_mm);
        self.bar_dia_mm = Some(bar_dia_mm);
        self.target_spacing_mm = Some(target_spacing_mm);
        self
    }

    /// Column width with the default applied
    pub fn column_b_mm(&self) -> f64 {
        self.col_b_mm.unwrap_or(DEFAULT_COLUMN_MM)
    }

    /// Column depth with the default applied
    pub fn column_d_mm(&self) -> f64 {
        self.col_d_mm.unwrap_or(DEFAULT_COLUMN_MM)
    }

    /// Cover with the default applied
    pub fn resolved_cover_mm(&self) -> f64 {
        self.cover_mm.unwrap_or(DEFAULT_COVER_MM)
    }

    /// Bar diameter with the default applied
    pub fn resolved_bar_dia_mm(&self) -> f64 {
        self.bar_dia_mm.unwrap_or(DEFAULT_BAR_DIA_MM)
    }

    /// Spacing with the default applied; non-positive values fall back to 150 mm
    pub fn resolved_spacing_mm(&self) -> f64 {
        match self.target_spacing_mm {
            Some(s) if s > 0.0 => s,
            _ => DEFAULT_SPACING_MM,
        }
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        ensure_positive("pu_kn", self.pu_kn, "Factored load must be positive")?;
        ensure_positive(
            "soil_allow_kn_per_m2",
            self.soil_allow_kn_per_m2,
            "soil_allow_kN_per_m2 must be > 0",
        )?;
        ensure_positive("pad_depth_mm", self.pad_depth_mm, "Pad depth must be positive")?;
        ensure_positive("fc_mpa", self.fc_mpa, "Concrete strength must be positive")?;
        ensure_positive("fy_mpa", self.fy_mpa, "Steel yield strength must be positive")?;
        ensure_finite("eccentricity_x_m", self.eccentricity_x_m)?;
        ensure_finite("eccentricity_y_m", self.eccentricity_y_m)?;

        if let Some(b) = self.col_b_mm {
            ensure_finite("col_b_mm", b)?;
        }
        if let Some(d) = self.col_d_mm {
            ensure_finite("col_d_mm", d)?;
        }
        if let Some(side) = self.assumed_side_m {
            ensure_finite("assumed_side_m", side)?;
        }
        if let Some(spacing) = self.target_spacing_mm {
            ensure_finite("target_spacing_mm", spacing)?;
        }

        let cover = ensure_finite("cover_mm", self.resolved_cover_mm())?;
        if cover < 0.0 {
            return Err(CalcError::invalid_input(
                "cover_mm",
                cover.to_string(),
                "Cover cannot be negative",
            ));
        }
        ensure_positive("bar_dia_mm", self.resolved_bar_dia_mm(), "Bar diameter must be positive")?;

        Ok(())
    }
}

/// Geometry handed to the drawing and takeoff modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingParams {
    pub pad_side_m: f64,
    pub pad_depth_mm: f64,
    pub cover_mm: f64,
    pub bar_dia_mm: f64,
    pub n_per_row: u32,
    pub n_layers: u32,
    pub spacing_mm: f64,
}

/// Results from sizing an isolated pad.
///
/// Areas are rounded to 6 dp, side and eccentricity to 3 dp, steel areas to
/// 2 dp. Sub-check flags are decided before rounding, except punching, which
/// compares its reported 2 dp forces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootingResult {
    /// Bearing area required by soil pressure alone (m²)
    pub a_req_m2: f64,

    /// Pad side (m)
    pub side_m: f64,

    /// True when `side_m` came from `assumed_side_m`
    pub side_assumed: bool,

    /// Plan area before eccentricity (m²)
    pub a_used_m2: f64,

    /// Governing eccentricity (m)
    pub eccentricity_m: f64,

    /// Area amplification for eccentricity, within [1.0, 1.5]
    pub ecc_effect_factor: f64,

    /// a_used × ecc_effect_factor (m²)
    pub a_final_m2: f64,

    pub pad_depth_mm: f64,

    /// Minimum steel required (mm²)
    pub as_req_mm2: f64,

    pub bar_dia_mm: f64,

    pub spacing_mm: f64,

    pub n_per_row: u32,

    pub n_layers: u32,

    pub n_bars_total: u32,

    /// Steel area provided by the grid (mm²)
    pub provided_as_mm2: f64,

    /// Reinforcement top-up passes applied (0 when the base grid sufficed)
    pub topup_passes: u32,

    pub punching: SubCheck<PunchingResult>,

    pub serviceability: SubCheck<ServiceabilityResult>,

    pub drawing_params: DrawingParams,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_paths: Option<ReportPaths>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_error: Option<String>,
}

impl FootingResult {
    /// Punching and crack width both evaluated and passing.
    pub fn passes(&self) -> bool {
        let punching_ok = self.punching.result().map(|p| p.punching_safe).unwrap_or(false);
        let crack_ok = self.serviceability.result().map(|s| s.passes).unwrap_or(false);
        punching_ok && crack_ok
    }

    /// Name of the first failing (or unevaluated) check, if any.
    pub fn governing_condition(&self) -> Option<&'static str> {
        match (self.punching.result(), self.serviceability.result()) {
            (None, _) => Some("punching (not evaluated)"),
            (Some(p), _) if !p.punching_safe => Some("punching"),
            (_, None) => Some("crack width (not evaluated)"),
            (_, Some(s)) if !s.passes => Some("crack width"),
            _ => None,
        }
    }
}

/// Grid layout after reconciling against the required steel.
#[derive(Debug, Clone, Copy, PartialEq)]
struct GridLayout {
    n_per_row: u32,
    n_layers: u32,
    n_bars_total: u32,
    provided_mm2: f64,
    topup_passes: u32,
}

impl GridLayout {
    fn with_per_row(n_per_row: u32, n_layers: u32, bar_area: f64, topup_passes: u32) -> CalcResult<Self> {
        let n_bars = n_per_row.checked_mul(n_layers).ok_or_else(|| {
            CalcError::invalid_input(
                "n_bars_total",
                format!("{} x {}", n_per_row, n_layers),
                "bar count exceeds the supported range",
            )
        })?;
        Ok(GridLayout {
            n_per_row,
            n_layers,
            n_bars_total: n_bars,
            provided_mm2: n_bars as f64 * bar_area,
            topup_passes,
        })
    }
}

/// Convert a non-negative float count to `u32`, rejecting values out of range.
pub(crate) fn bar_count(field: &str, value: f64) -> CalcResult<u32> {
    if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "bar count exceeds the supported range",
        ));
    }
    Ok(value as u32)
}

fn add_per_row(layout: &GridLayout, extra: u32) -> CalcResult<u32> {
    layout.n_per_row.checked_add(extra).ok_or_else(|| {
        CalcError::invalid_input("n_per_row", layout.n_per_row.to_string(), "bar count exceeds the supported range")
    })
}

/// Lay out the base grid, then add bars until `required_mm2` is met.
///
/// The first top-up converts the whole shortfall into bars spread over the
/// layers; further passes add one bar per row, at most `max_passes` of them.
/// Counts that leave the `u32` range are rejected as invalid input.
fn reconcile_grid(
    usable_width_mm: f64,
    spacing_mm: f64,
    bar_area: f64,
    required_mm2: f64,
    settings: &DesignSettings,
) -> CalcResult<GridLayout> {
    let n_layers = settings.reinforcement_layers.max(1);
    let base = bar_count("n_per_row", (usable_width_mm / spacing_mm).floor())?;
    let mut layout = GridLayout::with_per_row(base.max(MIN_BARS_PER_ROW), n_layers, bar_area, 0)?;

    if layout.provided_mm2 >= required_mm2 {
        return Ok(layout);
    }

    let missing = required_mm2 - layout.provided_mm2;
    let add_bars = bar_count("n_bars_added", (missing / bar_area).ceil())?;
    let n_per_row = add_per_row(&layout, add_bars.div_ceil(n_layers))?;
    layout = GridLayout::with_per_row(n_per_row, n_layers, bar_area, 1)?;

    let mut extra = 0;
    while layout.provided_mm2 < required_mm2 && extra < settings.max_topup_passes {
        let n_per_row = add_per_row(&layout, 1)?;
        layout = GridLayout::with_per_row(n_per_row, n_layers, bar_area, layout.topup_passes + 1)?;
        extra += 1;
    }

    if layout.provided_mm2 < required_mm2 {
        return Err(CalcError::Internal {
            message: format!(
                "reinforcement top-up did not converge: {:.2} mm² provided, {:.2} mm² required",
                layout.provided_mm2, required_mm2
            ),
        });
    }

    Ok(layout)
}

/// Size an isolated pad and run its punching and crack-width checks.
///
/// Input errors fail the call; sub-check errors are embedded in their slot.
pub fn size_footing(input: &FootingInput, settings: &DesignSettings) -> CalcResult<FootingResult> {
    input.validate()?;

    let col_b_mm = input.column_b_mm();
    let col_d_mm = input.column_d_mm();
    let cover_mm = input.resolved_cover_mm();
    let bar_dia_mm = input.resolved_bar_dia_mm();
    let spacing_mm = input.resolved_spacing_mm();

    let pu = Newtons::from(KiloNewtons(input.pu_kn));
    let q_allow = input.soil_allow_kn_per_m2 * 1000.0;
    let a_req_m2 = pu.value() / q_allow;
    if a_req_m2 <= 0.0 || !a_req_m2.is_finite() {
        return Err(CalcError::invalid_input(
            "a_req_m2",
            a_req_m2.to_string(),
            "computed required area <= 0",
        ));
    }

    let (side_m, a_used_m2, side_assumed) = match input.assumed_side_m {
        Some(side) if side > 0.0 => (side, side * side, true),
        _ => (a_req_m2.sqrt(), a_req_m2, false),
    };

    let eccentricity_m = governing_eccentricity(input.eccentricity_x_m, input.eccentricity_y_m);
    let ecc_effect_factor = eccentricity_factor(eccentricity_m, side_m);
    let a_final_m2 = a_used_m2 * ecc_effect_factor;
    let a_final_mm2 = SqMm::from(SqM(a_final_m2)).value();

    let side_mm = Millimeters::from(Meters(side_m)).value();
    let usable_width_mm = (side_mm - 2.0 * cover_mm).max(1.0);
    let bar_area = bar_area_mm2(bar_dia_mm);
    let as_req_mm2 = settings.min_steel_area_mm2.max(a_final_mm2 * settings.min_steel_ratio);

    let grid = reconcile_grid(usable_width_mm, spacing_mm, bar_area, as_req_mm2, settings)?;

    tracing::debug!(
        a_req_m2,
        side_m,
        side_assumed,
        ecc_effect_factor,
        as_req_mm2,
        n_per_row = grid.n_per_row,
        topup_passes = grid.topup_passes,
        "footing sized"
    );

    let spacing_out = round_to(spacing_mm, 1);
    let drawing_params = DrawingParams {
        pad_side_m: round_to(side_m, 3),
        pad_depth_mm: input.pad_depth_mm,
        cover_mm,
        bar_dia_mm,
        n_per_row: grid.n_per_row,
        n_layers: grid.n_layers,
        spacing_mm: spacing_out,
    };

    let punching = SubCheck::capture(
        "punching",
        check_punching(
            &PunchingInput::new(input.pu_kn, col_b_mm, col_d_mm, input.pad_depth_mm, input.fc_mpa),
            settings,
        ),
    );

    let steel_stress = input.fy_mpa * settings.service_stress_ratio;
    let serviceability = SubCheck::capture(
        "crack width",
        crack_width_check(
            &CrackWidthInput::new(spacing_out, cover_mm, steel_stress).with_bar_dia(bar_dia_mm),
            settings,
        ),
    );

    Ok(FootingResult {
        a_req_m2: round_to(a_req_m2, 6),
        side_m: round_to(side_m, 3),
        side_assumed,
        a_used_m2: round_to(a_used_m2, 6),
        eccentricity_m: round_to(eccentricity_m, 3),
        ecc_effect_factor: round_to(ecc_effect_factor, 3),
        a_final_m2: round_to(a_final_m2, 6),
        pad_depth_mm: input.pad_depth_mm,
        as_req_mm2: round_to(as_req_mm2, 2),
        bar_dia_mm,
        spacing_mm: spacing_out,
        n_per_row: grid.n_per_row,
        n_layers: grid.n_layers,
        n_bars_total: grid.n_bars_total,
        provided_as_mm2: round_to(grid.provided_mm2, 2),
        topup_passes: grid.topup_passes,
        punching,
        serviceability,
        drawing_params,
        report_paths: None,
        report_error: None,
    })
}

/// Size a footing and, when a sink is given, persist text and HTML reports.
///
/// A report failure is recorded in `report_error`; the design still succeeds.
pub fn design_footing(
    input: &FootingInput,
    settings: &DesignSettings,
    reports: Option<&dyn ReportSink>,
) -> CalcResult<FootingResult> {
    let mut result = size_footing(input, settings)?;

    if let Some(sink) = reports {
        match write_design_reports(sink, "footing", input, &result) {
            Ok(paths) => result.report_paths = Some(paths),
            Err(e) => {
                tracing::warn!(error = %e, "footing reports not written");
                result.report_error = Some(e.to_string());
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::sync::Mutex;

    fn settings() -> DesignSettings {
        DesignSettings::default()
    }

    fn reference_input() -> FootingInput {
        FootingInput::new(2000.0, 150.0, 500.0, 25.0, 415.0).with_label("F-1")
    }

    #[test]
    fn test_reference_sizing() {
        let result = size_footing(&reference_input(), &settings()).unwrap();

        assert!((result.a_req_m2 - 13.333333).abs() < 1e-6, "A_req = {}", result.a_req_m2);
        assert_eq!(result.side_m, 3.651);
        assert!(!result.side_assumed);
        assert_eq!(result.ecc_effect_factor, 1.0);
        assert_eq!(result.a_final_m2, result.a_req_m2);
    }

    #[test]
    fn test_topup_meets_required_steel() {
        // As_req = 13.333e6 × 0.003 = 40,000 mm²; base grid is 24 × 2 bars of 10 mm
        let result = size_footing(&reference_input(), &settings()).unwrap();

        assert!((result.as_req_mm2 - 40_000.0).abs() < 0.01);
        assert!(result.provided_as_mm2 >= result.as_req_mm2);
        assert_eq!(result.n_per_row, 255);
        assert_eq!(result.n_bars_total, result.n_per_row * result.n_layers);
        assert_eq!(result.topup_passes, 1);
    }

    #[test]
    fn test_base_grid_sufficient() {
        // Small load: as_req = max(100, 0.5e6 × 0.003 = 1500)
        let input = FootingInput::new(100.0, 200.0, 400.0, 25.0, 415.0).with_detailing(50.0, 16.0, 100.0);
        let result = size_footing(&input, &settings()).unwrap();

        assert!(result.provided_as_mm2 >= result.as_req_mm2);
        assert_eq!(result.n_per_row, 6);
        assert_eq!(result.topup_passes, 0);
    }

    #[test]
    fn test_tiny_bar_rejected_instead_of_overflowing() {
        // 40,000 mm² of 0.001 mm bars is ~5e10 bars, beyond u32
        let input = reference_input().with_detailing(25.0, 0.001, 150.0);
        let err = size_footing(&input, &settings()).unwrap_err();

        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_tiny_spacing_rejected_instead_of_overflowing() {
        let input = reference_input().with_detailing(25.0, 10.0, 1e-9);
        let err = size_footing(&input, &settings()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    fn single_layer(max_topup_passes: u32) -> DesignSettings {
        DesignSettings {
            reinforcement_layers: 1,
            max_topup_passes,
            ..DesignSettings::default()
        }
    }

    #[test]
    fn test_grid_extra_pass_covers_rounding_residue() {
        // Base grid 2 × 0.3; the first top-up gives 12 × 0.3 = 3.5999999999999996 < 3.6
        let grid = reconcile_grid(1.0, 1.0, 0.3, 3.6, &single_layer(8)).unwrap();

        assert_eq!(grid.n_per_row, 13);
        assert_eq!(grid.n_bars_total, 13);
        assert_eq!(grid.topup_passes, 2);
        assert!(grid.provided_mm2 >= 3.6);
    }

    #[test]
    fn test_grid_without_extra_passes_reports_non_convergence() {
        let err = reconcile_grid(1.0, 1.0, 0.3, 3.6, &single_layer(0)).unwrap_err();

        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert!(!err.is_client_error());
        assert!(err.to_string().contains("did not converge"));
    }

    #[test]
    fn test_grid_per_row_overflow_rejected() {
        let settings = DesignSettings {
            reinforcement_layers: 2,
            ..DesignSettings::default()
        };
        // Base row of u32::MAX / 2 + 1 bars doubles past u32::MAX
        let err = reconcile_grid(2_147_483_648.0, 1.0, 1.0, 1.0, &settings).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_assumed_side_overrides_computed() {
        let input = reference_input().with_assumed_side(4.0);
        let result = size_footing(&input, &settings()).unwrap();

        assert_eq!(result.side_m, 4.0);
        assert_eq!(result.a_used_m2, 16.0);
        assert!(result.side_assumed);
    }

    #[test]
    fn test_eccentricity_amplifies_area() {
        let side = (2000.0_f64 / 150.0).sqrt();
        let input = reference_input().with_eccentricity(0.3, -0.5);
        let result = size_footing(&input, &settings()).unwrap();

        assert_eq!(result.eccentricity_m, 0.5);
        let expected = 1.0 + 0.5 / side;
        assert!((result.ecc_effect_factor - round_to(expected, 3)).abs() < 1e-12);
        assert!(result.a_final_m2 > result.a_used_m2);
    }

    #[test]
    fn test_eccentricity_factor_capped() {
        let input = reference_input().with_eccentricity(50.0, 0.0);
        let result = size_footing(&input, &settings()).unwrap();
        assert_eq!(result.ecc_effect_factor, 1.5);
    }

    #[test]
    fn test_non_positive_spacing_falls_back() {
        let input = reference_input().with_detailing(25.0, 10.0, -20.0);
        let result = size_footing(&input, &settings()).unwrap();
        assert_eq!(result.spacing_mm, DEFAULT_SPACING_MM);
    }

    #[test]
    fn test_subchecks_populated() {
        let result = size_footing(&reference_input(), &settings()).unwrap();

        let crack = result.serviceability.result().unwrap();
        // 0.00018 × (150 − 50) × 207.5 = 3.735 mm
        assert!((crack.estimated_mm - 3.735).abs() < 1e-9);
        assert!(!crack.passes);

        let punch = result.punching.result().unwrap();
        assert_eq!(punch.b0_mm, 2800.0);
        assert!(!result.passes());
        assert_eq!(result.governing_condition(), Some("punching"));
    }

    #[test]
    fn test_invalid_soil_pressure() {
        let mut input = reference_input();
        input.soil_allow_kn_per_m2 = 0.0;
        let err = size_footing(&input, &settings()).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "soil_allow_kn_per_m2"));
    }

    #[test]
    fn test_invalid_load() {
        let mut input = reference_input();
        input.pu_kn = -10.0;
        assert!(size_footing(&input, &settings()).is_err());

        input.pu_kn = f64::NAN;
        assert!(size_footing(&input, &settings()).is_err());
    }

    #[test]
    fn test_deterministic() {
        let a = size_footing(&reference_input(), &settings()).unwrap();
        let b = size_footing(&reference_input(), &settings()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_legacy_keys_deserialize() {
        let json = r#"{
            "Pu_kN": 800.0,
            "soil_allow_kN_per_m2": 200.0,
            "pad_depth_mm": 450.0,
            "fc_MPa": 25.0,
            "fy_MPa": 415.0
        }"#;
        let input: FootingInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.pu_kn, 800.0);
        assert_eq!(input.column_b_mm(), DEFAULT_COLUMN_MM);
        assert_eq!(input.label, "");
    }

    #[test]
    fn test_serialization_omits_absent_reports() {
        let result = size_footing(&reference_input(), &settings()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("report_paths").is_none());
        assert!(json.get("drawing_params").is_some());
        assert_eq!(json["drawing_params"]["n_layers"], 2);
    }

    struct RecordingSink {
        prefixes: Mutex<Vec<String>>,
    }

    impl ReportSink for RecordingSink {
        fn write_reports(&self, prefix: &str, _inputs: &Value, results: &Value) -> CalcResult<ReportPaths> {
            assert!(results.get("side_m").is_some());
            self.prefixes.lock().unwrap().push(prefix.to_string());
            Ok(ReportPaths {
                text_path: "r.txt".to_string(),
                html_path: "r.html".to_string(),
            })
        }
    }

    struct FailingSink;

    impl ReportSink for FailingSink {
        fn write_reports(&self, _prefix: &str, _inputs: &Value, _results: &Value) -> CalcResult<ReportPaths> {
            Err(CalcError::report_write_failed("/readonly", "permission denied"))
        }
    }

    #[test]
    fn test_design_footing_writes_reports() {
        let sink = RecordingSink {
            prefixes: Mutex::new(Vec::new()),
        };
        let result = design_footing(&reference_input(), &settings(), Some(&sink)).unwrap();

        assert_eq!(result.report_paths.as_ref().unwrap().text_path, "r.txt");
        assert!(result.report_error.is_none());
        assert_eq!(*sink.prefixes.lock().unwrap(), vec!["footing".to_string()]);
    }

    #[test]
    fn test_design_footing_report_failure_is_non_fatal() {
        let result = design_footing(&reference_input(), &settings(), Some(&FailingSink)).unwrap();

        assert!(result.report_paths.is_none());
        assert!(result.report_error.as_ref().unwrap().contains("permission denied"));
        assert_eq!(result.side_m, 3.651);
    }

    #[test]
    fn test_design_footing_without_sink() {
        let result = design_footing(&reference_input(), &settings(), None).unwrap();
        assert!(result.report_paths.is_none());
        assert!(result.report_error.is_none());
    }
}
