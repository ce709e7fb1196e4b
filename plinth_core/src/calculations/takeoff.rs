//! # Material Takeoff
//!
//! Steel and concrete quantities for a square pad, computed from the
//! [`DrawingParams`] a design produces.
//!
//! Bars run the full pad width less cover at each end. Steel mass uses the
//! configured density (7850 kg/m³ by default).

use serde::{Deserialize, Serialize};

use crate::calculations::footing::{bar_count, DrawingParams};
use crate::equations::concrete::bar_area_mm2;
use crate::errors::{ensure_finite, CalcError, CalcResult};
use crate::settings::DesignSettings;
use crate::units::{round_to, Meters, Millimeters, SqM, SqMm};

/// Quantities for one pad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeoffSummary {
    pub pad_side_m: f64,
    pub pad_depth_mm: f64,
    pub n_per_row: u32,
    pub n_layers: u32,
    pub total_bars: u32,

    /// Length of one grid bar (m)
    pub bar_length_m: f64,

    pub total_steel_length_m: f64,
    pub steel_mass_kg: f64,

    /// Pad concrete only (m³)
    pub concrete_volume_m3: f64,

    pub bar_dia_mm: f64,
    pub spacing_mm: f64,

    /// Strap beam concrete (m³), when a complete strap is described
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strap_concrete_volume_m3: Option<f64>,
}

impl TakeoffSummary {
    /// Attach a strap beam volume (m³).
    pub fn with_strap_volume(mut self, volume_m3: Option<f64>) -> Self {
        self.strap_concrete_volume_m3 = volume_m3.map(|v| round_to(v, 3));
        self
    }

    /// Pad plus strap concrete (m³)
    pub fn total_concrete_m3(&self) -> f64 {
        self.concrete_volume_m3 + self.strap_concrete_volume_m3.unwrap_or(0.0)
    }
}

/// Bar length for a square pad: side less cover at both ends, never negative.
pub fn pad_bar_length_m(pad_side_m: f64, cover_mm: f64) -> f64 {
    let cover_m = Meters::from(Millimeters(cover_mm)).value();
    (pad_side_m - 2.0 * cover_m).max(0.0)
}

/// Estimate steel and concrete quantities from drawing parameters.
pub fn estimate_takeoff(params: &DrawingParams, settings: &DesignSettings) -> CalcResult<TakeoffSummary> {
    let side = ensure_finite("pad_side_m", params.pad_side_m)?;
    let depth = ensure_finite("pad_depth_mm", params.pad_depth_mm)?;
    let cover = ensure_finite("cover_mm", params.cover_mm)?;
    let bar_dia = ensure_finite("bar_dia_mm", params.bar_dia_mm)?;
    let spacing = ensure_finite("spacing_mm", params.spacing_mm)?;

    for (field, value) in [("pad_side_m", side), ("pad_depth_mm", depth), ("cover_mm", cover)] {
        if value < 0.0 {
            return Err(CalcError::invalid_input(field, value.to_string(), "Dimension cannot be negative"));
        }
    }

    let mut n_per_row = params.n_per_row;
    if n_per_row == 0 && spacing > 0.0 && side > 0.0 {
        let usable_mm = (Millimeters::from(Meters(side)).value() - 2.0 * cover).max(1.0);
        n_per_row = bar_count("n_per_row", (usable_mm / spacing).floor())?.max(1);
    }
    let total_bars = n_per_row.checked_mul(params.n_layers).ok_or_else(|| {
        CalcError::invalid_input(
            "total_bars",
            format!("{} x {}", n_per_row, params.n_layers),
            "bar count exceeds the supported range",
        )
    })?;

    let bar_length_m = pad_bar_length_m(side, cover);
    let total_length_m = total_bars as f64 * bar_length_m;

    let bar_area_m2 = SqM::from(SqMm(bar_area_mm2(bar_dia))).value();
    let steel_mass_kg = bar_area_m2 * total_length_m * settings.steel_density_kg_m3;

    let concrete_volume_m3 = side * side * Meters::from(Millimeters(depth)).value();

    tracing::debug!(total_bars, steel_mass_kg, concrete_volume_m3, "takeoff estimated");

    Ok(TakeoffSummary {
        pad_side_m: round_to(side, 3),
        pad_depth_mm: round_to(depth, 1),
        n_per_row,
        n_layers: params.n_layers,
        total_bars,
        bar_length_m: round_to(bar_length_m, 3),
        total_steel_length_m: round_to(total_length_m, 3),
        steel_mass_kg: round_to(steel_mass_kg, 2),
        concrete_volume_m3: round_to(concrete_volume_m3, 3),
        bar_dia_mm: round_to(bar_dia, 1),
        spacing_mm: round_to(spacing, 1),
        strap_concrete_volume_m3: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_params() -> DrawingParams {
        DrawingParams {
            pad_side_m: 1.414,
            pad_depth_mm: 500.0,
            cover_mm: 25.0,
            bar_dia_mm: 10.0,
            n_per_row: 39,
            n_layers: 2,
            spacing_mm: 150.0,
        }
    }

    #[test]
    fn test_sample_takeoff() {
        let t = estimate_takeoff(&sample_params(), &DesignSettings::default()).unwrap();

        assert_eq!(t.total_bars, 78);
        // 1.414 − 0.05 = 1.364 m
        assert!((t.bar_length_m - 1.364).abs() < 1e-9);
        assert!((t.total_steel_length_m - 106.392).abs() < 1e-9);
        // 78.54e-6 m² × 106.392 m × 7850 = 65.59 kg
        assert!((t.steel_mass_kg - 65.59).abs() < 0.01, "mass = {}", t.steel_mass_kg);
        // 1.414² × 0.5 = 0.99970
        assert!((t.concrete_volume_m3 - 1.0).abs() < 1e-9);
        assert!(t.strap_concrete_volume_m3.is_none());
    }

    #[test]
    fn test_zero_bars_per_row_falls_back_to_spacing() {
        let mut params = sample_params();
        params.n_per_row = 0;
        let t = estimate_takeoff(&params, &DesignSettings::default()).unwrap();

        // floor((1414 − 50) / 150) = 9
        assert_eq!(t.n_per_row, 9);
        assert_eq!(t.total_bars, 18);
    }

    #[test]
    fn test_bar_count_overflow_rejected() {
        let mut params = sample_params();
        params.n_per_row = u32::MAX;
        let err = estimate_takeoff(&params, &DesignSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let mut params = sample_params();
        params.n_per_row = 0;
        params.spacing_mm = 1e-12;
        let err = estimate_takeoff(&params, &DesignSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_bar_length_never_negative() {
        assert_eq!(pad_bar_length_m(0.03, 25.0), 0.0);
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut params = sample_params();
        params.pad_side_m = f64::INFINITY;
        let err = estimate_takeoff(&params, &DesignSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_strap_volume_adds_to_total() {
        let t = estimate_takeoff(&sample_params(), &DesignSettings::default())
            .unwrap()
            .with_strap_volume(Some(0.27));
        assert_eq!(t.strap_concrete_volume_m3, Some(0.27));
        assert!((t.total_concrete_m3() - 1.27).abs() < 1e-9);
    }
}
