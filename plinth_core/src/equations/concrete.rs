//! # Reinforced-Concrete Footing Formulas
//!
//! Small closed-form helpers shared by the footing, punching and
//! serviceability calculations. All stresses are in MPa (N/mm²), section
//! dimensions in mm, plan dimensions in m unless a name says otherwise.
//!
//! ## Notation
//!
//! - `d_eff` = Effective depth of the pad
//! - `b0` = Critical punching perimeter
//! - `v_c` = Concrete punching shear stress capacity
//! - `e` = Load eccentricity
//!
//! ## References
//!
//! - ACI 318-19 Section 22.6: Two-way shear strength (simplified)
//! - Roark's Formulas for Stress and Strain, 8th Edition, Table 8.1

use std::f64::consts::PI;

/// Cap on any eccentricity amplification (+50%).
pub const MAX_ECCENTRICITY_AMPLIFICATION: f64 = 0.5;

/// Smallest effective depth the punching heuristic will use (mm).
pub const MIN_EFFECTIVE_DEPTH_MM: f64 = 10.0;

// =============================================================================
// BARS
// =============================================================================

/// Cross-sectional area of a round bar
///
/// # Formula
/// A = π·d²/4
///
/// # Example
/// ```rust
/// use plinth_core::equations::concrete::bar_area_mm2;
///
/// let a = bar_area_mm2(10.0);
/// assert!((a - 78.54).abs() < 0.01);
/// ```
#[inline]
pub fn bar_area_mm2(dia_mm: f64) -> f64 {
    PI * dia_mm * dia_mm / 4.0
}

// =============================================================================
// ECCENTRICITY
// =============================================================================

/// Amplification factor for an eccentric load.
///
/// # Formula
/// k = 1 + min(0.5, e / reference)
///
/// The result lies in [1.0, 1.5] for any non-negative `e` and positive
/// `reference`. A non-positive eccentricity or reference yields 1.0.
///
/// # Example
/// ```rust
/// use plinth_core::equations::concrete::eccentricity_factor;
///
/// assert_eq!(eccentricity_factor(0.0, 3.0), 1.0);
/// assert!((eccentricity_factor(0.3, 3.0) - 1.1).abs() < 1e-12);
/// assert_eq!(eccentricity_factor(10.0, 3.0), 1.5);
/// ```
#[inline]
pub fn eccentricity_factor(eccentricity: f64, reference: f64) -> f64 {
    if eccentricity <= 0.0 || reference <= 0.0 {
        return 1.0;
    }
    1.0 + (eccentricity / reference).min(MAX_ECCENTRICITY_AMPLIFICATION)
}

/// Governing eccentricity: the larger absolute offset of the two axes.
#[inline]
pub fn governing_eccentricity(ecc_x: f64, ecc_y: f64) -> f64 {
    ecc_x.abs().max(ecc_y.abs())
}

// =============================================================================
// PUNCHING SHEAR
// =============================================================================

/// Effective depth proxy for a pad of given overall depth.
///
/// # Formula
/// d_eff = max(10, 0.8·h)
///
/// # Example
/// ```rust
/// use plinth_core::equations::concrete::effective_depth_mm;
///
/// assert_eq!(effective_depth_mm(500.0), 400.0);
/// assert_eq!(effective_depth_mm(5.0), 10.0);
/// ```
#[inline]
pub fn effective_depth_mm(pad_depth_mm: f64) -> f64 {
    (0.8 * pad_depth_mm).max(MIN_EFFECTIVE_DEPTH_MM)
}

/// Critical perimeter around a rectangular column.
///
/// ```text
///   ┌───────────────┐
///   │   ┌───────┐   │ ← perimeter at d_eff/2 from the column face
///   │   │ b × d │   │
///   │   └───────┘   │
///   └───────────────┘
/// ```
///
/// # Formula
/// b0 = 2(b + d) + 4·d_eff
///
/// # Example
/// ```rust
/// use plinth_core::equations::concrete::punching_perimeter_mm;
///
/// assert_eq!(punching_perimeter_mm(400.0, 400.0, 400.0), 3200.0);
/// ```
#[inline]
pub fn punching_perimeter_mm(col_b_mm: f64, col_d_mm: f64, d_eff_mm: f64) -> f64 {
    2.0 * (col_b_mm + col_d_mm) + 4.0 * d_eff_mm
}

/// Concrete punching shear stress capacity.
///
/// # Formula
/// v_c = coefficient·√f'c  (coefficient = 0.33 in SI)
#[inline]
pub fn concrete_shear_stress_mpa(fc_mpa: f64, coefficient: f64) -> f64 {
    coefficient * fc_mpa.sqrt()
}

// =============================================================================
// SLAB STRIP DEFLECTION
// =============================================================================

/// Gross moment of inertia of a 1 mm wide strip (mm⁴/mm).
///
/// # Formula
/// I = h³/12
#[inline]
pub fn strip_gross_inertia(thickness_mm: f64) -> f64 {
    thickness_mm.powi(3) / 12.0
}

/// Midspan deflection of a simply supported member under uniform load.
///
/// # Formula (Roark's Table 8.1, Case 2a)
/// δ_max = 5wL⁴ / (384EI)
///
/// # Example
/// ```rust
/// use plinth_core::equations::concrete::uniform_load_max_deflection;
///
/// // w = 1 N/mm, L = 1000 mm, E = 25000 MPa, I = 1e6 mm⁴
/// let d = uniform_load_max_deflection(1.0, 1000.0, 25_000.0, 1.0e6);
/// assert!((d - 0.5208).abs() < 1e-3);
/// ```
#[inline]
pub fn uniform_load_max_deflection(w: f64, l: f64, e: f64, i: f64) -> f64 {
    5.0 * w * l.powi(4) / (384.0 * e * i)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE.max(b.abs() * 1e-9)
    }

    #[test]
    fn test_bar_area() {
        // 16 mm bar = 201.06 mm²
        let a = bar_area_mm2(16.0);
        assert!((a - 201.06).abs() < 0.01, "A = {} (expected 201.06)", a);
    }

    #[test]
    fn test_eccentricity_factor_bounds() {
        for e in [0.0, 0.01, 0.2, 1.0, 5.0, 1e6] {
            let k = eccentricity_factor(e, 2.0);
            assert!((1.0..=1.5).contains(&k), "k = {} for e = {}", k, e);
        }
    }

    #[test]
    fn test_eccentricity_factor_zero_reference() {
        assert_eq!(eccentricity_factor(0.5, 0.0), 1.0);
    }

    #[test]
    fn test_governing_eccentricity() {
        assert_eq!(governing_eccentricity(-0.4, 0.1), 0.4);
        assert_eq!(governing_eccentricity(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_concrete_shear_stress() {
        let vc = concrete_shear_stress_mpa(25.0, 0.33);
        assert!(approx_eq(vc, 1.65), "v_c = {} (expected 1.65)", vc);
    }

    #[test]
    fn test_strip_inertia() {
        let i = strip_gross_inertia(150.0);
        assert!(approx_eq(i, 281_250.0), "I = {}", i);
    }
}
