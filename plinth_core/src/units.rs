//! # Unit Types
//!
//! Type-safe wrappers for the SI units used in footing design. These are thin
//! f64 newtypes that serialize as plain numbers.
//!
//! ## Units in use
//!
//! - Length: metres (m) for plan dimensions, millimetres (mm) for sections and bars
//! - Force: kilonewtons (kN) at the API surface, newtons (N) inside shear checks
//! - Area: square metres (m²) for bearing area, square millimetres (mm²) for steel
//!
//! Stresses are carried as raw MPa (= N/mm²) values since every stress in the
//! engine is already in consistent N/mm² units.
//!
//! ## Example
//!
//! ```rust
//! use plinth_core::units::{KiloNewtons, Meters, Millimeters, Newtons};
//!
//! let side = Meters(3.65);
//! let side_mm: Millimeters = side.into();
//! assert!((side_mm.0 - 3650.0).abs() < 1e-9);
//!
//! let load: Newtons = KiloNewtons(2000.0).into();
//! assert_eq!(load.0, 2_000_000.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

// ============================================================================
// Force Units
// ============================================================================

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

/// Force in kilonewtons (1 kN = 1000 N)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtons(pub f64);

impl From<KiloNewtons> for Newtons {
    fn from(kn: KiloNewtons) -> Self {
        Newtons(kn.0 * 1000.0)
    }
}

impl From<Newtons> for KiloNewtons {
    fn from(n: Newtons) -> Self {
        KiloNewtons(n.0 / 1000.0)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in square metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqM(pub f64);

/// Area in square millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqMm(pub f64);

impl From<SqM> for SqMm {
    fn from(m2: SqM) -> Self {
        SqMm(m2.0 * 1e6)
    }
}

impl From<SqMm> for SqM {
    fn from(mm2: SqMm) -> Self {
        SqM(mm2.0 / 1e6)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Millimeters);
impl_arithmetic!(Newtons);
impl_arithmetic!(KiloNewtons);
impl_arithmetic!(SqM);
impl_arithmetic!(SqMm);

/// Round to a fixed number of decimal places for reporting.
///
/// ```rust
/// use plinth_core::units::round_to;
/// assert_eq!(round_to(3.651483, 3), 3.651);
/// ```
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
