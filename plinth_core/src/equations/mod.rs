//! # Structural Engineering Equations
//!
//! Closed-form formulas used by the footing calculations, kept in one place so
//! each heuristic can be checked against its reference in isolation.
//!
//! ## Modules
//!
//! - [`concrete`] - Bar areas, eccentricity amplification, punching perimeter,
//!   concrete shear capacity and strip deflection
//!
//! ## Conventions
//!
//! - **Loads**: Positive downward (gravity direction)
//! - **Eccentricity**: Measured from the pad centroid, sign ignored
//! - **Deflection**: Positive downward
//!
//! ## References
//!
//! - ACI 318-19: Building Code Requirements for Structural Concrete
//! - Roark's Formulas for Stress and Strain, 8th Edition

pub mod concrete;

pub use concrete::{
    bar_area_mm2,
    concrete_shear_stress_mpa,
    eccentricity_factor,
    effective_depth_mm,
    governing_eccentricity,
    punching_perimeter_mm,
    strip_gross_inertia,
    uniform_load_max_deflection,
};
