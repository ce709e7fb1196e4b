//! # Footing Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - a pure function `(&Input, &DesignSettings) -> CalcResult<Result>`
//!
//! ## Available Calculations
//!
//! - [`footing`] - Isolated square pad sizing and grid reinforcement
//! - [`combined`] - Single/two-column combined pad orchestration
//! - [`punching`] - Two-way (punching) shear at the column
//! - [`serviceability`] - Crack width and slab strip deflection
//! - [`takeoff`] - Steel and concrete quantities from drawing parameters

pub mod combined;
pub mod footing;
pub mod punching;
pub mod serviceability;
pub mod takeoff;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

// Re-export commonly used types
pub use combined::{design_combined, CombinedFootingInput, CombinedFootingResult, FootingMode, StrapDetails};
pub use footing::{design_footing, size_footing, DrawingParams, FootingInput, FootingResult};
pub use punching::{check_punching, ColumnLocation, PunchingInput, PunchingResult, ShearReinforcement};
pub use serviceability::{
    crack_width_check, slab_deflection_check, CrackWidthInput, DeflectionInput, ServiceabilityCheck,
    ServiceabilityResult,
};
pub use takeoff::{estimate_takeoff, TakeoffSummary};

/// Outcome slot for a nested check.
///
/// A failing sub-check never aborts the parent design: its error message is
/// stored in place of the result and serializes as `{ "error": "..." }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubCheck<T> {
    /// The check ran to completion
    Completed(T),
    /// The check could not be evaluated
    Failed { error: String },
}

impl<T> SubCheck<T> {
    /// The completed result, if any
    pub fn result(&self) -> Option<&T> {
        match self {
            SubCheck::Completed(value) => Some(value),
            SubCheck::Failed { .. } => None,
        }
    }

    /// The embedded error message, if the check failed
    pub fn error(&self) -> Option<&str> {
        match self {
            SubCheck::Completed(_) => None,
            SubCheck::Failed { error } => Some(error),
        }
    }

    /// Capture a check outcome, logging the degradation when it failed.
    pub fn capture(check: &str, outcome: CalcResult<T>) -> Self {
        match outcome {
            Ok(value) => SubCheck::Completed(value),
            Err(e) => {
                let failure = CalcError::subcheck_failed(check, e.to_string());
                tracing::warn!(check, code = e.error_code(), error = %e, "sub-check degraded to embedded error");
                SubCheck::Failed {
                    error: failure.to_string(),
                }
            }
        }
    }
}

/// Enum wrapper for all design requests.
///
/// Lets callers (CLI files, batch jobs) carry heterogeneous requests in one
/// collection while keeping a clean tagged JSON form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    /// Isolated pad footing
    Footing(FootingInput),
    /// Single or two-column combined footing
    CombinedFooting(CombinedFootingInput),
}

impl CalculationItem {
    /// Get the user-provided label for this calculation
    pub fn label(&self) -> &str {
        match self {
            CalculationItem::Footing(f) => &f.label,
            CalculationItem::CombinedFooting(c) => &c.label,
        }
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Footing(_) => "Footing",
            CalculationItem::CombinedFooting(_) => "CombinedFooting",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subcheck_capture_failure() {
        let check: SubCheck<f64> =
            SubCheck::capture("punching", Err(CalcError::invalid_input("fc_mpa", "NaN", "bad")));
        let error = check.error().unwrap();
        assert!(error.starts_with("punching check failed"));
        assert_eq!(
            error,
            CalcError::subcheck_failed("punching", "Invalid input for 'fc_mpa': NaN - bad").to_string()
        );
        assert!(check.result().is_none());

        let json = serde_json::to_value(&check).unwrap();
        assert!(json.get("error").is_some());
    }

    #[test]
    fn test_subcheck_completed_is_transparent() {
        let check = SubCheck::capture("takeoff", Ok(2.5_f64));
        assert_eq!(check.result(), Some(&2.5));
        assert_eq!(serde_json::to_string(&check).unwrap(), "2.5");
    }

    #[test]
    fn test_calculation_item_tagging() {
        let json = r#"{
            "type": "Footing",
            "label": "F-1",
            "pu_kn": 800.0,
            "soil_allow_kn_per_m2": 200.0,
            "pad_depth_mm": 450.0,
            "fc_mpa": 25.0,
            "fy_mpa": 415.0
        }"#;
        let item: CalculationItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.calc_type(), "Footing");
        assert_eq!(item.label(), "F-1");
    }
}
