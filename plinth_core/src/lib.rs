//! # plinth_core - Footing Design Engine
//!
//! `plinth_core` sizes reinforced-concrete pad footings: an isolated square pad
//! from load and soil pressure, a minimum-steel bar grid, punching shear and
//! crack-width checks, two-column combined pads with an optional strap, and a
//! material takeoff. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Degrade, don't abort**: a failing sub-check is embedded in the result
//!
//! ## Quick Start
//!
//! ```rust
//! use plinth_core::calculations::{size_footing, FootingInput};
//! use plinth_core::settings::DesignSettings;
//!
//! let input = FootingInput::new(2000.0, 150.0, 500.0, 25.0, 415.0);
//! let result = size_footing(&input, &DesignSettings::default()).unwrap();
//!
//! // Serialize to JSON for storage or transmission
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! assert!(json.contains("\"side_m\": 3.651"));
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Footing, combined footing, punching, serviceability, takeoff
//! - [`equations`] - Closed-form concrete formulas
//! - [`drawings`] - Plan and elevation SVG
//! - [`reports`] - Text/HTML report artifacts with atomic writes
//! - [`settings`] - Design constants and their JSON loader
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod drawings;
pub mod equations;
pub mod errors;
pub mod reports;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{CalcError, CalcResult};
pub use reports::{FileReportWriter, ReportPaths, ReportSink};
pub use settings::{load_settings, DesignSettings};
