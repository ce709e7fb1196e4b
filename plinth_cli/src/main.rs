//! # Plinth CLI Application
//!
//! Terminal calculator for isolated pad footings.
//!
//! - `plinth_cli` prompts for load, soil pressure, pad depth and column size
//! - `plinth_cli <input.json>` designs from a file holding a `FootingInput`
//!   or a tagged calculation item (`"type": "Footing" | "CombinedFooting"`)
//!
//! `PLINTH_SETTINGS` points at an optional design-settings JSON file.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use plinth_core::calculations::{
    design_combined, size_footing, CalculationItem, CombinedFootingResult, FootingInput, FootingResult,
};
use plinth_core::{load_settings, CalcError, CalcResult, DesignSettings};
use tracing_subscriber::EnvFilter;

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}

fn settings_from_env() -> CalcResult<DesignSettings> {
    match std::env::var("PLINTH_SETTINGS") {
        Ok(path) if !path.is_empty() => load_settings(Path::new(&path)),
        _ => Ok(DesignSettings::default()),
    }
}

/// Parse a design request file: a tagged item, or a bare footing input.
fn read_request(path: &Path) -> CalcResult<CalculationItem> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    if let Ok(item) = serde_json::from_str::<CalculationItem>(&contents) {
        return Ok(item);
    }

    serde_json::from_str::<FootingInput>(&contents)
        .map(CalculationItem::Footing)
        .map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })
}

fn prompt_footing() -> FootingInput {
    let pu_kn = prompt_f64("Enter factored column load Pu (kN) [2000.0]: ", 2000.0);
    let soil = prompt_f64("Enter allowable soil pressure (kN/m²) [150.0]: ", 150.0);
    let depth = prompt_f64("Enter pad depth (mm) [500.0]: ", 500.0);
    let col = prompt_f64("Enter square column size (mm) [300.0]: ", 300.0);

    FootingInput::new(pu_kn, soil, depth, 25.0, 415.0)
        .with_label("CLI-Demo")
        .with_column(col, col)
}

fn print_footing(input: &FootingInput, result: &FootingResult) {
    println!("═══════════════════════════════════════");
    println!("  FOOTING DESIGN RESULTS");
    println!("═══════════════════════════════════════");
    println!();
    println!("Input:");
    println!("  Load:     {:.1} kN", input.pu_kn);
    println!("  Soil:     {:.1} kN/m²", input.soil_allow_kn_per_m2);
    println!("  Depth:    {:.0} mm", input.pad_depth_mm);
    println!("  Column:   {:.0} x {:.0} mm", input.column_b_mm(), input.column_d_mm());
    println!("  Concrete: f'c = {:.0} MPa, fy = {:.0} MPa", input.fc_mpa, input.fy_mpa);
    println!();
    println!("Sizing:");
    println!("  A_req   = {:.3} m²", result.a_req_m2);
    println!("  Side    = {:.3} m{}", result.side_m, if result.side_assumed { " (assumed)" } else { "" });
    println!("  A_final = {:.3} m² (ecc factor {:.3})", result.a_final_m2, result.ecc_effect_factor);
    println!();
    println!("Reinforcement:");
    println!(
        "  {} x T{:.0} per row, {} layers @ {:.0} mm",
        result.n_per_row, result.bar_dia_mm, result.n_layers, result.spacing_mm
    );
    println!(
        "  As = {:.0} mm² provided vs {:.0} mm² required {}",
        result.provided_as_mm2,
        result.as_req_mm2,
        status_icon(result.provided_as_mm2 >= result.as_req_mm2)
    );
    println!();
    println!("Checks:");
    match result.punching.result() {
        Some(p) => println!(
            "  Punching:    {:.1}% (φVc {:.0} kN vs Vu {:.0} kN) {}",
            p.utilization_percent,
            p.phi_vc_n / 1000.0,
            p.vu_adj_n / 1000.0,
            status_icon(p.punching_safe)
        ),
        None => println!("  Punching:    {} [FAIL]", result.punching.error().unwrap_or("not evaluated")),
    }
    match result.serviceability.result() {
        Some(s) => println!(
            "  Crack width: {:.3} mm (limit {:.2} mm) {}",
            s.estimated_mm,
            s.allowable_mm,
            status_icon(s.passes)
        ),
        None => println!("  Crack width: {} [FAIL]", result.serviceability.error().unwrap_or("not evaluated")),
    }
    println!();
    println!("═══════════════════════════════════════");
    println!(
        "  RESULT: {} (governs: {})",
        if result.passes() { "PASS" } else { "FAIL" },
        result.governing_condition().unwrap_or("none")
    );
    println!("═══════════════════════════════════════");
}

fn print_combined(result: &CombinedFootingResult) {
    println!("═══════════════════════════════════════");
    println!("  COMBINED FOOTING RESULTS ({:?})", result.mode);
    println!("═══════════════════════════════════════");
    println!();
    println!("  Total load: {:.1} kN", result.total_load_kn);
    println!("  Area:       {:.3} m² required, {:.3} m² used", result.required_area_m2, result.used_area_m2);
    println!("  Pad side:   {:.3} m", result.pad_side_m);
    if let Some(p) = result.punching.result() {
        println!("  Punching:   {:.1}% {}", p.utilization_percent, status_icon(p.punching_safe));
    }
    if let Some(s) = result.serviceability.result() {
        println!("  Crack:      {:.3} mm {}", s.estimated_mm, status_icon(s.passes));
    }
    if let Some(t) = result.takeoff.result() {
        println!("  Steel:      {:.1} kg, concrete {:.2} m³", t.steel_mass_kg, t.total_concrete_m3());
    }
    println!();
    println!("  RESULT: {}", if result.passes() { "PASS" } else { "FAIL" });
    println!("═══════════════════════════════════════");
}

fn print_json<T: serde::Serialize>(value: &T) {
    println!();
    println!("JSON Output (for API use):");
    if let Ok(json) = serde_json::to_string_pretty(value) {
        println!("{}", json);
    }
}

fn run(settings: &DesignSettings, item: CalculationItem) -> CalcResult<()> {
    tracing::debug!(calc_type = item.calc_type(), label = item.label(), "running calculation");
    match item {
        CalculationItem::Footing(input) => {
            let result = size_footing(&input, settings)?;
            print_footing(&input, &result);
            print_json(&result);
        }
        CalculationItem::CombinedFooting(input) => {
            let result = design_combined(&input, settings, None)?;
            print_combined(&result);
            print_json(&result);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("Plinth CLI - Footing Design Calculator");
    println!("======================================");
    println!();

    let outcome = settings_from_env().and_then(|settings| {
        let item = match std::env::args().nth(1) {
            Some(path) => read_request(Path::new(&path))?,
            None => CalculationItem::Footing(prompt_footing()),
        };
        println!();
        run(&settings, item)
    });

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}
