//! # Drawings
//!
//! Plan and elevation sketches of a pad as standalone SVG. Output depends only
//! on the inputs, so identical designs produce byte-identical drawings.
//!
//! ## Example
//!
//! ```rust
//! use plinth_core::drawings::{render_plan_svg, PlanLayout};
//!
//! let svg = render_plan_svg(&PlanLayout::single(2.0, 400.0, 400.0));
//! assert!(svg.starts_with("<svg"));
//! assert!(svg.contains("pad 2.000 m × 2.000 m"));
//! ```

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::calculations::combined::{CombinedFootingInput, CombinedFootingResult, FootingMode, StrapDetails};
use crate::calculations::footing::{DrawingParams, FootingInput, FootingResult, DEFAULT_COLUMN_MM};
use crate::calculations::takeoff::{estimate_takeoff, TakeoffSummary};
use crate::calculations::SubCheck;
use crate::settings::DesignSettings;

const PLAN_WIDTH_PX: i64 = 1000;
const PLAN_HEIGHT_PX: i64 = 600;
const ELEV_WIDTH_PX: i64 = 600;
const ELEV_HEIGHT_PX: i64 = 400;

/// Elevation scale (px per m)
const ELEV_SCALE: f64 = 150.0;

/// One column drawn on the pad, offset along x from the pad centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFootprint {
    pub b_mm: f64,
    pub d_mm: f64,
    #[serde(default)]
    pub offset_m: f64,
}

/// What a plan view shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanLayout {
    pub pad_side_m: f64,
    #[serde(default)]
    pub columns: Vec<ColumnFootprint>,
    #[serde(default)]
    pub strap: Option<StrapDetails>,
}

impl PlanLayout {
    /// Pad with one central column.
    pub fn single(pad_side_m: f64, col_b_mm: f64, col_d_mm: f64) -> Self {
        PlanLayout {
            pad_side_m,
            columns: vec![ColumnFootprint {
                b_mm: col_b_mm,
                d_mm: col_d_mm,
                offset_m: 0.0,
            }],
            strap: None,
        }
    }

    /// Pad with two columns placed symmetrically `spacing_m` apart.
    pub fn two_column(
        pad_side_m: f64,
        col1: (f64, f64),
        col2: (f64, f64),
        spacing_m: f64,
        strap: Option<StrapDetails>,
    ) -> Self {
        let half = spacing_m / 2.0;
        PlanLayout {
            pad_side_m,
            columns: vec![
                ColumnFootprint {
                    b_mm: col1.0,
                    d_mm: col1.1,
                    offset_m: -half,
                },
                ColumnFootprint {
                    b_mm: col2.0,
                    d_mm: col2.1,
                    offset_m: half,
                },
            ],
            strap,
        }
    }

    pub fn for_footing(input: &FootingInput, result: &FootingResult) -> Self {
        PlanLayout::single(result.side_m, input.column_b_mm(), input.column_d_mm())
    }

    /// Two columns when a spacing is known, otherwise a single central column.
    pub fn for_combined(input: &CombinedFootingInput, result: &CombinedFootingResult) -> Self {
        match (result.mode, input.spacing_m) {
            (FootingMode::TwoColumn, Some(spacing)) if spacing > 0.0 => {
                let col1 = (
                    input.col1_b_mm.unwrap_or(DEFAULT_COLUMN_MM),
                    input.col1_d_mm.unwrap_or(DEFAULT_COLUMN_MM),
                );
                let col2 = (
                    input.col2_b_mm.unwrap_or(DEFAULT_COLUMN_MM),
                    input.col2_d_mm.unwrap_or(DEFAULT_COLUMN_MM),
                );
                PlanLayout::two_column(result.pad_side_m, col1, col2, spacing, result.strap.clone())
            }
            _ => {
                let (b, d) = input.punching_column_mm();
                PlanLayout::single(result.pad_side_m, b, d)
            }
        }
    }
}

/// Plan and elevation for one pad, with its takeoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingSet {
    pub plan_svg: String,
    pub elevation_svg: String,
    pub takeoff: SubCheck<TakeoffSummary>,
}

/// Render both views and estimate quantities.
pub fn generate_drawings(layout: &PlanLayout, params: &DrawingParams, settings: &DesignSettings) -> DrawingSet {
    let strap_volume = layout.strap.as_ref().and_then(StrapDetails::concrete_volume_m3);
    DrawingSet {
        plan_svg: render_plan_svg(layout),
        elevation_svg: render_elevation_svg(params),
        takeoff: SubCheck::capture(
            "takeoff",
            estimate_takeoff(params, settings).map(|t| t.with_strap_volume(strap_volume)),
        ),
    }
}

fn svg_header(width: i64, height: i64) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" \
         style=\"background:#ffffff;font-family:Arial,Helvetica,sans-serif\">\n",
        w = width,
        h = height
    )
}

fn px(meters: f64, scale: f64) -> i64 {
    (meters * scale) as i64
}

/// Plan scale (px per m): large pads shrink, small ones are capped.
fn plan_scale(pad_side_m: f64) -> f64 {
    (200.0 / pad_side_m.max(0.3)).floor().clamp(80.0, 250.0)
}

/// Plan view: pad outline, columns and an optional strap.
pub fn render_plan_svg(layout: &PlanLayout) -> String {
    let side_m = if layout.pad_side_m.is_finite() && layout.pad_side_m > 0.0 {
        layout.pad_side_m
    } else {
        1.0
    };
    let scale = plan_scale(side_m);
    let cx = PLAN_WIDTH_PX / 2;
    let cy = PLAN_HEIGHT_PX / 2;

    let mut svg = svg_header(PLAN_WIDTH_PX, PLAN_HEIGHT_PX);
    let kind = if layout.columns.len() > 1 { "combined" } else { "footing" };
    let _ = writeln!(svg, "<text x=\"16\" y=\"22\" font-size=\"14\" fill=\"#111\">plan: {}</text>", kind);

    let side_px = px(side_m, scale);
    let x = cx - side_px / 2;
    let y = cy - side_px / 2;
    let _ = writeln!(
        svg,
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#f3f4f6\" stroke=\"#0f172a\" stroke-width=\"2\"/>",
        x, y, side_px, side_px
    );

    let mut max_half_col_px = 0;
    for col in &layout.columns {
        let b_px = px((col.b_mm / 1000.0).max(0.15), scale).max(6);
        let d_px = px((col.d_mm / 1000.0).max(0.15), scale).max(6);
        let col_cx = cx + px(col.offset_m, scale);
        max_half_col_px = max_half_col_px.max(d_px / 2);
        let _ = writeln!(
            svg,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#111827\"/>",
            col_cx - b_px / 2,
            cy - d_px / 2,
            b_px,
            d_px
        );
    }

    if let (Some(_), [first, .., last]) = (&layout.strap, layout.columns.as_slice()) {
        let x1 = cx + px(first.offset_m.min(last.offset_m), scale);
        let x2 = cx + px(first.offset_m.max(last.offset_m), scale);
        let strap_h = px(0.1, scale);
        let sx = x1 - 40;
        let sy = cy + max_half_col_px + 12;
        let _ = writeln!(
            svg,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#fde68a\" stroke=\"#b45309\"/>",
            sx,
            sy,
            (x2 - x1) + 80,
            strap_h
        );
        let _ = writeln!(
            svg,
            "<text x=\"{}\" y=\"{}\" font-size=\"10\" fill=\"#92400e\">strap</text>",
            sx + 6,
            sy + strap_h - 4
        );
    }

    let _ = writeln!(
        svg,
        "<text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"#111\">pad {:.3} m × {:.3} m</text>",
        x + 6,
        y + 14,
        side_m,
        side_m
    );
    svg.push_str("</svg>\n");
    svg
}

/// Elevation view: pad section with top and bottom bar layers.
pub fn render_elevation_svg(params: &DrawingParams) -> String {
    let depth_mm = if params.pad_depth_mm.is_finite() && params.pad_depth_mm > 0.0 {
        params.pad_depth_mm
    } else {
        400.0
    };
    let side_m = if params.pad_side_m.is_finite() && params.pad_side_m > 0.0 {
        params.pad_side_m
    } else {
        1.0
    };

    let cx = ELEV_WIDTH_PX / 2;
    let cy = ELEV_HEIGHT_PX / 2;
    let pad_h = px(depth_mm / 1000.0, ELEV_SCALE).max(20);
    let pad_w = px(side_m, ELEV_SCALE).min(ELEV_WIDTH_PX - 80);
    let x = cx - pad_w / 2;
    let y = cy - pad_h / 2;

    let mut svg = svg_header(ELEV_WIDTH_PX, ELEV_HEIGHT_PX);
    svg.push_str("<text x=\"10\" y=\"20\" font-size=\"12\" fill=\"#111\">elevation: footing</text>\n");
    let _ = writeln!(
        svg,
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#f3f4f6\" stroke=\"#0f172a\"/>",
        x, y, pad_w, pad_h
    );
    for bar_y in [y + 10, y + pad_h - 10] {
        let _ = writeln!(
            svg,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#0b1220\" stroke-width=\"2\"/>",
            x + 10,
            bar_y,
            x + pad_w - 10,
            bar_y
        );
    }
    let _ = writeln!(
        svg,
        "<text x=\"{}\" y=\"{}\" font-size=\"11\" fill=\"#111\">pad depth: {:.0} mm, T{:.0} @ {:.0} mm, {} per row</text>",
        x + 6,
        y + 14,
        depth_mm,
        params.bar_dia_mm,
        params.spacing_mm,
        params.n_per_row
    );
    svg.push_str("</svg>\n");
    svg
}
