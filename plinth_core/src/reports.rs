//! # Report Artifacts
//!
//! Persists a design's inputs and results as a plain-text and an HTML report.
//!
//! - **Atomic writes**: each file is written to `.tmp`, synced, then renamed
//! - **Unique names**: `{prefix}_report_{YYYYmmdd_HHMMSS}_{short-uuid}.txt|.html`
//! - **Escaped HTML**: JSON bodies are escaped before they go into `<pre>`
//!
//! Report failures never abort a design; callers record the error next to the
//! result instead.
//!
//! ## Example
//!
//! ```rust,no_run
//! use plinth_core::reports::{FileReportWriter, ReportSink};
//! use serde_json::json;
//!
//! let writer = FileReportWriter::new("reports");
//! let paths = writer.write_reports("footing", &json!({"pu_kn": 800.0}), &json!({"side_m": 2.0}))?;
//! println!("{}", paths.html_path);
//! # Ok::<(), plinth_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{CalcError, CalcResult};

/// Locations of the two report files written for one design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPaths {
    pub text_path: String,
    pub html_path: String,
}

/// Destination for design reports.
pub trait ReportSink: Send + Sync {
    /// Write a text and an HTML report for `inputs` and `results`.
    fn write_reports(&self, prefix: &str, inputs: &Value, results: &Value) -> CalcResult<ReportPaths>;
}

/// Writes reports as files under a directory (created on first use).
#[derive(Debug, Clone)]
pub struct FileReportWriter {
    dir: PathBuf,
}

impl FileReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileReportWriter { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn report_stem(prefix: &str) -> String {
        let ts = Local::now().format("%Y%m%d_%H%M%S");
        let id = Uuid::new_v4().simple().to_string();
        format!("{}_report_{}_{}", prefix, ts, &id[..8])
    }
}

impl ReportSink for FileReportWriter {
    fn write_reports(&self, prefix: &str, inputs: &Value, results: &Value) -> CalcResult<ReportPaths> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            CalcError::report_write_failed(self.dir.display().to_string(), e.to_string())
        })?;

        let stem = Self::report_stem(prefix);
        let text_path = self.dir.join(format!("{}.txt", stem));
        let html_path = self.dir.join(format!("{}.html", stem));

        let inputs_json = pretty_json(inputs)?;
        let results_json = pretty_json(results)?;

        write_atomic(&text_path, &render_text(&inputs_json, &results_json))?;
        write_atomic(&html_path, &render_html(&inputs_json, &results_json))?;

        tracing::debug!(text = %text_path.display(), html = %html_path.display(), "reports written");

        Ok(ReportPaths {
            text_path: text_path.display().to_string(),
            html_path: html_path.display().to_string(),
        })
    }
}

/// Serialize a design's input and result records and hand them to `sink`.
pub fn write_design_reports<I, R>(sink: &dyn ReportSink, prefix: &str, inputs: &I, results: &R) -> CalcResult<ReportPaths>
where
    I: Serialize,
    R: Serialize,
{
    let inputs = serde_json::to_value(inputs).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;
    let results = serde_json::to_value(results).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;
    sink.write_reports(prefix, &inputs, &results)
}

fn pretty_json(value: &Value) -> CalcResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })
}

fn render_text(inputs_json: &str, results_json: &str) -> String {
    format!(
        "Footing design report\n=====================\n\nInputs:\n{}\n\nResults:\n{}\n",
        inputs_json, results_json
    )
}

fn render_html(inputs_json: &str, results_json: &str) -> String {
    format!(
        "<html><body style='font-family:Arial,Helvetica,sans-serif;padding:16px;'>\
         <h1>Footing design report</h1>\n\
         <h2>Inputs</h2><pre>{}</pre>\n\
         <h2>Results</h2><pre>{}</pre>\n\
         </body></html>",
        escape_html(inputs_json),
        escape_html(results_json)
    )
}

/// Escape the five HTML-significant characters.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Write `contents` to `path` via a synced temp file and a rename.
fn write_atomic(path: &Path, contents: &str) -> CalcResult<()> {
    let tmp_path = path.with_extension("tmp");
    let fail = |p: &Path, what: &str, e: std::io::Error| {
        CalcError::report_write_failed(p.display().to_string(), format!("{}: {}", what, e))
    };

    let mut tmp_file = File::create(&tmp_path).map_err(|e| fail(&tmp_path, "create temp file", e))?;
    tmp_file
        .write_all(contents.as_bytes())
        .map_err(|e| fail(&tmp_path, "write temp file", e))?;
    tmp_file.sync_all().map_err(|e| fail(&tmp_path, "sync temp file", e))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        fail(path, "rename to final", e)
    })?;

    Ok(())
}
