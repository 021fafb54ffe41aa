// SPDX-License-Identifier: MIT OR Apache-2.0
//! Rendering play reports.

use crate::config::ReportFormat;
use crate::error::PlayerError;
use crate::player::PlayReport;
use shapeplay_graph::TickReport;
use std::fmt::Write as _;

/// Render a report in the requested format
pub fn render(report: &PlayReport, format: ReportFormat) -> Result<String, PlayerError> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        ReportFormat::Text => Ok(render_text(report)),
    }
}

fn render_text(report: &PlayReport) -> String {
    let mut out = String::new();
    for tick in &report.ticks {
        out.push_str(&tick_line(tick));
        out.push('\n');
    }
    let outcome = if report.finished { "scene finished" } else { "tick limit reached" };
    let _ = writeln!(out, "{}: {} frames, {outcome}", report.target, report.frames);
    out
}

fn tick_line(tick: &TickReport) -> String {
    let mut line = format!("[{:>4}]", tick.frame);
    for tree in &tick.trees {
        let _ = write!(line, " {}={:?}", tree.name, tree.result);
    }
    let running: usize = tick.async_nodes.iter().map(|(_, count)| count).sum();
    if running > 0 {
        let _ = write!(line, " async={running}");
    }
    line
}
