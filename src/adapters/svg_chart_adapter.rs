//! SVG chart report adapter implementing ReportPort.
//!
//! Renders the portfolio value curve and its running drawdown as two
//! stacked panels in one dependency-free SVG document.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::DiptraderError;
use crate::domain::portfolio::ValuationSnapshot;
use crate::ports::report_port::ReportPort;
use std::io::Write;

const WIDTH: f64 = 640.0;
const PANEL_HEIGHT: f64 = 240.0;
const PADDING: f64 = 40.0;

pub struct SvgChartAdapter;

impl SvgChartAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SvgChartAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Scale a value series into polyline coordinates for one panel.
fn polyline_points(values: &[f64]) -> String {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = PANEL_HEIGHT - 2.0 * PADDING;

    let range = max - min;
    let scale_y = if range > 0.0 {
        plot_height / range
    } else {
        1.0
    };
    let scale_x = if values.len() > 1 {
        plot_width / (values.len() - 1) as f64
    } else {
        0.0
    };

    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let x = PADDING + i as f64 * scale_x;
            let y = PANEL_HEIGHT - PADDING - (value - min) * scale_y;
            format!("{:.1},{:.1}", x, y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drawdown fraction per snapshot against the running peak.
fn drawdown_series(history: &[ValuationSnapshot]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    history
        .iter()
        .map(|snap| {
            peak = peak.max(snap.total_value);
            if peak > 0.0 {
                (peak - snap.total_value) / peak
            } else {
                0.0
            }
        })
        .collect()
}

fn write_panel(
    out: &mut dyn Write,
    title: &str,
    values: &[f64],
    stroke: &str,
    y_offset: f64,
) -> Result<(), DiptraderError> {
    writeln!(out, r#"  <g transform="translate(0,{:.0})">"#, y_offset)?;
    writeln!(
        out,
        r#"    <text x="{:.0}" y="{:.0}" font-family="monospace" font-size="14">{}</text>"#,
        PADDING,
        PADDING - 16.0,
        title
    )?;
    writeln!(
        out,
        r#"    <line x1="{p:.0}" y1="{p:.0}" x2="{p:.0}" y2="{b:.0}" stroke="black"/>"#,
        p = PADDING,
        b = PANEL_HEIGHT - PADDING
    )?;
    writeln!(
        out,
        r#"    <line x1="{p:.0}" y1="{b:.0}" x2="{r:.0}" y2="{b:.0}" stroke="black"/>"#,
        p = PADDING,
        b = PANEL_HEIGHT - PADDING,
        r = WIDTH - PADDING
    )?;
    writeln!(
        out,
        r#"    <polyline fill="none" stroke="{}" stroke-width="1.5" points="{}"/>"#,
        stroke,
        polyline_points(values)
    )?;
    writeln!(out, "  </g>")?;
    Ok(())
}

impl ReportPort for SvgChartAdapter {
    fn write(&self, result: &BacktestResult, out: &mut dyn Write) -> Result<(), DiptraderError> {
        let height = PANEL_HEIGHT * 2.0;
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#,
            w = WIDTH,
            h = height
        )?;
        writeln!(out, r#"  <rect width="100%" height="100%" fill="white"/>"#)?;

        if result.history.is_empty() {
            writeln!(
                out,
                r#"  <text x="{:.0}" y="{:.0}" font-family="monospace" font-size="14">No portfolio history</text>"#,
                PADDING, PADDING
            )?;
            writeln!(out, "</svg>")?;
            return Ok(());
        }

        let totals: Vec<f64> = result.history.iter().map(|s| s.total_value).collect();
        write_panel(out, "Portfolio value", &totals, "steelblue", 0.0)?;
        write_panel(
            out,
            "Drawdown",
            &drawdown_series(&result.history),
            "firebrick",
            PANEL_HEIGHT,
        )?;

        writeln!(out, "</svg>")?;
        Ok(())
    }
}
