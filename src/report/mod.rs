//! Human-readable and JSON rendering of an `AnalysisResult`.

use std::fmt::{self, Write as _};

use anyhow::{Context, Result};
use clap::ValueEnum;
use strum_macros::Display;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::domain::Wave;
use crate::models::{AnalysisResult, FibTarget};
use crate::utils::{TimeUtils, epoch_ms_to_utc};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Tabled)]
struct WaveRow {
    #[tabled(rename = "Wave")]
    label: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Dir")]
    direction: String,
    #[tabled(rename = "Cycle")]
    cycle: usize,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "From")]
    start_price: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "To")]
    end_price: String,
    #[tabled(rename = "Move %")]
    move_pct: String,
}

#[derive(Tabled)]
struct InvalidRow {
    #[tabled(rename = "Wave")]
    label: String,
    #[tabled(rename = "Cycle")]
    cycle: usize,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "Rule")]
    rule: String,
    #[tabled(rename = "At")]
    at: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

#[derive(Tabled)]
struct FibRow {
    #[tabled(rename = "Ratio")]
    ratio: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Level")]
    label: String,
    #[tabled(rename = "Confluence")]
    confluence: String,
}

pub struct WaveReport<'a> {
    pub symbol: &'a str,
    pub result: &'a AnalysisResult,
    /// Bar spacing, used to pick the timestamp format
    pub interval_ms: i64,
}

impl<'a> WaveReport<'a> {
    pub fn new(symbol: &'a str, result: &'a AnalysisResult, interval_ms: i64) -> Self {
        Self {
            symbol,
            result,
            interval_ms,
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(self.result).context("Failed to serialise result")
            }
            OutputFormat::Table => self.render_tables().context("Failed to render report"),
        }
    }

    fn render_tables(&self) -> Result<String, fmt::Error> {
        let r = self.result;
        let mut out = String::new();

        // 1. Summary
        writeln!(
            out,
            "{} [{}]  status: {}  trend: {}  price: {:.4}",
            self.symbol,
            TimeUtils::interval_to_string(self.interval_ms),
            r.status,
            r.trend,
            r.current_price
        )?;
        writeln!(
            out,
            "pivots: {}  restarts: {}  impulse: {}  corrective: {}",
            r.pivot_count,
            r.restarts,
            yes_no(r.impulse_pattern),
            yes_no(r.corrective_pattern)
        )?;

        // 2. Completed waves
        writeln!(out, "\nCompleted waves ({})", r.waves.len())?;
        if r.waves.is_empty() {
            writeln!(out, "  none")?;
        } else {
            let rows: Vec<WaveRow> = r.waves.iter().map(|w| self.wave_row(w)).collect();
            writeln!(out, "{}", Table::new(rows).with(Style::rounded()))?;
        }

        // 3. Current wave
        let cw = &r.current_wave;
        writeln!(
            out,
            "\nCurrent wave: {} ({}, {}) from {:.4} at {}",
            cw.label,
            cw.role,
            cw.direction,
            cw.start_price,
            self.ts(cw.start_timestamp)
        )?;

        // 4. Fib levels
        if !r.fib_targets.is_empty() {
            let rows: Vec<FibRow> = r.fib_targets.iter().map(fib_row).collect();
            writeln!(out, "\nFibonacci levels")?;
            writeln!(out, "{}", Table::new(rows).with(Style::rounded()))?;
        }

        // 5. Audit trail
        if !r.invalid_waves.is_empty() {
            let rows: Vec<InvalidRow> = r.invalid_waves.iter().map(|w| self.invalid_row(w)).collect();
            writeln!(out, "\nInvalidated waves ({})", rows.len())?;
            writeln!(out, "{}", Table::new(rows).with(Style::rounded()))?;
        }

        Ok(out)
    }

    fn ts(&self, epoch_ms: i64) -> String {
        epoch_ms_to_utc(epoch_ms, self.interval_ms)
    }

    fn wave_row(&self, w: &Wave) -> WaveRow {
        WaveRow {
            label: w.label.to_string(),
            role: w.role.to_string(),
            direction: w.direction.to_string(),
            cycle: w.cycle,
            start: self.ts(w.start_timestamp),
            start_price: format!("{:.4}", w.start_price),
            end: w.end_timestamp.map(|t| self.ts(t)).unwrap_or_else(|| "-".into()),
            end_price: w.end_price.map(|p| format!("{:.4}", p)).unwrap_or_else(|| "-".into()),
            move_pct: w
                .end_price
                .map(|end| format!("{:+.2}", (end - w.start_price) / w.start_price * 100.0))
                .unwrap_or_else(|| "-".into()),
        }
    }

    fn invalid_row(&self, w: &Wave) -> InvalidRow {
        let (rule, at, reason) = match &w.invalidation {
            Some(inv) => (
                inv.rule.clone(),
                format!("{:.4} @ {}", inv.price, self.ts(inv.timestamp)),
                inv.reason.clone(),
            ),
            None => ("-".into(), "-".into(), "-".into()),
        };
        InvalidRow {
            label: w.label.to_string(),
            cycle: w.cycle,
            start: self.ts(w.start_timestamp),
            rule,
            at,
            reason,
        }
    }
}

fn fib_row(t: &FibTarget) -> FibRow {
    FibRow {
        ratio: format!("{:.3}", t.ratio),
        price: format!("{:.4}", t.price),
        kind: if t.is_retracement && t.is_extension {
            "both".into()
        } else if t.is_extension {
            "extension".into()
        } else {
            "retracement".into()
        },
        label: t.label.to_string(),
        confluence: yes_no(t.confluence).into(),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
