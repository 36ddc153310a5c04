//! Contract for an external, non-deterministic "second opinion" on the wave count.
//!
//! A hosted language model (or anything else) can sit behind [`AlternativeAnalyst`]. It receives
//! the same bars plus a plain-language statement of the counting rules and must answer with a
//! same-shaped `AnalysisResult` JSON. The engine never calls this path; callers use
//! [`compare_results`] to see where the two disagree.

use std::collections::HashSet;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{Bar, WaveLabel};
use crate::models::{AnalysisResult, Trend};

/// Payload for an alternative analyst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpinionRequest {
    pub symbol: String,
    pub bars: Vec<Bar>,
    pub rules: String,
}

impl OpinionRequest {
    pub fn new(symbol: &str, bars: &[Bar]) -> Self {
        Self {
            symbol: symbol.to_string(),
            bars: bars.to_vec(),
            rules: rule_description(),
        }
    }
}

pub trait AlternativeAnalyst {
    fn name(&self) -> &str;
    fn request_opinion(&self, req: &OpinionRequest) -> Result<AnalysisResult>;
}

/// The counting rules, in the order the engine applies them.
pub fn rule_description() -> String {
    [
        "Label alternating swing pivots as waves 1, 2, 3, 4, 5, A, B, C, then start again at 1.",
        "1. Wave 3 must end beyond the end of wave 1 before the count is confirmed.",
        "2. Wave 2 may not retrace more than 100% of wave 1.",
        "3. Wave 4 may not end beyond the end of wave 1.",
        "4. Wave 3 may not be the shortest of waves 1, 3 and 5.",
        "5. The price ranges of wave 1 and wave 4 may not overlap.",
        "When a rule breaks, discard the current cycle and restart wave 1 at the end of its wave 2.",
        "Answer with JSON: { status, waves, invalidWaves, currentWave, fibTargets, trend, impulsePattern, correctivePattern }.",
    ]
    .join("\n")
}

/// Parses an alternative analyst's answer. Surrounding prose or a fenced code block is tolerated.
pub fn parse_opinion(raw: &str) -> Result<AnalysisResult> {
    let start = raw.find('{').context("No JSON object in opinion")?;
    let end = raw.rfind('}').context("No JSON object in opinion")?;
    let body = raw.get(start..=end).context("Malformed JSON object bounds")?;

    serde_json::from_str(body).context("Opinion does not match the AnalysisResult shape")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultComparison {
    pub trend_agrees: bool,
    pub engine_trend: Trend,
    pub alternative_trend: Trend,
    /// Completed waves present in both (same label, same start timestamp).
    pub matching_waves: usize,
    pub engine_waves: usize,
    pub alternative_waves: usize,
    pub patterns_agree: bool,
    pub current_label_agrees: bool,
}

impl ResultComparison {
    /// Share of the engine's completed waves the alternative also found.
    pub fn overlap_ratio(&self) -> f64 {
        if self.engine_waves == 0 {
            return if self.alternative_waves == 0 { 1.0 } else { 0.0 };
        }
        self.matching_waves as f64 / self.engine_waves as f64
    }
}

pub fn compare_results(engine: &AnalysisResult, alternative: &AnalysisResult) -> ResultComparison {
    let alt_keys: HashSet<(WaveLabel, i64)> = alternative
        .waves
        .iter()
        .map(|w| (w.label, w.start_timestamp))
        .collect();

    let matching_waves = engine
        .waves
        .iter()
        .filter(|w| alt_keys.contains(&(w.label, w.start_timestamp)))
        .count();

    ResultComparison {
        trend_agrees: engine.trend == alternative.trend,
        engine_trend: engine.trend,
        alternative_trend: alternative.trend,
        matching_waves,
        engine_waves: engine.waves.len(),
        alternative_waves: alternative.waves.len(),
        patterns_agree: engine.impulse_pattern == alternative.impulse_pattern
            && engine.corrective_pattern == alternative.corrective_pattern,
        current_label_agrees: engine.current_wave.label == alternative.current_wave.label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_waves;
    use crate::config::WaveConfig;
    use crate::data::fixtures;

    /// Echoes the deterministic engine back, as a stand-in for a hosted model.
    struct EchoAnalyst;

    impl AlternativeAnalyst for EchoAnalyst {
        fn name(&self) -> &str {
            "echo"
        }

        fn request_opinion(&self, req: &OpinionRequest) -> Result<AnalysisResult> {
            let json = serde_json::to_string(&analyze_waves(&req.bars, &WaveConfig::default())?)?;
            parse_opinion(&format!("Here is my count:\n```json\n{}\n```", json))
        }
    }

    #[test]
    fn test_echo_opinion_agrees_fully() {
        let bars = fixtures::impulse_then_correction();
        let engine = analyze_waves(&bars, &WaveConfig::default()).unwrap();
        let alt = EchoAnalyst
            .request_opinion(&OpinionRequest::new("TEST", &bars))
            .unwrap();

        let cmp = compare_results(&engine, &alt);
        assert!(cmp.trend_agrees);
        assert!(cmp.patterns_agree);
        assert_eq!(cmp.matching_waves, 8);
        assert_eq!(cmp.overlap_ratio(), 1.0);
    }

    #[test]
    fn test_disagreement_is_reported() {
        let full = analyze_waves(&fixtures::impulse_then_correction(), &WaveConfig::default()).unwrap();
        let mut alt = full.clone();
        alt.waves.truncate(4);
        alt.trend = Trend::Bearish;
        alt.corrective_pattern = false;

        let cmp = compare_results(&full, &alt);
        assert!(!cmp.trend_agrees);
        assert!(!cmp.patterns_agree);
        assert_eq!(cmp.matching_waves, 4);
        assert!((cmp.overlap_ratio() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_parse_opinion_rejects_garbage() {
        assert!(parse_opinion("no json here").is_err());
        assert!(parse_opinion("{ \"trend\": \"sideways\" }").is_err());
    }

    #[test]
    fn test_request_carries_rules() {
        let req = OpinionRequest::new("X", &fixtures::monotonic_ramp(3, 1.0, 1.0));
        assert_eq!(req.bars.len(), 3);
        assert!(req.rules.contains("Wave 2 may not retrace"));
    }
}
