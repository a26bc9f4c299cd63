use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use typed_builder::TypedBuilder;

/// Output token ceiling shared by every preset.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;
/// Number of candidates requested from the model; never configurable.
pub const CANDIDATE_COUNT: u32 = 1;

/// Generation parameters forwarded to the Gemini analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct AIParameters {
    /// Sampling temperature, at least 0
    #[builder(default = 0.7)]
    pub temperature: f64,
    /// Nucleus sampling threshold in `0..=1`
    #[builder(default = 0.95)]
    pub top_p: f64,
    /// Top-k sampling size, at least 1
    #[builder(default = 40)]
    pub top_k: u32,
    /// Output token limit, only sent by the comparison flow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    pub max_output_tokens: Option<u32>,
    /// Candidate count, always 1
    #[builder(default = CANDIDATE_COUNT)]
    pub candidate_count: u32,
}

impl AIParameters {
    /// Checks the ranges the backend expects.
    pub fn is_valid(&self) -> bool {
        self.temperature >= 0.0
            && (0.0..=1.0).contains(&self.top_p)
            && self.top_k >= 1
            && self.candidate_count == CANDIDATE_COUNT
    }

    /// Drops the output token limit, as the single-analysis flow does.
    pub fn without_max_output_tokens(mut self) -> Self {
        self.max_output_tokens = None;
        self
    }
}

impl Default for AIParameters {
    fn default() -> Self {
        Preset::Balanced.parameters()
    }
}

/// A named bundle of generation parameters applied atomically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Reproducible, consistent output
    Deterministic,
    /// Balance between creativity and coherence
    #[default]
    Balanced,
    /// Maximum variety
    Creative,
}

impl Preset {
    /// Every preset, in selector order.
    pub const ALL: [Preset; 3] = [Preset::Deterministic, Preset::Balanced, Preset::Creative];

    /// The lowercase name used on the wire and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Deterministic => "deterministic",
            Self::Balanced => "balanced",
            Self::Creative => "creative",
        }
    }

    /// Human readable description shown next to the selector.
    pub fn description(self) -> &'static str {
        match self {
            Self::Deterministic => "Risultati riproducibili e consistenti",
            Self::Balanced => "Bilanciamento tra creatività e coerenza",
            Self::Creative => "Massima varietà nelle risposte",
        }
    }

    /// The canonical parameter tuple, including the output token limit.
    pub fn parameters(self) -> AIParameters {
        let (temperature, top_p, top_k) = match self {
            Self::Deterministic => (0.0, 0.95, 1),
            Self::Balanced => (0.7, 0.95, 40),
            Self::Creative => (1.0, 1.0, 64),
        };

        AIParameters::builder()
            .temperature(temperature)
            .top_p(top_p)
            .top_k(top_k)
            .max_output_tokens(DEFAULT_MAX_OUTPUT_TOKENS)
            .build()
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a preset name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown preset `{0}` (expected deterministic, balanced or creative)")]
pub struct ParsePresetError(String);

impl FromStr for Preset {
    type Err = ParsePresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParsePresetError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn presets_carry_their_literal_values() {
        let deterministic = Preset::Deterministic.parameters();
        assert_eq!(deterministic.temperature, 0.0);
        assert_eq!(deterministic.top_p, 0.95);
        assert_eq!(deterministic.top_k, 1);

        let creative = Preset::Creative.parameters();
        assert_eq!(creative.temperature, 1.0);
        assert_eq!(creative.top_p, 1.0);
        assert_eq!(creative.top_k, 64);

        for preset in Preset::ALL {
            let params = preset.parameters();
            assert_eq!(params.max_output_tokens, Some(DEFAULT_MAX_OUTPUT_TOKENS));
            assert_eq!(params.candidate_count, 1);
            assert!(params.is_valid());
        }
    }

    #[test]
    fn max_output_tokens_is_omitted_when_absent() {
        let params = Preset::Balanced.parameters().without_max_output_tokens();
        assert_eq!(
            serde_json::to_value(params).unwrap(),
            json!({"temperature": 0.7, "top_p": 0.95, "top_k": 40, "candidate_count": 1})
        );
    }

    #[test]
    fn invalid_ranges_are_detected() {
        let params = AIParameters::builder().top_p(1.5).build();
        assert!(!params.is_valid());
        let params = AIParameters::builder().top_k(0).build();
        assert!(!params.is_valid());
        let params = AIParameters::builder().temperature(-0.1).build();
        assert!(!params.is_valid());
    }

    #[test]
    fn presets_parse_from_their_names() {
        assert_eq!("creative".parse::<Preset>(), Ok(Preset::Creative));
        assert_eq!(" Balanced ".parse::<Preset>(), Ok(Preset::Balanced));
        assert!("wild".parse::<Preset>().is_err());
        assert_eq!(Preset::default(), Preset::Balanced);
        assert_eq!(Preset::Deterministic.to_string(), "deterministic");
    }
}
