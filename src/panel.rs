//! The parameter panel view-model shared by both analysis flows.

use std::ops::RangeInclusive;

use tracing::debug;

use crate::{
    config::Config,
    models::{AIParameters, Preset, CANDIDATE_COUNT, DEFAULT_MAX_OUTPUT_TOKENS},
};

/// Temperature slider range.
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 0.0..=2.0;
/// Top-p slider range.
pub const TOP_P_RANGE: RangeInclusive<f64> = 0.0..=1.0;
/// Top-k slider range.
pub const TOP_K_RANGE: RangeInclusive<u32> = 1..=100;
/// Max output tokens slider range.
pub const MAX_TOKENS_RANGE: RangeInclusive<u32> = 256..=8192;
/// Minimum word length slider range.
pub const MIN_WORD_LENGTH_RANGE: RangeInclusive<u32> = 2..=10;

/// Which flow the panel belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelVariant {
    /// NLTK vs Gemini comparison; exposes the max output tokens slider.
    Comparison,
    /// Single analysis; the backend fixes the output token limit.
    SingleAnalysis,
}

/// Slider state for the generation parameters and the word filter.
///
/// All fields are private: presets and the explicit setters are the only
/// way to change them, and the setters clamp to the slider ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterPanel {
    variant: PanelVariant,
    preset: Option<Preset>,
    temperature: f64,
    top_p: f64,
    top_k: u32,
    max_output_tokens: u32,
    filter_short_words: bool,
    min_word_length: u32,
}

impl ParameterPanel {
    /// Creates a panel on the `balanced` preset with the word filter on.
    pub fn new(variant: PanelVariant) -> Self {
        let mut panel = Self {
            variant,
            preset: None,
            temperature: 0.0,
            top_p: 0.0,
            top_k: 1,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            filter_short_words: true,
            min_word_length: crate::config::DEFAULT_MIN_WORD_LENGTH,
        };
        panel.apply_preset(Preset::Balanced);
        panel
    }

    /// Creates a panel initialised from the configured preset and filter.
    pub fn from_config(variant: PanelVariant, config: &Config) -> Self {
        let mut panel = Self::new(variant);
        panel.apply_preset(config.preset);
        panel.set_filter_short_words(config.filter_short_words);
        panel.set_min_word_length(config.min_word_length);
        panel
    }

    /// The flow this panel belongs to.
    pub fn variant(&self) -> PanelVariant {
        self.variant
    }

    /// The selected preset; `None` once a slider was moved by hand.
    pub fn preset(&self) -> Option<Preset> {
        self.preset
    }

    /// Overwrites every slider with the preset's values.
    pub fn apply_preset(&mut self, preset: Preset) {
        let params = preset.parameters();
        self.temperature = params.temperature;
        self.top_p = params.top_p;
        self.top_k = params.top_k;
        self.max_output_tokens = params.max_output_tokens.unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS);
        self.preset = Some(preset);
        debug!(%preset, "applied preset");
    }

    /// Re-selects `balanced` and applies it.
    pub fn reset(&mut self) {
        self.apply_preset(Preset::Balanced);
    }

    /// Snapshot of the current generation parameters.
    pub fn current_parameters(&self) -> AIParameters {
        AIParameters {
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            max_output_tokens: match self.variant {
                PanelVariant::Comparison => Some(self.max_output_tokens),
                PanelVariant::SingleAnalysis => None,
            },
            candidate_count: CANDIDATE_COUNT,
        }
    }

    /// `(filter_short_words, min_word_length)`.
    pub fn filter_settings(&self) -> (bool, u32) {
        (self.filter_short_words, self.min_word_length)
    }

    /// Moves the temperature slider.
    pub fn set_temperature(&mut self, value: f64) {
        self.temperature = clamp_f64(value, &TEMPERATURE_RANGE);
        self.preset = None;
    }

    /// Moves the top-p slider.
    pub fn set_top_p(&mut self, value: f64) {
        self.top_p = clamp_f64(value, &TOP_P_RANGE);
        self.preset = None;
    }

    /// Moves the top-k slider.
    pub fn set_top_k(&mut self, value: u32) {
        self.top_k = value.clamp(*TOP_K_RANGE.start(), *TOP_K_RANGE.end());
        self.preset = None;
    }

    /// Moves the max output tokens slider. Ignored by the single-analysis
    /// variant, which has no such slider.
    pub fn set_max_output_tokens(&mut self, value: u32) {
        if self.variant == PanelVariant::Comparison {
            self.max_output_tokens = value.clamp(*MAX_TOKENS_RANGE.start(), *MAX_TOKENS_RANGE.end());
            self.preset = None;
        }
    }

    /// Toggles the short-word filter.
    pub fn set_filter_short_words(&mut self, enabled: bool) {
        self.filter_short_words = enabled;
    }

    /// Moves the minimum word length slider.
    pub fn set_min_word_length(&mut self, value: u32) {
        self.min_word_length =
            value.clamp(*MIN_WORD_LENGTH_RANGE.start(), *MIN_WORD_LENGTH_RANGE.end());
    }

    /// Temperature as displayed next to its slider.
    pub fn temperature_display(&self) -> String {
        format!("{:.1}", self.temperature)
    }

    /// Top-p as displayed next to its slider.
    pub fn top_p_display(&self) -> String {
        format!("{:.2}", self.top_p)
    }

    /// Top-k as displayed next to its slider.
    pub fn top_k_display(&self) -> String {
        self.top_k.to_string()
    }

    /// Max output tokens as displayed, when the variant shows them.
    pub fn max_output_tokens_display(&self) -> Option<String> {
        match self.variant {
            PanelVariant::Comparison => Some(self.max_output_tokens.to_string()),
            PanelVariant::SingleAnalysis => None,
        }
    }

    /// Minimum word length as displayed next to its slider.
    pub fn min_word_length_display(&self) -> String {
        self.min_word_length.to_string()
    }
}

fn clamp_f64(value: f64, range: &RangeInclusive<f64>) -> f64 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applying_a_preset_sets_every_slider() {
        for variant in [PanelVariant::Comparison, PanelVariant::SingleAnalysis] {
            let mut panel = ParameterPanel::new(variant);
            for preset in Preset::ALL {
                panel.set_temperature(1.9);
                panel.set_top_k(99);
                panel.apply_preset(preset);

                let expected = match variant {
                    PanelVariant::Comparison => preset.parameters(),
                    PanelVariant::SingleAnalysis => preset.parameters().without_max_output_tokens(),
                };
                assert_eq!(panel.current_parameters(), expected);
                assert_eq!(panel.preset(), Some(preset));
            }
        }
    }

    #[test]
    fn applying_twice_changes_nothing() {
        let mut panel = ParameterPanel::new(PanelVariant::Comparison);
        panel.apply_preset(Preset::Creative);
        let once = panel.clone();
        panel.apply_preset(Preset::Creative);
        assert_eq!(panel, once);
    }

    #[test]
    fn reset_returns_to_balanced() {
        let mut panel = ParameterPanel::new(PanelVariant::SingleAnalysis);
        panel.apply_preset(Preset::Deterministic);
        panel.set_top_p(0.5);
        assert_eq!(panel.preset(), None);

        panel.reset();
        assert_eq!(panel.preset(), Some(Preset::Balanced));
        assert_eq!(panel.temperature_display(), "0.7");
        assert_eq!(panel.top_p_display(), "0.95");
        assert_eq!(panel.top_k_display(), "40");
    }

    #[test]
    fn displays_follow_slider_values() {
        let mut panel = ParameterPanel::new(PanelVariant::Comparison);
        panel.apply_preset(Preset::Creative);
        assert_eq!(panel.temperature_display(), "1.0");
        assert_eq!(panel.top_p_display(), "1.00");
        assert_eq!(panel.top_k_display(), "64");
        assert_eq!(panel.max_output_tokens_display().as_deref(), Some("8192"));

        let single = ParameterPanel::new(PanelVariant::SingleAnalysis);
        assert_eq!(single.max_output_tokens_display(), None);
        assert_eq!(single.min_word_length_display(), "4");
    }

    #[test]
    fn setters_clamp_to_slider_ranges() {
        let mut panel = ParameterPanel::new(PanelVariant::Comparison);
        panel.set_temperature(5.0);
        panel.set_top_p(-1.0);
        panel.set_top_k(0);
        panel.set_max_output_tokens(100_000);
        panel.set_min_word_length(1);

        let params = panel.current_parameters();
        assert_eq!(params.temperature, 2.0);
        assert_eq!(params.top_p, 0.0);
        assert_eq!(params.top_k, 1);
        assert_eq!(params.max_output_tokens, Some(8192));
        assert_eq!(panel.filter_settings(), (true, 2));
        assert!(params.is_valid());
    }

    #[test]
    fn single_analysis_ignores_max_tokens() {
        let mut panel = ParameterPanel::new(PanelVariant::SingleAnalysis);
        panel.set_max_output_tokens(512);
        assert_eq!(panel.current_parameters().max_output_tokens, None);
        assert_eq!(panel.preset(), Some(Preset::Balanced));
    }

    #[test]
    fn config_seeds_the_panel() {
        let config = Config {
            preset: Preset::Deterministic,
            min_word_length: 6,
            filter_short_words: false,
            ..Config::default()
        };
        let panel = ParameterPanel::from_config(PanelVariant::Comparison, &config);
        assert_eq!(panel.preset(), Some(Preset::Deterministic));
        assert_eq!(panel.filter_settings(), (false, 6));
    }
}
