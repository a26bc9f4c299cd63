//! Request bodies for the text analysis API.

use serde::Serialize;

use super::AIParameters;

/// Body of `POST /api/compare`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRequest {
    /// The text to analyze, already trimmed
    pub text: String,
    /// Whether short words are excluded from the frequency table
    pub filter_short_words: bool,
    /// Minimum length of a word kept by the filter
    pub min_word_length: u32,
    /// Generation parameters for the Gemini analyzer
    pub ai_config: AIParameters,
}

/// Body of `POST /api/analyze-gemini`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeminiRequest {
    /// The text to analyze, already trimmed
    pub text: String,
    /// Generation parameters for the Gemini analyzer
    pub ai_config: AIParameters,
}

/// Body of `POST /api/analyze`, the NLTK-only analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeRequest {
    /// The text to analyze, already trimmed
    pub text: String,
    /// Whether short words are excluded from the frequency table
    pub filter_short_words: bool,
    /// Minimum length of a word kept by the filter
    pub min_word_length: u32,
}
