//! Response models for the text analysis API.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

// Gemini echoes whatever the model wrote, including explicit nulls.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The result of a single analyzer run.
///
/// Both analyzers share this shape. The Gemini analyzer additionally fills
/// `semantic_analysis`, `suggestions` and `critical_points`; the NLTK analyzer
/// fills the frequency and sentence-length extras.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// Overall complexity judgment.
    pub complexity_score: ComplexityScore,
    /// Gulpease readability index, 0 to 100.
    pub gulpease: f64,
    /// Type-token ratio.
    pub ttr: f64,
    /// Word and sentence counts.
    pub statistics: Statistics,
    /// AI-derived semantic judgments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_analysis: Option<SemanticAnalysis>,
    /// Suggestions to simplify the text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub suggestions: Vec<String>,
    /// Critical passages found in the text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub critical_points: Vec<String>,
    /// Sentence counts by length class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_complexity: Option<SentenceComplexity>,
    /// Most frequent words with their counts.
    #[serde(default, deserialize_with = "null_as_default")]
    pub most_common_words: Vec<(String, u64)>,
    /// The word filter the backend applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_applied: Option<FilterApplied>,
    /// Which analyzer produced the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Complexity score with its category label and display color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityScore {
    /// Score between 0 and 100
    pub score: f64,
    /// Category label, e.g. "Medio"
    pub category: String,
    /// CSS color chosen by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Counting statistics.
///
/// Counts are kept as JSON numbers: the Gemini analyzer sometimes reports
/// them as floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Number of words
    pub total_words: Number,
    /// Number of sentences
    pub total_sentences: Number,
    /// Average words per sentence
    pub avg_sentence_length: f64,
    /// Number of characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_chars: Option<Number>,
    /// Average characters per word
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_word_length: Option<f64>,
    /// Number of distinct words
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_words: Option<Number>,
}

/// Semantic judgments produced by the Gemini analyzer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticAnalysis {
    /// Bassa, Media or Alta
    #[serde(default)]
    pub conceptual_difficulty: Option<String>,
    /// School level the text targets
    #[serde(default)]
    pub school_level: Option<String>,
    /// Language register
    #[serde(default)]
    pub register: Option<String>,
    /// Short description of the reasoning complexity
    #[serde(default)]
    pub reasoning_complexity: Option<String>,
    /// Technical terms found in the text
    #[serde(default)]
    pub technical_terms: Option<Vec<String>>,
}

/// Sentence counts grouped by length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceComplexity {
    /// Fewer than 10 tokens
    pub short: u64,
    /// 10 to 20 tokens
    pub medium: u64,
    /// More than 20 tokens
    pub long: u64,
}

/// The word-length filter reported back by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterApplied {
    /// Whether the filter was on
    pub enabled: bool,
    /// Minimum word length, when the filter was on
    #[serde(default)]
    pub min_length: Option<u32>,
}

/// The result of `POST /api/compare`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResponse {
    /// NLTK analyzer result
    pub nltk: AnalysisResponse,
    /// Gemini analyzer result
    pub gemini: AnalysisResponse,
    /// Differences between the two, present when both succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub differences: Option<Differences>,
}

/// How far apart the two analyzers landed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Differences {
    /// Absolute Gulpease difference
    pub gulpease_diff: f64,
    /// Absolute complexity score difference
    pub complexity_diff: f64,
    /// Agreement label: Alta, Media or Bassa
    pub agreement: String,
}

/// A failure body: `{"error": ..., "details": ...}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiFailure {
    /// The error message
    pub error: serde_json::Value,
    /// Optional diagnostic details, in whatever shape the backend sent them
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

impl ApiFailure {
    /// The error message as display text.
    pub fn message(&self) -> String {
        match &self.error {
            serde_json::Value::String(message) => message.clone(),
            other => other.to_string(),
        }
    }

    /// The details as display text, if any were sent.
    pub fn details(&self) -> Option<String> {
        match self.details.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(details) => Some(details.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// The result of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    /// "ok" when the service is up
    pub status: String,
    /// Free-form message
    #[serde(default)]
    pub message: String,
}
