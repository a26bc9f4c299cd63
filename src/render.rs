//! Pure mapping from analysis responses to display-ready views.
//!
//! Nothing here performs I/O: a [`View`](crate::view::View) implementation
//! decides how the resulting structures are painted.

use crate::models::{AnalysisResponse, ComparisonResponse, Differences};

/// `source` tag the backend puts on Gemini results.
pub const GEMINI_SOURCE: &str = "gemini";
/// Shown for a semantic field the analyzer did not return.
pub const MISSING_VALUE: &str = "-";
/// Shown when no technical terms were returned.
pub const NO_TECHNICAL_TERMS: &str = "Nessun termine tecnico rilevato";
/// Shown when no suggestions were returned.
pub const NO_SUGGESTIONS: &str = "Nessun suggerimento disponibile";
/// Shown when no critical points were returned.
pub const NO_CRITICAL_POINTS: &str = "Nessun punto critico rilevato";

/// Color band of a readability score bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// Above 80
    Green,
    /// Above 60
    YellowGreen,
    /// Above 40
    Amber,
    /// 40 or below
    Red,
}

impl Band {
    /// Picks the band for a 0-100 readability score. Thresholds are exclusive.
    pub fn for_score(score: f64) -> Self {
        if score > 80.0 {
            Self::Green
        } else if score > 60.0 {
            Self::YellowGreen
        } else if score > 40.0 {
            Self::Amber
        } else {
            Self::Red
        }
    }

    /// The fill color as a CSS hex string.
    pub fn hex(self) -> &'static str {
        match self {
            Self::Green => "#22c55e",
            Self::YellowGreen => "#84cc16",
            Self::Amber => "#eab308",
            Self::Red => "#ef4444",
        }
    }
}

/// Style of the agreement badge in the comparison summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgreementLevel {
    /// Label `Alta`
    High,
    /// Label `Media`
    Medium,
    /// Anything else
    Low,
}

impl AgreementLevel {
    /// Exact match on the backend label; unknown labels are `Low`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Alta" => Self::High,
            "Media" => Self::Medium,
            _ => Self::Low,
        }
    }
}

/// A filled horizontal bar with its printed value.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBar {
    /// Printed value, one decimal
    pub value: String,
    /// Fill width in percent, clamped to `0..=100`
    pub width_percent: f64,
    /// Fill color
    pub band: Band,
}

impl ScoreBar {
    /// Builds the bar for a Gulpease score.
    pub fn gulpease(score: f64) -> Self {
        Self {
            value: format!("{score:.1}"),
            width_percent: score.clamp(0.0, 100.0),
            band: Band::for_score(score),
        }
    }
}

/// Everything displayed for one analyzer result.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisView {
    /// Complexity score, one decimal
    pub complexity_score: String,
    /// Complexity category label
    pub complexity_category: String,
    /// Backend-chosen color of the complexity score
    pub complexity_color: Option<String>,
    /// Gulpease bar
    pub gulpease: ScoreBar,
    /// Type-token ratio, three decimals
    pub ttr: String,
    /// Word count
    pub total_words: String,
    /// Sentence count
    pub total_sentences: String,
    /// Average sentence length, one decimal
    pub avg_sentence_length: String,
    /// Whether the semantic block is shown: the analyzer returned one, or
    /// the result comes from Gemini and the missing fields show placeholders
    pub show_semantic: bool,
    /// Conceptual difficulty or [`MISSING_VALUE`]
    pub conceptual_difficulty: String,
    /// School level or [`MISSING_VALUE`]
    pub school_level: String,
    /// Register or [`MISSING_VALUE`]
    pub register: String,
    /// Reasoning complexity or [`MISSING_VALUE`]
    pub reasoning_complexity: String,
    /// Technical terms, or the single [`NO_TECHNICAL_TERMS`] placeholder
    pub technical_terms: Vec<String>,
    /// Suggestions, or the single [`NO_SUGGESTIONS`] placeholder
    pub suggestions: Vec<String>,
    /// Critical points, or the single [`NO_CRITICAL_POINTS`] placeholder
    pub critical_points: Vec<String>,
    /// Short/medium/long sentence counts, when reported
    pub sentence_classes: Option<[u64; 3]>,
    /// `word (count)` entries, when reported
    pub most_common_words: Vec<String>,
    /// Description of the word filter, when reported
    pub filter: Option<String>,
}

/// The comparison summary block.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    /// Gulpease difference, one decimal
    pub gulpease_diff: String,
    /// Complexity difference, one decimal
    pub complexity_diff: String,
    /// Agreement label as sent by the backend
    pub agreement: String,
    /// Badge style
    pub level: AgreementLevel,
}

/// Everything displayed for a comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonView {
    /// Summary, hidden when the backend sent no differences
    pub summary: Option<SummaryView>,
    /// NLTK column
    pub nltk: AnalysisView,
    /// Gemini column
    pub gemini: AnalysisView,
}

fn or_missing(value: Option<&String>) -> String {
    value
        .filter(|value| !value.is_empty())
        .cloned()
        .unwrap_or_else(|| MISSING_VALUE.to_string())
}

fn or_placeholder(items: &[String], placeholder: &str) -> Vec<String> {
    if items.is_empty() {
        vec![placeholder.to_string()]
    } else {
        items.to_vec()
    }
}

/// Renders one analyzer result.
pub fn analysis(response: &AnalysisResponse) -> AnalysisView {
    let semantic = response.semantic_analysis.as_ref();
    let technical_terms = semantic
        .and_then(|semantic| semantic.technical_terms.as_deref())
        .unwrap_or_default();

    AnalysisView {
        complexity_score: format!("{:.1}", response.complexity_score.score),
        complexity_category: response.complexity_score.category.clone(),
        complexity_color: response.complexity_score.color.clone(),
        gulpease: ScoreBar::gulpease(response.gulpease),
        ttr: format!("{:.3}", response.ttr),
        total_words: response.statistics.total_words.to_string(),
        total_sentences: response.statistics.total_sentences.to_string(),
        avg_sentence_length: format!("{:.1}", response.statistics.avg_sentence_length),
        show_semantic: semantic.is_some()
            || response.source.as_deref() == Some(GEMINI_SOURCE),
        conceptual_difficulty: or_missing(semantic.and_then(|s| s.conceptual_difficulty.as_ref())),
        school_level: or_missing(semantic.and_then(|s| s.school_level.as_ref())),
        register: or_missing(semantic.and_then(|s| s.register.as_ref())),
        reasoning_complexity: or_missing(semantic.and_then(|s| s.reasoning_complexity.as_ref())),
        technical_terms: or_placeholder(technical_terms, NO_TECHNICAL_TERMS),
        suggestions: or_placeholder(&response.suggestions, NO_SUGGESTIONS),
        critical_points: or_placeholder(&response.critical_points, NO_CRITICAL_POINTS),
        sentence_classes: response
            .sentence_complexity
            .map(|classes| [classes.short, classes.medium, classes.long]),
        most_common_words: response
            .most_common_words
            .iter()
            .map(|(word, count)| format!("{word} ({count})"))
            .collect(),
        filter: response.filter_applied.map(|filter| match filter.min_length {
            Some(min) if filter.enabled => format!("parole di almeno {min} lettere"),
            _ if filter.enabled => "attivo".to_string(),
            _ => "disattivato".to_string(),
        }),
    }
}

/// Renders the comparison summary.
pub fn summary(differences: &Differences) -> SummaryView {
    SummaryView {
        gulpease_diff: format!("{:.1}", differences.gulpease_diff),
        complexity_diff: format!("{:.1}", differences.complexity_diff),
        agreement: differences.agreement.clone(),
        level: AgreementLevel::from_label(&differences.agreement),
    }
}

/// Renders a comparison: summary plus one column per analyzer.
pub fn comparison(response: &ComparisonResponse) -> ComparisonView {
    ComparisonView {
        summary: response.differences.as_ref().map(summary),
        nltk: analysis(&response.nltk),
        gemini: analysis(&response.gemini),
    }
}
