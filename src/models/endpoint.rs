use std::fmt;

/// The backend endpoint a request goes to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// NLTK and Gemini side by side.
    Compare,
    /// Gemini analysis only.
    AnalyzeGemini,
    /// NLTK analysis only.
    Analyze,
    /// Backend liveness check.
    Health,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare => write!(f, "/api/compare"),
            Self::AnalyzeGemini => write!(f, "/api/analyze-gemini"),
            Self::Analyze => write!(f, "/api/analyze"),
            Self::Health => write!(f, "/api/health"),
        }
    }
}
