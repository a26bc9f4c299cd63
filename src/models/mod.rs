//! Data structures for the text analysis API requests and responses.

mod endpoint;
mod params;
mod request;
mod response;

pub use endpoint::Endpoint;
pub use params::{
    AIParameters, ParsePresetError, Preset, CANDIDATE_COUNT, DEFAULT_MAX_OUTPUT_TOKENS,
};
pub use request::{AnalyzeRequest, ComparisonRequest, GeminiRequest};
pub use response::{
    AnalysisResponse, ApiFailure, ComparisonResponse, ComplexityScore, Differences,
    FilterApplied, HealthStatus, SemanticAnalysis, SentenceComplexity, Statistics,
};
