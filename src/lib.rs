#![deny(missing_docs)]

//! A Rust client and terminal front end for the NLTK/Gemini text analysis API.
//!
//! The crate reads text and generation parameters, sends them to the analysis
//! backend and renders readability scores, lexical diversity and the
//! AI-derived semantic judgments it gets back.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod panel;
pub mod render;
pub mod terminal;
pub mod view;

pub use client::{AnalysisBackend, AnalysisClient};
pub use dispatch::{Dispatcher, Outcome, Phase};
pub use panel::{PanelVariant, ParameterPanel};
pub use view::View;
