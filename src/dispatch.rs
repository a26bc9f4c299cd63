//! The request dispatcher: one analysis per user action.

use std::{
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
};

use tracing::{error, info, warn};

use crate::{
    client::AnalysisBackend,
    error::AnalysisError,
    models::{AnalyzeRequest, ComparisonRequest, Endpoint, GeminiRequest},
    panel::ParameterPanel,
    render,
    view::View,
};

/// Notification shown when the text box is empty.
pub const EMPTY_TEXT_MESSAGE: &str = "Inserisci del testo da analizzare";
/// Notification shown for transport or decoding failures.
pub const GENERIC_ERROR_MESSAGE: &str = "Errore durante l'analisi";

/// Sample paragraph loaded by the "example" action.
pub const EXAMPLE_TEXT: &str = "L'intelligenza artificiale rappresenta una delle più significative rivoluzioni tecnologiche del ventunesimo secolo. I sistemi di machine learning, attraverso algoritmi sempre più sofisticati, sono in grado di apprendere da grandi quantità di dati e di migliorare autonomamente le proprie prestazioni. Questa capacità trova applicazione in numerosi settori, dalla medicina alla finanza, dall'automotive all'intrattenimento. Tuttavia, l'implementazione di tali tecnologie solleva importanti questioni etiche relative alla privacy, alla trasparenza degli algoritmi e alle potenziali implicazioni occupazionali.";

/// Where the dispatcher stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Ready for a submission.
    Idle,
    /// A request is in flight.
    Loading,
}

/// How a dispatched analysis ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The response was painted.
    Rendered,
    /// The user was notified with this message instead.
    ErrorShown(String),
}

/// Drives a [`View`] through one request/render cycle per submission.
///
/// Only one submission may be in flight; a second one is rejected with
/// [`AnalysisError::Busy`] before it touches the view or the backend.
#[derive(Debug)]
pub struct Dispatcher<B, V> {
    backend: B,
    view: Mutex<V>,
    in_flight: AtomicBool,
}

/// Restores the idle UI state when dropped, whatever the exit path.
struct InFlight<'a, V: View> {
    view: &'a Mutex<V>,
    in_flight: &'a AtomicBool,
}

impl<V: View> Drop for InFlight<'_, V> {
    fn drop(&mut self) {
        {
            let mut view = lock(self.view);
            view.set_loading(false);
            view.set_trigger_enabled(true);
        }
        self.in_flight.store(false, Ordering::Release);
    }
}

fn lock<V>(view: &Mutex<V>) -> MutexGuard<'_, V> {
    view.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<B: AnalysisBackend, V: View> Dispatcher<B, V> {
    /// Creates an idle dispatcher.
    pub fn new(backend: B, view: V) -> Self {
        Self {
            backend,
            view: Mutex::new(view),
            in_flight: AtomicBool::new(false),
        }
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        if self.in_flight.load(Ordering::Acquire) {
            Phase::Loading
        } else {
            Phase::Idle
        }
    }

    /// Runs `f` with exclusive access to the view.
    pub fn with_view<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        f(&mut lock(&self.view))
    }

    /// Gives back the backend and the view.
    pub fn into_parts(self) -> (B, V) {
        let view = self.view.into_inner().unwrap_or_else(PoisonError::into_inner);
        (self.backend, view)
    }

    /// Hides any rendered results.
    pub fn clear(&self) {
        lock(&self.view).hide_results();
    }

    /// Compares the NLTK and Gemini analyzers on `text`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::EmptyText`] or [`AnalysisError::Busy`] when
    /// the submission is rejected. Backend failures are reported to the view
    /// and come back as [`Outcome::ErrorShown`].
    pub async fn compare(
        &self,
        text: &str,
        panel: &ParameterPanel,
    ) -> Result<Outcome, AnalysisError> {
        let text = self.accept(text)?;
        let (filter_short_words, min_word_length) = panel.filter_settings();
        let request = ComparisonRequest {
            text,
            filter_short_words,
            min_word_length,
            ai_config: panel.current_parameters(),
        };

        self.run(Endpoint::Compare, self.backend.compare(&request), |view, response| {
            view.show_comparison(&render::comparison(response))
        })
        .await
    }

    /// Analyzes `text` with the Gemini analyzer alone.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::compare`].
    pub async fn analyze_gemini(
        &self,
        text: &str,
        panel: &ParameterPanel,
    ) -> Result<Outcome, AnalysisError> {
        let text = self.accept(text)?;
        let request = GeminiRequest {
            text,
            ai_config: panel.current_parameters().without_max_output_tokens(),
        };

        self.run(
            Endpoint::AnalyzeGemini,
            self.backend.analyze_gemini(&request),
            |view, response| view.show_analysis(&render::analysis(response)),
        )
        .await
    }

    /// Analyzes `text` with the NLTK analyzer alone.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::compare`].
    pub async fn analyze(
        &self,
        text: &str,
        panel: &ParameterPanel,
    ) -> Result<Outcome, AnalysisError> {
        let text = self.accept(text)?;
        let (filter_short_words, min_word_length) = panel.filter_settings();
        let request = AnalyzeRequest {
            text,
            filter_short_words,
            min_word_length,
        };

        self.run(Endpoint::Analyze, self.backend.analyze(&request), |view, response| {
            view.show_analysis(&render::analysis(response))
        })
        .await
    }

    /// Trims the input and rejects empty text before anything else happens.
    fn accept(&self, text: &str) -> Result<String, AnalysisError> {
        let text = text.trim();
        if text.is_empty() {
            lock(&self.view).notify(EMPTY_TEXT_MESSAGE);
            return Err(AnalysisError::EmptyText);
        }
        Ok(text.to_string())
    }

    /// Takes the in-flight slot, awaits `call` and paints or reports the result.
    ///
    /// `call` is not polled until the slot is taken, so a rejected submission
    /// never reaches the backend.
    async fn run<T>(
        &self,
        endpoint: Endpoint,
        call: impl Future<Output = Result<T, AnalysisError>>,
        paint: impl FnOnce(&mut V, &T),
    ) -> Result<Outcome, AnalysisError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(%endpoint, "submission rejected, another analysis is in flight");
            return Err(AnalysisError::Busy);
        }
        let _guard = InFlight {
            view: &self.view,
            in_flight: &self.in_flight,
        };

        {
            let mut view = lock(&self.view);
            view.set_loading(true);
            view.hide_results();
            view.set_trigger_enabled(false);
        }

        let outcome = match call.await {
            Ok(response) => {
                paint(&mut lock(&self.view), &response);
                info!(%endpoint, "analysis rendered");
                Outcome::Rendered
            }
            Err(AnalysisError::Api { message, details }) => {
                warn!(%endpoint, %message, ?details, "backend reported an error");
                let message = format!("Errore: {message}");
                lock(&self.view).notify(&message);
                Outcome::ErrorShown(message)
            }
            Err(err) => {
                error!(%endpoint, error = %err, "analysis request failed");
                lock(&self.view).notify(GENERIC_ERROR_MESSAGE);
                Outcome::ErrorShown(GENERIC_ERROR_MESSAGE.to_string())
            }
        };

        Ok(outcome)
    }
}
