//! The display surface driven by the dispatcher.

use crate::render::{AnalysisView, ComparisonView};

/// A surface the dispatcher paints on.
///
/// Implementations own all presentation concerns; the dispatcher only
/// decides *when* each call happens.
pub trait View {
    /// Shows or hides the loading indicator.
    fn set_loading(&mut self, visible: bool);

    /// Enables or disables the control that starts an analysis.
    fn set_trigger_enabled(&mut self, enabled: bool);

    /// Hides previously rendered results, including the comparison summary.
    fn hide_results(&mut self);

    /// Shows a blocking notification to the user.
    fn notify(&mut self, message: &str);

    /// Paints a single analyzer result.
    fn show_analysis(&mut self, view: &AnalysisView);

    /// Paints a comparison.
    fn show_comparison(&mut self, view: &ComparisonView);
}
