//! Terminal implementation of [`View`].

use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    panel::ParameterPanel,
    render::{
        AgreementLevel, AnalysisView, Band, ComparisonView, ScoreBar, SummaryView,
        NO_CRITICAL_POINTS, NO_SUGGESTIONS, NO_TECHNICAL_TERMS,
    },
    view::View,
};

const BAR_WIDTH: usize = 30;

/// Paints results on stdout and notifications on stderr.
#[derive(Debug)]
pub struct TerminalView {
    spinner: Option<ProgressBar>,
    trigger_enabled: bool,
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalView {
    /// Creates a view with the trigger enabled and nothing shown.
    pub fn new() -> Self {
        Self {
            spinner: None,
            trigger_enabled: true,
        }
    }

    /// Whether a new analysis may be started.
    pub fn trigger_enabled(&self) -> bool {
        self.trigger_enabled
    }

    fn start_spinner() -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} {msg}")
        {
            pb.set_style(style);
        }
        pb.set_message("Analisi in corso...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

impl View for TerminalView {
    fn set_loading(&mut self, visible: bool) {
        match (visible, self.spinner.take()) {
            (true, None) => self.spinner = Some(Self::start_spinner()),
            (true, Some(spinner)) => self.spinner = Some(spinner),
            (false, Some(spinner)) => spinner.finish_and_clear(),
            (false, None) => {}
        }
    }

    fn set_trigger_enabled(&mut self, enabled: bool) {
        self.trigger_enabled = enabled;
    }

    fn hide_results(&mut self) {}

    fn notify(&mut self, message: &str) {
        eprintln!("{} {}", "❌".red(), message.red().bold());
    }

    fn show_analysis(&mut self, view: &AnalysisView) {
        println!("\n{}", "📝 Risultati dell'analisi".bright_blue().bold());
        print_analysis(view);
    }

    fn show_comparison(&mut self, view: &ComparisonView) {
        if let Some(summary) = &view.summary {
            print_summary(summary);
        }

        println!("\n{}", "📚 NLTK".bright_blue().bold());
        println!("{}", "━".repeat(50).bright_black());
        print_scores(&view.nltk);
        print_statistics(&view.nltk);
        print_extras(&view.nltk);

        println!("\n{}", "🤖 Gemini".bright_magenta().bold());
        println!("{}", "━".repeat(50).bright_black());
        print_scores(&view.gemini);
        print_semantic(&view.gemini, false);
        print_list("💡 Suggerimenti", &view.gemini.suggestions, NO_SUGGESTIONS);
    }
}

fn truecolor(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn paint(text: &str, hex: Option<&str>) -> ColoredString {
    match hex.and_then(truecolor) {
        Some((r, g, b)) => text.truecolor(r, g, b).bold(),
        None => text.bold(),
    }
}

fn bar(score: &ScoreBar) -> String {
    let filled = ((score.width_percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!(
        "{}{}",
        paint(&"█".repeat(filled), Some(score.band.hex())),
        "░".repeat(BAR_WIDTH - filled).bright_black()
    )
}

fn print_summary(summary: &SummaryView) {
    let badge = match summary.level {
        AgreementLevel::High => summary.agreement.green().bold(),
        AgreementLevel::Medium => summary.agreement.yellow().bold(),
        AgreementLevel::Low => summary.agreement.red().bold(),
    };

    println!("\n{}", "⚖️  Confronto NLTK vs Gemini".bright_green().bold());
    println!("{} {}", "Differenza Gulpease:".green(), summary.gulpease_diff);
    println!("{} {}", "Differenza complessità:".green(), summary.complexity_diff);
    println!("{} {}", "Accordo:".green(), badge);
}

fn print_scores(view: &AnalysisView) {
    println!(
        "{} {} {}",
        "Complessità:".yellow(),
        paint(&view.complexity_score, view.complexity_color.as_deref()),
        format!("({})", view.complexity_category).bright_black()
    );
    println!(
        "{} {} {}",
        "Gulpease:".yellow(),
        view.gulpease.value,
        bar(&view.gulpease)
    );
    println!("{} {}", "TTR:".yellow(), view.ttr);
}

fn print_statistics(view: &AnalysisView) {
    println!("\n{}", "📊 Statistiche".green().bold());
    println!("{} {}", "Parole:".bright_green(), view.total_words);
    println!("{} {}", "Frasi:".bright_green(), view.total_sentences);
    println!(
        "{} {}",
        "Lunghezza media frase:".bright_green(),
        view.avg_sentence_length
    );
}

fn print_semantic(view: &AnalysisView, with_terms: bool) {
    println!("\n{}", "🧠 Analisi semantica".cyan().bold());
    println!(
        "{} {}",
        "Difficoltà concettuale:".bright_cyan(),
        view.conceptual_difficulty
    );
    println!("{} {}", "Livello scolastico:".bright_cyan(), view.school_level);
    println!("{} {}", "Registro:".bright_cyan(), view.register);
    if with_terms {
        println!(
            "{} {}",
            "Complessità del ragionamento:".bright_cyan(),
            view.reasoning_complexity
        );
        print_list("🔬 Termini tecnici", &view.technical_terms, NO_TECHNICAL_TERMS);
    }
}

fn print_extras(view: &AnalysisView) {
    if let Some([short, medium, long]) = view.sentence_classes {
        println!(
            "{} {} brevi, {} medie, {} lunghe",
            "Frasi per lunghezza:".bright_green(),
            short,
            medium,
            long
        );
    }
    if !view.most_common_words.is_empty() {
        println!(
            "{} {}",
            "Parole più frequenti:".bright_green(),
            view.most_common_words.join(", ")
        );
    }
    if let Some(filter) = &view.filter {
        println!("{} {}", "Filtro:".bright_green(), filter.bright_black());
    }
}

fn print_list(title: &str, items: &[String], placeholder: &str) {
    println!("\n{}", title.bold());
    for item in items {
        if item == placeholder {
            println!("  {}", item.bright_black().italic());
        } else {
            println!("  • {}", item);
        }
    }
}

fn print_analysis(view: &AnalysisView) {
    print_scores(view);
    print_statistics(view);
    print_extras(view);
    if view.show_semantic {
        print_semantic(view, true);
    }
    print_list("💡 Suggerimenti", &view.suggestions, NO_SUGGESTIONS);
    print_list("⚠️  Punti critici", &view.critical_points, NO_CRITICAL_POINTS);
}

/// Prints the panel's current slider values.
pub fn print_panel(panel: &ParameterPanel) {
    let preset = panel
        .preset()
        .map(|preset| format!("{}: {}", preset, preset.description()))
        .unwrap_or_else(|| "personalizzato".to_string());

    println!("{} {}", "Preset:".blue().bold(), preset);
    println!(
        "  {} {}  {} {}  {} {}",
        "temperature".blue(),
        panel.temperature_display(),
        "top_p".blue(),
        panel.top_p_display(),
        "top_k".blue(),
        panel.top_k_display()
    );
    if let Some(max_tokens) = panel.max_output_tokens_display() {
        println!("  {} {}", "max_output_tokens".blue(), max_tokens);
    }
    let (filter, _) = panel.filter_settings();
    if filter {
        println!(
            "  {} {}",
            "lunghezza minima parole".blue(),
            panel.min_word_length_display()
        );
    } else {
        println!("  {}", "filtro parole brevi disattivato".bright_black());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse() {
        assert_eq!(truecolor("#22c55e"), Some((0x22, 0xc5, 0x5e)));
        assert_eq!(truecolor(Band::Red.hex()), Some((0xef, 0x44, 0x44)));
        assert_eq!(truecolor("red"), None);
        assert_eq!(truecolor("#fff"), None);
    }

    #[test]
    fn loading_toggles_the_spinner() {
        let mut view = TerminalView::new();
        view.set_loading(true);
        assert!(view.spinner.is_some());
        view.set_loading(false);
        assert!(view.spinner.is_none());
    }

    #[test]
    fn trigger_state_is_tracked() {
        let mut view = TerminalView::new();
        assert!(view.trigger_enabled());
        view.set_trigger_enabled(false);
        assert!(!view.trigger_enabled());
    }
}
