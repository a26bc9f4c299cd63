use std::{
    io::Read,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use dialoguer::{Input, Select};
use text_analyzer_client::{
    config::Config,
    dispatch::EXAMPLE_TEXT,
    error::AnalysisError,
    models::Preset,
    terminal::{print_panel, TerminalView},
    AnalysisClient, Dispatcher, Outcome, PanelVariant, ParameterPanel,
};
use tracing::{debug, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Parser)]
#[command(name = "text-analyzer", version, about = "Analyze Italian text readability with NLTK and Gemini")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (JSON or YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides the configuration
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compare the NLTK and Gemini analyzers side by side
    Compare(AnalysisArgs),
    /// Analyze with Gemini only
    Analyze(AnalysisArgs),
    /// Analyze with NLTK only
    Nltk(AnalysisArgs),
    /// Check that the backend is up
    Health,
    /// List the available presets
    Presets,
    /// Analyze texts in an interactive session
    Interactive,
}

#[derive(Debug, Args)]
struct AnalysisArgs {
    /// Text to analyze; `-` reads standard input
    text: Option<String>,

    /// Read the text from a file
    #[arg(short, long, conflicts_with_all = ["text", "example"])]
    file: Option<PathBuf>,

    /// Analyze the built-in example paragraph
    #[arg(long, conflicts_with = "text")]
    example: bool,

    #[command(flatten)]
    params: ParamArgs,
}

#[derive(Debug, Args)]
struct ParamArgs {
    /// Preset: deterministic, balanced or creative
    #[arg(short, long)]
    preset: Option<Preset>,

    /// Sampling temperature (0.0-2.0)
    #[arg(long)]
    temperature: Option<f64>,

    /// Nucleus sampling threshold (0.0-1.0)
    #[arg(long)]
    top_p: Option<f64>,

    /// Top-k sampling size (1-100)
    #[arg(long)]
    top_k: Option<u32>,

    /// Max output tokens, comparison only (256-8192)
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Minimum word length for the frequency filter (2-10)
    #[arg(long)]
    min_word_length: Option<u32>,

    /// Disable the short-word filter
    #[arg(long)]
    no_filter: bool,
}

impl ParamArgs {
    fn apply(&self, panel: &mut ParameterPanel) {
        if let Some(preset) = self.preset {
            panel.apply_preset(preset);
        }
        if let Some(temperature) = self.temperature {
            panel.set_temperature(temperature);
        }
        if let Some(top_p) = self.top_p {
            panel.set_top_p(top_p);
        }
        if let Some(top_k) = self.top_k {
            panel.set_top_k(top_k);
        }
        if let Some(max_tokens) = self.max_tokens {
            panel.set_max_output_tokens(max_tokens);
        }
        if let Some(min_word_length) = self.min_word_length {
            panel.set_min_word_length(min_word_length);
        }
        if self.no_filter {
            panel.set_filter_short_words(false);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Compare,
    Gemini,
    Nltk,
}

impl Flow {
    const ALL: [Flow; 3] = [Flow::Compare, Flow::Gemini, Flow::Nltk];

    fn label(self) -> &'static str {
        match self {
            Self::Compare => "Confronto NLTK vs Gemini",
            Self::Gemini => "Analisi Gemini",
            Self::Nltk => "Analisi NLTK",
        }
    }

    fn variant(self) -> PanelVariant {
        match self {
            Self::Compare => PanelVariant::Comparison,
            Self::Gemini | Self::Nltk => PanelVariant::SingleAnalysis,
        }
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn read_text(args: &AnalysisArgs) -> Result<String> {
    if args.example {
        return Ok(EXAMPLE_TEXT.to_string());
    }
    if let Some(path) = &args.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read text file: {}", path.display()));
    }
    match args.text.as_deref() {
        Some("-") | None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read text from stdin")?;
            Ok(text)
        }
        Some(text) => Ok(text.to_string()),
    }
}

async fn dispatch(
    dispatcher: &Dispatcher<AnalysisClient, TerminalView>,
    flow: Flow,
    text: &str,
    panel: &ParameterPanel,
) -> Result<Outcome, AnalysisError> {
    match flow {
        Flow::Compare => dispatcher.compare(text, panel).await,
        Flow::Gemini => dispatcher.analyze_gemini(text, panel).await,
        Flow::Nltk => dispatcher.analyze(text, panel).await,
    }
}

async fn run_once(
    client: AnalysisClient,
    config: &Config,
    flow: Flow,
    args: AnalysisArgs,
) -> Result<ExitCode> {
    let mut panel = ParameterPanel::from_config(flow.variant(), config);
    args.params.apply(&mut panel);
    debug!(parameters = ?panel.current_parameters(), "panel ready");

    let text = read_text(&args)?;
    let dispatcher = Dispatcher::new(client, TerminalView::new());

    Ok(ExitCode::from(exit_status(
        dispatch(&dispatcher, flow, &text, &panel).await,
    )))
}

// 1 for failures reported to the user, 2 for rejected submissions.
fn exit_status(result: Result<Outcome, AnalysisError>) -> u8 {
    match result {
        Ok(Outcome::Rendered) => 0,
        Err(err) if err.is_precondition() => 2,
        Ok(Outcome::ErrorShown(_)) | Err(_) => 1,
    }
}

async fn health(client: &AnalysisClient) -> Result<ExitCode> {
    let status = client
        .health()
        .await
        .with_context(|| format!("Backend at {} is not reachable", client.base_url()))?;

    println!(
        "{} {} {}",
        "✓".green(),
        status.status.green().bold(),
        status.message.bright_black()
    );
    Ok(ExitCode::SUCCESS)
}

fn presets() -> ExitCode {
    for preset in Preset::ALL {
        let params = preset.parameters();
        println!(
            "{:<14} {}",
            preset.name().blue().bold(),
            preset.description().bright_black()
        );
        println!(
            "               temperature {:.1}  top_p {:.2}  top_k {}",
            params.temperature, params.top_p, params.top_k
        );
    }
    ExitCode::SUCCESS
}

fn select_preset(current: Option<Preset>) -> Result<Preset> {
    let items: Vec<String> = Preset::ALL
        .iter()
        .map(|preset| format!("{} - {}", preset, preset.description()))
        .collect();
    let default = current
        .and_then(|current| Preset::ALL.iter().position(|preset| *preset == current))
        .unwrap_or(1);
    let index = Select::new()
        .with_prompt("Preset")
        .items(&items)
        .default(default)
        .interact()?;
    Ok(Preset::ALL[index])
}

fn print_help() {
    println!("{}", "Comandi:".bold());
    println!("  {}   analizza il testo di esempio", "/example".cyan());
    println!("  {}    cambia preset", "/preset".cyan());
    println!("  {}     torna al preset balanced", "/reset".cyan());
    println!("  {}     pulisce i risultati", "/clear".cyan());
    println!("  {}    mostra i parametri", "/params".cyan());
    println!("  {}      esce", "/exit".cyan());
}

async fn interactive(client: AnalysisClient, config: &Config) -> Result<ExitCode> {
    println!("{}", "🤖 Text Analyzer".bright_green().bold());
    println!("{}", "================".bright_green());

    let labels: Vec<&str> = Flow::ALL.iter().map(|flow| flow.label()).collect();
    let flow = Flow::ALL[Select::new()
        .with_prompt("Modalità")
        .items(&labels)
        .default(0)
        .interact()?];

    let mut panel = ParameterPanel::from_config(flow.variant(), config);
    if flow != Flow::Nltk {
        let preset = select_preset(panel.preset())?;
        panel.apply_preset(preset);
    }
    print_panel(&panel);
    print_help();

    let dispatcher = Dispatcher::new(client, TerminalView::new());

    loop {
        let input: String = Input::<String>::new()
            .with_prompt("Testo")
            .allow_empty(true)
            .interact_text()?;

        let command = input.trim().to_owned();
        let text = match command.as_str() {
            "/exit" => break,
            "/help" => {
                print_help();
                continue;
            }
            "/preset" => {
                let preset = select_preset(panel.preset())?;
                panel.apply_preset(preset);
                print_panel(&panel);
                continue;
            }
            "/reset" => {
                panel.reset();
                print_panel(&panel);
                continue;
            }
            "/params" => {
                print_panel(&panel);
                continue;
            }
            "/clear" => {
                dispatcher.clear();
                println!("{}", "Risultati puliti".bright_black());
                continue;
            }
            "/example" => {
                println!("{}", EXAMPLE_TEXT.bright_black().italic());
                EXAMPLE_TEXT.to_string()
            }
            _ => input,
        };

        match dispatch(&dispatcher, flow, &text, &panel).await {
            Err(err) if err.is_precondition() => debug!(error = %err, "submission rejected"),
            Err(err) => warn!(error = %err, "analysis failed"),
            Ok(_) => {}
        }
    }

    println!("\n{}", "✨ Arrivederci!".green().bold());
    Ok(ExitCode::SUCCESS)
}

fn load_config(path: Option<&Path>, base_url: Option<String>) -> Result<Config> {
    let mut config = Config::load(path).context("Failed to load configuration")?;
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_errors_exit_with_usage_code() {
        assert_eq!(exit_status(Ok(Outcome::Rendered)), 0);
        assert_eq!(exit_status(Err(AnalysisError::EmptyText)), 2);
        assert_eq!(exit_status(Err(AnalysisError::Busy)), 2);
        assert_eq!(
            exit_status(Ok(Outcome::ErrorShown("Errore: x".to_string()))),
            1
        );
        let api = AnalysisError::Api {
            message: "Testo vuoto".to_string(),
            details: None,
        };
        assert_eq!(exit_status(Err(api)), 1);
    }

    #[test]
    fn verbosity_flags_count() {
        let cli = Cli::parse_from(["text-analyzer", "-vv", "presets"]);
        assert_eq!(cli.verbose, 2);
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = load_config(cli.config.as_deref(), cli.base_url)?;
    debug!(?config, "configuration loaded");
    let client = AnalysisClient::from_config(&config).context("Failed to build HTTP client")?;

    match cli.command {
        Command::Compare(args) => run_once(client, &config, Flow::Compare, args).await,
        Command::Analyze(args) => run_once(client, &config, Flow::Gemini, args).await,
        Command::Nltk(args) => run_once(client, &config, Flow::Nltk, args).await,
        Command::Health => health(&client).await,
        Command::Presets => Ok(presets()),
        Command::Interactive => interactive(client, &config).await,
    }
}
