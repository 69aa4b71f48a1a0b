use anyhow::Result;
use clap::Parser;
use sift_analysis::{ContentKind, Workbench};
use sift_common::observability::{init_logging, LogConfig};
use sift_config::{LlmConfig, SiftConfigLoader};

mod repl;

#[derive(Parser, Debug)]
#[command(
    name = "sift",
    about = "Grounded misinformation triage from the terminal"
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "sift.yaml")]
    config: std::path::PathBuf,

    /// Override the configured model identifier.
    #[arg(long, env = "SIFT_MODEL")]
    model: Option<String>,

    /// Analyze this URL, print the verdict, and exit.
    #[arg(long, conflicts_with = "text")]
    url: Option<String>,

    /// Analyze this text, print the verdict, and exit.
    #[arg(long)]
    text: Option<String>,

    /// Duplicate logs to stderr.
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config first: a missing credential must stop the process before any
    // request machinery exists.
    let mut cfg = SiftConfigLoader::new()
        .with_optional_file(&cli.config)
        .load()?;
    if let Some(model) = cli.model {
        let LlmConfig::Gemini { model: slot, .. } = &mut cfg.llm;
        *slot = model;
    }
    cfg.validate()?;

    let log_path = init_logging(LogConfig {
        emit_stderr: cli.verbose,
        ..LogConfig::default()
    })?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log = %log_path.display(),
        "sift starting"
    );

    let client = sift_llm::client_from_config(&cfg.llm)?;
    let mut workbench = Workbench::new(client);

    match (cli.url, cli.text) {
        (Some(url), _) => repl::run_once(&mut workbench, &url, ContentKind::Url).await,
        (None, Some(text)) => repl::run_once(&mut workbench, &text, ContentKind::Text).await,
        (None, None) => repl::run_interactive(&mut workbench).await,
    }
}
