//! envenom — 海洋生物蜇伤专家系统命令行客户端
//!
//! Usage:
//!   envenom infer <SYMPTOMS...> [--format text|html|json]   One-shot query
//!   envenom form                                            One query per stdin line

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use envenomation_client::render::{Render, TextRenderer};
use envenomation_client::{ClientConfig, InferenceClient, InferenceSession, ResultSet, SubmitOutcome};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "envenom", version)]
#[command(about = "Marine envenomation expert system client")]
struct Cli {
    /// Inference service base URL (overrides config and ENVENOM_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    /// Output format for results
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit one symptom description and print the candidate species
    Infer {
        /// Free-text symptoms; multiple words are joined with spaces
        symptoms: Vec<String>,
    },
    /// Read one symptom description per line from stdin, like the web form
    Form,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Html,
    Json,
}

fn render(format: OutputFormat, results: &ResultSet) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => TextRenderer.render(results),
        #[cfg(feature = "html")]
        OutputFormat::Html => envenomation_client::render::HtmlRenderer.render_document(results),
        #[cfg(not(feature = "html"))]
        OutputFormat::Html => anyhow::bail!("built without the `html` feature"),
        OutputFormat::Json => serde_json::to_string_pretty(results)?,
    })
}

fn print_results(format: OutputFormat, results: &ResultSet) -> anyhow::Result<()> {
    if !results.rejected().is_empty() {
        eprintln!(
            "warning: {} malformed entr{} dropped",
            results.rejected().len(),
            if results.rejected().len() == 1 { "y" } else { "ies" }
        );
    }
    if results.is_empty() && format == OutputFormat::Text {
        println!("No candidate species returned.");
        return Ok(());
    }
    println!("{}", render(format, results)?);
    Ok(())
}

fn build_client(cli: &Cli) -> anyhow::Result<InferenceClient> {
    let mut config = ClientConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout_secs = secs;
    }
    InferenceClient::new(config).context("building inference client")
}

async fn run_form(client: InferenceClient, format: OutputFormat) -> anyhow::Result<()> {
    let session = InferenceSession::from_client(client);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("Enter symptoms here... (one description per line, Ctrl-D to quit)");
    while let Some(line) = lines.next_line().await? {
        match session.submit(line).await {
            Ok(SubmitOutcome::Applied(results)) => print_results(format, &results)?,
            Ok(SubmitOutcome::Superseded) | Ok(SubmitOutcome::Cancelled) => {}
            Err(e) => {
                // The previous results stay on display.
                eprintln!("error: {}", e);
                let previous = session.results();
                if !previous.is_empty() {
                    eprintln!("showing previous results:");
                    print_results(format, &previous)?;
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "envenomation_client=info,envenom=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = build_client(&cli)?;

    match &cli.command {
        Commands::Infer { symptoms } => {
            let query = symptoms.join(" ");
            let results = client.submit(query).await?;
            print_results(cli.format, &results)?;
        }
        Commands::Form => run_form(client, cli.format).await?,
    }
    Ok(())
}
