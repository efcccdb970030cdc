//! jsonsmith CLI - AI-powered JSON tools
//!
//! Example:
//!   jsonsmith enhance "a cat on a windowsill at dusk" --category image -o out.json
//!   jsonsmith explain data.json
//!   jsonsmith chat data.json

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use jsonsmith::client::{Enhancer, ProxyClient, Role, Workbench, DEFAULT_SERVER_URL};
use jsonsmith::PromptCategory;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "jsonsmith",
    version,
    about = "AI-powered JSON tools",
    long_about = "AI-powered JSON tools.\n\n\
        JSON Prompt Enhancer: transform raw prompts into structured, optimized JSON (`enhance`).\n\
        JSON Visualizer: format, graph, explain, document, summarize and chat about JSON data \
        (`format`, `graph`, `explain`, `docs`, `summary`, `chat`)."
)]
struct Cli {
    /// Base URL of the jsonsmith server
    #[arg(long, env = "JSONSMITH_SERVER", default_value = DEFAULT_SERVER_URL, global = true)]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Turn a raw prompt into structured JSON
    Enhance {
        /// The raw prompt
        prompt: String,
        /// Kind of prompt
        #[arg(short, long, value_enum, default_value_t = CategoryArg::Image)]
        category: CategoryArg,
        /// Save the enhanced JSON to this file (or directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Pretty-print a JSON file
    Format {
        file: PathBuf,
        /// Rewrite the file instead of printing
        #[arg(short, long)]
        write: bool,
    },
    /// Print the node/edge graph of a JSON file
    Graph { file: PathBuf },
    /// Explain a JSON file in plain English
    Explain { file: PathBuf },
    /// Generate developer documentation for a JSON file
    Docs { file: PathBuf },
    /// Summarize a JSON file
    Summary { file: PathBuf },
    /// Ask questions about a JSON file interactively
    Chat { file: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum CategoryArg {
    Image,
    Video,
    Academic,
    Casual,
    Custom,
}

impl From<CategoryArg> for PromptCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Image => PromptCategory::Image,
            CategoryArg::Video => PromptCategory::Video,
            CategoryArg::Academic => PromptCategory::Academic,
            CategoryArg::Casual => PromptCategory::Casual,
            CategoryArg::Custom => PromptCategory::Custom,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ProxyClient::new(&cli.server).context("Failed to create HTTP client")?;

    match cli.command {
        Command::Enhance {
            prompt,
            category,
            output,
        } => enhance(client, &prompt, category.into(), output.as_deref()).await,
        Command::Format { file, write } => {
            let mut bench = open(client, &file)?;
            let formatted = bench.format()?.to_string();
            if write {
                std::fs::write(&file, format!("{formatted}\n"))
                    .with_context(|| format!("Failed to write {}", file.display()))?;
                eprintln!("{} {}", "JSON formatted:".green(), file.display());
            } else {
                println!("{formatted}");
            }
            Ok(())
        }
        Command::Graph { file } => {
            let bench = open(client, &file)?;
            let graph = bench.graph()?;
            println!("{}", serde_json::to_string_pretty(&graph)?);
            eprintln!(
                "{}",
                format!("{} nodes, {} edges", graph.nodes.len(), graph.edges.len()).dimmed()
            );
            Ok(())
        }
        Command::Explain { file } => {
            let mut bench = open(client, &file)?;
            print_section("Explanation", bench.explain().await?);
            Ok(())
        }
        Command::Docs { file } => {
            let mut bench = open(client, &file)?;
            print_section("Documentation", bench.generate_docs().await?);
            Ok(())
        }
        Command::Summary { file } => {
            let mut bench = open(client, &file)?;
            print_section("Summary", bench.summarize().await?);
            Ok(())
        }
        Command::Chat { file } => chat(open(client, &file)?).await,
    }
}

fn open(client: ProxyClient, file: &Path) -> Result<Workbench<ProxyClient>> {
    let mut bench = Workbench::new(client);
    bench.load_file(file)?;
    Ok(bench)
}

fn print_section(title: &str, body: &str) {
    eprintln!("{}", format!("── {title} ──").cyan().bold());
    println!("{body}");
}

async fn enhance(
    client: ProxyClient,
    prompt: &str,
    category: PromptCategory,
    output: Option<&Path>,
) -> Result<()> {
    let mut enhancer = Enhancer::new(client);
    eprintln!(
        "{} {}",
        "Enhancing".dimmed(),
        format!("({})", category.label()).dimmed()
    );
    let comparison = enhancer.enhance(prompt, category).await?.comparison.clone();

    if let Some(json) = enhancer.enhanced_json() {
        print_section("Enhanced JSON", &json?);
    }
    print_section("Before / After Comparison", &comparison);

    if let Some(path) = output
        && let Some(written) = enhancer.download(path)?
    {
        eprintln!("{} {}", "Saved:".green(), written.display());
    }
    Ok(())
}

async fn chat(mut bench: Workbench<ProxyClient>) -> Result<()> {
    eprintln!(
        "{}",
        "Ask questions about your JSON. Empty line skips, Ctrl-D quits.".dimmed()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        eprint!("{} ", "You>".blue().bold());
        std::io::stderr().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match bench.ask(&line).await {
            Ok(Some(answer)) => println!("{} {}", "AI>".green().bold(), answer),
            Ok(None) => {}
            // Errors end only the current question
            Err(err) => eprintln!("{} {}", "Error:".red().bold(), err),
        }
    }

    let transcript = bench.transcript();
    if !transcript.is_empty() {
        let questions = transcript
            .messages()
            .iter()
            .filter(|m| m.role == Role::User)
            .count();
        eprintln!("{}", format!("{questions} question(s) asked").dimmed());
    }
    Ok(())
}
