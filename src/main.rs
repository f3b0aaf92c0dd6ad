//! prompt-fab CLI - fill, parse and score the yes/no Q&A prompt

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use prompt_fab::provider::{create_provider, score_template};
use prompt_fab::qa::{self, QaExample};
use prompt_fab::config::mask_api_key;
use prompt_fab::{FabConfig, FabError, FixSuggestion, Template};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "prompt-fab")]
#[command(about = "Bidirectional prompt templates: fill data into text and parse it back")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render Q&A examples (JSON array) into the prompt
    Fill {
        /// Path to a JSON file of {"question", "answer"} objects
        file: PathBuf,
    },

    /// Parse prompt text back into Q&A examples
    Parse {
        /// Text file to parse (stdin when omitted)
        file: Option<PathBuf>,

        /// Fail unless the whole input is consumed
        #[arg(long)]
        full: bool,
    },

    /// Score an answer as the completion of the prompt
    Score {
        /// Path to a JSON file of answered context examples
        file: PathBuf,

        /// Question to score
        #[arg(short, long)]
        question: String,

        /// Candidate answer
        #[arg(short, long, value_enum)]
        answer: Answer,

        /// Override provider (openai, mock)
        #[arg(short, long)]
        provider: Option<String>,

        /// Override model
        #[arg(short, long)]
        model: Option<String>,

        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Answer {
    Yes,
    No,
}

impl Answer {
    fn as_bool(self) -> bool {
        matches!(self, Answer::Yes)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Fill { file } => fill(&file),
        Commands::Parse { file, full } => parse(file.as_deref(), full),
        Commands::Score {
            file,
            question,
            answer,
            provider,
            model,
            config,
        } => score(&file, question, answer, provider, model, config.as_deref()).await,
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.downcast_ref::<FabError>().and_then(|f| f.fix_suggestion()) {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn read_examples(file: &Path) -> Result<Vec<QaExample>> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let examples = serde_json::from_str(&json).map_err(FabError::from)?;
    Ok(examples)
}

fn fill(file: &Path) -> Result<()> {
    let examples = read_examples(file)?;
    let text = qa::yes_no_qa().fill(&qa::to_data(&examples)?)?;
    print!("{}", text);
    Ok(())
}

fn parse(file: Option<&Path>, full: bool) -> Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let template = qa::yes_no_qa();
    let Some(m) = template.parse(&text) else {
        anyhow::bail!("Input does not start with the Q&A instructions");
    };
    if full && m.end != text.len() {
        anyhow::bail!("Parsing stopped at byte {} of {}", m.end, text.len());
    }

    let examples = qa::from_data(&m.value);
    println!("{}", serde_json::to_string_pretty(&examples)?);
    eprintln!(
        "{} Parsed {} example(s), consumed {}/{} bytes",
        "✓".green(),
        examples.len(),
        m.end,
        text.len()
    );
    Ok(())
}

async fn score(
    file: &Path,
    question: String,
    answer: Answer,
    provider_override: Option<String>,
    model_override: Option<String>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = FabConfig::load(config_path)?.with_env();
    if let Some(p) = provider_override {
        config.provider = p;
    }
    if let Some(m) = model_override {
        config.model = m;
    }
    config.validate()?;

    let context = read_examples(file)?;
    let mut partial = context.clone();
    partial.push(QaExample::new(question.as_str(), None));
    let mut full = context;
    full.push(QaExample::new(question, Some(answer.as_bool())));

    println!(
        "{} Using provider: {} | model: {}",
        "→".cyan(),
        config.provider.cyan().bold(),
        config.model.cyan()
    );

    let provider = create_provider(&config)?;
    if let Some(key) = config.resolve_api_key()? {
        println!("{} API key: {}", "→".cyan(), mask_api_key(&key, 7).dimmed());
    }
    let scores = score_template(
        provider.as_ref(),
        &qa::yes_no_qa(),
        &qa::to_data(&partial)?,
        &qa::to_data(&full)?,
        &config.model,
    )
    .await?;

    for (token, logprob) in scores.tokens.iter().zip(&scores.logprobs) {
        let logprob = logprob.map_or_else(|| "-".to_string(), |lp| format!("{:.4}", lp));
        println!("{:>12}  {:?}", logprob, token);
    }
    println!("{} {:.4}", "Total:".cyan().bold(), scores.total_logprob());
    Ok(())
}
