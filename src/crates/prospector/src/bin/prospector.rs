//! Command-line entry point for the lead pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use llm::{GroqClient, LlmConfig};
use prospector::driver::{self, SenderProfile};
use prospector::{build_pipeline, casebook, Collaborators, PipelineConfig};
use tooling::{HttpEmbedder, HttpPageFetcher, SqliteKnowledgeBase, TavilyClient};

#[derive(Parser)]
#[command(name = "prospector", version, about = "Research leads, qualify them, draft outreach")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process a CSV of leads and write a report CSV.
    Run(RunArgs),

    /// Create and seed the proof-point knowledge base.
    InitKb(KbArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Lead list CSV.
    #[arg(long)]
    leads: PathBuf,

    /// Output report CSV.
    #[arg(long, default_value = "reports.csv")]
    output: PathBuf,

    /// Column holding the lead's name.
    #[arg(long, default_value = "name")]
    name_column: String,

    /// Column holding the lead's company.
    #[arg(long, default_value = "company")]
    company_column: String,

    /// Sender name used in the sign-off.
    #[arg(long)]
    sender_name: String,

    /// Sender company.
    #[arg(long)]
    sender_company: String,

    /// What the sender is pitching.
    #[arg(long)]
    value_proposition: String,

    /// Generation model.
    #[arg(long, default_value = "llama-3.3-70b-versatile")]
    model: String,

    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    groq_api_key: String,

    #[arg(long, env = "TAVILY_API_KEY", hide_env_values = true)]
    tavily_api_key: String,

    #[command(flatten)]
    kb: KbArgs,
}

#[derive(Args)]
struct KbArgs {
    /// Knowledge base location (defaults to ~/.prospect/knowledge.db).
    #[arg(long)]
    knowledge_db: Option<PathBuf>,

    /// OpenAI-compatible embeddings endpoint (Ollama by default).
    #[arg(long, default_value = "http://localhost:11434/v1")]
    embeddings_url: String,

    /// Embedding model.
    #[arg(long, default_value = "nomic-embed-text")]
    embeddings_model: String,

    /// Embedding vector width.
    #[arg(long, default_value_t = 768)]
    embeddings_dims: usize,

    #[arg(long, env = "EMBEDDINGS_API_KEY", hide_env_values = true)]
    embeddings_api_key: Option<String>,
}

impl KbArgs {
    fn db_path(&self) -> PathBuf {
        self.knowledge_db.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".prospect")
                .join("knowledge.db")
        })
    }

    async fn open_store(&self) -> anyhow::Result<SqliteKnowledgeBase> {
        let embedder = Arc::new(HttpEmbedder::new(
            &self.embeddings_url,
            self.embeddings_api_key.as_deref(),
            &self.embeddings_model,
            self.embeddings_dims,
        ));
        let path = self.db_path();
        SqliteKnowledgeBase::open(&path, embedder)
            .await
            .with_context(|| format!("opening knowledge base at {}", path.display()))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Command::Run(args) => run(args).await,
        Command::InitKb(args) => init_kb(args).await,
    }
}

async fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = PipelineConfig::default();

    let kb = args.kb.open_store().await?;
    if kb.count().await? == 0 {
        tracing::warn!("knowledge base is empty; drafts will use the generic proof point (run `prospector init-kb`)");
    }

    let collab = Collaborators {
        search: Arc::new(TavilyClient::new(&args.tavily_api_key)),
        fetcher: Arc::new(HttpPageFetcher::new()?),
        llm: Arc::new(GroqClient::new(LlmConfig::groq(
            &args.groq_api_key,
            &args.model,
        ))?),
        knowledge: Arc::new(kb),
    };
    let pipeline = build_pipeline(&collab, &config)?;

    let leads = driver::read_leads(&args.leads, &args.name_column, &args.company_column)
        .with_context(|| format!("reading leads from {}", args.leads.display()))?;
    let sender = SenderProfile {
        name: args.sender_name,
        company: args.sender_company,
        value_proposition: args.value_proposition,
    };
    tracing::info!(leads = leads.len(), "starting batch");

    let bar = ProgressBar::new(leads.len() as u64).with_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let mut reports = Vec::with_capacity(leads.len());
    for lead in &leads {
        bar.set_message(format!("{} @ {}", lead.name, lead.company));
        reports.push(driver::process_lead(&pipeline, &sender, lead).await);
        bar.inc(1);
    }
    bar.finish_and_clear();

    driver::write_reports(&args.output, &reports)
        .with_context(|| format!("writing report to {}", args.output.display()))?;

    let qualified = reports.iter().filter(|r| r.is_qualified).count();
    println!(
        "{} leads processed, {} qualified; report written to {}",
        reports.len(),
        qualified,
        args.output.display()
    );
    Ok(())
}

async fn init_kb(args: KbArgs) -> anyhow::Result<()> {
    let kb = args.open_store().await?;
    let inserted = casebook::seed_if_empty(&kb).await?;
    if inserted == 0 {
        println!(
            "Knowledge base at {} already seeded ({} documents)",
            args.db_path().display(),
            kb.count().await?
        );
    } else {
        println!(
            "Knowledge base created at {} with {inserted} case studies",
            args.db_path().display()
        );
    }
    Ok(())
}
