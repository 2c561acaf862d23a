use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgGroup, Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod client;
mod config;
mod export;
mod import;
mod input;
mod matrix;
mod models;
mod projection;
mod report;
mod severity;
mod stats;
mod store;

use crate::client::BackendClient;
use crate::config::Config;
use crate::input::{DetectionMode, TextPair, UploadRequest};
use crate::models::AnalysisResults;
use crate::projection::{ProjectionControls, SortKey, StatusFilter};
use crate::store::SessionStore;

#[derive(Parser)]
#[command(name = "plagiarism-results")]
#[command(about = "Client for the plagiarism detection backend", long_about = None)]
struct Cli {
    /// Backend base URL (overrides PLAGIARISM_BACKEND_URL)
    #[arg(long, global = true)]
    backend_url: Option<String>,
    /// Postgres URL for the session store (overrides DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the session store schema
    InitDb,
    /// Ask the backend whether its model is loaded
    Health,
    /// Compare two texts as a whole
    Check(TextArgs),
    /// Compare two texts sentence by sentence
    Paraphrase(TextArgs),
    /// Upload a zip of student submissions and store the analysis
    Upload {
        #[arg(long)]
        archive: PathBuf,
        #[arg(long)]
        assignment_name: String,
        /// Similarity threshold in percent
        #[arg(long, default_value_t = u32::from(input::DEFAULT_THRESHOLD))]
        similarity: u32,
        /// Extensions to analyze, comma separated (defaults: py, java, docx)
        #[arg(long, value_delimiter = ',')]
        file_types: Vec<String>,
        #[arg(long, value_enum, default_value_t = DetectionMode::Both)]
        mode: DetectionMode,
    },
    /// Load suspicious pairs from a CSV file into the session store
    Import {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        assignment_name: String,
        #[arg(long)]
        total_submissions: Option<u64>,
    },
    /// Show statistics and the filtered, sorted pair list
    Results {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show the student-by-student similarity matrix
    Matrix {
        /// Read results from a JSON file instead of the session store
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Export the filtered, sorted pair list as CSV
    Export {
        #[command(flatten)]
        view: ViewArgs,
        /// Defaults to plagiarism-results-<assignment>.csv
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Forget the stored analysis
    Clear,
}

#[derive(Args)]
#[command(group(ArgGroup::new("source_a").args(["text_a", "text_a_file"]).required(true)))]
#[command(group(ArgGroup::new("source_b").args(["text_b", "text_b_file"]).required(true)))]
struct TextArgs {
    /// Original text (source)
    #[arg(long)]
    text_a: Option<String>,
    #[arg(long)]
    text_a_file: Option<PathBuf>,
    /// Text to check
    #[arg(long)]
    text_b: Option<String>,
    #[arg(long)]
    text_b_file: Option<PathBuf>,
}

impl TextArgs {
    fn into_pair(self) -> anyhow::Result<TextPair> {
        let text_a = read_text(self.text_a, self.text_a_file.as_deref())?;
        let text_b = read_text(self.text_b, self.text_b_file.as_deref())?;
        Ok(TextPair::new(text_a, text_b)?)
    }
}

#[derive(Args)]
struct ViewArgs {
    /// Read results from a JSON file instead of the session store
    #[arg(long)]
    input: Option<PathBuf>,
    /// Case-insensitive match against either student name
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, value_enum, ignore_case = true, default_value_t = StatusFilter::All)]
    status: StatusFilter,
    #[arg(long, value_enum, default_value_t = SortKey::Similarity)]
    sort_by: SortKey,
}

impl ViewArgs {
    fn controls(&self) -> ProjectionControls {
        ProjectionControls {
            search: self.search.clone(),
            status: self.status,
            sort_by: self.sort_by,
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = run().await {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.backend_url, cli.database_url);

    match cli.command {
        Commands::InitDb => {
            let store = SessionStore::connect(config.database_url()?).await?;
            store.init().await?;
            println!("Schema ready.");
        }
        Commands::Health => {
            let client = BackendClient::new(&config.backend_url);
            let health = client.health().await?;
            println!("Backend {}: {}", health.status, health.message);
            if let Some(device) = health.device {
                println!("Device: {device}");
            }
        }
        Commands::Check(texts) => {
            let texts = texts.into_pair()?;
            let client = BackendClient::new(&config.backend_url);
            let check = client
                .analyze_simple(&texts)
                .await
                .context("failed to analyze texts")?;
            print!("{}", report::build_check(&check));
        }
        Commands::Paraphrase(texts) => {
            let texts = texts.into_pair()?;
            let client = BackendClient::new(&config.backend_url);
            let check = client
                .analyze_paraphrase(&texts)
                .await
                .context("failed to analyze texts")?;
            print!("{}", report::build_paraphrase(&check));
        }
        Commands::Upload {
            archive,
            assignment_name,
            similarity,
            file_types,
            mode,
        } => {
            let request =
                UploadRequest::new(&archive, &assignment_name, similarity, &file_types, mode)?;
            let store = SessionStore::connect(config.database_url()?).await?;
            let client = BackendClient::new(&config.backend_url);

            let results = client
                .upload_and_analyze(&request)
                .await
                .context("failed to analyze submissions")?;
            let run_id = store.save(&results).await?;
            println!(
                "Stored analysis {run_id} for {} ({} suspicious pairs).",
                results.assignment_name,
                results.suspicious_pairs.len()
            );
        }
        Commands::Import {
            csv,
            assignment_name,
            total_submissions,
        } => {
            let results = import::import_csv(&csv, &assignment_name, total_submissions)?;
            let store = SessionStore::connect(config.database_url()?).await?;
            store.save(&results).await?;
            println!(
                "Imported {} pairs from {}.",
                results.suspicious_pairs.len(),
                csv.display()
            );
        }
        Commands::Results { view, limit } => {
            let Some(results) = load_results(&config, view.input.as_deref()).await? else {
                println!("{}", report::EMPTY_STATE);
                return Ok(());
            };
            let visible = projection::project(&results.suspicious_pairs, &view.controls());
            print!("{}", report::build_results(&results, &visible, limit));
        }
        Commands::Matrix { input } => {
            let Some(results) = load_results(&config, input.as_deref()).await? else {
                println!("{}", report::EMPTY_STATE);
                return Ok(());
            };
            let matrix = matrix::SimilarityMatrix::from_pairs(&results.suspicious_pairs);
            print!("{}", report::build_matrix(&matrix));
        }
        Commands::Export { view, out } => {
            let Some(results) = load_results(&config, view.input.as_deref()).await? else {
                println!("{}", report::EMPTY_STATE);
                return Ok(());
            };
            let visible = projection::project(&results.suspicious_pairs, &view.controls());
            let csv = export::export_csv(&results, &visible, &chrono::Local::now())?;
            let out =
                out.unwrap_or_else(|| PathBuf::from(export::export_file_name(&results.assignment_name)));
            std::fs::write(&out, csv)
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!(path = %out.display(), pairs = visible.len(), "export written");
            println!("Exported {} pairs to {}.", visible.len(), out.display());
        }
        Commands::Clear => {
            let store = SessionStore::connect(config.database_url()?).await?;
            if store.clear().await? {
                println!("Stored results cleared.");
            } else {
                println!("Nothing stored.");
            }
        }
    }

    Ok(())
}

/// Results from an explicit JSON file, otherwise from the session store.
async fn load_results(
    config: &Config,
    input: Option<&Path>,
) -> anyhow::Result<Option<AnalysisResults>> {
    if let Some(path) = input {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let results = serde_json::from_str(&raw)
            .with_context(|| format!("{} does not contain analysis results", path.display()))?;
        return Ok(Some(results));
    }

    let store = SessionStore::connect(config.database_url()?).await?;
    Ok(store.load().await?.map(|run| {
        info!(run_id = %run.run_id, stored_at = %run.stored_at, "loaded stored results");
        run.results
    }))
}

fn read_text(inline: Option<String>, file: Option<&Path>) -> anyhow::Result<String> {
    match (inline, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        (None, None) => Ok(String::new()),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
