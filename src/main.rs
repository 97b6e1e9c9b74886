use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lexfreq::api::{create_router, file_stem};
use lexfreq::frequency::source_for;
use lexfreq::{Analyzer, ClassifierOptions, FrequencyTable};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Vocabulary frequency analysis for plain-text documents", long_about = None)]
struct Args {
    /// Reference frequency listing: a local path (optionally .gz) or an http(s) URL
    #[arg(short, long, global = true)]
    frequencies: Option<String>,

    /// Seconds to wait for an http(s) frequency listing
    #[arg(long, global = true, default_value_t = 30)]
    fetch_timeout: u64,

    /// Rows kept per vocabulary extract
    #[arg(long, global = true, default_value_t = 25)]
    top_k: usize,

    /// Corpus frequency below which a word counts as novel
    #[arg(long, global = true, default_value_t = 100.0)]
    rarity_threshold: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a document and write the result tables
    Analyze {
        file: PathBuf,

        /// Directory for the CSV tables
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

fn load_frequencies(location: Option<&str>, timeout: Duration) -> FrequencyTable {
    match location {
        Some(location) => FrequencyTable::load(source_for(location, timeout).as_ref()),
        None => {
            tracing::warn!("No frequency reference configured, all lookups will miss");
            FrequencyTable::empty()
        }
    }
}

fn run_analyze(
    analyzer: &Analyzer,
    file: &Path,
    output_dir: &Path,
    format: OutputFormat,
) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let source = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    let analysis = analyzer.analyze_bytes(&bytes, &source)?;
    let tables = analysis.tables();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&tables)?);
        }
        OutputFormat::Csv => {
            fs::create_dir_all(output_dir)
                .with_context(|| format!("Failed to create {}", output_dir.display()))?;
            let stem = file_stem(&source);
            for table in tables.iter() {
                let path = output_dir.join(format!("{}_{}.csv", stem, table.name));
                fs::write(&path, table.to_csv())
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Wrote {} rows to {}", table.len(), path.display());
            }
        }
    }

    Ok(())
}

async fn serve(analyzer: Arc<Analyzer>, addr: SocketAddr) -> Result<()> {
    let app = create_router(analyzer)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Loaded once, before any request; blocking fetches must not run inside the runtime
    let frequencies = Arc::new(load_frequencies(
        args.frequencies.as_deref(),
        Duration::from_secs(args.fetch_timeout),
    ));
    let options = ClassifierOptions {
        top_k: args.top_k,
        rarity_threshold: args.rarity_threshold,
        ..ClassifierOptions::default()
    };
    let analyzer = Analyzer::with_rule_annotator(frequencies).with_options(options);

    match args.command {
        Command::Analyze {
            file,
            output_dir,
            format,
        } => run_analyze(&analyzer, &file, &output_dir, format),
        Command::Serve { addr } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(serve(Arc::new(analyzer), addr))
        }
    }
}
