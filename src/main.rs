use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rsvp_tokenizer::discovery::{self, source_kind_for_path, DiscoveryConfig};
use rsvp_tokenizer::parallel_processing::{process_files_parallel, ProcessingConfig};
use rsvp_tokenizer::reader::{AsyncFileReader, ReaderConfig};
use rsvp_tokenizer::{Language, SourceKind, TokenizeRequest, Tokenizer};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceKindArg {
    Plain,
    Markdown,
    /// Markdown for .md/.markdown files, plain text otherwise
    Auto,
}

impl SourceKindArg {
    fn resolve(self) -> Option<SourceKind> {
        match self {
            SourceKindArg::Plain => Some(SourceKind::Plain),
            SourceKindArg::Markdown => Some(SourceKind::Markdown),
            SourceKindArg::Auto => None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "rsvp-tokenize")]
#[command(about = "Tokenize text and Markdown into timed RSVP word streams")]
#[command(version)]
struct Args {
    /// Source file, or a directory to scan for *.txt/*.md/*.markdown
    input: PathBuf,

    /// Language strategy (en, de)
    #[arg(long, default_value = "en")]
    language: Language,

    #[arg(long, value_enum, default_value = "auto")]
    source_kind: SourceKindArg,

    /// Write the token document here instead of stdout (single file mode)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Regenerate aux files even when they are current
    #[arg(long)]
    overwrite_all: bool,

    /// Abort on first error
    #[arg(long)]
    fail_fast: bool,

    /// Use memory-mapped I/O instead of async buffered
    #[arg(long)]
    use_mmap: bool,

    /// Suppress console progress bars
    #[arg(long)]
    no_progress: bool,

    /// Stats output file path
    #[arg(long, default_value = "run_stats.json")]
    stats_out: PathBuf,

    /// Files tokenized at once (defaults to the CPU count)
    #[arg(long)]
    max_concurrency: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: JSON logs go to stderr so stdout stays clean for token output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    if !args.input.exists() {
        anyhow::bail!("Input does not exist: {}", args.input.display());
    }

    let tokenizer = Arc::new(Tokenizer::new()?);

    if args.input.is_dir() {
        run_directory(&args, tokenizer).await
    } else {
        run_single_file(&args, &tokenizer).await
    }
}

async fn run_single_file(args: &Args, tokenizer: &Tokenizer) -> Result<()> {
    let reader = AsyncFileReader::new(ReaderConfig {
        use_mmap: args.use_mmap,
        ..ReaderConfig::default()
    });
    let (source, _stats) = reader.read_source(&args.input).await?;
    let source_kind = args
        .source_kind
        .resolve()
        .unwrap_or_else(|| source_kind_for_path(&args.input));

    let document = tokenizer.tokenize(&TokenizeRequest::new(source.as_str()?, args.language, source_kind))?;
    let summary = document.summary();
    info!(
        words = summary.word_count,
        sentences = summary.sentence_count,
        dropped = summary.dropped_fragments,
        "Tokenized {}",
        args.input.display()
    );

    let mut json = serde_json::to_string_pretty(&document)?;
    json.push('\n');
    match &args.output {
        Some(path) => tokio::fs::write(path, json).await?,
        None => std::io::stdout().lock().write_all(json.as_bytes())?,
    }
    Ok(())
}

async fn run_directory(args: &Args, tokenizer: Arc<Tokenizer>) -> Result<()> {
    if args.output.is_some() {
        warn!("--output is ignored in directory mode; aux files are written next to each source");
    }

    let discovered = discovery::collect_discovered_files(
        &args.input,
        DiscoveryConfig {
            fail_fast: args.fail_fast,
        },
    )
    .await?;

    let (valid, invalid): (Vec<_>, Vec<_>) = discovered.into_iter().partition(|f| f.error.is_none());
    for file in &invalid {
        if let Some(error) = &file.error {
            warn!("Issue with {}: {}", file.path.display(), error);
        }
    }
    let files: Vec<PathBuf> = valid.into_iter().map(|f| f.path).collect();

    let config = ProcessingConfig {
        language: args.language,
        source_kind: args.source_kind.resolve(),
        overwrite_all: args.overwrite_all,
        fail_fast: args.fail_fast,
        use_mmap: args.use_mmap,
        show_progress: !args.no_progress,
        max_concurrency: args.max_concurrency.unwrap_or_else(num_cpus::get),
    };

    let stats = process_files_parallel(&files, &args.input, tokenizer, &config).await?;
    write_stats(&stats, &args.stats_out).await?;

    println!(
        "rsvp-tokenize v{}: {} processed, {} skipped, {} failed ({} words)",
        env!("CARGO_PKG_VERSION"),
        stats.files_processed,
        stats.files_skipped,
        stats.files_failed,
        stats.total_words
    );
    Ok(())
}

async fn write_stats(stats: &rsvp_tokenizer::RunStats, path: &Path) -> Result<()> {
    stats.write_json(path).await?;
    info!("Run statistics written to {}", path.display());
    Ok(())
}
