// WHY: Batch tokenization of a directory tree. Reads are async, tokenization runs on the
// blocking pool, and results feed the aux files, the restart log and the run statistics

use anyhow::Result;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::discovery::source_kind_for_path;
use crate::incremental::write_aux_document;
use crate::reader::{AsyncFileReader, ReaderConfig};
use crate::restart_log::{should_process_file, RestartLog};
use crate::tokenizer::{Language, SourceKind, TokenizeRequest, Tokenizer, TokenizerVersion};

/// Settings for one batch run
#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    pub language: Language,
    /// `None` picks the kind from each file's extension
    pub source_kind: Option<SourceKind>,
    pub overwrite_all: bool,
    pub fail_fast: bool,
    pub use_mmap: bool,
    pub show_progress: bool,
    pub max_concurrency: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            language: Language::English,
            source_kind: None,
            overwrite_all: false,
            fail_fast: false,
            use_mmap: false,
            show_progress: false,
            max_concurrency: num_cpus::get(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Success,
    Skipped,
    Failed,
}

/// Per-file processing statistics
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FileStats {
    /// File path relative to the root directory
    pub path: String,
    pub source_kind: Option<SourceKind>,
    pub chars_processed: u64,
    pub words: u64,
    pub sentences: u64,
    pub paragraphs: u64,
    pub headings: u64,
    pub dropped_fragments: u64,
    pub processing_time_ms: u64,
    /// Tokenization only, a subset of `processing_time_ms`
    pub tokenize_time_ms: u64,
    pub chars_per_sec: f64,
    pub status: FileStatus,
    pub error: Option<String>,
}

impl FileStats {
    fn empty(path: String, status: FileStatus) -> Self {
        Self {
            path,
            source_kind: None,
            chars_processed: 0,
            words: 0,
            sentences: 0,
            paragraphs: 0,
            headings: 0,
            dropped_fragments: 0,
            processing_time_ms: 0,
            tokenize_time_ms: 0,
            chars_per_sec: 0.0,
            status,
            error: None,
        }
    }
}

/// Totals for a batch run, written to the stats file
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RunStats {
    pub tokenizer_version: TokenizerVersion,
    pub language: Language,
    pub files_processed: u64,
    pub files_skipped: u64,
    pub files_failed: u64,
    pub total_chars: u64,
    pub total_words: u64,
    pub total_sentences: u64,
    pub elapsed_ms: u64,
    pub files: Vec<FileStats>,
}

impl RunStats {
    fn from_files(language: Language, mut files: Vec<FileStats>, elapsed_ms: u64) -> Self {
        files.sort_by(|a, b| a.path.cmp(&b.path));
        let count = |status: FileStatus| files.iter().filter(|f| f.status == status).count() as u64;

        Self {
            tokenizer_version: TokenizerVersion::CURRENT,
            language,
            files_processed: count(FileStatus::Success),
            files_skipped: count(FileStatus::Skipped),
            files_failed: count(FileStatus::Failed),
            total_chars: files.iter().map(|f| f.chars_processed).sum(),
            total_words: files.iter().map(|f| f.words).sum(),
            total_sentences: files.iter().map(|f| f.sentences).sum(),
            elapsed_ms,
            files,
        }
    }

    pub async fn write_json(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

fn relative_display(path: &Path, root_dir: &Path) -> String {
    path.strip_prefix(root_dir).unwrap_or(path).display().to_string()
}

fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

/// Tokenize one file and write its aux document
async fn process_single_file(
    path: PathBuf,
    root_dir: &Path,
    tokenizer: Arc<Tokenizer>,
    config: &ProcessingConfig,
) -> Result<FileStats> {
    let start = Instant::now();
    let reader = AsyncFileReader::new(ReaderConfig {
        use_mmap: config.use_mmap,
        ..ReaderConfig::default()
    });
    let (source, _read_stats) = reader.read_source(&path).await?;

    let language = config.language;
    let source_kind = config.source_kind.unwrap_or_else(|| source_kind_for_path(&path));
    let aux_source = path.clone();

    let (document, tokenize_time) = tokio::task::spawn_blocking(move || -> Result<_> {
        let tokenize_start = Instant::now();
        let document = tokenizer.tokenize(&TokenizeRequest::new(source.as_str()?, language, source_kind))?;
        let tokenize_time = tokenize_start.elapsed();
        write_aux_document(&aux_source, &document)?;
        Ok((document, tokenize_time))
    })
    .await??;

    let summary = document.summary();
    let chars_processed = document.text.chars().count() as u64;
    let elapsed = start.elapsed();

    Ok(FileStats {
        source_kind: Some(source_kind),
        chars_processed,
        words: summary.word_count as u64,
        sentences: summary.sentence_count as u64,
        paragraphs: summary.paragraph_count as u64,
        headings: summary.heading_count as u64,
        dropped_fragments: summary.dropped_fragments as u64,
        processing_time_ms: elapsed.as_millis() as u64,
        tokenize_time_ms: tokenize_time.as_millis() as u64,
        chars_per_sec: if elapsed.as_secs_f64() > 0.0 {
            chars_processed as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        },
        ..FileStats::empty(relative_display(&path, root_dir), FileStatus::Success)
    })
}

/// Tokenize `files` concurrently, skipping those with current aux output unless
/// `overwrite_all` is set. With `fail_fast` the first failure aborts the run.
pub async fn process_files_parallel(
    files: &[PathBuf],
    root_dir: &Path,
    tokenizer: Arc<Tokenizer>,
    config: &ProcessingConfig,
) -> Result<RunStats> {
    let run_start = Instant::now();

    let mut restart_log = RestartLog::load(root_dir).await;
    let invalid = restart_log.verify_completed_files();
    if !invalid.is_empty() {
        info!("Restart log: {} entries need reprocessing", invalid.len());
    }

    let mut all_stats = Vec::with_capacity(files.len());
    let mut pending = Vec::new();
    for path in files {
        if should_process_file(path, &restart_log, config.overwrite_all) {
            pending.push(path.clone());
        } else {
            all_stats.push(FileStats::empty(relative_display(path, root_dir), FileStatus::Skipped));
        }
    }
    info!(
        "Processing {} files ({} skipped) with concurrency {}",
        pending.len(),
        all_stats.len(),
        config.max_concurrency
    );

    let progress = progress_bar(pending.len() as u64, config.show_progress);
    let mut results = Box::pin(
        stream::iter(pending)
            .map(|path| {
                let tokenizer = Arc::clone(&tokenizer);
                async move {
                    let result = process_single_file(path.clone(), root_dir, tokenizer, config).await;
                    (path, result)
                }
            })
            .buffer_unordered(config.max_concurrency.max(1)),
    );

    let mut abort = None;
    while let Some((path, result)) = results.next().await {
        progress.inc(1);
        match result {
            Ok(stats) => {
                restart_log.mark_completed(&path);
                all_stats.push(stats);
            }
            Err(e) => {
                warn!("Failed to tokenize {}: {:#}", path.display(), e);
                let mut stats = FileStats::empty(relative_display(&path, root_dir), FileStatus::Failed);
                stats.error = Some(format!("{e:#}"));
                all_stats.push(stats);
                if config.fail_fast {
                    abort = Some(e.context(format!("Aborting run at {}", path.display())));
                    break;
                }
            }
        }
    }
    drop(results);
    progress.finish_and_clear();

    restart_log.save(root_dir).await?;
    if let Some(e) = abort {
        return Err(e);
    }

    let stats = RunStats::from_files(config.language, all_stats, run_start.elapsed().as_millis() as u64);
    info!(
        "Run complete: {} processed, {} skipped, {} failed, {} words in {}ms",
        stats.files_processed, stats.files_skipped, stats.files_failed, stats.total_words, stats.elapsed_ms
    );
    Ok(stats)
}
