use anyhow::Result;
use futures::stream::{Stream, StreamExt};
use glob::glob;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::incremental::is_aux_file;
use crate::tokenizer::SourceKind;

/// Extensions picked up under the root directory
pub const SOURCE_PATTERNS: [&str; 3] = ["**/*.txt", "**/*.md", "**/*.markdown"];

/// Configuration for file discovery behavior
#[derive(Debug, Clone, Default)]
pub struct DiscoveryConfig {
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
}

/// Result of file discovery validation
#[derive(Debug, Clone)]
pub struct FileValidation {
    pub path: PathBuf,
    pub error: Option<String>,
}

/// Markdown for `.md`/`.markdown`, plain text for everything else
pub fn source_kind_for_path(path: &Path) -> SourceKind {
    match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase) {
        Some(ext) if ext == "md" || ext == "markdown" => SourceKind::Markdown,
        _ => SourceKind::Plain,
    }
}

/// Discovers text and Markdown sources recursively under `root_dir`.
/// Files are yielded per pattern in glob order; use `collect_discovered_files`
/// for a sorted list.
pub fn discover_files(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> impl Stream<Item = Result<FileValidation>> {
    let root_path = root_dir.as_ref().to_path_buf();

    futures::stream::unfold(
        DiscoveryState::new(root_path, config),
        |mut state| async move {
            state.next_file().await.map(|result| (result, state))
        },
    )
}

/// Internal state for file discovery iteration
struct DiscoveryState {
    root_dir: PathBuf,
    config: DiscoveryConfig,
    pattern_index: usize,
    glob_iter: Option<glob::Paths>,
}

impl DiscoveryState {
    fn new(root_dir: PathBuf, config: DiscoveryConfig) -> Self {
        Self {
            root_dir,
            config,
            pattern_index: 0,
            glob_iter: None,
        }
    }

    async fn next_file(&mut self) -> Option<Result<FileValidation>> {
        loop {
            if self.glob_iter.is_none() {
                let suffix = SOURCE_PATTERNS.get(self.pattern_index)?;
                let pattern = format!("{}/{}", self.root_dir.display(), suffix);
                debug!("Starting file discovery with pattern: {}", pattern);

                match glob(&pattern) {
                    Ok(paths) => self.glob_iter = Some(paths),
                    Err(e) => {
                        return Some(Err(anyhow::anyhow!("Failed to create glob pattern: {}", e)));
                    }
                }
            }

            let next = self.glob_iter.as_mut().and_then(|paths| paths.next());
            match next {
                Some(Ok(path)) => {
                    if is_aux_file(&path) {
                        debug!("Skipping aux output: {}", path.display());
                        continue;
                    }
                    debug!("Found file: {}", path.display());
                    return Some(self.validate_file(path).await);
                }
                Some(Err(e)) => {
                    let error_msg = format!("Glob iteration error: {e}");
                    warn!("{}", error_msg);
                    if self.config.fail_fast {
                        return Some(Err(anyhow::anyhow!(error_msg)));
                    }
                }
                None => {
                    self.glob_iter = None;
                    self.pattern_index += 1;
                    if self.pattern_index >= SOURCE_PATTERNS.len() {
                        info!("File discovery completed for root: {}", self.root_dir.display());
                        return None;
                    }
                }
            }
        }
    }

    // UTF-8 validation happens when the file is read for tokenization
    async fn validate_file(&self, path: PathBuf) -> Result<FileValidation> {
        match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(FileValidation { path, error: None }),
            Ok(_) => {
                let error = format!("Path is not a file: {}", path.display());
                warn!("{}", error);
                Ok(FileValidation {
                    path,
                    error: Some(error),
                })
            }
            Err(e) => {
                let error = format!("Cannot access file {}: {}", path.display(), e);
                warn!("{}", error);
                if self.config.fail_fast {
                    Err(anyhow::anyhow!(error))
                } else {
                    Ok(FileValidation {
                        path,
                        error: Some(error),
                    })
                }
            }
        }
    }
}

/// Collect all discovered files, sorted by path
pub async fn collect_discovered_files(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> Result<Vec<FileValidation>> {
    let mut files = Vec::new();
    let mut stream = Box::pin(discover_files(root_dir, config));

    while let Some(result) = stream.next().await {
        files.push(result?);
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));

    let valid_count = files.iter().filter(|f| f.error.is_none()).count();
    let invalid_count = files.len() - valid_count;
    if invalid_count > 0 {
        warn!("Found {} files with validation issues", invalid_count);
    }
    info!("File discovery summary: {} valid, {} invalid", valid_count, invalid_count);

    Ok(files)
}
