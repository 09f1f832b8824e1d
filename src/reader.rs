use anyhow::{Context, Result};
use memmap2::{Mmap, MmapOptions};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, BufReader};
use tracing::{debug, info};

/// Configuration for file reading behavior
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Map the file instead of reading it through a buffer
    pub use_mmap: bool,
    /// Buffer size for async reading (default: 8KB)
    pub buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            use_mmap: false,
            buffer_size: 8192,
        }
    }
}

/// Statistics for one file read
#[derive(Debug, Clone)]
pub struct ReadStats {
    pub file_path: String,
    pub bytes_read: u64,
    pub duration_ms: u64,
}

/// Whole source document, either owned or mapped. UTF-8 is checked when loaded.
pub enum SourceText {
    Buffered(String),
    Mapped(Mmap),
}

impl SourceText {
    pub fn as_str(&self) -> Result<&str> {
        match self {
            SourceText::Buffered(text) => Ok(text),
            SourceText::Mapped(map) => Ok(std::str::from_utf8(map)?),
        }
    }

    pub fn byte_len(&self) -> usize {
        match self {
            SourceText::Buffered(text) => text.len(),
            SourceText::Mapped(map) => map.len(),
        }
    }
}

/// Reads whole source files; the tokenizer needs the complete document
pub struct AsyncFileReader {
    config: ReaderConfig,
}

impl AsyncFileReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Load a file, failing on I/O errors and invalid UTF-8
    pub async fn read_source<P: AsRef<Path>>(&self, file_path: P) -> Result<(SourceText, ReadStats)> {
        let path = file_path.as_ref();
        let start_time = std::time::Instant::now();
        debug!("Starting read of file: {} (mmap: {})", path.display(), self.config.use_mmap);

        let source = if self.config.use_mmap {
            let owned_path = path.to_path_buf();
            tokio::task::spawn_blocking(move || map_file(&owned_path)).await??
        } else {
            self.read_buffered(path).await?
        };

        let stats = ReadStats {
            file_path: path.display().to_string(),
            bytes_read: source.byte_len() as u64,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            "Read {}: {} bytes in {}ms",
            stats.file_path, stats.bytes_read, stats.duration_ms
        );
        Ok((source, stats))
    }

    async fn read_buffered(&self, path: &Path) -> Result<SourceText> {
        let file = File::open(path)
            .await
            .with_context(|| format!("Failed to open file {}", path.display()))?;

        let mut reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .await
            .with_context(|| format!("Failed to read file {}", path.display()))?;

        let text = String::from_utf8(bytes)
            .with_context(|| format!("UTF-8 decoding error in {}", path.display()))?;
        Ok(SourceText::Buffered(text))
    }
}

fn map_file(path: &Path) -> Result<SourceText> {
    let file = std::fs::File::open(path).with_context(|| format!("Failed to open file {}", path.display()))?;

    // zero-length mappings are rejected on some platforms
    if file.metadata()?.len() == 0 {
        return Ok(SourceText::Buffered(String::new()));
    }

    // SAFETY: the map is read-only and dropped once the file is tokenized
    let map = unsafe { MmapOptions::new().map(&file)? };
    std::str::from_utf8(&map).with_context(|| format!("UTF-8 decoding error in {}", path.display()))?;
    Ok(SourceText::Mapped(map))
}

/// Read a single file with default configuration
pub async fn read_file_async<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let reader = AsyncFileReader::new(ReaderConfig::default());
    let (source, _stats) = reader.read_source(file_path).await?;
    Ok(source.as_str()?.to_string())
}
