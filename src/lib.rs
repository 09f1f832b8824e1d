pub mod discovery;
pub mod error;
pub mod incremental;
pub mod parallel_processing;
pub mod reader;
pub mod restart_log;
pub mod tokenizer;

// Re-export engine types for convenient access
pub use error::TokenizeError;
pub use tokenizer::{
    tokenize, BreakKind, DocumentSummary, HeadingStart, Language, SourceKind, Token,
    TokenizeRequest, TokenizedDocument, Tokenizer, TokenizerVersion,
};

// Re-export incremental processing utilities
pub use incremental::{
    aux_file_exists, generate_aux_file_path, read_aux_document, write_aux_document,
};

// Re-export batch processing types for the CLI and benchmarks
pub use parallel_processing::{process_files_parallel, FileStats, ProcessingConfig, RunStats};
