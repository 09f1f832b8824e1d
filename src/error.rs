// WHY: Typed failures for the tokenization engine so collaborators can tell a
// rejected request apart from an internal bug without string matching

use thiserror::Error;

/// Errors raised by the tokenizer. Every variant is fatal: a call either returns
/// the complete token stream or one of these, never a partial result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenizeError {
    /// Language tag has no abbreviation/capitalization strategy
    #[error("unsupported language tag: {0}")]
    UnsupportedLanguage(String),

    /// Source kind is neither plain nor markdown
    #[error("unsupported source kind: {0}")]
    UnsupportedSourceKind(String),

    /// Requested ruleset version is not implemented by this build
    #[error("unsupported tokenizer version: {requested} (this build implements {implemented})")]
    UnsupportedVersion { requested: u32, implemented: u32 },

    /// An output invariant did not hold; indicates a segmentation or normalization bug
    #[error("invariant violation at word {word_index}: {detail}")]
    InvariantViolation { word_index: usize, detail: String },

    /// The clean core of a span could not be located inside its display text
    #[error("focus point: clean text {clean:?} not found in display text {display:?}")]
    FocusPointNotFound { display: String, clean: String },

    /// A built-in Markdown pattern failed to compile
    #[error("failed to compile markdown pattern: {0}")]
    Pattern(String),
}

impl TokenizeError {
    /// True for errors caused by the caller's request rather than by engine logic
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            TokenizeError::UnsupportedLanguage(_)
                | TokenizeError::UnsupportedSourceKind(_)
                | TokenizeError::UnsupportedVersion { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TokenizeError>;
