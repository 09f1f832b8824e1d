// WHY: Coordinator for the tokenization pipeline: normalize, segment, then classify each
// span for focus, sentence/block boundaries and timing, validating before returning

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::{Result, TokenizeError};

pub mod abbreviations;
pub mod boundary;
pub mod focus;
pub mod markdown;
pub mod normalization;
pub mod punctuation;
pub mod segmenter;
pub mod timing;
pub mod validation;

pub use abbreviations::AbbreviationChecker;
pub use markdown::MarkdownReducer;
pub use normalization::{normalize, NormalizedDocument};
pub use segmenter::{segment, DisplaySpan};

use boundary::BlockPosition;

/// Languages with an abbreviation/capitalization strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "de")]
    German,
}

impl Language {
    pub fn tag(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::German => "de",
        }
    }
}

impl FromStr for Language {
    type Err = TokenizeError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "de" | "german" | "deutsch" => Ok(Language::German),
            _ => Err(TokenizeError::UnsupportedLanguage(tag.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// How raw input should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Plain,
    Markdown,
}

impl FromStr for SourceKind {
    type Err = TokenizeError;

    fn from_str(kind: &str) -> Result<Self> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" | "txt" => Ok(SourceKind::Plain),
            "markdown" | "md" => Ok(SourceKind::Markdown),
            _ => Err(TokenizeError::UnsupportedSourceKind(kind.to_string())),
        }
    }
}

/// Structural break rendered before a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakKind {
    #[default]
    None,
    Paragraph,
    Heading,
}

/// Identifier of the tokenization ruleset that produced a token stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenizerVersion(pub u32);

impl TokenizerVersion {
    pub const CURRENT: TokenizerVersion = TokenizerVersion(1);
}

impl Default for TokenizerVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for TokenizerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// One display unit of the output stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub word_index: usize,
    pub display_text: String,
    pub char_start: usize,
    /// Exclusive
    pub char_end: usize,
    /// Char index into `display_text` held at the visual anchor
    pub focus_index: usize,
    pub delay_multiplier: f64,
    pub break_before: BreakKind,
    pub is_sentence_start: bool,
    pub is_block_start: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingStart {
    pub offset: usize,
    pub level: u8,
}

/// Input to the coordinator
#[derive(Debug, Clone)]
pub struct TokenizeRequest<'a> {
    pub text: &'a str,
    pub language: Language,
    pub source_kind: SourceKind,
    pub version: TokenizerVersion,
}

impl<'a> TokenizeRequest<'a> {
    /// Request against the current ruleset
    pub fn new(text: &'a str, language: Language, source_kind: SourceKind) -> Self {
        Self {
            text,
            language,
            source_kind,
            version: TokenizerVersion::CURRENT,
        }
    }

    pub fn with_version(mut self, version: TokenizerVersion) -> Self {
        self.version = version;
        self
    }
}

/// Complete, immutable tokenization result as persisted by collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizedDocument {
    pub tokenizer_version: TokenizerVersion,
    pub language: Language,
    pub source_kind: SourceKind,
    /// Normalized text; token offsets index into its chars
    pub text: String,
    /// Char offset of the first token of every block that produced tokens
    pub block_starts: Vec<usize>,
    pub heading_starts: Vec<HeadingStart>,
    pub tokens: Vec<Token>,
    /// Punctuation runs dropped because no word was adjacent
    #[serde(default)]
    pub dropped_fragments: usize,
}

impl TokenizedDocument {
    /// Stored output from another ruleset must be regenerated, never patched
    pub fn is_stale(&self) -> bool {
        self.tokenizer_version != TokenizerVersion::CURRENT
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            word_count: self.tokens.len(),
            sentence_count: self.tokens.iter().filter(|t| t.is_sentence_start).count(),
            paragraph_count: self.block_starts.len().saturating_sub(self.heading_starts.len()),
            heading_count: self.heading_starts.len(),
            dropped_fragments: self.dropped_fragments,
        }
    }
}

/// Counts derived from a tokenized document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub word_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub heading_count: usize,
    pub dropped_fragments: usize,
}

/// Pipeline coordinator. Holds the compiled Markdown rules; cheap to share across threads.
pub struct Tokenizer {
    markdown: MarkdownReducer,
}

impl Tokenizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            markdown: MarkdownReducer::new()?,
        })
    }

    /// Tokenize one document. Either the whole stream is returned or a fatal error.
    pub fn tokenize(&self, request: &TokenizeRequest<'_>) -> Result<TokenizedDocument> {
        if request.version != TokenizerVersion::CURRENT {
            return Err(TokenizeError::UnsupportedVersion {
                requested: request.version.0,
                implemented: TokenizerVersion::CURRENT.0,
            });
        }

        let normalized = normalize(request.text, request.source_kind, &self.markdown);
        let checker = AbbreviationChecker::new(request.language);

        let mut segmenter = segment(&normalized.text);
        let spans: Vec<DisplaySpan> = segmenter.by_ref().collect();
        let dropped_fragments = segmenter.dropped_fragments();
        debug!(
            "Segmented {} spans, dropped {} punctuation fragments",
            spans.len(),
            dropped_fragments
        );

        let mut tokens = Vec::with_capacity(spans.len());
        let mut block_starts = Vec::new();
        let mut heading_starts = Vec::new();
        let mut next_block = 0;

        for (i, span) in spans.iter().enumerate() {
            // the last block starting at or before this span owns it; blocks with no spans are skipped
            let mut block_origin = None;
            while next_block < normalized.block_starts.len() && normalized.block_starts[next_block] <= span.char_start {
                block_origin = Some(normalized.block_starts[next_block]);
                next_block += 1;
            }

            let heading_level = block_origin.and_then(|origin| normalized.heading_level_at(origin));
            let position = if block_origin.is_some() {
                block_starts.push(span.char_start);
                if let Some(level) = heading_level {
                    heading_starts.push(HeadingStart {
                        offset: span.char_start,
                        level,
                    });
                }
                BlockPosition::BlockStart
            } else {
                BlockPosition::Inside
            };

            let break_before = match (i, position, heading_level) {
                (0, _, _) | (_, BlockPosition::Inside, _) => BreakKind::None,
                (_, BlockPosition::BlockStart, Some(_)) => BreakKind::Heading,
                (_, BlockPosition::BlockStart, None) => BreakKind::Paragraph,
            };

            let previous = i.checked_sub(1).map(|p| &spans[p]);

            tokens.push(Token {
                word_index: i,
                display_text: span.display_text.clone(),
                char_start: span.char_start,
                char_end: span.char_end,
                focus_index: focus::focus_point(&span.display_text, &span.clean_text)?,
                delay_multiplier: timing::delay_multiplier(&span.display_text, &span.clean_text, &checker),
                break_before,
                is_sentence_start: boundary::is_sentence_start(previous, span, position, &checker),
                is_block_start: position == BlockPosition::BlockStart,
            });
        }

        validation::validate_tokens(&normalized.text, &tokens, &block_starts)?;

        debug!(
            "Tokenized {} tokens in {} blocks ({}, {:?})",
            tokens.len(),
            block_starts.len(),
            request.language,
            request.source_kind
        );

        Ok(TokenizedDocument {
            tokenizer_version: request.version,
            language: request.language,
            source_kind: request.source_kind,
            text: normalized.text,
            block_starts,
            heading_starts,
            tokens,
            dropped_fragments,
        })
    }
}

/// One-shot convenience: compiles the Markdown rules per call. Prefer a shared `Tokenizer`.
pub fn tokenize(raw_text: &str, language: Language, source_kind: SourceKind) -> Result<TokenizedDocument> {
    Tokenizer::new()?.tokenize(&TokenizeRequest::new(raw_text, language, source_kind))
}
