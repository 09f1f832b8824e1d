// WHY: Flatten raw input into one string plus block offsets so segmentation can run
// as a single forward pass over text that no longer carries layout

use tracing::debug;

use super::markdown::MarkdownReducer;
use super::SourceKind;

/// Fixed separator placed between surviving blocks
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Output of normalization. Offsets count chars, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedDocument {
    pub text: String,
    /// Char offset where each paragraph or heading block begins
    pub block_starts: Vec<usize>,
    /// Blocks that originated as headings, with their level (1-6)
    pub heading_starts: Vec<(usize, u8)>,
}

impl NormalizedDocument {
    pub fn is_empty(&self) -> bool {
        self.block_starts.is_empty()
    }

    /// Heading level of the block starting at `offset`, if that block is a heading
    pub fn heading_level_at(&self, offset: usize) -> Option<u8> {
        self.heading_starts
            .binary_search_by_key(&offset, |&(start, _)| start)
            .ok()
            .map(|i| self.heading_starts[i].1)
    }
}

/// A block produced by a reducer before assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RawBlock {
    Paragraph(String),
    Heading { level: u8, text: String },
}

/// Assembles blocks into a `NormalizedDocument`, tracking char offsets incrementally
#[derive(Debug, Default)]
pub(crate) struct DocumentBuilder {
    doc: NormalizedDocument,
    char_len: usize,
    buffer: String,
}

impl DocumentBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Collapse whitespace and append; blocks with no content are dropped
    pub(crate) fn push(&mut self, block: RawBlock) {
        let (raw, level) = match &block {
            RawBlock::Paragraph(text) => (text.as_str(), None),
            RawBlock::Heading { level, text } => (text.as_str(), Some(*level)),
        };

        collapse_whitespace_into(raw, &mut self.buffer);
        if self.buffer.is_empty() {
            return;
        }

        if !self.doc.block_starts.is_empty() {
            self.doc.text.push_str(BLOCK_SEPARATOR);
            self.char_len += BLOCK_SEPARATOR.chars().count();
        }

        let start = self.char_len;
        self.doc.block_starts.push(start);
        if let Some(level) = level {
            self.doc.heading_starts.push((start, level));
        }

        self.doc.text.push_str(&self.buffer);
        self.char_len += self.buffer.chars().count();
    }

    pub(crate) fn finish(self) -> NormalizedDocument {
        self.doc
    }
}

/// Normalize raw input according to its source kind. Never fails.
pub fn normalize(raw_text: &str, source_kind: SourceKind, markdown: &MarkdownReducer) -> NormalizedDocument {
    let text = normalize_line_endings(raw_text);

    let doc = match source_kind {
        SourceKind::Plain => normalize_plain(&text),
        SourceKind::Markdown => markdown.reduce(&text),
    };

    debug!(
        "Normalized {} input chars into {} blocks ({} headings)",
        raw_text.chars().count(),
        doc.block_starts.len(),
        doc.heading_starts.len()
    );
    doc
}

/// `\r\n` and lone `\r` both become `\n`
pub fn normalize_line_endings(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            result.push('\n');
        } else {
            result.push(ch);
        }
    }
    result
}

/// Split on runs of blank lines; each block becomes one paragraph
pub fn normalize_plain(text: &str) -> NormalizedDocument {
    let mut builder = DocumentBuilder::new();
    let mut current = String::new();

    for line in text.split('\n') {
        if line.trim().is_empty() {
            if !current.is_empty() {
                builder.push(RawBlock::Paragraph(std::mem::take(&mut current)));
            }
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }
    if !current.is_empty() {
        builder.push(RawBlock::Paragraph(current));
    }

    builder.finish()
}

/// Collapse every whitespace run (including newlines) to one space and trim both ends
pub fn collapse_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    collapse_whitespace_into(text, &mut result);
    result
}

/// Collapse whitespace into a supplied buffer to avoid allocation per block
pub fn collapse_whitespace_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());

    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            pending_space = !buffer.is_empty();
        } else {
            if pending_space {
                buffer.push(' ');
                pending_space = false;
            }
            buffer.push(ch);
        }
    }
}
