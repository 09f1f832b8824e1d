// WHY: Lossy, line-oriented Markdown projection to plain paragraphs and headings.
// Never fails on malformed input; unterminated constructs run to end of document.

use regex_automata::meta::Regex;
use tracing::debug;

use super::normalization::{DocumentBuilder, NormalizedDocument, RawBlock};
use crate::error::{Result, TokenizeError};

/// One inline rewrite: every match is replaced by the listed capture groups
struct InlineRule {
    name: &'static str,
    regex: Regex,
    keep_groups: &'static [usize],
}

/// Open code fence: marker character and run length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: char,
    len: usize,
}

/// Compiled Markdown reducer, built once and shared across documents
pub struct MarkdownReducer {
    inline_rules: Vec<InlineRule>,
}

impl MarkdownReducer {
    pub fn new() -> Result<Self> {
        // Order matters: escapes first, then code, then constructs that wrap text
        let specs: &[(&'static str, &str, &'static [usize])] = &[
            ("escape", r"\\([!-/:-@\[-`{-~])", &[1]),
            ("html_comment", r"<!--[\s\S]*?-->", &[]),
            ("inline_code", r"`+([^`]*)`+", &[1]),
            ("image", r"!\[([^\]]*)\]\([^)]*\)", &[1]),
            ("link", r"\[([^\]]*)\]\([^)]*\)", &[1]),
            ("reference_link", r"\[([^\]]+)\]\[[^\]]*\]", &[1]),
            ("autolink", r"<((?:https?|ftp|mailto):[^>\s]+)>", &[1]),
            ("html_tag", r"</?[A-Za-z][A-Za-z0-9-]*(?:\s[^<>]*)?/?>", &[]),
            ("strong_star", r"\*\*([^*]+)\*\*", &[1]),
            ("strong_underscore", r"__([^_]+)__", &[1]),
            ("strikethrough", r"~~([^~]+)~~", &[1]),
            ("emphasis_star", r"\*([^*\s][^*]*)\*", &[1]),
            ("emphasis_underscore", r"(^|[^\p{L}\p{N}])_([^_\s][^_]*)_", &[1, 2]),
        ];

        let mut inline_rules = Vec::with_capacity(specs.len());
        for &(name, pattern, keep_groups) in specs {
            let regex = Regex::new(pattern)
                .map_err(|e| TokenizeError::Pattern(format!("{name}: {e}")))?;
            inline_rules.push(InlineRule { name, regex, keep_groups });
        }

        debug!("Compiled {} inline markdown rules", inline_rules.len());
        Ok(Self { inline_rules })
    }

    /// Reduce Markdown (line endings already normalized) to a flat document
    pub fn reduce(&self, text: &str) -> NormalizedDocument {
        let mut builder = DocumentBuilder::new();
        let mut paragraph = String::new();
        let mut open_fence: Option<Fence> = None;

        for line in text.split('\n') {
            if let Some(fence) = open_fence {
                if closes_fence(line, fence) {
                    open_fence = None;
                }
                continue;
            }

            if let Some(fence) = opens_fence(line) {
                self.flush(&mut builder, &mut paragraph);
                open_fence = Some(fence);
                continue;
            }

            let line = strip_blockquote(line);

            if line.trim().is_empty() {
                self.flush(&mut builder, &mut paragraph);
                continue;
            }

            if is_horizontal_rule(line) {
                self.flush(&mut builder, &mut paragraph);
                continue;
            }

            if let Some((level, content)) = parse_heading(line) {
                self.flush(&mut builder, &mut paragraph);
                builder.push(RawBlock::Heading {
                    level,
                    text: self.reduce_inline(content),
                });
                continue;
            }

            if let Some(content) = parse_list_item(line) {
                self.flush(&mut builder, &mut paragraph);
                paragraph.push_str(content);
                continue;
            }

            if !paragraph.is_empty() {
                paragraph.push('\n');
            }
            paragraph.push_str(line);
        }

        if open_fence.is_some() {
            debug!("Unterminated code fence dropped through end of document");
        }
        self.flush(&mut builder, &mut paragraph);
        builder.finish()
    }

    fn flush(&self, builder: &mut DocumentBuilder, paragraph: &mut String) {
        if paragraph.is_empty() {
            return;
        }
        let reduced = self.reduce_inline(paragraph);
        paragraph.clear();
        builder.push(RawBlock::Paragraph(reduced));
    }

    /// Strip inline formatting, keeping the visible text
    pub fn reduce_inline(&self, text: &str) -> String {
        let mut current = text.to_string();
        for rule in &self.inline_rules {
            if rule.regex.is_match(current.as_str()) {
                current = replace_with_groups(&rule.regex, &current, rule.keep_groups);
                debug!(rule = rule.name, "Applied inline markdown rule");
            }
        }
        current
    }
}

/// Replace each match with the concatenation of the selected capture groups
fn replace_with_groups(regex: &Regex, text: &str, keep_groups: &[usize]) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_end = 0;

    for caps in regex.captures_iter(text) {
        let Some(whole) = caps.get_match() else {
            continue;
        };
        result.push_str(&text[last_end..whole.start()]);
        for &group in keep_groups {
            if let Some(span) = caps.get_group(group) {
                result.push_str(&text[span.start..span.end]);
            }
        }
        last_end = whole.end();
    }

    result.push_str(&text[last_end..]);
    result
}

/// Leading indentation of at most three spaces, as Markdown allows for block markers
fn strip_block_indent(line: &str) -> Option<&str> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() <= 3 {
        Some(trimmed)
    } else {
        None
    }
}

fn opens_fence(line: &str) -> Option<Fence> {
    let trimmed = strip_block_indent(line)?;
    let marker = trimmed.chars().next().filter(|&c| c == '`' || c == '~')?;
    let len = trimmed.chars().take_while(|&c| c == marker).count();
    if len < 3 {
        return None;
    }
    // backtick fences may not carry backticks in their info string
    if marker == '`' && trimmed[len..].contains('`') {
        return None;
    }
    Some(Fence { marker, len })
}

fn closes_fence(line: &str, fence: Fence) -> bool {
    let Some(trimmed) = strip_block_indent(line) else {
        return false;
    };
    let len = trimmed.chars().take_while(|&c| c == fence.marker).count();
    len >= fence.len && trimmed[len * fence.marker.len_utf8()..].trim().is_empty()
}

fn strip_blockquote(mut line: &str) -> &str {
    while let Some(rest) = strip_block_indent(line).and_then(|l| l.strip_prefix('>')) {
        line = rest.strip_prefix(' ').unwrap_or(rest);
    }
    line
}

fn is_horizontal_rule(line: &str) -> bool {
    let Some(trimmed) = strip_block_indent(line) else {
        return false;
    };
    let mut marks = trimmed.chars().filter(|c| !matches!(c, ' ' | '\t'));
    let Some(first) = marks.next() else {
        return false;
    };
    if !matches!(first, '-' | '*' | '_') {
        return false;
    }
    let mut count = 1;
    for c in marks {
        if c != first {
            return false;
        }
        count += 1;
    }
    count >= 3
}

fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let trimmed = strip_block_indent(line)?;
    let level = trimmed.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.starts_with([' ', '\t']) {
        return None;
    }

    // optional closing sequence: "## Title ##"
    let content = rest.trim();
    let without_closing = content.trim_end_matches('#');
    let content = if without_closing.is_empty() || without_closing.ends_with([' ', '\t']) {
        without_closing.trim_end()
    } else {
        content
    };
    Some((level as u8, content))
}

fn parse_list_item(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();

    let after_marker = if let Some(rest) = trimmed.strip_prefix(['-', '*', '+']) {
        rest
    } else {
        let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 || digits > 9 {
            return None;
        }
        trimmed[digits..].strip_prefix(['.', ')'])?
    };

    if !after_marker.is_empty() && !after_marker.starts_with([' ', '\t']) {
        return None;
    }

    let content = after_marker.trim_start();
    let content = ["[ ] ", "[x] ", "[X] "]
        .iter()
        .find_map(|task| content.strip_prefix(task))
        .unwrap_or(content);
    Some(content)
}
