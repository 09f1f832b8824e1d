// WHY: Sentence starts are decided from the previous span's terminal mark and the
// current span's first letter; language differences live in the abbreviation checker

use super::abbreviations::AbbreviationChecker;
use super::punctuation::{strip_leading_openers, terminal_mark, TerminalMark};
use super::segmenter::DisplaySpan;

/// Block-level context of the current span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockPosition {
    /// First span of a paragraph or heading block
    BlockStart,
    Inside,
}

/// Punctuation-based verdict: does `current` open a sentence after `previous`?
pub fn punctuation_sentence_start(
    previous: Option<&DisplaySpan>,
    current: &DisplaySpan,
    checker: &AbbreviationChecker,
) -> bool {
    let Some(previous) = previous else {
        return true;
    };

    let Some(mark) = terminal_mark(&previous.display_text) else {
        return false;
    };
    if !mark.ends_sentence() {
        return false;
    }

    if mark == TerminalMark::Period && checker.suppresses_period(&previous.clean_text) {
        return false;
    }

    match strip_leading_openers(&current.display_text).chars().next() {
        Some(c) if c.is_uppercase() => true,
        Some(c) if c.is_lowercase() => checker.rules().nouns_capitalize,
        _ => true,
    }
}

/// Final verdict: block starts always open a sentence
pub fn is_sentence_start(
    previous: Option<&DisplaySpan>,
    current: &DisplaySpan,
    position: BlockPosition,
    checker: &AbbreviationChecker,
) -> bool {
    position == BlockPosition::BlockStart || punctuation_sentence_start(previous, current, checker)
}
