// WHY: One closed set per punctuation category so every stage asks the same question
// the same way, and language-specific additions stay in one place

/// Category of a non-word character as seen by the segmenter and classifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Letters and digits
    Word,
    /// Quotation marks; may open or close a span
    Quote,
    /// Opening bracket
    Opener,
    /// Closing bracket
    Closer,
    /// Punctuation that may end a word: sentence enders and pause marks
    Terminal,
    Other,
}

/// Terminal mark found at the end of a span once trailing closers are removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalMark {
    Period,
    Question,
    Exclamation,
    /// `...` run or U+2026
    Ellipsis,
    Comma,
    Semicolon,
    Colon,
    EmDash,
    EnDash,
}

/// Pause weight a terminal mark earns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseClass {
    Major,
    Minor,
    None,
}

pub const ELLIPSIS: char = '\u{2026}';

/// Classify a single character
pub fn classify(c: char) -> CharClass {
    if is_quote(c) {
        CharClass::Quote
    } else if is_opener(c) {
        CharClass::Opener
    } else if is_closer(c) {
        CharClass::Closer
    } else if is_terminal(c) {
        CharClass::Terminal
    } else if is_word_char(c) {
        CharClass::Word
    } else {
        CharClass::Other
    }
}

pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// Quote characters. German opens with U+201E and closes with U+201C, so every
/// quote is accepted on both sides of a word.
pub fn is_quote(c: char) -> bool {
    matches!(
        c,
        '"' | '\''
            | '\u{201C}' | '\u{201D}' // “ ”
            | '\u{2018}' | '\u{2019}' // ‘ ’
            | '\u{201E}' | '\u{201A}' // „ ‚
            | '\u{00AB}' | '\u{00BB}' // « »
            | '\u{2039}' | '\u{203A}' // ‹ ›
    )
}

pub fn is_opener(c: char) -> bool {
    matches!(c, '(' | '[' | '{')
}

pub fn is_closer(c: char) -> bool {
    matches!(c, ')' | ']' | '}')
}

/// Characters allowed before the first word character of a span
pub fn is_leading(c: char) -> bool {
    is_quote(c) || is_opener(c)
}

/// Characters allowed after the terminal punctuation of a span
pub fn is_trailing(c: char) -> bool {
    is_quote(c) || is_closer(c)
}

pub fn is_terminal(c: char) -> bool {
    matches!(
        c,
        '.' | '?' | '!' | ',' | ';' | ':' | ELLIPSIS | '\u{2014}' | '\u{2013}'
    )
}

/// Joins word characters inside a span when followed by another word character
pub fn is_connector(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}' | '-' | '\u{2010}' | '\u{2011}' | '.')
}

/// Joins digit runs only: "1,000" and "10:30" stay one word
pub fn is_numeric_connector(c: char) -> bool {
    matches!(c, ',' | ':')
}

/// Anything `clean_text` trims from either end of a span
pub fn is_strippable(c: char) -> bool {
    is_quote(c) || is_opener(c) || is_closer(c) || is_terminal(c)
}

/// Remove trailing quotes and brackets to expose the real terminal character
pub fn strip_trailing_closers(text: &str) -> &str {
    text.trim_end_matches(is_trailing)
}

/// Remove leading quotes and brackets
pub fn strip_leading_openers(text: &str) -> &str {
    text.trim_start_matches(is_leading)
}

/// Terminal mark of a span's display text, looking through closing quotes/brackets
pub fn terminal_mark(display_text: &str) -> Option<TerminalMark> {
    let core = strip_trailing_closers(display_text);
    if core.ends_with("...") {
        return Some(TerminalMark::Ellipsis);
    }
    match core.chars().next_back()? {
        '.' => Some(TerminalMark::Period),
        '?' => Some(TerminalMark::Question),
        '!' => Some(TerminalMark::Exclamation),
        ELLIPSIS => Some(TerminalMark::Ellipsis),
        ',' => Some(TerminalMark::Comma),
        ';' => Some(TerminalMark::Semicolon),
        ':' => Some(TerminalMark::Colon),
        '\u{2014}' => Some(TerminalMark::EmDash),
        '\u{2013}' => Some(TerminalMark::EnDash),
        _ => None,
    }
}

impl TerminalMark {
    /// Marks that can close a sentence
    pub fn ends_sentence(self) -> bool {
        matches!(
            self,
            TerminalMark::Period | TerminalMark::Question | TerminalMark::Exclamation | TerminalMark::Ellipsis
        )
    }

    pub fn pause_class(self) -> PauseClass {
        match self {
            TerminalMark::Period | TerminalMark::Question | TerminalMark::Exclamation | TerminalMark::Ellipsis => {
                PauseClass::Major
            }
            TerminalMark::Comma | TerminalMark::Semicolon | TerminalMark::EmDash | TerminalMark::EnDash => {
                PauseClass::Minor
            }
            TerminalMark::Colon => PauseClass::None,
        }
    }
}
