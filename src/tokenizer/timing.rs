// WHY: Layered delay model: punctuation picks the base pause, abbreviations downgrade
// a period, and long words stretch whatever base was chosen

use super::abbreviations::AbbreviationChecker;
use super::punctuation::{terminal_mark, PauseClass, TerminalMark};
use super::BreakKind;

pub const MAJOR_PAUSE: f64 = 2.5;
pub const MINOR_PAUSE: f64 = 1.5;
pub const NO_PAUSE: f64 = 1.0;
/// Words longer than this many chars get the long-word factor
pub const LONG_WORD_THRESHOLD: usize = 8;
pub const LONG_WORD_FACTOR: f64 = 1.2;
pub const PARAGRAPH_BREAK_MULTIPLIER: f64 = 3.0;
pub const HEADING_BREAK_MULTIPLIER: f64 = 3.5;

/// Per-word delay multiplier, always >= 1.0
pub fn delay_multiplier(display_text: &str, clean_text: &str, checker: &AbbreviationChecker) -> f64 {
    let base = match terminal_mark(display_text) {
        Some(TerminalMark::Period) if checker.suppresses_period(clean_text) => MINOR_PAUSE,
        Some(mark) => match mark.pause_class() {
            PauseClass::Major => MAJOR_PAUSE,
            PauseClass::Minor => MINOR_PAUSE,
            PauseClass::None => NO_PAUSE,
        },
        None => NO_PAUSE,
    };

    if clean_text.chars().count() > LONG_WORD_THRESHOLD {
        base * LONG_WORD_FACTOR
    } else {
        base
    }
}

impl BreakKind {
    /// Blank-interval weight rendered before a token with this break.
    /// Playback owns the final lookup; these are the reference values.
    pub fn multiplier(self) -> Option<f64> {
        match self {
            BreakKind::None => None,
            BreakKind::Paragraph => Some(PARAGRAPH_BREAK_MULTIPLIER),
            BreakKind::Heading => Some(HEADING_BREAK_MULTIPLIER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Language;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn english() -> AbbreviationChecker {
        AbbreviationChecker::new(Language::English)
    }

    #[test]
    fn test_punctuation_bases() {
        let checker = english();
        assert!(approx(delay_multiplier("end.", "end", &checker), MAJOR_PAUSE));
        assert!(approx(delay_multiplier("why?", "why", &checker), MAJOR_PAUSE));
        assert!(approx(delay_multiplier("so...", "so", &checker), MAJOR_PAUSE));
        assert!(approx(delay_multiplier("so\u{2026}", "so", &checker), MAJOR_PAUSE));
        assert!(approx(delay_multiplier("then,", "then", &checker), MINOR_PAUSE));
        assert!(approx(delay_multiplier("then;", "then", &checker), MINOR_PAUSE));
        assert!(approx(delay_multiplier("well\u{2014}", "well", &checker), MINOR_PAUSE));
        assert!(approx(delay_multiplier("pages\u{2013}", "pages", &checker), MINOR_PAUSE));
        assert!(approx(delay_multiplier("note:", "note", &checker), NO_PAUSE));
        assert!(approx(delay_multiplier("plain", "plain", &checker), NO_PAUSE));
    }

    #[test]
    fn test_hidden_behind_closers() {
        let checker = english();
        assert!(approx(delay_multiplier("\"Hello!\"", "Hello", &checker), MAJOR_PAUSE));
        assert!(approx(delay_multiplier("(aside),", "aside", &checker), MINOR_PAUSE));
        assert!(approx(delay_multiplier("(see.)", "see", &checker), MAJOR_PAUSE));
    }

    #[test]
    fn test_abbreviation_override() {
        let checker = english();
        assert!(approx(delay_multiplier("Dr.", "Dr", &checker), MINOR_PAUSE));
        assert!(approx(delay_multiplier("J.", "J", &checker), MINOR_PAUSE));
        // only a period is downgraded
        assert!(approx(delay_multiplier("Dr?", "Dr", &checker), MAJOR_PAUSE));
    }

    #[test]
    fn test_plain_words_and_numbers_keep_major_pause() {
        let english = english();
        assert!(approx(delay_multiplier("sat.", "sat", &english), MAJOR_PAUSE));
        assert!(approx(delay_multiplier("sun.", "sun", &english), MAJOR_PAUSE));

        let german = AbbreviationChecker::new(Language::German);
        assert!(approx(delay_multiplier("1990.", "1990", &german), MAJOR_PAUSE));
        assert!(approx(delay_multiplier("Buch.", "Buch", &german), MAJOR_PAUSE));
        assert!(approx(delay_multiplier("z.B.", "z.B", &german), MINOR_PAUSE));
    }

    #[test]
    fn test_long_word_bonus_composes() {
        let checker = english();
        assert!(approx(delay_multiplier("wonderful.", "wonderful", &checker), 3.0));
        assert!(approx(delay_multiplier("wonderful", "wonderful", &checker), 1.2));
        assert!(approx(delay_multiplier("eightchr.", "eightchr", &checker), MAJOR_PAUSE));
    }

    #[test]
    fn test_multiplier_never_below_one() {
        let checker = english();
        for word in ["a", "a,", "a.", "extraordinarily", "\u{201E}Wort\u{201C}"] {
            let clean = word.trim_matches(|c: char| !c.is_alphanumeric());
            assert!(delay_multiplier(word, clean, &checker) >= 1.0);
        }
    }

    #[test]
    fn test_break_multipliers() {
        assert_eq!(BreakKind::None.multiplier(), None);
        assert_eq!(BreakKind::Paragraph.multiplier(), Some(3.0));
        assert_eq!(BreakKind::Heading.multiplier(), Some(3.5));
    }
}
