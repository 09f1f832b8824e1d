// WHY: Single forward pass that turns normalized text into word-with-punctuation spans
// carrying exact char offsets, so every later stage can slice by position

use super::punctuation::{
    classify, is_connector, is_leading, is_numeric_connector, is_strippable, is_terminal, is_trailing,
    is_word_char, CharClass,
};

/// One raw word-with-punctuation unit before it becomes a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySpan {
    /// Exact substring of the normalized text from `char_start` to `char_end`
    pub display_text: String,
    /// Display text without leading/trailing quotes, brackets and terminal punctuation
    pub clean_text: String,
    pub char_start: usize,
    /// Exclusive
    pub char_end: usize,
}

impl DisplaySpan {
    fn from_chars(chars: &[char], start: usize, end: usize) -> Self {
        let display_text: String = chars[start..end].iter().collect();
        let clean_text = display_text.trim_matches(is_strippable).to_string();
        Self {
            display_text,
            clean_text,
            char_start: start,
            char_end: end,
        }
    }

    pub fn char_len(&self) -> usize {
        self.char_end - self.char_start
    }
}

/// Lazy span iterator over normalized text. Restart by calling `segment` again.
pub struct Segmenter {
    chars: Vec<char>,
    pos: usize,
    in_fragment: bool,
    dropped_fragments: usize,
}

/// Segment normalized text into display spans
pub fn segment(text: &str) -> Segmenter {
    Segmenter {
        chars: text.chars().collect(),
        pos: 0,
        in_fragment: false,
        dropped_fragments: 0,
    }
}

impl Segmenter {
    /// Runs of punctuation skipped so far because no word character was adjacent
    pub fn dropped_fragments(&self) -> usize {
        self.dropped_fragments
    }

    fn close_fragment(&mut self) {
        if self.in_fragment {
            self.dropped_fragments += 1;
            self.in_fragment = false;
        }
    }

    /// End of the span starting at `start`, or None if no word follows the leading run
    fn match_span(&self, start: usize) -> Option<usize> {
        let chars = &self.chars;
        let n = chars.len();
        let mut p = start;

        while p < n && is_leading(chars[p]) {
            p += 1;
        }
        if p >= n || classify(chars[p]) != CharClass::Word {
            return None;
        }

        // word characters, joined by connectors
        while p < n {
            let c = chars[p];
            if is_word_char(c) {
                p += 1;
            } else if p + 1 < n && is_connector(c) && is_word_char(chars[p + 1]) {
                p += 2;
            } else if p > 0
                && p + 1 < n
                && is_numeric_connector(c)
                && chars[p - 1].is_numeric()
                && chars[p + 1].is_numeric()
            {
                p += 2;
            } else {
                break;
            }
        }

        // terminal run then closer run, repeated: `word.")` and `(above).`
        loop {
            let before = p;
            while p < n && is_terminal(chars[p]) {
                p += 1;
            }
            while p < n && is_trailing(chars[p]) {
                p += 1;
            }
            if p == before {
                break;
            }
        }

        Some(p)
    }
}

impl Iterator for Segmenter {
    type Item = DisplaySpan;

    fn next(&mut self) -> Option<DisplaySpan> {
        while self.pos < self.chars.len() {
            let c = self.chars[self.pos];

            if c.is_whitespace() {
                self.close_fragment();
                self.pos += 1;
                continue;
            }

            if let Some(end) = self.match_span(self.pos) {
                self.close_fragment();
                let span = DisplaySpan::from_chars(&self.chars, self.pos, end);
                self.pos = end;
                return Some(span);
            }

            self.in_fragment = true;
            self.pos += 1;
        }

        self.close_fragment();
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn displays(text: &str) -> Vec<String> {
        segment(text).map(|s| s.display_text).collect()
    }

    #[test]
    fn test_basic_spans_with_offsets() {
        let spans: Vec<_> = segment("Hello, world!").collect();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].display_text, "Hello,");
        assert_eq!(spans[0].clean_text, "Hello");
        assert_eq!((spans[0].char_start, spans[0].char_end), (0, 6));
        assert_eq!(spans[1].display_text, "world!");
        assert_eq!((spans[1].char_start, spans[1].char_end), (7, 13));
    }

    #[test]
    fn test_quotes_and_brackets_attach() {
        let spans: Vec<_> = segment("Dr. Smith said, \"Hello!\" (quietly).").collect();
        let texts: Vec<_> = spans.iter().map(|s| s.display_text.as_str()).collect();
        assert_eq!(texts, vec!["Dr.", "Smith", "said,", "\"Hello!\"", "(quietly)."]);
        assert_eq!(spans[3].clean_text, "Hello");
        assert_eq!(spans[4].clean_text, "quietly");
    }

    #[test]
    fn test_connectors_keep_words_joined() {
        assert_eq!(
            displays("don't well-known U.S.A. 3.14 rock\u{2019}n\u{2019}roll"),
            vec!["don't", "well-known", "U.S.A.", "3.14", "rock\u{2019}n\u{2019}roll"]
        );
        let spans: Vec<_> = segment("U.S.A.").collect();
        assert_eq!(spans[0].clean_text, "U.S.A");
    }

    #[test]
    fn test_numeric_connectors() {
        assert_eq!(displays("1,000 people at 10:30, then"), vec!["1,000", "people", "at", "10:30,", "then"]);
        assert_eq!(displays("red,blue"), vec!["red,", "blue"]);
    }

    #[test]
    fn test_ellipsis_units() {
        assert_eq!(displays("Wait... what\u{2026} now?!"), vec!["Wait...", "what\u{2026}", "now?!"]);
    }

    #[test]
    fn test_isolated_punctuation_dropped() {
        let mut seg = segment("one \u{2014} two * three - ");
        let texts: Vec<_> = seg.by_ref().map(|s| s.display_text).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert_eq!(seg.dropped_fragments(), 3);
    }

    #[test]
    fn test_dash_between_words_touches() {
        let spans: Vec<_> = segment("well\u{2014}known").collect();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].display_text, "well\u{2014}");
        assert_eq!(spans[0].char_end, spans[1].char_start);
    }

    #[test]
    fn test_offsets_are_char_based() {
        let text = "Grüße, „Köln“ ist schön.";
        let chars: Vec<char> = text.chars().collect();
        for span in segment(text) {
            let slice: String = chars[span.char_start..span.char_end].iter().collect();
            assert_eq!(slice, span.display_text);
            assert!(!span.clean_text.is_empty());
        }
        assert_eq!(displays(text), vec!["Grüße,", "„Köln“", "ist", "schön."]);
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        assert!(displays("").is_empty());
        let mut seg = segment("... !!! \"\"");
        assert!(seg.next().is_none());
        assert_eq!(seg.dropped_fragments(), 3);
    }

    #[test]
    fn test_restartable() {
        let text = "Same input twice.";
        let first: Vec<_> = segment(text).collect();
        let second: Vec<_> = segment(text).collect();
        assert_eq!(first, second);
    }
}
