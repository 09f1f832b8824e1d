use crate::error::{Result, TokenizeError};

/// Index into `clean_text` of the focus character, by word length in chars
pub fn clean_focus_index(clean_len: usize) -> usize {
    match clean_len {
        0..=2 => 0,
        // floor(len * 0.35) and floor(len * 0.40) in integer arithmetic
        3..=5 => clean_len * 35 / 100,
        _ => clean_len * 2 / 5,
    }
}

/// Char index into `display_text` of the character held at the visual anchor.
///
/// Fails if `clean_text` does not occur in `display_text` (case-insensitive); the
/// segmenter guarantees it does, so a failure is an internal bug.
pub fn focus_point(display_text: &str, clean_text: &str) -> Result<usize> {
    let not_found = || TokenizeError::FocusPointNotFound {
        display: display_text.to_string(),
        clean: clean_text.to_string(),
    };

    let display: Vec<char> = display_text.chars().collect();
    let clean: Vec<char> = clean_text.chars().collect();
    if clean.is_empty() || clean.len() > display.len() {
        return Err(not_found());
    }

    let offset = (0..=display.len() - clean.len())
        .find(|&start| {
            display[start..start + clean.len()]
                .iter()
                .zip(&clean)
                .all(|(a, b)| a.to_lowercase().eq(b.to_lowercase()))
        })
        .ok_or_else(not_found)?;

    Ok(offset + clean_focus_index(clean.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_index_table() {
        let expected = [(1, 0), (2, 0), (3, 1), (4, 1), (5, 1), (6, 2), (7, 2), (8, 3), (10, 4), (13, 5)];
        for (len, idx) in expected {
            assert_eq!(clean_focus_index(len), idx, "length {}", len);
        }
    }

    #[test]
    fn test_focus_skips_leading_punctuation() {
        assert_eq!(focus_point("\"Hello!\"", "Hello").unwrap(), 2);
        assert_eq!(focus_point("a", "a").unwrap(), 0);
        assert_eq!(focus_point("(reading),", "reading").unwrap(), 3);
    }

    #[test]
    fn test_focus_case_insensitive() {
        assert_eq!(focus_point("HELLO", "hello").unwrap(), 1);
        assert!(focus_point("„Straße“", "STRASSE").is_err());
        assert_eq!(focus_point("„Straße“", "straße").unwrap(), 3);
    }

    #[test]
    fn test_focus_missing_clean_fails_loudly() {
        let err = focus_point("word", "other").unwrap_err();
        assert!(matches!(err, TokenizeError::FocusPointNotFound { .. }));
        assert!(focus_point("word", "").is_err());
    }

    #[test]
    fn test_focus_always_in_bounds() {
        for word in ["I", "ox", "cat", "house", "\"extraordinary\"", "(a)."] {
            let clean = word.trim_matches(|c: char| !c.is_alphanumeric());
            let idx = focus_point(word, clean).unwrap();
            assert!(idx < word.chars().count(), "{} -> {}", word, idx);
        }
    }
}
