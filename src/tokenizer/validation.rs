// WHY: Downstream rendering relies on these invariants exactly; a violation means a
// segmentation or normalization bug and must surface instead of being patched over

use super::{BreakKind, Token};
use crate::error::{Result, TokenizeError};

fn violation(word_index: usize, detail: impl Into<String>) -> TokenizeError {
    TokenizeError::InvariantViolation {
        word_index,
        detail: detail.into(),
    }
}

/// Check every output invariant against the normalized text and recorded block offsets
pub fn validate_tokens(text: &str, tokens: &[Token], block_starts: &[usize]) -> Result<()> {
    if block_starts.windows(2).any(|w| w[0] >= w[1]) {
        return Err(violation(0, "block offsets are not strictly increasing"));
    }

    let chars: Vec<char> = text.chars().collect();
    let mut previous_end: Option<usize> = None;

    for (i, token) in tokens.iter().enumerate() {
        if token.word_index != i {
            return Err(violation(i, format!("word_index {} out of sequence", token.word_index)));
        }

        if i == 0 && token.break_before != BreakKind::None {
            return Err(violation(i, "first token carries a break"));
        }

        let display_len = token.display_text.chars().count();
        if display_len == 0 {
            return Err(violation(i, "empty display text"));
        }

        if token.char_start >= token.char_end || token.char_end > chars.len() {
            return Err(violation(
                i,
                format!("offsets {}..{} outside text of {} chars", token.char_start, token.char_end, chars.len()),
            ));
        }

        let slice: String = chars[token.char_start..token.char_end].iter().collect();
        if slice != token.display_text {
            return Err(violation(
                i,
                format!("text at {}..{} is {:?}, token says {:?}", token.char_start, token.char_end, slice, token.display_text),
            ));
        }

        if token.focus_index >= display_len {
            return Err(violation(
                i,
                format!("focus index {} outside {:?}", token.focus_index, token.display_text),
            ));
        }

        if let Some(end) = previous_end {
            // char_end is exclusive, so a token starting exactly at the previous end
            // touches it without overlapping
            if token.char_start < end {
                return Err(violation(i, format!("starts at {} before previous token ends at {}", token.char_start, end)));
            }
        }
        previous_end = Some(token.char_end);

        let recorded = block_starts.binary_search(&token.char_start).is_ok();
        if token.is_block_start != recorded {
            return Err(violation(
                i,
                format!("is_block_start={} but offset {} recorded={}", token.is_block_start, token.char_start, recorded),
            ));
        }

        if i > 0 && token.is_block_start == (token.break_before == BreakKind::None) {
            return Err(violation(i, "break_before disagrees with is_block_start"));
        }

        if token.is_block_start && !token.is_sentence_start {
            return Err(violation(i, "block start is not a sentence start"));
        }

        if !token.delay_multiplier.is_finite() || token.delay_multiplier < 1.0 {
            return Err(violation(i, format!("delay multiplier {} below 1.0", token.delay_multiplier)));
        }
    }

    Ok(())
}
