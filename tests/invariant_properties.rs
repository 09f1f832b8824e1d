// WHY: Output guarantees checked across a mixed corpus, independently of the
// tokenizer's own validation pass

use rsvp_tokenizer::{BreakKind, Language, SourceKind, TokenizeRequest, TokenizedDocument, Tokenizer};

const CORPUS: &[(&str, SourceKind)] = &[
    ("Dr. Smith said, \"Hello!\" She replied.", SourceKind::Plain),
    ("First paragraph.\n\nSecond paragraph.", SourceKind::Plain),
    ("Intro.\n\n# Heading\nMore text.", SourceKind::Markdown),
    ("", SourceKind::Plain),
    ("\u{2014} \u{2014} \u{2014}", SourceKind::Plain),
    ("(Parenthetical aside.) Then \u{201C}quoted,\u{201D} she said\u{2026} well\u{2014}known facts.", SourceKind::Plain),
    ("Am 3. Oktober 1990 \u{2013} ein Feiertag. \u{201E}Sch\u{F6}n!\u{201C}, rief sie.", SourceKind::Plain),
    ("Line one\r\nline two\r\n\r\n\r\nNew block\u{3000}with ideographic space.", SourceKind::Plain),
    (
        "## Title ##\n\n> quoted *text*\n\n```rust\nfn main() {}\n```\n\n1. first\n2) second\n\n---\n\nEnd [link](x).",
        SourceKind::Markdown,
    ),
    ("It cost $1,000 at 10:30 a.m. on the U.S. coast; e.g. twice.", SourceKind::Plain),
    ("\u{65E5}\u{672C}\u{8A9E} text \u{1F980} crab emoji: ok!", SourceKind::Plain),
    ("Unterminated `code and *emphasis\n\n# ", SourceKind::Markdown),
];

fn all_documents() -> Vec<TokenizedDocument> {
    let tokenizer = Tokenizer::new().expect("Tokenizer should build");
    let mut documents = Vec::new();
    for &(text, source_kind) in CORPUS {
        for language in [Language::English, Language::German] {
            let request = TokenizeRequest::new(text, language, source_kind);
            documents.push(tokenizer.tokenize(&request).expect("Corpus text should tokenize"));
        }
    }
    documents
}

#[test]
fn test_offsets_index_the_normalized_text() {
    for doc in all_documents() {
        let chars: Vec<char> = doc.text.chars().collect();
        for token in &doc.tokens {
            assert!(token.char_start < token.char_end, "{:?}", token);
            assert!(token.char_end <= chars.len(), "{:?}", token);
            let slice: String = chars[token.char_start..token.char_end].iter().collect();
            assert_eq!(slice, token.display_text);
            assert!(!token.display_text.chars().any(char::is_whitespace));
        }
    }
}

#[test]
fn test_tokens_are_ordered_and_never_overlap() {
    for doc in all_documents() {
        for (i, pair) in doc.tokens.windows(2).enumerate() {
            assert!(pair[1].char_start >= pair[0].char_end, "overlap at {} in {:?}", i, doc.text);
        }
        for (i, token) in doc.tokens.iter().enumerate() {
            assert_eq!(token.word_index, i);
        }
    }
}

#[test]
fn test_first_token_has_no_break_and_starts_everything() {
    for doc in all_documents() {
        if let Some(first) = doc.tokens.first() {
            assert_eq!(first.break_before, BreakKind::None);
            assert!(first.is_sentence_start);
            assert!(first.is_block_start);
            assert_eq!(doc.block_starts.first(), Some(&first.char_start));
        }
    }
}

#[test]
fn test_block_starts_match_flags() {
    for doc in all_documents() {
        let flagged: Vec<usize> = doc
            .tokens
            .iter()
            .filter(|t| t.is_block_start)
            .map(|t| t.char_start)
            .collect();
        assert_eq!(flagged, doc.block_starts, "in {:?}", doc.text);

        for token in doc.tokens.iter().skip(1) {
            assert_eq!(token.is_block_start, token.break_before != BreakKind::None);
            if token.is_block_start {
                assert!(token.is_sentence_start);
            }
        }

        for heading in &doc.heading_starts {
            assert!(doc.block_starts.contains(&heading.offset));
            assert!((1..=6).contains(&heading.level));
        }
    }
}

#[test]
fn test_focus_and_delay_bounds() {
    for doc in all_documents() {
        for token in &doc.tokens {
            assert!(token.focus_index < token.display_text.chars().count(), "{:?}", token);
            assert!(token.delay_multiplier >= 1.0, "{:?}", token);
            assert!(token.delay_multiplier <= 2.5 * 1.2 + 1e-9, "{:?}", token);
        }
    }
}

#[test]
fn test_deterministic_and_thread_safe() {
    let tokenizer = std::sync::Arc::new(Tokenizer::new().unwrap());
    let baseline = all_documents();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let tokenizer = std::sync::Arc::clone(&tokenizer);
            std::thread::spawn(move || {
                let mut documents = Vec::new();
                for &(text, source_kind) in CORPUS {
                    for language in [Language::English, Language::German] {
                        let request = TokenizeRequest::new(text, language, source_kind);
                        documents.push(tokenizer.tokenize(&request).unwrap());
                    }
                }
                documents
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), baseline);
    }
}

#[test]
fn test_json_roundtrip_preserves_documents() {
    for doc in all_documents() {
        let json = serde_json::to_string(&doc).unwrap();
        let back: TokenizedDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
