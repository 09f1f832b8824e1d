// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests
#![allow(dead_code)]

use rsvp_tokenizer::{incremental, BreakKind, TokenizedDocument};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary directory populated with source files
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();
        Self { temp_dir, root_path }
    }

    /// Write a source file, creating parent directories as needed
    pub fn create_source_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    pub fn aux_file_exists<P: AsRef<Path>>(&self, source_path: P) -> bool {
        incremental::aux_file_exists(source_path)
    }

    pub fn read_aux_file<P: AsRef<Path>>(&self, source_path: P) -> String {
        fs::read_to_string(incremental::generate_aux_file_path(source_path.as_ref()))
            .expect("Failed to read aux file")
    }

    /// Simulate an interrupted write: aux content without its trailing newline
    pub fn create_partial_aux_file<P: AsRef<Path>>(&self, source_path: P, content: &str) -> PathBuf {
        let aux_path = incremental::generate_aux_file_path(source_path.as_ref());
        fs::write(&aux_path, content.trim_end_matches('\n')).expect("Failed to write partial aux file");
        aux_path
    }

    pub fn restart_log_path(&self) -> PathBuf {
        rsvp_tokenizer::restart_log::RestartLog::get_log_path(&self.root_path)
    }
}

/// One line per token: index, display text, focus, delay, break, S (sentence) / B (block)
pub fn format_tokens(document: &TokenizedDocument) -> String {
    let mut output = String::new();
    for token in &document.tokens {
        let brk = match token.break_before {
            BreakKind::None => "-",
            BreakKind::Paragraph => "P",
            BreakKind::Heading => "H",
        };
        let flags = format!(
            "{}{}",
            if token.is_sentence_start { "S" } else { "" },
            if token.is_block_start { "B" } else { "" }
        );
        output.push_str(&format!(
            "{}\t{}\t{}\t{:.2}\t{}\t{}\n",
            token.word_index, token.display_text, token.focus_index, token.delay_multiplier, brk, flags
        ));
    }
    output
}

/// Compare two strings line by line, providing detailed diff on mismatch
pub fn assert_golden_file(actual: &str, expected: &str, context: &str) {
    let actual_lines: Vec<&str> = actual.lines().collect();
    let expected_lines: Vec<&str> = expected.lines().collect();

    if actual_lines.len() != expected_lines.len() {
        panic!(
            "{}: Line count mismatch. Expected {} lines, got {} lines\nActual:\n{}",
            context,
            expected_lines.len(),
            actual_lines.len(),
            actual
        );
    }

    for (i, (actual_line, expected_line)) in actual_lines.iter().zip(expected_lines.iter()).enumerate() {
        if actual_line != expected_line {
            panic!(
                "{}: Line {} mismatch\nExpected: {}\nActual:   {}",
                context,
                i + 1,
                expected_line,
                actual_line
            );
        }
    }
}
