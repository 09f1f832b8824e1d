// WHY: Helpers for the per-source aux files that hold tokenized output, shared by the
// batch processor, the restart log and tests

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::tokenizer::TokenizedDocument;

const AUX_SUFFIX: &str = "_tokens.json";

/// `<dir>/<stem>_tokens.json` next to the source file
pub fn generate_aux_file_path(source_path: &Path) -> PathBuf {
    let mut aux_path = source_path.to_path_buf();
    let file_stem = aux_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    aux_path.set_file_name(format!("{file_stem}{AUX_SUFFIX}"));
    aux_path
}

/// True for files this crate writes itself
pub fn is_aux_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(AUX_SUFFIX))
}

pub fn aux_file_exists<P: AsRef<Path>>(source_path: P) -> bool {
    generate_aux_file_path(source_path.as_ref()).exists()
}

/// Write the document as JSON; a complete aux file always ends with a newline
pub fn write_aux_document<P: AsRef<Path>>(source_path: P, document: &TokenizedDocument) -> Result<PathBuf> {
    let aux_path = generate_aux_file_path(source_path.as_ref());
    let mut content = serde_json::to_string(document)?;
    content.push('\n');
    fs::write(&aux_path, content).with_context(|| format!("Failed to write {}", aux_path.display()))?;
    Ok(aux_path)
}

/// Load a previously written aux document
pub fn read_aux_document<P: AsRef<Path>>(source_path: P) -> Result<TokenizedDocument> {
    let aux_path = generate_aux_file_path(source_path.as_ref());
    let content = fs::read_to_string(&aux_path).with_context(|| format!("Failed to read {}", aux_path.display()))?;
    if !content.ends_with('\n') {
        anyhow::bail!("Incomplete aux file {}", aux_path.display());
    }
    serde_json::from_str(&content).with_context(|| format!("Malformed aux file {}", aux_path.display()))
}

/// A complete aux file from the current tokenizer version exists, so the source can be skipped
pub fn aux_is_current<P: AsRef<Path>>(source_path: P) -> bool {
    read_aux_document(source_path).is_ok_and(|doc| !doc.is_stale())
}
