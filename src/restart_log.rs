use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

use crate::incremental::{aux_file_exists, aux_is_current};

const LOG_FILE_NAME: &str = ".rsvp_tokenizer_restart.json";

/// Tracks successfully tokenized files across runs
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct RestartLog {
    completed_files: HashSet<String>,
    /// Seconds since the Unix epoch
    last_updated: u64,
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl RestartLog {
    /// Load the log from `root_dir`, or start empty if it is missing or unreadable
    pub async fn load(root_dir: &Path) -> Self {
        let log_path = Self::get_log_path(root_dir);

        match fs::read_to_string(&log_path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring malformed restart log {}: {}", log_path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub async fn save(&self, root_dir: &Path) -> Result<()> {
        let log_path = Self::get_log_path(root_dir);
        let content = serde_json::to_string_pretty(self)?;

        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&log_path, content).await?;
        Ok(())
    }

    pub fn is_completed(&self, file_path: &Path) -> bool {
        self.completed_files.contains(file_path.to_string_lossy().as_ref())
    }

    pub fn mark_completed(&mut self, file_path: &Path) {
        self.completed_files.insert(file_path.to_string_lossy().to_string());
        self.last_updated = now_secs();
    }

    pub fn get_completed_files(&self) -> Vec<PathBuf> {
        self.completed_files.iter().map(PathBuf::from).collect()
    }

    pub fn completed_count(&self) -> usize {
        self.completed_files.len()
    }

    /// Forget everything, forcing a full re-run
    pub fn clear(&mut self) {
        self.completed_files.clear();
        self.last_updated = now_secs();
    }

    pub fn get_log_path(root_dir: &Path) -> PathBuf {
        root_dir.join(LOG_FILE_NAME)
    }

    /// Drop entries whose source vanished or whose aux output is missing or stale.
    /// Returns the dropped paths.
    pub fn verify_completed_files(&mut self) -> Vec<PathBuf> {
        let mut invalid_files = Vec::new();

        self.completed_files.retain(|file_path_str| {
            let file_path = Path::new(file_path_str);
            let valid = file_path.exists() && aux_is_current(file_path);
            if !valid {
                invalid_files.push(file_path.to_path_buf());
            }
            valid
        });

        invalid_files
    }
}

/// Skip files whose aux output is complete and current. Logged entries only need the aux
/// file to exist since `verify_completed_files` already dropped stale ones.
pub fn should_process_file(file_path: &Path, restart_log: &RestartLog, overwrite_all: bool) -> bool {
    if overwrite_all {
        return true;
    }
    if restart_log.is_completed(file_path) && aux_file_exists(file_path) {
        return false;
    }
    !aux_is_current(file_path)
}
