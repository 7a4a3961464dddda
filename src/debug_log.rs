use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::TtsConfig;

/// Append a timestamped line to the debug log.
/// Failures are swallowed; the log is diagnostics only.
pub fn log_debug(message: &str, path: &Path) {
    if let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
    {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let _ = writeln!(file, "[{}] {}", timestamp, message);
    }
}

/// Debug trace that only writes when `TTS_DEBUG` is on
#[derive(Debug, Clone)]
pub struct DebugLog {
    path: Option<PathBuf>,
}

impl DebugLog {
    pub fn new(config: &TtsConfig) -> Self {
        Self {
            path: config.debug.then(|| config.debug_log.clone()),
        }
    }

    pub fn log(&self, message: &str) {
        if let Some(path) = &self.path {
            log_debug(&format!("TTS-DEBUG: {}", message), path);
        }
    }
}
