use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

const ENABLED_VAR: &str = "TTS_ENABLED";
const VOICE_VAR: &str = "TTS_VOICE";
const SPEED_VAR: &str = "TTS_SPEED";
const DEBUG_VAR: &str = "TTS_DEBUG";
const DEBUG_LOG_VAR: &str = "TTS_DEBUG_LOG";

const DEFAULT_VOICE: &str = "Samantha";
const DEFAULT_SPEED: u32 = 200;
const DEFAULT_DEBUG_LOG: &str = "tts-output-debug.log";

/// Settings for a single hook invocation, resolved from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtsConfig {
    pub enabled: bool,
    pub voice: String,
    /// Words per minute passed to the speech command
    pub speed: u32,
    pub debug: bool,
    pub debug_log: PathBuf,
}

impl TtsConfig {
    /// Build the config from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    /// Fails only when the speech rate is not a positive integer.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = lookup(ENABLED_VAR).map_or(true, |v| parse_flag(&v));
        let voice = lookup(VOICE_VAR).unwrap_or_else(|| DEFAULT_VOICE.to_string());
        let speed = match lookup(SPEED_VAR) {
            Some(raw) => parse_speed(&raw)?,
            None => DEFAULT_SPEED,
        };
        let debug = lookup(DEBUG_VAR).is_some_and(|v| parse_flag(&v));
        let debug_log = lookup(DEBUG_LOG_VAR)
            .map(|p| expand_home(&p))
            .unwrap_or_else(default_debug_log);

        Ok(Self {
            enabled,
            voice,
            speed,
            debug,
            debug_log,
        })
    }
}

/// "true", "1" and "yes" in any case are on, anything else is off
fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn parse_speed(raw: &str) -> Result<u32> {
    let speed: u32 = raw
        .trim()
        .parse()
        .with_context(|| format!("Invalid {}: '{}' is not an integer", SPEED_VAR, raw))?;
    if speed == 0 {
        bail!("Invalid {}: speech rate must be positive", SPEED_VAR);
    }
    Ok(speed)
}

fn default_debug_log() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DEBUG_LOG)
}

/// Expand a leading `~` to the user's home directory.
/// Paths without one, or with no resolvable home, come back unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" {
        ""
    } else if let Some(rest) = path.strip_prefix("~/") {
        rest
    } else {
        return PathBuf::from(path);
    };

    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => Path::new(path).to_path_buf(),
    }
}
