use anyhow::{bail, Context, Result};
use std::process::Command;
use tracing::{error, warn};

/// macOS speech synthesizer
const SAY_COMMAND: &str = "say";

/// Something that can read text aloud
pub trait SpeechBackend {
    /// Whether the backend is usable on this machine
    fn detect(&self) -> bool;

    /// Speak the text, blocking until done
    fn invoke(&self, text: &str, voice: &str, rate: u32) -> Result<()>;

    fn name(&self) -> &str;
}

/// Speaks through an external `say`-compatible command:
/// `<program> -v <voice> -r <rate> <text>`
pub struct SayCommand {
    program: String,
}

impl SayCommand {
    pub fn new() -> Self {
        Self::with_program(SAY_COMMAND)
    }

    pub fn with_program(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }
}

impl Default for SayCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechBackend for SayCommand {
    fn detect(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    fn invoke(&self, text: &str, voice: &str, rate: u32) -> Result<()> {
        let status = Command::new(&self.program)
            .args(["-v", voice, "-r", &rate.to_string(), text])
            .status()
            .with_context(|| format!("failed to execute {}", self.program))?;
        if !status.success() {
            bail!("{} exited with {}", self.program, status);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.program
    }
}

/// Best-effort single attempt to speak the text.
/// Returns false, after a diagnostic on stderr, if the backend is missing or fails.
pub fn speak(backend: &dyn SpeechBackend, text: &str, voice: &str, rate: u32) -> bool {
    if !backend.detect() {
        warn!(
            "TTS: '{}' command not available on this system",
            backend.name()
        );
        return false;
    }

    match backend.invoke(text, voice, rate) {
        Ok(()) => true,
        Err(e) => {
            error!("TTS Error: Failed to speak text: {:#}", e);
            false
        }
    }
}
