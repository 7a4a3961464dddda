use anyhow::Result;

use crate::config::TtsConfig;
use crate::debug_log::DebugLog;
use crate::input::{parse_input, HookInput, InputError};
use crate::speech::{speak, SpeechBackend};
use crate::summary::summarize;
use crate::transcript::read_last_assistant_message;

/// Why a run stopped before speaking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    Disabled,
    EmptyInput,
    InvalidJson,
    NoTranscriptPath,
    NoAssistantMessage,
    NoSummary,
}

/// How a single hook invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Skipped(Skip),
    Spoke,
    SpeechFailed,
}

/// Run one hook invocation: stdin event -> transcript -> summary -> speech.
///
/// `read_input` is only called once the hook is enabled. Every "nothing to do"
/// case comes back as `Outcome::Skipped`; only stdin read errors propagate.
pub fn run<F>(config: &TtsConfig, read_input: F, backend: &dyn SpeechBackend) -> Result<Outcome>
where
    F: FnOnce() -> Result<String>,
{
    if !config.enabled {
        return Ok(Outcome::Skipped(Skip::Disabled));
    }
    let log = DebugLog::new(config);

    let raw = read_input()?;
    let steps = hook_input(&raw, &log)
        .and_then(|input| assistant_text(&input, &log))
        .and_then(|text| spoken_summary(&text));

    let summary = match steps {
        Ok(summary) => summary,
        Err(skip) => return Ok(Outcome::Skipped(skip)),
    };

    log.log(&format!(
        "Speaking with voice='{}' speed={}: \"{}\"",
        config.voice, config.speed, summary
    ));

    if speak(backend, &summary, &config.voice, config.speed) {
        Ok(Outcome::Spoke)
    } else {
        Ok(Outcome::SpeechFailed)
    }
}

fn hook_input(raw: &str, log: &DebugLog) -> Result<HookInput, Skip> {
    match parse_input(raw) {
        Ok(input) => {
            log.log(&format!(
                "event={} session={}",
                input.hook_event_name.as_deref().unwrap_or("unknown"),
                input.session_id.as_deref().unwrap_or("unknown")
            ));
            Ok(input)
        }
        Err(InputError::Empty) => Err(Skip::EmptyInput),
        Err(InputError::InvalidJson) => {
            log.log("Invalid JSON input, skipping execution");
            Err(Skip::InvalidJson)
        }
        Err(InputError::NoTranscriptPath) => {
            log.log("No transcript_path in input, skipping execution");
            Err(Skip::NoTranscriptPath)
        }
    }
}

fn assistant_text(input: &HookInput, log: &DebugLog) -> Result<String, Skip> {
    log.log(&format!(
        "Reading transcript from: {}",
        input.transcript_path
    ));

    let found = read_last_assistant_message(&input.transcript_path);
    match found.text {
        Some(text) if !text.is_empty() => {
            log.log(&format!(
                "Found {} messages in transcript, extracted {} chars from last assistant message",
                found.record_count,
                text.chars().count()
            ));
            Ok(text)
        }
        _ => {
            log.log(&format!(
                "No assistant message found in transcript ({} total messages)",
                found.record_count
            ));
            Err(Skip::NoAssistantMessage)
        }
    }
}

fn spoken_summary(text: &str) -> Result<String, Skip> {
    summarize(text).ok_or(Skip::NoSummary)
}
