use serde_json::Value;

/// Input JSON from Claude Code hook system.
/// Only `transcript_path` is required; the rest feed the debug trace.
#[derive(Debug)]
pub struct HookInput {
    pub transcript_path: String,
    pub session_id: Option<String>,
    pub hook_event_name: Option<String>,
}

/// Why a stdin payload was not a usable hook event
#[derive(Debug, PartialEq, Eq)]
pub enum InputError {
    Empty,
    InvalidJson,
    NoTranscriptPath,
}

/// Decode the raw stdin payload into a hook event.
pub fn parse_input(raw: &str) -> Result<HookInput, InputError> {
    if raw.trim().is_empty() {
        return Err(InputError::Empty);
    }

    let value: Value = serde_json::from_str(raw).map_err(|_| InputError::InvalidJson)?;

    let obj = value.as_object().ok_or(InputError::NoTranscriptPath)?;
    let field = |name: &str| obj.get(name).and_then(Value::as_str).map(String::from);

    Ok(HookInput {
        transcript_path: field("transcript_path").ok_or(InputError::NoTranscriptPath)?,
        session_id: field("session_id"),
        hook_event_name: field("hook_event_name"),
    })
}
