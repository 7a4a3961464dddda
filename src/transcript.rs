use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::error;

use crate::config::expand_home;

/// Represents the message of a transcript line.
/// Content blocks stay untyped; only `text` blocks are looked at.
#[derive(Debug, Deserialize)]
struct Message {
    role: Option<String>,
    content: Option<Vec<Value>>,
}

/// Represents a transcript line with message
#[derive(Debug, Deserialize)]
struct TranscriptLine {
    message: Option<Message>,
}

/// Text of the last assistant message plus how many records were read
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LastAssistantMessage {
    pub text: Option<String>,
    pub record_count: usize,
}

/// Find the last assistant message in a JSONL transcript.
///
/// A missing file yields nothing. Read failures are reported on stderr and
/// also yield nothing, so this never fails.
pub fn read_last_assistant_message(transcript_path: &str) -> LastAssistantMessage {
    let path = expand_home(transcript_path);
    if !path.exists() {
        return LastAssistantMessage::default();
    }

    match scan(&path) {
        Ok(found) => found,
        Err(e) => {
            error!("TTS Error reading transcript: {:#}", e);
            LastAssistantMessage::default()
        }
    }
}

fn scan(path: &Path) -> Result<LastAssistantMessage> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut found = LastAssistantMessage::default();
    let mut buf = Vec::new();

    // Raw bytes so a bad encoding only spoils its own line
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if read == 0 {
            break;
        }
        let line = buf.trim_ascii();
        if line.is_empty() {
            continue;
        }

        // Malformed lines are skipped and not counted
        let Ok(value) = serde_json::from_slice::<Value>(line) else {
            continue;
        };
        found.record_count += 1;

        if let Some(text) = assistant_text(value) {
            found.text = Some(text);
        }
    }

    Ok(found)
}

/// Newline-joined text blocks of an assistant record.
/// None for other roles, other shapes, or a record with no text blocks.
fn assistant_text(value: Value) -> Option<String> {
    let entry: TranscriptLine = serde_json::from_value(value).ok()?;
    let message = entry.message?;
    if message.role.as_deref() != Some("assistant") {
        return None;
    }

    let blocks: Vec<String> = message
        .content
        .unwrap_or_default()
        .iter()
        .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
        .map(|block| {
            block
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        })
        .collect();

    if blocks.is_empty() {
        None
    } else {
        Some(blocks.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn assistant(texts: &[&str]) -> String {
        let content: Vec<Value> = texts
            .iter()
            .map(|t| serde_json::json!({"type": "text", "text": t}))
            .collect();
        serde_json::json!({
            "type": "assistant",
            "message": {"role": "assistant", "content": content}
        })
        .to_string()
    }

    fn user(text: &str) -> String {
        serde_json::json!({
            "type": "user",
            "message": {"role": "user", "content": text}
        })
        .to_string()
    }

    fn write_transcript(temp: &TempDir, lines: &[String]) -> String {
        let path = temp.path().join("transcript.jsonl");
        fs::write(&path, lines.join("\n")).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_nonexistent_transcript() {
        let found = read_last_assistant_message("/nonexistent/path.jsonl");
        assert_eq!(found, LastAssistantMessage::default());
    }

    #[test]
    fn test_last_assistant_wins() {
        let temp = TempDir::new().unwrap();
        let path = write_transcript(
            &temp,
            &[
                user("hi"),
                assistant(&["First answer."]),
                user("again"),
                assistant(&["Second answer."]),
                user("thanks"),
            ],
        );

        let found = read_last_assistant_message(&path);
        assert_eq!(found.text.as_deref(), Some("Second answer."));
        assert_eq!(found.record_count, 5);
    }

    #[test]
    fn test_text_blocks_are_newline_joined() {
        let temp = TempDir::new().unwrap();
        let tool_and_text = serde_json::json!({
            "message": {
                "role": "assistant",
                "content": [
                    {"type": "text", "text": "Part one."},
                    {"type": "tool_use", "name": "Bash", "input": {"command": "ls"}},
                    {"type": "text", "text": "Part two."}
                ]
            }
        })
        .to_string();
        let path = write_transcript(&temp, &[tool_and_text]);

        let found = read_last_assistant_message(&path);
        assert_eq!(found.text.as_deref(), Some("Part one.\nPart two."));
    }

    #[test]
    fn test_malformed_and_blank_lines_are_skipped() {
        let temp = TempDir::new().unwrap();
        let path = write_transcript(
            &temp,
            &[
                assistant(&["Kept."]),
                "{not json".to_string(),
                String::new(),
                "   ".to_string(),
                "{\"message\": {\"role\": \"assist".to_string(),
                user("ok"),
            ],
        );

        let found = read_last_assistant_message(&path);
        assert_eq!(found.text.as_deref(), Some("Kept."));
        assert_eq!(found.record_count, 2);
    }

    #[test]
    fn test_tool_only_assistant_record_keeps_earlier_text() {
        let temp = TempDir::new().unwrap();
        let tool_only = serde_json::json!({
            "message": {
                "role": "assistant",
                "content": [{"type": "tool_use", "name": "Read", "input": {}}]
            }
        })
        .to_string();
        let path = write_transcript(&temp, &[assistant(&["Spoken."]), tool_only]);

        let found = read_last_assistant_message(&path);
        assert_eq!(found.text.as_deref(), Some("Spoken."));
        assert_eq!(found.record_count, 2);
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("transcript.jsonl");
        let mut bytes = assistant(&["Kept."]).into_bytes();
        bytes.push(b'\n');
        // Writer cut off in the middle of "café"
        bytes.extend_from_slice(b"{\"message\":{\"role\":\"user\",\"content\":\"caf\xc3");
        fs::write(&path, bytes).unwrap();

        let found = read_last_assistant_message(path.to_str().unwrap());
        assert_eq!(found.text.as_deref(), Some("Kept."));
        assert_eq!(found.record_count, 1);
    }

    #[test]
    fn test_odd_non_text_blocks_do_not_hide_last_reply() {
        let temp = TempDir::new().unwrap();
        let mixed = serde_json::json!({
            "message": {
                "role": "assistant",
                "content": [
                    {"type": "text", "text": "New."},
                    {"type": "image", "text": {"x": 1}},
                    "stray"
                ]
            }
        })
        .to_string();
        let path = write_transcript(&temp, &[assistant(&["Old."]), mixed]);

        let found = read_last_assistant_message(&path);
        assert_eq!(found.text.as_deref(), Some("New."));
        assert_eq!(found.record_count, 2);
    }

    #[test]
    fn test_no_assistant_records() {
        let temp = TempDir::new().unwrap();
        let path = write_transcript(
            &temp,
            &[user("one"), "[1, 2, 3]".to_string(), "42".to_string()],
        );

        let found = read_last_assistant_message(&path);
        assert!(found.text.is_none());
        assert_eq!(found.record_count, 3);
    }

    #[test]
    fn test_unreadable_path_yields_nothing() {
        let temp = TempDir::new().unwrap();
        // A directory exists but cannot be read line by line
        let found = read_last_assistant_message(temp.path().to_str().unwrap());
        assert_eq!(found, LastAssistantMessage::default());
    }
}
