//! Pulling curl invocations back out of the edited buffer.
//!
//! Rules:
//! 1. Blank lines and `#` comment lines are ignored.
//! 2. A command begins on a line whose text starts with the word `curl`.
//! 3. A following line belongs to the same command when the previous line ended with
//!    `\`, when it starts with `-` (another option), or when it is indented. A `curl`
//!    line at column 0 always starts a new command.
//! 4. Trailing backslashes are removed and the parts are joined with single spaces.

use crate::error::{CurlpadError, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Reads the edited file and extracts its commands.
pub fn extract_commands<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        CurlpadError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read {}: {}", path.display(), e),
        ))
    })?;
    let commands = extract_from_str(&text);
    debug!(
        "Extracted {} curl command(s) from {}",
        commands.len(),
        path.display()
    );
    Ok(commands)
}

pub fn extract_from_str(text: &str) -> Vec<String> {
    let mut commands = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut open = false;

    for raw in text.lines() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let indented = raw.starts_with(char::is_whitespace);
        let starts_curl = starts_with_curl(trimmed);
        let (body, continues) = strip_continuation(trimmed);

        let joins_current = !current.is_empty()
            && !(starts_curl && !indented)
            && (open || trimmed.starts_with('-') || indented);

        if joins_current {
            push_part(&mut current, body);
        } else {
            flush(&mut current, &mut commands);
            if starts_curl {
                push_part(&mut current, body);
            } else {
                debug!("Skipping non-curl leading line: {}", raw);
                open = false;
                continue;
            }
        }
        open = continues;
    }
    flush(&mut current, &mut commands);
    commands
}

fn starts_with_curl(line: &str) -> bool {
    line.split_whitespace().next() == Some("curl")
}

fn strip_continuation(line: &str) -> (&str, bool) {
    match line.strip_suffix('\\') {
        Some(rest) => (rest.trim_end(), true),
        None => (line, false),
    }
}

fn push_part(current: &mut Vec<String>, part: &str) {
    if !part.is_empty() {
        current.push(part.to_string());
    }
}

fn flush(current: &mut Vec<String>, commands: &mut Vec<String>) {
    if !current.is_empty() {
        commands.push(current.join(" "));
        current.clear();
    }
}
