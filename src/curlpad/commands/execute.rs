//! Running validated commands without a shell.

use crate::error::{CurlpadError, Result};
use log::debug;
use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    UnterminatedQuote,
    DanglingEscape,
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizeError::UnterminatedQuote => write!(f, "unterminated quote"),
            TokenizeError::DanglingEscape => write!(f, "trailing backslash"),
        }
    }
}

impl std::error::Error for TokenizeError {}

/// Splits a command line into arguments the way a POSIX shell would quote them, without
/// any expansion. Single quotes are literal; inside double quotes a backslash escapes
/// `"`, `\`, `$` and `` ` `` only.
pub fn tokenize(command: &str) -> std::result::Result<Vec<String>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = command.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(ch) => current.push(ch),
                        None => return Err(TokenizeError::UnterminatedQuote),
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(esc @ ('"' | '\\' | '$' | '`')) => current.push(esc),
                            Some(other) => {
                                current.push('\\');
                                current.push(other);
                            }
                            None => return Err(TokenizeError::UnterminatedQuote),
                        },
                        Some(ch) => current.push(ch),
                        None => return Err(TokenizeError::UnterminatedQuote),
                    }
                }
            }
            '\\' => {
                in_token = true;
                match chars.next() {
                    Some(ch) => current.push(ch),
                    None => return Err(TokenizeError::DanglingEscape),
                }
            }
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }

    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Captured result of one curl run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl Execution {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Exit code for reporting; `-1` when curl was killed by a signal.
    pub fn code(&self) -> i32 {
        self.exit_code.unwrap_or(-1)
    }

    /// Stdout for display: JSON bodies pretty-printed, anything else verbatim.
    pub fn display_stdout(&self) -> String {
        pretty_json(&self.stdout).unwrap_or_else(|| self.stdout.clone())
    }
}

/// Pretty-prints `text` if it is a JSON object or array, keeping key order.
pub fn pretty_json(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let looks_like_json = (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'));
    if !looks_like_json {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => serde_json::to_string_pretty(&value).ok(),
        Err(e) => {
            debug!("Output looked like JSON but failed to parse: {}", e);
            None
        }
    }
}

/// Runs `command` with `curl` resolved to `curl_path`. The process is spawned directly
/// with the tokenized arguments; no shell is involved.
pub fn run_command(curl_path: &Path, command: &str) -> Result<Execution> {
    let tokens = tokenize(command)
        .map_err(|e| CurlpadError::Execution(format!("cannot parse command: {}", e)))?;
    let Some((program, args)) = tokens.split_first() else {
        return Err(CurlpadError::Execution("empty command".to_string()));
    };
    if program != "curl" {
        return Err(CurlpadError::Execution(format!(
            "refusing to run '{}': only curl is executed",
            program
        )));
    }

    debug!("Executing {} with {} argument(s)", curl_path.display(), args.len());
    let output = Command::new(curl_path)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| {
            CurlpadError::Execution(format!("could not start {}: {}", curl_path.display(), e))
        })?;
    debug!("Process exited with code: {:?}", output.status.code());

    Ok(Execution {
        command: command.to_string(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: output.status.code(),
    })
}
