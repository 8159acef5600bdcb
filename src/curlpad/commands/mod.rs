//! # Command Pipeline
//!
//! Text comes out of the editor and goes through four stages, each in its own module:
//!
//! 1. [`extract`]: comments and blank lines dropped, continuations joined
//! 2. [`format`]: `-d '{...}'` payloads compacted through jq (optional)
//! 3. [`validate`]: flag allowlist and metacharacter blocklist
//! 4. [`execute`]: tokenized and run as `curl` directly, output captured
//!
//! None of these stages print. They return values and errors for the CLI to show.

pub mod execute;
pub mod extract;
pub mod format;
pub mod validate;

use validate::{validate_command, ValidationError};

/// One logical curl invocation together with its validity flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurlCommand {
    pub text: String,
    pub valid: bool,
}

impl CurlCommand {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let valid = validate_command(&text).is_ok();
        Self { text, valid }
    }
}

/// Checks every command in order and stops at the first invalid one.
pub fn validate_all(commands: &[String]) -> Result<Vec<CurlCommand>, (String, ValidationError)> {
    let mut checked = Vec::with_capacity(commands.len());
    for (i, text) in commands.iter().enumerate() {
        log::debug!(
            "Validating command {}/{}: {}",
            i + 1,
            commands.len(),
            preview(text, 80)
        );
        if let Err(reason) = validate_command(text) {
            log::debug!("Command {} validation FAILED: {}", i + 1, reason);
            return Err((text.clone(), reason));
        }
        checked.push(CurlCommand {
            text: text.clone(),
            valid: true,
        });
    }
    Ok(checked)
}

/// Shortens `text` to `max` characters for log lines.
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curl_command_validity_flag() {
        assert!(CurlCommand::new("curl -s https://example.com").valid);
        assert!(!CurlCommand::new("wget https://example.com").valid);
    }

    #[test]
    fn test_validate_all_stops_at_first_failure() {
        let cmds = vec![
            "curl https://a.test".to_string(),
            "curl https://b.test; rm -rf ~".to_string(),
            "ls".to_string(),
        ];
        let (bad, reason) = validate_all(&cmds).unwrap_err();
        assert_eq!(bad, "curl https://b.test; rm -rf ~");
        assert_eq!(reason, ValidationError::ShellMetacharacter(";".to_string()));
    }

    #[test]
    fn test_validate_all_passes() {
        let cmds = vec!["curl -I https://a.test".to_string()];
        let checked = validate_all(&cmds).unwrap();
        assert_eq!(checked.len(), 1);
        assert!(checked[0].valid);
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("curl", 10), "curl");
        assert_eq!(preview("curl https://x", 4), "curl...");
    }
}
