//! Compacting JSON request bodies before they are shown and run.
//!
//! Only single-quoted payloads are touched: `-d '{...}'`, `--data-raw '[...]'`,
//! `--json='{...}'` and friends. Inside single quotes the shell would pass the text
//! through verbatim, so the formatted JSON can be substituted back without re-quoting.

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

static PAYLOAD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<prefix>(?:^|\s)(?:-d|--data-raw|--data-binary|--data-ascii|--data|--json)(?:=|\s*))'(?P<json>[\[{][^']*[\]}])'",
    )
    .expect("payload regex is valid")
});

/// Something that can turn a JSON document into its canonical compact form.
pub trait PayloadFormatter {
    /// Returns `None` when the input cannot be formatted.
    fn format(&self, json: &str) -> Option<String>;
}

/// Pipes JSON through `jq -c .`.
#[derive(Debug, Clone)]
pub struct JqFormatter {
    path: PathBuf,
}

impl JqFormatter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PayloadFormatter for JqFormatter {
    fn format(&self, json: &str) -> Option<String> {
        let mut child = Command::new(&self.path)
            .args(["-c", "."])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| debug!("Failed to spawn jq: {}", e))
            .ok()?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(json.as_bytes()) {
                debug!("Failed to write to jq: {}", e);
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| debug!("Failed to wait for jq: {}", e))
            .ok()?;
        if !output.status.success() {
            debug!(
                "jq failed to format JSON ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }

        let formatted = String::from_utf8(output.stdout).ok()?;
        let formatted = formatted.trim();
        (!formatted.is_empty()).then(|| formatted.to_string())
    }
}

/// Rewrites every single-quoted JSON payload in `command` through `formatter`. Payloads
/// the formatter rejects are left exactly as written.
pub fn format_payloads(command: &str, formatter: &dyn PayloadFormatter) -> String {
    let formatted = PAYLOAD_RE.replace_all(command, |caps: &Captures| {
        let prefix = &caps["prefix"];
        let json = &caps["json"];
        match formatter.format(json) {
            // A quote would end the single-quoted argument early; several JSON values
            // come back one per line.
            Some(out) if !out.contains(['\'', '\n']) => format!("{}'{}'", prefix, out),
            _ => {
                debug!("Keeping payload as written: {}", json);
                caps[0].to_string()
            }
        }
    });
    if formatted != command {
        debug!("Formatted JSON in command: {} -> {}", command, formatted);
    }
    formatted.into_owned()
}

/// Formats every command. With no formatter the commands come back unchanged.
pub fn format_all(commands: Vec<String>, formatter: Option<&dyn PayloadFormatter>) -> Vec<String> {
    match formatter {
        Some(f) => commands
            .iter()
            .map(|command| format_payloads(command, f))
            .collect(),
        None => {
            debug!("No JSON formatter; skipping payload formatting");
            commands
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compacts with serde_json, standing in for jq.
    struct Compact;

    impl PayloadFormatter for Compact {
        fn format(&self, json: &str) -> Option<String> {
            let value: serde_json::Value = serde_json::from_str(json).ok()?;
            serde_json::to_string(&value).ok()
        }
    }

    struct Always(&'static str);

    impl PayloadFormatter for Always {
        fn format(&self, _json: &str) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    #[test]
    fn test_canonical_payload_rest_unchanged() {
        let cmd = r#"curl -X POST url -d '{"a":1,"b":2}'"#;
        assert_eq!(format_payloads(cmd, &Compact), cmd);
    }

    #[test]
    fn test_spaced_payload_is_compacted() {
        let cmd = r#"curl -X POST "https://a.test" -d '{ "a": 1,  "b": [1, 2] }' -H "Accept: */*""#;
        assert_eq!(
            format_payloads(cmd, &Compact),
            r#"curl -X POST "https://a.test" -d '{"a":1,"b":[1,2]}' -H "Accept: */*""#
        );
    }

    #[test]
    fn test_long_flags_and_attached_forms() {
        assert_eq!(
            format_payloads("curl --data-raw '[ 1, 2 ]' u", &Compact),
            "curl --data-raw '[1,2]' u"
        );
        assert_eq!(
            format_payloads("curl --json='{ \"a\" : true }' u", &Compact),
            "curl --json='{\"a\":true}' u"
        );
        assert_eq!(
            format_payloads("curl -d'{ \"a\" : null }' u", &Compact),
            "curl -d'{\"a\":null}' u"
        );
    }

    #[test]
    fn test_multiple_payloads() {
        let cmd = "curl -d '{ \"a\": 1 }' -d '{ \"b\": 2 }' u";
        assert_eq!(
            format_payloads(cmd, &Compact),
            "curl -d '{\"a\":1}' -d '{\"b\":2}' u"
        );
    }

    #[test]
    fn test_invalid_json_left_unchanged() {
        let cmd = "curl -d '{not: json}' u";
        assert_eq!(format_payloads(cmd, &Compact), cmd);
    }

    #[test]
    fn test_non_json_and_double_quoted_payloads_ignored() {
        for cmd in [
            "curl -d 'a=1' u",
            "curl -d \"{\\\"a\\\": 1}\" u",
            "curl -H '{ \"x\": 1 }' u",
        ] {
            assert_eq!(format_payloads(cmd, &Always("{}")), cmd);
        }
    }

    #[test]
    fn test_output_with_quote_is_rejected() {
        let cmd = "curl -d '{ \"a\": \"\\u0027\" }' u";
        assert_eq!(format_payloads(cmd, &Always("{\"a\":\"'\"}")), cmd);
    }

    #[test]
    fn test_multi_line_output_is_rejected() {
        // jq prints one line per value when the payload holds several.
        let cmd = "curl -d '{\"a\":1} {\"b\":2}' u";
        let formatted = format_payloads(cmd, &Always("{\"a\":1}\n{\"b\":2}"));
        assert_eq!(formatted, cmd);
        assert!(crate::commands::validate::is_valid(&formatted));
    }

    #[test]
    fn test_format_all_without_formatter() {
        let cmds = vec!["curl -d '{ \"a\": 1 }' u".to_string()];
        assert_eq!(format_all(cmds.clone(), None), cmds);
        assert_eq!(
            format_all(cmds, Some(&Compact)),
            vec!["curl -d '{\"a\":1}' u".to_string()]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_jq_formatter_uses_binary() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("jq");
        // Strips spaces; good enough to tell the binary ran.
        std::fs::write(&fake, "#!/bin/sh\ntr -d ' '\n").unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let jq = JqFormatter::new(&fake);
        assert_eq!(jq.format("{ \"a\": 1 }\n").as_deref(), Some("{\"a\":1}"));
    }

    #[cfg(unix)]
    #[test]
    fn test_jq_formatter_failure_is_none() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("jq");
        std::fs::write(&fake, "#!/bin/sh\necho 'parse error' >&2\nexit 5\n").unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(JqFormatter::new(&fake).format("{"), None);
        assert_eq!(JqFormatter::new(dir.path().join("missing")).format("{}"), None);
    }
}
