//! Deciding whether an extracted command may run.
//!
//! Checks are string-based and run on the raw text, quotes included, so a `;` inside a
//! quoted header is rejected as well. Commands are never handed to a shell; these
//! checks narrow what curl itself is asked to do.

use super::execute::tokenize;
use std::fmt;

/// Sequences that would mean something to a shell. `&` also covers `&&`.
pub const BLOCKED_SEQUENCES: &[&str] = &[";", "|", "&", "`", "$(", ">", "<"];

/// An allowlisted curl option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    pub short: Option<char>,
    pub long: &'static str,
    pub takes_value: bool,
}

const fn flag(short: Option<char>, long: &'static str, takes_value: bool) -> FlagSpec {
    FlagSpec {
        short,
        long,
        takes_value,
    }
}

/// Request-shaping options only. Options that write local files (`-o`, `-O`, `-c`,
/// `-D`, `--trace`, `-w` via `%output{}`) or load curl config (`-K`) are left out.
pub const ALLOWED_FLAGS: &[FlagSpec] = &[
    flag(Some('X'), "request", true),
    flag(Some('H'), "header", true),
    flag(Some('d'), "data", true),
    flag(None, "data-raw", true),
    flag(None, "data-binary", true),
    flag(None, "data-ascii", true),
    flag(None, "data-urlencode", true),
    flag(None, "json", true),
    flag(Some('F'), "form", true),
    flag(None, "form-string", true),
    flag(None, "url", true),
    flag(Some('G'), "get", false),
    flag(Some('i'), "include", false),
    flag(Some('I'), "head", false),
    flag(Some('v'), "verbose", false),
    flag(Some('s'), "silent", false),
    flag(Some('S'), "show-error", false),
    flag(Some('L'), "location", false),
    flag(None, "max-redirs", true),
    flag(Some('k'), "insecure", false),
    flag(Some('E'), "cert", true),
    flag(None, "key", true),
    flag(None, "cacert", true),
    flag(Some('m'), "max-time", true),
    flag(None, "connect-timeout", true),
    flag(None, "retry", true),
    flag(None, "retry-delay", true),
    flag(Some('u'), "user", true),
    flag(Some('x'), "proxy", true),
    flag(Some('A'), "user-agent", true),
    flag(Some('e'), "referer", true),
    flag(Some('b'), "cookie", true),
    flag(Some('f'), "fail", false),
    flag(None, "compressed", false),
    flag(None, "digest", false),
    flag(None, "basic", false),
    flag(None, "negotiate", false),
    flag(None, "ntlm", false),
    flag(None, "oauth2-bearer", true),
    flag(None, "http1.1", false),
    flag(None, "http2", false),
    flag(Some('4'), "ipv4", false),
    flag(Some('6'), "ipv6", false),
    flag(None, "no-progress-meter", false),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NotCurl,
    ShellMetacharacter(String),
    ControlCharacter,
    Unparsable(String),
    FlagNotAllowed(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotCurl => write!(f, "command must start with 'curl'"),
            ValidationError::ShellMetacharacter(seq) => {
                write!(f, "shell metacharacter '{}' is not allowed", seq)
            }
            ValidationError::ControlCharacter => write!(f, "control characters are not allowed"),
            ValidationError::Unparsable(why) => write!(f, "cannot parse command: {}", why),
            ValidationError::FlagNotAllowed(flag) => write!(f, "flag '{}' is not allowed", flag),
        }
    }
}

impl std::error::Error for ValidationError {}

pub fn is_valid(command: &str) -> bool {
    validate_command(command).is_ok()
}

pub fn validate_command(command: &str) -> Result<(), ValidationError> {
    if command.split_whitespace().next() != Some("curl") {
        return Err(ValidationError::NotCurl);
    }

    if let Some(seq) = BLOCKED_SEQUENCES.iter().find(|seq| command.contains(*seq)) {
        return Err(ValidationError::ShellMetacharacter((*seq).to_string()));
    }

    if command.chars().any(|c| c.is_control() && c != '\t') {
        return Err(ValidationError::ControlCharacter);
    }

    let tokens = tokenize(command).map_err(|e| ValidationError::Unparsable(e.to_string()))?;
    check_flags(tokens.get(1..).unwrap_or_default())
}

fn check_flags(args: &[String]) -> Result<(), ValidationError> {
    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        i += 1;

        if let Some(long) = arg.strip_prefix("--") {
            let (name, inline_value) = match long.split_once('=') {
                Some((name, _)) => (name, true),
                None => (long, false),
            };
            let spec = lookup_long(name).ok_or_else(|| not_allowed(arg))?;
            if spec.takes_value && !inline_value {
                i += 1;
            }
        } else if let Some(shorts) = arg.strip_prefix('-') {
            if shorts.is_empty() {
                return Err(not_allowed(arg));
            }
            if consumes_next(shorts)? {
                i += 1;
            }
        }
        // Anything else is a URL or other positional argument.
    }
    Ok(())
}

/// Walks a short-option group such as `-sSL` or `-XPOST`. Returns whether the last
/// option takes its value from the next argument.
fn consumes_next(shorts: &str) -> Result<bool, ValidationError> {
    for (pos, c) in shorts.char_indices() {
        let spec = lookup_short(c).ok_or_else(|| not_allowed(&format!("-{}", c)))?;
        if spec.takes_value {
            let attached = &shorts[pos + c.len_utf8()..];
            return Ok(attached.is_empty());
        }
    }
    Ok(false)
}

fn lookup_long(name: &str) -> Option<&'static FlagSpec> {
    ALLOWED_FLAGS.iter().find(|f| f.long == name)
}

fn lookup_short(c: char) -> Option<&'static FlagSpec> {
    ALLOWED_FLAGS.iter().find(|f| f.short == Some(c))
}

fn not_allowed(flag: &str) -> ValidationError {
    ValidationError::FlagNotAllowed(flag.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_curl() {
        for cmd in [
            "",
            "   ",
            "wget https://a.test",
            "rm -rf /",
            "curlx https://a.test",
            "CURL https://a.test",
            "# curl https://a.test",
            "sudo curl https://a.test",
        ] {
            assert_eq!(validate_command(cmd), Err(ValidationError::NotCurl), "{}", cmd);
        }
    }

    #[test]
    fn test_rejects_shell_metacharacters() {
        let cases = [
            ("curl https://a.test; rm -rf ~", ";"),
            ("curl https://a.test | sh", "|"),
            ("curl https://a.test && echo hi", "&"),
            ("curl 'https://a.test/?a=1&b=2'", "&"),
            ("curl https://a.test/`id`", "`"),
            ("curl https://a.test/$(id)", "$("),
            ("curl https://a.test > out.txt", ">"),
            ("curl -d @- https://a.test < body.json", "<"),
            ("curl -H 'X-A: a;b' https://a.test", ";"),
        ];
        for (cmd, seq) in cases {
            assert_eq!(
                validate_command(cmd),
                Err(ValidationError::ShellMetacharacter(seq.to_string())),
                "{}",
                cmd
            );
        }
    }

    #[test]
    fn test_rejects_control_characters() {
        assert_eq!(
            validate_command("curl https://a.test\n-o /etc/passwd"),
            Err(ValidationError::ControlCharacter)
        );
        assert!(is_valid("curl\thttps://a.test"));
    }

    #[test]
    fn test_accepts_common_requests() {
        for cmd in [
            "curl https://a.test",
            "curl -X POST https://a.test -H 'Content-Type: application/json' -d '{\"a\":1,\"b\":2}'",
            "curl -sSL https://a.test",
            "curl -XPOST https://a.test",
            "curl --request=PATCH --url https://a.test",
            "curl -u user:pass --compressed -m 10 https://a.test",
            "curl -i -H \"Authorization: Bearer t0k3n\" https://a.test",
            "curl --json '[1,2]' https://a.test",
        ] {
            assert_eq!(validate_command(cmd), Ok(()), "{}", cmd);
        }
    }

    #[test]
    fn test_rejects_flags_outside_allowlist() {
        let cases = [
            ("curl -o /tmp/x https://a.test", "-o"),
            ("curl --output /tmp/x https://a.test", "--output"),
            ("curl -K cfg https://a.test", "-K"),
            ("curl --config=cfg https://a.test", "--config=cfg"),
            ("curl -sO https://a.test", "-O"),
            ("curl --trace-ascii log https://a.test", "--trace-ascii"),
            ("curl -w '%output{/tmp/x}%{http_code}' https://a.test", "-w"),
            ("curl --write-out=%{http_code} https://a.test", "--write-out=%{http_code}"),
            ("curl -sw x https://a.test", "-w"),
            ("curl - https://a.test", "-"),
            ("curl -- https://a.test", "--"),
        ];
        for (cmd, flag) in cases {
            assert_eq!(
                validate_command(cmd),
                Err(ValidationError::FlagNotAllowed(flag.to_string())),
                "{}",
                cmd
            );
        }
    }

    #[test]
    fn test_flag_values_are_not_checked_as_flags() {
        // `-o` here is the header value, not an option.
        assert!(is_valid("curl -H -o https://a.test"));
        assert!(is_valid("curl -d '-1' https://a.test"));
        assert!(is_valid("curl --data --output https://a.test"));
    }

    #[test]
    fn test_rejects_unterminated_quotes() {
        assert!(matches!(
            validate_command("curl -d '{\"a\":1} https://a.test"),
            Err(ValidationError::Unparsable(_))
        ));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::FlagNotAllowed("-o".into()).to_string(),
            "flag '-o' is not allowed"
        );
        assert_eq!(
            ValidationError::NotCurl.to_string(),
            "command must start with 'curl'"
        );
    }
}
