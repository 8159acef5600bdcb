//! The starter script shown in the editor, and the word list behind autocomplete.

use crate::error::Result;
use crate::workspace::TempWorkspace;
use log::debug;
use std::path::PathBuf;

pub const TEMPLATE_FILE: &str = "curlpad.sh";
pub const DICTIONARY_FILE: &str = "curl.dict";

const HEADER: &str = "\
#!/bin/bash
# curlpad - scratchpad for curl.
# Write one or more curl commands below; lines starting with # are ignored.
# Autocomplete: Ctrl-X Ctrl-K (vim) or Ctrl-Space (nvim) in insert mode.
# Save and quit (:wq) to review and run. Quit without saving (:q!) to abort.
#
# curl -X POST \"https://api.example.com\" \\
#   -H \"Content-Type: application/json\" \\
#   -d '{\"key\":\"value\"}'
";

/// Completion words: methods, flags, headers and URL prefixes.
#[rustfmt::skip]
pub const CURL_DICTIONARY: &[&str] = &[
    "curl",
    "GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS",
    "-X", "--request",
    "-H", "--header",
    "-d", "--data", "--data-raw", "--data-binary", "--data-urlencode", "--json",
    "-F", "--form",
    "--url", "-G", "--get",
    "-i", "--include", "-I", "--head",
    "-v", "--verbose", "-s", "--silent", "-S", "--show-error",
    "-L", "--location", "--max-redirs",
    "-k", "--insecure", "--cert", "--key", "--cacert",
    "-m", "--max-time", "--connect-timeout", "--retry", "--retry-delay",
    "-u", "--user", "-x", "--proxy",
    "-A", "--user-agent", "-e", "--referer", "-b", "--cookie",
    "-f", "--fail",
    "--compressed", "--digest", "--negotiate", "--ntlm",
    "Content-Type: application/json",
    "Content-Type: application/x-www-form-urlencoded",
    "Content-Type: text/plain",
    "Accept: application/json",
    "Authorization: Bearer ",
    "Cache-Control: no-cache",
    "https://", "http://", "http://localhost:8080", "127.0.0.1",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    contents: String,
}

impl Template {
    /// Renders the starter script, optionally with an uncommented request for `base_url`.
    pub fn new(base_url: Option<&str>) -> Self {
        let mut contents = String::from(HEADER);
        contents.push('\n');
        if let Some(url) = base_url {
            contents.push_str(&format!("curl -X GET \"{}\"\n", url.trim()));
        }
        contents.push('\n');
        Self { contents }
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// 1-based line the editor cursor starts on: the empty line at the end.
    pub fn cursor_line(&self) -> usize {
        self.contents.lines().count().max(1)
    }
}

pub fn dictionary_contents() -> String {
    let mut out = CURL_DICTIONARY.join("\n");
    out.push('\n');
    out
}

pub fn write_template(workspace: &TempWorkspace, template: &Template) -> Result<PathBuf> {
    let path = workspace.write_file(TEMPLATE_FILE, template.contents())?;
    debug!("Template file created: {}", path.display());
    Ok(path)
}

pub fn write_dictionary(workspace: &TempWorkspace) -> Result<PathBuf> {
    let path = workspace.write_file(DICTIONARY_FILE, &dictionary_contents())?;
    debug!(
        "Created curl dictionary at {} with {} entries",
        path.display(),
        CURL_DICTIONARY.len()
    );
    Ok(path)
}
