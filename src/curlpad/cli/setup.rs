use clap::Parser;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.1.0" for releases, "0.1.0@abc1234 2024-01-15 14:30" for dev builds
pub fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "curlpad",
    bin_name = "curlpad",
    version = get_version(),
    disable_help_flag = true,
    disable_version_flag = true
)]
#[command(about = "A simple curl editor for the command line", long_about = None)]
pub struct Cli {
    /// Show this help message
    #[arg(short, long)]
    pub help: bool,

    /// Show version info
    #[arg(short = 'v', long)]
    pub version: bool,

    /// Install missing dependencies (vim, jq)
    #[arg(long)]
    pub install: bool,

    /// Enable verbose debug logging
    #[arg(long)]
    pub debug: bool,

    /// Pre-populate the template with a base URL
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Run the commands without asking first
    #[arg(short = 'y', long)]
    pub yes: bool,
}

pub fn get_help() -> String {
    let mut output = String::new();
    output.push_str(&format!("curlpad {}\n", get_version()));
    output.push_str("A simple curl editor for the command line\n");
    output.push('\n');
    output.push_str("Usage: curlpad [OPTIONS]\n");
    output.push('\n');
    output.push_str("Write curl commands in vim or nvim with autocomplete, then review and run them.\n");
    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("  -h, --help       Show this help message\n");
    output.push_str("  -v, --version    Show version info\n");
    output.push_str("      --install    Install missing dependencies (vim, jq)\n");
    output.push_str("      --debug      Enable verbose debug logging\n");
    output.push_str("      --url <URL>  Pre-populate the template with a base URL\n");
    output.push_str("  -y, --yes        Run the commands without asking first\n");
    output.push('\n');
    output.push_str("Examples:\n");
    output.push_str("  curlpad                               Start the editor with curl autocomplete\n");
    output.push_str("  curlpad --url=https://www.example.com Pre-populate with a base URL\n");
    output.push_str("  curlpad --install                     Install vim and jq if missing\n");
    output.push('\n');
    output.push_str("In the editor:\n");
    output.push_str("  - Press Ctrl+X Ctrl+K in insert mode to autocomplete curl options, methods, headers\n");
    output.push_str("  - Uncomment and edit the example commands\n");
    output.push_str("  - Save and quit (:wq) to review and run them\n");
    output.push('\n');
    output.push_str("Dependencies:\n");
    output.push_str("  nvim or vim   For editing with autocomplete\n");
    output.push_str("  curl          For executing commands\n");
    output.push_str("  jq            For JSON formatting (optional)\n");
    output.push('\n');
    output.push_str("Configuration is read from config.json in $CURLPAD_CONFIG_DIR or the\n");
    output.push_str("platform config directory.\n");
    output
}

pub fn print_help() {
    print!("{}", get_help());
}
