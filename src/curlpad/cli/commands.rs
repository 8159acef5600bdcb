//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, the confirmation prompt)
//! - Handles argument parsing
//! - Initializes logging
//! - Formats output for human consumption
//!
//! `std::process::exit` is left to `main.rs`, after every scoped resource has dropped.
//!
//! ## Flow
//!
//! 1. Parse flags, initialize logging, answer `--help`, `--version` and `--install`
//! 2. Build the [`RunContext`] and find curl and an editor
//! 3. Create the [`TempWorkspace`] and hand its registry to the Ctrl+C handler
//! 4. Write the template and dictionary, open the editor
//! 5. Extract, format and validate; show the result and ask before running
//! 6. Run each command and print its output
//!
//! The workspace lives on the stack of [`run`], so its files are gone on every return
//! path, error or not.

use super::print::{
    print_commands, print_editor_tips, print_error, print_execution, print_info, print_status,
    print_success, print_warning,
};
use super::setup::{get_version, print_help, Cli};
use clap::Parser;
use curlpad::commands::execute::run_command;
use curlpad::commands::extract::extract_commands;
use curlpad::commands::format::{format_all, JqFormatter, PayloadFormatter};
use curlpad::commands::{validate_all, CurlCommand};
use curlpad::config::{CurlpadConfig, RunContext};
use curlpad::deps::{install_dependencies, Toolchain};
use curlpad::editor::open_editor;
use curlpad::error::{CurlpadError, Result};
use curlpad::signals;
use curlpad::template::{write_dictionary, write_template, Template};
use curlpad::workspace::TempWorkspace;
use env_logger::Env;
use log::debug;
use std::io::{self, Write};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    debug!("curlpad {} starting", get_version());

    if cli.help {
        print_help();
        return Ok(());
    }
    if cli.version {
        println!("curlpad version {}", get_version());
        return Ok(());
    }
    if cli.install {
        install_dependencies()?;
        print_success("Dependencies installed.");
        return Ok(());
    }

    let config = CurlpadConfig::load_default()?;
    debug!("Loaded config: {:?}", config);
    let ctx = RunContext::new(config)
        .with_debug(cli.debug)
        .with_assume_yes(cli.yes)
        .with_base_url(cli.url);

    debug!("Checking dependencies...");
    let toolchain = Toolchain::detect(&ctx.config)?;

    let workspace = TempWorkspace::create()?;
    signals::install_handler(workspace.registry())?;

    run_session(&ctx, &toolchain, &workspace)
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();
}

fn run_session(ctx: &RunContext, toolchain: &Toolchain, workspace: &TempWorkspace) -> Result<()> {
    let template = Template::new(ctx.base_url.as_deref());
    let template_path = write_template(workspace, &template)?;
    let dictionary_path = write_dictionary(workspace)?;

    print_editor_tips(toolchain.editor.kind);
    open_editor(
        ctx,
        &toolchain.editor,
        workspace,
        &template_path,
        &dictionary_path,
        template.cursor_line(),
    )?;
    debug!("Editor closed, extracting commands");

    let commands = extract_commands(&template_path)?;
    if commands.is_empty() {
        print_warning("No uncommented command found. Exiting.");
        return Ok(());
    }

    let jq = toolchain
        .jq
        .as_ref()
        .filter(|_| ctx.config.format_json)
        .map(JqFormatter::new);
    let commands = format_all(commands, jq.as_ref().map(|f| f as &dyn PayloadFormatter));

    let commands = validate_all(&commands).map_err(|(command, reason)| {
        CurlpadError::InvalidCommand {
            command,
            reason: reason.to_string(),
        }
    })?;

    print_commands(&commands);

    if ctx.should_confirm() && !confirm_execution()? {
        return Ok(());
    }

    execute_all(toolchain, &commands)
}

/// Waits for Enter. End of input counts as a refusal.
fn confirm_execution() -> Result<bool> {
    print!("Press Enter to run, or Ctrl+C to cancel... ");
    io::stdout().flush()?;

    let mut answer = String::new();
    if io::stdin().read_line(&mut answer)? == 0 {
        println!();
        print_info("Operation cancelled.");
        return Ok(false);
    }
    Ok(true)
}

fn execute_all(toolchain: &Toolchain, commands: &[CurlCommand]) -> Result<()> {
    for (i, command) in commands.iter().enumerate() {
        debug!("Executing command {}/{}", i + 1, commands.len());
        print_status("Running your cURL command...");
        match run_command(&toolchain.curl, &command.text) {
            Ok(execution) => print_execution(&execution),
            Err(e) => print_error(&e.to_string()),
        }
    }
    debug!("All commands executed");
    Ok(())
}
