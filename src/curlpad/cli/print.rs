use colored::Colorize;
use curlpad::commands::execute::Execution;
use curlpad::commands::CurlCommand;
use curlpad::deps::EditorKind;

const SEPARATOR: &str = "----------------------------------------";
const TIPS_RULE: &str = "============================================================";

pub fn print_error(message: &str) {
    eprintln!("{}", format!("❌ {}", message).red());
}

pub fn print_warning(message: &str) {
    eprintln!("{}", format!("⚠ {}", message).yellow());
}

pub fn print_success(message: &str) {
    println!("{}", format!("✅ {}", message).green());
}

pub fn print_info(message: &str) {
    println!("{}", format!("ℹ {}", message).blue());
}

pub fn print_status(message: &str) {
    println!("\n{}", format!("▶ {}", message).cyan());
}

/// Editor key reminders for vim. The nvim config echoes its own on startup.
pub(super) fn print_editor_tips(kind: EditorKind) {
    if kind != EditorKind::Vim {
        return;
    }
    println!("\n{}", TIPS_RULE);
    println!("💡 CURLPAD EDITOR TIPS:");
    println!("   • Use Ctrl-X Ctrl-K for curl command autocomplete");
    println!("   • Press 'i' to enter insert mode");
    println!("   • Press ESC to exit insert mode");
    println!("   • Type :wq and press Enter to save and exit");
    println!("   • Type :q! and press Enter to exit without saving");
    println!("{}\n", TIPS_RULE);
}

pub(super) fn print_commands(commands: &[CurlCommand]) {
    println!("\n📋 Final command(s) to execute:");
    println!("{}", SEPARATOR);
    for command in commands {
        println!("{}", command.text);
    }
    println!("{}", SEPARATOR);
}

pub(super) fn print_execution(execution: &Execution) {
    if !execution.stdout.is_empty() {
        println!("{}", "STDOUT:".green());
        println!("{}", execution.display_stdout().trim_end());
    }
    if !execution.stderr.is_empty() {
        println!("{}", "STDERR:".red());
        println!("{}", execution.stderr.trim_end());
    }
    if !execution.success() {
        print_error(&format!(
            "cURL execution failed with exit code {}",
            execution.code()
        ));
    }
}
