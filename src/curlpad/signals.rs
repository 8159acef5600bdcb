//! Ctrl+C / SIGTERM handling.
//!
//! The handler runs on the `ctrlc` thread and only touches the [`CleanupRegistry`], which
//! is safe to share with the main thread. It always ends the process, whether the main
//! thread is waiting on the prompt, the editor or curl.

use crate::error::Result;
use crate::workspace::CleanupRegistry;
use log::debug;

/// Registers the process-wide handler. On a signal the temp files tracked by `registry`
/// are removed and the process exits with status 1. Can only be installed once.
pub fn install_handler(registry: CleanupRegistry) -> Result<()> {
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted");
        registry.cleanup();
        std::process::exit(1);
    })?;
    debug!("Signal handler installed");
    Ok(())
}
