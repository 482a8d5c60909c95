//! CLI command implementations

pub mod get;
pub mod ls;
pub mod mb;
pub mod objects;
pub mod put;
pub mod rb;
pub mod rm;

use crate::OutputFormat;
use colored::Colorize;
use swiftbox::StorageClient;

/// Context passed to all commands
pub struct CommandContext {
    pub client: StorageClient,
    pub output_format: OutputFormat,
    pub verbose: bool,
    pub quiet: bool,
}

impl CommandContext {
    /// Check if output should be JSON
    pub fn is_json(&self) -> bool {
        matches!(self.output_format, OutputFormat::Json)
    }

    /// Print info message if not quiet
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }

    /// Print verbose message if verbose mode
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            eprintln!("[DEBUG] {}", msg);
        }
    }

    /// Report a completed change, e.g. `make_container: photos`
    pub fn done(&self, action: &str, target: &str) {
        if self.is_json() {
            println!(
                "{}",
                serde_json::json!({ "action": action, "target": target })
            );
        } else if !self.quiet {
            let label = if action.starts_with("remove") || action.starts_with("delete") {
                action.red()
            } else {
                action.green()
            };
            println!("{}: {}", label, target);
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use swiftbox_storage::MemoryBackend;

    pub fn context(output_format: OutputFormat) -> (MemoryBackend, CommandContext) {
        let backend = MemoryBackend::new();
        let ctx = CommandContext {
            client: StorageClient::from_backend(Box::new(backend.clone())),
            output_format,
            verbose: false,
            quiet: true,
        };
        (backend, ctx)
    }
}
