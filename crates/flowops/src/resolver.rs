//! Interactive conflict resolution on the terminal
//!
//! The deployment loop parks on [`ConflictResolver::resolve`] while the
//! user answers on stdin; there is no timeout. Prompts go to stderr so
//! `--format json` output stays clean on stdout.

use async_trait::async_trait;
use deploy_orchestration::{ConflictAction, ConflictResolver, PendingConflict};
use std::io::{self, Write};

/// Prompts on stderr/stdin for every conflict.
pub struct InteractiveResolver;

impl InteractiveResolver {
    /// Create the resolver.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConflictResolver for InteractiveResolver {
    async fn resolve(&self, conflict: PendingConflict) -> ConflictAction {
        let existing = &conflict.existing;
        let versioned = if existing.has_version_control {
            "version controlled"
        } else {
            "not version controlled"
        };

        eprintln!(
            "\nConflict: process group '{}' already exists ({} running, {} stopped, {})",
            existing.name, existing.running_count, existing.stopped_count, versioned
        );

        loop {
            eprint!("[s]kip / [d]elete and redeploy / [u]pdate version? ");
            let _ = io::stderr().flush();

            let mut input = String::new();
            if io::stdin().read_line(&mut input).is_err() || input.is_empty() {
                // Closed stdin: the safe answer is to leave the target alone.
                return ConflictAction::Skip;
            }

            match input.trim() {
                "s" | "S" => return ConflictAction::Skip,
                "d" | "D" => return ConflictAction::Delete,
                "u" | "U" => return ConflictAction::Update,
                _ => continue,
            }
        }
    }
}

impl Default for InteractiveResolver {
    fn default() -> Self {
        Self::new()
    }
}
