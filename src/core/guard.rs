//! Dry-run and confirmation for mutating commands.

use crate::display::Outcome;
use crate::error::{CliError, ValidationError};
use std::io::{BufRead, Write};

pub const DRY_RUN_PREFIX: &str = "[DRY-RUN]";
pub const CANCELLED: &str = "Cancelled.";

/// Asks the user whether a destructive action may proceed.
pub trait Confirmer: Send + Sync {
    /// `action` reads like "delete coupon cpn_1". `Ok(false)` means declined.
    fn confirm(&self, action: &str) -> crate::Result<bool>;
}

/// Prompts on stderr and reads one line from stdin.
#[derive(Debug, Default)]
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, action: &str) -> crate::Result<bool> {
        if !atty::is(atty::Stream::Stdin) {
            return Err(ValidationError::ConfirmationRequired {
                action: action.to_string(),
            }
            .into());
        }

        let mut stderr = std::io::stderr();
        write!(stderr, "{}? [y/N] ", capitalize(action))
            .and_then(|_| stderr.flush())
            .map_err(|e| CliError::Prompt(e.to_string()))?;

        let mut answer = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut answer)
            .map_err(|e| CliError::Prompt(e.to_string()))?;
        Ok(is_yes(&answer))
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Describes one mutating action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    action: String,
    confirm: bool,
}

impl Guard {
    /// Honours `--dry-run` only (create, update, activate).
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            confirm: false,
        }
    }

    /// Also asks for confirmation unless `--yes` (delete, void, refund, cancel).
    pub fn destructive(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            confirm: true,
        }
    }

    pub fn dry_run_message(&self) -> String {
        format!("{} Would {}", DRY_RUN_PREFIX, self.action)
    }

    pub fn action(&self) -> &str {
        &self.action
    }
}

/// The global flags a guard consults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuardPolicy {
    pub dry_run: bool,
    pub yes: bool,
    /// Never prompt; an unconfirmed destructive action fails instead.
    pub no_input: bool,
}

/// Decides whether a mutating command may go ahead.
///
/// `Some(outcome)` stops the command with that outcome (the dry-run line or
/// `Cancelled.`); `None` means proceed. Runs before any credential lookup, so
/// a stopped command never touches the store or the network.
pub fn preflight(
    policy: GuardPolicy,
    confirmer: &dyn Confirmer,
    guard: &Guard,
) -> crate::Result<Option<Outcome>> {
    if policy.dry_run {
        tracing::debug!(action = %guard.action, "dry run, skipping request");
        return Ok(Some(Outcome::message(guard.dry_run_message())));
    }

    if guard.confirm && !policy.yes {
        if policy.no_input {
            return Err(ValidationError::ConfirmationRequired {
                action: guard.action.clone(),
            }
            .into());
        }
        if !confirmer.confirm(&guard.action)? {
            return Ok(Some(Outcome::message(CANCELLED)));
        }
    }

    Ok(None)
}
