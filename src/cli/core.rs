//! Dispatch, error reporting, and suggestion helpers for the shell.

use std::io;

use strsim::levenshtein;

use crate::catalog::VARIETY_COLUMNS;
use crate::errors::OrchardError;

use super::io as cli_io;
pub use super::shell_context::{CliMode, ShellContext};

const SUGGESTION_DISTANCE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Failure of a single shell command; the shell keeps running afterwards.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] OrchardError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// Failure that ends the shell.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] OrchardError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            other => CliError::Command(other.to_string()),
        }
    }
}

/// Closest candidate within a small edit distance.
pub(crate) fn closest_match<'a>(
    input: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<&'a str> {
    candidates
        .into_iter()
        .map(|candidate| (levenshtein(candidate, input), candidate))
        .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}

impl ShellContext {
    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match super::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.last_command = Some(line.trim().to_string());

        match self.dispatch(&command, &tokens[0], &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = closest_match(&input.to_lowercase(), self.registry.names()) {
            cli_io::print_info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    /// Prints a command failure; configuration errors end the shell.
    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(err) if err.is_fatal() => Err(CliError::Core(err)),
            CommandError::Core(OrchardError::VarietyNotFound(name)) => {
                cli_io::print_error(OrchardError::VarietyNotFound(name.clone()));
                if let Some(best) = closest_match(&name, VARIETY_COLUMNS) {
                    cli_io::print_info(format!("Did you mean `{}`?", best));
                }
                Ok(())
            }
            other => {
                cli_io::print_error(other);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn process_script(
    context: &mut ShellContext,
    lines: &[&str],
) -> Result<(), CliError> {
    for line in lines {
        match context.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Orchard;
    use crate::ledger::SequenceKind;
    use tempfile::TempDir;

    fn script_context() -> (ShellContext, TempDir) {
        let temp = TempDir::new().unwrap();
        let orchard = Orchard::open_dir(temp.path()).unwrap();
        (ShellContext::with_orchard(CliMode::Script, orchard), temp)
    }

    #[test]
    fn closest_match_respects_distance() {
        assert_eq!(closest_match("Lapin", VARIETY_COLUMNS), Some("Lapins"));
        assert_eq!(closest_match("Watermelon", VARIETY_COLUMNS), None);
    }

    #[test]
    fn script_drives_the_orchard() {
        let (mut context, _guard) = script_context();
        process_script(
            &mut context,
            &[
                "estimate",
                "add-inventory Lapins 500",
                "pick Lapins 40",
                "sell Lapins 600",
                "sell Lapinz 1",
            ],
        )
        .unwrap();
        let orchard = context.orchard();
        assert_eq!(orchard.orders().len(), 1);
        assert_eq!(
            orchard
                .ledger()
                .quantity(SequenceKind::RemainingProductivity, "Lapins")
                .unwrap(),
            39460.0
        );
        assert_eq!(context.last_command.as_deref(), Some("sell Lapinz 1"));
    }

    #[test]
    fn exit_stops_processing() {
        let (mut context, _guard) = script_context();
        process_script(&mut context, &["exit", "estimate"]).unwrap();
        assert!(!context.running);
        assert!(context
            .orchard()
            .ledger()
            .history(SequenceKind::RemainingProductivity)
            .is_empty());
    }

    #[test]
    fn unpriced_sale_is_fatal() {
        let (mut context, _guard) = script_context();
        let err = process_script(&mut context, &["add-inventory Gala 10", "sell Gala 5"])
            .expect_err("Gala has no price");
        assert!(matches!(err, CliError::Core(OrchardError::Unpriced(_))));
    }
}
