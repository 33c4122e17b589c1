use std::io::{self, BufRead, Lines, StdinLock};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    history::DefaultHistory,
    Cmd, Context as ReadlineContext, Editor, Helper, Highlighter, Hinter, KeyEvent, Validator,
};

use crate::catalog::VARIETY_COLUMNS;
use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::io as cli_io;

const SCRIPT_ENV: &str = "ORCHARD_CLI_SCRIPT";

/// Commands whose first argument is a variety name.
const VARIETY_COMMANDS: [&str; 5] = ["sell", "pick", "check", "add-inventory", "remove-inventory"];
const LEDGER_NAMES: [&str; 3] = ["inventory", "remaining", "extra"];
const GROUP_KEYS: [&str; 2] = ["sales_type", "fruit_type"];
const AREA_TYPES: [&str; 2] = ["pick", "market"];

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    let mut input = match mode {
        CliMode::Interactive => LineSource::interactive(&context)?,
        CliMode::Script => LineSource::script(),
    };

    while context.running {
        let Some(line) = input.next_line(&mut context)? else {
            break;
        };
        match context.process_line(&line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

/// Where command lines come from: the line editor or piped stdin.
enum LineSource {
    Editor(Box<Editor<CommandHelper, DefaultHistory>>),
    Script(Lines<StdinLock<'static>>),
}

impl LineSource {
    fn interactive(context: &ShellContext) -> Result<Self, CliError> {
        let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(CommandHelper::new(context.command_names())));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
        cli_io::print_info("Orchard shell ready. Type `help` for commands or `menu` to browse.");
        Ok(Self::Editor(Box::new(editor)))
    }

    fn script() -> Self {
        Self::Script(io::stdin().lock().lines())
    }

    /// `None` once input is exhausted or the user leaves.
    fn next_line(&mut self, context: &mut ShellContext) -> Result<Option<String>, CliError> {
        let editor = match self {
            Self::Script(lines) => return Ok(lines.next().transpose()?),
            Self::Editor(editor) => editor,
        };
        loop {
            match editor.readline(&context.prompt()) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    editor.add_history_entry(trimmed).ok();
                    return Ok(Some(trimmed.to_string()));
                }
                Err(ReadlineError::Interrupted) => {
                    if context.confirm_exit()? {
                        return Ok(None);
                    }
                }
                Err(ReadlineError::Eof) => {
                    cli_io::print_info("Exiting shell.");
                    return Ok(None);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

#[derive(Helper, Hinter, Highlighter, Validator)]
struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names.into_iter().map(str::to_string).collect();
        commands.sort();
        Self { commands }
    }

    /// Completions for the word after `words`, matched case-insensitively.
    fn candidates(&self, words: &[&str], needle: &str) -> Vec<String> {
        let vocabulary: Vec<&str> = match words {
            [] | ["help"] => self.commands.iter().map(String::as_str).collect(),
            [command] if VARIETY_COMMANDS.contains(command) => VARIETY_COLUMNS.to_vec(),
            ["history"] => LEDGER_NAMES.to_vec(),
            ["revenue"] => GROUP_KEYS.to_vec(),
            ["region-switch", _] => AREA_TYPES.to_vec(),
            _ => Vec::new(),
        };
        let needle = needle.to_ascii_lowercase();
        vocabulary
            .into_iter()
            .filter(|word| word.to_ascii_lowercase().starts_with(&needle))
            .map(str::to_string)
            .collect()
    }
}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix.rfind(char::is_whitespace).map_or(0, |idx| idx + 1);
        let typed: Vec<String> = prefix[..start]
            .split_whitespace()
            .map(str::to_ascii_lowercase)
            .collect();
        let words: Vec<&str> = typed.iter().map(String::as_str).collect();
        let pairs = self
            .candidates(&words, &prefix[start..])
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, pairs))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, CommandError> {
    shell_words::split(input)
        .map_err(|err| CommandError::InvalidArguments(format!("could not parse `{input}`: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper() -> CommandHelper {
        CommandHelper::new(vec!["revenue", "revenue-share", "remaining", "sell", "help"])
    }

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = parse_command_line("history remaining 'cherry'").unwrap();
        assert_eq!(tokens, vec!["history", "remaining", "cherry"]);
        let err = parse_command_line("sell \"Lapins 4").expect_err("unbalanced quote");
        assert!(err.to_string().starts_with("could not parse"), "unexpected: {err}");
    }

    #[test]
    fn first_word_completes_command_names() {
        assert_eq!(helper().candidates(&[], "rev"), vec!["revenue", "revenue-share"]);
        assert_eq!(helper().candidates(&["help"], "se"), vec!["sell"]);
    }

    #[test]
    fn arguments_complete_from_the_orchard_vocabulary() {
        let helper = helper();
        assert_eq!(helper.candidates(&["sell"], "la"), vec!["Lapins"]);
        assert_eq!(helper.candidates(&["history"], "e"), vec!["extra"]);
        assert_eq!(helper.candidates(&["revenue"], ""), vec!["sales_type", "fruit_type"]);
        assert_eq!(helper.candidates(&["region-switch", "2"], "m"), vec!["market"]);
        assert!(helper.candidates(&["sell", "Lapins"], "").is_empty());
    }
}
