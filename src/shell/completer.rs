//! Tab completion for command names and category arguments.

use rustyline::Context;
use rustyline::completion::{Completer, Pair};
use std::sync::Arc;

use crate::listing::CategoryListing;
use crate::shell::command::{ArgKind, CommandRegistry, quote_arg};

pub struct SuperidCompleter {
    registry: Arc<CommandRegistry>,
    /// The live category listing; completion always sees the latest state.
    listing: CategoryListing,
}

impl SuperidCompleter {
    pub fn new(registry: Arc<CommandRegistry>, listing: CategoryListing) -> Self {
        Self { registry, listing }
    }

    fn complete_command(&self, partial: &str) -> Vec<Pair> {
        self.registry
            .completions(partial)
            .into_iter()
            .map(|s| Pair {
                display: s.clone(),
                replacement: s,
            })
            .collect()
    }

    /// Category names starting with `partial`, quoted when they contain
    /// spaces. A leading quote in `partial` is ignored.
    fn complete_category(&self, partial: &str) -> Vec<Pair> {
        let prefix = partial.trim_start_matches('"');
        self.listing
            .names()
            .into_iter()
            .filter(|name| name.starts_with(prefix))
            .map(|name| Pair {
                replacement: quote_arg(&name),
                display: name,
            })
            .collect()
    }

    fn parse_context<'a>(&self, line: &'a str, pos: usize) -> CompletionContext<'a> {
        let line_to_pos = &line[..pos];
        let parts: Vec<&str> = line_to_pos.split_whitespace().collect();
        let ends_with_space = line_to_pos.ends_with(char::is_whitespace);

        match parts.as_slice() {
            [] => CompletionContext::Command { partial: "" },
            [command] if !ends_with_space => CompletionContext::Command { partial: *command },
            [command, rest @ ..] => {
                let (arg_index, partial) = if ends_with_space {
                    (rest.len(), "")
                } else {
                    (rest.len() - 1, rest.last().copied().unwrap_or(""))
                };
                CompletionContext::Argument {
                    command: *command,
                    arg_index,
                    partial,
                }
            }
        }
    }
}

/// Are we completing a command or one of its arguments?
#[derive(Debug)]
enum CompletionContext<'a> {
    Command {
        partial: &'a str,
    },
    Argument {
        command: &'a str,
        arg_index: usize,
        partial: &'a str,
    },
}

impl Completer for SuperidCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        match self.parse_context(line, pos) {
            CompletionContext::Command { partial } => {
                Ok((pos - partial.len(), self.complete_command(partial)))
            }
            CompletionContext::Argument {
                command,
                arg_index,
                partial,
            } => {
                let completions = match self.registry.get(command).map(|c| c.arg_kind(arg_index)) {
                    Some(ArgKind::Category) => self.complete_category(partial),
                    Some(ArgKind::Command) => self.complete_command(partial),
                    _ => vec![],
                };
                Ok((pos - partial.len(), completions))
            }
        }
    }
}
