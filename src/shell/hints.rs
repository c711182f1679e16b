//! Inline hints: the rest of a command name, or its missing arguments.

use rustyline::Context;
use rustyline::hint::Hinter;
use std::sync::Arc;

use crate::shell::command::{CommandRegistry, split_args};

pub struct SuperidHinter {
    registry: Arc<CommandRegistry>,
}

impl SuperidHinter {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    fn get_hint(&self, line: &str) -> Option<String> {
        let has_trailing_space = line.ends_with(char::is_whitespace);
        let parts = split_args(line);
        let command = parts.first()?;

        if parts.len() == 1 && !has_trailing_space {
            let completions = self.registry.completions(command);
            return match completions.as_slice() {
                [only] if only != command => Some(only[command.len()..].to_string()),
                _ => None,
            };
        }

        let cmd = self.registry.get(command)?;
        let expected: Vec<&str> = cmd
            .usage()
            .strip_prefix(cmd.name())?
            .split_whitespace()
            .collect();

        // A word being typed still counts as a given argument.
        let given = parts.len() - 1;
        if given >= expected.len() {
            return None;
        }
        let separator = if has_trailing_space { "" } else { " " };
        Some(format!("{}{}", separator, expected[given..].join(" ")))
    }
}

impl Hinter for SuperidHinter {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<Self::Hint> {
        if pos < line.len() {
            return None;
        }
        self.get_hint(line)
    }
}
