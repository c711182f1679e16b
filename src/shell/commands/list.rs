//! List command implementation.

use crate::shell::command::{ArgKind, Command, CommandResult, ShellContext, quote_arg};

use super::{app_error, usage_error};

/// Command to list categories, or the logins of one category.
pub struct ListCommand;

impl Command for ListCommand {
    fn name(&self) -> &str {
        "list"
    }

    fn aliases(&self) -> &[&str] {
        &["ls", "l"]
    }

    fn description(&self) -> &str {
        "List categories or the logins in one"
    }

    fn usage(&self) -> &str {
        "list [category]"
    }

    fn help(&self) -> &str {
        "Without arguments, lists your categories in store order.\n\
         With a category name, lists the labels of its logins.\n\
         Secrets are never shown.\n\n\
         Examples:\n  \
           list\n  \
           ls Email"
    }

    fn execute(&self, args: &[String], ctx: &mut ShellContext) -> CommandResult {
        match args {
            [] => {
                if ctx.app.current_user().is_none() {
                    return CommandResult::error("Not signed in.");
                }
                let names = ctx.app.listing().names();
                if names.is_empty() {
                    return CommandResult::success("No categories.");
                }
                log::debug!("Listed {} categories", names.len());
                CommandResult::success(
                    names
                        .iter()
                        .map(|n| quote_arg(n))
                        .collect::<Vec<_>>()
                        .join("\n"),
                )
            }
            [category] => match ctx.runtime.block_on(ctx.app.list_logins(category)) {
                Ok(labels) if labels.is_empty() => {
                    CommandResult::success(format!("No logins in '{}'.", category))
                }
                Ok(labels) => CommandResult::success(labels.join("\n")),
                Err(e) => app_error(e),
            },
            _ => usage_error(self),
        }
    }

    fn arg_kind(&self, index: usize) -> ArgKind {
        if index == 0 {
            ArgKind::Category
        } else {
            ArgKind::Free
        }
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}
