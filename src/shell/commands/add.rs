//! Add command implementation.

use crate::shell::command::{Command, CommandResult, ShellContext};

use super::{app_error, usage_error};

/// Command to create a category.
pub struct AddCommand;

impl Command for AddCommand {
    fn name(&self) -> &str {
        "add"
    }

    fn aliases(&self) -> &[&str] {
        &["a", "new"]
    }

    fn description(&self) -> &str {
        "Create a category"
    }

    fn usage(&self) -> &str {
        "add <category>"
    }

    fn help(&self) -> &str {
        "Create a new category for your logins.\n\n\
         Quote names that contain spaces.\n\n\
         Examples:\n  \
           add Email\n  \
           add \"Teclados de Acesso\""
    }

    fn execute(&self, args: &[String], ctx: &mut ShellContext) -> CommandResult {
        let [category] = args else {
            return usage_error(self);
        };

        match ctx.runtime.block_on(ctx.app.add_category(category)) {
            Ok(true) => {
                log::info!("Added category: {}", category);
                CommandResult::success(format!("Added '{}'", category.trim()))
            }
            Ok(false) => CommandResult::warning(format!("'{}' already exists.", category.trim())),
            Err(e) => {
                log::warn!("Failed to add category '{}': {}", category, e);
                app_error(e)
            }
        }
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}
