//! Forget command: removes a login.

use crate::shell::command::{ArgKind, Command, CommandResult, ShellContext};

use super::{app_error, usage_error};

pub struct ForgetCommand;

impl Command for ForgetCommand {
    fn name(&self) -> &str {
        "forget"
    }

    fn description(&self) -> &str {
        "Remove a login from a category"
    }

    fn usage(&self) -> &str {
        "forget <category> <label>"
    }

    fn execute(&self, args: &[String], ctx: &mut ShellContext) -> CommandResult {
        let [category, label] = args else {
            return usage_error(self);
        };

        match ctx.runtime.block_on(ctx.app.remove_login(category, label)) {
            Ok(true) => {
                log::info!("Removed login '{}' from '{}'", label, category);
                CommandResult::success(format!("Removed '{}' from '{}'", label, category))
            }
            Ok(false) => CommandResult::error(format!("'{}' not found in '{}'", label, category)),
            Err(e) => app_error(e),
        }
    }

    fn arg_kind(&self, index: usize) -> ArgKind {
        if index == 0 {
            ArgKind::Category
        } else {
            ArgKind::Free
        }
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}
