//! Sign-in command implementation.

use crate::shell::command::{ArgKind, Command, CommandResult, ShellContext};

use super::{app_error, usage_error};

pub struct SignInCommand;

impl Command for SignInCommand {
    fn name(&self) -> &str {
        "signin"
    }

    fn aliases(&self) -> &[&str] {
        &["login"]
    }

    fn description(&self) -> &str {
        "Sign in and load your categories"
    }

    fn usage(&self) -> &str {
        "signin <email> <password>"
    }

    fn execute(&self, args: &[String], ctx: &mut ShellContext) -> CommandResult {
        let [email, password] = args else {
            return usage_error(self);
        };

        match ctx.runtime.block_on(ctx.app.sign_in(email, password)) {
            Ok(count) => CommandResult::success(format!(
                "Signed in as {} ({} {})",
                email.trim(),
                count,
                if count == 1 { "category" } else { "categories" }
            )),
            Err(e) => app_error(e),
        }
    }

    fn arg_kind(&self, index: usize) -> ArgKind {
        if index == 1 {
            ArgKind::Secret
        } else {
            ArgKind::Free
        }
    }

    fn sensitive(&self) -> bool {
        true
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}
