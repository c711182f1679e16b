//! Save command: stores a login under a category.

use crate::shell::command::{ArgKind, Command, CommandResult, ShellContext};

use super::{app_error, usage_error};

/// Command to store a login.
pub struct SaveCommand;

impl Command for SaveCommand {
    fn name(&self) -> &str {
        "save"
    }

    fn aliases(&self) -> &[&str] {
        &["s", "set"]
    }

    fn description(&self) -> &str {
        "Store a login under a category"
    }

    fn usage(&self) -> &str {
        "save <category> <label> <username> <secret>"
    }

    fn help(&self) -> &str {
        "Store a login under a category, replacing any login with the\n\
         same label. The secret may contain spaces.\n\n\
         Examples:\n  \
           save Email gmail ana@gmail.com hunter2\n  \
           save WebSite github ana \"secret with spaces\""
    }

    fn execute(&self, args: &[String], ctx: &mut ShellContext) -> CommandResult {
        let [category, label, username, secret @ ..] = args else {
            return usage_error(self);
        };
        if secret.is_empty() {
            return usage_error(self);
        }
        let secret = secret.join(" ");

        match ctx
            .runtime
            .block_on(ctx.app.save_login(category, label, username, &secret))
        {
            Ok(()) => {
                log::info!("Saved login '{}' in '{}'", label, category);
                CommandResult::success(format!("Saved '{}' in '{}'", label, category))
            }
            Err(e) => app_error(e),
        }
    }

    fn arg_kind(&self, index: usize) -> ArgKind {
        match index {
            0 => ArgKind::Category,
            1 | 2 => ArgKind::Free,
            _ => ArgKind::Secret,
        }
    }

    fn sensitive(&self) -> bool {
        true
    }

    fn min_args(&self) -> usize {
        4
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::commands::testing::{Fixture, args};

    #[test]
    fn test_save_joins_secret() {
        let mut fx = Fixture::signed_in();
        let mut ctx = fx.ctx();

        let result = SaveCommand.execute(
            &args(&["WebSite", "github", "ana", "secret", "with", "spaces"]),
            &mut ctx,
        );

        assert!(matches!(result, CommandResult::Success(_)));
        let labels = fx
            .runtime
            .block_on(fx.app.list_logins("WebSite"))
            .unwrap();
        assert_eq!(labels, vec!["github"]);
    }

    #[test]
    fn test_save_unknown_category() {
        let mut fx = Fixture::signed_in();
        let mut ctx = fx.ctx();

        let result = SaveCommand.execute(&args(&["Nope", "l", "u", "s"]), &mut ctx);
        assert!(matches!(result, CommandResult::Error(_)));
    }

    #[test]
    fn test_save_missing_secret() {
        let mut fx = Fixture::signed_in();
        let mut ctx = fx.ctx();

        let result = SaveCommand.execute(&args(&["WebSite", "github", "ana"]), &mut ctx);
        assert!(matches!(result, CommandResult::Error(_)));
    }
}
