//! Delete command: runs the category deletion guard.

use crate::guard::DeleteOutcome;
use crate::shell::command::{ArgKind, Command, CommandResult, ShellContext};

use super::{app_error, usage_error};

/// Command to delete a category.
pub struct DeleteCommand;

impl Command for DeleteCommand {
    fn name(&self) -> &str {
        "delete"
    }

    fn aliases(&self) -> &[&str] {
        &["rm", "del"]
    }

    fn description(&self) -> &str {
        "Delete a category"
    }

    fn usage(&self) -> &str {
        "delete <category>"
    }

    fn help(&self) -> &str {
        "Delete a category from your account.\n\n\
         The default 'WebSite' category cannot be deleted, and a category\n\
         that still holds logins must be emptied first (see 'forget').\n\n\
         Examples:\n  \
           delete Email\n  \
           rm \"Sites Web\""
    }

    fn execute(&self, args: &[String], ctx: &mut ShellContext) -> CommandResult {
        let [category] = args else {
            return usage_error(self);
        };

        log::debug!("Delete requested for category: {}", category);
        let outcome = match ctx.runtime.block_on(ctx.app.request_delete(category)) {
            Ok(outcome) => outcome,
            Err(e) => return app_error(e),
        };

        match &outcome {
            DeleteOutcome::Deleted => CommandResult::success(outcome.notice()),
            DeleteOutcome::Rejected(_) => CommandResult::warning(outcome.notice()),
            DeleteOutcome::Failed(_) => CommandResult::error(outcome.notice()),
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
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::commands::testing::{Fixture, args};

    #[test]
    fn test_delete_empty_category() {
        let mut fx = Fixture::signed_in();
        fx.runtime.block_on(fx.app.add_category("Email")).unwrap();
        let mut ctx = fx.ctx();

        let result = DeleteCommand.execute(&args(&["Email"]), &mut ctx);

        match result {
            CommandResult::Success(Some(msg)) => assert!(msg.contains("sucesso")),
            other => panic!("Expected success, got {:?}", other),
        }
        assert_eq!(fx.app.listing().names(), vec!["WebSite"]);
    }

    #[test]
    fn test_delete_protected_category_warns() {
        let mut fx = Fixture::signed_in();
        let mut ctx = fx.ctx();

        let result = DeleteCommand.execute(&args(&["WebSite"]), &mut ctx);

        assert!(matches!(result, CommandResult::Warning(msg) if msg.contains("WebSite")));
        assert_eq!(fx.app.listing().len(), 1);
    }

    #[test]
    fn test_delete_category_with_logins_warns() {
        let mut fx = Fixture::signed_in();
        fx.runtime.block_on(fx.app.add_category("Email")).unwrap();
        fx.runtime
            .block_on(fx.app.save_login("Email", "gmail", "ana", "s3cret"))
            .unwrap();
        let mut ctx = fx.ctx();

        let result = DeleteCommand.execute(&args(&["Email"]), &mut ctx);

        assert!(matches!(result, CommandResult::Warning(msg) if msg.contains("logins")));
        assert_eq!(fx.app.listing().len(), 2);
    }

    #[test]
    fn test_delete_requires_sign_in() {
        let mut fx = Fixture::new();
        let mut ctx = fx.ctx();

        let result = DeleteCommand.execute(&args(&["Email"]), &mut ctx);
        assert!(matches!(result, CommandResult::Error(msg) if msg.contains("signin")));
    }

    #[test]
    fn test_delete_missing_args() {
        let mut fx = Fixture::signed_in();
        let mut ctx = fx.ctx();

        assert!(matches!(
            DeleteCommand.execute(&[], &mut ctx),
            CommandResult::Error(_)
        ));
    }
}
