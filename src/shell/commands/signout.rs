//! Sign-out command implementation.

use crate::shell::command::{Command, CommandResult, ShellContext};

pub struct SignOutCommand;

impl Command for SignOutCommand {
    fn name(&self) -> &str {
        "signout"
    }

    fn aliases(&self) -> &[&str] {
        &["logout"]
    }

    fn description(&self) -> &str {
        "Sign out and clear the listing"
    }

    fn usage(&self) -> &str {
        "signout"
    }

    fn execute(&self, _args: &[String], ctx: &mut ShellContext) -> CommandResult {
        match ctx.app.sign_out() {
            Some(user) => {
                log::info!("Signed out {}", user.email);
                CommandResult::success(format!("Signed out {}", user.email))
            }
            None => CommandResult::error("Not signed in."),
        }
    }

    fn max_args(&self) -> Option<usize> {
        Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::commands::testing::Fixture;

    #[test]
    fn test_signout_twice() {
        let mut fx = Fixture::signed_in();
        let mut ctx = fx.ctx();

        assert!(matches!(
            SignOutCommand.execute(&[], &mut ctx),
            CommandResult::Success(_)
        ));
        assert!(matches!(
            SignOutCommand.execute(&[], &mut ctx),
            CommandResult::Error(_)
        ));
    }
}
