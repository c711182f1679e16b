//! Sign-up command: hands the fields to the registration dispatcher.

use std::sync::mpsc;

use crate::shell::command::{ArgKind, Command, CommandResult, ShellContext};

use super::usage_error;

pub struct SignUpCommand;

impl Command for SignUpCommand {
    fn name(&self) -> &str {
        "signup"
    }

    fn aliases(&self) -> &[&str] {
        &["register"]
    }

    fn description(&self) -> &str {
        "Create an account"
    }

    fn usage(&self) -> &str {
        "signup <name> <email> <password>"
    }

    fn help(&self) -> &str {
        "Create an account on this device. Quote names with spaces.\n\
         The line is not saved to the history file.\n\n\
         Examples:\n  \
           signup Ana ana@example.com s3cret!\n  \
           signup \"Ana Souza\" ana@example.com s3cret!"
    }

    fn execute(&self, args: &[String], ctx: &mut ShellContext) -> CommandResult {
        let [name, email, password] = args else {
            return usage_error(self);
        };

        let (tx, rx) = mpsc::channel();
        let failure_tx = tx.clone();

        let task = {
            let _runtime = ctx.runtime.enter();
            ctx.app.sign_up(
                name,
                email,
                password,
                move || {
                    let _ = tx.send(Ok(()));
                },
                move |message| {
                    let _ = failure_tx.send(Err(message));
                },
            )
        };

        if let Err(e) = ctx.runtime.block_on(task) {
            log::error!("Sign-up task failed: {}", e);
            return CommandResult::error(e.to_string());
        }

        match rx.try_recv() {
            Ok(Ok(())) => CommandResult::success(format!(
                "Account created for {}. Use 'signin' to continue.",
                email.trim()
            )),
            Ok(Err(message)) => CommandResult::error(message),
            Err(e) => CommandResult::error(e.to_string()),
        }
    }

    fn arg_kind(&self, index: usize) -> ArgKind {
        if index == 2 {
            ArgKind::Secret
        } else {
            ArgKind::Free
        }
    }

    fn sensitive(&self) -> bool {
        true
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}
