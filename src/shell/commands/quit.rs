//! Quit command implementation.

use crate::shell::command::{Command, CommandResult, ShellContext};

/// Command to exit the shell.
pub struct QuitCommand;

impl Command for QuitCommand {
    fn name(&self) -> &str {
        "quit"
    }

    fn aliases(&self) -> &[&str] {
        &["exit", "q"]
    }

    fn description(&self) -> &str {
        "Exit SuperID"
    }

    fn usage(&self) -> &str {
        "quit"
    }

    fn execute(&self, _args: &[String], _ctx: &mut ShellContext) -> CommandResult {
        log::info!("User requested exit");
        CommandResult::Exit
    }

    fn max_args(&self) -> Option<usize> {
        Some(0)
    }
}
