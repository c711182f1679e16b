//! Help command implementation.

use crate::shell::command::{ArgKind, Command, CommandRegistry, CommandResult, ShellContext};

/// Command to display help information.
pub struct HelpCommand;

impl Command for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn aliases(&self) -> &[&str] {
        &["h", "?"]
    }

    fn description(&self) -> &str {
        "Display help information"
    }

    fn usage(&self) -> &str {
        "help [command]"
    }

    fn help(&self) -> &str {
        "Without arguments, lists all available commands.\n\
         With a command name, shows detailed help for that command.\n\n\
         Examples:\n  \
           help\n  \
           help delete\n  \
           ? save"
    }

    fn execute(&self, args: &[String], ctx: &mut ShellContext) -> CommandResult {
        let Some(registry) = ctx.registry else {
            return CommandResult::error("Help not available (no registry)");
        };

        match args.first() {
            None => CommandResult::success(overview(registry)),
            Some(word) => match registry.get(word) {
                Some(cmd) => CommandResult::success(details(cmd.as_ref())),
                None => CommandResult::error(format!(
                    "No command named '{}'. Type 'help' for the list.",
                    word
                )),
            },
        }
    }

    fn arg_kind(&self, index: usize) -> ArgKind {
        if index == 0 {
            ArgKind::Command
        } else {
            ArgKind::Free
        }
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// Commands that act on the signed-in user's categories.
const CATEGORY_COMMANDS: &[&str] = &["list", "add", "save", "forget", "delete"];

fn overview(registry: &CommandRegistry) -> String {
    let mut commands: Vec<_> = registry.commands().collect();
    commands.sort_by_key(|c| c.name().to_string());
    let (categories, session): (Vec<_>, Vec<_>) = commands
        .into_iter()
        .partition(|c| CATEGORY_COMMANDS.contains(&c.name()));

    let mut out = String::new();
    for (title, group) in [("Session", session), ("Categories", categories)] {
        out.push_str(title);
        out.push_str(":\n");
        for cmd in group {
            out.push_str(&format!("  {:<44}{}\n", cmd.usage(), cmd.description()));
        }
        out.push('\n');
    }
    out.push_str("'help <command>' shows details and aliases.");
    out
}

fn details(cmd: &dyn Command) -> String {
    let mut out = format!("usage: {}\n", cmd.usage());
    if !cmd.aliases().is_empty() {
        out.push_str(&format!("aliases: {}\n", cmd.aliases().join(", ")));
    }
    if cmd.sensitive() {
        out.push_str("not recorded in history\n");
    }
    out.push('\n');
    out.push_str(cmd.help());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::commands::register_all;
    use crate::shell::commands::testing::{Fixture, args};

    fn setup_registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        registry
    }

    #[test]
    fn test_help_command_list_all() {
        let registry = setup_registry();
        let mut fx = Fixture::new();
        let mut ctx = fx.ctx().with_registry(&registry);

        match HelpCommand.execute(&[], &mut ctx) {
            CommandResult::Success(Some(msg)) => {
                assert!(msg.contains("Session:"));
                assert!(msg.contains("Categories:"));
                for name in ["signup", "signin", "list", "add", "save", "delete", "quit"] {
                    assert!(msg.contains(name), "missing {}", name);
                }
            }
            other => panic!("Expected help text, got {:?}", other),
        }
    }

    #[test]
    fn test_help_command_specific() {
        let registry = setup_registry();
        let mut fx = Fixture::new();
        let mut ctx = fx.ctx().with_registry(&registry);

        match HelpCommand.execute(&args(&["rm"]), &mut ctx) {
            CommandResult::Success(Some(msg)) => {
                assert!(msg.starts_with("usage: delete <category>"));
                assert!(msg.contains("aliases: rm"));
            }
            other => panic!("Expected delete help, got {:?}", other),
        }
    }

    #[test]
    fn test_help_command_unknown() {
        let registry = setup_registry();
        let mut fx = Fixture::new();
        let mut ctx = fx.ctx().with_registry(&registry);

        let result = HelpCommand.execute(&args(&["nonexistent"]), &mut ctx);
        assert!(matches!(result, CommandResult::Error(_)));
    }

    #[test]
    fn test_help_marks_sensitive_commands() {
        let registry = setup_registry();
        let mut fx = Fixture::new();
        let mut ctx = fx.ctx().with_registry(&registry);

        match HelpCommand.execute(&args(&["signin"]), &mut ctx) {
            CommandResult::Success(Some(msg)) => assert!(msg.contains("not recorded in history")),
            other => panic!("Expected signin help, got {:?}", other),
        }
    }
}
