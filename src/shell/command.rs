//! Command trait, registry and argument splitting for the shell.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;

use crate::app::App;

/// Result of executing a command.
#[derive(Debug, Clone)]
pub enum CommandResult {
    /// Command executed successfully with optional message.
    Success(Option<String>),
    /// Command ran but the request was refused.
    Warning(String),
    /// Command failed with error message.
    Error(String),
    /// Signal to exit the shell.
    Exit,
    /// Continue without output.
    Continue,
}

impl CommandResult {
    pub fn success(msg: impl Into<String>) -> Self {
        CommandResult::Success(Some(msg.into()))
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        CommandResult::Warning(msg.into())
    }

    pub fn error(msg: impl Into<String>) -> Self {
        CommandResult::Error(msg.into())
    }
}

/// What an argument position holds, for completion and highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Category,
    Command,
    Secret,
    Free,
}

/// State available to commands during execution.
pub struct ShellContext<'a> {
    pub app: &'a mut App,
    /// Runtime the app's async operations are driven on.
    pub runtime: &'a Handle,
    /// Reference to the command registry for the help command.
    pub registry: Option<&'a CommandRegistry>,
}

impl<'a> ShellContext<'a> {
    pub fn new(app: &'a mut App, runtime: &'a Handle) -> Self {
        Self {
            app,
            runtime,
            registry: None,
        }
    }

    pub fn with_registry(mut self, registry: &'a CommandRegistry) -> Self {
        self.registry = Some(registry);
        self
    }
}

/// A command that can be executed in the shell.
pub trait Command: Send + Sync {
    /// Returns the primary name of the command.
    fn name(&self) -> &str;

    /// Returns command aliases (alternative names).
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Returns a short description of the command.
    fn description(&self) -> &str;

    /// Returns usage information (e.g., "delete <category>").
    fn usage(&self) -> &str;

    /// Returns detailed help text.
    fn help(&self) -> &str {
        self.description()
    }

    /// Executes the command with the given arguments.
    fn execute(&self, args: &[String], ctx: &mut ShellContext) -> CommandResult;

    /// Kind of the argument at `index` (0-based).
    fn arg_kind(&self, _index: usize) -> ArgKind {
        ArgKind::Free
    }

    /// Lines invoking this command are kept out of the history file.
    fn sensitive(&self) -> bool {
        false
    }

    /// Returns the minimum number of required arguments.
    fn min_args(&self) -> usize {
        0
    }

    /// Returns the maximum number of arguments (None = unlimited).
    fn max_args(&self) -> Option<usize> {
        None
    }
}

impl fmt::Debug for dyn Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name())
            .field("description", &self.description())
            .finish()
    }
}

/// Registry of all available commands.
pub struct CommandRegistry {
    /// Commands indexed by their primary name.
    commands: HashMap<String, Arc<dyn Command>>,
    /// Alias to primary name mapping.
    aliases: HashMap<String, String>,
    /// Names and aliases, sorted for prefix completion.
    words: BTreeSet<String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
            aliases: HashMap::new(),
            words: BTreeSet::new(),
        }
    }

    pub fn register(&mut self, command: Arc<dyn Command>) {
        let name = command.name().to_string();
        self.words.insert(name.clone());

        for alias in command.aliases() {
            self.aliases.insert(alias.to_string(), name.clone());
            self.words.insert(alias.to_string());
        }

        self.commands.insert(name, command);
    }

    /// Looks up a command by name or alias.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        if let Some(cmd) = self.commands.get(name) {
            return Some(Arc::clone(cmd));
        }
        self.aliases
            .get(name)
            .and_then(|primary| self.commands.get(primary))
            .map(Arc::clone)
    }

    pub fn commands(&self) -> impl Iterator<Item = &Arc<dyn Command>> {
        self.commands.values()
    }

    /// Command names and aliases starting with `prefix`, sorted.
    pub fn completions(&self, prefix: &str) -> Vec<String> {
        self.words
            .range(prefix.to_string()..)
            .take_while(|w| w.starts_with(prefix))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits a command line on whitespace. Double quotes group words, so
/// category names may contain spaces. An unterminated quote runs to the
/// end of the line.
pub fn split_args(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        args.push(current);
    }
    args
}

/// Quotes a word for the command line if it contains whitespace.
pub fn quote_arg(word: &str) -> String {
    if word.chars().any(char::is_whitespace) {
        format!("\"{}\"", word)
    } else {
        word.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestCommand;

    impl Command for TestCommand {
        fn name(&self) -> &str {
            "test"
        }

        fn aliases(&self) -> &[&str] {
            &["t", "tst"]
        }

        fn description(&self) -> &str {
            "A test command"
        }

        fn usage(&self) -> &str {
            "test [args...]"
        }

        fn execute(&self, args: &[String], _ctx: &mut ShellContext) -> CommandResult {
            CommandResult::success(format!("Args: {:?}", args))
        }
    }

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(TestCommand));

        assert!(registry.get("test").is_some());
        assert!(registry.get("t").is_some());
        assert!(registry.get("tst").is_some());
        assert!(registry.get("unknown").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_completions() {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(TestCommand));

        assert_eq!(registry.completions("te"), vec!["test"]);
        assert_eq!(registry.completions("t"), vec!["t", "test", "tst"]);
        assert!(registry.completions("x").is_empty());
    }

    #[test]
    fn test_split_args_plain() {
        assert_eq!(split_args("  delete   Email "), vec!["delete", "Email"]);
        assert!(split_args("   ").is_empty());
    }

    #[test]
    fn test_split_args_quoted() {
        assert_eq!(
            split_args(r#"add "Teclados de Acesso" x"#),
            vec!["add", "Teclados de Acesso", "x"]
        );
        assert_eq!(split_args(r#"add """#), vec!["add", ""]);
        assert_eq!(split_args(r#"add "open ended"#), vec!["add", "open ended"]);
    }

    #[test]
    fn test_quote_arg() {
        assert_eq!(quote_arg("Email"), "Email");
        assert_eq!(quote_arg("Sites Web"), "\"Sites Web\"");
    }
}
