//! Interactive shell built on rustyline.
//!
//! Provides command completion (including category names), usage hints,
//! input highlighting and a persistent history file.

pub mod command;
pub mod commands;
pub mod completer;
pub mod highlighter;
pub mod hints;

use anyhow::Result;
use rustyline::completion::Completer;
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::FileHistory;
use rustyline::validate::{
    MatchingBracketValidator, ValidationContext, ValidationResult, Validator,
};
use rustyline::{Context, Editor, Helper};
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;

use crate::app::App;
use crate::config::AppConfig;
use crate::listing::CategoryListing;

use command::{CommandRegistry, CommandResult, ShellContext, split_args};
use commands::register_all;
use completer::SuperidCompleter;
use highlighter::{OutputHighlighter, SuperidHighlighter};
use hints::SuperidHinter;

/// Prompt naming the signed-in account, if any.
fn prompt(app: &App) -> String {
    match app.current_user() {
        Some(user) => format!("superid({})> ", user.email),
        None => "superid> ".to_string(),
    }
}

/// Combined rustyline helper.
pub struct SuperidHelper {
    completer: SuperidCompleter,
    highlighter: SuperidHighlighter,
    hinter: SuperidHinter,
    validator: MatchingBracketValidator,
}

impl SuperidHelper {
    pub fn new(registry: Arc<CommandRegistry>, listing: CategoryListing) -> Self {
        Self {
            completer: SuperidCompleter::new(Arc::clone(&registry), listing),
            highlighter: SuperidHighlighter::new(Arc::clone(&registry)),
            hinter: SuperidHinter::new(registry),
            validator: MatchingBracketValidator::new(),
        }
    }
}

impl Completer for SuperidHelper {
    type Candidate = rustyline::completion::Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        self.completer.complete(line, pos, ctx)
    }
}

impl Highlighter for SuperidHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        self.highlighter.highlight_prompt(prompt, default)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        self.highlighter.highlight_hint(hint)
    }

    fn highlight_candidate<'c>(
        &self,
        candidate: &'c str,
        completion: rustyline::CompletionType,
    ) -> Cow<'c, str> {
        self.highlighter.highlight_candidate(candidate, completion)
    }

    fn highlight_char(&self, line: &str, pos: usize, kind: rustyline::highlight::CmdKind) -> bool {
        self.highlighter.highlight_char(line, pos, kind)
    }
}

impl Hinter for SuperidHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<Self::Hint> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Validator for SuperidHelper {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        self.validator.validate(ctx)
    }
}

impl Helper for SuperidHelper {}

#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub history_path: PathBuf,
    pub max_history: usize,
    pub show_welcome: bool,
}

impl ShellConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            history_path: config.history_path.clone(),
            max_history: config.history_max_entries,
            show_welcome: true,
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

pub struct Shell {
    registry: Arc<CommandRegistry>,
    config: ShellConfig,
}

impl Shell {
    pub fn new() -> Self {
        Self::with_config(ShellConfig::default())
    }

    pub fn with_config(config: ShellConfig) -> Self {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        Self {
            registry: Arc::new(registry),
            config,
        }
    }

    /// Runs the read-eval-print loop until `quit` or end of input.
    ///
    /// Must be called from outside the runtime: commands block on `runtime`
    /// while their remote calls complete.
    pub fn run(&self, app: &mut App, runtime: &Handle) -> Result<()> {
        let helper = SuperidHelper::new(Arc::clone(&self.registry), app.listing().clone());
        let mut editor: Editor<SuperidHelper, FileHistory> = Editor::new()?;
        editor.set_helper(Some(helper));
        editor.set_max_history_size(self.config.max_history)?;

        if self.config.history_path.exists() {
            if let Err(e) = editor.load_history(&self.config.history_path) {
                log::warn!("Could not load history: {}", e);
            }
        }

        if self.config.show_welcome {
            println!("Welcome to SuperID. Type 'help' for available commands.");
        }
        log::info!("Shell started");

        loop {
            match editor.readline(&prompt(app)) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if self.records_history(line) {
                        let _ = editor.add_history_entry(line);
                    }

                    let mut ctx = ShellContext::new(app, runtime).with_registry(&self.registry);
                    match self.execute_line(line, &mut ctx) {
                        CommandResult::Success(Some(msg)) => println!("{}", msg),
                        CommandResult::Success(None) | CommandResult::Continue => {}
                        CommandResult::Warning(msg) => {
                            println!("{}", OutputHighlighter::warning(&msg))
                        }
                        CommandResult::Error(msg) => {
                            eprintln!("{}", OutputHighlighter::error(&msg))
                        }
                        CommandResult::Exit => break,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("exit");
                    log::info!("EOF received (Ctrl-D)");
                    break;
                }
                Err(err) => {
                    eprintln!("{}", OutputHighlighter::error(&format!("Error: {}", err)));
                    log::error!("Readline error: {}", err);
                    break;
                }
            }
        }

        if let Some(parent) = self.config.history_path.parent() {
            if !parent.exists() {
                let _ = std::fs::create_dir_all(parent);
            }
        }
        if let Err(e) = editor.save_history(&self.config.history_path) {
            log::warn!("Failed to save history: {}", e);
        }

        log::info!("Shell exited");
        Ok(())
    }

    /// Lines for sensitive commands (those carrying passwords or secrets)
    /// are not written to history.
    fn records_history(&self, line: &str) -> bool {
        match split_args(line).first() {
            Some(name) => self
                .registry
                .get(name)
                .is_none_or(|cmd| !cmd.sensitive()),
            None => false,
        }
    }

    /// Parses and executes one command line.
    pub fn execute_line(&self, line: &str, ctx: &mut ShellContext) -> CommandResult {
        let parts = split_args(line);
        let Some((cmd_name, args)) = parts.split_first() else {
            return CommandResult::Continue;
        };

        let Some(cmd) = self.registry.get(cmd_name) else {
            return CommandResult::error(format!(
                "Unknown command: '{}'\nType 'help' to see available commands.",
                cmd_name
            ));
        };

        if args.len() < cmd.min_args() || cmd.max_args().is_some_and(|max| args.len() > max) {
            return CommandResult::error(format!("Usage: {}", cmd.usage()));
        }

        log::debug!("Executing command: {} ({} args)", cmd.name(), args.len());
        let start = std::time::Instant::now();
        let result = cmd.execute(args, ctx);
        log::debug!("Command '{}' completed in {:?}", cmd.name(), start.elapsed());
        result
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}
