//! Input highlighting and colored output for the shell.

use rustyline::highlight::{CmdKind, Highlighter};
use std::borrow::Cow;
use std::sync::Arc;

use crate::shell::command::{ArgKind, CommandRegistry};

/// ANSI escape codes.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const WHITE: &str = "\x1b[37m";

    pub const BRIGHT_RED: &str = "\x1b[91m";
    pub const BRIGHT_GREEN: &str = "\x1b[92m";
    pub const BRIGHT_CYAN: &str = "\x1b[96m";
}

pub struct SuperidHighlighter {
    registry: Arc<CommandRegistry>,
}

impl SuperidHighlighter {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    /// Colors the command by validity and each argument by its kind.
    /// Whitespace between words is preserved.
    fn highlight_line(&self, line: &str) -> String {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return line.to_string();
        };
        let cmd = self.registry.get(command);

        let mut result = String::with_capacity(line.len() * 2);
        let mut pos = 0;
        for (index, word) in std::iter::once(command).chain(words).enumerate() {
            let start = pos + line[pos..].find(word).unwrap_or(0);
            result.push_str(&line[pos..start]);

            let color = match (index, &cmd) {
                (0, Some(_)) => format!("{}{}", colors::BOLD, colors::CYAN),
                (0, None) => colors::RED.to_string(),
                (_, Some(cmd)) => match cmd.arg_kind(index - 1) {
                    ArgKind::Category => colors::MAGENTA.to_string(),
                    ArgKind::Command => colors::YELLOW.to_string(),
                    ArgKind::Secret => colors::DIM.to_string(),
                    ArgKind::Free => colors::WHITE.to_string(),
                },
                (_, None) => colors::WHITE.to_string(),
            };

            result.push_str(&color);
            result.push_str(word);
            result.push_str(colors::RESET);
            pos = start + word.len();
        }
        result.push_str(&line[pos..]);
        result
    }
}

impl Highlighter for SuperidHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Owned(self.highlight_line(line))
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        _default: bool,
    ) -> Cow<'b, str> {
        Cow::Owned(format!(
            "{}{}{}{}",
            colors::BOLD,
            colors::BRIGHT_GREEN,
            prompt,
            colors::RESET
        ))
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("{}{}{}", colors::DIM, hint, colors::RESET))
    }

    fn highlight_candidate<'c>(
        &self,
        candidate: &'c str,
        _completion: rustyline::CompletionType,
    ) -> Cow<'c, str> {
        Cow::Owned(format!(
            "{}{}{}",
            colors::BRIGHT_CYAN,
            candidate,
            colors::RESET
        ))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

/// Colors for command results.
pub struct OutputHighlighter;

impl OutputHighlighter {
    pub fn success(msg: &str) -> String {
        format!("{}{}{}", colors::GREEN, msg, colors::RESET)
    }

    pub fn warning(msg: &str) -> String {
        format!("{}{}{}", colors::YELLOW, msg, colors::RESET)
    }

    pub fn error(msg: &str) -> String {
        format!("{}{}{}", colors::BRIGHT_RED, msg, colors::RESET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::commands::register_all;

    fn setup_highlighter() -> SuperidHighlighter {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        SuperidHighlighter::new(Arc::new(registry))
    }

    #[test]
    fn test_highlight_valid_command() {
        let result = setup_highlighter().highlight_line("list");
        assert!(result.contains(colors::CYAN));
        assert!(result.contains(colors::BOLD));
        assert!(result.contains("list"));
    }

    #[test]
    fn test_highlight_invalid_command() {
        let result = setup_highlighter().highlight_line("invalid");
        assert!(result.contains(colors::RED));
        assert!(result.contains("invalid"));
    }

    #[test]
    fn test_highlight_argument_kinds() {
        let result = setup_highlighter().highlight_line("save Email gmail ana hunter2");
        assert!(result.contains(&format!("{}Email", colors::MAGENTA)));
        assert!(result.contains(&format!("{}hunter2", colors::DIM)));
    }

    #[test]
    fn test_whitespace_preserved() {
        let highlighter = setup_highlighter();
        assert_eq!(highlighter.highlight_line(""), "");
        assert_eq!(highlighter.highlight_line("   "), "   ");

        let result = highlighter.highlight_line("  rm   Email ");
        assert!(result.starts_with("  "));
        assert!(result.ends_with(' '));
    }

    #[test]
    fn test_output_highlighter() {
        assert!(OutputHighlighter::success("ok").contains(colors::GREEN));
        assert!(OutputHighlighter::warning("hm").contains(colors::YELLOW));
        assert!(OutputHighlighter::error("no").contains(colors::BRIGHT_RED));
    }
}
