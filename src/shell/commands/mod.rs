//! Individual command implementations.

mod add;
mod delete;
mod forget;
mod help;
mod list;
mod quit;
mod save;
mod signin;
mod signout;
mod signup;

pub use add::AddCommand;
pub use delete::DeleteCommand;
pub use forget::ForgetCommand;
pub use help::HelpCommand;
pub use list::ListCommand;
pub use quit::QuitCommand;
pub use save::SaveCommand;
pub use signin::SignInCommand;
pub use signout::SignOutCommand;
pub use signup::SignUpCommand;

use std::sync::Arc;

use super::command::{Command, CommandRegistry, CommandResult};
use crate::app::AppError;

/// Registers all built-in commands with the registry.
pub fn register_all(registry: &mut CommandRegistry) {
    registry.register(Arc::new(SignUpCommand));
    registry.register(Arc::new(SignInCommand));
    registry.register(Arc::new(SignOutCommand));
    registry.register(Arc::new(ListCommand));
    registry.register(Arc::new(AddCommand));
    registry.register(Arc::new(SaveCommand));
    registry.register(Arc::new(ForgetCommand));
    registry.register(Arc::new(DeleteCommand));
    registry.register(Arc::new(HelpCommand));
    registry.register(Arc::new(QuitCommand));
}

fn usage_error(cmd: &dyn Command) -> CommandResult {
    CommandResult::error(format!("Usage: {}", cmd.usage()))
}

fn app_error(err: AppError) -> CommandResult {
    match err {
        AppError::NotSignedIn => {
            CommandResult::error("Not signed in. Use 'signin <email> <password>' first.")
        }
        other => CommandResult::error(other.to_string()),
    }
}
