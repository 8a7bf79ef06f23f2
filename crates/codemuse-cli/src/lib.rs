// Library interface for codemuse-cli, used by the integration tests.

// commands.rs and theme.rs are also declared in main.rs; the path attribute
// points both crates at the same source file.

#[path = "commands.rs"]
pub mod commands;

#[path = "theme.rs"]
pub mod theme;

pub use commands::{handle_command, CommandResult};
pub use theme::Theme;
