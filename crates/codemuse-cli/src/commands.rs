use codemuse_core::{AssistTab, Language};

/// Result of processing a slash command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Quit the application.
    Quit,
    /// Open a new file; `None` asks for a name.
    NewFile(Option<String>),
    /// Close the active file.
    CloseFile,
    /// Switch the active file's language.
    SwitchLanguage(Language),
    /// Run the active file.
    Run,
    /// Copy a shareable link for the active file.
    Share,
    /// Load a shared link.
    OpenLink(String),
    /// Send a request from the assistant.
    Assist { tab: AssistTab, prompt: String },
    /// Show the assistant on a tab without sending anything.
    FocusAssistant(AssistTab),
    /// Change the theme.
    ThemeChanged(String),
    /// Not a command - treat as regular input.
    NotACommand,
}

pub fn handle_command(input: &str) -> CommandResult {
    let input = input.trim();
    let (cmd, arg) = match input.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (input, ""),
    };

    match cmd {
        "/help" | "/h" => show_help(),
        "/exit" | "/quit" | "/q" => CommandResult::Quit,

        // Files
        "/new" => {
            if arg.is_empty() {
                CommandResult::NewFile(None)
            } else {
                CommandResult::NewFile(Some(arg.to_string()))
            }
        }
        "/close" => CommandResult::CloseFile,
        "/lang" | "/language" => {
            if arg.is_empty() {
                let names: Vec<&str> = Language::SELECTABLE.iter().map(|l| l.id()).collect();
                CommandResult::Message(format!(
                    "Languages: {}\nUsage: /lang <language>",
                    names.join(", ")
                ))
            } else {
                match Language::parse(arg) {
                    Some(lang) => CommandResult::SwitchLanguage(lang),
                    None => CommandResult::Message(format!("Unknown language: {arg}")),
                }
            }
        }

        // Run & share
        "/run" => CommandResult::Run,
        "/share" => CommandResult::Share,
        "/open" => {
            if arg.is_empty() {
                CommandResult::Message("Usage: /open <shared-link>".into())
            } else {
                CommandResult::OpenLink(arg.to_string())
            }
        }

        // Assistant
        "/generate" | "/gen" => assist(AssistTab::Generate, arg),
        "/improve" => assist(AssistTab::Improve, arg),
        // The explain question is optional.
        "/explain" => CommandResult::Assist {
            tab: AssistTab::Explain,
            prompt: arg.to_string(),
        },
        "/component" => assist(AssistTab::Component, arg),

        "/theme" => {
            if arg.is_empty() {
                let themes = crate::theme::Theme::all_names().join(", ");
                CommandResult::Message(format!("Available themes: {themes}\nUsage: /theme <theme-name>"))
            } else {
                CommandResult::ThemeChanged(arg.to_string())
            }
        }
        "/version" => CommandResult::Message(format!("CodeMuse v{}", env!("CARGO_PKG_VERSION"))),

        // Unknown command
        _ => {
            if input.starts_with('/') {
                CommandResult::Message(format!("Unknown command: {cmd}. Type /help for commands."))
            } else {
                CommandResult::NotACommand
            }
        }
    }
}

fn assist(tab: AssistTab, arg: &str) -> CommandResult {
    if arg.is_empty() {
        CommandResult::FocusAssistant(tab)
    } else {
        CommandResult::Assist {
            tab,
            prompt: arg.to_string(),
        }
    }
}

fn show_help() -> CommandResult {
    let help_text = "\
╭─ CodeMuse Commands ────────────────────────────────────────────╮

  FILES
    /new [name]               Open a new file
    /close                    Close the active file
    /lang <language>          Switch the active file's language
                              (replaces its code with a placeholder)

  RUN & SHARE
    /run                      Run the active file
    /share                    Copy a shareable link
    /open <link>              Open a shared link

  ASSISTANT
    /generate <request>       Generate code in the selected language
    /improve <instruction>    Rewrite the active file
    /explain [question]       Explain the active file
    /component <description>  Scaffold a React component

  OTHER
    /theme <name>             Change color theme
    /version                  Show version information
    /help, /h                 Show this help message
    /exit, /quit, /q          Quit the application

  KEYS
    Ctrl+R run   Ctrl+S share   Ctrl+N new   Ctrl+W close
    Ctrl+←/→ switch tab   Ctrl+A assistant   Ctrl+P command
    Ctrl+Q quit

╰────────────────────────────────────────────────────────────────╯";

    CommandResult::Message(help_text.into())
}
