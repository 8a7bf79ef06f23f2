use codemuse_cli::commands::{handle_command, CommandResult};
use codemuse_cli::Theme;
use codemuse_core::{AssistTab, Language};

// ========================================================================
// Command Parsing Tests (commands.rs)
// ========================================================================

#[test]
fn test_help_command() {
    let result = handle_command("/help");
    if let CommandResult::Message(msg) = result {
        assert!(msg.contains("CodeMuse Commands"));
        assert!(msg.contains("/share"));
        assert!(msg.contains("Ctrl+R"));
    } else {
        panic!("expected help text, got {result:?}");
    }
}

#[test]
fn test_quit_aliases() {
    for cmd in ["/quit", "/exit", "/q"] {
        assert_eq!(handle_command(cmd), CommandResult::Quit, "{cmd}");
    }
}

#[test]
fn test_plain_text_is_not_a_command() {
    assert_eq!(handle_command("hello"), CommandResult::NotACommand);
}

#[test]
fn test_unknown_command_message() {
    match handle_command("/frobnicate now") {
        CommandResult::Message(msg) => assert!(msg.contains("Unknown command: /frobnicate")),
        other => panic!("unexpected {other:?}"),
    }
}

// --- FILES ---

#[test]
fn test_new_with_and_without_name() {
    assert_eq!(handle_command("/new"), CommandResult::NewFile(None));
    assert_eq!(
        handle_command("/new  app.py "),
        CommandResult::NewFile(Some("app.py".into()))
    );
}

#[test]
fn test_close_command() {
    assert_eq!(handle_command("/close"), CommandResult::CloseFile);
}

#[test]
fn test_lang_accepts_ids_and_extensions() {
    assert_eq!(
        handle_command("/lang python"),
        CommandResult::SwitchLanguage(Language::Python)
    );
    assert_eq!(
        handle_command("/lang ts"),
        CommandResult::SwitchLanguage(Language::TypeScript)
    );
}

#[test]
fn test_lang_without_argument_lists_choices() {
    match handle_command("/lang") {
        CommandResult::Message(msg) => {
            assert!(msg.contains("javascript"));
            assert!(msg.contains("shell"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_unknown_language() {
    assert!(matches!(handle_command("/lang cobol"), CommandResult::Message(_)));
}

// --- RUN & SHARE ---

#[test]
fn test_run_and_share() {
    assert_eq!(handle_command("/run"), CommandResult::Run);
    assert_eq!(handle_command("/share"), CommandResult::Share);
}

#[test]
fn test_open_requires_link() {
    assert!(matches!(handle_command("/open"), CommandResult::Message(_)));
    assert_eq!(
        handle_command("/open https://codemuse.dev/editor?code=eA%3D%3D&lang=js"),
        CommandResult::OpenLink("https://codemuse.dev/editor?code=eA%3D%3D&lang=js".into())
    );
}

// --- ASSISTANT ---

#[test]
fn test_generate_with_prompt() {
    assert_eq!(
        handle_command("/generate a debounce helper"),
        CommandResult::Assist {
            tab: AssistTab::Generate,
            prompt: "a debounce helper".into()
        }
    );
}

#[test]
fn test_assist_without_prompt_focuses_panel() {
    assert_eq!(
        handle_command("/improve"),
        CommandResult::FocusAssistant(AssistTab::Improve)
    );
    assert_eq!(
        handle_command("/component"),
        CommandResult::FocusAssistant(AssistTab::Component)
    );
}

#[test]
fn test_explain_question_is_optional() {
    assert_eq!(
        handle_command("/explain"),
        CommandResult::Assist {
            tab: AssistTab::Explain,
            prompt: String::new()
        }
    );
}

// --- THEME ---

#[test]
fn test_theme_command() {
    assert_eq!(
        handle_command("/theme light"),
        CommandResult::ThemeChanged("light".into())
    );
    match handle_command("/theme") {
        CommandResult::Message(msg) => assert!(msg.contains("high-contrast")),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_theme_lookup_and_fallback() {
    assert_eq!(Theme::by_name("light").name, "light");
    assert_eq!(Theme::by_name("nope").name, "dark");
    for name in Theme::all_names() {
        assert_eq!(Theme::by_name(name).name, name);
    }
}

#[test]
fn test_web_editor_theme_names_are_aliases() {
    assert_eq!(Theme::by_name("vs-light").name, "light");
    assert_eq!(Theme::by_name("VS-Dark").name, "dark");
    assert_eq!(Theme::by_name("hc-black").name, "high-contrast");
}
