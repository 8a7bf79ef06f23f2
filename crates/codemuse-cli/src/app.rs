use anyhow::{Context, Result};
use codemuse_core::{
    share, ActionError, AssistContext, AssistOutcome, AssistTab, AssistantPanel, CodeActions,
    EditorSession, Language, Notification, PanelEffect, RunJob, RunnerSet, Settings, Store,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Terminal,
};
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tui_textarea::TextArea;

use crate::commands::{self, CommandResult};
use crate::theme::Theme;

const TOAST_TTL: Duration = Duration::from_secs(4);
const ASSISTANT_WIDTH: u16 = 44;
const CONSOLE_HEIGHT: u16 = 9;

// ── One-shot subcommands ────────────────────────────────────────────────

fn read_source(path: &Path) -> Result<(String, Language)> {
    let code = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((code, Language::from_file_name(&name)))
}

/// Run a file once and print what the console pane would show.
pub async fn run_file(settings: &Settings, path: &Path) -> Result<()> {
    let (code, language) = read_source(path)?;
    let actions = match CodeActions::from_settings(settings) {
        Ok(actions) => Some(actions),
        Err(e) => {
            tracing::warn!("AI actions unavailable: {e}");
            None
        }
    };
    let runners = RunnerSet::from_settings(settings, actions);
    let output = runners.run(&RunJob { language, code }).await;
    println!("{output}");
    Ok(())
}

pub fn share_file(settings: &Settings, path: &Path) -> Result<()> {
    let (code, language) = read_source(path)?;
    let link = share::build_link(&settings.share.base_url, &code, language)?;
    println!("{link}");
    Ok(())
}

// ── Interactive TUI ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Editor,
    Assistant,
    Command,
}

/// Results sent back by spawned tasks.
enum AppEvent {
    Assist(AssistOutcome),
    RunFinished(String),
}

struct Toast {
    notification: Notification,
    timestamp: String,
    shown_at: Instant,
}

struct Popup {
    title: String,
    body: String,
    scroll: u16,
}

struct AppState {
    session: EditorSession,
    panel: AssistantPanel,
    editor: TextArea<'static>,
    /// Id of the file currently loaded into `editor`.
    editor_file: String,
    focus: Focus,
    show_assistant: bool,
    command_input: String,
    popup: Option<Popup>,
    toast: Option<Toast>,
    status_text: String,
    theme: Theme,
    settings: Settings,
    actions: Option<CodeActions>,
    llm_error: Option<String>,
    runners: RunnerSet,
    tx: mpsc::UnboundedSender<AppEvent>,
    should_quit: bool,
}

impl AppState {
    fn new(settings: Settings, tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        let session = EditorSession::load(open_store(&settings));
        let (actions, llm_error) = match CodeActions::from_settings(&settings) {
            Ok(actions) => (Some(actions), None),
            Err(e) => (None, Some(e.to_string())),
        };
        let runners = RunnerSet::from_settings(&settings, actions.clone());
        let theme = Theme::by_name(&settings.editor.theme);
        let panel = AssistantPanel::new();

        let mut state = Self {
            session,
            panel,
            editor: TextArea::default(),
            editor_file: String::new(),
            focus: Focus::Editor,
            show_assistant: false,
            command_input: String::new(),
            popup: None,
            toast: None,
            status_text: "Ready".into(),
            theme,
            settings,
            actions,
            llm_error,
            runners,
            tx,
            should_quit: false,
        };
        state.reload_editor();
        state
    }

    fn model_name(&self) -> &str {
        match &self.actions {
            Some(actions) => actions.model(),
            None => "no model",
        }
    }

    /// Load the active file into the text area.
    fn reload_editor(&mut self) {
        let file = self.session.active_file();
        let mut editor = TextArea::new(file.code.split('\n').map(str::to_string).collect());
        editor.set_tab_length(self.settings.editor.tab_size.clamp(1, 16) as u8);
        self.editor_file = file.id.clone();
        self.editor = editor;
        self.style_editor();
    }

    fn style_editor(&mut self) {
        let theme = &self.theme;
        self.editor
            .set_style(Style::default().fg(theme.fg).bg(theme.bg));
        self.editor
            .set_cursor_line_style(Style::default().bg(theme.cursor_line));
        self.editor
            .set_line_number_style(Style::default().fg(theme.muted));
    }

    /// Push the text area's contents into the session if they changed.
    fn commit_editor(&mut self) {
        if self.editor_file != self.session.active_id() {
            return;
        }
        let code = self.editor.lines().join("\n");
        if code != self.session.active_file().code {
            self.session.set_code(code);
        }
    }

    fn sync_editor(&mut self) {
        if self.editor_file != self.session.active_id() {
            self.reload_editor();
        }
    }

    fn drain_notifications(&mut self) {
        if let Some(notification) = self.session.take_notifications().pop() {
            self.toast = Some(Toast {
                notification,
                timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
                shown_at: Instant::now(),
            });
        }
        if self
            .toast
            .as_ref()
            .is_some_and(|t| t.shown_at.elapsed() > TOAST_TTL)
        {
            self.toast = None;
        }
    }

    fn show_popup(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.popup = Some(Popup {
            title: title.into(),
            body: body.into(),
            scroll: 0,
        });
    }

    fn close_popup(&mut self) {
        self.popup = None;
        self.session.clear_explanation();
    }

    fn open_command_line(&mut self, prefill: impl Into<String>) {
        self.command_input = prefill.into();
        self.focus = Focus::Command;
    }

    // ── Commands ────────────────────────────────────────────────────────

    fn run(&mut self) {
        self.commit_editor();
        let Some(job) = self.session.begin_run() else {
            self.status_text = "Already running".into();
            return;
        };
        self.status_text = format!("Running {}...", self.session.active_file().name);
        let runners = self.runners.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let output = runners.run(&job).await;
            let _ = tx.send(AppEvent::RunFinished(output));
        });
    }

    fn share(&mut self) {
        self.commit_editor();
        let link = match self.session.share_link(&self.settings.share.base_url) {
            Ok(link) => link,
            Err(e) => {
                tracing::warn!("Share failed: {e}");
                self.session
                    .notify(Notification::error("Error", "Could not create a shareable link."));
                return;
            }
        };
        match copy_to_clipboard(&link) {
            Ok(()) => self.session.notify(Notification::info(
                "Link Copied!",
                "A shareable link is on your clipboard.",
            )),
            Err(e) => {
                tracing::warn!("Clipboard unavailable: {e}");
                self.session
                    .notify(Notification::error("Error", "Could not create a shareable link."));
            }
        }
        self.status_text = link;
    }

    fn assist_context(&self) -> AssistContext {
        let file = self.session.active_file();
        AssistContext {
            code: file.code.clone(),
            language: file.language,
        }
    }

    fn submit_assist(&mut self, tab: AssistTab) {
        self.commit_editor();
        let context = self.assist_context();
        let request = match self.panel.submit(tab, &context) {
            Ok(request) => request,
            Err(e) => {
                self.status_text = e.to_string();
                return;
            }
        };

        let Some(actions) = self.actions.clone() else {
            let message = format!(
                "LLM not available: {}",
                self.llm_error.as_deref().unwrap_or("no provider configured")
            );
            self.apply_outcome(AssistOutcome {
                tab,
                result: Err(ActionError::Service(message)),
            });
            return;
        };

        self.status_text = format!("{tab}: waiting for {}...", actions.model());
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = actions.dispatch(request).await;
            let _ = tx.send(AppEvent::Assist(outcome));
        });
    }

    fn apply_outcome(&mut self, outcome: AssistOutcome) {
        let tab = outcome.tab;
        let effect = self.panel.settle(outcome);
        let explanation = match &effect {
            PanelEffect::ShowExplanation(text) => Some(text.clone()),
            _ => None,
        };
        if let Some(summary) = self.session.apply_panel_effect(effect) {
            self.reload_editor();
            self.status_text = format!(
                "{tab}: updated {} ({summary})",
                self.session.active_file().name
            );
        } else if let Some(text) = explanation {
            self.status_text = format!("{tab}: done");
            self.show_popup("Code Explanation", text);
        } else {
            self.status_text = format!("{tab}: failed");
        }
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Assist(outcome) => self.apply_outcome(outcome),
            AppEvent::RunFinished(output) => {
                self.session.finish_run(output);
                self.status_text = "Run finished".into();
            }
        }
    }

    fn switch_language(&mut self, language: Language) {
        self.session.switch_language(language);
        self.reload_editor();
        self.status_text = format!("Switched to {}", language.display_name());
    }

    fn close_active(&mut self) {
        self.commit_editor();
        let id = self.session.active_id().to_string();
        self.session.close_file(&id);
        self.reload_editor();
    }

    fn apply_command(&mut self, result: CommandResult) {
        match result {
            CommandResult::Message(text) => self.show_popup("CodeMuse", text),
            CommandResult::Quit => self.should_quit = true,
            CommandResult::NewFile(None) => {
                let suggested = self.session.suggested_file_name();
                self.open_command_line(format!("/new {suggested}"));
            }
            CommandResult::NewFile(Some(name)) => {
                self.commit_editor();
                if self.session.add_file(&name).is_some() {
                    self.reload_editor();
                    self.status_text = format!("Opened {}", self.session.active_file().name);
                }
            }
            CommandResult::CloseFile => self.close_active(),
            CommandResult::SwitchLanguage(language) => self.switch_language(language),
            CommandResult::Run => self.run(),
            CommandResult::Share => self.share(),
            CommandResult::OpenLink(link) => {
                self.commit_editor();
                if self.session.load_shared_link(&link).is_some() {
                    self.reload_editor();
                    self.status_text = format!("Opened {}", self.session.active_file().name);
                }
            }
            CommandResult::Assist { tab, prompt } => {
                self.panel.active_tab = tab;
                self.panel.prompt = prompt;
                self.show_assistant = true;
                self.submit_assist(tab);
            }
            CommandResult::FocusAssistant(tab) => {
                self.panel.active_tab = tab;
                self.show_assistant = true;
                self.focus = Focus::Assistant;
            }
            CommandResult::ThemeChanged(name) => {
                self.theme = Theme::by_name(&name);
                self.settings.editor.theme = self.theme.name.to_string();
                self.style_editor();
                if let Err(e) = self.settings.save() {
                    tracing::warn!("Could not save settings: {e}");
                }
                self.status_text = format!("Theme: {}", self.theme.name);
            }
            CommandResult::NotACommand => {
                self.status_text = "Commands start with /. Type /help for commands.".into();
            }
        }
    }
}

fn open_store(settings: &Settings) -> Store {
    if !settings.storage.enabled {
        return Store::in_memory();
    }
    if let Some(ref path) = settings.storage.path {
        return Store::open(path);
    }
    match Store::open_default() {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!("Persistence disabled: {e}");
            Store::in_memory()
        }
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text.to_string())?;
    Ok(())
}

pub async fn run_tui(settings: Settings, link: Option<String>) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();
    let mut state = AppState::new(settings, tx);

    if let Some(ref link) = link {
        state.apply_command(CommandResult::OpenLink(link.clone()));
    }
    if let Some(ref e) = state.llm_error {
        state.status_text = format!("LLM not available: {e}");
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut state, &mut rx);

    state.commit_editor();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    rx: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        // Process finished runs and AI requests (non-blocking)
        while let Ok(event) = rx.try_recv() {
            state.handle_event(event);
        }
        state.sync_editor();
        state.drain_notifications();

        terminal.draw(|f| draw_ui(f, state))?;

        if event::poll(Duration::from_millis(33))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(state, key);
                }
            }
        }

        if state.should_quit {
            return Ok(());
        }
    }
}

// ── Drawing ─────────────────────────────────────────────────────────────

fn draw_ui(f: &mut ratatui::Frame, state: &mut AppState) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),              // file tabs
            Constraint::Min(5),                 // editor (+ assistant)
            Constraint::Length(CONSOLE_HEIGHT), // console
            Constraint::Length(1),              // status or command line
        ])
        .split(f.area());

    draw_tabs(f, main_chunks[0], state);

    let editor_area = if state.show_assistant {
        let h_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(30), Constraint::Length(ASSISTANT_WIDTH)])
            .split(main_chunks[1]);
        draw_assistant(f, h_chunks[1], state);
        h_chunks[0]
    } else {
        main_chunks[1]
    };
    draw_editor(f, editor_area, state);
    draw_console(f, main_chunks[2], state);

    if state.focus == Focus::Command {
        draw_command_line(f, main_chunks[3], state);
    } else {
        draw_status_bar(f, main_chunks[3], state);
    }

    if let Some(ref toast) = state.toast {
        draw_toast(f, toast, &state.theme);
    }
    if let Some(ref popup) = state.popup {
        draw_popup(f, popup, &state.theme);
    }
}

fn draw_tabs(f: &mut ratatui::Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let active = state.session.active_id();
    let mut spans = Vec::new();
    for file in state.session.files() {
        let style = if file.id == active {
            Style::default()
                .fg(theme.fg)
                .bg(theme.tab_active)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted)
        };
        spans.push(Span::styled(format!(" {} ", file.name), style));
        spans.push(Span::styled("│", Style::default().fg(theme.border)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_editor(f: &mut ratatui::Frame, area: Rect, state: &mut AppState) {
    let theme = state.theme.clone();
    let file = state.session.active_file();
    let focused = state.focus == Focus::Editor;
    let title = format!(" {} · {} ", file.name, file.language.display_name());

    state.editor.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(if focused { theme.accent } else { theme.border })),
    );
    state.editor.set_cursor_style(if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    });
    f.render_widget(&state.editor, area);
}

fn draw_console(f: &mut ratatui::Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let title = if state.session.is_running() {
        " Console (running...) "
    } else {
        " Console "
    };
    let output = state.session.output();
    let style = if output.starts_with("Error:") {
        Style::default().fg(theme.error)
    } else {
        Style::default().fg(theme.console_fg)
    };

    // Keep the tail of long output in view
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = output.lines().count().saturating_sub(visible) as u16;

    let console = Paragraph::new(output)
        .style(style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(theme.border)),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(console, area);
}

fn draw_assistant(f: &mut ratatui::Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let panel = &state.panel;
    let focused = state.focus == Focus::Assistant;

    let mut tab_spans = Vec::new();
    for tab in AssistTab::ALL {
        let marker = if panel.is_pending(tab) { "…" } else { "" };
        let style = if tab == panel.active_tab {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(theme.muted)
        };
        tab_spans.push(Span::styled(format!("{}{marker}", tab.title()), style));
        tab_spans.push(Span::raw(" "));
    }

    let mut lines = vec![Line::from(tab_spans), Line::from("")];

    match panel.active_tab {
        AssistTab::Generate => lines.push(Line::from(vec![
            Span::styled("Language: ", Style::default().fg(theme.muted)),
            Span::styled(
                format!("< {} >", state.session.active_file().language.display_name()),
                Style::default().fg(theme.warning),
            ),
            Span::styled("  ↑/↓", Style::default().fg(theme.muted)),
        ])),
        AssistTab::Improve | AssistTab::Explain => lines.push(Line::from(Span::styled(
            format!("Uses {}", state.session.active_file().name),
            Style::default().fg(theme.muted),
        ))),
        AssistTab::Component => lines.push(Line::from(Span::styled(
            "Writes a React component into the active file",
            Style::default().fg(theme.muted),
        ))),
    }
    lines.push(Line::from(""));

    if panel.prompt.is_empty() {
        lines.push(Line::from(Span::styled(
            panel.active_tab.placeholder(),
            Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
        )));
    } else {
        for line in panel.prompt.split('\n') {
            lines.push(Line::from(Span::styled(
                line.to_string(),
                Style::default().fg(theme.fg),
            )));
        }
    }
    lines.push(Line::from(""));

    let action = if panel.is_pending(panel.active_tab) {
        Span::styled("Working...", Style::default().fg(theme.warning))
    } else {
        Span::styled(
            "Enter send · Tab switch · Esc back",
            Style::default().fg(theme.muted),
        )
    };
    lines.push(Line::from(action));

    if let Some(explanation) = state.session.explanation() {
        if panel.active_tab == AssistTab::Explain {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Last explanation:",
                Style::default().fg(theme.success),
            )));
            lines.push(Line::from(explanation.to_string()));
        }
    }

    let widget = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" AI Assistant ")
                .border_style(Style::default().fg(if focused { theme.accent } else { theme.border })),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn draw_command_line(f: &mut ratatui::Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let line = Line::from(vec![
        Span::styled(":", Style::default().fg(theme.accent)),
        Span::styled(state.command_input.as_str(), Style::default().fg(theme.fg)),
    ]);
    f.render_widget(Paragraph::new(line), area);

    let cursor_x = area.x + 1 + state.command_input.chars().count() as u16;
    let max_x = area.x + area.width.saturating_sub(1);
    f.set_cursor_position((cursor_x.min(max_x), area.y));
}

fn draw_status_bar(f: &mut ratatui::Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let file = state.session.active_file();
    let provider = state.settings.provider_id();

    let status_spans = vec![
        Span::styled(
            format!(" {} ", provider.name()),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("| {} ", state.model_name()),
            Style::default().fg(theme.accent),
        ),
        Span::styled(
            format!("| {} ", file.language.display_name()),
            Style::default().fg(theme.warning),
        ),
        Span::styled("| ", Style::default().fg(theme.muted)),
        Span::styled(state.status_text.as_str(), Style::default().fg(theme.muted)),
        Span::styled(
            "  Ctrl+P commands  Ctrl+Q quit ",
            Style::default().fg(theme.muted),
        ),
    ];
    f.render_widget(Paragraph::new(Line::from(status_spans)), area);
}

fn draw_toast(f: &mut ratatui::Frame, toast: &Toast, theme: &Theme) {
    let screen = f.area();
    let width = 46.min(screen.width);
    let height = if toast.notification.description.is_empty() { 3 } else { 4 };
    let area = Rect::new(
        screen.x + screen.width.saturating_sub(width + 1),
        screen.y + 1,
        width,
        height.min(screen.height),
    );

    let color = if toast.notification.is_error() {
        theme.error
    } else {
        theme.success
    };
    let mut lines = vec![Line::from(Span::styled(
        toast.notification.title.as_str(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))];
    if !toast.notification.description.is_empty() {
        lines.push(Line::from(toast.notification.description.as_str()));
    }

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(Text::from(lines))
            .style(Style::default().fg(theme.fg).bg(theme.bg))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", toast.timestamp))
                    .border_style(Style::default().fg(color)),
            )
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_popup(f: &mut ratatui::Frame, popup: &Popup, theme: &Theme) {
    let area = centered_rect(70, 70, f.area());
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(popup.body.as_str())
            .style(Style::default().fg(theme.fg).bg(theme.bg))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", popup.title))
                    .title_bottom(" Esc close · ↑/↓ scroll ")
                    .border_style(Style::default().fg(theme.accent)),
            )
            .wrap(Wrap { trim: false })
            .scroll((popup.scroll, 0)),
        area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

// ── Input ───────────────────────────────────────────────────────────────

fn handle_key(state: &mut AppState, key: KeyEvent) {
    if let Some(popup) = state.popup.as_mut() {
        match key.code {
            KeyCode::Up => popup.scroll = popup.scroll.saturating_sub(1),
            KeyCode::Down => popup.scroll = popup.scroll.saturating_add(1),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => state.close_popup(),
            _ => {}
        }
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('q') => {
                state.should_quit = true;
                return;
            }
            KeyCode::Char('r') => return state.run(),
            KeyCode::Char('s') => return state.share(),
            KeyCode::Char('n') => return state.apply_command(CommandResult::NewFile(None)),
            KeyCode::Char('w') => return state.close_active(),
            KeyCode::Char('p') => return state.open_command_line("/"),
            KeyCode::Char('a') => {
                if state.show_assistant && state.focus == Focus::Assistant {
                    state.show_assistant = false;
                    state.focus = Focus::Editor;
                } else {
                    state.show_assistant = true;
                    state.focus = Focus::Assistant;
                }
                return;
            }
            KeyCode::Left => {
                state.commit_editor();
                state.session.activate_relative(-1);
                return;
            }
            KeyCode::Right => {
                state.commit_editor();
                state.session.activate_relative(1);
                return;
            }
            _ => {}
        }
    }

    match state.focus {
        Focus::Editor => {
            if state.editor.input(key) {
                state.commit_editor();
            }
        }
        Focus::Assistant => handle_assistant_key(state, key),
        Focus::Command => handle_command_key(state, key),
    }
}

fn handle_assistant_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => state.focus = Focus::Editor,
        KeyCode::Tab => state.panel.active_tab = state.panel.active_tab.next(),
        KeyCode::BackTab => state.panel.active_tab = state.panel.active_tab.previous(),
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {
            state.panel.prompt.push('\n');
        }
        KeyCode::Enter => {
            let tab = state.panel.active_tab;
            state.submit_assist(tab);
        }
        KeyCode::Backspace => {
            state.panel.prompt.pop();
        }
        KeyCode::Up | KeyCode::Down if state.panel.active_tab == AssistTab::Generate => {
            let choices = Language::SELECTABLE;
            let idx = choices
                .iter()
                .position(|l| *l == state.session.active_file().language)
                .unwrap_or(0);
            let next = if key.code == KeyCode::Up {
                (idx + choices.len() - 1) % choices.len()
            } else {
                (idx + 1) % choices.len()
            };
            state.switch_language(choices[next]);
        }
        KeyCode::Char(c) => state.panel.prompt.push(c),
        _ => {}
    }
}

fn handle_command_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            state.command_input.clear();
            state.focus = Focus::Editor;
        }
        KeyCode::Enter => {
            let input = std::mem::take(&mut state.command_input);
            state.focus = Focus::Editor;
            let result = commands::handle_command(&input);
            state.apply_command(result);
        }
        KeyCode::Backspace => {
            state.command_input.pop();
        }
        KeyCode::Char(c) => state.command_input.push(c),
        _ => {}
    }
}
