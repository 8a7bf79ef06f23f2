//! The editor session: open files, the active file, console output and the
//! run / share / load-shared-link commands.
//!
//! The session is plain state. Anything slow (AI requests, script runs) is
//! split into a `begin_*` step that hands out a detached job and a
//! `finish_*` step that applies its result, so the UI loop never blocks.

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};
use tracing::{debug, info, warn};

use crate::assistant::PanelEffect;
use crate::constants::{console, storage};
use crate::error::CodeMuseError;
use crate::language::{initial_code, rename_for_language, Language};
use crate::runner::RunJob;
use crate::share;
use crate::store::Store;

const WELCOME_CODE: &str = r#"// Welcome to CodeMuse!
// 1. Add a new file with /new (or Ctrl+N).
// 2. Open the AI assistant with Ctrl+A.
// 3. Write code and press Ctrl+R to run it.

function greet(name) {
  console.log(`Hello, ${name}!`);
}

greet('Developer');
"#;

/// One open editor tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub id: String,
    pub name: String,
    pub language: Language,
    pub code: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, language: Language, code: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            language,
            code: code.into(),
        }
    }

    /// The file shown when nothing else is open.
    pub fn welcome() -> Self {
        Self::new("script.js", Language::JavaScript, WELCOME_CODE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A transient message for the user (a toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    /// Empty when the title says it all.
    pub description: String,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// Line counts for an AI rewrite of the active file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub added: usize,
    pub removed: usize,
}

impl ChangeSummary {
    pub fn between(old: &str, new: &str) -> Self {
        let diff = TextDiff::from_lines(old, new);
        let mut summary = Self::default();
        for change in diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => summary.added += 1,
                ChangeTag::Delete => summary.removed += 1,
                ChangeTag::Equal => {}
            }
        }
        summary
    }
}

impl std::fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "+{} -{} lines", self.added, self.removed)
    }
}

pub struct EditorSession {
    files: Vec<SourceFile>,
    active_id: String,
    output: String,
    explanation: Option<String>,
    running: bool,
    notifications: Vec<Notification>,
    store: Store,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// A session that keeps nothing between runs.
    pub fn new() -> Self {
        Self::load(Store::in_memory())
    }

    /// Restore files and the active file from `store`.
    pub fn load(store: Store) -> Self {
        let mut files: Vec<SourceFile> = store.get(storage::FILES_KEY, Vec::new());
        if files.is_empty() {
            files.push(SourceFile::welcome());
        }
        let saved: Option<String> = store.get(storage::ACTIVE_FILE_KEY, None);
        let active_id = saved
            .filter(|id| files.iter().any(|f| &f.id == id))
            .unwrap_or_else(|| files[0].id.clone());
        debug!(files = files.len(), "Editor session loaded");

        Self {
            files,
            active_id,
            output: console::IDLE.to_string(),
            explanation: None,
            running: false,
            notifications: Vec::new(),
            store,
        }
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    pub fn active_index(&self) -> usize {
        self.files
            .iter()
            .position(|f| f.id == self.active_id)
            .unwrap_or(0)
    }

    pub fn active_file(&self) -> &SourceFile {
        &self.files[self.active_index()]
    }

    fn active_file_mut(&mut self) -> &mut SourceFile {
        let idx = self.active_index();
        &mut self.files[idx]
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Name offered when asking for a new file name.
    pub fn suggested_file_name(&self) -> String {
        format!("untitled-{}.js", self.files.len() + 1)
    }

    /// Open a new file and make it active. A blank name does nothing.
    pub fn add_file(&mut self, name: &str) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let language = Language::from_file_name(name);
        let file = SourceFile::new(name, language, initial_code(name, language));
        let id = file.id.clone();
        info!("Opened {name} ({language})");
        self.files.push(file);
        self.active_id = id.clone();
        self.persist();
        Some(id)
    }

    pub fn activate(&mut self, id: &str) -> Result<(), CodeMuseError> {
        if !self.files.iter().any(|f| f.id == id) {
            return Err(CodeMuseError::Other(format!("No open file with id {id}")));
        }
        self.active_id = id.to_string();
        self.persist();
        Ok(())
    }

    /// Move the active tab by `delta`, wrapping at both ends.
    pub fn activate_relative(&mut self, delta: isize) {
        let len = self.files.len() as isize;
        let idx = (self.active_index() as isize + delta).rem_euclid(len);
        self.active_id = self.files[idx as usize].id.clone();
        self.persist();
    }

    /// Close a file. Returns false when `id` is not open.
    pub fn close_file(&mut self, id: &str) -> bool {
        let Some(idx) = self.files.iter().position(|f| f.id == id) else {
            return false;
        };
        let closed = self.files.remove(idx);
        debug!("Closed {}", closed.name);

        if self.files.is_empty() {
            let fresh = SourceFile::welcome();
            self.active_id = fresh.id.clone();
            self.files.push(fresh);
        } else if self.active_id == closed.id {
            let next = idx.saturating_sub(1);
            self.active_id = self.files[next].id.clone();
        }
        self.persist();
        true
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.active_file_mut().code = code.into();
        self.persist();
    }

    /// Replace the active file's code with AI output.
    pub fn apply_ai_code(&mut self, code: impl Into<String>) -> ChangeSummary {
        let code = code.into();
        let summary = ChangeSummary::between(&self.active_file().code, &code);
        info!("AI updated {} ({summary})", self.active_file().name);
        self.set_code(code);
        summary
    }

    /// Change the active file's language. The extension follows and the
    /// code is reset to the new language's placeholder.
    pub fn switch_language(&mut self, language: Language) {
        let file = self.active_file_mut();
        file.name = rename_for_language(&file.name, language);
        file.language = language;
        file.code = initial_code(&file.name, language);
        self.persist();
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    pub fn clear_explanation(&mut self) {
        self.explanation = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Snapshot the active file for a run. `None` while a run is in flight.
    pub fn begin_run(&mut self) -> Option<RunJob> {
        if self.running {
            return None;
        }
        self.running = true;
        self.output.clear();
        let file = self.active_file();
        Some(RunJob {
            language: file.language,
            code: file.code.clone(),
        })
    }

    pub fn finish_run(&mut self, output: String) {
        self.output = output;
        self.running = false;
    }

    /// Link that reopens the active file elsewhere.
    pub fn share_link(&self, base_url: &str) -> Result<String, CodeMuseError> {
        let file = self.active_file();
        share::build_link(base_url, &file.code, file.language)
    }

    /// Open the file carried by a shared link. Returns the new file's id, or
    /// `None` when the link carries nothing or cannot be decoded (the latter
    /// also raises a notification).
    pub fn load_shared_link(&mut self, link: &str) -> Option<String> {
        let shared = share::parse_params(link).and_then(|params| share::decode_params(&params));
        match shared {
            Ok(Some(shared)) => {
                let name = format!("shared-code{}", shared.language.extension());
                let file = SourceFile::new(name, shared.language, shared.code);
                let id = file.id.clone();
                info!("Loaded shared {} code", shared.language);
                self.files.push(file);
                self.active_id = id.clone();
                self.persist();
                Some(id)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Error loading shared code: {e}");
                self.notify(Notification::error("Error loading shared code", ""));
                None
            }
        }
    }

    /// Route a settled assistant request into the session.
    pub fn apply_panel_effect(&mut self, effect: PanelEffect) -> Option<ChangeSummary> {
        match effect {
            PanelEffect::ReplaceCode(code) => Some(self.apply_ai_code(code)),
            PanelEffect::ShowExplanation(text) => {
                self.explanation = Some(text);
                None
            }
            PanelEffect::Notify(notification) => {
                self.notify(notification);
                None
            }
        }
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn persist(&mut self) {
        self.store.set(storage::FILES_KEY, &self.files);
        self.store.set(storage::ACTIVE_FILE_KEY, &self.active_id);
    }
}
