/// CodeMuse: centralized constants.
/// Limits, endpoints, storage keys and user-facing strings live here.

// ─── Models ───────────────────────────────────────────────────────────────────

pub mod models {
    pub const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-5-20250929";
    pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
    pub const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5-coder:7b";
    pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
    pub const DEFAULT_TOGETHER_MODEL: &str = "Qwen/Qwen2.5-Coder-32B-Instruct";
    pub const DEFAULT_OPENROUTER_MODEL: &str = "anthropic/claude-sonnet-4-5";
    pub const DEFAULT_LMSTUDIO_MODEL: &str = "local-model";
}

// ─── API Endpoints ────────────────────────────────────────────────────────────

pub mod endpoints {
    pub const CLAUDE_BASE_URL: &str = "https://api.anthropic.com";
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
    pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai";
    pub const TOGETHER_BASE_URL: &str = "https://api.together.xyz";
    pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api";
    pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";
    pub const LMSTUDIO_BASE_URL: &str = "http://localhost:1234";
    pub const SHARE_BASE_URL: &str = "https://codemuse.dev/editor";
}

// ─── Default Settings ─────────────────────────────────────────────────────────

pub mod defaults {
    pub const THEME: &str = "dark";
    pub const TAB_SIZE: u32 = 2;
    pub const MAX_TOKENS: u32 = 4096;
    pub const AI_REQUEST_TIMEOUT_SECS: u64 = 60;
    pub const RUN_TIMEOUT_SECS: u64 = 30;
    pub const NODE_PATH: &str = "node";
}

// ─── Resource Limits ──────────────────────────────────────────────────────────

pub mod limits {
    pub const MAX_CONSOLE_OUTPUT_CHARS: usize = 30000;
}

// ─── Storage ──────────────────────────────────────────────────────────────────

pub mod storage {
    pub const DATA_DIR: &str = "codemuse";
    pub const STATE_FILE: &str = "state.json";
    /// Versioned keys. A shape change gets a new suffix, never a migration.
    pub const FILES_KEY: &str = "files-v3";
    pub const ACTIVE_FILE_KEY: &str = "active-file-v1";
}

// ─── Config Paths ─────────────────────────────────────────────────────────────

pub mod paths {
    pub const CONFIG_DIR: &str = "codemuse";
    pub const CONFIG_FILE: &str = "config.toml";
}

// ─── Console messages ─────────────────────────────────────────────────────────

pub mod console {
    pub const IDLE: &str = "> Click \"Run\" to see output.";
    pub const JS_NO_OUTPUT: &str = "> Code executed successfully. No output logged.";
    pub const PY_NO_OUTPUT: &str = "> No output from script.";
}
