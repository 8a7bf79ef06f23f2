use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages the editor knows how to name, comment and (sometimes) run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
    Html,
    Css,
    Json,
    Markdown,
    Shell,
    Java,
    C,
    Cpp,
    CSharp,
    Go,
    Ruby,
    #[serde(other)]
    Plaintext,
}

/// Extension → language table. Several extensions may map to one language.
const EXTENSIONS: &[(&str, Language)] = &[
    ("js", Language::JavaScript),
    ("jsx", Language::JavaScript),
    ("ts", Language::TypeScript),
    ("tsx", Language::TypeScript),
    ("py", Language::Python),
    ("html", Language::Html),
    ("css", Language::Css),
    ("json", Language::Json),
    ("md", Language::Markdown),
    ("txt", Language::Plaintext),
    ("sh", Language::Shell),
    ("java", Language::Java),
    ("c", Language::C),
    ("cpp", Language::Cpp),
    ("cs", Language::CSharp),
    ("go", Language::Go),
    ("rb", Language::Ruby),
];

impl Language {
    pub const ALL: [Language; 15] = [
        Language::JavaScript,
        Language::TypeScript,
        Language::Python,
        Language::Html,
        Language::Css,
        Language::Json,
        Language::Markdown,
        Language::Plaintext,
        Language::Shell,
        Language::Java,
        Language::C,
        Language::Cpp,
        Language::CSharp,
        Language::Go,
        Language::Ruby,
    ];

    /// Languages offered by the assistant's language selector.
    pub const SELECTABLE: [Language; 9] = [
        Language::JavaScript,
        Language::Python,
        Language::TypeScript,
        Language::Html,
        Language::Css,
        Language::Java,
        Language::Go,
        Language::Ruby,
        Language::Shell,
    ];

    /// Look up the language for a file name by its lowercased extension.
    /// Unknown or missing extensions fall back to `Plaintext`.
    pub fn from_file_name(name: &str) -> Self {
        match name.rsplit_once('.') {
            Some((_, ext)) => Self::from_extension(&ext.to_lowercase()).unwrap_or(Language::Plaintext),
            None => Language::Plaintext,
        }
    }

    fn from_extension(ext: &str) -> Option<Self> {
        EXTENSIONS
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, lang)| *lang)
    }

    /// Parse a language identifier (`python`) or an extension tag (`py`).
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim().trim_start_matches('.').to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.id() == tag)
            .or_else(|| Self::from_extension(&tag))
    }

    /// Canonical lowercase identifier, as stored and shown to the editor widget.
    pub fn id(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Html => "html",
            Language::Css => "css",
            Language::Json => "json",
            Language::Markdown => "markdown",
            Language::Plaintext => "plaintext",
            Language::Shell => "shell",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Go => "go",
            Language::Ruby => "ruby",
        }
    }

    /// File extension including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Language::JavaScript => ".js",
            Language::TypeScript => ".ts",
            Language::Python => ".py",
            Language::Html => ".html",
            Language::Css => ".css",
            Language::Json => ".json",
            Language::Markdown => ".md",
            Language::Plaintext => ".txt",
            Language::Shell => ".sh",
            Language::Java => ".java",
            Language::C => ".c",
            Language::Cpp => ".cpp",
            Language::CSharp => ".cs",
            Language::Go => ".go",
            Language::Ruby => ".rb",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Python => "Python",
            Language::Html => "HTML",
            Language::Css => "CSS",
            Language::Json => "JSON",
            Language::Markdown => "Markdown",
            Language::Plaintext => "Plain Text",
            Language::Shell => "Shell",
            Language::Java => "Java",
            Language::C => "C",
            Language::Cpp => "C++",
            Language::CSharp => "C#",
            Language::Go => "Go",
            Language::Ruby => "Ruby",
        }
    }

    fn line_comment(&self) -> Option<&'static str> {
        match self {
            Language::JavaScript
            | Language::TypeScript
            | Language::Java
            | Language::C
            | Language::Cpp
            | Language::CSharp
            | Language::Go => Some("//"),
            Language::Python | Language::Shell | Language::Ruby => Some("#"),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One-line placeholder for a freshly created file.
pub fn initial_code(file_name: &str, language: Language) -> String {
    match language {
        Language::Html => format!("<!-- {file_name} -->\n"),
        Language::Css => format!("/* {file_name} */\n"),
        other => match other.line_comment() {
            Some(token) => format!("{token} {file_name}\n"),
            None => format!("Welcome to {file_name}\n"),
        },
    }
}

/// Replace the extension of `name` with the one for `language`.
pub fn rename_for_language(name: &str, language: Language) -> String {
    let base = match name.rfind('.') {
        Some(idx) => &name[..idx],
        None => name,
    };
    format!("{base}{}", language.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_lookup_is_case_insensitive() {
        assert_eq!(Language::from_file_name("App.JSX"), Language::JavaScript);
        assert_eq!(Language::from_file_name("main.Py"), Language::Python);
    }

    #[test]
    fn test_missing_extension_is_plaintext() {
        assert_eq!(Language::from_file_name("Makefile"), Language::Plaintext);
        assert_eq!(Language::from_file_name(""), Language::Plaintext);
        assert_eq!(Language::from_file_name("archive.zip"), Language::Plaintext);
        assert_eq!(Language::from_file_name("go"), Language::Plaintext);
    }

    #[test]
    fn test_parse_accepts_ids_and_tags() {
        assert_eq!(Language::parse("python"), Some(Language::Python));
        assert_eq!(Language::parse("py"), Some(Language::Python));
        assert_eq!(Language::parse(".rb"), Some(Language::Ruby));
        assert_eq!(Language::parse("CSharp"), Some(Language::CSharp));
        assert_eq!(Language::parse("cobol"), None);
    }

    #[test]
    fn test_rename_for_language() {
        assert_eq!(rename_for_language("script.js", Language::Python), "script.py");
        assert_eq!(rename_for_language("a.b.ts", Language::Go), "a.b.go");
        assert_eq!(rename_for_language("README", Language::Markdown), "README.md");
    }

    #[test]
    fn test_serde_uses_lowercase_ids() {
        let json = serde_json::to_string(&Language::CSharp).unwrap();
        assert_eq!(json, "\"csharp\"");
        let lang: Language = serde_json::from_str("\"javascript\"").unwrap();
        assert_eq!(lang, Language::JavaScript);
    }

    #[test]
    fn test_unknown_serialized_language_reads_as_plaintext() {
        let lang: Language = serde_json::from_str("\"brainfuck\"").unwrap();
        assert_eq!(lang, Language::Plaintext);
    }
}
