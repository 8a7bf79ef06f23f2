use codemuse_core::language::rename_for_language;
use codemuse_core::{initial_code, Language};

const TABLE: &[(&str, Language)] = &[
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

#[test]
fn test_every_table_extension_maps_to_its_language() {
    for (ext, lang) in TABLE {
        assert_eq!(Language::from_file_name(&format!("x.{ext}")), *lang, "x.{ext}");
    }
}

#[test]
fn test_unknown_extensions_fall_back_to_plaintext() {
    for name in ["x.rs", "x.", "x", "x.toml", ".bashrc", "x.JSONC"] {
        assert_eq!(Language::from_file_name(name), Language::Plaintext, "{name}");
    }
}

#[test]
fn test_extension_round_trips_for_every_language() {
    for lang in Language::ALL {
        let name = format!("f{}", lang.extension());
        assert_eq!(Language::from_file_name(&name), lang, "{name}");
    }
}

#[test]
fn test_selectable_languages_are_parseable_by_id() {
    for lang in Language::SELECTABLE {
        assert_eq!(Language::parse(lang.id()), Some(lang));
    }
}

#[test]
fn test_initial_code_per_comment_style() {
    assert_eq!(initial_code("index.html", Language::Html), "<!-- index.html -->\n");
    assert_eq!(initial_code("a.css", Language::Css), "/* a.css */\n");
    assert_eq!(initial_code("a.go", Language::Go), "// a.go\n");
    assert_eq!(initial_code("a.cs", Language::CSharp), "// a.cs\n");
    assert_eq!(initial_code("a.rb", Language::Ruby), "# a.rb\n");
    assert_eq!(initial_code("a.sh", Language::Shell), "# a.sh\n");
    assert_eq!(initial_code("a.json", Language::Json), "Welcome to a.json\n");
    assert_eq!(initial_code("a.md", Language::Markdown), "Welcome to a.md\n");
}

#[test]
fn test_rename_keeps_everything_before_last_dot() {
    assert_eq!(rename_for_language("my.app.js", Language::TypeScript), "my.app.ts");
    assert_eq!(rename_for_language("notes", Language::Plaintext), "notes.txt");
}

#[test]
fn test_display_names() {
    assert_eq!(Language::CSharp.display_name(), "C#");
    assert_eq!(Language::JavaScript.to_string(), "javascript");
}
