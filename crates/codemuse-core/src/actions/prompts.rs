//! Prompt templates for the AI actions.
//!
//! Templates are plain text with `{{name}}` placeholders. They are data, not
//! logic: settings may replace any of them without touching the action code.

use crate::config::PromptOverrides;

const GENERATE: &str = "\
You are an expert software developer. Generate code in {{language}} that fulfills the user's request.
Return only the code, without any explanation or surrounding prose.

Request: {{prompt}}
";

const IMPROVE: &str = "\
You are an AI code assistant. You will receive a code snippet, a programming language, and a prompt describing how to improve the code. You will return the improved code snippet.

Language: {{language}}
Code:
```{{language}}
{{code}}
```

Improvement Prompt: {{prompt}}
";

const EXPLAIN: &str = "\
You are an expert {{language}} developer and a patient mentor. Explain the following code clearly and concisely, answering the user's question.

Language: {{language}}
Code:
```{{language}}
{{code}}
```

Question: {{prompt}}
";

const COMPONENT: &str = "\
You are an expert web developer specializing in Next.js, React, Tailwind CSS, and shadcn/ui.
Your task is to generate the code for a single React component based on the user's request.
- Use functional components.
- Use Tailwind CSS for styling.
- Use shadcn/ui components (e.g., <Button>, <Input>, <Card>) where appropriate to create a modern and clean UI.
- Use lucide-react for icons.
- Do not include `import React from 'react'`.
- Do not include any explanations, just the raw code for the component.
- The component should be self-contained in one file.

User Request: {{prompt}}
";

const RUN_PYTHON: &str = "\
You are a Python runtime environment. Execute the following Python code and return only the standard output. Do not provide any explanation, commentary, or formatting like ```python ... ```. If there is an error during execution, return the standard error message.

Code:
{{code}}
";

/// The instruction templates, one per action.
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub generate: String,
    pub improve: String,
    pub explain: String,
    pub component: String,
    pub run_python: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            generate: GENERATE.to_string(),
            improve: IMPROVE.to_string(),
            explain: EXPLAIN.to_string(),
            component: COMPONENT.to_string(),
            run_python: RUN_PYTHON.to_string(),
        }
    }
}

impl PromptTemplates {
    pub fn with_overrides(mut self, overrides: &PromptOverrides) -> Self {
        let pairs = [
            (&mut self.generate, &overrides.generate),
            (&mut self.improve, &overrides.improve),
            (&mut self.explain, &overrides.explain),
            (&mut self.component, &overrides.component),
            (&mut self.run_python, &overrides.run_python),
        ];
        for (slot, replacement) in pairs {
            if let Some(text) = replacement {
                if !text.trim().is_empty() {
                    *slot = text.clone();
                }
            }
        }
        self
    }
}

/// Fill `{{key}}` placeholders in one pass. Substituted values are never
/// re-scanned, so user text containing `{{...}}` is kept verbatim.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                match vars.iter().find(|(k, _)| *k == key) {
                    Some((_, value)) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_known_keys() {
        let out = render("Lang: {{language}} / {{ prompt }}", &[("language", "Go"), ("prompt", "hi")]);
        assert_eq!(out, "Lang: Go / hi");
    }

    #[test]
    fn test_render_leaves_unknown_keys_and_user_braces() {
        let out = render("{{code}} and {{other}}", &[("code", "x = {{prompt}}")]);
        assert_eq!(out, "x = {{prompt}} and {{other}}");
    }

    #[test]
    fn test_render_unterminated_placeholder() {
        assert_eq!(render("a {{b", &[("b", "c")]), "a {{b");
    }

    #[test]
    fn test_overrides_replace_only_non_empty() {
        let overrides = PromptOverrides {
            explain: Some("custom {{code}}".into()),
            improve: Some("   ".into()),
            ..Default::default()
        };
        let t = PromptTemplates::default().with_overrides(&overrides);
        assert_eq!(t.explain, "custom {{code}}");
        assert_eq!(t.improve, IMPROVE);
    }
}
