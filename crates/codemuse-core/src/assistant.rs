//! Assistant panel state: the tabbed form that feeds the AI action layer.
//!
//! The panel never calls the generation service itself. `submit` turns the
//! form into a self-contained [`AssistRequest`] that can be run on another
//! task; `settle` folds the finished [`AssistOutcome`] back into the form and
//! says what the editor should do with it.

use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use crate::actions::{
    AssistOutcome, AssistPayload, AssistRequest, ExplainCodeRequest, GenerateCodeRequest,
    GenerateComponentRequest, ImproveCodeRequest,
};
use crate::language::Language;
use crate::session::Notification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssistTab {
    Generate,
    Improve,
    Explain,
    Component,
}

impl AssistTab {
    pub const ALL: [AssistTab; 4] = [
        AssistTab::Generate,
        AssistTab::Improve,
        AssistTab::Explain,
        AssistTab::Component,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AssistTab::Generate => "Generate",
            AssistTab::Improve => "Improve",
            AssistTab::Explain => "Explain",
            AssistTab::Component => "Component",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            AssistTab::Generate => "e.g., a function that returns the nth Fibonacci number",
            AssistTab::Improve => "e.g., add error handling and comments",
            AssistTab::Explain => "Optional: ask something specific about the code",
            AssistTab::Component => "e.g., a login form with email and password",
        }
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for AssistTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// What the active file looks like when a request is submitted. The
/// generate tab targets `language` too, so it always follows the active file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistContext {
    pub code: String,
    pub language: Language,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("A {0} request is already in progress")]
    Busy(AssistTab),
}

/// What the editor should do once a request has settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEffect {
    ReplaceCode(String),
    ShowExplanation(String),
    Notify(Notification),
}

#[derive(Debug, Clone)]
pub struct AssistantPanel {
    pub active_tab: AssistTab,
    pub prompt: String,
    pending: HashSet<AssistTab>,
}

impl Default for AssistantPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl AssistantPanel {
    pub fn new() -> Self {
        Self {
            active_tab: AssistTab::Generate,
            prompt: String::new(),
            pending: HashSet::new(),
        }
    }

    pub fn is_pending(&self, tab: AssistTab) -> bool {
        self.pending.contains(&tab)
    }

    pub fn any_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Build the request for `tab` and mark it in flight.
    pub fn submit(
        &mut self,
        tab: AssistTab,
        context: &AssistContext,
    ) -> Result<AssistRequest, PanelError> {
        if self.is_pending(tab) {
            return Err(PanelError::Busy(tab));
        }
        let prompt = self.prompt.clone();
        let request = match tab {
            AssistTab::Generate => AssistRequest::Generate(GenerateCodeRequest {
                prompt,
                language: context.language.id().to_string(),
            }),
            AssistTab::Improve => AssistRequest::Improve(ImproveCodeRequest {
                code: context.code.clone(),
                prompt,
                language: context.language.id().to_string(),
            }),
            AssistTab::Explain => AssistRequest::Explain(ExplainCodeRequest {
                code: context.code.clone(),
                prompt,
                language: context.language.id().to_string(),
            }),
            AssistTab::Component => {
                AssistRequest::Component(GenerateComponentRequest { prompt })
            }
        };
        self.pending.insert(tab);
        Ok(request)
    }

    /// Clear the tab's pending flag and turn the outcome into an effect.
    pub fn settle(&mut self, outcome: AssistOutcome) -> PanelEffect {
        self.pending.remove(&outcome.tab);
        match outcome.result {
            Ok(payload) => {
                self.prompt.clear();
                match payload {
                    AssistPayload::Code(code) => PanelEffect::ReplaceCode(code),
                    AssistPayload::Explanation(text) => PanelEffect::ShowExplanation(text),
                }
            }
            Err(e) => PanelEffect::Notify(Notification::error("AI Error", e.message())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionError;

    fn context() -> AssistContext {
        AssistContext {
            code: "print(1)".into(),
            language: Language::Python,
        }
    }

    #[test]
    fn test_submit_marks_tab_pending_and_rejects_repeat() {
        let mut panel = AssistantPanel::default();
        panel.prompt = "add logging".into();
        let request = panel.submit(AssistTab::Improve, &context()).unwrap();
        assert_eq!(request.tab(), AssistTab::Improve);
        assert!(panel.is_pending(AssistTab::Improve));
        assert_eq!(
            panel.submit(AssistTab::Improve, &context()),
            Err(PanelError::Busy(AssistTab::Improve))
        );
        // Other tabs are independent.
        assert!(panel.submit(AssistTab::Explain, &context()).is_ok());
    }

    #[test]
    fn test_requests_carry_the_right_context() {
        let mut panel = AssistantPanel::new();
        panel.prompt = "fizzbuzz".into();
        match panel.submit(AssistTab::Generate, &context()).unwrap() {
            AssistRequest::Generate(r) => assert_eq!(r.language, "python"),
            other => panic!("unexpected request {other:?}"),
        }
        match panel.submit(AssistTab::Explain, &context()).unwrap() {
            AssistRequest::Explain(r) => {
                assert_eq!(r.code, "print(1)");
                assert_eq!(r.language, "python");
            }
            other => panic!("unexpected request {other:?}"),
        }
        match panel.submit(AssistTab::Component, &context()).unwrap() {
            AssistRequest::Component(r) => assert_eq!(r.prompt, "fizzbuzz"),
            other => panic!("unexpected request {other:?}"),
        }
    }

    #[test]
    fn test_settle_success_clears_prompt() {
        let mut panel = AssistantPanel::default();
        panel.prompt = "sort a list".into();
        panel.submit(AssistTab::Generate, &context()).unwrap();
        let effect = panel.settle(AssistOutcome {
            tab: AssistTab::Generate,
            result: Ok(AssistPayload::Code("sorted()".into())),
        });
        assert_eq!(effect, PanelEffect::ReplaceCode("sorted()".into()));
        assert!(panel.prompt.is_empty());
        assert!(!panel.any_pending());
    }

    #[test]
    fn test_settle_failure_keeps_prompt_and_notifies() {
        let mut panel = AssistantPanel::default();
        panel.prompt = "explain".into();
        panel.submit(AssistTab::Explain, &context()).unwrap();
        let effect = panel.settle(AssistOutcome {
            tab: AssistTab::Explain,
            result: Err(ActionError::Service(
                "Failed to explain code. Please try again.".into(),
            )),
        });
        assert_eq!(
            effect,
            PanelEffect::Notify(Notification::error(
                "AI Error",
                "Failed to explain code. Please try again."
            ))
        );
        assert_eq!(panel.prompt, "explain");
        assert!(!panel.is_pending(AssistTab::Explain));
    }

    #[test]
    fn test_tab_cycling() {
        assert_eq!(AssistTab::Component.next(), AssistTab::Generate);
        assert_eq!(AssistTab::Generate.previous(), AssistTab::Component);
    }
}
