use codemuse_core::actions::{
    ExplainCodeRequest, GenerateCodeRequest, GenerateComponentRequest, ImproveCodeRequest,
    RunPythonRequest,
};
use codemuse_core::{
    ActionError, AssistPayload, AssistRequest, AssistTab, CodeActions, CodeMuseError, LlmClient,
    LlmResponse, Message, PromptTemplates, Role,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock LLM that replays canned replies and records every prompt it sees.
struct MockLlm {
    replies: Mutex<Vec<Result<String, String>>>,
    seen: Arc<Mutex<Vec<Vec<Message>>>>,
    delay: Option<Duration>,
}

impl MockLlm {
    fn new(replies: Vec<Result<&str, &str>>) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .rev()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            seen: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    fn slow(delay: Duration) -> Self {
        let mut mock = Self::new(vec![Ok(r#"{"code": "late"}"#)]);
        mock.delay = Some(delay);
        mock
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlm {
    async fn chat(&self, messages: &[Message]) -> Result<LlmResponse, CodeMuseError> {
        self.seen.lock().unwrap().push(messages.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err("no reply programmed".into()));
        match reply {
            Ok(text) => Ok(LlmResponse {
                message: Message::assistant(text),
                usage: None,
            }),
            Err(e) => Err(CodeMuseError::Llm(e)),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}

fn actions_with(mock: MockLlm) -> (CodeActions, Arc<Mutex<Vec<Vec<Message>>>>) {
    let seen = mock.seen.clone();
    (CodeActions::new(Arc::new(mock)), seen)
}

fn user_prompt(seen: &Arc<Mutex<Vec<Vec<Message>>>>, call: usize) -> String {
    let calls = seen.lock().unwrap();
    calls[call]
        .iter()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.clone())
        .unwrap()
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_empty_fields_never_call_the_service() {
    let (actions, seen) = actions_with(MockLlm::new(vec![]));

    let err = actions
        .generate_code(&GenerateCodeRequest {
            prompt: "   ".into(),
            language: "javascript".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ActionError::Validation("Prompt and language are required.".into())
    );

    let err = actions
        .improve_code(&ImproveCodeRequest {
            code: "x".into(),
            prompt: "better".into(),
            language: "".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Code, prompt, and language are required.");

    let err = actions
        .generate_component(&GenerateComponentRequest { prompt: "\n".into() })
        .await
        .unwrap_err();
    assert_eq!(err.message(), "A component description is required.");

    let err = actions
        .run_python(&RunPythonRequest { code: " ".into() })
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Code is required.");

    assert!(seen.lock().unwrap().is_empty());
}

// ============================================================================
// Successful calls
// ============================================================================

#[tokio::test]
async fn test_generate_renders_normalized_language() {
    let (actions, seen) = actions_with(MockLlm::new(vec![Ok(r#"{"code": "fib()"}"#)]));
    let response = actions
        .generate_code(&GenerateCodeRequest {
            prompt: "fibonacci".into(),
            language: "python".into(),
        })
        .await
        .unwrap();
    assert_eq!(response.code, "fib()");

    let prompt = user_prompt(&seen, 0);
    assert!(prompt.contains("Generate code in Python"));
    assert!(prompt.contains("fibonacci"));
}

#[tokio::test]
async fn test_improve_accepts_fenced_reply() {
    let reply = "Here is the improved version:\n```json\n{\"improvedCode\": \"let x = 1;\"}\n```";
    let (actions, _) = actions_with(MockLlm::new(vec![Ok(reply)]));
    let response = actions
        .improve_code(&ImproveCodeRequest {
            code: "var x = 1".into(),
            prompt: "modernize".into(),
            language: "javascript".into(),
        })
        .await
        .unwrap();
    assert_eq!(response.improved_code, "let x = 1;");
}

#[tokio::test]
async fn test_explain_substitutes_default_question() {
    let (actions, seen) = actions_with(MockLlm::new(vec![Ok(r#"{"explanation": "adds"}"#)]));
    let response = actions
        .explain_code(&ExplainCodeRequest {
            code: "a + b".into(),
            prompt: "".into(),
            language: "javascript".into(),
        })
        .await
        .unwrap();
    assert_eq!(response.explanation, "adds");
    assert!(user_prompt(&seen, 0).contains("Explain this code snippet."));
}

#[tokio::test]
async fn test_custom_templates_are_used() {
    let templates = PromptTemplates {
        run_python: "RUN>> {{code}}".into(),
        ..PromptTemplates::default()
    };
    let mock = MockLlm::new(vec![Ok(r#"{"output": "3\n"}"#)]);
    let seen = mock.seen.clone();
    let actions = CodeActions::new(Arc::new(mock)).with_templates(templates);

    let response = actions
        .run_python(&RunPythonRequest {
            code: "print(1 + 2)".into(),
        })
        .await
        .unwrap();
    assert_eq!(response.output, "3\n");
    assert_eq!(user_prompt(&seen, 0), "RUN>> print(1 + 2)");
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_wrong_shape_is_a_generic_failure() {
    let (actions, _) = actions_with(MockLlm::new(vec![Ok(r#"{"snippet": "x"}"#)]));
    let err = actions
        .generate_code(&GenerateCodeRequest {
            prompt: "p".into(),
            language: "go".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ActionError::Service("Failed to generate code. Please try again.".into())
    );
}

#[tokio::test]
async fn test_prose_reply_is_a_generic_failure() {
    let (actions, _) = actions_with(MockLlm::new(vec![Ok("I cannot do that.")]));
    let err = actions
        .explain_code(&ExplainCodeRequest {
            code: "x".into(),
            prompt: "why".into(),
            language: "go".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Failed to explain code. Please try again.");
}

#[tokio::test]
async fn test_service_error_is_a_generic_failure() {
    let (actions, _) = actions_with(MockLlm::new(vec![Err("HTTP 500")]));
    let err = actions
        .generate_component(&GenerateComponentRequest {
            prompt: "login form".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err.message(),
        "Failed to generate component. Please try again."
    );
}

#[tokio::test(start_paused = true)]
async fn test_timeout_is_a_service_failure() {
    let actions = CodeActions::new(Arc::new(MockLlm::slow(Duration::from_secs(120))))
        .with_timeout(Duration::from_secs(5));
    let err = actions
        .run_python(&RunPythonRequest {
            code: "while True: pass".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ActionError::Service("Failed to run Python code. Please try again.".into())
    );
}

// ============================================================================
// Dispatch
// ============================================================================

#[tokio::test]
async fn test_dispatch_maps_payloads() {
    let (actions, _) = actions_with(MockLlm::new(vec![
        Ok(r#"{"improvedCode": "better"}"#),
        Ok(r#"{"explanation": "because"}"#),
    ]));

    let outcome = actions
        .dispatch(AssistRequest::Improve(ImproveCodeRequest {
            code: "x".into(),
            prompt: "y".into(),
            language: "rust".into(),
        }))
        .await;
    assert_eq!(outcome.tab, AssistTab::Improve);
    assert_eq!(outcome.result, Ok(AssistPayload::Code("better".into())));

    let outcome = actions
        .dispatch(AssistRequest::Explain(ExplainCodeRequest {
            code: "x".into(),
            prompt: "".into(),
            language: "rust".into(),
        }))
        .await;
    assert_eq!(
        outcome.result,
        Ok(AssistPayload::Explanation("because".into()))
    );
}
