use super::{RunOutput, ScriptRunner};
use crate::actions::{CodeActions, RunPythonRequest};
use crate::constants::console;
use crate::error::CodeMuseError;

/// "Runs" Python by asking the language model to play interpreter.
///
/// Nothing is executed. The output is the model's guess at what the code
/// would print, which is often right for small scripts and freely wrong for
/// anything involving I/O, randomness, time or real computation.
pub struct SimulatedPythonRunner {
    actions: CodeActions,
}

impl SimulatedPythonRunner {
    pub fn new(actions: CodeActions) -> Self {
        Self { actions }
    }
}

#[async_trait::async_trait]
impl ScriptRunner for SimulatedPythonRunner {
    fn name(&self) -> &str {
        "simulated-python"
    }

    fn empty_output(&self) -> &str {
        console::PY_NO_OUTPUT
    }

    async fn run(&self, code: &str) -> Result<RunOutput, CodeMuseError> {
        let request = RunPythonRequest {
            code: code.to_string(),
        };
        Ok(match self.actions.run_python(&request).await {
            Ok(response) => RunOutput::lines(vec![response.output]),
            Err(e) => RunOutput::error(e.message()),
        })
    }
}
