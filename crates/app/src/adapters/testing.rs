//! Scripted process adapter for deterministic tests
//!
//! Responds to requests by matching the joined argument list against a table
//! of canned outputs, optionally after a delay. Unknown commands fail with
//! exit code 128 like an unknown git invocation would.

use async_trait::async_trait;
use gitfleet_core::ports::{ExecRequest, ProcessOutput, ProcessPort};
use gitfleet_core::ProcessError;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct ScriptedProcess {
    responses: HashMap<String, Result<ProcessOutput, String>>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<ExecRequest>>,
}

impl ScriptedProcess {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `args` with exit code 0 and the given stdout
    pub fn ok(self, args: &str, stdout: &str) -> Self {
        self.respond(args, 0, stdout, "")
    }

    pub fn respond(mut self, args: &str, code: i32, stdout: &str, stderr: &str) -> Self {
        self.responses.insert(
            args.to_string(),
            Ok(ProcessOutput {
                exit_code: Some(code),
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            }),
        );
        self
    }

    /// Fail to spawn for `args`
    pub fn spawn_error(mut self, args: &str, message: &str) -> Self {
        self.responses.insert(args.to_string(), Err(message.to_string()));
        self
    }

    pub fn delay(mut self, args: &str, delay: Duration) -> Self {
        self.delays.insert(args.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<ExecRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Joined argument lists of every call, in order
    pub fn call_args(&self) -> Vec<String> {
        self.calls().iter().map(|c| c.args.join(" ")).collect()
    }
}

#[async_trait]
impl ProcessPort for ScriptedProcess {
    async fn exec(&self, req: ExecRequest) -> Result<ProcessOutput, ProcessError> {
        let key = req.args.join(" ");
        self.calls.lock().unwrap().push(req.clone());

        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }

        match self.responses.get(&key) {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(message)) => Err(ProcessError::Spawn {
                program: req.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::Other, message.clone()),
            }),
            None => Ok(ProcessOutput {
                exit_code: Some(128),
                stdout: String::new(),
                stderr: format!("fatal: unscripted command: {}", key),
            }),
        }
    }
}
