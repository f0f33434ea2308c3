use async_trait::async_trait;
use gitfleet_core::ports::{ExecRequest, ProcessOutput, ProcessPort};
use gitfleet_core::ProcessError;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Process adapter that implements ProcessPort using tokio::process
#[derive(Debug, Default, Clone)]
pub struct TokioProcess;

impl TokioProcess {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessPort for TokioProcess {
    async fn exec(&self, req: ExecRequest) -> Result<ProcessOutput, ProcessError> {
        let mut cmd = Command::new(&req.program);
        cmd.args(&req.args)
            .envs(req.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(req.kill_on_timeout);

        if let Some(cwd) = &req.cwd {
            cmd.current_dir(cwd);
        }

        debug!("Running `{}` in {:?}", req.display(), req.cwd);

        let child = cmd.spawn().map_err(|source| ProcessError::Spawn {
            program: req.program.clone(),
            source,
        })?;

        let wait_error = |source| ProcessError::Wait {
            program: req.program.clone(),
            source,
        };

        let output = if req.kill_on_timeout {
            // Dropping this future (on timeout) drops the child, which kills it
            child.wait_with_output().await.map_err(wait_error)?
        } else {
            // Detached task: a caller that stops waiting leaves the pipes
            // draining, so the child is never killed by a closed stdout
            tokio::spawn(child.wait_with_output())
                .await
                .map_err(|join| wait_error(std::io::Error::other(join)))?
                .map_err(wait_error)?
        };

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
