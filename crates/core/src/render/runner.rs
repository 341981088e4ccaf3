//! External process runner.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::error::ProcessError;

/// A single external command with a fixed argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
}

impl CommandInvocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            current_dir: None,
        }
    }

    /// Render as a shell-like line for logs.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Outcome of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    /// Empty unless output was captured
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs external commands to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs the command and waits for it to exit.
    ///
    /// A non-zero exit is reported through [`CommandOutput::exit_code`], not
    /// as an error.
    async fn run(&self, invocation: &CommandInvocation) -> Result<CommandOutput, ProcessError>;

    /// Runs the command and turns a non-zero exit into [`ProcessError::Failed`].
    async fn run_checked(
        &self,
        invocation: &CommandInvocation,
    ) -> Result<CommandOutput, ProcessError> {
        let output = self.run(invocation).await?;
        if !output.success() {
            return Err(ProcessError::Failed {
                program: invocation.program.clone(),
                exit_code: output.exit_code,
                stderr: if output.stderr.is_empty() {
                    None
                } else {
                    Some(output.stderr)
                },
            });
        }
        Ok(output)
    }
}

/// [`CommandRunner`] backed by real child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    capture_output: bool,
}

impl ProcessRunner {
    /// With `capture_output` unset the child inherits stdout/stderr, so
    /// renderer and rsync progress stays visible.
    pub fn new(capture_output: bool) -> Self {
        Self { capture_output }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &CommandInvocation) -> Result<CommandOutput, ProcessError> {
        debug!("Running: {}", invocation.display());

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args).stdin(Stdio::null());
        if let Some(dir) = &invocation.current_dir {
            command.current_dir(dir);
        }

        let not_found = |e: std::io::Error| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ProcessError::NotFound {
                    program: invocation.program.clone(),
                }
            } else {
                ProcessError::Io(e)
            }
        };

        if self.capture_output {
            let output = command.output().await.map_err(not_found)?;
            Ok(CommandOutput {
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        } else {
            let status = command
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .await
                .map_err(not_found)?;
            Ok(CommandOutput {
                exit_code: status.code(),
                ..Default::default()
            })
        }
    }
}
