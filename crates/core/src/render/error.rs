//! Error types for the render module.

use thiserror::Error;

/// Errors that can occur while running an external tool.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found on PATH.
    #[error("Command not found: {program}")]
    NotFound { program: String },

    /// Process exited unsuccessfully.
    #[error("{program} exited with {}", describe_exit(.exit_code))]
    Failed {
        program: String,
        exit_code: Option<i32>,
        stderr: Option<String>,
    },

    /// I/O error while spawning or waiting.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProcessError {
    /// Exit code of a failed process, if it exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Failed { exit_code, .. } => *exit_code,
            _ => None,
        }
    }
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("code {}", code),
        None => "no exit code (killed by signal)".to_string(),
    }
}
