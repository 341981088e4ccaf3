//! Mock command runner for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::render::{CommandInvocation, CommandOutput, CommandRunner, ProcessError};

/// Mock implementation of the CommandRunner trait.
///
/// Records every invocation, succeeds by default, and can be told to:
/// - exit non-zero for a given program
/// - exit non-zero when a given argument is present
/// - report a program as missing
///
/// Clones share state, so a test can keep one handle and pass another to the
/// code under test.
#[derive(Debug, Clone, Default)]
pub struct MockCommandRunner {
    /// Recorded invocations, including failed ones.
    invocations: Arc<RwLock<Vec<CommandInvocation>>>,
    /// Exit codes by program name.
    program_exit_codes: Arc<RwLock<HashMap<String, i32>>>,
    /// Exit codes by argument.
    arg_exit_codes: Arc<RwLock<HashMap<String, i32>>>,
    /// Programs that fail to spawn.
    missing: Arc<RwLock<HashSet<String>>>,
}

impl MockCommandRunner {
    /// Create a new mock runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded invocations.
    pub async fn invocations(&self) -> Vec<CommandInvocation> {
        self.invocations.read().await.clone()
    }

    /// Get the number of invocations performed.
    pub async fn invocation_count(&self) -> usize {
        self.invocations.read().await.len()
    }

    /// Programs invoked, in order.
    pub async fn programs(&self) -> Vec<String> {
        self.invocations
            .read()
            .await
            .iter()
            .map(|i| i.program.clone())
            .collect()
    }

    /// Make every run of `program` exit with `code`.
    pub async fn set_exit_code(&self, program: &str, code: i32) {
        self.program_exit_codes
            .write()
            .await
            .insert(program.to_string(), code);
    }

    /// Make any run whose arguments contain `arg` exit with `code`.
    pub async fn set_exit_code_for_arg(&self, arg: &str, code: i32) {
        self.arg_exit_codes
            .write()
            .await
            .insert(arg.to_string(), code);
    }

    /// Make `program` fail to spawn as if it was not installed.
    pub async fn set_missing(&self, program: &str) {
        self.missing.write().await.insert(program.to_string());
    }

    async fn exit_code_for(&self, invocation: &CommandInvocation) -> i32 {
        if let Some(code) = self.program_exit_codes.read().await.get(&invocation.program) {
            return *code;
        }
        let by_arg = self.arg_exit_codes.read().await;
        invocation
            .args
            .iter()
            .find_map(|arg| by_arg.get(arg).copied())
            .unwrap_or(0)
    }
}

#[async_trait]
impl CommandRunner for MockCommandRunner {
    async fn run(&self, invocation: &CommandInvocation) -> Result<CommandOutput, ProcessError> {
        self.invocations.write().await.push(invocation.clone());

        if self.missing.read().await.contains(&invocation.program) {
            return Err(ProcessError::NotFound {
                program: invocation.program.clone(),
            });
        }

        let code = self.exit_code_for(invocation).await;
        Ok(CommandOutput {
            exit_code: Some(code),
            stdout: String::new(),
            stderr: if code == 0 {
                String::new()
            } else {
                format!("{} failed", invocation.program)
            },
        })
    }
}
