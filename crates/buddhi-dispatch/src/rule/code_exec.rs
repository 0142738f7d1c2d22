//! Embedded Python code execution handler.
//!
//! The fenced code block is written to a script in a scratch directory and
//! run by a separate interpreter process. Trimmed stdout is the answer. Any
//! failure is treated as "not applicable" so later rules still get a chance.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use buddhi_core::types::Upload;

use crate::error::DispatchError;
use crate::patterns;
use crate::rule::AnswerRule;
use crate::types::{RuleKind, RuleOutcome};

const SCRIPT_NAME: &str = "snippet.py";

/// Runs the code block from "What is the output of the following Python
/// code?" questions.
pub struct CodeExecutionRule {
    interpreter: String,
    timeout_secs: u64,
}

impl CodeExecutionRule {
    /// Create a rule that runs code with `interpreter`, killing it after
    /// `timeout_secs`.
    pub fn new(interpreter: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            interpreter: interpreter.into(),
            timeout_secs,
        }
    }

    /// Run `code` and return its trimmed stdout.
    pub async fn run(&self, code: &str) -> Result<String, DispatchError> {
        let scratch = tempfile::tempdir()?;
        let script = scratch.path().join(SCRIPT_NAME);
        tokio::fs::write(&script, code).await?;

        let child = Command::new(&self.interpreter)
            .arg(&script)
            .current_dir(scratch.path())
            .env("PYTHONIOENCODING", "utf-8")
            .env("PYTHONDONTWRITEBYTECODE", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                DispatchError::InterpreterUnavailable(format!("{}: {}", self.interpreter, e))
            })?;

        let output = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| DispatchError::Timeout(self.timeout_secs))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DispatchError::Execution(format!(
                "exit status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl AnswerRule for CodeExecutionRule {
    fn kind(&self) -> RuleKind {
        RuleKind::CodeExecution
    }

    fn matches(&self, question: &str, _upload: Option<&Upload>) -> bool {
        patterns::has_code_marker(question)
    }

    async fn answer(&self, question: &str, _upload: Option<&Upload>) -> RuleOutcome {
        let Some(code) = patterns::extract_code_block(question) else {
            tracing::debug!("Code question without a fenced block");
            return RuleOutcome::NotApplicable;
        };

        match self.run(&code).await {
            Ok(stdout) => RuleOutcome::Answered(stdout),
            Err(e) => {
                tracing::debug!(error = %e, "Code execution did not produce an answer");
                RuleOutcome::NotApplicable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn python_available() -> bool {
        std::process::Command::new("python3")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    const LOOP_QUESTION: &str = "What is the output of the following Python code?\n```python\nfor i in range(5):\n    print(i * 2)\n```";

    #[tokio::test]
    async fn test_runs_loop() {
        if !python_available() {
            eprintln!("python3 not found, skipping");
            return;
        }
        let rule = CodeExecutionRule::new("python3", 10);
        assert!(rule.matches(LOOP_QUESTION, None));
        assert_eq!(
            rule.answer(LOOP_QUESTION, None).await,
            RuleOutcome::Answered("0\n2\n4\n6\n8".to_string())
        );
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_not_applicable() {
        if !python_available() {
            return;
        }
        let rule = CodeExecutionRule::new("python3", 10);
        let q = "What is the output of the following Python code?\n```python\nraise SystemExit(3)\n```";
        assert_eq!(rule.answer(q, None).await, RuleOutcome::NotApplicable);

        let err = rule.run("raise SystemExit(3)").await.unwrap_err();
        assert!(matches!(err, DispatchError::Execution(_)));
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        if !python_available() {
            return;
        }
        let rule = CodeExecutionRule::new("python3", 1);
        let err = rule.run("import time\ntime.sleep(30)").await.unwrap_err();
        assert!(matches!(err, DispatchError::Timeout(1)));
    }

    #[tokio::test]
    async fn test_missing_interpreter() {
        let rule = CodeExecutionRule::new("definitely-not-a-python-binary", 5);
        let err = rule.run("print(1)").await.unwrap_err();
        assert!(matches!(err, DispatchError::InterpreterUnavailable(_)));
        assert_eq!(rule.answer(LOOP_QUESTION, None).await, RuleOutcome::NotApplicable);
    }

    #[tokio::test]
    async fn test_marker_without_block() {
        let rule = CodeExecutionRule::new("python3", 5);
        let q = "What is the output of the following Python code? print(1)";
        assert!(rule.matches(q, None));
        assert_eq!(rule.answer(q, None).await, RuleOutcome::NotApplicable);
    }

    #[test]
    fn test_marker_required() {
        let rule = CodeExecutionRule::new("python3", 5);
        assert!(!rule.matches("```python\nprint(1)\n```", None));
    }
}
