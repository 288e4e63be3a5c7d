//! Command-line agent backends.
//!
//! Runs `claude`, `gemini` or `codex` non-interactively with the prompt as the
//! final argument and returns trimmed stdout.

use std::process::{Command, Stdio};
use std::time::Duration;

use super::{
    command_exists, parse_rate_limit_info, wait_with_timeout, BackendError, BackendResult,
    Summarizer,
};

/// Supported command-line agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliAgent {
    Claude,
    Gemini,
    Codex,
}

impl CliAgent {
    /// Executable looked up on `PATH`.
    pub fn command(&self) -> &'static str {
        match self {
            CliAgent::Claude => "claude",
            CliAgent::Gemini => "gemini",
            CliAgent::Codex => "codex",
        }
    }

    /// Arguments placed before the prompt.
    fn args(&self) -> &'static [&'static str] {
        match self {
            CliAgent::Claude => &["--print"],
            CliAgent::Gemini => &["-p"],
            CliAgent::Codex => &["exec"],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CliAgent::Claude => "Claude",
            CliAgent::Gemini => "Gemini",
            CliAgent::Codex => "Codex",
        }
    }
}

/// Backend that shells out to a command-line agent.
#[derive(Debug, Clone)]
pub struct CliBackend {
    agent: CliAgent,
    timeout: Duration,
}

impl CliBackend {
    pub fn new(agent: CliAgent, timeout: Duration) -> Self {
        Self { agent, timeout }
    }

    pub fn agent(&self) -> CliAgent {
        self.agent
    }

    pub fn is_available(&self) -> bool {
        command_exists(self.agent.command())
    }

    fn command(&self, prompt: &str) -> Command {
        let mut command = Command::new(self.agent.command());
        command
            .args(self.agent.args())
            .arg(prompt)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}

impl Summarizer for CliBackend {
    fn name(&self) -> &str {
        self.agent.name()
    }

    fn summarize(&self, prompt: &str) -> BackendResult<String> {
        if !self.is_available() {
            return Err(BackendError::NotAvailable(format!(
                "{} CLI not found in PATH",
                self.agent.command()
            )));
        }

        tracing::info!(
            agent = self.agent.command(),
            prompt_chars = prompt.chars().count(),
            "invoking agent"
        );
        let mut child = self.command(prompt).spawn()?;

        let output = match wait_with_timeout(&mut child, self.timeout) {
            Ok(output) => output,
            Err(_) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(BackendError::Timeout(self.timeout));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            if let Some(info) = parse_rate_limit_info(&stderr) {
                return Err(BackendError::RateLimited(info));
            }
            return Err(BackendError::ExitCode {
                code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        let reply = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if reply.is_empty() {
            return Err(BackendError::EmptyResponse);
        }
        Ok(reply)
    }
}
