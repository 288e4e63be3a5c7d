//! Summarizer backends.
//!
//! The language-model service is a pure capability: prompt in, text out.
//! [`Summarizer`] is that capability; everything about transport, timeouts
//! and authentication stays inside the implementations:
//!
//! - [`ChatBackend`] - OpenAI-compatible `/chat/completions` endpoint (DeepSeek by default)
//! - [`CliBackend`] - the `claude`, `gemini` or `codex` command-line agents
//! - [`EchoBackend`] - deterministic and offline, for dry runs and tests
//!
//! Failures are returned as [`BackendError`]; there is no retry at this layer.

mod chat;
mod cli;
mod echo;

use std::io::Read;
use std::path::Path;
use std::process::{Child, Output};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

pub use chat::{ChatBackend, ChatConfig};
pub use cli::{CliAgent, CliBackend};
pub use echo::EchoBackend;

use super::prompt::Language;

/// Turns a prompt into a summary.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, prompt: &str) -> BackendResult<String>;

    /// Human-readable name for logs and error messages.
    fn name(&self) -> &str {
        "summarizer"
    }
}

/// Errors from the summarizer service.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Backend not available: {0}")]
    NotAvailable(String),

    #[error("API key not set: export {0}")]
    MissingApiKey(String),

    #[error("Backend exited with code {code}: {stderr}")]
    ExitCode { code: i32, stderr: String },

    #[error("Backend timed out after {0:?}")]
    Timeout(Duration),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Backend returned an empty response")]
    EmptyResponse,

    #[error("Failed to run backend: {0}")]
    Io(#[from] std::io::Error),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Which summarizer to use.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// OpenAI-compatible chat completions API
    #[default]
    Chat,
    /// claude CLI
    Claude,
    /// gemini CLI
    Gemini,
    /// codex CLI
    Codex,
    /// Offline stand-in that echoes prompt statistics
    Echo,
}

/// `[backend]` section of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub timeout_secs: u64,
    pub chat: ChatConfig,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Chat,
            timeout_secs: 120,
            chat: ChatConfig::default(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Build the configured backend.
///
/// `language` selects the default system message for chat backends.
pub fn create_backend(
    config: &BackendConfig,
    language: Language,
) -> BackendResult<Box<dyn Summarizer>> {
    let backend: Box<dyn Summarizer> = match config.kind {
        BackendKind::Chat => Box::new(ChatBackend::new(
            &config.chat,
            config.timeout(),
            language.system_prompt(),
        )?),
        BackendKind::Claude => Box::new(CliBackend::new(CliAgent::Claude, config.timeout())),
        BackendKind::Gemini => Box::new(CliBackend::new(CliAgent::Gemini, config.timeout())),
        BackendKind::Codex => Box::new(CliBackend::new(CliAgent::Codex, config.timeout())),
        BackendKind::Echo => Box::new(EchoBackend),
    };
    tracing::debug!(backend = backend.name(), "summarizer backend ready");
    Ok(backend)
}

/// Check whether `command` resolves to an executable file on `PATH`.
pub fn command_exists(command: &str) -> bool {
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| is_executable(&dir.join(command)))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

/// Look for a rate limit message in backend error output.
///
/// Returns the first line mentioning it.
pub fn parse_rate_limit_info(text: &str) -> Option<String> {
    text.lines()
        .find(|line| {
            let lower = line.to_lowercase();
            lower.contains("rate limit")
                || lower.contains("too many requests")
                || lower.contains("429")
        })
        .map(|line| line.trim().to_string())
}

/// Wait for a child process, polling until it exits or `timeout` elapses.
///
/// stdout and stderr are drained on their own threads while polling, so a
/// child writing more than a pipe buffer never stalls.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> std::io::Result<Output> {
    let start = Instant::now();
    let poll_interval = Duration::from_millis(100);
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    loop {
        match child.try_wait()? {
            Some(status) => {
                return Ok(Output {
                    status,
                    stdout: collect(stdout),
                    stderr: collect(stderr),
                });
            }
            None => {
                if start.elapsed() >= timeout {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        "Process timed out",
                    ));
                }
                thread::sleep(poll_interval);
            }
        }
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            pipe.read_to_end(&mut buf).ok();
            buf
        })
    })
}

fn collect(reader: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}
