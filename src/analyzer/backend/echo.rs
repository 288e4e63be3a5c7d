use super::{BackendResult, Summarizer};

/// Offline backend that describes the prompt instead of answering it.
///
/// Output depends only on the prompt, so runs are reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoBackend;

impl Summarizer for EchoBackend {
    fn name(&self) -> &str {
        "Echo"
    }

    fn summarize(&self, prompt: &str) -> BackendResult<String> {
        let first_line = prompt.lines().next().unwrap_or("").trim();
        Ok(format!(
            "[echo] {} ({} chars)",
            first_line,
            prompt.chars().count()
        ))
    }
}
