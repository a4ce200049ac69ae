/// Chat-completion HTTP client module.
///
/// This module provides the `CompletionClient` capability used for
/// natural-language-to-SQL translation, along with an OpenAI-compatible
/// implementation and its error type.
mod client;

pub use client::{CompletionClient, LlmError, OpenAiClient, OpenAiClientBuilder};
