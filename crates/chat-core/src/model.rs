//! The chat model trait implemented by LLM gateways.

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::message::{Completion, ProviderMessage};

/// Per-call generation bounds.
#[derive(Debug, Clone, Copy)]
pub struct CompletionOptions {
    /// Maximum tokens the provider may generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.8,
        }
    }
}

/// A chat completion gateway.
///
/// Implementations wrap a remote LLM provider. They may fail transiently
/// (network, provider overload) or permanently (bad configuration); callers
/// decide what those failures mean for the surrounding operation.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a reply for an ordered list of role-tagged messages.
    async fn complete(
        &self,
        messages: Vec<ProviderMessage>,
        options: CompletionOptions,
    ) -> Result<Completion, GatewayError>;

    /// The model name recorded against persisted replies.
    fn model_name(&self) -> &str;
}
