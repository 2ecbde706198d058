//! Core traits and types for the character chat service.
//!
//! This crate provides the shared interface between the HTTP layer, the
//! turn orchestrator, and the external gateway implementations. It defines:
//!
//! - [`ChatModel`] - The trait every LLM gateway must implement
//! - [`ImageGenerator`] - The trait for image generation / inpainting gateways
//! - [`ImageSearch`] - The trait for stock-photo reference search gateways
//! - [`IdentityVerifier`] - The trait for bearer-credential verification
//! - [`ProviderMessage`] / [`Completion`] - Role-tagged message and reply types
//! - [`GatewayError`] - Error type for gateway operations
//! - [`TtlCache`] - A time-aware cache with an injectable clock
//!
//! # Example
//!
//! ```rust
//! use chat_core::{ChatModel, Completion, CompletionOptions, GatewayError, ProviderMessage};
//! use async_trait::async_trait;
//!
//! struct EchoModel;
//!
//! #[async_trait]
//! impl ChatModel for EchoModel {
//!     async fn complete(
//!         &self,
//!         messages: Vec<ProviderMessage>,
//!         _options: CompletionOptions,
//!     ) -> Result<Completion, GatewayError> {
//!         let text = messages.last().map(|m| m.content.clone()).unwrap_or_default();
//!         Ok(Completion::text(text))
//!     }
//!
//!     fn model_name(&self) -> &str {
//!         "echo"
//!     }
//! }
//! ```

mod cache;
mod error;
mod identity;
mod image;
mod message;
mod model;
mod search;

pub use cache::{Clock, SystemClock, TtlCache};
pub use error::GatewayError;
pub use identity::{AuthUser, IdentityVerifier};
pub use image::{GeneratedImage, ImageEditRequest, ImageGenerator, ImageRequest};
pub use message::{Completion, ProviderMessage, TokenUsage};
pub use model::{ChatModel, CompletionOptions};
pub use search::{ImageSearch, ImageSearchResult};

// Re-export async_trait for implementors
pub use async_trait::async_trait;
