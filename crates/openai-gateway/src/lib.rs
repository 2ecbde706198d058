//! OpenAI gateway implementations.
//!
//! This crate provides the concrete [`chat_core::ChatModel`] and
//! [`chat_core::ImageGenerator`] implementations backed by the OpenAI API:
//!
//! - [`OpenAiChat`] - chat completions with a bounded request timeout and a
//!   single retry on transient failure
//! - [`OpenAiImages`] - prompt-to-image generation and mask-based image edits
//! - [`OpenAiConfig`] - shared configuration loaded from the environment

mod api_types;
mod chat;
mod config;
mod images;

pub use api_types::{ChatCompletionRequest, ChatCompletionResponse, Usage};
pub use chat::OpenAiChat;
pub use config::OpenAiConfig;
pub use images::OpenAiImages;
