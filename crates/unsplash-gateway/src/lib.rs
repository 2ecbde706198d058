//! Unsplash search gateway.
//!
//! Wraps the Unsplash photo search API behind [`chat_core::ImageSearch`].
//! Search hits become the reference URLs the image generation flow folds
//! into its prompt. The access key stays server-side.

mod client;
mod config;

pub use client::UnsplashClient;
pub use config::UnsplashConfig;
