//! Chat turn orchestration.
//!
//! This crate implements the credit-metered chat turn: one user message in,
//! one character reply out. A turn moves through authentication, a funds
//! check, concurrent context loading, prompt composition, reply generation,
//! a conditional wallet debit, and batched persistence of both turns.
//! Summarization and retention pruning run detached after the reply and
//! never gate or fail it.
//!
//! All collaborators (database, chat model, identity verifier) are injected
//! at construction, so tests substitute fakes for the remote services.

mod compose;
mod error;
mod summarize;
mod turn;

pub use compose::compose_messages;
pub use error::TurnError;
pub use summarize::maybe_resummarize;
pub use turn::{TurnConfig, TurnOrchestrator, TurnOutcome, TurnRequest};
