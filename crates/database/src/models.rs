//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A chat character, owned by its creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Character {
    /// Character UUID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Persona / system prompt text.
    pub prompt: Option<String>,
    /// Intro / background text.
    pub intro: Option<String>,
    /// Whether the character is publicly listed.
    pub is_public: bool,
    /// Creator user id.
    pub creator_id: Option<String>,
    /// Creation timestamp (RFC 3339 UTC).
    pub created_at: String,
}

/// Role of a chat turn.
pub const ROLE_USER: &str = "user";
/// Role of a character reply turn.
pub const ROLE_CHARACTER: &str = "character";

/// One persisted message in a character chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ChatTurn {
    /// Auto-incrementing id; also the ordering tie-break.
    pub id: i64,
    /// Owning character.
    pub character_id: String,
    /// Client-generated session identifier.
    pub session_id: String,
    /// Authenticated user id, if known.
    pub user_id: Option<String>,
    /// "user" or "character".
    pub role: String,
    /// Message text.
    pub content: String,
    /// Model that produced a character reply.
    pub model: Option<String>,
    /// Prompt tokens consumed, for character replies.
    pub input_tokens: Option<i64>,
    /// Completion tokens consumed, for character replies.
    pub output_tokens: Option<i64>,
    /// Credits debited for this exchange, recorded on the character reply.
    pub credit_spent: Option<i64>,
    /// Provider metadata as a JSON string.
    pub metadata: Option<String>,
    /// Creation timestamp (RFC 3339 UTC).
    pub created_at: String,
}

/// A chat turn to be inserted.
#[derive(Debug, Clone, Default)]
pub struct NewTurn {
    /// "user" or "character".
    pub role: String,
    /// Message text.
    pub content: String,
    /// Authenticated user id, if known.
    pub user_id: Option<String>,
    /// Model name (character replies only).
    pub model: Option<String>,
    /// Prompt tokens (character replies only).
    pub input_tokens: Option<i64>,
    /// Completion tokens (character replies only).
    pub output_tokens: Option<i64>,
    /// Credits debited for this exchange.
    pub credit_spent: Option<i64>,
    /// Provider metadata.
    pub metadata: Option<serde_json::Value>,
    /// Explicit timestamp; assigned monotonically when absent.
    pub created_at: Option<String>,
}

impl NewTurn {
    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ROLE_USER.to_string(),
            content: content.into(),
            ..Default::default()
        }
    }

    /// Create a character reply turn.
    pub fn character(content: impl Into<String>) -> Self {
        Self {
            role: ROLE_CHARACTER.to_string(),
            content: content.into(),
            ..Default::default()
        }
    }
}

/// A rolling conversation summary for a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Summary {
    /// Auto-incrementing id.
    pub id: i64,
    /// Owning character.
    pub character_id: String,
    /// Summary text.
    pub summary: String,
    /// Session the summary was produced from.
    pub session_id: Option<String>,
    /// User the summary was produced for.
    pub user_id: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// A per-user credit wallet. One row per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Wallet {
    /// Owning user.
    pub user_id: String,
    /// Current credit balance.
    pub balance: i64,
    /// Total credits ever spent.
    pub lifetime_used: i64,
    /// Last update timestamp.
    pub updated_at: String,
}

/// Wallet balance view; zero-valued when no wallet row exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WalletBalance {
    /// Current credit balance.
    pub balance: i64,
    /// Total credits ever spent.
    pub lifetime_used: i64,
}

/// Transaction type vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxType {
    /// Credits added (purchase, reward).
    Charge,
    /// Credits spent on a metered action.
    Usage,
    /// Balance reset.
    Reset,
    /// Manual adjustment.
    Adjustment,
}

impl TxType {
    /// The stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Charge => "charge",
            TxType::Usage => "usage",
            TxType::Reset => "reset",
            TxType::Adjustment => "adjustment",
        }
    }
}

/// An immutable credit ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CreditTransaction {
    /// Auto-incrementing id.
    pub id: i64,
    /// Owning user.
    pub user_id: String,
    /// One of "charge", "usage", "reset", "adjustment".
    pub tx_type: String,
    /// Transaction category, e.g. "character_chat", "ad_reward".
    pub category: String,
    /// Service code, e.g. "CHARACTER", "GLOBAL".
    pub service_code: String,
    /// Signed credit amount (negative for debits).
    pub amount: i64,
    /// Balance snapshot after this transaction.
    pub balance_after: i64,
    /// Human-readable description.
    pub description: Option<String>,
    /// Extra context as a JSON string.
    pub metadata: Option<String>,
    /// Occurrence timestamp.
    pub occurred_at: String,
}

/// A purchasable credit plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Plan {
    /// Plan UUID.
    pub id: String,
    /// Stable plan code used by the checkout flow.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Price in cents.
    pub price_cents: i64,
    /// Provider-specific features as a JSON string.
    pub features: Option<String>,
    /// Whether the plan is offered.
    pub is_active: bool,
}

/// A single-use rewarded-ad session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AdSession {
    /// Session UUID, issued by the server.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Ad network identifier.
    pub ad_network: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Expiry timestamp.
    pub expires_at: String,
    /// Whether the reward was already claimed.
    pub used: bool,
    /// When the reward was claimed.
    pub used_at: Option<String>,
    /// Client-supplied verification payload as a JSON string.
    pub verification: Option<String>,
}
