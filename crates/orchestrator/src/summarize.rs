//! Rolling conversation summarization.
//!
//! Once the recent window for a session reaches the configured threshold, the
//! window is condensed into a long-term summary that future prompts carry in
//! place of the pruned history. Summarization runs detached from the chat
//! turn; a failure here never reaches the user.

use chat_core::{ChatModel, CompletionOptions, ProviderMessage};
use database::{summary, ChatTurn, Database};

use crate::error::TurnError;

const SUMMARIZER_SYSTEM_PROMPT: &str = "You are an expert conversation summarizer.";

fn summary_prompt(window: &[ChatTurn]) -> String {
    let transcript = window
        .iter()
        .map(|t| format!("{}: {}", t.role, t.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Condense the conversation below into a long-term memory summary.\n\
         Capture the user's personality and preferences, the relationship\n\
         between the user and the character, key events, and emotional shifts.\n\
         Keep it compact and factual.\n\n\
         Conversation:\n{transcript}"
    )
}

/// Summarize the window if it has reached the threshold.
///
/// When the newest stored summary belongs to the same session it is rewritten
/// in place; a new session gets a fresh row. Returns whether a summary was
/// produced.
#[allow(clippy::too_many_arguments)]
pub async fn maybe_resummarize(
    db: &Database,
    model: &dyn ChatModel,
    character_id: &str,
    session_id: &str,
    user_id: Option<&str>,
    window: &[ChatTurn],
    threshold: usize,
    options: CompletionOptions,
) -> Result<bool, TurnError> {
    if window.len() < threshold {
        return Ok(false);
    }

    let messages = vec![
        ProviderMessage::system(SUMMARIZER_SYSTEM_PROMPT),
        ProviderMessage::user(summary_prompt(window)),
    ];

    let completion = model
        .complete(messages, options)
        .await
        .map_err(|e| TurnError::Upstream(e.to_string()))?;

    let text = completion.text.trim();
    if text.is_empty() {
        return Ok(false);
    }

    match summary::latest_summary(db.pool(), character_id).await? {
        Some(existing) if existing.session_id.as_deref() == Some(session_id) => {
            summary::update_summary(db.pool(), existing.id, text).await?;
        }
        _ => {
            summary::insert_summary(db.pool(), character_id, session_id, user_id, text).await?;
        }
    }

    tracing::debug!(character_id, session_id, "Updated conversation summary");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chat_core::{Completion, GatewayError};
    use database::{character, Character, NewTurn, ROLE_CHARACTER, ROLE_USER};

    struct FakeModel {
        calls: AtomicUsize,
        reply: String,
    }

    impl FakeModel {
        fn replying(reply: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                reply: reply.to_string(),
            }
        }
    }

    #[async_trait]
    impl ChatModel for FakeModel {
        async fn complete(
            &self,
            _messages: Vec<ProviderMessage>,
            _options: CompletionOptions,
        ) -> Result<Completion, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Completion::text(self.reply.clone()))
        }

        fn model_name(&self) -> &str {
            "fake-model"
        }
    }

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        character::create_character(
            db.pool(),
            &Character {
                id: "char-1".to_string(),
                name: "Mina".to_string(),
                prompt: None,
                intro: None,
                is_public: true,
                creator_id: None,
                created_at: database::time::now(),
            },
        )
        .await
        .unwrap();
        db
    }

    async fn seed_window(db: &Database, session_id: &str, pairs: usize) -> Vec<ChatTurn> {
        let mut turns = Vec::new();
        for i in 0..pairs {
            turns.push(NewTurn::user(format!("question {i}")));
            turns.push(NewTurn::character(format!("answer {i}")));
        }
        database::chat_turn::append_turns(db.pool(), "char-1", session_id, turns)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_below_threshold_is_noop() {
        let db = test_db().await;
        let model = FakeModel::replying("summary");
        let window = seed_window(&db, "sess-1", 5).await;

        let produced =
            maybe_resummarize(&db, &model, "char-1", "sess-1", None, &window, 20, CompletionOptions::default())
                .await
                .unwrap();

        assert!(!produced);
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
        assert_eq!(summary::count_summaries(db.pool(), "char-1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_threshold_inserts_then_updates_in_place() {
        let db = test_db().await;
        let model = FakeModel::replying("first summary");
        let window = seed_window(&db, "sess-1", 10).await;
        assert_eq!(window.len(), 20);

        let produced =
            maybe_resummarize(&db, &model, "char-1", "sess-1", Some("user-1"), &window, 20, CompletionOptions::default())
                .await
                .unwrap();
        assert!(produced);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);

        let stored = summary::latest_summary(db.pool(), "char-1").await.unwrap().unwrap();
        assert_eq!(stored.summary, "first summary");
        assert_eq!(stored.session_id.as_deref(), Some("sess-1"));

        // Same session: the row is rewritten, not duplicated.
        let model = FakeModel::replying("revised summary");
        maybe_resummarize(&db, &model, "char-1", "sess-1", Some("user-1"), &window, 20, CompletionOptions::default())
            .await
            .unwrap();

        assert_eq!(summary::count_summaries(db.pool(), "char-1").await.unwrap(), 1);
        let stored = summary::latest_summary(db.pool(), "char-1").await.unwrap().unwrap();
        assert_eq!(stored.summary, "revised summary");
    }

    #[tokio::test]
    async fn test_new_session_gets_fresh_row() {
        let db = test_db().await;
        let window = seed_window(&db, "sess-1", 10).await;

        let model = FakeModel::replying("session one");
        maybe_resummarize(&db, &model, "char-1", "sess-1", None, &window, 20, CompletionOptions::default())
            .await
            .unwrap();

        let window2 = seed_window(&db, "sess-2", 10).await;
        let model = FakeModel::replying("session two");
        maybe_resummarize(&db, &model, "char-1", "sess-2", None, &window2, 20, CompletionOptions::default())
            .await
            .unwrap();

        assert_eq!(summary::count_summaries(db.pool(), "char-1").await.unwrap(), 2);
        let latest = summary::latest_summary(db.pool(), "char-1").await.unwrap().unwrap();
        assert_eq!(latest.summary, "session two");
    }

    #[tokio::test]
    async fn test_blank_reply_is_discarded() {
        let db = test_db().await;
        let model = FakeModel::replying("   ");
        let window = seed_window(&db, "sess-1", 10).await;

        let produced =
            maybe_resummarize(&db, &model, "char-1", "sess-1", None, &window, 20, CompletionOptions::default())
                .await
                .unwrap();

        assert!(!produced);
        assert_eq!(summary::count_summaries(db.pool(), "char-1").await.unwrap(), 0);
    }

    #[test]
    fn test_summary_prompt_includes_roles() {
        let window = vec![
            ChatTurn {
                id: 1,
                character_id: "char-1".to_string(),
                session_id: "sess-1".to_string(),
                user_id: None,
                role: ROLE_USER.to_string(),
                content: "hello".to_string(),
                model: None,
                input_tokens: None,
                output_tokens: None,
                credit_spent: None,
                metadata: None,
                created_at: database::time::now(),
            },
            ChatTurn {
                id: 2,
                character_id: "char-1".to_string(),
                session_id: "sess-1".to_string(),
                user_id: None,
                role: ROLE_CHARACTER.to_string(),
                content: "hi there".to_string(),
                model: None,
                input_tokens: None,
                output_tokens: None,
                credit_spent: None,
                metadata: None,
                created_at: database::time::now(),
            },
        ];

        let prompt = summary_prompt(&window);
        assert!(prompt.contains("user: hello"));
        assert!(prompt.contains("character: hi there"));
    }
}
