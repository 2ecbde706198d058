//! The credit-metered chat turn.

use std::sync::Arc;

use chat_core::{ChatModel, CompletionOptions, IdentityVerifier};
use database::{chat_turn, summary, wallet, ChatTurn, Database, NewTurn};
use uuid::Uuid;

use crate::compose::compose_messages;
use crate::error::TurnError;
use crate::summarize::maybe_resummarize;

/// Ledger category recorded for chat debits.
const CHAT_CATEGORY: &str = "character_chat";
/// Ledger service code recorded for chat debits.
const CHAT_SERVICE_CODE: &str = "CHARACTER";

/// Tunables for a chat turn. Defaults mirror the production values.
#[derive(Debug, Clone, Copy)]
pub struct TurnConfig {
    /// Credits debited per user message.
    pub cost_per_message: i64,
    /// Turns loaded as model context.
    pub window_limit: i64,
    /// Window size that triggers summarization.
    pub summary_threshold: usize,
    /// Turns older than this many days are pruned after a reply.
    pub retention_days: i64,
    /// Token cap for character replies.
    pub reply_max_tokens: u32,
    /// Sampling temperature for character replies.
    pub reply_temperature: f32,
    /// Token cap for summaries.
    pub summary_max_tokens: u32,
    /// Sampling temperature for summaries.
    pub summary_temperature: f32,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            cost_per_message: 10,
            window_limit: 20,
            summary_threshold: 20,
            retention_days: 90,
            reply_max_tokens: 512,
            reply_temperature: 0.8,
            summary_max_tokens: 256,
            summary_temperature: 0.5,
        }
    }
}

impl TurnConfig {
    fn reply_options(&self) -> CompletionOptions {
        CompletionOptions {
            max_tokens: self.reply_max_tokens,
            temperature: self.reply_temperature,
        }
    }

    fn summary_options(&self) -> CompletionOptions {
        CompletionOptions {
            max_tokens: self.summary_max_tokens,
            temperature: self.summary_temperature,
        }
    }
}

/// One incoming chat message.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    /// Target character.
    pub character_id: String,
    /// Client-generated session identifier.
    pub session_id: String,
    /// Bearer credential from the Authorization header.
    pub bearer_token: String,
    /// The user's message text.
    pub message: String,
}

/// The result of a successful turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The persisted user turn.
    pub user_turn: ChatTurn,
    /// The persisted character reply.
    pub character_turn: ChatTurn,
    /// Credits debited for this turn.
    pub spent: i64,
    /// Wallet balance after the debit.
    pub balance: i64,
}

/// Coordinates one chat turn end to end.
///
/// The model and identity verifier are trait objects injected at
/// construction. The orchestrator never calls a provider directly.
pub struct TurnOrchestrator {
    db: Database,
    model: Arc<dyn ChatModel>,
    verifier: Arc<dyn IdentityVerifier>,
    config: TurnConfig,
}

impl TurnOrchestrator {
    /// Create an orchestrator over the given collaborators.
    pub fn new(
        db: Database,
        model: Arc<dyn ChatModel>,
        verifier: Arc<dyn IdentityVerifier>,
        config: TurnConfig,
    ) -> Self {
        Self {
            db,
            model,
            verifier,
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &TurnConfig {
        &self.config
    }

    /// Process one chat turn.
    ///
    /// Order of operations: authenticate, check funds, load context, generate
    /// the reply, debit the wallet, persist both turns. Failures before the
    /// debit leave no trace; the debit itself is conditional on the balance,
    /// so a concurrent spend surfaces as [`TurnError::InsufficientFunds`]
    /// rather than a negative balance. Summarization and pruning are spawned
    /// after the reply and never fail the turn.
    pub async fn process(&self, request: TurnRequest) -> Result<TurnOutcome, TurnError> {
        let user = self
            .verifier
            .verify(&request.bearer_token)
            .await
            .map_err(|e| TurnError::Upstream(e.to_string()))?
            .ok_or(TurnError::Unauthorized)?;

        let pool = self.db.pool();
        let cost = self.config.cost_per_message;

        // A missing wallet row is rebuilt from the ledger before the spend
        // decision, so a user with ledger history is never refused for a
        // wallet that failed to materialize.
        let balance = match wallet::get_wallet(pool, &user.id).await? {
            Some(w) => w.balance,
            None => wallet::reconcile_from_transactions(pool, &user.id).await?,
        };
        if balance < cost {
            return Err(TurnError::InsufficientFunds {
                required: cost,
                balance,
            });
        }

        let (character, window, latest_summary) = tokio::try_join!(
            database::character::get_character(pool, &request.character_id),
            chat_turn::recent_window(
                pool,
                &request.character_id,
                &request.session_id,
                self.config.window_limit,
            ),
            summary::latest_summary(pool, &request.character_id),
        )?;

        let messages = compose_messages(
            &character,
            latest_summary.as_ref().map(|s| s.summary.as_str()),
            &window,
            &request.message,
        );

        let completion = self
            .model
            .complete(messages, self.config.reply_options())
            .await
            .map_err(|e| TurnError::Upstream(e.to_string()))?;

        let input_tokens = completion.usage.map(|u| u.prompt_tokens as i64);
        let output_tokens = completion.usage.map(|u| u.completion_tokens as i64);

        // The attempt id ties the ledger entry to the persisted reply. A
        // debit whose attempt id never shows up on a turn marks an orphaned
        // spend for reconciliation.
        let attempt_id = Uuid::new_v4().to_string();
        let metadata = serde_json::json!({
            "character_id": request.character_id,
            "session_id": request.session_id,
            "attempt_id": attempt_id,
            "input_tokens": input_tokens,
            "output_tokens": output_tokens,
        });

        let balance = wallet::debit(
            pool,
            &user.id,
            cost,
            CHAT_CATEGORY,
            CHAT_SERVICE_CODE,
            &format!("Chat with {}", character.name),
            Some(&metadata),
        )
        .await?;

        let mut user_turn = NewTurn::user(&request.message);
        user_turn.user_id = Some(user.id.clone());

        let mut character_turn = NewTurn::character(&completion.text);
        character_turn.user_id = Some(user.id.clone());
        character_turn.model = Some(self.model.model_name().to_string());
        character_turn.input_tokens = input_tokens;
        character_turn.output_tokens = output_tokens;
        character_turn.credit_spent = Some(cost);
        character_turn.metadata = Some(metadata);

        let persisted = chat_turn::append_turns(
            pool,
            &request.character_id,
            &request.session_id,
            vec![user_turn, character_turn],
        )
        .await?;

        let mut persisted = persisted.into_iter();
        let user_turn = persisted
            .next()
            .ok_or_else(|| TurnError::Internal("missing persisted user turn".to_string()))?;
        let character_turn = persisted
            .next()
            .ok_or_else(|| TurnError::Internal("missing persisted character turn".to_string()))?;

        self.spawn_maintenance(&request, user.id.clone());

        Ok(TurnOutcome {
            user_turn,
            character_turn,
            spent: cost,
            balance,
        })
    }

    /// Detach summarization and retention pruning from the reply path.
    fn spawn_maintenance(&self, request: &TurnRequest, user_id: String) {
        let db = self.db.clone();
        let model = Arc::clone(&self.model);
        let config = self.config;
        let character_id = request.character_id.clone();
        let session_id = request.session_id.clone();

        tokio::spawn(async move {
            let window = match chat_turn::recent_window(
                db.pool(),
                &character_id,
                &session_id,
                config.window_limit,
            )
            .await
            {
                Ok(window) => window,
                Err(e) => {
                    tracing::warn!(character_id, error = %e, "Window read for summarization failed");
                    return;
                }
            };

            if let Err(e) = maybe_resummarize(
                &db,
                model.as_ref(),
                &character_id,
                &session_id,
                Some(&user_id),
                &window,
                config.summary_threshold,
                config.summary_options(),
            )
            .await
            {
                tracing::warn!(character_id, error = %e, "Summarization failed");
            }

            let cutoff = database::time::days_ago(config.retention_days);
            match chat_turn::prune_older_than(db.pool(), &character_id, &cutoff).await {
                Ok(0) => {}
                Ok(removed) => {
                    tracing::info!(character_id, removed, "Pruned expired chat turns");
                }
                Err(e) => {
                    tracing::warn!(character_id, error = %e, "Retention pruning failed");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chat_core::{AuthUser, Completion, GatewayError, ProviderMessage, TokenUsage};
    use database::{character, Character, ROLE_CHARACTER, ROLE_USER};

    struct FakeModel {
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeModel {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail: true,
            })
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
            if self.fail {
                return Err(GatewayError::Network("connection reset".to_string()));
            }
            Ok(Completion {
                text: "Hello from the character".to_string(),
                model: "fake-model".to_string(),
                usage: Some(TokenUsage {
                    prompt_tokens: 100,
                    completion_tokens: 50,
                    total_tokens: 150,
                }),
            })
        }

        fn model_name(&self) -> &str {
            "fake-model"
        }
    }

    struct FakeVerifier {
        user: Option<AuthUser>,
    }

    impl FakeVerifier {
        fn accepting(user_id: &str) -> Arc<Self> {
            Arc::new(Self {
                user: Some(AuthUser {
                    id: user_id.to_string(),
                    email: None,
                }),
            })
        }

        fn rejecting() -> Arc<Self> {
            Arc::new(Self { user: None })
        }
    }

    #[async_trait]
    impl IdentityVerifier for FakeVerifier {
        async fn verify(&self, _token: &str) -> Result<Option<AuthUser>, GatewayError> {
            Ok(self.user.clone())
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
                prompt: Some("A cheerful barista.".to_string()),
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

    async fn fund(db: &Database, user_id: &str, amount: i64) {
        wallet::credit(db.pool(), user_id, amount, "purchase", "GLOBAL", "seed", None)
            .await
            .unwrap();
    }

    fn request() -> TurnRequest {
        TurnRequest {
            character_id: "char-1".to_string(),
            session_id: "sess-1".to_string(),
            bearer_token: "token".to_string(),
            message: "hello there".to_string(),
        }
    }

    #[tokio::test]
    async fn test_successful_turn() {
        let db = test_db().await;
        fund(&db, "user-1", 15).await;

        let orch = TurnOrchestrator::new(
            db.clone(),
            FakeModel::ok(),
            FakeVerifier::accepting("user-1"),
            TurnConfig::default(),
        );

        let outcome = orch.process(request()).await.unwrap();

        assert_eq!(outcome.spent, 10);
        assert_eq!(outcome.balance, 5);
        assert_eq!(outcome.user_turn.role, ROLE_USER);
        assert_eq!(outcome.user_turn.content, "hello there");
        assert_eq!(outcome.character_turn.role, ROLE_CHARACTER);
        assert_eq!(outcome.character_turn.model.as_deref(), Some("fake-model"));
        assert_eq!(outcome.character_turn.credit_spent, Some(10));
        assert_eq!(outcome.character_turn.input_tokens, Some(100));
        assert!(outcome.user_turn.created_at <= outcome.character_turn.created_at);
        assert!(outcome.user_turn.id < outcome.character_turn.id);

        let txs = wallet::list_transactions(db.pool(), "user-1").await.unwrap();
        let usage: Vec<_> = txs.iter().filter(|t| t.tx_type == "usage").collect();
        assert_eq!(usage.len(), 1);
        assert_eq!(usage[0].amount, -10);
        assert_eq!(usage[0].balance_after, 5);
        assert_eq!(usage[0].category, "character_chat");

        // Debit and reply carry the same attempt id.
        let tx_meta: serde_json::Value =
            serde_json::from_str(usage[0].metadata.as_deref().unwrap()).unwrap();
        let turn_meta: serde_json::Value =
            serde_json::from_str(outcome.character_turn.metadata.as_deref().unwrap()).unwrap();
        assert_eq!(tx_meta["attempt_id"], turn_meta["attempt_id"]);
    }

    #[tokio::test]
    async fn test_insufficient_credits_has_no_side_effects() {
        let db = test_db().await;
        fund(&db, "user-1", 5).await;

        let model = FakeModel::ok();
        let orch = TurnOrchestrator::new(
            db.clone(),
            model.clone(),
            FakeVerifier::accepting("user-1"),
            TurnConfig::default(),
        );

        let err = orch.process(request()).await.unwrap_err();
        match err {
            TurnError::InsufficientFunds { required, balance } => {
                assert_eq!(required, 10);
                assert_eq!(balance, 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            chat_turn::count_turns(db.pool(), "char-1", "sess-1").await.unwrap(),
            0
        );
        let txs = wallet::list_transactions(db.pool(), "user-1").await.unwrap();
        assert!(txs.iter().all(|t| t.tx_type != "usage"));
    }

    #[tokio::test]
    async fn test_unknown_character() {
        let db = test_db().await;
        fund(&db, "user-1", 100).await;

        let orch = TurnOrchestrator::new(
            db.clone(),
            FakeModel::ok(),
            FakeVerifier::accepting("user-1"),
            TurnConfig::default(),
        );

        let mut req = request();
        req.character_id = "missing".to_string();
        let err = orch.process(req).await.unwrap_err();
        assert!(matches!(err, TurnError::CharacterNotFound(id) if id == "missing"));

        assert_eq!(wallet::get_balance(db.pool(), "user-1").await.unwrap().balance, 100);
    }

    #[tokio::test]
    async fn test_model_failure_spends_nothing() {
        let db = test_db().await;
        fund(&db, "user-1", 100).await;

        let orch = TurnOrchestrator::new(
            db.clone(),
            FakeModel::failing(),
            FakeVerifier::accepting("user-1"),
            TurnConfig::default(),
        );

        let err = orch.process(request()).await.unwrap_err();
        assert!(matches!(err, TurnError::Upstream(_)));

        assert_eq!(wallet::get_balance(db.pool(), "user-1").await.unwrap().balance, 100);
        assert_eq!(
            chat_turn::count_turns(db.pool(), "char-1", "sess-1").await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_rejected_token() {
        let db = test_db().await;
        fund(&db, "user-1", 100).await;

        let orch = TurnOrchestrator::new(
            db.clone(),
            FakeModel::ok(),
            FakeVerifier::rejecting(),
            TurnConfig::default(),
        );

        let err = orch.process(request()).await.unwrap_err();
        assert!(matches!(err, TurnError::Unauthorized));
    }

    #[tokio::test]
    async fn test_missing_wallet_self_heals_from_ledger() {
        let db = test_db().await;
        fund(&db, "user-1", 50).await;

        // Simulate a wallet row that failed to materialize.
        sqlx::query("DELETE FROM credit_wallets WHERE user_id = ?")
            .bind("user-1")
            .execute(db.pool())
            .await
            .unwrap();

        let orch = TurnOrchestrator::new(
            db.clone(),
            FakeModel::ok(),
            FakeVerifier::accepting("user-1"),
            TurnConfig::default(),
        );

        let outcome = orch.process(request()).await.unwrap();
        assert_eq!(outcome.balance, 40);
    }

    #[tokio::test]
    async fn test_summarization_triggers_at_threshold() {
        let db = test_db().await;
        fund(&db, "user-1", 1000).await;

        let config = TurnConfig {
            summary_threshold: 4,
            ..TurnConfig::default()
        };
        let orch = TurnOrchestrator::new(
            db.clone(),
            FakeModel::ok(),
            FakeVerifier::accepting("user-1"),
            config,
        );

        // First turn stores 2 turns, below the threshold of 4.
        orch.process(request()).await.unwrap();
        // Second turn reaches it.
        orch.process(request()).await.unwrap();

        let mut produced = 0;
        for _ in 0..200 {
            produced = summary::count_summaries(db.pool(), "char-1").await.unwrap();
            if produced > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(produced > 0, "summarization task never ran");
    }
}
