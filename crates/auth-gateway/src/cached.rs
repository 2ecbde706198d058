//! Short-TTL caching wrapper around an identity verifier.

use std::sync::Arc;
use std::time::Duration;

use chat_core::{async_trait, AuthUser, Clock, GatewayError, IdentityVerifier, TtlCache};
use tracing::debug;

/// Maximum distinct credentials to cache before LRU eviction.
const MAX_CACHED_CREDENTIALS: usize = 10000;

/// Wraps an [`IdentityVerifier`] with a TTL cache keyed by credential.
///
/// Only successful verifications are cached; rejected credentials are
/// re-verified every time. A cache miss is never an error, so the cache is
/// not correctness-critical.
pub struct CachedVerifier {
    inner: Arc<dyn IdentityVerifier>,
    cache: TtlCache<AuthUser>,
}

impl CachedVerifier {
    /// Wrap a verifier with the given cache TTL.
    pub fn new(inner: Arc<dyn IdentityVerifier>, ttl: Duration) -> Self {
        Self {
            inner,
            cache: TtlCache::new(ttl),
        }
    }

    /// Wrap a verifier with an injected clock (used by tests).
    pub fn with_clock(inner: Arc<dyn IdentityVerifier>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            cache: TtlCache::with_clock(ttl, MAX_CACHED_CREDENTIALS, clock),
        }
    }
}

#[async_trait]
impl IdentityVerifier for CachedVerifier {
    async fn verify(&self, token: &str) -> Result<Option<AuthUser>, GatewayError> {
        if let Some(user) = self.cache.get(token).await {
            debug!(user_id = %user.id, "Identity cache hit");
            return Ok(Some(user));
        }

        let verified = self.inner.verify(token).await?;
        if let Some(ref user) = verified {
            self.cache.insert(token, user.clone()).await;
        }

        Ok(verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts verification calls and accepts only "good-token".
    struct CountingVerifier {
        calls: AtomicUsize,
    }

    impl CountingVerifier {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl IdentityVerifier for CountingVerifier {
        async fn verify(&self, token: &str) -> Result<Option<AuthUser>, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if token == "good-token" {
                Ok(Some(AuthUser {
                    id: "user-1".to_string(),
                    email: Some("user@example.com".to_string()),
                }))
            } else {
                Ok(None)
            }
        }
    }

    #[tokio::test]
    async fn test_hit_skips_remote_verification() {
        let inner = Arc::new(CountingVerifier::new());
        let cached = CachedVerifier::new(inner.clone(), Duration::from_secs(60));

        let first = cached.verify("good-token").await.unwrap().unwrap();
        let second = cached.verify("good-token").await.unwrap().unwrap();

        assert_eq!(first.id, "user-1");
        assert_eq!(second.id, "user-1");
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rejections_are_not_cached() {
        let inner = Arc::new(CountingVerifier::new());
        let cached = CachedVerifier::new(inner.clone(), Duration::from_secs(60));

        assert!(cached.verify("bad-token").await.unwrap().is_none());
        assert!(cached.verify("bad-token").await.unwrap().is_none());

        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }
}
