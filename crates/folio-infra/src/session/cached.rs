use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use folio_core::ports::{Cache, RequestCredentials, Session, SessionError, SessionProvider};

/// Default lifetime of a cached session, matching the auth service's cookie cache.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(600);

/// Caches resolved sessions so mutations do not each cost an auth round trip.
///
/// Only positive lookups are cached; a freshly signed-in caller is seen on
/// the next request.
pub struct CachedSessionProvider {
    inner: Arc<dyn SessionProvider>,
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl CachedSessionProvider {
    pub fn new(inner: Arc<dyn SessionProvider>, cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }

    /// SHA-256 over both credential fields, each length-prefixed.
    fn cache_key(credentials: &RequestCredentials) -> String {
        let mut hasher = Sha256::new();
        for field in [&credentials.cookie, &credentials.authorization] {
            match field {
                Some(value) => {
                    hasher.update([1u8]);
                    hasher.update((value.len() as u64).to_be_bytes());
                    hasher.update(value.as_bytes());
                }
                None => hasher.update([0u8]),
            }
        }
        format!("session:{}", hex::encode(hasher.finalize()))
    }

    async fn remember(&self, key: &str, session: &Session) {
        let json = match serde_json::to_string(session) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Session not cached");
                return;
            }
        };
        if let Err(e) = self.cache.set(key, &json, Some(self.ttl)).await {
            tracing::warn!(error = %e, "Session not cached");
        }
    }
}

#[async_trait]
impl SessionProvider for CachedSessionProvider {
    async fn get_session(
        &self,
        credentials: &RequestCredentials,
    ) -> Result<Option<Session>, SessionError> {
        if credentials.is_empty() {
            return Ok(None);
        }

        let key = Self::cache_key(credentials);
        if let Some(cached) = self.cache.get(&key).await {
            match serde_json::from_str::<Session>(&cached) {
                Ok(session) => return Ok(Some(session)),
                Err(e) => tracing::warn!(error = %e, "Discarding unreadable cached session"),
            }
        }

        let session = self.inner.get_session(credentials).await?;
        if let Some(session) = &session {
            self.remember(&key, session).await;
        }
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::cache::InMemoryCache;

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
        anonymous: bool,
    }

    #[async_trait]
    impl SessionProvider for CountingProvider {
        async fn get_session(
            &self,
            _credentials: &RequestCredentials,
        ) -> Result<Option<Session>, SessionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.anonymous {
                Ok(None)
            } else {
                Ok(Some(Session::new("owner@example.com", "owner-gh")))
            }
        }
    }

    fn cached(inner: Arc<CountingProvider>) -> CachedSessionProvider {
        CachedSessionProvider::new(inner, Arc::new(InMemoryCache::new()), DEFAULT_SESSION_TTL)
    }

    fn cookie(value: &str) -> RequestCredentials {
        RequestCredentials {
            cookie: Some(value.to_string()),
            authorization: None,
        }
    }

    #[tokio::test]
    async fn test_second_lookup_is_served_from_cache() {
        let inner = Arc::new(CountingProvider::default());
        let provider = cached(inner.clone());

        let first = provider.get_session(&cookie("a")).await.unwrap();
        let second = provider.get_session(&cookie("a")).await.unwrap();

        assert_eq!(first, second);
        assert!(first.is_some());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_credentials_are_cached_separately() {
        let inner = Arc::new(CountingProvider::default());
        let provider = cached(inner.clone());

        provider.get_session(&cookie("a")).await.unwrap();
        provider.get_session(&cookie("b")).await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cache_key_separates_credential_fields() {
        let split = RequestCredentials {
            cookie: Some("a".to_string()),
            authorization: Some("b".to_string()),
        };
        let joined = cookie("ab");
        let as_header = RequestCredentials {
            cookie: None,
            authorization: Some("ab".to_string()),
        };

        let keys = [
            CachedSessionProvider::cache_key(&split),
            CachedSessionProvider::cache_key(&joined),
            CachedSessionProvider::cache_key(&as_header),
        ];
        assert_ne!(keys[0], keys[1]);
        assert_ne!(keys[1], keys[2]);
        assert_ne!(keys[0], keys[2]);
        // SHA-256 hex digest
        assert_eq!(keys[0].len(), "session:".len() + 64);
        assert_eq!(keys[1], CachedSessionProvider::cache_key(&cookie("ab")));
    }

    #[tokio::test]
    async fn test_anonymous_results_are_not_cached() {
        let inner = Arc::new(CountingProvider {
            anonymous: true,
            ..Default::default()
        });
        let provider = cached(inner.clone());

        assert!(provider.get_session(&cookie("a")).await.unwrap().is_none());
        assert!(provider.get_session(&cookie("a")).await.unwrap().is_none());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_expired_entry_triggers_refresh() {
        let inner = Arc::new(CountingProvider::default());
        let provider = CachedSessionProvider::new(
            inner.clone(),
            Arc::new(InMemoryCache::new()),
            Duration::from_millis(20),
        );

        provider.get_session(&cookie("a")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        provider.get_session(&cookie("a")).await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }
}
