use async_trait::async_trait;
use tokio::sync::RwLock;

/// Source of bearer credentials for the gateway client. Implementations own
/// whatever storage the host application uses; the client only asks for the
/// current tokens and reports refreshed or invalidated sessions back.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Option<String>;

    async fn refresh_token(&self) -> Option<String>;

    /// Called after a successful token refresh.
    async fn store_access_token(&self, token: String);

    /// Called when a refresh attempt fails and the session is unrecoverable.
    async fn clear(&self);
}

/// In-memory token pair. Enough for tests and single-user tools; real
/// applications plug in their own persisted store.
pub struct StaticTokens {
    access: RwLock<Option<String>>,
    refresh: RwLock<Option<String>>,
}

impl StaticTokens {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: RwLock::new(Some(access.into())),
            refresh: RwLock::new(Some(refresh.into())),
        }
    }

    pub fn anonymous() -> Self {
        Self {
            access: RwLock::new(None),
            refresh: RwLock::new(None),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokens {
    async fn access_token(&self) -> Option<String> {
        self.access.read().await.clone()
    }

    async fn refresh_token(&self) -> Option<String> {
        self.refresh.read().await.clone()
    }

    async fn store_access_token(&self, token: String) {
        *self.access.write().await = Some(token);
    }

    async fn clear(&self) {
        *self.access.write().await = None;
        *self.refresh.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_tokens_round_trip() {
        let tokens = StaticTokens::new("acc-1", "ref-1");
        assert_eq!(tokens.access_token().await.as_deref(), Some("acc-1"));

        tokens.store_access_token("acc-2".to_string()).await;
        assert_eq!(tokens.access_token().await.as_deref(), Some("acc-2"));
        assert_eq!(tokens.refresh_token().await.as_deref(), Some("ref-1"));

        tokens.clear().await;
        assert!(tokens.access_token().await.is_none());
        assert!(tokens.refresh_token().await.is_none());
    }
}
