use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use shared::UserProfile;
use tracing::info;

use crate::errors::ApiError;
use crate::services::api::ApiClient;
use crate::services::traits::SessionService;

/// Session backed by GET /api/users/me.
///
/// Holds the last known profile of the authenticated user so the rest of the
/// application can show an up-to-date balance after a buy.
#[derive(Clone)]
pub struct HttpSession {
    client: ApiClient,
    current_user: Arc<RwLock<Option<UserProfile>>>,
}

impl HttpSession {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            current_user: Arc::new(RwLock::new(None)),
        }
    }

    /// Last profile fetched, if any
    pub fn current_user(&self) -> Option<UserProfile> {
        self.current_user
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl SessionService for HttpSession {
    async fn refresh_user(&self) -> Result<(), ApiError> {
        let user = self.client.get_current_user().await?;
        info!("🔄 Refreshed session for user {}", user.id);

        *self
            .current_user
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(user);
        Ok(())
    }
}
