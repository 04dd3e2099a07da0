// botdeck-core/src/session/mod.rs
//
// Session state is an explicit context object handed to each call site.
// Nothing here is process-global: two contexts (say, a customer and an
// admin session) can coexist against the same store without touching
// each other's keys.

pub mod store;

pub use store::{FileSessionStore, MemorySessionStore};

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use botdeck_common::models::session::SessionScope;
use botdeck_common::models::user::UserProfile;
use botdeck_common::traits::storage_traits::SessionStore;
use crate::Error;

const CONTENT_TYPE: &str = "Content-Type";
const AUTHORIZATION: &str = "Authorization";

/// Header/session state for one dashboard scope.
///
/// Holds a fixed `Content-Type` entry and, once known, an
/// `Authorization: Bearer <token>` entry. If no token has been set when
/// headers are requested, the context tries to populate one from the
/// injected store; a stored token whose expiry has passed is discarded.
/// If the store has nothing either, calls go out unauthenticated and the
/// remote end rejects them.
pub struct SessionContext {
    scope: SessionScope,
    store: Arc<dyn SessionStore>,
    headers: Mutex<HashMap<String, String>>,
}

impl SessionContext {
    pub fn new(scope: SessionScope, store: Arc<dyn SessionStore>) -> Self {
        let mut headers = HashMap::new();
        headers.insert(CONTENT_TYPE.to_string(), "application/json".to_string());
        Self {
            scope,
            store,
            headers: Mutex::new(headers),
        }
    }

    pub fn scope(&self) -> SessionScope {
        self.scope
    }

    /// Install a bearer token and persist it (with its expiry, if any)
    /// under this scope's storage keys.
    pub async fn set_auth_token(
        &self,
        token: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), Error> {
        self.store.set(self.scope.token_key(), token).await?;
        match expires_at {
            Some(ts) => {
                self.store
                    .set(self.scope.expiry_key(), &ts.to_rfc3339())
                    .await?;
            }
            None => {
                self.store.remove(self.scope.expiry_key()).await?;
            }
        }
        self.install_bearer(token);
        Ok(())
    }

    /// The header map for an outgoing call. Lazily populates the bearer
    /// entry from storage on first use.
    pub async fn headers(&self) -> Result<HashMap<String, String>, Error> {
        let has_auth = {
            let map = self.headers.lock().unwrap();
            map.contains_key(AUTHORIZATION)
        };
        if !has_auth {
            if let Some(token) = self.stored_token().await? {
                self.install_bearer(&token);
            }
        }
        Ok(self.headers.lock().unwrap().clone())
    }

    /// Cache the profile blob returned at login.
    pub async fn cache_profile(&self, profile: &UserProfile) -> Result<(), Error> {
        let blob = serde_json::to_string(profile)?;
        self.store.set(self.scope.profile_key(), &blob).await
    }

    /// The cached profile blob, if one is stored and still parseable.
    pub async fn cached_profile(&self) -> Result<Option<UserProfile>, Error> {
        let blob = self.store.get(self.scope.profile_key()).await?;
        match blob {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(profile) => Ok(Some(profile)),
                Err(e) => {
                    warn!("Discarding unreadable cached profile: {e}");
                    self.store.remove(self.scope.profile_key()).await?;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Logout: drop the bearer header and remove this scope's token,
    /// expiry, and cached profile from storage.
    pub async fn clear(&self) -> Result<(), Error> {
        self.store.remove(self.scope.token_key()).await?;
        self.store.remove(self.scope.expiry_key()).await?;
        self.store.remove(self.scope.profile_key()).await?;
        self.headers.lock().unwrap().remove(AUTHORIZATION);
        Ok(())
    }

    /// Stored token for this scope, treating an expired one as absent
    /// (and deleting it so the next lookup is cheap).
    async fn stored_token(&self) -> Result<Option<String>, Error> {
        let token = match self.store.get(self.scope.token_key()).await? {
            Some(t) => t,
            None => return Ok(None),
        };

        if let Some(raw_expiry) = self.store.get(self.scope.expiry_key()).await? {
            match DateTime::parse_from_rfc3339(&raw_expiry) {
                Ok(expiry) if expiry.with_timezone(&Utc) <= Utc::now() => {
                    debug!("Stored {} token expired at {raw_expiry}; removing", self.scope);
                    self.store.remove(self.scope.token_key()).await?;
                    self.store.remove(self.scope.expiry_key()).await?;
                    return Ok(None);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Unreadable token expiry '{raw_expiry}': {e}; removing");
                    self.store.remove(self.scope.expiry_key()).await?;
                }
            }
        }
        Ok(Some(token))
    }

    fn install_bearer(&self, token: &str) {
        let mut map = self.headers.lock().unwrap();
        map.insert(AUTHORIZATION.to_string(), format!("Bearer {token}"));
    }
}
