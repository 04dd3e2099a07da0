// botdeck-core/src/auth/login.rs

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::{info, warn};
use url::Url;

use botdeck_common::models::auth::{LoginRequest, LoginSuccess};
use botdeck_common::models::notion::ApiEnvelope;
use crate::auth::validation::validate_login_form;
use crate::http::{DefaultHttpClient, HttpClient};
use crate::session::SessionContext;
use crate::Error;

/// How long a "remember me" session stays valid.
pub const REMEMBER_ME_DAYS: i64 = 30;

const LOGIN_FALLBACK: &str = "Unable to sign in";

/// The remote login endpoint, as a seam so the flow can be driven
/// against a mock in tests.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginSuccess, Error>;
}

/// `POST /auth/login` against the botdeck API.
pub struct HttpAuthApi {
    base_url: String,
    http: Arc<dyn HttpClient<Error = Error>>,
}

impl HttpAuthApi {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::with_http(base_url, Arc::new(DefaultHttpClient::new()))
    }

    pub fn with_http(
        base_url: &str,
        http: Arc<dyn HttpClient<Error = Error>>,
    ) -> Result<Self, Error> {
        Url::parse(base_url)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginSuccess, Error> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        let raw = self
            .http
            .post(
                format!("{}/auth/login", self.base_url),
                headers,
                serde_json::to_string(&request)?,
            )
            .await?;
        ApiEnvelope::<LoginSuccess>::parse(&raw, LOGIN_FALLBACK)?.into_result(LOGIN_FALLBACK)
    }
}

/// Where a login attempt currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginState {
    /// Form shown; carries the previous attempt's message after a
    /// rejection or a failed validation.
    AnonymousForm { error: Option<String> },
    Submitting,
    /// Terminal for this flow's lifetime.
    Authenticated,
}

/// Drives one sign-in: validate locally, submit once, and on acceptance
/// persist the token (and 30-day expiry when "remember me" is set) plus
/// the profile blob through the session context. A rejection lands back
/// on the form with a message; the form may be resubmitted freely.
pub struct LoginFlow {
    api: Arc<dyn AuthApi>,
    session: Arc<SessionContext>,
    state: LoginState,
}

impl LoginFlow {
    pub fn new(api: Arc<dyn AuthApi>, session: Arc<SessionContext>) -> Self {
        Self {
            api,
            session,
            state: LoginState::AnonymousForm { error: None },
        }
    }

    pub fn state(&self) -> &LoginState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == LoginState::Authenticated
    }

    pub async fn submit(
        &mut self,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<(), Error> {
        match &self.state {
            LoginState::Authenticated => {
                return Err(Error::Auth("Already signed in".to_string()));
            }
            LoginState::Submitting => {
                return Err(Error::Auth("A sign-in attempt is already in flight".to_string()));
            }
            LoginState::AnonymousForm { .. } => {}
        }

        // Validation failures never reach the network.
        if let Err(e) = validate_login_form(email, password) {
            self.state = LoginState::AnonymousForm { error: Some(e.user_message()) };
            return Err(e);
        }

        self.state = LoginState::Submitting;
        match self.api.login(email, password).await {
            Ok(success) => match self.persist(&success, remember_me).await {
                Ok(()) => {
                    self.state = LoginState::Authenticated;
                    info!(
                        "Signed in as {} ({} scope)",
                        success.user.email,
                        self.session.scope()
                    );
                    Ok(())
                }
                Err(e) => {
                    self.state = LoginState::AnonymousForm { error: Some(e.user_message()) };
                    Err(e)
                }
            },
            Err(e) => {
                let msg = e.user_message();
                warn!("Sign-in rejected: {msg}");
                self.state = LoginState::AnonymousForm { error: Some(msg) };
                Err(e)
            }
        }
    }

    async fn persist(&self, success: &LoginSuccess, remember_me: bool) -> Result<(), Error> {
        let expires_at = remember_me.then(|| Utc::now() + Duration::days(REMEMBER_ME_DAYS));
        self.session.set_auth_token(&success.token, expires_at).await?;
        self.session.cache_profile(&success.user).await
    }
}
