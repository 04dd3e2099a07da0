// File: botdeck-core/tests/login_flow_tests.rs

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use botdeck_common::models::auth::LoginSuccess;
use botdeck_common::models::session::SessionScope;
use botdeck_common::models::user::UserProfile;
use botdeck_common::traits::storage_traits::SessionStore;
use botdeck_core::auth::{AuthApi, LoginFlow, LoginState, REMEMBER_ME_DAYS};
use botdeck_core::session::{MemorySessionStore, SessionContext};
use botdeck_core::Error;

// Scripted AuthApi: pops one outcome per call and counts invocations.
#[derive(Default)]
struct MockAuthApi {
    calls: AtomicUsize,
    outcomes: Mutex<VecDeque<Result<LoginSuccess, Error>>>,
}

impl MockAuthApi {
    fn push(&self, outcome: Result<LoginSuccess, Error>) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn login(&self, _email: &str, _password: &str) -> Result<LoginSuccess, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Remote("no scripted outcome".to_string())))
    }
}

fn profile() -> UserProfile {
    UserProfile {
        user_id: Uuid::new_v4(),
        email: "cat@kittyn.cat".to_string(),
        display_name: "Cat".to_string(),
        company: Some("Kittyn".to_string()),
        plan: Some("pro".to_string()),
    }
}

fn success() -> LoginSuccess {
    LoginSuccess {
        token: "tok-abc123".to_string(),
        user: profile(),
    }
}

struct Fixture {
    api: Arc<MockAuthApi>,
    store: Arc<MemorySessionStore>,
    session: Arc<SessionContext>,
    flow: LoginFlow,
}

fn fixture() -> Fixture {
    let api = Arc::new(MockAuthApi::default());
    let store = Arc::new(MemorySessionStore::new());
    let session = Arc::new(SessionContext::new(SessionScope::Customer, store.clone()));
    let flow = LoginFlow::new(api.clone(), session.clone());
    Fixture { api, store, session, flow }
}

fn form_error(state: &LoginState) -> Option<&str> {
    match state {
        LoginState::AnonymousForm { error } => error.as_deref(),
        other => panic!("expected AnonymousForm, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_email_fails_validation_without_network() {
    let mut fx = fixture();
    let err = fx.flow.submit("", "hunter2", false).await.unwrap_err();
    assert_eq!(err.user_message(), "Please enter your email address");
    assert_eq!(form_error(fx.flow.state()), Some("Please enter your email address"));
    assert_eq!(fx.api.calls(), 0, "validation failure must not issue a call");
}

#[tokio::test]
async fn malformed_email_fails_validation_without_network() {
    let mut fx = fixture();
    let err = fx.flow.submit("not-an-email", "hunter2", false).await.unwrap_err();
    assert_eq!(err.user_message(), "Please enter a valid email address");
    assert_eq!(fx.api.calls(), 0);
}

#[tokio::test]
async fn empty_password_fails_validation_without_network() {
    let mut fx = fixture();
    let err = fx.flow.submit("cat@kittyn.cat", "", false).await.unwrap_err();
    assert_eq!(err.user_message(), "Please enter your password");
    assert_eq!(fx.api.calls(), 0);
}

#[tokio::test]
async fn accepted_login_persists_token_and_profile() -> Result<(), Error> {
    let mut fx = fixture();
    fx.api.push(Ok(success()));

    fx.flow.submit("cat@kittyn.cat", "hunter2", false).await?;
    assert!(fx.flow.is_authenticated());

    let token_key = SessionScope::Customer.token_key();
    assert_eq!(fx.store.get(token_key).await?, Some("tok-abc123".to_string()));
    // No "remember me" means no stored expiry.
    assert_eq!(fx.store.get(SessionScope::Customer.expiry_key()).await?, None);

    let cached = fx.session.cached_profile().await?.expect("profile cached");
    assert_eq!(cached.email, "cat@kittyn.cat");
    Ok(())
}

#[tokio::test]
async fn remember_me_stores_thirty_day_expiry() -> Result<(), Error> {
    let mut fx = fixture();
    fx.api.push(Ok(success()));

    fx.flow.submit("cat@kittyn.cat", "hunter2", true).await?;

    let raw = fx
        .store
        .get(SessionScope::Customer.expiry_key())
        .await?
        .expect("expiry stored");
    let stored: DateTime<Utc> = DateTime::parse_from_rfc3339(&raw).unwrap().with_timezone(&Utc);
    let expected = Utc::now() + Duration::days(REMEMBER_ME_DAYS);
    let drift = (stored - expected).num_seconds().abs();
    assert!(drift < 5, "expiry drifted {drift}s from now + 30 days");
    Ok(())
}

#[tokio::test]
async fn rejection_returns_to_form_with_message_and_allows_retry() -> Result<(), Error> {
    let mut fx = fixture();
    fx.api.push(Err(Error::Remote("Invalid email or password".to_string())));
    fx.api.push(Ok(success()));

    let err = fx.flow.submit("cat@kittyn.cat", "wrong", false).await.unwrap_err();
    assert_eq!(err.user_message(), "Invalid email or password");
    assert_eq!(form_error(fx.flow.state()), Some("Invalid email or password"));

    // No lockout: the same flow can be resubmitted and succeed.
    fx.flow.submit("cat@kittyn.cat", "hunter2", false).await?;
    assert!(fx.flow.is_authenticated());
    assert_eq!(fx.api.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn authenticated_flow_rejects_resubmission() -> Result<(), Error> {
    let mut fx = fixture();
    fx.api.push(Ok(success()));

    fx.flow.submit("cat@kittyn.cat", "hunter2", false).await?;
    let err = fx.flow.submit("cat@kittyn.cat", "hunter2", false).await.unwrap_err();
    assert!(matches!(err, Error::Auth(_)));
    assert_eq!(fx.api.calls(), 1);
    Ok(())
}
