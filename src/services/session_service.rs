use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::PortalError;
use crate::models::authentication::{LoginRequest, RegistrationRequest};
use crate::repositories::token_repository::TokenRepository;
use crate::repositories::PortalGateway;

/// Session slice: anonymous -> authenticating -> authenticated | anonymous+error.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub token: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    fn succeed(&mut self, token: String) {
        self.token = Some(token);
        self.is_loading = false;
        self.error = None;
    }

    fn fail(&mut self, message: String) {
        self.token = None;
        self.is_loading = false;
        self.error = Some(message);
    }

    fn clear(&mut self) {
        self.token = None;
        self.is_loading = false;
        self.error = None;
    }
}

pub struct SessionService {
    gateway: Arc<dyn PortalGateway>,
    tokens: TokenRepository,
    state: SessionState,
}

impl SessionService {
    /// Hydrates from durable storage: a persisted token is treated as an
    /// authenticated session optimistically, validity is confirmed lazily by
    /// the first protected call failing.
    pub fn new(gateway: Arc<dyn PortalGateway>, tokens: TokenRepository) -> Self {
        let state = SessionState {
            token: tokens.load(),
            ..SessionState::default()
        };
        Self {
            gateway,
            tokens,
            state,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.token.is_some()
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), PortalError> {
        if self.state.is_loading {
            return Ok(());
        }
        self.state.begin();
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.gateway.login(request).await {
            Ok(data) => {
                self.tokens.store(&data.token);
                self.state.succeed(data.token);
                info!("session established for {}", email);
                Ok(())
            }
            Err(e) => {
                // An auth failure discards any previously persisted token.
                self.tokens.clear();
                let message = e.to_string();
                warn!("login failed: {}", message);
                self.state.fail(message);
                Err(e)
            }
        }
    }

    /// Successful registration yields no token; the caller redirects to login.
    pub async fn register(&mut self, request: RegistrationRequest) -> Result<(), PortalError> {
        if self.state.is_loading {
            return Ok(());
        }
        self.state.begin();
        match self.gateway.register(request).await {
            Ok(()) => {
                self.state.is_loading = false;
                Ok(())
            }
            Err(e) => {
                self.tokens.clear();
                self.state.fail(e.to_string());
                Err(e)
            }
        }
    }

    pub fn logout(&mut self) {
        self.tokens.clear();
        self.state.clear();
        info!("session cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::authentication::TokenData;
    use crate::repositories::mock_gateway::MockGateway;
    use std::sync::atomic::Ordering;

    fn temp_tokens(tag: &str) -> TokenRepository {
        let path = std::env::temp_dir().join(format!(
            "ppob-session-test-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        TokenRepository::new(path)
    }

    #[tokio::test]
    async fn login_success_stores_token_in_state_and_durable_storage() {
        let gateway = Arc::new(MockGateway::new());
        gateway.push_login(Ok(TokenData {
            token: "abc".to_string(),
        }));
        let tokens = temp_tokens("login-ok");
        let mut session = SessionService::new(gateway.clone(), tokens.clone());

        session.login("a@b.com", "x").await.unwrap();

        assert_eq!(
            *session.state(),
            SessionState {
                token: Some("abc".to_string()),
                is_loading: false,
                error: None,
            }
        );
        assert_eq!(tokens.load(), Some("abc".to_string()));
        assert_eq!(gateway.calls.login.load(Ordering::SeqCst), 1);
        tokens.clear();
    }

    #[tokio::test]
    async fn login_failure_clears_token_everywhere() {
        let gateway = Arc::new(MockGateway::new());
        gateway.push_login(Err(PortalError::Api {
            status: 103,
            message: "Username atau password salah".to_string(),
        }));
        let tokens = temp_tokens("login-err");
        tokens.store("stale");
        let mut session = SessionService::new(gateway, tokens.clone());

        let result = session.login("a@b.com", "wrong").await;

        assert!(result.is_err());
        assert_eq!(session.state().token, None);
        assert_eq!(
            session.state().error.as_deref(),
            Some("Username atau password salah")
        );
        assert!(!session.state().is_loading);
        assert_eq!(tokens.load(), None);
    }

    #[tokio::test]
    async fn hydrates_persisted_token_on_construction() {
        let tokens = temp_tokens("hydrate");
        tokens.store("persisted");
        let session = SessionService::new(Arc::new(MockGateway::new()), tokens.clone());
        assert!(session.is_authenticated());
        assert_eq!(session.state().token.as_deref(), Some("persisted"));
        tokens.clear();
    }

    #[tokio::test]
    async fn logout_clears_state_and_storage() {
        let tokens = temp_tokens("logout");
        tokens.store("abc");
        let mut session = SessionService::new(Arc::new(MockGateway::new()), tokens.clone());
        session.logout();
        assert_eq!(*session.state(), SessionState::default());
        assert_eq!(tokens.load(), None);
    }

    #[tokio::test]
    async fn login_is_a_noop_while_already_authenticating() {
        let gateway = Arc::new(MockGateway::new());
        let tokens = temp_tokens("login-guard");
        let mut session = SessionService::new(gateway.clone(), tokens.clone());
        session.state.begin();

        session.login("a@b.com", "x").await.unwrap();

        assert_eq!(gateway.calls.login.load(Ordering::SeqCst), 0);
        tokens.clear();
    }
}
