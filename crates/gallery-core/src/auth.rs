//! Login, registration and logout
//!
//! Validation failures never reach the service. Known rejections (wrong
//! credentials on login, duplicate account on register) land in the form's
//! common-error slot with the server's message; anything else is logged and
//! reported with a generic message.

use gallery_api::{FormErrors, GalleryError, LoginForm, LoginRequest, RegisterForm, RegisterRequest};
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

use crate::in_flight::{CancelGuard, InFlight, OperationKind};
use crate::session::Session;
use crate::traits::{AuthGateway, TokenStore};
use crate::validation::{validate_login, validate_register};

pub const UNEXPECTED_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Statuses whose server message is shown on the login form
const LOGIN_REJECTIONS: [u16; 2] = [401, 404];
/// Statuses whose server message is shown on the registration form
const REGISTER_REJECTIONS: [u16; 1] = [409];

pub struct AuthFlow<A: AuthGateway + ?Sized, S: TokenStore + ?Sized> {
    gateway: Arc<A>,
    tokens: Arc<S>,
    in_flight: Mutex<InFlight>,
}

impl<A: AuthGateway + ?Sized, S: TokenStore + ?Sized> AuthFlow<A, S> {
    pub fn new(gateway: Arc<A>, tokens: Arc<S>) -> Self {
        Self {
            gateway,
            tokens,
            in_flight: Mutex::new(InFlight::new()),
        }
    }

    fn begin(&self, kind: OperationKind) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .begin(kind)
    }

    fn end(&self, kind: OperationKind) {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .end(kind);
    }

    /// Validate, log in, and persist the token.
    ///
    /// A submit while another login is outstanding is ignored and returns
    /// empty `FormErrors`.
    #[tracing::instrument(name = "auth.login", skip_all)]
    pub async fn login(&self, form: &LoginForm) -> Result<Session, FormErrors> {
        let errors = validate_login(form);
        if !errors.is_empty() {
            return Err(errors);
        }
        if !self.begin(OperationKind::Login) {
            warn!("[AuthFlow] Login already in progress");
            return Err(FormErrors::default());
        }
        let guard = CancelGuard::new(move || self.end(OperationKind::Login));

        let request = LoginRequest {
            email: form.email.trim().to_string(),
            password: form.password.clone(),
        };
        let result = self.gateway.login(&request).await;
        guard.disarm();
        self.end(OperationKind::Login);

        let response = result.map_err(|e| rejection(e, &LOGIN_REJECTIONS, "login"))?;

        if let Err(e) = self.tokens.save_token(&response.token).await {
            error!("[AuthFlow] Failed to persist token: {}", e);
            return Err(FormErrors::common(UNEXPECTED_ERROR_MESSAGE));
        }
        info!("[AuthFlow] Logged in as {}", response.user_data.email);
        Ok(Session::new(response.token, Some(response.user_data)))
    }

    /// Validate and create an account. The user logs in separately afterwards.
    #[tracing::instrument(name = "auth.register", skip_all)]
    pub async fn register(&self, form: &RegisterForm) -> Result<(), FormErrors> {
        let errors = validate_register(form);
        if !errors.is_empty() {
            return Err(errors);
        }
        if !self.begin(OperationKind::Register) {
            warn!("[AuthFlow] Registration already in progress");
            return Err(FormErrors::default());
        }
        let guard = CancelGuard::new(move || self.end(OperationKind::Register));

        let request = RegisterRequest {
            email: form.email.clone(),
            phone: form.phone.clone(),
            password: form.password.clone(),
        };
        let result = self.gateway.register(&request).await;
        guard.disarm();
        self.end(OperationKind::Register);

        result.map_err(|e| rejection(e, &REGISTER_REJECTIONS, "register"))?;
        info!("[AuthFlow] Registered {}", request.email);
        Ok(())
    }

    /// Session from a previously persisted token, if any
    pub async fn restore_session(&self) -> Option<Session> {
        match self.tokens.load_token().await {
            Ok(token) => token.map(|t| Session::new(t, None)),
            Err(e) => {
                warn!("[AuthFlow] Could not read stored token: {}", e);
                None
            }
        }
    }

    pub async fn logout(&self) -> gallery_api::Result<()> {
        self.tokens.clear_token().await?;
        info!("[AuthFlow] Logged out");
        Ok(())
    }
}

fn rejection(error: GalleryError, expected: &[u16], action: &str) -> FormErrors {
    match error.status() {
        Some(status) if expected.contains(&status) => FormErrors::common(error.message()),
        _ => {
            error!("[AuthFlow] Unexpected {} failure: {}", action, error);
            FormErrors::common(UNEXPECTED_ERROR_MESSAGE)
        }
    }
}
