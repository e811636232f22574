//! In-memory gallery service
//!
//! `FakeGallery` implements both gateway traits against local state so the
//! controllers can be exercised without a server:
//! - images, accounts and issued tokens live in memory
//! - any operation can be switched to fail with a 500
//! - an optional latency makes requests overlap in tests
//! - every write request is recorded for inspection

use async_trait::async_trait;
use gallery_api::{
    GalleryError, ImageId, ImageOrder, ImageRecord, LoginRequest, LoginResponse, RegisterRequest,
    Result, UserData,
};
use gallery_core::{AuthGateway, ImageGateway, OperationKind, Session};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Default)]
struct FakeState {
    images: Vec<ImageRecord>,
    /// email -> password
    accounts: HashMap<String, String>,
    tokens: HashSet<String>,
    failing: HashSet<OperationKind>,
    reorder_requests: Vec<Vec<ImageOrder>>,
    delete_requests: Vec<Vec<ImageId>>,
}

#[derive(Debug, Default)]
pub struct FakeGallery {
    state: Mutex<FakeState>,
    latency: Option<Duration>,
}

fn http(status: u16, message: &str) -> GalleryError {
    GalleryError::Http {
        status,
        message: message.to_string(),
    }
}

impl FakeGallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_images(images: Vec<ImageRecord>) -> Self {
        let fake = Self::default();
        fake.state().images = images;
        fake
    }

    /// Delay every request by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    /// A session the fake accepts, without going through login
    pub fn issue_session(&self) -> Session {
        let token = Uuid::new_v4().to_string();
        self.state().tokens.insert(token.clone());
        Session::new(token, None)
    }

    /// Make `kind` fail with HTTP 500 until switched back
    pub fn set_failing(&self, kind: OperationKind, failing: bool) {
        let mut state = self.state();
        if failing {
            state.failing.insert(kind);
        } else {
            state.failing.remove(&kind);
        }
    }

    /// Add an image the way the upload flow would: new id, placed last
    pub fn upload(&self, title: &str) -> ImageRecord {
        let mut state = self.state();
        let id = Uuid::new_v4().to_string();
        let order = state.images.iter().map(|r| r.order).max().unwrap_or(0) + 1;
        let record = ImageRecord {
            id: ImageId::new(id.clone()),
            order,
            title: Some(title.to_string()),
            storage_key: format!("uploads/{}", id),
            url: format!("https://images.example.com/{}", id),
        };
        state.images.push(record.clone());
        record
    }

    /// Server-side records, in store order
    pub fn images(&self) -> Vec<ImageRecord> {
        self.state().images.clone()
    }

    pub fn reorder_requests(&self) -> Vec<Vec<ImageOrder>> {
        self.state().reorder_requests.clone()
    }

    pub fn delete_requests(&self) -> Vec<Vec<ImageId>> {
        self.state().delete_requests.clone()
    }

    fn check(&self, kind: OperationKind, session: Option<&Session>) -> Result<MutexGuard<'_, FakeState>> {
        let state = self.state();
        if let Some(session) = session {
            if !state.tokens.contains(session.token()) {
                return Err(http(401, "Unauthorized"));
            }
        }
        if state.failing.contains(&kind) {
            debug!("[FakeGallery] Injected failure for {}", kind);
            return Err(http(500, &format!("Injected {} failure", kind)));
        }
        Ok(state)
    }
}

#[async_trait]
impl ImageGateway for FakeGallery {
    async fn list_images(&self, session: &Session) -> Result<Vec<ImageRecord>> {
        self.delay().await;
        let state = self.check(OperationKind::Refresh, Some(session))?;
        Ok(state.images.clone())
    }

    async fn reorder_images(&self, session: &Session, orders: &[ImageOrder]) -> Result<()> {
        self.delay().await;
        let mut state = self.check(OperationKind::Reorder, Some(session))?;
        state.reorder_requests.push(orders.to_vec());
        for order in orders {
            if let Some(record) = state.images.iter_mut().find(|r| r.id == order.id) {
                record.order = order.order;
            }
        }
        Ok(())
    }

    async fn delete_images(&self, session: &Session, ids: &[ImageId]) -> Result<()> {
        self.delay().await;
        let mut state = self.check(OperationKind::Delete, Some(session))?;
        state.delete_requests.push(ids.to_vec());
        state.images.retain(|r| !ids.contains(&r.id));
        Ok(())
    }
}

#[async_trait]
impl AuthGateway for FakeGallery {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        self.delay().await;
        let mut state = self.check(OperationKind::Login, None)?;
        let password = state
            .accounts
            .get(&request.email)
            .ok_or_else(|| http(404, "User not found"))?;
        if *password != request.password {
            return Err(http(401, "Invalid password"));
        }

        let token = Uuid::new_v4().to_string();
        state.tokens.insert(token.clone());
        Ok(LoginResponse {
            token,
            user_data: UserData {
                email: request.email.clone(),
                is_user: true,
            },
        })
    }

    async fn register(&self, request: &RegisterRequest) -> Result<()> {
        self.delay().await;
        let mut state = self.check(OperationKind::Register, None)?;
        if state.accounts.contains_key(&request.email) {
            return Err(http(409, "User already exists"));
        }
        state
            .accounts
            .insert(request.email.clone(), request.password.clone());
        debug!("[FakeGallery] Registered {}", request.email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_token_is_rejected() {
        let fake = FakeGallery::new();
        let stranger = Session::new("forged", None);
        let err = fake.list_images(&stranger).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn test_upload_appends_last() {
        let fake = FakeGallery::new();
        let first = fake.upload("one");
        let second = fake.upload("two");
        assert_eq!(first.order, 1);
        assert_eq!(second.order, 2);
        assert_ne!(first.id, second.id);

        let session = fake.issue_session();
        assert_eq!(fake.list_images(&session).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let fake = FakeGallery::new();
        let register = RegisterRequest {
            email: "me@example.com".into(),
            phone: "0123456789".into(),
            password: "hunter22".into(),
        };
        fake.register(&register).await.unwrap();
        assert_eq!(fake.register(&register).await.unwrap_err().status(), Some(409));

        let wrong = LoginRequest {
            email: "me@example.com".into(),
            password: "nope".into(),
        };
        assert_eq!(fake.login(&wrong).await.unwrap_err().status(), Some(401));

        let missing = LoginRequest {
            email: "who@example.com".into(),
            password: "hunter22".into(),
        };
        assert_eq!(fake.login(&missing).await.unwrap_err().status(), Some(404));

        let ok = LoginRequest {
            email: "me@example.com".into(),
            password: "hunter22".into(),
        };
        let response = fake.login(&ok).await.unwrap();
        let session = Session::new(response.token, Some(response.user_data));
        assert!(fake.list_images(&session).await.is_ok());
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let fake = FakeGallery::new();
        let session = fake.issue_session();
        fake.set_failing(OperationKind::Delete, true);
        let err = fake
            .delete_images(&session, &[ImageId::new("x")])
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(fake.delete_requests().is_empty());

        fake.set_failing(OperationKind::Delete, false);
        fake.delete_images(&session, &[ImageId::new("x")]).await.unwrap();
        assert_eq!(fake.delete_requests().len(), 1);
    }
}
