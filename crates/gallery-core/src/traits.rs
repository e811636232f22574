//! Seams to the outside world
//!
//! The gallery service and the token storage are collaborators; the
//! controllers only talk to them through these traits.

use async_trait::async_trait;
use gallery_api::{
    ImageId, ImageOrder, ImageRecord, LoginRequest, LoginResponse, RegisterRequest, Result,
};

use crate::session::Session;

/// Image endpoints of the gallery service
#[async_trait]
pub trait ImageGateway: Send + Sync {
    /// `GET /images`
    async fn list_images(&self, session: &Session) -> Result<Vec<ImageRecord>>;

    /// `PUT /images` with the full `(id, order)` list
    async fn reorder_images(&self, session: &Session, orders: &[ImageOrder]) -> Result<()>;

    /// `DELETE /images?imageIds[]=...`
    async fn delete_images(&self, session: &Session, ids: &[ImageId]) -> Result<()>;
}

/// Account endpoints of the gallery service
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// `POST /login`
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse>;

    /// `POST /register`
    async fn register(&self, request: &RegisterRequest) -> Result<()>;
}

/// Persistence for the authentication token
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load_token(&self) -> Result<Option<String>>;
    async fn save_token(&self, token: &str) -> Result<()>;
    async fn clear_token(&self) -> Result<()>;
}
