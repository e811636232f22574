//! Gallery service integration
//!
//! This crate connects the controllers in `gallery-core` to the outside world:
//!
//! - `client` - GalleryClient (HTTP client for the REST service)
//! - `fake` - FakeGallery, an in-memory service for tests and demos
//! - `token_store` - FileTokenStore, token persistence between runs
//! - `config` - GalleryConfig, YAML file plus environment overrides

pub mod client;
pub mod config;
pub mod fake;
pub mod token_store;


pub use client::GalleryClient;
pub use config::GalleryConfig;
pub use fake::FakeGallery;
pub use token_store::FileTokenStore;
