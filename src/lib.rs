#![doc = include_str!("../README.md")]

#[cfg(feature = "client")]
pub mod api;
#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod error;
#[cfg(feature = "middleware")]
pub mod middleware;
pub mod session;
pub mod token;
pub mod types;

// Re-exports for convenient access
#[cfg(feature = "client")]
pub use api::STRATEGY_HEADER;
#[cfg(feature = "client")]
pub use client::{ApiClient, RequestBody, RequestOptions};
pub use config::ClientConfig;
pub use error::Error;
pub use session::{
    IgnoreInvalidation, InvalidationReason, MemorySessionStore, SessionCredentials,
    SessionObserver, SessionStore,
};
pub use token::{UnverifiedClaims, decode_unverified};
pub use types::{
    BlobPath, Collection, DesignAttributes, GeneratedImage, Generation, GenerationStrategy,
    ImageUpload, LoginResponse, Workflow, WorkflowDetail, WorkflowId, WorkflowWithGeneration,
};
