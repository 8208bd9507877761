// qradmin-api: Async Rust client for the QR code service admin API

pub mod asset;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::ADMIN_TOKEN_HEADER;
pub use client::AdminClient;
pub use error::Error;
pub use models::{
    AdminProfile, AssetRef, EnvelopeKey, FileCodeRecord, TextCodeRecord, UserRecord,
};
pub use transport::{TlsMode, TransportConfig};
