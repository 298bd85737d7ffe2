//! # writersphere-client
//!
//! Async client for the hosted backend Writersphere runs on:
//! - [`auth`]: email/password sign-up and sign-in, token refresh, sign-out,
//!   and a persisted, observable session
//! - [`rest`]: table queries with filters, ordering, counts, and writes
//! - [`storage`]: image uploads and public object URLs
//!
//! The backend enforces row-level security and uniqueness; this crate only
//! shapes requests and reports the backend's error messages unchanged.
//!
//! ```rust,no_run
//! use writersphere_client::{BackendClient, ClientConfig};
//!
//! # async fn demo() -> writersphere_client::Result<()> {
//! let client = BackendClient::new(ClientConfig::from_env()?)?;
//! let session = client.auth().sign_in_with_password("me@example.com", "secret").await?;
//! let total = client
//!     .table("categories")
//!     .eq("writer_id", session.user_id())
//!     .count()
//!     .await?;
//! println!("{} categories", total.unwrap_or(0));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod rest;
pub mod storage;

pub use auth::{Session, SessionStore, SignUpResponse, User};
pub use client::BackendClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use rest::Query;
