//! Writersphere Core: shared types, publish rules and errors.
//!
//! This crate has no internal Writersphere dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`ids`]: UUID-backed identifiers for remote rows
//! - [`status`]: Roles and lifecycle statuses
//! - [`tags`]: Tag normalization and the strict chip editor
//! - [`rules`]: Publish requirements for articles
//! - [`filter`]: Client-side text filtering
//! - [`config`]: The [`ConfigManager`] trait

pub mod config;
pub mod error;
pub mod filter;
pub mod ids;
pub mod rules;
pub mod status;
pub mod tags;

mod proptests;

// Re-export key types at crate root for convenience
pub use config::ConfigManager;
pub use error::{Error, Result};
pub use filter::matches_query;
pub use ids::{ArticleId, CategoryId, SubcategoryId, TagId, UserId};
pub use rules::{MetadataCheck, PublishRequirements};
pub use status::{ArticleStatus, CatalogStatus, Role};
pub use tags::input::{PasteReport, RejectReason, RejectedTag, TagBatch, TagInput};
pub use tags::{normalize_tag, unique_tags};
