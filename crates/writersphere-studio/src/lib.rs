//! Writer workflows for Writersphere.
//!
//! Each module carries the logic of one part of the application: who may
//! enter, what gets fetched, how local state reacts to results. Everything
//! that touches data goes through a [`WriterStore`], so the same workflows
//! run against the hosted backend ([`RemoteStore`]) or in memory
//! ([`MemoryStore`]).
//!
//! # Modules
//!
//! - [`account`]: Sign-up/sign-in outcomes and the writer gate
//! - [`dashboard`]: Catalog counts
//! - [`categories`], [`subcategories`]: Catalog lists, forms, and views
//! - [`catalog`]: Optimistic status toggles and image uploads
//! - [`articles`]: New drafts and the filtered, debounced article list
//! - [`editor`]: The article editor with autosave
//! - [`reader`]: Public view of published articles
//! - [`store`]: The [`WriterStore`] seam and its implementations
//! - [`model`]: Row types

#![forbid(unsafe_code)]

pub mod account;
pub mod articles;
pub mod catalog;
pub mod categories;
pub mod dashboard;
pub mod editor;
pub mod error;
pub mod model;
pub mod reader;
pub mod store;
pub mod subcategories;

pub use account::{SignInOutcome, SignUpOutcome, require_writer};
pub use articles::{ArticleBrowser, ArticleFilters, ArticleListState, DEFAULT_LIST_LIMIT};
pub use catalog::ImageFile;
pub use categories::{CategoryForm, CategoryList, CategoryView};
pub use dashboard::DashboardCounts;
pub use editor::{ArticleEditor, Autosave, Draft, SaveReason};
pub use error::{Error, Result};
pub use reader::PublishedArticle;
pub use store::{MemoryStore, RemoteStore, WriterStore};
pub use subcategories::{SubcategoryForm, SubcategoryList, SubcategoryRow};
