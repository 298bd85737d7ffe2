//! The data seam between workflows and the backend.
//!
//! [`WriterStore`] lists the table operations the workflows issue. Each one
//! is a single passthrough query; ownership, uniqueness, and visibility are
//! the store's business, never re-checked by callers.
//!
//! # Implementations
//!
//! - [`RemoteStore`]: the hosted backend, through [`BackendClient`](writersphere_client::BackendClient)
//! - [`MemoryStore`]: in-process tables for tests and offline demos

pub mod memory;
pub mod remote;

pub use memory::MemoryStore;
pub use remote::RemoteStore;

use async_trait::async_trait;

use writersphere_core::{ArticleId, CatalogStatus, CategoryId, SubcategoryId, TagId, UserId};

use crate::Result;
use crate::model::{
    ArticleListQuery, ArticleRecord, ArticleSummary, ArticleTimestamps, ArticleUpdate,
    CatalogDraft, Category, CategoryOption, NewArticle, PublicArticle, Subcategory,
    SubcategoryDraft, SubcategoryOption, TagRow,
};

/// Table operations used by the writer workflows.
///
/// Every writer-owned operation takes the writer's id and is scoped to it.
#[async_trait]
pub trait WriterStore: Send + Sync {
    /// Store name for diagnostics.
    fn name(&self) -> &str;

    // ------------------------------------------------------------------------
    // Counts
    // ------------------------------------------------------------------------

    /// Exact number of the writer's categories, if the backend reports it.
    async fn count_categories(&self, writer: UserId) -> Result<Option<u64>>;

    /// Exact number of the writer's subcategories, if the backend reports it.
    async fn count_subcategories(&self, writer: UserId) -> Result<Option<u64>>;

    // ------------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------------

    /// The writer's categories, newest first.
    async fn list_categories(&self, writer: UserId) -> Result<Vec<Category>>;

    /// The writer's categories for a picker, by name.
    async fn category_options(&self, writer: UserId) -> Result<Vec<CategoryOption>>;

    /// One category.
    async fn get_category(&self, writer: UserId, id: CategoryId) -> Result<Category>;

    /// Insert a category and return its id.
    async fn create_category(&self, writer: UserId, draft: &CatalogDraft) -> Result<CategoryId>;

    /// Overwrite a category's fields and bump `updated_at`.
    async fn update_category(
        &self,
        writer: UserId,
        id: CategoryId,
        draft: &CatalogDraft,
    ) -> Result<()>;

    /// Set only the status.
    async fn set_category_status(
        &self,
        writer: UserId,
        id: CategoryId,
        status: CatalogStatus,
    ) -> Result<()>;

    // ------------------------------------------------------------------------
    // Subcategories
    // ------------------------------------------------------------------------

    /// The writer's subcategories, newest first, optionally under one category.
    async fn list_subcategories(
        &self,
        writer: UserId,
        category: Option<CategoryId>,
    ) -> Result<Vec<Subcategory>>;

    /// Subcategories of one category for a picker, by name.
    async fn subcategory_options(
        &self,
        writer: UserId,
        category: CategoryId,
    ) -> Result<Vec<SubcategoryOption>>;

    /// One subcategory.
    async fn get_subcategory(&self, writer: UserId, id: SubcategoryId) -> Result<Subcategory>;

    /// Insert a subcategory and return its id.
    async fn create_subcategory(
        &self,
        writer: UserId,
        draft: &SubcategoryDraft,
    ) -> Result<SubcategoryId>;

    /// Overwrite a subcategory's fields and bump `updated_at`.
    async fn update_subcategory(
        &self,
        writer: UserId,
        id: SubcategoryId,
        draft: &SubcategoryDraft,
    ) -> Result<()>;

    /// Set only the status.
    async fn set_subcategory_status(
        &self,
        writer: UserId,
        id: SubcategoryId,
        status: CatalogStatus,
    ) -> Result<()>;

    /// Delete a subcategory.
    async fn delete_subcategory(&self, writer: UserId, id: SubcategoryId) -> Result<()>;

    // ------------------------------------------------------------------------
    // Images
    // ------------------------------------------------------------------------

    /// Upload an image (never overwriting) and return its public URL.
    async fn upload_image(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String>;

    // ------------------------------------------------------------------------
    // Articles
    // ------------------------------------------------------------------------

    /// Insert an article and return its id.
    async fn create_article(&self, article: &NewArticle) -> Result<ArticleId>;

    /// The main list query.
    async fn list_articles(&self, query: &ArticleListQuery) -> Result<Vec<ArticleSummary>>;

    /// One of the writer's articles.
    async fn get_article(&self, writer: UserId, id: ArticleId) -> Result<ArticleRecord>;

    /// Apply an editor save and return the stored timestamps.
    async fn update_article(
        &self,
        writer: UserId,
        id: ArticleId,
        update: &ArticleUpdate,
    ) -> Result<ArticleTimestamps>;

    /// A published article by id, readable by anyone; `None` otherwise.
    async fn get_published_article(&self, id: ArticleId) -> Result<Option<PublicArticle>>;

    // ------------------------------------------------------------------------
    // Tags
    // ------------------------------------------------------------------------

    /// The writer's tags with exactly these names.
    async fn find_tags(&self, writer: UserId, names: &[String]) -> Result<Vec<TagRow>>;

    /// Insert-or-merge tags on `(writer_id, name)` and return them all.
    async fn upsert_tags(&self, writer: UserId, names: &[String]) -> Result<Vec<TagRow>>;

    /// Ids of articles joined to any of these tags, possibly repeated.
    async fn article_ids_with_tags(&self, tags: &[TagId]) -> Result<Vec<ArticleId>>;

    /// Names of an article's tags via the join table.
    async fn article_tag_names(&self, article: ArticleId) -> Result<Vec<String>>;

    /// Delete all of an article's join rows.
    async fn clear_article_tags(&self, article: ArticleId) -> Result<()>;

    /// Insert join rows for an article.
    async fn attach_tags(&self, article: ArticleId, tags: &[TagId]) -> Result<()>;
}
