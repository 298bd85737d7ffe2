//! Row shapes exchanged with a [`WriterStore`](crate::WriterStore).
//!
//! Read types deserialize from the backend's JSON rows; write types
//! serialize to the partial rows the backend expects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use writersphere_content::display_title;
use writersphere_core::{
    ArticleId, ArticleStatus, CatalogStatus, CategoryId, SubcategoryId, TagId, UserId,
};

/// Timestamp type used for every column.
pub type Timestamp = DateTime<Utc>;

// ============================================================================
// Catalog
// ============================================================================

/// A category owned by a writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Row id.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Optional blurb.
    #[serde(default)]
    pub description: Option<String>,
    /// Public image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Active or inactive.
    #[serde(default)]
    pub status: CatalogStatus,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

/// A subcategory, always under one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    /// Row id.
    pub id: SubcategoryId,
    /// Parent category.
    pub category_id: CategoryId,
    /// Display name.
    pub name: String,
    /// Optional blurb.
    #[serde(default)]
    pub description: Option<String>,
    /// Public image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Active or inactive.
    #[serde(default)]
    pub status: CatalogStatus,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

/// A category in a picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOption {
    /// Row id.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
}

/// A subcategory in a picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcategoryOption {
    /// Row id.
    pub id: SubcategoryId,
    /// Display name.
    pub name: String,
    /// Parent category.
    pub category_id: CategoryId,
}

/// Editable fields of a category, as written on create and update.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CatalogDraft {
    /// Display name. Required.
    pub name: String,
    /// Optional blurb.
    pub description: Option<String>,
    /// Public image URL.
    pub image_url: Option<String>,
    /// Active or inactive.
    pub status: CatalogStatus,
}

/// Editable fields of a subcategory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubcategoryDraft {
    /// Parent category. Required.
    pub category_id: CategoryId,
    /// Shared catalog fields.
    #[serde(flatten)]
    pub fields: CatalogDraft,
}

// ============================================================================
// Tags
// ============================================================================

/// A writer's tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRow {
    /// Row id.
    pub id: TagId,
    /// Tag text, unique per writer.
    pub name: String,
}

// ============================================================================
// Articles
// ============================================================================

/// Status-related timestamps of an article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleTimestamps {
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
    /// Last successful save.
    #[serde(default)]
    pub last_saved_at: Option<Timestamp>,
    /// When it was last published.
    #[serde(default)]
    pub published_at: Option<Timestamp>,
    /// When it was last unpublished.
    #[serde(default)]
    pub unpublished_at: Option<Timestamp>,
    /// When it was last archived.
    #[serde(default)]
    pub archived_at: Option<Timestamp>,
    /// When it was deleted.
    #[serde(default)]
    pub deleted_at: Option<Timestamp>,
}

impl ArticleTimestamps {
    /// Column names in select order.
    pub const COLUMNS: &'static str =
        "created_at,updated_at,last_saved_at,published_at,unpublished_at,archived_at,deleted_at";

    /// The timestamp belonging to `status`; drafts have none.
    pub fn for_status(&self, status: ArticleStatus) -> Option<Timestamp> {
        match status {
            ArticleStatus::Draft => None,
            ArticleStatus::Published => self.published_at,
            ArticleStatus::Unpublished => self.unpublished_at,
            ArticleStatus::Archived => self.archived_at,
            ArticleStatus::Deleted => self.deleted_at,
        }
    }

    /// Set the timestamp belonging to `status`. No-op for drafts.
    pub fn stamp(&mut self, status: ArticleStatus, at: Timestamp) {
        match status {
            ArticleStatus::Draft => {}
            ArticleStatus::Published => self.published_at = Some(at),
            ArticleStatus::Unpublished => self.unpublished_at = Some(at),
            ArticleStatus::Archived => self.archived_at = Some(at),
            ArticleStatus::Deleted => self.deleted_at = Some(at),
        }
    }
}

/// Row inserted for a new article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewArticle {
    /// Owner.
    pub writer_id: UserId,
    /// Initial title.
    pub title: String,
    /// Initial body.
    pub body_md: String,
    /// Initial status.
    pub status: ArticleStatus,
    /// Creation counts as a save.
    pub last_saved_at: Timestamp,
}

/// An article as the editor loads it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArticleRecord {
    /// Title, possibly absent.
    #[serde(default)]
    pub title: Option<String>,
    /// Markdown body, possibly absent.
    #[serde(default)]
    pub body_md: Option<String>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: ArticleStatus,
    /// Selected category.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Selected subcategory.
    #[serde(default)]
    pub subcategory_id: Option<SubcategoryId>,
    /// Status timestamps.
    #[serde(flatten)]
    pub timestamps: ArticleTimestamps,
}

impl ArticleRecord {
    /// Column list for selecting a record.
    pub fn columns() -> String {
        format!(
            "title,body_md,status,category_id,subcategory_id,{}",
            ArticleTimestamps::COLUMNS
        )
    }
}

/// Partial row written by an editor save.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleUpdate {
    /// Title; never empty.
    pub title: String,
    /// Markdown body.
    pub body_md: String,
    /// Lifecycle status.
    pub status: ArticleStatus,
    /// Category, or null.
    pub category_id: Option<CategoryId>,
    /// Subcategory, or null.
    pub subcategory_id: Option<SubcategoryId>,
    /// Save time.
    pub updated_at: Timestamp,
    /// Save time.
    pub last_saved_at: Timestamp,
    /// Set when the status is published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Timestamp>,
    /// Set when the status is unpublished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unpublished_at: Option<Timestamp>,
    /// Set when the status is archived.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<Timestamp>,
    /// Set when the status is deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Timestamp>,
}

impl ArticleUpdate {
    /// Build the payload for a save at `now`.
    ///
    /// The title is saved trimmed, "Untitled" when blank. Only the current
    /// status's timestamp column is written: its existing value when there
    /// is one, `now` otherwise.
    pub fn new(
        title: &str,
        body_md: &str,
        status: ArticleStatus,
        category_id: Option<CategoryId>,
        subcategory_id: Option<SubcategoryId>,
        timestamps: &ArticleTimestamps,
        now: Timestamp,
    ) -> Self {
        let mut stamps = ArticleTimestamps::default();
        stamps.stamp(status, timestamps.for_status(status).unwrap_or(now));

        Self {
            title: display_title(Some(title)).to_string(),
            body_md: body_md.to_string(),
            status,
            category_id,
            subcategory_id,
            updated_at: now,
            last_saved_at: now,
            published_at: stamps.published_at,
            unpublished_at: stamps.unpublished_at,
            archived_at: stamps.archived_at,
            deleted_at: stamps.deleted_at,
        }
    }
}

/// One row of the article list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArticleSummary {
    /// Row id.
    pub id: ArticleId,
    /// Title, "Untitled" when missing.
    #[serde(default = "untitled", deserialize_with = "title_or_untitled")]
    pub title: String,
    /// Lifecycle status.
    pub status: ArticleStatus,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
    /// Last successful save.
    #[serde(default)]
    pub last_saved_at: Option<Timestamp>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    /// Category name from the backend join.
    #[serde(rename = "categories", default, deserialize_with = "embedded_name")]
    pub category_name: Option<String>,
    /// Subcategory name from the backend join.
    #[serde(rename = "subcategories", default, deserialize_with = "embedded_name")]
    pub subcategory_name: Option<String>,
}

impl ArticleSummary {
    /// Column list, including the category and subcategory joins.
    pub const COLUMNS: &'static str =
        "id,title,status,updated_at,last_saved_at,created_at,categories(name),subcategories(name)";
}

/// What the public reader shows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PublicArticle {
    /// Row id.
    pub id: ArticleId,
    /// Title, possibly absent.
    #[serde(default)]
    pub title: Option<String>,
    /// Markdown body, possibly absent.
    #[serde(default)]
    pub body_md: Option<String>,
    /// Always published when returned by the reader query.
    pub status: ArticleStatus,
    /// Publication time.
    #[serde(default)]
    pub published_at: Option<Timestamp>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

impl PublicArticle {
    /// Column list.
    pub const COLUMNS: &'static str = "id,title,body_md,published_at,updated_at,status";
}

/// Parameters of the main article list query.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleListQuery {
    /// Owner.
    pub writer: UserId,
    /// Exact status; deleted articles are never listed.
    pub status: Option<ArticleStatus>,
    /// Exact category.
    pub category: Option<CategoryId>,
    /// Exact subcategory.
    pub subcategory: Option<SubcategoryId>,
    /// Case-insensitive substring of title or body.
    pub search: Option<String>,
    /// Restrict to these ids.
    pub ids: Option<Vec<ArticleId>>,
    /// Maximum rows.
    pub limit: usize,
}

fn untitled() -> String {
    display_title(None).to_string()
}

fn title_or_untitled<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let title = Option::<String>::deserialize(deserializer)?;
    Ok(display_title(title.as_deref()).to_string())
}

#[derive(Deserialize)]
struct NameOnly {
    name: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Embedded {
    One(NameOnly),
    Many(Vec<NameOnly>),
}

/// A to-one join comes back as an object, or null; older shapes use a
/// one-element array.
fn embedded_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Embedded>::deserialize(deserializer)? {
        Some(Embedded::One(row)) => row.name,
        Some(Embedded::Many(rows)) => rows.into_iter().find_map(|r| r.name),
        None => None,
    })
}
