//! Roles and lifecycle statuses.
//!
//! The backend stores these as lowercase text; serde and `FromStr` use the
//! same spelling.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Error;

// ============================================================================
// Role
// ============================================================================

/// Role chosen at sign-up and stored in the auth user's metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Creates categories, subcategories, and articles.
    #[default]
    Writer,
    /// Reads published articles only.
    Reader,
}

impl Role {
    /// Reads the role from a user-metadata JSON object.
    ///
    /// Missing or unrecognised values yield `None`.
    pub fn from_metadata(metadata: &serde_json::Value) -> Option<Self> {
        match metadata.get("role").and_then(|v| v.as_str()) {
            Some("writer") => Some(Role::Writer),
            Some("reader") => Some(Role::Reader),
            _ => None,
        }
    }

    /// Lowercase wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Writer => "writer",
            Role::Reader => "reader",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "writer" => Ok(Role::Writer),
            "reader" => Ok(Role::Reader),
            other => Err(Error::validation_field(
                "role",
                format!("unknown role '{other}' (expected writer or reader)"),
            )),
        }
    }
}

// ============================================================================
// CatalogStatus
// ============================================================================

/// Visibility of a category or subcategory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogStatus {
    /// Shown to readers.
    #[default]
    Active,
    /// Hidden.
    Inactive,
}

impl CatalogStatus {
    /// The other status.
    pub fn toggled(self) -> Self {
        match self {
            CatalogStatus::Active => CatalogStatus::Inactive,
            CatalogStatus::Inactive => CatalogStatus::Active,
        }
    }

    /// Lowercase wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogStatus::Active => "active",
            CatalogStatus::Inactive => "inactive",
        }
    }

    /// Label of the action that flips this status.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            CatalogStatus::Active => "Deactivate",
            CatalogStatus::Inactive => "Activate",
        }
    }
}

impl fmt::Display for CatalogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CatalogStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(CatalogStatus::Active),
            "inactive" => Ok(CatalogStatus::Inactive),
            other => Err(Error::validation_field(
                "status",
                format!("unknown status '{other}' (expected active or inactive)"),
            )),
        }
    }
}

// ============================================================================
// ArticleStatus
// ============================================================================

/// Lifecycle status of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    /// Work in progress.
    #[default]
    Draft,
    /// Visible to readers.
    Published,
    /// Taken down after publishing.
    Unpublished,
    /// Kept for reference.
    Archived,
    /// Soft-deleted; hidden from the article list.
    Deleted,
}

impl ArticleStatus {
    /// All statuses in menu order.
    pub const ALL: [ArticleStatus; 5] = [
        ArticleStatus::Draft,
        ArticleStatus::Published,
        ArticleStatus::Unpublished,
        ArticleStatus::Archived,
        ArticleStatus::Deleted,
    ];

    /// Whether entering this status needs a category and enough tags.
    pub fn requires_metadata(&self) -> bool {
        matches!(
            self,
            ArticleStatus::Published | ArticleStatus::Unpublished | ArticleStatus::Archived
        )
    }

    /// Column holding the time this status was last entered, if any.
    pub fn timestamp_column(&self) -> Option<&'static str> {
        match self {
            ArticleStatus::Draft => None,
            ArticleStatus::Published => Some("published_at"),
            ArticleStatus::Unpublished => Some("unpublished_at"),
            ArticleStatus::Archived => Some("archived_at"),
            ArticleStatus::Deleted => Some("deleted_at"),
        }
    }

    /// Lowercase wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
            ArticleStatus::Unpublished => "unpublished",
            ArticleStatus::Archived => "archived",
            ArticleStatus::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ArticleStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ArticleStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| {
                Error::validation_field("status", format!("unknown article status '{wanted}'"))
            })
    }
}
