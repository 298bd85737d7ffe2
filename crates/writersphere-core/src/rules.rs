//! Publish requirements.
//!
//! Published, unpublished, and archived articles must have a category and
//! a minimum number of distinct tags. The backend enforces the same rule
//! with a trigger; checking locally gives the writer an immediate message.

use crate::{ArticleStatus, CategoryId, Error, unique_tags};

/// Default minimum number of distinct tags.
pub const DEFAULT_MIN_TAGS: usize = 5;

/// Message shown when a save is attempted without the required metadata.
pub const SAVE_BLOCKED: &str =
    "To publish/unpublish/archive you must select a category and have at least 5 tags.";

/// Message shown when switching status without the required metadata.
pub const STATUS_CHANGE_BLOCKED: &str =
    "Pick a category and add at least 5 tags before publishing/unpublishing/archiving.";

/// Where the check is made, which decides the wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataCheck {
    /// Saving the current status.
    Save,
    /// Switching to a new status.
    StatusChange,
}

/// Metadata requirements for statuses that need them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishRequirements {
    /// Minimum number of distinct tags.
    pub min_tags: usize,
}

impl Default for PublishRequirements {
    fn default() -> Self {
        Self {
            min_tags: DEFAULT_MIN_TAGS,
        }
    }
}

impl PublishRequirements {
    /// Whether a category and enough distinct tags are present.
    pub fn has_required_metadata(&self, category: Option<CategoryId>, tags: &[String]) -> bool {
        category.is_some() && unique_tags(tags).len() >= self.min_tags
    }

    /// Check `status` against the metadata at hand.
    pub fn check(
        &self,
        status: ArticleStatus,
        category: Option<CategoryId>,
        tags: &[String],
        at: MetadataCheck,
    ) -> crate::Result<()> {
        if !status.requires_metadata() || self.has_required_metadata(category, tags) {
            return Ok(());
        }
        log::debug!("status {status} blocked: category or tags missing");
        Err(Error::validation_field("status", self.blocked_message(at)))
    }

    /// The refusal text for `at`, naming this minimum.
    ///
    /// Matches [`SAVE_BLOCKED`] and [`STATUS_CHANGE_BLOCKED`] at the default
    /// minimum.
    pub fn blocked_message(&self, at: MetadataCheck) -> String {
        let n = self.min_tags;
        match at {
            MetadataCheck::Save => format!(
                "To publish/unpublish/archive you must select a category and have at least {n} tags."
            ),
            MetadataCheck::StatusChange => format!(
                "Pick a category and add at least {n} tags before publishing/unpublishing/archiving."
            ),
        }
    }

    /// Progress label such as `3/5`.
    pub fn progress(&self, tags: &[String]) -> String {
        format!("{}/{}", unique_tags(tags).len(), self.min_tags)
    }
}
