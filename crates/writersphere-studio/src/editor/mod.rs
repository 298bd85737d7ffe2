//! The article editor.
//!
//! An [`ArticleEditor`] holds one article's draft in memory. Edits mark it
//! dirty; [`ArticleEditor::save`] writes the article row, then replaces its
//! tag joins. Only one save runs at a time: a save requested while another
//! is in flight returns immediately without doing anything.
//!
//! The editor is shared as `Arc<ArticleEditor>` between the caller and the
//! [`Autosave`] task, so all state sits behind a short-lived lock and two
//! atomic flags. The lock is never held across an await.
//!
//! Edits made while a save is in flight keep the draft dirty, so the next
//! autosave tick picks them up.

pub mod autosave;

pub use autosave::{AUTOSAVE_INTERVAL, Autosave};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Local, Utc};

use writersphere_core::{
    ArticleId, ArticleStatus, CategoryId, MetadataCheck, PublishRequirements, SubcategoryId,
    TagId, UserId, normalize_tag, unique_tags,
};

use crate::Result;
use crate::model::{
    ArticleTimestamps, ArticleUpdate, CategoryOption, SubcategoryOption, Timestamp,
};
use crate::store::WriterStore;

/// Why a save was started; decides the message shown afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveReason {
    /// The autosave timer.
    Auto,
    /// The writer asked for it.
    Manual,
    /// A status change.
    Status,
}

impl SaveReason {
    /// Message shown after a successful save.
    pub fn message(&self) -> &'static str {
        match self {
            SaveReason::Auto => "Autosaved",
            SaveReason::Manual => "Saved",
            SaveReason::Status => "Status saved",
        }
    }
}

/// Editable article fields plus the timestamps last seen from the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    /// Title; may be empty while editing.
    pub title: String,
    /// Markdown body.
    pub body_md: String,
    /// Lifecycle status.
    pub status: ArticleStatus,
    /// Selected category.
    pub category_id: Option<CategoryId>,
    /// Selected subcategory.
    pub subcategory_id: Option<SubcategoryId>,
    /// Tags, normalized and unique.
    pub tags: Vec<String>,
    /// Status timestamps.
    pub timestamps: ArticleTimestamps,
}

impl Draft {
    /// The body's first heading, offered when the title is still blank.
    pub fn suggested_title(&self) -> Option<String> {
        if !self.title.trim().is_empty() {
            return None;
        }
        writersphere_content::extract_first_heading(&self.body_md).map(|(_, text)| text)
    }
}

#[derive(Debug, Default)]
struct EditorState {
    draft: Draft,
    categories: Vec<CategoryOption>,
    subcategories: Vec<SubcategoryOption>,
    message: Option<String>,
    error: Option<String>,
    generation: u64,
}

/// Resets the in-flight flag when a save ends, however it ends.
struct SavingGuard<'a>(&'a AtomicBool);

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One open article.
pub struct ArticleEditor {
    store: Arc<dyn WriterStore>,
    writer: UserId,
    id: ArticleId,
    requirements: PublishRequirements,
    state: Mutex<EditorState>,
    saving: AtomicBool,
    dirty: AtomicBool,
}

impl std::fmt::Debug for ArticleEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleEditor")
            .field("store", &self.store.name())
            .field("writer", &self.writer)
            .field("id", &self.id)
            .field("saving", &self.is_saving())
            .field("dirty", &self.is_dirty())
            .finish()
    }
}

impl ArticleEditor {
    /// Load an article owned by `writer`, with default publish requirements.
    pub async fn open(store: Arc<dyn WriterStore>, writer: UserId, id: ArticleId) -> Result<Arc<Self>> {
        Self::open_with(store, writer, id, PublishRequirements::default()).await
    }

    /// Load an article with explicit publish requirements.
    ///
    /// Fetches the category options and the article together, then the tags
    /// and the subcategory options for the article's category. Failing to
    /// read the tags leaves the tag list empty.
    pub async fn open_with(
        store: Arc<dyn WriterStore>,
        writer: UserId,
        id: ArticleId,
        requirements: PublishRequirements,
    ) -> Result<Arc<Self>> {
        let (categories, record) = futures::try_join!(
            store.category_options(writer),
            store.get_article(writer, id)
        )?;

        let tags = match store.article_tag_names(id).await {
            Ok(names) => unique_tags(names),
            Err(e) => {
                tracing::warn!(article = %id, error = %e, "could not load tags");
                Vec::new()
            }
        };

        let subcategories = match record.category_id {
            Some(category) => store.subcategory_options(writer, category).await?,
            None => Vec::new(),
        };

        let draft = Draft {
            title: record.title.unwrap_or_default(),
            body_md: record.body_md.unwrap_or_default(),
            status: record.status,
            category_id: record.category_id,
            subcategory_id: record.subcategory_id,
            tags,
            timestamps: record.timestamps,
        };
        tracing::debug!(article = %id, status = %draft.status, "article loaded");

        Ok(Arc::new(Self {
            store,
            writer,
            id,
            requirements,
            state: Mutex::new(EditorState {
                draft,
                categories,
                subcategories,
                ..Default::default()
            }),
            saving: AtomicBool::new(false),
            dirty: AtomicBool::new(false),
        }))
    }

    fn state(&self) -> MutexGuard<'_, EditorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply an edit under the lock and mark the draft dirty.
    fn edit<T>(&self, apply: impl FnOnce(&mut EditorState) -> T) -> T {
        let mut state = self.state();
        let out = apply(&mut state);
        state.generation += 1;
        state.message = None;
        self.dirty.store(true, Ordering::Release);
        out
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// The article id.
    pub fn id(&self) -> ArticleId {
        self.id
    }

    /// A copy of the current draft.
    pub fn draft(&self) -> Draft {
        self.state().draft.clone()
    }

    /// Category picker options, by name.
    pub fn categories(&self) -> Vec<CategoryOption> {
        self.state().categories.clone()
    }

    /// Subcategory options for the selected category, by name.
    pub fn subcategories(&self) -> Vec<SubcategoryOption> {
        self.state().subcategories.clone()
    }

    /// Whether there are unsaved edits.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Whether a save is in flight.
    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    /// Message of the last successful save, until the next edit.
    pub fn message(&self) -> Option<String> {
        self.state().message.clone()
    }

    /// Error of the last failed save or rejected status change.
    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    /// Whether the draft has a category and enough tags to publish.
    pub fn has_required_metadata(&self) -> bool {
        let state = self.state();
        self.requirements
            .has_required_metadata(state.draft.category_id, &state.draft.tags)
    }

    /// Tag count against the minimum, e.g. `3/5`.
    pub fn tag_progress(&self) -> String {
        self.requirements.progress(&self.state().draft.tags)
    }

    /// Save message, else whether there are unsaved changes, plus the last
    /// save time.
    pub fn status_line(&self) -> String {
        let state = self.state();
        let mut line = match &state.message {
            Some(message) => message.clone(),
            None if self.is_dirty() => "Unsaved changes".to_string(),
            None => "Up to date".to_string(),
        };
        if let Some(at) = state.draft.timestamps.last_saved_at {
            line.push_str(&format!(" · Last saved: {}", format_time(at)));
        }
        line
    }

    // ------------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------------

    /// Replace the title.
    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.edit(|s| s.draft.title = title);
    }

    /// Replace the body.
    pub fn set_body(&self, body: impl Into<String>) {
        let body = body.into();
        self.edit(|s| s.draft.body_md = body);
    }

    /// Select a category and reload the subcategory options.
    ///
    /// The selected subcategory is cleared when it does not belong to the
    /// new category, and always when the category is cleared.
    pub async fn set_category(&self, category: Option<CategoryId>) -> Result<()> {
        let options = match category {
            Some(category) => self.store.subcategory_options(self.writer, category).await?,
            None => Vec::new(),
        };
        self.edit(|s| {
            s.draft.category_id = category;
            if let Some(selected) = s.draft.subcategory_id
                && !options.iter().any(|o| o.id == selected)
            {
                s.draft.subcategory_id = None;
            }
            s.subcategories = options;
        });
        Ok(())
    }

    /// Select a subcategory.
    pub fn set_subcategory(&self, subcategory: Option<SubcategoryId>) {
        self.edit(|s| s.draft.subcategory_id = subcategory);
    }

    /// Add a tag. Returns false for blank input.
    pub fn add_tag(&self, raw: &str) -> bool {
        let Some(tag) = normalize_tag(raw) else {
            return false;
        };
        self.edit(|s| {
            let mut tags = std::mem::take(&mut s.draft.tags);
            tags.push(tag);
            s.draft.tags = unique_tags(tags);
        });
        true
    }

    /// Remove a tag, ignoring case.
    pub fn remove_tag(&self, name: &str) {
        self.edit(|s| {
            writersphere_core::tags::remove_tag(&mut s.draft.tags, name);
        });
    }

    // ------------------------------------------------------------------------
    // Saving
    // ------------------------------------------------------------------------

    /// Switch status and save.
    ///
    /// Statuses that need metadata are refused up front when the category or
    /// tags are missing; the status is left unchanged.
    pub async fn change_status(&self, next: ArticleStatus) -> Result<bool> {
        {
            let mut state = self.state();
            if let Err(e) = self.requirements.check(
                next,
                state.draft.category_id,
                &state.draft.tags,
                MetadataCheck::StatusChange,
            ) {
                state.error = Some(e.to_string());
                return Err(e.into());
            }
            state.error = None;
        }

        self.edit(|s| {
            s.draft.status = next;
            s.draft.timestamps.stamp(next, Utc::now());
        });
        self.save(SaveReason::Status).await
    }

    /// Save the draft.
    ///
    /// Returns `Ok(false)` without doing anything when another save is in
    /// flight. On failure the draft stays dirty and the error is kept for
    /// [`error`](Self::error).
    pub async fn save(&self, reason: SaveReason) -> Result<bool> {
        if self.saving.swap(true, Ordering::AcqRel) {
            tracing::debug!(article = %self.id, ?reason, "save already in flight");
            return Ok(false);
        }
        let _guard = SavingGuard(&self.saving);

        let (draft, generation) = {
            let mut state = self.state();
            state.error = None;
            (state.draft.clone(), state.generation)
        };

        match self.write(&draft).await {
            Ok((timestamps, tags)) => {
                let mut state = self.state();
                state.draft.timestamps = timestamps;
                state.message = Some(reason.message().to_string());
                if state.generation == generation {
                    state.draft.tags = tags;
                    self.dirty.store(false, Ordering::Release);
                }
                tracing::info!(article = %self.id, ?reason, "article saved");
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(article = %self.id, ?reason, error = %e, "save failed");
                self.state().error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn write(&self, draft: &Draft) -> Result<(ArticleTimestamps, Vec<String>)> {
        self.requirements.check(
            draft.status,
            draft.category_id,
            &draft.tags,
            MetadataCheck::Save,
        )?;

        let update = ArticleUpdate::new(
            &draft.title,
            &draft.body_md,
            draft.status,
            draft.category_id,
            draft.subcategory_id,
            &draft.timestamps,
            Utc::now(),
        );
        let timestamps = self.store.update_article(self.writer, self.id, &update).await?;
        let tags = self.sync_tags(&draft.tags).await?;
        Ok((timestamps, tags))
    }

    /// Upsert the tags, then replace the article's join rows with them.
    async fn sync_tags(&self, tags: &[String]) -> Result<Vec<String>> {
        let cleaned = unique_tags(tags);
        let ids: Vec<TagId> = if cleaned.is_empty() {
            Vec::new()
        } else {
            self.store
                .upsert_tags(self.writer, &cleaned)
                .await?
                .into_iter()
                .map(|t| t.id)
                .collect()
        };

        self.store.clear_article_tags(self.id).await?;
        if !ids.is_empty() {
            self.store.attach_tags(self.id, &ids).await?;
        }
        Ok(cleaned)
    }
}

fn format_time(at: Timestamp) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}
