//! Article creation and the filtered article list.
//!
//! The list is a single backend query. Tag filters need two lookups first
//! (the writer's tags by name, then their join rows) and short-circuit to
//! an empty list when either comes back empty.
//!
//! [`ArticleBrowser`] keeps the filters and option lists for an interactive
//! list and refetches through a [`Debouncer`] whenever a filter changes;
//! results arrive on a watch channel.

pub mod debounce;

pub use debounce::{Debouncer, SEARCH_DEBOUNCE};

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;

use writersphere_core::tags::remove_tag;
use writersphere_core::{
    ArticleId, ArticleStatus, CategoryId, SubcategoryId, UserId, unique_tags,
};

use crate::Result;
use crate::model::{ArticleListQuery, ArticleSummary, CategoryOption, NewArticle, SubcategoryOption};
use crate::store::WriterStore;

/// Rows fetched per list query.
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Insert a fresh draft for the writer and return its id.
pub async fn new_draft(store: &dyn WriterStore, writer: UserId) -> Result<ArticleId> {
    let article = NewArticle {
        writer_id: writer,
        title: writersphere_content::display_title(None).to_string(),
        body_md: String::new(),
        status: ArticleStatus::Draft,
        last_saved_at: Utc::now(),
    };
    let id = store.create_article(&article).await?;
    tracing::info!(article = %id, "draft created");
    Ok(id)
}

/// Filters of the article list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilters {
    /// Free text matched against title and body.
    pub search: String,
    /// Exact status.
    pub status: Option<ArticleStatus>,
    /// Exact category.
    pub category: Option<CategoryId>,
    /// Exact subcategory.
    pub subcategory: Option<SubcategoryId>,
    tags: Vec<String>,
}

impl ArticleFilters {
    /// Tag filters, normalized and unique.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Add a tag filter. Blank and duplicate tags are ignored.
    pub fn add_tag(&mut self, raw: &str) {
        let mut tags = std::mem::take(&mut self.tags);
        tags.push(raw.to_string());
        self.tags = unique_tags(tags);
    }

    /// Remove a tag filter, ignoring case.
    pub fn remove_tag(&mut self, name: &str) -> bool {
        remove_tag(&mut self.tags, name)
    }

    /// Reset every filter.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// One-line description of the active filters.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        let search = self.search.trim();
        if !search.is_empty() {
            parts.push(format!("Search: \"{search}\""));
        }
        if let Some(status) = self.status {
            parts.push(format!("Status: {status}"));
        }
        if self.category.is_some() {
            parts.push("Category set".to_string());
        }
        if self.subcategory.is_some() {
            parts.push("Subcategory set".to_string());
        }
        if !self.tags.is_empty() {
            parts.push(format!("Tags: {}", self.tags.join(", ")));
        }
        if parts.is_empty() {
            "No filters".to_string()
        } else {
            parts.join(" · ")
        }
    }
}

/// Ids of the writer's articles carrying any of `tags`.
///
/// `None` when no article can match, so the main query can be skipped.
async fn ids_with_any_tag(
    store: &dyn WriterStore,
    writer: UserId,
    tags: &[String],
) -> Result<Option<Vec<ArticleId>>> {
    let tag_ids: Vec<_> = store
        .find_tags(writer, &unique_tags(tags))
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();
    if tag_ids.is_empty() {
        return Ok(None);
    }

    let mut seen = HashSet::new();
    let ids: Vec<ArticleId> = store
        .article_ids_with_tags(&tag_ids)
        .await?
        .into_iter()
        .filter(|id| seen.insert(*id))
        .collect();
    Ok((!ids.is_empty()).then_some(ids))
}

/// Fetch the writer's articles matching `filters`.
pub async fn list_articles(
    store: &dyn WriterStore,
    writer: UserId,
    filters: &ArticleFilters,
    limit: usize,
) -> Result<Vec<ArticleSummary>> {
    let ids = if filters.tags.is_empty() {
        None
    } else {
        match ids_with_any_tag(store, writer, &filters.tags).await? {
            Some(ids) => Some(ids),
            None => {
                tracing::debug!(tags = ?filters.tags, "no articles carry the filter tags");
                return Ok(Vec::new());
            }
        }
    };

    let search = filters.search.trim();
    let query = ArticleListQuery {
        writer,
        status: filters.status,
        category: filters.category,
        subcategory: filters.subcategory,
        search: (!search.is_empty()).then(|| search.to_string()),
        ids,
        limit,
    };
    store.list_articles(&query).await
}

/// Latest list result published by an [`ArticleBrowser`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleListState {
    /// Rows from the last successful fetch.
    pub rows: Vec<ArticleSummary>,
    /// Message of the last failed fetch, cleared on success.
    pub error: Option<String>,
    /// Number of fetches completed.
    pub fetches: u64,
}

/// Interactive article list: filters, pickers, and debounced refetch.
pub struct ArticleBrowser {
    store: Arc<dyn WriterStore>,
    writer: UserId,
    limit: usize,
    filters: ArticleFilters,
    categories: Vec<CategoryOption>,
    subcategories: Vec<SubcategoryOption>,
    debouncer: Debouncer,
    state: watch::Sender<ArticleListState>,
}

impl ArticleBrowser {
    /// Load the category picker and schedule the first fetch.
    pub async fn open(store: Arc<dyn WriterStore>, writer: UserId) -> Result<Self> {
        Self::open_with(store, writer, Debouncer::default(), DEFAULT_LIST_LIMIT).await
    }

    /// Like [`open`](Self::open) with an explicit debouncer and row limit.
    pub async fn open_with(
        store: Arc<dyn WriterStore>,
        writer: UserId,
        debouncer: Debouncer,
        limit: usize,
    ) -> Result<Self> {
        let categories = store.category_options(writer).await?;
        let (state, _) = watch::channel(ArticleListState::default());
        let mut browser = Self {
            store,
            writer,
            limit,
            filters: ArticleFilters::default(),
            categories,
            subcategories: Vec::new(),
            debouncer,
            state,
        };
        browser.schedule_fetch();
        Ok(browser)
    }

    /// Receive list results as fetches complete.
    pub fn subscribe(&self) -> watch::Receiver<ArticleListState> {
        self.state.subscribe()
    }

    /// Whether a fetch is scheduled or running.
    pub fn is_fetching(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Current filters.
    pub fn filters(&self) -> &ArticleFilters {
        &self.filters
    }

    /// Category picker options, by name.
    pub fn categories(&self) -> &[CategoryOption] {
        &self.categories
    }

    /// Subcategory picker options for the selected category, by name.
    pub fn subcategories(&self) -> &[SubcategoryOption] {
        &self.subcategories
    }

    /// Change the search text.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters.search = search.into();
        self.schedule_fetch();
    }

    /// Change the status filter.
    pub fn set_status(&mut self, status: Option<ArticleStatus>) {
        self.filters.status = status;
        self.schedule_fetch();
    }

    /// Change the category, keeping the subcategory consistent with it.
    pub async fn set_category(&mut self, category: Option<CategoryId>) -> Result<()> {
        self.filters.category = category;
        match category {
            None => {
                self.subcategories.clear();
                self.filters.subcategory = None;
            }
            Some(category) => {
                self.subcategories = self.store.subcategory_options(self.writer, category).await?;
                if let Some(selected) = self.filters.subcategory
                    && !self.subcategories.iter().any(|s| s.id == selected)
                {
                    self.filters.subcategory = None;
                }
            }
        }
        self.schedule_fetch();
        Ok(())
    }

    /// Change the subcategory filter.
    pub fn set_subcategory(&mut self, subcategory: Option<SubcategoryId>) {
        self.filters.subcategory = subcategory;
        self.schedule_fetch();
    }

    /// Add a tag filter.
    pub fn add_tag(&mut self, raw: &str) {
        self.filters.add_tag(raw);
        self.schedule_fetch();
    }

    /// Remove a tag filter.
    pub fn remove_tag(&mut self, name: &str) {
        if self.filters.remove_tag(name) {
            self.schedule_fetch();
        }
    }

    /// Reset every filter.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.subcategories.clear();
        self.schedule_fetch();
    }

    fn schedule_fetch(&mut self) {
        let store = Arc::clone(&self.store);
        let writer = self.writer;
        let filters = self.filters.clone();
        let limit = self.limit;
        let state = self.state.clone();

        self.debouncer.schedule(async move {
            let result = list_articles(store.as_ref(), writer, &filters, limit).await;
            state.send_modify(|s| {
                s.fetches += 1;
                match result {
                    Ok(rows) => {
                        s.rows = rows;
                        s.error = None;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "article list fetch failed");
                        s.error = Some(e.to_string());
                    }
                }
            });
        });
    }
}
