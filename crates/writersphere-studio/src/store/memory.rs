//! In-process [`WriterStore`] for tests and offline demos.
//!
//! Mirrors the backend's behaviour closely enough for the workflows:
//! writer scoping, newest-first ordering, `(writer_id, name)` tag
//! uniqueness, published-only public reads. Failures can be armed per
//! operation and a fixed latency added to every call, so optimistic
//! rollbacks and in-flight guards can be exercised.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use writersphere_core::{
    ArticleId, ArticleStatus, CatalogStatus, CategoryId, SubcategoryId, TagId, UserId,
};

use super::WriterStore;
use crate::model::{
    ArticleListQuery, ArticleRecord, ArticleSummary, ArticleTimestamps, ArticleUpdate,
    CatalogDraft, Category, CategoryOption, NewArticle, PublicArticle, Subcategory,
    SubcategoryDraft, SubcategoryOption, TagRow,
};
use crate::{Error, Result};

#[derive(Debug, Clone)]
struct StoredArticle {
    id: ArticleId,
    writer: UserId,
    title: Option<String>,
    body_md: Option<String>,
    status: ArticleStatus,
    category_id: Option<CategoryId>,
    subcategory_id: Option<SubcategoryId>,
    timestamps: ArticleTimestamps,
}

#[derive(Debug, Default)]
struct Tables {
    categories: Vec<(UserId, Category)>,
    subcategories: Vec<(UserId, Subcategory)>,
    articles: Vec<StoredArticle>,
    tags: Vec<(UserId, TagRow)>,
    article_tags: Vec<(ArticleId, TagId)>,
    objects: HashMap<String, Vec<u8>>,
}

/// Store holding every table in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failures: Mutex<HashMap<&'static str, String>>,
    calls: Mutex<Vec<&'static str>>,
    latency: Option<Duration>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Newest first; ties keep the most recently inserted row first.
fn newest_first<T, K: Ord>(mut rows: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    rows.reverse();
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
    rows
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store that sleeps `latency` at the start of every call.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Make the next call to `operation` fail with `message`.
    ///
    /// `operation` is the [`WriterStore`] method name, e.g.
    /// `"set_category_status"`.
    pub fn fail_next(&self, operation: &'static str, message: impl Into<String>) {
        lock(&self.failures).insert(operation, message.into());
    }

    /// Operations called so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        lock(&self.calls).clone()
    }

    /// How many times `operation` was called.
    pub fn call_count(&self, operation: &str) -> usize {
        lock(&self.calls).iter().filter(|c| **c == operation).count()
    }

    /// Bytes stored under `bucket/key`.
    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        lock(&self.tables)
            .objects
            .get(&format!("{bucket}/{key}"))
            .cloned()
    }

    async fn enter(&self, operation: &'static str) -> Result<()> {
        lock(&self.calls).push(operation);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match lock(&self.failures).remove(operation) {
            Some(message) => Err(Error::store(message)),
            None => Ok(()),
        }
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        lock(&self.tables)
    }
}

#[async_trait]
impl WriterStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn count_categories(&self, writer: UserId) -> Result<Option<u64>> {
        self.enter("count_categories").await?;
        let count = self
            .tables()
            .categories
            .iter()
            .filter(|(w, _)| *w == writer)
            .count();
        Ok(Some(count as u64))
    }

    async fn count_subcategories(&self, writer: UserId) -> Result<Option<u64>> {
        self.enter("count_subcategories").await?;
        let count = self
            .tables()
            .subcategories
            .iter()
            .filter(|(w, _)| *w == writer)
            .count();
        Ok(Some(count as u64))
    }

    async fn list_categories(&self, writer: UserId) -> Result<Vec<Category>> {
        self.enter("list_categories").await?;
        let rows = self
            .tables()
            .categories
            .iter()
            .filter(|(w, _)| *w == writer)
            .map(|(_, c)| c.clone())
            .collect();
        Ok(newest_first(rows, |c: &Category| c.created_at))
    }

    async fn category_options(&self, writer: UserId) -> Result<Vec<CategoryOption>> {
        self.enter("category_options").await?;
        let mut rows: Vec<CategoryOption> = self
            .tables()
            .categories
            .iter()
            .filter(|(w, _)| *w == writer)
            .map(|(_, c)| CategoryOption {
                id: c.id,
                name: c.name.clone(),
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn get_category(&self, writer: UserId, id: CategoryId) -> Result<Category> {
        self.enter("get_category").await?;
        self.tables()
            .categories
            .iter()
            .find(|(w, c)| *w == writer && c.id == id)
            .map(|(_, c)| c.clone())
            .ok_or_else(|| Error::not_found("Category not found"))
    }

    async fn create_category(&self, writer: UserId, draft: &CatalogDraft) -> Result<CategoryId> {
        self.enter("create_category").await?;
        let now = Utc::now();
        let category = Category {
            id: CategoryId::new(),
            name: draft.name.clone(),
            description: draft.description.clone(),
            image_url: draft.image_url.clone(),
            status: draft.status,
            created_at: Some(now),
            updated_at: Some(now),
        };
        let id = category.id;
        self.tables().categories.push((writer, category));
        Ok(id)
    }

    async fn update_category(
        &self,
        writer: UserId,
        id: CategoryId,
        draft: &CatalogDraft,
    ) -> Result<()> {
        self.enter("update_category").await?;
        let mut tables = self.tables();
        if let Some((_, c)) = tables
            .categories
            .iter_mut()
            .find(|(w, c)| *w == writer && c.id == id)
        {
            c.name = draft.name.clone();
            c.description = draft.description.clone();
            c.image_url = draft.image_url.clone();
            c.status = draft.status;
            c.updated_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn set_category_status(
        &self,
        writer: UserId,
        id: CategoryId,
        status: CatalogStatus,
    ) -> Result<()> {
        self.enter("set_category_status").await?;
        let mut tables = self.tables();
        if let Some((_, c)) = tables
            .categories
            .iter_mut()
            .find(|(w, c)| *w == writer && c.id == id)
        {
            c.status = status;
        }
        Ok(())
    }

    async fn list_subcategories(
        &self,
        writer: UserId,
        category: Option<CategoryId>,
    ) -> Result<Vec<Subcategory>> {
        self.enter("list_subcategories").await?;
        let rows = self
            .tables()
            .subcategories
            .iter()
            .filter(|(w, s)| *w == writer && category.is_none_or(|c| s.category_id == c))
            .map(|(_, s)| s.clone())
            .collect();
        Ok(newest_first(rows, |s: &Subcategory| s.created_at))
    }

    async fn subcategory_options(
        &self,
        writer: UserId,
        category: CategoryId,
    ) -> Result<Vec<SubcategoryOption>> {
        self.enter("subcategory_options").await?;
        let mut rows: Vec<SubcategoryOption> = self
            .tables()
            .subcategories
            .iter()
            .filter(|(w, s)| *w == writer && s.category_id == category)
            .map(|(_, s)| SubcategoryOption {
                id: s.id,
                name: s.name.clone(),
                category_id: s.category_id,
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn get_subcategory(&self, writer: UserId, id: SubcategoryId) -> Result<Subcategory> {
        self.enter("get_subcategory").await?;
        self.tables()
            .subcategories
            .iter()
            .find(|(w, s)| *w == writer && s.id == id)
            .map(|(_, s)| s.clone())
            .ok_or_else(|| Error::not_found("Subcategory not found"))
    }

    async fn create_subcategory(
        &self,
        writer: UserId,
        draft: &SubcategoryDraft,
    ) -> Result<SubcategoryId> {
        self.enter("create_subcategory").await?;
        let now = Utc::now();
        let fields = &draft.fields;
        let subcategory = Subcategory {
            id: SubcategoryId::new(),
            category_id: draft.category_id,
            name: fields.name.clone(),
            description: fields.description.clone(),
            image_url: fields.image_url.clone(),
            status: fields.status,
            created_at: Some(now),
            updated_at: Some(now),
        };
        let id = subcategory.id;
        self.tables().subcategories.push((writer, subcategory));
        Ok(id)
    }

    async fn update_subcategory(
        &self,
        writer: UserId,
        id: SubcategoryId,
        draft: &SubcategoryDraft,
    ) -> Result<()> {
        self.enter("update_subcategory").await?;
        let mut tables = self.tables();
        if let Some((_, s)) = tables
            .subcategories
            .iter_mut()
            .find(|(w, s)| *w == writer && s.id == id)
        {
            s.category_id = draft.category_id;
            s.name = draft.fields.name.clone();
            s.description = draft.fields.description.clone();
            s.image_url = draft.fields.image_url.clone();
            s.status = draft.fields.status;
            s.updated_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn set_subcategory_status(
        &self,
        writer: UserId,
        id: SubcategoryId,
        status: CatalogStatus,
    ) -> Result<()> {
        self.enter("set_subcategory_status").await?;
        let mut tables = self.tables();
        if let Some((_, s)) = tables
            .subcategories
            .iter_mut()
            .find(|(w, s)| *w == writer && s.id == id)
        {
            s.status = status;
        }
        Ok(())
    }

    async fn delete_subcategory(&self, writer: UserId, id: SubcategoryId) -> Result<()> {
        self.enter("delete_subcategory").await?;
        self.tables()
            .subcategories
            .retain(|(w, s)| !(*w == writer && s.id == id));
        Ok(())
    }

    async fn upload_image(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String> {
        self.enter("upload_image").await?;
        let path = format!("{bucket}/{key}");
        let mut tables = self.tables();
        if tables.objects.contains_key(&path) {
            return Err(Error::store("The resource already exists"));
        }
        tables.objects.insert(path.clone(), bytes);
        Ok(format!("memory://{path}"))
    }

    async fn create_article(&self, article: &NewArticle) -> Result<ArticleId> {
        self.enter("create_article").await?;
        let now = Utc::now();
        let stored = StoredArticle {
            id: ArticleId::new(),
            writer: article.writer_id,
            title: Some(article.title.clone()),
            body_md: Some(article.body_md.clone()),
            status: article.status,
            category_id: None,
            subcategory_id: None,
            timestamps: ArticleTimestamps {
                created_at: Some(now),
                updated_at: Some(now),
                last_saved_at: Some(article.last_saved_at),
                ..Default::default()
            },
        };
        let id = stored.id;
        self.tables().articles.push(stored);
        Ok(id)
    }

    async fn list_articles(&self, query: &ArticleListQuery) -> Result<Vec<ArticleSummary>> {
        self.enter("list_articles").await?;
        let tables = self.tables();
        let needle = query.search.as_deref().map(str::to_lowercase);

        let category_name = |id: Option<CategoryId>| {
            id.and_then(|id| {
                tables
                    .categories
                    .iter()
                    .find(|(_, c)| c.id == id)
                    .map(|(_, c)| c.name.clone())
            })
        };
        let subcategory_name = |id: Option<SubcategoryId>| {
            id.and_then(|id| {
                tables
                    .subcategories
                    .iter()
                    .find(|(_, s)| s.id == id)
                    .map(|(_, s)| s.name.clone())
            })
        };

        let rows: Vec<ArticleSummary> = tables
            .articles
            .iter()
            .filter(|a| a.writer == query.writer && a.status != ArticleStatus::Deleted)
            .filter(|a| query.status.is_none_or(|s| a.status == s))
            .filter(|a| query.category.is_none_or(|c| a.category_id == Some(c)))
            .filter(|a| query.subcategory.is_none_or(|s| a.subcategory_id == Some(s)))
            .filter(|a| {
                needle.as_deref().is_none_or(|n| {
                    [a.title.as_deref(), a.body_md.as_deref()]
                        .into_iter()
                        .flatten()
                        .any(|field| field.to_lowercase().contains(n))
                })
            })
            .filter(|a| query.ids.as_ref().is_none_or(|ids| ids.contains(&a.id)))
            .map(|a| ArticleSummary {
                id: a.id,
                title: writersphere_content::display_title(a.title.as_deref()).to_string(),
                status: a.status,
                updated_at: a.timestamps.updated_at,
                last_saved_at: a.timestamps.last_saved_at,
                created_at: a.timestamps.created_at,
                category_name: category_name(a.category_id),
                subcategory_name: subcategory_name(a.subcategory_id),
            })
            .collect();

        let mut rows = newest_first(rows, |a: &ArticleSummary| a.updated_at);
        rows.truncate(query.limit);
        Ok(rows)
    }

    async fn get_article(&self, writer: UserId, id: ArticleId) -> Result<ArticleRecord> {
        self.enter("get_article").await?;
        self.tables()
            .articles
            .iter()
            .find(|a| a.writer == writer && a.id == id)
            .map(|a| ArticleRecord {
                title: a.title.clone(),
                body_md: a.body_md.clone(),
                status: a.status,
                category_id: a.category_id,
                subcategory_id: a.subcategory_id,
                timestamps: a.timestamps.clone(),
            })
            .ok_or_else(|| Error::not_found("Article not found"))
    }

    async fn update_article(
        &self,
        writer: UserId,
        id: ArticleId,
        update: &ArticleUpdate,
    ) -> Result<ArticleTimestamps> {
        self.enter("update_article").await?;
        let mut tables = self.tables();
        let article = tables
            .articles
            .iter_mut()
            .find(|a| a.writer == writer && a.id == id)
            .ok_or_else(|| Error::not_found("Article not found"))?;

        article.title = Some(update.title.clone());
        article.body_md = Some(update.body_md.clone());
        article.status = update.status;
        article.category_id = update.category_id;
        article.subcategory_id = update.subcategory_id;

        let stamps = &mut article.timestamps;
        stamps.updated_at = Some(update.updated_at);
        stamps.last_saved_at = Some(update.last_saved_at);
        stamps.published_at = update.published_at.or(stamps.published_at);
        stamps.unpublished_at = update.unpublished_at.or(stamps.unpublished_at);
        stamps.archived_at = update.archived_at.or(stamps.archived_at);
        stamps.deleted_at = update.deleted_at.or(stamps.deleted_at);

        Ok(stamps.clone())
    }

    async fn get_published_article(&self, id: ArticleId) -> Result<Option<PublicArticle>> {
        self.enter("get_published_article").await?;
        Ok(self
            .tables()
            .articles
            .iter()
            .find(|a| a.id == id && a.status == ArticleStatus::Published)
            .map(|a| PublicArticle {
                id: a.id,
                title: a.title.clone(),
                body_md: a.body_md.clone(),
                status: a.status,
                published_at: a.timestamps.published_at,
                updated_at: a.timestamps.updated_at,
            }))
    }

    async fn find_tags(&self, writer: UserId, names: &[String]) -> Result<Vec<TagRow>> {
        self.enter("find_tags").await?;
        Ok(self
            .tables()
            .tags
            .iter()
            .filter(|(w, t)| *w == writer && names.contains(&t.name))
            .map(|(_, t)| t.clone())
            .collect())
    }

    async fn upsert_tags(&self, writer: UserId, names: &[String]) -> Result<Vec<TagRow>> {
        self.enter("upsert_tags").await?;
        let mut tables = self.tables();
        let mut out = Vec::with_capacity(names.len());
        for name in names {
            let existing = tables
                .tags
                .iter()
                .find(|(w, t)| *w == writer && &t.name == name)
                .map(|(_, t)| t.clone());
            let row = match existing {
                Some(row) => row,
                None => {
                    let row = TagRow {
                        id: TagId::new(),
                        name: name.clone(),
                    };
                    tables.tags.push((writer, row.clone()));
                    row
                }
            };
            out.push(row);
        }
        Ok(out)
    }

    async fn article_ids_with_tags(&self, tags: &[TagId]) -> Result<Vec<ArticleId>> {
        self.enter("article_ids_with_tags").await?;
        Ok(self
            .tables()
            .article_tags
            .iter()
            .filter(|(_, t)| tags.contains(t))
            .map(|(a, _)| *a)
            .collect())
    }

    async fn article_tag_names(&self, article: ArticleId) -> Result<Vec<String>> {
        self.enter("article_tag_names").await?;
        let tables = self.tables();
        Ok(tables
            .article_tags
            .iter()
            .filter(|(a, _)| *a == article)
            .filter_map(|(_, tag)| {
                tables
                    .tags
                    .iter()
                    .find(|(_, t)| t.id == *tag)
                    .map(|(_, t)| t.name.clone())
            })
            .collect())
    }

    async fn clear_article_tags(&self, article: ArticleId) -> Result<()> {
        self.enter("clear_article_tags").await?;
        self.tables().article_tags.retain(|(a, _)| *a != article);
        Ok(())
    }

    async fn attach_tags(&self, article: ArticleId, tags: &[TagId]) -> Result<()> {
        self.enter("attach_tags").await?;
        let mut tables = self.tables();
        for tag in tags {
            if tables.article_tags.contains(&(article, *tag)) {
                return Err(Error::store(
                    "duplicate key value violates unique constraint \"article_tags_pkey\"",
                ));
            }
            tables.article_tags.push((article, *tag));
        }
        Ok(())
    }
}
