//! [`WriterStore`] over the hosted backend.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use writersphere_client::BackendClient;
use writersphere_client::rest::ilike_any;
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

const CATEGORIES: &str = "categories";
const SUBCATEGORIES: &str = "subcategories";
const ARTICLES: &str = "articles";
const TAGS: &str = "tags";
const ARTICLE_TAGS: &str = "article_tags";

const CATALOG_COLUMNS: &str = "id,name,description,image_url,status,created_at,updated_at";
const SUBCATEGORY_COLUMNS: &str =
    "id,category_id,name,description,image_url,status,created_at,updated_at";

#[derive(Deserialize)]
struct IdRow<T> {
    id: T,
}

#[derive(Deserialize)]
struct ArticleIdRow {
    article_id: ArticleId,
}

#[derive(Deserialize)]
struct TagJoinRow {
    #[serde(default)]
    tags: Option<TagNames>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagNames {
    One(NameRow),
    Many(Vec<NameRow>),
}

#[derive(Deserialize)]
struct NameRow {
    #[serde(default)]
    name: Option<String>,
}

/// Store backed by [`BackendClient`] table and storage calls.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: BackendClient,
}

impl RemoteStore {
    /// Wrap a client.
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// The wrapped client.
    pub fn client(&self) -> &BackendClient {
        &self.client
    }
}

fn first_id<T>(rows: Vec<IdRow<T>>, table: &str) -> Result<T> {
    rows.into_iter()
        .next()
        .map(|row| row.id)
        .ok_or_else(|| Error::not_found(format!("insert into {table} returned no row")))
}

#[async_trait]
impl WriterStore for RemoteStore {
    fn name(&self) -> &str {
        "remote"
    }

    async fn count_categories(&self, writer: UserId) -> Result<Option<u64>> {
        Ok(self
            .client
            .table(CATEGORIES)
            .eq("writer_id", writer)
            .count()
            .await?)
    }

    async fn count_subcategories(&self, writer: UserId) -> Result<Option<u64>> {
        Ok(self
            .client
            .table(SUBCATEGORIES)
            .eq("writer_id", writer)
            .count()
            .await?)
    }

    async fn list_categories(&self, writer: UserId) -> Result<Vec<Category>> {
        Ok(self
            .client
            .table(CATEGORIES)
            .select(CATALOG_COLUMNS)
            .eq("writer_id", writer)
            .order("created_at", false)
            .fetch()
            .await?)
    }

    async fn category_options(&self, writer: UserId) -> Result<Vec<CategoryOption>> {
        Ok(self
            .client
            .table(CATEGORIES)
            .select("id,name")
            .eq("writer_id", writer)
            .order("name", true)
            .fetch()
            .await?)
    }

    async fn get_category(&self, writer: UserId, id: CategoryId) -> Result<Category> {
        Ok(self
            .client
            .table(CATEGORIES)
            .select(CATALOG_COLUMNS)
            .eq("id", id)
            .eq("writer_id", writer)
            .single()
            .await?)
    }

    async fn create_category(&self, writer: UserId, draft: &CatalogDraft) -> Result<CategoryId> {
        let mut row = serde_json::to_value(draft).map_err(writersphere_core::Error::from)?;
        row["writer_id"] = json!(writer);
        let rows: Vec<IdRow<CategoryId>> = self
            .client
            .table(CATEGORIES)
            .select("id")
            .insert_returning(&row)
            .await?;
        first_id(rows, CATEGORIES)
    }

    async fn update_category(
        &self,
        writer: UserId,
        id: CategoryId,
        draft: &CatalogDraft,
    ) -> Result<()> {
        let mut row = serde_json::to_value(draft).map_err(writersphere_core::Error::from)?;
        row["updated_at"] = json!(Utc::now());
        self.client
            .table(CATEGORIES)
            .eq("id", id)
            .eq("writer_id", writer)
            .update(&row)
            .await?;
        Ok(())
    }

    async fn set_category_status(
        &self,
        writer: UserId,
        id: CategoryId,
        status: CatalogStatus,
    ) -> Result<()> {
        self.client
            .table(CATEGORIES)
            .eq("id", id)
            .eq("writer_id", writer)
            .update(&json!({ "status": status }))
            .await?;
        Ok(())
    }

    async fn list_subcategories(
        &self,
        writer: UserId,
        category: Option<CategoryId>,
    ) -> Result<Vec<Subcategory>> {
        let mut query = self
            .client
            .table(SUBCATEGORIES)
            .select(SUBCATEGORY_COLUMNS)
            .eq("writer_id", writer);
        if let Some(category) = category {
            query = query.eq("category_id", category);
        }
        Ok(query.order("created_at", false).fetch().await?)
    }

    async fn subcategory_options(
        &self,
        writer: UserId,
        category: CategoryId,
    ) -> Result<Vec<SubcategoryOption>> {
        Ok(self
            .client
            .table(SUBCATEGORIES)
            .select("id,name,category_id")
            .eq("writer_id", writer)
            .eq("category_id", category)
            .order("name", true)
            .fetch()
            .await?)
    }

    async fn get_subcategory(&self, writer: UserId, id: SubcategoryId) -> Result<Subcategory> {
        Ok(self
            .client
            .table(SUBCATEGORIES)
            .select(SUBCATEGORY_COLUMNS)
            .eq("id", id)
            .eq("writer_id", writer)
            .single()
            .await?)
    }

    async fn create_subcategory(
        &self,
        writer: UserId,
        draft: &SubcategoryDraft,
    ) -> Result<SubcategoryId> {
        let mut row = serde_json::to_value(draft).map_err(writersphere_core::Error::from)?;
        row["writer_id"] = json!(writer);
        let rows: Vec<IdRow<SubcategoryId>> = self
            .client
            .table(SUBCATEGORIES)
            .select("id")
            .insert_returning(&row)
            .await?;
        first_id(rows, SUBCATEGORIES)
    }

    async fn update_subcategory(
        &self,
        writer: UserId,
        id: SubcategoryId,
        draft: &SubcategoryDraft,
    ) -> Result<()> {
        let mut row = serde_json::to_value(draft).map_err(writersphere_core::Error::from)?;
        row["updated_at"] = json!(Utc::now());
        self.client
            .table(SUBCATEGORIES)
            .eq("id", id)
            .eq("writer_id", writer)
            .update(&row)
            .await?;
        Ok(())
    }

    async fn set_subcategory_status(
        &self,
        writer: UserId,
        id: SubcategoryId,
        status: CatalogStatus,
    ) -> Result<()> {
        self.client
            .table(SUBCATEGORIES)
            .eq("id", id)
            .eq("writer_id", writer)
            .update(&json!({ "status": status }))
            .await?;
        Ok(())
    }

    async fn delete_subcategory(&self, writer: UserId, id: SubcategoryId) -> Result<()> {
        self.client
            .table(SUBCATEGORIES)
            .eq("id", id)
            .eq("writer_id", writer)
            .delete()
            .await?;
        Ok(())
    }

    async fn upload_image(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let storage = self.client.storage();
        storage
            .upload(bucket, key, bytes, content_type, false)
            .await?;
        Ok(storage.public_url(bucket, key))
    }

    async fn create_article(&self, article: &NewArticle) -> Result<ArticleId> {
        let rows: Vec<IdRow<ArticleId>> = self
            .client
            .table(ARTICLES)
            .select("id")
            .insert_returning(article)
            .await?;
        first_id(rows, ARTICLES)
    }

    async fn list_articles(&self, query: &ArticleListQuery) -> Result<Vec<ArticleSummary>> {
        let mut request = self
            .client
            .table(ARTICLES)
            .select(ArticleSummary::COLUMNS)
            .eq("writer_id", query.writer)
            .neq("status", ArticleStatus::Deleted)
            .order("updated_at", false)
            .limit(query.limit);

        if let Some(status) = query.status {
            request = request.eq("status", status);
        }
        if let Some(category) = query.category {
            request = request.eq("category_id", category);
        }
        if let Some(subcategory) = query.subcategory {
            request = request.eq("subcategory_id", subcategory);
        }
        if let Some(search) = query.search.as_deref() {
            request = request.or(&ilike_any(&["title", "body_md"], search));
        }
        if let Some(ids) = &query.ids {
            request = request.in_("id", ids);
        }

        Ok(request.fetch().await?)
    }

    async fn get_article(&self, writer: UserId, id: ArticleId) -> Result<ArticleRecord> {
        Ok(self
            .client
            .table(ARTICLES)
            .select(&ArticleRecord::columns())
            .eq("id", id)
            .eq("writer_id", writer)
            .single()
            .await?)
    }

    async fn update_article(
        &self,
        writer: UserId,
        id: ArticleId,
        update: &ArticleUpdate,
    ) -> Result<ArticleTimestamps> {
        let rows: Vec<ArticleTimestamps> = self
            .client
            .table(ARTICLES)
            .select(ArticleTimestamps::COLUMNS)
            .eq("id", id)
            .eq("writer_id", writer)
            .update_returning(update)
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| Error::not_found("Article not found"))
    }

    async fn get_published_article(&self, id: ArticleId) -> Result<Option<PublicArticle>> {
        Ok(self
            .client
            .table(ARTICLES)
            .select(PublicArticle::COLUMNS)
            .eq("id", id)
            .eq("status", ArticleStatus::Published)
            .maybe_single()
            .await?)
    }

    async fn find_tags(&self, writer: UserId, names: &[String]) -> Result<Vec<TagRow>> {
        Ok(self
            .client
            .table(TAGS)
            .select("id,name")
            .eq("writer_id", writer)
            .in_("name", names)
            .fetch()
            .await?)
    }

    async fn upsert_tags(&self, writer: UserId, names: &[String]) -> Result<Vec<TagRow>> {
        let rows: Vec<_> = names
            .iter()
            .map(|name| json!({ "writer_id": writer, "name": name }))
            .collect();
        Ok(self
            .client
            .table(TAGS)
            .select("id,name")
            .upsert_returning(&rows, "writer_id,name")
            .await?)
    }

    async fn article_ids_with_tags(&self, tags: &[TagId]) -> Result<Vec<ArticleId>> {
        let rows: Vec<ArticleIdRow> = self
            .client
            .table(ARTICLE_TAGS)
            .select("article_id")
            .in_("tag_id", tags)
            .fetch()
            .await?;
        Ok(rows.into_iter().map(|r| r.article_id).collect())
    }

    async fn article_tag_names(&self, article: ArticleId) -> Result<Vec<String>> {
        let rows: Vec<TagJoinRow> = self
            .client
            .table(ARTICLE_TAGS)
            .select("tags(name)")
            .eq("article_id", article)
            .fetch()
            .await?;
        Ok(rows
            .into_iter()
            .flat_map(|row| match row.tags {
                Some(TagNames::One(t)) => vec![t],
                Some(TagNames::Many(ts)) => ts,
                None => Vec::new(),
            })
            .filter_map(|t| t.name)
            .filter(|name| !name.trim().is_empty())
            .collect())
    }

    async fn clear_article_tags(&self, article: ArticleId) -> Result<()> {
        self.client
            .table(ARTICLE_TAGS)
            .eq("article_id", article)
            .delete()
            .await?;
        Ok(())
    }

    async fn attach_tags(&self, article: ArticleId, tags: &[TagId]) -> Result<()> {
        let rows: Vec<_> = tags
            .iter()
            .map(|tag| json!({ "article_id": article, "tag_id": tag }))
            .collect();
        self.client.table(ARTICLE_TAGS).insert(&rows).await?;
        Ok(())
    }
}
