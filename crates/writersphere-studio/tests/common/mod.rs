//! Common test utilities for writersphere-studio integration tests.

use std::sync::Arc;
use std::time::Duration;

use writersphere_core::{ArticleId, ArticleStatus, CategoryId, SubcategoryId, UserId};
use writersphere_studio::editor::ArticleEditor;
use writersphere_studio::model::{CatalogDraft, SubcategoryDraft};
use writersphere_studio::{MemoryStore, WriterStore, articles};

/// One writer working against an in-memory store.
pub struct TestHarness {
    /// The store, for seeding and inspection.
    pub store: Arc<MemoryStore>,
    /// The signed-in writer.
    pub writer: UserId,
}

impl TestHarness {
    /// Empty store.
    pub fn new() -> Self {
        Self::from_store(MemoryStore::new())
    }

    /// Store that takes `latency` for every call.
    pub fn with_latency(latency: Duration) -> Self {
        Self::from_store(MemoryStore::with_latency(latency))
    }

    fn from_store(store: MemoryStore) -> Self {
        Self {
            store: Arc::new(store),
            writer: UserId::new(),
        }
    }

    /// The store behind the workflow seam.
    pub fn dyn_store(&self) -> Arc<dyn WriterStore> {
        self.store.clone()
    }

    /// Seed a category.
    pub async fn category(&self, name: &str) -> CategoryId {
        self.store
            .create_category(self.writer, &catalog_draft(name))
            .await
            .unwrap()
    }

    /// Seed a subcategory under `category`.
    pub async fn subcategory(&self, category: CategoryId, name: &str) -> SubcategoryId {
        self.store
            .create_subcategory(
                self.writer,
                &SubcategoryDraft {
                    category_id: category,
                    fields: catalog_draft(name),
                },
            )
            .await
            .unwrap()
    }

    /// Seed a draft article.
    pub async fn draft(&self) -> ArticleId {
        articles::new_draft(self.store.as_ref(), self.writer)
            .await
            .unwrap()
    }

    /// Open an editor on `id`.
    pub async fn editor(&self, id: ArticleId) -> Arc<ArticleEditor> {
        ArticleEditor::open(self.dyn_store(), self.writer, id)
            .await
            .unwrap()
    }

    /// Seed an article with a title, body, category, and tags, saved with
    /// `status`.
    pub async fn article(
        &self,
        title: &str,
        body: &str,
        category: CategoryId,
        tags: &[&str],
        status: ArticleStatus,
    ) -> ArticleId {
        let id = self.draft().await;
        let editor = self.editor(id).await;
        editor.set_title(title);
        editor.set_body(body);
        editor.set_category(Some(category)).await.unwrap();
        for tag in tags {
            editor.add_tag(tag);
        }
        if status == ArticleStatus::Draft {
            editor
                .save(writersphere_studio::SaveReason::Manual)
                .await
                .unwrap();
        } else {
            editor.change_status(status).await.unwrap();
        }
        id
    }
}

/// A catalog draft with just a name.
pub fn catalog_draft(name: &str) -> CatalogDraft {
    CatalogDraft {
        name: name.to_string(),
        ..Default::default()
    }
}

/// Five distinct tags.
pub const FIVE_TAGS: [&str; 5] = ["noir", "rain", "detective", "city", "night"];
