//! Category list, form, and detail view.

use std::sync::Arc;

use writersphere_client::storage::CATEGORY_IMAGES;
use writersphere_core::{CatalogStatus, CategoryId, SubcategoryId, UserId, matches_query};

use crate::Result;
use crate::catalog::{self, ImageFile};
use crate::model::{CatalogDraft, Category, Subcategory};
use crate::store::WriterStore;

// ============================================================================
// List
// ============================================================================

/// The writer's categories with a client-side filter.
pub struct CategoryList {
    store: Arc<dyn WriterStore>,
    writer: UserId,
    rows: Vec<Category>,
    query: String,
}

impl CategoryList {
    /// Load the writer's categories, newest first.
    pub async fn load(store: Arc<dyn WriterStore>, writer: UserId) -> Result<Self> {
        let rows = store.list_categories(writer).await?;
        tracing::debug!(count = rows.len(), "categories loaded");
        Ok(Self {
            store,
            writer,
            rows,
            query: String::new(),
        })
    }

    /// Set the filter text.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// All loaded rows.
    pub fn rows(&self) -> &[Category] {
        &self.rows
    }

    /// Rows whose name or description matches the filter.
    pub fn visible(&self) -> Vec<&Category> {
        self.rows
            .iter()
            .filter(|c| {
                matches_query(&self.query, [Some(c.name.as_str()), c.description.as_deref()])
            })
            .collect()
    }

    /// Flip a category's status optimistically; reverted if the update fails.
    ///
    /// The list is borrowed for the whole call, so only the settled status
    /// is visible afterwards.
    pub async fn toggle(&mut self, id: CategoryId) -> Result<CatalogStatus> {
        let next = catalog::flip_status(&mut self.rows, id)?;
        let result = self.store.set_category_status(self.writer, id, next).await;
        catalog::settle_status(&mut self.rows, id, next, result)
    }
}

// ============================================================================
// Form
// ============================================================================

/// Create or edit a category.
pub struct CategoryForm {
    store: Arc<dyn WriterStore>,
    writer: UserId,
    id: Option<CategoryId>,
    /// Field values.
    pub draft: CatalogDraft,
}

impl CategoryForm {
    /// Blank form; status defaults to active.
    pub fn new(store: Arc<dyn WriterStore>, writer: UserId) -> Self {
        Self {
            store,
            writer,
            id: None,
            draft: CatalogDraft::default(),
        }
    }

    /// Form for an existing category.
    pub fn edit(store: Arc<dyn WriterStore>, writer: UserId, category: &Category) -> Self {
        Self {
            store,
            writer,
            id: Some(category.id),
            draft: CatalogDraft {
                name: category.name.clone(),
                description: category.description.clone(),
                image_url: category.image_url.clone(),
                status: category.status,
            },
        }
    }

    /// Whether submitting creates a new row.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Upload an image and point the form at it.
    pub async fn attach_image(&mut self, image: &ImageFile) -> Result<()> {
        let url = catalog::upload_image(self.store.as_ref(), CATEGORY_IMAGES, image).await?;
        self.draft.image_url = Some(url);
        Ok(())
    }

    /// Insert or update; returns the category id.
    pub async fn submit(&mut self) -> Result<CategoryId> {
        let draft = catalog::cleaned(&self.draft)?;
        let id = match self.id {
            Some(id) => {
                self.store.update_category(self.writer, id, &draft).await?;
                id
            }
            None => self.store.create_category(self.writer, &draft).await?,
        };
        tracing::info!(category = %id, name = %draft.name, "category saved");
        self.id = Some(id);
        self.draft = draft;
        Ok(id)
    }
}

// ============================================================================
// View
// ============================================================================

/// A category with its subcategories.
pub struct CategoryView {
    store: Arc<dyn WriterStore>,
    writer: UserId,
    /// The category itself.
    pub category: Category,
    subcategories: Vec<Subcategory>,
    query: String,
}

impl CategoryView {
    /// Fetch the category and its subcategories concurrently.
    pub async fn load(store: Arc<dyn WriterStore>, writer: UserId, id: CategoryId) -> Result<Self> {
        let (category, subcategories) = futures::try_join!(
            store.get_category(writer, id),
            store.list_subcategories(writer, Some(id))
        )?;
        Ok(Self {
            store,
            writer,
            category,
            subcategories,
            query: String::new(),
        })
    }

    /// Form editing this category.
    pub fn form(&self) -> CategoryForm {
        CategoryForm::edit(Arc::clone(&self.store), self.writer, &self.category)
    }

    /// Set the subcategory filter text.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Subcategories matching the filter on name or description.
    pub fn visible_subcategories(&self) -> Vec<&Subcategory> {
        self.subcategories
            .iter()
            .filter(|s| {
                matches_query(&self.query, [Some(s.name.as_str()), s.description.as_deref()])
            })
            .collect()
    }

    /// Delete a subcategory; it leaves the view only once the delete succeeds.
    pub async fn delete_subcategory(&mut self, id: SubcategoryId) -> Result<()> {
        self.store.delete_subcategory(self.writer, id).await?;
        self.subcategories.retain(|s| s.id != id);
        Ok(())
    }

    /// Flip a subcategory's status optimistically; reverted if the update
    /// fails. Only the settled status is visible afterwards.
    pub async fn toggle_subcategory(&mut self, id: SubcategoryId) -> Result<CatalogStatus> {
        let next = catalog::flip_status(&mut self.subcategories, id)?;
        let result = self.store.set_subcategory_status(self.writer, id, next).await;
        catalog::settle_status(&mut self.subcategories, id, next, result)
    }
}
