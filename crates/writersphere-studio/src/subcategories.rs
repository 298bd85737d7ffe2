//! Subcategory list and form.

use std::collections::HashMap;
use std::sync::Arc;

use writersphere_client::storage::SUBCATEGORY_IMAGES;
use writersphere_core::{CatalogStatus, CategoryId, SubcategoryId, UserId, matches_query};

use crate::catalog::{self, CatalogRow, ImageFile};
use crate::model::{CatalogDraft, CategoryOption, Subcategory, SubcategoryDraft};
use crate::store::WriterStore;
use crate::{Error, Result};

/// A subcategory with its category's name merged in.
#[derive(Debug, Clone, PartialEq)]
pub struct SubcategoryRow {
    /// The row itself.
    pub subcategory: Subcategory,
    /// Name of the parent category, when it could be found.
    pub category_name: Option<String>,
}

impl CatalogRow for SubcategoryRow {
    type Id = SubcategoryId;

    fn row_id(&self) -> SubcategoryId {
        self.subcategory.id
    }

    fn status_mut(&mut self) -> &mut CatalogStatus {
        &mut self.subcategory.status
    }
}

/// All of the writer's subcategories.
pub struct SubcategoryList {
    store: Arc<dyn WriterStore>,
    writer: UserId,
    rows: Vec<SubcategoryRow>,
    query: String,
}

impl SubcategoryList {
    /// Load subcategories newest first, then merge in category names.
    pub async fn load(store: Arc<dyn WriterStore>, writer: UserId) -> Result<Self> {
        let subcategories = store.list_subcategories(writer, None).await?;
        let names: HashMap<CategoryId, String> = store
            .category_options(writer)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let rows = subcategories
            .into_iter()
            .map(|subcategory| SubcategoryRow {
                category_name: names.get(&subcategory.category_id).cloned(),
                subcategory,
            })
            .collect();

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
    pub fn rows(&self) -> &[SubcategoryRow] {
        &self.rows
    }

    /// Rows matching the filter on name, description, or category name.
    pub fn visible(&self) -> Vec<&SubcategoryRow> {
        self.rows
            .iter()
            .filter(|r| {
                matches_query(
                    &self.query,
                    [
                        Some(r.subcategory.name.as_str()),
                        r.subcategory.description.as_deref(),
                        r.category_name.as_deref(),
                    ],
                )
            })
            .collect()
    }

    /// Delete; the row leaves the list only once the delete succeeds.
    pub async fn delete(&mut self, id: SubcategoryId) -> Result<()> {
        self.store.delete_subcategory(self.writer, id).await?;
        self.rows.retain(|r| r.subcategory.id != id);
        Ok(())
    }

    /// Flip the status optimistically; reverted if the update fails.
    ///
    /// The list is borrowed for the whole call, so only the settled status
    /// is visible afterwards.
    pub async fn toggle(&mut self, id: SubcategoryId) -> Result<CatalogStatus> {
        let next = catalog::flip_status(&mut self.rows, id)?;
        let result = self.store.set_subcategory_status(self.writer, id, next).await;
        catalog::settle_status(&mut self.rows, id, next, result)
    }
}

/// Create or edit a subcategory.
pub struct SubcategoryForm {
    store: Arc<dyn WriterStore>,
    writer: UserId,
    id: Option<SubcategoryId>,
    options: Vec<CategoryOption>,
    /// Chosen parent category. Required.
    pub category_id: Option<CategoryId>,
    /// Field values.
    pub fields: CatalogDraft,
}

impl SubcategoryForm {
    /// Blank form, optionally preselecting a category.
    pub async fn new(
        store: Arc<dyn WriterStore>,
        writer: UserId,
        category: Option<CategoryId>,
    ) -> Result<Self> {
        let options = store.category_options(writer).await?;
        Ok(Self {
            store,
            writer,
            id: None,
            options,
            category_id: category,
            fields: CatalogDraft::default(),
        })
    }

    /// Form for an existing subcategory.
    pub async fn edit(store: Arc<dyn WriterStore>, writer: UserId, id: SubcategoryId) -> Result<Self> {
        let (subcategory, options) = futures::try_join!(
            store.get_subcategory(writer, id),
            store.category_options(writer)
        )?;
        Ok(Self {
            store,
            writer,
            id: Some(id),
            options,
            category_id: Some(subcategory.category_id),
            fields: CatalogDraft {
                name: subcategory.name,
                description: subcategory.description,
                image_url: subcategory.image_url,
                status: subcategory.status,
            },
        })
    }

    /// Categories to choose from, by name.
    pub fn category_options(&self) -> &[CategoryOption] {
        &self.options
    }

    /// Upload an image and point the form at it.
    pub async fn attach_image(&mut self, image: &ImageFile) -> Result<()> {
        let url = catalog::upload_image(self.store.as_ref(), SUBCATEGORY_IMAGES, image).await?;
        self.fields.image_url = Some(url);
        Ok(())
    }

    /// Insert or update; returns the subcategory id.
    pub async fn submit(&mut self) -> Result<SubcategoryId> {
        let category_id = self
            .category_id
            .ok_or_else(|| Error::validation_field("category_id", "Category is required."))?;
        let draft = SubcategoryDraft {
            category_id,
            fields: catalog::cleaned(&self.fields)?,
        };

        let id = match self.id {
            Some(id) => {
                self.store.update_subcategory(self.writer, id, &draft).await?;
                id
            }
            None => self.store.create_subcategory(self.writer, &draft).await?,
        };
        tracing::info!(subcategory = %id, category = %category_id, "subcategory saved");
        self.id = Some(id);
        self.fields = draft.fields;
        Ok(id)
    }
}
