//! Pieces shared by the category and subcategory pages: optimistic status
//! toggles, image attachments, and form validation.
//!
//! A toggle is `flip_status` on the loaded rows, the remote update, then
//! `settle_status`. The list methods that drive it take `&mut self` across
//! the await, so callers never see the flipped row while the update is in
//! flight: they see the new status on success, or the original status and
//! the error after a revert. Nothing is sent for a row that is not loaded.

use std::path::Path;

use uuid::Uuid;

use writersphere_client::storage::content_type_for;
use writersphere_core::{CatalogStatus, CategoryId, SubcategoryId};

use crate::model::{CatalogDraft, Category, Subcategory};
use crate::store::WriterStore;
use crate::{Error, Result};

/// A row whose status can be toggled in place.
pub trait CatalogRow {
    /// Row id type.
    type Id: Copy + PartialEq;

    /// This row's id.
    fn row_id(&self) -> Self::Id;

    /// Mutable access to the status.
    fn status_mut(&mut self) -> &mut CatalogStatus;
}

impl CatalogRow for Category {
    type Id = CategoryId;

    fn row_id(&self) -> CategoryId {
        self.id
    }

    fn status_mut(&mut self) -> &mut CatalogStatus {
        &mut self.status
    }
}

impl CatalogRow for Subcategory {
    type Id = SubcategoryId;

    fn row_id(&self) -> SubcategoryId {
        self.id
    }

    fn status_mut(&mut self) -> &mut CatalogStatus {
        &mut self.status
    }
}

/// Flip the row's status locally and return the new status.
pub(crate) fn flip_status<R: CatalogRow>(rows: &mut [R], id: R::Id) -> Result<CatalogStatus> {
    let row = rows
        .iter_mut()
        .find(|r| r.row_id() == id)
        .ok_or_else(|| Error::not_found("Row is not loaded"))?;
    let next = row.status_mut().toggled();
    *row.status_mut() = next;
    Ok(next)
}

/// Keep the flipped status on success; put the other one back on failure.
pub(crate) fn settle_status<R: CatalogRow>(
    rows: &mut [R],
    id: R::Id,
    next: CatalogStatus,
    result: Result<()>,
) -> Result<CatalogStatus> {
    match result {
        Ok(()) => Ok(next),
        Err(e) => {
            tracing::warn!(error = %e, "status update failed; reverting");
            if let Some(row) = rows.iter_mut().find(|r| r.row_id() == id) {
                *row.status_mut() = next.toggled();
            }
            Err(e)
        }
    }
}

/// An image picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Original file name; part of the storage key.
    pub file_name: String,
    /// MIME type.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Wrap bytes, guessing the MIME type from the file name.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        Self {
            content_type: content_type_for(&file_name).to_string(),
            file_name,
            bytes,
        }
    }

    /// Read an image from disk.
    pub async fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| writersphere_core::Error::io_with_path(e, path))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(file_name, bytes))
    }

    /// Fresh storage key: `<uuid>-<file name>`.
    pub fn storage_key(&self) -> String {
        format!("{}-{}", Uuid::new_v4(), self.file_name)
    }
}

/// Upload `image` to `bucket` under a fresh key and return its public URL.
pub async fn upload_image(store: &dyn WriterStore, bucket: &str, image: &ImageFile) -> Result<String> {
    let key = image.storage_key();
    let url = store
        .upload_image(bucket, &key, image.bytes.clone(), &image.content_type)
        .await?;
    tracing::info!(bucket, key = %key, "image uploaded");
    Ok(url)
}

/// Trim the draft and reject a blank name.
///
/// Blank optional fields become `None`.
pub(crate) fn cleaned(draft: &CatalogDraft) -> Result<CatalogDraft> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(Error::validation_field("name", "Name is required."));
    }
    let optional = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    Ok(CatalogDraft {
        name: name.to_string(),
        description: optional(&draft.description),
        image_url: optional(&draft.image_url),
        status: draft.status,
    })
}
