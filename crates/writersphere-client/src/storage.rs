//! Object storage for category and subcategory images.

use reqwest::Method;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};

use crate::{BackendClient, Result};

/// Bucket holding category images.
pub const CATEGORY_IMAGES: &str = "category-images";
/// Bucket holding subcategory images.
pub const SUBCATEGORY_IMAGES: &str = "subcategory-images";

/// Storage operations bound to a client.
#[derive(Debug, Clone, Copy)]
pub struct Storage<'a> {
    client: &'a BackendClient,
}

impl<'a> Storage<'a> {
    pub(crate) fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    /// Upload `bytes` to `bucket/key`. With `upsert` false an existing
    /// object is an error.
    pub async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> Result<()> {
        let path = object_path(&["object", bucket], key);
        let request = self
            .client
            .request(Method::POST, &path)
            .header(CONTENT_TYPE, content_type)
            .header(CACHE_CONTROL, "max-age=3600")
            .header("x-upsert", upsert.to_string())
            .body(bytes);
        self.client.send(request).await?;
        tracing::debug!(bucket, key, "uploaded object");
        Ok(())
    }

    /// Public URL of an object in a public bucket. No request is made.
    pub fn public_url(&self, bucket: &str, key: &str) -> String {
        let path = object_path(&["object", "public", bucket], key);
        self.client.config().endpoint(path).into()
    }
}

/// `storage/v1/<prefix...>/<key segments...>`. Encoding happens when the
/// segments are appended to the base URL.
fn object_path<'k>(prefix: &[&'k str], key: &'k str) -> Vec<&'k str> {
    ["storage", "v1"]
        .into_iter()
        .chain(prefix.iter().copied())
        .chain(key.split('/'))
        .collect()
}

/// Guess an image content type from a file name.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}
