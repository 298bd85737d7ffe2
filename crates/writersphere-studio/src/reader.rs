//! Public reader for published articles.

use chrono::Local;

use writersphere_content::{display_title, extract_first_paragraph, render_html, render_plain};
use writersphere_core::ArticleId;

use crate::model::{PublicArticle, Timestamp};
use crate::store::WriterStore;
use crate::{Error, Result};

/// Shown when the id is unknown or the article is not published.
pub const NOT_PUBLISHED: &str = "This article doesn't exist or isn't published.";

/// Default length of [`PublishedArticle::preview`].
pub const PREVIEW_CHARS: usize = 200;

/// A published article ready to display.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedArticle {
    /// Row id.
    pub id: ArticleId,
    /// Title, "Untitled" when blank.
    pub title: String,
    /// Markdown body, empty when absent.
    pub body_md: String,
    /// Publication time.
    pub published_at: Option<Timestamp>,
    /// Last update time.
    pub updated_at: Option<Timestamp>,
}

impl From<PublicArticle> for PublishedArticle {
    fn from(row: PublicArticle) -> Self {
        Self {
            id: row.id,
            title: display_title(row.title.as_deref()).to_string(),
            body_md: row.body_md.unwrap_or_default(),
            published_at: row.published_at,
            updated_at: row.updated_at,
        }
    }
}

impl PublishedArticle {
    /// Body as HTML.
    pub fn html(&self) -> String {
        render_html(&self.body_md)
    }

    /// Body as terminal text.
    pub fn plain(&self) -> String {
        render_plain(&self.body_md)
    }

    /// Opening paragraph, cut on a word boundary after `max_chars`.
    pub fn preview(&self, max_chars: usize) -> Option<String> {
        extract_first_paragraph(&self.body_md, max_chars)
    }

    /// `Published: ... · Updated: ...`
    pub fn dateline(&self) -> String {
        let fmt = |at: Option<Timestamp>| {
            at.map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default()
        };
        let mut line = format!("Published: {}", fmt(self.published_at));
        if self.updated_at.is_some() {
            line.push_str(&format!(" · Updated: {}", fmt(self.updated_at)));
        }
        line
    }
}

/// Fetch a published article; `NotFound` with [`NOT_PUBLISHED`] otherwise.
pub async fn read_article(store: &dyn WriterStore, id: ArticleId) -> Result<PublishedArticle> {
    store
        .get_published_article(id)
        .await?
        .map(PublishedArticle::from)
        .ok_or_else(|| Error::not_found(NOT_PUBLISHED))
}
