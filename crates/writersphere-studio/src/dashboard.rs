//! Dashboard counts.

use writersphere_core::UserId;

use crate::store::WriterStore;

/// How much the writer has catalogued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardCounts {
    /// Categories owned by the writer.
    pub categories: u64,
    /// Subcategories owned by the writer.
    pub subcategories: u64,
}

/// Fetch both counts concurrently.
///
/// A count the backend does not report, or a failed count query, shows as 0.
pub async fn load_counts(store: &dyn WriterStore, writer: UserId) -> DashboardCounts {
    let (categories, subcategories) = futures::join!(
        store.count_categories(writer),
        store.count_subcategories(writer)
    );

    let or_zero = |what: &str, result: crate::Result<Option<u64>>| match result {
        Ok(count) => count.unwrap_or(0),
        Err(e) => {
            tracing::warn!(error = %e, "{what} count failed");
            0
        }
    };

    DashboardCounts {
        categories: or_zero("category", categories),
        subcategories: or_zero("subcategory", subcategories),
    }
}
