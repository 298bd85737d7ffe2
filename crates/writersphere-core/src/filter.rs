//! Client-side text filtering for already-loaded lists.

/// Case-insensitive substring match of `query` against any field.
///
/// A blank query matches everything; absent fields never match.
///
/// # Examples
///
/// ```
/// use writersphere_core::matches_query;
///
/// assert!(matches_query("myst", [Some("Mystery"), None]));
/// assert!(matches_query("  ", [None::<&str>]));
/// assert!(!matches_query("sci", [Some("Mystery"), Some("Whodunits")]));
/// ```
pub fn matches_query<'a, I>(query: &str, fields: I) -> bool
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    if query.trim().is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}
