//! Plain-text rendering of command output.

use chrono::Local;

use writersphere_studio::model::{
    ArticleSummary, Category, CategoryOption, Subcategory, SubcategoryOption, Timestamp,
};
use writersphere_studio::{DashboardCounts, Draft, SubcategoryRow};

/// Local time to the minute, or `-`.
pub fn when(at: Option<Timestamp>) -> String {
    at.map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Left-aligned columns separated by two spaces.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        let last = cells.len().saturating_sub(1);
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if i == last {
                    cell.to_string()
                } else {
                    format!("{cell:<width$}", width = widths[i])
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    };

    let mut out = vec![line(headers.to_vec())];
    out.extend(rows.iter().map(|row| line(row.iter().map(String::as_str).collect())));
    out.join("\n")
}

/// The dashboard.
pub fn counts(counts: &DashboardCounts) -> String {
    format!(
        "Categories: {}\nSubcategories: {}",
        counts.categories, counts.subcategories
    )
}

/// Category list.
pub fn categories(rows: &[&Category]) -> String {
    if rows.is_empty() {
        return "No categories.".to_string();
    }
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.status.to_string(),
                c.name.clone(),
                c.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    table(&["ID", "STATUS", "NAME", "DESCRIPTION"], &rows)
}

/// One category's heading block.
pub fn category(category: &Category) -> String {
    let mut out = format!("{} ({})\n{}", category.name, category.status, category.id);
    if let Some(description) = category.description.as_deref().filter(|d| !d.is_empty()) {
        out.push_str(&format!("\n{description}"));
    }
    if let Some(url) = category.image_url.as_deref() {
        out.push_str(&format!("\nImage: {url}"));
    }
    out
}

/// Subcategories of one category.
pub fn subcategories(rows: &[&Subcategory]) -> String {
    if rows.is_empty() {
        return "No subcategories.".to_string();
    }
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|s| {
            vec![
                s.id.to_string(),
                s.status.to_string(),
                s.name.clone(),
                s.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    table(&["ID", "STATUS", "NAME", "DESCRIPTION"], &rows)
}

/// Subcategory list with category names.
pub fn subcategory_rows(rows: &[&SubcategoryRow]) -> String {
    if rows.is_empty() {
        return "No subcategories.".to_string();
    }
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.subcategory.id.to_string(),
                r.subcategory.status.to_string(),
                r.category_name.clone().unwrap_or_else(|| "-".to_string()),
                r.subcategory.name.clone(),
            ]
        })
        .collect();
    table(&["ID", "STATUS", "CATEGORY", "NAME"], &rows)
}

/// Article list.
pub fn articles(rows: &[ArticleSummary]) -> String {
    if rows.is_empty() {
        return "No articles.".to_string();
    }
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                a.status.to_string(),
                when(a.updated_at),
                a.category_name.clone().unwrap_or_else(|| "-".to_string()),
                a.subcategory_name.clone().unwrap_or_else(|| "-".to_string()),
                a.title.clone(),
            ]
        })
        .collect();
    table(
        &["ID", "STATUS", "UPDATED", "CATEGORY", "SUBCATEGORY", "TITLE"],
        &rows,
    )
}

/// An open draft: metadata block, blank line, body.
pub fn draft(
    draft: &Draft,
    categories: &[CategoryOption],
    subcategories: &[SubcategoryOption],
    tag_progress: &str,
) -> String {
    let category = draft
        .category_id
        .and_then(|id| categories.iter().find(|c| c.id == id))
        .map_or("-", |c| c.name.as_str());
    let subcategory = draft
        .subcategory_id
        .and_then(|id| subcategories.iter().find(|s| s.id == id))
        .map_or("-", |s| s.name.as_str());
    let tags = if draft.tags.is_empty() {
        "-".to_string()
    } else {
        draft.tags.join(", ")
    };

    let title = match draft.suggested_title() {
        Some(heading) => format!("Untitled (first heading: {heading})"),
        None if draft.title.trim().is_empty() => "Untitled".to_string(),
        None => draft.title.clone(),
    };
    let mut out = format!(
        "Title: {title}\nStatus: {}\nCategory: {category}\nSubcategory: {subcategory}\nTags ({tag_progress}): {tags}",
        draft.status,
    );
    if let Some(at) = draft.timestamps.for_status(draft.status) {
        out.push_str(&format!("\nSince: {}", when(Some(at))));
    }
    if !draft.body_md.is_empty() {
        out.push_str("\n\n");
        out.push_str(&draft.body_md);
    }
    out
}
