//! `category` and `subcategory` commands.

use std::path::Path;
use std::sync::Arc;

use writersphere_studio::model::CatalogDraft;
use writersphere_studio::{
    CategoryForm, CategoryList, CategoryView, ImageFile, SubcategoryForm, SubcategoryList,
};

use crate::app::App;
use crate::cli::{CatalogFields, CategoryAction, SubcategoryAction};
use crate::render;

/// Copy the flags that were given onto `draft`. Blank optional fields are
/// cleared when the form is submitted.
fn apply_fields(fields: &CatalogFields, draft: &mut CatalogDraft) {
    if let Some(name) = &fields.name {
        draft.name = name.clone();
    }
    if let Some(description) = &fields.description {
        draft.description = Some(description.clone());
    }
    if let Some(status) = fields.status {
        draft.status = status;
    }
}

async fn image(path: Option<&Path>) -> anyhow::Result<Option<ImageFile>> {
    Ok(match path {
        Some(path) => Some(ImageFile::read(path).await?),
        None => None,
    })
}

pub(super) async fn category(app: &App, action: CategoryAction) -> anyhow::Result<()> {
    let writer = app.writer().await?;
    let store = Arc::clone(&app.store);

    match action {
        CategoryAction::List { query } => {
            let mut list = CategoryList::load(store, writer).await?;
            list.set_query(query.unwrap_or_default());
            println!("{}", render::categories(&list.visible()));
        }
        CategoryAction::Show { id, query } => {
            let mut view = CategoryView::load(store, writer, id).await?;
            view.set_query(query.unwrap_or_default());
            println!(
                "{}\n\n{}",
                render::category(&view.category),
                render::subcategories(&view.visible_subcategories())
            );
        }
        CategoryAction::New { fields } => {
            let mut form = CategoryForm::new(store, writer);
            apply_fields(&fields, &mut form.draft);
            if let Some(file) = image(fields.image.as_deref()).await? {
                form.attach_image(&file).await?;
            }
            let id = form.submit().await?;
            println!("Created category {id}");
        }
        CategoryAction::Edit { id, fields } => {
            let existing = store.get_category(writer, id).await?;
            let mut form = CategoryForm::edit(store, writer, &existing);
            apply_fields(&fields, &mut form.draft);
            if let Some(file) = image(fields.image.as_deref()).await? {
                form.attach_image(&file).await?;
            }
            form.submit().await?;
            println!("Updated category {id}");
        }
        CategoryAction::Toggle { id } => {
            let mut list = CategoryList::load(store, writer).await?;
            let status = list.toggle(id).await?;
            println!("Category {id} is now {status}");
        }
    }
    Ok(())
}

pub(super) async fn subcategory(app: &App, action: SubcategoryAction) -> anyhow::Result<()> {
    let writer = app.writer().await?;
    let store = Arc::clone(&app.store);

    match action {
        SubcategoryAction::List { query } => {
            let mut list = SubcategoryList::load(store, writer).await?;
            list.set_query(query.unwrap_or_default());
            println!("{}", render::subcategory_rows(&list.visible()));
        }
        SubcategoryAction::New { category, fields } => {
            let mut form = SubcategoryForm::new(store, writer, category).await?;
            apply_fields(&fields, &mut form.fields);
            if let Some(file) = image(fields.image.as_deref()).await? {
                form.attach_image(&file).await?;
            }
            let id = form.submit().await?;
            println!("Created subcategory {id}");
        }
        SubcategoryAction::Edit {
            id,
            category,
            fields,
        } => {
            let mut form = SubcategoryForm::edit(store, writer, id).await?;
            if category.is_some() {
                form.category_id = category;
            }
            apply_fields(&fields, &mut form.fields);
            if let Some(file) = image(fields.image.as_deref()).await? {
                form.attach_image(&file).await?;
            }
            form.submit().await?;
            println!("Updated subcategory {id}");
        }
        SubcategoryAction::Toggle { id } => {
            let mut list = SubcategoryList::load(store, writer).await?;
            let status = list.toggle(id).await?;
            println!("Subcategory {id} is now {status}");
        }
        SubcategoryAction::Delete { id } => {
            let mut list = SubcategoryList::load(store, writer).await?;
            list.delete(id).await?;
            println!("Deleted subcategory {id}");
        }
    }
    Ok(())
}
