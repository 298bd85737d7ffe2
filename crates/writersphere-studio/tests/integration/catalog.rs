//! Category and subcategory workflows.

use writersphere_client::storage::{CATEGORY_IMAGES, SUBCATEGORY_IMAGES};
use writersphere_core::CatalogStatus;
use writersphere_studio::{
    CategoryForm, CategoryList, CategoryView, ImageFile, SubcategoryForm, SubcategoryList,
    WriterStore,
};

use crate::common::TestHarness;

// ----------------------------------------------------------------------------
// Categories
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_category_list_filters_name_and_description() {
    let h = TestHarness::new();
    h.category("Mystery").await;
    let mut form = CategoryForm::new(h.dyn_store(), h.writer);
    form.draft.name = "Science".into();
    form.draft.description = Some("Hard sci-fi and mysteries of space".into());
    form.submit().await.unwrap();
    h.category("Poetry").await;

    let mut list = CategoryList::load(h.dyn_store(), h.writer).await.unwrap();
    assert_eq!(list.rows()[0].name, "Poetry");

    list.set_query("MYSTER");
    let names: Vec<_> = list.visible().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Science", "Mystery"]);

    list.set_query("   ");
    assert_eq!(list.visible().len(), 3);
}

#[tokio::test]
async fn test_category_toggle_is_kept_on_success() {
    let h = TestHarness::new();
    let id = h.category("Mystery").await;
    let mut list = CategoryList::load(h.dyn_store(), h.writer).await.unwrap();

    let status = list.toggle(id).await.unwrap();
    assert_eq!(status, CatalogStatus::Inactive);
    assert_eq!(list.rows()[0].status, CatalogStatus::Inactive);

    let stored = h.store.get_category(h.writer, id).await.unwrap();
    assert_eq!(stored.status, CatalogStatus::Inactive);
}

#[tokio::test]
async fn test_category_toggle_rolls_back_on_error() {
    let h = TestHarness::new();
    let id = h.category("Mystery").await;
    let mut list = CategoryList::load(h.dyn_store(), h.writer).await.unwrap();
    h.store
        .fail_next("set_category_status", "permission denied for table categories");

    let err = list.toggle(id).await.unwrap_err();
    assert_eq!(err.to_string(), "permission denied for table categories");
    assert_eq!(list.rows()[0].status, CatalogStatus::Active);
}

#[tokio::test]
async fn test_category_toggle_of_unloaded_row_sends_nothing() {
    let h = TestHarness::new();
    h.category("Mystery").await;
    let mut list = CategoryList::load(h.dyn_store(), h.writer).await.unwrap();
    let later = h.category("Poetry").await;

    assert!(list.toggle(later).await.is_err());
    assert_eq!(h.store.call_count("set_category_status"), 0);
    assert_eq!(list.rows()[0].status, CatalogStatus::Active);

    let stored = h.store.get_category(h.writer, later).await.unwrap();
    assert_eq!(stored.status, CatalogStatus::Active);
}

#[tokio::test]
async fn test_category_form_requires_name() {
    let h = TestHarness::new();
    let mut form = CategoryForm::new(h.dyn_store(), h.writer);
    form.draft.name = "  ".into();

    let err = form.submit().await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.to_string(), "Name is required.");
    assert_eq!(h.store.call_count("create_category"), 0);
}

#[tokio::test]
async fn test_category_form_creates_then_updates() {
    let h = TestHarness::new();
    let mut form = CategoryForm::new(h.dyn_store(), h.writer);
    assert!(form.is_new());
    assert_eq!(form.draft.status, CatalogStatus::Active);
    form.draft.name = " Mystery ".into();

    let id = form.submit().await.unwrap();
    assert!(!form.is_new());

    form.draft.status = CatalogStatus::Inactive;
    assert_eq!(form.submit().await.unwrap(), id);

    let stored = h.store.get_category(h.writer, id).await.unwrap();
    assert_eq!(stored.name, "Mystery");
    assert_eq!(stored.status, CatalogStatus::Inactive);
    assert_eq!(h.store.call_count("create_category"), 1);
    assert_eq!(h.store.call_count("update_category"), 1);
}

#[tokio::test]
async fn test_category_image_upload_sets_url() {
    let h = TestHarness::new();
    let mut form = CategoryForm::new(h.dyn_store(), h.writer);
    form.draft.name = "Mystery".into();

    form.attach_image(&ImageFile::new("cover.png", vec![1, 2, 3]))
        .await
        .unwrap();

    let url = form.draft.image_url.clone().unwrap();
    assert!(url.starts_with(&format!("memory://{CATEGORY_IMAGES}/")));
    assert!(url.ends_with("-cover.png"));
    let id = form.submit().await.unwrap();
    let stored = h.store.get_category(h.writer, id).await.unwrap();
    assert_eq!(stored.image_url.as_deref(), Some(url.as_str()));
}

#[tokio::test]
async fn test_category_image_upload_error_leaves_url() {
    let h = TestHarness::new();
    let mut form = CategoryForm::new(h.dyn_store(), h.writer);
    h.store.fail_next("upload_image", "Payload too large");

    let err = form
        .attach_image(&ImageFile::new("huge.png", vec![0; 8]))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Payload too large");
    assert!(form.draft.image_url.is_none());
}

#[tokio::test]
async fn test_category_view_delete_only_on_success() {
    let h = TestHarness::new();
    let category = h.category("Mystery").await;
    let noir = h.subcategory(category, "Noir").await;
    h.subcategory(category, "Cozy").await;
    let other = h.category("Poetry").await;
    h.subcategory(other, "Haiku").await;

    let mut view = CategoryView::load(h.dyn_store(), h.writer, category)
        .await
        .unwrap();
    assert_eq!(view.category.name, "Mystery");
    assert_eq!(view.visible_subcategories().len(), 2);

    h.store.fail_next("delete_subcategory", "violates foreign key constraint");
    assert!(view.delete_subcategory(noir).await.is_err());
    assert_eq!(view.visible_subcategories().len(), 2);

    view.delete_subcategory(noir).await.unwrap();
    let names: Vec<_> = view
        .visible_subcategories()
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(names, ["Cozy"]);
}

#[tokio::test]
async fn test_category_view_toggle_and_filter() {
    let h = TestHarness::new();
    let category = h.category("Mystery").await;
    let noir = h.subcategory(category, "Noir").await;
    h.subcategory(category, "Cozy").await;

    let mut view = CategoryView::load(h.dyn_store(), h.writer, category)
        .await
        .unwrap();
    view.set_query("no");
    assert_eq!(view.visible_subcategories().len(), 1);

    h.store.fail_next("set_subcategory_status", "denied");
    assert!(view.toggle_subcategory(noir).await.is_err());
    assert_eq!(view.visible_subcategories()[0].status, CatalogStatus::Active);

    assert_eq!(
        view.toggle_subcategory(noir).await.unwrap(),
        CatalogStatus::Inactive
    );

    let mut form = view.form();
    assert!(!form.is_new());
    form.draft.description = Some("Whodunits".into());
    assert_eq!(form.submit().await.unwrap(), category);
}

#[tokio::test]
async fn test_category_view_missing_category() {
    let h = TestHarness::new();
    let missing = writersphere_core::CategoryId::new();
    let err = CategoryView::load(h.dyn_store(), h.writer, missing)
        .await
        .err()
        .unwrap();
    assert_eq!(err.to_string(), "Category not found");
}

// ----------------------------------------------------------------------------
// Subcategories
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_subcategory_list_merges_category_names() {
    let h = TestHarness::new();
    let mystery = h.category("Mystery").await;
    let poetry = h.category("Poetry").await;
    h.subcategory(mystery, "Noir").await;
    h.subcategory(poetry, "Haiku").await;

    let mut list = SubcategoryList::load(h.dyn_store(), h.writer).await.unwrap();
    assert_eq!(list.rows().len(), 2);
    assert_eq!(list.rows()[0].subcategory.name, "Haiku");
    assert_eq!(list.rows()[0].category_name.as_deref(), Some("Poetry"));

    list.set_query("myst");
    let visible = list.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].subcategory.name, "Noir");
}

#[tokio::test]
async fn test_subcategory_list_delete_and_toggle() {
    let h = TestHarness::new();
    let mystery = h.category("Mystery").await;
    let noir = h.subcategory(mystery, "Noir").await;
    let cozy = h.subcategory(mystery, "Cozy").await;

    let mut list = SubcategoryList::load(h.dyn_store(), h.writer).await.unwrap();

    h.store.fail_next("set_subcategory_status", "denied");
    assert!(list.toggle(cozy).await.is_err());
    assert_eq!(list.rows()[0].subcategory.status, CatalogStatus::Active);
    assert_eq!(list.toggle(cozy).await.unwrap(), CatalogStatus::Inactive);

    h.store.fail_next("delete_subcategory", "denied");
    assert!(list.delete(noir).await.is_err());
    assert_eq!(list.rows().len(), 2);
    list.delete(noir).await.unwrap();
    assert_eq!(list.rows().len(), 1);
}

#[tokio::test]
async fn test_subcategory_form_requires_category() {
    let h = TestHarness::new();
    h.category("Poetry").await;
    h.category("Mystery").await;

    let mut form = SubcategoryForm::new(h.dyn_store(), h.writer, None)
        .await
        .unwrap();
    let options: Vec<_> = form
        .category_options()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(options, ["Mystery", "Poetry"]);

    form.fields.name = "Noir".into();
    let err = form.submit().await.unwrap_err();
    assert_eq!(err.to_string(), "Category is required.");
}

#[tokio::test]
async fn test_subcategory_form_create_and_edit() {
    let h = TestHarness::new();
    let mystery = h.category("Mystery").await;
    let poetry = h.category("Poetry").await;

    let mut form = SubcategoryForm::new(h.dyn_store(), h.writer, Some(mystery))
        .await
        .unwrap();
    form.fields.name = "Noir".into();
    form.attach_image(&ImageFile::new("rain.jpg", vec![9]))
        .await
        .unwrap();
    let id = form.submit().await.unwrap();

    let url = form.fields.image_url.clone().unwrap();
    assert!(url.starts_with(&format!("memory://{SUBCATEGORY_IMAGES}/")));

    let mut edit = SubcategoryForm::edit(h.dyn_store(), h.writer, id)
        .await
        .unwrap();
    assert_eq!(edit.category_id, Some(mystery));
    assert_eq!(edit.fields.name, "Noir");
    edit.category_id = Some(poetry);
    assert_eq!(edit.submit().await.unwrap(), id);

    let stored = h.store.get_subcategory(h.writer, id).await.unwrap();
    assert_eq!(stored.category_id, poetry);
}
