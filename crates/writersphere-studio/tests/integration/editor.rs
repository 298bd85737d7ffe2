//! The article editor: edits, saves, status changes, and autosave.

use std::sync::Arc;
use std::time::Duration;

use writersphere_core::{ArticleStatus, PublishRequirements};
use writersphere_core::rules::{SAVE_BLOCKED, STATUS_CHANGE_BLOCKED};
use writersphere_studio::editor::{AUTOSAVE_INTERVAL, Autosave};
use writersphere_studio::{ArticleEditor, SaveReason, WriterStore};

use crate::common::{FIVE_TAGS, TestHarness};

#[tokio::test]
async fn test_open_loads_article_tags_and_options() {
    let h = TestHarness::new();
    let mystery = h.category("Mystery").await;
    h.subcategory(mystery, "Noir").await;
    h.category("Poetry").await;
    let id = h
        .article("Title", "Body", mystery, &["Rain", "rain", "night"], ArticleStatus::Draft)
        .await;

    let editor = h.editor(id).await;
    let draft = editor.draft();
    assert_eq!(draft.title, "Title");
    assert_eq!(draft.body_md, "Body");
    assert_eq!(draft.category_id, Some(mystery));
    assert_eq!(draft.tags, ["Rain", "night"]);
    assert_eq!(editor.categories().len(), 2);
    assert_eq!(editor.subcategories().len(), 1);
    assert!(!editor.is_dirty());
    assert!(editor.status_line().starts_with("Up to date · Last saved: "));
}

#[tokio::test]
async fn test_open_is_scoped_to_writer() {
    let h = TestHarness::new();
    let id = h.draft().await;
    let stranger = writersphere_core::UserId::new();
    let result = writersphere_studio::ArticleEditor::open(h.dyn_store(), stranger, id).await;
    assert_eq!(result.unwrap_err().to_string(), "Article not found");
}

#[tokio::test]
async fn test_edits_mark_dirty_and_clear_message() {
    let h = TestHarness::new();
    let editor = h.editor(h.draft().await).await;

    editor.set_title("Draft one");
    assert!(editor.is_dirty());
    assert!(editor.status_line().starts_with("Unsaved changes"));

    assert!(editor.save(SaveReason::Manual).await.unwrap());
    assert!(!editor.is_dirty());
    assert_eq!(editor.message().as_deref(), Some("Saved"));

    assert!(!editor.add_tag("   "));
    assert!(editor.add_tag("  slow   burn "));
    assert!(editor.message().is_none());
    assert_eq!(editor.draft().tags, ["slow burn"]);
}

#[tokio::test]
async fn test_save_writes_untitled_and_syncs_tags() {
    let h = TestHarness::new();
    let id = h.draft().await;
    let editor = h.editor(id).await;

    editor.set_title("   ");
    editor.add_tag("noir");
    editor.add_tag("Rain");
    editor.save(SaveReason::Manual).await.unwrap();

    let record = h.store.get_article(h.writer, id).await.unwrap();
    assert_eq!(record.title.as_deref(), Some("Untitled"));
    let mut tags = h.store.article_tag_names(id).await.unwrap();
    tags.sort();
    assert_eq!(tags, ["Rain", "noir"]);

    editor.remove_tag("RAIN");
    editor.save(SaveReason::Manual).await.unwrap();
    assert_eq!(h.store.article_tag_names(id).await.unwrap(), ["noir"]);

    let calls = h.store.calls();
    let tail: Vec<_> = calls.iter().rev().take(4).rev().copied().collect();
    assert_eq!(
        tail,
        ["update_article", "upsert_tags", "clear_article_tags", "attach_tags"]
    );
}

#[tokio::test]
async fn test_save_without_tags_only_clears_joins() {
    let h = TestHarness::new();
    let id = h.draft().await;
    let editor = h.editor(id).await;
    editor.set_body("text");
    editor.save(SaveReason::Manual).await.unwrap();

    assert_eq!(h.store.call_count("upsert_tags"), 0);
    assert_eq!(h.store.call_count("clear_article_tags"), 1);
    assert_eq!(h.store.call_count("attach_tags"), 0);
}

#[tokio::test]
async fn test_failed_save_stays_dirty() {
    let h = TestHarness::new();
    let editor = h.editor(h.draft().await).await;
    editor.set_body("important");
    h.store
        .fail_next("update_article", "new row violates row-level security policy");

    let err = editor.save(SaveReason::Auto).await.unwrap_err();
    assert_eq!(err.to_string(), "new row violates row-level security policy");
    assert!(editor.is_dirty());
    assert!(!editor.is_saving());
    assert_eq!(
        editor.error().as_deref(),
        Some("new row violates row-level security policy")
    );

    editor.save(SaveReason::Auto).await.unwrap();
    assert!(editor.error().is_none());
    assert_eq!(editor.message().as_deref(), Some("Autosaved"));
}

#[tokio::test]
async fn test_failed_tag_sync_fails_the_save() {
    let h = TestHarness::new();
    let editor = h.editor(h.draft().await).await;
    editor.add_tag("noir");
    h.store.fail_next("upsert_tags", "duplicate key");

    assert!(editor.save(SaveReason::Manual).await.is_err());
    assert!(editor.is_dirty());
}

#[tokio::test]
async fn test_status_change_requires_metadata() {
    let h = TestHarness::new();
    let category = h.category("Mystery").await;
    let id = h.draft().await;
    let editor = h.editor(id).await;

    let err = editor
        .change_status(ArticleStatus::Published)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), STATUS_CHANGE_BLOCKED);
    assert_eq!(editor.error().as_deref(), Some(STATUS_CHANGE_BLOCKED));
    assert_eq!(editor.draft().status, ArticleStatus::Draft);
    assert_eq!(h.store.call_count("update_article"), 0);

    editor.set_category(Some(category)).await.unwrap();
    for tag in FIVE_TAGS {
        editor.add_tag(tag);
    }
    assert!(editor.has_required_metadata());
    assert_eq!(editor.tag_progress(), "5/5");

    assert!(editor.change_status(ArticleStatus::Published).await.unwrap());
    assert_eq!(editor.message().as_deref(), Some("Status saved"));
    assert!(editor.error().is_none());

    let record = h.store.get_article(h.writer, id).await.unwrap();
    assert_eq!(record.status, ArticleStatus::Published);
    assert!(record.timestamps.published_at.is_some());
}

#[tokio::test]
async fn test_configured_minimum_drives_guard_and_message() {
    let h = TestHarness::new();
    let category = h.category("Mystery").await;
    let id = h.draft().await;
    let editor = ArticleEditor::open_with(
        h.dyn_store(),
        h.writer,
        id,
        PublishRequirements { min_tags: 3 },
    )
    .await
    .unwrap();

    editor.set_category(Some(category)).await.unwrap();
    editor.add_tag("noir");
    editor.add_tag("rain");
    let err = editor
        .change_status(ArticleStatus::Published)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Pick a category and add at least 3 tags before publishing/unpublishing/archiving."
    );
    assert_eq!(editor.tag_progress(), "2/3");

    editor.add_tag("city");
    assert!(editor.change_status(ArticleStatus::Published).await.unwrap());
}

#[tokio::test]
async fn test_save_blocked_when_metadata_removed() {
    let h = TestHarness::new();
    let category = h.category("Mystery").await;
    let id = h
        .article("Live", "", category, &FIVE_TAGS, ArticleStatus::Archived)
        .await;
    let editor = h.editor(id).await;

    editor.remove_tag("noir");
    let err = editor.save(SaveReason::Manual).await.unwrap_err();
    assert_eq!(err.to_string(), SAVE_BLOCKED);
    assert!(editor.is_dirty());
}

#[tokio::test]
async fn test_deleting_needs_no_metadata() {
    let h = TestHarness::new();
    let id = h.draft().await;
    let editor = h.editor(id).await;
    editor.change_status(ArticleStatus::Deleted).await.unwrap();

    let record = h.store.get_article(h.writer, id).await.unwrap();
    assert_eq!(record.status, ArticleStatus::Deleted);
    assert!(record.timestamps.deleted_at.is_some());
}

#[tokio::test]
async fn test_clearing_category_clears_subcategory() {
    let h = TestHarness::new();
    let mystery = h.category("Mystery").await;
    let noir = h.subcategory(mystery, "Noir").await;
    let poetry = h.category("Poetry").await;
    let editor = h.editor(h.draft().await).await;

    editor.set_category(Some(mystery)).await.unwrap();
    editor.set_subcategory(Some(noir));
    editor.set_category(Some(mystery)).await.unwrap();
    assert_eq!(editor.draft().subcategory_id, Some(noir));

    editor.set_category(Some(poetry)).await.unwrap();
    assert!(editor.draft().subcategory_id.is_none());

    editor.set_subcategory(Some(noir));
    editor.set_category(None).await.unwrap();
    assert!(editor.draft().subcategory_id.is_none());
    assert!(editor.subcategories().is_empty());
}

// ----------------------------------------------------------------------------
// Concurrency
// ----------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_save_in_flight_blocks_second_save() {
    let h = TestHarness::with_latency(Duration::from_millis(100));
    let editor = h.editor(h.draft().await).await;
    editor.set_body("text");

    let first = tokio::spawn({
        let editor = Arc::clone(&editor);
        async move { editor.save(SaveReason::Manual).await }
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(editor.is_saving());

    assert!(!editor.save(SaveReason::Manual).await.unwrap());
    assert!(first.await.unwrap().unwrap());
    assert!(!editor.is_saving());
    assert_eq!(h.store.call_count("update_article"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_edit_during_save_stays_dirty() {
    let h = TestHarness::with_latency(Duration::from_millis(100));
    let id = h.draft().await;
    let editor = h.editor(id).await;
    editor.set_body("first");

    let save = tokio::spawn({
        let editor = Arc::clone(&editor);
        async move { editor.save(SaveReason::Manual).await }
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    editor.set_body("second");
    save.await.unwrap().unwrap();

    assert!(editor.is_dirty());
    assert_eq!(editor.draft().body_md, "second");
    let record = h.store.get_article(h.writer, id).await.unwrap();
    assert_eq!(record.body_md.as_deref(), Some("first"));
}

#[tokio::test(start_paused = true)]
async fn test_autosave_saves_dirty_drafts_on_tick() {
    let h = TestHarness::new();
    let id = h.draft().await;
    let editor = h.editor(id).await;
    let autosave = Autosave::start(Arc::clone(&editor));

    tokio::time::sleep(AUTOSAVE_INTERVAL + Duration::from_millis(1)).await;
    assert_eq!(h.store.call_count("update_article"), 0);

    editor.set_body("typed");
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert_eq!(h.store.call_count("update_article"), 0);

    tokio::time::sleep(AUTOSAVE_INTERVAL).await;
    assert_eq!(h.store.call_count("update_article"), 1);
    assert!(!editor.is_dirty());
    assert_eq!(editor.message().as_deref(), Some("Autosaved"));

    tokio::time::sleep(AUTOSAVE_INTERVAL).await;
    assert_eq!(h.store.call_count("update_article"), 1);

    autosave.stop().await;
    editor.set_body("after stop");
    tokio::time::sleep(AUTOSAVE_INTERVAL * 2).await;
    assert_eq!(h.store.call_count("update_article"), 1);
    assert!(editor.is_dirty());
}

#[tokio::test(start_paused = true)]
async fn test_autosave_retries_after_failure() {
    let h = TestHarness::new();
    let editor = h.editor(h.draft().await).await;
    let autosave = Autosave::with_interval(Arc::clone(&editor), Duration::from_secs(1));

    editor.set_body("typed");
    h.store.fail_next("update_article", "timeout");
    tokio::time::sleep(Duration::from_millis(1001)).await;
    assert!(editor.is_dirty());
    assert_eq!(editor.error().as_deref(), Some("timeout"));

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!editor.is_dirty());
    assert_eq!(h.store.call_count("update_article"), 2);
    autosave.stop().await;
}
