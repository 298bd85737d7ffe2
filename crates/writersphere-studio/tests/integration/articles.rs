//! Drafts, the article list, and the debounced browser.

use std::time::Duration;

use writersphere_core::{ArticleStatus, UserId};
use writersphere_studio::articles::{self, ArticleBrowser, ArticleFilters, Debouncer};
use writersphere_studio::{DEFAULT_LIST_LIMIT, WriterStore, reader};

use crate::common::{FIVE_TAGS, TestHarness};

async fn titles(h: &TestHarness, filters: &ArticleFilters) -> Vec<String> {
    articles::list_articles(h.store.as_ref(), h.writer, filters, DEFAULT_LIST_LIMIT)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.title)
        .collect()
}

#[tokio::test]
async fn test_new_draft_defaults() {
    let h = TestHarness::new();
    let id = h.draft().await;

    let record = h.store.get_article(h.writer, id).await.unwrap();
    assert_eq!(record.title.as_deref(), Some("Untitled"));
    assert_eq!(record.body_md.as_deref(), Some(""));
    assert_eq!(record.status, ArticleStatus::Draft);
    assert!(record.timestamps.last_saved_at.is_some());

    let rows = articles::list_articles(h.store.as_ref(), h.writer, &ArticleFilters::default(), 50)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, id);
    assert_eq!(rows[0].title, "Untitled");
}

#[tokio::test]
async fn test_list_newest_first_without_deleted() {
    let h = TestHarness::new();
    let category = h.category("Mystery").await;
    h.article("First", "", category, &[], ArticleStatus::Draft).await;
    h.article("Gone", "", category, &[], ArticleStatus::Deleted).await;
    h.article("Second", "", category, &[], ArticleStatus::Draft).await;

    assert_eq!(titles(&h, &ArticleFilters::default()).await, ["Second", "First"]);
}

#[tokio::test]
async fn test_list_is_scoped_to_writer() {
    let h = TestHarness::new();
    h.draft().await;
    let rows = articles::list_articles(
        h.store.as_ref(),
        UserId::new(),
        &ArticleFilters::default(),
        DEFAULT_LIST_LIMIT,
    )
    .await
    .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_search_matches_title_or_body() {
    let h = TestHarness::new();
    let category = h.category("Mystery").await;
    h.article("The Big Sleep", "LA in the rain", category, &[], ArticleStatus::Draft)
        .await;
    h.article("Dune", "Spice must flow", category, &[], ArticleStatus::Draft)
        .await;

    let filters = {
        let mut filters = ArticleFilters::default();
        filters.search = "  RAIN ".into();
        filters
    };
    assert_eq!(titles(&h, &filters).await, ["The Big Sleep"]);

    let filters = {
        let mut filters = ArticleFilters::default();
        filters.search = "dun".into();
        filters
    };
    assert_eq!(titles(&h, &filters).await, ["Dune"]);
}

#[tokio::test]
async fn test_status_and_category_filters_with_joined_names() {
    let h = TestHarness::new();
    let mystery = h.category("Mystery").await;
    let noir = h.subcategory(mystery, "Noir").await;
    let poetry = h.category("Poetry").await;

    let published = h
        .article("Published", "", mystery, &FIVE_TAGS, ArticleStatus::Published)
        .await;
    h.article("Poem", "", poetry, &[], ArticleStatus::Draft).await;

    let editor = h.editor(published).await;
    editor.set_subcategory(Some(noir));
    editor
        .save(writersphere_studio::SaveReason::Manual)
        .await
        .unwrap();

    let filters = {
        let mut filters = ArticleFilters::default();
        filters.status = Some(ArticleStatus::Published);
        filters
    };
    let rows = articles::list_articles(h.store.as_ref(), h.writer, &filters, 50)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category_name.as_deref(), Some("Mystery"));
    assert_eq!(rows[0].subcategory_name.as_deref(), Some("Noir"));

    let filters = {
        let mut filters = ArticleFilters::default();
        filters.category = Some(poetry);
        filters
    };
    assert_eq!(titles(&h, &filters).await, ["Poem"]);

    let filters = {
        let mut filters = ArticleFilters::default();
        filters.subcategory = Some(noir);
        filters
    };
    assert_eq!(titles(&h, &filters).await, ["Published"]);
}

#[tokio::test]
async fn test_tag_filters_match_any_tag() {
    let h = TestHarness::new();
    let category = h.category("Mystery").await;
    h.article("Noir", "", category, &["noir", "rain"], ArticleStatus::Draft)
        .await;
    h.article("Verse", "", category, &["poetry"], ArticleStatus::Draft)
        .await;
    h.article("Plain", "", category, &[], ArticleStatus::Draft)
        .await;

    let mut filters = ArticleFilters::default();
    filters.add_tag("rain");
    assert_eq!(titles(&h, &filters).await, ["Noir"]);

    filters.add_tag("poetry");
    assert_eq!(titles(&h, &filters).await, ["Verse", "Noir"]);
}

#[tokio::test]
async fn test_unknown_tag_skips_main_query() {
    let h = TestHarness::new();
    h.draft().await;
    let mut filters = ArticleFilters::default();
    filters.add_tag("nothing-like-this");

    assert!(titles(&h, &filters).await.is_empty());
    assert_eq!(h.store.call_count("find_tags"), 1);
    assert_eq!(h.store.call_count("article_ids_with_tags"), 0);
    assert_eq!(h.store.call_count("list_articles"), 0);
}

#[tokio::test]
async fn test_unused_tag_skips_main_query() {
    let h = TestHarness::new();
    h.draft().await;
    h.store
        .upsert_tags(h.writer, &["orphan".to_string()])
        .await
        .unwrap();

    let mut filters = ArticleFilters::default();
    filters.add_tag("orphan");
    assert!(titles(&h, &filters).await.is_empty());
    assert_eq!(h.store.call_count("article_ids_with_tags"), 1);
    assert_eq!(h.store.call_count("list_articles"), 0);
}

#[tokio::test]
async fn test_list_respects_limit() {
    let h = TestHarness::new();
    for _ in 0..3 {
        h.draft().await;
    }
    let rows = articles::list_articles(h.store.as_ref(), h.writer, &ArticleFilters::default(), 2)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn test_list_error_is_backend_message() {
    let h = TestHarness::new();
    h.store.fail_next("list_articles", "JWT expired");
    let err = articles::list_articles(h.store.as_ref(), h.writer, &ArticleFilters::default(), 50)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "JWT expired");
}

// ----------------------------------------------------------------------------
// Browser
// ----------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_browser_debounces_filter_changes() {
    let h = TestHarness::new();
    let category = h.category("Mystery").await;
    h.article("Dune", "", category, &[], ArticleStatus::Draft).await;
    h.article("Emma", "", category, &[], ArticleStatus::Draft).await;

    let mut browser = ArticleBrowser::open(h.dyn_store(), h.writer).await.unwrap();
    let results = browser.subscribe();
    assert!(browser.is_fetching());

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!browser.is_fetching());
    assert_eq!(results.borrow().fetches, 1);
    assert_eq!(results.borrow().rows.len(), 2);

    for partial in ["d", "du", "dun"] {
        browser.set_search(partial);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(results.borrow().fetches, 1);

    tokio::time::sleep(Duration::from_millis(200)).await;
    let state = results.borrow().clone();
    assert_eq!(state.fetches, 2);
    assert_eq!(state.rows.len(), 1);
    assert_eq!(state.rows[0].title, "Dune");
    assert_eq!(h.store.call_count("list_articles"), 2);
}

#[tokio::test(start_paused = true)]
async fn test_browser_reports_errors() {
    let h = TestHarness::new();
    let mut browser = ArticleBrowser::open_with(
        h.dyn_store(),
        h.writer,
        Debouncer::new(Duration::from_millis(10)),
        DEFAULT_LIST_LIMIT,
    )
    .await
    .unwrap();
    let results = browser.subscribe();
    tokio::time::sleep(Duration::from_millis(20)).await;

    h.store.fail_next("list_articles", "network down");
    browser.set_status(Some(ArticleStatus::Archived));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(results.borrow().error.as_deref(), Some("network down"));

    browser.clear_filters();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(results.borrow().error.is_none());
    assert_eq!(browser.filters().summary(), "No filters");
}

#[tokio::test(start_paused = true)]
async fn test_browser_keeps_subcategory_consistent() {
    let h = TestHarness::new();
    let mystery = h.category("Mystery").await;
    let noir = h.subcategory(mystery, "Noir").await;
    h.subcategory(mystery, "Cozy").await;
    let poetry = h.category("Poetry").await;

    let mut browser = ArticleBrowser::open(h.dyn_store(), h.writer).await.unwrap();
    assert_eq!(browser.categories().len(), 2);

    browser.set_category(Some(mystery)).await.unwrap();
    let names: Vec<_> = browser
        .subcategories()
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(names, ["Cozy", "Noir"]);

    browser.set_subcategory(Some(noir));
    browser.set_category(Some(mystery)).await.unwrap();
    assert_eq!(browser.filters().subcategory, Some(noir));

    browser.set_category(Some(poetry)).await.unwrap();
    assert!(browser.filters().subcategory.is_none());
    assert!(browser.subcategories().is_empty());

    browser.set_subcategory(Some(noir));
    browser.set_category(None).await.unwrap();
    assert!(browser.filters().category.is_none());
    assert!(browser.filters().subcategory.is_none());
}

// ----------------------------------------------------------------------------
// Reader
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_reader_shows_only_published() {
    let h = TestHarness::new();
    let category = h.category("Mystery").await;
    let draft = h.article("Draft", "", category, &[], ArticleStatus::Draft).await;
    let published = h
        .article("Live", "# Hello", category, &FIVE_TAGS, ArticleStatus::Published)
        .await;

    let err = reader::read_article(h.store.as_ref(), draft).await.unwrap_err();
    assert_eq!(err.to_string(), reader::NOT_PUBLISHED);

    let article = reader::read_article(h.store.as_ref(), published).await.unwrap();
    assert_eq!(article.title, "Live");
    assert!(article.published_at.is_some());
    assert!(article.html().contains("<h1>Hello</h1>"));
}
