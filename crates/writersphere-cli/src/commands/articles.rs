//! `article` commands.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

use writersphere_core::{ArticleId, TagInput, UserId};
use writersphere_studio::articles::{self, ArticleBrowser, ArticleFilters, Debouncer};
use writersphere_studio::{ArticleEditor, SaveReason};

use super::watch;
use crate::app::App;
use crate::cli::{ArticleAction, ListFilters};
use crate::render;

/// Poll period while waiting for the last search fetch.
const SETTLE_POLL: Duration = Duration::from_millis(20);

/// List filters from command-line flags.
pub fn article_filters(flags: &ListFilters) -> ArticleFilters {
    let mut filters = ArticleFilters::default();
    filters.search = flags.search.clone().unwrap_or_default();
    filters.status = flags.status;
    filters.category = flags.category;
    filters.subcategory = flags.subcategory;
    for tag in &flags.tags {
        filters.add_tag(tag);
    }
    filters
}

pub(super) async fn run(app: &App, action: ArticleAction) -> anyhow::Result<()> {
    let writer = app.writer().await?;

    match action {
        ArticleAction::New => {
            let id = articles::new_draft(app.store.as_ref(), writer).await?;
            println!("{id}");
        }
        ArticleAction::List { filters } => {
            let filters = article_filters(&filters);
            let rows = articles::list_articles(
                app.store.as_ref(),
                writer,
                &filters,
                app.config.editor.list_limit,
            )
            .await?;
            println!("{}\n\n{}", filters.summary(), render::articles(&rows));
        }
        ArticleAction::Search { filters } => search(app, writer, &filters).await?,
        ArticleAction::Show { id } => {
            let editor = app.editor(writer, id).await?;
            print_editor(&editor);
        }
        ArticleAction::Edit {
            id,
            title,
            body_file,
            category,
            no_category,
            subcategory,
            add_tags,
            remove_tags,
        } => {
            let editor = app.editor(writer, id).await?;
            if let Some(title) = title {
                editor.set_title(title);
            }
            if let Some(path) = body_file {
                editor.set_body(tokio::fs::read_to_string(&path).await?);
            }
            if no_category {
                editor.set_category(None).await?;
            } else if category.is_some() {
                editor.set_category(category).await?;
            }
            if subcategory.is_some() {
                editor.set_subcategory(subcategory);
            }
            let (added, notes) = enter_tags(editor.draft().tags, &add_tags);
            for tag in &added {
                editor.add_tag(tag);
            }
            for note in notes {
                eprintln!("{note}");
            }
            for tag in &remove_tags {
                editor.remove_tag(tag);
            }
            editor.save(SaveReason::Manual).await?;
            println!("{}", editor.status_line());
        }
        ArticleAction::Status { id, status } => {
            let editor = app.editor(writer, id).await?;
            editor.change_status(status).await?;
            println!("{}", editor.status_line());
        }
        ArticleAction::Watch { id, file } => {
            let editor = app.editor(writer, id).await?;
            watch::run(app, editor, &file).await?;
        }
    }
    Ok(())
}

/// Feed `--add-tag` values through the tag field the way a writer would.
///
/// A value holding commas or newlines is a pasted list and produces a paste
/// report; anything else is typed and committed as one tag. Returns the tags
/// added and the lines to show.
pub fn enter_tags(existing: Vec<String>, values: &[String]) -> (Vec<String>, Vec<String>) {
    let mut input = TagInput::new(existing);
    let mut added = Vec::new();
    let mut notes = Vec::new();

    for value in values {
        if let Some(report) = input.paste(value) {
            added.extend(report.added.iter().cloned());
            notes.push(report.to_string());
            continue;
        }
        input.type_text(value);
        let batch = input.commit();
        match batch.rejected.first() {
            Some(rejected) => notes.push(format!(
                "Skipped tag '{}': {}",
                rejected.raw.trim(),
                rejected.reason
            )),
            None if batch.added.is_empty() => notes.push(format!("Skipped tag '{value}': empty")),
            None => added.extend(batch.added),
        }
    }
    (added, notes)
}

fn print_editor(editor: &ArticleEditor) {
    println!(
        "{}\n\n{}",
        editor.status_line(),
        render::draft(
            &editor.draft(),
            &editor.categories(),
            &editor.subcategories(),
            &editor.tag_progress()
        )
    );
}

/// Each stdin line replaces the search text; results print as the debounced
/// fetches land. Ends at end of input once the last fetch is done.
async fn search(app: &App, writer: UserId, flags: &ListFilters) -> anyhow::Result<()> {
    let mut browser = ArticleBrowser::open_with(
        Arc::clone(&app.store),
        writer,
        Debouncer::new(app.config.search_debounce()),
        app.config.editor.list_limit,
    )
    .await?;

    let initial = article_filters(flags);
    browser.set_search(initial.search.clone());
    browser.set_status(initial.status);
    if initial.category.is_some() {
        browser.set_category(initial.category).await?;
    }
    if initial.subcategory.is_some() {
        browser.set_subcategory(initial.subcategory);
    }
    for tag in initial.tags() {
        browser.add_tag(tag);
    }

    let mut results = browser.subscribe();
    let printer = tokio::spawn(async move {
        while results.changed().await.is_ok() {
            let state = results.borrow_and_update().clone();
            match state.error {
                Some(error) => eprintln!("{error}"),
                None => println!("{}\n", render::articles(&state.rows)),
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        browser.set_search(line);
    }

    while browser.is_fetching() {
        tokio::time::sleep(SETTLE_POLL).await;
    }
    drop(browser);
    printer.await?;
    Ok(())
}
