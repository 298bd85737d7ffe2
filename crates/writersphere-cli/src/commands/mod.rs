//! Command dispatch.

mod articles;
mod auth;
mod catalog;
mod watch;

use writersphere_core::{ArticleId, ConfigManager};
use writersphere_studio::{dashboard, reader};

use crate::app::App;
use crate::cli::{Cli, Command};
use crate::config::WritersphereConfig;
use crate::config_handlers::handle_config_command;
use crate::render;

/// Run one parsed command line.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();
    let connect = || -> anyhow::Result<App> { App::connect(WritersphereConfig::load(config_path)?) };

    match cli.command {
        Command::Config { action } => Ok(handle_config_command(config_path, action)?),
        Command::Auth { action } => auth::run(&connect()?, action).await,
        Command::Dashboard => show_dashboard(&connect()?).await,
        Command::Category { action } => catalog::category(&connect()?, action).await,
        Command::Subcategory { action } => catalog::subcategory(&connect()?, action).await,
        Command::Article { action } => articles::run(&connect()?, action).await,
        Command::Read { id, html, preview } => read(&connect()?, id, html, preview).await,
    }
}

async fn show_dashboard(app: &App) -> anyhow::Result<()> {
    let writer = app.writer().await?;
    let counts = dashboard::load_counts(app.store.as_ref(), writer).await;
    println!("{}", render::counts(&counts));
    Ok(())
}

async fn read(app: &App, id: ArticleId, html: bool, preview: bool) -> anyhow::Result<()> {
    let article = reader::read_article(app.store.as_ref(), id).await?;
    let body = if preview {
        article.preview(reader::PREVIEW_CHARS).unwrap_or_default()
    } else if html {
        article.html()
    } else {
        article.plain()
    };
    println!("{}\n{}\n\n{}", article.title, article.dateline(), body.trim_end());
    Ok(())
}
