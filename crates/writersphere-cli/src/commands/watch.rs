//! `article watch`: edit the body in a file while autosave runs.
//!
//! The file is polled rather than watched through the OS, which keeps the
//! loop on the tokio timer alongside the autosave task.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use writersphere_studio::account;
use writersphere_studio::{ArticleEditor, Autosave, SaveReason};

use crate::app::App;

/// How often the file is re-read.
const FILE_POLL: Duration = Duration::from_millis(500);

/// Status text printed whenever it changes.
#[derive(Debug, Default)]
struct StatusEcho {
    last: String,
}

impl StatusEcho {
    /// The line to print, if it differs from the last one.
    fn next(&mut self, editor: &ArticleEditor) -> Option<String> {
        let line = match editor.error() {
            Some(error) => format!("{} · Error: {error}", editor.status_line()),
            None => editor.status_line(),
        };
        if line == self.last {
            return None;
        }
        self.last = line.clone();
        Some(line)
    }
}

pub(super) async fn run(app: &App, editor: Arc<ArticleEditor>, file: &Path) -> anyhow::Result<()> {
    if !file.exists() {
        tokio::fs::write(file, editor.draft().body_md).await?;
        tracing::info!(path = %file.display(), "wrote stored body");
    }
    let mut seen = tokio::fs::read_to_string(file).await?;
    if seen != editor.draft().body_md {
        editor.set_body(seen.clone());
    }

    println!(
        "Watching {} for article {}. Ctrl-C saves and stops.",
        file.display(),
        editor.id()
    );
    let autosave = Autosave::with_interval(Arc::clone(&editor), app.config.autosave_interval());
    let mut echo = StatusEcho::default();
    let mut poll = tokio::time::interval(FILE_POLL);
    poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let gate = account::writer_gate_closed(app.client.subscribe());
    tokio::pin!(gate);

    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                result?;
                break;
            }
            () = &mut gate => {
                eprintln!("Signed out; stopping.");
                break;
            }
            _ = poll.tick() => {
                match tokio::fs::read_to_string(file).await {
                    Ok(text) if text != seen => {
                        editor.set_body(text.clone());
                        seen = text;
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!(path = %file.display(), error = %e, "could not read file"),
                }
                if let Some(line) = echo.next(&editor) {
                    println!("{line}");
                }
            }
        }
    }

    autosave.stop().await;
    if editor.is_dirty() {
        editor.save(SaveReason::Manual).await?;
    }
    println!("{}", editor.status_line());
    Ok(())
}
