//! Connection state shared by the backend commands.

use std::sync::Arc;

use writersphere_client::BackendClient;
use writersphere_core::{ArticleId, UserId};
use writersphere_studio::account;
use writersphere_studio::{ArticleEditor, RemoteStore, WriterStore};

use crate::config::WritersphereConfig;

/// A configured client, the store over it, and the settings.
pub struct App {
    /// Loaded configuration.
    pub config: WritersphereConfig,
    /// Backend client with the persisted session.
    pub client: BackendClient,
    /// Store the workflows run against.
    pub store: Arc<dyn WriterStore>,
}

impl App {
    /// Build the client from `config`, restoring any stored session.
    pub fn connect(config: WritersphereConfig) -> anyhow::Result<Self> {
        let client =
            BackendClient::with_session_store(config.client_config()?, config.session_store()?)?;
        tracing::debug!(url = %client.config().url, "backend client ready");
        let store: Arc<dyn WriterStore> = Arc::new(RemoteStore::new(client.clone()));
        Ok(Self {
            config,
            client,
            store,
        })
    }

    /// The signed-in writer, or the gate's error.
    pub async fn writer(&self) -> anyhow::Result<UserId> {
        Ok(account::current_writer(&self.client).await?)
    }

    /// Open the editor with the configured publish requirements.
    pub async fn editor(&self, writer: UserId, id: ArticleId) -> anyhow::Result<Arc<ArticleEditor>> {
        Ok(ArticleEditor::open_with(
            Arc::clone(&self.store),
            writer,
            id,
            self.config.publish_requirements(),
        )
        .await?)
    }
}
