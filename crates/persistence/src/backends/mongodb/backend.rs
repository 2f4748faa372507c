//! MongoDB backend implementation.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use bson::doc;
use futures::TryStreamExt;
use mongodb::error::ErrorKind;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::core::{Backend, BackendKind};
use crate::error::{BackendError, StorageError, StorageResult};
use crate::types::UniqueField;

use super::BACKEND_NAME;
use super::config::MongoBackendConfig;
use super::document::UserDocument;

/// MongoDB backend for contact records.
///
/// The driver client sits behind a lock so [`Backend::reconnect`] can swap in
/// a fresh one while requests keep running on clones of the old handle.
pub struct MongoBackend {
    client: RwLock<Client>,
    options: ClientOptions,
    config: MongoBackendConfig,
}

impl Debug for MongoBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoBackend")
            .field("uri", &self.config.redacted_connection_string())
            .field("database", &self.config.database)
            .field("collection", &self.config.collection)
            .finish_non_exhaustive()
    }
}

impl MongoBackend {
    /// Connects to MongoDB, retrying as configured, and verifies the link with a ping.
    ///
    /// # Errors
    ///
    /// * `StorageError::Backend(ConnectionFailed)` - If every attempt failed
    /// * `StorageError::Backend(Internal)` - If the connection string is malformed
    pub async fn connect(config: MongoBackendConfig) -> StorageResult<Self> {
        let mut options = ClientOptions::parse(&config.connection_string)
            .await
            .map_err(|e| BackendError::ConnectionFailed {
                backend_name: BACKEND_NAME.to_string(),
                message: format!("invalid connection string: {}", e),
            })?;

        let timeout = config.effective_connect_timeout();
        options.server_selection_timeout = Some(timeout);
        options.connect_timeout = Some(timeout);
        options.app_name = Some("addressbook".to_string());
        if let Some(size) = config.max_pool_size {
            options.max_pool_size = Some(size);
        }

        let attempts = config.effective_connect_retries();
        let delay = Duration::from_millis(config.retry_delay_ms);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            info!(
                uri = %config.redacted_connection_string(),
                attempt,
                attempts,
                "Connecting to MongoDB"
            );

            match Self::open(&options, &config.database).await {
                Ok(client) => {
                    info!(database = %config.database, "Connected to MongoDB");
                    return Ok(Self {
                        client: RwLock::new(client),
                        options,
                        config,
                    });
                }
                Err(e) => {
                    warn!(attempt, attempts, error = %e, "MongoDB connection attempt failed");
                    last_error = e.to_string();
                    if attempt < attempts {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(StorageError::Backend(BackendError::ConnectionFailed {
            backend_name: BACKEND_NAME.to_string(),
            message: format!("gave up after {} attempts: {}", attempts, last_error),
        }))
    }

    async fn open(
        options: &ClientOptions,
        database: &str,
    ) -> Result<Client, mongodb::error::Error> {
        let client = Client::with_options(options.clone())?;
        client.database(database).run_command(doc! { "ping": 1 }).await?;
        Ok(client)
    }

    /// Creates the collection indexes.
    ///
    /// With `unique_indexes` set, `email` and `phone` each get a unique
    /// partial index, so records without a value never collide and two
    /// concurrent creates cannot both store the same key. Otherwise the
    /// indexes are plain lookup indexes, and a unique index left by an
    /// earlier run is dropped first so the constraint really goes away.
    pub async fn init_schema(&self) -> StorageResult<()> {
        let unique = self.config.unique_indexes;
        let stale = if unique {
            Vec::new()
        } else {
            self.unique_index_names().await?
        };

        for field in UniqueField::ALL {
            let key = field.as_str();
            let name = format!("{}_1", key);
            if stale.contains(&name) {
                warn!(index = %name, "Dropping unique index, unique indexes are disabled");
                self.collection().drop_index(name.as_str()).await?;
            }

            let mut options = IndexOptions::builder().name(name.clone()).build();
            if unique {
                options.unique = Some(true);
                options.partial_filter_expression = Some(doc! { key: { "$exists": true } });
            }

            let model = IndexModel::builder()
                .keys(doc! { key: 1 })
                .options(options)
                .build();
            self.collection().create_index(model).await?;
            debug!(index = %name, unique, "Index in place");
        }

        Ok(())
    }

    async fn unique_index_names(&self) -> StorageResult<Vec<String>> {
        let cursor = match self.collection().list_indexes().await {
            Ok(cursor) => cursor,
            // The collection does not exist yet.
            Err(e) if matches!(e.kind.as_ref(), ErrorKind::Command(c) if c.code == 26) => {
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let indexes: Vec<IndexModel> = cursor.try_collect().await?;
        Ok(indexes.iter().filter_map(unique_index_name).collect())
    }

    /// Returns the backend configuration.
    pub fn config(&self) -> &MongoBackendConfig {
        &self.config
    }

    /// Returns a handle to the contact collection on the current client.
    pub(crate) fn collection(&self) -> Collection<UserDocument> {
        self.client
            .read()
            .database(&self.config.database)
            .collection(&self.config.collection)
    }
}

#[async_trait]
impl Backend for MongoBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::MongoDB
    }

    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        let client = self.client.read().clone();
        client
            .database(&self.config.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| BackendError::Unavailable {
                backend_name: BACKEND_NAME.to_string(),
                message: format!("ping failed: {}", e),
            })?;
        Ok(())
    }

    async fn reconnect(&self) -> Result<(), BackendError> {
        let client = Self::open(&self.options, &self.config.database)
            .await
            .map_err(|e| BackendError::ConnectionFailed {
                backend_name: BACKEND_NAME.to_string(),
                message: e.to_string(),
            })?;
        *self.client.write() = client;
        info!("MongoDB client refreshed");
        Ok(())
    }

    async fn initialize(&self) -> Result<(), BackendError> {
        self.init_schema()
            .await
            .map_err(|e| BackendError::SchemaError {
                message: format!("failed to create indexes: {}", e),
            })
    }
}

fn unique_index_name(model: &IndexModel) -> Option<String> {
    let options = model.options.as_ref()?;
    if options.unique == Some(true) {
        options.name.clone()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(name: &str, unique: Option<bool>) -> IndexModel {
        let mut options = IndexOptions::builder().name(name.to_string()).build();
        options.unique = unique;
        IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(options)
            .build()
    }

    #[test]
    fn test_unique_index_name() {
        assert_eq!(
            unique_index_name(&index("email_1", Some(true))),
            Some("email_1".to_string())
        );
        assert_eq!(unique_index_name(&index("email_1", Some(false))), None);
        assert_eq!(unique_index_name(&index("email_1", None)), None);
        assert_eq!(
            unique_index_name(&IndexModel::builder().keys(doc! { "_id": 1 }).build()),
            None
        );
    }
}
