//! MongoDB backend configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the MongoDB backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoBackendConfig {
    /// Connection string, e.g. `mongodb://127.0.0.1:27017/addressbook`.
    #[serde(default = "default_connection_string")]
    pub connection_string: String,

    /// Database holding the contact collection.
    #[serde(default = "default_database")]
    pub database: String,

    /// Name of the contact collection.
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Server selection and connect timeout in milliseconds. Zero means 5 s.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Connection attempts made at startup. Zero means one.
    #[serde(default = "default_connect_retries")]
    pub connect_retries: u32,

    /// Pause between startup connection attempts in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Maximum size of the driver's connection pool.
    #[serde(default)]
    pub max_pool_size: Option<u32>,

    /// Create unique indexes on `email` and `phone` during initialization.
    #[serde(default = "default_true")]
    pub unique_indexes: bool,
}

fn default_connection_string() -> String {
    "mongodb://127.0.0.1:27017".to_string()
}

fn default_database() -> String {
    "addressbook".to_string()
}

fn default_collection() -> String {
    "users".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    3000
}

fn default_connect_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    3000
}

fn default_true() -> bool {
    true
}

impl Default for MongoBackendConfig {
    fn default() -> Self {
        Self {
            connection_string: default_connection_string(),
            database: default_database(),
            collection: default_collection(),
            connect_timeout_ms: default_connect_timeout_ms(),
            connect_retries: default_connect_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            max_pool_size: None,
            unique_indexes: true,
        }
    }
}

impl MongoBackendConfig {
    /// Creates a configuration for the given connection string.
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            ..Default::default()
        }
    }

    /// Builds a configuration from a host, optional credentials and a database name.
    ///
    /// The connection string takes the form `mongodb://[user:password@]host/database`.
    /// Credentials are only included when `user` is non-empty and are
    /// percent-encoded, so reserved characters such as `@`, `:` or `/` are safe.
    pub fn from_parts(host: &str, user: &str, password: &str, database: &str) -> Self {
        let credentials = if user.is_empty() {
            String::new()
        } else {
            format!("{}:{}@", urlencoding::encode(user), urlencoding::encode(password))
        };

        Self {
            connection_string: format!("mongodb://{}{}/{}", credentials, host, database),
            database: database.to_string(),
            ..Default::default()
        }
    }

    /// Sets the database name.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Sets the collection name.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Sets the connect timeout.
    pub fn with_connect_timeout_ms(mut self, timeout: u64) -> Self {
        self.connect_timeout_ms = timeout;
        self
    }

    /// Sets the number of startup connection attempts.
    pub fn with_connect_retries(mut self, retries: u32) -> Self {
        self.connect_retries = retries;
        self
    }

    /// Sets the pause between startup connection attempts.
    pub fn with_retry_delay_ms(mut self, delay: u64) -> Self {
        self.retry_delay_ms = delay;
        self
    }

    /// Enables or disables the unique indexes.
    pub fn with_unique_indexes(mut self, enabled: bool) -> Self {
        self.unique_indexes = enabled;
        self
    }

    /// The connect timeout with the zero default applied.
    pub fn effective_connect_timeout(&self) -> Duration {
        match self.connect_timeout_ms {
            0 => Duration::from_secs(5),
            ms => Duration::from_millis(ms),
        }
    }

    /// The number of startup attempts with the zero default applied.
    pub fn effective_connect_retries(&self) -> u32 {
        self.connect_retries.max(1)
    }

    /// The connection string with any password masked, for logs.
    pub fn redacted_connection_string(&self) -> String {
        let Some((scheme, rest)) = self.connection_string.split_once("://") else {
            return self.connection_string.clone();
        };
        match rest.rsplit_once('@') {
            Some((credentials, host)) => {
                let user = credentials.split(':').next().unwrap_or_default();
                format!("{}://{}:***@{}", scheme, user, host)
            }
            None => self.connection_string.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MongoBackendConfig::default();
        assert_eq!(config.database, "addressbook");
        assert_eq!(config.collection, "users");
        assert_eq!(config.connect_timeout_ms, 3000);
        assert_eq!(config.connect_retries, 3);
        assert!(config.unique_indexes);
    }

    #[test]
    fn test_from_parts_without_credentials() {
        let config = MongoBackendConfig::from_parts("127.0.0.1:27017", "", "", "addressbook");
        assert_eq!(
            config.connection_string,
            "mongodb://127.0.0.1:27017/addressbook"
        );
        assert_eq!(config.database, "addressbook");
    }

    #[test]
    fn test_from_parts_with_credentials() {
        let config = MongoBackendConfig::from_parts("db:27017", "admin", "secret", "contacts");
        assert_eq!(
            config.connection_string,
            "mongodb://admin:secret@db:27017/contacts"
        );
        assert_eq!(
            config.redacted_connection_string(),
            "mongodb://admin:***@db:27017/contacts"
        );
    }

    #[test]
    fn test_from_parts_encodes_reserved_characters() {
        let config =
            MongoBackendConfig::from_parts("db:27017", "ops@corp", "p@ss:w/rd", "contacts");
        assert_eq!(
            config.connection_string,
            "mongodb://ops%40corp:p%40ss%3Aw%2Frd@db:27017/contacts"
        );
        assert_eq!(
            config.redacted_connection_string(),
            "mongodb://ops%40corp:***@db:27017/contacts"
        );
    }

    #[test]
    fn test_zero_values_fall_back() {
        let config = MongoBackendConfig::default()
            .with_connect_timeout_ms(0)
            .with_connect_retries(0);
        assert_eq!(config.effective_connect_timeout(), Duration::from_secs(5));
        assert_eq!(config.effective_connect_retries(), 1);
    }

    #[test]
    fn test_serde_defaults() {
        let config: MongoBackendConfig =
            serde_json::from_str(r#"{"database": "test_db"}"#).unwrap();
        assert_eq!(config.database, "test_db");
        assert_eq!(config.collection, "users");
        assert_eq!(config.retry_delay_ms, 3000);
    }
}
