use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::error::{SchemaError, SchemaResult};
use crate::schema::{self, TableSchema};
use crate::ui::{self, UiMetadata};

/// Default timeout for a single metadata request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can produce a validated schema for a table name.
///
/// Implementations perform the actual I/O; caching and deduplication are the
/// injector's job.
#[async_trait]
pub trait SchemaSource: Send + Sync + 'static {
    /// Fetches and validates the schema of `table`
    async fn fetch_schema(&self, table: &str) -> SchemaResult<TableSchema>;

    /// Names of the tables this source can describe
    async fn list_tables(&self) -> SchemaResult<Vec<String>>;

    /// Short human-readable description, used in logs and CLI output
    fn describe(&self) -> String;
}

#[async_trait]
impl<S: SchemaSource + ?Sized> SchemaSource for std::sync::Arc<S> {
    async fn fetch_schema(&self, table: &str) -> SchemaResult<TableSchema> {
        (**self).fetch_schema(table).await
    }

    async fn list_tables(&self) -> SchemaResult<Vec<String>> {
        (**self).list_tables().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Health report of the metadata server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerHealth {
    pub status: String,
    #[serde(default)]
    pub provider_initialized: bool,
    #[serde(default)]
    pub supabase_connected: bool,
}

impl ServerHealth {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(Debug, Deserialize)]
struct TableList {
    tables: Vec<String>,
}

/// Schema source backed by the metadata server's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpSchemaSource {
    client: Client,
    base_url: Url,
    token: Option<String>,
    timeout: Duration,
}

impl HttpSchemaSource {
    pub fn new(base_url: &str) -> SchemaResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| SchemaError::remote("configuration", format!("invalid URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(SchemaError::remote(
                "configuration",
                format!("URL '{base_url}' cannot be used as a base"),
            ));
        }

        Ok(Self {
            client: Client::new(),
            base_url,
            token: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds `{base}/api/{segments..}` with each segment percent-encoded
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url).timeout(self.timeout);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Asks the server to drop its own schema cache.
    ///
    /// This does not touch any local injector cache.
    pub async fn clear_remote_cache(&self) -> SchemaResult<()> {
        let url = self.endpoint(&["cache", "clear"]);
        info!(%url, "clearing metadata server cache");

        let response = self
            .request(Method::POST, url)
            .send()
            .await
            .map_err(|e| SchemaError::remote("cache clear", e))?;
        if !response.status().is_success() {
            return Err(SchemaError::remote(
                "cache clear",
                format!("HTTP status {}", response.status()),
            ));
        }
        Ok(())
    }

    /// Fetches `/api/ui/complete/<table>` from a UI-metadata server.
    ///
    /// A 404 means the server has no metadata for the table and yields `None`.
    pub async fn fetch_ui_metadata(&self, table: &str) -> SchemaResult<Option<UiMetadata>> {
        let url = self.endpoint(&["ui", "complete", table]);
        debug!(table, %url, "requesting UI metadata");

        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(|e| SchemaError::from_request(table, self.timeout, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SchemaError::Status {
                table: table.to_string(),
                status,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SchemaError::from_request(table, self.timeout, e))?;
        ui::parse_ui_metadata(table, &body).map(Some)
    }

    pub async fn health(&self) -> SchemaResult<ServerHealth> {
        let url = self.endpoint(&["health"]);
        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(|e| SchemaError::remote("health check", e))?;
        if !response.status().is_success() {
            return Err(SchemaError::remote(
                "health check",
                format!("HTTP status {}", response.status()),
            ));
        }
        response
            .json()
            .await
            .map_err(|e| SchemaError::remote("health check", e))
    }
}

#[async_trait]
impl SchemaSource for HttpSchemaSource {
    async fn fetch_schema(&self, table: &str) -> SchemaResult<TableSchema> {
        let url = self.endpoint(&["schema", table]);
        debug!(table, %url, "requesting schema");

        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(|e| SchemaError::from_request(table, self.timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SchemaError::Status {
                table: table.to_string(),
                status,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SchemaError::from_request(table, self.timeout, e))?;
        schema::parse_table_schema(table, &body)
    }

    async fn list_tables(&self) -> SchemaResult<Vec<String>> {
        let url = self.endpoint(&["tables"]);
        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(|e| SchemaError::remote("table listing", e))?;
        if !response.status().is_success() {
            return Err(SchemaError::remote(
                "table listing",
                format!("HTTP status {}", response.status()),
            ));
        }
        let list: TableList = response
            .json()
            .await
            .map_err(|e| SchemaError::remote("table listing", e))?;
        Ok(list.tables)
    }

    fn describe(&self) -> String {
        self.base_url.to_string()
    }
}
