//! Snapshot-directory schema source for offline development.
//!
//! Each table lives in `<dir>/<table>.json` using the metadata server's wire
//! format. A missing or malformed snapshot is an error; there is no fallback
//! to sample data.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use walkdir::WalkDir;

use super::source::SchemaSource;
use crate::error::{SchemaError, SchemaResult};
use crate::schema::{self, TableSchema};
use crate::ui::{self, UiMetadata};

#[derive(Debug, Clone)]
pub struct FileSchemaSource {
    dir: PathBuf,
}

impl FileSchemaSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn snapshot_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.json"))
    }

    /// UI metadata snapshots live in a `ui/` subdirectory
    pub fn ui_snapshot_path(&self, table: &str) -> PathBuf {
        self.dir.join("ui").join(format!("{table}.json"))
    }

    /// Reads `ui/<table>.json`; a missing file means no UI metadata
    pub async fn fetch_ui_metadata(&self, table: &str) -> SchemaResult<Option<UiMetadata>> {
        check_file_name(table, &self.dir)?;

        let path = self.ui_snapshot_path(table);
        let body = match tokio::fs::read_to_string(&path).await {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SchemaError::Snapshot {
                    table: table.to_string(),
                    path,
                    message: e.to_string(),
                })
            }
        };
        debug!(table, path = %path.display(), "read UI metadata snapshot");
        ui::parse_ui_metadata(table, &body).map(Some)
    }
}

#[async_trait]
impl SchemaSource for FileSchemaSource {
    async fn fetch_schema(&self, table: &str) -> SchemaResult<TableSchema> {
        check_file_name(table, &self.dir)?;

        let path = self.snapshot_path(table);
        debug!(table, path = %path.display(), "reading schema snapshot");

        let body = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SchemaError::Snapshot {
                table: table.to_string(),
                path: path.clone(),
                message: e.to_string(),
            })?;
        schema::parse_table_schema(table, &body)
    }

    async fn list_tables(&self) -> SchemaResult<Vec<String>> {
        let mut tables = Vec::new();
        for entry in WalkDir::new(&self.dir).max_depth(1) {
            let entry = entry.map_err(|e| SchemaError::remote("snapshot listing", e))?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                tables.push(stem.to_string());
            }
        }
        tables.sort();
        Ok(tables)
    }

    fn describe(&self) -> String {
        format!("snapshots in {}", self.dir.display())
    }
}

fn check_file_name(table: &str, dir: &Path) -> SchemaResult<()> {
    if table.contains(['/', '\\']) || table.starts_with('.') {
        return Err(SchemaError::Snapshot {
            table: table.to_string(),
            path: dir.to_path_buf(),
            message: "table name is not a valid file name".to_string(),
        });
    }
    Ok(())
}
