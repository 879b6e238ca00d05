use crate::error::{CodegenError, Result};
use crate::options::{ComponentKind, GenerationOptions, Language, PromptTemplate, Styling};
use schemaforge_core::injector::{FileSchemaSource, HttpSchemaSource, SchemaInjector, SchemaSource};
use schemaforge_core::ui::UiMetadata;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const CONFIG_FILE: &str = "schemaforge.toml";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub version: String,
    pub source: SourceConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    pub generate: GenerateConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    pub url: Option<String>,
    /// Name of the environment variable holding the bearer token
    pub token_env: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    pub snapshots: Option<PathBuf>,
    /// Optional UI-metadata server; snapshot sources read `ui/` instead
    pub ui_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateConfig {
    pub tables: Vec<String>,
    #[serde(default)]
    pub component: ComponentKind,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub styling: Styling,
    #[serde(default)]
    pub tests: bool,
    #[serde(default)]
    pub documentation: bool,
    #[serde(default)]
    pub prompt: PromptTemplate,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub format: bool,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_ttl_secs() -> u64 {
    300
}

/// The source a config resolves to.
///
/// Kept concrete so the CLI can reach the HTTP-only remote operations.
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    Http(HttpSchemaSource),
    Snapshots(FileSchemaSource),
}

impl ConfiguredSource {
    pub fn into_shared(self) -> Arc<dyn SchemaSource> {
        match self {
            Self::Http(source) => Arc::new(source),
            Self::Snapshots(source) => Arc::new(source),
        }
    }

    pub fn as_http(&self) -> Option<&HttpSchemaSource> {
        match self {
            Self::Http(source) => Some(source),
            Self::Snapshots(_) => None,
        }
    }
}

/// Where UI metadata comes from, if anywhere.
#[derive(Debug, Clone)]
pub enum UiSource {
    Http(HttpSchemaSource),
    Snapshots(FileSchemaSource),
}

impl UiSource {
    /// UI metadata of `table`; `None` when the source has none for it
    pub async fn fetch(&self, table: &str) -> Result<Option<UiMetadata>> {
        let metadata = match self {
            Self::Http(source) => source.fetch_ui_metadata(table).await?,
            Self::Snapshots(source) => source.fetch_ui_metadata(table).await?,
        };
        Ok(metadata)
    }
}

impl Config {
    pub fn find_and_load(start_dir: &Path) -> Result<(Self, PathBuf)> {
        let mut current_dir = start_dir.to_path_buf();

        loop {
            let config_path = current_dir.join(CONFIG_FILE);
            if config_path.exists() {
                let config = Self::load(&config_path)?;
                return Ok((config, current_dir));
            }

            if !current_dir.pop() {
                return Err(CodegenError::ConfigNotFound(start_dir.to_path_buf()));
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;

        // Relative paths are resolved against the directory holding the file
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let config = config.resolve_paths(base);
        config.validate()?;
        Ok(config)
    }

    /// Parses config text without touching the filesystem
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn resolve_paths(mut self, base: &Path) -> Self {
        if let Some(snapshots) = self.source.snapshots.take() {
            self.source.snapshots = Some(base.join(snapshots));
        }
        self.output.path = base.join(&self.output.path);
        self
    }

    fn validate(&self) -> Result<()> {
        match (&self.source.url, &self.source.snapshots) {
            (Some(_), Some(_)) => {
                return Err(CodegenError::InvalidConfig(
                    "[source] takes either `url` or `snapshots`, not both".into(),
                ))
            }
            (None, None) => {
                return Err(CodegenError::InvalidConfig(
                    "[source] needs a `url` or a `snapshots` directory".into(),
                ))
            }
            (None, Some(dir)) if !dir.is_dir() => {
                return Err(CodegenError::InvalidPath(dir.clone()));
            }
            _ => {}
        }

        if self.source.ui_url.is_some() && self.source.snapshots.is_some() {
            return Err(CodegenError::InvalidConfig(
                "[source] ui_url needs `url`; snapshot sources read UI metadata from `ui/`".into(),
            ));
        }

        if self.source.timeout_secs == 0 {
            return Err(CodegenError::InvalidConfig(
                "[source] timeout_secs must be greater than zero".into(),
            ));
        }

        if let Some(table) = self.generate.tables.iter().find(|t| t.trim().is_empty()) {
            return Err(CodegenError::InvalidConfig(format!(
                "[generate] tables contains an empty name ({table:?})"
            )));
        }

        if let Some(parent) = self.output.path.parent() {
            if !parent.exists() {
                return Err(CodegenError::InvalidPath(parent.to_path_buf()));
            }
        }

        Ok(())
    }

    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            component: self.generate.component,
            language: self.generate.language,
            styling: self.generate.styling,
            include_tests: self.generate.tests,
            include_documentation: self.generate.documentation,
            prompt_template: self.generate.prompt,
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    /// Builds the configured schema source.
    ///
    /// The bearer token is read from the environment variable named by
    /// `token_env`; an unset variable means no token.
    pub fn build_source(&self) -> Result<ConfiguredSource> {
        if let Some(dir) = &self.source.snapshots {
            return Ok(ConfiguredSource::Snapshots(FileSchemaSource::new(dir)));
        }

        let url = self.source.url.as_deref().ok_or_else(|| {
            CodegenError::InvalidConfig("[source] needs a `url` or a `snapshots` directory".into())
        })?;

        Ok(ConfiguredSource::Http(self.http_source(url)?))
    }

    /// Builds the UI-metadata source: the `ui_url` server, or the `ui/`
    /// directory of a snapshot source.
    pub fn build_ui_source(&self) -> Result<Option<UiSource>> {
        if let Some(dir) = &self.source.snapshots {
            return Ok(Some(UiSource::Snapshots(FileSchemaSource::new(dir))));
        }
        match &self.source.ui_url {
            Some(url) => Ok(Some(UiSource::Http(self.http_source(url)?))),
            None => Ok(None),
        }
    }

    fn http_source(&self, url: &str) -> Result<HttpSchemaSource> {
        let mut source = HttpSchemaSource::new(url)?
            .with_timeout(Duration::from_secs(self.source.timeout_secs));

        if let Some(var) = &self.source.token_env {
            match std::env::var(var) {
                Ok(token) if !token.is_empty() => source = source.with_token(token),
                _ => tracing::warn!(var = %var, "bearer token variable is not set"),
            }
        }
        Ok(source)
    }

    pub fn build_injector(&self) -> Result<SchemaInjector> {
        let source = self.build_source()?.into_shared();
        Ok(SchemaInjector::from_arc(source).with_ttl(self.ttl()))
    }
}
