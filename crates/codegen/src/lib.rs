//! schemaforge-codegen turns cached table schemas into TypeScript types, React
//! components, test skeletons, documentation and generation prompts.
//!
//! Generation is pure: every generator takes a [`TableSchema`] and
//! [`GenerationOptions`] and returns text. Only [`output`] touches the disk.

mod artifact;
mod components;
mod config;
mod error;
pub mod ir;
mod labels;
mod options;
pub mod output;
mod prompt;
pub mod typescript;
pub mod writer;

pub use artifact::{generate_artifact, generate_artifact_at, generate_artifact_with, GeneratedArtifact};
pub use components::{generate_documentation, generate_form, generate_table, generate_tests};
pub use config::{Config, ConfiguredSource, UiSource, CONFIG_FILE};
pub use error::{CodegenError, Result};
pub use labels::{column_label, messages, table_labels, Messages, TableLabels};
pub use options::{ComponentKind, GenerationOptions, Language, PromptTemplate, Styling};
pub use prompt::{component_name, debug_prompt, generate_prompt, generate_prompt_at, quick_prompt};
pub use typescript::{generate_types, ts_type};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use schemaforge_core::injector::SchemaInjector;
use schemaforge_core::schema::TableSchema;
use schemaforge_core::ui::UiMetadata;
use tracing::{debug, info, warn};

/// Fetches and validates one table through the injector
pub async fn check_table(injector: &SchemaInjector, table: &str) -> Result<Arc<TableSchema>> {
    Ok(injector.get_schema(table).await?)
}

/// Fetches one table, generates its artifact and writes it below the output path.
///
/// `ui` overlays labels and layout when UI metadata is available. Returns the
/// written files; prettier is not run here.
pub async fn write_table(
    injector: &SchemaInjector,
    table: &str,
    ui: Option<&UiMetadata>,
    options: &GenerationOptions,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let schema = injector.get_schema(table).await?;
    let artifact = generate_artifact_with(&schema, ui, options, chrono::Utc::now());
    output::write_artifact(output_dir, &artifact)
}

/// Checks every configured table, stopping at the first failure.
///
/// `on_checked` runs once per table that validated.
pub async fn check(config: &Config, mut on_checked: impl FnMut(&TableSchema)) -> Result<()> {
    let injector = config.build_injector()?;
    for table in &config.generate.tables {
        let schema = check_table(&injector, table).await?;
        on_checked(&schema);
    }
    Ok(())
}

/// Generates and writes the artifacts of every configured table
pub async fn generate(config: &Config) -> Result<Vec<PathBuf>> {
    generate_with(config, |_, _| {}).await
}

/// Like [`generate`], calling `on_written` with each table and its files
pub async fn generate_with(
    config: &Config,
    mut on_written: impl FnMut(&str, &[PathBuf]),
) -> Result<Vec<PathBuf>> {
    let injector = config.build_injector()?;
    let ui_source = config.build_ui_source()?;
    let started = Instant::now();
    let options = config.generation_options();
    let mut written = Vec::new();

    for table in &config.generate.tables {
        let ui = match &ui_source {
            Some(source) => source.fetch(table).await?,
            None => None,
        };
        if ui.is_none() && ui_source.is_some() {
            debug!(table = %table, "no UI metadata, using schema labels");
        }
        let files = write_table(&injector, table, ui.as_ref(), &options, &config.output.path).await?;
        on_written(table, &files);
        written.extend(files);
    }

    if config.output.format {
        output::format_files(&written)?;
    }

    info!(
        tables = config.generate.tables.len(),
        files = written.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "generation finished"
    );
    Ok(written)
}

/// Generates once, then regenerates whenever the config file or the snapshot
/// directory changes. The config is reloaded on every change.
pub async fn watch(config: Config, config_path: &Path) -> Result<()> {
    use console::style;
    use notify::{
        event::{EventKind, ModifyKind},
        Config as NotifyConfig, RecommendedWatcher, RecursiveMode, Watcher,
    };

    println!("{}", style("schemaforge").green().bold());
    println!("  {} Initial generation...", style("➜").green());
    match generate(&config).await {
        Ok(files) => println!("  {} Wrote {} files", style("➜").green(), files.len()),
        Err(e) => println!("  {} Generation failed: {}", style("✖").red(), style(e).red()),
    }

    println!("  {} Watching for changes...", style("➜").cyan());
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| {
            // Fails only once the loop below has ended
            let _ = tx.send(res);
        },
        NotifyConfig::default(),
    )?;

    // Editors that save by renaming replace the file, so watch its directory
    let config_dir = match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    watcher.watch(config_dir, RecursiveMode::NonRecursive)?;
    let snapshots = config
        .source
        .snapshots
        .as_ref()
        .map(|dir| dir.canonicalize().unwrap_or_else(|_| dir.clone()));
    if let Some(snapshots) = &snapshots {
        watcher.watch(snapshots, RecursiveMode::Recursive)?;
    }

    let output_path = config
        .output
        .path
        .canonicalize()
        .unwrap_or_else(|_| config.output.path.clone());
    let cwd = std::env::current_dir().unwrap_or_default();

    while let Some(res) = rx.recv().await {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                println!("  {} Watch error: {}", style("✖").red(), style(e).red());
                continue;
            }
        };

        let relevant = event.paths.iter().any(|p| {
            !p.starts_with(&output_path) && triggers_regeneration(p, config_path, snapshots.as_deref())
        });
        if !relevant {
            continue;
        }

        if !matches!(
            event.kind,
            EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Name(_))
                | EventKind::Create(_)
                | EventKind::Remove(_)
        ) {
            continue;
        }

        if let Some(changed_path) = event.paths.first() {
            let relative_path = changed_path.strip_prefix(&cwd).unwrap_or(changed_path).display();
            println!(
                "\n{} Changed: {}",
                style("[⚡️GEN]").yellow().bold(),
                style(relative_path).cyan()
            );
        }

        // Each run builds its own injector, so snapshot edits are picked up
        let config = match Config::load(config_path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "config reload failed");
                println!("  {} Config reload failed: {}", style("✖").red(), style(e).red());
                continue;
            }
        };

        match generate(&config).await {
            Ok(files) => println!(
                "  {} Regenerated {} files",
                style("➜").green(),
                files.len()
            ),
            Err(e) => println!("  {} Generation failed: {}", style("✖").red(), style(e).red()),
        }
    }

    Ok(())
}

/// Whether a change at `path` should trigger a new generation run: the config
/// file itself (matched by name, since its directory is watched) or anything
/// inside the snapshot directory.
fn triggers_regeneration(path: &Path, config_path: &Path, snapshots: Option<&Path>) -> bool {
    if snapshots.is_some_and(|dir| path.starts_with(dir)) {
        return true;
    }
    path.file_name().is_some() && path.file_name() == config_path.file_name()
}
