use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::artifact::GeneratedArtifact;
use crate::error::{CodegenError, Result};

/// Relative output paths of an artifact, paired with their content
pub fn artifact_files(artifact: &GeneratedArtifact) -> Vec<(PathBuf, &str)> {
    let table = &artifact.table;
    let class = &artifact.class_name;

    let mut files = vec![(PathBuf::from(format!("types/{table}.ts")), artifact.types.as_str())];
    if let Some(form) = &artifact.form {
        files.push((PathBuf::from(format!("forms/{class}Form.tsx")), form.as_str()));
    }
    if let Some(table_component) = &artifact.table_component {
        files.push((PathBuf::from(format!("tables/{class}Table.tsx")), table_component.as_str()));
    }
    if let Some(tests) = &artifact.tests {
        files.push((PathBuf::from(format!("__tests__/{class}.test.tsx")), tests.as_str()));
    }
    if let Some(documentation) = &artifact.documentation {
        files.push((PathBuf::from(format!("docs/{class}.md")), documentation.as_str()));
    }
    files.push((PathBuf::from(format!("prompts/{table}.md")), artifact.prompt.as_str()));
    files
}

/// Writes every file of `artifact` below `dir` and returns the written paths
pub fn write_artifact(dir: &Path, artifact: &GeneratedArtifact) -> Result<Vec<PathBuf>> {
    if artifact.table.is_empty()
        || artifact.table.starts_with('.')
        || artifact.table.contains(['/', '\\'])
    {
        return Err(CodegenError::InvalidPath(dir.join(&artifact.table)));
    }

    let mut written = Vec::new();
    for (relative, content) in artifact_files(artifact) {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        debug!(path = %path.display(), "wrote file");
        written.push(path);
    }

    info!(table = %artifact.table, files = written.len(), "artifact written");
    Ok(written)
}

/// Runs `prettier --write` over `paths`
pub fn format_files(paths: &[PathBuf]) -> Result<()> {
    if paths.is_empty() {
        return Ok(());
    }

    let output = Command::new("prettier")
        .arg("--write")
        .args(paths)
        .output()
        .map_err(|e| CodegenError::Format(e.to_string()))?;

    if !output.status.success() {
        let error = String::from_utf8_lossy(&output.stderr);
        return Err(CodegenError::Format(error.to_string()));
    }

    Ok(())
}
