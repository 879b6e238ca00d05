use chrono::{DateTime, Utc};
use schemaforge_core::schema::TableSchema;
use schemaforge_core::ui::UiMetadata;

use crate::components;
use crate::ir::ComponentModel;
use crate::options::GenerationOptions;
use crate::prompt;
use crate::typescript;

/// Everything generated for one table.
///
/// Built fresh for each request and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub table: String,
    pub class_name: String,
    pub types: String,
    pub form: Option<String>,
    pub table_component: Option<String>,
    pub tests: Option<String>,
    pub documentation: Option<String>,
    pub prompt: String,
}

pub fn generate_artifact(schema: &TableSchema, options: &GenerationOptions) -> GeneratedArtifact {
    generate_artifact_at(schema, options, Utc::now())
}

/// Like [`generate_artifact`] with a fixed prompt timestamp
pub fn generate_artifact_at(
    schema: &TableSchema,
    options: &GenerationOptions,
    now: DateTime<Utc>,
) -> GeneratedArtifact {
    generate_artifact_with(schema, None, options, now)
}

/// Like [`generate_artifact_at`], with labels and layout from UI metadata
pub fn generate_artifact_with(
    schema: &TableSchema,
    ui: Option<&UiMetadata>,
    options: &GenerationOptions,
    now: DateTime<Utc>,
) -> GeneratedArtifact {
    let model = ComponentModel::with_ui(schema, options, ui);
    let component = options.component;

    GeneratedArtifact {
        table: schema.table.clone(),
        class_name: model.class_name.clone(),
        types: typescript::render_types(&model),
        form: component
            .includes_form()
            .then(|| components::render_form(&model)),
        table_component: component
            .includes_table()
            .then(|| components::render_table(&model)),
        tests: options
            .include_tests
            .then(|| components::render_tests(&model, component)),
        documentation: options
            .include_documentation
            .then(|| components::render_documentation(&model, schema, component)),
        prompt: prompt::generate_prompt_at(schema, options, now),
    }
}
