use schemaforge_core::schema::TableSchema;

use crate::ir::{ComponentModel, FieldModel};
use crate::options::{ComponentKind, GenerationOptions, Language};
use crate::writer::CodeWriter;

struct DocPhrases {
    components: &'static str,
    overview: &'static str,
    intro: &'static str,
    schema_details: &'static str,
    table: &'static str,
    columns_header: &'static str,
    yes: &'static str,
    no: &'static str,
    references: &'static str,
    allowed_values: &'static str,
    default: &'static str,
    check: &'static str,
    policies: &'static str,
    allowed: &'static str,
    forbidden: &'static str,
    indexes: &'static str,
    triggers: &'static str,
    form_intro: &'static str,
    table_intro: &'static str,
    props: &'static str,
    prop_initial_data: &'static str,
    prop_on_submit: &'static str,
    prop_on_cancel: &'static str,
    prop_is_loading: &'static str,
    prop_rows: &'static str,
    prop_action: &'static str,
    usage: &'static str,
    regenerate: &'static str,
    regenerate_steps: [&'static str; 3],
}

const DE: DocPhrases = DocPhrases {
    components: "Komponenten",
    overview: "Übersicht",
    intro: "Diese Komponenten verwalten die Tabelle",
    schema_details: "Schema-Details",
    table: "Tabelle",
    columns_header: "| Spalte | Typ | Erforderlich | Beschreibung |",
    yes: "Ja",
    no: "Nein",
    references: "verweist auf",
    allowed_values: "erlaubte Werte",
    default: "Standard",
    check: "Prüfung",
    policies: "RLS-Richtlinien",
    allowed: "✅ Erlaubt",
    forbidden: "❌ Verboten",
    indexes: "Indizes",
    triggers: "Trigger",
    form_intro: "Formular zum Erstellen und Bearbeiten von",
    table_intro: "Datentabelle zur Anzeige und Verwaltung von",
    props: "Props",
    prop_initial_data: "optionale Ausgangsdaten zum Bearbeiten",
    prop_on_submit: "wird mit den validierten Formulardaten aufgerufen",
    prop_on_cancel: "optionaler Abbrechen-Callback",
    prop_is_loading: "Ladezustand",
    prop_rows: "anzuzeigende Datensätze",
    prop_action: "optionaler Callback für die Zeilenaktion",
    usage: "Verwendung",
    regenerate: "Neu generieren",
    regenerate_steps: [
        "Schema auf dem Metadaten-Server erweitern",
        "`schemaforge run` ausführen",
        "Tests an die neuen Felder anpassen",
    ],
};

const EN: DocPhrases = DocPhrases {
    components: "Components",
    overview: "Overview",
    intro: "These components manage the table",
    schema_details: "Schema Details",
    table: "Table",
    columns_header: "| Column | Type | Required | Description |",
    yes: "Yes",
    no: "No",
    references: "references",
    allowed_values: "allowed values",
    default: "default",
    check: "check",
    policies: "RLS Policies",
    allowed: "✅ Allowed",
    forbidden: "❌ Forbidden",
    indexes: "Indexes",
    triggers: "Triggers",
    form_intro: "Form for creating and editing",
    table_intro: "Data table for viewing and managing",
    props: "Props",
    prop_initial_data: "optional initial data when editing",
    prop_on_submit: "called with the validated form data",
    prop_on_cancel: "optional cancel callback",
    prop_is_loading: "loading state",
    prop_rows: "records to display",
    prop_action: "optional callback for the row action",
    usage: "Usage",
    regenerate: "Regenerating",
    regenerate_steps: [
        "Extend the schema on the metadata server",
        "Run `schemaforge run`",
        "Adjust the tests to the new fields",
    ],
};

/// Markdown documentation for the generated components
pub fn generate_documentation(schema: &TableSchema, options: &GenerationOptions) -> String {
    render_documentation(
        &ComponentModel::new(schema, options),
        schema,
        options.component,
    )
}

pub(crate) fn render_documentation(
    model: &ComponentModel,
    schema: &TableSchema,
    component: ComponentKind,
) -> String {
    let p = match model.language {
        Language::De => &DE,
        Language::En => &EN,
    };
    let class = &model.class_name;
    let table = &model.table;
    let mut w = CodeWriter::new();

    w.line(format!("# {class} {}", p.components));
    w.blank();
    w.line(format!("## {}", p.overview));
    w.blank();
    w.line(format!("{} `{table}`.", p.intro));
    w.blank();
    w.line(format!("## {}", p.schema_details));
    w.blank();
    w.line(format!("### {}: `{table}`", p.table));
    w.blank();
    w.line(p.columns_header);
    w.line("|---|---|---|---|");
    for field in &model.fields {
        w.line(format!(
            "| `{}` | `{}` | {} | {} |",
            field.name,
            field.column_type,
            if field.required { p.yes } else { p.no },
            describe(field, p)
        ));
    }
    w.blank();

    w.line(format!("### {}", p.policies));
    w.blank();
    for (operation, allowed) in model.rls.operations() {
        w.line(format!(
            "- **{operation}**: {}",
            if allowed { p.allowed } else { p.forbidden }
        ));
    }

    if let Some(indexes) = schema.indexes.as_deref().filter(|i| !i.is_empty()) {
        w.blank();
        w.line(format!("### {}", p.indexes));
        w.blank();
        for index in indexes {
            match &index.definition {
                Some(definition) => w.line(format!("- `{}`: `{definition}`", index.name)),
                None => w.line(format!("- `{}`", index.name)),
            };
        }
    }

    if let Some(triggers) = schema.triggers.as_deref().filter(|t| !t.is_empty()) {
        w.blank();
        w.line(format!("### {}", p.triggers));
        w.blank();
        for trigger in triggers {
            let details: Vec<&str> = [trigger.event.as_deref(), trigger.function.as_deref()]
                .into_iter()
                .flatten()
                .collect();
            if details.is_empty() {
                w.line(format!("- `{}`", trigger.name));
            } else {
                w.line(format!("- `{}`: {}", trigger.name, details.join(", ")));
            }
        }
    }

    w.blank();
    w.line(format!("## {}", p.components));

    if component.includes_form() {
        w.blank();
        w.line(format!("### {class}Form"));
        w.blank();
        w.line(format!("{} {}.", p.form_intro, model.labels.plural));
        w.blank();
        w.line(format!("**{}:**", p.props));
        w.line(format!("- `initialData`: {}", p.prop_initial_data));
        w.line(format!("- `onSubmit`: {}", p.prop_on_submit));
        w.line(format!("- `onCancel`: {}", p.prop_on_cancel));
        w.line(format!("- `isLoading`: {}", p.prop_is_loading));
        if model.needs_rls_advisory() {
            w.blank();
            for sentence in model.rls_advisories() {
                w.line(format!("> {sentence}"));
            }
        }
    }

    let actions: Vec<&str> = [
        (model.rls.select, "onView"),
        (model.rls.update, "onEdit"),
        (model.rls.delete, "onDelete"),
    ]
    .into_iter()
    .filter_map(|(allowed, prop)| allowed.then_some(prop))
    .collect();

    if component.includes_table() {
        w.blank();
        w.line(format!("### {class}Table"));
        w.blank();
        w.line(format!("{} {}.", p.table_intro, model.labels.plural));
        w.blank();
        w.line(format!("**{}:**", p.props));
        w.line(format!("- `rows`: {}", p.prop_rows));
        w.line(format!("- `isLoading`: {}", p.prop_is_loading));
        for action in &actions {
            w.line(format!("- `{action}`: {}", p.prop_action));
        }
    }

    w.blank();
    w.line(format!("## {}", p.usage));
    w.blank();
    w.line("```tsx");
    if component.includes_form() {
        w.line(format!("import {{ {class}Form }} from './forms/{class}Form';"));
    }
    if component.includes_table() {
        w.line(format!("import {{ {class}Table }} from './tables/{class}Table';"));
    }
    if component.includes_form() {
        w.blank();
        w.line(format!("<{class}Form onSubmit={{handleSubmit}} onCancel={{handleCancel}} />"));
    }
    if component.includes_table() {
        w.blank();
        let handlers: Vec<String> = actions
            .iter()
            .map(|prop| format!(" {prop}={{handle{}}}", prop.trim_start_matches("on")))
            .collect();
        w.line(format!("<{class}Table rows={{rows}}{} />", handlers.concat()));
    }
    w.line("```");
    w.blank();

    w.line(format!("## {}", p.regenerate));
    w.blank();
    for (i, step) in p.regenerate_steps.iter().enumerate() {
        w.line(format!("{}. {step}", i + 1));
    }

    w.finish()
}

fn describe(field: &FieldModel, p: &DocPhrases) -> String {
    let mut parts = vec![field.label.clone()];
    if let Some(fk) = &field.foreign_key {
        parts.push(format!("{} `{fk}`", p.references));
    }
    if let Some(values) = &field.enum_values {
        parts.push(format!("{}: {}", p.allowed_values, values.join(", ")));
    }
    if let Some(default) = &field.default {
        parts.push(format!("{}: `{default}`", p.default));
    }
    if let Some(check) = &field.check {
        parts.push(format!("{}: `{check}`", p.check));
    }
    // Pipes would end the Markdown cell
    parts.join("; ").replace('|', "\\|")
}
