//! Natural-language prompts for an external code-generation assistant.

use chrono::{DateTime, SecondsFormat, Utc};
use schemaforge_core::schema::TableSchema;

use crate::options::{GenerationOptions, Language, PromptTemplate};
use crate::writer::{pascal_case, CodeWriter};

/// Every sentence of a prompt in one language.
struct Phrases {
    title: &'static str,
    role: &'static str,
    rules_heading: &'static str,
    rules: &'static [&'static str],
    ui_heading: &'static str,
    ui_rules: &'static [&'static str],
    context_heading: &'static str,
    current_table: &'static str,
    schema_details: &'static str,
    rls_heading: &'static str,
    allowed: &'static str,
    forbidden: &'static str,
    fk_heading: &'static str,
    no_foreign_keys: &'static str,
    rules_summary_heading: &'static str,
    no_rules: &'static str,
    timestamp: &'static str,
    task_heading: &'static str,
    form_task: &'static str,
    form_requirements: &'static [&'static str],
    table_task: &'static str,
    table_requirements: &'static [&'static str],
    crud_task: &'static str,
    crud_requirements: &'static [&'static str],
    requirements: &'static str,
    output_heading: &'static str,
    types_file: &'static str,
    component_file: &'static str,
    tests_file: &'static str,
    docs_file: &'static str,
    tests_heading: &'static str,
    tests_task: &'static str,
    docs_heading: &'static str,
    docs_task: &'static str,
    note: &'static str,
    note_text: &'static str,
}

const DE: Phrases = Phrases {
    title: "React-Komponenten-Generator",
    role: "Du bist ein erfahrener Frontend-Entwickler. Erstelle React-Komponenten ausschließlich auf Basis des folgenden Tabellenschemas.",
    rules_heading: "Regeln",
    rules: &[
        "Verwende ausschließlich Felder, Typen und Relationen aus dem Schema",
        "Behandle Fremdschlüssel mit Dropdowns oder Lookups",
        "Leite die Formularvalidierung aus den Einschränkungen ab (`NOT NULL`, `CHECK`, `ENUM`)",
        "Respektiere die RLS-Richtlinien",
        "Verwende `zod` für Typensicherheit",
        "Erzeuge exakte TypeScript-Typen direkt aus dem Schema",
    ],
    ui_heading: "UI-Regeln",
    ui_rules: &[
        "Material-UI (MUI v5) für Eingaben, Karten, Tabellen und Dialoge",
        "Tailwind CSS für Layout, Abstände und Responsive Design",
        "Sinnvolle Beschriftungen, Gruppen und Reihenfolgen",
    ],
    context_heading: "Schema-Kontext",
    current_table: "Aktuelle Tabelle",
    schema_details: "Schema-Details",
    rls_heading: "RLS-Richtlinien",
    allowed: "✅ Erlaubt",
    forbidden: "❌ Verboten",
    fk_heading: "Foreign-Key-Beziehungen",
    no_foreign_keys: "Keine Foreign Keys definiert",
    rules_summary_heading: "Validierungsregeln",
    no_rules: "Keine speziellen Validierungsregeln",
    timestamp: "Schema-Zeitstempel",
    task_heading: "Aufgabe",
    form_task: "Erstelle eine vollständige React-Formular-Komponente für die Tabelle",
    form_requirements: &[
        "React Hook Form mit Zod-Validierung",
        "Echtzeit-Validierung mit Fehlermeldungen unter den Feldern",
        "Lade- und Fehlerzustände",
        "Hinweise für Update- und Delete-Beschränkungen (RLS)",
        "Dropdowns für Foreign Keys und Enum-Werte",
        "Barrierefreiheit (ARIA-Labels, Tastaturbedienung)",
    ],
    table_task: "Erstelle eine vollständige React-Tabellen-Komponente für die Tabelle",
    table_requirements: &[
        "Sortierung und Paginierung",
        "Volltextsuche über alle relevanten Felder",
        "Filter für Enum-Felder",
        "Aktionen (Anzeigen, Bearbeiten, Löschen) nur, wenn RLS sie erlaubt",
        "Leerer Zustand und Ladeindikator",
    ],
    crud_task: "Erstelle eine vollständige CRUD-Anwendung für die Tabelle",
    crud_requirements: &[
        "Formular-Komponente für Create und Update",
        "Tabellen-Komponente für Read und List",
        "Seiten-Komponente mit Modal-Dialogen und Benachrichtigungen",
        "Create nur bei erlaubtem INSERT, Update nur bei erlaubtem UPDATE, Delete nur bei erlaubtem DELETE",
    ],
    requirements: "Anforderungen",
    output_heading: "Ausgabe",
    types_file: "TypeScript-Typen",
    component_file: "React-Komponente",
    tests_file: "Tests",
    docs_file: "Dokumentation",
    tests_heading: "Tests",
    tests_task: "Erstelle Tests für alle Komponenten mit React Testing Library.",
    docs_heading: "Dokumentation",
    docs_task: "Erstelle eine README mit Verwendungsbeispielen.",
    note: "HINWEIS",
    note_text: "Verwende ausschließlich die oben definierten Felder. Erfinde KEINE zusätzlichen Felder oder Typen.",
};

const EN: Phrases = Phrases {
    title: "React Component Generator",
    role: "You are an experienced frontend developer. Create React components based solely on the table schema below.",
    rules_heading: "Rules",
    rules: &[
        "Use only fields, types and relations from the schema",
        "Handle foreign keys with dropdowns or lookups",
        "Derive form validation from the constraints (`NOT NULL`, `CHECK`, `ENUM`)",
        "Respect the RLS policies",
        "Use `zod` for type safety",
        "Generate exact TypeScript types directly from the schema",
    ],
    ui_heading: "UI Rules",
    ui_rules: &[
        "Material-UI (MUI v5) for inputs, cards, tables and dialogs",
        "Tailwind CSS for layout, spacing and responsive design",
        "Meaningful labels, groups and ordering",
    ],
    context_heading: "Schema Context",
    current_table: "Current table",
    schema_details: "Schema Details",
    rls_heading: "RLS Policies",
    allowed: "✅ Allowed",
    forbidden: "❌ Forbidden",
    fk_heading: "Foreign Key Relationships",
    no_foreign_keys: "No Foreign Keys defined",
    rules_summary_heading: "Validation Rules",
    no_rules: "No special validation rules",
    timestamp: "Schema timestamp",
    task_heading: "Task",
    form_task: "Create a complete React form component for the table",
    form_requirements: &[
        "React Hook Form with Zod validation",
        "Real-time validation with messages below the fields",
        "Loading and error states",
        "Notices for update and delete restrictions (RLS)",
        "Dropdowns for foreign keys and enum values",
        "Accessibility (ARIA labels, keyboard navigation)",
    ],
    table_task: "Create a complete React table component for the table",
    table_requirements: &[
        "Sorting and pagination",
        "Full-text search over all relevant fields",
        "Filters for enum fields",
        "Actions (view, edit, delete) only where RLS permits them",
        "Empty state and loading indicator",
    ],
    crud_task: "Create a complete CRUD application for the table",
    crud_requirements: &[
        "Form component for create and update",
        "Table component for read and list",
        "Page component with modal dialogs and notifications",
        "Create only if INSERT is allowed, update only if UPDATE is allowed, delete only if DELETE is allowed",
    ],
    requirements: "Requirements",
    output_heading: "Output",
    types_file: "TypeScript types",
    component_file: "React component",
    tests_file: "Tests",
    docs_file: "Documentation",
    tests_heading: "Tests",
    tests_task: "Create tests for all components with React Testing Library.",
    docs_heading: "Documentation",
    docs_task: "Create a README with usage examples.",
    note: "NOTE",
    note_text: "Use only the fields defined above. Do NOT invent additional fields or types.",
};

fn phrases(language: Language) -> &'static Phrases {
    match language {
        Language::De => &DE,
        Language::En => &EN,
    }
}

/// Name of the component a template asks for, e.g. `InvoicesPage`
pub fn component_name(table: &str, template: PromptTemplate) -> String {
    format!("{}{}", pascal_case(table), template.component_suffix())
}

/// Prompt for `schema` stamped with the current time
pub fn generate_prompt(schema: &TableSchema, options: &GenerationOptions) -> String {
    generate_prompt_at(schema, options, Utc::now())
}

/// Prompt for `schema` stamped with `now`
pub fn generate_prompt_at(schema: &TableSchema, options: &GenerationOptions, now: DateTime<Utc>) -> String {
    let p = phrases(options.language);
    let table = &schema.table;
    let template = options.prompt_template;
    let component = component_name(table, template);
    let mut w = CodeWriter::new();

    w.line(format!("# {}: `{table}`", p.title));
    w.blank();
    w.line(p.role);
    w.blank();
    w.line(format!("## {}", p.rules_heading));
    w.blank();
    numbered(&mut w, p.rules);
    w.blank();
    w.line(format!("## {}", p.ui_heading));
    w.blank();
    bullets(&mut w, p.ui_rules);
    w.blank();
    w.line(format!("## {}", p.context_heading));
    w.blank();
    schema_context(&mut w, schema, p, now);
    w.blank();

    let (task, requirements) = match template {
        PromptTemplate::Form => (p.form_task, p.form_requirements),
        PromptTemplate::Table => (p.table_task, p.table_requirements),
        PromptTemplate::Crud => (p.crud_task, p.crud_requirements),
    };
    w.line(format!("## {}", p.task_heading));
    w.blank();
    w.line(format!("{task} `{table}`."));
    w.blank();
    w.line(format!("### {}", p.requirements));
    w.blank();
    bullets(&mut w, requirements);
    w.blank();

    w.line(format!("## {}", p.output_heading));
    w.blank();
    let dir = template.component_dir();
    let mut files = vec![
        format!("**{}** (`types/{table}.ts`)", p.types_file),
        format!("**{}** (`components/{dir}/{component}.tsx`)", p.component_file),
    ];
    if options.include_tests {
        files.push(format!("**{}** (`components/__tests__/{component}.test.tsx`)", p.tests_file));
    }
    if options.include_documentation {
        files.push(format!("**{}** (`components/{dir}/README.md`)", p.docs_file));
    }
    for (i, file) in files.iter().enumerate() {
        w.line(format!("{}. {file}", i + 1));
    }

    if options.include_tests {
        w.blank();
        w.line(format!("## {}", p.tests_heading));
        w.blank();
        w.line(p.tests_task);
    }
    if options.include_documentation {
        w.blank();
        w.line(format!("## {}", p.docs_heading));
        w.blank();
        w.line(p.docs_task);
    }

    w.blank();
    w.line("---");
    w.blank();
    w.line(format!("**{}:** {}", p.note, p.note_text));

    w.finish()
}

fn schema_context(w: &mut CodeWriter, schema: &TableSchema, p: &Phrases, now: DateTime<Utc>) {
    w.line(format!("### {}: `{}`", p.current_table, schema.table));
    w.blank();
    w.line(format!("### {}", p.schema_details));
    w.blank();
    w.line("```json");
    w.lines(&pretty_json(schema));
    w.line("```");
    w.blank();

    w.line(format!("### {}", p.rls_heading));
    w.blank();
    for (operation, allowed) in schema.rls.operations() {
        w.line(format!(
            "- **{operation}**: {}",
            if allowed { p.allowed } else { p.forbidden }
        ));
    }
    w.blank();

    w.line(format!("### {}", p.fk_heading));
    w.blank();
    let mut any = false;
    for (column, fk) in schema.foreign_keys() {
        any = true;
        w.line(format!("- `{}` → `{fk}`", column.name));
    }
    if !any {
        w.line(format!("- {}", p.no_foreign_keys));
    }
    w.blank();

    w.line(format!("### {}", p.rules_summary_heading));
    w.blank();
    let mut any = false;
    for column in schema.constrained_columns() {
        any = true;
        let mut rules = Vec::new();
        if column.not_null {
            rules.push("NOT NULL".to_string());
        }
        if let Some(check) = &column.check {
            rules.push(format!("CHECK: {check}"));
        }
        if let Some(values) = column.enum_values() {
            rules.push(format!("ENUM: [{}]", values.join(", ")));
        }
        w.line(format!("- `{}`: {}", column.name, rules.join(", ")));
    }
    if !any {
        w.line(format!("- {}", p.no_rules));
    }
    w.blank();

    w.line(format!(
        "### {}: {}",
        p.timestamp,
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
    ));
}

fn pretty_json(schema: &TableSchema) -> String {
    // Plain data with string keys always serializes
    serde_json::to_string_pretty(schema).unwrap_or_default()
}

fn numbered(w: &mut CodeWriter, items: &[&str]) {
    for (i, item) in items.iter().enumerate() {
        w.line(format!("{}. {item}", i + 1));
    }
}

fn bullets(w: &mut CodeWriter, items: &[&str]) {
    for item in items {
        w.line(format!("- {item}"));
    }
}

/// Short prompt for a one-off component
pub fn quick_prompt(schema: &TableSchema, template: PromptTemplate, language: Language) -> String {
    let rls = serde_json::to_string(&schema.rls).unwrap_or_default();
    let labels = language.pick("German", "English");
    let mut w = CodeWriter::new();

    w.line("# Quick Component Generator");
    w.blank();
    w.line(format!(
        "Generate the React component `{}` for table `{}`.",
        component_name(&schema.table, template),
        schema.table
    ));
    w.blank();
    w.line("## Schema");
    w.blank();
    w.line("```json");
    w.lines(&pretty_json(schema));
    w.line("```");
    w.blank();
    w.line("## Requirements");
    w.blank();
    bullets(
        &mut w,
        &[
            "Use only fields from the schema",
            &format!("Respect RLS policies: {rls}"),
            "Include TypeScript types",
            "Use Material-UI and Tailwind CSS",
            &format!("{labels} labels and messages"),
            "Responsive design",
        ],
    );
    w.blank();
    w.line("Generate the component now.");

    w.finish()
}

/// Prompt asking for an analysis of the schema itself
pub fn debug_prompt(schema: &TableSchema) -> String {
    let mut w = CodeWriter::new();

    w.line("# Schema Debug Analysis");
    w.blank();
    w.line(format!("Analyze the schema of table `{}` and provide insights.", schema.table));
    w.blank();
    w.line("## Schema");
    w.blank();
    w.line("```json");
    w.lines(&pretty_json(schema));
    w.line("```");
    w.blank();
    w.line("## Questions");
    w.blank();
    numbered(
        &mut w,
        &[
            "What are the primary business entities?",
            "What are the foreign key relationships?",
            "What RLS policies are in place?",
            "What validation rules exist?",
            "What UI components would be needed?",
            "Are there potential issues or improvements?",
        ],
    );
    w.blank();
    w.line("Provide a detailed analysis.");

    w.finish()
}
