//! Intermediate representation shared by every generator.
//!
//! A [`ComponentModel`] is derived once from a schema and the generation
//! options; the printers in [`crate::typescript`], [`crate::components`] and
//! [`crate::prompt`] only format it.

use std::sync::LazyLock;

use regex::Regex;
use schemaforge_core::schema::{ColumnType, ForeignKey, RowLevelSecurity, TableSchema};
use schemaforge_core::ui::UiMetadata;

use crate::labels::{self, Messages, TableLabels};
use crate::options::{GenerationOptions, Language, Styling};
use crate::typescript::{self, zod::ZodField};
use crate::writer::{pascal_case, ts_access, ts_string};

/// HTML input used to edit a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Number,
    Checkbox,
    DateTime,
    Select,
}

impl InputKind {
    fn for_column(column_type: &ColumnType, is_enum: bool) -> Self {
        if is_enum {
            return Self::Select;
        }
        match column_type {
            ColumnType::Numeric | ColumnType::Integer => Self::Number,
            ColumnType::Boolean => Self::Checkbox,
            ColumnType::Timestamp => Self::DateTime,
            _ => Self::Text,
        }
    }

    /// Value of the `type` attribute on a text field
    pub fn html_type(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Checkbox => "checkbox",
            Self::DateTime => "datetime-local",
            Self::Text | Self::Select => "text",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldModel {
    pub name: String,
    pub label: String,
    pub column_type: ColumnType,
    /// TypeScript type of the field, an enum alias for enumerated columns
    pub ts_type: String,
    pub optional: bool,
    pub required: bool,
    pub primary: bool,
    pub enum_values: Option<Vec<String>>,
    /// Name of the generated enum alias, set for enumerated columns
    pub enum_type: Option<String>,
    pub foreign_key: Option<ForeignKey>,
    pub check: Option<String>,
    pub default: Option<String>,
    pub zod: ZodField,
    pub input: InputKind,
    /// TypeScript expression used as the form's initial value
    pub initial_value: String,
    /// TypeScript expression used in generated test data
    pub mock_value: String,
    pub placeholder: Option<String>,
    /// Display position from UI metadata; unordered fields come last
    pub order: Option<i64>,
    /// Left out of the form, still part of the types and the table
    pub hidden: bool,
    pub readonly: bool,
    /// `(value, label)` pairs for a select whose options carry display labels
    pub option_labels: Option<Vec<(String, String)>>,
}

impl FieldModel {
    pub fn is_timestamp(&self) -> bool {
        self.column_type == ColumnType::Timestamp
    }

    /// `object.field` with bracket access for non-identifier names
    pub fn access(&self, object: &str) -> String {
        ts_access(object, &self.name)
    }
}

#[derive(Debug, Clone)]
pub struct ComponentModel {
    pub table: String,
    pub class_name: String,
    pub labels: TableLabels,
    pub fields: Vec<FieldModel>,
    pub rls: RowLevelSecurity,
    pub language: Language,
    pub styling: Styling,
    pub messages: &'static Messages,
}

impl ComponentModel {
    pub fn new(schema: &TableSchema, options: &GenerationOptions) -> Self {
        Self::with_ui(schema, options, None)
    }

    /// Builds the model with an optional UI-metadata overlay.
    ///
    /// The overlay replaces labels and adds placeholders, display order,
    /// visibility and option labels. Names, types and validation always come
    /// from the schema.
    pub fn with_ui(schema: &TableSchema, options: &GenerationOptions, ui: Option<&UiMetadata>) -> Self {
        let class_name = pascal_case(&schema.table);
        let fields = schema
            .columns
            .iter()
            .map(|column| {
                let enum_values = column.enum_values().map(<[String]>::to_vec);
                let enum_type = enum_values
                    .as_ref()
                    .map(|_| format!("{class_name}{}", pascal_case(&column.name)));
                let ts_type = enum_type
                    .clone()
                    .unwrap_or_else(|| typescript::ts_type(&column.column_type).to_string());
                let input = InputKind::for_column(&column.column_type, enum_values.is_some());
                let initial_value =
                    initial_value(&column.column_type, column.default.as_deref(), enum_values.as_deref());
                let mock_value = mock_value(&column.name, &column.column_type, enum_values.as_deref());
                let overlay = ui.and_then(|ui| ui.field(&column.name));
                let option_labels = overlay
                    .filter(|field| field.options.is_some())
                    .zip(enum_values.as_ref())
                    .map(|(field, values)| {
                        values
                            .iter()
                            .map(|value| {
                                let label = field.option_label(value).unwrap_or(value);
                                (value.clone(), label.to_string())
                            })
                            .collect()
                    });

                FieldModel {
                    name: column.name.clone(),
                    label: overlay
                        .and_then(|field| field.label.clone())
                        .unwrap_or_else(|| labels::column_label(&column.name, options.language)),
                    column_type: column.column_type.clone(),
                    ts_type,
                    optional: column.is_optional(),
                    required: column.not_null,
                    primary: column.primary,
                    zod: ZodField::for_column(column),
                    enum_values,
                    enum_type,
                    foreign_key: column.foreign_key(),
                    check: column.check.clone(),
                    default: column.default.clone(),
                    input,
                    initial_value,
                    mock_value,
                    placeholder: overlay.and_then(|field| field.placeholder.clone()),
                    order: overlay.and_then(|field| field.order),
                    hidden: overlay.is_some_and(|field| field.hidden),
                    readonly: overlay.is_some_and(|field| field.readonly),
                    option_labels,
                }
            })
            .collect();

        let mut labels = labels::table_labels(&schema.table, options.language);
        if let Some(name) = ui.and_then(UiMetadata::display_name) {
            labels.plural = name.to_string();
        }

        Self {
            table: schema.table.clone(),
            labels,
            class_name,
            fields,
            rls: schema.rls,
            language: options.language,
            styling: options.styling,
            messages: labels::messages(options.language),
        }
    }

    /// Fields in display order: by UI order where given, then schema order
    pub fn display_fields(&self) -> Vec<&FieldModel> {
        let mut fields: Vec<&FieldModel> = self.fields.iter().collect();
        fields.sort_by_key(|field| (field.order.is_none(), field.order));
        fields
    }

    /// Fields the form shows, in display order; primary keys are never entered by hand
    pub fn form_fields(&self) -> impl Iterator<Item = &FieldModel> {
        self.display_fields()
            .into_iter()
            .filter(|field| !field.primary && !field.hidden)
    }

    /// Every field the form submits, hidden ones included
    pub fn editable_fields(&self) -> impl Iterator<Item = &FieldModel> {
        self.fields.iter().filter(|field| !field.primary)
    }

    pub fn primary_keys(&self) -> impl Iterator<Item = &FieldModel> {
        self.fields.iter().filter(|field| field.primary)
    }

    pub fn primary_key(&self) -> Option<&FieldModel> {
        self.primary_keys().next()
    }

    pub fn enum_fields(&self) -> impl Iterator<Item = &FieldModel> {
        self.fields.iter().filter(|field| field.enum_type.is_some())
    }

    /// Initial sort column of the table component: first timestamp, else the first column
    pub fn default_sort_field(&self) -> Option<&FieldModel> {
        self.fields
            .iter()
            .find(|field| field.is_timestamp())
            .or_else(|| self.fields.first())
    }

    /// Advisory sentences for operations the RLS flag-set forbids
    pub fn rls_advisories(&self) -> Vec<&'static str> {
        let mut advisories = Vec::new();
        if !self.rls.update {
            advisories.push(self.messages.edit_forbidden);
        }
        if !self.rls.delete {
            advisories.push(self.messages.delete_forbidden);
        }
        if !self.rls.insert {
            advisories.push(self.messages.insert_forbidden);
        }
        advisories
    }

    /// Whether the form shows an RLS advisory at all
    pub fn needs_rls_advisory(&self) -> bool {
        !self.rls.update || !self.rls.delete
    }

    /// ` className="..."` when Tailwind classes are emitted, empty otherwise
    pub fn class(&self, classes: &str) -> String {
        if self.styling.uses_tailwind() {
            format!(" className=\"{classes}\"")
        } else {
            String::new()
        }
    }

    pub fn types_module(&self) -> String {
        format!("../types/{}", self.table)
    }

    pub fn input_type_name(&self) -> String {
        format!("{}Input", self.class_name)
    }

    pub fn schema_name(&self) -> String {
        format!("{}Schema", self.class_name)
    }

    pub fn input_schema_name(&self) -> String {
        format!("{}InputSchema", self.class_name)
    }
}

static QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^'((?:[^']|'')*)'(?:::[\w\s]+)?$").expect("quoted default pattern")
});

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(?(-?\d+(?:\.\d+)?)\)?(?:::[\w\s]+)?$").expect("number default pattern")
});

static NOW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(now\(\)|current_timestamp|timezone\(.*now\(\)\))$").expect("now pattern")
});

/// Translates a SQL column default into a TypeScript literal, if it is a literal
pub fn default_literal(column_type: &ColumnType, default: &str) -> Option<String> {
    let default = default.trim();

    if let Some(caps) = QUOTED.captures(default) {
        let text = caps[1].replace("''", "'");
        return Some(match column_type {
            ColumnType::Numeric | ColumnType::Integer if NUMBER.is_match(&text) => text,
            ColumnType::Boolean => bool_literal(&text)?.to_string(),
            _ => ts_string(&text),
        });
    }

    if let Some(caps) = NUMBER.captures(default) {
        return Some(match column_type {
            ColumnType::Numeric | ColumnType::Integer => caps[1].to_string(),
            _ => ts_string(&caps[1]),
        });
    }

    if let Some(value) = bool_literal(default) {
        return Some(value.to_string());
    }

    if NOW.is_match(default) && *column_type == ColumnType::Timestamp {
        return Some("new Date().toISOString().slice(0, 16)".to_string());
    }

    None
}

fn bool_literal(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "t" => Some(true),
        "false" | "f" => Some(false),
        _ => None,
    }
}

fn initial_value(column_type: &ColumnType, default: Option<&str>, enum_values: Option<&[String]>) -> String {
    if let Some(literal) = default.and_then(|d| default_literal(column_type, d)) {
        return literal;
    }

    match (column_type, enum_values) {
        (_, Some([first, ..])) => ts_string(first),
        (ColumnType::Boolean, _) => "false".to_string(),
        (ColumnType::Numeric | ColumnType::Integer, _) => "0".to_string(),
        _ => "''".to_string(),
    }
}

fn mock_value(name: &str, column_type: &ColumnType, enum_values: Option<&[String]>) -> String {
    if let Some([first, ..]) = enum_values {
        return ts_string(first);
    }

    match column_type {
        ColumnType::Numeric => "100".to_string(),
        ColumnType::Integer => "1".to_string(),
        ColumnType::Boolean => "false".to_string(),
        ColumnType::Timestamp => ts_string("2024-01-15T10:30:00.000Z"),
        ColumnType::Uuid => ts_string("00000000-0000-4000-8000-000000000001"),
        ColumnType::String | ColumnType::Other(_) => ts_string(&format!("Test {name}")),
    }
}
