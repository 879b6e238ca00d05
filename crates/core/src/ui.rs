//! Presentation metadata from the UI-metadata server.
//!
//! This is an optional overlay on a [`TableSchema`](crate::schema::TableSchema):
//! labels, placeholders, display order and visibility per field. Only the
//! parts the generators use are modelled; unknown keys are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SchemaError, SchemaResult};

/// UI metadata of one table, as served by `/api/ui/complete/<table>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiMetadata {
    pub table_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<UiView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<UiView>,
}

/// Table or form section of [`UiMetadata`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub fields: Vec<UiField>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiField {
    pub field_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<UiOption>>,
}

/// Display label of one allowed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiOption {
    pub value: String,
    pub label: String,
}

impl UiMetadata {
    /// Metadata of `name`, taken from the form section first, then the table section
    pub fn field(&self, name: &str) -> Option<&UiField> {
        [&self.form, &self.table]
            .into_iter()
            .flatten()
            .find_map(|view| view.fields.iter().find(|field| field.field_name == name))
    }

    /// Display name of the table, preferring the table section
    pub fn display_name(&self) -> Option<&str> {
        [&self.table, &self.form]
            .into_iter()
            .flatten()
            .find_map(|view| view.display_name.as_deref())
    }
}

impl UiField {
    /// Label for the option with `value`, if the server provides one
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .as_deref()?
            .iter()
            .find(|option| option.value == value)
            .map(|option| option.label.as_str())
    }
}

/// Parses a UI-metadata body for `table`.
///
/// Accepts the bare metadata object or the server's `{ success, data }`
/// envelope. An envelope with `success: false` or a different `table_name` is
/// a shape mismatch.
pub fn parse_ui_metadata(table: &str, body: &str) -> SchemaResult<UiMetadata> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| SchemaError::shape(table, format!("UI metadata is not valid JSON: {e}")))?;

    let value = match value {
        Value::Object(mut root) if root.contains_key("success") => {
            if root.get("success") != Some(&Value::Bool(true)) {
                return Err(SchemaError::shape(table, "UI metadata response reports failure"));
            }
            root.remove("data")
                .ok_or_else(|| SchemaError::shape(table, "UI metadata envelope has no data"))?
        }
        other => other,
    };

    let metadata: UiMetadata = serde_json::from_value(value)
        .map_err(|e| SchemaError::shape(table, format!("UI metadata: {e}")))?;
    if metadata.table_name != table {
        return Err(SchemaError::shape(
            table,
            format!("UI metadata is for '{}', expected '{table}'", metadata.table_name),
        ));
    }
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invoices() -> Value {
        json!({
            "table_name": "invoices",
            "has_table": true,
            "table": {
                "display_name": "Rechnungsübersicht",
                "fields": [{ "field_name": "amount", "label": "Summe", "order": 1 }]
            },
            "form": {
                "display_name": "Rechnung",
                "layout": "vertical",
                "fields": [
                    { "field_name": "amount", "label": "Betrag (EUR)", "order": 2, "ui_component": "number" },
                    {
                        "field_name": "status",
                        "order": 1,
                        "options": [{ "value": "open", "label": "Offen", "color": "warning" }]
                    }
                ]
            }
        })
    }

    #[test]
    fn accepts_envelope_and_bare_object() {
        let bare = parse_ui_metadata("invoices", &invoices().to_string()).unwrap();
        let wrapped = json!({ "success": true, "data": invoices() }).to_string();
        assert_eq!(parse_ui_metadata("invoices", &wrapped).unwrap(), bare);
    }

    #[test]
    fn form_fields_take_precedence() {
        let ui = parse_ui_metadata("invoices", &invoices().to_string()).unwrap();

        assert_eq!(ui.field("amount").and_then(|f| f.label.as_deref()), Some("Betrag (EUR)"));
        assert_eq!(ui.field("status").and_then(|f| f.option_label("open")), Some("Offen"));
        assert_eq!(ui.field("status").and_then(|f| f.option_label("paid")), None);
        assert!(ui.field("customer_id").is_none());
        assert_eq!(ui.display_name(), Some("Rechnungsübersicht"));
    }

    #[test]
    fn rejects_failed_or_foreign_responses() {
        let failed = json!({ "success": false, "error": "unknown table" }).to_string();
        assert!(parse_ui_metadata("invoices", &failed).unwrap_err().is_shape_error());

        let other = parse_ui_metadata("customers", &invoices().to_string()).unwrap_err();
        assert!(other.to_string().contains("expected 'customers'"));
    }
}
