//! Built-in natural-language labels.
//!
//! Lookups fall back to the raw table or column name when nothing is mapped.

use crate::options::Language;

/// Labels shown for a table as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLabels {
    pub singular: String,
    pub plural: String,
    pub create: String,
    pub edit: String,
    pub description: String,
}

struct TableEntry {
    table: &'static str,
    de: [&'static str; 5],
    en: [&'static str; 5],
}

const TABLES: &[TableEntry] = &[
    TableEntry {
        table: "invoices",
        de: [
            "Rechnung",
            "Rechnungen",
            "Neue Rechnung erstellen",
            "Rechnung bearbeiten",
            "Rechnungsdaten eingeben und speichern",
        ],
        en: [
            "Invoice",
            "Invoices",
            "Create New Invoice",
            "Edit Invoice",
            "Enter and save invoice data",
        ],
    },
    TableEntry {
        table: "customers",
        de: [
            "Kunde",
            "Kunden",
            "Neuen Kunden erstellen",
            "Kunde bearbeiten",
            "Kundendaten eingeben und speichern",
        ],
        en: [
            "Customer",
            "Customers",
            "Create New Customer",
            "Edit Customer",
            "Enter and save customer data",
        ],
    },
];

const COLUMNS: &[(&str, &str, &str)] = &[
    ("id", "ID", "ID"),
    ("name", "Name", "Name"),
    ("email", "E-Mail", "Email"),
    ("amount", "Betrag", "Amount"),
    ("status", "Status", "Status"),
    ("created_at", "Erstellt am", "Created at"),
    ("updated_at", "Aktualisiert am", "Updated at"),
];

pub fn table_labels(table: &str, language: Language) -> TableLabels {
    let Some(entry) = TABLES.iter().find(|entry| entry.table == table) else {
        return TableLabels {
            singular: table.to_string(),
            plural: table.to_string(),
            create: table.to_string(),
            edit: table.to_string(),
            description: table.to_string(),
        };
    };

    let [singular, plural, create, edit, description] = match language {
        Language::De => entry.de,
        Language::En => entry.en,
    };

    TableLabels {
        singular: singular.to_string(),
        plural: plural.to_string(),
        create: create.to_string(),
        edit: edit.to_string(),
        description: description.to_string(),
    }
}

pub fn column_label(column: &str, language: Language) -> String {
    COLUMNS
        .iter()
        .find(|(name, _, _)| *name == column)
        .map(|(_, de, en)| language.pick(de, en).to_string())
        .unwrap_or_else(|| column.to_string())
}

/// UI strings used by the component generators.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    pub note: &'static str,
    pub edit_forbidden: &'static str,
    pub delete_forbidden: &'static str,
    pub insert_forbidden: &'static str,
    pub save: &'static str,
    pub saving: &'static str,
    pub cancel: &'static str,
    pub save_failed: &'static str,
    pub search: &'static str,
    pub actions: &'static str,
    pub no_data: &'static str,
    pub view: &'static str,
    pub edit: &'static str,
    pub delete: &'static str,
    pub rows_per_page: &'static str,
    pub of: &'static str,
    pub more_than: &'static str,
    pub select_placeholder: &'static str,
    pub required: &'static str,
}

const DE: Messages = Messages {
    note: "Hinweis:",
    edit_forbidden: "Daten können nach dem Erstellen nicht mehr bearbeitet werden (RLS-Richtlinie).",
    delete_forbidden: "Datensätze können nicht gelöscht werden (RLS-Richtlinie).",
    insert_forbidden: "Neue Datensätze können nicht angelegt werden (RLS-Richtlinie).",
    save: "Speichern",
    saving: "Speichern...",
    cancel: "Abbrechen",
    save_failed: "Fehler beim Speichern:",
    search: "Suche...",
    actions: "Aktionen",
    no_data: "Keine Daten gefunden",
    view: "Anzeigen",
    edit: "Bearbeiten",
    delete: "Löschen",
    rows_per_page: "Zeilen pro Seite:",
    of: "von",
    more_than: "mehr als",
    select_placeholder: "Bitte wählen",
    required: "Pflichtfeld",
};

const EN: Messages = Messages {
    note: "Note:",
    edit_forbidden: "Data cannot be edited after creation (RLS policy).",
    delete_forbidden: "Records cannot be deleted (RLS policy).",
    insert_forbidden: "New records cannot be created (RLS policy).",
    save: "Save",
    saving: "Saving...",
    cancel: "Cancel",
    save_failed: "Error while saving:",
    search: "Search...",
    actions: "Actions",
    no_data: "No data found",
    view: "View",
    edit: "Edit",
    delete: "Delete",
    rows_per_page: "Rows per page:",
    of: "of",
    more_than: "more than",
    select_placeholder: "Please select",
    required: "Required",
};

pub fn messages(language: Language) -> &'static Messages {
    match language {
        Language::De => &DE,
        Language::En => &EN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_table_labels() {
        let de = table_labels("invoices", Language::De);
        assert_eq!(de.plural, "Rechnungen");
        assert_eq!(de.create, "Neue Rechnung erstellen");

        let en = table_labels("customers", Language::En);
        assert_eq!(en.edit, "Edit Customer");
    }

    #[test]
    fn unknown_table_falls_back_to_name() {
        let labels = table_labels("stock_corrections", Language::En);
        assert_eq!(labels.singular, "stock_corrections");
        assert_eq!(labels.description, "stock_corrections");
    }

    #[test]
    fn column_labels() {
        assert_eq!(column_label("email", Language::De), "E-Mail");
        assert_eq!(column_label("email", Language::En), "Email");
        assert_eq!(column_label("created_at", Language::De), "Erstellt am");
        assert_eq!(column_label("customer_id", Language::De), "customer_id");
    }

    #[test]
    fn advisory_text_per_language() {
        assert!(messages(Language::En).edit_forbidden.contains("cannot be edited after creation"));
        assert!(messages(Language::De).edit_forbidden.contains("nicht mehr bearbeitet"));
    }
}
