use schemaforge_codegen::{
    generate_artifact, generate_artifact_with, generate_documentation, generate_form, generate_table, generate_tests, ComponentKind,
    GenerationOptions, Language, Styling,
};
use schemaforge_core::schema::{IndexDescriptor, RowLevelSecurity, TableSchema, TriggerDescriptor};
use schemaforge_core::ui::parse_ui_metadata;
use serde_json::json;
use schemaforge_macros::column;

fn invoices() -> TableSchema {
    TableSchema::new(
        "invoices",
        vec![
            column!("id: uuid primary"),
            column!("customer_id: string fk(customers.id)"),
            column!("amount: numeric not_null"),
            column!("status: string enum(open, paid, overdue)"),
        ],
        RowLevelSecurity::append_only(),
    )
}

fn customers() -> TableSchema {
    TableSchema::new(
        "customers",
        vec![
            column!("id: uuid primary not_null"),
            column!("name: string not_null check(length(name) <= 100)"),
            column!("email: string not_null"),
            column!("vip: boolean not_null default(false)"),
            column!("created_at: timestamp default(now())"),
        ],
        RowLevelSecurity::allow_all(),
    )
}

fn english() -> GenerationOptions {
    GenerationOptions::new().language(Language::En)
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn test_invoices_form_warns_about_editing() {
    let de = generate_form(&invoices(), &GenerationOptions::default());
    assert!(de.contains("Daten können nach dem Erstellen nicht mehr bearbeitet werden (RLS-Richtlinie)."));

    let en = generate_form(&invoices(), &english());
    assert!(en.contains("Data cannot be edited after creation (RLS policy)."));
    assert!(en.contains("Records cannot be deleted (RLS policy)."));
}

#[test]
fn test_form_without_restrictions_has_no_advisory() {
    let form = generate_form(&customers(), &english());

    assert!(!form.contains("RLS policy"));
    assert!(!form.contains("<Alert"));
}

#[test]
fn test_delete_only_restriction() {
    let mut schema = customers();
    schema.rls.delete = false;

    let form = generate_form(&schema, &english());

    assert!(form.contains("Records cannot be deleted (RLS policy)."));
    assert!(!form.contains("Data cannot be edited after creation"));
}

#[test]
fn test_form_has_one_controller_per_editable_column() {
    let form = generate_form(&invoices(), &GenerationOptions::default());

    assert_eq!(count(&form, "<Controller"), 3);
    assert_eq!(count(&form, "name=\"customer_id\""), 1);
    assert_eq!(count(&form, "name=\"amount\""), 1);
    assert_eq!(count(&form, "name=\"status\""), 1);
    assert!(!form.contains("name=\"id\""));
    assert!(!form.contains("name=\"invented\""));
}

#[test]
fn test_form_fields() {
    let form = generate_form(&invoices(), &GenerationOptions::default());

    assert!(form.contains("export const InvoicesForm: React.FC<InvoicesFormProps>"));
    assert!(form.contains("resolver: zodResolver(InvoicesInputSchema),"));
    assert!(form.contains("import { InvoicesInputSchema, type Invoices, type InvoicesInput, InvoicesStatusValues } from '../types/invoices';"));
    assert!(form.contains("label=\"Betrag\""));
    assert!(form.contains("label=\"customer_id\""));
    assert!(form.contains("{InvoicesStatusValues.map((option) => ("));
    assert!(form.contains("helperText={errors.customer_id?.message ?? '→ customers.id'}"));
    assert!(form.contains("{isEditing ? 'Rechnung bearbeiten' : 'Neue Rechnung erstellen'}"));
    assert!(form.contains("const isEditing = initialData?.id !== undefined;"));
}

#[test]
fn test_form_default_values() {
    let form = generate_form(&customers(), &english());

    assert!(form.contains("      name: '',\n"));
    assert!(form.contains("      vip: false,\n"));
    assert!(form.contains("      created_at: new Date().toISOString().slice(0, 16),\n"));
    assert!(form.contains("      ...initialData,\n"));
    assert!(!form.contains("      id: "));
}

#[test]
fn test_form_input_kinds() {
    let form = generate_form(&customers(), &english());

    assert!(form.contains("<Checkbox"));
    assert!(form.contains("type=\"datetime-local\""));
    assert!(form.contains("label=\"Email\""));
    assert!(form.contains("label=\"Created at\""));
    assert!(form.contains("'Create New Customer'"));
}

#[test]
fn test_styling_controls_tailwind() {
    let schema = invoices();

    let both = generate_form(&schema, &GenerationOptions::default());
    assert!(both.contains("import 'tailwindcss/tailwind.css';"));
    assert!(both.contains("className="));

    let mui = generate_form(&schema, &GenerationOptions::new().styling(Styling::MaterialUi));
    assert!(!mui.contains("tailwindcss"));
    assert!(!mui.contains("className="));
    assert!(mui.contains("@mui/material"));
}

#[test]
fn test_table_has_every_column_once() {
    let table = generate_table(&invoices(), &GenerationOptions::default());

    assert!(table.contains("type SortField = 'id' | 'customer_id' | 'amount' | 'status';"));
    for name in ["id", "customer_id", "amount", "status"] {
        assert_eq!(count(&table, &format!("onClick={{() => handleSort('{name}')}}")), 1, "{name}");
    }
    assert_eq!(count(&table, "<TableSortLabel"), 4);
    assert!(table.contains("<TableCell colSpan={5} align=\"center\""));
}

#[test]
fn test_table_actions_follow_rls() {
    let restricted = generate_table(&invoices(), &english());
    assert!(restricted.contains("onView?: (row: Invoices) => void;"));
    assert!(!restricted.contains("onEdit"));
    assert!(!restricted.contains("onDelete"));

    let open = generate_table(&customers(), &english());
    assert!(open.contains("onEdit?: (row: Customers) => void;"));
    assert!(open.contains("onDelete?: (row: Customers) => void;"));
    assert!(open.contains("<Tooltip title=\"Delete\">"));
}

#[test]
fn test_table_cells() {
    let table = generate_table(&customers(), &GenerationOptions::default());

    assert!(table.contains("useState<SortField>('created_at')"));
    assert!(table.contains("{new Date(row.created_at).toLocaleDateString('de-DE')}"));
    assert!(table.contains("{new Date(row.created_at).toLocaleTimeString('de-DE')}"));
    assert!(table.contains("<TableRow key={String(row.id)}"));
    assert!(table.contains("Kunden"));
    assert!(table.contains("labelRowsPerPage=\"Zeilen pro Seite:\""));
}

#[test]
fn test_generated_tests_reference_fields() {
    let tests = generate_tests(&invoices(), &english());

    assert!(tests.contains("describe('InvoicesForm', () => {"));
    assert!(tests.contains("describe('InvoicesTable', () => {"));
    assert!(tests.contains("customer_id: 'Test customer_id',"));
    assert!(tests.contains("amount: 100,"));
    assert!(tests.contains("status: 'open',"));
    assert!(tests.contains("expect(screen.getByLabelText(/^Amount/)).toBeInTheDocument();"));
    assert!(tests.contains("screen.getByText('Data cannot be edited after creation (RLS policy).', { exact: false })"));
    assert!(tests.contains("it('passes the row to onView'"));
    assert!(!tests.contains("it('passes the row to onDelete'"));
}

#[test]
fn test_generated_tests_follow_component_kind() {
    let options = english().component(ComponentKind::Table);
    let tests = generate_tests(&invoices(), &options);

    assert!(!tests.contains("InvoicesForm"));
    assert!(tests.contains("describe('InvoicesTable', () => {"));
}

#[test]
fn test_documentation() {
    let mut schema = customers();
    schema.indexes = Some(vec![IndexDescriptor {
        name: "customers_email_key".into(),
        definition: Some("UNIQUE (email)".into()),
    }]);
    schema.triggers = Some(vec![TriggerDescriptor {
        name: "touch_updated_at".into(),
        event: Some("UPDATE".into()),
        function: None,
    }]);

    let docs = generate_documentation(&schema, &GenerationOptions::default());

    assert!(docs.starts_with("# Customers Komponenten\n"));
    assert!(docs.contains("| `name` | `string` | Ja | Name; Prüfung: `length(name) <= 100` |"));
    assert!(docs.contains("| `created_at` | `timestamp` | Nein | Erstellt am; Standard: `now()` |"));
    assert!(docs.contains("- **DELETE**: ✅ Erlaubt"));
    assert!(docs.contains("- `customers_email_key`: `UNIQUE (email)`"));
    assert!(docs.contains("- `touch_updated_at`: UPDATE"));
    assert!(docs.contains("<CustomersTable rows={rows} onView={handleView} onEdit={handleEdit} onDelete={handleDelete} />"));
}

#[test]
fn test_documentation_in_english() {
    let docs = generate_documentation(&invoices(), &english());

    assert!(docs.contains("- **UPDATE**: ❌ Forbidden"));
    assert!(docs.contains("| `customer_id` | `string` | No | customer_id; references `customers.id` |"));
    assert!(docs.contains("allowed values: open, paid, overdue"));
    assert!(docs.contains("> Data cannot be edited after creation (RLS policy)."));
}

#[test]
fn test_artifact_follows_options() {
    let minimal = generate_artifact(&invoices(), &GenerationOptions::new().component(ComponentKind::Form));
    assert_eq!(minimal.table, "invoices");
    assert!(minimal.form.is_some());
    assert!(minimal.table_component.is_none());
    assert!(minimal.tests.is_none());
    assert!(minimal.documentation.is_none());
    assert!(minimal.types.contains("export type InvoicesStatus = 'open' | 'paid' | 'overdue';"));
    assert!(minimal.prompt.contains("`invoices`"));

    let full = generate_artifact(
        &invoices(),
        &GenerationOptions::new().with_tests().with_documentation(),
    );
    assert!(full.form.is_some());
    assert!(full.table_component.is_some());
    assert!(full.tests.is_some());
    assert!(full.documentation.is_some());
}

#[test]
fn test_ui_metadata_shapes_form_and_table() {
    let ui = json!({
        "success": true,
        "data": {
            "table_name": "invoices",
            "table": { "display_name": "Offene Posten", "fields": [] },
            "form": {
                "fields": [
                    { "field_name": "amount", "label": "Betrag (EUR)", "placeholder": "0,00", "order": 1 },
                    {
                        "field_name": "status",
                        "order": 2,
                        "readonly": true,
                        "options": [{ "value": "open", "label": "Offen" }]
                    },
                    { "field_name": "customer_id", "hidden": true }
                ]
            }
        }
    });
    let ui = parse_ui_metadata("invoices", &ui.to_string()).unwrap();
    let artifact = generate_artifact_with(
        &invoices(),
        Some(&ui),
        &GenerationOptions::default(),
        chrono::Utc::now(),
    );

    let form = artifact.form.unwrap();
    assert!(form.contains("label=\"Betrag (EUR)\""));
    assert!(form.contains("placeholder=\"0,00\""));
    assert_eq!(count(&form, "InputProps={{ readOnly: true }}"), 1);
    assert!(form.contains("<MenuItem key=\"open\" value=\"open\">"));
    assert!(form.contains("Offen"));
    assert!(!form.contains("InvoicesStatusValues"));
    // Hidden fields keep their default value but get no input
    assert!(form.contains("customer_id: '',"));
    assert!(!form.contains("name=\"customer_id\""));
    let amount = form.find("name=\"amount\"").unwrap();
    let status = form.find("name=\"status\"").unwrap();
    assert!(amount < status);

    let table = artifact.table_component.unwrap();
    assert!(table.contains("Offene Posten"));
    assert!(table.contains("Betrag (EUR)"));
    assert!(table.find("Betrag (EUR)").unwrap() < table.find("handleSort('id')").unwrap());
    assert!(table.contains("handleSort('customer_id')"));

    // Types stay in schema order
    let types = artifact.types;
    assert!(types.find("id: string").unwrap() < types.find("amount: number").unwrap());
}
