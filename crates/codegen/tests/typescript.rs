use schemaforge_codegen::generate_types;
use schemaforge_core::schema::{RowLevelSecurity, TableSchema};
use schemaforge_macros::column;

fn invoices() -> TableSchema {
    TableSchema::new(
        "invoices",
        vec![
            column!("id: uuid primary"),
            column!("customer_id: string fk(customers.id)"),
            column!("amount: numeric not_null check(amount > 0)"),
            column!("status: string enum(open, paid, overdue)"),
        ],
        RowLevelSecurity::append_only(),
    )
}

/// Lines between `open` and the next line that is exactly `close`
fn section<'a>(text: &'a str, open: &str, close: &str) -> Vec<&'a str> {
    text.lines()
        .skip_while(|line| !line.starts_with(open))
        .skip(1)
        .take_while(|line| *line != close)
        .map(str::trim)
        .collect()
}

#[test]
fn test_interface_has_one_entry_per_column_in_order() {
    let types = generate_types(&invoices());

    assert_eq!(
        section(&types, "export interface Invoices {", "}"),
        [
            "id: string;",
            "customer_id?: string;",
            "amount: number;",
            "status?: InvoicesStatus;",
        ]
    );
}

#[test]
fn test_enum_type_lists_exactly_the_values() {
    let types = generate_types(&invoices());

    assert!(types.contains("export type InvoicesStatus = 'open' | 'paid' | 'overdue';"));
    assert!(types.contains("export const InvoicesStatusValues: readonly InvoicesStatus[] = ['open', 'paid', 'overdue'];"));
}

#[test]
fn test_zod_schema() {
    let types = generate_types(&invoices());

    assert!(types.starts_with("// Types for the `invoices` table.\nimport { z } from 'zod';\n"));
    assert_eq!(
        section(&types, "export const InvoicesSchema = z.object({", "});"),
        [
            "id: z.string().uuid(),",
            "customer_id: z.string().optional(),",
            "amount: z.number().positive(),",
            "status: z.enum(['open', 'paid', 'overdue']).optional(),",
        ]
    );
    assert!(types.contains("export const InvoicesInputSchema = InvoicesSchema.omit({ id: true });"));
    assert!(types.contains("export type InvoicesInput = z.infer<typeof InvoicesInputSchema>;"));
}

#[test]
fn test_all_declared_types() {
    let schema = TableSchema::new(
        "samples",
        vec![
            column!("label: string not_null"),
            column!("ratio: numeric"),
            column!("count: integer not_null"),
            column!("active: boolean not_null"),
            column!("seen_at: timestamp"),
            column!("ref: uuid"),
            column!("payload: jsonb"),
        ],
        RowLevelSecurity::allow_all(),
    );

    let types = generate_types(&schema);

    assert_eq!(
        section(&types, "export interface Samples {", "}"),
        [
            "label: string;",
            "ratio?: number;",
            "count: number;",
            "active: boolean;",
            "seen_at?: string;",
            "ref?: string;",
            "payload?: string;",
        ]
    );
    assert!(types.contains("count: z.number().int(),"));
    assert!(types.contains("ref: z.string().uuid().optional(),"));
    assert!(types.contains("export const SamplesInputSchema = SamplesSchema;"));
}

#[test]
fn test_untranslatable_checks_are_kept_as_comments() {
    let schema = TableSchema::new(
        "orders",
        vec![column!("total: numeric not_null check(total >= 0 AND total <> discount)")],
        RowLevelSecurity::allow_all(),
    );

    let types = generate_types(&schema);

    assert!(types.contains("// CHECK not enforced: total <> discount\n  total: z.number().nonnegative(),"));
}

#[test]
fn test_odd_column_names_are_quoted() {
    let schema = TableSchema::new(
        "line_items",
        vec![column!("unit-price: numeric not_null")],
        RowLevelSecurity::allow_all(),
    );

    let types = generate_types(&schema);

    assert!(types.contains("export interface LineItems {\n  'unit-price': number;\n}"));
}

#[test]
fn test_output_is_deterministic() {
    assert_eq!(generate_types(&invoices()), generate_types(&invoices()));
}
