pub mod zod;

use schemaforge_core::schema::{ColumnType, TableSchema};

use crate::ir::ComponentModel;
use crate::options::GenerationOptions;
use crate::writer::{ts_key, ts_string, CodeWriter};

/// TypeScript primitive for a declared column type
pub fn ts_type(column_type: &ColumnType) -> &'static str {
    match column_type {
        ColumnType::Numeric | ColumnType::Integer => "number",
        ColumnType::Boolean => "boolean",
        // ISO 8601 text as delivered by the API
        ColumnType::Timestamp => "string",
        ColumnType::String | ColumnType::Uuid | ColumnType::Other(_) => "string",
    }
}

/// Type declarations and zod schema for `schema`.
///
/// Output depends only on the schema; labels and styling play no part.
pub fn generate_types(schema: &TableSchema) -> String {
    let model = ComponentModel::new(schema, &GenerationOptions::default());
    render_types(&model)
}

pub(crate) fn render_types(model: &ComponentModel) -> String {
    let class = &model.class_name;
    let mut w = CodeWriter::new();

    w.line(format!("// Types for the `{}` table.", model.table));
    w.line("import { z } from 'zod';");
    w.blank();

    for field in model.enum_fields() {
        let (Some(alias), Some(values)) = (&field.enum_type, &field.enum_values) else {
            continue;
        };
        let quoted: Vec<String> = values.iter().map(|v| ts_string(v)).collect();
        w.line(format!("export type {alias} = {};", quoted.join(" | ")));
        w.line(format!(
            "export const {alias}Values: readonly {alias}[] = [{}];",
            quoted.join(", ")
        ));
        w.blank();
    }

    w.block(&format!("export interface {class} {{"), "}", |w| {
        for field in &model.fields {
            let marker = if field.optional { "?" } else { "" };
            w.line(format!("{}{marker}: {};", ts_key(&field.name), field.ts_type));
        }
    });
    w.blank();

    w.block(
        &format!("export const {} = z.object({{", model.schema_name()),
        "});",
        |w| {
            for field in &model.fields {
                for clause in &field.zod.unenforced {
                    w.line(format!("// CHECK not enforced: {clause}"));
                }
                w.line(format!("{}: {},", ts_key(&field.name), field.zod.chain));
            }
        },
    );
    w.blank();

    let keys: Vec<String> = model
        .primary_keys()
        .map(|field| format!("{}: true", ts_key(&field.name)))
        .collect();
    if keys.is_empty() {
        w.line(format!(
            "export const {} = {};",
            model.input_schema_name(),
            model.schema_name()
        ));
    } else {
        w.line(format!(
            "export const {} = {}.omit({{ {} }});",
            model.input_schema_name(),
            model.schema_name(),
            keys.join(", ")
        ));
    }
    w.line(format!(
        "export type {} = z.infer<typeof {}>;",
        model.input_type_name(),
        model.input_schema_name()
    ));

    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mapping() {
        assert_eq!(ts_type(&ColumnType::Numeric), "number");
        assert_eq!(ts_type(&ColumnType::Integer), "number");
        assert_eq!(ts_type(&ColumnType::Boolean), "boolean");
        assert_eq!(ts_type(&ColumnType::Timestamp), "string");
        assert_eq!(ts_type(&ColumnType::Uuid), "string");
        assert_eq!(ts_type(&ColumnType::Other("jsonb".into())), "string");
    }

    #[test]
    fn mapping_is_stable() {
        let types = [
            ColumnType::String,
            ColumnType::Numeric,
            ColumnType::Integer,
            ColumnType::Boolean,
            ColumnType::Timestamp,
            ColumnType::Uuid,
        ];
        for column_type in types {
            let reparsed = ColumnType::from(column_type.as_str());
            assert_eq!(ts_type(&column_type), ts_type(&reparsed));
        }
    }
}
