use schemaforge_core::schema::TableSchema;

use crate::ir::{ComponentModel, FieldModel, InputKind};
use crate::options::{ComponentKind, GenerationOptions};
use crate::writer::{ts_key, ts_string, CodeWriter};

/// Jest + Testing Library skeleton for the generated components.
///
/// The mock row carries a placeholder for every column so it satisfies the
/// generated interface.
pub fn generate_tests(schema: &TableSchema, options: &GenerationOptions) -> String {
    render_tests(&ComponentModel::new(schema, options), options.component)
}

pub(crate) fn render_tests(model: &ComponentModel, component: ComponentKind) -> String {
    let class = &model.class_name;
    let mut w = CodeWriter::new();

    w.line("import React from 'react';");
    w.line("import { render, screen, fireEvent, waitFor } from '@testing-library/react';");
    w.line("import { ThemeProvider, createTheme } from '@mui/material/styles';");
    if component.includes_form() {
        w.line(format!("import {{ {class}Form }} from '../forms/{class}Form';"));
    }
    if component.includes_table() {
        w.line(format!("import {{ {class}Table }} from '../tables/{class}Table';"));
    }
    w.line(format!("import type {{ {class} }} from '{}';", model.types_module()));
    w.blank();
    w.line("const theme = createTheme();");
    w.blank();
    w.line("const renderWithTheme = (component: React.ReactElement) =>");
    w.nested(|w| {
        w.line("render(<ThemeProvider theme={theme}>{component}</ThemeProvider>);");
    });
    w.blank();

    w.block(&format!("const mockRow: {class} = {{"), "};", |w| {
        for field in &model.fields {
            w.line(format!("{}: {},", ts_key(&field.name), field.mock_value));
        }
    });

    if component.includes_form() {
        w.blank();
        form_suite(&mut w, model);
    }
    if component.includes_table() {
        w.blank();
        table_suite(&mut w, model);
    }

    w.finish()
}

fn form_suite(w: &mut CodeWriter, model: &ComponentModel) {
    let class = &model.class_name;
    let msg = model.messages;
    let render = format!("renderWithTheme(<{class}Form onSubmit={{onSubmit}} onCancel={{onCancel}} />);");

    w.block(&format!("describe('{class}Form', () => {{"), "});", |w| {
        w.line("const onSubmit = jest.fn().mockResolvedValue(undefined);");
        w.line("const onCancel = jest.fn();");
        w.blank();
        w.block("beforeEach(() => {", "});", |w| {
            w.line("onSubmit.mockClear();");
            w.line("onCancel.mockClear();");
        });
        w.blank();

        w.block("it('renders the create title', () => {", "});", |w| {
            w.line(&render);
            w.line(format!(
                "expect(screen.getByText({})).toBeInTheDocument();",
                ts_string(&model.labels.create)
            ));
        });
        w.blank();

        w.block("it('renders a field for every editable column', () => {", "});", |w| {
            w.line(&render);
            for field in model.form_fields() {
                w.line(format!(
                    "expect(screen.getByLabelText({})).toBeInTheDocument();",
                    label_pattern(&field.label)
                ));
            }
        });

        if model.needs_rls_advisory() {
            w.blank();
            w.block("it('explains the RLS restrictions', () => {", "});", |w| {
                w.line(&render);
                for sentence in model.rls_advisories() {
                    w.line(format!(
                        "expect(screen.getByText({}, {{ exact: false }})).toBeInTheDocument();",
                        ts_string(sentence)
                    ));
                }
            });
        }

        if model.form_fields().any(|f| f.required && f.input == InputKind::Text) {
            w.blank();
            w.block("it('does not submit without required values', async () => {", "});", |w| {
                w.line(&render);
                w.line(format!("fireEvent.click(screen.getByText({}));", ts_string(msg.save)));
                w.blank();
                w.block("await waitFor(() => {", "});", |w| {
                    w.line("expect(onSubmit).not.toHaveBeenCalled();");
                });
            });
        }

        w.blank();
        w.block("it('submits the entered values', async () => {", "});", |w| {
            w.line(&render);
            for field in model.form_fields().filter(|f| !f.readonly) {
                if let Some(value) = fill_value(field) {
                    w.line(format!(
                        "fireEvent.change(screen.getByLabelText({}), {{ target: {{ value: {value} }} }});",
                        label_pattern(&field.label)
                    ));
                }
            }
            w.line(format!("fireEvent.click(screen.getByText({}));", ts_string(msg.save)));
            w.blank();
            w.block("await waitFor(() => {", "});", |w| {
                w.line("expect(onSubmit).toHaveBeenCalled();");
            });
        });

        w.blank();
        w.block("it('calls onCancel', () => {", "});", |w| {
            w.line(&render);
            w.line(format!("fireEvent.click(screen.getByText({}));", ts_string(msg.cancel)));
            w.line("expect(onCancel).toHaveBeenCalled();");
        });
    });
}

fn table_suite(w: &mut CodeWriter, model: &ComponentModel) {
    let class = &model.class_name;
    let msg = model.messages;

    w.block(&format!("describe('{class}Table', () => {{"), "});", |w| {
        w.block("it('renders the title', () => {", "});", |w| {
            w.line(format!("renderWithTheme(<{class}Table rows={{[mockRow]}} />);"));
            w.line(format!(
                "expect(screen.getByText({})).toBeInTheDocument();",
                ts_string(&model.labels.plural)
            ));
        });

        let shown = model
            .fields
            .iter()
            .find(|f| f.input == InputKind::Text && f.enum_type.is_none());
        if let Some(field) = shown {
            w.blank();
            w.block("it('shows row values', () => {", "});", |w| {
                w.line(format!("renderWithTheme(<{class}Table rows={{[mockRow]}} />);"));
                w.line(format!(
                    "expect(screen.getByText(String({}))).toBeInTheDocument();",
                    field.access("mockRow")
                ));
            });
        }

        w.blank();
        w.block("it('shows the empty state', () => {", "});", |w| {
            w.line(format!("renderWithTheme(<{class}Table rows={{[]}} />);"));
            w.line(format!(
                "expect(screen.getByText({})).toBeInTheDocument();",
                ts_string(msg.no_data)
            ));
        });

        let permitted = [
            (model.rls.select, "onView", msg.view),
            (model.rls.update, "onEdit", msg.edit),
            (model.rls.delete, "onDelete", msg.delete),
        ];
        for (allowed, prop, tooltip) in permitted {
            if !allowed {
                continue;
            }
            w.blank();
            w.block(&format!("it('passes the row to {prop}', () => {{"), "});", |w| {
                w.line("const handler = jest.fn();");
                w.line(format!("renderWithTheme(<{class}Table rows={{[mockRow]}} {prop}={{handler}} />);"));
                w.line(format!("fireEvent.click(screen.getByLabelText({}));", ts_string(tooltip)));
                w.line("expect(handler).toHaveBeenCalledWith(mockRow);");
            });
        }
    });
}

/// Value typed into a field by the submit test; selects and checkboxes keep their defaults
fn fill_value(field: &FieldModel) -> Option<String> {
    match field.input {
        InputKind::Text | InputKind::Number => Some(field.mock_value.clone()),
        InputKind::DateTime => Some(ts_string("2024-01-15T10:30")),
        InputKind::Select | InputKind::Checkbox => None,
    }
}

/// Case-sensitive regex literal matching a label, with or without the required marker
fn label_pattern(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        if "\\^$.|?*+()[]{}/".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("/^{escaped}/")
}
