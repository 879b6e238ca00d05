use schemaforge_core::schema::TableSchema;

use crate::ir::{ComponentModel, FieldModel, InputKind};
use crate::options::GenerationOptions;
use crate::writer::{is_identifier, jsx_attr, jsx_text, ts_string, CodeWriter};

/// React form component for creating and editing rows of `schema`.
///
/// Every non-primary column gets exactly one `Controller` block, in schema
/// order. With UI metadata (see [`ComponentModel::with_ui`]) hidden fields are
/// left out and the rest follow the display order. Forbidden updates or deletes add an RLS advisory above the buttons.
pub fn generate_form(schema: &TableSchema, options: &GenerationOptions) -> String {
    render_form(&ComponentModel::new(schema, options))
}

pub(crate) fn render_form(model: &ComponentModel) -> String {
    let class = &model.class_name;
    let input = model.input_type_name();
    let msg = model.messages;
    let mut w = CodeWriter::new();

    imports(&mut w, model);
    w.blank();

    w.block(&format!("interface {class}FormProps {{"), "}", |w| {
        w.line(format!("initialData?: Partial<{class}>;"));
        w.line(format!("onSubmit: (data: {input}) => Promise<void>;"));
        w.line("onCancel?: () => void;");
        w.line("isLoading?: boolean;");
    });
    w.blank();

    w.line(format!("export const {class}Form: React.FC<{class}FormProps> = ({{"));
    w.nested(|w| {
        w.line("initialData,");
        w.line("onSubmit,");
        w.line("onCancel,");
        w.line("isLoading = false,");
    });
    w.block("}) => {", "};", |w| {
        w.line("const {");
        w.nested(|w| {
            w.line("control,");
            w.line("handleSubmit,");
            w.line("formState: { errors, isSubmitting },");
            w.line("reset,");
        });
        w.block(&format!("}} = useForm<{input}>({{"), "});", |w| {
            w.line(format!("resolver: zodResolver({}),", model.input_schema_name()));
            w.block("defaultValues: {", "},", |w| {
                for field in model.editable_fields() {
                    w.line(format!("{}: {},", crate::writer::ts_key(&field.name), field.initial_value));
                }
                w.line("...initialData,");
            });
        });
        w.blank();

        match model.primary_key() {
            Some(pk) => w.line(format!(
                "const isEditing = {} !== undefined;",
                optional_access("initialData", &pk.name)
            )),
            None => w.line("const isEditing = false;"),
        };
        w.blank();

        w.block(&format!("const handleFormSubmit = async (data: {input}) => {{"), "};", |w| {
            w.block("try {", "} catch (error) {", |w| {
                w.line("await onSubmit(data);");
                w.line("reset();");
            });
            w.nested(|w| {
                w.line(format!("console.error({}, error);", ts_string(msg.save_failed)));
            });
            w.line("}");
        });
        w.blank();

        w.block("const handleCancel = () => {", "};", |w| {
            w.line("reset();");
            w.line("onCancel?.();");
        });
        w.blank();

        w.block("return (", ");", |w| body(w, model));
    });

    w.finish()
}

fn imports(w: &mut CodeWriter, model: &ComponentModel) {
    let mut mui = vec![
        "Card",
        "CardContent",
        "CardHeader",
        "Button",
        "TextField",
        "Box",
        "Typography",
        "CircularProgress",
    ];
    if model.needs_rls_advisory() {
        mui.push("Alert");
    }
    if model.form_fields().any(|f| f.input == InputKind::Select) {
        mui.push("MenuItem");
    }
    if model.form_fields().any(|f| f.input == InputKind::Checkbox) {
        mui.extend(["Checkbox", "FormControlLabel"]);
    }

    let mut types = vec![
        model.input_schema_name(),
        format!("type {}", model.class_name),
        format!("type {}", model.input_type_name()),
    ];
    types.extend(
        model
            .form_fields()
            .filter(|f| f.option_labels.is_none())
            .filter_map(|f| f.enum_type.as_ref())
            .map(|alias| format!("{alias}Values")),
    );

    w.line("import React from 'react';");
    w.line("import { useForm, Controller } from 'react-hook-form';");
    w.line("import { zodResolver } from '@hookform/resolvers/zod';");
    w.line(format!("import {{ {} }} from '@mui/material';", mui.join(", ")));
    w.line("import { Save as SaveIcon, Cancel as CancelIcon, Assignment as AssignmentIcon } from '@mui/icons-material';");
    if model.styling.uses_tailwind() {
        w.line("import 'tailwindcss/tailwind.css';");
    }
    w.line(format!("import {{ {} }} from '{}';", types.join(", "), model.types_module()));
}

fn body(w: &mut CodeWriter, model: &ComponentModel) {
    let msg = model.messages;
    let labels = &model.labels;

    w.line(format!("<Card{}>", model.class("max-w-2xl mx-auto shadow-lg")));
    w.nested(|w| {
        w.line("<CardHeader");
        w.nested(|w| {
            w.block("title={", "}", |w| {
                w.line(format!("<Box{}>", model.class("flex items-center space-x-2")));
                w.nested(|w| {
                    w.line(format!("<AssignmentIcon{} />", model.class("text-blue-600")));
                    w.block("<Typography variant=\"h5\" component=\"h2\">", "</Typography>", |w| {
                        w.line(format!(
                            "{{isEditing ? {} : {}}}",
                            ts_string(&labels.edit),
                            ts_string(&labels.create)
                        ));
                    });
                });
                w.line("</Box>");
            });
            w.line(format!("subheader={}", jsx_attr(&labels.description)));
            w.each([model.class("bg-gradient-to-r from-blue-50 to-indigo-50").trim_start()]);
        });
        w.line("/>");
        w.blank();

        w.block(
            &format!("<CardContent{}>", model.class("space-y-6")),
            "</CardContent>",
            |w| {
                w.block(
                    &format!(
                        "<form onSubmit={{handleSubmit(handleFormSubmit)}}{}>",
                        model.class("space-y-6")
                    ),
                    "</form>",
                    |w| {
                        for field in model.form_fields() {
                            controller(w, field);
                            w.blank();
                        }

                        if model.needs_rls_advisory() {
                            advisory(w, model);
                            w.blank();
                        }

                        buttons(w, model, msg);
                    },
                );
            },
        );
    });
    w.line("</Card>");
}

fn controller(w: &mut CodeWriter, field: &FieldModel) {
    let error = crate::writer::ts_access("errors", &field.name);

    w.line("<Controller");
    w.nested(|w| {
        w.line(format!("name={}", jsx_attr(&field.name)));
        w.line("control={control}");
        w.block("render={({ field }) => (", ")}", |w| match field.input {
            InputKind::Checkbox => {
                w.line("<FormControlLabel");
                w.nested(|w| {
                    w.line(format!("label={}", jsx_attr(&field.label)));
                    w.block("control={", "}", |w| {
                        w.line("<Checkbox");
                        w.nested(|w| {
                            w.line("checked={!!field.value}");
                            w.line("onChange={(event) => field.onChange(event.target.checked)}");
                            w.line(if field.readonly { "disabled" } else { "disabled={isLoading}" });
                        });
                        w.line("/>");
                    });
                });
                w.line("/>");
            }
            InputKind::Select => {
                w.line("<TextField");
                w.nested(|w| {
                    w.line("{...field}");
                    w.line("select");
                    common_attributes(w, field, &error);
                });
                w.line(">");
                w.nested(|w| match &field.option_labels {
                    Some(options) => {
                        for (value, label) in options {
                            let value = jsx_attr(value);
                            w.block(&format!("<MenuItem key={value} value={value}>"), "</MenuItem>", |w| {
                                w.line(jsx_text(label));
                            });
                        }
                    }
                    None => {
                        let alias = field.enum_type.as_deref().unwrap_or("string");
                        w.block(&format!("{{{alias}Values.map((option) => ("), "))}", |w| {
                            w.block("<MenuItem key={option} value={option}>", "</MenuItem>", |w| {
                                w.line("{option}");
                            });
                        });
                    }
                });
                w.line("</TextField>");
            }
            InputKind::Number => {
                w.line("<TextField");
                w.nested(|w| {
                    w.line("{...field}");
                    w.line("type=\"number\"");
                    w.line("onChange={(event) =>");
                    w.nested(|w| {
                        w.line("field.onChange(event.target.value === '' ? undefined : Number(event.target.value))");
                    });
                    w.line("}");
                    common_attributes(w, field, &error);
                });
                w.line("/>");
            }
            InputKind::Text | InputKind::DateTime => {
                w.line("<TextField");
                w.nested(|w| {
                    w.line("{...field}");
                    w.line(format!("type=\"{}\"", field.input.html_type()));
                    if field.input == InputKind::DateTime {
                        w.line("InputLabelProps={{ shrink: true }}");
                    }
                    common_attributes(w, field, &error);
                });
                w.line("/>");
            }
        });
    });
    w.line("/>");
}

fn common_attributes(w: &mut CodeWriter, field: &FieldModel, error: &str) {
    w.line(format!("label={}", jsx_attr(&field.label)));
    if let Some(placeholder) = &field.placeholder {
        w.line(format!("placeholder={}", jsx_attr(placeholder)));
    }
    w.line("value={field.value ?? ''}");
    w.line("fullWidth");
    if field.required {
        w.line("required");
    }
    w.line(format!("error={{!!{error}}}"));
    match &field.foreign_key {
        Some(fk) => w.line(format!(
            "helperText={{{error}?.message ?? {}}}",
            ts_string(&format!("→ {fk}"))
        )),
        None => w.line(format!("helperText={{{error}?.message}}")),
    };
    if field.readonly {
        w.line("InputProps={{ readOnly: true }}");
    }
    w.line("disabled={isLoading}");
}

fn advisory(w: &mut CodeWriter, model: &ComponentModel) {
    let msg = model.messages;
    w.block(
        &format!("<Alert severity=\"info\"{}>", model.class("bg-amber-50")),
        "</Alert>",
        |w| {
            for sentence in model.rls_advisories() {
                w.block("<Typography variant=\"body2\">", "</Typography>", |w| {
                    w.line(format!("<strong>{}</strong> {}", jsx_text(msg.note), jsx_text(sentence)));
                });
            }
        },
    );
}

fn buttons(w: &mut CodeWriter, model: &ComponentModel, msg: &crate::labels::Messages) {
    w.block(
        &format!("<Box{}>", model.class("flex justify-end space-x-3 pt-4")),
        "</Box>",
        |w| {
            w.line("<Button");
            w.nested(|w| {
                w.line("type=\"button\"");
                w.line("variant=\"outlined\"");
                w.line("onClick={handleCancel}");
                w.line("disabled={isLoading || isSubmitting}");
                w.line("startIcon={<CancelIcon />}");
            });
            w.line(">");
            w.nested(|w| {
                w.line(jsx_text(msg.cancel));
            });
            w.line("</Button>");
            w.blank();
            w.line("<Button");
            w.nested(|w| {
                w.line("type=\"submit\"");
                w.line("variant=\"contained\"");
                w.line("disabled={isLoading || isSubmitting}");
                w.line("startIcon={isSubmitting ? <CircularProgress size={20} color=\"inherit\" /> : <SaveIcon />}");
                w.each([model.class("min-w-[120px] bg-blue-600 hover:bg-blue-700").trim_start()]);
            });
            w.line(">");
            w.nested(|w| {
                w.line(format!(
                    "{{isSubmitting ? {} : {}}}",
                    ts_string(msg.saving),
                    ts_string(msg.save)
                ));
            });
            w.line("</Button>");
        },
    );
}

/// `object?.field` or `object?.['odd-name']`
fn optional_access(object: &str, name: &str) -> String {
    if is_identifier(name) {
        format!("{object}?.{name}")
    } else {
        format!("{object}?.[{}]", ts_string(name))
    }
}
