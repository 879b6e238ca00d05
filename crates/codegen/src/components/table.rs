use schemaforge_core::schema::{ColumnType, TableSchema};

use crate::ir::{ComponentModel, FieldModel};
use crate::options::GenerationOptions;
use crate::writer::{jsx_attr, jsx_text, ts_string, CodeWriter};

/// React table component listing rows of `schema`.
///
/// Each column gets one sortable header cell and one body cell. Row actions
/// are only offered for operations the RLS flag-set permits.
pub fn generate_table(schema: &TableSchema, options: &GenerationOptions) -> String {
    render_table(&ComponentModel::new(schema, options))
}

/// Row actions exposed as optional callbacks
fn actions(model: &ComponentModel) -> Vec<Action> {
    let msg = model.messages;
    let mut actions = Vec::new();
    if model.rls.select {
        actions.push(Action::new("onView", "ViewIcon", msg.view, "text-blue-600 hover:bg-blue-50"));
    }
    if model.rls.update {
        actions.push(Action::new("onEdit", "EditIcon", msg.edit, "text-orange-600 hover:bg-orange-50"));
    }
    if model.rls.delete {
        actions.push(Action::new("onDelete", "DeleteIcon", msg.delete, "text-red-600 hover:bg-red-50"));
    }
    actions
}

struct Action {
    prop: &'static str,
    icon: &'static str,
    tooltip: &'static str,
    classes: &'static str,
}

impl Action {
    fn new(prop: &'static str, icon: &'static str, tooltip: &'static str, classes: &'static str) -> Self {
        Self {
            prop,
            icon,
            tooltip,
            classes,
        }
    }
}

pub(crate) fn render_table(model: &ComponentModel) -> String {
    let class = &model.class_name;
    let actions = actions(model);
    let mut w = CodeWriter::new();

    imports(&mut w, model, &actions);
    w.blank();

    w.block(&format!("interface {class}TableProps {{"), "}", |w| {
        w.line(format!("rows: {class}[];"));
        w.line("isLoading?: boolean;");
        for action in &actions {
            w.line(format!("{}?: (row: {class}) => void;", action.prop));
        }
    });
    w.blank();

    let sortable: Vec<String> = model.fields.iter().map(|f| ts_string(&f.name)).collect();
    if sortable.is_empty() {
        w.line("type SortField = never;");
    } else {
        w.line(format!("type SortField = {};", sortable.join(" | ")));
    }
    w.line("type SortOrder = 'asc' | 'desc';");
    w.blank();

    let mut params = vec!["rows", "isLoading = false"];
    params.extend(actions.iter().map(|a| a.prop));
    w.line(format!(
        "export const {class}Table: React.FC<{class}TableProps> = ({{ {} }}) => {{",
        params.join(", ")
    ));
    w.nested(|w| {
        state(w, model);
        w.blank();
        w.block("if (isLoading) {", "}", |w| {
            w.block("return (", ");", |w| {
                w.block(
                    &format!("<Box{}>", model.class("flex justify-center items-center h-64")),
                    "</Box>",
                    |w| {
                        w.line("<CircularProgress />");
                    },
                );
            });
        });
        w.blank();
        w.block("return (", ");", |w| body(w, model, &actions));
    });
    w.line("};");

    w.finish()
}

fn imports(w: &mut CodeWriter, model: &ComponentModel, actions: &[Action]) {
    let mut mui = vec![
        "Table",
        "TableBody",
        "TableCell",
        "TableContainer",
        "TableHead",
        "TableRow",
        "Paper",
        "TablePagination",
        "TableSortLabel",
        "Box",
        "Typography",
        "TextField",
        "InputAdornment",
        "Alert",
        "CircularProgress",
        "Chip",
    ];
    if !actions.is_empty() {
        mui.extend(["IconButton", "Tooltip"]);
    }

    let mut icons = Vec::new();
    for action in actions {
        icons.push(match action.icon {
            "ViewIcon" => "Visibility as ViewIcon",
            "EditIcon" => "Edit as EditIcon",
            _ => "Delete as DeleteIcon",
        });
    }
    icons.extend(["Search as SearchIcon", "Assignment as AssignmentIcon"]);

    w.line("import React, { useMemo, useState } from 'react';");
    w.line(format!("import {{ {} }} from '@mui/material';", mui.join(", ")));
    w.line(format!("import {{ {} }} from '@mui/icons-material';", icons.join(", ")));
    if model.styling.uses_tailwind() {
        w.line("import 'tailwindcss/tailwind.css';");
    }
    w.line(format!(
        "import type {{ {} }} from '{}';",
        model.class_name,
        model.types_module()
    ));
}

fn state(w: &mut CodeWriter, model: &ComponentModel) {
    let initial_sort = model
        .default_sort_field()
        .map(|f| ts_string(&f.name))
        .unwrap_or_else(|| "undefined as never".to_string());

    w.line("const [page, setPage] = useState(0);");
    w.line("const [rowsPerPage, setRowsPerPage] = useState(10);");
    w.line(format!("const [sortField, setSortField] = useState<SortField>({initial_sort});"));
    w.line("const [sortOrder, setSortOrder] = useState<SortOrder>('desc');");
    w.line("const [searchTerm, setSearchTerm] = useState('');");
    w.blank();

    w.block("const handleSort = (field: SortField) => {", "};", |w| {
        w.line("const isAsc = sortField === field && sortOrder === 'asc';");
        w.line("setSortOrder(isAsc ? 'desc' : 'asc');");
        w.line("setSortField(field);");
    });
    w.blank();

    w.block("const filteredAndSortedData = useMemo(() => {", "}, [rows, searchTerm, sortField, sortOrder]);", |w| {
        w.line("const needle = searchTerm.toLowerCase();");
        w.line("const filtered = rows.filter(");
        w.nested(|w| {
            w.line("(row) =>");
            w.nested(|w| {
                w.line("needle === '' ||");
                w.line("Object.values(row).some((value) => String(value ?? '').toLowerCase().includes(needle))");
            });
        });
        w.line(");");
        w.blank();
        w.block("return filtered.sort((a, b) => {", "});", |w| {
            w.line("const order = String(a[sortField] ?? '').localeCompare(String(b[sortField] ?? ''), undefined, {");
            w.nested(|w| {
                w.line("numeric: true,");
            });
            w.line("});");
            w.line("return sortOrder === 'asc' ? order : -order;");
        });
    });
    w.blank();

    w.line("const paginatedData = filteredAndSortedData.slice(page * rowsPerPage, page * rowsPerPage + rowsPerPage);");
    w.blank();
    w.block("const handleChangeRowsPerPage = (event: React.ChangeEvent<HTMLInputElement>) => {", "};", |w| {
        w.line("setRowsPerPage(parseInt(event.target.value, 10));");
        w.line("setPage(0);");
    });
}

fn body(w: &mut CodeWriter, model: &ComponentModel, actions: &[Action]) {
    let msg = model.messages;
    let plural = &model.labels.plural;

    w.block(&format!("<Paper{}>", model.class("shadow-lg")), "</Paper>", |w| {
        w.block(
            &format!("<Box{}>", model.class("p-4 bg-gradient-to-r from-blue-50 to-indigo-50 border-b")),
            "</Box>",
            |w| {
                w.block(
                    &format!("<Box{}>", model.class("flex items-center space-x-2 mb-4")),
                    "</Box>",
                    |w| {
                        w.line(format!("<AssignmentIcon{} />", model.class("text-blue-600")));
                        w.block(
                            &format!("<Typography variant=\"h6\"{}>", model.class("font-semibold")),
                            "</Typography>",
                            |w| {
                                w.line(jsx_text(plural));
                            },
                        );
                        w.line(format!(
                            "<Chip label={{`${{rows.length}} {}`}} size=\"small\" color=\"primary\" variant=\"outlined\" />",
                            template_text(plural)
                        ));
                    },
                );
                w.line("<TextField");
                w.nested(|w| {
                    w.line(format!("placeholder={}", jsx_attr(msg.search)));
                    w.line("value={searchTerm}");
                    w.line("onChange={(event) => setSearchTerm(event.target.value)}");
                    w.line("size=\"small\"");
                    w.line("fullWidth");
                    w.block("InputProps={{", "}}", |w| {
                        w.block("startAdornment: (", "),", |w| {
                            w.block("<InputAdornment position=\"start\">", "</InputAdornment>", |w| {
                                w.line(format!("<SearchIcon{} />", model.class("text-gray-400")));
                            });
                        });
                    });
                });
                w.line("/>");
            },
        );
        w.blank();

        w.block("<TableContainer>", "</TableContainer>", |w| {
            w.block("<Table>", "</Table>", |w| {
                w.block("<TableHead>", "</TableHead>", |w| {
                    w.block(&format!("<TableRow{}>", model.class("bg-gray-50")), "</TableRow>", |w| {
                        for field in model.display_fields() {
                            header_cell(w, field);
                        }
                        if !actions.is_empty() {
                            w.line(format!("<TableCell align=\"center\">{}</TableCell>", jsx_text(msg.actions)));
                        }
                    });
                });
                w.block("<TableBody>", "</TableBody>", |w| {
                    rows(w, model, actions);
                });
            });
        });
        w.blank();

        w.line("<TablePagination");
        w.nested(|w| {
            w.line("rowsPerPageOptions={[5, 10, 25, 50]}");
            w.line("component=\"div\"");
            w.line("count={filteredAndSortedData.length}");
            w.line("rowsPerPage={rowsPerPage}");
            w.line("page={page}");
            w.line("onPageChange={(_, newPage) => setPage(newPage)}");
            w.line("onRowsPerPageChange={handleChangeRowsPerPage}");
            w.line(format!("labelRowsPerPage={}", jsx_attr(msg.rows_per_page)));
            w.line(format!(
                "labelDisplayedRows={{({{ from, to, count }}) => `${{from}}-${{to}} {} ${{count !== -1 ? count : `{} ${{to}}`}}`}}",
                template_text(msg.of),
                template_text(msg.more_than)
            ));
        });
        w.line("/>");
    });
}

fn header_cell(w: &mut CodeWriter, field: &FieldModel) {
    let name = ts_string(&field.name);
    w.block("<TableCell>", "</TableCell>", |w| {
        w.line("<TableSortLabel");
        w.nested(|w| {
            w.line(format!("active={{sortField === {name}}}"));
            w.line(format!("direction={{sortField === {name} ? sortOrder : 'asc'}}"));
            w.line(format!("onClick={{() => handleSort({name})}}"));
        });
        w.line(">");
        w.nested(|w| {
            w.line(jsx_text(&field.label));
        });
        w.line("</TableSortLabel>");
    });
}

fn rows(w: &mut CodeWriter, model: &ComponentModel, actions: &[Action]) {
    let msg = model.messages;
    let span = model.fields.len() + usize::from(!actions.is_empty());
    let key = model
        .primary_key()
        .map(|pk| format!("String({})", pk.access("row")))
        .unwrap_or_else(|| "index".to_string());

    w.line("{paginatedData.length === 0 ? (");
    w.nested(|w| {
        w.block("<TableRow>", "</TableRow>", |w| {
            w.block(
                &format!("<TableCell colSpan={{{span}}} align=\"center\"{}>", model.class("py-8")),
                "</TableCell>",
                |w| {
                    w.line(format!("<Alert severity=\"info\">{}</Alert>", jsx_text(msg.no_data)));
                },
            );
        });
    });
    w.line(") : (");
    w.nested(|w| {
        w.block("paginatedData.map((row, index) => (", "))", |w| {
            w.block(
                &format!("<TableRow key={{{key}}}{}>", model.class("hover:bg-gray-50")),
                "</TableRow>",
                |w| {
                    for field in model.display_fields() {
                        body_cell(w, model, field);
                    }
                    if !actions.is_empty() {
                        action_cell(w, model, actions);
                    }
                },
            );
        });
    });
    w.line(")}");
}

fn body_cell(w: &mut CodeWriter, model: &ComponentModel, field: &FieldModel) {
    let value = field.access("row");
    let locale = ts_string(model.language.locale());

    w.block("<TableCell>", "</TableCell>", |w| {
        if field.enum_type.is_some() {
            w.line(format!("{{{value} && <Chip label={{{value}}} size=\"small\" />}}"));
            return;
        }
        match field.column_type {
            ColumnType::Timestamp => {
                w.line(format!("{{{value} && ("));
                w.nested(|w| {
                    w.block(&format!("<Box{}>", model.class("flex flex-col")), "</Box>", |w| {
                        w.block(
                            &format!("<Typography variant=\"body2\"{}>", model.class("font-medium")),
                            "</Typography>",
                            |w| {
                                w.line(format!("{{new Date({value}).toLocaleDateString({locale})}}"));
                            },
                        );
                        w.block(
                            &format!("<Typography variant=\"caption\"{}>", model.class("text-gray-500")),
                            "</Typography>",
                            |w| {
                                w.line(format!("{{new Date({value}).toLocaleTimeString({locale})}}"));
                            },
                        );
                    });
                });
                w.line(")}");
            }
            ColumnType::Boolean => {
                w.line(format!("<Typography variant=\"body2\">{{{value} ? '✓' : '–'}}</Typography>"));
            }
            _ => {
                w.line(format!("<Typography variant=\"body2\">{{String({value} ?? '')}}</Typography>"));
            }
        }
    });
}

fn action_cell(w: &mut CodeWriter, model: &ComponentModel, actions: &[Action]) {
    w.block("<TableCell align=\"center\">", "</TableCell>", |w| {
        w.block(
            &format!("<Box{}>", model.class("flex justify-center space-x-1")),
            "</Box>",
            |w| {
                for action in actions {
                    w.block(&format!("{{{} && (", action.prop), ")}", |w| {
                        w.block(
                            &format!("<Tooltip title={}>", jsx_attr(action.tooltip)),
                            "</Tooltip>",
                            |w| {
                                w.line(format!(
                                    "<IconButton size=\"small\" onClick={{() => {}(row)}}{}>",
                                    action.prop,
                                    model.class(action.classes)
                                ));
                                w.nested(|w| {
                                    w.line(format!("<{} />", action.icon));
                                });
                                w.line("</IconButton>");
                            },
                        );
                    });
                }
            },
        );
    });
}

/// Text placed inside a JS template literal
fn template_text(text: &str) -> String {
    text.replace('\\', "\\\\").replace('`', "\\`").replace("${", "\\${")
}
