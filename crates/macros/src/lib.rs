use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, LitStr};

/// Builds a `schemaforge_core::schema::Column` from a compact declaration.
///
/// ```ignore
/// column!("id: uuid primary not_null");
/// column!("customer_id: string fk(customers.id)");
/// column!("status: string not_null default('open') enum(open, paid, overdue)");
/// column!("amount: numeric check(amount >= 0)");
/// ```
///
/// The declaration is checked at compile time.
#[proc_macro]
pub fn column(input: TokenStream) -> TokenStream {
    let input_lit = parse_macro_input!(input as LitStr);

    match parse_declaration(&input_lit.value()) {
        Ok(decl) => decl.expand().into(),
        Err(message) => syn::Error::new(input_lit.span(), message)
            .to_compile_error()
            .into(),
    }
}

struct Declaration {
    name: String,
    column_type: String,
    modifiers: Vec<Modifier>,
}

enum Modifier {
    Primary,
    NotNull,
    ForeignKey(String),
    Default(String),
    Enum(Vec<String>),
    Check(String),
}

impl Declaration {
    fn expand(&self) -> TokenStream2 {
        let name = &self.name;
        let column_type = &self.column_type;
        let modifiers = self.modifiers.iter().map(|modifier| match modifier {
            Modifier::Primary => quote! { let column = column.primary(); },
            Modifier::NotNull => quote! { let column = column.not_null(); },
            Modifier::ForeignKey(target) => quote! { let column = column.with_foreign_key(#target); },
            Modifier::Default(value) => quote! { let column = column.with_default(#value); },
            Modifier::Enum(values) => quote! {
                let column = column.with_enum_values([#(#values),*]);
            },
            Modifier::Check(expr) => quote! { let column = column.with_check(#expr); },
        });

        quote! {
            {
                let column = ::schemaforge_core::schema::Column::new(
                    #name,
                    ::schemaforge_core::schema::ColumnType::from(#column_type),
                );
                #(#modifiers)*
                column
            }
        }
    }
}

fn parse_declaration(input: &str) -> Result<Declaration, String> {
    let (name, rest) = input
        .split_once(':')
        .ok_or_else(|| format!("expected `name: type ...`, found `{input}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("column name must not be empty".to_string());
    }

    let rest = rest.trim_start();
    let type_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let column_type = &rest[..type_end];
    if column_type.is_empty() {
        return Err(format!("column `{name}` has no type"));
    }

    let mut modifiers = Vec::new();
    for (keyword, argument) in split_modifiers(&rest[type_end..])? {
        let modifier = match (keyword.as_str(), argument) {
            ("primary", None) => Modifier::Primary,
            ("not_null", None) => Modifier::NotNull,
            ("fk", Some(target)) => Modifier::ForeignKey(target),
            ("default", Some(value)) => Modifier::Default(value),
            ("check", Some(expr)) => Modifier::Check(expr),
            ("enum", Some(values)) => {
                let values: Vec<String> = values
                    .split(',')
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
                    .collect();
                if values.is_empty() {
                    return Err(format!("column `{name}` declares an empty enum"));
                }
                Modifier::Enum(values)
            }
            (keyword @ ("fk" | "default" | "check" | "enum"), None) => {
                return Err(format!("modifier `{keyword}` requires an argument"))
            }
            (keyword, Some(_)) => return Err(format!("modifier `{keyword}` takes no argument")),
            (keyword, None) => return Err(format!("unknown modifier `{keyword}`")),
        };
        modifiers.push(modifier);
    }

    Ok(Declaration {
        name: name.to_string(),
        column_type: column_type.to_string(),
        modifiers,
    })
}

/// Splits `primary fk(a.b) check(length(x) > 1)` into keywords with their
/// optional parenthesized argument. Nested parentheses stay in the argument.
fn split_modifiers(input: &str) -> Result<Vec<(String, Option<String>)>, String> {
    let mut result = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            return Ok(result);
        }

        let mut keyword = String::new();
        while let Some(c) = chars.next_if(|c| c.is_alphanumeric() || *c == '_') {
            keyword.push(c);
        }
        if keyword.is_empty() {
            let unexpected = chars.next().unwrap_or_default();
            return Err(format!("unexpected character `{unexpected}`"));
        }

        let argument = if chars.next_if_eq(&'(').is_some() {
            let mut depth = 1;
            let mut argument = String::new();
            for c in chars.by_ref() {
                match c {
                    '(' => depth += 1,
                    ')' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
                argument.push(c);
            }
            if depth != 0 {
                return Err(format!("unclosed `(` after `{keyword}`"));
            }
            Some(argument.trim().to_string())
        } else {
            None
        };

        result.push((keyword, argument));
    }
}
