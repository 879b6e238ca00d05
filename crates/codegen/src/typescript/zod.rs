//! zod validator chains for columns, including simple CHECK constraints.

use std::sync::LazyLock;

use regex::Regex;
use schemaforge_core::schema::{Column, ColumnType};

use crate::writer::ts_string;

static COMPARISON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(*\s*(\w+)\s*(>=|>|<=|<)\s*\(*(-?\d+(?:\.\d+)?)\)*(?:::\w+)?\s*\)*$")
        .expect("comparison pattern")
});

static LENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\(*\s*(?:char_)?length\(\s*(\w+)\s*\)\s*(>=|>|<=|<)\s*(\d+)\s*\)*$")
        .expect("length pattern")
});

static AND: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s+and\s+").expect("and pattern"));

/// Validator for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZodField {
    /// Full validator expression, e.g. `z.number().positive()`
    pub chain: String,
    /// Parts of the CHECK expression that could not be expressed in zod
    pub unenforced: Vec<String>,
}

impl ZodField {
    pub fn for_column(column: &Column) -> Self {
        let mut chain = base(column);
        let mut unenforced = Vec::new();

        if let Some(check) = &column.check {
            for part in AND.split(check.trim()) {
                match translate(part.trim(), column) {
                    Some(rule) => chain.push_str(&rule),
                    None => unenforced.push(part.trim().to_string()),
                }
            }
        }

        if column.is_optional() {
            chain.push_str(".optional()");
        }

        Self { chain, unenforced }
    }
}

fn base(column: &Column) -> String {
    if let Some(values) = column.enum_values() {
        let values: Vec<String> = values.iter().map(|v| ts_string(v)).collect();
        return format!("z.enum([{}])", values.join(", "));
    }

    match &column.column_type {
        ColumnType::Numeric => "z.number()".to_string(),
        ColumnType::Integer => "z.number().int()".to_string(),
        ColumnType::Boolean => "z.boolean()".to_string(),
        ColumnType::Uuid => "z.string().uuid()".to_string(),
        ColumnType::Timestamp => "z.string()".to_string(),
        ColumnType::String | ColumnType::Other(_) => {
            if column.not_null && !column.primary {
                "z.string().min(1)".to_string()
            } else {
                "z.string()".to_string()
            }
        }
    }
}

/// Translates one CHECK clause that constrains `column`
pub fn translate(clause: &str, column: &Column) -> Option<String> {
    if column.column_type.is_numeric() {
        let caps = COMPARISON.captures(clause)?;
        if &caps[1] != column.name {
            return None;
        }
        let bound = &caps[3];
        let zero = bound.parse::<f64>().ok()? == 0.0;
        return Some(match (&caps[2], zero) {
            (">=", true) => ".nonnegative()".to_string(),
            (">", true) => ".positive()".to_string(),
            (">=", false) => format!(".min({bound})"),
            (">", false) => format!(".gt({bound})"),
            ("<=", _) => format!(".max({bound})"),
            _ => format!(".lt({bound})"),
        });
    }

    if matches!(column.column_type, ColumnType::String | ColumnType::Other(_)) {
        let caps = LENGTH.captures(clause)?;
        if &caps[1] != column.name {
            return None;
        }
        let bound: u64 = caps[3].parse().ok()?;
        return match &caps[2] {
            "<=" => Some(format!(".max({bound})")),
            "<" => Some(format!(".max({})", bound.checked_sub(1)?)),
            ">=" => Some(format!(".min({bound})")),
            _ => Some(format!(".min({})", bound.checked_add(1)?)),
        };
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(column: Column) -> String {
        ZodField::for_column(&column).chain
    }

    #[test]
    fn base_validators() {
        assert_eq!(chain(Column::new("id", ColumnType::Uuid).primary()), "z.string().uuid()");
        assert_eq!(chain(Column::new("qty", ColumnType::Integer).not_null()), "z.number().int()");
        assert_eq!(chain(Column::new("paid", ColumnType::Boolean)), "z.boolean().optional()");
        assert_eq!(chain(Column::new("name", ColumnType::String).not_null()), "z.string().min(1)");
        assert_eq!(chain(Column::new("kind", ColumnType::Other("jsonb".into()))), "z.string().optional()");
    }

    #[test]
    fn enum_columns() {
        let status = Column::new("status", ColumnType::String).with_enum_values(["open", "paid"]);
        assert_eq!(chain(status), "z.enum(['open', 'paid']).optional()");
    }

    #[test]
    fn numeric_checks() {
        let amount = Column::new("amount", ColumnType::Numeric).not_null().with_check("amount > 0");
        assert_eq!(chain(amount), "z.number().positive()");

        let rate = Column::new("rate", ColumnType::Numeric)
            .not_null()
            .with_check("rate >= 0 AND rate <= 100");
        assert_eq!(chain(rate), "z.number().nonnegative().max(100)");

        let qty = Column::new("qty", ColumnType::Integer).not_null().with_check("(qty >= 1)");
        assert_eq!(chain(qty), "z.number().int().min(1)");

        let temp = Column::new("temp", ColumnType::Numeric).not_null().with_check("temp < -5.5");
        assert_eq!(chain(temp), "z.number().lt(-5.5)");
    }

    #[test]
    fn length_checks() {
        let email = Column::new("email", ColumnType::String)
            .not_null()
            .with_check("length(email) <= 255");
        assert_eq!(chain(email), "z.string().min(1).max(255)");

        let code = Column::new("code", ColumnType::String).with_check("char_length(code) < 9");
        assert_eq!(chain(code), "z.string().max(8).optional()");
    }

    #[test]
    fn length_bounds_at_the_integer_limits_stay_unenforced() {
        let code = Column::new("code", ColumnType::String).with_check("length(code) > 18446744073709551615");
        let field = ZodField::for_column(&code);
        assert_eq!(field.chain, "z.string().optional()");
        assert_eq!(field.unenforced, ["length(code) > 18446744073709551615"]);

        let empty = Column::new("code", ColumnType::String).with_check("length(code) < 0");
        assert_eq!(ZodField::for_column(&empty).unenforced, ["length(code) < 0"]);
    }

    #[test]
    fn unsupported_clauses_are_reported() {
        let column = Column::new("amount", ColumnType::Numeric)
            .not_null()
            .with_check("amount > 0 AND amount <> discount");
        let field = ZodField::for_column(&column);

        assert_eq!(field.chain, "z.number().positive()");
        assert_eq!(field.unenforced, ["amount <> discount"]);
    }

    #[test]
    fn checks_on_other_columns_are_not_applied() {
        let column = Column::new("amount", ColumnType::Numeric).not_null().with_check("total > 0");
        let field = ZodField::for_column(&column);
        assert_eq!(field.chain, "z.number()");
        assert_eq!(field.unenforced, ["total > 0"]);
    }
}
