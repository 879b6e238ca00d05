//! Table schema model as delivered by the metadata server.
//!
//! Field names follow the server's JSON format so that schemas can be
//! re-serialized verbatim (for example into generation prompts).

pub mod validate;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use validate::parse_table_schema;

/// Metadata describing one data table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name, never empty
    pub table: String,
    /// Columns in declaration order; names are unique
    pub columns: Vec<Column>,
    /// Row-level-security flags for the current access context
    pub rls: RowLevelSecurity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexes: Option<Vec<IndexDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers: Option<Vec<TriggerDescriptor>>,
}

impl TableSchema {
    pub fn new(table: impl Into<String>, columns: Vec<Column>, rls: RowLevelSecurity) -> Self {
        Self {
            table: table.into(),
            columns,
            rls,
            indexes: None,
            triggers: None,
        }
    }

    /// Looks up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|col| col.name == name)
    }

    /// The first primary-key column, if any
    pub fn primary_key(&self) -> Option<&Column> {
        self.columns.iter().find(|col| col.primary)
    }

    /// Columns carrying a foreign-key reference, paired with the parsed target
    pub fn foreign_keys(&self) -> impl Iterator<Item = (&Column, ForeignKey)> {
        self.columns
            .iter()
            .filter_map(|col| col.foreign_key().map(|fk| (col, fk)))
    }

    /// Columns that carry at least one validation rule
    pub fn constrained_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|col| col.has_rules())
    }
}

/// One column descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default)]
    pub primary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
    #[serde(default)]
    pub not_null: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            primary: false,
            foreign_key: None,
            not_null: false,
            default: None,
            enum_values: None,
            check: None,
        }
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn with_foreign_key(mut self, target: impl Into<String>) -> Self {
        self.foreign_key = Some(target.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_check(mut self, check: impl Into<String>) -> Self {
        self.check = Some(check.into());
        self
    }

    /// A field may be left out when it is neither not-null nor part of the key
    pub fn is_optional(&self) -> bool {
        !self.not_null && !self.primary
    }

    /// Enumerated values, treating an empty list like none
    pub fn enum_values(&self) -> Option<&[String]> {
        self.enum_values
            .as_deref()
            .filter(|values| !values.is_empty())
    }

    pub fn foreign_key(&self) -> Option<ForeignKey> {
        self.foreign_key.as_deref().map(ForeignKey::parse)
    }

    pub fn has_rules(&self) -> bool {
        self.not_null || self.check.is_some() || self.enum_values().is_some()
    }
}

/// Declared column type.
///
/// Unknown type names are preserved in [`ColumnType::Other`] instead of being
/// rejected; generators map them like strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    String,
    Numeric,
    Integer,
    Boolean,
    Timestamp,
    Uuid,
    Other(String),
}

impl ColumnType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Numeric => "numeric",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Timestamp => "timestamp",
            Self::Uuid => "uuid",
            Self::Other(name) => name,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric | Self::Integer)
    }
}

impl From<&str> for ColumnType {
    fn from(value: &str) -> Self {
        match value {
            "string" => Self::String,
            "numeric" => Self::Numeric,
            "integer" => Self::Integer,
            "boolean" => Self::Boolean,
            "timestamp" => Self::Timestamp,
            "uuid" => Self::Uuid,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ColumnType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<ColumnType> for String {
    fn from(value: ColumnType) -> Self {
        match value {
            ColumnType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row-level-security flag-set; `true` means the operation is permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowLevelSecurity {
    pub select: bool,
    pub insert: bool,
    pub update: bool,
    pub delete: bool,
}

impl RowLevelSecurity {
    pub const fn allow_all() -> Self {
        Self {
            select: true,
            insert: true,
            update: true,
            delete: true,
        }
    }

    /// Records can be created and read but never changed afterwards
    pub const fn append_only() -> Self {
        Self {
            select: true,
            insert: true,
            update: false,
            delete: false,
        }
    }

    /// Operation names paired with their flag, in SQL order
    pub fn operations(&self) -> [(&'static str, bool); 4] {
        [
            ("SELECT", self.select),
            ("INSERT", self.insert),
            ("UPDATE", self.update),
            ("DELETE", self.delete),
        ]
    }
}

impl Default for RowLevelSecurity {
    fn default() -> Self {
        Self::allow_all()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
}

/// Parsed `table.column` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
}

impl ForeignKey {
    /// Splits at the last dot; a bare table name references its `id` column
    pub fn parse(reference: &str) -> Self {
        match reference.rsplit_once('.') {
            Some((table, column)) if !table.is_empty() && !column.is_empty() => Self {
                table: table.to_string(),
                column: column.to_string(),
            },
            _ => Self {
                table: reference.trim_end_matches('.').to_string(),
                column: "id".to_string(),
            },
        }
    }
}

impl fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}
