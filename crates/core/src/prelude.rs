pub use crate::error::{SchemaError, SchemaResult};
pub use crate::injector::{
    CacheStatus, FileSchemaSource, HttpSchemaSource, SchemaInjector, SchemaSource,
};
pub use crate::schema::{Column, ColumnType, ForeignKey, RowLevelSecurity, TableSchema};
pub use crate::ui::{UiField, UiMetadata, UiOption};
