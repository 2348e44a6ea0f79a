//! Flat catalog rows as emitted by metadata connectors.
//!
//! Relational connectors read `INFORMATION_SCHEMA.COLUMNS` style rows
//! (`table_name`, `column_name`, `data_type`, `length`, `nullable`); the
//! Salesforce connector reads `describe()` and names the same columns
//! `object_name`, `field_name` and `field_type`. Both deserialize into
//! [`CatalogRow`].

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{Dialect, FieldDescriptor, SchemaDescriptor};
use crate::taxonomy::NativeType;

fn default_nullable() -> bool {
    true
}

/// One column as reported by a catalog query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRow {
    #[serde(default, alias = "object_name")]
    pub table_name: String,
    #[serde(alias = "field_name")]
    pub column_name: String,
    #[serde(alias = "field_type")]
    pub data_type: String,
    /// Character length; SQL Server reports -1 for `MAX`
    #[serde(default)]
    pub length: Option<i64>,
    #[serde(default)]
    pub precision: Option<u32>,
    #[serde(default)]
    pub scale: Option<u32>,
    #[serde(
        default = "default_nullable",
        alias = "is_nullable",
        deserialize_with = "deserialize_nullable"
    )]
    pub nullable: bool,
}

/// Accepts `true`/`false` as well as the `"YES"`/`"NO"` strings catalogs use.
fn deserialize_nullable<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(true),
        Some(Flag::Bool(value)) => Ok(value),
        Some(Flag::Text(text)) => match text.trim().to_uppercase().as_str() {
            "YES" | "Y" | "TRUE" | "1" => Ok(true),
            "NO" | "N" | "FALSE" | "0" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "invalid nullable flag '{}'",
                other
            ))),
        },
    }
}

impl CatalogRow {
    /// Converts the row into a field descriptor.
    ///
    /// A negative length marks an unbounded type and becomes a `(max)`
    /// parameter on the native type when the type carries none.
    pub fn to_field(&self, dialect: Dialect) -> FieldDescriptor {
        let parsed = NativeType::parse(&self.data_type);
        let (native_type, length) = match self.length {
            Some(length) if length < 0 => {
                let native_type = if parsed.params.is_empty() && !parsed.unbounded {
                    format!("{}(max)", self.data_type.trim())
                } else {
                    self.data_type.clone()
                };
                (native_type, None)
            }
            Some(length) => (self.data_type.clone(), u32::try_from(length).ok()),
            None => (self.data_type.clone(), None),
        };

        FieldDescriptor {
            name: self.column_name.clone(),
            native_type,
            nullable: self.nullable,
            length,
            precision: self.precision,
            scale: self.scale,
            is_identifier: dialect == Dialect::Salesforce && parsed.base == "id",
        }
    }
}

impl SchemaDescriptor {
    /// Builds a descriptor from catalog rows, keeping row order.
    ///
    /// Rows belonging to a different table than the first row are skipped.
    /// Duplicate or missing columns are left for the engine's integrity
    /// check to report.
    pub fn from_catalog_rows(
        dialect: Dialect,
        qualified_name: impl Into<String>,
        rows: &[CatalogRow],
    ) -> Self {
        let table = rows.first().map(|r| r.table_name.to_lowercase());
        let mut fields = Vec::with_capacity(rows.len());

        for row in rows {
            if table.as_deref().is_some_and(|t| row.table_name.to_lowercase() != t) {
                tracing::warn!(
                    "Skipping column '{}' of table '{}': rows belong to '{}'",
                    row.column_name,
                    row.table_name,
                    rows.first().map(|r| r.table_name.as_str()).unwrap_or_default()
                );
                continue;
            }
            fields.push(row.to_field(dialect));
        }

        SchemaDescriptor::new(dialect, qualified_name, fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relational_rows() {
        let rows: Vec<CatalogRow> = serde_json::from_str(
            r#"[
                {"table_name": "Contact", "column_name": "ContactID", "data_type": "int", "length": null, "nullable": "NO"},
                {"table_name": "Contact", "column_name": "Email", "data_type": "nvarchar", "length": 255, "nullable": "YES"},
                {"table_name": "Contact", "column_name": "Notes", "data_type": "nvarchar", "length": -1, "nullable": true}
            ]"#,
        )
        .unwrap();

        let schema = SchemaDescriptor::from_catalog_rows(Dialect::Mssql, "crm.dbo.Contact", &rows);

        assert_eq!(schema.field_names(), vec!["ContactID", "Email", "Notes"]);
        assert!(!schema.fields[0].nullable);
        assert_eq!(schema.fields[1].length, Some(255));
        assert_eq!(schema.fields[2].native_type, "nvarchar(max)");
        assert_eq!(schema.fields[2].length, None);
        assert!(NativeType::parse(&schema.fields[2].native_type).unbounded);
    }

    #[test]
    fn test_salesforce_describe_rows() {
        let rows: Vec<CatalogRow> = serde_json::from_str(
            r#"[
                {"object_name": "Account", "field_name": "Id", "field_type": "id", "length": 18, "nullable": false},
                {"object_name": "Account", "field_name": "AnnualRevenue", "field_type": "currency", "precision": 18, "scale": 2}
            ]"#,
        )
        .unwrap();

        let schema = SchemaDescriptor::from_catalog_rows(Dialect::Salesforce, "Account", &rows);

        assert!(schema.fields[0].is_identifier);
        assert_eq!(schema.fields[0].length, Some(18));
        assert!(schema.fields[1].nullable);
        assert_eq!(schema.fields[1].scale, Some(2));
        assert!(!schema.fields[1].is_identifier);
    }

    #[test]
    fn test_rows_from_other_tables_are_skipped() {
        let row = |table: &str, column: &str| CatalogRow {
            table_name: table.to_string(),
            column_name: column.to_string(),
            data_type: "varchar".to_string(),
            length: Some(20),
            precision: None,
            scale: None,
            nullable: true,
        };
        let rows = vec![row("orders", "id"), row("ORDERS", "status"), row("customers", "id")];

        let schema = SchemaDescriptor::from_catalog_rows(Dialect::Mysql, "shop.orders", &rows);
        assert_eq!(schema.field_names(), vec!["id", "status"]);
    }

    #[test]
    fn test_invalid_nullable_flag_is_rejected() {
        let result: Result<CatalogRow, _> = serde_json::from_str(
            r#"{"table_name": "t", "column_name": "c", "data_type": "int", "nullable": "maybe"}"#,
        );
        assert!(result.is_err());
    }
}
