//! Native type classification into the dialect-independent taxonomy.
//!
//! Each dialect is a plain lookup table from a normalized native type name
//! (case-folded, parameters stripped) to a [`TypeClass`]. Classification is
//! a pure function: unrecognized names become [`CanonicalType::Unknown`]
//! and never raise.
//!
//! # Example
//! ```rust
//! use mapsheet_core::models::{CanonicalType, Dialect};
//! use mapsheet_core::taxonomy::classify;
//!
//! assert_eq!(classify(Dialect::Mssql, "NVARCHAR(255)"), CanonicalType::Text);
//! assert_eq!(classify(Dialect::Redshift, "NUMERIC(18,2)"), CanonicalType::Decimal);
//! assert_eq!(classify(Dialect::Redshift, "NUMERIC(18,0)"), CanonicalType::Integer);
//! assert_eq!(classify(Dialect::Mysql, "geometry"), CanonicalType::Unknown);
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{CanonicalType, Dialect, FieldDescriptor};

mod mssql;
mod mysql;
mod redshift;
mod salesforce;

/// How a table entry turns into a canonical type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    /// Always the same canonical type
    Fixed(CanonicalType),
    /// Fixed-point numeric: `decimal` when scale > 0, otherwise `integer`
    ScaledNumeric,
    /// Single-bit flag when declared with width 1, otherwise the fallback
    Flag(CanonicalType),
}

impl TypeClass {
    /// Short human-readable description for listings.
    pub fn describe(&self) -> String {
        match self {
            TypeClass::Fixed(canonical) => canonical.to_string(),
            TypeClass::ScaledNumeric => "decimal when scale > 0, else integer".to_string(),
            TypeClass::Flag(fallback) => format!("boolean when width is 1, else {}", fallback),
        }
    }
}

/// Returns the lookup table for a dialect.
pub fn table(dialect: Dialect) -> &'static [(&'static str, TypeClass)] {
    match dialect {
        Dialect::Salesforce => salesforce::TYPES,
        Dialect::Mssql => mssql::TYPES,
        Dialect::Mysql => mysql::TYPES,
        Dialect::Redshift => redshift::TYPES,
    }
}

#[allow(clippy::expect_used)]
static NATIVE_TYPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<base>[a-z][a-z0-9_ ]*)(?:\((?P<params>[^)]*)\))?(?P<suffix>[a-z_ ]*)$",
    )
    .expect("native type pattern is valid")
});

/// Modifiers that do not change the classification of a type
const IGNORED_MODIFIERS: &[&str] = &["unsigned", "signed", "zerofill"];

/// A native type string split into its name and numeric parameters.
///
/// `"NUMBER(10,2)"` parses to base `number` with params `[10, 2]`;
/// `"int(11) unsigned"` to base `int`; `"varchar(MAX)"` to base `varchar`
/// with no params and `unbounded` set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeType {
    /// Lowercased type name with modifiers removed
    pub base: String,
    /// Numeric parameters in declaration order
    pub params: Vec<u32>,
    /// Set for `MAX` lengths
    pub unbounded: bool,
}

impl NativeType {
    /// Parses a raw native type string. Never fails: strings that do not
    /// look like `name(params) modifiers` keep their folded text as base.
    pub fn parse(raw: &str) -> Self {
        let folded = raw.trim().to_lowercase();

        let Some(captures) = NATIVE_TYPE_PATTERN.captures(&folded) else {
            return Self {
                base: collapse_whitespace(&folded),
                params: Vec::new(),
                unbounded: false,
            };
        };

        let mut words: Vec<&str> = Vec::new();
        for part in ["base", "suffix"] {
            if let Some(m) = captures.name(part) {
                words.extend(
                    m.as_str()
                        .split_whitespace()
                        .filter(|w| !IGNORED_MODIFIERS.contains(w)),
                );
            }
        }

        let mut params = Vec::new();
        let mut unbounded = false;
        if let Some(m) = captures.name("params") {
            for param in m.as_str().split(',') {
                let param = param.trim();
                if param == "max" {
                    unbounded = true;
                } else if let Ok(value) = param.parse::<u32>() {
                    params.push(value);
                }
            }
        }

        Self {
            base: words.join(" "),
            params,
            unbounded,
        }
    }

    /// First parameter: length for character/binary types, precision for
    /// numeric types.
    pub fn size(&self) -> Option<u32> {
        self.params.first().copied()
    }

    /// Second parameter: scale for numeric types.
    pub fn scale(&self) -> Option<u32> {
        self.params.get(1).copied()
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Finds the table entry for a parsed native type.
pub fn lookup(dialect: Dialect, base: &str) -> Option<TypeClass> {
    table(dialect)
        .iter()
        .find(|(name, _)| *name == base)
        .map(|(_, class)| *class)
}

/// Classifies a native type string for a dialect.
///
/// Deterministic and total: the same input always yields the same output
/// and unrecognized strings yield [`CanonicalType::Unknown`].
pub fn classify(dialect: Dialect, native_type: &str) -> CanonicalType {
    let parsed = NativeType::parse(native_type);
    resolve_class(dialect, &parsed, None, None)
}

/// Classifies a field, letting declared metadata override parsed parameters.
///
/// A declared `scale` wins over one parsed from the type string, and a
/// declared `length` of 1 marks single-bit flag types as boolean.
pub fn classify_field(dialect: Dialect, field: &FieldDescriptor) -> CanonicalType {
    let parsed = NativeType::parse(&field.native_type);
    resolve_class(
        dialect,
        &parsed,
        field.scale,
        field.length.or(field.precision),
    )
}

fn resolve_class(
    dialect: Dialect,
    parsed: &NativeType,
    declared_scale: Option<u32>,
    declared_width: Option<u32>,
) -> CanonicalType {
    match lookup(dialect, &parsed.base) {
        None => CanonicalType::Unknown,
        Some(TypeClass::Fixed(canonical)) => canonical,
        Some(TypeClass::ScaledNumeric) => match declared_scale.or_else(|| parsed.scale()) {
            Some(scale) if scale > 0 => CanonicalType::Decimal,
            _ => CanonicalType::Integer,
        },
        Some(TypeClass::Flag(fallback)) => {
            if parsed.size().or(declared_width) == Some(1) {
                CanonicalType::Boolean
            } else {
                fallback
            }
        }
    }
}

/// Returns true when the dialect's table knows the native type.
pub fn is_recognized(dialect: Dialect, native_type: &str) -> bool {
    lookup(dialect, &NativeType::parse(native_type).base).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_parameters_and_modifiers() {
        let parsed = NativeType::parse("NUMBER(10, 2)");
        assert_eq!(parsed.base, "number");
        assert_eq!(parsed.params, vec![10, 2]);
        assert_eq!(parsed.scale(), Some(2));

        let parsed = NativeType::parse("int(11) UNSIGNED zerofill");
        assert_eq!(parsed.base, "int");
        assert_eq!(parsed.size(), Some(11));

        let parsed = NativeType::parse("timestamp(6) without time zone");
        assert_eq!(parsed.base, "timestamp without time zone");
    }

    #[test]
    fn test_parse_max_is_unbounded() {
        let parsed = NativeType::parse("NVARCHAR(MAX)");
        assert_eq!(parsed.base, "nvarchar");
        assert!(parsed.unbounded);
        assert_eq!(parsed.size(), None);
    }

    #[test]
    fn test_parse_irregular_input_keeps_text() {
        let parsed = NativeType::parse("  array< int >  ");
        assert_eq!(parsed.base, "array< int >");
        assert!(parsed.params.is_empty());
        assert_eq!(classify(Dialect::Redshift, "array<int>"), CanonicalType::Unknown);
    }

    #[test]
    fn test_scale_rule_for_fixed_point_numerics() {
        assert_eq!(classify(Dialect::Mssql, "decimal(18,2)"), CanonicalType::Decimal);
        assert_eq!(classify(Dialect::Mssql, "decimal(18,0)"), CanonicalType::Integer);
        assert_eq!(classify(Dialect::Mysql, "DECIMAL"), CanonicalType::Integer);
        assert_eq!(
            classify(Dialect::Salesforce, "NUMBER(10,2)"),
            CanonicalType::Decimal
        );
        assert_eq!(
            classify(Dialect::Salesforce, "NUMBER(10,0)"),
            CanonicalType::Integer
        );

        let field = FieldDescriptor::new("Amount", "double").with_precision(16, 2);
        assert_eq!(
            classify_field(Dialect::Salesforce, &field),
            CanonicalType::Decimal
        );
        let field = FieldDescriptor::new("Employees", "double").with_precision(8, 0);
        assert_eq!(
            classify_field(Dialect::Salesforce, &field),
            CanonicalType::Integer
        );
    }

    #[test]
    fn test_floating_types_are_always_decimal() {
        assert_eq!(classify(Dialect::Mssql, "float"), CanonicalType::Decimal);
        assert_eq!(classify(Dialect::Mysql, "double"), CanonicalType::Decimal);
        assert_eq!(
            classify(Dialect::Redshift, "double precision"),
            CanonicalType::Decimal
        );
    }

    #[test]
    fn test_mysql_single_bit_flags_are_boolean() {
        assert_eq!(classify(Dialect::Mysql, "tinyint(1)"), CanonicalType::Boolean);
        assert_eq!(classify(Dialect::Mysql, "tinyint(4)"), CanonicalType::Integer);
        assert_eq!(classify(Dialect::Mysql, "bit(1)"), CanonicalType::Boolean);
        assert_eq!(classify(Dialect::Mysql, "bit(8)"), CanonicalType::Binary);

        let field = FieldDescriptor::new("is_active", "tinyint").with_length(1);
        assert_eq!(classify_field(Dialect::Mysql, &field), CanonicalType::Boolean);
    }

    #[test]
    fn test_identifier_types() {
        assert_eq!(classify(Dialect::Salesforce, "id"), CanonicalType::Identifier);
        assert_eq!(
            classify(Dialect::Salesforce, "reference"),
            CanonicalType::Identifier
        );
        assert_eq!(
            classify(Dialect::Mssql, "UNIQUEIDENTIFIER"),
            CanonicalType::Identifier
        );
    }

    #[test]
    fn test_currency_is_left_for_manual_review() {
        for dialect in Dialect::ALL {
            assert_eq!(classify(dialect, "currency"), CanonicalType::Unknown);
            assert!(!is_recognized(dialect, "currency"));
        }
    }

    #[test]
    fn test_lookup_is_per_dialect() {
        assert_eq!(classify(Dialect::Mssql, "uniqueidentifier"), CanonicalType::Identifier);
        assert_eq!(
            classify(Dialect::Redshift, "uniqueidentifier"),
            CanonicalType::Unknown
        );
        assert_eq!(classify(Dialect::Salesforce, "picklist"), CanonicalType::Text);
        assert_eq!(classify(Dialect::Mysql, "picklist"), CanonicalType::Unknown);
    }

    #[test]
    fn test_tables_have_unique_normalized_names() {
        for dialect in Dialect::ALL {
            let names: Vec<&str> = table(dialect).iter().map(|(n, _)| *n).collect();
            for name in &names {
                assert_eq!(NativeType::parse(name).base, *name, "{dialect}: {name}");
            }
            let mut sorted = names.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), names.len(), "duplicate entry in {dialect} table");
        }
    }
}
