//! Type compatibility between a source field and a candidate target field.
//!
//! The verdict depends only on the two canonical types and, for identical
//! types, on declared sizes. Everything else the resolver notices (nullability,
//! identifier flags, narrowing inside a group) is reported as a note and never
//! changes the verdict.

use crate::models::{CanonicalType, Dialect, FieldDescriptor, TypeCompatibility};
use crate::taxonomy::{self, NativeType, TypeClass};

/// Note attached whenever either side's type could not be classified
pub const UNVERIFIABLE_NOTE: &str = "type unverifiable — manual review required";

/// Declared capacity of a sized type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capacity {
    Bounded(u32),
    Unbounded,
}

impl Capacity {
    fn exceeds(self, other: Capacity) -> bool {
        match (self, other) {
            (Capacity::Unbounded, Capacity::Bounded(_)) => true,
            (Capacity::Bounded(a), Capacity::Bounded(b)) => a > b,
            _ => false,
        }
    }
}

impl std::fmt::Display for Capacity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capacity::Bounded(n) => write!(f, "{}", n),
            Capacity::Unbounded => f.write_str("max"),
        }
    }
}

/// Lossless-widening groups; types in the same group are `compatible`.
fn group(canonical: CanonicalType) -> Option<u8> {
    match canonical {
        CanonicalType::Integer | CanonicalType::Decimal => Some(0),
        CanonicalType::Date | CanonicalType::Datetime => Some(1),
        CanonicalType::Text | CanonicalType::Identifier => Some(2),
        _ => None,
    }
}

/// Effective length (text, binary, identifiers) or precision (numerics).
///
/// Descriptor values win over parameters parsed from the native type. Integer
/// parameters like MySQL's `int(11)` are display widths and are ignored.
fn capacity(dialect: Dialect, field: &FieldDescriptor, canonical: CanonicalType) -> Option<Capacity> {
    let parsed = NativeType::parse(&field.native_type);
    match canonical {
        CanonicalType::Text | CanonicalType::Binary | CanonicalType::Identifier => field
            .length
            .or_else(|| parsed.size())
            .map(Capacity::Bounded)
            .or(parsed.unbounded.then_some(Capacity::Unbounded)),
        CanonicalType::Integer | CanonicalType::Decimal => field.precision.map(Capacity::Bounded).or_else(|| {
            match taxonomy::lookup(dialect, &parsed.base) {
                Some(TypeClass::ScaledNumeric) => parsed.size().map(Capacity::Bounded),
                _ => None,
            }
        }),
        _ => None,
    }
}

/// Warning text for a field whose native type the dialect table does not know.
pub fn unrecognized_type_warning(dialect: Dialect, field: &FieldDescriptor) -> Option<String> {
    if taxonomy::is_recognized(dialect, &field.native_type) {
        return None;
    }
    Some(format!(
        "unrecognized {} type '{}' on field '{}'",
        dialect.as_str(),
        field.native_type,
        field.name
    ))
}

/// Computes the compatibility verdict and reviewer notes for one pairing.
///
/// Never fails: missing or unrecognized metadata lowers the verdict or adds
/// a note.
///
/// # Example
/// ```rust
/// use mapsheet_core::compatibility::resolve;
/// use mapsheet_core::models::{Dialect, FieldDescriptor, TypeCompatibility};
///
/// let source = FieldDescriptor::new("Name", "VARCHAR(255)");
/// let target = FieldDescriptor::new("Name", "VARCHAR(50)");
/// let (verdict, notes) = resolve(&source, Dialect::Mysql, &target, Dialect::Redshift);
///
/// assert_eq!(verdict, TypeCompatibility::Lossy);
/// assert!(notes[0].contains("truncation"));
/// ```
pub fn resolve(
    source: &FieldDescriptor,
    source_dialect: Dialect,
    target: &FieldDescriptor,
    target_dialect: Dialect,
) -> (TypeCompatibility, Vec<String>) {
    let source_type = taxonomy::classify_field(source_dialect, source);
    let target_type = taxonomy::classify_field(target_dialect, target);
    let mut notes = Vec::new();

    let verdict = if source_type == CanonicalType::Unknown || target_type == CanonicalType::Unknown {
        notes.extend(unrecognized_type_warning(source_dialect, source));
        notes.extend(unrecognized_type_warning(target_dialect, target));
        notes.push(UNVERIFIABLE_NOTE.to_string());
        TypeCompatibility::Compatible
    } else if source_type == target_type {
        let source_capacity = capacity(source_dialect, source, source_type);
        let target_capacity = capacity(target_dialect, target, target_type);
        match (source_capacity, target_capacity) {
            (Some(from), Some(to)) if from.exceeds(to) => {
                notes.push(format!(
                    "target type narrower than source ({} > {}), possible truncation",
                    from, to
                ));
                TypeCompatibility::Lossy
            }
            _ => TypeCompatibility::Exact,
        }
    } else if group(source_type).is_some() && group(source_type) == group(target_type) {
        notes.extend(narrowing_note(source_type, target_type));
        TypeCompatibility::Compatible
    } else {
        notes.push(format!(
            "{} source cannot be stored as {} target",
            source_type, target_type
        ));
        TypeCompatibility::Incompatible
    };

    if source.nullable && !target.nullable {
        notes.push("source allows NULL but target is NOT NULL".to_string());
    }
    match (source.is_identifier, target.is_identifier) {
        (true, false) => notes.push("source is an identifier but target is not".to_string()),
        (false, true) => notes.push("target is an identifier but source is not".to_string()),
        _ => {}
    }

    (verdict, notes)
}

fn narrowing_note(source: CanonicalType, target: CanonicalType) -> Option<String> {
    let note = match (source, target) {
        (CanonicalType::Decimal, CanonicalType::Integer) => {
            "decimal source into integer target, fractional part dropped"
        }
        (CanonicalType::Datetime, CanonicalType::Date) => {
            "datetime source into date target, time of day dropped"
        }
        (CanonicalType::Text, CanonicalType::Identifier) => {
            "text source into identifier target, values must be valid identifiers"
        }
        _ => return None,
    };
    Some(note.to_string())
}
