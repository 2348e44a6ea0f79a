//! Amazon Redshift column types, including the PostgreSQL aliases the
//! catalog reports.

use super::TypeClass;
use crate::models::CanonicalType::{Binary, Boolean, Date, Datetime, Decimal, Integer, Text};

pub(super) const TYPES: &[(&str, TypeClass)] = &[
    // Integers
    ("smallint", TypeClass::Fixed(Integer)),
    ("int2", TypeClass::Fixed(Integer)),
    ("integer", TypeClass::Fixed(Integer)),
    ("int", TypeClass::Fixed(Integer)),
    ("int4", TypeClass::Fixed(Integer)),
    ("bigint", TypeClass::Fixed(Integer)),
    ("int8", TypeClass::Fixed(Integer)),
    // Numerics
    ("decimal", TypeClass::ScaledNumeric),
    ("numeric", TypeClass::ScaledNumeric),
    ("real", TypeClass::Fixed(Decimal)),
    ("float4", TypeClass::Fixed(Decimal)),
    ("float", TypeClass::Fixed(Decimal)),
    ("float8", TypeClass::Fixed(Decimal)),
    ("double precision", TypeClass::Fixed(Decimal)),
    // Boolean
    ("boolean", TypeClass::Fixed(Boolean)),
    ("bool", TypeClass::Fixed(Boolean)),
    // Character
    ("char", TypeClass::Fixed(Text)),
    ("character", TypeClass::Fixed(Text)),
    ("nchar", TypeClass::Fixed(Text)),
    ("bpchar", TypeClass::Fixed(Text)),
    ("varchar", TypeClass::Fixed(Text)),
    ("character varying", TypeClass::Fixed(Text)),
    ("nvarchar", TypeClass::Fixed(Text)),
    ("text", TypeClass::Fixed(Text)),
    // Date and time
    ("date", TypeClass::Fixed(Date)),
    ("timestamp", TypeClass::Fixed(Datetime)),
    ("timestamp without time zone", TypeClass::Fixed(Datetime)),
    ("timestamptz", TypeClass::Fixed(Datetime)),
    ("timestamp with time zone", TypeClass::Fixed(Datetime)),
    // Binary
    ("varbyte", TypeClass::Fixed(Binary)),
    ("varbinary", TypeClass::Fixed(Binary)),
    ("binary varying", TypeClass::Fixed(Binary)),
];
