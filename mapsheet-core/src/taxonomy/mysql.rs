//! MySQL column types.

use super::TypeClass;
use crate::models::CanonicalType::{Binary, Boolean, Date, Datetime, Decimal, Integer, Text};

pub(super) const TYPES: &[(&str, TypeClass)] = &[
    // String types
    ("char", TypeClass::Fixed(Text)),
    ("character", TypeClass::Fixed(Text)),
    ("varchar", TypeClass::Fixed(Text)),
    ("character varying", TypeClass::Fixed(Text)),
    ("tinytext", TypeClass::Fixed(Text)),
    ("text", TypeClass::Fixed(Text)),
    ("mediumtext", TypeClass::Fixed(Text)),
    ("longtext", TypeClass::Fixed(Text)),
    ("enum", TypeClass::Fixed(Text)),
    ("set", TypeClass::Fixed(Text)),
    // Integer types; TINYINT(1) is the conventional boolean
    ("tinyint", TypeClass::Flag(Integer)),
    ("smallint", TypeClass::Fixed(Integer)),
    ("mediumint", TypeClass::Fixed(Integer)),
    ("int", TypeClass::Fixed(Integer)),
    ("integer", TypeClass::Fixed(Integer)),
    ("bigint", TypeClass::Fixed(Integer)),
    ("year", TypeClass::Fixed(Integer)),
    // Fixed-point and floating-point types
    ("decimal", TypeClass::ScaledNumeric),
    ("numeric", TypeClass::ScaledNumeric),
    ("dec", TypeClass::ScaledNumeric),
    ("fixed", TypeClass::ScaledNumeric),
    ("float", TypeClass::Fixed(Decimal)),
    ("double", TypeClass::Fixed(Decimal)),
    ("double precision", TypeClass::Fixed(Decimal)),
    ("real", TypeClass::Fixed(Decimal)),
    // Boolean types
    ("bool", TypeClass::Fixed(Boolean)),
    ("boolean", TypeClass::Fixed(Boolean)),
    ("bit", TypeClass::Flag(Binary)),
    // Date/Time types
    ("date", TypeClass::Fixed(Date)),
    ("datetime", TypeClass::Fixed(Datetime)),
    ("timestamp", TypeClass::Fixed(Datetime)),
    // Binary types
    ("binary", TypeClass::Fixed(Binary)),
    ("varbinary", TypeClass::Fixed(Binary)),
    ("tinyblob", TypeClass::Fixed(Binary)),
    ("blob", TypeClass::Fixed(Binary)),
    ("mediumblob", TypeClass::Fixed(Binary)),
    ("longblob", TypeClass::Fixed(Binary)),
];
