//! SQL Server `INFORMATION_SCHEMA.COLUMNS.DATA_TYPE` names.

use super::TypeClass;
use crate::models::CanonicalType::{
    Binary, Boolean, Date, Datetime, Decimal, Identifier, Integer, Text,
};

pub(super) const TYPES: &[(&str, TypeClass)] = &[
    // Character types
    ("char", TypeClass::Fixed(Text)),
    ("varchar", TypeClass::Fixed(Text)),
    ("nchar", TypeClass::Fixed(Text)),
    ("nvarchar", TypeClass::Fixed(Text)),
    ("text", TypeClass::Fixed(Text)),
    ("ntext", TypeClass::Fixed(Text)),
    ("sysname", TypeClass::Fixed(Text)),
    ("xml", TypeClass::Fixed(Text)),
    // Exact numerics
    ("tinyint", TypeClass::Fixed(Integer)),
    ("smallint", TypeClass::Fixed(Integer)),
    ("int", TypeClass::Fixed(Integer)),
    ("bigint", TypeClass::Fixed(Integer)),
    ("decimal", TypeClass::ScaledNumeric),
    ("numeric", TypeClass::ScaledNumeric),
    ("money", TypeClass::Fixed(Decimal)),
    ("smallmoney", TypeClass::Fixed(Decimal)),
    // Approximate numerics
    ("float", TypeClass::Fixed(Decimal)),
    ("real", TypeClass::Fixed(Decimal)),
    ("bit", TypeClass::Fixed(Boolean)),
    // Date and time
    ("date", TypeClass::Fixed(Date)),
    ("datetime", TypeClass::Fixed(Datetime)),
    ("datetime2", TypeClass::Fixed(Datetime)),
    ("smalldatetime", TypeClass::Fixed(Datetime)),
    ("datetimeoffset", TypeClass::Fixed(Datetime)),
    // Binary; `timestamp` is a row version, not a point in time
    ("binary", TypeClass::Fixed(Binary)),
    ("varbinary", TypeClass::Fixed(Binary)),
    ("image", TypeClass::Fixed(Binary)),
    ("timestamp", TypeClass::Fixed(Binary)),
    ("rowversion", TypeClass::Fixed(Binary)),
    ("uniqueidentifier", TypeClass::Fixed(Identifier)),
];
