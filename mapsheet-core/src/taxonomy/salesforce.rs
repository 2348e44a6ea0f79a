//! Salesforce describe() field types.
//!
//! `currency` is deliberately absent: its meaning depends on the org's
//! multi-currency settings, so it is left for manual review.

use super::TypeClass;
use crate::models::CanonicalType::{Binary, Boolean, Date, Datetime, Identifier, Integer, Text};

pub(super) const TYPES: &[(&str, TypeClass)] = &[
    // Identifiers
    ("id", TypeClass::Fixed(Identifier)),
    ("reference", TypeClass::Fixed(Identifier)),
    // Text
    ("string", TypeClass::Fixed(Text)),
    ("textarea", TypeClass::Fixed(Text)),
    ("encryptedstring", TypeClass::Fixed(Text)),
    ("phone", TypeClass::Fixed(Text)),
    ("url", TypeClass::Fixed(Text)),
    ("email", TypeClass::Fixed(Text)),
    ("picklist", TypeClass::Fixed(Text)),
    ("multipicklist", TypeClass::Fixed(Text)),
    ("combobox", TypeClass::Fixed(Text)),
    // Numbers
    ("int", TypeClass::Fixed(Integer)),
    ("integer", TypeClass::Fixed(Integer)),
    ("long", TypeClass::Fixed(Integer)),
    ("double", TypeClass::ScaledNumeric),
    ("percent", TypeClass::ScaledNumeric),
    // Metadata API name for double fields, e.g. Number(10,2)
    ("number", TypeClass::ScaledNumeric),
    // Everything else
    ("boolean", TypeClass::Fixed(Boolean)),
    ("date", TypeClass::Fixed(Date)),
    ("datetime", TypeClass::Fixed(Datetime)),
    ("base64", TypeClass::Fixed(Binary)),
];
