//! Shared helper functions for SQL dialect implementations.
//!
//! This module provides reusable building blocks that dialects can compose
//! to implement the `SqlDialect` trait with minimal duplication.

use crate::logical::DataType;

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: ANSI, Snowflake
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote identifier with backticks.
/// Used by: BigQuery
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with single quotes (standard SQL).
/// Used by: All dialects
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

// =============================================================================
// Boolean Formatting
// =============================================================================

/// Format boolean as literal true/false.
pub fn format_bool_literal(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

// =============================================================================
// Data Type Names
// =============================================================================

/// ANSI type names. Semi-structured `VARIANT` has no ANSI equivalent.
pub fn data_type_ansi(data_type: DataType) -> Option<&'static str> {
    Some(match data_type {
        DataType::Int | DataType::Integer => "INTEGER",
        DataType::Bigint => "BIGINT",
        DataType::Tinyint => "TINYINT",
        DataType::Smallint => "SMALLINT",
        DataType::Number | DataType::Numeric => "NUMERIC",
        DataType::Decimal => "DECIMAL",
        DataType::Float => "FLOAT",
        DataType::Double => "DOUBLE",
        DataType::Real => "REAL",
        DataType::Boolean => "BOOLEAN",
        DataType::Char => "CHAR",
        DataType::Varchar | DataType::String | DataType::Text => "VARCHAR",
        DataType::Date => "DATE",
        DataType::Time => "TIME",
        DataType::Datetime => "DATETIME",
        DataType::Timestamp | DataType::TimestampNtz | DataType::TimestampLtz => "TIMESTAMP",
        DataType::TimestampTz => "TIMESTAMP WITH TIME ZONE",
        DataType::Json => "JSON",
        DataType::Binary => "BINARY",
        DataType::Varbinary => "VARBINARY",
        DataType::Variant => return None,
    })
}

/// Snowflake type names. `JSON` is stored as `VARIANT`.
pub fn data_type_snowflake(data_type: DataType) -> Option<&'static str> {
    Some(match data_type {
        DataType::Int | DataType::Integer => "INTEGER",
        DataType::Bigint => "BIGINT",
        DataType::Tinyint => "TINYINT",
        DataType::Smallint => "SMALLINT",
        DataType::Number => "NUMBER",
        DataType::Numeric => "NUMERIC",
        DataType::Decimal => "DECIMAL",
        DataType::Float => "FLOAT",
        DataType::Double => "DOUBLE",
        DataType::Real => "REAL",
        DataType::Boolean => "BOOLEAN",
        DataType::Char => "CHAR",
        DataType::Varchar | DataType::String | DataType::Text => "VARCHAR",
        DataType::Date => "DATE",
        DataType::Time => "TIME",
        DataType::Datetime => "DATETIME",
        DataType::Timestamp => "TIMESTAMP",
        DataType::TimestampNtz => "TIMESTAMP_NTZ",
        DataType::TimestampTz => "TIMESTAMP_TZ",
        DataType::TimestampLtz => "TIMESTAMP_LTZ",
        DataType::Json | DataType::Variant => "VARIANT",
        DataType::Binary => "BINARY",
        DataType::Varbinary => "VARBINARY",
    })
}

/// BigQuery type names.
pub fn data_type_bigquery(data_type: DataType) -> Option<&'static str> {
    Some(match data_type {
        DataType::Int
        | DataType::Integer
        | DataType::Bigint
        | DataType::Tinyint
        | DataType::Smallint => "INT64",
        DataType::Number | DataType::Numeric | DataType::Decimal => "NUMERIC",
        DataType::Float | DataType::Double | DataType::Real => "FLOAT64",
        DataType::Boolean => "BOOL",
        DataType::Char | DataType::Varchar | DataType::String | DataType::Text => "STRING",
        DataType::Date => "DATE",
        DataType::Time => "TIME",
        DataType::Datetime | DataType::TimestampNtz => "DATETIME",
        DataType::Timestamp | DataType::TimestampTz | DataType::TimestampLtz => "TIMESTAMP",
        DataType::Json => "JSON",
        DataType::Binary | DataType::Varbinary => "BYTES",
        DataType::Variant => return None,
    })
}

// =============================================================================
// Schema Evolution Mappings
// =============================================================================

/// Width rank inside the integral family.
fn integral_rank(data_type: DataType) -> Option<u8> {
    match data_type {
        DataType::Tinyint => Some(1),
        DataType::Smallint => Some(2),
        DataType::Int | DataType::Integer => Some(3),
        DataType::Bigint => Some(4),
        _ => None,
    }
}

fn is_fractional(data_type: DataType) -> bool {
    matches!(
        data_type,
        DataType::Float
            | DataType::Double
            | DataType::Real
            | DataType::Decimal
            | DataType::Numeric
            | DataType::Number
    )
}

/// Character types are interchangeable; everything else needs an explicit change.
pub fn implicit_mapping_standard(main: DataType, staging: DataType) -> bool {
    main.is_string() && staging.is_string()
}

/// Numeric to numeric and temporal to temporal conversions.
pub fn explicit_mapping_standard(main: DataType, staging: DataType) -> bool {
    let numeric = |dt: DataType| integral_rank(dt).is_some() || is_fractional(dt);
    (numeric(main) && numeric(staging)) || (main.is_temporal() && staging.is_temporal())
}

/// Narrower integral values fit in a wider integral column, and any
/// integral value fits in a fractional one.
pub fn implicit_mapping_widening(main: DataType, staging: DataType) -> bool {
    if implicit_mapping_standard(main, staging) {
        return true;
    }
    match (integral_rank(main), integral_rank(staging)) {
        (Some(m), Some(s)) => s <= m,
        (None, Some(_)) => is_fractional(main),
        _ => false,
    }
}
