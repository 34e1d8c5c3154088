//! Schema data structures
//!
//! These types describe what the catalog reports about a database and form
//! the contract between introspection (produces) and the navigator (consumes).
//! None of them are cached: each one lives for a single request.

use std::fmt;

use serde::{Serialize, Serializer};

/// A table column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
    pub nullable: bool,
    /// Default expression as reported by the catalog
    pub default: Option<String>,
    /// Derived: column is part of the primary key
    pub primary_key: bool,
    /// Derived: column appears in at least one (non primary key) index
    pub indexed: bool,
}

impl Column {
    /// Column as read from the catalog, before any flags are derived
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            default: None,
            primary_key: false,
            indexed: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A foreign key constraint declared on a table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForeignKey {
    pub name: String,
    /// Local columns, in constraint order
    pub constrained_columns: Vec<String>,
    pub referred_schema: String,
    pub referred_table: String,
    /// Referenced columns, in constraint order
    pub referred_columns: Vec<String>,
}

/// An index declared on a table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Index {
    pub name: String,
    pub column_names: Vec<String>,
    pub unique: bool,
}

/// Planner statistics for a single column, one row of `pg_stats`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStatistic {
    pub schema: String,
    pub table: String,
    pub column: String,
    pub inherited: bool,
    pub null_frac: Option<f32>,
    pub avg_width: Option<i32>,
    pub n_distinct: Option<f32>,
    pub most_common_vals: Option<Vec<String>>,
    pub most_common_freqs: Option<Vec<f32>>,
    pub histogram_bounds: Option<Vec<String>>,
    pub correlation: Option<f32>,
    pub most_common_elems: Option<Vec<String>>,
    pub most_common_elem_freqs: Option<Vec<f32>>,
    pub elem_count_histogram: Option<Vec<f32>>,
}

impl ColumnStatistic {
    /// A statistics row with nothing collected yet
    pub fn empty(schema: &str, table: &str, column: &str) -> Self {
        Self {
            schema: schema.to_string(),
            table: table.to_string(),
            column: column.to_string(),
            inherited: false,
            null_frac: None,
            avg_width: None,
            n_distinct: None,
            most_common_vals: None,
            most_common_freqs: None,
            histogram_bounds: None,
            correlation: None,
            most_common_elems: None,
            most_common_elem_freqs: None,
            elem_count_histogram: None,
        }
    }
}

/// Kind of object a search hit points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Schema,
    Table,
}

/// A single search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub kind: SearchKind,
    pub title: String,
    pub url: String,
}

/// Percent-encode a name for use as one URL path segment
pub fn path_segment(name: &str) -> String {
    urlencoding::encode(name).into_owned()
}

impl SearchMatch {
    pub fn schema(schema: &str) -> Self {
        Self {
            kind: SearchKind::Schema,
            title: schema.to_string(),
            url: format!("/{}/tables", path_segment(schema)),
        }
    }

    pub fn table(schema: &str, table: &str) -> Self {
        Self {
            kind: SearchKind::Table,
            title: format!("{}.{}", schema, table),
            url: format!("/{}/tables/{}", path_segment(schema), path_segment(table)),
        }
    }
}

/// Rows returned by an ad-hoc query, every value in its text form
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Declared type of a column
///
/// Serializes to its canonical SQL spelling, see the `Display` impl.
#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    SmallInt,
    Integer,
    BigInt,
    Boolean,
    Text,
    Varchar(Option<u32>),
    Char(Option<u32>),
    Real,
    DoublePrecision,
    Numeric {
        precision: Option<u32>,
        scale: Option<u32>,
    },
    Timestamp,
    TimestampTz,
    Date,
    Time,
    TimeTz,
    Uuid,
    Json,
    JsonBinary,
    Binary,
    Array(Box<DataType>),
    /// User-defined or unrecognised type, stores the catalog spelling
    Other(String),
    /// No type information available
    Null,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::SmallInt => f.write_str("SMALLINT"),
            DataType::Integer => f.write_str("INTEGER"),
            DataType::BigInt => f.write_str("BIGINT"),
            DataType::Boolean => f.write_str("BOOLEAN"),
            DataType::Text => f.write_str("TEXT"),
            DataType::Varchar(Some(len)) => write!(f, "VARCHAR({})", len),
            DataType::Varchar(None) => f.write_str("VARCHAR"),
            DataType::Char(Some(len)) => write!(f, "CHAR({})", len),
            DataType::Char(None) => f.write_str("CHAR"),
            DataType::Real => f.write_str("REAL"),
            DataType::DoublePrecision => f.write_str("DOUBLE PRECISION"),
            DataType::Numeric {
                precision: Some(precision),
                scale: Some(scale),
            } => write!(f, "NUMERIC({}, {})", precision, scale),
            DataType::Numeric {
                precision: Some(precision),
                scale: None,
            } => write!(f, "NUMERIC({})", precision),
            DataType::Numeric { .. } => f.write_str("NUMERIC"),
            DataType::Timestamp => f.write_str("TIMESTAMP WITHOUT TIME ZONE"),
            DataType::TimestampTz => f.write_str("TIMESTAMP WITH TIME ZONE"),
            DataType::Date => f.write_str("DATE"),
            DataType::Time => f.write_str("TIME WITHOUT TIME ZONE"),
            DataType::TimeTz => f.write_str("TIME WITH TIME ZONE"),
            DataType::Uuid => f.write_str("UUID"),
            DataType::Json => f.write_str("JSON"),
            DataType::JsonBinary => f.write_str("JSONB"),
            DataType::Binary => f.write_str("BYTEA"),
            DataType::Array(inner) => write!(f, "{}[]", inner),
            DataType::Other(name) => f.write_str(name),
            DataType::Null => f.write_str("NULL"),
        }
    }
}

impl Serialize for DataType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
