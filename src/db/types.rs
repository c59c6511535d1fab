//! Lookup result types.
//!
//! Defines the cell, row and result-set structures handed from the
//! dispatcher to the presentation layer.

use crate::catalog::{ColumnSchema, ModeId};
use crate::error::{Result, ShelfError};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// A row of cells, positionally aligned with a mode's columns.
pub type Row = Vec<Value>;

/// Rows produced by one dispatch, paired with the columns they describe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    /// Mode that produced the rows.
    pub mode_id: ModeId,

    /// Column names, in display order.
    pub columns: ColumnSchema,

    /// Rows of data.
    pub rows: Vec<Row>,

    /// Time spent in the store.
    #[serde(serialize_with = "serialize_millis")]
    pub execution_time: Duration,
}

impl ResultSet {
    /// Creates a result set, checking every row against the column count.
    pub fn new(mode_id: ModeId, columns: ColumnSchema, rows: Vec<Row>) -> Result<Self> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(ShelfError::internal(format!(
                "Row {index} of mode {mode_id} has {} cells, expected {}",
                row.len(),
                columns.len()
            )));
        }

        Ok(Self {
            mode_id,
            columns,
            rows,
            execution_time: Duration::ZERO,
        })
    }

    /// Creates a result set with no rows.
    pub fn empty(mode_id: ModeId, columns: ColumnSchema) -> Self {
        Self {
            mode_id,
            columns,
            rows: Vec::new(),
            execution_time: Duration::ZERO,
        }
    }

    /// Sets the execution time.
    pub fn with_execution_time(mut self, duration: Duration) -> Self {
        self.execution_time = duration;
        self
    }

    /// Returns true if the result set is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Represents a single cell read from the store.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// Signed integer (up to i64).
    Int(i64),

    /// Floating point number.
    Float(f64),

    /// Text/string value.
    String(String),
}

impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Converts the value to a string representation.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format!("{f:.2}"),
            Value::String(s) => s.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

// Conversion implementations for common types
impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}
