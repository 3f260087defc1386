use std::{fmt, sync::Arc};

use crate::catalog::{Column, TypeId};

/// A database value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl Value {
    /// Returns the corresponding type id.
    pub fn type_id(&self) -> TypeId {
        match self {
            Value::Int(_) => TypeId::Int,
            Value::Text(_) => TypeId::Text,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(inner) => Some(*inner),
            Value::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(inner) => Some(inner),
            Value::Int(_) => None,
        }
    }

    /// Numeric view of the value, used by aggregations.
    pub fn as_f64(&self) -> Option<f64> {
        self.as_int().map(|int| int as f64)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(inner) => inner.fmt(f),
            Value::Text(inner) => inner.fmt(f),
        }
    }
}

/// One record produced by a scan: an ordered mapping from column name to
/// [`Value`].
///
/// The column order is shared between all rows of one cursor, so a row only
/// carries its values positionally. Rows are immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    columns: Arc<[Column]>,
    values: Vec<Value>,
}

/// A bounded group of rows fetched in one backing-store round trip.
///
/// The final batch of a stream may be smaller than the configured size. An
/// empty batch is never yielded; it terminates the sequence instead.
pub type Batch = Vec<Row>;

impl Row {
    /// Creates a row over the given column order.
    ///
    /// `values` must be in the same order as `columns`.
    pub fn new(columns: Arc<[Column]>, values: Vec<Value>) -> Row {
        debug_assert_eq!(columns.len(), values.len());
        Row { columns, values }
    }

    /// Returns a reference to the value of the given column.
    ///
    /// Linear over the column count, which is small.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|col| col.name == name)?;
        self.values.get(index)
    }

    /// The column order of this row.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The values, in column order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, (column, value)) in self.columns.iter().zip(&self.values).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={value}", column.name)?;
        }
        write!(f, ")")
    }
}
