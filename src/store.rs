use std::fmt;

use async_trait::async_trait;

use crate::{config::ConnOptions, error::DbResult, row::Batch};

pub mod mem;

/// A bounded select request against a named table.
///
/// This is the only query shape scans issue: an optional column projection
/// over one table, optionally bounded by a row-count limit and/or an offset.
#[derive(Debug, Clone)]
pub struct Select {
    pub table: String,
    /// Projected column names. Empty means all columns, in schema order.
    pub columns: Vec<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Select {
    /// A full-table select.
    pub fn all(table: impl Into<String>) -> Select {
        Select {
            table: table.into(),
            columns: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn columns(mut self, columns: Vec<String>) -> Select {
        self.columns = columns;
        self
    }

    pub fn limit(mut self, limit: u64) -> Select {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Select {
        self.offset = Some(offset);
        self
    }
}

impl fmt::Display for Select {
    /// Renders the request as SQL text. Stores log this rendering for each
    /// executed query.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT ")?;
        if self.columns.is_empty() {
            write!(f, "*")?;
        } else {
            write!(f, "{}", self.columns.join(", "))?;
        }
        write!(f, " FROM {}", self.table)?;
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {limit}")?;
        }
        if let Some(offset) = self.offset {
            write!(f, " OFFSET {offset}")?;
        }
        Ok(())
    }
}

/// The backing-store capability: opens connections against a tabular store.
#[async_trait]
pub trait Store: Send + Sync {
    /// Opens a new connection using the given options.
    async fn connect(&self, opts: &ConnOptions) -> DbResult<Box<dyn Connection>>;
}

/// An open connection with incremental cursor semantics.
///
/// A connection holds at most one cursor: the one opened by the last
/// [`execute`](Connection::execute) call. Dropping an unclosed connection
/// still releases the underlying resource; release happens exactly once.
#[async_trait]
pub trait Connection: Send {
    /// Runs the given select, opening a cursor at its first row.
    async fn execute(&mut self, select: &Select) -> DbResult<()>;

    /// Fetches up to `max` rows from the current cursor position.
    ///
    /// An empty result means the cursor is exhausted.
    async fn fetch(&mut self, max: usize) -> DbResult<Batch>;

    /// Closes the connection.
    async fn close(&mut self) -> DbResult<()>;
}

/// Context handed to scans on every pull.
pub struct ReadCtx<'a> {
    pub store: &'a dyn Store,
    pub opts: &'a ConnOptions,
}
