use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, trace};

use crate::{
    catalog::{Column, TableSchema},
    config::ConnOptions,
    error::{DbResult, Error},
    row::{Batch, Row, Value},
    store::{Connection, Select, Store},
};

/// An in-memory tabular store.
///
/// Cursors snapshot their result set when the select is executed, so one scan
/// is stable under writes that land after its cursor was opened. Offset-based
/// pagination re-queries the store per page and observes such writes instead.
///
/// The store counts opened and closed connections and the largest single
/// fetch, so tests can assert on resource usage.
#[derive(Clone)]
pub struct MemStore {
    inner: Arc<Inner>,
}

struct Inner {
    tables: DashMap<String, Table>,
    /// When set, connections must present exactly this password.
    password: Option<String>,
    opened: AtomicUsize,
    closed: AtomicUsize,
    max_fetch: AtomicUsize,
}

struct Table {
    schema: TableSchema,
    rows: Vec<Vec<Value>>,
}

impl MemStore {
    /// Creates a store that accepts any credentials.
    pub fn new() -> MemStore {
        MemStore::with_inner(None)
    }

    /// Creates a store that rejects connections not presenting `password`.
    pub fn with_password(password: impl Into<String>) -> MemStore {
        MemStore::with_inner(Some(password.into()))
    }

    fn with_inner(password: Option<String>) -> MemStore {
        MemStore {
            inner: Arc::new(Inner {
                tables: DashMap::new(),
                password,
                opened: AtomicUsize::new(0),
                closed: AtomicUsize::new(0),
                max_fetch: AtomicUsize::new(0),
            }),
        }
    }

    /// Creates the given table if it does not exist yet.
    ///
    /// Returns `false` when the table was already present, in which case the
    /// existing schema and rows are left untouched.
    pub fn create_table(&self, name: impl Into<String>, schema: TableSchema) -> bool {
        let mut created = false;
        self.inner.tables.entry(name.into()).or_insert_with(|| {
            created = true;
            Table {
                schema,
                rows: Vec::new(),
            }
        });
        created
    }

    /// Appends a row to the given table, validating it against the schema.
    pub fn insert(&self, table: &str, values: Vec<Value>) -> DbResult<()> {
        let mut table = self
            .inner
            .tables
            .get_mut(table)
            .ok_or_else(|| Error::Query(format!("table `{table}` does not exist").into()))?;

        let columns = &table.schema.columns;
        if values.len() != columns.len() {
            return Err(Error::Query(
                format!(
                    "expected {} values, but got {}",
                    columns.len(),
                    values.len()
                )
                .into(),
            ));
        }
        for (column, value) in columns.iter().zip(&values) {
            if column.ty != value.type_id() {
                return Err(Error::Query(
                    format!(
                        "unexpected type for column `{}`, expected `{}`, but got `{}`",
                        column.name,
                        column.ty.name(),
                        value.type_id().name(),
                    )
                    .into(),
                ));
            }
        }

        table.rows.push(values);
        Ok(())
    }

    /// Returns the number of rows in the given table, if it exists.
    pub fn row_count(&self, table: &str) -> Option<usize> {
        self.inner.tables.get(table).map(|table| table.rows.len())
    }

    /// Total connections opened so far.
    pub fn connections_opened(&self) -> usize {
        self.inner.opened.load(Ordering::Relaxed)
    }

    /// Total connections released so far (explicit close or drop).
    pub fn connections_closed(&self) -> usize {
        self.inner.closed.load(Ordering::Relaxed)
    }

    /// The largest row count a single fetch has asked for.
    pub fn max_fetch_size(&self) -> usize {
        self.inner.max_fetch.load(Ordering::Relaxed)
    }
}

impl Default for MemStore {
    fn default() -> Self {
        MemStore::new()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn connect(&self, opts: &ConnOptions) -> DbResult<Box<dyn Connection>> {
        if let Some(expected) = &self.inner.password {
            if &opts.password != expected {
                return Err(Error::Connection(
                    format!("access denied for user `{}`@`{}`", opts.user, opts.host).into(),
                ));
            }
        }
        self.inner.opened.fetch_add(1, Ordering::Relaxed);
        trace!(user = %opts.user, database = %opts.database, "connection opened");
        Ok(Box::new(MemConnection {
            inner: Arc::clone(&self.inner),
            cursor: None,
            released: false,
        }))
    }
}

struct MemConnection {
    inner: Arc<Inner>,
    cursor: Option<Cursor>,
    released: bool,
}

/// A snapshot of one executed select, tracking the next unread position.
struct Cursor {
    columns: Arc<[Column]>,
    rows: std::vec::IntoIter<Vec<Value>>,
}

#[async_trait]
impl Connection for MemConnection {
    async fn execute(&mut self, select: &Select) -> DbResult<()> {
        debug!(query = %select, "executing query");

        let table = self.inner.tables.get(&select.table).ok_or_else(|| {
            Error::Query(format!("table `{}` does not exist", select.table).into())
        })?;

        // Resolve the projection against the schema.
        let (columns, indices): (Vec<Column>, Vec<usize>) = if select.columns.is_empty() {
            let all = 0..table.schema.columns.len();
            (table.schema.columns.clone(), all.collect())
        } else {
            let mut columns = Vec::with_capacity(select.columns.len());
            let mut indices = Vec::with_capacity(select.columns.len());
            for name in &select.columns {
                let index = table.schema.column_index(name).ok_or_else(|| {
                    Error::Query(format!("unknown column `{name}`").into())
                })?;
                columns.push(table.schema.columns[index].clone());
                indices.push(index);
            }
            (columns, indices)
        };

        let offset = select.offset.unwrap_or(0) as usize;
        let limit = select.limit.map_or(usize::MAX, |limit| limit as usize);
        let rows: Vec<Vec<Value>> = table
            .rows
            .iter()
            .skip(offset)
            .take(limit)
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        self.cursor = Some(Cursor {
            columns: columns.into(),
            rows: rows.into_iter(),
        });
        Ok(())
    }

    async fn fetch(&mut self, max: usize) -> DbResult<Batch> {
        let cursor = self
            .cursor
            .as_mut()
            .ok_or_else(|| Error::Query("no query has been executed".into()))?;

        self.inner.max_fetch.fetch_max(max, Ordering::Relaxed);

        let batch: Batch = cursor
            .rows
            .by_ref()
            .take(max)
            .map(|values| Row::new(Arc::clone(&cursor.columns), values))
            .collect();
        trace!(rows = batch.len(), "fetched from cursor");
        Ok(batch)
    }

    async fn close(&mut self) -> DbResult<()> {
        self.release();
        Ok(())
    }
}

impl MemConnection {
    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.cursor = None;
            self.inner.closed.fetch_add(1, Ordering::Relaxed);
            debug!("connection closed");
        }
    }
}

impl Drop for MemConnection {
    fn drop(&mut self) {
        self.release();
    }
}
