use async_trait::async_trait;

use crate::{
    error::{DbResult, Error},
    row::Row,
    scan::{Batches, Scan},
    store::{ReadCtx, Select},
};

/// A one-row-at-a-time scan over a table.
///
/// Opens one cursor lazily on the first pull and fetches a single row per
/// suspension point, so at most one row is ever held between pulls.
pub struct Records {
    inner: Batches,
}

impl Records {
    /// Creates a record scan over all columns of the given table.
    pub fn new(table: impl Into<String>) -> Records {
        Records {
            inner: Batches::with_select(Select::all(table), 1),
        }
    }

    /// Creates a record scan projected to the given columns, for narrow reads
    /// such as aggregations over a single field.
    pub fn with_columns(table: impl Into<String>, columns: Vec<String>) -> Records {
        Records {
            inner: Batches::with_select(Select::all(table).columns(columns), 1),
        }
    }

    /// The store failure that ended this scan early, if any.
    pub fn failure(&self) -> Option<&Error> {
        self.inner.failure()
    }
}

#[async_trait]
impl Scan for Records {
    type Item = Row;

    async fn next(&mut self, ctx: &ReadCtx<'_>) -> DbResult<Option<Row>> {
        // Non-empty by the `Batches` contract, so this yields exactly one row
        // per inner batch.
        let batch = self.inner.next(ctx).await?;
        Ok(batch.and_then(|batch| batch.into_iter().next()))
    }
}
