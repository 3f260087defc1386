use async_trait::async_trait;

use crate::{
    config::ConnOptions,
    error::DbResult,
    row::Value,
    store::{ReadCtx, Store},
};

mod batches;
pub use batches::*;

mod pages;
pub use pages::*;

mod records;
pub use records::*;

/// A lazy, forward-only scan over the backing store.
///
/// Scans follow the iterator model: the `next` method may be called
/// arbitrarily to lazily fetch elements without materializing the full result
/// set. A scan holds at most one connection at a time; it is released exactly
/// once, on exhaustion, on error, or when the scan is dropped mid-iteration.
///
/// Connection and query failures inside a scan do not propagate to the
/// consumer: the scan logs them, records them (see the `failure` accessor on
/// each scan type) and ends the sequence.
#[async_trait]
pub trait Scan {
    type Item: Send;

    /// Produces the next element in the stream.
    async fn next(&mut self, ctx: &ReadCtx<'_>) -> DbResult<Option<Self::Item>>;
}

/// A handle over one backing store plus the connection options scans should
/// use against it.
pub struct Source<S> {
    store: S,
    opts: ConnOptions,
}

impl<S: Store> Source<S> {
    pub fn new(store: S, opts: ConnOptions) -> Source<S> {
        Source { store, opts }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Builds the pull context handed to scans.
    pub fn ctx(&self) -> ReadCtx<'_> {
        ReadCtx {
            store: &self.store,
            opts: &self.opts,
        }
    }

    /// Drives the given scan to exhaustion, passing the callback closure for
    /// each yielded element.
    pub async fn for_each<Q, E, F>(&self, mut scan: Q, mut f: F) -> DbResult<Result<(), E>>
    where
        Q: Scan + Send,
        F: FnMut(Q::Item) -> Result<(), E> + Send,
        E: Send,
    {
        let ctx = self.ctx();
        while let Some(item) = scan.next(&ctx).await? {
            if let error @ Err(_) = f(item) {
                return Ok(error);
            }
        }
        Ok(Ok(()))
    }

    /// Computes the average of a numeric column by driving a one-row-at-a-time
    /// scan, keeping only a running sum and count.
    ///
    /// Returns 0 when the store yields no rows (or the column is never
    /// numeric), never dividing by zero.
    pub async fn average_of(&self, table: &str, column: &str) -> DbResult<f64> {
        let mut records = Records::with_columns(table, vec![column.to_owned()]);
        let ctx = self.ctx();

        let mut sum = 0.0_f64;
        let mut count = 0_u64;
        while let Some(row) = records.next(&ctx).await? {
            if let Some(value) = row.get(column).and_then(Value::as_f64) {
                sum += value;
                count += 1;
            }
        }

        if count == 0 {
            Ok(0.0)
        } else {
            Ok(sum / count as f64)
        }
    }
}
