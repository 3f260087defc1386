use std::mem;

use async_trait::async_trait;
use tracing::{trace, warn};

use crate::{
    error::{DbResult, Error},
    row::Batch,
    scan::Scan,
    store::{Connection, ReadCtx, Select},
};

/// A batched scan: one persistent cursor, pulled `batch_size` rows at a time.
///
/// The cursor is opened lazily on the first pull and spans the whole scan, so
/// the yielded batches are a consistent snapshot of one select. Compare
/// [`Pages`](crate::scan::Pages), which re-queries the store per page.
pub struct Batches {
    select: Select,
    batch_size: usize,
    state: State,
    failure: Option<Error>,
}

enum State {
    /// No connection opened yet.
    Init,
    /// Cursor open, mid-scan.
    Running(Box<dyn Connection>),
    /// Exhausted, aborted, or never started; the connection is released.
    Done,
}

impl Batches {
    /// Creates a batched scan over the given table.
    ///
    /// Fails with [`Error::InvalidBatchSize`] for a batch size of zero, before
    /// any store access occurs.
    pub fn new(table: impl Into<String>, batch_size: usize) -> DbResult<Batches> {
        if batch_size == 0 {
            return Err(Error::InvalidBatchSize);
        }
        Ok(Batches::with_select(Select::all(table), batch_size))
    }

    pub(crate) fn with_select(select: Select, batch_size: usize) -> Batches {
        Batches {
            select,
            batch_size,
            state: State::Init,
            failure: None,
        }
    }

    /// The store failure that ended this scan early, if any.
    ///
    /// Scans convert store failures into end-of-sequence; this accessor makes
    /// that termination distinguishable from natural exhaustion.
    pub fn failure(&self) -> Option<&Error> {
        self.failure.as_ref()
    }

    /// Records the failure and ends the sequence.
    fn abort<T>(&mut self, error: Error) -> Option<T> {
        warn!(%error, "scan aborted; ending sequence");
        self.failure = Some(error);
        None
    }
}

#[async_trait]
impl Scan for Batches {
    type Item = Batch;

    async fn next(&mut self, ctx: &ReadCtx<'_>) -> DbResult<Option<Batch>> {
        loop {
            // Take the state out; every path below either reinstates
            // `Running` or leaves `Done`, dropping (and thus releasing) the
            // connection.
            match mem::replace(&mut self.state, State::Done) {
                State::Done => return Ok(None),
                State::Init => {
                    let mut conn = match ctx.store.connect(ctx.opts).await {
                        Ok(conn) => conn,
                        Err(error) => return Ok(self.abort(error)),
                    };
                    if let Err(error) = conn.execute(&self.select).await {
                        return Ok(self.abort(error));
                    }
                    trace!(query = %self.select, "cursor opened");
                    self.state = State::Running(conn);
                }
                State::Running(mut conn) => {
                    let batch = match conn.fetch(self.batch_size).await {
                        Ok(batch) => batch,
                        Err(error) => return Ok(self.abort(error)),
                    };
                    if batch.is_empty() {
                        if let Err(error) = conn.close().await {
                            warn!(%error, "failed to close connection");
                        }
                        return Ok(None);
                    }
                    self.state = State::Running(conn);
                    return Ok(Some(batch));
                }
            }
        }
    }
}
