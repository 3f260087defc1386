use async_trait::async_trait;
use tracing::{trace, warn};

use crate::{
    error::{DbResult, Error},
    row::Batch,
    scan::Scan,
    store::{ReadCtx, Select},
};

/// An offset-paginated scan: one bounded `[offset, offset + page_size)` select
/// per pull, over a fresh connection each time.
///
/// No cursor survives between pulls. This trades the snapshot consistency of
/// [`Batches`](crate::scan::Batches) for not holding a connection between
/// pages: if the store mutates between pulls, a page stream can miss or
/// duplicate rows. Both strategies are intentional; pick per use case.
pub struct Pages {
    table: String,
    page_size: usize,
    offset: u64,
    done: bool,
    failure: Option<Error>,
}

impl Pages {
    /// Creates a paginated scan over the given table.
    ///
    /// Fails with [`Error::InvalidBatchSize`] for a page size of zero, before
    /// any store access occurs.
    pub fn new(table: impl Into<String>, page_size: usize) -> DbResult<Pages> {
        if page_size == 0 {
            return Err(Error::InvalidBatchSize);
        }
        Ok(Pages {
            table: table.into(),
            page_size,
            offset: 0,
            done: false,
            failure: None,
        })
    }

    /// The store failure that ended this scan early, if any.
    pub fn failure(&self) -> Option<&Error> {
        self.failure.as_ref()
    }

    fn abort<T>(&mut self, error: Error) -> Option<T> {
        warn!(%error, "scan aborted; ending sequence");
        self.failure = Some(error);
        self.done = true;
        None
    }
}

#[async_trait]
impl Scan for Pages {
    type Item = Batch;

    async fn next(&mut self, ctx: &ReadCtx<'_>) -> DbResult<Option<Batch>> {
        if self.done {
            return Ok(None);
        }

        let select = Select::all(&self.table)
            .limit(self.page_size as u64)
            .offset(self.offset);

        // One connection per page fetch. Dropping `conn` on any early return
        // below releases it.
        let mut conn = match ctx.store.connect(ctx.opts).await {
            Ok(conn) => conn,
            Err(error) => return Ok(self.abort(error)),
        };
        if let Err(error) = conn.execute(&select).await {
            return Ok(self.abort(error));
        }
        let page = match conn.fetch(self.page_size).await {
            Ok(page) => page,
            Err(error) => return Ok(self.abort(error)),
        };
        if let Err(error) = conn.close().await {
            warn!(%error, "failed to close connection");
        }

        if page.is_empty() {
            self.done = true;
            return Ok(None);
        }
        trace!(offset = self.offset, rows = page.len(), "page fetched");
        self.offset += self.page_size as u64;
        Ok(Some(page))
    }
}
