use std::{borrow::Cow, io, path::PathBuf};

pub type DbResult<T, E = Error> = Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backing store was unreachable or rejected the credentials.
    #[error("connection failure: {0}")]
    Connection(Cow<'static, str>),

    /// The store rejected or failed to run a select, e.g. due to an unknown
    /// table or column.
    #[error("query execution failure: {0}")]
    Query(Cow<'static, str>),

    /// A batch or page size of zero was requested.
    #[error("invalid batch size: must be at least 1")]
    InvalidBatchSize,

    /// The seed CSV file does not exist.
    #[error("source file `{0}` not found")]
    SourceNotFound(PathBuf),

    /// A seed CSV record could not be parsed.
    #[error("malformed csv record at line {line}: {reason}")]
    Csv {
        line: usize,
        reason: Cow<'static, str>,
    },

    /// An generic IO error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
