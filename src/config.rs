use std::env;

/// Options used to open a connection against the backing store.
///
/// The values are carried explicitly rather than read from the process
/// environment at connect time, so tests may construct arbitrary credentials.
#[derive(Debug, Clone)]
pub struct ConnOptions {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl ConnOptions {
    /// Builds connection options from the `DB_HOST`, `DB_USER` and
    /// `DB_PASSWORD` environment variables, falling back to `localhost`,
    /// `root` and the empty password when unset.
    pub fn from_env(database: impl Into<String>) -> ConnOptions {
        ConnOptions {
            host: env::var("DB_HOST").unwrap_or_else(|_| "localhost".into()),
            user: env::var("DB_USER").unwrap_or_else(|_| "root".into()),
            password: env::var("DB_PASSWORD").unwrap_or_default(),
            database: database.into(),
        }
    }

    /// Constructs options with explicit values.
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> ConnOptions {
        ConnOptions {
            host: host.into(),
            user: user.into(),
            password: password.into(),
            database: database.into(),
        }
    }
}
