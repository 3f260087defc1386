use rowstream::{
    config::ConnOptions,
    row::Value,
    scan::Source,
    seed::{self, USER_TABLE},
    store::mem::MemStore,
};

/// Sets up tracing subscriber.
#[allow(dead_code)]
pub fn setup_tracing(level: Option<&str>) {
    use tracing_subscriber::{
        fmt::{format::FmtSpan, layer},
        layer::SubscriberExt,
        util::SubscriberInitExt,
        EnvFilter,
    };

    let filter_layer = level
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::try_from_default_env().unwrap_or("warn".into()));
    let fmt_layer = layer().with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

#[allow(dead_code)]
pub fn test_opts() -> ConnOptions {
    ConnOptions::new("localhost", "root", "", "prodev")
}

/// Ages are deterministic: row `i` has age `18 + i % 50`.
#[allow(dead_code)]
pub fn age_of(i: usize) -> i64 {
    18 + (i as i64 % 50)
}

/// The user id of row `i`, zero-padded so store order is assertable.
#[allow(dead_code)]
pub fn user_id_of(i: usize) -> String {
    format!("{i:08}")
}

/// Builds a source over a fresh in-memory store seeded with `n` users.
#[allow(dead_code)]
pub fn seeded_source(n: usize) -> Source<MemStore> {
    let store = MemStore::new();
    store.create_table(USER_TABLE, seed::user_schema());
    for i in 0..n {
        store
            .insert(
                USER_TABLE,
                vec![
                    Value::Text(user_id_of(i)),
                    Value::Text(format!("user {i}")),
                    Value::Text(format!("user{i}@example.com")),
                    Value::Int(age_of(i)),
                ],
            )
            .unwrap();
    }
    Source::new(store, test_opts())
}
