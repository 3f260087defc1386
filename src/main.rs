use std::{
    io::{self, Write},
    path::Path,
    str::FromStr,
};

use rowstream::{
    config::ConnOptions,
    error::{DbResult, Error},
    row::Value,
    scan::{Batches, Pages, Records, Source},
    seed::{self, USER_TABLE},
    store::mem::MemStore,
};
use tracing::info;

#[tokio::main]
async fn main() -> DbResult<()> {
    setup_tracing();

    let opts = ConnOptions::from_env("prodev");
    let store = MemStore::new();

    match seed::seed_from_csv(&store, Path::new("user_data.csv")).await {
        Ok(rows) => info!(rows, "seeded from user_data.csv"),
        Err(Error::SourceNotFound(_)) => {
            info!("user_data.csv not found; loading built-in fixture");
            seed_fixture(&store)?;
        }
        Err(error) => return Err(error),
    }

    let source = Source::new(store, opts);

    loop {
        println!("Pick a command: `stream`, `batches`, `pages`, `avg` or `quit`.");
        match &*input::<String>("cmd> ") {
            "stream" => {
                println!("{}", "-".repeat(50));
                source
                    .for_each(Records::new(USER_TABLE), |row| {
                        println!("{row}");
                        Ok::<_, ()>(())
                    })
                    .await?
                    .unwrap();
                println!("{}", "-".repeat(50));
            }
            "batches" => {
                let size: usize = input("batch size> ");
                let Ok(scan) = Batches::new(USER_TABLE, size) else {
                    println!("batch size must be at least 1");
                    continue;
                };
                let mut n = 0;
                source
                    .for_each(scan, |batch| {
                        n += 1;
                        println!("batch {n} ({} rows)", batch.len());
                        for row in &batch {
                            println!("  {row}");
                        }
                        Ok::<_, ()>(())
                    })
                    .await?
                    .unwrap();
            }
            "pages" => {
                let size: usize = input("page size> ");
                let Ok(scan) = Pages::new(USER_TABLE, size) else {
                    println!("page size must be at least 1");
                    continue;
                };
                let mut n = 0;
                source
                    .for_each(scan, |page| {
                        n += 1;
                        println!("page {n} ({} rows)", page.len());
                        for row in &page {
                            println!("  {row}");
                        }
                        Ok::<_, ()>(())
                    })
                    .await?
                    .unwrap();
            }
            "avg" => {
                let average = source.average_of(USER_TABLE, "age").await?;
                println!("Average age of users: {average}");
            }
            "quit" => break,
            _ => {
                println!("invalid option; try again.");
            }
        }
    }

    Ok(())
}

/// A handful of rows so the demo works without a CSV file.
fn seed_fixture(store: &MemStore) -> DbResult<()> {
    store.create_table(USER_TABLE, seed::user_schema());
    let users: &[(&str, &str, i64)] = &[
        ("Johnnie Mayer", "Ross.Reynolds21@hotmail.com", 35),
        ("Myrtle Waters", "Edmund_Funk@gmail.com", 99),
        ("Flora Rodriguez", "Willie.Bogisich@gmail.com", 84),
        ("Cecilia Payne", "Violet.Ryan@gmail.com", 28),
        ("Ronnie Bechtelar", "Sandra19@yahoo.com", 22),
    ];
    for (i, (name, email, age)) in users.iter().enumerate() {
        store.insert(
            USER_TABLE,
            vec![
                Value::Text(format!("00000000-0000-0000-0000-00000000000{i}")),
                Value::Text((*name).to_owned()),
                Value::Text((*email).to_owned()),
                Value::Int(*age),
            ],
        )?;
    }
    Ok(())
}

fn input<T>(prompt: &str) -> T
where
    T: FromStr,
    T::Err: std::fmt::Debug,
{
    loop {
        print!("{prompt}");
        io::stdout().flush().unwrap();

        let mut buf = String::new();
        io::stdin().read_line(&mut buf).unwrap();

        match buf.trim().parse() {
            Ok(val) => break val,
            Err(_) => {
                println!("invalid input; try again.");
            }
        }
    }
}

/// Sets up tracing subscriber.
fn setup_tracing() {
    use tracing_subscriber::{
        fmt::{format::FmtSpan, layer},
        layer::SubscriberExt,
        util::SubscriberInitExt,
        EnvFilter,
    };

    let filter_layer = EnvFilter::try_from_default_env().unwrap_or("warn".into());
    let fmt_layer = layer().with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
