use std::{
    path::PathBuf,
    sync::atomic::{AtomicU32, Ordering},
};

use rowstream::{
    error::Error,
    seed::{self, USER_TABLE},
    store::mem::MemStore,
};
use tokio::fs;

mod test_utils;

/// A CSV fixture written under `ignore/`, removed on drop.
struct CsvFile(PathBuf);

impl CsvFile {
    async fn new(contents: &str) -> CsvFile {
        static COUNTER: AtomicU32 = AtomicU32::new(1);

        let id = COUNTER.fetch_add(1, Ordering::AcqRel);
        fs::create_dir_all("ignore").await.unwrap();
        let path = PathBuf::from(format!("ignore/{id}-seed.csv"));
        fs::write(&path, contents).await.unwrap();
        CsvFile(path)
    }
}

impl Drop for CsvFile {
    fn drop(&mut self) {
        std::fs::remove_file(&self.0).unwrap();
    }
}

#[tokio::test]
async fn loads_rows_from_csv() {
    let csv = CsvFile::new(
        "user_id,name,email,age\n\
         00000001,Johnnie Mayer,Ross.Reynolds21@hotmail.com,35\n\
         00000002,\"Waters, Myrtle\",Edmund_Funk@gmail.com,99\n",
    )
    .await;

    let store = MemStore::new();
    let inserted = seed::seed_from_csv(&store, &csv.0).await.unwrap();
    assert_eq!(inserted, 2);
    assert_eq!(store.row_count(USER_TABLE), Some(2));

    let source = rowstream::scan::Source::new(store, test_utils::test_opts());
    let mut rows = Vec::new();
    source
        .for_each(rowstream::scan::Records::new(USER_TABLE), |row| {
            rows.push(row);
            Ok::<_, ()>(())
        })
        .await
        .unwrap()
        .unwrap();

    // Quoted field with an embedded comma survives.
    assert_eq!(rows[1].get("name").unwrap().as_text(), Some("Waters, Myrtle"));
    assert_eq!(rows[0].get("age").unwrap().as_int(), Some(35));
}

#[tokio::test]
async fn skips_load_when_rows_already_exist() {
    let csv = CsvFile::new("user_id,name,email,age\n00000001,a,a@example.com,20\n").await;

    let store = MemStore::new();
    assert_eq!(seed::seed_from_csv(&store, &csv.0).await.unwrap(), 1);
    // Second run must be a no-op.
    assert_eq!(seed::seed_from_csv(&store, &csv.0).await.unwrap(), 0);
    assert_eq!(store.row_count(USER_TABLE), Some(1));
}

#[tokio::test]
async fn missing_file_is_reported() {
    let store = MemStore::new();
    let result = seed::seed_from_csv(&store, "ignore/definitely-missing.csv".as_ref()).await;
    assert!(matches!(result, Err(Error::SourceNotFound(_))));
}

#[tokio::test]
async fn malformed_age_is_reported_with_line_number() {
    let csv = CsvFile::new(
        "user_id,name,email,age\n\
         00000001,a,a@example.com,20\n\
         00000002,b,b@example.com,not-a-number\n",
    )
    .await;

    let store = MemStore::new();
    let result = seed::seed_from_csv(&store, &csv.0).await;
    assert!(matches!(result, Err(Error::Csv { line: 3, .. })));
}

#[tokio::test]
async fn generates_a_user_id_when_the_column_is_absent() {
    let csv = CsvFile::new("name,email,age\nNo Id,noid@example.com,44\n").await;

    let store = MemStore::new();
    assert_eq!(seed::seed_from_csv(&store, &csv.0).await.unwrap(), 1);

    let source = rowstream::scan::Source::new(store, test_utils::test_opts());
    let mut ids = Vec::new();
    source
        .for_each(rowstream::scan::Records::new(USER_TABLE), |row| {
            ids.push(row.get("user_id").unwrap().as_text().unwrap().to_owned());
            Ok::<_, ()>(())
        })
        .await
        .unwrap()
        .unwrap();
    // A v4 UUID was generated.
    assert_eq!(ids[0].len(), 36);
}

#[tokio::test]
async fn decimal_ages_are_truncated() {
    let csv = CsvFile::new("user_id,name,email,age\n00000001,a,a@example.com,27.0\n").await;

    let store = MemStore::new();
    seed::seed_from_csv(&store, &csv.0).await.unwrap();

    let source = rowstream::scan::Source::new(store, test_utils::test_opts());
    let average = source.average_of(USER_TABLE, "age").await.unwrap();
    assert_eq!(average, 27.0);
}
