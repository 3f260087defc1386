use rowstream::{
    scan::{Batches, Records, Scan},
    seed::USER_TABLE,
};

mod test_utils;

#[tokio::test]
async fn yields_every_row_in_store_order() {
    let n = 17;
    let source = test_utils::seeded_source(n);
    let ctx = source.ctx();

    let mut scan = Records::new(USER_TABLE);
    let mut rows = Vec::new();
    while let Some(row) = scan.next(&ctx).await.unwrap() {
        rows.push(row);
    }
    assert!(scan.failure().is_none());

    assert_eq!(rows.len(), n);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(
            row.get("user_id").unwrap().as_text().unwrap(),
            test_utils::user_id_of(i)
        );
        assert_eq!(row.get("age").unwrap().as_int().unwrap(), test_utils::age_of(i));
    }
}

#[tokio::test]
async fn matches_concatenated_batches() {
    let source = test_utils::seeded_source(13);
    let ctx = source.ctx();

    let mut records = Records::new(USER_TABLE);
    let mut from_records = Vec::new();
    while let Some(row) = records.next(&ctx).await.unwrap() {
        from_records.push(row);
    }

    let mut batches = Batches::new(USER_TABLE, 5).unwrap();
    let mut from_batches = Vec::new();
    while let Some(batch) = batches.next(&ctx).await.unwrap() {
        from_batches.extend(batch);
    }

    assert_eq!(from_records, from_batches);
}

#[tokio::test]
async fn exhaustion_releases_the_connection() {
    let source = test_utils::seeded_source(3);
    let ctx = source.ctx();
    let mut scan = Records::new(USER_TABLE);
    while scan.next(&ctx).await.unwrap().is_some() {}

    assert_eq!(source.store().connections_opened(), 1);
    assert_eq!(source.store().connections_closed(), 1);
}

#[tokio::test]
async fn early_drop_releases_the_connection() {
    let source = test_utils::seeded_source(5);
    {
        let mut scan = Records::new(USER_TABLE);
        assert!(scan.next(&source.ctx()).await.unwrap().is_some());
    }
    assert_eq!(source.store().connections_closed(), 1);
}

#[tokio::test]
async fn projected_scan_only_exposes_requested_columns() {
    let source = test_utils::seeded_source(2);
    let ctx = source.ctx();
    let mut scan = Records::with_columns(USER_TABLE, vec!["age".into()]);

    let row = scan.next(&ctx).await.unwrap().unwrap();
    assert_eq!(row.columns().len(), 1);
    assert_eq!(row.get("age").unwrap().as_int(), Some(test_utils::age_of(0)));
    assert!(row.get("email").is_none());
}
