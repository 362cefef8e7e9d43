//! Integration tests for the acquisition engine and dataset grouping.

mod common;

use common::{day, millis, pattern, MemoryFetcher};
use covlab_core::data::{acquire, AcquireOptions, DataError, DateRange, Diagnostic};

#[test]
fn unpublished_middle_day_is_skipped() {
    let pat = pattern();
    let mut fetcher = MemoryFetcher::new();
    fetcher.publish(&pat, day(24), "data,deceduti\n2020-02-24T18:00:00,7\n");
    fetcher.publish(&pat, day(26), "data,deceduti\n2020-02-26T18:00:00,12\n");

    let range = DateRange::new(day(24), day(26)).unwrap();
    let ds = acquire(&fetcher, &pat, &range, &AcquireOptions::default()).unwrap();

    assert_eq!(ds.height(), 2);
    assert!(ds.is_date_typed());
    assert_eq!(
        ds.timestamps_millis().unwrap(),
        vec![Some(millis(day(24), 18)), Some(millis(day(26), 18))]
    );

    assert_eq!(ds.diagnostics().len(), 1);
    assert_eq!(ds.missing_dates(), vec![day(25)]);
    assert_eq!(
        ds.diagnostics()[0].to_string(),
        "data from the day 20200225 has not been recorded yet"
    );
}

#[test]
fn missing_days_keep_other_rows_intact() {
    let pat = pattern();
    let mut fetcher = MemoryFetcher::new();
    fetcher.publish(
        &pat,
        day(24),
        "data,deceduti\n2020-02-24T18:00:00,1\n2020-02-24T19:00:00,2\n",
    );
    fetcher.publish(&pat, day(27), "data,deceduti\n2020-02-27T18:00:00,3\n");

    let range = DateRange::new(day(24), day(27)).unwrap();
    let ds = acquire(&fetcher, &pat, &range, &AcquireOptions::default()).unwrap();

    assert_eq!(ds.height(), 3);
    assert_eq!(ds.missing_dates(), vec![day(25), day(26)]);
    let values: Vec<Option<&str>> = ds
        .frame()
        .column("deceduti")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(values, vec![Some("1"), Some("2"), Some("3")]);
}

#[test]
fn unpublished_first_day_fails_without_dataset() {
    let pat = pattern();
    let mut fetcher = MemoryFetcher::new();
    fetcher.publish(&pat, day(25), "data,deceduti\n2020-02-25T18:00:00,1\n");

    let range = DateRange::new(day(24), day(25)).unwrap();
    let err = acquire(&fetcher, &pat, &range, &AcquireOptions::default()).unwrap_err();

    match err {
        DataError::SeedFetch { date, source } => {
            assert_eq!(date, day(24));
            assert!(source.is_not_found());
        }
        other => panic!("expected SeedFetch, got {other:?}"),
    }
}

#[test]
fn single_day_range() {
    let pat = pattern();
    let mut fetcher = MemoryFetcher::new();
    fetcher.publish(&pat, day(24), "data,deceduti\n2020-02-24T18:00:00,7\n");

    let range = DateRange::new(day(24), day(24)).unwrap();
    let ds = acquire(&fetcher, &pat, &range, &AcquireOptions::default()).unwrap();

    assert_eq!(ds.height(), 1);
    assert!(ds.diagnostics().is_empty());
}

#[test]
fn missing_date_column_degrades_to_diagnostic() {
    let pat = pattern();
    let mut fetcher = MemoryFetcher::new();
    fetcher.publish(&pat, day(24), "giorno,deceduti\n2020-02-24T18:00:00,7\n");

    let range = DateRange::new(day(24), day(24)).unwrap();
    let ds = acquire(&fetcher, &pat, &range, &AcquireOptions::default()).unwrap();

    assert!(!ds.is_date_typed());
    assert!(ds
        .diagnostics()
        .iter()
        .any(|d| matches!(d, Diagnostic::MissingSchemaColumn { column } if column == "data")));
}

#[test]
fn grouping_follows_first_seen_order() {
    let pat = pattern();
    let mut fetcher = MemoryFetcher::new();
    fetcher.publish(
        &pat,
        day(24),
        "data,denominazione_regione,nuovi_positivi\n\
         2020-02-24T18:00:00,A,1\n\
         2020-02-24T18:00:00,B,2\n",
    );
    fetcher.publish(
        &pat,
        day(25),
        "data,denominazione_regione,nuovi_positivi\n\
         2020-02-25T18:00:00,A,3\n\
         2020-02-25T18:00:00,B,4\n",
    );

    let range = DateRange::new(day(24), day(25)).unwrap();
    let ds = acquire(&fetcher, &pat, &range, &AcquireOptions::default()).unwrap();
    let groups = ds.group_by("denominazione_regione").unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["A", "B"]);

    let a: Vec<Option<&str>> = groups
        .get("A")
        .unwrap()
        .column("nuovi_positivi")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(a, vec![Some("1"), Some("3")]);

    let b: Vec<Option<&str>> = groups
        .get("B")
        .unwrap()
        .column("nuovi_positivi")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(b, vec![Some("2"), Some("4")]);
}
