//! Property tests for acquisition and chart-construction invariants.
//!
//! Uses proptest to verify:
//! 1. Row conservation: the assembled dataset holds every partition's rows, in date order
//! 2. Date monotonicity: the coerced date column never decreases
//! 3. Tooltip purity: extras of one call never leak into another call's result
//! 4. Color determinism: the i-th key gets the i-th palette color, on every call

mod common;

use common::{day, millis, pattern, MemoryFetcher};
use covlab_core::chart::{assign_colors, tooltip_from_fields, CATEGORY20};
use covlab_core::data::{acquire, AcquireOptions, DateRange};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

/// Rows per published day, one entry per day starting 2020-02-24.
fn arb_rows_per_day() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..5, 1..6)
}

fn arb_field() -> impl Strategy<Value = String> {
    "[a-z_]{1,12}"
}

fn partition_body(d: u32, rows: usize) -> String {
    let mut body = String::from("data,deceduti\n");
    for hour in 0..rows {
        body.push_str(&format!("2020-02-{d}T{hour:02}:00:00,{}\n", d as usize * 10 + hour));
    }
    body
}

// ── 1 + 2. Row conservation and date monotonicity ────────────────────

proptest! {
    #[test]
    fn assembled_rows_equal_partition_sum(rows in arb_rows_per_day()) {
        let pat = pattern();
        let mut fetcher = MemoryFetcher::new();
        for (i, n) in rows.iter().enumerate() {
            let d = 24 + i as u32;
            fetcher.publish(&pat, day(d), partition_body(d, *n));
        }

        let range = DateRange::new(day(24), day(24 + rows.len() as u32 - 1)).unwrap();
        let ds = acquire(&fetcher, &pat, &range, &AcquireOptions::default()).unwrap();

        prop_assert_eq!(ds.height(), rows.iter().sum::<usize>());
        prop_assert!(ds.diagnostics().is_empty());

        let expected: Vec<Option<i64>> = rows
            .iter()
            .enumerate()
            .flat_map(|(i, n)| (0..*n).map(move |h| Some(millis(day(24 + i as u32), h as u32))))
            .collect();
        prop_assert_eq!(ds.timestamps_millis().unwrap(), expected);
    }

    #[test]
    fn coerced_dates_never_decrease(
        rows in arb_rows_per_day(),
        gaps in prop::collection::vec(any::<bool>(), 6),
    ) {
        let pat = pattern();
        let mut fetcher = MemoryFetcher::new();
        for (i, n) in rows.iter().enumerate() {
            // The first day is always published.
            if i > 0 && gaps[i] {
                continue;
            }
            let d = 24 + i as u32;
            fetcher.publish(&pat, day(d), partition_body(d, *n));
        }

        let range = DateRange::new(day(24), day(24 + rows.len() as u32 - 1)).unwrap();
        let ds = acquire(&fetcher, &pat, &range, &AcquireOptions::default()).unwrap();

        let stamps: Vec<i64> = ds.timestamps_millis().unwrap().into_iter().flatten().collect();
        prop_assert_eq!(stamps.len(), ds.height());
        prop_assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }
}

// ── 3. Tooltip purity ────────────────────────────────────────────────

proptest! {
    #[test]
    fn tooltip_extras_do_not_leak(
        base in prop::collection::vec(arb_field(), 0..8),
        first in prop::collection::vec(arb_field(), 0..4),
        second in prop::collection::vec(arb_field(), 0..4),
    ) {
        let a = tooltip_from_fields(&base, &first);
        let snapshot = a.clone();
        let b = tooltip_from_fields(&base, &second);

        prop_assert_eq!(&a, &snapshot);
        prop_assert_eq!(a.len(), base.len() + first.len());
        prop_assert_eq!(b.len(), base.len() + second.len());

        let fields: Vec<&str> = b.entries().iter().map(|e| e.field.as_str()).collect();
        let expected: Vec<&str> = base.iter().chain(second.iter()).map(|s| s.as_str()).collect();
        prop_assert_eq!(fields, expected);
    }
}

// ── 4. Color determinism ─────────────────────────────────────────────

proptest! {
    #[test]
    fn ith_key_gets_ith_color(keys in prop::collection::vec(arb_field(), 0..=CATEGORY20.len())) {
        let first = assign_colors(&keys, &CATEGORY20).unwrap();
        let second = assign_colors(&keys, &CATEGORY20).unwrap();

        prop_assert_eq!(first.len(), keys.len());
        for (i, (a, b)) in first.iter().zip(second.iter()).enumerate() {
            prop_assert_eq!(&a.key, &keys[i]);
            prop_assert_eq!(a.color.as_str(), CATEGORY20[i]);
            prop_assert_eq!(&a.color, &b.color);
        }
    }
}
