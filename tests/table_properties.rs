//! Property tests for the series builder.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use satdash::record::{ParamValue, RawRecord};
use satdash::table::{build, ColumnKind};

const NAMES: &[&str] = &["volt", "temp", "adc", "mode", "uptime"];

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn arb_value() -> impl Strategy<Value = ParamValue> {
    prop_oneof![
        Just(ParamValue::Null),
        any::<bool>().prop_map(ParamValue::Bool),
        (-1.0e6f64..1.0e6).prop_map(ParamValue::Number),
        prop::sample::select(vec!["1", "2.5", "n/a", "SAFE"])
            .prop_map(|s| ParamValue::Text(s.to_string())),
    ]
}

fn arb_record() -> impl Strategy<Value = RawRecord> {
    (
        0i64..120,
        prop::collection::vec((0..NAMES.len(), arb_value()), 0..6),
    )
        .prop_map(|(minutes, params)| {
            params.into_iter().fold(
                RawRecord::new(base_time() + Duration::minutes(minutes)),
                |record, (i, value)| record.param(NAMES[i], value),
            )
        })
}

fn arb_records() -> impl Strategy<Value = Vec<RawRecord>> {
    prop::collection::vec(arb_record(), 0..40)
}

proptest! {
    /// Every column has exactly one cell per input record.
    #[test]
    fn test_no_ragged_columns(records in arb_records()) {
        let table = build(&records).unwrap();
        prop_assert_eq!(table.num_rows(), records.len());
        let batch = table.record_batch();
        prop_assert_eq!(batch.num_rows(), records.len());
        for column in batch.columns() {
            prop_assert_eq!(column.len(), records.len());
        }
    }

    /// Rows come out in non-decreasing ground time order.
    #[test]
    fn test_rows_sorted(records in arb_records()) {
        let table = build(&records).unwrap();
        prop_assert!(table.ground_times().windows(2).all(|w| w[0] <= w[1]));
    }

    /// Building twice from the same input gives the same table.
    #[test]
    fn test_build_is_idempotent(records in arb_records()) {
        let first = build(&records).unwrap();
        let second = build(&records).unwrap();
        prop_assert_eq!(first.record_batch(), second.record_batch());
        prop_assert_eq!(first.columns(), second.columns());
    }

    /// A parameter reported by a single record has exactly one value, on that record's row.
    #[test]
    fn test_single_appearance(records in prop::collection::vec(arb_record(), 1..40), pick in any::<prop::sample::Index>()) {
        let k = pick.index(records.len());
        let mut records = records;
        let target_time = records[k].ground_time;
        records[k] = records[k].clone().param("solo", 42.0);

        let table = build(&records).unwrap();
        let values = table.numeric_values("solo").unwrap();
        prop_assert_eq!(values.iter().flatten().count(), 1);

        let row = values.iter().position(|v| v.is_some()).unwrap();
        prop_assert_eq!(table.ground_times()[row], target_time);
        prop_assert_eq!(values[row], Some(42.0));
    }

    /// A text-only column is numeric exactly when every value parses.
    #[test]
    fn test_text_column_classification(
        texts in prop::collection::vec(prop::sample::select(vec!["1", "-3", "2.5", "abc", "n/a"]), 1..20)
    ) {
        let records: Vec<RawRecord> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| RawRecord::new(base_time() + Duration::minutes(i as i64)).param("reading", *text))
            .collect();

        let table = build(&records).unwrap();
        let all_parse = texts.iter().all(|t| t.parse::<f64>().is_ok());
        let expected = if all_parse { ColumnKind::Numeric } else { ColumnKind::Text };
        prop_assert_eq!(table.column_kind("reading"), Some(expected));
    }
}
