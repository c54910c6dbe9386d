use super::*;
use chrono::TimeZone;
use serde_json::json;

#[test]
fn test_decode_document() {
    let doc = json!({
        "_id": {"$oid": "65f0c0ffee"},
        "groundTime": {"$date": "2024-05-01T08:00:00Z"},
        "params": [
            {"name": "Battery Voltage", "value": 7.9},
            {"name": "Mode", "value": "SAFE"},
            {"name": "Last Reset", "value": {"$date": "2024-04-30T23:00:00Z"}},
            {"name": "In memory of", "value": "Ilan Ramon"}
        ]
    });

    let record = RawRecord::from_document(&doc).unwrap();
    assert_eq!(
        record.ground_time,
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
    );
    assert_eq!(record.params.len(), 4);
    assert_eq!(record.params[0].value, ParamValue::Number(7.9));
    assert!(matches!(record.params[2].value, ParamValue::Date(_)));
    assert_eq!(record.params[3].name, DEDICATION_PARAM);
}

#[test]
fn test_decode_plain_string_time_without_params() {
    let record = RawRecord::from_document(&json!({"groundTime": "2024-01-02"})).unwrap();
    assert!(record.params.is_empty());
}

#[test]
fn test_missing_value_is_null() {
    let doc = json!({"groundTime": "2024-01-02", "params": [{"name": "volt"}]});
    let record = RawRecord::from_document(&doc).unwrap();
    assert_eq!(record.params[0].value, ParamValue::Null);
}

#[test]
fn test_decode_errors() {
    assert!(matches!(
        RawRecord::from_document(&json!([1, 2])),
        Err(RecordError::NotAnObject)
    ));
    assert!(matches!(
        RawRecord::from_document(&json!({"params": []})),
        Err(RecordError::MissingGroundTime)
    ));
    assert!(matches!(
        RawRecord::from_document(&json!({"groundTime": "soon"})),
        Err(RecordError::InvalidGroundTime(_))
    ));
    assert!(matches!(
        RawRecord::from_document(&json!({"groundTime": "2024-01-02", "params": {"volt": 5}})),
        Err(RecordError::MalformedParams(_))
    ));
    assert!(matches!(
        RawRecord::from_document(&json!({"groundTime": "2024-01-02", "params": [{"value": 5}]})),
        Err(RecordError::MalformedParams(_))
    ));
}

#[test]
fn test_param_map_last_duplicate_wins() {
    let record = RawRecord::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        .param("volt", 5.0)
        .param("temp", 20.0)
        .param("volt", 6.0);

    let map = record.param_map();
    assert_eq!(map.len(), 2);
    assert_eq!(map["volt"], &ParamValue::Number(6.0));
}
