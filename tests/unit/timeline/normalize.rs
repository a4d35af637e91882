use super::*;
use serde_json::json;

fn rows(v: serde_json::Value) -> Vec<Row> {
    serde_json::from_value(v).unwrap()
}

#[test]
fn groups_by_id_in_first_appearance_order_and_sorts_by_date() {
    let data = rows(json!([
        {"id": "b", "date": "2020-01-03", "value": 3},
        {"id": "a", "date": "2020-01-02", "value": "2"},
        {"id": "b", "date": "2020-01-01", "value": 1},
    ]));
    let t = normalize_rows(&data, &ChartOptions::default()).unwrap();
    let ids: Vec<&str> = t.entities.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    let b: Vec<f64> = t.entities[0]
        .observations
        .iter()
        .map(|o| o.values[0])
        .collect();
    assert_eq!(b, vec![1.0, 3.0]);
    assert_eq!(t.entities[1].observations[0].values[0], 2.0);
    assert_eq!(t.report, NormalizeReport { rows: 3, skipped_rows: 0, nan_values: 0 });
}

#[test]
fn invalid_values_become_nan_without_failing() {
    let data = rows(json!([
        {"id": "a", "date": "2020-01-01", "value": "n/a"},
        {"id": "a", "date": "2020-01-02", "value": null},
        {"id": "a", "date": "2020-01-03"},
        {"id": "a", "date": "2020-01-04", "value": " 7.5 "},
    ]));
    let t = normalize_rows(&data, &ChartOptions::default()).unwrap();
    let vals: Vec<f64> = t.entities[0]
        .observations
        .iter()
        .map(|o| o.values[0])
        .collect();
    assert!(vals[0].is_nan() && vals[1].is_nan() && vals[2].is_nan());
    assert_eq!(vals[3], 7.5);
    assert_eq!(t.report.nan_values, 3);
}

#[test]
fn missing_id_or_date_field_is_a_configuration_error() {
    let no_id = rows(json!([{"date": "2020-01-01", "value": 1}]));
    assert!(matches!(
        normalize_rows(&no_id, &ChartOptions::default()),
        Err(RaceError::Configuration(_))
    ));

    let no_date = rows(json!([{"id": "a", "value": 1}]));
    assert!(matches!(
        normalize_rows(&no_date, &ChartOptions::default()),
        Err(RaceError::Configuration(_))
    ));

    let no_value = rows(json!([{"id": "a", "date": "2020-01-01", "other": 1}]));
    assert!(matches!(
        normalize_rows(&no_value, &ChartOptions::default()),
        Err(RaceError::Configuration(_))
    ));
}

#[test]
fn unparsable_dates_skip_the_row() {
    let data = rows(json!([
        {"id": "a", "date": "yesterday", "value": 1},
        {"id": "a", "date": "2021", "value": 2},
    ]));
    let t = normalize_rows(&data, &ChartOptions::default()).unwrap();
    assert_eq!(t.report.skipped_rows, 1);
    assert_eq!(t.entities[0].observations.len(), 1);
}

#[test]
fn id_with_only_bad_dates_keeps_an_empty_timeline() {
    let data = rows(json!([
        {"id": "a", "date": "2020-01-01", "value": 1},
        {"id": "z", "date": "not a date", "value": 5},
        {"id": "a", "date": "2020-01-02", "value": 2},
    ]));
    let t = normalize_rows(&data, &ChartOptions::default()).unwrap();
    let ids: Vec<&str> = t.entities.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "z"]);
    assert!(t.entities[1].observations.is_empty());
    assert_eq!(t.report.skipped_rows, 1);
    assert_eq!(t.date_extent().unwrap().1.format("%d").to_string(), "02");
}

#[test]
fn empty_dataset_is_not_an_error() {
    let t = normalize_rows(&[], &ChartOptions::default()).unwrap();
    assert!(t.entities.is_empty());
    assert!(t.date_extent().is_none());
}

#[test]
fn secondary_value_keys_are_coerced() {
    let opts = ChartOptions {
        value_keys: vec!["value".to_owned(), "pop".to_owned()],
        ..ChartOptions::default()
    };
    let data = rows(json!([{"id": 7, "date": "2020-01-01", "value": 1, "pop": "40"}]));
    let t = normalize_rows(&data, &opts).unwrap();
    assert_eq!(t.keys, vec!["value".to_owned(), "pop".to_owned()]);
    assert_eq!(t.key_index("pop"), Some(1));
    assert_eq!(t.entities[0].id, "7");
    assert_eq!(t.entities[0].observations[0].values, vec![1.0, 40.0]);
}

#[test]
fn date_formats_parse_to_wall_clock() {
    let d = |s: &str| parse_date(&json!(s)).unwrap();
    let midnight = NaiveDate::from_ymd_opt(2020, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert_eq!(d("2020-03-01"), midnight);
    assert_eq!(d("2020/03/01"), midnight);
    assert_eq!(d("2020-03"), midnight);
    assert_eq!(d("2020-03-01T00:00:00Z"), midnight);
    assert_eq!(d("2020-03-01 00:00"), midnight);
    assert_eq!(
        d("2020"),
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    );
    assert_eq!(
        parse_date(&json!(0)).unwrap(),
        DateTime::from_timestamp(0, 0).unwrap().naive_utc()
    );
    assert!(parse_date(&json!(true)).is_none());
    assert!(parse_date(&json!("")).is_none());
}

#[test]
fn date_extent_spans_all_entities() {
    let data = rows(json!([
        {"id": "a", "date": "2020-01-05", "value": 1},
        {"id": "b", "date": "2020-01-01", "value": 1},
        {"id": "b", "date": "2020-01-09", "value": 1},
    ]));
    let t = normalize_rows(&data, &ChartOptions::default()).unwrap();
    let (lo, hi) = t.date_extent().unwrap();
    assert_eq!(lo.format("%d").to_string(), "01");
    assert_eq!(hi.format("%d").to_string(), "09");
}

#[test]
fn meta_table_keeps_first_row_per_id() {
    let meta = rows(json!([
        {"id": "a", "name": "Alpha"},
        {"id": "a", "name": "Other"},
        {"id": "b"},
        {"name": "orphan"},
    ]));
    let t = MetaTable::from_rows(&meta, "id");
    assert_eq!(t.len(), 2);
    assert_eq!(t.get("a").unwrap().name.as_deref(), Some("Alpha"));
    assert_eq!(t.get("b").unwrap().name, None);
    assert!(t.get("c").is_none());
}
