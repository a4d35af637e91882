use super::*;
use crate::foundation::core::Fps;
use serde_json::json;

fn stage(fps: u32) -> Stage {
    Stage::new(Fps::new(fps, 1).unwrap(), 10.0).unwrap()
}

#[test]
fn sampling_rounds_fps_times_swap() {
    let opts = ChartOptions::default();
    assert_eq!(sampling_for(&opts, &stage(30)), 8);
    assert_eq!(sampling_for(&opts, &stage(24)), 6);
    assert_eq!(sampling_for(&opts, &stage(1)), 1);
}

#[test]
fn rank_samples_mark_nan_as_missing() {
    assert_eq!(
        rank_samples(&[1.0, f64::NAN, 3.0]),
        vec![Some(1), None, Some(0)]
    );
}

#[test]
fn extent_scale_needs_a_positive_maximum() {
    assert!(extent_scale(f64::NEG_INFINITY, 100.0).is_none());
    assert!(extent_scale(0.0, 100.0).is_none());
    let s = extent_scale(50.0, 100.0).unwrap();
    assert_eq!(s.apply(25.0), 50.0);
    assert_eq!(s.apply(-5.0), 0.0);
}

#[test]
fn diagnostics_count_repeats_and_regressions() {
    let rows: Vec<Row> = serde_json::from_value(json!([
        {"id": "a", "date": "2020-01-01", "value": 1},
        {"id": "a", "date": "2020-01-02", "value": 2},
    ]))
    .unwrap();
    let opts = ChartOptions {
        ani_time: Some([0.0, 5.0]),
        ..ChartOptions::default()
    };
    let mut e = RaceEngine::new(&rows, &[], opts, stage(30)).unwrap();
    e.frame_at(1.0);
    e.frame_at(1.0);
    e.frame_at(0.5);
    e.frame_at(2.0);
    assert_eq!(
        e.diagnostics(),
        FrameDiagnostics {
            queries: 4,
            time_regressions: 1,
            repeated_times: 1,
        }
    );
}

#[test]
fn secondary_keys_sample_without_state() {
    let rows: Vec<Row> = serde_json::from_value(json!([
        {"id": "a", "date": "2020-01-01", "value": 1, "pop": 10},
        {"id": "a", "date": "2020-01-11", "value": 2, "pop": 20},
    ]))
    .unwrap();
    let opts = ChartOptions {
        ani_time: Some([0.0, 10.0]),
        value_keys: vec!["pop".to_owned()],
        ..ChartOptions::default()
    };
    let e = RaceEngine::new(&rows, &[], opts, stage(30)).unwrap();
    assert_eq!(e.value_at("a", "pop", 5.0).unwrap(), 15.0);
    assert_eq!(e.value_at("a", "value", 10.0).unwrap(), 2.0);
    assert!(matches!(
        e.value_at("a", "gdp", 5.0),
        Err(RaceError::Evaluation(_))
    ));
    assert!(e.value_at("zz", "pop", 5.0).is_err());
    assert_eq!(e.diagnostics().queries, 0);
}
