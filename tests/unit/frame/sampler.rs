use super::*;

const NAN: f64 = f64::NAN;

fn sampler() -> FrameSampler {
    FrameSampler::new(vec![
        ValueTrack::new(vec![0.0, 10.0], vec![10.0, 50.0]).unwrap(),
        ValueTrack::new(vec![0.0, 2.0, 4.0, 6.0], vec![NAN, 5.0, 5.0, NAN]).unwrap(),
    ])
}

#[test]
fn raw_sampling_is_pure() {
    let s = sampler();
    let a = s.sample_raw(5.0);
    let b = s.sample_raw(5.0);
    assert_eq!(a[0], 30.0);
    assert!(a[1].is_nan());
    assert_eq!(a[0], b[0]);
}

#[test]
fn hold_over_keeps_last_numeric_value() {
    let mut s = sampler();

    let first = s.hold_over(&s.sample_raw(0.0));
    assert!(first[1].raw.is_nan());
    assert!(first[1].held.is_nan(), "no numeric value seen yet");

    let at_two = s.hold_over(&s.sample_raw(2.0));
    assert_eq!(at_two[1].raw, 5.0);
    assert_eq!(at_two[1].held, 5.0);

    let later = s.hold_over(&s.sample_raw(6.0));
    assert!(later[1].raw.is_nan());
    assert_eq!(later[1].held, 5.0);
    assert_eq!(later[0].held, later[0].raw);
}
