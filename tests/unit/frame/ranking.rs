use super::*;

const NAN: f64 = f64::NAN;

#[test]
fn orders_descending() {
    assert_eq!(rank_order(&[10.0, 30.0, 20.0]), vec![1, 2, 0]);
    assert_eq!(ranks(&[10.0, 30.0, 20.0]), vec![2, 0, 1]);
}

#[test]
fn nan_sinks_below_every_number() {
    assert_eq!(rank_order(&[NAN, -5.0, 1.0, NAN]), vec![2, 1, 0, 3]);
    assert_eq!(ranks(&[NAN, -5.0]), vec![1, 0]);
}

#[test]
fn ties_keep_encounter_order() {
    assert_eq!(rank_order(&[30.0, 30.0, 30.0]), vec![0, 1, 2]);
    assert_eq!(ranks(&[1.0, 2.0, 2.0]), vec![2, 0, 1]);
}

#[test]
fn empty_input_is_empty() {
    assert!(rank_order(&[]).is_empty());
}
