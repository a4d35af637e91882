use super::*;

fn primed(capacity: usize, rank: usize) -> RankSmoother {
    let mut s = RankSmoother::new(1, capacity, 20);
    s.prime((0..capacity).map(|_| vec![Some(rank)]));
    s
}

#[test]
fn primed_window_is_full_and_flat() {
    let s = primed(4, 2);
    assert_eq!(s.history(0).unwrap().len(), 4);
    assert_eq!(s.smoothed(), vec![2.0]);
}

#[test]
fn length_stays_at_capacity_after_priming() {
    let mut s = primed(4, 0);
    for k in 0..20 {
        s.advance(&[Some(k % 3)]);
        assert_eq!(s.history(0).unwrap().len(), 4);
    }
}

#[test]
fn rank_change_moves_one_step_per_sample() {
    let mut s = primed(4, 0);
    let seq: Vec<f64> = (0..5).map(|_| s.advance(&[Some(1)])[0]).collect();
    assert_eq!(seq, vec![0.25, 0.5, 0.75, 1.0, 1.0]);
}

#[test]
fn missing_rank_records_sentinel() {
    let mut s = primed(2, 0);
    assert_eq!(s.advance(&[None]), vec![10.0]);
    assert_eq!(s.advance(&[None]), vec![20.0]);
}

#[test]
fn short_history_gets_one_extra_sentinel_when_filling() {
    let mut s = RankSmoother::new(1, 3, 9);
    s.prime([vec![Some(0)], vec![Some(0)]]);
    // push -> len 3 == capacity -> push sentinel -> drop oldest
    s.advance(&[Some(0)]);
    let h: Vec<usize> = s.history(0).unwrap().iter().copied().collect();
    assert_eq!(h, vec![0, 0, 9]);
    s.advance(&[Some(0)]);
    assert_eq!(s.history(0).unwrap().len(), 3);
}

#[test]
fn zero_capacity_is_raised_to_one() {
    let mut s = RankSmoother::new(1, 0, 5);
    assert!(s.smoothed()[0].is_nan());
    s.prime([vec![Some(2)]]);
    assert_eq!(s.advance(&[Some(3)]), vec![3.0]);
    assert_eq!(s.history(0).unwrap().len(), 1);
}
