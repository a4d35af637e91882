use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

fn schedule(fade: [f64; 2], item_count: usize) -> FadeSchedule {
    let opts = ChartOptions {
        fade_time: fade,
        freeze_time: [1.0, 1.0],
        item_count,
        ..ChartOptions::default()
    };
    FadeSchedule::new(&opts, AnimationWindow::new(3.0, 10.0).unwrap()).unwrap()
}

#[test]
fn time_fade_ramps_in_holds_and_ramps_out() {
    let s = schedule([2.0, 2.0], 5);
    // [0, 2] ramp in, [2, 11] hold, [11, 13] ramp out
    assert_eq!(s.time_alpha(-1.0), 0.0);
    assert_eq!(s.time_alpha(0.0), 0.0);
    assert_eq!(s.time_alpha(1.0), 0.5);
    assert_eq!(s.time_alpha(2.0), 1.0);
    assert_eq!(s.time_alpha(6.0), 1.0);
    assert_eq!(s.time_alpha(12.0), 0.5);
    assert_eq!(s.time_alpha(13.0), 0.0);
    assert_eq!(s.time_alpha(99.0), 0.0);
}

#[test]
fn zero_fade_durations_stay_opaque() {
    let s = schedule([0.0, 0.0], 5);
    for t in [-5.0, 2.0, 6.0, 11.0, 50.0] {
        assert_eq!(s.time_alpha(t), 1.0, "t={t}");
    }
}

#[test]
fn rank_fade_cuts_off_below_visible_window() {
    let s = schedule([0.0, 0.0], 5);
    assert_eq!(s.rank_alpha(0.0), 1.0);
    assert_eq!(s.rank_alpha(4.0), 1.0);
    assert!(approx(s.rank_alpha(4.5), (1.0 + RANK_FADE_FLOOR) / 2.0));
    assert!(approx(s.rank_alpha(5.0), RANK_FADE_FLOOR));
    assert!(approx(s.rank_alpha(50.0), RANK_FADE_FLOOR));
}

#[test]
fn combined_alpha_is_a_product_in_unit_range() {
    let s = schedule([2.0, 2.0], 5);
    assert_eq!(s.alpha(0.0, 1.0), 0.5);
    assert!(approx(s.alpha(5.0, 6.0), RANK_FADE_FLOOR));
    assert_eq!(s.alpha(f64::NAN, 6.0), 0.0);
    for r in [0.0, 3.3, 4.9, 7.0] {
        for t in [-1.0, 0.5, 6.0, 12.5] {
            let a = s.alpha(r, t);
            assert!((0.0..=1.0).contains(&a));
        }
    }
}
