use super::*;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn first_offer_emits_immediately() {
    let t0 = Instant::now();
    let mut th = Throttle::new(ms(50));
    assert_eq!(th.offer(1, t0), Some(1));
    assert!(!th.has_pending());
}

#[test]
fn offers_inside_window_are_buffered_and_replaced() {
    let t0 = Instant::now();
    let mut th = Throttle::new(ms(50));
    assert_eq!(th.offer(1, t0), Some(1));
    assert_eq!(th.offer(2, t0 + ms(10)), None);
    assert_eq!(th.offer(3, t0 + ms(49)), None);
    assert!(th.has_pending());
    assert_eq!(th.offer(4, t0 + ms(50)), Some(4));
    assert!(!th.has_pending());
}

#[test]
fn flush_delivers_latest_value_even_inside_window() {
    let t0 = Instant::now();
    let mut th = Throttle::new(ms(50));
    th.offer("a", t0);
    th.offer("b", t0 + ms(5));
    th.offer("c", t0 + ms(6));
    assert_eq!(th.flush(t0 + ms(7)), Some("c"));
    assert_eq!(th.flush(t0 + ms(8)), None);
}

#[test]
fn flush_restarts_the_window() {
    let t0 = Instant::now();
    let mut th = Throttle::new(ms(50));
    th.offer(1, t0);
    th.offer(2, t0 + ms(40));
    assert_eq!(th.flush(t0 + ms(45)), Some(2));
    assert_eq!(th.offer(3, t0 + ms(60)), None);
    assert_eq!(th.offer(4, t0 + ms(95)), Some(4));
}

#[test]
fn emission_rate_is_bounded() {
    let t0 = Instant::now();
    let mut th = Throttle::new(ms(50));
    let mut emitted = 0;
    for i in 0..1000u64 {
        if th.offer(i, t0 + ms(i)).is_some() {
            emitted += 1;
        }
    }
    assert_eq!(emitted, 20);
    assert_eq!(th.flush(t0 + ms(1000)), Some(999));
}

#[test]
fn discard_drops_pending() {
    let t0 = Instant::now();
    let mut th = Throttle::new(ms(50));
    th.offer(1, t0);
    th.offer(2, t0 + ms(1));
    th.discard();
    assert_eq!(th.flush(t0 + ms(2)), None);
}
