use super::*;

#[test]
fn rng_is_deterministic_per_seed() {
    let mut a = Rng64::new(7);
    let mut b = Rng64::new(7);
    for _ in 0..8 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
    let mut c = Rng64::new(8);
    assert_ne!(Rng64::new(7).next_u64(), c.next_u64());
}

#[test]
fn next_below_stays_in_range() {
    let mut rng = Rng64::new(42);
    for bound in 1..20 {
        assert!(rng.next_below(bound) < bound);
    }
}

#[test]
fn shuffle_is_a_permutation() {
    let mut items: Vec<u32> = (0..16).collect();
    Rng64::new(3).shuffle(&mut items);
    let mut sorted = items.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..16).collect::<Vec<_>>());

    let mut again: Vec<u32> = (0..16).collect();
    Rng64::new(3).shuffle(&mut again);
    assert_eq!(items, again);
}

#[test]
fn union_rect_accumulates() {
    let r = union_rect(None, Rect::new(0.0, 0.0, 1.0, 1.0));
    let r = union_rect(r, Rect::new(2.0, -1.0, 3.0, 0.5));
    assert_eq!(r, Some(Rect::new(0.0, -1.0, 3.0, 1.0)));
}

#[test]
fn lerp_point_endpoints() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(10.0, 20.0);
    assert_eq!(lerp_point(a, b, 0.0), a);
    assert_eq!(lerp_point(a, b, 1.0), b);
    assert_eq!(lerp_point(a, b, 0.5), Point::new(5.0, 10.0));
}
