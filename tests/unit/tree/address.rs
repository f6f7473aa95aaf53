use super::*;

#[test]
fn negative_indices_count_from_end() {
    assert_eq!(resolve_index(-1, 3), Some(2));
    assert_eq!(resolve_index(-3, 3), Some(0));
    assert_eq!(resolve_index(-4, 3), None);
    assert_eq!(resolve_index(3, 3), None);
    assert_eq!(resolve_index(0, 0), None);
}

#[test]
fn insert_positions_clamp() {
    assert_eq!(insert_position(10, 3), 3);
    assert_eq!(insert_position(-1, 3), 2);
    assert_eq!(insert_position(-10, 3), 0);
    assert_eq!(insert_position(0, 0), 0);
}

#[test]
fn parent_and_child_addresses() {
    let a = Address::from([1, 2, 3]);
    assert_eq!(a.parent(), Some(Address::from([1, 2])));
    assert_eq!(a.last(), Some(3));
    assert_eq!(Address::from([1, 2]).child(3), a);
    assert_eq!(Address::Flat(4).parent(), Some(Address::root()));
    assert_eq!(Address::root().parent(), None);
}

#[test]
fn utag_joins_components() {
    assert_eq!(Address::from([0, 2]).utag().as_deref(), Some("0_2"));
    assert_eq!(Address::root().utag(), None);
    assert_eq!(Address::from(5).utag().as_deref(), Some("5"));
}
