use super::*;

use std::cell::Cell;

fn pair() -> Node<i32> {
    Node::new().append(Node::leaf(1)).append(Node::leaf(2))
}

#[test]
fn mutate_step_keeps_the_node() {
    let out = pair().chain(Step::mutate(|n| n.set_data("seen", true)));
    let node = out.into_node().unwrap();
    assert_eq!(node.get_data("seen"), Some(&serde_json::json!(true)));
}

#[test]
fn map_step_replaces_the_node() {
    let out = pair() | Step::map(|n| n.tag("mapped"));
    assert_eq!(out.node().and_then(Node::get_tag), Some("mapped"));
}

#[test]
fn steps_apply_left_to_right() {
    let out = pair().chain(vec![
        Step::map(|n| n.append(Node::leaf(3))),
        Step::map(|n| n.reverse(false)),
    ]);
    let node = out.into_node().unwrap();
    assert_eq!(node.sum(), vec![&3, &2, &1]);
}

#[test]
fn none_and_empty_sequences_are_noops() {
    let out = pair().chain(None::<Step<i32>>);
    assert_eq!(out.into_node().unwrap().len(), 2);

    let out = pair().chain(Vec::new());
    assert_eq!(out.into_node().unwrap().len(), 2);
}

#[test]
fn returning_step_escapes_the_chain() {
    let out = pair() | Step::returning(|n: &Node<i32>| n.len());
    assert!(out.is_escaped());
    assert_eq!(out.escaped::<usize>(), Some(2));
}

#[test]
fn escaped_chain_skips_remaining_steps() {
    let ran = std::rc::Rc::new(Cell::new(false));
    let flag = ran.clone();
    let out = pair()
        .chain([
            Step::returning(|n: &Node<i32>| n.len()),
            Step::mutate(move |_| flag.set(true)),
        ])
        .chain(Step::map(|n| n.tag("late")));
    assert!(out.is_escaped());
    assert!(!ran.get());
    assert!(matches!(out.into_node(), Err(PlaitError::Escaped(_))));
}

#[test]
fn side_value_of_plain_step_is_dropped() {
    let out = pair() | Step::new(|_| Outcome::Escaped(Box::new("ignored")));
    assert!(!out.is_escaped());
    assert_eq!(out.into_node().unwrap().len(), 2);
}

#[test]
fn deferred_step_is_built_on_first_use() {
    let built = std::rc::Rc::new(Cell::new(0));
    let counter = built.clone();
    let step = Step::deferred(move || {
        counter.set(counter.get() + 1);
        Step::map(|n: Node<i32>| n.tag("late"))
    })
    .labeled("deferred");
    assert_eq!(step.label(), Some("deferred"));
    assert_eq!(built.get(), 0);

    let out = pair() | step;
    assert_eq!(built.get(), 1);
    assert_eq!(out.node().and_then(Node::get_tag), Some("late"));
}

#[test]
fn deferred_returning_step_keeps_its_flag() {
    let step = Step::deferred(|| Step::returning(|n: &Node<i32>| n.depth()));
    let out = pair() | step;
    assert_eq!(out.escaped::<usize>(), Some(2));
}

#[test]
fn escaped_value_of_wrong_type_is_none() {
    let out = pair() | Step::returning(|_: &Node<i32>| 5u8);
    assert_eq!(out.escaped::<String>(), None);
}

#[test]
fn add_builds_new_container() {
    let a: Node<i32> = Node::leaf(1);
    let sum = a + Node::leaf(2);
    assert_eq!(sum.len(), 2);
    assert!(!sum.has_value());
    assert_eq!(sum.sum(), vec![&1, &2]);
}

#[test]
fn add_assign_appends_in_place() {
    let mut n = pair();
    n += 3;
    n += None::<Node<i32>>;
    assert_eq!(n.sum(), vec![&1, &2, &3]);
}

#[test]
fn div_maps_leaves() {
    let n = pair() / |_, leaf: Node<i32>| leaf.tag("v");
    assert_eq!(n.find(&"v".into(), None).len(), 2);
}

#[test]
fn chained_continues_with_bitor() {
    let out = pair() | Step::map(|n| n.tag("a")) | Step::map(|n| n.data("b", 1));
    let node = out.into_node().unwrap();
    assert_eq!(node.get_tag(), Some("a"));
    assert!(node.get_data("b").is_some());
}
