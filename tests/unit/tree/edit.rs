use super::*;
use crate::foundation::core::BezPath;

fn ints(values: &[i32]) -> Node<i32> {
    Node::branch(values.iter().copied())
}

fn grid() -> Node<i32> {
    // [[1, 2], [3, 4]]
    Node::new().append(ints(&[1, 2])).append(ints(&[3, 4]))
}

fn values(n: &Node<i32>) -> Vec<i32> {
    n.sum().into_iter().copied().collect()
}

#[test]
fn append_none_is_noop() {
    let n = ints(&[1]).append(None::<Node<i32>>);
    assert_eq!(n.len(), 1);
}

#[test]
fn append_with_sees_current_node() {
    let n = ints(&[1, 2]).append_with(|n| n.len() as i32);
    assert_eq!(values(&n), vec![1, 2, 2]);
}

#[test]
fn extend_and_extend_node() {
    let n = ints(&[1]).extend([Some(2), None, Some(3)].into_iter().flatten());
    assert_eq!(values(&n), vec![1, 2, 3]);

    let n = ints(&[1]).extend_node(ints(&[2, 3]));
    assert_eq!(n.len(), 3);

    let n = ints(&[1]).extend_node(Node::leaf(9));
    assert_eq!(values(&n), vec![1, 9]);
}

#[test]
fn insert_flat_clamps_like_list_insert() {
    let n = ints(&[1, 2]).insert(0, 0).insert(99, 3).insert(-1, 7);
    assert_eq!(values(&n), vec![0, 1, 2, 7, 3]);
}

#[test]
fn insert_nested_goes_into_scope() {
    let n = grid().insert([1, 0], 9);
    assert_eq!(values(&n), vec![1, 2, 9, 3, 4]);
    assert_eq!(n.children()[1].len(), 3);
}

#[test]
fn insert_through_leaf_falls_back_to_top_level() {
    let n = ints(&[1, 2]).insert([0, 1], 9);
    assert_eq!(values(&n), vec![1, 9, 2]);
    assert_eq!(n.len(), 3);
}

#[test]
fn index_supports_negative_and_nested() {
    let n = grid();
    assert_eq!(n.index(-1).map(Node::len), Some(2));
    assert_eq!(n.index([1, -1]).and_then(Node::scalar), Some(&4));
    assert_eq!(n.index([0, 0]).and_then(Node::scalar), Some(&1));
    assert!(n.index(5).is_none());
    assert!(std::ptr::eq(n.index(Address::root()).unwrap(), &n));
}

#[test]
fn index_through_leaf_reads_flat() {
    let n = ints(&[1, 2, 3]);
    // Component 0 lands on a plain leaf, so the address is read as flat index 2.
    assert_eq!(n.index([0, 2]).and_then(Node::scalar), Some(&3));
}

#[test]
fn indices_skip_unresolved() {
    let n = ints(&[1, 2, 3]);
    let found: Vec<_> = n
        .indices([0isize, 7, -1])
        .into_iter()
        .filter_map(Node::scalar)
        .collect();
    assert_eq!(found, vec![&1, &3]);
}

#[test]
fn get_mut_edits_in_place() {
    let mut n = grid();
    if let Some(slot) = n.get_mut([0, 1]) {
        slot.set_data("seen", true);
    }
    assert!(n.children()[0].children()[1].get_data("seen").is_some());
}

fn square() -> BezPath {
    let mut p = BezPath::new();
    p.move_to((0.0, 0.0));
    p.line_to((1.0, 0.0));
    p.line_to((1.0, 1.0));
    p.close_path();
    p
}

#[test]
fn locate_distinguishes_geometry() {
    let n: Node<i32> = Node::new().append(Node::path_leaf(square()));
    assert_eq!(
        n.locate(&Address::from([0, 1])),
        Located::Geometry {
            node: vec![0],
            rest: vec![1]
        }
    );
    assert_eq!(
        n.locate(&Address::from(0)),
        Located::Child {
            scope: vec![],
            index: 0
        }
    );
    assert_eq!(n.locate(&Address::root()), Located::Root);
    assert_eq!(n.locate(&Address::from(3)), Located::Missing);
}

#[test]
fn index_with_replaces_addressed_element() {
    let n = grid().index_with([1, 0], |i, node| node.update(i as i32 + 100));
    assert_eq!(values(&n), vec![1, 2, 100, 4]);

    let n = n.index_with(9, |_, _| Node::leaf(0));
    assert_eq!(values(&n), vec![1, 2, 100, 4]);
}

#[test]
fn index_with_root_replaces_whole_node() {
    let n = grid().index_with(Address::root(), |_, _| Node::leaf(7));
    assert_eq!(n.scalar(), Some(&7));
    assert!(n.is_empty());
}

#[test]
fn indices_with_visits_each_address() {
    let n = ints(&[1, 2, 3]).indices_with([0, 2], |_, node| node.update(0));
    assert_eq!(values(&n), vec![0, 2, 0]);
}

#[test]
fn reverse_children_shallow_and_recursive() {
    let shallow = grid().reverse(false);
    assert_eq!(values(&shallow), vec![3, 4, 1, 2]);

    let deep = grid().reverse(true);
    assert_eq!(values(&deep), vec![4, 3, 2, 1]);
}

#[test]
fn double_reverse_is_identity() {
    let n = grid().reverse(true).reverse(true);
    assert_eq!(values(&n), vec![1, 2, 3, 4]);
}

#[test]
fn split_excludes_separator() {
    let n = ints(&[1, 2, 3]).split(|c| c.scalar() == Some(&2), SplitMode::Exclude);
    assert_eq!(n.len(), 2);
    assert_eq!(values(&n.children()[0]), vec![1]);
    assert_eq!(values(&n.children()[1]), vec![3]);
}

#[test]
fn split_modes_place_separator() {
    let prepend = ints(&[1, 0, 2]).split_value(&0, SplitMode::Prepend);
    assert_eq!(values(&prepend.children()[0]), vec![1]);
    assert_eq!(values(&prepend.children()[1]), vec![0, 2]);

    let append = ints(&[1, 0, 2]).split_value(&0, SplitMode::Append);
    assert_eq!(values(&append.children()[0]), vec![1, 0]);
    assert_eq!(values(&append.children()[1]), vec![2]);
}

#[test]
fn split_keeps_trailing_empty_group() {
    let n = ints(&[1, 0]).split_value(&0, SplitMode::Exclude);
    assert_eq!(n.len(), 2);
    assert!(n.children()[1].is_empty());
}

#[test]
fn split_without_match_yields_one_group() {
    let n = ints(&[1, 2]).split_value(&9, SplitMode::default());
    assert_eq!(n.len(), 1);
    assert_eq!(values(&n), vec![1, 2]);
}

#[test]
fn split_then_flatten_preserves_order() {
    let n = ints(&[5, 0, 6, 7, 0, 8]).split_value(&0, SplitMode::Append);
    assert_eq!(values(&n), vec![5, 0, 6, 7, 0, 8]);
}

#[test]
fn interpose_yields_two_n_minus_one() {
    for len in 0..5 {
        let items: Vec<i32> = (0..len).collect();
        let n = ints(&items).interpose(Node::leaf(-1));
        assert_eq!(n.len(), (2 * len as usize).saturating_sub(1));
    }
    let n = ints(&[1, 2, 3]).interpose(Node::leaf(0));
    assert_eq!(values(&n), vec![1, 0, 2, 0, 3]);
}

#[test]
fn interposed_separators_are_independent() {
    let mut n = ints(&[1, 2, 3]).interpose(Node::leaf(0).data("sep", true));
    n.children_mut()[1].set_data("sep", false);
    assert_eq!(n.children()[3].get_data("sep"), Some(&serde_json::json!(true)));
    assert!(!n.children()[1].shares_value_with(&n.children()[3]));
}

#[test]
fn interpose_with_numbers_gaps() {
    let n = ints(&[1, 2, 3]).interpose_with(|gap| Node::leaf(gap as i32 * 10));
    assert_eq!(values(&n), vec![1, 0, 2, 10, 3]);
}

#[test]
fn shuffle_is_seeded_permutation() {
    let a = ints(&[1, 2, 3, 4, 5, 6]).shuffle(42);
    let b = ints(&[1, 2, 3, 4, 5, 6]).shuffle(42);
    assert_eq!(values(&a), values(&b));

    let mut sorted = values(&a);
    sorted.sort_unstable();
    assert_eq!(sorted, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn delete_and_null_clear_everything() {
    let n = grid().tag("x").delete();
    assert!(n.is_empty());
    assert!(n.get_tag().is_none());
    assert!(!Node::leaf(3).null().has_value());
}

#[test]
fn ups_wraps_current_content() {
    let n = ints(&[1, 2]).tag("inner").alpha(0.5).ups();
    assert_eq!(n.len(), 1);
    assert_eq!(n.get_alpha(), 0.5);
    assert_eq!(n.children()[0].get_tag(), Some("inner"));
    assert_eq!(n.children()[0].get_alpha(), 1.0);
}

#[test]
fn cond_and_when_pick_branches() {
    let n = Node::leaf(1).cond(true, |n| n.tag("yes"), |n| n.tag("no"));
    assert_eq!(n.get_tag(), Some("yes"));

    let n = ints(&[1]).cond_by(|n| n.len() > 3, |n| n.tag("big"), |n| n.tag("small"));
    assert_eq!(n.get_tag(), Some("small"));

    let n = Node::leaf(1).when(false, |n| n.tag("never")).noop();
    assert!(n.get_tag().is_none());
}

#[test]
fn sleep_passes_node_through() {
    let n = Node::leaf(1).sleep(Duration::from_millis(1));
    assert_eq!(n.scalar(), Some(&1));
}

#[test]
fn layer_makes_one_copy_per_function() {
    let layers: [fn(Node<i32>) -> Node<i32>; 2] = [
        |n| n.data("layer", "fill"),
        |n| n.data("layer", "stroke"),
    ];
    let n = Node::leaf(5).tag("src").layer(layers);
    assert_eq!(n.len(), 2);
    assert!(!n.has_value());
    assert_eq!(n.children()[0].scalar(), Some(&5));
    assert_eq!(n.children()[1].get_data("layer"), Some(&serde_json::json!("stroke")));
    assert_eq!(n.children()[0].get_tag(), Some("src"));
}

#[test]
fn layer_n_makes_plain_copies() {
    let n = Node::leaf(2).layer_n(3);
    assert_eq!(values(&n), vec![2, 2, 2]);
}

#[test]
fn layerv_layers_every_value_node() {
    let layers: [fn(Node<i32>) -> Node<i32>; 2] = [|n| n, |n| n.update(0)];
    let n = ints(&[1, 2]).layerv(&layers);
    assert_eq!(n.len(), 2);
    assert_eq!(values(&n), vec![1, 0, 2, 0]);
}

#[test]
fn print_returns_node() {
    let n = ints(&[1]).print();
    assert_eq!(n.len(), 1);
}
