use super::*;

#[test]
fn presence_per_variant() {
    assert!(!Value::<i32>::Empty.is_present());
    assert!(Value::Scalar(Rc::new(3)).is_present());
    assert!(!Value::<i32>::Path(BezPath::new()).is_present());

    let mut p = BezPath::new();
    p.move_to((0.0, 0.0));
    assert!(Value::<i32>::Path(p).is_present());

    assert!(!Value::Scalar(Rc::new(serde_json::Value::Null)).is_present());
}

#[test]
fn blank_keeps_path_kind() {
    let mut p = BezPath::new();
    p.move_to((1.0, 1.0));
    let v = Value::<i32>::Path(p);
    assert!(v.blank().is_path_kind());
    assert!(!v.blank().is_present());
    assert!(!Value::Scalar(Rc::new(1)).blank().is_path_kind());
}

#[test]
fn duplicate_shares_only_opaque_payloads() {
    let v = Value::Scalar(Rc::new(5u8));
    let (dup, shared) = v.duplicate();
    assert!(!shared);
    assert!(!dup.shares_with(&v));

    let o = Value::Scalar(Rc::new(Opaque(5u8)));
    let (dup, shared) = o.duplicate();
    assert!(shared);
    assert!(dup.shares_with(&o));
}
