use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PlaitError::shape_mismatch("x")
            .to_string()
            .contains("shape mismatch:")
    );
    assert!(PlaitError::no_parent("x").to_string().contains("no parent:"));
    assert!(
        PlaitError::not_duplicable("x")
            .to_string()
            .contains("not duplicable:")
    );
    assert!(PlaitError::escaped("x").to_string().contains("escaped chain:"));
    assert!(
        PlaitError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PlaitError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_map_to_serde_variant() {
    let err: PlaitError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, PlaitError::Serde(_)));
}
