use super::*;

#[test]
fn reported_logical_geometry_sets_logical_scale() {
    let out = OutputBuilder::new()
        .name("DP-1")
        .position(0, 0)
        .mode(3840, 2160)
        .scale(2)
        .logical_position(1920, 0)
        .logical_size(2560, 1440)
        .build()
        .unwrap();
    assert_eq!(out.name(), Some("DP-1"));
    assert_eq!(out.logical_geometry(), Region::new(1920, 0, 2560, 1440));
    assert_eq!(out.logical_scale(), 1.5);
    assert!(!out.logical_guessed());
}

#[test]
fn logical_scale_accounts_for_rotation() {
    let out = OutputBuilder::new()
        .mode(1920, 1080)
        .transform(OutputTransform::Rotate90)
        .logical_position(0, 0)
        .logical_size(540, 960)
        .build()
        .unwrap();
    assert_eq!(out.transformed_size(), (1080, 1920));
    assert_eq!(out.logical_scale(), 2.0);
}

#[test]
fn missing_logical_geometry_is_guessed() {
    let out = OutputBuilder::new()
        .position(100, 20)
        .mode(2880, 1800)
        .scale(2)
        .transform(OutputTransform::Flipped270)
        .build()
        .unwrap();
    assert!(out.logical_guessed());
    assert_eq!(out.logical_geometry(), Region::new(100, 20, 900, 1440));
    assert_eq!(out.logical_scale(), 2.0);
}

#[test]
fn invalid_outputs_are_rejected() {
    assert!(OutputBuilder::new().build().is_err());
    assert!(OutputBuilder::new().mode(0, 10).build().is_err());
    assert!(OutputBuilder::new().mode(10, 10).scale(0).build().is_err());
    assert!(
        OutputBuilder::new()
            .mode(10, 10)
            .logical_size(0, 5)
            .build()
            .is_err()
    );
    assert!(OutputBuilder::new().mode(1, 1).scale(2).build().is_err());
}

#[test]
fn label_falls_back_to_position() {
    let out = OutputBuilder::new().position(7, 9).mode(4, 4).build().unwrap();
    assert_eq!(out.label(), "output@7,9");
}
