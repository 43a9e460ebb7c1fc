use super::*;

#[test]
fn raw_values_round_trip() {
    for raw in 0..8u32 {
        assert_eq!(OutputTransform::from_raw(raw).unwrap().raw(), raw);
    }
    assert_eq!(OutputTransform::from_raw(8), None);
}

#[test]
fn dimensions_swap_only_on_odd_quarter_turns() {
    use OutputTransform::*;
    assert_eq!(Normal.apply_to_dimensions(1920, 1080), (1920, 1080));
    assert_eq!(Rotate90.apply_to_dimensions(1920, 1080), (1080, 1920));
    assert_eq!(Rotate180.apply_to_dimensions(1920, 1080), (1920, 1080));
    assert_eq!(Flipped270.apply_to_dimensions(1920, 1080), (1080, 1920));
    assert_eq!(Flipped.apply_to_dimensions(1920, 1080), (1920, 1080));
}

#[test]
fn dimensions_survive_inverse_rotation() {
    for t in OutputTransform::ALL {
        let (w, h) = t.apply_to_dimensions(640, 480);
        assert_eq!(t.inverse().apply_to_dimensions(w, h), (640, 480), "{t:?}");
    }
}

#[test]
fn rotation_ignores_flip_bit() {
    use std::f64::consts::{FRAC_PI_2, PI};
    assert_eq!(OutputTransform::Normal.rotation_radians(), 0.0);
    assert_eq!(OutputTransform::Flipped.rotation_radians(), 0.0);
    assert_eq!(OutputTransform::Rotate90.rotation_radians(), FRAC_PI_2);
    assert_eq!(OutputTransform::Flipped180.rotation_radians(), PI);
    assert_eq!(OutputTransform::Flipped270.rotation_radians(), 3.0 * FRAC_PI_2);
}

#[test]
fn flip_sign_follows_flip_bit() {
    for t in OutputTransform::ALL {
        let expected = if t.raw() >= 4 { -1.0 } else { 1.0 };
        assert_eq!(t.flip_sign(), expected, "{t:?}");
    }
}

#[test]
fn serde_uses_protocol_names() {
    let t: OutputTransform = serde_json::from_str("\"flipped-90\"").unwrap();
    assert_eq!(t, OutputTransform::Flipped90);
    assert_eq!(
        serde_json::to_string(&OutputTransform::Rotate270).unwrap(),
        "\"270\""
    );
}
