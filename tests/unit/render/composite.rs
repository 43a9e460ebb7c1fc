use super::*;

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_half_alpha_mixes() {
    // 50% black over opaque white
    let out = over([255, 255, 255, 255], [0, 0, 0, 128]);
    assert_eq!(out, [127, 127, 127, 255]);
}

#[test]
fn over_f32_matches_porter_duff() {
    let out = over_f32([1.0, 1.0, 1.0, 1.0], [0.25, 0.0, 0.0, 0.5]);
    assert_eq!(out, [0.75, 0.5, 0.5, 1.0]);
    assert_eq!(over_f32([0.3; 4], [0.0; 4]), [0.3; 4]);
}

#[test]
fn copy_ignores_destination_and_alpha() {
    let src = [1, 2, 3, 4];
    assert_eq!(Operator::Copy.apply_rgba8([9, 9, 9, 255], src), src);
    assert_eq!(Operator::Copy.apply_f32([1.0; 4], [0.0; 4]), [0.0; 4]);
}

#[test]
fn operator_choice_needs_alignment_and_no_overlap() {
    assert_eq!(Operator::choose(true, false), Operator::Copy);
    assert_eq!(Operator::choose(true, true), Operator::Over);
    assert_eq!(Operator::choose(false, false), Operator::Over);
}

#[test]
fn row_over_works_on_words() {
    let mut dst = vec![0xff00_00ff, 0xff00_00ff];
    over_row_argb8(&mut dst, [0x0000_0000, 0xffff_0000].into_iter());
    assert_eq!(dst, vec![0xff00_00ff, 0xffff_0000]);
    assert_eq!(word_to_rgba(0x80ff_4020), [0xff, 0x40, 0x20, 0x80]);
    assert_eq!(rgba_to_word([0xff, 0x40, 0x20, 0x80]), 0x80ff_4020);
}
