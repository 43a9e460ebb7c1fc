use super::*;

fn decode(bytes: &[u8]) -> image::RgbImage {
    image::load_from_memory_with_format(bytes, image::ImageFormat::Jpeg)
        .unwrap()
        .to_rgb8()
}

#[test]
fn solid_color_survives_lossy_encoding() {
    let canvas = Canvas::from_argb8(8, 8, vec![0xff20_80c0; 64]).unwrap();
    let mut out = Vec::new();
    write_jpeg(&canvas, 90, &mut out).unwrap();
    assert_eq!(&out[..2], &[0xff, 0xd8]);
    let img = decode(&out);
    assert_eq!(img.dimensions(), (8, 8));
    let [r, g, b] = img.get_pixel(4, 4).0;
    assert!(r.abs_diff(0x20) <= 3 && g.abs_diff(0x80) <= 3 && b.abs_diff(0xc0) <= 3);
}

#[test]
fn transparency_flattens_to_black() {
    let canvas = Canvas::from_argb8(8, 8, vec![0; 64]).unwrap();
    let mut out = Vec::new();
    write_jpeg(&canvas, 0, &mut out).unwrap();
    let [r, g, b] = decode(&out).get_pixel(0, 0).0;
    assert!(r <= 2 && g <= 2 && b <= 2);
}
