use super::*;

#[test]
fn codes_round_trip() {
    for (format, code, _) in KNOWN {
        assert_eq!(ShmFormat::from_raw(code), format);
        assert_eq!(format.raw(), code);
    }
    assert_eq!(ShmFormat::from_raw(0x1234), ShmFormat::Other(0x1234));
    assert_eq!(ShmFormat::Other(0x1234).raw(), 0x1234);
}

#[test]
fn fourcc_codes_match_the_protocol() {
    assert_eq!(ShmFormat::Abgr8888.raw(), 0x3432_4241);
    assert_eq!(ShmFormat::Xrgb2101010.raw(), 0x3033_5258);
}

#[test]
fn parse_accepts_names_tags_and_codes() {
    assert_eq!("xrgb8888".parse::<ShmFormat>().unwrap(), ShmFormat::Xrgb8888);
    assert_eq!("ABGR8888".parse::<ShmFormat>().unwrap(), ShmFormat::Abgr8888);
    assert_eq!("AR30".parse::<ShmFormat>().unwrap(), ShmFormat::Argb2101010);
    assert_eq!("0".parse::<ShmFormat>().unwrap(), ShmFormat::Argb8888);
    assert_eq!(
        "0x30334258".parse::<ShmFormat>().unwrap(),
        ShmFormat::Xbgr2101010
    );
    assert!("not-a-format".parse::<ShmFormat>().is_err());
}

#[test]
fn display_names_the_tag() {
    assert_eq!(ShmFormat::Xrgb8888.to_string(), "XRGB8888 (0x1)");
    assert_eq!(ShmFormat::from_raw(0x3631_5258).to_string(), "XR16 (0x36315258)");
    assert_eq!(ShmFormat::Other(7).to_string(), "0x7");
}

#[test]
fn canonical_formats_need_no_repack() {
    for f in [ShmFormat::Argb8888, ShmFormat::Xrgb8888] {
        let d = describe(f).unwrap();
        assert!(d.is_canonical());
        assert!(!d.is_wide());
    }
    assert!(describe(ShmFormat::Argb8888).unwrap().has_alpha);
    assert!(!describe(ShmFormat::Xrgb8888).unwrap().has_alpha);
    assert!(!describe(ShmFormat::Abgr8888).unwrap().is_canonical());
}

#[test]
fn channel_extraction_follows_layout() {
    let word = 0x8040_2010u32;
    let d = describe(ShmFormat::Rgba8888).unwrap();
    assert_eq!(d.r.extract(word), 0x80);
    assert_eq!(d.g.extract(word), 0x40);
    assert_eq!(d.b.extract(word), 0x20);
    assert_eq!(d.a.extract(word), 0x10);

    let d = describe(ShmFormat::Argb2101010).unwrap();
    assert!(d.is_wide());
    let word = (3u32 << 30) | (1023 << 20) | (512 << 10) | 1;
    assert_eq!(d.a.extract(word), 3);
    assert_eq!(d.r.extract(word), 1023);
    assert_eq!(d.g.extract(word), 512);
    assert_eq!(d.b.extract(word), 1);
    assert_eq!(d.r.unorm(word), 1.0);
    assert_eq!(d.a.max(), 3);
}

#[test]
fn unknown_formats_are_unsupported() {
    let err = describe(ShmFormat::Other(0x3631_4752)).unwrap_err();
    assert!(matches!(
        err,
        MosaicError::UnsupportedFormat(ShmFormat::Other(0x3631_4752))
    ));
}
