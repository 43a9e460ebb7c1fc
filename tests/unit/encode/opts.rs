use super::*;

#[test]
fn format_names_parse() {
    assert_eq!("png".parse::<ImageFormat>().unwrap(), ImageFormat::Png);
    assert_eq!("JPG".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
    assert_eq!("jpeg".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
    assert_eq!("ppm".parse::<ImageFormat>().unwrap(), ImageFormat::Ppm);
    assert!("gif".parse::<ImageFormat>().is_err());
    assert_eq!(ImageFormat::Jpeg.extension(), "jpeg");
}

#[test]
fn defaults_match_documented_values() {
    let opts = EncodeOpts::default();
    assert_eq!(opts.format, ImageFormat::Png);
    assert_eq!(opts.png_level, 6);
    assert_eq!(opts.jpeg_quality, 80);
    assert!(opts.validate().is_ok());
}

#[test]
fn out_of_range_levels_are_rejected() {
    let mut opts = EncodeOpts::for_format(ImageFormat::Jpeg);
    opts.jpeg_quality = 101;
    assert!(opts.validate().is_err());

    let mut opts = EncodeOpts::default();
    opts.png_level = 10;
    let canvas = Canvas::new(1, 1, crate::render::canvas::CanvasFormat::Argb8).unwrap();
    let mut out = Vec::new();
    assert!(matches!(
        write_canvas(&canvas, &opts, &mut out),
        Err(MosaicError::Validation(_))
    ));
    assert!(out.is_empty());
}

struct BrokenSink;

impl Write for BrokenSink {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn sink_failures_surface_as_write_errors() {
    let canvas = Canvas::from_argb8(1, 1, vec![0xffff_ffff]).unwrap();
    for format in [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Ppm] {
        let err = write_canvas(&canvas, &EncodeOpts::for_format(format), &mut BrokenSink)
            .unwrap_err();
        assert!(matches!(err, MosaicError::EncodeWrite(_)), "{format}: {err}");
    }
}
