use super::*;
use crate::encode::ImageFormat;
use crate::layout::builder::LayoutBuilder;
use crate::layout::output::OutputBuilder;
use crate::layout::selection::ScalePolicy;
use crate::pixel::buffer::PixelBuffer;
use crate::pixel::format::ShmFormat;
use crate::transform::output::OutputTransform;

const RED: u32 = 0xffff_0000;
const GREEN: u32 = 0xff00_ff00;
const BLUE: u32 = 0xff00_00ff;
const WHITE: u32 = 0xffff_ffff;

fn output(name: &str, x: i32, y: i32, w: i32, h: i32) -> OutputBuilder {
    OutputBuilder::new()
        .name(name)
        .position(x, y)
        .mode(w, h)
        .logical_position(x, y)
        .logical_size(w, h)
}

fn layout(outputs: Vec<OutputBuilder>) -> Layout {
    let mut b = LayoutBuilder::new();
    for o in outputs {
        b.push_builder(o).unwrap();
    }
    b.finish().unwrap()
}

fn frame(w: u32, h: u32, format: ShmFormat, words: &[u32]) -> CapturedFrame {
    CapturedFrame::new(PixelBuffer::from_words(w, h, format, words).unwrap())
}

fn words(canvas: &Canvas) -> Vec<u32> {
    canvas.argb8().into_owned()
}

#[test]
fn single_identity_output_is_copied_verbatim() {
    let mut c = Compositor::new(layout(vec![output("DP-1", 0, 0, 2, 2)]));
    assert_eq!(c.state(), CompositorState::Empty);
    c.select(&Selection::all()).unwrap();
    assert_eq!(c.state(), CompositorState::Sized);
    c.attach(0, frame(2, 2, ShmFormat::Argb8888, &[RED, GREEN, BLUE, 0x8040_2010]))
        .unwrap();
    assert_eq!(c.state(), CompositorState::Populated);

    let canvas = c.composite().unwrap();
    assert_eq!(canvas.format(), CanvasFormat::Argb8);
    assert_eq!(words(canvas), vec![RED, GREEN, BLUE, 0x8040_2010]);

    let paint = &c.paints()[0];
    assert!(paint.grid_aligned);
    assert!(!paint.overlapping);
    assert_eq!(paint.operator, Operator::Copy);
    assert_eq!(paint.destination, Region::new(0, 0, 2, 2));
    assert_eq!(c.state(), CompositorState::Composited);
}

#[test]
fn opaque_sources_get_full_alpha() {
    let mut c = Compositor::new(layout(vec![output("DP-1", 0, 0, 1, 1)]));
    c.select(&Selection::all()).unwrap();
    c.attach(0, frame(1, 1, ShmFormat::Xrgb8888, &[0x0012_3456]))
        .unwrap();
    assert_eq!(words(c.composite().unwrap()), vec![0xff12_3456]);
}

#[test]
fn touching_outputs_are_both_copied() {
    let mut c = Compositor::new(layout(vec![
        output("left", 0, 0, 1, 1),
        output("right", 1, 0, 1, 1),
    ]));
    c.select(&Selection::all()).unwrap();
    c.attach_named("left", frame(1, 1, ShmFormat::Xrgb8888, &[RED]))
        .unwrap();
    c.attach_named("right", frame(1, 1, ShmFormat::Xbgr8888, &[0x00ff_0000]))
        .unwrap();
    let canvas = c.composite().unwrap();
    assert_eq!(words(canvas), vec![RED, BLUE]);
    assert!(c.paints().iter().all(|p| p.operator == Operator::Copy));
}

#[test]
fn overlapping_outputs_blend() {
    let mut c = Compositor::new(layout(vec![
        output("base", 0, 0, 2, 1),
        output("top", 1, 0, 2, 1),
    ]));
    c.select(&Selection::all()).unwrap();
    c.attach(0, frame(2, 1, ShmFormat::Argb8888, &[WHITE, WHITE]))
        .unwrap();
    // half-transparent black, premultiplied
    c.attach(1, frame(2, 1, ShmFormat::Argb8888, &[0x8000_0000, 0x8000_0000]))
        .unwrap();
    let canvas = c.composite().unwrap();
    assert_eq!(canvas.width(), 3);
    assert_eq!(words(canvas), vec![WHITE, 0xff7f_7f7f, 0x8000_0000]);
    assert!(c.paints().iter().all(|p| p.overlapping && p.operator == Operator::Over));
}

#[test]
fn rotated_output_is_turned_upright() {
    let out = OutputBuilder::new()
        .name("portrait")
        .mode(2, 1)
        .transform(OutputTransform::Rotate90)
        .logical_size(1, 2);
    let mut c = Compositor::new(layout(vec![out]));
    c.select(&Selection::all()).unwrap();
    c.attach(0, frame(2, 1, ShmFormat::Xrgb8888, &[RED, BLUE]))
        .unwrap();
    let canvas = c.composite().unwrap();
    assert_eq!((canvas.width(), canvas.height()), (1, 2));
    assert_eq!(words(canvas), vec![RED, BLUE]);
    assert_eq!(c.paints()[0].operator, Operator::Copy);
}

#[test]
fn y_inverted_frames_are_flipped() {
    let mut c = Compositor::new(layout(vec![output("DP-1", 0, 0, 1, 2)]));
    c.select(&Selection::all()).unwrap();
    c.attach(
        0,
        frame(1, 2, ShmFormat::Xrgb8888, &[RED, BLUE]).with_y_invert(true),
    )
    .unwrap();
    assert_eq!(words(c.composite().unwrap()), vec![BLUE, RED]);
}

#[test]
fn hidpi_output_keeps_native_resolution() {
    let out = OutputBuilder::new()
        .name("hidpi")
        .mode(2, 2)
        .scale(2)
        .logical_size(1, 1);
    let mut c = Compositor::new(layout(vec![out]));
    let resolved = c.select(&Selection::all()).unwrap();
    assert_eq!(resolved.scale, 2.0);
    c.attach(0, frame(2, 2, ShmFormat::Xrgb8888, &[RED, GREEN, BLUE, WHITE]))
        .unwrap();
    assert_eq!(words(c.composite().unwrap()), vec![RED, GREEN, BLUE, WHITE]);
}

#[test]
fn downscaling_averages_source_pixels() {
    let out = OutputBuilder::new()
        .name("hidpi")
        .mode(2, 2)
        .scale(2)
        .logical_size(1, 1);
    let mut c = Compositor::new(layout(vec![out]));
    c.select(&Selection::all().with_scale(ScalePolicy::Fixed(1.0)))
        .unwrap();
    c.attach(0, frame(2, 2, ShmFormat::Xrgb8888, &[WHITE, 0, 0, WHITE]))
        .unwrap();
    let canvas = c.composite().unwrap();
    let [a, r, g, b] = words(canvas)[0].to_be_bytes();
    assert_eq!(a, 0xff);
    for ch in [r, g, b] {
        assert!(ch.abs_diff(0x80) <= 1, "{ch:#x}");
    }
}

#[test]
fn crop_drops_unrelated_outputs() {
    let mut c = Compositor::new(layout(vec![
        output("left", 0, 0, 2, 2),
        output("right", 2, 0, 2, 2),
    ]));
    c.select(&Selection::region(Region::new(1, 1, 1, 1))).unwrap();
    assert_eq!(c.pending(), vec![0]);
    assert!(!c.is_required(1));
    c.attach(1, frame(2, 2, ShmFormat::Xrgb8888, &[RED; 4]))
        .unwrap();
    assert_eq!(c.state(), CompositorState::Sized);
    c.attach(0, frame(2, 2, ShmFormat::Xrgb8888, &[RED, GREEN, BLUE, WHITE]))
        .unwrap();
    let canvas = c.composite().unwrap();
    assert_eq!(words(canvas), vec![WHITE]);
    assert_eq!(c.paints().len(), 1);
}

#[test]
fn wide_frames_switch_the_canvas_format() {
    let mut c = Compositor::new(layout(vec![
        output("a", 0, 0, 1, 1),
        output("b", 1, 0, 1, 1),
    ]));
    c.select(&Selection::all()).unwrap();
    c.attach(0, frame(1, 1, ShmFormat::Xrgb8888, &[RED])).unwrap();
    c.attach(1, frame(1, 1, ShmFormat::Xrgb2101010, &[0x3ff]))
        .unwrap();
    let canvas = c.composite().unwrap();
    assert_eq!(canvas.format(), CanvasFormat::RgbaF32);
    let CanvasPixels::RgbaF32(px) = canvas.pixels() else {
        panic!("expected wide storage");
    };
    assert_eq!(px[0], [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(px[1], [0.0, 0.0, 1.0, 1.0]);
}

#[test]
fn unsupported_format_aborts_everything() {
    let mut c = Compositor::new(layout(vec![
        output("a", 0, 0, 1, 1),
        output("b", 1, 0, 1, 1),
    ]));
    c.select(&Selection::all()).unwrap();
    c.attach(0, frame(1, 1, ShmFormat::Xrgb8888, &[RED])).unwrap();
    c.attach(1, frame(1, 1, ShmFormat::Other(0x3631_5258), &[0]))
        .unwrap();
    let err = c.composite().unwrap_err();
    assert!(matches!(err, MosaicError::UnsupportedFormat(_)));
    assert!(c.canvas().is_none());
    assert_eq!(c.state(), CompositorState::Populated);
}

#[test]
fn operations_out_of_order_are_rejected() {
    let mut c = Compositor::new(layout(vec![output("a", 0, 0, 1, 1)]));
    let f = frame(1, 1, ShmFormat::Xrgb8888, &[RED]);
    assert!(matches!(
        c.attach(0, f.clone()),
        Err(MosaicError::Validation(_))
    ));
    assert!(c.composite().is_err());

    c.select(&Selection::all()).unwrap();
    assert!(c.select(&Selection::all()).is_err());
    assert!(c.composite().is_err());
    assert!(c.attach(5, f.clone()).is_err());
    assert!(c.attach(0, frame(2, 1, ShmFormat::Xrgb8888, &[RED, RED])).is_err());
    c.attach(0, f.clone()).unwrap();
    assert!(c.attach(0, f).is_err());
}

#[test]
fn missing_frames_block_compositing() {
    let mut c = Compositor::new(layout(vec![
        output("a", 0, 0, 1, 1),
        output("b", 1, 0, 1, 1),
    ]));
    c.select(&Selection::all()).unwrap();
    c.attach(0, frame(1, 1, ShmFormat::Xrgb8888, &[RED])).unwrap();
    assert_eq!(c.pending(), vec![1]);
    let err = c.composite().unwrap_err();
    assert!(err.to_string().contains("missing frames for b"), "{err}");
}

#[test]
fn write_finalizes() {
    let mut c = Compositor::new(layout(vec![output("a", 0, 0, 1, 1)]));
    c.select(&Selection::all()).unwrap();
    c.attach(0, frame(1, 1, ShmFormat::Xrgb8888, &[WHITE])).unwrap();

    let mut out = Vec::new();
    let opts = EncodeOpts::for_format(ImageFormat::Ppm);
    c.write(&opts, &mut out).unwrap();
    assert_eq!(out, b"P6\n1 1\n255\n\xff\xff\xff");
    assert_eq!(c.state(), CompositorState::Finalized);
    assert!(c.write(&opts, &mut Vec::new()).is_err());
    assert!(c.into_canvas().is_some());
}
