use std::io::{BufRead as _, BufWriter, Write as _};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use clap::Parser;
use mosaic::{
    CaptureManifest, Compositor, EncodeOpts, ImageFormat, Region, ScalePolicy, Selection,
};
use tracing_subscriber::EnvFilter;

/// Composite a captured display layout into a single screenshot.
#[derive(Parser, Debug)]
#[command(name = "mosaic", version)]
struct Cli {
    /// Capture manifest (JSON) describing outputs and their raw frames.
    #[arg(long)]
    manifest: PathBuf,

    /// Output image scale factor. Defaults to the greatest output scale.
    #[arg(short = 's', long)]
    scale: Option<f64>,

    /// Region to capture, `<x>,<y> <w>x<h>`. `-` reads it from stdin.
    #[arg(short = 'g', long, allow_hyphen_values = true)]
    geometry: Option<String>,

    /// Output image type.
    #[arg(short = 't', long = "type", default_value = "png")]
    image_type: ImageFormat,

    /// JPEG quality, 0-100.
    #[arg(short = 'q', long)]
    quality: Option<u8>,

    /// PNG compression level, 0-9.
    #[arg(short = 'l', long)]
    level: Option<u8>,

    /// Capture a single output by name.
    #[arg(short = 'o', long, conflicts_with = "geometry")]
    output: Option<String>,

    /// Destination file, `-` for stdout. Defaults to a timestamped name.
    #[arg(allow_hyphen_values = true)]
    file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let opts = encode_opts(&cli)?;
    let selection = selection(&cli)?;

    let manifest = CaptureManifest::load(&cli.manifest)
        .with_context(|| format!("load manifest '{}'", cli.manifest.display()))?;
    let mut compositor = Compositor::new(manifest.layout()?);
    compositor.select(&selection)?;
    manifest.attach_frames(&mut compositor)?;

    match cli.file.as_deref() {
        Some(p) if p == Path::new("-") => {
            let stdout = std::io::stdout();
            let mut sink = BufWriter::new(stdout.lock());
            compositor.write(&opts, &mut sink)?;
            sink.flush().context("flush stdout")?;
        }
        other => {
            let path = match other {
                Some(p) => p.to_path_buf(),
                None => default_output_path(opts.format),
            };
            let file = std::fs::File::create(&path)
                .with_context(|| format!("create '{}'", path.display()))?;
            let mut sink = BufWriter::new(file);
            compositor
                .write(&opts, &mut sink)
                .with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
    }
    Ok(())
}

fn encode_opts(cli: &Cli) -> anyhow::Result<EncodeOpts> {
    let mut opts = EncodeOpts::for_format(cli.image_type);
    if let Some(quality) = cli.quality {
        if cli.image_type != ImageFormat::Jpeg {
            bail!("-q is only valid with -t jpeg");
        }
        opts.jpeg_quality = quality;
    }
    if let Some(level) = cli.level {
        if cli.image_type != ImageFormat::Png {
            bail!("-l is only valid with -t png");
        }
        opts.png_level = level;
    }
    opts.validate()?;
    Ok(opts)
}

fn selection(cli: &Cli) -> anyhow::Result<Selection> {
    let mut selection = match (&cli.output, &cli.geometry) {
        (Some(name), _) => Selection::output(name.clone()),
        (None, Some(g)) if g == "-" => {
            let mut line = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .context("read geometry from stdin")?;
            Selection::region(Region::parse(line.trim_end_matches(['\r', '\n']))?)
        }
        (None, Some(g)) => Selection::region(Region::parse(g)?),
        (None, None) => Selection::all(),
    };
    if let Some(scale) = cli.scale {
        selection = selection.with_scale(ScalePolicy::Fixed(scale));
    }
    Ok(selection)
}

fn default_output_path(format: ImageFormat) -> PathBuf {
    let name = chrono::Local::now()
        .format(&format!("%Y%m%d_%Hh%Mm%Ss_mosaic.{}", format.extension()))
        .to_string();
    default_dir().join(name)
}

fn default_dir() -> PathBuf {
    ["MOSAIC_DEFAULT_DIR", "XDG_PICTURES_DIR"]
        .iter()
        .filter_map(std::env::var_os)
        .map(PathBuf::from)
        .find(|dir| dir.is_dir())
        .unwrap_or_else(|| PathBuf::from("."))
}
