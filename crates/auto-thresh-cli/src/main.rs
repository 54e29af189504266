//! Binarize a grayscale image from the command line.
//!
//! Picks a threshold with one of the global selectors, or a threshold
//! surface with one of the local methods, and optionally writes the
//! resulting mask as a PNG.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use image::ImageReader;
use log::LevelFilter;

use auto_thresh::core::logger;
use auto_thresh::{
    adapt, binarize, isodata, li, mean, minimum, otsu, triangle, yen, BorderMode, DynImage,
    HistogramOptions, LiParams, LocalMethod, Source, ThresholdError, WindowShape,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read or decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Threshold(#[from] ThresholdError),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("logger already installed: {0}")]
    Logger(#[from] log::SetLoggerError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Method {
    Otsu,
    Yen,
    Isodata,
    Triangle,
    Minimum,
    Mean,
    Li,
    LocalMean,
    LocalGaussian,
    LocalMedian,
    Niblack,
    Sauvola,
}

impl Method {
    fn is_local(self) -> bool {
        matches!(
            self,
            Method::LocalMean
                | Method::LocalGaussian
                | Method::LocalMedian
                | Method::Niblack
                | Method::Sauvola
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Border {
    Reflect,
    Constant,
    Nearest,
    Mirror,
    Wrap,
}

#[derive(Parser, Debug)]
#[command(name = "auto-thresh", version, about = "Automatic image binarization")]
struct Args {
    /// Input image (decoded to 8-bit grayscale).
    input: PathBuf,

    /// Write the binary mask here as PNG (255 foreground, 0 background).
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Method::Otsu)]
    method: Method,

    /// Histogram bins for float data; 8-bit input always gets one bin
    /// per value.
    #[arg(long, default_value_t = 256)]
    nbins: usize,

    /// Window extents for the local methods, one value or one per axis.
    #[arg(long, value_delimiter = ',', default_value = "15")]
    block_size: Vec<usize>,

    /// Niblack/Sauvola weight on the windowed standard deviation.
    #[arg(short, long, default_value_t = 0.2)]
    k: f64,

    /// Sauvola dynamic range; defaults to half the dtype range.
    #[arg(short, long)]
    r: Option<f64>,

    /// Subtracted from local mean/gaussian/median surfaces.
    #[arg(long, default_value_t = 0.0)]
    offset: f64,

    /// Boundary handling for the local methods.
    #[arg(long, value_enum, default_value_t = Border::Reflect)]
    border: Border,

    /// Fill value for `--border constant`.
    #[arg(long, default_value_t = 0.0)]
    cval: f64,

    /// Emit a JSON summary on stdout instead of the bare threshold.
    #[arg(long)]
    json: bool,

    /// Increase verbosity (-v: info, -vv: debug, -vvv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    logger::init_with_level(level)?;

    let gray = ImageReader::open(&args.input)?.decode()?.to_luma8();
    log::info!(
        "loaded {} ({}x{})",
        args.input.display(),
        gray.width(),
        gray.height()
    );
    let view = adapt::gray_view(&gray)?;
    let image = DynImage::from(view);
    let opts = HistogramOptions {
        nbins: args.nbins,
        normalize: false,
    };

    let border = match args.border {
        Border::Reflect => BorderMode::Reflect,
        Border::Constant => BorderMode::Constant(args.cval),
        Border::Nearest => BorderMode::Nearest,
        Border::Mirror => BorderMode::Mirror,
        Border::Wrap => BorderMode::Wrap,
    };
    let window = match args.block_size.as_slice() {
        [size] => WindowShape::Scalar(*size),
        sizes => WindowShape::PerAxis(sizes.to_vec()),
    };

    let (threshold, mask) = if args.method.is_local() {
        let surface = match args.method {
            Method::LocalMean => local_surface(&image, &window, LocalMethod::Mean, args, border)?,
            Method::LocalGaussian => {
                local_surface(&image, &window, LocalMethod::Gaussian, args, border)?
            }
            Method::LocalMedian => {
                local_surface(&image, &window, LocalMethod::Median, args, border)?
            }
            Method::Niblack => auto_thresh::niblack_image(&image, &window, args.k)?,
            Method::Sauvola => auto_thresh::sauvola_image(&image, &window, args.k, args.r)?,
            _ => unreachable!(),
        };
        (None, binarize::apply_surface(&image, surface.view())?)
    } else {
        let source = Source::Image(image.clone());
        let t = match args.method {
            Method::Otsu => otsu(&source, &opts)?,
            Method::Yen => yen(&source, &opts)?,
            Method::Isodata => isodata(&source, &opts)?,
            Method::Triangle => triangle(&source, &opts)?,
            Method::Minimum => minimum(&source, &opts)?,
            Method::Mean => mean(&image)?,
            Method::Li => li(&image, &LiParams::default(), None)?,
            _ => unreachable!(),
        };
        log::info!("threshold: {t}");
        (Some(t), binarize::apply_threshold(&image, t))
    };

    if let Some(path) = &args.output {
        let rendered = adapt::mask_to_gray(&mask)?;
        rendered.save(path)?;
        log::info!("wrote mask to {}", path.display());
    }

    let foreground = mask.iter().filter(|&&m| m).count();
    if args.json {
        let summary = serde_json::json!({
            "method": format!("{:?}", args.method),
            "threshold": threshold,
            "shape": mask.shape(),
            "foreground": foreground,
            "total": mask.len(),
        });
        println!("{summary}");
    } else if let Some(t) = threshold {
        println!("{t}");
    } else {
        println!("{foreground}/{} pixels above the local surface", mask.len());
    }
    Ok(())
}

fn local_surface(
    image: &DynImage<'_>,
    window: &WindowShape,
    method: LocalMethod,
    args: &Args,
    border: BorderMode,
) -> Result<ndarray::ArrayD<f64>, ThresholdError> {
    auto_thresh::local_image(image, window, method, args.offset, border, None)
}
