use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::Parser;

use glasses_core::capture::domain::frame_reader::FrameReader;
use glasses_core::capture::infrastructure::ffmpeg_camera_reader::{
    FfmpegCameraReader, DEFAULT_WARMUP_FRAMES,
};
use glasses_core::capture::infrastructure::image_file_reader::ImageFileReader;
use glasses_core::capture::infrastructure::image_file_writer::ImageFileWriter;
use glasses_core::detection::infrastructure::blazeface_face_locator::DEFAULT_CONFIDENCE;
use glasses_core::detection::infrastructure::model_factory::{
    create_face_mesh_provider, ModelSources,
};
use glasses_core::overlay::infrastructure::filter_directory::FilterDirectory;
use glasses_core::pipeline::apply_filter_use_case::ApplyFilterUseCase;
use glasses_core::pipeline::input_router::{select_input, InputSource};
use glasses_core::pipeline::overlay_image_use_case::OverlayImageUseCase;
use glasses_core::shared::constants::{
    DEFAULT_CAMERA_DEVICE, DEFAULT_FILTER, FILTERS_DIR, IMAGE_EXTENSIONS,
};

/// Try on eyewear: overlay a glasses filter on a photo or webcam capture.
#[derive(Parser)]
#[command(name = "glasses")]
struct Cli {
    /// Input source: upload or webcam.
    #[arg(long, default_value = "upload")]
    source: String,

    /// Image file used in upload mode.
    #[arg(long)]
    upload: Option<PathBuf>,

    /// Capture device used in webcam mode.
    #[arg(long, default_value = DEFAULT_CAMERA_DEVICE)]
    webcam: String,

    /// Webcam frames discarded before the captured one.
    #[arg(long, default_value_t = DEFAULT_WARMUP_FRAMES)]
    warmup_frames: usize,

    /// Filter file name inside the filters directory.
    #[arg(long, default_value = DEFAULT_FILTER)]
    filter: String,

    /// Directory holding the filter PNGs.
    #[arg(long, default_value = FILTERS_DIR)]
    filters_dir: PathBuf,

    /// Output image file (required unless --list-filters is used).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Directory searched for model files before downloading.
    #[arg(long)]
    models_dir: Option<PathBuf>,

    /// Base URL to download missing models from.
    #[arg(long)]
    model_url: Option<String>,

    /// Print the available filters and exit.
    #[arg(long)]
    list_filters: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let filters = FilterDirectory::new(&cli.filters_dir);

    if cli.list_filters {
        let names = filters.available();
        if names.is_empty() {
            eprintln!("{}", no_filters_hint(&cli.filters_dir));
        }
        for name in names {
            println!("{name}");
        }
        return Ok(());
    }

    let source = validate(&cli)?;
    let output = cli.output.as_deref().ok_or("Output file is required")?;

    let reader = select_input(
        source,
        cli.upload
            .as_deref()
            .map(|p| -> Box<dyn FrameReader> { Box::new(ImageFileReader::new(p)) }),
        Some(Box::new(
            FfmpegCameraReader::new(cli.webcam.as_str()).with_warmup_frames(cli.warmup_frames),
        ) as Box<dyn FrameReader>),
    )
    .ok_or("--upload is required in upload mode")?;

    let mut sources = ModelSources::from_env(cli.models_dir.clone());
    if cli.model_url.is_some() {
        sources.base_url = cli.model_url.clone();
    }
    let provider = create_face_mesh_provider(&sources, cli.confidence, Some(Arc::new(download_progress)))?;
    eprintln!();

    let apply = ApplyFilterUseCase::new(Box::new(provider), Box::new(filters));
    let mut use_case = OverlayImageUseCase::new(reader, Box::new(ImageFileWriter::new()), apply);
    use_case.execute(&cli.filter, output)?;
    log::info!("Output written to {}", output.display());
    Ok(())
}

fn validate(cli: &Cli) -> Result<InputSource, Box<dyn std::error::Error>> {
    let source: InputSource = cli.source.parse()?;
    if source == InputSource::Upload {
        match &cli.upload {
            None => return Err("--upload is required in upload mode".into()),
            Some(path) if !path.exists() => {
                return Err(format!("Input file not found: {}", path.display()).into())
            }
            Some(path) if !is_image(path) => {
                return Err(format!("Unsupported image type: {}", path.display()).into())
            }
            Some(_) => {}
        }
    }
    match &cli.output {
        None => return Err("Output file is required unless --list-filters is used".into()),
        Some(path) if !is_image(path) => {
            return Err(format!(
                "Output must be an image file ({}), got {}",
                IMAGE_EXTENSIONS.join(", "),
                path.display()
            )
            .into())
        }
        Some(_) => {}
    }
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if cli.filter.trim().is_empty() {
        return Err("Filter name must not be empty".into());
    }
    Ok(source)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn no_filters_hint(dir: &Path) -> String {
    format!("No filters found in {}. Add PNG files with transparency there.", dir.display())
}

fn download_progress(name: &str, downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading {name}... {pct}%");
    } else {
        eprint!("\rDownloading {name}... {downloaded} bytes");
    }
}
