use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use wildmind_inpaint::{
    EditScript, EditorSession, GenerationSettings, HttpInpaintApi, InpaintApi as _, InpaintConfig,
    InpaintRequest, MaskBuffer, MaskValidator, OriginalImage, OutputFormat, Submitter, ThreadSleep,
};

#[derive(Parser, Debug)]
#[command(name = "wildmind-inpaint", version)]
struct Cli {
    /// Verbose logging (`RUST_LOG` is honoured).
    #[arg(long, global = true)]
    debug: bool,

    /// Configuration JSON. Defaults apply to anything it omits.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay an edit script over an image and write the resulting mask PNG.
    Mask(MaskArgs),
    /// Submit an image and mask for inpainting and wait for the result.
    Generate(GenerateArgs),
}

#[derive(Parser, Debug)]
struct MaskArgs {
    /// Source image.
    #[arg(long)]
    image: PathBuf,

    /// Edit script JSON (pointer events in display coordinates).
    #[arg(long)]
    script: PathBuf,

    /// Output mask PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Also write the overlay surface PNG here.
    #[arg(long)]
    overlay_out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Source image.
    #[arg(long)]
    image: PathBuf,

    /// Mask PNG (white = inpaint), same size as the image.
    #[arg(long)]
    mask: PathBuf,

    /// What to paint into the masked area.
    #[arg(long)]
    prompt: String,

    /// Generation settings JSON; `--prompt` and other flags override it.
    #[arg(long)]
    settings: Option<PathBuf>,

    #[arg(long)]
    steps: Option<u32>,

    #[arg(long)]
    guidance: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    format: Option<OutputFormat>,

    /// Use the finetune endpoint with this finetune id.
    #[arg(long)]
    finetune_id: Option<String>,

    /// Download the result image to this path.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    wildmind_inpaint::logging::init(cli.debug);

    let config = match &cli.config {
        Some(path) => InpaintConfig::from_path(path)?,
        None => InpaintConfig::default(),
    };

    match cli.cmd {
        Command::Mask(args) => cmd_mask(&config, args),
        Command::Generate(args) => cmd_generate(&config, args),
    }
}

fn cmd_mask(config: &InpaintConfig, args: MaskArgs) -> anyhow::Result<()> {
    let image = OriginalImage::from_path(&args.image)?;
    let script = EditScript::from_path(&args.script)?;
    let display = script.display.unwrap_or(image.display_size());

    let mut session = EditorSession::new(image.natural_size(), display, config.editor.clone())?;
    let summary = script.replay(&mut session)?;

    let mask = match session.mask() {
        Some(mask) => mask.clone(),
        None => MaskBuffer::black(image.natural_size()),
    };
    write_file(&args.out, &mask.to_png()?)?;
    if let Some(path) = &args.overlay_out {
        write_file(path, &session.overlay().to_png()?)?;
    }

    let stats = mask.stats();
    eprintln!(
        "wrote {} ({} committed, {} discarded, {} white px, {:.2}%)",
        args.out.display(),
        summary.committed,
        summary.discarded,
        stats.white,
        stats.white_percentage()
    );
    Ok(())
}

fn cmd_generate(config: &InpaintConfig, args: GenerateArgs) -> anyhow::Result<()> {
    let image = OriginalImage::from_path(&args.image)?;
    let mask_bytes = std::fs::read(&args.mask)
        .with_context(|| format!("read mask '{}'", args.mask.display()))?;
    let mask = MaskBuffer::decode(&mask_bytes)?;

    let mut settings = match &args.settings {
        Some(path) => read_settings(path)?,
        None => GenerationSettings::default(),
    };
    settings.prompt = args.prompt;
    if let Some(id) = args.finetune_id {
        settings.set_use_finetune(true);
        settings.finetune_id = id;
    }
    if let Some(steps) = args.steps {
        settings.steps = steps;
    }
    if let Some(guidance) = args.guidance {
        settings.guidance = guidance;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    if let Some(format) = args.format {
        settings.output_format = format;
    }

    settings.validate().map_err(user_error)?;
    MaskValidator::new(config.editor.min_white_pixels)
        .validate(Some(&mask), image.natural_size())
        .map_err(user_error)?;
    let request = InpaintRequest::new(&image.base64(), &mask.to_data_url()?, &settings);

    let api = HttpInpaintApi::new(config.api.clone())?;
    let mut submitter = Submitter::new(api, ThreadSleep, config.poll);
    let result = submitter
        .generate_with_progress(&request, |state| tracing::debug!(?state, "generation state"))
        .map_err(user_error)?;

    println!("{}", result.sample);
    if let Some(out) = &args.out {
        let bytes = submitter.api().download(&result.sample)?;
        write_file(out, &bytes)?;
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

fn read_settings(path: &Path) -> anyhow::Result<GenerationSettings> {
    let f = std::fs::File::open(path)
        .with_context(|| format!("open settings '{}'", path.display()))?;
    let settings = serde_json::from_reader(std::io::BufReader::new(f))
        .with_context(|| "parse settings JSON")?;
    Ok(settings)
}

fn user_error(err: wildmind_inpaint::InpaintError) -> anyhow::Error {
    anyhow::anyhow!(err.user_message())
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}
