use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use mockpress::{DesignId, MockupId, MockupStore as _};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mockpress", version)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite one design onto one mockup.
    Composite(CompositeArgs),
    /// Convert a pixel rectangle into a normalized design area.
    Normalize(NormalizeArgs),
    /// Ingest mockups and designs from a manifest and run one job over all pairs.
    Batch(BatchArgs),
}

#[derive(Parser, Debug)]
struct CompositeArgs {
    /// Mockup image.
    #[arg(long)]
    mockup: PathBuf,

    /// Design image.
    #[arg(long)]
    design: PathBuf,

    /// Design area JSON: {"x":..,"y":..,"width":..,"height":..,"rotation":..}.
    #[arg(long)]
    area: String,

    /// Output path; the mockup's format is kept (PNG unless JPEG or WebP).
    #[arg(long)]
    out: PathBuf,

    /// Resampling filter.
    #[arg(long, value_enum, default_value_t = FilterChoice::Lanczos3)]
    filter: FilterChoice,
}

#[derive(Parser, Debug)]
struct NormalizeArgs {
    /// Pixel rectangle as `x,y,width,height[,rotation]`.
    #[arg(long)]
    rect: String,

    /// Rendered image size as `WIDTHxHEIGHT`.
    #[arg(long)]
    size: String,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Manifest JSON listing mockups and designs; paths are relative to the manifest.
    #[arg(long)]
    manifest: PathBuf,

    /// TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Storage root for uploads and outputs (overrides the config).
    #[arg(long)]
    root: Option<PathBuf>,

    /// JSON store snapshot to load and update.
    #[arg(long)]
    store: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FilterChoice {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<FilterChoice> for mockpress::ResizeFilter {
    fn from(c: FilterChoice) -> Self {
        match c {
            FilterChoice::Nearest => Self::Nearest,
            FilterChoice::Triangle => Self::Triangle,
            FilterChoice::CatmullRom => Self::CatmullRom,
            FilterChoice::Gaussian => Self::Gaussian,
            FilterChoice::Lanczos3 => Self::Lanczos3,
        }
    }
}

#[derive(serde::Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct Manifest {
    mockups: Vec<ManifestMockup>,
    designs: Vec<ManifestDesign>,
}

#[derive(serde::Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct ManifestMockup {
    path: PathBuf,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    area: Option<mockpress::NormalizedRect>,
}

#[derive(serde::Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct ManifestDesign {
    path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Composite(args) => cmd_composite(args),
        Command::Normalize(args) => cmd_normalize(args),
        Command::Batch(args) => cmd_batch(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "mockpress=debug" } else { "mockpress=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_composite(args: CompositeArgs) -> anyhow::Result<()> {
    let area = mockpress::NormalizedRect::from_json(&args.area)?;
    let assets = mockpress::FsAssetStore::new(".");
    let options = mockpress::CompositeOptions {
        filter: args.filter.into(),
    };

    mockpress::composite(&assets, &args.mockup, &args.design, &area, &args.out, &options)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_normalize(args: NormalizeArgs) -> anyhow::Result<()> {
    let rect = parse_rect(&args.rect)?;
    let size = parse_size(&args.size)?;
    let area = mockpress::to_normalized(&rect, size)
        .context("image size must have a positive width and height")?;
    println!("{}", serde_json::to_string_pretty(&area)?);
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let mut cfg = match &args.config {
        Some(path) => mockpress::Config::load(path)?,
        None => mockpress::Config::default(),
    };
    if let Some(root) = args.root {
        cfg.storage_root = root;
    }

    let manifest = read_manifest(&args.manifest)?;
    let base = args.manifest.parent().unwrap_or_else(|| Path::new("."));

    let store = Arc::new(match &args.store {
        Some(path) => mockpress::MemoryStore::open(path)?,
        None => mockpress::MemoryStore::in_memory(),
    });
    let assets = Arc::new(mockpress::FsAssetStore::new(&cfg.storage_root));

    let mut mockup_ids = Vec::<MockupId>::new();
    for entry in &manifest.mockups {
        let (file_name, bytes) = read_upload(base, &entry.path)?;
        let mockup = mockpress::ingest_mockup(
            &*store,
            &*assets,
            &cfg.uploads_dir,
            &file_name,
            entry.name.as_deref(),
            &bytes,
        )?;
        if let Some(area) = entry.area {
            store.update_area(mockup.id, area)?;
        }
        mockup_ids.push(mockup.id);
    }

    let mut design_ids = Vec::<DesignId>::new();
    for entry in &manifest.designs {
        let (file_name, bytes) = read_upload(base, &entry.path)?;
        let design = mockpress::ingest_design(
            &*store,
            &*assets,
            &cfg.uploads_dir,
            &file_name,
            &bytes,
        )?;
        design_ids.push(design.id);
    }

    let runner = mockpress::JobRunner::new(
        mockpress::Stores::shared(store.clone()),
        assets,
        mockpress::RunnerSettings::from(&cfg),
    );
    let job = runner.create_job(&mockup_ids, &design_ids)?.wait()?;
    store.close()?;

    println!("{}", serde_json::to_string_pretty(&job)?);
    Ok(())
}

fn read_manifest(path: &Path) -> anyhow::Result<Manifest> {
    let f = File::open(path).with_context(|| format!("open manifest '{}'", path.display()))?;
    let manifest: Manifest = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse manifest '{}'", path.display()))?;
    Ok(manifest)
}

fn read_upload(base: &Path, rel: &Path) -> anyhow::Result<(String, Vec<u8>)> {
    let path = base.join(rel);
    let bytes = std::fs::read(&path).with_context(|| format!("read '{}'", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("'{}' has no file name", path.display()))?;
    Ok((file_name, bytes))
}

fn parse_rect(s: &str) -> anyhow::Result<mockpress::PixelRect> {
    let parts = s
        .split(',')
        .map(|p| {
            p.trim()
                .parse::<f64>()
                .with_context(|| format!("invalid number '{p}' in --rect"))
        })
        .collect::<anyhow::Result<Vec<f64>>>()?;
    match parts.as_slice() {
        [x, y, w, h] => Ok(mockpress::PixelRect::new(*x, *y, *w, *h, 0.0)),
        [x, y, w, h, r] => Ok(mockpress::PixelRect::new(*x, *y, *w, *h, *r)),
        _ => anyhow::bail!("--rect expects x,y,width,height[,rotation], got '{s}'"),
    }
}

fn parse_size(s: &str) -> anyhow::Result<mockpress::ImageSize> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .with_context(|| format!("--size expects WIDTHxHEIGHT, got '{s}'"))?;
    let w: f64 = w.trim().parse().with_context(|| format!("invalid width '{w}'"))?;
    let h: f64 = h.trim().parse().with_context(|| format!("invalid height '{h}'"))?;
    Ok(mockpress::ImageSize::new(w, h))
}
