use std::io::{ self, BufWriter, Write };
use std::path::{ Path, PathBuf };

use anyhow::{ bail, Context };
use clap::Parser;
use log::LevelFilter;
use rand::SeedableRng;
use rand_pcg::Pcg64;

use phong_tracer::consts::{ DEFAULT_WIDTH, DEFAULT_HEIGHT, MAX_BOUNCES };
use phong_tracer::render::{ Renderer, Sampling };
use phong_tracer::scene::Scene;

/// Renders a JSON scene description to a PPM image.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Scene description; read from stdin if absent
    scene: Option<PathBuf>,

    /// Image size in pixels
    #[clap(short, long, number_of_values = 2, value_names = &["WIDTH", "HEIGHT"])]
    size: Option<Vec<usize>>,

    /// Output PPM file; written to stdout if absent
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Average GRID x GRID rays per pixel
    #[clap(short, long)]
    grid: Option<usize>,

    /// Randomize supersampling rays within their grid cells
    #[clap(long)]
    jitter: bool,

    /// Seed for jitter; random if absent
    #[clap(long)]
    seed: Option<u64>,

    /// Reflection bounces per primary ray
    #[clap(long, default_value_t = MAX_BOUNCES)]
    bounces: usize,

    /// Logging level, overridden by RUST_LOG
    #[clap(long, default_value = "warn")]
    log_level: LevelFilter,
}

fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_scene(path: Option<&Path>) -> anyhow::Result<Scene> {
    match path {
        Some(path) => Scene::load(path)
            .with_context(|| format!("failed to load scene {:?}", path)),
        None => {
            let stdin = io::stdin();
            Scene::from_reader(stdin.lock(), Path::new("."))
                .context("failed to read scene from stdin")
        },
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.log_level);

    let (width, height) = match args.size.as_deref() {
        Some(&[w, h]) => (w, h),
        Some(_) => bail!("--size takes a width and a height"),
        None => (DEFAULT_WIDTH, DEFAULT_HEIGHT),
    };

    if width == 0 || height == 0 {
        bail!("image size must be nonzero, got {}x{}", width, height);
    }

    if args.jitter && args.grid.is_none() {
        log::warn!("--jitter has no effect without --grid");
    }

    let scene = load_scene(args.scene.as_deref())?;

    let renderer = Renderer::new(width, height)
        .with_sampling(Sampling::from_grid(args.grid, args.jitter))
        .with_bounces(args.bounces);

    let mut rng = match args.seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_entropy(),
    };

    let canvas = renderer.render_with(&scene, &mut rng);

    match args.output {
        Some(path) => canvas.save(&path)
            .with_context(|| format!("failed to write {:?}", path))?,
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            canvas.write_ppm(&mut out)
                .and_then(|_| out.flush())
                .context("failed to write image to stdout")?;
        },
    }

    Ok(())
}
