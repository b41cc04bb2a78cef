// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::time::Instant;

use mapgen::config::DEFAULT_OUTPUT;
use mapgen::data::features::DeclaredBounds;
use mapgen::GenerateOptions;

#[derive(Parser, Debug, Clone)]
#[command(name = "mapgen", version, about)]
struct Args {
    /// Heightmap file (min_x, min_y, size, zlib heights).
    #[arg(long)]
    heightmap: Option<PathBuf>,

    /// Features JSON; repeat to layer several files, later ones win.
    #[arg(long)]
    features: Vec<PathBuf>,

    /// Binary building columns. Buildings from --features are ignored when set.
    #[arg(long)]
    buildings: Option<PathBuf>,

    /// Subtracted from the height of every building column.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    buildings_base_height: i32,

    /// Record the blocks that changed against the existing output file.
    #[arg(long, default_value_t = false)]
    incr: bool,

    /// Spawn x in world coordinates; defaults to the map's min x.
    #[arg(long, allow_hyphen_values = true)]
    offsetx: Option<i32>,

    /// Spawn z in world coordinates; defaults to the map's min y.
    #[arg(long, allow_hyphen_values = true)]
    offsetz: Option<i32>,

    #[arg(long, allow_hyphen_values = true)]
    minx: Option<i32>,

    #[arg(long, allow_hyphen_values = true)]
    maxx: Option<i32>,

    #[arg(long, allow_hyphen_values = true)]
    miny: Option<i32>,

    #[arg(long, allow_hyphen_values = true)]
    maxy: Option<i32>,

    /// Keep absolute heights instead of lowering the terrain to its minimum.
    #[arg(long, default_value_t = false)]
    noheightreduction: bool,

    /// Flat terrain; a given heightmap only levels the building columns.
    #[arg(long, default_value_t = false)]
    flat: bool,

    /// Write grayscale PNGs of the height, surface and decoration layers.
    #[arg(long, default_value_t = false)]
    createimg: bool,

    /// Log skipped features.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

impl From<Args> for GenerateOptions {
    fn from(args: Args) -> Self {
        GenerateOptions {
            heightmap: args.heightmap,
            features: args.features,
            buildings: args.buildings,
            buildings_base_height: args.buildings_base_height,
            incremental: args.incr,
            spawn_x: args.offsetx,
            spawn_z: args.offsetz,
            bounds: DeclaredBounds {
                min_x: args.minx,
                max_x: args.maxx,
                min_y: args.miny,
                max_y: args.maxy,
            },
            reduce_height: !args.noheightreduction,
            flat: args.flat,
            create_images: args.createimg,
            output: args.output,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let t0 = Instant::now();
    let opts = GenerateOptions::from(args);
    let summary = mapgen::generate(&opts)
        .with_context(|| format!("generating {}", opts.output.display()))?;

    match summary.changed_blocks {
        Some(n) => info!("done in {:.2?}, {n} changed blocks", t0.elapsed()),
        None => info!("done in {:.2?}", t0.elapsed()),
    }
    Ok(())
}
