use std::path::PathBuf;
use std::process::exit;

use clap::Parser;

use biome_atlas::biomes::NoiseBiomeProvider;
use biome_atlas::config::MapConfig;
use biome_atlas::coords::MAX_LOD;
use biome_atlas::export::export_region;
use biome_atlas::viewer::run_viewer;

#[derive(Parser, Debug)]
#[command(name = "biome_atlas")]
#[command(about = "Explore an infinite procedurally generated biome map")]
struct Args {
    /// Random seed (uses a random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Tile edge length in world units
    #[arg(short = 't', long)]
    tile_size: Option<u32>,

    /// Viewer window width in pixels
    #[arg(long)]
    width: Option<usize>,

    /// Viewer window height in pixels
    #[arg(long)]
    height: Option<usize>,

    /// JSON config file; command-line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Export a PNG of a world region instead of opening the viewer
    #[arg(long)]
    export: Option<PathBuf>,

    /// World X of the export region's top-left corner
    #[arg(long, default_value = "-512")]
    export_x: i64,

    /// World Y of the export region's top-left corner
    #[arg(long, default_value = "-512")]
    export_y: i64,

    /// Export region width in world units
    #[arg(long, default_value = "1024")]
    export_width: u32,

    /// Export region height in world units
    #[arg(long, default_value = "1024")]
    export_height: u32,

    /// Level of detail for the export (0 = finest)
    #[arg(long, default_value = "0")]
    lod: u8,
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match MapConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Failed to load config {}: {}", path.display(), err);
                exit(1);
            }
        },
        None => MapConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(tile_size) = args.tile_size {
        config.tile_size = tile_size;
    }
    if let Some(width) = args.width {
        config.window_width = width;
    }
    if let Some(height) = args.height {
        config.window_height = height;
    }

    if args.lod > MAX_LOD {
        eprintln!("Lod {} is out of range (max {})", args.lod, MAX_LOD);
        exit(1);
    }

    let seed = config.seed.unwrap_or_else(rand::random);

    match args.export {
        Some(path) => {
            println!("Exporting region with seed: {}", seed);
            let provider = NoiseBiomeProvider::new(seed);
            match export_region(
                &provider,
                args.export_x,
                args.export_y,
                args.export_width,
                args.export_height,
                args.lod,
                &path,
            ) {
                Ok((w, h)) => println!("Wrote {}x{} image to {}", w, h, path.display()),
                Err(err) => {
                    eprintln!("Export failed: {}", err);
                    exit(1);
                }
            }
        }
        None => run_viewer(&config, seed),
    }
}
