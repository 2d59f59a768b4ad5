//! dungen: generate a dungeon layout and print it
//!
//! Logging goes to stderr and is controlled through `RUST_LOG`.

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use strum::IntoEnumIterator;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dg_core::{DungenConfig, DungeonRng, GeneratorKind, Layout, NoProps, TileGrid};

/// Procedural dungeon layout generator
#[derive(Parser, Debug)]
#[command(name = "dungen")]
#[command(author, version, about = "Generate a 2D dungeon layout", long_about = None)]
struct Args {
    /// Generator to run (overrides the config file)
    #[arg(short = 'g', long = "generator", value_parser = parse_generator)]
    generator: Option<GeneratorKind>,

    /// Seed for the random stream; drawn from entropy if omitted
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Grid width in cells
    #[arg(long = "width")]
    width: Option<i32>,

    /// Grid height in cells
    #[arg(long = "height")]
    height: Option<i32>,

    /// JSON configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = Format::Ascii)]
    format: Format,
}

/// Accepts the config file names of the generators, with `-` or `_`
fn parse_generator(name: &str) -> Result<GeneratorKind, String> {
    let wanted = name.replace('-', "_");
    GeneratorKind::iter()
        .find(|kind| kind.to_string() == wanted)
        .ok_or_else(|| {
            let known: Vec<String> = GeneratorKind::iter().map(|kind| kind.to_string()).collect();
            format!("unknown generator `{name}`, expected one of: {}", known.join(", "))
        })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One character per cell, top row first
    Ascii,
    /// Grid rows plus the full layout as JSON
    Json,
}

fn load_config(args: &Args) -> Result<DungenConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => DungenConfig::load_from_file(path)?,
        None => DungenConfig::default(),
    };
    if let Some(generator) = args.generator {
        config.generator = generator;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    config.validate()?;
    Ok(config)
}

fn print_json(grid: &TileGrid, layout: &Layout) -> Result<(), Box<dyn Error>> {
    let output = serde_json::json!({
        "width": grid.width(),
        "height": grid.height(),
        "rows": grid.rows(),
        "layout": layout,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let mut rng = match args.seed {
        Some(seed) => DungeonRng::new(seed),
        None => DungeonRng::from_entropy(),
    };

    let mut grid = TileGrid::new(config.width, config.height);
    let mut generator = config.generator.build(&config);
    info!(
        generator = generator.name(),
        seed = rng.seed(),
        width = config.width,
        height = config.height,
        "generating"
    );
    let layout = generator.generate(&mut grid, &mut rng, &mut NoProps)?;

    match args.format {
        Format::Ascii => print!("{grid}"),
        Format::Json => print_json(&grid, &layout)?,
    }
    Ok(())
}
