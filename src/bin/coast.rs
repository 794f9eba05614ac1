//! Command-line front end for shoreline grid preparation.
//!
//! ```text
//! coast grid --shoreline survey.csv --output out/
//! coast buoy --file 44014h2023.txt --params-out params.json
//! coast params --output params.json
//! coast info --grid out/elevation.asc
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use shoreline_coupler::config::CoastConfig;
use shoreline_coupler::coupling::ShorelineDiagnostics;
use shoreline_coupler::grid::{DeanProfileBuilder, LandMask};
use shoreline_coupler::io::{
    Shoreline, UtmProjection, read_ascii_grid, read_buoy_file, read_shoreline_file,
    read_shoreline_shapefile, write_ascii_grid, write_vtk_grid,
};
use shoreline_coupler::types::Depth;

/// Beach-profile grids and model inputs for shoreline/wave coupling
#[derive(Parser)]
#[command(name = "coast")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Shoreline grid generation and coupling inputs", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a Dean-profile grid from a shoreline survey
    Grid(GridArgs),
    /// Summarize NDBC buoy data and derive wave forcing
    Buoy(BuoyArgs),
    /// Write the default configuration file
    Params(ParamsArgs),
    /// Print statistics of an ASCII grid
    Info(InfoArgs),
}

#[derive(Args)]
struct GridArgs {
    /// Shoreline vertices (.csv/.txt table or .shp shapefile)
    #[arg(short, long)]
    shoreline: PathBuf,

    /// Alongshore cell size (m)
    #[arg(long, default_value_t = 100.0)]
    dx: f64,

    /// Cross-shore cell size (m)
    #[arg(long, default_value_t = 100.0)]
    dy: f64,

    /// Project longitude/latitude input with this UTM zone
    #[arg(long)]
    utm_zone: Option<u8>,

    /// UTM zone is in the southern hemisphere
    #[arg(long, requires = "utm_zone")]
    south: bool,

    /// Dean shape parameter A
    #[arg(long, default_value_t = 0.1)]
    shape_parameter: f64,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    output: PathBuf,
}

#[derive(Args)]
struct BuoyArgs {
    /// NDBC standard meteorological file
    #[arg(short, long)]
    file: PathBuf,

    /// Base configuration to update (defaults otherwise)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the configuration with buoy-derived wave forcing here
    #[arg(long)]
    params_out: Option<PathBuf>,
}

#[derive(Args)]
struct ParamsArgs {
    /// Destination JSON file
    #[arg(short, long, default_value = "coast.json")]
    output: PathBuf,
}

#[derive(Args)]
struct InfoArgs {
    /// ESRI ASCII grid
    #[arg(short, long)]
    grid: PathBuf,

    /// Elevation at or above which a cell is land
    #[arg(short, long, default_value_t = 1.0)]
    threshold: f64,

    /// The grid holds water depth instead of elevation
    #[arg(long)]
    depth: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Grid(args) => grid(args),
        Commands::Buoy(args) => buoy(args),
        Commands::Params(args) => params(args),
        Commands::Info(args) => grid_info(args),
    }
}

fn load_shoreline(path: &Path) -> Result<Shoreline> {
    let is_shapefile = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("shp"));

    let shoreline = if is_shapefile {
        read_shoreline_shapefile(path)
    } else {
        read_shoreline_file(path)
    };
    shoreline.with_context(|| format!("reading shoreline {}", path.display()))
}

fn grid(args: GridArgs) -> Result<()> {
    let mut shoreline = load_shoreline(&args.shoreline)?;
    info!(
        "Loaded {} shoreline vertices ({:.1} km)",
        shoreline.len(),
        shoreline.length() / 1000.0
    );

    match args.utm_zone {
        Some(zone) => {
            if !(1..=60).contains(&zone) {
                bail!("UTM zone must be 1-60, got {}", zone);
            }
            let proj = UtmProjection::new(zone, !args.south);
            info!("Projecting to {}", proj);
            shoreline = shoreline.project(&proj);
        }
        None if shoreline.looks_geographic() => {
            let proj = UtmProjection::for_lon_lat(shoreline.x[0], shoreline.y[0]);
            warn!("Shoreline looks like longitude/latitude; projecting to {}", proj);
            shoreline = shoreline.project(&proj);
        }
        None => {}
    }

    let profile = DeanProfileBuilder::new(args.dx, args.dy)
        .with_shape_parameter(args.shape_parameter)
        .build(&shoreline.x, &shoreline.y)
        .context("building beach profile grid")?;

    fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    let elevation = profile.to_elevation();
    let land: Vec<f64> = profile
        .land
        .as_slice()
        .iter()
        .map(|&l| if l { 1.0 } else { 0.0 })
        .collect();

    let vti = args.output.join("grid.vti");
    write_vtk_grid(
        &vti,
        &profile.depth,
        &[
            ("depth", profile.depth.as_slice()),
            ("elevation", elevation.as_slice()),
            ("distance", profile.distance.as_slice()),
            ("land", land.as_slice()),
        ],
        0.0,
    )
    .with_context(|| format!("writing {}", vti.display()))?;

    if args.dx == args.dy {
        let depth_path = args.output.join("depth.asc");
        write_ascii_grid(&depth_path, &profile.depth)
            .with_context(|| format!("writing {}", depth_path.display()))?;
        let elevation_path = args.output.join("elevation.asc");
        write_ascii_grid(&elevation_path, &elevation)
            .with_context(|| format!("writing {}", elevation_path.display()))?;
    } else {
        warn!("dx != dy: skipping ESRI ASCII output");
    }

    info!(
        "Grid {} at {} written to {}",
        profile.shape(),
        profile.depth.bounds(),
        args.output.display()
    );
    info!("Maximum depth: {}", profile.max_depth().unwrap_or(Depth::ZERO));
    println!("{}", profile.land.statistics());
    Ok(())
}

fn buoy(args: BuoyArgs) -> Result<()> {
    let series = read_buoy_file(&args.file)
        .with_context(|| format!("reading buoy file {}", args.file.display()))?;

    let mut config = match &args.config {
        Some(path) => CoastConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => CoastConfig::default(),
    };

    let stats = series.apply_to(&mut config.parameters);
    if let Some(station) = &series.station {
        info!("Station {}", station);
    }
    println!("{}", stats);

    if stats.mean_wave_height.is_none() {
        warn!("No valid wave heights; wave forcing left unchanged");
    }

    if let Some(out) = &args.params_out {
        config.validate().context("derived parameters are invalid")?;
        config
            .to_json_file(out)
            .with_context(|| format!("writing {}", out.display()))?;
        info!(
            "Wrote {} (H = {:.2} m, T = {:.2} s)",
            out.display(),
            config.parameters.wave_height,
            config.parameters.wave_period
        );
    }
    Ok(())
}

fn params(args: ParamsArgs) -> Result<()> {
    let config = CoastConfig::default();
    config
        .to_json_file(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!("Wrote default configuration to {}", args.output.display());
    Ok(())
}

fn grid_info(args: InfoArgs) -> Result<()> {
    let grid = read_ascii_grid(&args.grid)
        .with_context(|| format!("reading {}", args.grid.display()))?;
    let elevation = if args.depth { grid.negated() } else { grid };

    println!("Grid: {} cells, {}", elevation.shape(), elevation.bounds());
    println!(
        "Spacing: {} × {} m",
        elevation.spacing().0,
        elevation.spacing().1
    );
    println!(
        "Elevation: min {:.2}, max {:.2}, mean {:.2}",
        elevation.min().unwrap_or(f64::NAN),
        elevation.max().unwrap_or(f64::NAN),
        elevation.mean().unwrap_or(f64::NAN)
    );
    println!("{}", LandMask::from_grid(&elevation, args.threshold).statistics());
    println!(
        "Summary: {}",
        ShorelineDiagnostics::compute(&elevation, args.threshold)
    );
    Ok(())
}
