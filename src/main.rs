//! # Voxroute Main Entry Point
//!
//! Generates a city, runs the route search and prints the outcome to the terminal.

use clap::Parser;
use log::{info, warn};
use voxroute::{
    generation::utils, legend, render_all_levels, render_metrics_table, render_result_summary,
    Algorithm, BuildingStrategy, CityGenerator, Comparison, Coordinate, GenerationConfig,
    Generator, Heuristic, SearchConfig, SearchEngine, SearchReplay, SearchResult, Vehicle, VoxResult,
    VoxelGrid,
};

/// Command line arguments for voxroute.
#[derive(Parser, Debug)]
#[command(name = "voxroute")]
#[command(about = "Dijkstra and A* route search over a layered 3D voxel city")]
#[command(version)]
struct Args {
    /// Random seed for city generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Rows per level
    #[arg(long, default_value_t = voxroute::config::DEFAULT_ROWS)]
    rows: u32,

    /// Columns per level
    #[arg(long, default_value_t = voxroute::config::DEFAULT_COLS)]
    cols: u32,

    /// Number of vertical levels
    #[arg(long, default_value_t = voxroute::config::DEFAULT_LEVELS)]
    levels: u32,

    /// Run a single algorithm (dijkstra or a_star) instead of comparing both
    #[arg(short, long)]
    algorithm: Option<Algorithm>,

    /// A* heuristic (manhattan or level_chebyshev)
    #[arg(long, default_value = "manhattan")]
    heuristic: Heuristic,

    /// Use the perimeter-and-quadrant building layout
    #[arg(long)]
    recursive: bool,

    /// Lay a street grid on the ground level
    #[arg(long)]
    streets: bool,

    /// Number of parked cars on the ground level
    #[arg(long, default_value_t = 0)]
    cars: u32,

    /// Fraction of cells filled with random obstacles
    #[arg(long, default_value_t = 0.0)]
    density: f64,

    /// Highest ground elevation (0 keeps the terrain flat)
    #[arg(long, default_value_t = 0.0)]
    elevation: f64,

    /// Abort a search after this many finalized nodes
    #[arg(long)]
    max_expansions: Option<usize>,

    /// Print every level of the city with the search replayed onto it
    #[arg(long)]
    render: bool,

    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> VoxResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);
    info!("Starting voxroute v{}", voxroute::VERSION);

    let config = generation_config(&args);
    let mut rng = utils::create_rng(&config);
    let generator = CityGenerator::new();
    info!(
        "Generating {}x{}x{} city with {} (seed {})",
        config.levels,
        config.rows,
        config.cols,
        generator.generator_type(),
        config.seed
    );
    let mut grid = generator.generate(&config, &mut rng)?;

    let search_config = SearchConfig {
        heuristic: args.heuristic,
        max_expansions: args.max_expansions,
    };
    let engine = SearchEngine::with_config(&grid, search_config);

    let shown = match args.algorithm {
        Some(algorithm) => {
            let result = engine.run_endpoints(algorithm)?;
            print_single(&result, args.json)?;
            result
        }
        None => {
            let comparison = engine.compare_endpoints()?;
            print_comparison(&comparison, args.json)?;
            comparison.a_star
        }
    };

    if !shown.is_found() {
        warn!("No route from start to goal");
    }

    if args.render {
        render_replay(&mut grid, &shown)?;
    }

    Ok(())
}

/// Initializes env_logger with the given default filter.
fn initialize_logging(log_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();
}

fn generation_config(args: &Args) -> GenerationConfig {
    GenerationConfig {
        levels: args.levels,
        rows: args.rows,
        cols: args.cols,
        buildings: if args.recursive {
            BuildingStrategy::Recursive
        } else {
            BuildingStrategy::Scattered
        },
        obstacle_density: args.density,
        street_grid: args.streets,
        car_count: args.cars,
        elevation_amplitude: args.elevation,
        ..GenerationConfig::new(args.seed.unwrap_or(voxroute::config::DEFAULT_SEED))
    }
}

fn print_single(result: &SearchResult, json: bool) -> VoxResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&result.metrics)?);
    } else {
        print!("{}", render_result_summary(result));
    }
    Ok(())
}

fn print_comparison(comparison: &Comparison, json: bool) -> VoxResult<()> {
    if json {
        let metrics = serde_json::json!({
            "dijkstra": comparison.dijkstra.metrics,
            "a_star": comparison.a_star.metrics,
        });
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        print!("{}", render_metrics_table(comparison));
    }
    Ok(())
}

/// Replays the search onto the grid, drives the vehicle to the end of the
/// path and prints every level.
fn render_replay(grid: &mut VoxelGrid, result: &SearchResult) -> VoxResult<()> {
    grid.clear_search_marks();
    let steps = SearchReplay::new(result).run_to_end(grid);
    info!("Replayed {} steps of {}", steps, result.algorithm.label());

    let origin = result
        .path
        .first()
        .copied()
        .or(grid.start())
        .unwrap_or_else(Coordinate::origin);
    let mut vehicle = Vehicle::new(origin);
    vehicle.set_path(result.path.clone());
    while vehicle.is_moving() {
        vehicle.update();
    }

    println!();
    println!("{}", legend());
    println!();
    print!("{}", render_all_levels(grid, Some(&vehicle))?);
    Ok(())
}
