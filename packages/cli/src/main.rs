#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the Wanbei event map.
//!
//! ```text
//! wanbei_map summary
//! wanbei_map overview
//! wanbei_map detail 阜阳 [--category 水灾]
//! wanbei_map locate 115.8 32.9
//! wanbei_map scene [--city 阜阳] [--width 800] [--height 600]
//! ```
//!
//! Fixtures (`data.json`, the combined boundary file and
//! `boundaries/<city>.json`) are read from `--data`, which may be a
//! directory or an `http(s)://` base URL.

mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use wanbei_map_dataset::COMBINED_DATASET;
use wanbei_map_geometry::RingMode;
use wanbei_map_region::boundary::RegionBoundary;
use wanbei_map_region::registry::{default_registry, load_registry};
use wanbei_map_view::controller::MapController;
use wanbei_map_view::source::{DATA_FILE, DatasetSource, FixtureSource};
use wanbei_map_viewport::Surface;

#[derive(Parser)]
#[command(name = "wanbei_map", about = "Event density across the Wanbei cities")]
struct Cli {
    /// Fixture directory or base URL
    #[arg(long, env = "WANBEI_MAP_DATA", default_value = ".", global = true)]
    data: String,

    /// Region registry TOML replacing the built-in six cities
    #[arg(long, env = "WANBEI_MAP_REGIONS", global = true)]
    regions: Option<PathBuf>,

    /// Dataset section to use
    #[arg(long, default_value = COMBINED_DATASET, global = true)]
    dataset: String,

    /// Point-in-polygon rule (`outer_only` or `even_odd`)
    #[arg(long, default_value = "outer_only", global = true, value_parser = parse_ring_mode)]
    ring_mode: RingMode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show dataset summary counts
    Summary,
    /// Show per-city event counts
    Overview,
    /// Show per-district/county event counts for one city
    Detail {
        /// City key or name (e.g. 阜阳)
        city: String,
        /// Only count events whose type contains this text
        #[arg(long)]
        category: Option<String>,
    },
    /// Find the city and sub-region containing a point
    Locate {
        /// Longitude
        lng: f64,
        /// Latitude
        lat: f64,
    },
    /// Print the scene description as JSON
    Scene {
        /// Show this city's detail map instead of the overview
        #[arg(long)]
        city: Option<String>,
        /// Surface width in pixels
        #[arg(long, default_value_t = 800.0)]
        width: f64,
        /// Surface height in pixels
        #[arg(long, default_value_t = 600.0)]
        height: f64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let source = FixtureSource::new(&cli.data);
    let registry = match &cli.regions {
        Some(path) => load_registry(path)?,
        None => default_registry(),
    };
    log::debug!(
        "Using registry {} with {} regions, fixtures at {}",
        registry.name,
        registry.regions.len(),
        source.describe("")
    );

    match cli.command {
        Commands::Summary => {
            let data = source.load_data().await?;
            let names = data.dataset_names();
            if !names.is_empty() {
                println!("Available datasets: {}\n", names.join(", "));
            }
            print!("{}", report::summary(&data.select(&cli.dataset)));
        }
        Commands::Overview => {
            let mut map =
                MapController::new(registry, Surface::default()).with_ring_mode(cli.ring_mode);
            load(&mut map, &source, &cli.dataset, None).await?;
            print!("{}", report::stats_table(map.stats()));
        }
        Commands::Detail { city, category } => {
            let mut map =
                MapController::new(registry, Surface::default()).with_ring_mode(cli.ring_mode);
            if let Some(category) = &category {
                map.set_category(category);
            }
            load(&mut map, &source, &cli.dataset, Some(&city)).await?;
            println!("{} ({} events)\n", city, map.filtered_events().len());
            print!("{}", report::stats_table(map.stats()));
        }
        Commands::Locate { lng, lat } => {
            let mut map =
                MapController::new(registry, Surface::default()).with_ring_mode(cli.ring_mode);
            load(&mut map, &source, &cli.dataset, None).await?;

            let Some(city) = region_under(&map, lng, lat) else {
                println!("({lng}, {lat}) is outside every city");
                return Ok(());
            };
            println!("City: {}", city.name);

            if !map.show_region_detail(&source, &city.key).await {
                return Err(format!("Failed to load detail boundaries for {}", city.name).into());
            }
            match region_under(&map, lng, lat) {
                Some(sub_region) if !sub_region.level.is_top_level() => {
                    println!("Sub-region: {} ({})", sub_region.name, sub_region.level);
                }
                _ => println!("Sub-region: (none)"),
            }
        }
        Commands::Scene {
            city,
            width,
            height,
        } => {
            let mut map = MapController::new(registry, Surface::new(width, height))
                .with_ring_mode(cli.ring_mode);
            load(&mut map, &source, &cli.dataset, city.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&map.scene())?);
        }
    }

    Ok(())
}

/// Loads events and shows the overview, or `city`'s detail map.
async fn load(
    map: &mut MapController,
    source: &FixtureSource,
    dataset: &str,
    city: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !map.load_dataset(source, dataset).await {
        return Err(format!("Failed to load {}", source.describe(DATA_FILE)).into());
    }
    let shown = match city {
        Some(city) => map.show_region_detail(source, city).await,
        None => map.show_overview(source).await,
    };
    if !shown {
        return Err(format!("Failed to load boundaries from {}", source.describe("")).into());
    }
    Ok(())
}

fn parse_ring_mode(value: &str) -> Result<RingMode, String> {
    value
        .parse()
        .map_err(|_| format!("unknown ring mode '{value}', expected outer_only or even_odd"))
}

/// The on-screen region containing a geographic point.
fn region_under(map: &MapController, lng: f64, lat: f64) -> Option<RegionBoundary> {
    let (x, y) = map.view().project(map.surface(), lng, lat);
    map.region_at(x, y).cloned()
}
