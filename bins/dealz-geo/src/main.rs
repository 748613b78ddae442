//! dealz-geo: distance, geocoding and post enrichment from the command line.

use anyhow::Context;
use clap::{Parser, Subcommand};
use dealzsta_geo::{
    approximate_distance, calculate_distances_sorted, calculate_distances_within_radius,
    format_distance, haversine_distance, haversine_distance_meters, Coordinate, LocatedItem,
};
use dealzsta_location::config::{Config, ConfigSchema};
use dealzsta_location::providers::{build_geocoder, FixedPositioning, TableGeocoder};
use dealzsta_location::{rank_by_distance, within_radius, Geocoder, LocationService, NearbyPosts, Post};
use dealzsta_telemetry::TelemetryConfig;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "dealz-geo")]
#[command(about = "Distance, geocoding and post enrichment for Dealzsta")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to .dealzsta.toml and friends)
    #[arg(long, global = true, env = "DEALZSTA_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Great-circle distance between two `lat,lng` points
    Distance {
        #[arg(allow_hyphen_values = true)]
        from: Coordinate,
        #[arg(allow_hyphen_values = true)]
        to: Coordinate,
        /// Use the equirectangular approximation instead of Haversine
        #[arg(long)]
        approximate: bool,
    },
    /// Format a distance in kilometers for display
    Format {
        #[arg(allow_negative_numbers = true)]
        km: f64,
    },
    /// Resolve an address to coordinates (first result)
    Geocode {
        address: String,
        /// Address table JSON instead of the configured geocoder
        #[arg(long)]
        geocoder_table: Option<PathBuf>,
    },
    /// Annotate a JSON array of posts with distances
    Enrich {
        /// JSON file with `[{"id": .., "location": ..}, ..]`
        #[arg(long)]
        posts: PathBuf,
        /// User position as `lat,lng` (falls back to [position] in config)
        #[arg(long, allow_hyphen_values = true)]
        at: Option<Coordinate>,
        /// Sort nearest first
        #[arg(long)]
        sort: bool,
        /// Only keep posts within this many kilometers
        #[arg(long)]
        radius: Option<f64>,
        /// Address table JSON instead of the configured geocoder
        #[arg(long)]
        geocoder_table: Option<PathBuf>,
    },
    /// Rank already-resolved points by distance
    Nearest {
        /// Origin as `lat,lng`
        #[arg(long, allow_hyphen_values = true)]
        from: Coordinate,
        /// JSON file with `[{"id": .., "coordinate": {"latitude": .., "longitude": ..}}, ..]`
        #[arg(long)]
        points: PathBuf,
        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,
        /// Only keep points within this many kilometers
        #[arg(long)]
        radius: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let schema = config.schema;

    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        schema.telemetry.log_level.clone()
    };
    dealzsta_telemetry::init_with_config(
        TelemetryConfig::default()
            .with_log_level(log_level)
            .with_json(schema.telemetry.json),
    )?;

    if let Some(path) = &config.path {
        tracing::debug!(path = %path.display(), "Loaded configuration");
    }

    match cli.command {
        Commands::Distance {
            from,
            to,
            approximate,
        } => {
            let (km, meters) = if approximate {
                let km = approximate_distance(&from, &to);
                (km, km * 1000.0)
            } else {
                (
                    haversine_distance(&from, &to),
                    haversine_distance_meters(&from, &to),
                )
            };
            println!("{km:.3} km, {meters:.0} m ({})", format_distance(Some(km)));
        }

        Commands::Format { km } => {
            println!("{}", format_distance(Some(km)));
        }

        Commands::Geocode {
            address,
            geocoder_table,
        } => {
            let service = LocationService::new(
                Arc::new(FixedPositioning::without_fix()),
                geocoder(&schema, geocoder_table.as_deref())?,
            );

            match service.geocode_address(&address).await {
                Ok(coord) => println!("{coord}"),
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }

        Commands::Enrich {
            posts,
            at,
            sort,
            radius,
            geocoder_table,
        } => {
            let content = std::fs::read_to_string(&posts)
                .with_context(|| format!("Failed to read {}", posts.display()))?;
            let input: Vec<Post> = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse posts in {}", posts.display()))?;

            let position = match at {
                Some(coord) => Some(coord),
                None => schema.position.coordinate()?,
            };
            let positioning = match position {
                Some(coord) => FixedPositioning::granted(coord),
                None => FixedPositioning::without_fix(),
            };

            let service = Arc::new(LocationService::new(
                Arc::new(positioning),
                geocoder(&schema, geocoder_table.as_deref())?,
            ));
            let hook = NearbyPosts::new(service);
            hook.load(input, false).await;

            if let Some(error) = hook.error() {
                eprintln!("Warning: {} (distances shown as N/A)", error.message);
                if error.recoverable {
                    eprintln!("Pass --at lat,lng or set [position] in the config to retry with a location");
                }
            }

            let mut output = hook.posts();
            if let Some(radius_km) = radius {
                output = within_radius(output, radius_km);
            }
            if sort {
                output = rank_by_distance(output);
            }

            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Commands::Nearest {
            from,
            points,
            limit,
            radius,
        } => {
            let content = std::fs::read_to_string(&points)
                .with_context(|| format!("Failed to read {}", points.display()))?;
            let items: Vec<LocatedItem> = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse points in {}", points.display()))?;

            let mut results = match radius {
                Some(radius_km) => calculate_distances_within_radius(&from, &items, radius_km),
                None => calculate_distances_sorted(&from, &items, None),
            };
            if let Some(max) = limit {
                results.truncate(max);
            }

            for result in results {
                println!("{:<24} {}", result.id, format_distance(result.distance_km));
            }
        }
    }

    Ok(())
}

fn geocoder(schema: &ConfigSchema, table: Option<&Path>) -> anyhow::Result<Arc<dyn Geocoder>> {
    match table {
        Some(path) => {
            let table = TableGeocoder::from_json_file(path)
                .with_context(|| format!("Failed to load address table {}", path.display()))?;
            Ok(Arc::new(table))
        }
        None => Ok(build_geocoder(&schema.geocoder)?),
    }
}
