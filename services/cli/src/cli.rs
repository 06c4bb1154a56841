use crate::demo::{run_demo, DemoArgs};
use clap::{Args, Parser, Subcommand};
use notfellchen::config::AppConfig;
use notfellchen::error::AppError;
use notfellchen::geo::{distance_km, geocoder_from_config, Coordinates};
use notfellchen::telemetry;
use serde_json::json;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "notfellchen",
    about = "Look up places and walk through the adoption notice workflows",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a free-text place through the configured geocoder
    Geocode(GeocodeArgs),
    /// Great-circle distance in kilometers between two points
    Distance(DistanceArgs),
    /// Run an in-memory walk-through of notices, search and moderation
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
struct GeocodeArgs {
    /// Place text, e.g. a postcode or city name
    place: String,
}

#[derive(Args, Debug)]
struct DistanceArgs {
    /// Start point as "lat,lon"
    #[arg(long, value_parser = parse_coordinates)]
    from: Coordinates,
    /// End point as "lat,lon"
    #[arg(long, value_parser = parse_coordinates)]
    to: Coordinates,
}

pub(crate) fn parse_coordinates(raw: &str) -> Result<Coordinates, String> {
    let (latitude, longitude) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected 'lat,lon', got '{raw}'"))?;
    let latitude: f64 = latitude
        .trim()
        .parse()
        .map_err(|err| format!("invalid latitude in '{raw}' ({err})"))?;
    let longitude: f64 = longitude
        .trim()
        .parse()
        .map_err(|err| format!("invalid longitude in '{raw}' ({err})"))?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(format!("coordinates out of range: '{raw}'"));
    }
    Ok(Coordinates::new(latitude, longitude))
}

fn print_json(value: &serde_json::Value) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, config.environment)?;

    match cli.command {
        Command::Geocode(args) => {
            let geocoder = geocoder_from_config(&config.geocoding)?;
            info!(
                offline = config.geocoding.offline,
                endpoint = %config.geocoding.endpoint,
                "resolving place"
            );
            let place = geocoder.resolve(&args.place)?;
            print_json(&json!(place))
        }
        Command::Distance(args) => print_json(&json!({
            "from": args.from,
            "to": args.to,
            "distance_km": distance_km(args.from, args.to),
        })),
        Command::Demo(args) => run_demo(args),
    }
}
