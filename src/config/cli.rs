use crate::adapters::export::ExportFormat;
use crate::app::{parse_coordinate, LocationMode};
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "host-search")]
#[command(about = "Find and rank service providers by distance")]
pub struct Cli {
    /// Path to a TOML configuration file (defaults to ./host-search.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List companies matching a search text, nearest first
    Search(SearchArgs),
    /// Show one company and its services
    Show(ShowArgs),
    /// Print the great-circle distance between two coordinates
    Distance(DistanceArgs),
}

#[derive(Debug, Args)]
#[command(allow_negative_numbers = true)]
pub struct SearchArgs {
    /// Search text matched against name, category and description
    pub query: Vec<String>,

    #[command(flatten)]
    pub location: LocationArgs,

    /// Output format (overrides [output] format)
    #[arg(long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Write results to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl SearchArgs {
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }
}

#[derive(Debug, Args)]
#[command(allow_negative_numbers = true)]
pub struct ShowArgs {
    pub slug: String,

    #[command(flatten)]
    pub location: LocationArgs,
}

#[derive(Debug, Args)]
pub struct LocationArgs {
    /// Latitude of the current position
    #[arg(long, requires = "lon")]
    pub lat: Option<f64>,

    /// Longitude of the current position
    #[arg(long, requires = "lat")]
    pub lon: Option<f64>,

    /// Do not rank by distance
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub no_location: bool,
}

impl LocationArgs {
    pub fn mode(&self) -> Result<LocationMode> {
        if self.no_location {
            return Ok(LocationMode::Disabled);
        }
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok(LocationMode::Fixed(parse_coordinate(lat, lon)?)),
            _ => Ok(LocationMode::Configured),
        }
    }
}

#[derive(Debug, Args)]
#[command(allow_negative_numbers = true)]
pub struct DistanceArgs {
    pub lat1: f64,
    pub lon1: f64,
    pub lat2: f64,
    pub lon2: f64,
}
