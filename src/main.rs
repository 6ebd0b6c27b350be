use clap::Parser;
use host_search::app::{self, SearchRequest};
use host_search::config::cli::{Command, DistanceArgs};
use host_search::core::distance::{format_km, haversine_km};
use host_search::utils::{logger, validation::Validate};
use host_search::{Cli, SearchError, TomlConfig};
use std::path::Path;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI arguments: {:?}", cli);

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), SearchError> {
    let Cli { config, command, .. } = cli;

    match command {
        Command::Distance(args) => print_distance(&args),
        Command::Search(args) => {
            let config = load_config(config.as_deref())?;
            let request = SearchRequest {
                query: args.query_text(),
                mode: args.location.mode()?,
                format: args.format,
                output: args.output,
            };
            app::run_search(&config, &request).await?;
            Ok(())
        }
        Command::Show(args) => {
            let config = load_config(config.as_deref())?;
            app::run_show(&config, &args.slug, args.location.mode()?).await?;
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<TomlConfig, SearchError> {
    let config = TomlConfig::load(path)?;
    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");
    Ok(config)
}

fn print_distance(args: &DistanceArgs) -> Result<(), SearchError> {
    let from = app::parse_coordinate(args.lat1, args.lon1)?;
    let to = app::parse_coordinate(args.lat2, args.lon2)?;
    println!("{} km", format_km(haversine_km(from, to)));
    Ok(())
}
