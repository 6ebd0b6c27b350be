//! Wiring between configuration, adapters and the search core.

use crate::adapters::export::{open_sink, ExportFormat};
use crate::adapters::geolocation::{FixedPosition, HttpGeolocation, Unsupported};
use crate::adapters::supabase::SupabaseClient;
use crate::config::toml_config::{LocationConfig, LocationProvider, TomlConfig};
use crate::core::distance::format_km;
use crate::core::location::LocationResolver;
use crate::core::search::{CompanyDetails, DynResolver, SearchEngine, SearchOutcome};
use crate::domain::model::{Coordinate, LocationSource};
use crate::domain::ports::{GeolocationCapability, ResultSink};
use crate::utils::error::{Result, SearchError};
use std::io::Write;
use std::path::PathBuf;

/// How the ranking origin is chosen for one command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationMode {
    /// Use the provider from the `[location]` section.
    Configured,
    /// Use this coordinate as the device position.
    Fixed(Coordinate),
    /// Rank without an origin; fetch order is kept.
    Disabled,
}

pub fn build_resolver(config: &LocationConfig, mode: LocationMode) -> Option<DynResolver> {
    let capability: Box<dyn GeolocationCapability> = match mode {
        LocationMode::Disabled => return None,
        LocationMode::Fixed(coordinate) => Box::new(FixedPosition::new(coordinate)),
        LocationMode::Configured => match (config.provider, config.endpoint.as_deref()) {
            (LocationProvider::Http, Some(endpoint)) => Box::new(HttpGeolocation::new(endpoint)),
            _ => Box::new(Unsupported),
        },
    };

    Some(LocationResolver::with_options(
        capability,
        config.position_options(),
        config.fallback(),
    ))
}

pub fn build_engine(
    config: &TomlConfig,
    mode: LocationMode,
) -> Result<SearchEngine<SupabaseClient>> {
    let source = SupabaseClient::new(&config.backend)?;
    Ok(match build_resolver(&config.location, mode) {
        Some(resolver) => SearchEngine::with_resolver(source, resolver),
        None => SearchEngine::new(source),
    })
}

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub mode: LocationMode,
    pub format: Option<ExportFormat>,
    pub output: Option<PathBuf>,
}

pub async fn run_search(config: &TomlConfig, request: &SearchRequest) -> Result<SearchOutcome> {
    let engine = build_engine(config, request.mode)?;
    let outcome = engine.search(&request.query).await?;

    match &outcome.location {
        Some(location) if location.source == LocationSource::Fallback => {
            tracing::info!("Ranking from fallback location {}", location.coordinate)
        }
        Some(location) => tracing::info!("Ranking from {}", location.coordinate),
        None => tracing::info!("Location disabled, keeping name order"),
    }
    tracing::info!(
        "🔍 {} of {} companies match '{}'",
        outcome.rows.len(),
        outcome.total,
        request.query
    );

    let format = request.format.unwrap_or(config.output.format);
    let output = request
        .output
        .clone()
        .or_else(|| config.output.path.as_ref().map(PathBuf::from));
    let mut sink = open_sink(format, output.as_deref())?;
    sink.write_results(&outcome.rows)?;
    if let Some(path) = output {
        tracing::info!("📁 Results saved to: {}", path.display());
    }

    Ok(outcome)
}

pub async fn run_show(
    config: &TomlConfig,
    slug: &str,
    mode: LocationMode,
) -> Result<CompanyDetails> {
    let engine = build_engine(config, mode)?;
    let details = engine.company_details(slug).await?;
    let stdout = std::io::stdout();
    write_details(&mut stdout.lock(), &details)?;
    Ok(details)
}

pub fn write_details<W: Write>(writer: &mut W, details: &CompanyDetails) -> Result<()> {
    let company = &details.company;
    writeln!(writer, "{}  ⭐ {:.1}", company.name, company.rating)?;
    writeln!(writer, "{}", company.category)?;
    if !company.description.is_empty() {
        writeln!(writer, "{}", company.description)?;
    }
    if let Some(distance) = details.distance_km {
        writeln!(writer, "📍 {} km away", format_km(distance))?;
    }

    writeln!(writer)?;
    if details.services.is_empty() {
        writeln!(writer, "No services listed.")?;
    } else {
        writeln!(writer, "Services:")?;
        for service in &details.services {
            writeln!(
                writer,
                "  - {} ({} min) R$ {:.2}",
                service.name, service.duration_minutes, service.price
            )?;
        }
    }
    Ok(())
}

pub fn parse_coordinate(latitude: f64, longitude: f64) -> Result<Coordinate> {
    let coordinate = Coordinate::new(latitude, longitude);
    if coordinate.is_in_range() {
        Ok(coordinate)
    } else {
        Err(SearchError::InvalidConfigValueError {
            field: "lat/lon".to_string(),
            value: coordinate.to_string(),
            reason: "latitude must be within [-90, 90] and longitude within [-180, 180]"
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Company, Service};

    #[tokio::test]
    async fn test_build_resolver_modes() {
        let config = LocationConfig::default();
        assert!(build_resolver(&config, LocationMode::Disabled).is_none());

        let fixed = Coordinate::new(1.0, 2.0);
        let resolver = build_resolver(&config, LocationMode::Fixed(fixed)).unwrap();
        assert_eq!(resolver.resolve().await.coordinate, fixed);

        // the default provider cannot locate anyone
        let resolver = build_resolver(&config, LocationMode::Configured).unwrap();
        let resolved = resolver.resolve().await;
        assert_eq!(resolved.source, LocationSource::Fallback);
        assert_eq!(resolved.coordinate, config.fallback());
    }

    #[test]
    fn test_parse_coordinate() {
        assert!(parse_coordinate(-23.5, -46.6).is_ok());
        assert!(parse_coordinate(-123.5, -46.6).is_err());
    }

    #[test]
    fn test_write_details() {
        let details = CompanyDetails {
            company: Company {
                id: "e1".to_string(),
                name: "Estética Renovar".to_string(),
                description: "Tratamentos faciais".to_string(),
                category: "Estética".to_string(),
                latitude: -23.58,
                longitude: -46.67,
                rating: 4.6,
                slug: "estetica-renovar".to_string(),
                created_at: None,
            },
            distance_km: Some(4.04),
            services: vec![Service {
                id: "s1".to_string(),
                company_id: "e1".to_string(),
                name: "Limpeza de pele".to_string(),
                price: 150.0,
                duration_minutes: 60,
            }],
        };

        let mut out = Vec::new();
        write_details(&mut out, &details).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Estética Renovar  ⭐ 4.6\n"));
        assert!(text.contains("📍 4.0 km away"));
        assert!(text.contains("  - Limpeza de pele (60 min) R$ 150.00"));
    }
}
