use crate::core::distance::haversine_km;
use crate::core::location::LocationResolver;
use crate::core::presenter::present_all;
use crate::core::session::SearchSession;
use crate::domain::model::{Company, DisplayFields, ResolvedLocation, Service};
use crate::domain::ports::{CompanySource, GeolocationCapability};
use crate::utils::error::{Result, SearchError};

pub type DynResolver = LocationResolver<Box<dyn GeolocationCapability>>;

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub location: Option<ResolvedLocation>,
    pub total: usize,
    pub rows: Vec<DisplayFields>,
}

#[derive(Debug, Clone)]
pub struct CompanyDetails {
    pub company: Company,
    pub distance_km: Option<f64>,
    pub services: Vec<Service>,
}

/// Fetches a snapshot, resolves the origin and hands both to a session.
pub struct SearchEngine<S: CompanySource> {
    source: S,
    resolver: Option<DynResolver>,
}

impl<S: CompanySource> SearchEngine<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            resolver: None,
        }
    }

    pub fn with_resolver(source: S, resolver: DynResolver) -> Self {
        Self {
            source,
            resolver: Some(resolver),
        }
    }

    async fn resolve_location(&self) -> Option<ResolvedLocation> {
        match &self.resolver {
            Some(resolver) => Some(resolver.resolve().await),
            None => None,
        }
    }

    /// Fetches companies and resolves the origin concurrently.
    pub async fn open_session(&self) -> Result<(SearchSession, Option<ResolvedLocation>)> {
        tracing::debug!("Fetching companies and resolving location");
        let (companies, location) =
            tokio::join!(self.source.list_companies(), self.resolve_location());
        let companies = companies?;
        tracing::info!("Loaded {} companies", companies.len());

        for company in companies.iter().filter(|c| !c.location().is_in_range()) {
            tracing::warn!(
                "Company '{}' has out-of-range coordinates {}",
                company.slug,
                company.location()
            );
        }

        let mut session = SearchSession::new(companies);
        session.set_origin(location.map(|l| l.coordinate));
        Ok((session, location))
    }

    pub async fn search(&self, search_text: &str) -> Result<SearchOutcome> {
        let (mut session, location) = self.open_session().await?;
        session.set_search_text(search_text);

        let rows = present_all(&session.results());
        tracing::debug!(
            "Ranked '{}' from {:?}",
            session.search_text(),
            session.origin()
        );
        if rows.is_empty() {
            tracing::info!("No companies match '{}'", session.search_text().trim());
        }

        Ok(SearchOutcome {
            location,
            total: session.companies().len(),
            rows,
        })
    }

    pub async fn company_details(&self, slug: &str) -> Result<CompanyDetails> {
        let company = self
            .source
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| SearchError::CompanyNotFound {
                slug: slug.to_string(),
            })?;

        let (services, location) = tokio::join!(
            self.source.list_services(&company.id),
            self.resolve_location()
        );
        let services = services?;
        tracing::debug!("Company '{}' offers {} services", slug, services.len());

        let distance_km = location.map(|l| haversine_km(l.coordinate, company.location()));

        Ok(CompanyDetails {
            company,
            distance_km,
            services,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::geolocation::{FixedPosition, Unsupported};
    use crate::domain::model::{Coordinate, LocationSource};
    use async_trait::async_trait;

    struct InMemorySource {
        companies: Vec<Company>,
        services: Vec<Service>,
    }

    #[async_trait]
    impl CompanySource for InMemorySource {
        async fn list_companies(&self) -> Result<Vec<Company>> {
            Ok(self.companies.clone())
        }

        async fn find_by_slug(&self, slug: &str) -> Result<Option<Company>> {
            Ok(self.companies.iter().find(|c| c.slug == slug).cloned())
        }

        async fn list_services(&self, company_id: &str) -> Result<Vec<Service>> {
            Ok(self
                .services
                .iter()
                .filter(|s| s.company_id == company_id)
                .cloned()
                .collect())
        }
    }

    fn company(id: &str, name: &str, latitude: f64, longitude: f64) -> Company {
        Company {
            id: id.to_string(),
            name: name.to_string(),
            description: "Atendimento com hora marcada".to_string(),
            category: "Beleza".to_string(),
            latitude,
            longitude,
            rating: 4.5,
            slug: name.to_lowercase().replace(' ', "-"),
            created_at: None,
        }
    }

    fn source() -> InMemorySource {
        InMemorySource {
            companies: vec![
                company("1", "Estetica Renovar", 0.0, 2.0),
                company("2", "Spa Relaxar", 0.0, 1.0),
            ],
            services: vec![Service {
                id: "s1".to_string(),
                company_id: "2".to_string(),
                name: "Massagem relaxante".to_string(),
                price: 120.0,
                duration_minutes: 60,
            }],
        }
    }

    #[tokio::test]
    async fn test_search_ranks_from_resolved_location() {
        let capability: Box<dyn GeolocationCapability> =
            Box::new(FixedPosition::new(Coordinate::new(0.0, 0.0)));
        let resolver = LocationResolver::new(capability);
        let engine = SearchEngine::with_resolver(source(), resolver);

        let outcome = engine.search("").await.unwrap();
        assert_eq!(outcome.total, 2);
        assert_eq!(outcome.location.unwrap().source, LocationSource::Device);
        assert_eq!(outcome.rows[0].name, "Spa Relaxar");
        assert_eq!(outcome.rows[0].distance_km.as_deref(), Some("111.2"));
    }

    #[tokio::test]
    async fn test_search_without_resolver_keeps_fetch_order() {
        let engine = SearchEngine::new(source());
        let outcome = engine.search("").await.unwrap();

        assert!(outcome.location.is_none());
        let names: Vec<_> = outcome.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Estetica Renovar", "Spa Relaxar"]);
        assert!(outcome.rows.iter().all(|r| r.distance_km.is_none()));
    }

    #[tokio::test]
    async fn test_unsupported_geolocation_ranks_from_fallback() {
        let resolver =
            LocationResolver::new(Box::new(Unsupported) as Box<dyn GeolocationCapability>);
        let engine = SearchEngine::with_resolver(source(), resolver);

        let outcome = engine.search("spa").await.unwrap();
        let location = outcome.location.unwrap();
        assert_eq!(location.source, LocationSource::Fallback);
        assert_eq!(location.coordinate, Coordinate::new(-23.5505, -46.6333));
        assert_eq!(outcome.rows.len(), 1);
        assert!(outcome.rows[0].distance_km.is_some());
    }

    #[tokio::test]
    async fn test_company_details() {
        let engine = SearchEngine::new(source());
        let details = engine.company_details("spa-relaxar").await.unwrap();

        assert_eq!(details.company.id, "2");
        assert_eq!(details.services.len(), 1);
        assert_eq!(details.distance_km, None);
    }

    #[tokio::test]
    async fn test_unknown_slug_is_not_found() {
        let engine = SearchEngine::new(source());
        let err = engine.company_details("nope").await.unwrap_err();
        assert!(matches!(err, SearchError::CompanyNotFound { .. }));
    }
}
