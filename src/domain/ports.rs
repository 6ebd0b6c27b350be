use crate::domain::model::{
    Company, Coordinate, DisplayFields, GeolocationError, PositionOptions, Service,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read access to the external company store.
#[async_trait]
pub trait CompanySource: Send + Sync {
    /// All companies, ordered by name ascending.
    async fn list_companies(&self) -> Result<Vec<Company>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Company>>;
    async fn list_services(&self, company_id: &str) -> Result<Vec<Service>>;
}

/// A platform capability that can report the caller's position.
#[async_trait]
pub trait GeolocationCapability: Send + Sync {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> std::result::Result<Coordinate, GeolocationError>;
}

#[async_trait]
impl<T: GeolocationCapability + ?Sized> GeolocationCapability for Box<T> {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> std::result::Result<Coordinate, GeolocationError> {
        (**self).current_position(options).await
    }
}

pub trait ResultSink {
    fn write_results(&mut self, rows: &[DisplayFields]) -> Result<()>;
}
