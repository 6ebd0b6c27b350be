use crate::domain::model::{Coordinate, GeolocationError, PositionOptions};
use crate::domain::ports::GeolocationCapability;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

/// A position supplied up front, e.g. from `--lat/--lon`.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(Coordinate);

impl FixedPosition {
    pub fn new(coordinate: Coordinate) -> Self {
        Self(coordinate)
    }
}

#[async_trait]
impl GeolocationCapability for FixedPosition {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinate, GeolocationError> {
        Ok(self.0)
    }
}

/// An environment with no way to locate the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

#[async_trait]
impl GeolocationCapability for Unsupported {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinate, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}

#[derive(Debug, Deserialize)]
struct PositionReply {
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lon", alias = "lng")]
    longitude: f64,
}

/// Looks the caller up through an HTTP geolocation service that answers with
/// a JSON object carrying `latitude`/`longitude` (or `lat`/`lon`).
#[derive(Debug, Clone)]
pub struct HttpGeolocation {
    client: Client,
    endpoint: String,
}

impl HttpGeolocation {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl GeolocationCapability for HttpGeolocation {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinate, GeolocationError> {
        if options.high_accuracy {
            tracing::debug!("High accuracy requested; network lookup is city-level at best");
        }

        let response = self
            .client
            .get(&self.endpoint)
            .timeout(options.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeolocationError::Timeout
                } else {
                    GeolocationError::PositionUnavailable(e.to_string())
                }
            })?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(GeolocationError::PermissionDenied)
            }
            status if !status.is_success() => {
                return Err(GeolocationError::PositionUnavailable(format!(
                    "lookup returned HTTP {}",
                    status
                )))
            }
            _ => {}
        }

        let reply: PositionReply = response
            .json()
            .await
            .map_err(|e| GeolocationError::PositionUnavailable(e.to_string()))?;
        Ok(Coordinate::new(reply.latitude, reply.longitude))
    }
}
