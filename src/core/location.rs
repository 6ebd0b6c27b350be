//! Resolves the ranking origin from a geolocation capability.

use crate::domain::model::{
    Coordinate, GeolocationError, LocationSource, PositionOptions, ResolvedLocation,
};
use crate::domain::ports::GeolocationCapability;
use std::sync::Mutex;
use tokio::time::Instant;

/// Sao Paulo city center.
pub const DEFAULT_FALLBACK: Coordinate = Coordinate::new(-23.5505, -46.6333);

/// Asks a [`GeolocationCapability`] for the caller's position and never fails.
///
/// Any failure (denied, unavailable, unsupported, timed out or an out-of-range
/// reading) resolves to the fallback coordinate. A successful reading is
/// reused until it is older than `maximum_age`. Failures are not cached and
/// nothing is retried on its own: the next attempt happens on the next call
/// to [`LocationResolver::resolve`].
pub struct LocationResolver<G: GeolocationCapability> {
    capability: G,
    options: PositionOptions,
    fallback: Coordinate,
    last_fix: Mutex<Option<(Coordinate, Instant)>>,
}

impl<G: GeolocationCapability> LocationResolver<G> {
    pub fn new(capability: G) -> Self {
        Self::with_options(capability, PositionOptions::default(), DEFAULT_FALLBACK)
    }

    pub fn with_options(capability: G, options: PositionOptions, fallback: Coordinate) -> Self {
        Self {
            capability,
            options,
            fallback,
            last_fix: Mutex::new(None),
        }
    }

    pub fn fallback(&self) -> Coordinate {
        self.fallback
    }

    /// Drops the cached fix so the next resolve asks the capability again.
    pub fn forget(&self) {
        if let Ok(mut last_fix) = self.last_fix.lock() {
            *last_fix = None;
        }
    }

    pub async fn resolve(&self) -> ResolvedLocation {
        if let Some(coordinate) = self.fresh_fix() {
            tracing::debug!("Reusing cached position {}", coordinate);
            return ResolvedLocation {
                coordinate,
                source: LocationSource::Cached,
            };
        }

        match self.request_position().await {
            Ok(coordinate) => {
                tracing::info!("📍 Resolved current position {}", coordinate);
                if let Ok(mut last_fix) = self.last_fix.lock() {
                    *last_fix = Some((coordinate, Instant::now()));
                }
                ResolvedLocation {
                    coordinate,
                    source: LocationSource::Device,
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Could not resolve current position ({}), using fallback {}",
                    e,
                    self.fallback
                );
                ResolvedLocation {
                    coordinate: self.fallback,
                    source: LocationSource::Fallback,
                }
            }
        }
    }

    async fn request_position(&self) -> Result<Coordinate, GeolocationError> {
        let reading = tokio::time::timeout(
            self.options.timeout,
            self.capability.current_position(&self.options),
        )
        .await
        .map_err(|_| GeolocationError::Timeout)??;

        if reading.is_in_range() {
            Ok(reading)
        } else {
            Err(GeolocationError::PositionUnavailable(format!(
                "reading {} is out of range",
                reading
            )))
        }
    }

    fn fresh_fix(&self) -> Option<Coordinate> {
        let last_fix = self.last_fix.lock().ok()?;
        let (coordinate, taken_at) = (*last_fix)?;
        (taken_at.elapsed() <= self.options.maximum_age).then_some(coordinate)
    }
}
