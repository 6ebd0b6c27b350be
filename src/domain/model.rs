use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::Duration;
use thiserror::Error;

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A service provider row from the `empresas` table. Read-only snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(rename = "categoria", default, deserialize_with = "null_as_empty")]
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "avaliacao", default)]
    pub rating: f64,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Company {
    pub fn location(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// A company paired with its distance from the ranking origin, when one exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedResult<'a> {
    pub company: &'a Company,
    pub distance_km: Option<f64>,
}

/// A bookable service from the `servicos` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    #[serde(rename = "empresa_id")]
    pub company_id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "duracao")]
    pub duration_minutes: u32,
}

/// Display-ready fields for one rendered row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayFields {
    pub slug: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub distance_km: Option<String>,
    pub rating: String,
    pub image: ImageSource,
    pub address: String,
}

/// Image path for a rendered row that swaps to its fallback at most once.
///
/// Renderers call [`ImageSource::on_load_error`] when the image fails to
/// load. Serializes as the current path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    current: String,
    fallback: String,
    swapped: bool,
}

impl ImageSource {
    pub fn new(primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            current: primary.into(),
            fallback: fallback.into(),
            swapped: false,
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Returns `true` when a swap to the fallback happened. A failing
    /// fallback is left alone.
    pub fn on_load_error(&mut self) -> bool {
        if self.swapped || self.current == self.fallback {
            return false;
        }
        self.current = self.fallback.clone();
        self.swapped = true;
        true
    }
}

impl Serialize for ImageSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.current)
    }
}

/// Options passed to a geolocation capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(5 * 60),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("permission to read the current position was denied")]
    PermissionDenied,

    #[error("current position is unavailable: {0}")]
    PositionUnavailable(String),

    #[error("timed out waiting for the current position")]
    Timeout,

    #[error("geolocation is not supported in this environment")]
    Unsupported,
}

/// Where a resolved coordinate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    Device,
    Cached,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLocation {
    pub coordinate: Coordinate,
    pub source: LocationSource,
}
