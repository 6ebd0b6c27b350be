pub mod distance;
pub mod filter;
pub mod location;
pub mod presenter;
pub mod ranking;
pub mod search;
pub mod session;

pub use crate::domain::model::{Company, Coordinate, DisplayFields, RankedResult};
pub use crate::domain::ports::{CompanySource, GeolocationCapability, ResultSink};
pub use crate::utils::error::Result;
