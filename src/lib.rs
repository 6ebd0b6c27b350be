pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::Cli;
pub use crate::config::TomlConfig;

pub use crate::core::presenter::present;
pub use crate::core::ranking::rank;
pub use crate::core::search::SearchEngine;
pub use crate::core::session::SearchSession;
pub use crate::domain::model::{Company, Coordinate, DisplayFields, RankedResult};
pub use crate::utils::error::{Result, SearchError};
