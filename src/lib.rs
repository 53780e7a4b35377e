pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::HttpPortalClient;
pub use crate::app::tracker::{CheckReport, Tracker};
pub use crate::config::TrackerConfig;
pub use crate::core::{classifier::MarkerSet, resolver::StatusResolver};
pub use crate::domain::model::{expand_short_code, CodeRules, PermitStatus, RawPortalResponse, TrackingCode};
pub use crate::domain::ports::PortalClient;
pub use crate::utils::error::{ResolveError, Result, TrackerError, TransportError};
