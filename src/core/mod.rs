pub mod classifier;
pub mod resolver;

pub use crate::domain::model::{PermitStatus, RawPortalResponse, TrackingCode};
pub use crate::domain::ports::PortalClient;
pub use crate::utils::error::Result;
