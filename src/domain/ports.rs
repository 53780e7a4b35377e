use crate::domain::model::{RawPortalResponse, TrackingCode};
use crate::utils::error::TransportError;
use async_trait::async_trait;
use std::sync::Arc;

/// One outbound lookup against the permit portal. No retries, no caching.
#[async_trait]
pub trait PortalClient: Send + Sync {
    async fn fetch(
        &self,
        code: &TrackingCode,
    ) -> std::result::Result<RawPortalResponse, TransportError>;
}

#[async_trait]
impl<T: PortalClient + ?Sized> PortalClient for Arc<T> {
    async fn fetch(
        &self,
        code: &TrackingCode,
    ) -> std::result::Result<RawPortalResponse, TransportError> {
        (**self).fetch(code).await
    }
}
