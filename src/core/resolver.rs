use crate::core::classifier::MarkerSet;
use crate::domain::model::{CodeRules, PermitStatus, TrackingCode};
use crate::domain::ports::PortalClient;
use crate::utils::error::ResolveError;

/// Turns a user-supplied tracking code into a [`PermitStatus`].
///
/// Holds no mutable state, so one resolver can serve concurrent lookups.
pub struct StatusResolver<C: PortalClient> {
    client: C,
    markers: MarkerSet,
    rules: CodeRules,
}

impl<C: PortalClient> StatusResolver<C> {
    pub fn new(client: C) -> Self {
        Self::with_rules(client, MarkerSet::default(), CodeRules::default())
    }

    pub fn with_rules(client: C, markers: MarkerSet, rules: CodeRules) -> Self {
        Self {
            client,
            markers,
            rules,
        }
    }

    /// Validates the code, performs exactly one portal lookup and classifies it.
    ///
    /// An invalid code never reaches the portal. A transport failure is
    /// reported as `LookupFailed`, never as `NotStarted`.
    pub async fn resolve(&self, raw_code: &str) -> std::result::Result<PermitStatus, ResolveError> {
        let code = TrackingCode::parse(raw_code, &self.rules)?;

        let response = match self.client.fetch(&code).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Lookup failed for {}: {}", code, e);
                return Err(ResolveError::LookupFailed { source: e });
            }
        };

        tracing::debug!(
            "Portal answered {} for {} ({} bytes)",
            response.status,
            code,
            response.body.len()
        );

        let status = self.markers.classify(&response.body);
        tracing::info!("Permit {} resolved to {:?}", code, status);
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::RawPortalResponse;
    use crate::utils::error::TransportError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    struct StubClient {
        reply: std::result::Result<RawPortalResponse, TransportError>,
        calls: AtomicUsize,
    }

    impl StubClient {
        fn body(body: &str) -> Self {
            Self {
                reply: Ok(RawPortalResponse::new(200, body)),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(err: TransportError) -> Self {
            Self {
                reply: Err(err),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PortalClient for StubClient {
        async fn fetch(
            &self,
            _code: &TrackingCode,
        ) -> std::result::Result<RawPortalResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn resolver(stub: &Arc<StubClient>) -> StatusResolver<Arc<StubClient>> {
        StatusResolver::new(Arc::clone(stub))
    }

    #[tokio::test]
    async fn test_scenario_ready_for_pickup() {
        let stub = Arc::new(StubClient::body("La Sua Pratica è Pronta"));
        let status = assert_ok!(resolver(&stub).resolve("AB1234567").await);
        assert_eq!(status, PermitStatus::ReadyForPickup);
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_scenario_being_processed() {
        let stub = Arc::new(StubClient::body("Pratica in Fase di Lavorazione"));
        let status = assert_ok!(resolver(&stub).resolve("AB1234567").await);
        assert_eq!(status, PermitStatus::BeingProcessed);
    }

    #[tokio::test]
    async fn test_scenario_not_started() {
        let stub = Arc::new(StubClient::body("Nessuna Pratica Trovata"));
        let status = assert_ok!(resolver(&stub).resolve("AB1234567").await);
        assert_eq!(status, PermitStatus::NotStarted);
    }

    #[tokio::test]
    async fn test_invalid_code_skips_portal() {
        let stub = Arc::new(StubClient::body("la consegna"));
        let resolver = resolver(&stub);
        for raw in ["xx", "", "AB-1234567"] {
            let err = assert_err!(resolver.resolve(raw).await);
            assert!(matches!(err, ResolveError::InvalidCode { .. }));
        }
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_transport_error_is_lookup_failed() {
        for err in [
            TransportError::Timeout,
            TransportError::Connect {
                message: "connection refused".to_string(),
            },
            TransportError::Body {
                message: "invalid utf-8".to_string(),
            },
        ] {
            let stub = Arc::new(StubClient::failing(err.clone()));
            let result = resolver(&stub).resolve("AB1234567").await;
            assert_eq!(result, Err(ResolveError::LookupFailed { source: err }));
            assert_eq!(stub.calls(), 1);
        }
    }

    #[tokio::test]
    async fn test_pickup_marker_in_any_case_wins() {
        let stub = Arc::new(StubClient::body(
            "IN TRATTAZIONE <br> prenotare LA CONSEGNA presso la Questura",
        ));
        let status = assert_ok!(resolver(&stub).resolve("ab1234567").await);
        assert_eq!(status, PermitStatus::ReadyForPickup);
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let stub = Arc::new(StubClient::body("pratica in trattazione"));
        let resolver = resolver(&stub);
        let first = resolver.resolve("AB1234567").await;
        let second = resolver.resolve("AB1234567").await;
        assert_eq!(first, second);
        assert_eq!(stub.calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_resolution_shares_resolver() {
        let stub = Arc::new(StubClient::body("in trattazione"));
        let resolver = Arc::new(resolver(&stub));

        let mut set = tokio::task::JoinSet::new();
        for i in 0..8 {
            let resolver = Arc::clone(&resolver);
            set.spawn(async move { resolver.resolve(&format!("AB12345{:02}", i)).await });
        }
        while let Some(joined) = set.join_next().await {
            assert_eq!(joined.unwrap(), Ok(PermitStatus::BeingProcessed));
        }
        assert_eq!(stub.calls(), 8);
    }

    #[tokio::test]
    async fn test_custom_markers_and_rules() {
        let stub = Arc::new(StubClient::body("Permit READY"));
        let resolver = StatusResolver::with_rules(
            Arc::clone(&stub),
            MarkerSet::new(vec!["ready".to_string()], vec![]),
            CodeRules::new(r"^\d{8}$").unwrap(),
        );
        assert_eq!(
            resolver.resolve("26123456").await,
            Ok(PermitStatus::ReadyForPickup)
        );
        assert!(resolver.resolve("AB1234567").await.is_err());
        assert_eq!(stub.calls(), 1);
    }
}
