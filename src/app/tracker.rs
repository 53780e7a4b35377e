use crate::adapters::HttpPortalClient;
use crate::config::TrackerConfig;
use crate::core::resolver::StatusResolver;
use crate::domain::model::{expand_short_code, PermitStatus};
use crate::domain::ports::PortalClient;
use crate::utils::error::{ResolveError, Result};
use crate::utils::validation::Validate;
use chrono::{Datelike, Local};
use futures::stream::{self, StreamExt};
use serde_json::json;

/// Outcome of checking one user-supplied code.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub code: String,
    pub outcome: std::result::Result<PermitStatus, ResolveError>,
}

impl CheckReport {
    pub fn to_json(&self) -> serde_json::Value {
        match &self.outcome {
            Ok(status) => json!({
                "code": self.code,
                "status": status,
                "title": status.title(),
            }),
            Err(ResolveError::InvalidCode { reason, .. }) => json!({
                "code": self.code,
                "status": "invalid_code",
                "error": reason,
            }),
            Err(ResolveError::LookupFailed { source }) => json!({
                "code": self.code,
                "status": "lookup_failed",
                "error": source.to_string(),
            }),
        }
    }
}

/// Wires a resolver to its portal client and checks batches of codes.
pub struct Tracker<C: PortalClient> {
    resolver: StatusResolver<C>,
    expand_short_codes: bool,
    max_concurrent: usize,
}

impl Tracker<HttpPortalClient> {
    pub fn from_config(config: &TrackerConfig) -> Result<Self> {
        config.validate()?;

        let client = HttpPortalClient::new(&config.portal)?;
        let resolver = StatusResolver::with_rules(client, config.markers.clone(), config.code.rules()?);
        Ok(Self::new(
            resolver,
            config.code.expand_short_codes,
            config.portal.max_concurrent_requests,
        ))
    }
}

impl<C: PortalClient> Tracker<C> {
    pub fn new(resolver: StatusResolver<C>, expand_short_codes: bool, max_concurrent: usize) -> Self {
        Self {
            resolver,
            expand_short_codes,
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub async fn check_all(&self, inputs: &[String]) -> Vec<CheckReport> {
        self.check_all_for_year(inputs, Local::now().year()).await
    }

    /// One lookup per input, at most `max_concurrent` in flight; results keep input order.
    pub async fn check_all_for_year(&self, inputs: &[String], year: i32) -> Vec<CheckReport> {
        stream::iter(inputs)
            .map(|input| async move {
                let code = self.prepare(input, year);
                let outcome = self.resolver.resolve(&code).await;
                CheckReport { code, outcome }
            })
            .buffered(self.max_concurrent)
            .collect()
            .await
    }

    fn prepare(&self, input: &str, year: i32) -> String {
        if self.expand_short_codes {
            expand_short_code(input, year)
        } else {
            input.trim().to_uppercase()
        }
    }
}
