use crate::domain::model::PermitStatus;
use serde::{Deserialize, Serialize};

/// Phrase markers diagnostic of the portal's states, matched case-insensitively.
///
/// Loaded from config so the wording can follow the portal without a rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSet {
    pub ready: Vec<String>,
    pub processing: Vec<String>,
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self {
            ready: vec!["la consegna".to_string(), "è pronta".to_string()],
            processing: vec![
                "in trattazione".to_string(),
                "in fase di lavorazione".to_string(),
            ],
        }
    }
}

impl MarkerSet {
    pub fn new(ready: Vec<String>, processing: Vec<String>) -> Self {
        Self { ready, processing }
    }

    /// Ready markers win over processing markers; no match means `NotStarted`.
    pub fn classify(&self, body: &str) -> PermitStatus {
        let body = body.to_lowercase();

        if let Some(marker) = Self::first_match(&body, &self.ready) {
            tracing::debug!("Matched ready marker '{}'", marker);
            return PermitStatus::ReadyForPickup;
        }
        if let Some(marker) = Self::first_match(&body, &self.processing) {
            tracing::debug!("Matched processing marker '{}'", marker);
            return PermitStatus::BeingProcessed;
        }

        tracing::debug!("No status marker matched ({} bytes of content)", body.len());
        PermitStatus::NotStarted
    }

    fn first_match<'a>(body: &str, markers: &'a [String]) -> Option<&'a str> {
        markers
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .find(|m| body.contains(m.to_lowercase().as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_markers_cover_portal_wording() {
        let markers = MarkerSet::default();
        assert_eq!(
            markers.classify("<p>È possibile prenotare LA CONSEGNA del permesso</p>"),
            PermitStatus::ReadyForPickup
        );
        assert_eq!(
            markers.classify("La Sua Pratica è Pronta"),
            PermitStatus::ReadyForPickup
        );
        assert_eq!(
            markers.classify("LA SUA PRATICA È PRONTA"),
            PermitStatus::ReadyForPickup
        );
        assert_eq!(
            markers.classify("Il permesso risulta IN TRATTAZIONE"),
            PermitStatus::BeingProcessed
        );
        assert_eq!(
            markers.classify("Pratica in Fase di Lavorazione"),
            PermitStatus::BeingProcessed
        );
    }

    #[test]
    fn test_ready_wins_over_processing() {
        let markers = MarkerSet::default();
        let body = "pratica in trattazione ... è possibile fissare la consegna";
        assert_eq!(markers.classify(body), PermitStatus::ReadyForPickup);
    }

    #[test]
    fn test_unrecognized_content_is_not_started() {
        let markers = MarkerSet::default();
        assert_eq!(markers.classify(""), PermitStatus::NotStarted);
        assert_eq!(
            markers.classify("Nessuna Pratica Trovata"),
            PermitStatus::NotStarted
        );
        assert_eq!(
            markers.classify("<html><body>Servizio in manutenzione</body></html>"),
            PermitStatus::NotStarted
        );
    }

    #[test]
    fn test_blank_markers_never_match() {
        let markers = MarkerSet::new(vec!["".to_string(), "  ".to_string()], vec![]);
        assert_eq!(markers.classify("anything"), PermitStatus::NotStarted);
    }

    #[test]
    fn test_custom_markers_are_case_insensitive() {
        let markers = MarkerSet::new(vec!["READY".to_string()], vec!["Working".to_string()]);
        assert_eq!(markers.classify("it is ready"), PermitStatus::ReadyForPickup);
        assert_eq!(markers.classify("WORKING on it"), PermitStatus::BeingProcessed);
    }
}
