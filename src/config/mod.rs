pub mod toml_config;

pub use toml_config::{CodeConfig, PortalConfig, TrackerConfig};

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "permesso-tracker")]
#[command(about = "Check the processing status of an Italian residence permit")]
pub struct CliConfig {
    /// Permit tracking codes (e.g. 26BO123456, or 123456 for the current year)
    #[arg(required = true)]
    pub codes: Vec<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the portal endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Override the request timeout
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Print one JSON object per code instead of text
    #[arg(long)]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the config file (or defaults) and applies command line overrides.
    pub fn load_tracker_config(&self) -> crate::utils::error::Result<TrackerConfig> {
        let mut config = match &self.config {
            Some(path) => TrackerConfig::from_file(path)?,
            None => TrackerConfig::default(),
        };

        if let Some(endpoint) = &self.endpoint {
            config.portal.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            config.portal.timeout_seconds = timeout;
        }

        Ok(config)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_defaults() {
        let cli = CliConfig::parse_from([
            "permesso-tracker",
            "--endpoint",
            "http://127.0.0.1:9000/stranieri/",
            "--timeout-seconds",
            "3",
            "26BO123456",
            "123456",
        ]);

        assert_eq!(cli.codes, vec!["26BO123456", "123456"]);
        let config = cli.load_tracker_config().unwrap();
        assert_eq!(config.portal.endpoint, "http://127.0.0.1:9000/stranieri/");
        assert_eq!(config.portal.timeout_seconds, 3);
    }

    #[test]
    fn test_codes_are_required() {
        assert!(CliConfig::try_parse_from(["permesso-tracker"]).is_err());
    }
}
