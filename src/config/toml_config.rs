use crate::core::classifier::MarkerSet;
use crate::domain::model::{CodeRules, DEFAULT_CODE_PATTERN};
use crate::utils::error::{Result, TrackerError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://questure.poliziadistato.it/stranieri/";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/144.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub portal: PortalConfig,
    pub markers: MarkerSet,
    pub code: CodeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub endpoint: String,
    pub language: String,
    pub timeout_seconds: u64,
    /// Cap on lookups in flight at once when checking a batch of codes.
    pub max_concurrent_requests: usize,
    /// The portal's certificate chain does not verify with stock roots.
    pub accept_invalid_certs: bool,
    pub user_agent: String,
    pub headers: BTreeMap<String, String>,
    pub cookies: BTreeMap<String, String>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language: "italian".to_string(),
            timeout_seconds: 20,
            max_concurrent_requests: 4,
            accept_invalid_certs: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: BTreeMap::new(),
            cookies: BTreeMap::from([(
                "cookieconsent_status".to_string(),
                "dismiss".to_string(),
            )]),
        }
    }
}

impl PortalConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeConfig {
    pub pattern: String,
    /// Prefix 6-digit input with the current two-digit year.
    pub expand_short_codes: bool,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_CODE_PATTERN.to_string(),
            expand_short_codes: true,
        }
    }
}

impl CodeConfig {
    pub fn rules(&self) -> Result<CodeRules> {
        CodeRules::new(&self.pattern).map_err(|e| TrackerError::InvalidConfigValueError {
            field: "code.pattern".to_string(),
            value: self.pattern.clone(),
            reason: e.to_string(),
        })
    }
}

impl TrackerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TrackerError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| TrackerError::ConfigParseError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PORTAL_ENDPOINT})，未設定者保留原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }
}

impl Validate for TrackerConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("portal.endpoint", &self.portal.endpoint)?;
        validation::validate_non_empty_string("portal.language", &self.portal.language)?;
        validation::validate_non_empty_string("portal.user_agent", &self.portal.user_agent)?;
        validation::validate_range("portal.timeout_seconds", self.portal.timeout_seconds, 1, 300)?;
        validation::validate_range(
            "portal.max_concurrent_requests",
            self.portal.max_concurrent_requests,
            1,
            32,
        )?;

        validation::validate_markers("markers.ready", &self.markers.ready)?;
        validation::validate_markers("markers.processing", &self.markers.processing)?;

        self.code.rules()?;
        Ok(())
    }
}
