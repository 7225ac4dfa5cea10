use crate::error::Result;
use crate::paths;
use crate::types::Brand;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// GatewayConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_membership_base_url")]
    pub membership_base_url: String,
    #[serde(default = "default_collection_base_url")]
    pub collection_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_membership_base_url() -> String {
    "https://lb.membership.gke-apps.edo.sv".to_string()
}

fn default_collection_base_url() -> String {
    "https://lb.recurring-collection.gke-apps.edo.sv".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("tokensweep/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            membership_base_url: default_membership_base_url(),
            collection_base_url: default_collection_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// ColumnConfig
// ---------------------------------------------------------------------------

/// Header names of the operator's CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    #[serde(default = "default_email_column")]
    pub email: String,
    #[serde(default = "default_status_column")]
    pub prime_status: String,
    #[serde(default = "default_brand_column")]
    pub brand: String,
}

fn default_email_column() -> String {
    "VIP Comms: \nCustomer's email".to_string()
}

fn default_status_column() -> String {
    "Prime status ".to_string()
}

fn default_brand_column() -> String {
    "Brand".to_string()
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            email: default_email_column(),
            prime_status: default_status_column(),
            brand: default_brand_column(),
        }
    }
}

// ---------------------------------------------------------------------------
// ChatConfig
// ---------------------------------------------------------------------------

pub const ENV_PROJECT: &str = "GCLOUD_PROJECT";
pub const ENV_LOCATION: &str = "GCLOUD_LOCATION";
pub const ENV_MODEL: &str = "VERTEX_AI_GEMINI_MODEL_ID";
pub const ENV_ACCESS_TOKEN: &str = "GCLOUD_ACCESS_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default = "default_chat_model")]
    pub model: String,
    /// Override for the Vertex AI endpoint (defaults to the regional host).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

fn default_chat_model() -> String {
    "gemini-1.5-flash-001".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            project: None,
            location: None,
            model: default_chat_model(),
            endpoint: None,
            access_token: None,
        }
    }
}

impl ChatConfig {
    /// Overlay values from the environment. `lookup` is `std::env::var` in
    /// production and a map in tests.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = non_empty(ENV_PROJECT) {
            self.project = Some(v);
        }
        if let Some(v) = non_empty(ENV_LOCATION) {
            self.location = Some(v);
        }
        if let Some(v) = non_empty(ENV_MODEL) {
            self.model = v;
        }
        if let Some(v) = non_empty(ENV_ACCESS_TOKEN) {
            self.access_token = Some(v);
        }
    }

    pub fn is_configured(&self) -> bool {
        self.project.is_some() && self.location.is_some()
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub columns: ColumnConfig,
    #[serde(default = "default_brand")]
    pub default_brand: String,
    #[serde(default)]
    pub chat: ChatConfig,
}

fn default_version() -> u32 {
    1
}

fn default_brand() -> String {
    Brand::default().as_str().to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            gateway: GatewayConfig::default(),
            columns: ColumnConfig::default(),
            default_brand: default_brand(),
            chat: ChatConfig::default(),
        }
    }
}

impl Config {
    /// Load `.tokensweep/config.yaml` under `root`, or defaults if absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// [`Config::load`] followed by the chat environment overlay.
    pub fn load_with_env(root: &Path) -> Result<Self> {
        let mut cfg = Self::load(root)?;
        cfg.chat.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        // 1. Base URLs must be http(s)
        for (name, url) in [
            ("gateway.membership_base_url", &self.gateway.membership_base_url),
            ("gateway.collection_base_url", &self.gateway.collection_base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("{name} must be an http(s) url, got '{url}'"),
                });
            }
        }

        // 2. A zero timeout would fail every request
        if self.gateway.timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "gateway.timeout_secs must be greater than zero".to_string(),
            });
        }

        // 3. Default brand should be a known code
        if self.default_brand.parse::<Brand>().is_err() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("unknown default_brand '{}'", self.default_brand),
            });
        }

        // 4. Column names must be distinct and non-blank
        let cols = [
            ("email", &self.columns.email),
            ("prime_status", &self.columns.prime_status),
            ("brand", &self.columns.brand),
        ];
        for (name, col) in cols {
            if col.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("columns.{name} is empty"),
                });
            }
        }
        if self.columns.email == self.columns.prime_status
            || self.columns.email == self.columns.brand
            || self.columns.prime_status == self.columns.brand
        {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "columns.email, columns.prime_status and columns.brand must differ"
                    .to_string(),
            });
        }

        // 5. Chat is optional but noisy when half-configured
        if !self.chat.is_configured() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "chat.project / chat.location not set ({ENV_PROJECT} / {ENV_LOCATION}); \
                     the chat assistant will be unavailable"
                ),
            });
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.columns, ColumnConfig::default());
        assert_eq!(parsed.default_brand, "ED");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.gateway.timeout_secs, 30);
        assert_eq!(cfg.columns.email, "VIP Comms: \nCustomer's email");
    }

    #[test]
    fn load_reads_config_file() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".tokensweep")).unwrap();
        std::fs::write(
            paths::config_path(dir.path()),
            "gateway:\n  membership_base_url: http://localhost:9000\ndefault_brand: GV\n",
        )
        .unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.gateway.membership_base_url, "http://localhost:9000");
        assert_eq!(loaded.default_brand, "GV");
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = "gateway:\n  timeout_secs: 5\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.gateway.timeout_secs, 5);
        assert_eq!(cfg.gateway.collection_base_url, default_collection_base_url());
        assert_eq!(cfg.chat.model, "gemini-1.5-flash-001");
    }

    #[test]
    fn env_overrides_chat_settings() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_PROJECT, "ops-project"),
            (ENV_LOCATION, "europe-west1"),
            (ENV_MODEL, ""),
        ]);
        let mut chat = ChatConfig::default();
        chat.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(chat.project.as_deref(), Some("ops-project"));
        assert_eq!(chat.location.as_deref(), Some("europe-west1"));
        // blank values do not override
        assert_eq!(chat.model, "gemini-1.5-flash-001");
        assert!(chat.is_configured());
    }

    #[test]
    fn validate_flags_bad_values() {
        let mut cfg = Config::default();
        cfg.gateway.membership_base_url = "lb.membership".into();
        cfg.gateway.timeout_secs = 0;
        cfg.default_brand = "XX".into();
        cfg.columns.brand = cfg.columns.email.clone();

        let warnings = cfg.validate();
        let errors = warnings
            .iter()
            .filter(|w| w.level == WarnLevel::Error)
            .count();
        assert_eq!(errors, 3);
        assert!(warnings.iter().any(|w| w.message.contains("default_brand")));
    }

    #[test]
    fn validate_default_only_warns_about_chat() {
        let warnings = Config::default().validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Warning);
        assert!(warnings[0].message.contains("chat"));
    }
}
