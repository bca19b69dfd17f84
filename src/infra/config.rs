// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::results::ANALYSIS_FILE;
use crate::infra::errors::OptiscopeError;
use crate::infra::paths;
use crate::telemetry::Category;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cloud: CloudConfig,

    #[serde(default)]
    pub local: LocalConfig,

    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub listener: ListenerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Falls back to the `api_key_env` variable when unset.
    pub api_key: Option<String>,
    pub api_key_env: String,
    pub base_url: String,
    pub summary_model: String,
    pub chat_model: String,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: "OPENAI_API_KEY".into(),
            base_url: "https://api.openai.com/v1".into(),
            summary_model: "gpt-4o".into(),
            chat_model: "gpt-4o-mini".into(),
        }
    }
}

impl CloudConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok().filter(|k| !k.is_empty()))
    }

    pub fn require_api_key(&self) -> Result<String, OptiscopeError> {
        self.resolve_api_key().ok_or_else(|| {
            OptiscopeError::Config(format!(
                "no API key: set [cloud] api_key in config.toml or {}",
                self.api_key_env
            ))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub base_url: String,
    pub model: String,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            model: "llama3".into(),
        }
    }
}

/// Two-tier price table, USD per 1K tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub premium_prefix: String,
    pub premium_input_per_1k: f64,
    pub premium_output_per_1k: f64,
    pub fallback_input_per_1k: f64,
    pub fallback_output_per_1k: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            premium_prefix: "gpt-4o".into(),
            premium_input_per_1k: 0.005,
            premium_output_per_1k: 0.01,
            fallback_input_per_1k: 0.002,
            fallback_output_per_1k: 0.004,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
    pub alarm_dir: String,
    pub pm_dir: String,
    pub topology_dir: String,
    pub summary_dir: String,
    pub analysis_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            alarm_dir: "alarm".into(),
            pm_dir: "pm".into(),
            topology_dir: "topology".into(),
            summary_dir: "summary".into(),
            analysis_file: ANALYSIS_FILE.into(),
        }
    }
}

impl PathsConfig {
    /// Folder holding the XML export for one telemetry category.
    pub fn category_dir(&self, category: Category) -> PathBuf {
        let name = match category {
            Category::Alarm => &self.alarm_dir,
            Category::Pm => &self.pm_dir,
            Category::Topology => &self.topology_dir,
        };
        self.data_dir.join(name)
    }

    pub fn summary_dir(&self) -> PathBuf {
        self.data_dir.join(&self.summary_dir)
    }

    pub fn analysis_path(&self) -> PathBuf {
        self.data_dir.join(&self.analysis_file)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Kafka bootstrap brokers, `host:port`.
    pub brokers: Vec<String>,
    pub topic: String,
    pub group_id: String,
    /// Upper bound on how long one fetch waits at the broker.
    pub max_wait_ms: i32,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            brokers: vec!["localhost:9092".into()],
            topic: "alarmoptical-tunnel".into(),
            group_id: "transportpceTest".into(),
            max_wait_ms: 500,
        }
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        match paths::config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert_eq!(c.cloud.summary_model, "gpt-4o");
        assert_eq!(c.cloud.chat_model, "gpt-4o-mini");
        assert_eq!(c.local.base_url, "http://localhost:11434");
        assert_eq!(c.local.model, "llama3");
        assert_eq!(c.pricing.premium_prefix, "gpt-4o");
        assert!((c.pricing.premium_input_per_1k - 0.005).abs() < 1e-9);
        assert!((c.pricing.fallback_output_per_1k - 0.004).abs() < 1e-9);
        assert_eq!(c.listener.topic, "alarmoptical-tunnel");
        assert_eq!(c.listener.group_id, "transportpceTest");
        assert_eq!(c.listener.brokers, vec!["localhost:9092".to_string()]);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.cloud.base_url, "https://api.openai.com/v1");
        assert_eq!(config.paths.analysis_file, "analysis.txt");
    }

    #[test]
    fn test_parse_partial_sections() {
        let toml_str = r#"
[local]
model = "mistral"

[pricing]
premium_prefix = "gpt-4.1"

[paths]
data_dir = "/srv/telemetry"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.local.model, "mistral");
        assert_eq!(config.local.base_url, "http://localhost:11434");
        assert_eq!(config.pricing.premium_prefix, "gpt-4.1");
        assert!((config.pricing.premium_output_per_1k - 0.01).abs() < 1e-9);
        assert_eq!(
            config.paths.category_dir(Category::Pm),
            PathBuf::from("/srv/telemetry/pm")
        );
        assert_eq!(
            config.paths.summary_dir(),
            PathBuf::from("/srv/telemetry/summary")
        );
    }

    #[test]
    fn test_category_dirs() {
        let p = PathsConfig::default();
        assert_eq!(p.category_dir(Category::Alarm), PathBuf::from("./alarm"));
        assert_eq!(
            p.category_dir(Category::Topology),
            PathBuf::from("./topology")
        );
        assert_eq!(p.analysis_path(), PathBuf::from("./analysis.txt"));
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let c = CloudConfig {
            api_key: Some("sk-test".into()),
            ..Default::default()
        };
        assert_eq!(c.resolve_api_key(), Some("sk-test".into()));
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let c = CloudConfig {
            api_key_env: "OPTISCOPE_TEST_KEY_NEVER_SET".into(),
            ..Default::default()
        };
        let err = c.require_api_key().unwrap_err();
        assert!(matches!(err, OptiscopeError::Config(_)));
        assert!(err.to_string().contains("OPTISCOPE_TEST_KEY_NEVER_SET"));
    }

    #[test]
    fn test_parse_listener_section() {
        let toml_str = r#"
[listener]
brokers = ["10.0.0.5:9092", "10.0.0.6:9092"]
group_id = "noc"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.listener.brokers.len(), 2);
        assert_eq!(config.listener.group_id, "noc");
        assert_eq!(config.listener.topic, "alarmoptical-tunnel");
        assert_eq!(config.listener.max_wait_ms, 500);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.cloud.chat_model, config.cloud.chat_model);
        assert_eq!(deserialized.paths.pm_dir, config.paths.pm_dir);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }
}
