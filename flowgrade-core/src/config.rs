//! Configuration types for the evaluation engine

use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FlowgradeError, Result};

/// Main configuration for Flowgrade
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FlowgradeConfig {
    /// Orchestration behaviour
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    /// Parameters applied to every judge request
    #[serde(default)]
    pub judge: JudgeConfig,
}

/// How a failing category affects the whole evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Replace the failing category with a degraded result and continue
    #[default]
    Isolate,

    /// Abort the evaluation with the first category error
    Propagate,
}

/// Orchestration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Category failure handling
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Maximum number of category judges in flight at once
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_max_concurrency() -> usize {
    8
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

/// Judge request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    /// Sampling temperature (0.0-2.0)
    #[serde(default)]
    pub temperature: f32,

    /// Maximum tokens per judge response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

fn default_max_tokens() -> usize {
    2048
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: default_max_tokens(),
        }
    }
}

/// Builder for FlowgradeConfig
pub struct ConfigBuilder {
    config: FlowgradeConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self {
            config: FlowgradeConfig::default(),
        }
    }

    /// Set the failure policy
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.evaluation.failure_policy = policy;
        self
    }

    /// Set the concurrency limit
    pub fn max_concurrency(mut self, max: usize) -> Self {
        self.config.evaluation.max_concurrency = max;
        self
    }

    /// Set judge configuration
    pub fn judge(mut self, judge: JudgeConfig) -> Self {
        self.config.judge = judge;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<FlowgradeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowgradeConfig {
    /// Load configuration from file and environment variables.
    ///
    /// Loads in this order:
    /// 1. Default configuration
    /// 2. `flowgrade.toml` in the working directory
    /// 3. File named by `FLOWGRADE_CONFIG_PATH`
    /// 4. `FLOWGRADE_` environment variables (`__` separates nested keys,
    ///    e.g. `FLOWGRADE_EVALUATION__MAX_CONCURRENCY=4`)
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration source is invalid.
    pub fn load() -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(FlowgradeConfig::default()))
            .merge(Toml::file("flowgrade.toml"));

        if let Ok(path) = std::env::var("FLOWGRADE_CONFIG_PATH") {
            figment = merge_file(figment, Path::new(&path));
        }

        let config: FlowgradeConfig = figment
            .merge(Env::prefixed("FLOWGRADE_").ignore(&["CONFIG_PATH"]).split("__"))
            .extract()
            .map_err(|e| {
                FlowgradeError::Configuration(format!("Failed to load configuration: {}", e))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    ///
    /// The format is chosen from the extension: `.yaml`/`.yml`, `.json`,
    /// anything else is read as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FlowgradeError::Configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let figment = merge_file(
            Figment::from(Serialized::defaults(FlowgradeConfig::default())),
            path,
        );

        let config: FlowgradeConfig = figment.extract().map_err(|e| {
            FlowgradeError::Configuration(format!("Failed to load configuration file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.evaluation.max_concurrency == 0 {
            return Err(FlowgradeError::Configuration(
                "evaluation.max_concurrency must be at least 1".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.judge.temperature) {
            return Err(FlowgradeError::Configuration(format!(
                "judge.temperature must be within 0.0-2.0, got {}",
                self.judge.temperature
            )));
        }
        if self.judge.max_tokens == 0 {
            return Err(FlowgradeError::Configuration(
                "judge.max_tokens must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Merge `path` into `figment`, picking the format from its extension
fn merge_file(figment: Figment, path: &Path) -> Figment {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => figment.merge(Yaml::file(path)),
        Some("json") => figment.merge(Json::file(path)),
        _ => figment.merge(Toml::file(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = FlowgradeConfig::default();
        assert_eq!(config.evaluation.failure_policy, FailurePolicy::Isolate);
        assert_eq!(config.evaluation.max_concurrency, 8);
        assert_eq!(config.judge.temperature, 0.0);
        assert_eq!(config.judge.max_tokens, 2048);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_rejects_zero_concurrency() {
        let result = ConfigBuilder::new().max_concurrency(0).build();
        assert!(matches!(result, Err(FlowgradeError::Configuration(_))));
    }

    #[test]
    fn test_builder_rejects_bad_temperature() {
        let result = ConfigBuilder::new()
            .judge(JudgeConfig {
                temperature: 3.5,
                max_tokens: 100,
            })
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[evaluation]\nfailure_policy = \"propagate\"\nmax_concurrency = 2\n\n[judge]\ntemperature = 0.2"
        )
        .unwrap();

        let config = FlowgradeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.evaluation.failure_policy, FailurePolicy::Propagate);
        assert_eq!(config.evaluation.max_concurrency, 2);
        assert!((config.judge.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.judge.max_tokens, 2048);
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "judge:\n  max_tokens: 512").unwrap();

        let config = FlowgradeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.judge.max_tokens, 512);
        assert_eq!(config.evaluation.failure_policy, FailurePolicy::Isolate);
    }

    #[test]
    fn test_from_file_invalid_value() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(file, "{{\"evaluation\": {{\"max_concurrency\": 0}}}}").unwrap();

        let result = FlowgradeConfig::from_file(file.path());
        assert!(matches!(result, Err(FlowgradeError::Configuration(_))));
    }

    #[test]
    fn test_load_precedence() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "flowgrade.toml",
                "[evaluation]\nmax_concurrency = 2\n\n[judge]\nmax_tokens = 256",
            )?;
            jail.create_file("override.yaml", "evaluation:\n  max_concurrency: 3")?;
            jail.set_env("FLOWGRADE_CONFIG_PATH", "override.yaml");
            jail.set_env("FLOWGRADE_EVALUATION__FAILURE_POLICY", "propagate");

            let config = FlowgradeConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.evaluation.max_concurrency, 3);
            assert_eq!(config.judge.max_tokens, 256);
            assert_eq!(config.evaluation.failure_policy, FailurePolicy::Propagate);
            assert_eq!(config.judge.temperature, 0.0);
            Ok(())
        });
    }

    #[test]
    fn test_load_env_overrides_files() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("override.json", r#"{"judge": {"max_tokens": 512}}"#)?;
            jail.set_env("FLOWGRADE_CONFIG_PATH", "override.json");
            jail.set_env("FLOWGRADE_JUDGE__MAX_TOKENS", "1024");

            let config = FlowgradeConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.judge.max_tokens, 1024);
            assert_eq!(config.evaluation.max_concurrency, 8);
            Ok(())
        });
    }

    #[test]
    fn test_load_yaml_path_matches_from_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("judge.yaml", "judge:\n  max_tokens: 512")?;
            jail.set_env("FLOWGRADE_CONFIG_PATH", "judge.yaml");

            let loaded = FlowgradeConfig::load().map_err(|e| e.to_string())?;
            let direct = FlowgradeConfig::from_file("judge.yaml").map_err(|e| e.to_string())?;
            assert_eq!(loaded.judge.max_tokens, 512);
            assert_eq!(direct.judge.max_tokens, loaded.judge.max_tokens);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_env_value() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("FLOWGRADE_EVALUATION__MAX_CONCURRENCY", "0");
            assert!(matches!(
                FlowgradeConfig::load(),
                Err(FlowgradeError::Configuration(_))
            ));
            Ok(())
        });
    }

    #[test]
    fn test_from_missing_file() {
        let result = FlowgradeConfig::from_file("/nonexistent/flowgrade.toml");
        assert!(result.is_err());
    }
}
