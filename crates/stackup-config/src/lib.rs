// stackup-config - Layered configuration for stack deployments
//
// Supports configuration from multiple sources:
// 1. Command-line flags (applied by the binary, highest priority)
// 2. Environment variables (STACKUP_* prefix)
// 3. Config file path from STACKUP_CONFIG env var
// 4. Config file contents from STACKUP_CONFIG_CONTENT env var
// 5. Default config file locations (./stackup.toml, ./.stackup.toml)
// 6. Built-in defaults (lowest priority)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

mod env_overrides;
mod sources;
mod validation;

pub use env_overrides::{apply_env_overrides, EnvSource, ENV_PREFIX};

/// Main runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub deploy: DeployConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub aws: AwsConfig,
}

/// How create/update/delete calls are issued
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployConfig {
    #[serde(default)]
    pub policy: DeployPolicy,

    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<Capability>,

    /// Leave a failed creation in place instead of rolling it back
    #[serde(default = "default_disable_rollback")]
    pub disable_rollback: bool,

    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
}

fn default_capabilities() -> Vec<Capability> {
    vec![Capability::Iam, Capability::NamedIam, Capability::AutoExpand]
}

fn default_disable_rollback() -> bool {
    true
}

// Classic CloudFormation waiters: 120 attempts x 30s
fn default_wait_timeout_secs() -> u64 {
    3600
}

impl DeployConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            policy: DeployPolicy::default(),
            capabilities: default_capabilities(),
            disable_rollback: default_disable_rollback(),
            wait_timeout_secs: default_wait_timeout_secs(),
        }
    }
}

/// What to do when the target stack already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployPolicy {
    /// Delete the existing stack, wait for the deletion, then create it again
    #[default]
    Replace,
    /// Update the existing stack in place
    Update,
}

impl std::fmt::Display for DeployPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeployPolicy::Replace => write!(f, "replace"),
            DeployPolicy::Update => write!(f, "update"),
        }
    }
}

impl std::str::FromStr for DeployPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "replace" | "force" | "recreate" => Ok(DeployPolicy::Replace),
            "update" => Ok(DeployPolicy::Update),
            _ => anyhow::bail!("Unsupported deploy policy: {}. Supported: replace, update", s),
        }
    }
}

/// Capability acknowledgements sent with create and update requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    #[serde(rename = "CAPABILITY_IAM")]
    Iam,
    #[serde(rename = "CAPABILITY_NAMED_IAM")]
    NamedIam,
    #[serde(rename = "CAPABILITY_AUTO_EXPAND")]
    AutoExpand,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Iam => "CAPABILITY_IAM",
            Capability::NamedIam => "CAPABILITY_NAMED_IAM",
            Capability::AutoExpand => "CAPABILITY_AUTO_EXPAND",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Capability {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_uppercase();
        let name = normalized
            .strip_prefix("CAPABILITY_")
            .unwrap_or(&normalized);
        match name {
            "IAM" => Ok(Capability::Iam),
            "NAMED_IAM" => Ok(Capability::NamedIam),
            "AUTO_EXPAND" => Ok(Capability::AutoExpand),
            _ => anyhow::bail!(
                "Unsupported capability: {}. Supported: CAPABILITY_IAM, CAPABILITY_NAMED_IAM, CAPABILITY_AUTO_EXPAND",
                s
            ),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// File receiving ERROR-level events, created on the first error
    #[serde(default = "default_error_log")]
    pub error_log: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_error_log() -> String {
    "error.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            error_log: default_error_log(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// AWS client settings; anything unset is left to the SDK's default chain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AwsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

impl RuntimeConfig {
    /// Load configuration from all sources with priority
    pub fn load() -> Result<Self> {
        sources::load_config()
    }

    /// Load configuration from a specific file path (for CLI --config flag)
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        sources::load_from_file_path(path)
    }

    /// Parse a TOML document, filling unset fields with defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}
