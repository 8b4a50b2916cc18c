use crate::{Capability, DeployPolicy, LogFormat, RuntimeConfig};
use anyhow::{anyhow, Context, Result};

pub const ENV_PREFIX: &str = "STACKUP_";

/// Abstraction over environment-variable lookups so overrides can be
/// exercised without touching the process environment.
pub trait EnvSource {
    /// Get a variable by its suffix; implementations add the STACKUP_ prefix
    fn get(&self, key: &str) -> Option<String>;
}

/// Apply environment-variable overrides on top of file/default configuration.
pub fn apply_env_overrides<E: EnvSource>(config: &mut RuntimeConfig, env: &E) -> Result<()> {
    // Deploy behaviour
    if let Some(policy) = get_env_string(env, "DEPLOY_POLICY") {
        config.deploy.policy = policy
            .parse::<DeployPolicy>()
            .context("Invalid STACKUP_DEPLOY_POLICY value")?;
    }
    if let Some(list) = get_env_string(env, "CAPABILITIES") {
        config.deploy.capabilities = parse_capabilities(&list)
            .context("Invalid STACKUP_CAPABILITIES value")?;
    }
    if let Some(val) = get_env_bool(env, "DISABLE_ROLLBACK")? {
        config.deploy.disable_rollback = val;
    }
    if let Some(val) = get_env_u64(env, "WAIT_TIMEOUT_SECS")? {
        config.deploy.wait_timeout_secs = val;
    }

    // Logging (level, format, error file)
    if let Some(level) = get_env_string(env, "LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT") {
        config.logging.format = match format.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };
    }
    if let Some(path) = get_env_string(env, "ERROR_LOG") {
        config.logging.error_log = path;
    }

    // AWS client
    if let Some(region) = get_env_string(env, "REGION") {
        config.aws.region = Some(region);
    }
    if let Some(profile) = get_env_string(env, "PROFILE") {
        config.aws.profile = Some(profile);
    }

    Ok(())
}

/// Parse a comma-separated capability list; blank entries are ignored
pub(crate) fn parse_capabilities(list: &str) -> Result<Vec<Capability>> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::parse::<Capability>)
        .collect()
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get(key)
}

fn get_env_u64<E: EnvSource>(env: &E, key: &str) -> Result<Option<u64>> {
    match get_env_string(env, key) {
        Some(val) => {
            let parsed = val
                .parse::<u64>()
                .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

fn get_env_bool<E: EnvSource>(env: &E, key: &str) -> Result<Option<bool>> {
    match get_env_string(env, key) {
        Some(val) => {
            let parsed = val.parse::<bool>().map_err(|e| {
                anyhow!(
                    "Failed to parse {}{} (expected bool): {}",
                    ENV_PREFIX,
                    key,
                    e
                )
            })?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}
