// Configuration validation
//
// Validates that values are sensible before any remote call is made

use crate::*;
use anyhow::{bail, Result};
use tracing::warn;

const LONG_WAIT_SECS: u64 = 4 * 60 * 60;

pub fn validate_config(config: &RuntimeConfig) -> Result<()> {
    validate_deploy_config(&config.deploy)?;
    validate_logging_config(&config.logging)?;
    validate_aws_config(&config.aws)?;
    Ok(())
}

fn validate_deploy_config(config: &DeployConfig) -> Result<()> {
    if config.wait_timeout_secs == 0 {
        bail!("deploy.wait_timeout_secs must be greater than 0");
    }

    for (i, capability) in config.capabilities.iter().enumerate() {
        if config.capabilities[..i].contains(capability) {
            bail!("deploy.capabilities lists {} more than once", capability);
        }
    }

    if config.wait_timeout_secs > LONG_WAIT_SECS {
        warn!(
            wait_timeout_secs = config.wait_timeout_secs,
            "deploy.wait_timeout_secs is very long; an interrupted run leaves the stack operation running"
        );
    }

    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    if config.level.trim().is_empty() {
        bail!("logging.level cannot be empty");
    }

    if config.error_log.trim().is_empty() {
        bail!("logging.error_log cannot be empty");
    }

    Ok(())
}

fn validate_aws_config(config: &AwsConfig) -> Result<()> {
    if matches!(config.region.as_deref(), Some(region) if region.trim().is_empty()) {
        bail!("aws.region cannot be empty when set");
    }

    if matches!(config.profile.as_deref(), Some(profile) if profile.trim().is_empty()) {
        bail!("aws.profile cannot be empty when set");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&RuntimeConfig::default()).is_ok());
    }

    #[test]
    fn zero_wait_timeout_is_rejected() {
        let mut config = RuntimeConfig::default();
        config.deploy.wait_timeout_secs = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("wait_timeout_secs"));
    }

    #[test]
    fn duplicate_capabilities_are_rejected() {
        let mut config = RuntimeConfig::default();
        config.deploy.capabilities = vec![Capability::Iam, Capability::Iam];
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("CAPABILITY_IAM"));
    }

    #[test]
    fn no_capabilities_is_allowed() {
        let mut config = RuntimeConfig::default();
        config.deploy.capabilities.clear();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn blank_logging_and_aws_values_are_rejected() {
        let mut config = RuntimeConfig::default();
        config.logging.error_log = "  ".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = RuntimeConfig::default();
        config.logging.level = String::new();
        assert!(validate_config(&config).is_err());

        let mut config = RuntimeConfig::default();
        config.aws.region = Some(String::new());
        assert!(validate_config(&config).is_err());
    }
}
