use anyhow::{Context, Result};
use clap::Parser;
use stackup_config::{DeployPolicy, RuntimeConfig};
use stackup_core::{DeployRequest, Outcome};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Create, replace, or update a CloudFormation stack from a remote template
#[derive(Parser, Debug)]
#[command(name = "stackup")]
#[command(version)]
#[command(about = "Create, replace, or update a CloudFormation stack from a remote template", long_about = None)]
struct Cli {
    /// Name of the stack to create
    #[arg(long, value_name = "NAME")]
    name: String,

    /// URL the stack template is fetched from
    #[arg(long = "templateurl", value_name = "URL")]
    template_url: String,

    /// Stack parameters as a query string, e.g. "Env=prod&Size=2"
    #[arg(long, value_name = "QUERY")]
    params: String,

    /// Ask the service to keep each parameter's existing value
    #[arg(
        long = "usepreviousparam",
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    use_previous_param: Option<bool>,

    /// What to do with an existing stack: replace or update (overrides config file)
    #[arg(long, value_name = "POLICY")]
    policy: Option<DeployPolicy>,

    /// AWS region (defaults to the SDK's provider chain)
    #[arg(long, value_name = "REGION")]
    region: Option<String>,

    /// AWS shared config profile
    #[arg(long, value_name = "PROFILE")]
    profile: Option<String>,

    /// Maximum seconds to wait for each stack operation
    #[arg(long, value_name = "SECS")]
    wait_timeout: Option<u64>,

    /// Roll back a failed creation instead of keeping it for inspection
    #[arg(long)]
    rollback_on_failure: bool,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// File that receives ERROR-level log lines
    #[arg(long, value_name = "FILE")]
    error_log: Option<PathBuf>,
}

impl Cli {
    fn deploy_request(&self) -> DeployRequest {
        DeployRequest {
            stack_name: self.name.clone(),
            template_url: self.template_url.clone(),
            params: self.params.clone(),
            use_previous: self.use_previous_param,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let _logging = stackup::init_tracing(&config.logging);

    let request = cli.deploy_request();
    let outcome = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?
        .block_on(stackup::run(&config, &request))
        .inspect_err(|e| error!("{:#}", e))?;

    Ok(exit_code(&outcome))
}

fn load_config(cli: &Cli) -> Result<RuntimeConfig> {
    let mut config = if let Some(config_path) = &cli.config {
        RuntimeConfig::load_from_path(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        RuntimeConfig::load().context("Failed to load configuration")?
    };

    apply_cli_overrides(&mut config, cli);
    config.validate().context("Invalid configuration")?;

    Ok(config)
}

fn apply_cli_overrides(config: &mut RuntimeConfig, cli: &Cli) {
    if let Some(policy) = cli.policy {
        config.deploy.policy = policy;
    }
    if let Some(secs) = cli.wait_timeout {
        config.deploy.wait_timeout_secs = secs;
    }
    if cli.rollback_on_failure {
        config.deploy.disable_rollback = false;
    }
    if let Some(region) = &cli.region {
        config.aws.region = Some(region.clone());
    }
    if let Some(profile) = &cli.profile {
        config.aws.profile = Some(profile.clone());
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(path) = &cli.error_log {
        config.logging.error_log = path.to_string_lossy().into_owned();
    }
}

fn exit_code(outcome: &Outcome) -> ExitCode {
    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
