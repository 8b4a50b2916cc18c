// stackup - Create, replace, or update a CloudFormation stack
//
// The binary parses flags and resolves configuration; this library wires the
// resolved configuration to a CloudFormation client and runs the deployment.

pub mod aws;
mod init;

use anyhow::Result;
use stackup_config::RuntimeConfig;
use stackup_core::{DeployRequest, Deployer, Outcome};

pub use aws::CloudFormationApi;
pub use init::{build_subscriber, init_tracing, ErrorLogFile};

/// Deploy one stack against the real service
pub async fn run(config: &RuntimeConfig, request: &DeployRequest) -> Result<Outcome> {
    let api = CloudFormationApi::from_config(&config.aws).await;
    let outcome = Deployer::new(&api, &config.deploy).run(request).await?;
    Ok(outcome)
}
