// Deployment orchestration
//
// Linear flow, no branching back:
// 1. Validate the template (stop on rejection, nothing else is called)
// 2. Decode the parameters
// 3. Replace policy: delete a live stack of the same name and wait for it
// 4. Update when the stack (still) exists, create otherwise
// 5. Wait for the terminal state; "No updates are to be performed." is a no-op

use crate::api::{StackApi, StackRequest};
use crate::error::{Result, StackError};
use crate::inspect::stack_exists;
use crate::lifecycle::{create_stack, delete_stack, update_stack};
use crate::parameters::{parse_parameters, Parameter};
use crate::validate::{validate_template, TemplateCheck};
use stackup_config::{DeployConfig, DeployPolicy};
use tracing::info;

/// One invocation's worth of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    pub stack_name: String,
    pub template_url: String,
    /// Query-string encoded parameters, e.g. `Env=prod&Size=2`
    pub params: String,
    /// `None` when the operator did not ask about previous values at all
    pub use_previous: Option<bool>,
}

/// How a run ended, when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new stack was created; `replaced` is set when an old one was deleted first
    Created { replaced: bool },
    Updated,
    /// The update was rejected because nothing would change
    NoChanges,
    /// The service refused the template; no stack call was made
    TemplateRejected { reason: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::TemplateRejected { .. })
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Created { replaced: false } => write!(f, "created"),
            Outcome::Created { replaced: true } => write!(f, "replaced"),
            Outcome::Updated => write!(f, "updated"),
            Outcome::NoChanges => write!(f, "no changes"),
            Outcome::TemplateRejected { reason } => write!(f, "template rejected: {}", reason),
        }
    }
}

/// Runs deployments against a stack API under one deploy configuration
pub struct Deployer<'a> {
    api: &'a dyn StackApi,
    config: &'a DeployConfig,
}

impl<'a> Deployer<'a> {
    pub fn new(api: &'a dyn StackApi, config: &'a DeployConfig) -> Self {
        Self { api, config }
    }

    pub async fn run(&self, request: &DeployRequest) -> Result<Outcome> {
        info!("Processing stack {}", request.stack_name);

        if let TemplateCheck::Rejected { reason } =
            validate_template(self.api, &request.template_url).await?
        {
            return Ok(Outcome::TemplateRejected { reason });
        }

        let parameters = parse_parameters(&request.params, request.use_previous)?;
        info!("Parameters: [{}]", describe(&parameters));

        let stack_request = StackRequest {
            stack_name: request.stack_name.clone(),
            template_url: request.template_url.clone(),
            parameters,
            capabilities: self.config.capabilities.clone(),
        };

        match self.apply(&stack_request).await {
            Err(StackError::Api(err)) if err.is_no_updates() => {
                info!("No changes");
                Ok(Outcome::NoChanges)
            }
            result => result,
        }
    }

    async fn apply(&self, request: &StackRequest) -> Result<Outcome> {
        let name = request.stack_name.as_str();
        let max_wait = self.config.wait_timeout();

        let mut replaced = false;
        if self.config.policy == DeployPolicy::Replace && stack_exists(self.api, name).await? {
            delete_stack(self.api, name).await?.wait(max_wait).await?;
            replaced = true;
        }

        let (waiter, outcome) = if stack_exists(self.api, name).await? {
            (update_stack(self.api, request).await?, Outcome::Updated)
        } else {
            let waiter = create_stack(self.api, request, self.config.disable_rollback).await?;
            (waiter, Outcome::Created { replaced })
        };

        info!("...waiting for stack to be ready...");
        waiter.wait(max_wait).await?;
        info!("Stack {} {}", name, outcome);
        Ok(outcome)
    }
}

fn describe(parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .map(Parameter::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
