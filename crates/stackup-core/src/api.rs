// Remote stack API seam
//
// Everything stackup asks of CloudFormation goes through `StackApi`:
// - the AWS SDK client implements it in the binary crate
// - tests implement it with in-memory doubles

use crate::error::ApiError;
use crate::parameters::Parameter;
use async_trait::async_trait;
use stackup_config::Capability;
use std::time::Duration;

const DELETE_COMPLETE: &str = "DELETE_COMPLETE";

/// Remote stack status, reduced to the one terminal state stackup cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackStatus {
    /// The stack is gone; its name may be reused
    DeleteComplete,
    /// Any other status (complete, in progress, failed), kept verbatim
    Other(String),
}

impl StackStatus {
    pub fn is_delete_complete(&self) -> bool {
        matches!(self, StackStatus::DeleteComplete)
    }
}

impl From<&str> for StackStatus {
    fn from(status: &str) -> Self {
        if status == DELETE_COMPLETE {
            StackStatus::DeleteComplete
        } else {
            StackStatus::Other(status.to_string())
        }
    }
}

impl std::fmt::Display for StackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StackStatus::DeleteComplete => f.write_str(DELETE_COMPLETE),
            StackStatus::Other(status) => f.write_str(status),
        }
    }
}

/// One entry of the stack listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSummary {
    pub name: String,
    pub status: StackStatus,
}

impl StackSummary {
    pub fn new(name: impl Into<String>, status: impl Into<StackStatus>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
        }
    }
}

/// A parameter declared by a template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateParameter {
    pub key: String,
    pub default_value: Option<String>,
    pub description: Option<String>,
    pub no_echo: bool,
}

/// What a successful template validation reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSummary {
    pub parameters: Vec<TemplateParameter>,
    /// Capabilities the template needs acknowledged, as reported by the API
    pub capabilities: Vec<String>,
    pub capabilities_reason: Option<String>,
}

impl TemplateSummary {
    pub fn parameter_keys(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.key.as_str()).collect()
    }
}

/// Inputs shared by create and update requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackRequest {
    pub stack_name: String,
    pub template_url: String,
    pub parameters: Vec<Parameter>,
    pub capabilities: Vec<Capability>,
}

/// Terminal condition a waiter blocks on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitTarget {
    CreateComplete,
    UpdateComplete,
    DeleteComplete,
}

impl WaitTarget {
    /// Waiter name as the API documents it
    pub fn waiter_name(&self) -> &'static str {
        match self {
            WaitTarget::CreateComplete => "StackCreateComplete",
            WaitTarget::UpdateComplete => "StackUpdateComplete",
            WaitTarget::DeleteComplete => "StackDeleteComplete",
        }
    }
}

impl std::fmt::Display for WaitTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.waiter_name())
    }
}

/// Remote operations consumed by stackup
#[async_trait]
pub trait StackApi: Send + Sync {
    /// Ask the service whether the template at `template_url` is acceptable
    async fn validate_template(&self, template_url: &str) -> Result<TemplateSummary, ApiError>;

    /// List every stack the service knows about, deleted ones included
    async fn list_stacks(&self) -> Result<Vec<StackSummary>, ApiError>;

    /// Start creating a stack; `disable_rollback` keeps a failed creation in place
    async fn create_stack(
        &self,
        request: &StackRequest,
        disable_rollback: bool,
    ) -> Result<(), ApiError>;

    /// Start updating an existing stack
    async fn update_stack(&self, request: &StackRequest) -> Result<(), ApiError>;

    /// Start deleting a stack
    async fn delete_stack(&self, stack_name: &str) -> Result<(), ApiError>;

    /// Block until `stack_name` reaches `target`, a failure state, or `max_wait` elapses
    async fn wait_for(
        &self,
        stack_name: &str,
        target: WaitTarget,
        max_wait: Duration,
    ) -> Result<(), ApiError>;
}
