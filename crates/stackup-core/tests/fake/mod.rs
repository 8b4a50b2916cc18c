//! In-memory stack API for exercising stackup-core without AWS
//!
//! Keeps a stack listing that mutations and waits move through realistic
//! statuses, and records every call so tests can assert on the sequence.

#![allow(dead_code)]

use async_trait::async_trait;
use stackup_config::Capability;
use stackup_core::{
    ApiError, Parameter, StackApi, StackRequest, StackStatus, StackSummary, TemplateParameter,
    TemplateSummary, WaitTarget,
};
use std::sync::Mutex;
use std::time::Duration;

/// A recorded call against the fake
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Validate(String),
    List,
    Create {
        name: String,
        template_url: String,
        parameters: Vec<Parameter>,
        capabilities: Vec<Capability>,
        disable_rollback: bool,
    },
    Update {
        name: String,
        parameters: Vec<Parameter>,
    },
    Delete(String),
    Wait {
        name: String,
        target: WaitTarget,
        max_wait: Duration,
    },
}

#[derive(Default)]
pub struct FakeCloudFormation {
    stacks: Mutex<Vec<StackSummary>>,
    calls: Mutex<Vec<Call>>,
    template_error: Option<ApiError>,
    create_error: Option<ApiError>,
    update_error: Option<ApiError>,
    wait_error: Option<ApiError>,
}

impl FakeCloudFormation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stack(self, name: &str, status: &str) -> Self {
        self.stacks
            .lock()
            .unwrap()
            .push(StackSummary::new(name, status));
        self
    }

    pub fn rejecting_template(mut self, reason: &str) -> Self {
        self.template_error = Some(ApiError::service(
            "ValidateTemplate",
            Some("ValidationError".into()),
            reason,
        ));
        self
    }

    pub fn failing_validation_transport(mut self) -> Self {
        self.template_error = Some(ApiError::transport(
            "ValidateTemplate",
            "dispatch failure: connection refused",
        ));
        self
    }

    pub fn failing_create(mut self, err: ApiError) -> Self {
        self.create_error = Some(err);
        self
    }

    pub fn failing_update(mut self, err: ApiError) -> Self {
        self.update_error = Some(err);
        self
    }

    pub fn failing_wait(mut self, err: ApiError) -> Self {
        self.wait_error = Some(err);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn status_of(&self, name: &str) -> Option<StackStatus> {
        self.stacks
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|s| s.name == name)
            .map(|s| s.status.clone())
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn set_status(&self, name: &str, status: &str) {
        let mut stacks = self.stacks.lock().unwrap();
        if let Some(stack) = stacks
            .iter_mut()
            .rev()
            .find(|s| s.name == name && !s.status.is_delete_complete())
        {
            stack.status = StackStatus::from(status);
        }
    }
}

#[async_trait]
impl StackApi for FakeCloudFormation {
    async fn validate_template(&self, template_url: &str) -> Result<TemplateSummary, ApiError> {
        self.record(Call::Validate(template_url.to_string()));
        if let Some(err) = &self.template_error {
            return Err(err.clone());
        }
        Ok(TemplateSummary {
            parameters: vec![
                TemplateParameter {
                    key: "Env".into(),
                    ..Default::default()
                },
                TemplateParameter {
                    key: "Size".into(),
                    default_value: Some("1".into()),
                    ..Default::default()
                },
            ],
            capabilities: vec!["CAPABILITY_IAM".into()],
            capabilities_reason: Some(
                "The following resource(s) require capabilities: [AWS::IAM::Role]".into(),
            ),
        })
    }

    async fn list_stacks(&self) -> Result<Vec<StackSummary>, ApiError> {
        self.record(Call::List);
        Ok(self.stacks.lock().unwrap().clone())
    }

    async fn create_stack(
        &self,
        request: &StackRequest,
        disable_rollback: bool,
    ) -> Result<(), ApiError> {
        self.record(Call::Create {
            name: request.stack_name.clone(),
            template_url: request.template_url.clone(),
            parameters: request.parameters.clone(),
            capabilities: request.capabilities.clone(),
            disable_rollback,
        });
        if let Some(err) = &self.create_error {
            return Err(err.clone());
        }
        self.stacks
            .lock()
            .unwrap()
            .push(StackSummary::new(request.stack_name.as_str(), "CREATE_IN_PROGRESS"));
        Ok(())
    }

    async fn update_stack(&self, request: &StackRequest) -> Result<(), ApiError> {
        self.record(Call::Update {
            name: request.stack_name.clone(),
            parameters: request.parameters.clone(),
        });
        if let Some(err) = &self.update_error {
            return Err(err.clone());
        }
        self.set_status(&request.stack_name, "UPDATE_IN_PROGRESS");
        Ok(())
    }

    async fn delete_stack(&self, stack_name: &str) -> Result<(), ApiError> {
        self.record(Call::Delete(stack_name.to_string()));
        self.set_status(stack_name, "DELETE_IN_PROGRESS");
        Ok(())
    }

    async fn wait_for(
        &self,
        stack_name: &str,
        target: WaitTarget,
        max_wait: Duration,
    ) -> Result<(), ApiError> {
        self.record(Call::Wait {
            name: stack_name.to_string(),
            target,
            max_wait,
        });
        if let Some(err) = &self.wait_error {
            return Err(err.clone());
        }
        let status = match target {
            WaitTarget::CreateComplete => "CREATE_COMPLETE",
            WaitTarget::UpdateComplete => "UPDATE_COMPLETE",
            WaitTarget::DeleteComplete => "DELETE_COMPLETE",
        };
        self.set_status(stack_name, status);
        Ok(())
    }
}
