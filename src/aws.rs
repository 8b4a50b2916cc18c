//! CloudFormation-backed stack API
//!
//! Credentials, retries and polling intervals are the SDK's; this module only
//! translates between stackup's request types and the SDK's.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cloudformation::client::Waiters;
use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudformation::types::{Capability as CfnCapability, Parameter as CfnParameter};
use aws_sdk_cloudformation::Client as CfnClient;
use stackup_config::{AwsConfig, Capability};
use stackup_core::{
    ApiError, Parameter, StackApi, StackRequest, StackSummary, TemplateParameter,
    TemplateSummary, WaitTarget,
};
use std::time::Duration;
use tracing::debug;

/// `StackApi` over a CloudFormation client
pub struct CloudFormationApi {
    client: CfnClient,
}

impl CloudFormationApi {
    pub fn new(client: CfnClient) -> Self {
        Self { client }
    }

    /// Build a client from the SDK's default chain, with optional region/profile overrides
    pub async fn from_config(config: &AwsConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }
        let sdk_config = loader.load().await;
        debug!(region = ?sdk_config.region(), "loaded AWS configuration");

        Self::new(CfnClient::new(&sdk_config))
    }
}

#[async_trait]
impl StackApi for CloudFormationApi {
    async fn validate_template(&self, template_url: &str) -> Result<TemplateSummary, ApiError> {
        let output = self
            .client
            .validate_template()
            .template_url(template_url)
            .send()
            .await
            .map_err(|e| sdk_error("ValidateTemplate", e))?;

        let parameters = output
            .parameters()
            .iter()
            .map(|p| TemplateParameter {
                key: p.parameter_key().unwrap_or_default().to_string(),
                default_value: p.default_value().map(str::to_string),
                description: p.description().map(str::to_string),
                no_echo: p.no_echo().unwrap_or(false),
            })
            .collect();

        Ok(TemplateSummary {
            parameters,
            capabilities: output
                .capabilities()
                .iter()
                .map(|c| c.as_str().to_string())
                .collect(),
            capabilities_reason: output.capabilities_reason().map(str::to_string),
        })
    }

    async fn list_stacks(&self) -> Result<Vec<StackSummary>, ApiError> {
        let mut pages = self.client.list_stacks().into_paginator().items().send();

        let mut stacks = Vec::new();
        while let Some(summary) = pages
            .try_next()
            .await
            .map_err(|e| sdk_error("ListStacks", e))?
        {
            stacks.push(StackSummary::new(
                summary.stack_name().unwrap_or_default(),
                summary
                    .stack_status()
                    .map(|s| s.as_str())
                    .unwrap_or_default(),
            ));
        }

        Ok(stacks)
    }

    async fn create_stack(
        &self,
        request: &StackRequest,
        disable_rollback: bool,
    ) -> Result<(), ApiError> {
        self.client
            .create_stack()
            .stack_name(&request.stack_name)
            .template_url(&request.template_url)
            .set_parameters(Some(cfn_parameters(&request.parameters)))
            .set_capabilities(Some(cfn_capabilities(&request.capabilities)))
            .disable_rollback(disable_rollback)
            .send()
            .await
            .map_err(|e| sdk_error("CreateStack", e))?;
        Ok(())
    }

    async fn update_stack(&self, request: &StackRequest) -> Result<(), ApiError> {
        self.client
            .update_stack()
            .stack_name(&request.stack_name)
            .template_url(&request.template_url)
            .set_parameters(Some(cfn_parameters(&request.parameters)))
            .set_capabilities(Some(cfn_capabilities(&request.capabilities)))
            .send()
            .await
            .map_err(|e| sdk_error("UpdateStack", e))?;
        Ok(())
    }

    async fn delete_stack(&self, stack_name: &str) -> Result<(), ApiError> {
        self.client
            .delete_stack()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| sdk_error("DeleteStack", e))?;
        Ok(())
    }

    async fn wait_for(
        &self,
        stack_name: &str,
        target: WaitTarget,
        max_wait: Duration,
    ) -> Result<(), ApiError> {
        let waiter = target.waiter_name();
        debug!(stack_name, waiter, max_wait_secs = max_wait.as_secs(), "waiting");

        match target {
            WaitTarget::CreateComplete => self
                .client
                .wait_until_stack_create_complete()
                .stack_name(stack_name)
                .wait(max_wait)
                .await
                .map(|_| ())
                .map_err(|e| waiter_error(waiter, e)),
            WaitTarget::UpdateComplete => self
                .client
                .wait_until_stack_update_complete()
                .stack_name(stack_name)
                .wait(max_wait)
                .await
                .map(|_| ())
                .map_err(|e| waiter_error(waiter, e)),
            WaitTarget::DeleteComplete => self
                .client
                .wait_until_stack_delete_complete()
                .stack_name(stack_name)
                .wait(max_wait)
                .await
                .map(|_| ())
                .map_err(|e| waiter_error(waiter, e)),
        }
    }
}

fn cfn_parameters(parameters: &[Parameter]) -> Vec<CfnParameter> {
    parameters
        .iter()
        .map(|p| {
            CfnParameter::builder()
                .parameter_key(&p.key)
                .parameter_value(&p.value)
                .set_use_previous_value(p.use_previous_value)
                .build()
        })
        .collect()
}

fn cfn_capabilities(capabilities: &[Capability]) -> Vec<CfnCapability> {
    capabilities
        .iter()
        .map(|c| CfnCapability::from(c.as_str()))
        .collect()
}

/// Service rejections keep their code and message; everything else is transport
fn sdk_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> ApiError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match &err {
        SdkError::ServiceError(service) => {
            let inner = service.err();
            ApiError::service(
                operation,
                inner.code().map(str::to_string),
                inner.message().unwrap_or("unknown service error"),
            )
        }
        _ => ApiError::transport(operation, DisplayErrorContext(&err).to_string()),
    }
}

fn waiter_error<E: std::error::Error>(waiter: &'static str, err: E) -> ApiError {
    ApiError::waiter(waiter, DisplayErrorContext(err).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_omit_use_previous_when_unset() {
        let converted = cfn_parameters(&[
            Parameter {
                key: "Env".into(),
                value: "prod".into(),
                use_previous_value: None,
            },
            Parameter {
                key: "Size".into(),
                value: "2".into(),
                use_previous_value: Some(true),
            },
        ]);

        assert_eq!(converted[0].parameter_key(), Some("Env"));
        assert_eq!(converted[0].parameter_value(), Some("prod"));
        assert_eq!(converted[0].use_previous_value(), None);
        assert_eq!(converted[1].use_previous_value(), Some(true));
    }

    #[test]
    fn capabilities_map_to_api_names() {
        let converted = cfn_capabilities(&[
            Capability::Iam,
            Capability::NamedIam,
            Capability::AutoExpand,
        ]);
        assert_eq!(
            converted,
            vec![
                CfnCapability::CapabilityIam,
                CfnCapability::CapabilityNamedIam,
                CfnCapability::CapabilityAutoExpand,
            ]
        );
    }
}
