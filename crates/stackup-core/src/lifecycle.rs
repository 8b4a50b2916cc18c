//! Create, update and delete
//!
//! Each operation issues a single mutation and hands back a [`StackWaiter`];
//! the mutation returns as soon as the service accepts it, and completion is
//! observed separately by waiting on the handle.

use crate::api::{StackApi, StackRequest, WaitTarget};
use crate::error::ApiError;
use std::time::Duration;
use tracing::info;

/// Handle that blocks until a stack reaches the operation's terminal state
#[must_use = "a stack operation is only observed by waiting on its handle"]
pub struct StackWaiter<'a> {
    api: &'a dyn StackApi,
    stack_name: String,
    target: WaitTarget,
}

impl<'a> StackWaiter<'a> {
    pub fn new(api: &'a dyn StackApi, stack_name: impl Into<String>, target: WaitTarget) -> Self {
        Self {
            api,
            stack_name: stack_name.into(),
            target,
        }
    }

    pub fn stack_name(&self) -> &str {
        &self.stack_name
    }

    pub fn target(&self) -> WaitTarget {
        self.target
    }

    /// Poll until success, a failure state, or `max_wait`
    pub async fn wait(self, max_wait: Duration) -> Result<(), ApiError> {
        self.api
            .wait_for(&self.stack_name, self.target, max_wait)
            .await
    }
}

impl std::fmt::Debug for StackWaiter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StackWaiter")
            .field("stack_name", &self.stack_name)
            .field("target", &self.target)
            .finish()
    }
}

/// Start a stack creation with the request's capability grants
pub async fn create_stack<'a>(
    api: &'a dyn StackApi,
    request: &StackRequest,
    disable_rollback: bool,
) -> Result<StackWaiter<'a>, ApiError> {
    info!("Creating {}", request.stack_name);
    api.create_stack(request, disable_rollback).await?;
    Ok(StackWaiter::new(
        api,
        request.stack_name.as_str(),
        WaitTarget::CreateComplete,
    ))
}

/// Start an update of an existing stack
pub async fn update_stack<'a>(
    api: &'a dyn StackApi,
    request: &StackRequest,
) -> Result<StackWaiter<'a>, ApiError> {
    info!("Updating {}", request.stack_name);
    api.update_stack(request).await?;
    Ok(StackWaiter::new(
        api,
        request.stack_name.as_str(),
        WaitTarget::UpdateComplete,
    ))
}

/// Start deleting a stack
pub async fn delete_stack<'a>(
    api: &'a dyn StackApi,
    stack_name: &str,
) -> Result<StackWaiter<'a>, ApiError> {
    info!("Deleting {}", stack_name);
    api.delete_stack(stack_name).await?;
    Ok(StackWaiter::new(api, stack_name, WaitTarget::DeleteComplete))
}
