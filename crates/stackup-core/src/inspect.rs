use crate::api::{StackApi, StackSummary};
use crate::error::ApiError;
use tracing::debug;

/// Whether a live (not fully deleted) stack named `stack_name` exists.
///
/// Re-lists every stack on each call.
pub async fn stack_exists(api: &dyn StackApi, stack_name: &str) -> Result<bool, ApiError> {
    let stacks = api.list_stacks().await?;
    let exists = find_live_stack(&stacks, stack_name).is_some();
    debug!(
        stack_name,
        listed = stacks.len(),
        exists,
        "checked stack existence"
    );
    Ok(exists)
}

/// First listed stack with this exact name whose status is not DELETE_COMPLETE
pub fn find_live_stack<'a>(
    stacks: &'a [StackSummary],
    stack_name: &str,
) -> Option<&'a StackSummary> {
    stacks
        .iter()
        .filter(|s| !s.status.is_delete_complete())
        .find(|s| s.name == stack_name)
}
