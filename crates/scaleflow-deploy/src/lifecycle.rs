//! Lifecycle hook assembly

use crate::error::{DeployError, Result};
use scaleflow_cloud::{AccountLifecycleHook, DefaultResult, LifecycleHook, LifecycleTransition};

/// Translate an account-level hook into the typed form
pub fn from_account_hook(hook: &AccountLifecycleHook) -> Result<LifecycleHook> {
    let lifecycle_transition = LifecycleTransition::parse(&hook.lifecycle_transition)
        .ok_or_else(|| {
            DeployError::Argument(format!(
                "unknown lifecycle transition: {}",
                hook.lifecycle_transition
            ))
        })?;

    let default_result = hook
        .default_result
        .as_deref()
        .map(|raw| {
            DefaultResult::parse(raw).ok_or_else(|| {
                DeployError::Argument(format!("unknown lifecycle default result: {}", raw))
            })
        })
        .transpose()?;

    Ok(LifecycleHook {
        role_arn: hook.role_arn.clone(),
        notification_target_arn: hook.notification_target_arn.clone(),
        lifecycle_transition,
        heartbeat_timeout: hook.heartbeat_timeout,
        default_result,
    })
}

/// Explicit hooks followed by the account's hooks when `include_account` is set
pub fn lifecycle_hooks(
    explicit: &[LifecycleHook],
    account_hooks: &[AccountLifecycleHook],
    include_account: bool,
) -> Result<Vec<LifecycleHook>> {
    let mut hooks = explicit.to_vec();
    if include_account {
        for hook in account_hooks {
            hooks.push(from_account_hook(hook)?);
        }
    }
    Ok(hooks)
}
