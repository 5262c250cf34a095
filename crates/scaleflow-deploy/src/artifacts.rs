//! Post-creation artifact copying

use crate::error::Result;
use crate::source::SourceSnapshot;
use scaleflow_cloud::{
    AccountCredentials, LifecycleHook, LifecycleHookWorker, ReferenceCopier, ReferenceCopyRequest,
};

/// Copies scaling artifacts from the source group and attaches lifecycle hooks
/// once a group exists
pub struct PostCreationArtifactCopier<'a> {
    copier: &'a dyn ReferenceCopier,
    hooks: &'a dyn LifecycleHookWorker,
}

impl<'a> PostCreationArtifactCopier<'a> {
    pub fn new(copier: &'a dyn ReferenceCopier, hooks: &'a dyn LifecycleHookWorker) -> Self {
        Self { copier, hooks }
    }

    /// Copy scaling policies (with alarms) and scheduled actions from the source group.
    /// Does nothing without a source.
    pub async fn copy_policies_and_schedules(
        &self,
        source: Option<&SourceSnapshot>,
        target_account: &dyn AccountCredentials,
        target_region: &str,
        target_asg_name: &str,
    ) -> Result<bool> {
        let Some(source) = source else {
            tracing::debug!(target_asg_name, "No source group, skipping policy copy");
            return Ok(false);
        };

        let request = ReferenceCopyRequest {
            source_account: source.account.clone(),
            source_region: source.region.clone(),
            source_asg_name: source.asg_name.clone(),
            target_account: target_account.name().to_string(),
            target_region: target_region.to_string(),
            target_asg_name: target_asg_name.to_string(),
        };
        self.copier.copy_scaling_policies(&request).await?;
        self.copier.copy_scheduled_actions(&request).await?;
        Ok(true)
    }

    /// Attach hooks to the group. Does nothing for an empty list.
    pub async fn attach_lifecycle_hooks(
        &self,
        account: &dyn AccountCredentials,
        region: &str,
        asg_name: &str,
        hooks: &[LifecycleHook],
    ) -> Result<bool> {
        if hooks.is_empty() {
            return Ok(false);
        }
        self.hooks
            .attach_hooks(account, region, asg_name, hooks)
            .await?;
        Ok(true)
    }
}
