//! Worker collaborators invoked by the planner
//!
//! Each worker performs mutating provider calls and blocks until the provider
//! reports a terminal state.

use crate::account::AccountCredentials;
use crate::error::Result;
use crate::lifecycle::LifecycleHook;
use crate::spec::ProvisionSpec;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Creates the auto-scaling group described by a spec
#[async_trait]
pub trait ProvisioningWorker: Send + Sync {
    /// Returns the new group's name
    async fn create_group(
        &self,
        account: &dyn AccountCredentials,
        spec: &ProvisionSpec,
    ) -> Result<String>;
}

/// Source and target of a reference copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceCopyRequest {
    pub source_account: String,
    pub source_region: String,
    pub source_asg_name: String,
    pub target_account: String,
    pub target_region: String,
    pub target_asg_name: String,
}

/// Copies scaling artifacts from one group to another
#[async_trait]
pub trait ReferenceCopier: Send + Sync {
    /// Copies scaling policies along with their alarms
    async fn copy_scaling_policies(&self, request: &ReferenceCopyRequest) -> Result<()>;

    async fn copy_scheduled_actions(&self, request: &ReferenceCopyRequest) -> Result<()>;
}

/// Attaches lifecycle hooks to an existing group
#[async_trait]
pub trait LifecycleHookWorker: Send + Sync {
    async fn attach_hooks(
        &self,
        account: &dyn AccountCredentials,
        region: &str,
        asg_name: &str,
        hooks: &[LifecycleHook],
    ) -> Result<()>;
}
