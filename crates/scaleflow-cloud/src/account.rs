//! Account credentials seam
//!
//! The planner never touches a process-wide credential registry. It receives an
//! [`AccountLookup`] at construction and only sees the capabilities exposed by
//! [`AccountCredentials`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// What the planner needs to know about an account
pub trait AccountCredentials: Send + Sync + fmt::Debug {
    /// Account name as used in deploy requests
    fn name(&self) -> &str;

    /// Provider account id (owner id for images)
    fn account_id(&self) -> &str;

    /// Key pair used when a request does not name one
    fn default_key_pair(&self) -> Option<&str>;

    /// Regions this account may deploy into. Empty means unrestricted.
    fn regions(&self) -> &[String];

    /// Lifecycle hooks attached to every group when the request opts in
    fn lifecycle_hooks(&self) -> &[AccountLifecycleHook];
}

/// Read-only account store
pub trait AccountLookup: Send + Sync {
    fn get_by_name(&self, name: &str) -> Option<Arc<dyn AccountCredentials>>;
}

/// Account-level lifecycle hook, kept in the free-text form it is configured in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLifecycleHook {
    pub role_arn: String,
    pub notification_target_arn: String,
    pub lifecycle_transition: String,
    pub heartbeat_timeout: Option<u32>,
    pub default_result: Option<String>,
}

/// Plain-data account, suitable for config files and tests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticAccount {
    pub name: String,
    pub account_id: String,
    #[serde(default)]
    pub default_key_pair: Option<String>,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub lifecycle_hooks: Vec<AccountLifecycleHook>,
}

impl StaticAccount {
    pub fn new(name: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            account_id: account_id.into(),
            ..Default::default()
        }
    }

    pub fn with_default_key_pair(mut self, key_pair: impl Into<String>) -> Self {
        self.default_key_pair = Some(key_pair.into());
        self
    }

    pub fn with_regions(mut self, regions: Vec<String>) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_lifecycle_hook(mut self, hook: AccountLifecycleHook) -> Self {
        self.lifecycle_hooks.push(hook);
        self
    }
}

impl AccountCredentials for StaticAccount {
    fn name(&self) -> &str {
        &self.name
    }

    fn account_id(&self) -> &str {
        &self.account_id
    }

    fn default_key_pair(&self) -> Option<&str> {
        self.default_key_pair.as_deref()
    }

    fn regions(&self) -> &[String] {
        &self.regions
    }

    fn lifecycle_hooks(&self) -> &[AccountLifecycleHook] {
        &self.lifecycle_hooks
    }
}
