//! Region-scoped provider client trait definition

use crate::account::AccountCredentials;
use crate::error::Result;
use crate::resource::{
    AutoScalingGroup, ClassicLinkVpc, Image, LaunchConfiguration, LoadBalancer, SecurityGroup,
    TargetGroup,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Read-only provider queries for one account in one region
///
/// Implementations wrap the provider SDK. Transport retries, pagination and
/// auth are their concern; the planner only issues these calls in sequence.
#[async_trait]
pub trait RegionClient: Send + Sync {
    /// Returns the region this client is bound to
    fn region(&self) -> &str;

    async fn describe_images(&self, query: &ImageQuery) -> Result<Vec<Image>>;

    async fn describe_security_groups(
        &self,
        filter: &SecurityGroupFilter,
    ) -> Result<Vec<SecurityGroup>>;

    async fn describe_classic_link_vpcs(&self) -> Result<Vec<ClassicLinkVpc>>;

    /// Returns `None` when no group with this name exists
    async fn describe_auto_scaling_group(&self, name: &str) -> Result<Option<AutoScalingGroup>>;

    /// Returns `None` when no launch configuration with this name exists
    async fn get_launch_configuration(&self, name: &str) -> Result<Option<LaunchConfiguration>>;

    /// Returns only the load balancers that exist; missing names are omitted
    async fn describe_load_balancers(&self, names: &[String]) -> Result<Vec<LoadBalancer>>;

    /// Returns only the target groups that exist; missing names are omitted
    async fn describe_target_groups(&self, names: &[String]) -> Result<Vec<TargetGroup>>;
}

/// Hands out region-scoped clients for an account
pub trait ProviderFactory: Send + Sync {
    fn region_client(&self, account: &dyn AccountCredentials, region: &str)
    -> Arc<dyn RegionClient>;
}

/// Image lookup criteria
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageQuery {
    /// Exact image id
    ById(String),

    /// Image name, optionally narrowed to an owner or to images the given
    /// account may launch
    ByName {
        name: String,
        owner: Option<String>,
        executable_by: Option<String>,
    },
}

impl ImageQuery {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self::ByName {
            name: name.into(),
            owner: None,
            executable_by: None,
        }
    }

    pub fn owned_by(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self::ByName {
            name: name.into(),
            owner: Some(owner.into()),
            executable_by: None,
        }
    }

    pub fn executable_by(name: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self::ByName {
            name: name.into(),
            owner: None,
            executable_by: Some(account_id.into()),
        }
    }
}

/// Security group lookup criteria
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityGroupFilter {
    ByIds(Vec<String>),

    /// Group names, scoped to a VPC when `vpc_id` is set
    ByNames {
        names: Vec<String>,
        vpc_id: Option<String>,
    },
}
