//! Deploy request definitions

use crate::image::ResolvedImage;
use scaleflow_cloud::{BlockDevice, Capacity, LifecycleHook};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Declarative deploy request
///
/// The planner never mutates a request it was handed. Each region works on a
/// derived copy (see [`DeployRequest::for_region`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployRequest {
    pub application: String,
    pub stack: Option<String>,
    pub free_form_details: Option<String>,

    /// Account name, resolved through the account lookup
    pub account: String,

    /// Target regions with their zones, in deployment order
    pub availability_zones: Vec<RegionZones>,

    pub capacity: Capacity,
    pub instance_type: String,
    pub image_name: String,
    pub key_pair: Option<String>,

    pub security_groups: Vec<String>,
    pub load_balancers: Vec<String>,
    pub target_groups: Vec<String>,

    /// Subnet class. Empty or unset means a classic (non-VPC) deployment.
    pub subnet_type: Option<String>,

    /// `None` means derive (from the source group or the instance-type table)
    pub block_devices: Option<Vec<BlockDevice>>,
    pub use_ami_block_device_mappings: bool,

    pub classic_link_vpc_id: Option<String>,
    pub classic_link_vpc_security_groups: Vec<String>,

    /// IAM role template, `{{application}}` is substituted
    pub iam_role: Option<String>,
    pub ebs_optimized: Option<bool>,

    pub lifecycle_hooks: Vec<LifecycleHook>,
    /// `None` defers to the account-wide default
    pub include_account_lifecycle_hooks: Option<bool>,
    pub copy_source_scaling_policies_and_actions: bool,

    pub source: Option<SourceRef>,

    pub cooldown: Option<u32>,
    pub health_check_grace_period: Option<u32>,
    pub health_check_type: Option<String>,
    pub termination_policies: Vec<String>,
    pub suspended_processes: Vec<String>,
    pub instance_monitoring: Option<bool>,
    pub associate_public_ip_address: Option<bool>,
    pub spot_price: Option<String>,
    pub tags: HashMap<String, String>,
    pub user_data: Option<String>,
}

/// Availability zones for one target region
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionZones {
    pub region: String,
    #[serde(default)]
    pub zones: Vec<String>,
}

impl RegionZones {
    pub fn new(region: impl Into<String>, zones: Vec<String>) -> Self {
        Self {
            region: region.into(),
            zones,
        }
    }
}

/// Group to clone settings from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceRef {
    /// Defaults to the request's account
    pub account: Option<String>,
    pub region: Option<String>,
    pub asg_name: Option<String>,
    pub use_source_capacity: bool,
}

impl SourceRef {
    pub fn new(region: impl Into<String>, asg_name: impl Into<String>) -> Self {
        Self {
            account: None,
            region: Some(region.into()),
            asg_name: Some(asg_name.into()),
            use_source_capacity: false,
        }
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn with_source_capacity(mut self) -> Self {
        self.use_source_capacity = true;
        self
    }

    /// Region and group name, when both are present
    pub fn location(&self) -> Option<(&str, &str)> {
        match (self.region.as_deref(), self.asg_name.as_deref()) {
            (Some(region), Some(asg)) if !region.is_empty() && !asg.is_empty() => {
                Some((region, asg))
            }
            _ => None,
        }
    }
}

/// Output of an earlier pipeline step that the planner may reuse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorOutput {
    ResolvedImage(ResolvedImage),

    /// Load balancers created or updated upstream, by region
    LoadBalancers(HashMap<String, Vec<String>>),
}

impl DeployRequest {
    /// Subnet type with empty strings treated as unset
    pub fn subnet_type(&self) -> Option<&str> {
        self.subnet_type.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Copy of this request scoped to one region
    ///
    /// Keeps only that region's zones and merges in load balancers that prior
    /// steps produced for it. The receiver is left untouched.
    pub fn for_region(&self, target: &RegionZones, prior_outputs: &[PriorOutput]) -> Self {
        let mut derived = self.clone();
        derived.availability_zones = vec![target.clone()];

        for output in prior_outputs {
            if let PriorOutput::LoadBalancers(by_region) = output {
                for name in by_region.get(&target.region).into_iter().flatten() {
                    if !derived.load_balancers.contains(name) {
                        derived.load_balancers.push(name.clone());
                    }
                }
            }
        }
        derived
    }

    /// Zones of the first (or only) region entry
    pub fn zones(&self) -> &[String] {
        self.availability_zones
            .first()
            .map(|rz| rz.zones.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> DeployRequest {
        DeployRequest {
            application: "api".to_string(),
            load_balancers: vec!["api-frontend".to_string()],
            availability_zones: vec![
                RegionZones::new("us-east-1", vec!["us-east-1a".to_string()]),
                RegionZones::new("us-west-2", vec!["us-west-2b".to_string()]),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_for_region_does_not_leak_between_regions() {
        let base = request();
        let mut by_region = HashMap::new();
        by_region.insert("us-east-1".to_string(), vec!["api-east".to_string()]);
        let prior = vec![PriorOutput::LoadBalancers(by_region)];

        let east = base.for_region(&base.availability_zones[0], &prior);
        let west = base.for_region(&base.availability_zones[1], &prior);

        assert_eq!(east.load_balancers, vec!["api-frontend", "api-east"]);
        assert_eq!(west.load_balancers, vec!["api-frontend"]);
        assert_eq!(west.zones(), ["us-west-2b".to_string()]);
        assert_eq!(base.load_balancers, vec!["api-frontend"]);
    }

    #[test]
    fn test_empty_subnet_type_is_classic() {
        let mut req = request();
        req.subnet_type = Some("  ".to_string());
        assert_eq!(req.subnet_type(), None);
        req.subnet_type = Some("internal".to_string());
        assert_eq!(req.subnet_type(), Some("internal"));
    }

    #[test]
    fn test_source_location_requires_region_and_name() {
        assert!(SourceRef::new("us-east-1", "api-v001").location().is_some());
        let partial = SourceRef {
            region: Some("us-east-1".to_string()),
            ..Default::default()
        };
        assert!(partial.location().is_none());
    }

    #[test]
    fn test_request_from_json() {
        let json = serde_json::json!({
            "application": "api",
            "account": "prod",
            "instance_type": "m3.large",
            "image_name": "api-base",
            "availability_zones": [{ "region": "us-east-1", "zones": ["us-east-1a"] }],
            "source": { "region": "us-east-1", "asg_name": "api-v001", "use_source_capacity": true }
        });
        let req: DeployRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.availability_zones.len(), 1);
        assert!(req.block_devices.is_none());
        assert!(req.source.unwrap().use_source_capacity);
    }
}
