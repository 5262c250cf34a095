//! Provider-side resource records
//!
//! These mirror what the provider's describe calls return. They are read-only
//! inputs to the planner and are never written back.

use serde::{Deserialize, Serialize};

/// Machine image as returned by `describe_images`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub image_id: String,

    pub name: String,

    /// Raw virtualization type (`paravirtual`, `hvm`, ...)
    pub virtualization_type: String,

    pub owner_id: Option<String>,

    /// Native block device mappings baked into the image
    #[serde(default)]
    pub block_device_mappings: Vec<BlockDeviceMapping>,
}

/// Block device mapping in provider form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDeviceMapping {
    pub device_name: String,

    /// Ephemeral device name (`ephemeral0`, ...)
    pub virtual_name: Option<String>,

    pub ebs: Option<EbsBlockDevice>,
}

/// EBS attributes of a block device mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EbsBlockDevice {
    pub volume_size: Option<u32>,
    pub volume_type: Option<String>,
    pub iops: Option<u32>,
    pub delete_on_termination: Option<bool>,
    pub snapshot_id: Option<String>,
    pub encrypted: Option<bool>,
}

/// Auto-scaling group as returned by `describe_auto_scaling_groups`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoScalingGroup {
    pub name: String,
    pub min_size: u32,
    pub max_size: u32,
    pub desired_capacity: u32,

    /// Missing when the group uses a launch template instead
    pub launch_configuration_name: Option<String>,
}

/// Launch configuration referenced by an auto-scaling group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchConfiguration {
    pub name: String,
    pub image_id: String,
    pub instance_type: String,

    #[serde(default)]
    pub block_device_mappings: Vec<BlockDeviceMapping>,

    pub spot_price: Option<String>,
}

/// Security group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroup {
    pub group_id: String,
    pub group_name: String,
    pub vpc_id: Option<String>,
}

/// VPC with its classic-link flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicLinkVpc {
    pub vpc_id: String,
    pub classic_link_enabled: bool,
}

/// Load balancer reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub name: String,
    pub dns_name: Option<String>,
}

/// Target group reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGroup {
    pub name: String,
    pub arn: String,
}
