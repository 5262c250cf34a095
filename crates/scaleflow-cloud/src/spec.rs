//! Fully resolved provisioning spec handed to the provisioning worker

use crate::lifecycle::LifecycleHook;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Group capacity. Unset bounds are left to the provisioning worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    pub min: Option<u32>,
    pub max: Option<u32>,
    pub desired: Option<u32>,
}

impl Capacity {
    pub fn new(min: u32, max: u32, desired: u32) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            desired: Some(desired),
        }
    }
}

/// Block device in launch form
///
/// Either ephemeral (`virtual_name` set) or EBS-backed (size and EBS attributes set).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDevice {
    pub device_name: String,
    pub virtual_name: Option<String>,
    pub size: Option<u32>,
    pub volume_type: Option<String>,
    pub iops: Option<u32>,
    pub delete_on_termination: Option<bool>,
    pub snapshot_id: Option<String>,
    pub encrypted: Option<bool>,
}

impl BlockDevice {
    pub fn ephemeral(device_name: impl Into<String>, virtual_name: impl Into<String>) -> Self {
        Self {
            device_name: device_name.into(),
            virtual_name: Some(virtual_name.into()),
            ..Default::default()
        }
    }

    pub fn ebs(device_name: impl Into<String>, size: u32, volume_type: impl Into<String>) -> Self {
        Self {
            device_name: device_name.into(),
            size: Some(size),
            volume_type: Some(volume_type.into()),
            delete_on_termination: Some(true),
            ..Default::default()
        }
    }
}

/// Classic-link attachment for a group
///
/// `vpc_id` is `None` when the region has no classic-link network or the deploy
/// targets a VPC subnet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicLinkPlan {
    pub vpc_id: Option<String>,
    pub security_groups: Vec<String>,
}

impl ClassicLinkPlan {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.vpc_id.is_none()
    }
}

/// Region-specific, fully resolved group definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionSpec {
    pub application: String,
    pub stack: Option<String>,
    pub free_form_details: Option<String>,

    pub account: String,
    pub region: String,
    pub availability_zones: Vec<String>,

    /// Subnet class; `None` for a classic (non-VPC) deployment
    pub subnet_type: Option<String>,

    pub capacity: Capacity,

    pub image_id: String,
    pub instance_type: String,
    pub key_pair: Option<String>,
    pub iam_role: Option<String>,
    pub ebs_optimized: bool,

    pub block_devices: Vec<BlockDevice>,
    pub classic_link: ClassicLinkPlan,
    pub security_groups: Vec<String>,
    pub load_balancers: Vec<String>,
    pub target_group_arns: Vec<String>,

    /// Attached by the lifecycle hook worker once the group exists
    pub lifecycle_hooks: Vec<LifecycleHook>,

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
