//! Account-wide deploy defaults

use crate::error::{ConfigError, Result};
use scaleflow_cloud::BlockDevice;
use serde::{Deserialize, Serialize};

pub const DEFAULT_IAM_ROLE: &str = "BaseIAMRole";
pub const DEFAULT_MAX_CLASSIC_LINK_SECURITY_GROUPS: usize = 5;
pub const DEFAULT_BLOCK_DEVICE_TYPE: &str = "standard";

/// Deploy defaults
///
/// YAML:
/// ```yaml
/// defaults:
///   iam_role: "{{ application }}InstanceProfile"
///   classic_link_security_group_name: nf-classiclink
///   add_app_groups_to_classic_link: true
///   max_classic_link_security_groups: 5
///   default_block_device_type: gp2
///   unknown_instance_type_block_device:
///     device_name: /dev/sdb
///     size: 40
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployDefaults {
    /// IAM role template used when a request leaves it unset
    pub iam_role: Option<String>,

    /// Group every classic-linked instance joins
    pub classic_link_security_group_name: Option<String>,

    /// Add `{app}`, `{app}-{stack}` and `{app}-{stack}-{detail}` groups to classic link
    pub add_app_groups_to_classic_link: bool,

    pub max_classic_link_security_groups: usize,

    /// Volume type for EBS devices generated from the instance-type table
    pub default_block_device_type: String,

    /// Device used for instance types missing from the instance-type table
    pub unknown_instance_type_block_device: Option<BlockDevice>,

    /// Default for requests that do not say whether to include account hooks
    pub include_account_lifecycle_hooks: bool,
}

impl Default for DeployDefaults {
    fn default() -> Self {
        Self {
            iam_role: Some(DEFAULT_IAM_ROLE.to_string()),
            classic_link_security_group_name: None,
            add_app_groups_to_classic_link: false,
            max_classic_link_security_groups: DEFAULT_MAX_CLASSIC_LINK_SECURITY_GROUPS,
            default_block_device_type: DEFAULT_BLOCK_DEVICE_TYPE.to_string(),
            unknown_instance_type_block_device: None,
            include_account_lifecycle_hooks: false,
        }
    }
}

impl DeployDefaults {
    pub fn validate(&self) -> Result<()> {
        if self.max_classic_link_security_groups == 0 {
            return Err(ConfigError::Invalid(
                "max_classic_link_security_groups must be at least 1".to_string(),
            ));
        }
        if self.default_block_device_type.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_block_device_type must not be empty".to_string(),
            ));
        }
        if let Some(device) = &self.unknown_instance_type_block_device {
            if device.device_name.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "unknown_instance_type_block_device needs a device_name".to_string(),
                ));
            }
        }
        Ok(())
    }
}
