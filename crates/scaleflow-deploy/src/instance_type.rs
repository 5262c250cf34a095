//! Instance type rules
//!
//! Virtualization compatibility and EBS-optimized defaults, keyed by instance family
//! (the part of the instance type before the first `.`).

use crate::error::{DeployError, Result};
use serde::{Deserialize, Serialize};

const PARAVIRTUAL_FAMILIES: &[&str] = &["c1", "c3", "hi1", "hs1", "m1", "m2", "m3", "t1"];

const HVM_FAMILIES: &[&str] = &[
    "c3", "c4", "d2", "i2", "g2", "m3", "m4", "r3", "t2", "x1",
];

const EBS_OPTIMIZED_FAMILIES: &[&str] = &[
    "c4", "c5", "d2", "i3", "m4", "m5", "p2", "r4", "r5", "x1",
];

/// Image virtualization type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VirtualizationType {
    Paravirtual,
    Hvm,
    #[serde(untagged)]
    Other(String),
}

impl VirtualizationType {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "paravirtual" => Self::Paravirtual,
            "hvm" => Self::Hvm,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Paravirtual => "paravirtual",
            Self::Hvm => "hvm",
            Self::Other(s) => s,
        }
    }

    /// Families known to run on this virtualization type, `None` when the type is unknown
    pub fn known_families(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Paravirtual => Some(PARAVIRTUAL_FAMILIES),
            Self::Hvm => Some(HVM_FAMILIES),
            Self::Other(_) => None,
        }
    }
}

impl std::fmt::Display for VirtualizationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Instance family, or an empty string when the type has no `.`
pub fn instance_family(instance_type: &str) -> &str {
    instance_type
        .split_once('.')
        .map(|(family, _)| family)
        .unwrap_or_default()
}

fn is_known_family(family: &str) -> bool {
    PARAVIRTUAL_FAMILIES.contains(&family) || HVM_FAMILIES.contains(&family)
}

/// Reject instance types whose family is known not to support the virtualization type
///
/// Unknown virtualization types and families missing from every table pass.
pub fn validate_instance_type(virtualization: &VirtualizationType, instance_type: &str) -> Result<()> {
    let Some(allowed) = virtualization.known_families() else {
        return Ok(());
    };

    let family = instance_family(instance_type);
    if is_known_family(family) && !allowed.contains(&family) {
        return Err(DeployError::Validation(format!(
            "Instance type {} does not support virtualization type {}",
            instance_type, virtualization
        )));
    }
    Ok(())
}

/// Whether instances of this type are EBS-optimized unless told otherwise
pub fn ebs_optimized_by_default(instance_type: &str) -> bool {
    EBS_OPTIMIZED_FAMILIES.contains(&instance_family(instance_type))
}
