//! Lifecycle hook definitions

use serde::{Deserialize, Serialize};

/// Lifecycle hook attached to an auto-scaling group after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleHook {
    pub role_arn: String,
    pub notification_target_arn: String,
    pub lifecycle_transition: LifecycleTransition,
    pub heartbeat_timeout: Option<u32>,
    pub default_result: Option<DefaultResult>,
}

/// Instance transition a hook pauses on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleTransition {
    Launching,
    Terminating,
    /// Launch finished with an error result
    LaunchError,
    /// Termination finished with an error result
    TerminateError,
}

impl LifecycleTransition {
    /// Parses the provider literal (`autoscaling:EC2_INSTANCE_LAUNCHING`), its
    /// unprefixed form, or the short kebab-case name
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = s.strip_prefix("autoscaling:").unwrap_or(s);
        match s.to_lowercase().as_str() {
            "ec2_instance_launching" | "launching" => Some(Self::Launching),
            "ec2_instance_terminating" | "terminating" => Some(Self::Terminating),
            "ec2_instance_launch_error" | "launch-error" | "launch_error" => {
                Some(Self::LaunchError)
            }
            "ec2_instance_terminate_error" | "terminate-error" | "terminate_error" => {
                Some(Self::TerminateError)
            }
            _ => None,
        }
    }

    /// Provider literal for this transition
    pub fn as_provider_str(&self) -> &'static str {
        match self {
            Self::Launching => "autoscaling:EC2_INSTANCE_LAUNCHING",
            Self::Terminating => "autoscaling:EC2_INSTANCE_TERMINATING",
            Self::LaunchError => "autoscaling:EC2_INSTANCE_LAUNCH_ERROR",
            Self::TerminateError => "autoscaling:EC2_INSTANCE_TERMINATE_ERROR",
        }
    }
}

impl std::fmt::Display for LifecycleTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_provider_str())
    }
}

/// Outcome applied when a hook's heartbeat times out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DefaultResult {
    Continue,
    Abandon,
}

impl DefaultResult {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CONTINUE" => Some(Self::Continue),
            "ABANDON" => Some(Self::Abandon),
            _ => None,
        }
    }

    pub fn as_provider_str(&self) -> &'static str {
        match self {
            Self::Continue => "CONTINUE",
            Self::Abandon => "ABANDON",
        }
    }
}
