//! ScaleFlow Cloud seams
//!
//! This crate defines the collaborators the ScaleFlow deployment planner talks
//! to, and the vocabulary it hands them. Nothing here issues provider calls on
//! its own; SDK-backed implementations live outside the planner.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                scaleflow-deploy                  │
//! │         (DeploymentPlanner + resolvers)          │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                scaleflow-cloud                   │
//! │  ┌──────────────┐  ┌──────────────────────────┐ │
//! │  │ RegionClient │  │ ProvisioningWorker       │ │
//! │  │ (describe *) │  │ ReferenceCopier          │ │
//! │  └──────────────┘  │ LifecycleHookWorker      │ │
//! │  ┌──────────────┐  └──────────────────────────┘ │
//! │  │AccountLookup │  ┌──────────────────────────┐ │
//! │  └──────────────┘  │ TaskSink                 │ │
//! │                    └──────────────────────────┘ │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod account;
pub mod error;
pub mod lifecycle;
pub mod provider;
pub mod resource;
pub mod spec;
pub mod task;
pub mod worker;

// Re-exports
pub use account::{AccountCredentials, AccountLifecycleHook, AccountLookup, StaticAccount};
pub use error::{CloudError, Result};
pub use lifecycle::{DefaultResult, LifecycleHook, LifecycleTransition};
pub use provider::{ImageQuery, ProviderFactory, RegionClient, SecurityGroupFilter};
pub use resource::{
    AutoScalingGroup, BlockDeviceMapping, ClassicLinkVpc, EbsBlockDevice, Image,
    LaunchConfiguration, LoadBalancer, SecurityGroup, TargetGroup,
};
pub use spec::{BlockDevice, Capacity, ClassicLinkPlan, ProvisionSpec};
pub use task::{RecordingTask, StatusEntry, TaskSink, TracingTask};
pub use worker::{LifecycleHookWorker, ProvisioningWorker, ReferenceCopier, ReferenceCopyRequest};
