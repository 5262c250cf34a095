//! ScaleFlow deployment planner
//!
//! Turns a declarative deploy request, optionally cloned from an existing
//! auto-scaling group, into one fully resolved [`ProvisionSpec`] per target
//! region, provisions it, and copies post-creation artifacts.
//!
//! # Example
//!
//! ```ignore
//! use scaleflow_deploy::{DeployRequest, DeployServices, DeploymentPlanner};
//! use scaleflow_config::ScaleflowConfig;
//!
//! let config = ScaleflowConfig::load_or_default()?;
//! let planner = DeploymentPlanner::new(services, config.defaults);
//!
//! let result = planner.deploy(&request, &[]).await?;
//! for name in &result.server_group_names {
//!     println!("{}", name);
//! }
//! ```
//!
//! [`ProvisionSpec`]: scaleflow_cloud::ProvisionSpec

pub mod artifacts;
pub mod block_device;
pub mod classic_link;
pub mod description;
pub mod error;
pub mod image;
pub mod instance_type;
pub mod lifecycle;
pub mod names;
pub mod planner;
pub mod result;
pub mod source;
pub mod template;

pub use artifacts::PostCreationArtifactCopier;
pub use block_device::{BlockDeviceResolver, BlockDeviceTable};
pub use classic_link::ClassicLinkResolver;
pub use description::{DeployRequest, PriorOutput, RegionZones, SourceRef};
pub use error::{DeployError, Result};
pub use image::{ResolvedImage, resolve_image};
pub use instance_type::{VirtualizationType, validate_instance_type};
pub use names::ClusterName;
pub use planner::{DeployServices, DeploymentPlanner};
pub use result::{DeploymentResult, RegionDeployment};
pub use source::{SourceAttributeCopier, SourceSnapshot};
