//! Deployment planning errors

use scaleflow_cloud::CloudError;
use thiserror::Error;

/// Errors raised while planning or executing a region's deployment
///
/// None of these are retried by the planner.
#[derive(Error, Debug)]
pub enum DeployError {
    /// Malformed or unresolvable input
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// An operation was requested without what it depends on
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Classic-link security group names could not be reconciled
    #[error("Resolution failed: {0}")]
    Resolution(String),

    /// A referenced resource does not exist in the target region
    #[error("Invalid state: {0}")]
    State(String),

    /// Instance type and image virtualization type are incompatible
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Cloud(#[from] CloudError),
}

pub type Result<T> = std::result::Result<T, DeployError>;
