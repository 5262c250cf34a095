//! Deployment result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Groups created so far, in region order
///
/// Only grows. A failing region leaves earlier entries in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentResult {
    /// `region:groupName`
    pub server_group_names: Vec<String>,

    pub server_group_name_by_region: HashMap<String, String>,

    pub deployments: Vec<RegionDeployment>,
}

/// One completed region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDeployment {
    pub region: String,
    pub server_group_name: String,
    pub image_id: String,
    pub completed_at: DateTime<Utc>,
}

impl DeploymentResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, region: &str, server_group_name: &str, image_id: &str) {
        self.server_group_names
            .push(format!("{}:{}", region, server_group_name));
        self.server_group_name_by_region
            .insert(region.to_string(), server_group_name.to_string());
        self.deployments.push(RegionDeployment {
            region: region.to_string(),
            server_group_name: server_group_name.to_string(),
            image_id: image_id.to_string(),
            completed_at: Utc::now(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.server_group_names.is_empty()
    }

    pub fn server_group_name(&self, region: &str) -> Option<&str> {
        self.server_group_name_by_region.get(region).map(|s| s.as_str())
    }
}
