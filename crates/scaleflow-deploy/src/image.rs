//! Image resolution

use crate::block_device::convert_mappings;
use crate::description::PriorOutput;
use crate::error::{DeployError, Result};
use crate::instance_type::VirtualizationType;
use regex::Regex;
use scaleflow_cloud::{BlockDevice, Image, ImageQuery, RegionClient};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static IMAGE_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ami-[0-9a-f]+$").unwrap());

/// Image resolved for one region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedImage {
    pub region: String,
    pub image_id: String,
    /// Name the image was requested by
    pub image_name: String,
    pub virtualization_type: VirtualizationType,
    /// Block devices baked into the image
    #[serde(default)]
    pub block_devices: Vec<BlockDevice>,
}

impl ResolvedImage {
    fn from_image(region: &str, requested_name: &str, image: &Image) -> Self {
        Self {
            region: region.to_string(),
            image_id: image.image_id.clone(),
            image_name: requested_name.to_string(),
            virtualization_type: VirtualizationType::parse(&image.virtualization_type),
            block_devices: convert_mappings(&image.block_device_mappings),
        }
    }
}

/// Whether a name is a raw image id rather than an image name
pub fn looks_like_image_id(name: &str) -> bool {
    IMAGE_ID.is_match(name)
}

/// Resolve an image for a region
///
/// An image already resolved by a prior pipeline step for the same region and
/// name wins. Otherwise the provider is queried: by id when the name is an id,
/// then by name among images the account owns, images it may launch, and any image.
pub async fn resolve_image(
    client: &dyn RegionClient,
    region: &str,
    image_name: &str,
    prior_outputs: &[PriorOutput],
    account_id: &str,
) -> Result<ResolvedImage> {
    let prior = prior_outputs.iter().find_map(|output| match output {
        PriorOutput::ResolvedImage(image)
            if image.region == region && image.image_name == image_name =>
        {
            Some(image.clone())
        }
        _ => None,
    });
    if let Some(image) = prior {
        tracing::debug!(region, image_id = %image.image_id, "Using image from prior output");
        return Ok(image);
    }

    let queries = if looks_like_image_id(image_name) {
        vec![ImageQuery::ById(image_name.to_string())]
    } else {
        vec![
            ImageQuery::owned_by(image_name, account_id),
            ImageQuery::executable_by(image_name, account_id),
            ImageQuery::by_name(image_name),
        ]
    };

    for query in &queries {
        let images = client.describe_images(query).await?;
        if let Some(image) = images.first() {
            tracing::debug!(region, image_id = %image.image_id, ?query, "Resolved image");
            return Ok(ResolvedImage::from_image(region, image_name, image));
        }
    }

    Err(DeployError::NotFound(format!(
        "image {} in {}",
        image_name, region
    )))
}
