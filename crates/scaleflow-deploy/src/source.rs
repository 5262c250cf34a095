//! Source group attribute copying
//!
//! A deploy that names a source group inherits its capacity (on request), block
//! devices and spot price. The source is fetched once per deploy and applied to
//! every region's derived request.

use crate::block_device::BlockDeviceResolver;
use crate::description::{DeployRequest, SourceRef};
use crate::error::{DeployError, Result};
use scaleflow_cloud::{
    AccountLookup, BlockDeviceMapping, Capacity, LaunchConfiguration, ProviderFactory,
};

/// Resolved state of the source group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSnapshot {
    pub account: String,
    pub region: String,
    pub asg_name: String,
    pub capacity: Capacity,
    pub launch_configuration: LaunchConfiguration,
}

impl SourceSnapshot {
    pub fn instance_type(&self) -> &str {
        &self.launch_configuration.instance_type
    }

    pub fn block_device_mappings(&self) -> &[BlockDeviceMapping] {
        &self.launch_configuration.block_device_mappings
    }

    pub fn spot_price(&self) -> Option<&str> {
        self.launch_configuration.spot_price.as_deref()
    }
}

pub struct SourceAttributeCopier<'a> {
    accounts: &'a dyn AccountLookup,
    providers: &'a dyn ProviderFactory,
    block_devices: &'a BlockDeviceResolver,
}

impl<'a> SourceAttributeCopier<'a> {
    pub fn new(
        accounts: &'a dyn AccountLookup,
        providers: &'a dyn ProviderFactory,
        block_devices: &'a BlockDeviceResolver,
    ) -> Self {
        Self {
            accounts,
            providers,
            block_devices,
        }
    }

    /// Fetch the source group and its launch configuration
    ///
    /// Returns `None` on a soft miss: no source declared, or a source that cannot be
    /// found. Either is a [`DeployError::Precondition`] when source capacity was requested.
    pub async fn fetch(
        &self,
        source: Option<&SourceRef>,
        default_account: &str,
    ) -> Result<Option<SourceSnapshot>> {
        let use_source_capacity = source.is_some_and(|s| s.use_source_capacity);
        let miss = |reason: String| -> Result<Option<SourceSnapshot>> {
            if use_source_capacity {
                Err(DeployError::Precondition(format!(
                    "source capacity requested but {}",
                    reason
                )))
            } else {
                tracing::debug!("{}, not copying source attributes", reason);
                Ok(None)
            }
        };

        let Some((source, (region, asg_name))) =
            source.and_then(|s| s.location().map(|location| (s, location)))
        else {
            return miss("no source group was given".to_string());
        };

        let account_name = source.account.as_deref().unwrap_or(default_account);
        let account = self.accounts.get_by_name(account_name).ok_or_else(|| {
            DeployError::Argument(format!("unknown source account: {}", account_name))
        })?;
        let client = self.providers.region_client(account.as_ref(), region);

        let Some(asg) = client.describe_auto_scaling_group(asg_name).await? else {
            return miss(format!("source group {} not found in {}", asg_name, region));
        };
        let Some(launch_configuration_name) = asg.launch_configuration_name.as_deref() else {
            return miss(format!("source group {} has no launch configuration", asg_name));
        };
        let Some(launch_configuration) = client
            .get_launch_configuration(launch_configuration_name)
            .await?
        else {
            return miss(format!(
                "launch configuration {} of source group {} not found",
                launch_configuration_name, asg_name
            ));
        };

        tracing::info!(
            account = account_name,
            region,
            asg = asg_name,
            "Resolved source group"
        );
        Ok(Some(SourceSnapshot {
            account: account_name.to_string(),
            region: region.to_string(),
            asg_name: asg_name.to_string(),
            capacity: Capacity::new(asg.min_size, asg.max_size, asg.desired_capacity),
            launch_configuration,
        }))
    }

    /// Derive a request carrying the source's attributes; the input is not modified
    pub fn apply(&self, snapshot: Option<&SourceSnapshot>, request: &DeployRequest) -> Result<DeployRequest> {
        let use_source_capacity = request
            .source
            .as_ref()
            .is_some_and(|s| s.use_source_capacity);

        let Some(snapshot) = snapshot else {
            if use_source_capacity {
                return Err(DeployError::Precondition(
                    "source capacity requested but no source group is available".to_string(),
                ));
            }
            return Ok(request.clone());
        };

        let mut derived = request.clone();
        if use_source_capacity {
            derived.capacity = snapshot.capacity;
        }
        derived.block_devices = Some(
            self.block_devices
                .resolve(request, &snapshot.launch_configuration),
        );
        if derived.spot_price.is_none() {
            derived.spot_price = snapshot.spot_price().map(str::to_string);
        }
        Ok(derived)
    }

    /// Fetch and apply in one step
    pub async fn resolve(&self, request: &DeployRequest) -> Result<DeployRequest> {
        let snapshot = self.fetch(request.source.as_ref(), &request.account).await?;
        self.apply(snapshot.as_ref(), request)
    }
}
