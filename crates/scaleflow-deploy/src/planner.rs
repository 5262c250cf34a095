//! Deployment planner
//!
//! Drives each target region through the resolution chain, hands the resolved
//! spec to the provisioning worker, then copies post-creation artifacts.
//!
//! ```text
//! for each region, in request order:
//!   source attributes ─▶ load balancers ─▶ classic link ─▶ default block devices
//!     ─▶ image ─▶ instance type check ─▶ account check ─▶ AMI block devices
//!     ─▶ ProvisionSpec ─▶ create group ─▶ copy policies ─▶ attach hooks
//! ```
//!
//! Regions run strictly one after another. A failure aborts the deploy; regions
//! that already completed stay in the result.

use crate::artifacts::PostCreationArtifactCopier;
use crate::block_device::{BlockDeviceResolver, BlockDeviceTable};
use crate::classic_link::ClassicLinkResolver;
use crate::description::{DeployRequest, PriorOutput, RegionZones};
use crate::error::{DeployError, Result};
use crate::image::{ResolvedImage, resolve_image};
use crate::instance_type::{ebs_optimized_by_default, validate_instance_type};
use crate::lifecycle::lifecycle_hooks;
use crate::result::DeploymentResult;
use crate::source::{SourceAttributeCopier, SourceSnapshot};
use crate::template::{NameContext, render_name};
use scaleflow_cloud::{
    AccountCredentials, AccountLookup, ClassicLinkPlan, LifecycleHookWorker, ProviderFactory,
    ProvisionSpec, ProvisioningWorker, ReferenceCopier, RegionClient, TaskSink,
};
use scaleflow_config::DeployDefaults;
use std::sync::Arc;

const PHASE: &str = "DEPLOY";

/// Collaborators the planner calls out to
#[derive(Clone)]
pub struct DeployServices {
    pub accounts: Arc<dyn AccountLookup>,
    pub providers: Arc<dyn ProviderFactory>,
    pub provisioner: Arc<dyn ProvisioningWorker>,
    pub reference_copier: Arc<dyn ReferenceCopier>,
    pub lifecycle_hooks: Arc<dyn LifecycleHookWorker>,
    pub task: Arc<dyn TaskSink>,
}

/// Per-deploy state shared by every region
struct DeployContext<'a> {
    request: &'a DeployRequest,
    prior_outputs: &'a [PriorOutput],
    account: Arc<dyn AccountCredentials>,
    source: Option<SourceSnapshot>,
    source_client: Option<Arc<dyn RegionClient>>,
}

pub struct DeploymentPlanner {
    services: DeployServices,
    defaults: DeployDefaults,
    block_devices: BlockDeviceResolver,
}

impl DeploymentPlanner {
    pub fn new(services: DeployServices, defaults: DeployDefaults) -> Self {
        let block_devices = BlockDeviceResolver::new(BlockDeviceTable::new(&defaults));
        Self {
            services,
            defaults,
            block_devices,
        }
    }

    fn status(&self, message: impl AsRef<str>) {
        self.services.task.update_status(PHASE, message.as_ref());
    }

    /// Deploy to every region in the request
    pub async fn deploy(
        &self,
        request: &DeployRequest,
        prior_outputs: &[PriorOutput],
    ) -> Result<DeploymentResult> {
        let mut result = DeploymentResult::new();
        self.deploy_into(request, prior_outputs, &mut result).await?;
        Ok(result)
    }

    /// Deploy to every region, recording completed regions into `result` as they finish
    ///
    /// On error, `result` still holds every region completed before the failure.
    pub async fn deploy_into(
        &self,
        request: &DeployRequest,
        prior_outputs: &[PriorOutput],
        result: &mut DeploymentResult,
    ) -> Result<()> {
        self.status(format!(
            "Initializing deployment of {} to {} region(s)",
            request.application,
            request.availability_zones.len()
        ));
        let ctx = self.context(request, prior_outputs).await?;
        let artifacts = PostCreationArtifactCopier::new(
            self.services.reference_copier.as_ref(),
            self.services.lifecycle_hooks.as_ref(),
        );

        for target in &request.availability_zones {
            let region = target.region.as_str();
            let spec = self.plan_region(&ctx, target).await?;

            self.status(format!("Creating group in {}", region));
            let asg_name = self
                .services
                .provisioner
                .create_group(ctx.account.as_ref(), &spec)
                .await?;
            result.record(region, &asg_name, &spec.image_id);
            self.status(format!("Deployed {} to {}", asg_name, region));

            if request.copy_source_scaling_policies_and_actions {
                self.status(format!(
                    "Copying scaling policies and scheduled actions to {}",
                    asg_name
                ));
                let copied = artifacts
                    .copy_policies_and_schedules(
                        ctx.source.as_ref(),
                        ctx.account.as_ref(),
                        region,
                        &asg_name,
                    )
                    .await?;
                if !copied {
                    self.status("No source group, nothing to copy");
                }
            }

            if artifacts
                .attach_lifecycle_hooks(ctx.account.as_ref(), region, &asg_name, &spec.lifecycle_hooks)
                .await?
            {
                self.status(format!(
                    "Attached {} lifecycle hook(s) to {}",
                    spec.lifecycle_hooks.len(),
                    asg_name
                ));
            }
        }

        self.status(format!(
            "Deployment complete: {}",
            result.server_group_names.join(", ")
        ));
        Ok(())
    }

    /// Resolve every region's spec without creating anything
    pub async fn plan(
        &self,
        request: &DeployRequest,
        prior_outputs: &[PriorOutput],
    ) -> Result<Vec<ProvisionSpec>> {
        let ctx = self.context(request, prior_outputs).await?;
        let mut specs = Vec::with_capacity(request.availability_zones.len());
        for target in &request.availability_zones {
            specs.push(self.plan_region(&ctx, target).await?);
        }
        Ok(specs)
    }

    async fn context<'a>(
        &self,
        request: &'a DeployRequest,
        prior_outputs: &'a [PriorOutput],
    ) -> Result<DeployContext<'a>> {
        let account = self
            .services
            .accounts
            .get_by_name(&request.account)
            .ok_or_else(|| DeployError::Argument(format!("unknown account: {}", request.account)))?;

        let source = self
            .source_copier()
            .fetch(request.source.as_ref(), &request.account)
            .await?;
        if let Some(snapshot) = &source {
            self.status(format!(
                "Copying attributes from source group {}:{}",
                snapshot.region, snapshot.asg_name
            ));
        }

        let source_client = match request.source.as_ref().and_then(|s| s.location()) {
            Some((region, _)) => {
                let name = request
                    .source
                    .as_ref()
                    .and_then(|s| s.account.as_deref())
                    .unwrap_or(&request.account);
                let source_account = self.services.accounts.get_by_name(name).ok_or_else(|| {
                    DeployError::Argument(format!("unknown source account: {}", name))
                })?;
                Some(self.services.providers.region_client(source_account.as_ref(), region))
            }
            None => None,
        };

        Ok(DeployContext {
            request,
            prior_outputs,
            account,
            source,
            source_client,
        })
    }

    fn source_copier(&self) -> SourceAttributeCopier<'_> {
        SourceAttributeCopier::new(
            self.services.accounts.as_ref(),
            self.services.providers.as_ref(),
            &self.block_devices,
        )
    }

    #[tracing::instrument(skip_all, fields(region = %target.region))]
    async fn plan_region(&self, ctx: &DeployContext<'_>, target: &RegionZones) -> Result<ProvisionSpec> {
        let region = target.region.as_str();
        let client = self
            .services
            .providers
            .region_client(ctx.account.as_ref(), region);
        self.status(format!("Preparing deployment to {}", region));

        let base = ctx.request.for_region(target, ctx.prior_outputs);
        let request = self.source_copier().apply(ctx.source.as_ref(), &base)?;

        let load_balancers = self.resolve_load_balancers(client.as_ref(), &request).await?;
        let target_group_arns = self.resolve_target_groups(client.as_ref(), &request).await?;

        let classic_link = ClassicLinkResolver::new(&self.defaults, self.services.task.as_ref())
            .resolve(client.as_ref(), ctx.source_client.as_deref(), &request)
            .await?;
        if let Some(vpc_id) = &classic_link.vpc_id {
            self.status(format!(
                "Classic linking to {} with groups [{}]",
                vpc_id,
                classic_link.security_groups.join(", ")
            ));
        }

        let mut block_devices = match &request.block_devices {
            Some(devices) => devices.clone(),
            None => self
                .block_devices
                .table()
                .for_instance_type(&request.instance_type),
        };

        let image = resolve_image(
            client.as_ref(),
            region,
            &request.image_name,
            ctx.prior_outputs,
            ctx.account.account_id(),
        )
        .await
        .map_err(|e| match e {
            DeployError::NotFound(_) => DeployError::Argument(format!(
                "unable to resolve image id from {} in {}",
                request.image_name, region
            )),
            other => other,
        })?;
        self.status(format!("Resolved image {} ({})", image.image_id, image.virtualization_type));

        validate_instance_type(&image.virtualization_type, &request.instance_type)?;

        let allowed_regions = ctx.account.regions();
        if !allowed_regions.is_empty() && !allowed_regions.iter().any(|r| r == region) {
            return Err(DeployError::Argument(format!(
                "account {} is not configured for region {}",
                ctx.account.name(),
                region
            )));
        }

        // Explicit devices from the original request are never replaced by the image's.
        if request.use_ami_block_device_mappings && ctx.request.block_devices.is_none() {
            block_devices = image.block_devices.clone();
        }

        self.build_spec(
            ctx,
            &request,
            &image,
            block_devices,
            classic_link,
            load_balancers,
            target_group_arns,
        )
    }

    async fn resolve_load_balancers(
        &self,
        client: &dyn RegionClient,
        request: &DeployRequest,
    ) -> Result<Vec<String>> {
        if request.load_balancers.is_empty() {
            return Ok(Vec::new());
        }

        let found = client.describe_load_balancers(&request.load_balancers).await?;
        let missing: Vec<&str> = request
            .load_balancers
            .iter()
            .filter(|name| !found.iter().any(|lb| &lb.name == *name))
            .map(|s| s.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(DeployError::State(format!(
                "unable to find load balancers named [{}] in {}",
                missing.join(", "),
                client.region()
            )));
        }
        Ok(request.load_balancers.clone())
    }

    async fn resolve_target_groups(
        &self,
        client: &dyn RegionClient,
        request: &DeployRequest,
    ) -> Result<Vec<String>> {
        if request.target_groups.is_empty() {
            return Ok(Vec::new());
        }

        let found = client.describe_target_groups(&request.target_groups).await?;
        let mut arns = Vec::with_capacity(request.target_groups.len());
        let mut missing = Vec::new();
        for name in &request.target_groups {
            match found.iter().find(|tg| &tg.name == name) {
                Some(tg) => arns.push(tg.arn.clone()),
                None => missing.push(name.as_str()),
            }
        }
        if !missing.is_empty() {
            return Err(DeployError::State(format!(
                "unable to find target groups named [{}] in {}",
                missing.join(", "),
                client.region()
            )));
        }
        Ok(arns)
    }

    #[allow(clippy::too_many_arguments)]
    fn build_spec(
        &self,
        ctx: &DeployContext<'_>,
        request: &DeployRequest,
        image: &ResolvedImage,
        block_devices: Vec<scaleflow_cloud::BlockDevice>,
        classic_link: ClassicLinkPlan,
        load_balancers: Vec<String>,
        target_group_arns: Vec<String>,
    ) -> Result<ProvisionSpec> {
        let names = NameContext {
            application: &request.application,
            stack: request.stack.as_deref(),
            region: &image.region,
            account: ctx.account.name(),
        };
        let iam_role = request
            .iam_role
            .as_deref()
            .or(self.defaults.iam_role.as_deref())
            .map(|template| render_name(template, names))
            .transpose()?;

        let include_account_hooks = request
            .include_account_lifecycle_hooks
            .unwrap_or(self.defaults.include_account_lifecycle_hooks);
        let hooks = lifecycle_hooks(
            &request.lifecycle_hooks,
            ctx.account.lifecycle_hooks(),
            include_account_hooks,
        )?;

        Ok(ProvisionSpec {
            application: request.application.clone(),
            stack: request.stack.clone(),
            free_form_details: request.free_form_details.clone(),
            account: ctx.account.name().to_string(),
            region: image.region.clone(),
            availability_zones: request.zones().to_vec(),
            subnet_type: request.subnet_type().map(str::to_string),
            capacity: request.capacity,
            image_id: image.image_id.clone(),
            instance_type: request.instance_type.clone(),
            key_pair: request
                .key_pair
                .clone()
                .or_else(|| ctx.account.default_key_pair().map(str::to_string)),
            iam_role,
            ebs_optimized: request
                .ebs_optimized
                .unwrap_or_else(|| ebs_optimized_by_default(&request.instance_type)),
            block_devices,
            classic_link,
            security_groups: request.security_groups.clone(),
            load_balancers,
            target_group_arns,
            lifecycle_hooks: hooks,
            cooldown: request.cooldown,
            health_check_grace_period: request.health_check_grace_period,
            health_check_type: request.health_check_type.clone(),
            termination_policies: request.termination_policies.clone(),
            suspended_processes: request.suspended_processes.clone(),
            instance_monitoring: request.instance_monitoring,
            associate_public_ip_address: request.associate_public_ip_address,
            spot_price: request.spot_price.clone(),
            tags: request.tags.clone(),
            user_data: request.user_data.clone(),
        })
    }
}
