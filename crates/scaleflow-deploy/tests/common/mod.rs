#![allow(dead_code)]

use async_trait::async_trait;
use scaleflow_cloud::{
    AccountCredentials, AutoScalingGroup, BlockDeviceMapping, ClassicLinkVpc, CloudError, Image,
    ImageQuery, LaunchConfiguration, LifecycleHook, LifecycleHookWorker, LoadBalancer,
    ProviderFactory, ProvisionSpec, ProvisioningWorker, RecordingTask, ReferenceCopier,
    ReferenceCopyRequest, RegionClient, SecurityGroup, SecurityGroupFilter, StaticAccount,
    TargetGroup,
};
use scaleflow_config::{ConfigAccountLookup, DeployDefaults};
use scaleflow_deploy::{DeployRequest, DeployServices, DeploymentPlanner, RegionZones};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const ACCOUNT: &str = "prod";
pub const ACCOUNT_ID: &str = "123456789012";

/// Provider state for one region
#[derive(Debug, Clone, Default)]
pub struct RegionFixture {
    pub images: Vec<Image>,
    /// Image ids the account may launch without owning them
    pub executable_images: Vec<String>,
    pub security_groups: Vec<SecurityGroup>,
    pub classic_link_vpcs: Vec<ClassicLinkVpc>,
    pub auto_scaling_groups: Vec<AutoScalingGroup>,
    pub launch_configurations: Vec<LaunchConfiguration>,
    pub load_balancers: Vec<String>,
    pub target_groups: Vec<TargetGroup>,
}

impl RegionFixture {
    pub fn with_image(mut self, image: Image) -> Self {
        self.images.push(image);
        self
    }

    pub fn with_classic_link_vpc(mut self, vpc_id: &str) -> Self {
        self.classic_link_vpcs.push(ClassicLinkVpc {
            vpc_id: "vpc-plain".to_string(),
            classic_link_enabled: false,
        });
        self.classic_link_vpcs.push(ClassicLinkVpc {
            vpc_id: vpc_id.to_string(),
            classic_link_enabled: true,
        });
        self
    }

    pub fn with_security_group(mut self, id: &str, name: &str, vpc_id: &str) -> Self {
        self.security_groups.push(SecurityGroup {
            group_id: id.to_string(),
            group_name: name.to_string(),
            vpc_id: Some(vpc_id.to_string()),
        });
        self
    }

    pub fn with_load_balancer(mut self, name: &str) -> Self {
        self.load_balancers.push(name.to_string());
        self
    }

    pub fn with_target_group(mut self, name: &str, arn: &str) -> Self {
        self.target_groups.push(TargetGroup {
            name: name.to_string(),
            arn: arn.to_string(),
        });
        self
    }

    pub fn with_source_group(
        mut self,
        asg: AutoScalingGroup,
        launch_configuration: LaunchConfiguration,
    ) -> Self {
        self.auto_scaling_groups.push(asg);
        self.launch_configurations.push(launch_configuration);
        self
    }
}

pub fn image(id: &str, name: &str, virtualization: &str) -> Image {
    Image {
        image_id: id.to_string(),
        name: name.to_string(),
        virtualization_type: virtualization.to_string(),
        owner_id: Some(ACCOUNT_ID.to_string()),
        block_device_mappings: Vec::new(),
    }
}

pub fn ephemeral_mapping(device: &str, virtual_name: &str) -> BlockDeviceMapping {
    BlockDeviceMapping {
        device_name: device.to_string(),
        virtual_name: Some(virtual_name.to_string()),
        ebs: None,
    }
}

pub fn source_group(
    name: &str,
    instance_type: &str,
    mappings: Vec<BlockDeviceMapping>,
) -> (AutoScalingGroup, LaunchConfiguration) {
    let lc_name = format!("{}-lc", name);
    (
        AutoScalingGroup {
            name: name.to_string(),
            min_size: 3,
            max_size: 9,
            desired_capacity: 6,
            launch_configuration_name: Some(lc_name.clone()),
        },
        LaunchConfiguration {
            name: lc_name,
            image_id: "ami-0source".to_string(),
            instance_type: instance_type.to_string(),
            block_device_mappings: mappings,
            spot_price: Some("0.25".to_string()),
        },
    )
}

pub struct FakeRegionClient {
    region: String,
    fixture: RegionFixture,
    queries: Arc<Mutex<Vec<String>>>,
}

impl FakeRegionClient {
    fn log(&self, call: String) {
        self.queries.lock().unwrap().push(format!("{}:{}", self.region, call));
    }
}

#[async_trait]
impl RegionClient for FakeRegionClient {
    fn region(&self) -> &str {
        &self.region
    }

    async fn describe_images(&self, query: &ImageQuery) -> scaleflow_cloud::Result<Vec<Image>> {
        self.log(format!("describe_images {:?}", query));
        let images = self.fixture.images.iter();
        let found = match query {
            ImageQuery::ById(id) => images.filter(|i| &i.image_id == id).cloned().collect(),
            ImageQuery::ByName {
                name,
                owner,
                executable_by,
            } => images
                .filter(|i| &i.name == name)
                .filter(|i| owner.is_none() || i.owner_id == *owner)
                .filter(|i| {
                    executable_by.is_none() || self.fixture.executable_images.contains(&i.image_id)
                })
                .cloned()
                .collect(),
        };
        Ok(found)
    }

    async fn describe_security_groups(
        &self,
        filter: &SecurityGroupFilter,
    ) -> scaleflow_cloud::Result<Vec<SecurityGroup>> {
        self.log(format!("describe_security_groups {:?}", filter));
        let groups = self.fixture.security_groups.iter();
        let found = match filter {
            SecurityGroupFilter::ByIds(ids) => {
                groups.filter(|g| ids.contains(&g.group_id)).cloned().collect()
            }
            SecurityGroupFilter::ByNames { names, vpc_id } => groups
                .filter(|g| names.contains(&g.group_name))
                .filter(|g| vpc_id.is_none() || g.vpc_id == *vpc_id)
                .cloned()
                .collect(),
        };
        Ok(found)
    }

    async fn describe_classic_link_vpcs(&self) -> scaleflow_cloud::Result<Vec<ClassicLinkVpc>> {
        Ok(self.fixture.classic_link_vpcs.clone())
    }

    async fn describe_auto_scaling_group(
        &self,
        name: &str,
    ) -> scaleflow_cloud::Result<Option<AutoScalingGroup>> {
        self.log(format!("describe_auto_scaling_group {}", name));
        Ok(self
            .fixture
            .auto_scaling_groups
            .iter()
            .find(|g| g.name == name)
            .cloned())
    }

    async fn get_launch_configuration(
        &self,
        name: &str,
    ) -> scaleflow_cloud::Result<Option<LaunchConfiguration>> {
        Ok(self
            .fixture
            .launch_configurations
            .iter()
            .find(|lc| lc.name == name)
            .cloned())
    }

    async fn describe_load_balancers(
        &self,
        names: &[String],
    ) -> scaleflow_cloud::Result<Vec<LoadBalancer>> {
        Ok(names
            .iter()
            .filter(|n| self.fixture.load_balancers.contains(n))
            .map(|n| LoadBalancer {
                name: n.clone(),
                dns_name: None,
            })
            .collect())
    }

    async fn describe_target_groups(
        &self,
        names: &[String],
    ) -> scaleflow_cloud::Result<Vec<TargetGroup>> {
        Ok(self
            .fixture
            .target_groups
            .iter()
            .filter(|tg| names.contains(&tg.name))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct FakeProviders {
    regions: Mutex<HashMap<String, RegionFixture>>,
    pub queries: Arc<Mutex<Vec<String>>>,
}

impl FakeProviders {
    pub fn set_region(&self, region: &str, fixture: RegionFixture) {
        self.regions
            .lock()
            .unwrap()
            .insert(region.to_string(), fixture);
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl ProviderFactory for FakeProviders {
    fn region_client(
        &self,
        _account: &dyn AccountCredentials,
        region: &str,
    ) -> Arc<dyn RegionClient> {
        let fixture = self
            .regions
            .lock()
            .unwrap()
            .get(region)
            .cloned()
            .unwrap_or_default();
        Arc::new(FakeRegionClient {
            region: region.to_string(),
            fixture,
            queries: Arc::clone(&self.queries),
        })
    }
}

#[derive(Default)]
pub struct FakeProvisioner {
    pub created: Mutex<Vec<ProvisionSpec>>,
    pub fail_regions: Mutex<Vec<String>>,
}

impl FakeProvisioner {
    pub fn created(&self) -> Vec<ProvisionSpec> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProvisioningWorker for FakeProvisioner {
    async fn create_group(
        &self,
        _account: &dyn AccountCredentials,
        spec: &ProvisionSpec,
    ) -> scaleflow_cloud::Result<String> {
        if self.fail_regions.lock().unwrap().contains(&spec.region) {
            return Err(CloudError::ApiError(format!(
                "create failed in {}",
                spec.region
            )));
        }
        let mut created = self.created.lock().unwrap();
        let cluster = match &spec.stack {
            Some(stack) => format!("{}-{}", spec.application, stack),
            None => spec.application.clone(),
        };
        let name = format!("{}-v{:03}", cluster, created.len());
        created.push(spec.clone());
        Ok(name)
    }
}

#[derive(Default)]
pub struct FakeReferenceCopier {
    pub policies: Mutex<Vec<ReferenceCopyRequest>>,
    pub scheduled_actions: Mutex<Vec<ReferenceCopyRequest>>,
}

#[async_trait]
impl ReferenceCopier for FakeReferenceCopier {
    async fn copy_scaling_policies(
        &self,
        request: &ReferenceCopyRequest,
    ) -> scaleflow_cloud::Result<()> {
        self.policies.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn copy_scheduled_actions(
        &self,
        request: &ReferenceCopyRequest,
    ) -> scaleflow_cloud::Result<()> {
        self.scheduled_actions.lock().unwrap().push(request.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeHookWorker {
    pub attached: Mutex<Vec<(String, String, Vec<LifecycleHook>)>>,
}

#[async_trait]
impl LifecycleHookWorker for FakeHookWorker {
    async fn attach_hooks(
        &self,
        _account: &dyn AccountCredentials,
        region: &str,
        asg_name: &str,
        hooks: &[LifecycleHook],
    ) -> scaleflow_cloud::Result<()> {
        self.attached.lock().unwrap().push((
            region.to_string(),
            asg_name.to_string(),
            hooks.to_vec(),
        ));
        Ok(())
    }
}

/// Every collaborator, wired to fakes
pub struct TestHarness {
    pub providers: Arc<FakeProviders>,
    pub provisioner: Arc<FakeProvisioner>,
    pub copier: Arc<FakeReferenceCopier>,
    pub hooks: Arc<FakeHookWorker>,
    pub task: Arc<RecordingTask>,
    pub accounts: Vec<StaticAccount>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            providers: Arc::new(FakeProviders::default()),
            provisioner: Arc::new(FakeProvisioner::default()),
            copier: Arc::new(FakeReferenceCopier::default()),
            hooks: Arc::new(FakeHookWorker::default()),
            task: Arc::new(RecordingTask::new()),
            accounts: vec![
                StaticAccount::new(ACCOUNT, ACCOUNT_ID).with_default_key_pair("nf-keypair-a"),
            ],
        }
    }

    pub fn with_account(mut self, account: StaticAccount) -> Self {
        self.accounts.retain(|a| a.name != account.name);
        self.accounts.push(account);
        self
    }

    pub fn region(self, region: &str, fixture: RegionFixture) -> Self {
        self.providers.set_region(region, fixture);
        self
    }

    pub fn services(&self) -> DeployServices {
        DeployServices {
            accounts: Arc::new(ConfigAccountLookup::new(self.accounts.clone())),
            providers: self.providers.clone(),
            provisioner: self.provisioner.clone(),
            reference_copier: self.copier.clone(),
            lifecycle_hooks: self.hooks.clone(),
            task: self.task.clone(),
        }
    }

    pub fn planner(&self, defaults: DeployDefaults) -> DeploymentPlanner {
        DeploymentPlanner::new(self.services(), defaults)
    }
}

pub fn request(regions: &[&str]) -> DeployRequest {
    DeployRequest {
        application: "api".to_string(),
        stack: Some("prod".to_string()),
        account: ACCOUNT.to_string(),
        availability_zones: regions
            .iter()
            .map(|r| RegionZones::new(*r, vec![format!("{}a", r), format!("{}b", r)]))
            .collect(),
        instance_type: "m3.large".to_string(),
        image_name: "api-base".to_string(),
        ..Default::default()
    }
}
