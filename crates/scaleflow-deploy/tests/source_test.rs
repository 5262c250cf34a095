mod common;

use common::*;
use scaleflow_cloud::{BlockDevice, Capacity, StaticAccount};
use scaleflow_config::{ConfigAccountLookup, DeployDefaults};
use scaleflow_deploy::{
    BlockDeviceResolver, BlockDeviceTable, DeployError, SourceAttributeCopier, SourceRef,
};

struct Fixture {
    accounts: ConfigAccountLookup,
    providers: FakeProviders,
    resolver: BlockDeviceResolver,
}

impl Fixture {
    fn new() -> Self {
        let providers = FakeProviders::default();
        let (asg, lc) = source_group(
            "api-prod-v003",
            "m3.large",
            vec![ephemeral_mapping("/dev/sdb", "ephemeral0")],
        );
        providers.set_region(
            "us-west-2",
            RegionFixture::default().with_source_group(asg, lc),
        );
        let (asg, lc) = source_group(
            "api-test-v001",
            "m3.large",
            vec![
                ephemeral_mapping("/dev/sdb", "ephemeral0"),
                ephemeral_mapping("/dev/sdc", "ephemeral1"),
            ],
        );
        providers.set_region(
            "eu-west-1",
            RegionFixture::default().with_source_group(asg, lc),
        );

        Self {
            accounts: ConfigAccountLookup::new(vec![
                StaticAccount::new(ACCOUNT, ACCOUNT_ID),
                StaticAccount::new("test", "210987654321"),
            ]),
            providers,
            resolver: BlockDeviceResolver::new(BlockDeviceTable::new(&DeployDefaults::default())),
        }
    }

    fn copier(&self) -> SourceAttributeCopier<'_> {
        SourceAttributeCopier::new(&self.accounts, &self.providers, &self.resolver)
    }
}

/// Requesting source capacity without a source group fails
#[tokio::test]
async fn test_source_capacity_without_source() {
    let fixture = Fixture::new();
    let mut request = request(&["us-east-1"]);
    request.source = Some(SourceRef {
        use_source_capacity: true,
        ..Default::default()
    });

    let result = fixture.copier().resolve(&request).await;
    assert!(matches!(result, Err(DeployError::Precondition(_))));
}

/// Requesting source capacity from a missing group fails
#[tokio::test]
async fn test_source_capacity_with_missing_group() {
    let fixture = Fixture::new();
    let mut request = request(&["us-east-1"]);
    request.source = Some(SourceRef::new("us-west-2", "api-prod-v999").with_source_capacity());

    let result = fixture.copier().resolve(&request).await;
    assert!(matches!(result, Err(DeployError::Precondition(_))));
}

/// A missing source group is a soft miss when capacity is not needed
#[tokio::test]
async fn test_missing_source_is_soft_miss() {
    let fixture = Fixture::new();
    let mut request = request(&["us-east-1"]);
    request.source = Some(SourceRef::new("us-west-2", "api-prod-v999"));

    let snapshot = fixture
        .copier()
        .fetch(request.source.as_ref(), ACCOUNT)
        .await
        .unwrap();
    assert!(snapshot.is_none());

    let derived = fixture.copier().resolve(&request).await.unwrap();
    assert_eq!(derived, request);
}

/// An unknown source account is an argument error, not a soft miss
#[tokio::test]
async fn test_unknown_source_account() {
    let fixture = Fixture::new();
    let source = SourceRef::new("us-west-2", "api-prod-v003").with_account("staging");

    let result = fixture.copier().fetch(Some(&source), ACCOUNT).await;
    assert!(matches!(result, Err(DeployError::Argument(_))));
}

/// Capacity, spot price and regenerated default devices come from the source
#[tokio::test]
async fn test_copies_source_attributes() {
    let fixture = Fixture::new();
    let mut request = request(&["us-east-1"]);
    request.instance_type = "m3.xlarge".to_string();
    request.source = Some(SourceRef::new("us-west-2", "api-prod-v003").with_source_capacity());
    let original = request.clone();

    let derived = fixture.copier().resolve(&request).await.unwrap();

    assert_eq!(derived.capacity, Capacity::new(3, 9, 6));
    assert_eq!(derived.spot_price.as_deref(), Some("0.25"));
    assert_eq!(
        derived.block_devices,
        Some(vec![
            BlockDevice::ephemeral("/dev/sdb", "ephemeral0"),
            BlockDevice::ephemeral("/dev/sdc", "ephemeral1"),
        ])
    );
    assert_eq!(request, original);
}

/// Capacity stays as requested unless source capacity is asked for
#[tokio::test]
async fn test_capacity_kept_without_flag() {
    let fixture = Fixture::new();
    let mut request = request(&["us-east-1"]);
    request.capacity = Capacity::new(1, 1, 1);
    request.spot_price = Some("0.10".to_string());
    request.source = Some(SourceRef::new("us-west-2", "api-prod-v003"));

    let derived = fixture.copier().resolve(&request).await.unwrap();

    assert_eq!(derived.capacity, Capacity::new(1, 1, 1));
    assert_eq!(derived.spot_price.as_deref(), Some("0.10"));
}

/// Customised source devices are carried over verbatim
#[tokio::test]
async fn test_custom_source_devices_copied() {
    let fixture = Fixture::new();
    let mut request = request(&["us-east-1"]);
    request.instance_type = "m3.medium".to_string();
    request.source = Some(SourceRef::new("eu-west-1", "api-test-v001").with_account("test"));

    let derived = fixture.copier().resolve(&request).await.unwrap();

    assert_eq!(
        derived.block_devices,
        Some(vec![
            BlockDevice::ephemeral("/dev/sdb", "ephemeral0"),
            BlockDevice::ephemeral("/dev/sdc", "ephemeral1"),
        ])
    );
}
