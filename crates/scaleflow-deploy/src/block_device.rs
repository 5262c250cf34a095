//! Block device layout
//!
//! Default layouts come from a static instance-type table. When cloning, the
//! resolver decides whether to keep explicit devices, regenerate defaults for the
//! new instance type, or carry the source's devices over verbatim.

use crate::description::DeployRequest;
use scaleflow_cloud::{BlockDevice, BlockDeviceMapping, LaunchConfiguration};
use scaleflow_config::DeployDefaults;

/// Default device layout for an instance type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// `n` instance-store volumes as `ephemeral0..n`
    Ephemeral(u8),
    /// One EBS volume of the given size in GiB
    Ebs(u32),
    /// No extra devices
    Empty,
}

const INSTANCE_TYPE_LAYOUTS: &[(&str, Layout)] = &[
    ("c1.medium", Layout::Ephemeral(1)),
    ("c1.xlarge", Layout::Ephemeral(4)),
    ("c3.large", Layout::Ephemeral(2)),
    ("c3.xlarge", Layout::Ephemeral(2)),
    ("c3.2xlarge", Layout::Ephemeral(2)),
    ("c3.4xlarge", Layout::Ephemeral(2)),
    ("c3.8xlarge", Layout::Ephemeral(2)),
    ("c4.large", Layout::Ebs(40)),
    ("c4.xlarge", Layout::Ebs(80)),
    ("c4.2xlarge", Layout::Ebs(80)),
    ("c4.4xlarge", Layout::Ebs(120)),
    ("c4.8xlarge", Layout::Ebs(120)),
    ("d2.xlarge", Layout::Ephemeral(3)),
    ("d2.2xlarge", Layout::Ephemeral(6)),
    ("d2.4xlarge", Layout::Ephemeral(12)),
    ("d2.8xlarge", Layout::Ephemeral(24)),
    ("i2.xlarge", Layout::Ephemeral(1)),
    ("i2.2xlarge", Layout::Ephemeral(2)),
    ("i2.4xlarge", Layout::Ephemeral(4)),
    ("i2.8xlarge", Layout::Ephemeral(8)),
    ("m1.small", Layout::Ephemeral(1)),
    ("m1.medium", Layout::Ephemeral(1)),
    ("m1.large", Layout::Ephemeral(2)),
    ("m1.xlarge", Layout::Ephemeral(4)),
    ("m2.xlarge", Layout::Ephemeral(1)),
    ("m2.2xlarge", Layout::Ephemeral(1)),
    ("m2.4xlarge", Layout::Ephemeral(2)),
    ("m3.medium", Layout::Ephemeral(1)),
    ("m3.large", Layout::Ephemeral(1)),
    ("m3.xlarge", Layout::Ephemeral(2)),
    ("m3.2xlarge", Layout::Ephemeral(2)),
    ("m4.large", Layout::Ebs(40)),
    ("m4.xlarge", Layout::Ebs(80)),
    ("m4.2xlarge", Layout::Ebs(80)),
    ("m4.4xlarge", Layout::Ebs(120)),
    ("m4.10xlarge", Layout::Ebs(120)),
    ("r3.large", Layout::Ephemeral(1)),
    ("r3.xlarge", Layout::Ephemeral(1)),
    ("r3.2xlarge", Layout::Ephemeral(1)),
    ("r3.4xlarge", Layout::Ephemeral(1)),
    ("r3.8xlarge", Layout::Ephemeral(2)),
    ("t1.micro", Layout::Empty),
    ("t2.nano", Layout::Empty),
    ("t2.micro", Layout::Empty),
    ("t2.small", Layout::Empty),
    ("t2.medium", Layout::Empty),
    ("t2.large", Layout::Empty),
];

/// `/dev/sdb`, `/dev/sdc`, ... for the n-th extra device
fn device_name(index: u8) -> String {
    format!("/dev/sd{}", char::from(b'b' + index))
}

/// Instance-type to default block device table
#[derive(Debug, Clone)]
pub struct BlockDeviceTable {
    volume_type: String,
    unknown_instance_type_device: Option<BlockDevice>,
}

impl BlockDeviceTable {
    pub fn new(defaults: &DeployDefaults) -> Self {
        Self {
            volume_type: defaults.default_block_device_type.clone(),
            unknown_instance_type_device: defaults.unknown_instance_type_block_device.clone(),
        }
    }

    /// Default devices for an instance type
    pub fn for_instance_type(&self, instance_type: &str) -> Vec<BlockDevice> {
        let layout = INSTANCE_TYPE_LAYOUTS
            .iter()
            .find(|(t, _)| *t == instance_type)
            .map(|(_, layout)| *layout);

        match layout {
            Some(Layout::Ephemeral(count)) => (0..count)
                .map(|i| BlockDevice::ephemeral(device_name(i), format!("ephemeral{}", i)))
                .collect(),
            Some(Layout::Ebs(size)) => {
                vec![BlockDevice::ebs(device_name(0), size, self.volume_type.clone())]
            }
            Some(Layout::Empty) => Vec::new(),
            None => {
                tracing::debug!(instance_type, "Instance type not in block device table");
                self.unknown_instance_type_device.iter().cloned().collect()
            }
        }
    }
}

/// Convert provider mappings into launch-form devices, keeping every EBS attribute
pub fn convert_mappings(mappings: &[BlockDeviceMapping]) -> Vec<BlockDevice> {
    mappings
        .iter()
        .map(|m| {
            let mut device = BlockDevice {
                device_name: m.device_name.clone(),
                virtual_name: m.virtual_name.clone(),
                ..Default::default()
            };
            if let Some(ebs) = &m.ebs {
                device.size = ebs.volume_size;
                device.volume_type = ebs.volume_type.clone();
                device.iops = ebs.iops;
                device.delete_on_termination = ebs.delete_on_termination;
                device.snapshot_id = ebs.snapshot_id.clone();
                device.encrypted = ebs.encrypted;
            }
            device
        })
        .collect()
}

/// Devices in comparable form, sorted by device name
///
/// Providers report `encrypted: false` on volumes the table leaves unset, so that
/// value is folded into `None`. Every other attribute must match exactly.
fn normalized(devices: &[BlockDevice]) -> Vec<BlockDevice> {
    let mut normalized: Vec<BlockDevice> = devices
        .iter()
        .cloned()
        .map(|mut d| {
            if d.encrypted == Some(false) {
                d.encrypted = None;
            }
            d
        })
        .collect();
    normalized.sort_by(|a, b| a.device_name.cmp(&b.device_name));
    normalized
}

/// Picks the block devices for a request cloned from a source launch configuration
#[derive(Debug, Clone)]
pub struct BlockDeviceResolver {
    table: BlockDeviceTable,
}

impl BlockDeviceResolver {
    pub fn new(table: BlockDeviceTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &BlockDeviceTable {
        &self.table
    }

    /// Rules, in order:
    /// 1. explicit devices on the request are returned as-is
    /// 2. if the instance type changed and the source used exactly its type's
    ///    defaults, the new type's defaults are returned
    /// 3. otherwise the source's devices are copied verbatim
    pub fn resolve(&self, request: &DeployRequest, source: &LaunchConfiguration) -> Vec<BlockDevice> {
        if let Some(explicit) = &request.block_devices {
            return explicit.clone();
        }

        let source_devices = convert_mappings(&source.block_device_mappings);

        if source.instance_type != request.instance_type {
            let source_defaults = self.table.for_instance_type(&source.instance_type);
            if normalized(&source_defaults) == normalized(&source_devices) {
                tracing::debug!(
                    from = %source.instance_type,
                    to = %request.instance_type,
                    "Source used default block devices, regenerating for new instance type"
                );
                return self.table.for_instance_type(&request.instance_type);
            }
        }

        source_devices
    }
}
