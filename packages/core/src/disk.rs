//! Block device listing, flattening and USB partition filtering.
//!
//! `lsblk -J` reports disks with their partitions nested as `children`.
//! [`flatten`] turns that tree into a pre-order list in which every node
//! carries the `model`, `tran` and `serial` values of its nearest ancestor
//! when it has none of its own (lsblk only reports them on the disk), and
//! [`usb_partitions`] keeps the rows the session can act on.

use std::fmt;

use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::executor::Source;

/// Columns requested from lsblk.
pub const LSBLK_COLUMNS: &str = "NAME,KNAME,PATH,TYPE,SIZE,FSTYPE,MOUNTPOINT,LABEL,MODEL,TRAN,UUID,SERIAL";

/// Kind of block device as reported in lsblk's `type` column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeType {
    /// A whole physical device.
    Disk,
    /// A partition of a disk.
    Part,
    /// Anything else (rom, loop, lvm, crypt, ...).
    #[default]
    Other,
}

impl From<&str> for NodeType {
    fn from(value: &str) -> Self {
        match value {
            "disk" => NodeType::Disk,
            "part" => NodeType::Part,
            _ => NodeType::Other,
        }
    }
}

impl<'de> Deserialize<'de> for NodeType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(NodeType::from(raw.as_deref().unwrap_or_default()))
    }
}

/// One block device from lsblk, nested or flattened.
///
/// Every field may be missing from the listing; missing values are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeviceNode {
    /// Device name (e.g., "sdb1").
    #[serde(default)]
    pub name: String,
    /// Kernel device name.
    #[serde(default, rename = "kname")]
    pub kernel_name: String,
    /// Full device path (e.g., "/dev/sdb1"). Older lsblk releases omit it.
    #[serde(default)]
    pub path: String,
    #[serde(default, rename = "type")]
    pub node_type: NodeType,
    /// Human-readable size (e.g., "14.9G").
    #[serde(default, deserialize_with = "display_string")]
    pub size: String,
    #[serde(default)]
    pub fstype: Option<String>,
    /// Current mount point, present only while mounted.
    #[serde(default)]
    pub mountpoint: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    /// Transport type (e.g., "usb", "sata", "nvme").
    #[serde(default, rename = "tran")]
    pub transport: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    /// Nested devices. Always empty after [`flatten`].
    #[serde(default, deserialize_with = "nullable_children")]
    pub children: Vec<DeviceNode>,
}

impl DeviceNode {
    /// Returns the device path, falling back to `/dev/<name>`.
    pub fn device_path(&self) -> String {
        if self.path.is_empty() {
            format!("/dev/{}", self.name)
        } else {
            self.path.clone()
        }
    }

    /// Returns the current mount point if the device is mounted.
    pub fn mounted_at(&self) -> Option<&str> {
        self.mountpoint.as_deref().filter(|m| !m.is_empty())
    }

    /// Returns true if this device is currently mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted_at().is_some()
    }

    /// Returns the filesystem type if lsblk detected one.
    pub fn filesystem(&self) -> Option<&str> {
        self.fstype.as_deref().filter(|f| !f.is_empty())
    }

    /// Returns true if this is a partition attached over USB.
    pub fn is_usb_partition(&self) -> bool {
        self.node_type == NodeType::Part && self.transport.as_deref() == Some("usb")
    }

    /// Copy of this node without its children and with inherited attributes applied.
    fn flattened(&self, parent: &Inherited) -> DeviceNode {
        DeviceNode {
            name: self.name.clone(),
            kernel_name: self.kernel_name.clone(),
            path: self.path.clone(),
            node_type: self.node_type,
            size: self.size.clone(),
            fstype: self.fstype.clone(),
            mountpoint: self.mountpoint.clone(),
            label: self.label.clone(),
            model: inherit(&self.model, &parent.model),
            transport: inherit(&self.transport, &parent.transport),
            uuid: self.uuid.clone(),
            serial: inherit(&self.serial, &parent.serial),
            children: Vec::new(),
        }
    }
}

/// A data source failure, shown in place of a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub message: String,
}

impl ErrorRecord {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A row of the device listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Device(DeviceNode),
    Error(ErrorRecord),
}

impl Record {
    /// Creates an error row.
    pub fn error(message: impl Into<String>) -> Self {
        Record::Error(ErrorRecord::new(message))
    }

    /// Returns the device, or `None` for error rows.
    pub fn device(&self) -> Option<&DeviceNode> {
        match self {
            Record::Device(node) => Some(node),
            Record::Error(_) => None,
        }
    }
}

/// Attributes a node passes down to its children.
#[derive(Debug, Clone, Default)]
struct Inherited {
    model: Option<String>,
    transport: Option<String>,
    serial: Option<String>,
}

impl From<&DeviceNode> for Inherited {
    fn from(node: &DeviceNode) -> Self {
        Self {
            model: node.model.clone(),
            transport: node.transport.clone(),
            serial: node.serial.clone(),
        }
    }
}

fn inherit(own: &Option<String>, parent: &Option<String>) -> Option<String> {
    match own {
        Some(value) if !value.is_empty() => own.clone(),
        _ => parent.clone(),
    }
}

/// Flattens a nested listing into pre-order, applying attribute inheritance.
///
/// Error rows pass through unchanged. The input is left untouched.
pub fn flatten(records: &[Record]) -> Vec<Record> {
    let mut flat = Vec::new();
    for record in records {
        match record {
            Record::Error(error) => flat.push(Record::Error(error.clone())),
            Record::Device(node) => flatten_node(node, &Inherited::default(), &mut flat),
        }
    }
    flat
}

fn flatten_node(node: &DeviceNode, parent: &Inherited, flat: &mut Vec<Record>) {
    let device = node.flattened(parent);
    let inherited = Inherited::from(&device);
    flat.push(Record::Device(device));

    for child in &node.children {
        flatten_node(child, &inherited, flat);
    }
}

/// Keeps error rows and USB partitions, in order.
pub fn usb_partitions(records: impl IntoIterator<Item = Record>) -> Vec<Record> {
    records
        .into_iter()
        .filter(|record| match record {
            Record::Error(_) => true,
            Record::Device(node) => node.is_usb_partition(),
        })
        .collect()
}

/// Raw JSON structure from lsblk output.
#[derive(Debug, Deserialize)]
struct LsblkOutput {
    #[serde(default)]
    blockdevices: Vec<DeviceNode>,
}

/// Parses `lsblk -J` output into the nested device tree.
pub fn parse_lsblk(json: &str) -> Result<Vec<DeviceNode>> {
    let output: LsblkOutput = serde_json::from_str(json).map_err(|e| Error::LsblkParse {
        message: e.to_string(),
    })?;
    Ok(output.blockdevices)
}

/// Lists block devices as a nested tree.
pub fn list_block_devices(source: &Source) -> Result<Vec<DeviceNode>> {
    let json = source.read("lsblk", &["-J", "-o", LSBLK_COLUMNS])?;
    parse_lsblk(&json)
}

/// Lists block devices, turning any failure into a single error row.
pub fn load_block_devices(source: &Source) -> Vec<Record> {
    match list_block_devices(source) {
        Ok(devices) => {
            debug!(count = devices.len(), "loaded block devices");
            devices.into_iter().map(Record::Device).collect()
        }
        Err(e) => {
            warn!(error = %e, "block device listing unavailable");
            vec![Record::error(format!("lsblk error: {}", e))]
        }
    }
}

/// Loads the rows shown in the partition list.
pub fn load_usb_partitions(source: &Source) -> Vec<Record> {
    let parts = usb_partitions(flatten(&load_block_devices(source)));
    debug!(count = parts.len(), "usb partitions after filtering");
    parts
}

/// Accepts lsblk sizes as display strings or (older releases) raw numbers.
fn display_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) => text,
        Some(Raw::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

fn nullable_children<'de, D>(deserializer: D) -> std::result::Result<Vec<DeviceNode>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<DeviceNode>>::deserialize(deserializer)?.unwrap_or_default())
}
